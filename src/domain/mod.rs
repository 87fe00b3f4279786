// Domain layer: the address record, source descriptors and the fetcher seam.

pub mod model;
pub mod ports;
