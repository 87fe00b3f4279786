pub mod fetcher;
pub mod formatter;
pub mod race;

pub use crate::domain::model::{Address, RaceOutcome, SourceDescriptor, SourceReport};
pub use crate::domain::ports::{AddressFetcher, ConfigProvider};
pub use crate::utils::error::Result;
