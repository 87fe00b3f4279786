pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliConfig;

pub use crate::config::{ProviderConfig, RaceConfig};
pub use crate::core::{
    fetcher::HttpFetcher,
    race::{race_providers, RaceCoordinator},
};
pub use crate::domain::model::{Address, RaceOutcome, SourceDescriptor, SourceReport};
pub use crate::domain::ports::{AddressFetcher, ConfigProvider};
pub use crate::utils::error::{CepError, Result};
