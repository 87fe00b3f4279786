use crate::domain::model::{Address, SourceDescriptor};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

#[async_trait]
pub trait AddressFetcher: Send + Sync + 'static {
    async fn fetch(&self, source: &SourceDescriptor) -> Result<Address>;
}

pub trait ConfigProvider: Send + Sync {
    fn postal_code(&self) -> &str;
    fn sources(&self) -> Vec<SourceDescriptor>;
    fn timeout(&self) -> Duration;
    fn cancel_losers(&self) -> bool;
}
