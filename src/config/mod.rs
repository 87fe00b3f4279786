pub mod toml_config;

pub use toml_config::{ProviderConfig, RaceConfig};

#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use clap::Parser;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Default, Parser)]
#[command(name = "cep-race")]
#[command(about = "Looks up a CEP on several providers and prints the first answer")]
pub struct CliConfig {
    /// Path to TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Postal code to look up, overrides the configuration
    #[arg(long)]
    pub cep: Option<String>,

    /// Race timeout in milliseconds, overrides the configuration
    #[arg(long)]
    pub timeout_ms: Option<u64>,

    /// Abort the losing lookups once the race is decided
    #[arg(long)]
    pub cancel_losers: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    /// Emit logs as JSON lines on stderr
    #[arg(long)]
    pub json_logs: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// Loads the file named by `--config` (or the built-in defaults) and applies CLI overrides.
    pub fn load(&self) -> Result<RaceConfig> {
        let mut config = match &self.config {
            Some(path) => RaceConfig::from_file(path)?,
            None => RaceConfig::default(),
        };
        self.apply_overrides(&mut config);
        Ok(config)
    }

    pub fn apply_overrides(&self, config: &mut RaceConfig) {
        if let Some(cep) = &self.cep {
            tracing::debug!("🔧 Postal code overridden to: {}", cep);
            config.postal_code = cep.clone();
        }
        if let Some(timeout_ms) = self.timeout_ms {
            tracing::debug!("🔧 Timeout overridden to: {}ms", timeout_ms);
            config.timeout_ms = timeout_ms;
        }
        if self.cancel_losers {
            config.cancel_losers = true;
        }
    }
}
