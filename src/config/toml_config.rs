use crate::core::{ConfigProvider, SourceDescriptor};
use crate::utils::error::{CepError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_POSTAL_CODE: &str = "55296-530";
pub const DEFAULT_TIMEOUT_MS: u64 = 1000;
pub const MAX_TIMEOUT_MS: u64 = 60_000;
pub const BRASIL_API_URL_TEMPLATE: &str = "https://brasilapi.com.br/api/cep/v1/{postal_code}";
pub const VIACEP_URL_TEMPLATE: &str = "http://viacep.com.br/ws/{postal_code}/json/";
pub const POSTAL_CODE_PLACEHOLDER: &str = "{postal_code}";

const ADDRESS_FIELDS: [&str; 6] = [
    "cep",
    "logradouro",
    "complemento",
    "bairro",
    "localidade",
    "uf",
];

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RaceConfig {
    pub postal_code: String,
    pub timeout_ms: u64,
    pub cancel_losers: bool,
    pub providers: Vec<ProviderConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub label: String,
    pub url_template: String,
    /// Provider field name -> canonical address field name.
    pub field_mapping: Option<HashMap<String, String>>,
}

impl ProviderConfig {
    pub fn new(label: impl Into<String>, url_template: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            url_template: url_template.into(),
            field_mapping: None,
        }
    }

    pub fn url_for(&self, postal_code: &str) -> String {
        self.url_template
            .replace(POSTAL_CODE_PLACEHOLDER, postal_code)
    }

    pub fn descriptor(&self, postal_code: &str) -> SourceDescriptor {
        SourceDescriptor::new(self.label.clone(), self.url_for(postal_code))
            .with_field_mapping(self.field_mapping.clone().unwrap_or_default())
    }

    pub fn brasil_api() -> Self {
        let mapping = [
            ("street", "logradouro"),
            ("neighborhood", "bairro"),
            ("city", "localidade"),
            ("state", "uf"),
        ]
        .into_iter()
        .map(|(from, to)| (from.to_string(), to.to_string()))
        .collect();

        Self {
            field_mapping: Some(mapping),
            ..Self::new("BrasilAPI", BRASIL_API_URL_TEMPLATE)
        }
    }

    pub fn viacep() -> Self {
        Self::new("ViaCEP", VIACEP_URL_TEMPLATE)
    }
}

impl Default for RaceConfig {
    fn default() -> Self {
        Self {
            postal_code: DEFAULT_POSTAL_CODE.to_string(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            cancel_losers: false,
            providers: vec![ProviderConfig::brasil_api(), ProviderConfig::viacep()],
        }
    }
}

impl RaceConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| CepError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${CEP})
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| CepError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures<'_>| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_non_empty_string("postal_code", &self.postal_code)?;
        validation::validate_range("timeout_ms", self.timeout_ms, 1, MAX_TIMEOUT_MS)?;

        if self.providers.is_empty() {
            return Err(CepError::InvalidConfigValueError {
                field: "providers".to_string(),
                value: "[]".to_string(),
                reason: "At least one provider is required".to_string(),
            });
        }

        for provider in &self.providers {
            validation::validate_non_empty_string("providers.label", &provider.label)?;

            if !provider.url_template.contains(POSTAL_CODE_PLACEHOLDER) {
                return Err(CepError::InvalidConfigValueError {
                    field: "providers.url_template".to_string(),
                    value: provider.url_template.clone(),
                    reason: format!("Template must contain {}", POSTAL_CODE_PLACEHOLDER),
                });
            }
            validation::validate_url(
                "providers.url_template",
                &provider.url_for(&self.postal_code),
            )?;

            for target in provider.field_mapping.iter().flat_map(|m| m.values()) {
                if !ADDRESS_FIELDS.contains(&target.as_str()) {
                    return Err(CepError::InvalidConfigValueError {
                        field: "providers.field_mapping".to_string(),
                        value: target.clone(),
                        reason: format!(
                            "Unknown address field. Valid fields: {}",
                            ADDRESS_FIELDS.join(", ")
                        ),
                    });
                }
            }
        }

        validation::validate_unique(
            "providers.label",
            self.providers.iter().map(|p| p.label.as_str()),
        )
    }
}

impl ConfigProvider for RaceConfig {
    fn postal_code(&self) -> &str {
        &self.postal_code
    }

    fn sources(&self) -> Vec<SourceDescriptor> {
        self.providers
            .iter()
            .map(|provider| provider.descriptor(&self.postal_code))
            .collect()
    }

    fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    fn cancel_losers(&self) -> bool {
        self.cancel_losers
    }
}

impl Validate for RaceConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
