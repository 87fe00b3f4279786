use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

/// Address returned by a lookup provider, keyed by the canonical ViaCEP field names.
///
/// Missing fields decode as empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Address {
    pub cep: String,
    pub logradouro: String,
    pub complemento: String,
    pub bairro: String,
    pub localidade: String,
    pub uf: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDescriptor {
    pub label: String,
    pub url: String,
    /// Provider field name -> canonical `Address` field name.
    pub field_mapping: HashMap<String, String>,
}

impl SourceDescriptor {
    pub fn new(label: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            url: url.into(),
            field_mapping: HashMap::new(),
        }
    }

    pub fn with_field_mapping(mut self, field_mapping: HashMap<String, String>) -> Self {
        self.field_mapping = field_mapping;
        self
    }
}

/// The single message a fetch unit delivers to the coordinator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceReport {
    pub source: String,
    pub line: String,
    pub succeeded: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RaceOutcome {
    Resolved(SourceReport),
    TimedOut { timeout: Duration },
}

impl RaceOutcome {
    pub fn is_timeout(&self) -> bool {
        matches!(self, RaceOutcome::TimedOut { .. })
    }

    pub fn winner(&self) -> Option<&str> {
        match self {
            RaceOutcome::Resolved(report) => Some(&report.source),
            RaceOutcome::TimedOut { .. } => None,
        }
    }
}

impl fmt::Display for RaceOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RaceOutcome::Resolved(report) => f.write_str(&report.line),
            RaceOutcome::TimedOut { timeout } => {
                f.write_str(&crate::core::formatter::format_timeout(*timeout))
            }
        }
    }
}
