use crate::core::{Address, AddressFetcher, SourceDescriptor};
use crate::utils::error::{CepError, Result};
use reqwest::{Client, StatusCode};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Fetches an address with a single HTTP GET. No retries and no timeout of its own.
#[derive(Debug, Clone, Default)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl AddressFetcher for HttpFetcher {
    async fn fetch(&self, source: &SourceDescriptor) -> Result<Address> {
        tracing::debug!("Making API request to {}: {}", source.label, source.url);
        let response = self.client.get(&source.url).send().await?;

        let status = response.status();
        tracing::debug!("{} response status: {}", source.label, status);

        // Dropping the response here releases the connection without reading the body.
        if status != StatusCode::OK {
            return Err(CepError::InvalidStatus {
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await?;
        decode_address(&body, &source.field_mapping)
    }
}

/// Decodes a provider body into an [`Address`], renaming provider-specific keys first.
///
/// Keys with `null` values are treated as absent.
pub fn decode_address(body: &[u8], field_mapping: &HashMap<String, String>) -> Result<Address> {
    let value: Value = serde_json::from_slice(body)?;

    let object = match value {
        Value::Object(object) => object,
        other => {
            return Err(CepError::UnexpectedPayload {
                kind: json_kind(&other),
            })
        }
    };

    let mapped: Map<String, Value> = object
        .into_iter()
        .filter(|(_, v)| !v.is_null())
        .map(|(key, v)| match field_mapping.get(&key) {
            Some(canonical) => (canonical.clone(), v),
            None => (key, v),
        })
        .collect();

    Ok(serde_json::from_value(Value::Object(mapped))?)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
