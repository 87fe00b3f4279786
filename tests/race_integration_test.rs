use cep_race::utils::validation::Validate;
use cep_race::{race_providers, ProviderConfig, RaceConfig, RaceOutcome};
use httpmock::prelude::*;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio_test::assert_ok;

const POSTAL_CODE: &str = "01001-000";

fn race_config(server: &MockServer, timeout_ms: u64) -> RaceConfig {
    RaceConfig {
        postal_code: POSTAL_CODE.to_string(),
        timeout_ms,
        cancel_losers: false,
        providers: vec![
            ProviderConfig::new("Primary", server.url("/primary/{postal_code}")),
            ProviderConfig::new("Secondary", server.url("/secondary/{postal_code}/json/")),
        ],
    }
}

fn viacep_body(city: &str) -> serde_json::Value {
    serde_json::json!({
        "cep": POSTAL_CODE,
        "logradouro": "Praca da Se",
        "complemento": "lado impar",
        "bairro": "Se",
        "localidade": city,
        "uf": "SP"
    })
}

#[tokio::test]
async fn test_fast_sources_produce_exactly_one_response_line() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path(format!("/primary/{}", POSTAL_CODE));
            then.status(200).json_body(viacep_body("Sao Paulo"));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path(format!("/secondary/{}/json/", POSTAL_CODE));
            then.status(200).json_body(viacep_body("Sao Paulo"));
        })
        .await;

    let config = race_config(&server, 2_000);
    assert_ok!(config.validate());

    let outcome = race_providers(&config).await;
    let line = outcome.to_string();
    let fields = "cep=01001-000, logradouro=Praca da Se, complemento=lado impar, \
                  bairro=Se, localidade=Sao Paulo, uf=SP";

    assert!(!line.contains('\n'));
    assert!(
        line == format!("Response from Primary: {}", fields)
            || line == format!("Response from Secondary: {}", fields),
        "unexpected line: {}",
        line
    );
}

#[tokio::test]
async fn test_instant_server_error_wins_over_slow_success() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path(format!("/primary/{}", POSTAL_CODE));
            then.status(500);
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path(format!("/secondary/{}/json/", POSTAL_CODE));
            then.status(200)
                .delay(Duration::from_secs(3))
                .json_body(viacep_body("Sao Paulo"));
        })
        .await;

    let outcome = race_providers(&race_config(&server, 1_000)).await;

    assert!(!outcome.is_timeout());
    assert_eq!(outcome.winner(), Some("Primary"));
    assert_eq!(
        outcome.to_string(),
        "Error calling Primary: invalid response: 500"
    );
}

#[tokio::test]
async fn test_slow_sources_time_out_within_bounded_overhead() {
    let server = MockServer::start_async().await;
    for path in [
        format!("/primary/{}", POSTAL_CODE),
        format!("/secondary/{}/json/", POSTAL_CODE),
    ] {
        server
            .mock_async(|when, then| {
                when.method(GET).path(path);
                then.status(200)
                    .delay(Duration::from_secs(3))
                    .json_body(viacep_body("Late"));
            })
            .await;
    }

    let started = Instant::now();
    let outcome = race_providers(&race_config(&server, 500)).await;
    let elapsed = started.elapsed();

    assert_eq!(
        outcome,
        RaceOutcome::TimedOut {
            timeout: Duration::from_millis(500)
        }
    );
    assert_eq!(
        outcome.to_string(),
        "Timeout: no response received within 500ms"
    );
    assert!(elapsed >= Duration::from_millis(500));
    assert!(elapsed < Duration::from_millis(1_500), "took {:?}", elapsed);
}

#[tokio::test]
async fn test_partial_json_is_a_successful_lookup() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path(format!("/primary/{}", POSTAL_CODE));
            then.status(200)
                .json_body(serde_json::json!({ "cep": POSTAL_CODE, "uf": "SP" }));
        })
        .await;

    let mut config = race_config(&server, 2_000);
    config.providers.truncate(1);

    let outcome = race_providers(&config).await;

    assert_eq!(
        outcome.to_string(),
        "Response from Primary: cep=01001-000, logradouro=, complemento=, bairro=, localidade=, uf=SP"
    );
}

#[tokio::test]
async fn test_invalid_json_wins_as_decode_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path(format!("/primary/{}", POSTAL_CODE));
            then.status(200).body("<html>maintenance</html>");
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path(format!("/secondary/{}/json/", POSTAL_CODE));
            then.status(200)
                .delay(Duration::from_secs(3))
                .json_body(viacep_body("Sao Paulo"));
        })
        .await;

    let outcome = race_providers(&race_config(&server, 1_000)).await;
    let line = outcome.to_string();

    assert!(
        line.starts_with("Error calling Primary: decode error: "),
        "unexpected line: {}",
        line
    );
}

#[tokio::test]
async fn test_provider_field_mapping_from_toml() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/api/cep/v1/55296-530");
            then.status(200).json_body(serde_json::json!({
                "cep": "55296530",
                "state": "PE",
                "city": "Garanhuns",
                "neighborhood": "Heliopolis",
                "street": "Rua Joaquim Tavora",
                "service": "open-cep"
            }));
        })
        .await;

    let toml_content = format!(
        r#"
postal_code = "55296-530"
timeout_ms = 2000

[[providers]]
label = "BrasilAPI"
url_template = "{}"

[providers.field_mapping]
street = "logradouro"
neighborhood = "bairro"
city = "localidade"
state = "uf"
"#,
        server.url("/api/cep/v1/{postal_code}")
    );

    let config = RaceConfig::from_toml_str(&toml_content).unwrap();
    assert_ok!(config.validate());

    let outcome = race_providers(&config).await;

    mock.assert_async().await;
    assert_eq!(
        outcome.to_string(),
        "Response from BrasilAPI: cep=55296530, logradouro=Rua Joaquim Tavora, complemento=, \
         bairro=Heliopolis, localidade=Garanhuns, uf=PE"
    );
}

#[test]
fn test_default_mapping_matches_builtin_brasil_api() {
    let expected: HashMap<String, String> = [
        ("street", "logradouro"),
        ("neighborhood", "bairro"),
        ("city", "localidade"),
        ("state", "uf"),
    ]
    .into_iter()
    .map(|(from, to)| (from.to_string(), to.to_string()))
    .collect();

    assert_eq!(ProviderConfig::brasil_api().field_mapping, Some(expected));
    assert_eq!(ProviderConfig::viacep().field_mapping, None);
}
