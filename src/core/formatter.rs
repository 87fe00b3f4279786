use crate::core::Address;
use std::fmt::Display;
use std::time::Duration;

pub fn format_address(label: &str, address: &Address) -> String {
    format!(
        "Response from {}: cep={}, logradouro={}, complemento={}, bairro={}, localidade={}, uf={}",
        label,
        address.cep,
        address.logradouro,
        address.complemento,
        address.bairro,
        address.localidade,
        address.uf
    )
}

pub fn format_error(label: &str, error: &impl Display) -> String {
    format!("Error calling {}: {}", label, error)
}

pub fn format_timeout(timeout: Duration) -> String {
    format!("Timeout: no response received within {:?}", timeout)
}
