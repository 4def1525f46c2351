use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Número de cédula: the 10-digit national ID used as the sole query key.
///
/// Only the digit-count is validated. The upstream registries accept any
/// 10-digit value, so no checksum or province-code validation is applied
/// here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cedula(String);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CedulaInvalida {
    #[error("La cédula es requerida")]
    Vacia,

    #[error("La cédula debe tener exactamente 10 dígitos")]
    Formato,
}

impl Cedula {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Cedula {
    type Err = CedulaInvalida;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(CedulaInvalida::Vacia);
        }
        if s.len() != 10 || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(CedulaInvalida::Formato);
        }
        Ok(Cedula(s.to_string()))
    }
}

impl fmt::Display for Cedula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
