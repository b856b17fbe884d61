use std::fmt;

use serde::{Deserialize, Serialize};

/// Best-effort connection class, as reported by the platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NetworkStatus {
    /// Effective connection type, e.g. `4g`, `3g`, `slow-2g`.
    Available(String),
    /// The platform exposes no connection information.
    Unavailable,
}

impl NetworkStatus {
    pub fn from_effective_type(effective_type: Option<&str>) -> Self {
        match effective_type.map(str::trim) {
            Some(label) if !label.is_empty() => NetworkStatus::Available(label.to_string()),
            _ => NetworkStatus::Unavailable,
        }
    }
}

impl fmt::Display for NetworkStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NetworkStatus::Available(label) => f.write_str(label),
            NetworkStatus::Unavailable => f.write_str("Unavailable"),
        }
    }
}
