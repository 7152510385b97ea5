use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// How a pass purchase was settled. Stored as its upper-case code; unpaid rows store "".
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum PaymentMethod {
    #[serde(rename = "TBC")]
    Tbc,
    #[serde(rename = "BOG")]
    Bog,
    #[serde(rename = "CASH")]
    Cash,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Tbc => "TBC",
            PaymentMethod::Bog => "BOG",
            PaymentMethod::Cash => "CASH",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "TBC" => Some(PaymentMethod::Tbc),
            "BOG" => Some(PaymentMethod::Bog),
            "CASH" => Some(PaymentMethod::Cash),
            _ => None,
        }
    }

    /// Column value for an optional method.
    pub fn to_column(method: Option<Self>) -> String {
        method.map(|m| m.as_str().to_string()).unwrap_or_default()
    }
}

impl Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
