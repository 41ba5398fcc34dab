use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Chain account address: `0x` followed by 40 hex digits.
///
/// Comparison ignores hex case; the original casing is kept for display.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Address(String);

/// Rejected address input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid chain address: {0:?}")]
pub struct InvalidAddress(pub String);

impl Address {
    /// Parse an address, accepting either `0x` or `0X` prefix.
    pub fn parse(input: &str) -> Result<Self, InvalidAddress> {
        let trimmed = input.trim();
        let digits = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .ok_or_else(|| InvalidAddress(input.to_string()))?;

        if digits.len() != 40 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(InvalidAddress(input.to_string()));
        }

        Ok(Self(format!("0x{}", digits)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Lowercase form, used for equality and as a lookup key.
    pub fn canonical(&self) -> String {
        self.0.to_ascii_lowercase()
    }

    /// Short display form, e.g. `0x1234...7890`.
    pub fn abbreviate(&self) -> String {
        let len = self.0.len();
        format!("{}...{}", &self.0[..6], &self.0[len - 4..])
    }
}

impl PartialEq for Address {
    fn eq(&self, other: &Self) -> bool {
        self.0.eq_ignore_ascii_case(&other.0)
    }
}

impl Eq for Address {}

impl Hash for Address {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.canonical().hash(state);
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Address {
    type Err = InvalidAddress;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Address {
    type Error = InvalidAddress;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Address> for String {
    fn from(address: Address) -> Self {
        address.0
    }
}
