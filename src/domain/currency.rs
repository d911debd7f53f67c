//! Supported currencies
//!
//! A user picks one display currency. Amounts are never converted, the
//! code only drives formatting on the client.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use super::DomainError;

/// (code, locale)
const CURRENCIES: &[(&str, &str)] = &[
    ("USD", "en-US"),
    ("EUR", "de-DE"),
    ("JPY", "ja-JP"),
    ("GBP", "en-GB"),
    ("INR", "en-IN"),
    ("CAD", "en-CA"),
    ("AUD", "en-AU"),
];

/// A supported ISO 4217 currency code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Currency(&'static str);

impl Currency {
    pub const USD: Currency = Currency("USD");

    pub fn code(&self) -> &'static str {
        self.0
    }

    /// BCP 47 locale used to format amounts in this currency.
    pub fn locale(&self) -> &'static str {
        CURRENCIES
            .iter()
            .find(|(code, _)| *code == self.0)
            .map(|(_, locale)| *locale)
            .unwrap_or("en-US")
    }

    pub fn all() -> impl Iterator<Item = Currency> {
        CURRENCIES.iter().map(|(code, _)| Currency(*code))
    }
}

impl Default for Currency {
    fn default() -> Self {
        Self::USD
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

impl FromStr for Currency {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_uppercase();
        CURRENCIES
            .iter()
            .find(|(code, _)| *code == wanted)
            .map(|(code, _)| Currency(*code))
            .ok_or_else(|| DomainError::UnsupportedCurrency(s.to_string()))
    }
}

impl Serialize for Currency {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.0)
    }
}

// The code borrows from the static table, never from the input.
impl<'de> Deserialize<'de> for Currency {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let code = String::deserialize(deserializer)?;
        code.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_codes() {
        let eur: Currency = "eur".parse().unwrap();
        assert_eq!(eur.code(), "EUR");
        assert_eq!(eur.locale(), "de-DE");
    }

    #[test]
    fn test_unknown_code_rejected() {
        let err = "XYZ".parse::<Currency>().unwrap_err();
        assert_eq!(err, DomainError::UnsupportedCurrency("XYZ".to_string()));
    }

    #[test]
    fn test_default_is_usd() {
        assert_eq!(Currency::default().code(), "USD");
        assert_eq!(Currency::default().locale(), "en-US");
    }

    #[test]
    fn test_serde_uses_the_code() {
        let currency: Currency = serde_json::from_str("\"gbp\"").unwrap();
        assert_eq!(currency.code(), "GBP");
        assert_eq!(serde_json::to_string(&currency).unwrap(), "\"GBP\"");

        let err = serde_json::from_str::<Currency>("\"DOGE\"").unwrap_err();
        assert!(err.to_string().contains("Unsupported currency: DOGE"));
    }

    #[test]
    fn test_every_listed_code_parses() {
        for currency in Currency::all() {
            assert_eq!(currency.code().parse::<Currency>().unwrap(), currency);
        }
    }
}
