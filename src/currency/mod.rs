//! Currencies an expense can be recorded in.
//!
//! Amounts keep the currency they were entered with; nothing here converts
//! between them.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Currencies accepted on an expense record.
#[derive(
    Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord,
)]
#[serde(try_from = "String", into = "String")]
pub enum Currency {
    #[default]
    Usd,
    Inr,
    Eur,
    Jpy,
}

impl Currency {
    pub const ALL: [Currency; 4] = [Currency::Usd, Currency::Inr, Currency::Eur, Currency::Jpy];

    /// ISO 4217 code as written to the ledger file.
    pub fn code(self) -> &'static str {
        match self {
            Currency::Usd => "USD",
            Currency::Inr => "INR",
            Currency::Eur => "EUR",
            Currency::Jpy => "JPY",
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Currency::Usd => "$",
            Currency::Inr => "₹",
            Currency::Eur => "€",
            Currency::Jpy => "¥",
        }
    }

    /// Renders `amount` with the currency symbol, e.g. `$12.50`.
    pub fn format_amount(self, amount: f64) -> String {
        match self {
            Currency::Jpy => format!("{}{:.0}", self.symbol(), amount),
            _ => format!("{}{:.2}", self.symbol(), amount),
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown currency `{0}` (expected one of USD, INR, EUR, JPY)")]
pub struct UnknownCurrency(pub String);

impl FromStr for Currency {
    type Err = UnknownCurrency;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim();
        Currency::ALL
            .into_iter()
            .find(|currency| currency.code().eq_ignore_ascii_case(code))
            .ok_or_else(|| UnknownCurrency(code.to_string()))
    }
}

impl TryFrom<String> for Currency {
    type Error = UnknownCurrency;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Currency> for String {
    fn from(value: Currency) -> Self {
        value.code().to_string()
    }
}
