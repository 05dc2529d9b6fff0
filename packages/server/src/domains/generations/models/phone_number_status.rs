use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domains::scraping::models::leading_integer;

/// Scraper account state keyed by the phone number it logs in with.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PhoneNumberStatus {
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub latest_error: Option<Value>,
    #[serde(default)]
    pub remaining_credits: Option<Value>,
}

impl PhoneNumberStatus {
    pub fn has_error(&self) -> bool {
        !matches!(self.latest_error, None | Some(Value::Null))
    }

    /// Remaining credits as an integer; text is read up to its first non-digit.
    pub fn credits(&self) -> Option<i64> {
        match self.remaining_credits.as_ref()? {
            Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
            Value::String(s) => leading_integer(s),
            _ => None,
        }
    }

    /// Usable when error-free and holding strictly more than `minimum` credits.
    pub fn has_credits_above(&self, minimum: i64) -> bool {
        self.credits().is_some_and(|credits| credits > minimum)
    }
}
