use std::sync::LazyLock;

use chrono::{NaiveDate, NaiveDateTime};
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

static NON_DIGITS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\D").unwrap());

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Client {
    pub id: Uuid,
    pub name: String,
    pub age: Option<u32>,
    pub birth_date: Option<NaiveDate>,
    pub phone: String,
    pub email: Option<String>,
    pub notes: String,
    pub created_at: NaiveDateTime,
}

impl Client {
    /// WhatsApp dialing form of the stored phone number:
    /// country prefix 972, one leading local zero stripped.
    /// Idempotent for numbers that already carry the prefix.
    pub fn whatsapp_number(&self) -> String {
        whatsapp_number(&self.phone)
    }
}

/// Normalize a phone number to digits only. Applied on every save.
pub fn normalize_phone(raw: &str) -> String {
    NON_DIGITS.replace_all(raw, "").into_owned()
}

/// Derive the WhatsApp dialing form from a digits-only phone number.
pub fn whatsapp_number(phone: &str) -> String {
    let digits = normalize_phone(phone);
    if digits.starts_with("972") {
        return digits;
    }
    let local = digits.strip_prefix('0').unwrap_or(&digits);
    format!("972{local}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phone_normalizes_to_digits() {
        assert_eq!(normalize_phone("050-123-4567"), "0501234567");
        assert_eq!(normalize_phone("+972 50 123 4567"), "972501234567");
        assert_eq!(normalize_phone("0501234567"), "0501234567");
    }

    #[test]
    fn whatsapp_strips_leading_zero_and_prefixes() {
        assert_eq!(whatsapp_number("0501234567"), "972501234567");
    }

    #[test]
    fn whatsapp_idempotent_on_prefixed_numbers() {
        let once = whatsapp_number("0501234567");
        assert_eq!(whatsapp_number(&once), once);
        assert_eq!(whatsapp_number("9721234567"), "9721234567");
    }

    #[test]
    fn whatsapp_handles_punctuated_input() {
        assert_eq!(whatsapp_number("050-123-4567"), "972501234567");
    }
}
