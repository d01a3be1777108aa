//! Format checks for free-text store fields.
//!
//! Pure predicates the host runs before submitting a record; the storage
//! layer itself accepts any text in these optional fields.

use std::sync::LazyLock;

use regex::Regex;

static CONTACT_NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[0-9\s()-]{7,15}$").expect("contact number pattern"));

static STORE_HOURS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d{1,2}(:\d{2})?\s*([AP]M)?\s*-\s*\d{1,2}(:\d{2})?\s*([AP]M)?$")
        .expect("store hours pattern")
});

/// International-style phone number: optional leading `+`, then 7 to 15
/// digits with space, parenthesis, or hyphen separators.
pub fn contact_number_valid(contact: &str) -> bool {
    CONTACT_NUMBER_RE.is_match(contact)
}

/// Opening-hours range such as "9 AM - 10 PM" or "09:00-22:00".
pub fn store_hours_valid(hours: &str) -> bool {
    STORE_HOURS_RE.is_match(hours)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_common_phone_formats() {
        assert!(contact_number_valid("+971 4 123 4567"));
        assert!(contact_number_valid("(04) 123-4567"));
        assert!(contact_number_valid("0412345"));
    }

    #[test]
    fn rejects_malformed_phone_numbers() {
        assert!(!contact_number_valid("12345"));
        assert!(!contact_number_valid("call the shop"));
        assert!(!contact_number_valid("+9714123456789012345"));
    }

    #[test]
    fn accepts_hour_ranges() {
        assert!(store_hours_valid("9 AM - 10 PM"));
        assert!(store_hours_valid("09:00-22:00"));
        assert!(store_hours_valid("7AM-11PM"));
    }

    #[test]
    fn rejects_malformed_hours() {
        assert!(!store_hours_valid("open late"));
        assert!(!store_hours_valid("9 AM"));
        assert!(!store_hours_valid("9 am - 10 pm"));
    }
}
