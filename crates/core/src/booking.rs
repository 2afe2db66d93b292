//! User-entered booking confirmations.
//!
//! Bookings are owned and persisted by an external collaborator; this
//! crate only classifies them by type for display grouping and
//! validates the add-booking form input, returning a single
//! user-facing message per submit.

use serde::{Deserialize, Serialize};
use url::Url;

const PROVIDER_MAX: usize = 100;
const CONFIRMATION_REF_MAX: usize = 100;
const NOTES_MAX: usize = 500;

/// What a booking confirms, matching the itinerary sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingType {
    Flight,
    Stay,
    Ticket,
    Activity,
}

impl BookingType {
    pub fn as_str(self) -> &'static str {
        match self {
            BookingType::Flight => "flight",
            BookingType::Stay => "stay",
            BookingType::Ticket => "ticket",
            BookingType::Activity => "activity",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "flight" => Some(BookingType::Flight),
            "stay" => Some(BookingType::Stay),
            "ticket" => Some(BookingType::Ticket),
            "activity" => Some(BookingType::Activity),
            _ => None,
        }
    }
}

/// Raw form input for adding a booking to an itinerary.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingInput {
    pub booking_type: String,
    pub provider: String,
    pub confirmation_ref: String,
    pub details_url: Option<String>,
    pub notes: Option<String>,
}

/// Letters, numbers, spaces, and hyphens only.
fn is_valid_confirmation_ref(s: &str) -> bool {
    s.chars()
        .all(|c| c.is_ascii_alphanumeric() || c.is_whitespace() || c == '-')
}

fn is_valid_http_url(s: &str) -> bool {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return true;
    }
    match Url::parse(trimmed) {
        Ok(u) => u.scheme() == "http" || u.scheme() == "https",
        Err(_) => false,
    }
}

/// Validate booking input. Returns one user-facing error message, or
/// `None` when the input is acceptable.
pub fn validate_booking_input(input: &BookingInput) -> Option<&'static str> {
    if BookingType::parse(&input.booking_type).is_none() {
        return Some("Invalid booking type.");
    }
    let provider = input.provider.trim();
    let confirmation = input.confirmation_ref.trim();
    if provider.is_empty() || confirmation.is_empty() {
        return Some("Provider and confirmation number are required.");
    }
    if provider.len() > PROVIDER_MAX {
        return Some("Provider name is too long.");
    }
    if confirmation.len() > CONFIRMATION_REF_MAX {
        return Some("Confirmation number is too long.");
    }
    if !is_valid_confirmation_ref(confirmation) {
        return Some("Use only letters, numbers, and hyphens for the confirmation number.");
    }
    if let Some(details) = input.details_url.as_deref() {
        if !is_valid_http_url(details) {
            return Some("Please enter a valid link.");
        }
    }
    if let Some(notes) = input.notes.as_deref() {
        if notes.trim().len() > NOTES_MAX {
            return Some("Notes are too long.");
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input() -> BookingInput {
        BookingInput {
            booking_type: "flight".to_string(),
            provider: "British Airways".to_string(),
            confirmation_ref: "ABC-123".to_string(),
            details_url: None,
            notes: None,
        }
    }

    #[test]
    fn valid_input_passes() {
        assert_eq!(validate_booking_input(&input()), None);
    }

    #[test]
    fn unknown_type_rejected() {
        let mut i = input();
        i.booking_type = "cruise".to_string();
        assert_eq!(validate_booking_input(&i), Some("Invalid booking type."));
    }

    #[test]
    fn blank_provider_or_confirmation_rejected() {
        let mut i = input();
        i.provider = "   ".to_string();
        assert_eq!(
            validate_booking_input(&i),
            Some("Provider and confirmation number are required.")
        );
        let mut i = input();
        i.confirmation_ref = String::new();
        assert_eq!(
            validate_booking_input(&i),
            Some("Provider and confirmation number are required.")
        );
    }

    #[test]
    fn over_long_fields_rejected() {
        let mut i = input();
        i.provider = "p".repeat(101);
        assert_eq!(validate_booking_input(&i), Some("Provider name is too long."));
        let mut i = input();
        i.confirmation_ref = "1".repeat(101);
        assert_eq!(
            validate_booking_input(&i),
            Some("Confirmation number is too long.")
        );
        let mut i = input();
        i.notes = Some("n".repeat(501));
        assert_eq!(validate_booking_input(&i), Some("Notes are too long."));
    }

    #[test]
    fn confirmation_charset_enforced() {
        let mut i = input();
        i.confirmation_ref = "ABC_123!".to_string();
        assert_eq!(
            validate_booking_input(&i),
            Some("Use only letters, numbers, and hyphens for the confirmation number.")
        );
    }

    #[test]
    fn details_url_must_be_http() {
        let mut i = input();
        i.details_url = Some("ftp://example.com/file".to_string());
        assert_eq!(validate_booking_input(&i), Some("Please enter a valid link."));
        let mut i = input();
        i.details_url = Some("https://example.com/booking".to_string());
        assert_eq!(validate_booking_input(&i), None);
        let mut i = input();
        i.details_url = Some("   ".to_string());
        assert_eq!(validate_booking_input(&i), None);
    }

    #[test]
    fn booking_type_round_trips() {
        for t in [
            BookingType::Flight,
            BookingType::Stay,
            BookingType::Ticket,
            BookingType::Activity,
        ] {
            assert_eq!(BookingType::parse(t.as_str()), Some(t));
        }
        assert_eq!(BookingType::parse("other"), None);
    }
}
