//! Currency conversion for displayed prices.
//!
//! All conversion goes through a fixed USD pivot table of approximate
//! rates. The functions are total over the currency enums: an unlisted
//! currency is a type-level impossibility, not a runtime check.

use serde::{Deserialize, Serialize};

/// Currencies we can parse from content (e.g. ticket price strings).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SourceCurrency {
    USD,
    EUR,
    GBP,
    AUD,
    CAD,
    JPY,
    SGD,
    MXN,
    BRL,
}

/// Display currencies supported on the itinerary page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DisplayCurrency {
    USD,
    EUR,
    GBP,
    AUD,
    CAD,
    JPY,
    SGD,
}

impl DisplayCurrency {
    /// All supported display currencies, in UI order.
    pub const ALL: [DisplayCurrency; 7] = [
        DisplayCurrency::USD,
        DisplayCurrency::EUR,
        DisplayCurrency::GBP,
        DisplayCurrency::AUD,
        DisplayCurrency::CAD,
        DisplayCurrency::JPY,
        DisplayCurrency::SGD,
    ];

    fn as_source(self) -> SourceCurrency {
        match self {
            DisplayCurrency::USD => SourceCurrency::USD,
            DisplayCurrency::EUR => SourceCurrency::EUR,
            DisplayCurrency::GBP => SourceCurrency::GBP,
            DisplayCurrency::AUD => SourceCurrency::AUD,
            DisplayCurrency::CAD => SourceCurrency::CAD,
            DisplayCurrency::JPY => SourceCurrency::JPY,
            DisplayCurrency::SGD => SourceCurrency::SGD,
        }
    }
}

/// Approximate rate to USD (1 unit of source = rate USD).
pub fn to_usd_rate(currency: SourceCurrency) -> f64 {
    match currency {
        SourceCurrency::USD => 1.0,
        SourceCurrency::EUR => 1.08,
        SourceCurrency::GBP => 1.27,
        SourceCurrency::AUD => 0.65,
        SourceCurrency::CAD => 0.72,
        SourceCurrency::JPY => 0.0067,
        SourceCurrency::SGD => 0.74,
        SourceCurrency::MXN => 0.058,
        SourceCurrency::BRL => 0.17,
    }
}

/// Convert from source currency to display currency via the USD pivot.
pub fn convert_to_display(value: f64, from: SourceCurrency, to: DisplayCurrency) -> f64 {
    let usd = value * to_usd_rate(from);
    match to {
        DisplayCurrency::USD => usd,
        other => usd / to_usd_rate(other.as_source()),
    }
}

/// Format a value in the given display currency: symbol or code
/// prefix, rounded to the nearest whole unit, thousands separators.
pub fn format_in_currency(value: f64, currency: DisplayCurrency) -> String {
    let amount = group_thousands(value.round() as i64);
    match currency {
        DisplayCurrency::JPY => format!("\u{a5}{amount}"),
        DisplayCurrency::GBP => format!("\u{a3}{amount}"),
        DisplayCurrency::EUR => format!("\u{20ac}{amount}"),
        DisplayCurrency::AUD => format!("AUD {amount}"),
        DisplayCurrency::CAD => format!("CAD {amount}"),
        DisplayCurrency::SGD => format!("SGD {amount}"),
        DisplayCurrency::USD => format!("${amount}"),
    }
}

/// Insert `,` thousands separators into an integer amount.
fn group_thousands(n: i64) -> String {
    let negative = n < 0;
    let digits = n.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    if negative {
        format!("-{grouped}")
    } else {
        grouped
    }
}
