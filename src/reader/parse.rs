//! @acp:module "Cell Parsing"
//! @acp:summary "Defensive numeric, weight and rating parsing for cell text"
//! @acp:domain scoring
//! @acp:layer logic
//!
//! Nothing in here fails: text that cannot be understood reads as zero
//! (or as an absent rating).

use serde::{Deserialize, Serialize};

/// Parse numeric cell text, keeping only digits, `.` and `-`
///
/// Empty, unparsable or non-finite text resolves to `0.0`.
pub fn parse_number(text: &str) -> f64 {
    let cleaned: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();
    match cleaned.parse::<f64>() {
        Ok(value) if value.is_finite() => value,
        _ => 0.0,
    }
}

/// Parse an assessment weight into a fraction
///
/// `"30%"` reads as 0.30. Bare numbers above 1 are taken as percentages
/// (`"30"` -> 0.30), numbers at or below 1 as fractions (`"0.3"` -> 0.30).
/// `"1"` therefore means 100%, never 1%.
pub fn parse_weight(text: &str) -> f64 {
    let trimmed = text.trim();
    let value = parse_number(trimmed);
    if trimmed.ends_with('%') || value > 1.0 {
        value / 100.0
    } else {
        value
    }
}

/// Parse a count field; `None` when the text is not a whole number
pub fn parse_count(text: &str) -> Option<usize> {
    let trimmed = text.trim();
    if let Ok(count) = trimmed.parse::<usize>() {
        return Some(count);
    }
    // Spreadsheet imports sometimes hand over "4.0"
    let value = trimmed.parse::<f64>().ok()?;
    if value.is_finite() && value >= 0.0 && value.fract() == 0.0 {
        Some(value as usize)
    } else {
        None
    }
}

/// @acp:summary "Support strength of an indicator for one goal"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Rating {
    High,
    Medium,
    Low,
    #[default]
    Absent,
}

impl Rating {
    /// Classify a rating token by its first character, case-insensitively
    pub fn from_token(token: &str) -> Self {
        match token.trim().chars().next().map(|c| c.to_ascii_uppercase()) {
            Some('H') => Rating::High,
            Some('M') => Rating::Medium,
            Some('L') => Rating::Low,
            _ => Rating::Absent,
        }
    }

    pub fn value(self) -> f64 {
        match self {
            Rating::High => 3.0,
            Rating::Medium => 2.0,
            Rating::Low => 1.0,
            Rating::Absent => 0.0,
        }
    }

    pub fn is_present(self) -> bool {
        self != Rating::Absent
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Rating::High => "H",
            Rating::Medium => "M",
            Rating::Low => "L",
            Rating::Absent => "",
        }
    }
}
