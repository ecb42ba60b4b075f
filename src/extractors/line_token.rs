// src/extractors/line_token.rs

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::fmt;

// --- Regex Patterns (Lazy Static) ---
// All patterns are anchored: a line is classified only when the whole line matches.
static AMOUNT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^-?\$?[\d,]+\.\d{2}$").expect("Failed to compile AMOUNT_RE")
});

static MONTH_DAY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(Jan|Feb|Mar|Apr|May|Jun|Jul|Aug|Sep|Oct|Nov|Dec)\s+\d{1,2}$")
        .expect("Failed to compile MONTH_DAY_RE")
});

static ID_NUMBER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d{10,}$").expect("Failed to compile ID_NUMBER_RE")
});

/// Structural type of one statement line (or one merged text run).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LineToken {
    Date,
    Amount,
    IdNumber,
    ThankYou,
    Text,
}

impl fmt::Display for LineToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LineToken::Date => "DATE",
            LineToken::Amount => "AMOUNT",
            LineToken::IdNumber => "ID_NUMBER",
            LineToken::ThankYou => "THANK_YOU",
            LineToken::Text => "TEXT",
        };
        f.write_str(name)
    }
}

/// Classifies a single trimmed line. First matching rule wins:
/// amount, month-day date, long digit run, payment/thank-you noise, free text.
pub fn classify_line(line: &str) -> LineToken {
    if AMOUNT_RE.is_match(line) {
        return LineToken::Amount;
    }
    if MONTH_DAY_RE.is_match(line) {
        return LineToken::Date;
    }
    if ID_NUMBER_RE.is_match(line) {
        return LineToken::IdNumber;
    }

    let lowered = line.to_lowercase();
    if lowered.contains("thank") || lowered.contains("payment") {
        return LineToken::ThankYou;
    }

    LineToken::Text
}

/// Returns true when the whole line is a month abbreviation followed by a day number.
pub fn is_month_day(line: &str) -> bool {
    MONTH_DAY_RE.is_match(line)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_amount_lines() {
        assert_eq!(classify_line("-$1,234.56"), LineToken::Amount);
        assert_eq!(classify_line("45.00"), LineToken::Amount);
        assert_eq!(classify_line("$0.99"), LineToken::Amount);
        // Needs exactly two fraction digits
        assert_eq!(classify_line("45.0"), LineToken::Text);
        assert_eq!(classify_line("45.000"), LineToken::Text);
        assert_eq!(classify_line("Total 45.00"), LineToken::Text);
    }

    #[test]
    fn test_date_lines() {
        assert_eq!(classify_line("Jan 5"), LineToken::Date);
        assert_eq!(classify_line("dec 31"), LineToken::Date);
        assert_eq!(classify_line("SEP  9"), LineToken::Date);
        assert_eq!(classify_line("Jan 123"), LineToken::Text);
        assert_eq!(classify_line("January 5"), LineToken::Text);
        assert_eq!(classify_line("Jan 5 to Feb 3, 2024"), LineToken::Text);
    }

    #[test]
    fn test_id_number_lines() {
        assert_eq!(classify_line("1234567890"), LineToken::IdNumber);
        assert_eq!(classify_line("55123456789012345"), LineToken::IdNumber);
        assert_eq!(classify_line("123456789"), LineToken::Text);
    }

    #[test]
    fn test_thank_you_lines() {
        assert_eq!(classify_line("PAYMENT - THANK YOU"), LineToken::ThankYou);
        assert_eq!(classify_line("Automatic Payment Received"), LineToken::ThankYou);
        assert_eq!(classify_line("Thanks for shopping"), LineToken::ThankYou);
    }

    #[test]
    fn test_priority_order() {
        // An amount is never reclassified as payment noise, text falls through last
        assert_eq!(classify_line("100.00"), LineToken::Amount);
        assert_eq!(classify_line("WALMART #1234"), LineToken::Text);
    }

    #[test]
    fn test_display_names() {
        assert_eq!(LineToken::IdNumber.to_string(), "ID_NUMBER");
        assert_eq!(LineToken::ThankYou.to_string(), "THANK_YOU");
    }
}
