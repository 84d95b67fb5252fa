//! Canonical card validation: brand detection, Luhn checksum and the
//! format rules shared by the field-level engine and the payload
//! validators. Both entry points call into this module so the checksum
//! logic exists exactly once.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardBrand {
    Visa,
    Mastercard,
    Amex,
    Discover,
    Diners,
    Jcb,
    UnionPay,
}

impl CardBrand {
    /// Digit counts accepted for cards of this brand.
    pub fn valid_lengths(&self) -> &'static [usize] {
        match self {
            CardBrand::Visa => &[13, 16, 19],
            CardBrand::Mastercard => &[16],
            CardBrand::Amex => &[15],
            CardBrand::Discover => &[16, 19],
            CardBrand::Diners => &[14, 16, 19],
            CardBrand::Jcb => &[16, 17, 18, 19],
            CardBrand::UnionPay => &[16, 17, 18, 19],
        }
    }
}

impl fmt::Display for CardBrand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CardBrand::Visa => "Visa",
            CardBrand::Mastercard => "Mastercard",
            CardBrand::Amex => "American Express",
            CardBrand::Discover => "Discover",
            CardBrand::Diners => "Diners Club",
            CardBrand::Jcb => "JCB",
            CardBrand::UnionPay => "UnionPay",
        };
        f.write_str(name)
    }
}

/// Strip the spaces a masked input leaves behind.
pub fn sanitize(raw: &str) -> String {
    raw.chars().filter(|c| !c.is_whitespace()).collect()
}

fn prefix_value(digits: &str, len: usize) -> Option<u32> {
    digits.get(..len)?.parse().ok()
}

/// Detect the card brand from the leading digits.
pub fn detect_brand(digits: &str) -> Option<CardBrand> {
    let p2 = prefix_value(digits, 2);
    let p3 = prefix_value(digits, 3);
    let p4 = prefix_value(digits, 4);

    if digits.starts_with('4') {
        return Some(CardBrand::Visa);
    }
    if matches!(p2, Some(51..=55)) || matches!(p4, Some(2221..=2720)) {
        return Some(CardBrand::Mastercard);
    }
    if matches!(p2, Some(34) | Some(37)) {
        return Some(CardBrand::Amex);
    }
    if digits.starts_with("6011") || matches!(p2, Some(65)) || matches!(p3, Some(644..=649)) {
        return Some(CardBrand::Discover);
    }
    if matches!(p3, Some(300..=305)) || matches!(p2, Some(36) | Some(38)) {
        return Some(CardBrand::Diners);
    }
    if matches!(p4, Some(3528..=3589)) {
        return Some(CardBrand::Jcb);
    }
    if matches!(p2, Some(62)) {
        return Some(CardBrand::UnionPay);
    }
    None
}

/// Luhn mod-10 checksum: double every second digit from the right,
/// subtract 9 when the doubled value exceeds 9, sum, valid iff sum % 10 == 0.
pub fn luhn_valid(digits: &str) -> bool {
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return false;
    }
    let sum: u32 = digits
        .chars()
        .rev()
        .enumerate()
        .map(|(i, c)| {
            let d = c.to_digit(10).unwrap_or(0);
            if i % 2 == 1 {
                let doubled = d * 2;
                if doubled > 9 {
                    doubled - 9
                } else {
                    doubled
                }
            } else {
                d
            }
        })
        .sum();
    sum % 10 == 0
}

/// Brand-aware card number check used by the field-level engine.
///
/// Unrecognized prefixes fall back to a generic 13-19 digit length check;
/// the Luhn checksum always applies.
pub fn check_card_number(raw: &str) -> Option<String> {
    let digits = sanitize(raw);
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Some("Card number must contain only digits".to_string());
    }
    match detect_brand(&digits) {
        Some(brand) => {
            if !brand.valid_lengths().contains(&digits.len()) {
                return Some(format!("Invalid card number length for {brand}"));
            }
        }
        None => {
            if !(13..=19).contains(&digits.len()) {
                return Some("Card number must be 13 to 19 digits".to_string());
            }
        }
    }
    if !luhn_valid(&digits) {
        return Some("Invalid card number".to_string());
    }
    None
}

/// Format-only check used by the payload-level rule: digits, plausible
/// length, Luhn. No brand gate, so any checksum-valid number passes.
pub fn check_card_number_format(raw: &str) -> Option<String> {
    let digits = sanitize(raw);
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Some("Card number must contain only digits".to_string());
    }
    if !(13..=19).contains(&digits.len()) {
        return Some("Card number must be 13 to 19 digits".to_string());
    }
    if !luhn_valid(&digits) {
        return Some("Invalid card number".to_string());
    }
    None
}

/// Parse `MM/YY` into (month, four-digit year). Format check only.
pub fn parse_expiry(raw: &str) -> Option<(u32, i32)> {
    let (month_str, year_str) = raw.split_once('/')?;
    if month_str.len() != 2 || year_str.len() != 2 {
        return None;
    }
    let month: u32 = month_str.parse().ok()?;
    let year: i32 = year_str.parse().ok()?;
    if !(1..=12).contains(&month) {
        return None;
    }
    Some((month, 2000 + year))
}

pub fn check_cvv(raw: &str) -> Option<String> {
    let value = raw.trim();
    if !value.chars().all(|c| c.is_ascii_digit()) || !(value.len() == 3 || value.len() == 4) {
        return Some("CVV must be 3 or 4 digits".to_string());
    }
    None
}

pub fn check_cardholder(raw: &str) -> Option<String> {
    let value = raw.trim();
    if value.chars().count() < 2 {
        return Some("Cardholder name must be at least 2 characters".to_string());
    }
    let allowed = value
        .chars()
        .all(|c| c.is_alphabetic() || c == ' ' || c == '-' || c == '\'');
    if !allowed {
        return Some("Cardholder name contains invalid characters".to_string());
    }
    None
}

pub fn check_upi_id(raw: &str) -> Option<String> {
    let value = raw.trim();
    let valid = match value.split_once('@') {
        Some((local, bank)) => {
            !local.is_empty()
                && local
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '_' || c == '-')
                && bank.len() >= 2
                && bank.chars().all(|c| c.is_ascii_alphabetic())
        }
        None => false,
    };
    if !valid {
        return Some("Enter a valid UPI ID, like name@bank".to_string());
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn luhn_accepts_known_test_numbers() {
        for number in [
            "4111111111111111", // Visa
            "5555555555554444", // Mastercard
            "378282246310005",  // Amex
            "6011111111111117", // Discover
            "3530111333300000", // JCB
        ] {
            assert!(luhn_valid(number), "{number} should pass Luhn");
        }
    }

    #[test]
    fn luhn_rejects_single_digit_flips() {
        let valid = "4111111111111111";
        for pos in 0..valid.len() {
            let mut flipped: Vec<u8> = valid.bytes().collect();
            flipped[pos] = if flipped[pos] == b'9' {
                b'8'
            } else {
                flipped[pos] + 1
            };
            let flipped = String::from_utf8(flipped).unwrap();
            assert!(!luhn_valid(&flipped), "{flipped} should fail Luhn");
        }
    }

    #[test]
    fn brand_detection() {
        assert_eq!(detect_brand("4111111111111111"), Some(CardBrand::Visa));
        assert_eq!(detect_brand("5555555555554444"), Some(CardBrand::Mastercard));
        assert_eq!(detect_brand("2221000000000009"), Some(CardBrand::Mastercard));
        assert_eq!(detect_brand("378282246310005"), Some(CardBrand::Amex));
        assert_eq!(detect_brand("6011111111111117"), Some(CardBrand::Discover));
        assert_eq!(detect_brand("30569309025904"), Some(CardBrand::Diners));
        assert_eq!(detect_brand("3530111333300000"), Some(CardBrand::Jcb));
        assert_eq!(detect_brand("6200000000000005"), Some(CardBrand::UnionPay));
        assert_eq!(detect_brand("9999999999999999"), None);
    }

    #[test]
    fn brand_length_gate() {
        // Valid Luhn but wrong length for Mastercard (15 digits).
        let err = check_card_number("555555555555443").unwrap();
        assert!(err.contains("Mastercard"));
        // Amex at its own length is fine.
        assert!(check_card_number("378282246310005").is_none());
    }

    #[test]
    fn card_number_with_spaces_is_sanitized() {
        assert!(check_card_number("4111 1111 1111 1111").is_none());
        assert!(check_card_number_format("4111 1111 1111 1111").is_none());
    }

    #[test]
    fn non_digit_card_number_rejected() {
        assert!(check_card_number("4111-1111-1111-1111").is_some());
        assert!(check_card_number("abcd").is_some());
        assert!(check_card_number("").is_some());
    }

    #[test]
    fn expiry_parsing() {
        assert_eq!(parse_expiry("01/25"), Some((1, 2025)));
        assert_eq!(parse_expiry("12/30"), Some((12, 2030)));
        assert_eq!(parse_expiry("13/25"), None);
        assert_eq!(parse_expiry("00/25"), None);
        assert_eq!(parse_expiry("1/25"), None);
        assert_eq!(parse_expiry("0125"), None);
        assert_eq!(parse_expiry("aa/bb"), None);
    }

    #[test]
    fn cvv_rules() {
        assert!(check_cvv("123").is_none());
        assert!(check_cvv("1234").is_none());
        assert!(check_cvv("12").is_some());
        assert!(check_cvv("12345").is_some());
        assert!(check_cvv("12a").is_some());
    }

    #[test]
    fn cardholder_rules() {
        assert!(check_cardholder("Jo").is_none());
        assert!(check_cardholder("Mary-Jane O'Neill").is_none());
        assert!(check_cardholder("J").is_some());
        assert!(check_cardholder("Robert;DROP").is_some());
    }

    #[test]
    fn upi_rules() {
        assert!(check_upi_id("alice@okhdfc").is_none());
        assert!(check_upi_id("a.b-c_d@ybl").is_none());
        assert!(check_upi_id("alice").is_some());
        assert!(check_upi_id("@bank").is_some());
        assert!(check_upi_id("alice@b2").is_some());
    }
}
