//! Phone number utilities

use once_cell::sync::Lazy;
use regex::Regex;

// International phone number regex (E.164 format, 8 to 15 digits)
static INTERNATIONAL_PHONE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\+[1-9]\d{7,14}$").expect("valid E.164 regex")
});

// Separators people type between digit groups
const FORMATTING_CHARS: [char; 5] = [' ', '-', '(', ')', '.'];

/// Normalize a phone number by removing formatting characters
///
/// Anything else is kept, so letters and other symbols still fail
/// [`is_valid_international_phone`].
pub fn normalize_phone_number(phone: &str) -> String {
    phone
        .chars()
        .filter(|c| !FORMATTING_CHARS.contains(c))
        .collect()
}

/// Check if a phone number is valid (international E.164 format)
pub fn is_valid_international_phone(phone: &str) -> bool {
    let normalized = normalize_phone_number(phone);
    INTERNATIONAL_PHONE_REGEX.is_match(&normalized)
}

/// Mask a phone number for logs (e.g., +15****4567)
pub fn mask_phone_number(phone: &str) -> String {
    let chars: Vec<char> = normalize_phone_number(phone).chars().collect();
    if chars.len() >= 8 {
        format!(
            "{}****{}",
            chars[..3].iter().collect::<String>(),
            chars[chars.len() - 4..].iter().collect::<String>()
        )
    } else {
        "****".to_string()
    }
}
