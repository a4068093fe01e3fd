//! Input validation rules for account and contact fields.

use std::sync::LazyLock;

use regex::Regex;

/// Minimum accepted password length.
pub const MIN_PASSWORD_LEN: usize = 8;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid")
});

/// Returns true for `local@domain.tld` shaped addresses.
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Returns true when the password has at least eight characters including an
/// uppercase letter, a lowercase letter and a digit.
pub fn is_valid_password(password: &str) -> bool {
    password.chars().count() >= MIN_PASSWORD_LEN
        && password.chars().any(|c| c.is_ascii_uppercase())
        && password.chars().any(|c| c.is_ascii_lowercase())
        && password.chars().any(|c| c.is_ascii_digit())
}

/// Returns true for phone numbers with 10 to 15 digits and an optional
/// leading `+`. Spaces, dashes, dots and parentheses are ignored.
pub fn is_valid_phone(phone: &str) -> bool {
    let trimmed = phone.trim();
    let body = trimmed.strip_prefix('+').unwrap_or(trimmed);

    let mut digits = 0usize;
    for c in body.chars() {
        match c {
            '0'..='9' => digits += 1,
            ' ' | '-' | '.' | '(' | ')' => {}
            _ => return false,
        }
    }

    (10..=15).contains(&digits)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_rules() {
        assert!(is_valid_password("Abc12345"));
        assert!(!is_valid_password("abc"));
        assert!(!is_valid_password("abcdefgh1"));
        assert!(!is_valid_password("ABCDEFGH1"));
        assert!(!is_valid_password("Abcdefghi"));
        assert!(!is_valid_password("Ab1"));
    }

    #[test]
    fn email_rules() {
        assert!(is_valid_email("tenant@example.com"));
        assert!(is_valid_email("first.last+tag@mail.example.co"));
        assert!(!is_valid_email("tenant@example"));
        assert!(!is_valid_email("tenant example@mail.com"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email(""));
    }

    #[test]
    fn phone_rules() {
        assert!(is_valid_phone("+1 (555) 123-4567"));
        assert!(is_valid_phone("5551234567"));
        assert!(!is_valid_phone("555-1234"));
        assert!(!is_valid_phone("+1 555 CALL NOW"));
        assert!(!is_valid_phone("1234567890123456"));
    }
}
