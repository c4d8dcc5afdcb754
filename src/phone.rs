//! Phone number entry and validation.
//!
//! Two input styles exist: the local form (nine digits after the fixed `+994`
//! country code, used by login, the appointment form and the profile) and a
//! full international number (signup, contacts, public booking).

/// Country code prefixed to local-form numbers.
pub const LOCAL_COUNTRY_CODE: &str = "+994";

/// Digits in a complete local-form number.
pub const LOCAL_DIGITS: usize = 9;

/// Keeps at most nine digits of whatever was typed.
pub fn local_digits(input: &str) -> String {
    input
        .chars()
        .filter(char::is_ascii_digit)
        .take(LOCAL_DIGITS)
        .collect()
}

pub fn is_complete_local(digits: &str) -> bool {
    digits.len() == LOCAL_DIGITS && digits.chars().all(|c| c.is_ascii_digit())
}

/// `+994` followed by the local digits.
pub fn to_international(digits: &str) -> String {
    format!("{LOCAL_COUNTRY_CODE}{}", local_digits(digits))
}

/// Local digits of a stored number, dropping a leading `994` country code.
pub fn from_international(phone: &str) -> String {
    let digits: String = phone.chars().filter(char::is_ascii_digit).collect();
    let national = digits.strip_prefix("994").unwrap_or(&digits);
    local_digits(national)
}

/// Whether `phone` looks like an E.164 number: `+`, a non-zero country digit
/// and 8 to 15 digits in total.
pub fn is_valid_international(phone: &str) -> bool {
    let Some(rest) = phone.trim().strip_prefix('+') else {
        return false;
    };
    let digits: String = rest
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '(' | ')'))
        .collect();
    if !digits.chars().all(|c| c.is_ascii_digit()) {
        return false;
    }
    if digits.starts_with('0') {
        return false;
    }
    if digits.starts_with("994") {
        return digits.len() == 3 + LOCAL_DIGITS;
    }
    (8..=15).contains(&digits.len())
}

/// Canonical `+<digits>` form of a valid international number.
pub fn normalize_international(phone: &str) -> Option<String> {
    if !is_valid_international(phone) {
        return None;
    }
    let digits: String = phone.chars().filter(char::is_ascii_digit).collect();
    Some(format!("+{digits}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_digits_strip_formatting_and_cap_length() {
        assert_eq!(local_digits("(50) 123 45 67"), "501234567");
        assert_eq!(local_digits("5012345678999"), "501234567");
        assert!(is_complete_local("501234567"));
        assert!(!is_complete_local("50123456"));
    }

    #[test]
    fn local_and_international_forms_convert() {
        assert_eq!(to_international("50 123 45 67"), "+994501234567");
        assert_eq!(from_international("+994 50 123 45 67"), "501234567");
        assert_eq!(from_international("501234567"), "501234567");
        assert_eq!(from_international(""), "");
    }

    #[test]
    fn international_validation() {
        assert!(is_valid_international("+994501234567"));
        assert!(is_valid_international("+1 (415) 555-2671"));
        assert!(is_valid_international("+447911123456"));
        assert!(!is_valid_international("+99450123456"));
        assert!(!is_valid_international("994501234567"));
        assert!(!is_valid_international("+0501234567"));
        assert!(!is_valid_international("+12345"));
        assert!(!is_valid_international("+99450abc4567"));
        assert!(!is_valid_international(""));
    }

    #[test]
    fn normalization_drops_separators() {
        assert_eq!(normalize_international("+1 415-555-2671").as_deref(), Some("+14155552671"));
        assert_eq!(normalize_international("12"), None);
    }
}
