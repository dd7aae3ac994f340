//! Field format predicates shared by the section models and the CLI forms.
//!
//! Every function is pure and total: it inspects the raw string exactly as
//! entered (no trimming, no case folding). The `is_*` predicates answer
//! with a boolean.

use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

static ACCOUNT_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{9,18}$").expect("account number pattern"));
static ROUTING_CODE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z]{4}0[A-Z0-9]{6}$").expect("routing code pattern"));
static NATIONAL_TAX_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z]{5}[0-9]{4}[A-Z]{1}$").expect("national tax id pattern"));
static YEAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]{4}$").expect("year pattern"));

/// Bank account numbers are 9 to 18 ASCII digits.
pub fn is_valid_account_number(value: &str) -> bool {
    ACCOUNT_NUMBER.is_match(value)
}

/// Routing codes are four capital letters, a literal `0`, then six
/// capital letters or digits (e.g. `HDFC0001234`).
pub fn is_valid_routing_code(value: &str) -> bool {
    ROUTING_CODE.is_match(value)
}

/// National tax ids are five capital letters, four digits, one capital letter.
pub fn is_valid_national_tax_id(value: &str) -> bool {
    NATIONAL_TAX_ID.is_match(value)
}

/// Absolute URL with a scheme and a non-empty host.
pub fn is_valid_url(value: &str) -> bool {
    value.trim() == value && parse_absolute_url(value).is_some()
}

/// Parses `value` as an absolute URL that names a host.
pub fn parse_absolute_url(value: &str) -> Option<Url> {
    Url::parse(value)
        .ok()
        .filter(|url| url.host_str().is_some_and(|host| !host.is_empty()))
}

pub fn is_valid_year(value: &str) -> bool {
    YEAR.is_match(value)
}

/// True when the trimmed value has at least `min` characters.
pub fn has_min_chars(value: &str, min: usize) -> bool {
    value.trim().chars().count() >= min
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn account_number_length_bounds() {
        assert!(!is_valid_account_number("12345"));
        assert!(!is_valid_account_number("12345678"));
        assert!(is_valid_account_number("123456789"));
        assert!(is_valid_account_number("123456789012345678"));
        assert!(!is_valid_account_number("1234567890123456789"));
    }

    #[test]
    fn account_number_rejects_non_digits() {
        assert!(!is_valid_account_number("12345678a"));
        assert!(!is_valid_account_number(" 123456789"));
        assert!(!is_valid_account_number("１２３４５６７８９"));
        assert!(!is_valid_account_number(""));
    }

    #[test]
    fn routing_code_examples() {
        assert!(is_valid_routing_code("HDFC0001234"));
        assert!(is_valid_routing_code("SBIN0ABC123"));
        assert!(!is_valid_routing_code("HDFC1001234"));
        assert!(!is_valid_routing_code("hdfc0001234"));
        assert!(!is_valid_routing_code("HDF00001234"));
        assert!(!is_valid_routing_code("HDFC00012345"));
    }

    #[test]
    fn national_tax_id_examples() {
        assert!(is_valid_national_tax_id("ABCDE1234F"));
        assert!(!is_valid_national_tax_id("ABCD1234F"));
        assert!(!is_valid_national_tax_id("abcde1234f"));
        assert!(!is_valid_national_tax_id("ABCDE12345"));
    }

    #[test]
    fn url_requires_scheme_and_host() {
        assert!(is_valid_url("https://instagram.com/creator"));
        assert!(is_valid_url("http://example.com"));
        assert!(!is_valid_url("instagram.com/creator"));
        assert!(!is_valid_url("https://"));
        assert!(!is_valid_url("not a url"));
        assert!(!is_valid_url("mailto:asha@example.com"));
        assert!(!is_valid_url(" https://instagram.com/creator"));
    }

    #[test]
    fn url_accepts_userinfo_ports_and_ip_hosts() {
        assert!(is_valid_url("https://asha@instagram.com/asha.creates"));
        assert!(is_valid_url("http://localhost:8080/profile"));
        assert!(is_valid_url("https://192.168.1.10/creator"));
        assert!(is_valid_url("HTTPS://Instagram.com/Creator"));
    }

    #[test]
    fn min_chars_ignores_surrounding_whitespace() {
        assert!(has_min_chars("Al", 2));
        assert!(!has_min_chars("  A  ", 2));
        assert!(has_min_chars("Zoë", 3));
    }
}
