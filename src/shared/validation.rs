use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Regex for ISO 3166-1 alpha-2 codes
    /// - Valid: "PE", "US"
    /// - Invalid: "pe", "PER", "P1"
    pub static ref ISO2_REGEX: Regex = Regex::new(r"^[A-Z]{2}$").unwrap();

    /// Regex for ISO 3166-1 alpha-3 codes
    pub static ref ISO3_REGEX: Regex = Regex::new(r"^[A-Z]{3}$").unwrap();

    /// Regex for coordinates stored as decimal strings
    /// - Valid: "-12.04318", "77", "0.5"
    /// - Invalid: "12,5", "north", "1234.5", ".5"
    pub static ref COORDINATE_REGEX: Regex = Regex::new(r"^-?\d{1,3}(\.\d+)?$").unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_iso_regexes() {
        assert!(ISO2_REGEX.is_match("PE"));
        assert!(!ISO2_REGEX.is_match("pe")); // lowercase
        assert!(!ISO2_REGEX.is_match("PER"));
        assert!(ISO3_REGEX.is_match("PER"));
        assert!(!ISO3_REGEX.is_match("PE"));
        assert!(!ISO3_REGEX.is_match("P3R"));
    }

    #[test]
    fn test_coordinate_regex() {
        assert!(COORDINATE_REGEX.is_match("-12.04318"));
        assert!(COORDINATE_REGEX.is_match("77"));
        assert!(COORDINATE_REGEX.is_match("0.5"));
        assert!(!COORDINATE_REGEX.is_match("12,5"));
        assert!(!COORDINATE_REGEX.is_match("north"));
        assert!(!COORDINATE_REGEX.is_match("1234.5"));
        assert!(!COORDINATE_REGEX.is_match(".5"));
        assert!(!COORDINATE_REGEX.is_match(""));
    }
}
