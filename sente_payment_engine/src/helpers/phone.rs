use std::sync::OnceLock;

use regex::Regex;

static MSISDN_RE: OnceLock<Regex> = OnceLock::new();

/// Normalizes a phone number to E.164 form (interior whitespace stripped), or `None` when it is
/// not a plausible MSISDN.
pub fn normalize_msisdn(raw: &str) -> Option<String> {
    let candidate: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
    let re = MSISDN_RE.get_or_init(|| Regex::new(r"^\+[1-9]\d{7,14}$").expect("MSISDN regex is valid"));
    re.is_match(&candidate).then_some(candidate)
}

#[cfg(test)]
mod test {
    use super::normalize_msisdn;

    #[test]
    fn accepts_international_numbers() {
        assert_eq!(normalize_msisdn("+22912345678").as_deref(), Some("+22912345678"));
        assert_eq!(normalize_msisdn("+229 12 34 56 78").as_deref(), Some("+22912345678"));
    }

    #[test]
    fn rejects_implausible_numbers() {
        assert!(normalize_msisdn("").is_none());
        assert!(normalize_msisdn("12345678").is_none());
        assert!(normalize_msisdn("+0123456789").is_none());
        assert!(normalize_msisdn("+229-12-34-56-78").is_none());
        assert!(normalize_msisdn("+2291234").is_none());
    }
}
