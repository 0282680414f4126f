use regex::Regex;

/// First standalone whole number in 0..=100 found in the reviewer's text
pub fn find_score(text: &str) -> Option<u8> {
    let re = Regex::new(r"\b(100|[1-9]?[0-9])\b").ok()?;
    re.find(text)?.as_str().parse().ok()
}

/// Best-effort score, 0 when the text carries none
pub fn extract_score(text: &str) -> u8 {
    find_score(text).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standalone_number() {
        assert_eq!(extract_score("87"), 87);
        assert_eq!(extract_score("Quality Score: 87"), 87);
    }

    #[test]
    fn test_no_number_defaults_to_zero() {
        assert_eq!(extract_score("The code looks reasonable."), 0);
        assert_eq!(extract_score(""), 0);
    }

    #[test]
    fn test_upper_bound() {
        assert_eq!(extract_score("100"), 100);
        assert_eq!(extract_score("**Score: 100/100**"), 100);
    }

    #[test]
    fn test_out_of_range_is_ignored() {
        assert_eq!(extract_score("150"), 0);
        assert_eq!(extract_score("Processed 150 rows. Score: 72"), 72);
    }

    #[test]
    fn test_first_match_wins() {
        assert_eq!(extract_score("1. Yes, it ran.\n3. Score: 95"), 1);
        assert_eq!(extract_score("Score 64/100"), 64);
    }

    #[test]
    fn test_embedded_digits_are_not_tokens() {
        assert_eq!(extract_score("run_2024 finished v12b"), 0);
        assert_eq!(extract_score("zero: 0"), 0);
        assert_eq!(find_score("zero: 0"), Some(0));
    }
}
