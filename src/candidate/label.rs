//! Poll option labels
//!
//! A label reads "{place}, {city}, {region}" and must fit Mastodon's poll
//! option limit.

use crate::constants::poll::MAX_OPTION_LENGTH;
use crate::geo::Address;
use std::collections::HashSet;

const UNKNOWN: &str = "somewhere";

/// Build the poll option label for a place
pub fn option_label(name: &str, address: Option<&Address>) -> String {
    let city = address.and_then(|a| a.city.as_deref()).unwrap_or(UNKNOWN);
    let region = address.and_then(|a| a.region.as_deref()).unwrap_or(UNKNOWN);
    truncate(&format!("{}, {}, {}", name.trim(), city, region), MAX_OPTION_LENGTH)
}

/// Cut `text` to at most `max_chars` characters, marking the cut with ".."
pub fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let kept: String = text.chars().take(max_chars.saturating_sub(2)).collect();
    format!("{}..", kept)
}

/// Case-insensitive key used for uniqueness checks
pub fn name_key(name: &str) -> String {
    name.trim().to_lowercase()
}

/// True when no two labels are equal ignoring case
pub fn all_distinct<S: AsRef<str>>(labels: &[S]) -> bool {
    let mut seen = HashSet::new();
    labels.iter().all(|l| seen.insert(name_key(l.as_ref())))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn address(city: Option<&str>, region: Option<&str>) -> Address {
        Address {
            display_name: "x".to_string(),
            city: city.map(String::from),
            region: region.map(String::from),
            ..Default::default()
        }
    }

    #[test]
    fn test_option_label() {
        let a = address(Some("Lyon"), Some("Auvergne-Rhône-Alpes"));
        assert_eq!(
            option_label("Basilique", Some(&a)),
            "Basilique, Lyon, Auvergne-Rhône-Alpes"
        );
    }

    #[test]
    fn test_option_label_fallbacks() {
        assert_eq!(option_label("Hut", None), "Hut, somewhere, somewhere");
        let a = address(None, Some("Tyrol"));
        assert_eq!(option_label("Hut", Some(&a)), "Hut, somewhere, Tyrol");
    }

    #[test]
    fn test_truncate_long_label() {
        let a = address(Some("Llanfairpwllgwyngyll"), Some("Wales"));
        let label = option_label("Church of Saint Mary in the White Hazel Hollow", Some(&a));
        assert_eq!(label.chars().count(), MAX_OPTION_LENGTH);
        assert!(label.ends_with(".."));
    }

    #[test]
    fn test_truncate_counts_chars_not_bytes() {
        let text = "é".repeat(60);
        let cut = truncate(&text, 50);
        assert_eq!(cut.chars().count(), 50);
        assert_eq!(truncate("short", 50), "short");
    }

    #[test]
    fn test_all_distinct() {
        assert!(all_distinct(&["Louvre", "Orsay"]));
        assert!(!all_distinct(&["Louvre", "LOUVRE "]));
        assert!(all_distinct::<&str>(&[]));
    }
}
