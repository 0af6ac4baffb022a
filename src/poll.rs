//! Poll assembly
//!
//! Turns a selection and a rendered map into the `PollSpec` consumed by a
//! publisher, and holds the status texts.

use crate::candidate::Selection;
use crate::render::RenderedMap;
use std::time::Duration;

/// Everything a publisher needs for one poll
#[derive(Debug, Clone, PartialEq)]
pub struct PollSpec {
    /// PNG bytes of the map
    pub image: Vec<u8>,
    /// Option labels in poll order
    pub options: Vec<String>,
    pub correct_index: usize,
    /// How long the poll stays open
    pub expiry: Duration,
    /// Clue shown with the map
    pub country_name: String,
    /// Media description
    pub alt_text: String,
}

impl PollSpec {
    pub fn new(selection: &Selection, map: &RenderedMap, expiry: Duration) -> Self {
        Self {
            image: map.bytes().to_vec(),
            options: selection.option_names(),
            correct_index: selection.correct_index,
            expiry,
            country_name: selection.country_name.clone(),
            alt_text: alt_text(&selection.country_name, map.preset()),
        }
    }

    pub fn correct_option(&self) -> &str {
        &self.options[self.correct_index]
    }

    /// Text of the status carrying the map
    pub fn image_status(&self) -> String {
        format!(
            "🗺 Which place is this?\n\n\
             📍 Clue: this place is in {}\n\n\
             👇 You can answer in the poll which is in the first reply 👇\n\n\
             Map data © OpenStreetMap contributors, © CARTO\n\n\
             #geography #quiz",
            self.country_name
        )
    }

    /// Text of the reply carrying the poll
    pub fn poll_status(&self) -> String {
        "Which place is this?".to_string()
    }

    /// Text of the scheduled reply revealing the answer
    pub fn answer_status(&self) -> String {
        format!("The correct answer is: {}", self.correct_option())
    }

    /// Content warning hiding the answer
    pub fn answer_spoiler(&self) -> String {
        "✅ Correct answer".to_string()
    }
}

fn alt_text(country_name: &str, preset: &str) -> String {
    format!(
        "A map of a place somewhere in {}, drawn in the {} style",
        country_name, preset
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::candidate::Candidate;
    use crate::geo::Coordinates;

    fn selection() -> Selection {
        let candidate = |name: &str, is_correct| Candidate {
            name: name.to_string(),
            latitude: 46.0,
            longitude: 6.0,
            is_correct,
        };
        Selection {
            center: Coordinates::new(46.0, 6.0),
            candidates: vec![
                candidate("Lac, Annecy, Haute-Savoie", false),
                candidate("Château, Menthon, Haute-Savoie", true),
                candidate("Pont, Cruseilles, Haute-Savoie", false),
            ],
            correct_index: 1,
            country_name: "France".to_string(),
        }
    }

    fn spec() -> PollSpec {
        let map = RenderedMap::new(vec![1, 2, 3], "/nonexistent/map.png".into(), "sepia");
        PollSpec::new(&selection(), &map, Duration::from_secs(24 * 3600))
    }

    #[test]
    fn test_spec_from_selection() {
        let spec = spec();
        assert_eq!(spec.image, vec![1, 2, 3]);
        assert_eq!(spec.options.len(), 3);
        assert_eq!(spec.correct_option(), "Château, Menthon, Haute-Savoie");
        assert_eq!(spec.expiry.as_secs(), 86_400);
        assert!(spec.alt_text.contains("France"));
        assert!(spec.alt_text.contains("sepia"));
    }

    #[test]
    fn test_texts() {
        let spec = spec();
        assert!(spec.image_status().contains("this place is in France"));
        assert_eq!(
            spec.answer_status(),
            "The correct answer is: Château, Menthon, Haute-Savoie"
        );
        assert!(!spec.poll_status().is_empty());
    }
}
