//! Candidate generation
//!
//! Picks one true place plus distractors around a random center:
//! - Draw a random center honoring the country filter
//! - Ask the POI source for named places within the radius
//! - Keep in-radius places with case-insensitively unique names
//! - Shuffle them and geocode until enough picks are found, skipping
//!   places outside a pinned country
//! - Label the picks, then draw the true slot
//!
//! Every failed attempt starts over with a new center, up to a fixed limit.

pub mod label;

use crate::error::{Error, Result};
use crate::geo::country::CountryFilter;
use crate::geo::{is_in_circle, Address, Coordinates, ReverseGeocoder};
use crate::poi::{Poi, PoiSource};
use label::{all_distinct, name_key, option_label};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use tracing::{debug, info, warn};

/// A poll option tied to a place
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    /// Poll option label
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub is_correct: bool,
}

impl Candidate {
    pub fn coords(&self) -> Coordinates {
        Coordinates::new(self.latitude, self.longitude)
    }
}

/// Outcome of a successful generation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Selection {
    /// Random center the places were searched around
    pub center: Coordinates,
    /// Options in poll order
    pub candidates: Vec<Candidate>,
    /// Index of the true place in `candidates`
    pub correct_index: usize,
    /// Clue shown with the map
    pub country_name: String,
}

impl Selection {
    /// The true place
    pub fn correct(&self) -> &Candidate {
        &self.candidates[self.correct_index]
    }

    /// Option labels in poll order
    pub fn option_names(&self) -> Vec<String> {
        self.candidates.iter().map(|c| c.name.clone()).collect()
    }
}

/// Knobs for a generation run
#[derive(Debug, Clone, Copy)]
pub struct GeneratorSettings {
    pub country: CountryFilter,
    /// Number of options, truth included
    pub nb_picks: usize,
    pub radius_km: f64,
    pub max_attempts: u32,
}

impl GeneratorSettings {
    pub fn radius_meters(&self) -> f64 {
        self.radius_km * 1000.0
    }
}

/// Fallback clue when neither the filter nor the geocoder names a country
const UNKNOWN_COUNTRY: &str = "somewhere on Earth";

/// Builds a `Selection` from a POI source and a reverse geocoder
pub struct CandidateGenerator<'a> {
    pois: &'a dyn PoiSource,
    geocoder: &'a dyn ReverseGeocoder,
    settings: GeneratorSettings,
}

impl<'a> CandidateGenerator<'a> {
    pub fn new(
        pois: &'a dyn PoiSource,
        geocoder: &'a dyn ReverseGeocoder,
        settings: GeneratorSettings,
    ) -> Self {
        Self {
            pois,
            geocoder,
            settings,
        }
    }

    /// Generate one true candidate and `nb_picks - 1` distractors
    ///
    /// # Errors
    /// `Error::LocationExhausted` when every attempt came up short. HTTP
    /// failures of the collaborators are returned as-is and end the run.
    pub fn generate<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Selection> {
        let filter = self.settings.country.resolve(rng);
        info!("Country: {}", filter);

        for attempt in 1..=self.settings.max_attempts {
            let center = filter.random_point(rng);
            debug!("Attempt {}: searching around {}", attempt, center);

            if let Some(selection) = self.attempt(filter, center, rng)? {
                info!(
                    "Found {} places after {} attempt(s)",
                    selection.candidates.len(),
                    attempt
                );
                return Ok(selection);
            }
        }

        warn!(
            "Giving up after {} attempts in {}",
            self.settings.max_attempts, filter
        );
        Err(Error::LocationExhausted {
            attempts: self.settings.max_attempts,
        })
    }

    fn attempt<R: Rng + ?Sized>(
        &self,
        filter: CountryFilter,
        center: Coordinates,
        rng: &mut R,
    ) -> Result<Option<Selection>> {
        let nb_picks = self.settings.nb_picks;
        let radius = self.settings.radius_meters();

        let places = self.pois.places_within(center, radius)?;
        let mut unique = unique_places(places, center, radius);
        if unique.len() < nb_picks {
            debug!(
                "Only {} usable place(s) from {}, need {}",
                unique.len(),
                self.pois.name(),
                nb_picks
            );
            return Ok(None);
        }

        unique.shuffle(rng);
        let picks = self.geocode_picks(filter, unique)?;
        if picks.len() < nb_picks {
            debug!(
                "Only {} place(s) inside {}, need {}",
                picks.len(),
                filter,
                nb_picks
            );
            return Ok(None);
        }

        let labels: Vec<&str> = picks.iter().map(|p| p.label.as_str()).collect();
        if !all_distinct(&labels) {
            debug!("Option labels collide: {}", labels.join(" -- "));
            return Ok(None);
        }

        // Picks come out of a shuffle, so their order is already random;
        // the truth is then drawn uniformly among the slots.
        let correct_index = rng.gen_range(0..nb_picks);
        let country_name = match filter.country() {
            Some(country) => country.name.to_string(),
            None => picks[correct_index]
                .address
                .as_ref()
                .and_then(|a| a.country.clone())
                .unwrap_or_else(|| UNKNOWN_COUNTRY.to_string()),
        };

        let candidates: Vec<Candidate> = picks
            .into_iter()
            .enumerate()
            .map(|(i, pick)| Candidate {
                name: pick.label,
                latitude: pick.poi.coords.lat,
                longitude: pick.poi.coords.lng,
                is_correct: i == correct_index,
            })
            .collect();

        info!(
            "Random picks: {}",
            candidates
                .iter()
                .map(|c| c.name.as_str())
                .collect::<Vec<_>>()
                .join(" -- ")
        );
        info!("Correct pick: {}", candidates[correct_index].name);

        Ok(Some(Selection {
            center,
            candidates,
            correct_index,
            country_name,
        }))
    }

    /// Geocode places in order until `nb_picks` of them are usable
    ///
    /// With a pinned country, places the geocoder puts elsewhere (or
    /// nowhere) are skipped so no option contradicts the clue.
    fn geocode_picks(&self, filter: CountryFilter, places: Vec<Poi>) -> Result<Vec<Pick>> {
        let nb_picks = self.settings.nb_picks;
        let total = places.len();
        let mut picks = Vec::with_capacity(nb_picks);

        for (seen, poi) in places.into_iter().enumerate() {
            if picks.len() == nb_picks || picks.len() + (total - seen) < nb_picks {
                break;
            }

            let address = self.geocoder.reverse_geocode(poi.coords)?;
            if let Some(country) = filter.country() {
                let code = address.as_ref().and_then(|a| a.country_code.as_deref());
                if code != Some(country.code) {
                    debug!("Skipping {}: in {:?}, not {}", poi.name, code, country.code);
                    continue;
                }
            }

            let label = option_label(&poi.name, address.as_ref());
            debug!("Picked {} (rate {}, kinds: {})", label, poi.rate, poi.kinds);
            picks.push(Pick {
                poi,
                address,
                label,
            });
        }
        Ok(picks)
    }
}

/// A place kept for the poll, with its address and label
struct Pick {
    poi: Poi,
    address: Option<Address>,
    label: String,
}

/// Named, in-radius places with case-insensitively unique names
///
/// Among places sharing a name the best rated one is kept, in the position
/// of the first occurrence.
fn unique_places(places: Vec<Poi>, center: Coordinates, radius_meters: f64) -> Vec<Poi> {
    let mut unique: Vec<Poi> = Vec::new();
    let mut by_name: HashMap<String, usize> = HashMap::new();

    let usable = places
        .into_iter()
        .filter(|p| p.is_named())
        .filter(|p| is_in_circle(p.coords, center, radius_meters));
    for poi in usable {
        match by_name.entry(name_key(&poi.name)) {
            Entry::Occupied(slot) => {
                let kept = &mut unique[*slot.get()];
                if poi.rate > kept.rate {
                    *kept = poi;
                }
            }
            Entry::Vacant(slot) => {
                slot.insert(unique.len());
                unique.push(poi);
            }
        }
    }
    unique
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::country::find_country;
    use crate::geo::haversine_distance;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::cell::Cell;

    /// Returns a ring of named places around whatever center it is asked about
    struct RingPois {
        names: Vec<&'static str>,
        calls: Cell<u32>,
    }

    impl RingPois {
        fn new(names: &[&'static str]) -> Self {
            Self {
                names: names.to_vec(),
                calls: Cell::new(0),
            }
        }
    }

    impl PoiSource for RingPois {
        fn name(&self) -> &'static str {
            "ring"
        }

        fn places_within(&self, center: Coordinates, _radius: f64) -> Result<Vec<Poi>> {
            self.calls.set(self.calls.get() + 1);
            Ok(self
                .names
                .iter()
                .enumerate()
                .map(|(i, name)| {
                    let offset = 0.01 * (i as f64 + 1.0);
                    Poi::new(*name, Coordinates::new(center.lat + offset, center.lng))
                })
                .collect())
        }
    }

    struct EmptyPois {
        calls: Cell<u32>,
    }

    impl PoiSource for EmptyPois {
        fn name(&self) -> &'static str {
            "empty"
        }

        fn places_within(&self, _center: Coordinates, _radius: f64) -> Result<Vec<Poi>> {
            self.calls.set(self.calls.get() + 1);
            Ok(Vec::new())
        }
    }

    /// Geocodes everything to the same town in a fixed country
    struct FixedGeocoder {
        code: &'static str,
    }

    impl ReverseGeocoder for FixedGeocoder {
        fn reverse_geocode(&self, _point: Coordinates) -> Result<Option<Address>> {
            Ok(Some(Address {
                display_name: "Somewhere".to_string(),
                city: Some("Annecy".to_string()),
                region: Some("Haute-Savoie".to_string()),
                country: Some("France".to_string()),
                country_code: Some(self.code.to_string()),
            }))
        }
    }

    fn settings(country: CountryFilter, nb_picks: usize) -> GeneratorSettings {
        GeneratorSettings {
            country,
            nb_picks,
            radius_km: 50.0,
            max_attempts: 5,
        }
    }

    fn france() -> CountryFilter {
        CountryFilter::Country(find_country("fr").unwrap())
    }

    #[test]
    fn test_exactly_one_correct() {
        let pois = RingPois::new(&["Lac", "Château", "Musée", "Pont", "Église"]);
        let geocoder = FixedGeocoder { code: "fr" };
        let generator = CandidateGenerator::new(&pois, &geocoder, settings(france(), 4));

        for seed in 0..20 {
            let selection = generator.generate(&mut StdRng::seed_from_u64(seed)).unwrap();
            let correct = selection.candidates.iter().filter(|c| c.is_correct).count();
            assert_eq!(correct, 1);
            assert!(selection.correct().is_correct);
        }
    }

    #[test]
    fn test_names_distinct_ignoring_case() {
        let pois = RingPois::new(&["Lac", "LAC", "lac ", "Château", "Musée"]);
        let geocoder = FixedGeocoder { code: "fr" };
        let generator = CandidateGenerator::new(&pois, &geocoder, settings(france(), 3));

        for seed in 0..20 {
            let selection = generator.generate(&mut StdRng::seed_from_u64(seed)).unwrap();
            assert!(all_distinct(&selection.option_names()));
        }
    }

    #[test]
    fn test_candidates_within_radius() {
        let pois = RingPois::new(&["A", "B", "C", "D"]);
        let geocoder = FixedGeocoder { code: "fr" };
        let s = settings(france(), 3);
        let generator = CandidateGenerator::new(&pois, &geocoder, s);

        let selection = generator.generate(&mut StdRng::seed_from_u64(9)).unwrap();
        for candidate in &selection.candidates {
            assert!(haversine_distance(selection.center, candidate.coords()) <= s.radius_meters());
        }
    }

    #[test]
    fn test_out_of_radius_places_dropped() {
        let center = Coordinates::new(45.9, 6.1);
        let places = vec![
            Poi::new("Near", Coordinates::new(45.91, 6.1)),
            Poi::new("Far", Coordinates::new(47.0, 6.1)),
            Poi::new("  ", Coordinates::new(45.9, 6.1)),
        ];
        let kept = unique_places(places, center, 5_000.0);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].name, "Near");
    }

    #[test]
    fn test_duplicate_names_keep_best_rated() {
        let center = Coordinates::new(45.9, 6.1);
        let mut low = Poi::new("Lac d'Annecy", Coordinates::new(45.91, 6.1));
        low.rate = 1;
        let mut high = Poi::new("LAC D'ANNECY", Coordinates::new(45.92, 6.1));
        high.rate = 3;
        high.kinds = "lakes,natural".to_string();
        let other = Poi::new("Pont", Coordinates::new(45.93, 6.1));

        let kept = unique_places(vec![low, other, high], center, 10_000.0);
        assert_eq!(kept.len(), 2);
        assert_eq!(kept[0].rate, 3);
        assert_eq!(kept[0].kinds, "lakes,natural");
        assert_eq!(kept[1].name, "Pont");
    }

    #[test]
    fn test_three_picks_give_three_options() {
        let pois = RingPois::new(&["A", "B", "C", "D", "E"]);
        let geocoder = FixedGeocoder { code: "fr" };
        let generator = CandidateGenerator::new(&pois, &geocoder, settings(france(), 3));

        let selection = generator.generate(&mut StdRng::seed_from_u64(1)).unwrap();
        assert_eq!(selection.candidates.len(), 3);
        assert_eq!(selection.option_names().len(), 3);
        assert_eq!(selection.country_name, "France");
    }

    #[test]
    fn test_seeded_runs_are_deterministic() {
        let pois = RingPois::new(&["A", "B", "C", "D", "E"]);
        let geocoder = FixedGeocoder { code: "fr" };
        let generator = CandidateGenerator::new(&pois, &geocoder, settings(france(), 4));

        let first = generator.generate(&mut StdRng::seed_from_u64(1234)).unwrap();
        let second = generator.generate(&mut StdRng::seed_from_u64(1234)).unwrap();
        assert_eq!(first.correct_index, second.correct_index);
        assert_eq!(first.candidates, second.candidates);
        assert_eq!(first.center, second.center);
    }

    #[test]
    fn test_empty_source_exhausts() {
        let pois = EmptyPois { calls: Cell::new(0) };
        let geocoder = FixedGeocoder { code: "fr" };
        let generator = CandidateGenerator::new(&pois, &geocoder, settings(france(), 3));

        let result = generator.generate(&mut StdRng::seed_from_u64(5));
        assert!(matches!(result, Err(Error::LocationExhausted { attempts: 5 })));
        assert_eq!(pois.calls.get(), 5);
    }

    #[test]
    fn test_too_few_unique_names_retries() {
        let pois = RingPois::new(&["Lac", "lac", "LAC"]);
        let geocoder = FixedGeocoder { code: "fr" };
        let generator = CandidateGenerator::new(&pois, &geocoder, settings(france(), 2));

        let result = generator.generate(&mut StdRng::seed_from_u64(5));
        assert!(matches!(result, Err(Error::LocationExhausted { .. })));
        assert_eq!(pois.calls.get(), 5);
    }

    #[test]
    fn test_wrong_country_retries() {
        let pois = RingPois::new(&["A", "B", "C"]);
        let geocoder = FixedGeocoder { code: "ch" };
        let generator = CandidateGenerator::new(&pois, &geocoder, settings(france(), 2));

        let result = generator.generate(&mut StdRng::seed_from_u64(5));
        assert!(matches!(result, Err(Error::LocationExhausted { .. })));
    }

    #[test]
    fn test_world_uses_geocoded_country() {
        let pois = RingPois::new(&["A", "B", "C"]);
        let geocoder = FixedGeocoder { code: "ch" };
        let generator =
            CandidateGenerator::new(&pois, &geocoder, settings(CountryFilter::World, 2));

        let selection = generator.generate(&mut StdRng::seed_from_u64(5)).unwrap();
        assert_eq!(selection.country_name, "France");
    }

    /// Swiss places north of the center, French ones east of it
    struct BorderPois {
        center: Cell<Option<Coordinates>>,
    }

    impl PoiSource for BorderPois {
        fn name(&self) -> &'static str {
            "border"
        }

        fn places_within(&self, center: Coordinates, _radius: f64) -> Result<Vec<Poi>> {
            self.center.set(Some(center));
            let north = |k: f64| Coordinates::new(center.lat + 0.01 * k, center.lng);
            let east = |k: f64| Coordinates::new(center.lat, center.lng + 0.01 * k);
            Ok(vec![
                Poi::new("Swiss Castle", north(1.0)),
                Poi::new("French Lake", east(1.0)),
                Poi::new("Swiss Bridge", north(2.0)),
                Poi::new("French Abbey", east(2.0)),
                Poi::new("French Mill", east(3.0)),
            ])
        }
    }

    /// Splits addresses by which side of the last search center a point is on
    struct BorderGeocoder<'a> {
        pois: &'a BorderPois,
        calls: Cell<u32>,
    }

    impl ReverseGeocoder for BorderGeocoder<'_> {
        fn reverse_geocode(&self, point: Coordinates) -> Result<Option<Address>> {
            self.calls.set(self.calls.get() + 1);
            let center = self.pois.center.get().unwrap();
            let (city, region, country, code) = if point.lng > center.lng + 1e-9 {
                ("Annemasse", "Haute-Savoie", "France", "fr")
            } else {
                ("Geneve", "Geneve", "Switzerland", "ch")
            };
            Ok(Some(Address {
                display_name: city.to_string(),
                city: Some(city.to_string()),
                region: Some(region.to_string()),
                country: Some(country.to_string()),
                country_code: Some(code.to_string()),
            }))
        }
    }

    fn switzerland() -> CountryFilter {
        CountryFilter::Country(find_country("ch").unwrap())
    }

    #[test]
    fn test_pinned_country_drops_foreign_distractors() {
        let pois = BorderPois {
            center: Cell::new(None),
        };
        let geocoder = BorderGeocoder {
            pois: &pois,
            calls: Cell::new(0),
        };
        let generator = CandidateGenerator::new(&pois, &geocoder, settings(switzerland(), 2));

        for seed in 0..20 {
            let selection = generator.generate(&mut StdRng::seed_from_u64(seed)).unwrap();
            assert_eq!(selection.country_name, "Switzerland");
            for name in selection.option_names() {
                assert!(name.starts_with("Swiss "), "{} is outside Switzerland", name);
            }
        }
    }

    #[test]
    fn test_pinned_country_without_enough_local_places_exhausts() {
        let pois = BorderPois {
            center: Cell::new(None),
        };
        let geocoder = BorderGeocoder {
            pois: &pois,
            calls: Cell::new(0),
        };
        let generator = CandidateGenerator::new(&pois, &geocoder, settings(switzerland(), 3));

        let result = generator.generate(&mut StdRng::seed_from_u64(3));
        assert!(matches!(result, Err(Error::LocationExhausted { attempts: 5 })));
    }

    #[test]
    fn test_world_keeps_places_on_both_sides() {
        let pois = BorderPois {
            center: Cell::new(None),
        };
        let geocoder = BorderGeocoder {
            pois: &pois,
            calls: Cell::new(0),
        };
        let generator =
            CandidateGenerator::new(&pois, &geocoder, settings(CountryFilter::World, 4));

        let selection = generator.generate(&mut StdRng::seed_from_u64(8)).unwrap();
        assert_eq!(selection.candidates.len(), 4);
        assert_eq!(geocoder.calls.get(), 4);
    }
}
