//! guessmap: geography guessing polls for Mastodon
//!
//! Picks a few notable places around a random point, renders a label-free
//! map of one of them and asks followers which place it is.
//!
//! ## Pipeline
//!
//! - `geo`: coordinates, country bounding boxes, Nominatim reverse geocoding
//! - `poi`: notable places from OpenTripMap
//! - `candidate`: picks the poll options and the true answer
//! - `render`: stitches map tiles into a stylized circular image
//! - `poll` / `publish`: builds the poll and posts it to Mastodon
//! - `bot`: runs the whole thing once
//!
//! ## Quick Start
//!
//! ```rust
//! use guessmap::geo::country::CountryFilter;
//! use guessmap::render::preset::PresetChoice;
//!
//! let country: CountryFilter = "France".parse().unwrap();
//! let preset: PresetChoice = "random".parse().unwrap();
//! assert_eq!(country.country().unwrap().code, "fr");
//! assert_eq!(preset, PresetChoice::Random);
//! ```

pub mod bot;
pub mod candidate;
pub mod cli;
pub mod config;
pub mod constants;
pub mod error;
pub mod geo;
pub mod poi;
pub mod poll;
pub mod publish;
pub mod render;

// Re-export commonly used types
pub use bot::{Bot, RunOptions, RunReport};
pub use candidate::{Candidate, Selection};
pub use config::Config;
pub use error::{Error, Result};
pub use geo::Coordinates;
pub use poll::PollSpec;
