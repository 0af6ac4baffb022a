//! One bot run, end to end
//!
//! generate selection → render map of the true place → build poll → publish.
//! Either the whole poll goes out or nothing does: every step before
//! publishing can fail without side effects beyond the transient image.

use crate::candidate::{CandidateGenerator, GeneratorSettings, Selection};
use crate::error::Result;
use crate::geo::ReverseGeocoder;
use crate::poi::PoiSource;
use crate::poll::PollSpec;
use crate::publish::{PublishReceipt, Publisher};
use crate::render::preset::PresetChoice;
use crate::render::MapRenderer;
use rand::Rng;
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

/// Per-run options resolved from config and CLI
#[derive(Debug, Clone, Copy)]
pub struct RunOptions {
    pub generator: GeneratorSettings,
    pub preset: PresetChoice,
    pub poll_duration: Duration,
}

/// What a run produced
#[derive(Debug)]
pub struct RunReport {
    pub selection: Selection,
    /// Preset actually used
    pub preset: &'static str,
    /// Set when the poll was published
    pub receipt: Option<PublishReceipt>,
    /// Set on dry runs, where the image is kept on disk
    pub image_path: Option<PathBuf>,
}

/// The collaborators of a run
pub struct Bot<'a> {
    pois: &'a dyn PoiSource,
    geocoder: &'a dyn ReverseGeocoder,
    renderer: &'a dyn MapRenderer,
    /// None means dry run
    publisher: Option<&'a dyn Publisher>,
}

impl<'a> Bot<'a> {
    pub fn new(
        pois: &'a dyn PoiSource,
        geocoder: &'a dyn ReverseGeocoder,
        renderer: &'a dyn MapRenderer,
        publisher: Option<&'a dyn Publisher>,
    ) -> Self {
        Self {
            pois,
            geocoder,
            renderer,
            publisher,
        }
    }

    /// Run once
    pub fn run<R: Rng + ?Sized>(&self, options: &RunOptions, rng: &mut R) -> Result<RunReport> {
        let generator = CandidateGenerator::new(self.pois, self.geocoder, options.generator);
        let selection = generator.generate(rng)?;

        let preset = options.preset.pick(rng);
        let map = self.renderer.render(selection.correct().coords(), preset)?;
        let poll = PollSpec::new(&selection, &map, options.poll_duration);

        let Some(publisher) = self.publisher else {
            info!("Dry run, nothing published");
            for (i, option) in poll.options.iter().enumerate() {
                let marker = if i == poll.correct_index { "*" } else { " " };
                info!("{} {}. {}", marker, i + 1, option);
            }
            let path = map.keep();
            info!("Map kept at {}", path.display());
            return Ok(RunReport {
                selection,
                preset: preset.name,
                receipt: None,
                image_path: Some(path),
            });
        };

        info!("Publishing to {}", publisher.name());
        let receipt = publisher.publish(&poll)?;
        if let Some(url) = &receipt.image_status_url {
            info!("Published {}", url);
        }

        Ok(RunReport {
            selection,
            preset: preset.name,
            receipt: Some(receipt),
            image_path: None,
        })
    }
}
