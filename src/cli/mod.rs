//! Command line interface
//!
//! A single flat command: the bot is meant to be started by a scheduler,
//! do one run and exit.

use crate::bot::{Bot, RunOptions};
use crate::candidate::GeneratorSettings;
use crate::config::{Config, Credentials};
use crate::error::{Error, Result};
use crate::geo::country::{CountryFilter, COUNTRIES};
use crate::geo::nominatim::NominatimBackend;
use crate::poi::opentripmap::OpenTripMapBackend;
use crate::publish::mastodon::MastodonPublisher;
use crate::publish::Publisher;
use crate::render::preset::{PresetChoice, PRESETS};
use crate::render::tiles::HttpTileSource;
use crate::render::{RenderSettings, TileMapRenderer};
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::ffi::OsString;
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Geography guessing poll bot for Mastodon
#[derive(Parser, Debug)]
#[command(name = "guessmap")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Country inside which random places are picked: a name, an ISO code, "random" or "world"
    #[arg(short = 'c', long)]
    pub country: Option<String>,

    /// Number of available picks (between 2 and 4)
    #[arg(short = 'n', long = "nb_picks", visible_alias = "nb-picks",
          value_parser = clap::value_parser!(u8).range(2..=4))]
    pub nb_picks: Option<u8>,

    /// Map preset to use, or "random"
    #[arg(short = 'p', long)]
    pub preset: Option<String>,

    /// Radius (km) searched for places around the random point
    #[arg(short = 'r', long, allow_negative_numbers = true)]
    pub radius: Option<f64>,

    /// Hours before the poll expires (also accepted as -ho)
    #[arg(short = 'H', long, value_parser = clap::value_parser!(u32).range(1..=168))]
    pub hours: Option<u32>,

    /// Verbose output
    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// Config file (defaults to ~/.config/guessmap/config.toml)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Seed for reproducible picks
    #[arg(long)]
    pub seed: Option<u64>,

    /// Render and log the poll without publishing it
    #[arg(long)]
    pub dry_run: bool,

    /// List available presets
    #[arg(long)]
    pub list_presets: bool,

    /// List known countries
    #[arg(long)]
    pub list_countries: bool,
}

impl Cli {
    /// Merge flags over config defaults
    pub fn run_options(&self, config: &Config) -> Result<RunOptions> {
        let defaults = &config.defaults;

        let country: CountryFilter = self
            .country
            .as_deref()
            .unwrap_or(&defaults.country)
            .parse()?;
        let preset: PresetChoice = self
            .preset
            .as_deref()
            .unwrap_or(&defaults.preset)
            .parse()?;

        let radius_km = self.radius.unwrap_or(defaults.radius_km);
        if !(radius_km.is_finite() && radius_km > 0.0) {
            return Err(Error::InvalidArgument(format!(
                "Radius must be a positive number of kilometers, got {}",
                radius_km
            )));
        }

        let nb_picks = self.nb_picks.unwrap_or(defaults.nb_picks);
        let hours = self.hours.unwrap_or(defaults.hours);

        Ok(RunOptions {
            generator: GeneratorSettings {
                country,
                nb_picks: nb_picks as usize,
                radius_km,
                max_attempts: defaults.max_attempts,
            },
            preset,
            poll_duration: Duration::from_secs(u64::from(hours) * 3600),
        })
    }
}

/// Rewrite the two-letter `-ho` short flag, which clap cannot express
pub fn normalize_args<I>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = OsString>,
{
    args.into_iter()
        .map(|arg| {
            if arg == "-ho" {
                return OsString::from("--hours");
            }
            match arg.to_str().and_then(|s| s.strip_prefix("-ho=")) {
                Some(value) => OsString::from(format!("--hours={}", value)),
                None => arg,
            }
        })
        .collect()
}

/// Install the fmt subscriber; RUST_LOG takes precedence over `-v`
fn init_logging(verbose: bool) {
    let fallback = if verbose { "info,guessmap=debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback)),
        )
        .init();
}

/// Run the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse_from(normalize_args(std::env::args_os()));
    init_logging(cli.verbose);

    if cli.list_presets {
        list_presets();
        return Ok(());
    }
    if cli.list_countries {
        list_countries();
        return Ok(());
    }

    let config = Config::load(cli.config.as_deref())?;
    let credentials = Credentials::from_env(!cli.dry_run)?;
    let options = cli.run_options(&config)?;
    info!(
        "guessmap v{}: country={}, picks={}, radius={}km, poll={}h",
        env!("CARGO_PKG_VERSION"),
        options.generator.country,
        options.generator.nb_picks,
        options.generator.radius_km,
        options.poll_duration.as_secs() / 3600
    );

    let timeout = config.timeout();
    let pois = OpenTripMapBackend::new(
        config.opentripmap.url.as_str(),
        credentials.opentripmap_api_key.as_str(),
        config.opentripmap.rate,
        config.opentripmap.limit,
        timeout,
    )?;
    let geocoder = NominatimBackend::new(config.nominatim.url.as_str(), timeout)?;
    let tiles = HttpTileSource::new(config.render.tile_url.as_str(), timeout)?;
    let renderer = TileMapRenderer::new(
        &tiles,
        RenderSettings {
            width: config.render.width,
            height: config.render.height,
            zoom: config.render.zoom,
        },
        std::env::temp_dir(),
    );
    let publisher = credentials
        .mastodon
        .as_ref()
        .map(|m| MastodonPublisher::new(&m.instance, m.access_token.as_str(), timeout))
        .transpose()?;

    let bot = Bot::new(
        &pois,
        &geocoder,
        &renderer,
        publisher.as_ref().map(|p| p as &dyn Publisher),
    );

    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let report = bot.run(&options, &mut rng)?;

    info!(
        "Done: {} option(s), answer #{}, {} preset",
        report.selection.candidates.len(),
        report.selection.correct_index + 1,
        report.preset
    );
    Ok(())
}

/// Print available presets
fn list_presets() {
    println!("Available presets:");
    println!("  {:10} - pick one of the below at random", "random");
    for preset in PRESETS {
        println!("  {:10} - {} tiles, {:?} tone", preset.name, preset.layer, preset.tone);
    }
}

/// Print known countries
fn list_countries() {
    println!("Known countries (also: random, world):");
    for country in COUNTRIES {
        println!("  {}  {}", country.code, country.name);
    }
}
