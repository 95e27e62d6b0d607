use clap::Parser;
use derive_more::{Display, Error, From};
use human_panic::setup_panic;
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info};
use std::path::Path;

use livestock_extractor_lib::{
    country_codes::{CountryCodeLoader, CountryCodes},
    save_file::{RecordFilter, SaveFile, SaveFileError},
    species::normalize_species_list,
    structures::summarize,
};

/// The command line arguments
mod args;
use args::Args;

/// Save folder discovery
mod discovery;
use discovery::{list_saves, resolve_save_dir, save_name};

/// Writers for the exported tables and the rules deciding where they go
mod export;
use export::{ExportError, OutputOptions};

/// An error that stops the export of a single save.
#[derive(Debug, From, Display, Error)]
enum ExtractorError {
    SaveFileError(SaveFileError),
    ExportError(ExportError),
}

/// Sets up the logger. The verbose flag shows the discovery steps,
/// `RUST_LOG` overrides both levels.
fn init_logging(verbose: bool) {
    let level = if verbose { "info" } else { "error" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

/// Loads the country codes once, they are shared between all the saves.
fn load_country_codes(args: &Args) -> CountryCodes {
    let mut loader = CountryCodeLoader::new().with_game_root(&args.root);
    if let Some(country_map) = &args.country_map {
        loader = loader.with_override_file(country_map);
    }
    if let Some(rl) = &args.rl {
        loader = loader.with_mod_path(rl);
    }
    loader.load()
}

/// Exports one save, returning a line that describes what was written.
fn export_save(
    save_dir: &Path,
    codes: &CountryCodes,
    filter: &RecordFilter,
    options: &OutputOptions,
) -> Result<String, ExtractorError> {
    let save = SaveFile::open(save_dir)?;
    let extraction = save.extract(codes, filter);
    let summary = summarize(&extraction.individuals);
    let name = save_name(save_dir);
    let targets = options.targets(save_dir, &name);
    let written = targets.write(&extraction, &summary)?;
    let written: Vec<String> = written.iter().map(|p| p.display().to_string()).collect();
    Ok(format!("[ok] {}: wrote {}", name, written.join(", ")))
}

/// Main function. This is the entry point of the program.
///
/// # Process
///
/// 1. Parses the arguments and sets up logging
/// 2. Loads the country codes, from the override map, the given mod or the mods directory
/// 3. For the chosen save, or each save in the game folder:
///     1. Reads its placeables document into animal and fetus records
///     2. Summarizes the animals by shed, species and breed
///     3. Writes the tables as CSV, or as a single JSON dump
///
fn main() {
    setup_panic!();
    let args = Args::parse();
    init_logging(args.verbose);
    let species = args
        .species
        .as_deref()
        .map(normalize_species_list)
        .unwrap_or_default();
    if !species.is_empty() {
        info!("species filter: {}", species.join(", "));
    }
    let filter = RecordFilter::new()
        .with_species(species)
        .with_farm_id(args.farmid.clone().unwrap_or_default());
    let codes = load_country_codes(&args);
    let options = OutputOptions {
        out: args.out.clone(),
        summary_out: args.summary_out.clone(),
        json: args.json.clone(),
        batch: args.all_saves,
    };
    if !args.all_saves {
        let save_dir = resolve_save_dir(&args.save, &args.root);
        match export_save(&save_dir, &codes, &filter, &options) {
            Ok(line) => println!("{}", line),
            Err(e) => error!("{}", e),
        }
        return;
    }
    let saves = match list_saves(&args.root) {
        Ok(saves) => saves,
        Err(e) => {
            error!("could not list saves in {}: {}", args.root.display(), e);
            return;
        }
    };
    if saves.is_empty() {
        println!(
            "no savegame* folders with placeables.xml found in {}",
            args.root.display()
        );
        return;
    }
    let bar_style = ProgressStyle::default_bar()
        .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        .unwrap()
        .progress_chars("#>-");
    let progress_bar = ProgressBar::new(saves.len() as u64);
    progress_bar.set_style(bar_style);
    for save_dir in progress_bar.wrap_iter(saves.iter()) {
        progress_bar.set_message(save_name(save_dir));
        match export_save(save_dir, &codes, &filter, &options) {
            Ok(line) => progress_bar.println(line),
            Err(e) => progress_bar.suspend(|| error!("{}", e)),
        }
    }
    progress_bar.finish_with_message("Saves exported");
}
