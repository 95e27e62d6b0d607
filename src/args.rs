use clap_derive::Parser;

use std::path::PathBuf;

/// The save exported when none is named.
pub const DEFAULT_SAVE: &str = "savegame1";

/// A function to parse the path argument.
fn parse_path_arg(input: &str) -> Result<PathBuf, &'static str> {
    let p = PathBuf::from(input);
    if p.exists() {
        Ok(p)
    } else {
        Err("Invalid path")
    }
}

/// A function to parse a directory argument.
fn parse_dir_arg(input: &str) -> Result<PathBuf, &'static str> {
    let p = parse_path_arg(input)?;
    if p.is_dir() {
        Ok(p)
    } else {
        Err("Not a directory")
    }
}

/// The arguments to the program.
#[derive(Parser)]
#[command(version, about)]
pub struct Args {
    #[arg(short, long, default_value = DEFAULT_SAVE, conflicts_with = "all_saves")]
    /// The save folder name or path.
    pub save: String,
    #[arg(long, default_value_t = false)]
    /// Export every savegame* folder under the game folder.
    pub all_saves: bool,
    #[arg(short, long, default_value = None)]
    /// The animals CSV path, a directory when exporting every save.
    /// Defaults to <save>/livestock.csv.
    pub out: Option<PathBuf>,
    #[arg(long, default_value = None)]
    /// The summary CSV path, a directory when exporting every save.
    /// Defaults to <save>/livestock_summary.csv.
    pub summary_out: Option<PathBuf>,
    #[arg(long)]
    /// Write a typed JSON dump (Animals, Fetuses, Summary) instead of CSV.
    /// A directory puts the file inside it, no value writes <save>/<save>_livestock.json.
    pub json: Option<Option<PathBuf>>,
    #[arg(long, default_value = None)]
    /// A JSON object mapping country codes to names, overrides the mod.
    pub country_map: Option<PathBuf>,
    #[arg(long, default_value = None)]
    /// The path to the Realistic Livestock mod, its folder or its archive.
    /// Found in the mods directory when omitted.
    pub rl: Option<PathBuf>,
    #[arg(long, default_value = None)]
    /// A comma separated list of species to include, e.g. cows,sheep,pigs.
    pub species: Option<String>,
    #[arg(long, default_value = None)]
    /// Only include animals owned by this farm.
    pub farmid: Option<String>,
    #[arg(short, long, default_value_t = false)]
    /// Print discovery info.
    pub verbose: bool,
    #[arg(long, default_value = ".", value_parser = parse_dir_arg)]
    /// The game folder, holding the saves and gameSettings.xml.
    pub root: PathBuf,
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["livestock_extractor"]).unwrap();
        assert_eq!(args.save, DEFAULT_SAVE);
        assert!(!args.all_saves);
        assert!(args.json.is_none());
        assert_eq!(args.root, PathBuf::from("."));
    }

    #[test]
    fn test_json_value_is_optional() {
        let args = Args::try_parse_from(["livestock_extractor", "--json"]).unwrap();
        assert_eq!(args.json, Some(None));
        let args = Args::try_parse_from(["livestock_extractor", "--json", "out.json"]).unwrap();
        assert_eq!(args.json, Some(Some(PathBuf::from("out.json"))));
    }

    #[test]
    fn test_save_conflicts_with_all_saves() {
        assert!(
            Args::try_parse_from(["livestock_extractor", "-s", "savegame2", "--all-saves"])
                .is_err()
        );
    }

    #[test]
    fn test_root_must_exist() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("missing");
        assert!(Args::try_parse_from([
            "livestock_extractor",
            "--root",
            missing.to_str().unwrap()
        ])
        .is_err());
        let args = Args::try_parse_from([
            "livestock_extractor",
            "--root",
            dir.path().to_str().unwrap(),
            "--species",
            "cows,sheep",
            "-v",
        ])
        .unwrap();
        assert!(args.verbose);
        assert_eq!(args.species.as_deref(), Some("cows,sheep"));
    }
}
