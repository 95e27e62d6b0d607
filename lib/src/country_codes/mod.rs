mod lua;
pub use lua::{parse_area_codes, AreaCodes};

mod loader;
pub use loader::{load_from_mod_path, scan_mods_dir};

mod settings;
pub use settings::find_mods_dir;

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use derive_more::{Display, Error, From};
use log::{info, warn};
use serde_json::Value;
use zip::result::ZipError;

use super::types::{GameString, HashMap};

/// An error that occurred while reading a source of country codes.
/// These never stop the extraction, they just leave us with fewer names.
#[derive(Debug, From, Display, Error)]
pub enum CountryCodeError {
    /// Something went wrong with stdlib IO.
    IoError(io::Error),
    /// The mod archive couldn't be read
    ArchiveError(ZipError),
    /// The override map is not valid JSON
    JsonError(serde_json::Error),
    /// The override map is valid JSON, but not what we expected
    #[display("{}", _0)]
    InvalidOverride(#[error(not(source))] &'static str),
}

/// The resolved nativity of an animal.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Country {
    /// The raw area code, as stored in the save
    pub code: Option<GameString>,
    pub name: Option<GameString>,
    /// Two letter abbreviation
    pub iso: Option<GameString>,
}

/// Normalizes a numeric code to its integer form, `"7.0"` becomes `"7"`.
/// Returns [None] for codes that aren't numbers.
fn normalize_code(raw: &str) -> Option<String> {
    let value = raw.trim().parse::<f64>().ok()?;
    if !value.is_finite() {
        return None;
    }
    let truncated = value.trunc();
    if truncated == 0.0 {
        return Some("0".to_owned());
    }
    Some(format!("{:.0}", truncated))
}

/// Country codes mapped to their names and ISO abbreviations.
///
/// Built once from a single source, see [CountryCodeLoader], and read only
/// from then on.
#[derive(Debug, Default, Clone)]
pub struct CountryCodes {
    /// User provided names, these win over everything else
    overrides: HashMap<String, String>,
    codes: AreaCodes,
}

impl CountryCodes {
    pub fn new(overrides: HashMap<String, String>, codes: AreaCodes) -> Self {
        CountryCodes { overrides, codes }
    }

    /// Returns true if no source provided any mapping.
    pub fn is_empty(&self) -> bool {
        self.overrides.is_empty() && self.codes.is_empty() && self.codes.isos.is_empty()
    }

    /// Looks up the name and ISO abbreviation of a raw area code.
    ///
    /// The overrides are consulted first, with the raw code and then its
    /// integer form. Then the mod's codes under the integer form, and finally
    /// the mod's names under the raw code. Codes nobody knows get an
    /// `Unknown (code)` name.
    pub fn lookup(&self, raw: &str) -> (String, String) {
        if raw.is_empty() {
            return (String::new(), String::new());
        }
        let normalized = normalize_code(raw);
        if let Some(name) = self.overrides.get(raw).or_else(|| {
            normalized
                .as_ref()
                .and_then(|key| self.overrides.get(key))
        }) {
            return (name.clone(), String::new());
        }
        let key = normalized.as_deref().unwrap_or(raw);
        let mut name = self
            .codes
            .names
            .get(key)
            .filter(|n| !n.is_empty())
            .cloned();
        let mut iso = self.codes.isos.get(key).cloned().unwrap_or_default();
        if name.is_none() {
            if let Some(fallback) = self.codes.names.get(raw) {
                name = Some(fallback.clone());
                if let Some(fallback_iso) = self.codes.isos.get(raw) {
                    iso = fallback_iso.clone();
                }
            }
        }
        let name = match name {
            Some(name) if !name.is_empty() => name,
            _ => format!("Unknown ({})", raw),
        };
        (name, iso)
    }

    /// Resolves an optional raw code into a [Country].
    pub fn resolve(&self, code: Option<GameString>) -> Country {
        let (name, iso) = self.lookup(code.as_deref().unwrap_or(""));
        let non_empty = |s: String| {
            if s.is_empty() {
                None
            } else {
                Some(GameString::from(s))
            }
        };
        Country {
            code,
            name: non_empty(name),
            iso: non_empty(iso),
        }
    }
}

/// Reads a JSON object that maps codes to country names.
/// Non string values are kept in their JSON form.
pub fn load_overrides<P: AsRef<Path>>(path: P) -> Result<HashMap<String, String>, CountryCodeError> {
    let contents = fs::read_to_string(path)?;
    match serde_json::from_str::<Value>(&contents)? {
        Value::Object(map) => Ok(map
            .into_iter()
            .map(|(k, v)| {
                let v = match v {
                    Value::String(s) => s,
                    other => other.to_string(),
                };
                (k, v)
            })
            .collect()),
        _ => Err(CountryCodeError::InvalidOverride(
            "the country map is not a JSON object",
        )),
    }
}

/// A loader for [CountryCodes].
///
/// Sources are tried in a fixed order and the first one that provides
/// anything is used alone:
/// 1. explicit overrides (given directly or as a JSON file)
/// 2. the Realistic Livestock mod at a known path
/// 3. a scan of the game's mods directory
#[derive(Default)]
pub struct CountryCodeLoader {
    overrides: HashMap<String, String>,
    mod_path: Option<PathBuf>,
    game_root: Option<PathBuf>,
}

impl CountryCodeLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds explicit code to name mappings.
    pub fn with_overrides(mut self, overrides: HashMap<String, String>) -> Self {
        self.overrides.extend(overrides);
        self
    }

    /// Adds the mappings from a JSON override file.
    /// A file that can't be read is reported and ignored.
    pub fn with_override_file<P: AsRef<Path>>(self, path: P) -> Self {
        let path = path.as_ref();
        match load_overrides(path) {
            Ok(overrides) => self.with_overrides(overrides),
            Err(e) => {
                warn!("failed to read country map '{}': {}", path.display(), e);
                self
            }
        }
    }

    /// Sets the path to the mod, either its folder or its archive.
    pub fn with_mod_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.mod_path = Some(path.into());
        self
    }

    /// Sets the game folder, whose mods directory is scanned as the last resort.
    pub fn with_game_root<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.game_root = Some(path.into());
        self
    }

    /// Builds the codes from the first source that has any.
    pub fn load(self) -> CountryCodes {
        if !self.overrides.is_empty() {
            return CountryCodes::new(self.overrides, AreaCodes::default());
        }
        if let Some(mod_path) = self.mod_path {
            info!("using RL path: {}", mod_path.display());
            return CountryCodes::new(HashMap::default(), load_from_mod_path(&mod_path));
        }
        if let Some(game_root) = self.game_root {
            let mods_dir = find_mods_dir(&game_root);
            info!("scanning mods dir: {}", mods_dir.display());
            let (codes, checked) = scan_mods_dir(&mods_dir);
            if codes.is_empty() {
                info!("RealisticLivestock.lua with AREA_CODES not found.");
                if !checked.is_empty() {
                    info!("paths checked:");
                    for path in checked {
                        info!("  - {}", path.display());
                    }
                }
            }
            return CountryCodes::new(HashMap::default(), codes);
        }
        CountryCodes::default()
    }
}
