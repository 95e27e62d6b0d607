use std::{
    fs::{self, File},
    io::Read,
    path::{Path, PathBuf},
};

use log::{info, warn};
use zip::read::ZipArchive;

use super::{
    lua::{parse_area_codes, AreaCodes},
    CountryCodeError,
};

/// The script of the Realistic Livestock mod that carries the area codes.
const SCRIPT_NAME: &str = "realisticlivestock.lua";

const ARCHIVE_EXTENSION: &str = ".zip";

/// Returns true if the directory entry name looks like the Realistic Livestock mod.
fn looks_like_mod(name: &str) -> bool {
    let n = name.to_lowercase();
    (n.contains("realistic") && n.contains("livestock")) || n.starts_with("fs25_realisticlivestock")
}

fn is_archive(path: &Path) -> bool {
    path.is_file()
        && path
            .to_string_lossy()
            .to_lowercase()
            .ends_with(ARCHIVE_EXTENSION)
}

/// Returns true if the archive entry is the script we are looking for.
fn is_script_entry(name: &str) -> bool {
    let n = name.to_lowercase();
    n == SCRIPT_NAME || n.ends_with(&format!("/{}", SCRIPT_NAME))
}

/// Walks the directory top down collecting every copy of the script.
/// Files of a directory come before the contents of its subdirectories.
fn find_scripts(dir: &Path, out: &mut Vec<PathBuf>) {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(_) => return,
    };
    let mut subdirs = Vec::new();
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            subdirs.push(path);
        } else if entry.file_name().to_string_lossy().to_lowercase() == SCRIPT_NAME {
            out.push(path);
        }
    }
    for subdir in subdirs {
        find_scripts(&subdir, out);
    }
}

/// Reads the first script entry of the archive, if there is one.
fn read_script_from_archive(path: &Path) -> Result<Option<(String, String)>, CountryCodeError> {
    let mut archive = ZipArchive::new(File::open(path)?)?;
    let entry_name = match archive.file_names().find(|n| is_script_entry(n)) {
        Some(name) => name.to_owned(),
        None => return Ok(None),
    };
    let mut entry = archive.by_name(&entry_name)?;
    let mut contents = Vec::with_capacity(entry.size() as usize);
    entry.read_to_end(&mut contents)?;
    Ok(Some((
        entry_name,
        String::from_utf8_lossy(&contents).into_owned(),
    )))
}

/// Loads area codes from the mod, given either as a folder or as a zip archive.
///
/// Within a folder the first script found is used, even if it turns out to
/// hold no codes. Paths that are neither give empty codes.
pub fn load_from_mod_path<P: AsRef<Path>>(path: P) -> AreaCodes {
    let path = path.as_ref();
    if path.is_dir() {
        let mut scripts = Vec::new();
        find_scripts(path, &mut scripts);
        for script in scripts {
            info!("reading RL lua: {}", script.display());
            match fs::read(&script) {
                Ok(bytes) => return parse_area_codes(&String::from_utf8_lossy(&bytes)),
                Err(e) => {
                    warn!("failed to read RL lua: {}", e);
                }
            }
        }
    } else if is_archive(path) {
        match read_script_from_archive(path) {
            Ok(Some((name, source))) => {
                info!("reading RL lua from zip: {} -> {}", path.display(), name);
                return parse_area_codes(&source);
            }
            Ok(None) => {}
            Err(e) => {
                warn!("failed to inspect zip {}: {}", path.display(), e);
            }
        }
    }
    AreaCodes::default()
}

/// Scans the mods directory for the area codes.
///
/// Entries that look like the mod are tried first, then everything else in
/// directory order. If that yields nothing every archive is opened and
/// searched for the script. Returns the codes and every path that was checked.
pub fn scan_mods_dir<P: AsRef<Path>>(mods_dir: P) -> (AreaCodes, Vec<PathBuf>) {
    let mods_dir = mods_dir.as_ref();
    let mut checked = Vec::new();
    let entries: Vec<String> = match fs::read_dir(mods_dir) {
        Ok(entries) => entries
            .flatten()
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .collect(),
        Err(_) => return (AreaCodes::default(), checked),
    };
    let (likely, rest): (Vec<&String>, Vec<&String>) =
        entries.iter().partition(|name| looks_like_mod(name));
    for entry in likely.into_iter().chain(rest) {
        let path = mods_dir.join(entry);
        let codes = load_from_mod_path(&path);
        checked.push(path);
        if !codes.is_empty() {
            return (codes, checked);
        }
    }
    for entry in entries.iter() {
        let path = mods_dir.join(entry);
        if !is_archive(&path) {
            continue;
        }
        checked.push(path.clone());
        if let Ok(Some((_, source))) = read_script_from_archive(&path) {
            let codes = parse_area_codes(&source);
            if !codes.is_empty() {
                return (codes, checked);
            }
        }
    }
    (AreaCodes::default(), checked)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::tempdir;
    use zip::write::{SimpleFileOptions, ZipWriter};

    use super::*;

    const SCRIPT: &str = r#"
        RealisticLivestock.AREA_CODES = {
            [1] = { ["code"] = "GB", ["country"] = "United Kingdom" },
            [2] = { ["code"] = "FR", ["country"] = "France" }
        }
    "#;

    fn write_zip<C: AsRef<[u8]>>(path: &Path, entry: &str, contents: C) {
        let mut zip = ZipWriter::new(File::create(path).unwrap());
        zip.start_file("modDesc.xml", SimpleFileOptions::default())
            .unwrap();
        zip.write_all(b"<modDesc/>").unwrap();
        zip.start_file(entry, SimpleFileOptions::default()).unwrap();
        zip.write_all(contents.as_ref()).unwrap();
        zip.finish().unwrap();
    }

    #[test]
    fn test_looks_like_mod() {
        assert!(looks_like_mod("FS25_RealisticLivestock.zip"));
        assert!(looks_like_mod("my realistic livestock"));
        assert!(!looks_like_mod("FS25_Realistic_Weather"));
    }

    #[test]
    fn test_script_entry() {
        assert!(is_script_entry("RealisticLivestock.lua"));
        assert!(is_script_entry("src/RealisticLivestock.lua"));
        assert!(!is_script_entry("src/NotRealisticLivestock.lua"));
    }

    #[test]
    fn test_load_from_dir() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("scripts").join("core");
        fs::create_dir_all(&nested).unwrap();
        fs::write(nested.join("RealisticLivestock.lua"), SCRIPT).unwrap();
        let codes = load_from_mod_path(dir.path());
        assert_eq!(codes.names.get("2").unwrap(), "France");
        assert_eq!(codes.isos.get("1").unwrap(), "GB");
    }

    /// A script with a byte that isn't valid UTF-8 in a comment.
    const LOSSY_SCRIPT: &[u8] =
        b"-- \xff\nAREA_CODES = { [1] = { [\"country\"] = \"France\" } }";

    #[test]
    fn test_load_lossy_script_from_dir() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("RealisticLivestock.lua"), LOSSY_SCRIPT).unwrap();
        let codes = load_from_mod_path(dir.path());
        assert_eq!(codes.names.get("1").unwrap(), "France");
    }

    #[test]
    fn test_load_lossy_script_from_zip() {
        let dir = tempdir().unwrap();
        let archive = dir.path().join("FS25_RealisticLivestock.zip");
        write_zip(&archive, "scripts/RealisticLivestock.lua", LOSSY_SCRIPT);
        let codes = load_from_mod_path(&archive);
        assert_eq!(codes.names.get("1").unwrap(), "France");
    }

    #[test]
    fn test_load_from_zip() {
        let dir = tempdir().unwrap();
        let archive = dir.path().join("FS25_RealisticLivestock.zip");
        write_zip(&archive, "scripts/RealisticLivestock.lua", SCRIPT);
        let codes = load_from_mod_path(&archive);
        assert_eq!(codes.names.len(), 2);
    }

    #[test]
    fn test_load_from_nonsense() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("notes.txt");
        fs::write(&file, SCRIPT).unwrap();
        assert!(load_from_mod_path(&file).is_empty());
        let broken = dir.path().join("broken.zip");
        fs::write(&broken, b"not a zip").unwrap();
        assert!(load_from_mod_path(&broken).is_empty());
        assert!(load_from_mod_path(dir.path().join("missing")).is_empty());
    }

    #[test]
    fn test_scan_prefers_named_mod() {
        let dir = tempdir().unwrap();
        write_zip(
            &dir.path().join("AAA_Other.zip"),
            "RealisticLivestock.lua",
            r#"AREA_CODES = { [1] = { ["country"] = "Decoy" } }"#,
        );
        write_zip(
            &dir.path().join("FS25_RealisticLivestock.zip"),
            "scripts/RealisticLivestock.lua",
            SCRIPT,
        );
        let (codes, checked) = scan_mods_dir(dir.path());
        assert_eq!(codes.names.get("1").unwrap(), "United Kingdom");
        assert_eq!(checked.len(), 1);
    }

    #[test]
    fn test_scan_falls_back_to_any_archive() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("FS25_SomethingElse")).unwrap();
        write_zip(
            &dir.path().join("bundle.zip"),
            "mods/livestock/RealisticLivestock.lua",
            SCRIPT,
        );
        let (codes, checked) = scan_mods_dir(dir.path());
        assert_eq!(codes.names.len(), 2);
        assert!(!checked.is_empty());
    }

    #[test]
    fn test_scan_nothing() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("readme.txt"), "hello").unwrap();
        let (codes, checked) = scan_mods_dir(dir.path());
        assert!(codes.is_empty());
        assert_eq!(checked.len(), 1);
        let (codes, checked) = scan_mods_dir(dir.path().join("missing"));
        assert!(codes.is_empty());
        assert!(checked.is_empty());
    }
}
