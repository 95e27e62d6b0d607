use std::{
    fs, io,
    path::{Path, PathBuf},
};

use livestock_extractor_lib::save_file::PLACEABLES_FILE;

/// The prefix of every save folder the game creates.
const SAVE_PREFIX: &str = "savegame";

/// Lists the save folders directly under the game folder, sorted by name.
/// Only folders that hold a placeables document count.
pub fn list_saves<P: AsRef<Path>>(game_root: P) -> io::Result<Vec<PathBuf>> {
    let mut saves = Vec::new();
    for entry in fs::read_dir(game_root)? {
        let entry = entry?;
        let name = entry.file_name();
        if !name.to_string_lossy().to_lowercase().starts_with(SAVE_PREFIX) {
            continue;
        }
        let path = entry.path();
        if path.is_dir() && path.join(PLACEABLES_FILE).is_file() {
            saves.push(path);
        }
    }
    saves.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(saves)
}

/// Turns the save argument into a folder. An existing folder is taken as is,
/// anything else is looked up under the game folder.
pub fn resolve_save_dir<P: AsRef<Path>>(save: &str, game_root: P) -> PathBuf {
    let candidate = PathBuf::from(save);
    if candidate.is_dir() {
        candidate
    } else {
        game_root.as_ref().join(save)
    }
}

/// The name of a save folder, used to name the files exported from it.
pub fn save_name<P: AsRef<Path>>(save_dir: P) -> String {
    let save_dir = save_dir.as_ref();
    let absolute = fs::canonicalize(save_dir).unwrap_or_else(|_| save_dir.to_path_buf());
    absolute
        .file_name()
        .map_or_else(String::new, |n| n.to_string_lossy().into_owned())
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    fn make_save(root: &Path, name: &str, with_document: bool) -> PathBuf {
        let dir = root.join(name);
        fs::create_dir(&dir).unwrap();
        if with_document {
            fs::write(dir.join(PLACEABLES_FILE), "<placeables/>").unwrap();
        }
        dir
    }

    #[test]
    fn test_list_saves() {
        let root = tempdir().unwrap();
        make_save(root.path(), "savegame2", true);
        make_save(root.path(), "savegame10", true);
        make_save(root.path(), "SaveGame1", true);
        make_save(root.path(), "savegame3", false);
        make_save(root.path(), "backup", true);
        fs::write(root.path().join("savegame4"), "not a folder").unwrap();
        let names: Vec<String> = list_saves(root.path())
            .unwrap()
            .iter()
            .map(save_name)
            .collect();
        assert_eq!(names, vec!["SaveGame1", "savegame10", "savegame2"]);
    }

    #[test]
    fn test_resolve_save_dir() {
        let root = tempdir().unwrap();
        let save = make_save(root.path(), "savegame1", true);
        let by_path = resolve_save_dir(save.to_str().unwrap(), "/elsewhere");
        assert_eq!(by_path, save);
        let by_name = resolve_save_dir("savegame7", root.path());
        assert_eq!(by_name, root.path().join("savegame7"));
    }

    #[test]
    fn test_save_name() {
        let root = tempdir().unwrap();
        let save = make_save(root.path(), "savegame5", false);
        assert_eq!(save_name(save.join(".")), "savegame5");
        assert_eq!(save_name(root.path().join("missing")), "missing");
    }
}
