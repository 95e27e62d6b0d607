use std::{
    env, fs,
    path::{Path, PathBuf},
};

use log::{info, warn};
use roxmltree::{Document, Node};

use super::super::derived::is_truthy;

const SETTINGS_FILE: &str = "gameSettings.xml";

const DEFAULT_MODS_DIR: &str = "mods";

const OVERRIDE_TAG: &str = "modsDirectoryOverride";

/// Expands any `$VAR` or `${VAR}` in the path, then a leading `~`.
/// Unknown variables are left untouched.
fn expand_path(input: &str) -> String {
    expand_home(&expand_vars(input))
}

fn expand_home(input: &str) -> String {
    if let Some(stripped) = input.strip_prefix('~') {
        if stripped.is_empty() || stripped.starts_with(['/', '\\']) {
            if let Ok(home) = env::var("HOME").or_else(|_| env::var("USERPROFILE")) {
                return format!("{}{}", home, stripped);
            }
        }
    }
    input.to_owned()
}

fn expand_vars(input: &str) -> String {
    let mut res = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '$' {
            res.push(c);
            continue;
        }
        let braced = chars.peek() == Some(&'{');
        if braced {
            chars.next();
        }
        let mut name = String::new();
        while let Some(&n) = chars.peek() {
            if n.is_ascii_alphanumeric() || n == '_' {
                name.push(n);
                chars.next();
            } else {
                break;
            }
        }
        let closed = !braced || chars.peek() == Some(&'}');
        if braced && closed {
            chars.next();
        }
        let value = if !name.is_empty() && closed {
            env::var(&name).ok()
        } else {
            None
        };
        match value {
            Some(value) => res.push_str(&value),
            None => {
                res.push('$');
                if braced {
                    res.push('{');
                }
                res.push_str(&name);
                if braced && closed {
                    res.push('}');
                }
            }
        }
    }
    res
}

fn find_override<'a, 'input>(root: Node<'a, 'input>) -> Option<Node<'a, 'input>> {
    root.children()
        .find(|n| n.has_tag_name(OVERRIDE_TAG))
        .or_else(|| {
            root.children().filter(|n| n.is_element()).find(|n| {
                n.tag_name()
                    .name()
                    .eq_ignore_ascii_case(OVERRIDE_TAG)
            })
        })
}

/// Finds the mods directory of the game installed at `game_root`.
///
/// The game keeps an optional override in `gameSettings.xml`, which is
/// honoured when it is active and names a directory. Otherwise the mods
/// live in the `mods` folder of the game root.
pub fn find_mods_dir<P: AsRef<Path>>(game_root: P) -> PathBuf {
    let game_root = game_root.as_ref();
    let settings_path = game_root.join(SETTINGS_FILE);
    let default_dir = game_root.join(DEFAULT_MODS_DIR);
    if !settings_path.is_file() {
        info!(
            "{} not found; using default mods dir: {}",
            SETTINGS_FILE,
            default_dir.display()
        );
        return default_dir;
    }
    let contents = match fs::read(&settings_path) {
        Ok(contents) => String::from_utf8_lossy(&contents).into_owned(),
        Err(e) => {
            warn!("could not read {}: {}", SETTINGS_FILE, e);
            return default_dir;
        }
    };
    let doc = match Document::parse(contents.trim_start_matches('\u{feff}')) {
        Ok(doc) => doc,
        Err(e) => {
            warn!("could not parse {}: {}", SETTINGS_FILE, e);
            return default_dir;
        }
    };
    let node = match find_override(doc.root_element()) {
        Some(node) => node,
        None => {
            info!(
                "{} not present; using default mods dir: {}",
                OVERRIDE_TAG,
                default_dir.display()
            );
            return default_dir;
        }
    };
    let active = node.attribute("active").unwrap_or("");
    let directory = match node.attribute("directory") {
        Some(d) if !d.is_empty() => d.to_owned(),
        _ => node
            .children()
            .find(|n| n.has_tag_name("directory"))
            .and_then(|n| n.text())
            .map(|t| t.trim().to_owned())
            .unwrap_or_default(),
    };
    if is_truthy(active) && !directory.is_empty() {
        let directory = PathBuf::from(expand_path(&directory));
        info!("{} active -> {}", OVERRIDE_TAG, directory.display());
        return directory;
    }
    info!(
        "{} inactive; using default mods dir: {}",
        OVERRIDE_TAG,
        default_dir.display()
    );
    default_dir
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn test_expand_path() {
        env::set_var("LIVESTOCK_TEST_MODS", "/games/mods");
        assert_eq!(expand_path("$LIVESTOCK_TEST_MODS/fs25"), "/games/mods/fs25");
        assert_eq!(expand_path("${LIVESTOCK_TEST_MODS}x"), "/games/modsx");
        assert_eq!(
            expand_path("$LIVESTOCK_TEST_UNSET_VARIABLE/a"),
            "$LIVESTOCK_TEST_UNSET_VARIABLE/a"
        );
        assert_eq!(expand_path("plain/path"), "plain/path");
        assert_eq!(expand_path("cost$"), "cost$");
    }

    #[test]
    fn test_expand_path_variable_holding_home() {
        env::set_var("LIVESTOCK_TEST_HOME_MODS", "~/fs25");
        let expanded = expand_path("$LIVESTOCK_TEST_HOME_MODS/mods");
        assert_eq!(expanded, expand_path("~/fs25/mods"));
        if let Ok(home) = env::var("HOME") {
            assert_eq!(expanded, format!("{}/fs25/mods", home));
        }
    }

    #[test]
    fn test_no_settings() {
        let dir = tempdir().unwrap();
        assert_eq!(find_mods_dir(dir.path()), dir.path().join("mods"));
    }

    #[test]
    fn test_active_override() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("gameSettings.xml"),
            r#"<?xml version="1.0" encoding="utf-8" standalone="no"?>
            <gameSettings revision="1">
                <modsDirectoryOverride active="true" directory="/data/fs25/mods"/>
            </gameSettings>"#,
        )
        .unwrap();
        assert_eq!(find_mods_dir(dir.path()), PathBuf::from("/data/fs25/mods"));
    }

    #[test]
    fn test_override_child_and_case() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("gameSettings.xml"),
            r#"<gameSettings>
                <ModsDirectoryOverride active="1">
                    <directory> /srv/mods </directory>
                </ModsDirectoryOverride>
            </gameSettings>"#,
        )
        .unwrap();
        assert_eq!(find_mods_dir(dir.path()), PathBuf::from("/srv/mods"));
    }

    #[test]
    fn test_inactive_or_broken() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("gameSettings.xml"),
            r#"<gameSettings><modsDirectoryOverride active="false" directory="/x"/></gameSettings>"#,
        )
        .unwrap();
        assert_eq!(find_mods_dir(dir.path()), dir.path().join("mods"));
        fs::write(dir.path().join("gameSettings.xml"), "<gameSettings>").unwrap();
        assert_eq!(find_mods_dir(dir.path()), dir.path().join("mods"));
    }
}
