use std::sync::LazyLock;

use regex::Regex;

use super::super::types::HashMap;

/// The table in the mod's script that holds the area codes.
const AREA_CODES_HEADER: &str = "AREA_CODES";

/// One `[index] = { ... }` entry of the table. Stops at the first closing brace.
static ENTRY_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?s)\[\s*(\d+)\s*\]\s*=\s*\{(.*?)\}"#).unwrap());

static ISO_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\["code"\]\s*=\s*"([^"]*)""#).unwrap());

static NAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\["country"\]\s*=\s*"([^"]*)""#).unwrap());

/// The mappings parsed out of an area code table.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct AreaCodes {
    /// code to country name
    pub names: HashMap<String, String>,
    /// code to ISO abbreviation
    pub isos: HashMap<String, String>,
}

impl AreaCodes {
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Finds the body of the first brace delimited table that follows the header.
/// Returns [None] if the header is missing or the braces never balance out.
fn brace_body<'a>(text: &'a str, header: &str) -> Option<&'a str> {
    let start = text.find(header)?;
    let open = start + text[start..].find('{')?;
    let mut depth: usize = 0;
    for (i, c) in text[open..].char_indices() {
        match c {
            '{' => {
                depth += 1;
            }
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[open + 1..open + i]);
                }
            }
            _ => {}
        }
    }
    None
}

/// Parses the area codes table out of the mod's script source.
/// Anything that doesn't look like the expected table is silently skipped.
pub fn parse_area_codes(source: &str) -> AreaCodes {
    let mut codes = AreaCodes::default();
    let body = match brace_body(source, AREA_CODES_HEADER) {
        Some(body) if !body.is_empty() => body,
        _ => return codes,
    };
    for entry in ENTRY_PATTERN.captures_iter(body) {
        let index = &entry[1];
        let contents = &entry[2];
        if let Some(name) = NAME_PATTERN.captures(contents) {
            codes.names.insert(index.to_owned(), name[1].to_owned());
        }
        if let Some(iso) = ISO_PATTERN.captures(contents) {
            codes.isos.insert(index.to_owned(), iso[1].to_owned());
        }
    }
    codes
}
