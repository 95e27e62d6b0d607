/// Keywords that hint at a species, in the order they are tried.
/// The first keyword found anywhere inside a signal decides the species.
const SPECIES_KEYS: [(&str, &str); 17] = [
    ("cow", "cows"),
    ("cattle", "cows"),
    ("beef", "cows"),
    ("sheep", "sheep"),
    ("lamb", "sheep"),
    ("ovine", "sheep"),
    ("pig", "pigs"),
    ("hog", "pigs"),
    ("swine", "pigs"),
    ("porcine", "pigs"),
    ("chicken", "chickens"),
    ("hen", "chickens"),
    ("poultry", "chickens"),
    ("goat", "goats"),
    ("caprine", "goats"),
    ("horse", "horses"),
    ("equine", "horses"),
];

/// Finds the species the signal mentions, if any.
fn match_signal(signal: &str) -> Option<&'static str> {
    let lower = signal.to_lowercase();
    SPECIES_KEYS
        .iter()
        .find(|(key, _)| lower.contains(key))
        .map(|(_, species)| *species)
}

/// Returns true if the word is one of the species tags we produce.
fn is_canonical(word: &str) -> bool {
    SPECIES_KEYS.iter().any(|(_, species)| *species == word)
}

/// Infers the species of an animal.
///
/// The animal's own type attribute is the strongest signal, followed by the
/// type of the shed it lives in, and finally the file the shed was built from.
/// The first signal that mentions a known keyword wins.
pub fn classify(
    animal_type: Option<&str>,
    shed_type: Option<&str>,
    shed_file: Option<&str>,
) -> Option<&'static str> {
    [animal_type, shed_type, shed_file]
        .into_iter()
        .flatten()
        .find_map(match_signal)
}

/// Turns a comma separated list of species provided by the user into species tags.
///
/// Synonyms are mapped onto their tag, unknown words are kept as they are.
/// Duplicates are removed, keeping the order in which they first appeared.
pub fn normalize_species_list(input: &str) -> Vec<String> {
    let mut res: Vec<String> = Vec::new();
    for raw in input.split(',') {
        let word = raw.trim().to_lowercase();
        if word.is_empty() {
            continue;
        }
        let species = if is_canonical(&word) {
            word
        } else {
            SPECIES_KEYS
                .iter()
                .find(|(key, _)| *key == word)
                .map_or(word, |(_, species)| (*species).to_owned())
        };
        if !res.contains(&species) {
            res.push(species);
        }
    }
    res
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_animal_type_first() {
        assert_eq!(
            classify(Some("SHEEP_BLACK"), Some("cowBarn"), Some("pigStable.xml")),
            Some("sheep")
        );
    }

    #[test]
    fn test_fallthrough() {
        assert_eq!(classify(None, Some("Cow Barn"), None), Some("cows"));
        assert_eq!(classify(Some("ALPACA"), None, Some("pigStable.xml")), Some("pigs"));
        assert_eq!(
            classify(None, None, Some("$data/placeables/chickenCoop.xml")),
            Some("chickens")
        );
        assert_eq!(classify(Some("alpaca"), Some("barn"), Some("shed.xml")), None);
        assert_eq!(classify(None, None, None), None);
    }

    #[test]
    fn test_table_order() {
        // "hen" hides inside "chicken", but cattle keywords come first
        assert_eq!(classify(Some("beef_chicken"), None, None), Some("cows"));
        assert_eq!(classify(Some("warthog"), None, None), Some("pigs"));
    }

    #[test]
    fn test_normalize() {
        assert_eq!(
            normalize_species_list(" Cow, sheep,,cattle ,llama,PIGS"),
            vec!["cows", "sheep", "llama", "pigs"]
        );
        assert!(normalize_species_list(" , ").is_empty());
    }
}
