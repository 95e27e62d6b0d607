/// Placeables document reader. Wrapper over the record construction and
/// [structures].
///
/// ## Getting Started
///
/// The facade for the entire module is the [save_file::SaveFile] struct.
/// Opening a save folder reads its placeables document, which can then be
/// [extracted](save_file::SaveFile::extract) into animal and fetus records.
///
/// ## Example
///
/// ```rust
/// use livestock_extractor_lib::{
///     country_codes::CountryCodeLoader,
///     save_file::{RecordFilter, SaveFile},
///     structures::summarize,
/// };
///
/// if let Ok(save_file) = SaveFile::open("/path/to/savegame1/") {
///     let codes = CountryCodeLoader::new().with_game_root(".").load();
///     let extraction = save_file.extract(&codes, &RecordFilter::default());
///     let summary = summarize(&extraction.individuals);
/// }
/// ```
pub mod save_file;

/// Resolution of the area codes stored in birthdays into country names.
/// The codes are read from the Realistic Livestock mod, or provided by the user.
pub mod country_codes;

/// The records and their table layouts
pub mod structures;

/// Species inference from the hints a save leaves behind
pub mod species;

/// Values computed from the raw fields of a record
pub mod derived;

/// Types used across the crate
pub mod types;
