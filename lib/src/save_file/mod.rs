/// Raw value readers over a single document node
mod fields;

/// Record construction, walking husbandries down to unborn animals
mod builder;
pub use builder::{Extraction, RecordFilter};

/// Document I/O and facade
mod save_file;
pub use save_file::{SaveFile, SaveFileError, PLACEABLES_FILE};
