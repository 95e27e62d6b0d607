use derive_more::{Display, Error, From};
use log::{error, info};
use roxmltree::Document;
use std::{
    fmt::Debug,
    fs::File,
    io::{self, Read},
    path::{Path, PathBuf},
    str,
};

use super::{
    super::country_codes::CountryCodes,
    builder::{build, Extraction, RecordFilter},
};

/// The name of the document holding the husbandries of a save.
pub const PLACEABLES_FILE: &str = "placeables.xml";

const BYTE_ORDER_MARK: &[u8; 3] = b"\xef\xbb\xbf";

/// An error that can occur when opening a save.
/// Generally things that are the fault of the user, however unintentional those may be
#[derive(Debug, From, Display, Error)]
pub enum SaveFileError {
    /// The save folder has no placeables document.
    #[display("{} not found at: {}", PLACEABLES_FILE, _0.display())]
    MissingFile(#[error(not(source))] PathBuf),
    /// Something went wrong with stdlib IO.
    IoError(io::Error),
}

/// A struct that represents the placeables document of a save.
/// It is just a wrapper around the raw contents of the document, decoding
/// and parsing happen in [SaveFile::extract].
pub struct SaveFile {
    contents: Vec<u8>,
    /// Where the contents came from, for diagnostics
    origin: Option<PathBuf>,
}

impl SaveFile {
    /// Open the placeables document of a save folder.
    /// Internally uses [File::open] to open the file and then [SaveFile::read] to read the contents.
    pub fn open<P: AsRef<Path>>(save_dir: P) -> Result<SaveFile, SaveFileError> {
        let path = save_dir.as_ref().join(PLACEABLES_FILE);
        if !path.is_file() {
            return Err(SaveFileError::MissingFile(path));
        }
        let mut file = File::open(&path)?;
        let metadata = file.metadata()?;
        let mut save = SaveFile::read(&mut file, Some(metadata.len() as usize))?;
        save.origin = Some(path);
        Ok(save)
    }

    /// Reads a placeables document from any reader.
    pub fn read<F: Read>(
        file: &mut F,
        contents_size: Option<usize>,
    ) -> Result<SaveFile, SaveFileError> {
        let mut contents = if let Some(size) = contents_size {
            Vec::with_capacity(size)
        } else {
            Vec::new()
        };
        file.read_to_end(&mut contents)?;
        Ok(SaveFile {
            contents,
            origin: None,
        })
    }

    fn origin(&self) -> String {
        self.origin
            .as_ref()
            .map_or_else(|| PLACEABLES_FILE.to_owned(), |p| p.display().to_string())
    }

    /// Walks the document and builds the animal and fetus records.
    ///
    /// The contents must be UTF-8, a leading byte order mark is dropped.
    /// A document that can't be decoded or isn't well formed XML yields no
    /// records, the problem is logged and the caller carries on.
    pub fn extract(&self, codes: &CountryCodes, filter: &RecordFilter) -> Extraction {
        let bytes = self
            .contents
            .strip_prefix(BYTE_ORDER_MARK.as_slice())
            .unwrap_or(self.contents.as_slice());
        let text = match str::from_utf8(bytes) {
            Ok(text) => text,
            Err(e) => {
                error!("Failed to decode {}: {}", self.origin(), e);
                return Extraction::default();
            }
        };
        let document = match Document::parse(text) {
            Ok(document) => document,
            Err(e) => {
                error!("Failed to parse {}: {}", self.origin(), e);
                return Extraction::default();
            }
        };
        let extraction = build(document.root_element(), codes, filter);
        info!(
            "parsed: animals={}, fetuses={}",
            extraction.individuals.len(),
            extraction.fetuses.len()
        );
        extraction
    }
}
