use std::{
    fs, io,
    path::{Path, PathBuf, MAIN_SEPARATOR},
};

use csv::{Terminator, WriterBuilder};
use derive_more::{Display, Error, From};
use serde::Serialize;

use livestock_extractor_lib::{
    save_file::Extraction,
    structures::{Cell, FetusRecord, IndividualRecord, SummaryRecord, Table},
};

const ANIMALS_FILE: &str = "livestock.csv";
const SUMMARY_FILE: &str = "livestock_summary.csv";
const JSON_EXTENSION: &str = "json";

/// An error that occurred while writing the exported tables.
#[derive(Debug, From, Display, Error)]
pub enum ExportError {
    /// Something went wrong with stdlib IO.
    IoError(io::Error),
    /// The CSV writer failed
    CsvError(csv::Error),
    /// The JSON serializer failed
    JsonError(serde_json::Error),
}

/// Creates the folder a file is going to be written to.
fn ensure_parent(path: &Path) -> io::Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => fs::create_dir_all(parent),
        _ => Ok(()),
    }
}

/// Writes a table as CSV, header first.
pub fn write_csv<T: Table>(path: &Path, rows: &[T]) -> Result<(), ExportError> {
    ensure_parent(path)?;
    let mut writer = WriterBuilder::new()
        .terminator(Terminator::CRLF)
        .from_path(path)?;
    writer.write_record(T::header())?;
    for row in rows {
        writer.write_record(row.fields())?;
    }
    writer.flush()?;
    Ok(())
}

/// One table of the JSON dump, with typed cells.
#[derive(Serialize)]
struct Sheet {
    columns: Vec<&'static str>,
    rows: Vec<Vec<Cell>>,
}

impl Sheet {
    fn new<T: Table>(rows: &[T]) -> Self {
        Sheet {
            columns: T::header(),
            rows: rows.iter().map(|r| r.cells()).collect(),
        }
    }
}

#[derive(Serialize)]
struct Dump {
    #[serde(rename = "Animals")]
    animals: Sheet,
    #[serde(rename = "Fetuses")]
    fetuses: Sheet,
    #[serde(rename = "Summary")]
    summary: Sheet,
}

/// Writes the three tables into a single JSON document.
pub fn write_json(
    path: &Path,
    extraction: &Extraction,
    summary: &[SummaryRecord],
) -> Result<(), ExportError> {
    ensure_parent(path)?;
    let dump = Dump {
        animals: Sheet::new::<IndividualRecord>(&extraction.individuals),
        fetuses: Sheet::new::<FetusRecord>(&extraction.fetuses),
        summary: Sheet::new(summary),
    };
    let json = serde_json::to_string_pretty(&dump)?;
    fs::write(path, json)?;
    Ok(())
}

/// Where the tables of one save end up.
#[derive(Debug, PartialEq)]
pub enum Targets {
    Csv {
        animals: PathBuf,
        fetuses: PathBuf,
        summary: PathBuf,
    },
    Json(PathBuf),
}

impl Targets {
    /// Writes the tables to their destinations, returning the written paths.
    pub fn write(
        &self,
        extraction: &Extraction,
        summary: &[SummaryRecord],
    ) -> Result<Vec<&Path>, ExportError> {
        match self {
            Targets::Csv {
                animals,
                fetuses,
                summary: summary_path,
            } => {
                write_csv(animals, &extraction.individuals)?;
                write_csv(fetuses, &extraction.fetuses)?;
                write_csv(summary_path, summary)?;
                Ok(vec![animals.as_path(), fetuses.as_path(), summary_path.as_path()])
            }
            Targets::Json(path) => {
                write_json(path, extraction, summary)?;
                Ok(vec![path.as_path()])
            }
        }
    }
}

/// The path of the fetus table that accompanies an animals table.
fn fetuses_path(animals: &Path) -> PathBuf {
    let stem = animals
        .file_stem()
        .map_or_else(String::new, |s| s.to_string_lossy().into_owned());
    animals.with_file_name(format!("{}_fetuses.csv", stem))
}

/// Returns true if the user meant the path as a folder.
fn is_dir_like(path: &Path) -> bool {
    path.is_dir() || path.to_string_lossy().ends_with(['/', MAIN_SEPARATOR])
}

/// How the user asked for the output to be laid out.
#[derive(Debug, Default, Clone)]
pub struct OutputOptions {
    pub out: Option<PathBuf>,
    pub summary_out: Option<PathBuf>,
    /// Present if a JSON dump was requested, with an optional destination
    pub json: Option<Option<PathBuf>>,
    /// Every save is being exported, so the paths name folders
    pub batch: bool,
}

impl OutputOptions {
    /// Resolves the destinations for one save.
    pub fn targets(&self, save_dir: &Path, save_name: &str) -> Targets {
        if let Some(json) = &self.json {
            let default_name = format!("{}_livestock.{}", save_name, JSON_EXTENSION);
            return Targets::Json(match json {
                None => save_dir.join(default_name),
                Some(path) if is_dir_like(path) => path.join(default_name),
                Some(path) if self.batch => {
                    if path.extension().is_some_and(|e| e == JSON_EXTENSION) {
                        let file = path
                            .file_name()
                            .map_or_else(String::new, |f| f.to_string_lossy().into_owned());
                        path.with_file_name(format!("{}_{}", save_name, file))
                    } else {
                        path.join(default_name)
                    }
                }
                Some(path) => path.clone(),
            });
        }
        let animals = match (&self.out, self.batch) {
            (Some(out), true) => out.join(format!("{}_{}", save_name, ANIMALS_FILE)),
            (Some(out), false) => out.clone(),
            (None, _) => save_dir.join(ANIMALS_FILE),
        };
        let summary = match (&self.summary_out, self.batch) {
            (Some(out), true) => out.join(format!("{}_{}", save_name, SUMMARY_FILE)),
            (Some(out), false) => out.clone(),
            (None, _) => save_dir.join(SUMMARY_FILE),
        };
        Targets::Csv {
            fetuses: fetuses_path(&animals),
            animals,
            summary,
        }
    }
}
