mod individual;
pub use individual::{Birthday, IndividualRecord, Pregnancy};

mod fetus;
pub use fetus::FetusRecord;

mod summary;
pub use summary::{summarize, SummaryRecord};

use chrono::{Datelike, NaiveDate};

use super::{derived::parse_float, types::GameString};

/// The first year a spreadsheet can hold as a real date.
const FIRST_DATE_YEAR: i32 = 1900;

/// How the values of a column should be typed once they leave the text world.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Text,
    Int,
    Float,
    Date,
}

impl ColumnKind {
    /// Casts a rendered value into a typed [Cell].
    /// Values that don't fit the column become [Cell::Empty], except dates
    /// which fall back to text.
    pub fn cast(self, value: &str) -> Cell {
        if value.is_empty() {
            return Cell::Empty;
        }
        match self {
            ColumnKind::Text => Cell::Text(value.into()),
            ColumnKind::Int => parse_float(value)
                .map(f64::round_ties_even)
                .filter(|v| v.is_finite() && v.abs() < i64::MAX as f64)
                .map_or(Cell::Empty, |v| Cell::Int(v as i64)),
            ColumnKind::Float => parse_float(value).map_or(Cell::Empty, Cell::Float),
            ColumnKind::Date => match NaiveDate::parse_from_str(value, "%Y-%m-%d") {
                Ok(date) if date.year() >= FIRST_DATE_YEAR => Cell::Date(date),
                _ => Cell::Text(value.into()),
            },
        }
    }
}

/// A column of one of the output tables.
#[derive(Debug, Clone, Copy)]
pub struct Column {
    pub name: &'static str,
    pub kind: ColumnKind,
}

impl Column {
    pub(crate) const fn new(name: &'static str, kind: ColumnKind) -> Self {
        Column { name, kind }
    }
}

/// A typed table cell, what a spreadsheet writer wants to see.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum Cell {
    Empty,
    Int(i64),
    Float(f64),
    Date(NaiveDate),
    Text(GameString),
}

/// A record that is a row of one of the output tables.
///
/// Every row has exactly one value per column, absent values render as
/// empty strings.
pub trait Table {
    /// The columns of the table, in output order.
    const COLUMNS: &'static [Column];

    /// Renders the row as text, one value per column.
    fn fields(&self) -> Vec<String>;

    /// The names of the columns.
    fn header() -> Vec<&'static str> {
        Self::COLUMNS.iter().map(|c| c.name).collect()
    }

    /// Renders the row as typed cells.
    fn cells(&self) -> Vec<Cell> {
        Self::COLUMNS
            .iter()
            .zip(self.fields())
            .map(|(column, value)| column.kind.cast(&value))
            .collect()
    }
}

/// The five genetic trait scores of an animal or a fetus.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Genetics {
    pub metabolism: Option<GameString>,
    pub quality: Option<GameString>,
    pub health: Option<GameString>,
    pub fertility: Option<GameString>,
    pub productivity: Option<GameString>,
}

impl Genetics {
    /// The scores in column order.
    pub fn scores(&self) -> [&Option<GameString>; 5] {
        [
            &self.metabolism,
            &self.quality,
            &self.health,
            &self.fertility,
            &self.productivity,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cast_numbers() {
        assert_eq!(ColumnKind::Int.cast("12"), Cell::Int(12));
        assert_eq!(ColumnKind::Int.cast("2.5"), Cell::Int(2));
        assert_eq!(ColumnKind::Int.cast("3.5"), Cell::Int(4));
        assert_eq!(ColumnKind::Int.cast("many"), Cell::Empty);
        assert_eq!(ColumnKind::Float.cast("0.75"), Cell::Float(0.75));
        assert_eq!(ColumnKind::Float.cast(""), Cell::Empty);
    }

    #[test]
    fn test_cast_dates() {
        assert_eq!(
            ColumnKind::Date.cast("2025-05-14"),
            Cell::Date(NaiveDate::from_ymd_opt(2025, 5, 14).unwrap())
        );
        assert_eq!(
            ColumnKind::Date.cast("1899-12-31"),
            Cell::Text("1899-12-31".into())
        );
        assert_eq!(ColumnKind::Date.cast("soon"), Cell::Text("soon".into()));
    }

    #[test]
    fn test_cast_text() {
        assert_eq!(ColumnKind::Text.cast("COW_ANGUS"), Cell::Text("COW_ANGUS".into()));
        assert_eq!(ColumnKind::Text.cast(""), Cell::Empty);
    }
}
