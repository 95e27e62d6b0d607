use chrono::NaiveDate;

use super::{
    super::{
        country_codes::Country,
        derived::format_date,
        types::{text, GameString},
    },
    Column,
    ColumnKind::{Date, Float, Int, Text},
    Genetics, Table,
};

/// One unborn animal, carried by a pregnant [IndividualRecord](super::IndividualRecord).
///
/// The location, pregnancy and nativity fields are copies of the mother's,
/// so that the fetus table stands on its own.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct FetusRecord {
    pub mother_unique_id: Option<GameString>,
    pub current_shed: GameString,
    pub shed_type: Option<GameString>,
    pub species: Option<&'static str>,
    pub mother_breed: Option<GameString>,
    /// Position among its siblings, starting at 1
    pub index: usize,
    pub sex: Option<GameString>,
    pub breed: Option<GameString>,
    pub health: Option<GameString>,
    pub genetics: Genetics,
    /// The due date of the mother's pregnancy
    pub due_date: Option<NaiveDate>,
    pub preg_day: Option<GameString>,
    pub preg_month: Option<GameString>,
    pub preg_year: Option<GameString>,
    pub preg_duration: Option<GameString>,
    pub farm_id: Option<GameString>,
    pub country: Country,
}

impl Table for FetusRecord {
    const COLUMNS: &'static [Column] = &[
        Column::new("mother_unique_id", Int),
        Column::new("current_shed", Text),
        Column::new("shed_type", Text),
        Column::new("species", Text),
        Column::new("mother_breed", Text),
        Column::new("fetus_index", Int),
        Column::new("sex", Text),
        Column::new("breed", Text),
        Column::new("health", Float),
        Column::new("gen_metabolism", Float),
        Column::new("gen_quality", Float),
        Column::new("gen_health", Float),
        Column::new("gen_fertility", Float),
        Column::new("gen_productivity", Float),
        Column::new("due_date", Date),
        Column::new("preg_day", Int),
        Column::new("preg_month", Int),
        Column::new("preg_year", Int),
        Column::new("preg_duration", Int),
        Column::new("FarmID", Int),
        Column::new("country", Int),
        Column::new("country_name", Text),
        Column::new("country_iso", Text),
    ];

    fn fields(&self) -> Vec<String> {
        let mut row = vec![
            text(&self.mother_unique_id),
            self.current_shed.to_string(),
            text(&self.shed_type),
            text(&self.species),
            text(&self.mother_breed),
            self.index.to_string(),
            text(&self.sex),
            text(&self.breed),
            text(&self.health),
        ];
        row.extend(self.genetics.scores().into_iter().map(text));
        row.extend([
            self.due_date.as_ref().map_or_else(String::new, format_date),
            text(&self.preg_day),
            text(&self.preg_month),
            text(&self.preg_year),
            text(&self.preg_duration),
            text(&self.farm_id),
            text(&self.country.code),
            text(&self.country.name),
            text(&self.country.iso),
        ]);
        row
    }
}

#[cfg(test)]
mod tests {
    use super::{super::Cell, *};

    #[test]
    fn test_row() {
        let fetus = FetusRecord {
            mother_unique_id: Some("77".into()),
            current_shed: "pigStable.xml".into(),
            shed_type: None,
            species: Some("pigs"),
            mother_breed: Some("LANDRACE".into()),
            index: 3,
            sex: Some("male".into()),
            breed: Some("LANDRACE".into()),
            health: None,
            genetics: Genetics::default(),
            due_date: NaiveDate::from_ymd_opt(1850, 2, 1),
            preg_day: Some("1".into()),
            preg_month: Some("1".into()),
            preg_year: Some("1850".into()),
            preg_duration: Some("31".into()),
            farm_id: Some("2".into()),
            country: Country {
                code: Some("5".into()),
                name: Some("Unknown (5)".into()),
                iso: None,
            },
        };
        let row = fetus.fields();
        assert_eq!(row.len(), FetusRecord::COLUMNS.len());
        assert_eq!(row[5], "3");
        assert_eq!(row[14], "1850-02-01");
        assert_eq!(row[21], "Unknown (5)");
        let cells = fetus.cells();
        assert_eq!(cells[0], Cell::Int(77));
        assert_eq!(cells[8], Cell::Empty);
        // too early for a spreadsheet date
        assert_eq!(cells[14], Cell::Text("1850-02-01".into()));
    }
}
