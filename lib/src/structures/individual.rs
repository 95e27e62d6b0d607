use std::iter;

use chrono::NaiveDate;

use super::{
    super::{
        country_codes::Country,
        derived::{age_days, age_years, format_date, format_decimal},
        types::{text, GameString},
    },
    Column,
    ColumnKind::{Date, Float, Int, Text},
    Genetics, Table,
};

/// The birth date and place of an animal.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Birthday {
    pub day: Option<GameString>,
    pub month: Option<GameString>,
    pub year: Option<GameString>,
    pub country: Country,
}

/// The ongoing pregnancy of an animal.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Pregnancy {
    pub day: Option<GameString>,
    pub month: Option<GameString>,
    pub year: Option<GameString>,
    /// In days
    pub duration: Option<GameString>,
    /// The start date plus the duration
    pub due_date: Option<NaiveDate>,
    pub fetus_count: usize,
}

/// One living animal, as found in a husbandry.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct IndividualRecord {
    /// The id of the placeable the animal lives in
    pub placeable_id: Option<GameString>,
    /// The name of the shed, derived from its file name
    pub current_shed: GameString,
    pub shed_type: Option<GameString>,
    pub species: Option<&'static str>,
    pub breed: Option<GameString>,
    pub farm_id: Option<GameString>,
    pub unique_id: Option<GameString>,
    pub name: Option<GameString>,
    pub sex: Option<GameString>,
    /// In months
    pub age: Option<GameString>,
    pub weight: Option<GameString>,
    pub health: Option<GameString>,
    pub genetics: Genetics,
    pub birthday: Option<Birthday>,
    pub is_parent: Option<GameString>,
    pub is_pregnant: Option<GameString>,
    pub pregnancy: Option<Pregnancy>,
}

impl IndividualRecord {
    /// The age converted to days.
    pub fn age_days(&self) -> Option<i64> {
        self.age.as_deref().and_then(age_days)
    }

    /// The age converted to years.
    pub fn age_years(&self) -> Option<f64> {
        self.age.as_deref().and_then(age_years)
    }

    /// The resolved nativity, or an empty one when the birthday is unknown.
    pub fn country(&self) -> Country {
        self.birthday
            .as_ref()
            .map(|b| b.country.clone())
            .unwrap_or_default()
    }

    /// The number of unborn young, zero if the animal isn't pregnant.
    pub fn fetus_count(&self) -> usize {
        self.pregnancy.as_ref().map_or(0, |p| p.fetus_count)
    }
}

impl Table for IndividualRecord {
    const COLUMNS: &'static [Column] = &[
        Column::new("placeable_id", Text),
        Column::new("current_shed", Text),
        Column::new("shed_type", Text),
        Column::new("species", Text),
        Column::new("breed", Text),
        Column::new("FarmID", Int),
        Column::new("unique_id", Int),
        Column::new("name", Text),
        Column::new("sex", Text),
        Column::new("age", Float),
        Column::new("age_days", Int),
        Column::new("age_years", Float),
        Column::new("weight", Float),
        Column::new("animal_health", Float),
        Column::new("animal_gen_metabolism", Float),
        Column::new("animal_gen_quality", Float),
        Column::new("animal_gen_health", Float),
        Column::new("animal_gen_fertility", Float),
        Column::new("animal_gen_productivity", Float),
        Column::new("birthday_day", Int),
        Column::new("birthday_month", Int),
        Column::new("birthday_year", Int),
        Column::new("country", Int),
        Column::new("country_name", Text),
        Column::new("country_iso", Text),
        Column::new("is_parent", Text),
        Column::new("is_pregnant", Text),
        Column::new("preg_day", Int),
        Column::new("preg_month", Int),
        Column::new("preg_year", Int),
        Column::new("preg_duration", Int),
        Column::new("preg_due_date", Date),
        Column::new("preg_fetus_count", Int),
        // not stored in the save, kept so the layout matches older exports
        Column::new("purchase_date", Text),
        Column::new("purchase_price", Text),
    ];

    fn fields(&self) -> Vec<String> {
        let birthday = self.birthday.clone().unwrap_or_default();
        let pregnancy = self.pregnancy.as_ref();
        let mut row = vec![
            text(&self.placeable_id),
            self.current_shed.to_string(),
            text(&self.shed_type),
            text(&self.species),
            text(&self.breed),
            text(&self.farm_id),
            text(&self.unique_id),
            text(&self.name),
            text(&self.sex),
            text(&self.age),
            self.age_days().map_or_else(String::new, |d| d.to_string()),
            format_decimal(self.age_years()),
            text(&self.weight),
            text(&self.health),
        ];
        row.extend(self.genetics.scores().into_iter().map(text));
        row.extend([
            text(&birthday.day),
            text(&birthday.month),
            text(&birthday.year),
            text(&birthday.country.code),
            text(&birthday.country.name),
            text(&birthday.country.iso),
            text(&self.is_parent),
            text(&self.is_pregnant),
        ]);
        match pregnancy {
            Some(p) => row.extend([
                text(&p.day),
                text(&p.month),
                text(&p.year),
                text(&p.duration),
                p.due_date.as_ref().map_or_else(String::new, format_date),
                p.fetus_count.to_string(),
            ]),
            None => row.extend(iter::repeat(String::new()).take(6)),
        }
        row.extend([String::new(), String::new()]);
        row
    }
}

#[cfg(test)]
mod tests {
    use super::{super::Cell, *};

    fn animal() -> IndividualRecord {
        IndividualRecord {
            placeable_id: Some("12".into()),
            current_shed: "cowBarnBig.xml".into(),
            shed_type: Some("cowBarnBig.xml".into()),
            species: Some("cows"),
            breed: Some("HOLSTEIN".into()),
            farm_id: Some("1".into()),
            unique_id: Some("4021".into()),
            name: Some("Bella".into()),
            sex: Some("female".into()),
            age: Some("30".into()),
            weight: Some("610.5".into()),
            health: Some("100".into()),
            genetics: Genetics {
                metabolism: Some("1.1".into()),
                ..Default::default()
            },
            birthday: None,
            is_parent: Some("true".into()),
            is_pregnant: Some("false".into()),
            pregnancy: None,
        }
    }

    #[test]
    fn test_row_shape() {
        let row = animal().fields();
        assert_eq!(row.len(), IndividualRecord::COLUMNS.len());
        assert_eq!(IndividualRecord::header()[5], "FarmID");
        assert_eq!(row[10], "900");
        assert_eq!(row[11], "2.50");
        assert_eq!(row[14], "1.1");
        assert_eq!(row[15], "");
        assert!(row[19..].iter().take(6).all(|v| v.is_empty()));
        assert!(row[27..].iter().all(|v| v.is_empty()));
    }

    #[test]
    fn test_pregnant_row() {
        let mut cow = animal();
        cow.pregnancy = Some(Pregnancy {
            day: Some("20".into()),
            month: Some("1".into()),
            year: Some("2025".into()),
            duration: Some("114".into()),
            due_date: NaiveDate::from_ymd_opt(2025, 5, 14),
            fetus_count: 2,
        });
        let row = cow.fields();
        assert_eq!(row[31], "2025-05-14");
        assert_eq!(row[32], "2");
        assert_eq!(cow.fetus_count(), 2);
        let cells = cow.cells();
        assert_eq!(cells[6], Cell::Int(4021));
        assert_eq!(cells[32], Cell::Int(2));
    }
}
