use super::{
    super::{
        derived::{format_decimal, is_truthy, parse_float, MONTHS_PER_YEAR},
        types::{text, GameString, HashMap},
    },
    Column,
    ColumnKind::{Float, Int, Text},
    IndividualRecord, Table,
};

/// The statistics of one group of animals that share a shed, species and breed.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SummaryRecord {
    pub current_shed: GameString,
    pub shed_type: Option<GameString>,
    pub species: Option<&'static str>,
    pub breed: Option<GameString>,
    pub animals_count: usize,
    pub pregnant_count: usize,
    pub avg_age_months: Option<f64>,
    pub avg_age_years: Option<f64>,
    pub avg_health: Option<f64>,
    pub avg_gen_metabolism: Option<f64>,
    pub avg_gen_quality: Option<f64>,
    pub avg_gen_health: Option<f64>,
    pub avg_gen_fertility: Option<f64>,
    pub avg_gen_productivity: Option<f64>,
    pub total_fetuses: usize,
}

/// The values that identify a group.
type GroupKey = (
    GameString,
    Option<GameString>,
    Option<&'static str>,
    Option<GameString>,
);

/// Collects the values of a field that parse as numbers.
fn numbers<'a, F: Fn(&'a IndividualRecord) -> &'a Option<GameString>>(
    members: &[&'a IndividualRecord],
    field: F,
) -> Vec<f64> {
    members
        .iter()
        .filter_map(|m| field(m).as_deref().and_then(parse_float))
        .collect()
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

impl SummaryRecord {
    fn new(key: GroupKey, members: &[&IndividualRecord]) -> Self {
        let (current_shed, shed_type, species, breed) = key;
        let ages = numbers(members, |m| &m.age);
        SummaryRecord {
            current_shed,
            shed_type,
            species,
            breed,
            animals_count: members.len(),
            pregnant_count: members
                .iter()
                .filter(|m| m.is_pregnant.as_deref().is_some_and(is_truthy_strict))
                .count(),
            avg_age_months: mean(&ages),
            // from the raw ages again, not from the rounded months
            avg_age_years: mean(&ages).map(|m| m / MONTHS_PER_YEAR),
            avg_health: mean(&numbers(members, |m| &m.health)),
            avg_gen_metabolism: mean(&numbers(members, |m| &m.genetics.metabolism)),
            avg_gen_quality: mean(&numbers(members, |m| &m.genetics.quality)),
            avg_gen_health: mean(&numbers(members, |m| &m.genetics.health)),
            avg_gen_fertility: mean(&numbers(members, |m| &m.genetics.fertility)),
            avg_gen_productivity: mean(&numbers(members, |m| &m.genetics.productivity)),
            total_fetuses: members.iter().map(|m| m.fetus_count()).sum(),
        }
    }
}

/// The pregnancy flag is compared as written, surrounding whitespace included.
fn is_truthy_strict(value: &str) -> bool {
    value.trim() == value && is_truthy(value)
}

/// Groups the animals by shed, shed type, species and breed and computes
/// the statistics of each group.
///
/// Groups are ordered by shed, species and breed. Averages only consider
/// members that have a numeric value for that field.
pub fn summarize(individuals: &[IndividualRecord]) -> Vec<SummaryRecord> {
    let mut index: HashMap<GroupKey, usize> = HashMap::default();
    let mut groups: Vec<(GroupKey, Vec<&IndividualRecord>)> = Vec::new();
    for individual in individuals {
        let key = (
            individual.current_shed.clone(),
            individual.shed_type.clone(),
            individual.species,
            individual.breed.clone(),
        );
        match index.get(&key) {
            Some(i) => groups[*i].1.push(individual),
            None => {
                index.insert(key.clone(), groups.len());
                groups.push((key, vec![individual]));
            }
        }
    }
    let mut summary: Vec<SummaryRecord> = groups
        .into_iter()
        .map(|(key, members)| SummaryRecord::new(key, &members))
        .collect();
    summary.sort_by(|a, b| {
        (
            a.current_shed.as_ref(),
            a.species.unwrap_or(""),
            a.breed.as_deref().unwrap_or(""),
        )
            .cmp(&(
                b.current_shed.as_ref(),
                b.species.unwrap_or(""),
                b.breed.as_deref().unwrap_or(""),
            ))
    });
    summary
}

impl Table for SummaryRecord {
    const COLUMNS: &'static [Column] = &[
        Column::new("current_shed", Text),
        Column::new("shed_type", Text),
        Column::new("species", Text),
        Column::new("breed", Text),
        Column::new("animals_count", Int),
        Column::new("pregnant_count", Int),
        Column::new("avg_age_months", Float),
        Column::new("avg_age_years", Float),
        Column::new("avg_health", Float),
        Column::new("avg_gen_metabolism", Float),
        Column::new("avg_gen_quality", Float),
        Column::new("avg_gen_health", Float),
        Column::new("avg_gen_fertility", Float),
        Column::new("avg_gen_productivity", Float),
        Column::new("total_fetuses", Int),
    ];

    fn fields(&self) -> Vec<String> {
        vec![
            self.current_shed.to_string(),
            text(&self.shed_type),
            text(&self.species),
            text(&self.breed),
            self.animals_count.to_string(),
            self.pregnant_count.to_string(),
            format_decimal(self.avg_age_months),
            format_decimal(self.avg_age_years),
            format_decimal(self.avg_health),
            format_decimal(self.avg_gen_metabolism),
            format_decimal(self.avg_gen_quality),
            format_decimal(self.avg_gen_health),
            format_decimal(self.avg_gen_fertility),
            format_decimal(self.avg_gen_productivity),
            self.total_fetuses.to_string(),
        ]
    }
}
