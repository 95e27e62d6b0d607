use roxmltree::Node;

use super::{
    super::{
        country_codes::CountryCodes,
        derived::due_date,
        species::classify,
        structures::{Birthday, FetusRecord, IndividualRecord, Pregnancy},
        types::GameString,
    },
    fields::{attr, basename, child, children, genetics, text},
};

/// The shed name used when a placeable has neither a file nor an id.
const DEFAULT_SHED: &str = "Husbandry";

/// Restrictions on which animals make it into an [Extraction].
#[derive(Debug, Default, Clone)]
pub struct RecordFilter {
    species: Vec<String>,
    farm_id: Option<String>,
}

impl RecordFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keeps only animals of these species tags. Animals whose species can't
    /// be inferred are always kept. An empty list disables the filter.
    pub fn with_species(mut self, species: Vec<String>) -> Self {
        self.species = species;
        self
    }

    /// Keeps only animals owned by this farm. An empty id disables the filter.
    pub fn with_farm_id<S: Into<String>>(mut self, farm_id: S) -> Self {
        let farm_id = farm_id.into();
        self.farm_id = if farm_id.is_empty() {
            None
        } else {
            Some(farm_id)
        };
        self
    }

    fn admits(&self, species: Option<&str>, farm_id: Option<&str>) -> bool {
        if let Some(species) = species {
            if !self.species.is_empty() && !self.species.iter().any(|s| s == species) {
                return false;
            }
        }
        match &self.farm_id {
            Some(wanted) => farm_id.unwrap_or("") == wanted,
            None => true,
        }
    }
}

/// The records built from one placeables document, in document order.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Extraction {
    pub individuals: Vec<IndividualRecord>,
    pub fetuses: Vec<FetusRecord>,
}

/// What every animal inherits from the placeable it lives in.
struct Shed {
    placeable_id: Option<GameString>,
    file: Option<GameString>,
    name: GameString,
    /// The text of the `type` child, the weaker species hint
    type_label: Option<GameString>,
    shed_type: Option<GameString>,
}

impl Shed {
    fn new(placeable: Node) -> Self {
        let file = attr(placeable, "filename");
        let placeable_id = attr(placeable, "id").or_else(|| attr(placeable, "uniqueId"));
        let name = match file.as_deref() {
            Some(file) => basename(file).into(),
            None => placeable_id
                .clone()
                .unwrap_or_else(|| GameString::from(DEFAULT_SHED)),
        };
        let type_label = child(placeable, "type").and_then(text);
        let shed_type = type_label.clone().or_else(|| {
            file.as_deref()
                .map(basename)
                .filter(|b| !b.is_empty())
                .map(GameString::from)
        });
        Shed {
            placeable_id,
            file,
            name,
            type_label,
            shed_type,
        }
    }

    /// Builds the record of an animal and the records of its fetuses.
    /// Returns [None] if the filter rejects the animal.
    fn animal(
        &self,
        animal: Node,
        codes: &CountryCodes,
        filter: &RecordFilter,
    ) -> Option<(IndividualRecord, Vec<FetusRecord>)> {
        let animal_type = attr(animal, "type").or_else(|| attr(animal, "animalType"));
        let species = classify(
            animal_type.as_deref(),
            self.type_label.as_deref(),
            self.file.as_deref(),
        );
        let farm_id = attr(animal, "farmId");
        if !filter.admits(species, farm_id.as_deref()) {
            return None;
        }
        let birthday = child(animal, "birthday").map(|b| Birthday {
            day: attr(b, "day"),
            month: attr(b, "month"),
            year: attr(b, "year"),
            country: codes.resolve(attr(b, "country")),
        });
        let mut individual = IndividualRecord {
            placeable_id: self.placeable_id.clone(),
            current_shed: self.name.clone(),
            shed_type: self.shed_type.clone(),
            species,
            breed: attr(animal, "subType"),
            farm_id,
            unique_id: attr(animal, "id"),
            name: attr(animal, "name"),
            sex: attr(animal, "gender"),
            age: attr(animal, "age"),
            weight: attr(animal, "weight"),
            health: attr(animal, "health"),
            genetics: genetics(animal),
            birthday,
            is_parent: attr(animal, "isParent"),
            is_pregnant: attr(animal, "isPregnant"),
            pregnancy: None,
        };
        let mut fetuses = Vec::new();
        if let Some(node) = child(animal, "pregnancy") {
            let (day, month, year, duration) = (
                attr(node, "day"),
                attr(node, "month"),
                attr(node, "year"),
                attr(node, "duration"),
            );
            let mut pregnancy = Pregnancy {
                due_date: due_date(
                    year.as_deref().unwrap_or(""),
                    month.as_deref().unwrap_or(""),
                    day.as_deref().unwrap_or(""),
                    duration.as_deref().unwrap_or(""),
                ),
                day,
                month,
                year,
                duration,
                fetus_count: 0,
            };
            if let Some(entries) = child(node, "pregnancies") {
                let country = individual.country();
                for (i, fetus) in children(entries, "pregnancy").enumerate() {
                    fetuses.push(FetusRecord {
                        mother_unique_id: individual.unique_id.clone(),
                        current_shed: self.name.clone(),
                        shed_type: self.shed_type.clone(),
                        species,
                        mother_breed: individual.breed.clone(),
                        index: i + 1,
                        sex: attr(fetus, "gender"),
                        breed: attr(fetus, "subType"),
                        health: attr(fetus, "health"),
                        genetics: genetics(fetus),
                        due_date: pregnancy.due_date,
                        preg_day: pregnancy.day.clone(),
                        preg_month: pregnancy.month.clone(),
                        preg_year: pregnancy.year.clone(),
                        preg_duration: pregnancy.duration.clone(),
                        farm_id: individual.farm_id.clone(),
                        country: country.clone(),
                    });
                }
            }
            pregnancy.fetus_count = fetuses.len();
            individual.pregnancy = Some(pregnancy);
        }
        Some((individual, fetuses))
    }
}

/// Walks the placeables under the root and builds the records of every
/// animal the filter admits.
///
/// Placeables without a `husbandryAnimals/clusters` path hold no animals and
/// are skipped.
pub(super) fn build(root: Node, codes: &CountryCodes, filter: &RecordFilter) -> Extraction {
    let mut extraction = Extraction::default();
    for placeable in children(root, "placeable") {
        let clusters = match child(placeable, "husbandryAnimals").and_then(|h| child(h, "clusters")) {
            Some(clusters) => clusters,
            None => continue,
        };
        let shed = Shed::new(placeable);
        for animal in children(clusters, "animal") {
            if let Some((individual, fetuses)) = shed.animal(animal, codes, filter) {
                extraction.individuals.push(individual);
                extraction.fetuses.extend(fetuses);
            }
        }
    }
    extraction
}
