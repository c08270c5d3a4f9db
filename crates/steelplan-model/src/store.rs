use indexmap::IndexMap;

use crate::entities::{Blend, Country, Mine, Plant, costs};

/// The single source of truth for one formulation: four ordered,
/// string-keyed collections edited in place between solves.
///
/// The store keeps the collections consistent enough for the builder to
/// work with (zero-backfill when a plant appears) and nothing more;
/// numeric validation is the caller's concern. Removing a plant leaves
/// stale cost entries behind in mines and markets; the builder only
/// reads keys that are currently in the plant collection.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntityStore {
    mines: IndexMap<String, Mine>,
    plants: IndexMap<String, Plant>,
    grades: IndexMap<String, Blend>,
    countries: IndexMap<String, Country>,
}

impl EntityStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mines(&self) -> &IndexMap<String, Mine> {
        &self.mines
    }

    pub fn plants(&self) -> &IndexMap<String, Plant> {
        &self.plants
    }

    pub fn grades(&self) -> &IndexMap<String, Blend> {
        &self.grades
    }

    pub fn countries(&self) -> &IndexMap<String, Country> {
        &self.countries
    }

    pub fn upsert_mine(&mut self, name: impl Into<String>, mine: Mine) {
        self.mines.insert(name.into(), mine);
    }

    /// Insert or replace a plant, backfilling a zero freight entry for it
    /// into every mine and every market so their mappings keep covering
    /// the full plant collection.
    pub fn upsert_plant(&mut self, name: impl Into<String>, plant: Plant) {
        let name = name.into();
        for mine in self.mines.values_mut() {
            mine.ship_cost.entry(name.clone()).or_insert(0.0);
        }
        let zero_tariffs: IndexMap<String, f64> =
            self.grades.keys().map(|grade| (grade.clone(), 0.0)).collect();
        for country in self.countries.values_mut() {
            country
                .ship_cost
                .entry(name.clone())
                .or_insert_with(|| zero_tariffs.clone());
        }
        self.plants.insert(name, plant);
    }

    pub fn upsert_grade(&mut self, name: impl Into<String>, blend: Blend) {
        self.grades.insert(name.into(), blend);
    }

    pub fn upsert_country(&mut self, name: impl Into<String>, country: Country) {
        self.countries.insert(name.into(), country);
    }

    pub fn remove_mine(&mut self, name: &str) -> Option<Mine> {
        self.mines.shift_remove(name)
    }

    /// Stale references to the removed plant stay behind in mines and
    /// markets; the builder ignores them.
    pub fn remove_plant(&mut self, name: &str) -> Option<Plant> {
        self.plants.shift_remove(name)
    }

    pub fn remove_grade(&mut self, name: &str) -> Option<Blend> {
        self.grades.shift_remove(name)
    }

    pub fn remove_country(&mut self, name: &str) -> Option<Country> {
        self.countries.shift_remove(name)
    }

    /// Rename = remove-old + insert-new in one call; a rename is
    /// indistinguishable from deleting and recreating the record.
    pub fn rename_mine(&mut self, old: &str, new: impl Into<String>) -> bool {
        match self.mines.shift_remove(old) {
            Some(record) => {
                self.upsert_mine(new, record);
                true
            }
            None => false,
        }
    }

    /// The new key goes through [`Self::upsert_plant`], so mines and
    /// markets gain zero entries for it; entries under the old key stay.
    pub fn rename_plant(&mut self, old: &str, new: impl Into<String>) -> bool {
        match self.plants.shift_remove(old) {
            Some(record) => {
                self.upsert_plant(new, record);
                true
            }
            None => false,
        }
    }

    pub fn rename_grade(&mut self, old: &str, new: impl Into<String>) -> bool {
        match self.grades.shift_remove(old) {
            Some(record) => {
                self.upsert_grade(new, record);
                true
            }
            None => false,
        }
    }

    pub fn rename_country(&mut self, old: &str, new: impl Into<String>) -> bool {
        match self.countries.shift_remove(old) {
            Some(record) => {
                self.upsert_country(new, record);
                true
            }
            None => false,
        }
    }

    /// Built-in planning scenario: two ore mines feeding two mills that
    /// serve four export markets.
    pub fn sample() -> Self {
        let mut store = Self::new();

        store.upsert_grade("high", Blend::of([("A", 1.0), ("B", 2.0)]));
        store.upsert_grade("low", Blend::of([("A", 1.0), ("B", 3.0)]));

        store.upsert_plant(
            "Pittsburgh",
            Plant {
                capacity: 700.0,
                process_cost: costs([("high", 32.0), ("low", 27.0)]),
            },
        );
        store.upsert_plant(
            "Youngstown",
            Plant {
                capacity: 1500.0,
                process_cost: costs([("high", 39.0), ("low", 32.0)]),
            },
        );

        store.upsert_mine(
            "Butte",
            Mine {
                ore_type: "A".to_string(),
                purchase_cost: 130.0,
                ship_cost: costs([("Pittsburgh", 10.0), ("Youngstown", 13.0)]),
                limit: 1000.0,
            },
        );
        store.upsert_mine(
            "Cheyenne",
            Mine {
                ore_type: "B".to_string(),
                purchase_cost: 110.0,
                ship_cost: costs([("Pittsburgh", 14.0), ("Youngstown", 17.0)]),
                limit: 2000.0,
            },
        );

        store.upsert_country("Japan", market(400.0, 200.0, (110.0, 100.0), (115.0, 110.0)));
        store.upsert_country("Korea", market(200.0, 100.0, (140.0, 130.0), (150.0, 145.0)));
        store.upsert_country("Taiwan", market(200.0, 100.0, (130.0, 125.0), (135.0, 127.0)));
        store.upsert_country("Mexico", market(150.0, 50.0, (80.0, 80.0), (90.0, 85.0)));

        store
    }
}

/// Sample-scenario market with (high, low) tariffs per plant.
fn market(high: f64, low: f64, pittsburgh: (f64, f64), youngstown: (f64, f64)) -> Country {
    Country {
        demand: costs([("high", high), ("low", low)]),
        ship_cost: [
            ("Pittsburgh".to_string(), costs([("high", pittsburgh.0), ("low", pittsburgh.1)])),
            ("Youngstown".to_string(), costs([("high", youngstown.0), ("low", youngstown.1)])),
        ]
        .into_iter()
        .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bare_mine(ore_type: &str) -> Mine {
        Mine {
            ore_type: ore_type.to_string(),
            purchase_cost: 100.0,
            ship_cost: IndexMap::new(),
            limit: 1000.0,
        }
    }

    #[test]
    fn test_sample_scenario_shape() {
        let store = EntityStore::sample();

        assert_eq!(store.mines().len(), 2);
        assert_eq!(store.plants().len(), 2);
        assert_eq!(store.grades().len(), 2);
        assert_eq!(store.countries().len(), 4);
        assert_eq!(store.mines()["Butte"].ship_cost["Pittsburgh"], 10.0);
        assert_eq!(store.countries()["Mexico"].ship_cost["Youngstown"]["low"], 85.0);
    }

    #[test]
    fn test_adding_a_plant_backfills_zero_costs() {
        let mut store = EntityStore::new();
        store.upsert_grade("high", Blend::of([("A", 1.0)]));
        store.upsert_mine("Butte", bare_mine("A"));
        store.upsert_country("Japan", Country::default());

        store.upsert_plant(
            "Gary",
            Plant {
                capacity: 500.0,
                process_cost: IndexMap::new(),
            },
        );

        assert_eq!(store.mines()["Butte"].ship_cost["Gary"], 0.0);
        assert_eq!(store.countries()["Japan"].ship_cost["Gary"]["high"], 0.0);
    }

    #[test]
    fn test_backfill_keeps_existing_costs() {
        let mut store = EntityStore::sample();
        store.upsert_plant(
            "Pittsburgh",
            Plant {
                capacity: 900.0,
                process_cost: costs([("high", 30.0), ("low", 25.0)]),
            },
        );

        // replacing the plant record must not reset the mines' freight
        assert_eq!(store.mines()["Butte"].ship_cost["Pittsburgh"], 10.0);
        assert_eq!(store.plants()["Pittsburgh"].capacity, 900.0);
    }

    #[test]
    fn test_rename_replaces_the_key() {
        let mut store = EntityStore::sample();

        assert!(store.rename_mine("Butte", "Anaconda"));
        assert!(!store.mines().contains_key("Butte"));
        assert_eq!(store.mines()["Anaconda"].ore_type, "A");

        assert!(!store.rename_mine("Butte", "Elsewhere"));
    }

    #[test]
    fn test_renamed_plant_is_backfilled_like_a_new_one() {
        let mut store = EntityStore::sample();

        assert!(store.rename_plant("Pittsburgh", "Gary"));
        assert_eq!(store.mines()["Butte"].ship_cost["Gary"], 0.0);
        // stale entry under the old key is tolerated
        assert_eq!(store.mines()["Butte"].ship_cost["Pittsburgh"], 10.0);
        assert_eq!(store.plants()["Gary"].capacity, 700.0);
    }

    #[test]
    fn test_removed_plant_leaves_stale_entries() {
        let mut store = EntityStore::sample();

        assert!(store.remove_plant("Youngstown").is_some());
        assert!(!store.plants().contains_key("Youngstown"));
        assert!(store.mines()["Butte"].ship_cost.contains_key("Youngstown"));
        assert!(store.countries()["Japan"].ship_cost.contains_key("Youngstown"));
    }
}
