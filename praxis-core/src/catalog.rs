//! Static content catalog: learning units, prerequisites, badge rules.
//!
//! The catalog is authored externally and loaded once per session from
//! TOML. The prerequisite relation must be a DAG; a cycle is an
//! authoring defect and is rejected at load time rather than tolerated
//! at runtime, because the depth computation would not terminate on it.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// An addressable, independently completable piece of content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LearningUnit {
    pub id: String,

    /// Unit ids that must be complete before this one unlocks.
    #[serde(default)]
    pub prerequisites: Vec<String>,

    /// Score awarded on the completing transition.
    #[serde(default = "default_reward")]
    pub reward: u32,

    /// Content category, used by badge rules.
    #[serde(default)]
    pub category: Option<String>,

    /// Number of exercises this unit carries; a unit is mastered once
    /// all of them are answered correctly. Zero means no exercise set.
    #[serde(default)]
    pub exercise_count: u32,
}

fn default_reward() -> u32 {
    25
}

/// Condition under which a badge is earned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BadgeCondition {
    /// Streak length reached the given number of days.
    StreakAtLeast { days: u32 },
    /// Best combo reached the given count.
    BestComboAtLeast { count: u32 },
    /// At least one unit mastered (full exercise set correct).
    AnyUnitMastered,
    /// A specific unit marked complete.
    UnitCompleted { unit: String },
    /// Every unit of a category marked complete.
    CategoryCompleted { category: String },
    /// Every unit in the catalog marked complete.
    AllUnitsCompleted,
    /// Total correct exercises within a category reached a count.
    CategoryCorrectAtLeast { category: String, count: usize },
}

/// An earnable badge with its one-time score bonus.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BadgeDef {
    pub id: String,
    #[serde(default = "default_bonus")]
    pub bonus: u64,
    pub condition: BadgeCondition,
}

fn default_bonus() -> u64 {
    50
}

#[derive(Debug, Deserialize)]
struct RawCatalog {
    #[serde(default)]
    units: Vec<LearningUnit>,
    #[serde(default)]
    badges: Vec<BadgeDef>,
}

/// The loaded, validated content catalog. Read-only after construction.
#[derive(Debug)]
pub struct Catalog {
    units: Vec<LearningUnit>,
    badges: Vec<BadgeDef>,
    index: HashMap<String, usize>,
}

impl Catalog {
    /// Build a catalog from already-parsed units and badge rules.
    ///
    /// Rejects duplicate unit ids and cyclic prerequisite relations.
    pub fn new(units: Vec<LearningUnit>, badges: Vec<BadgeDef>) -> Result<Self> {
        let mut index = HashMap::with_capacity(units.len());
        for (i, unit) in units.iter().enumerate() {
            if index.insert(unit.id.clone(), i).is_some() {
                return Err(CoreError::DuplicateUnit(unit.id.clone()));
            }
        }

        let catalog = Self {
            units,
            badges,
            index,
        };
        catalog.check_acyclic()?;
        Ok(catalog)
    }

    /// Parse a catalog from its TOML representation.
    pub fn from_toml_str(input: &str) -> Result<Self> {
        let raw: RawCatalog =
            toml::from_str(input).map_err(|e| CoreError::CatalogParse(e.to_string()))?;
        Self::new(raw.units, raw.badges)
    }

    /// Load a catalog from a TOML file.
    pub fn load(path: &std::path::Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn unit(&self, id: &str) -> Option<&LearningUnit> {
        self.index.get(id).map(|&i| &self.units[i])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn units(&self) -> &[LearningUnit] {
        &self.units
    }

    pub fn badges(&self) -> &[BadgeDef] {
        &self.badges
    }

    /// Ids of all units in the given category.
    pub fn units_in_category(&self, category: &str) -> Vec<&str> {
        self.units
            .iter()
            .filter(|u| u.category.as_deref() == Some(category))
            .map(|u| u.id.as_str())
            .collect()
    }

    /// Three-color DFS over the prerequisite relation. Prerequisite ids
    /// not present in the catalog are ignored here; the unlock graph
    /// treats them as depth 0.
    fn check_acyclic(&self) -> Result<()> {
        #[derive(Clone, Copy, PartialEq)]
        enum Mark {
            White,
            Gray,
            Black,
        }

        let mut marks = vec![Mark::White; self.units.len()];

        fn visit(
            catalog: &Catalog,
            marks: &mut [Mark],
            i: usize,
        ) -> std::result::Result<(), String> {
            match marks[i] {
                Mark::Black => return Ok(()),
                Mark::Gray => return Err(catalog.units[i].id.clone()),
                Mark::White => {}
            }
            marks[i] = Mark::Gray;
            for prereq in &catalog.units[i].prerequisites {
                if let Some(&j) = catalog.index.get(prereq) {
                    visit(catalog, marks, j)?;
                }
            }
            marks[i] = Mark::Black;
            Ok(())
        }

        for i in 0..self.units.len() {
            visit(self, &mut marks, i).map_err(CoreError::CyclicPrerequisites)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit(id: &str, prereqs: &[&str]) -> LearningUnit {
        LearningUnit {
            id: id.into(),
            prerequisites: prereqs.iter().map(|s| s.to_string()).collect(),
            reward: 25,
            category: None,
            exercise_count: 0,
        }
    }

    #[test]
    fn test_catalog_lookup() {
        let catalog = Catalog::new(vec![unit("a", &[]), unit("b", &["a"])], vec![]).unwrap();
        assert!(catalog.contains("a"));
        assert!(!catalog.contains("z"));
        assert_eq!(catalog.unit("b").unwrap().prerequisites, vec!["a"]);
    }

    #[test]
    fn test_duplicate_unit_rejected() {
        let result = Catalog::new(vec![unit("a", &[]), unit("a", &[])], vec![]);
        assert!(matches!(result, Err(CoreError::DuplicateUnit(id)) if id == "a"));
    }

    #[test]
    fn test_cycle_rejected_at_load() {
        let result = Catalog::new(
            vec![unit("a", &["b"]), unit("b", &["c"]), unit("c", &["a"])],
            vec![],
        );
        assert!(matches!(result, Err(CoreError::CyclicPrerequisites(_))));
    }

    #[test]
    fn test_self_cycle_rejected() {
        let result = Catalog::new(vec![unit("a", &["a"])], vec![]);
        assert!(matches!(result, Err(CoreError::CyclicPrerequisites(id)) if id == "a"));
    }

    #[test]
    fn test_unknown_prerequisite_is_not_a_cycle() {
        // Dangling prerequisite ids are an inert data issue, not a cycle.
        let catalog = Catalog::new(vec![unit("a", &["ghost"])], vec![]);
        assert!(catalog.is_ok());
    }

    #[test]
    fn test_from_toml() {
        let catalog = Catalog::from_toml_str(
            r#"
            [[units]]
            id = "limits"
            category = "analysis"
            exercise_count = 4

            [[units]]
            id = "derivatives"
            prerequisites = ["limits"]
            reward = 40

            [[badges]]
            id = "week-streak"
            condition = { kind = "streak_at_least", days = 7 }

            [[badges]]
            id = "analyst"
            bonus = 75
            condition = { kind = "category_correct_at_least", category = "analysis", count = 5 }
            "#,
        )
        .unwrap();

        assert_eq!(catalog.units().len(), 2);
        assert_eq!(catalog.unit("limits").unwrap().exercise_count, 4);
        assert_eq!(catalog.unit("derivatives").unwrap().reward, 40);
        assert_eq!(catalog.badges().len(), 2);
        assert_eq!(catalog.badges()[1].bonus, 75);
        assert_eq!(
            catalog.badges()[0].condition,
            BadgeCondition::StreakAtLeast { days: 7 }
        );
    }

    #[test]
    fn test_bad_toml_reports_parse_error() {
        let result = Catalog::from_toml_str("[[units]]\nid = ");
        assert!(matches!(result, Err(CoreError::CatalogParse(_))));
    }

    #[test]
    fn test_units_in_category() {
        let mut a = unit("a", &[]);
        a.category = Some("geometry".into());
        let mut b = unit("b", &[]);
        b.category = Some("geometry".into());
        let c = unit("c", &[]);

        let catalog = Catalog::new(vec![a, b, c], vec![]).unwrap();
        assert_eq!(catalog.units_in_category("geometry"), vec!["a", "b"]);
        assert!(catalog.units_in_category("algebra").is_empty());
    }
}
