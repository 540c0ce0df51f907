//! Badge evaluation.
//!
//! Re-run after every mutation batch; inspects accumulated counters
//! against the catalog's rule table and reports rules newly satisfied.
//! Already-earned badges are skipped, which makes repeated evaluation
//! idempotent.

use crate::catalog::{BadgeCondition, BadgeDef, Catalog};
use crate::record::ProgressRecord;

/// Badge rules satisfied by the record but not yet earned.
pub fn newly_earned<'a>(record: &ProgressRecord, catalog: &'a Catalog) -> Vec<&'a BadgeDef> {
    catalog
        .badges()
        .iter()
        .filter(|b| !record.badges_earned.contains(&b.id))
        .filter(|b| satisfied(&b.condition, record, catalog))
        .collect()
}

fn satisfied(condition: &BadgeCondition, record: &ProgressRecord, catalog: &Catalog) -> bool {
    match condition {
        BadgeCondition::StreakAtLeast { days } => record.streak_length >= *days,
        BadgeCondition::BestComboAtLeast { count } => record.best_combo >= *count,
        BadgeCondition::AnyUnitMastered => !record.mastered_units.is_empty(),
        BadgeCondition::UnitCompleted { unit } => record.completed_units.contains(unit),
        BadgeCondition::CategoryCompleted { category } => {
            let ids = catalog.units_in_category(category);
            !ids.is_empty()
                && ids
                    .iter()
                    .all(|id| record.completed_units.contains(*id))
        }
        BadgeCondition::AllUnitsCompleted => {
            !catalog.units().is_empty()
                && catalog
                    .units()
                    .iter()
                    .all(|u| record.completed_units.contains(&u.id))
        }
        BadgeCondition::CategoryCorrectAtLeast { category, count } => {
            let ids = catalog.units_in_category(category);
            record.correct_count_in(&ids) >= *count
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::LearningUnit;

    fn unit(id: &str, category: Option<&str>) -> LearningUnit {
        LearningUnit {
            id: id.into(),
            prerequisites: vec![],
            reward: 25,
            category: category.map(String::from),
            exercise_count: 0,
        }
    }

    fn badge(id: &str, condition: BadgeCondition) -> BadgeDef {
        BadgeDef {
            id: id.into(),
            bonus: 50,
            condition,
        }
    }

    #[test]
    fn test_streak_badge() {
        let catalog = Catalog::new(
            vec![unit("a", None)],
            vec![badge("week-streak", BadgeCondition::StreakAtLeast { days: 7 })],
        )
        .unwrap();

        let mut record = ProgressRecord::default();
        record.streak_length = 6;
        assert!(newly_earned(&record, &catalog).is_empty());

        record.streak_length = 7;
        let earned = newly_earned(&record, &catalog);
        assert_eq!(earned.len(), 1);
        assert_eq!(earned[0].id, "week-streak");
    }

    #[test]
    fn test_already_earned_badge_skipped() {
        let catalog = Catalog::new(
            vec![],
            vec![badge("combo-king", BadgeCondition::BestComboAtLeast { count: 10 })],
        )
        .unwrap();

        let mut record = ProgressRecord::default();
        record.best_combo = 12;
        record.badges_earned.insert("combo-king".into());

        assert!(newly_earned(&record, &catalog).is_empty());
    }

    #[test]
    fn test_category_completed_requires_nonempty_category() {
        let catalog = Catalog::new(
            vec![unit("g1", Some("geometry")), unit("g2", Some("geometry"))],
            vec![
                badge(
                    "geometer",
                    BadgeCondition::CategoryCompleted {
                        category: "geometry".into(),
                    },
                ),
                badge(
                    "phantom",
                    BadgeCondition::CategoryCompleted {
                        category: "no-such-category".into(),
                    },
                ),
            ],
        )
        .unwrap();

        let mut record = ProgressRecord::default();
        record.completed_units.insert("g1".into());
        assert!(newly_earned(&record, &catalog).is_empty());

        record.completed_units.insert("g2".into());
        let earned = newly_earned(&record, &catalog);
        // The empty category never awards.
        assert_eq!(earned.len(), 1);
        assert_eq!(earned[0].id, "geometer");
    }

    #[test]
    fn test_all_units_completed() {
        let catalog = Catalog::new(
            vec![unit("a", None), unit("b", None)],
            vec![badge("completionist", BadgeCondition::AllUnitsCompleted)],
        )
        .unwrap();

        let mut record = ProgressRecord::default();
        record.completed_units.insert("a".into());
        assert!(newly_earned(&record, &catalog).is_empty());

        record.completed_units.insert("b".into());
        assert_eq!(newly_earned(&record, &catalog).len(), 1);
    }

    #[test]
    fn test_category_correct_count() {
        let catalog = Catalog::new(
            vec![unit("p1", Some("probability")), unit("p2", Some("probability"))],
            vec![badge(
                "modeler",
                BadgeCondition::CategoryCorrectAtLeast {
                    category: "probability".into(),
                    count: 5,
                },
            )],
        )
        .unwrap();

        let mut record = ProgressRecord::default();
        record
            .exercise_outcomes
            .entry("p1".into())
            .or_default()
            .extend([0, 1, 2]);
        record
            .exercise_outcomes
            .entry("p2".into())
            .or_default()
            .extend([0]);
        assert!(newly_earned(&record, &catalog).is_empty());

        record
            .exercise_outcomes
            .entry("p2".into())
            .or_default()
            .insert(1);
        assert_eq!(newly_earned(&record, &catalog).len(), 1);
    }

    #[test]
    fn test_any_unit_mastered() {
        let catalog = Catalog::new(
            vec![unit("a", None)],
            vec![badge("flawless", BadgeCondition::AnyUnitMastered)],
        )
        .unwrap();

        let mut record = ProgressRecord::default();
        assert!(newly_earned(&record, &catalog).is_empty());

        record.mastered_units.insert("a".into());
        assert_eq!(newly_earned(&record, &catalog).len(), 1);
    }
}
