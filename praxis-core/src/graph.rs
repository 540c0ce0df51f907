//! Prerequisite/unlock graph over the learning units.
//!
//! Lock state is always derived from the completed-units set, never
//! stored, so it cannot diverge from the record. Display depth is
//! memoized at construction; the catalog has already rejected cycles.

use std::collections::{BTreeSet, HashMap};

use crate::catalog::Catalog;

/// Derived unlock/depth view over the catalog's prerequisite relation.
#[derive(Debug)]
pub struct UnlockGraph {
    prerequisites: HashMap<String, Vec<String>>,
    depths: HashMap<String, u32>,
}

impl UnlockGraph {
    pub fn new(catalog: &Catalog) -> Self {
        let prerequisites: HashMap<String, Vec<String>> = catalog
            .units()
            .iter()
            .map(|u| (u.id.clone(), u.prerequisites.clone()))
            .collect();

        let mut depths = HashMap::with_capacity(prerequisites.len());
        for id in prerequisites.keys() {
            compute_depth(id, &prerequisites, &mut depths);
        }

        Self {
            prerequisites,
            depths,
        }
    }

    /// A unit is locked iff at least one prerequisite is not complete.
    /// Unknown unit ids are inert: never locked.
    pub fn is_locked(&self, unit_id: &str, completed: &BTreeSet<String>) -> bool {
        self.prerequisites
            .get(unit_id)
            .map(|prereqs| prereqs.iter().any(|p| !completed.contains(p)))
            .unwrap_or(false)
    }

    /// Display depth: 0 for units without prerequisites, otherwise
    /// 1 + max(prerequisite depths). Unknown ids default to 0.
    pub fn depth(&self, unit_id: &str) -> u32 {
        self.depths.get(unit_id).copied().unwrap_or(0)
    }

    /// All unit ids that just became selectable, given old and new
    /// completed sets.
    pub fn newly_unlocked(
        &self,
        before: &BTreeSet<String>,
        after: &BTreeSet<String>,
    ) -> Vec<&str> {
        self.prerequisites
            .keys()
            .filter(|id| self.is_locked(id, before) && !self.is_locked(id, after))
            .map(String::as_str)
            .collect()
    }
}

fn compute_depth(
    id: &str,
    prerequisites: &HashMap<String, Vec<String>>,
    depths: &mut HashMap<String, u32>,
) -> u32 {
    if let Some(&d) = depths.get(id) {
        return d;
    }
    // Prerequisite ids absent from the unit set default to depth 0.
    let Some(prereqs) = prerequisites.get(id) else {
        return 0;
    };
    let depth = prereqs
        .iter()
        .map(|p| {
            if prerequisites.contains_key(p) {
                compute_depth(p, prerequisites, depths) + 1
            } else {
                0
            }
        })
        .max()
        .unwrap_or(0);
    depths.insert(id.to_string(), depth);
    depth
}
