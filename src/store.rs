//! In-memory record of each light's last known good state.

use std::collections::HashMap;

use crate::types::{LightId, LightSnapshot};

/// What a cycle decided for one light.
#[derive(Debug, Clone, PartialEq)]
pub enum LightOutcome {
    /// The freshly fetched snapshot, kept as is.
    Observed(LightSnapshot),
    /// The fetched snapshot with the prior color fields written back.
    Restored(LightSnapshot),
    /// The prior snapshot, kept because the restore write failed.
    Retained(LightSnapshot),
    /// Nothing trustworthy is known; remove the light.
    Dropped,
}

impl LightOutcome {
    /// The snapshot this outcome stores, if any.
    pub fn snapshot(&self) -> Option<&LightSnapshot> {
        match self {
            LightOutcome::Observed(s) | LightOutcome::Restored(s) | LightOutcome::Retained(s) => {
                Some(s)
            }
            LightOutcome::Dropped => None,
        }
    }
}

/// Mapping from light to its last known good snapshot.
///
/// A store is only ever replaced wholesale by [`Store::merge`]; nothing edits
/// a store while a cycle reads it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Store {
    lights: HashMap<LightId, LightSnapshot>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &LightId) -> Option<&LightSnapshot> {
        self.lights.get(id)
    }

    pub fn contains(&self, id: &LightId) -> bool {
        self.lights.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.lights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lights.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&LightId, &LightSnapshot)> {
        self.lights.iter()
    }

    /// Build the next store: `self` overlaid with one cycle's outcomes.
    ///
    /// Lights without an outcome keep their entry from `self`.
    ///
    /// # Examples
    ///
    /// ```
    /// use hue_power_memory::{LightId, LightOutcome, LightSnapshot, Store};
    ///
    /// let a = LightId::from("1");
    /// let first = Store::new().merge([(a.clone(), LightOutcome::Observed(LightSnapshot::default()))]);
    /// assert!(first.contains(&a));
    ///
    /// let second = first.merge([(a.clone(), LightOutcome::Dropped)]);
    /// assert!(second.is_empty());
    /// ```
    pub fn merge<I>(&self, outcomes: I) -> Store
    where
        I: IntoIterator<Item = (LightId, LightOutcome)>,
    {
        let mut lights = self.lights.clone();
        for (id, outcome) in outcomes {
            match outcome {
                LightOutcome::Observed(s) | LightOutcome::Restored(s) | LightOutcome::Retained(s) => {
                    lights.insert(id, s);
                }
                LightOutcome::Dropped => {
                    lights.remove(&id);
                }
            }
        }
        Store { lights }
    }
}

impl FromIterator<(LightId, LightSnapshot)> for Store {
    fn from_iter<T: IntoIterator<Item = (LightId, LightSnapshot)>>(iter: T) -> Self {
        Store {
            lights: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Store {
    type Item = (LightId, LightSnapshot);
    type IntoIter = std::collections::hash_map::IntoIter<LightId, LightSnapshot>;

    fn into_iter(self) -> Self::IntoIter {
        self.lights.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(bri: u8) -> LightSnapshot {
        LightSnapshot {
            on: true,
            reachable: true,
            brightness: Some(bri),
            ..Default::default()
        }
    }

    #[test]
    fn test_merge_overwrites_and_keeps_untouched() {
        let a = LightId::from("1");
        let b = LightId::from("2");
        let prev: Store = [(a.clone(), snapshot(1)), (b.clone(), snapshot(2))]
            .into_iter()
            .collect();

        let next = prev.merge([(a.clone(), LightOutcome::Restored(snapshot(9)))]);

        assert_eq!(next.get(&a), Some(&snapshot(9)));
        assert_eq!(next.get(&b), Some(&snapshot(2)));
        // The base store is left as it was.
        assert_eq!(prev.get(&a), Some(&snapshot(1)));
    }

    #[test]
    fn test_merge_drop_removes_key() {
        let a = LightId::from("1");
        let prev: Store = [(a.clone(), snapshot(1))].into_iter().collect();
        let next = prev.merge([(a.clone(), LightOutcome::Dropped)]);
        assert!(!next.contains(&a));
        assert!(next.is_empty());
    }

    #[test]
    fn test_merge_retained_keeps_prior_value() {
        let a = LightId::from("1");
        let prev: Store = [(a.clone(), snapshot(5))].into_iter().collect();
        let next = prev.merge([(a.clone(), LightOutcome::Retained(snapshot(5)))]);
        assert_eq!(next, prev);
    }

    #[test]
    fn test_outcome_snapshot() {
        assert_eq!(
            LightOutcome::Observed(snapshot(3)).snapshot(),
            Some(&snapshot(3))
        );
        assert!(LightOutcome::Dropped.snapshot().is_none());
    }
}
