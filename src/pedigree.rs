use crate::error::{PedigreeError, Result};
use crate::Id;
use crate::Individual;

/// Append-only pedigree record store.
///
/// Columns are stored separately and the id of row `i` is `i + 1`,
/// so ids are dense by construction.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Pedigree {
    sire: Vec<Option<Id>>,
    dam: Vec<Option<Id>>,
}

// Constructors
impl Pedigree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            sire: Vec::with_capacity(capacity),
            dam: Vec::with_capacity(capacity),
        }
    }

    /// Rebuild a pedigree from records in id order.
    ///
    /// # Errors
    ///
    /// The records must have ids `1, 2, ...` in that order, and every
    /// parent must satisfy the rules of [`Pedigree::add_offspring`].
    pub fn from_individuals<I: IntoIterator<Item = Individual>>(individuals: I) -> Result<Self> {
        let mut rv = Self::new();
        for individual in individuals {
            let expected = rv.next_id()?;
            if individual.id != expected {
                return Err(PedigreeError::invalid_parentage(
                    individual.id.get(),
                    format!("expected id {expected}"),
                ));
            }
            match (individual.sire, individual.dam) {
                (None, None) => {
                    rv.add_founder()?;
                }
                (Some(sire), Some(dam)) => {
                    rv.add_offspring(sire, dam)?;
                }
                _ => {
                    return Err(PedigreeError::invalid_parentage(
                        individual.id.get(),
                        "exactly one parent is unknown",
                    ))
                }
            }
        }
        Ok(rv)
    }
}

impl Pedigree {
    pub fn len(&self) -> usize {
        debug_assert_eq!(self.sire.len(), self.dam.len());
        self.sire.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The id that the next appended individual will receive.
    pub fn next_id(&self) -> Result<Id> {
        Id::from_index(self.len()).ok_or(PedigreeError::IdOverflow)
    }

    pub fn last_id(&self) -> Option<Id> {
        self.len().checked_sub(1).and_then(Id::from_index)
    }

    pub fn add_founder(&mut self) -> Result<Id> {
        let id = self.next_id()?;
        self.sire.push(None);
        self.dam.push(None);
        Ok(id)
    }

    /// Append an individual with known parents.
    ///
    /// # Errors
    ///
    /// [`PedigreeError::InvalidParentage`] if `sire == dam` or if either
    /// parent has not been created yet.
    pub fn add_offspring(&mut self, sire: Id, dam: Id) -> Result<Id> {
        let id = self.next_id()?;
        if sire == dam {
            return Err(PedigreeError::invalid_parentage(
                id.get(),
                format!("{sire} cannot be both sire and dam"),
            ));
        }
        for parent in [sire, dam] {
            if parent >= id {
                return Err(PedigreeError::invalid_parentage(
                    id.get(),
                    format!("parent {parent} does not predate the offspring"),
                ));
            }
        }
        self.sire.push(Some(sire));
        self.dam.push(Some(dam));
        Ok(id)
    }

    pub fn get(&self, id: Id) -> Option<Individual> {
        let index = id.as_index();
        Some(Individual {
            id,
            sire: *self.sire.get(index)?,
            dam: *self.dam.get(index)?,
        })
    }

    /// Records in id order.
    pub fn iter(&self) -> impl Iterator<Item = Individual> + '_ {
        self.sire
            .iter()
            .zip(self.dam.iter())
            .enumerate()
            .filter_map(|(index, (&sire, &dam))| {
                Id::from_index(index).map(|id| Individual { id, sire, dam })
            })
    }

    /// # Complexity
    ///
    /// `O(N)` in the number of individuals.
    pub fn summary(&self) -> PedigreeSummary {
        let with_both_parents = self
            .sire
            .iter()
            .zip(self.dam.iter())
            .filter(|(s, d)| s.is_some() && d.is_some())
            .count();
        let founders = self
            .sire
            .iter()
            .zip(self.dam.iter())
            .filter(|(s, d)| s.is_none() && d.is_none())
            .count();
        PedigreeSummary {
            individuals: self.len(),
            founders,
            with_both_parents,
        }
    }
}

/// Counts reported after a simulation.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct PedigreeSummary {
    pub individuals: usize,
    pub founders: usize,
    pub with_both_parents: usize,
}

impl PedigreeSummary {
    pub fn descendants(&self) -> usize {
        self.individuals - self.founders
    }

    /// Fraction of descendants with both parents known.
    /// `None` if there are no descendants.
    pub fn completeness(&self) -> Option<f64> {
        match self.descendants() {
            0 => None,
            d => Some(self.with_both_parents as f64 / d as f64),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(value: u32) -> Id {
        Id::new(value).unwrap()
    }

    #[test]
    fn test_ids_are_dense() {
        let mut pedigree = Pedigree::new();
        assert!(pedigree.last_id().is_none());
        assert_eq!(pedigree.add_founder().unwrap(), id(1));
        assert_eq!(pedigree.add_founder().unwrap(), id(2));
        assert_eq!(pedigree.add_offspring(id(1), id(2)).unwrap(), id(3));
        assert_eq!(pedigree.len(), 3);
        assert_eq!(pedigree.last_id(), Some(id(3)));
        let ids = pedigree.iter().map(|i| i.id.get()).collect::<Vec<_>>();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_rejects_self_mating() {
        let mut pedigree = Pedigree::new();
        pedigree.add_founder().unwrap();
        assert!(matches!(
            pedigree.add_offspring(id(1), id(1)),
            Err(PedigreeError::InvalidParentage { id: 2, .. })
        ));
        assert_eq!(pedigree.len(), 1);
    }

    #[test]
    fn test_rejects_parents_from_the_future() {
        let mut pedigree = Pedigree::new();
        pedigree.add_founder().unwrap();
        // id 2 would be the offspring itself
        assert!(pedigree.add_offspring(id(1), id(2)).is_err());
        assert!(pedigree.add_offspring(id(5), id(1)).is_err());
        assert_eq!(pedigree.len(), 1);
    }

    #[test]
    fn test_get() {
        let mut pedigree = Pedigree::new();
        for _ in 0..2 {
            pedigree.add_founder().unwrap();
        }
        pedigree.add_offspring(id(2), id(1)).unwrap();
        let i = pedigree.get(id(3)).unwrap();
        assert_eq!(i.sire, Some(id(2)));
        assert_eq!(i.dam, Some(id(1)));
        assert!(pedigree.get(id(1)).unwrap().is_founder());
        assert!(pedigree.get(id(4)).is_none());
    }

    #[test]
    fn test_from_individuals() {
        let records = vec![
            Individual::founder(id(1)),
            Individual::founder(id(2)),
            Individual {
                id: id(3),
                sire: Some(id(1)),
                dam: Some(id(2)),
            },
        ];
        let pedigree = Pedigree::from_individuals(records.clone()).unwrap();
        assert_eq!(pedigree.iter().collect::<Vec<_>>(), records);

        // out of order
        let records = vec![Individual::founder(id(2))];
        assert!(Pedigree::from_individuals(records).is_err());

        // half-known parentage
        let records = vec![
            Individual::founder(id(1)),
            Individual {
                id: id(2),
                sire: Some(id(1)),
                dam: None,
            },
        ];
        assert!(Pedigree::from_individuals(records).is_err());
    }

    #[test]
    fn test_summary() {
        let mut pedigree = Pedigree::new();
        assert_eq!(pedigree.summary().completeness(), None);
        for _ in 0..3 {
            pedigree.add_founder().unwrap();
        }
        pedigree.add_offspring(id(1), id(2)).unwrap();
        pedigree.add_offspring(id(3), id(4)).unwrap();
        let summary = pedigree.summary();
        assert_eq!(summary.individuals, 5);
        assert_eq!(summary.founders, 3);
        assert_eq!(summary.descendants(), 2);
        assert_eq!(summary.with_both_parents, 2);
        assert_eq!(summary.completeness(), Some(1.0));
    }
}
