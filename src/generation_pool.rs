use std::collections::HashMap;

use nohash::BuildNoHashHasher;

use crate::error::{PedigreeError, Result};
use crate::Generation;
use crate::Id;

type CohortMap = HashMap<Generation, Vec<Id>, BuildNoHashHasher<usize>>;

/// Cohorts that may still contribute parents, keyed by generation.
///
/// Registering generation `g` evicts every cohort older than `g - overlap`,
/// so at most `overlap + 1` cohorts are held after sequential registration.
/// Evicted ids stay valid in the [`Pedigree`](crate::Pedigree), they just
/// can no longer be sampled as parents.
#[derive(Debug, Clone)]
pub struct GenerationPool {
    overlap: usize,
    cohorts: CohortMap,
}

impl GenerationPool {
    pub fn new(overlap: u32) -> Result<Self> {
        if overlap == 0 {
            return Err(PedigreeError::config("generation_overlap must be positive"));
        }
        Ok(Self {
            overlap: overlap as usize,
            cohorts: CohortMap::with_capacity_and_hasher(overlap as usize + 1, Default::default()),
        })
    }

    pub fn overlap(&self) -> usize {
        self.overlap
    }

    /// Add a cohort, then evict the ones that fell out of the window.
    ///
    /// Re-registering a generation replaces its cohort.
    pub fn register(&mut self, generation: Generation, ids: Vec<Id>) {
        let _ = self.cohorts.insert(generation, ids);
        if generation.value() > self.overlap {
            let _ = self.evict_before(generation.saturating_sub(self.overlap));
        }
    }

    /// Remove all cohorts with generation `< threshold`.
    /// Returns the number of cohorts removed.
    pub fn evict_before(&mut self, threshold: Generation) -> usize {
        let before = self.cohorts.len();
        self.cohorts.retain(|&generation, _| generation >= threshold);
        before - self.cohorts.len()
    }

    /// Parents eligible when breeding from generation `current`.
    ///
    /// See [`GenerationPool::eligible_parents_within`].
    pub fn eligible_parents(&self, current: Generation) -> Vec<Id> {
        self.eligible_parents_within(current, self.overlap)
    }

    /// Concatenate the cohorts in `[current - overlap + 1, current]`,
    /// oldest generation first.
    ///
    /// An empty result means that no cohort in the window remains.
    ///
    /// # Complexity
    ///
    /// `O(overlap + P)` where `P` is the number of eligible parents.
    pub fn eligible_parents_within(&self, current: Generation, overlap: usize) -> Vec<Id> {
        if overlap == 0 {
            return vec![];
        }
        let first = current.saturating_sub(overlap - 1).value();
        let window = (first..=current.value())
            .filter_map(|g| self.cohorts.get(&Generation::new(g)))
            .collect::<Vec<_>>();
        let mut parents = Vec::with_capacity(window.iter().map(|c| c.len()).sum());
        for cohort in window {
            parents.extend_from_slice(cohort);
        }
        parents
    }

    pub fn num_cohorts(&self) -> usize {
        self.cohorts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cohorts.is_empty()
    }

    pub fn contains(&self, generation: Generation) -> bool {
        self.cohorts.contains_key(&generation)
    }

    /// Number of ids currently held, eligible or not.
    pub fn num_ids(&self) -> usize {
        self.cohorts.values().map(|c| c.len()).sum()
    }
}
