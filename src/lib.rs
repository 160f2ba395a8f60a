//! Synthetic pedigrees for animal populations with overlapping generations.
//!
//! Individuals are created in cohorts. Each cohort draws its parents from the
//! `overlap` most recent cohorts, and older cohorts are dropped from the
//! breeding pool as new ones arrive. Memory held for parent sampling
//! is therefore bounded by the window, not by the size of the pedigree.
//!
//! ```no_run
//! use overlapping_pedigree::*;
//!
//! let params = PedigreeParameters::new(1000, 100, 50, 3).unwrap();
//! let generated = simulate_pedigree(params, GenerationOptions::default(), 42).unwrap();
//! let genotyped = select_genotyped(&generated.pedigree, params.n_genotyped).unwrap();
//! assert_eq!(genotyped.len(), 100);
//! ```

use std::num::NonZeroU32;

mod error;
mod flags;
mod generation_pool;
mod generator;
mod genotyped;
pub mod genotypes;
pub mod io;
mod mating;
mod parameters;
mod pedigree;

pub use error::{PedigreeError, Result};
pub use flags::GenerationOptions;
pub use generation_pool::GenerationPool;
pub use generator::{
    simulate_pedigree, GeneratedPedigree, PedigreeGenerator, Progress, Step, Termination,
};
pub use genotyped::{select_genotyped, GenotypedCohort};
pub use mating::{MatePairs, MatingSampler, MAX_RESAMPLING_ROUNDS};
pub use parameters::{PedigreeParameters, DEFAULT_CHUNK_SIZE};
pub use pedigree::{Pedigree, PedigreeSummary};

/// Identifier of an individual.
///
/// Ids are dense and start at 1, in creation order.
/// An unknown parent is `None`, which is written as `0` in files.
#[repr(transparent)]
#[derive(Debug, Copy, Clone, Hash, Eq, PartialEq, PartialOrd, Ord)]
pub struct Id(NonZeroU32);

impl Id {
    pub fn new(value: u32) -> Option<Self> {
        NonZeroU32::new(value).map(Self)
    }

    pub fn get(&self) -> u32 {
        self.0.get()
    }

    /// Position of this id in creation order.
    fn as_index(&self) -> usize {
        self.0.get() as usize - 1
    }

    fn from_index(index: usize) -> Option<Self> {
        let value = u32::try_from(index).ok()?.checked_add(1)?;
        Self::new(value)
    }
}

impl std::fmt::Display for Id {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Index of a cohort. Generation 0 holds the founders.
#[repr(transparent)]
#[derive(Debug, Default, Copy, Clone, Hash, Eq, PartialEq, PartialOrd, Ord)]
pub struct Generation(usize);

impl Generation {
    pub const FOUNDERS: Generation = Generation(0);

    pub fn new(value: usize) -> Self {
        Self(value)
    }

    pub fn value(&self) -> usize {
        self.0
    }

    pub fn next(&self) -> Self {
        Self(self.0 + 1)
    }

    /// Saturates at the founder generation.
    pub fn saturating_sub(&self, generations: usize) -> Self {
        Self(self.0.saturating_sub(generations))
    }
}

impl std::fmt::Display for Generation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// One pedigree record.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Individual {
    pub id: Id,
    pub sire: Option<Id>,
    pub dam: Option<Id>,
}

impl Individual {
    pub fn founder(id: Id) -> Self {
        Self {
            id,
            sire: None,
            dam: None,
        }
    }

    pub fn is_founder(&self) -> bool {
        self.sire.is_none() && self.dam.is_none()
    }
}
