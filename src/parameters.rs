//! Parameters of a pedigree simulation.

use crate::error::{PedigreeError, Result};

/// Offspring produced per generation step unless configured otherwise.
pub const DEFAULT_CHUNK_SIZE: u32 = 100_000;

/// Sizes controlling one pedigree simulation.
///
/// Fields are public for convenience. [`PedigreeGenerator::new`](crate::PedigreeGenerator::new)
/// validates them again before anything is generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PedigreeParameters {
    /// Total number of individuals, founders included.
    pub n_individuals: u32,
    /// Number of most recent individuals selected for genotyping.
    pub n_genotyped: u32,
    /// Individuals with unknown parents created up front.
    pub n_founders: u32,
    /// Number of most recent generations that breed simultaneously.
    pub generation_overlap: u32,
    /// Offspring per generation step. Bounds the size of each cohort.
    pub chunk_size: u32,
}

impl Default for PedigreeParameters {
    fn default() -> Self {
        Self {
            n_individuals: 10_000_000,
            n_genotyped: 1_000_000,
            n_founders: 50_000,
            generation_overlap: 5,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

impl PedigreeParameters {
    pub fn new(
        n_individuals: u32,
        n_genotyped: u32,
        n_founders: u32,
        generation_overlap: u32,
    ) -> Result<Self> {
        let rv = Self {
            n_individuals,
            n_genotyped,
            n_founders,
            generation_overlap,
            chunk_size: DEFAULT_CHUNK_SIZE,
        };
        rv.validate()?;
        Ok(rv)
    }

    pub fn with_chunk_size(self, chunk_size: u32) -> Result<Self> {
        let rv = Self { chunk_size, ..self };
        rv.validate()?;
        Ok(rv)
    }

    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("n_individuals", self.n_individuals),
            ("n_genotyped", self.n_genotyped),
            ("n_founders", self.n_founders),
            ("generation_overlap", self.generation_overlap),
            ("chunk_size", self.chunk_size),
        ] {
            if value == 0 {
                return Err(PedigreeError::config(format!("{name} must be positive")));
            }
        }
        if self.n_genotyped > self.n_individuals {
            return Err(PedigreeError::config(format!(
                "n_genotyped ({}) exceeds n_individuals ({})",
                self.n_genotyped, self.n_individuals
            )));
        }
        if self.n_founders > self.n_individuals {
            return Err(PedigreeError::config(format!(
                "n_founders ({}) exceeds n_individuals ({})",
                self.n_founders, self.n_individuals
            )));
        }
        Ok(())
    }

    pub fn n_descendants(&self) -> u32 {
        self.n_individuals - self.n_founders
    }
}
