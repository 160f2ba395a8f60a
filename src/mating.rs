use rand::distributions::Uniform;
use rand::Rng;

use crate::error::{PedigreeError, Result};
use crate::Id;

/// Upper bound on dam redraw rounds for one batch.
///
/// A pool with two distinct candidates resolves each collision with
/// probability at least `1 / pool.len()` per round.
pub const MAX_RESAMPLING_ROUNDS: usize = 10_000;

/// Parents sampled for a batch of offspring.
/// `sires[i]` and `dams[i]` are the parents of offspring `i`.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MatePairs {
    sires: Vec<Id>,
    dams: Vec<Id>,
}

impl MatePairs {
    pub fn len(&self) -> usize {
        debug_assert_eq!(self.sires.len(), self.dams.len());
        self.sires.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn sires(&self) -> &[Id] {
        &self.sires
    }

    pub fn dams(&self) -> &[Id] {
        &self.dams
    }

    /// `(sire, dam)` pairs in offspring order.
    pub fn iter(&self) -> impl Iterator<Item = (Id, Id)> + '_ {
        self.sires.iter().copied().zip(self.dams.iter().copied())
    }
}

/// Draws parent pairs uniformly, with replacement, from one
/// sex-agnostic pool.
#[derive(Debug, Clone)]
pub struct MatingSampler<'pool> {
    pool: &'pool [Id],
    sample_parent: Uniform<usize>,
}

impl<'pool> MatingSampler<'pool> {
    /// # Errors
    ///
    /// [`PedigreeError::DegeneratePool`] if `pool` has fewer than two
    /// distinct ids, since no pair could then satisfy `sire != dam`.
    pub fn new(pool: &'pool [Id]) -> Result<Self> {
        let distinct = match pool.first() {
            None => 0,
            Some(&first) if pool.iter().any(|&p| p != first) => 2,
            Some(_) => 1,
        };
        if distinct < 2 {
            return Err(PedigreeError::DegeneratePool { distinct });
        }
        Ok(Self {
            pool,
            sample_parent: Uniform::new(0, pool.len()),
        })
    }

    pub fn pool_size(&self) -> usize {
        self.pool.len()
    }

    fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> Id {
        self.pool[rng.sample(self.sample_parent)]
    }

    /// Sample `n_pairs` pairs with `sires[i] != dams[i]` for all `i`.
    ///
    /// Sires and dams are drawn independently. Colliding dams are then
    /// redrawn from the full pool until no collision is left.
    pub fn sample_pairs<R: Rng + ?Sized>(&self, rng: &mut R, n_pairs: usize) -> Result<MatePairs> {
        let sires = (0..n_pairs).map(|_| self.draw(rng)).collect::<Vec<_>>();
        let mut dams = (0..n_pairs).map(|_| self.draw(rng)).collect::<Vec<_>>();

        let mut colliding = sires
            .iter()
            .zip(dams.iter())
            .enumerate()
            .filter_map(|(i, (s, d))| if s == d { Some(i) } else { None })
            .collect::<Vec<_>>();

        let mut rounds = 0;
        while !colliding.is_empty() {
            if rounds == MAX_RESAMPLING_ROUNDS {
                return Err(PedigreeError::SamplerDidNotConverge { rounds });
            }
            for &i in &colliding {
                dams[i] = self.draw(rng);
            }
            colliding.retain(|&i| sires[i] == dams[i]);
            rounds += 1;
        }

        Ok(MatePairs { sires, dams })
    }
}
