use rand::rngs::StdRng;
use rand::Rng;
use rand::SeedableRng;

use crate::error::{PedigreeError, Result};
use crate::flags::GenerationOptions;
use crate::generation_pool::GenerationPool;
use crate::mating::MatingSampler;
use crate::parameters::PedigreeParameters;
use crate::pedigree::Pedigree;
use crate::Generation;
use crate::Id;

/// Reported after every new cohort, and once more if the run goes extinct.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Progress {
    /// Generation of the cohort just created, or the generation
    /// whose breeding window was empty.
    pub generation: Generation,
    /// Individuals in the pedigree, founders included.
    pub produced: u32,
    pub requested: u32,
    /// Size of the parent pool the cohort was sampled from.
    /// Zero on extinction.
    pub parent_pool: usize,
    /// `Some` only for the final report of an extinct run.
    pub termination: Option<Termination>,
}

/// Outcome of [`PedigreeGenerator::step`].
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Step {
    /// A new cohort with ids `first..=last` was added.
    Cohort {
        generation: Generation,
        first: Id,
        last: Id,
        /// Number of eligible parents the cohort was sampled from.
        parent_pool: usize,
    },
    /// The requested number of individuals exists.
    Complete,
    /// No cohort is left in the breeding window of `generation`.
    Extinct { generation: Generation },
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Termination {
    Completed,
    Extinct { generation: Generation },
}

/// A finished pedigree and how the run ended.
#[derive(Debug, Clone)]
pub struct GeneratedPedigree {
    pub pedigree: Pedigree,
    pub requested: u32,
    pub termination: Termination,
}

impl GeneratedPedigree {
    pub fn produced(&self) -> u32 {
        // The generator never exceeds `requested`, which is a u32.
        self.pedigree.len() as u32
    }

    /// Number of requested individuals that were not produced.
    pub fn shortfall(&self) -> u32 {
        self.requested.saturating_sub(self.produced())
    }

    pub fn is_complete(&self) -> bool {
        matches!(self.termination, Termination::Completed)
    }
}

/// Generates offspring cohort by cohort.
///
/// Each step samples parents from the cohorts of the last
/// `generation_overlap` generations, appends at most `chunk_size`
/// offspring to the pedigree, and registers them as the next generation.
#[derive(Debug)]
pub struct PedigreeGenerator<R> {
    params: PedigreeParameters,
    options: GenerationOptions,
    rng: R,
    pool: GenerationPool,
    pedigree: Pedigree,
    current_generation: Generation,
    termination: Option<Termination>,
}

impl<R: Rng> PedigreeGenerator<R> {
    /// Validate `params` and create the founders as generation 0.
    pub fn new(params: PedigreeParameters, options: GenerationOptions, rng: R) -> Result<Self> {
        params.validate()?;
        let mut pool = GenerationPool::new(params.generation_overlap)?;
        let mut pedigree = Pedigree::with_capacity(params.n_individuals as usize);
        let founders = (0..params.n_founders)
            .map(|_| pedigree.add_founder())
            .collect::<Result<Vec<_>>>()?;
        tracing::debug!(founders = founders.len(), "created founders");
        pool.register(Generation::FOUNDERS, founders);
        Ok(Self {
            params,
            options,
            rng,
            pool,
            pedigree,
            current_generation: Generation::FOUNDERS,
            termination: None,
        })
    }

    pub fn params(&self) -> &PedigreeParameters {
        &self.params
    }

    pub fn current_generation(&self) -> Generation {
        self.current_generation
    }

    pub fn produced(&self) -> u32 {
        self.pedigree.len() as u32
    }

    pub fn pool(&self) -> &GenerationPool {
        &self.pool
    }

    pub fn pedigree(&self) -> &Pedigree {
        &self.pedigree
    }

    /// Remove every cohort older than `threshold` from breeding.
    ///
    /// Culled individuals stay in the pedigree. Culling the whole
    /// window makes the next [`step`](Self::step) report extinction.
    pub fn cull_before(&mut self, threshold: Generation) -> usize {
        let culled = self.pool.evict_before(threshold);
        tracing::debug!(%threshold, culled, "culled cohorts");
        culled
    }

    /// Produce the next cohort.
    ///
    /// Once [`Step::Complete`] or [`Step::Extinct`] has been returned,
    /// every further call returns the same value.
    ///
    /// # Errors
    ///
    /// [`PedigreeError::DegeneratePool`] if the window holds a single
    /// individual, plus errors from the sampler.
    pub fn step(&mut self) -> Result<Step> {
        match self.termination {
            Some(Termination::Completed) => return Ok(Step::Complete),
            Some(Termination::Extinct { generation }) => return Ok(Step::Extinct { generation }),
            None => (),
        }
        let remaining = self.params.n_individuals - self.produced();
        if remaining == 0 {
            self.termination = Some(Termination::Completed);
            return Ok(Step::Complete);
        }

        let parents = self.pool.eligible_parents(self.current_generation);
        if parents.is_empty() {
            let generation = self.current_generation;
            tracing::warn!(
                %generation,
                produced = self.produced(),
                requested = self.params.n_individuals,
                "no parents left in the breeding window"
            );
            self.termination = Some(Termination::Extinct { generation });
            return Ok(Step::Extinct { generation });
        }

        let n_offspring = std::cmp::min(self.params.chunk_size, remaining) as usize;
        let sampler = MatingSampler::new(&parents)?;
        let pairs = sampler.sample_pairs(&mut self.rng, n_offspring)?;

        let mut cohort = Vec::with_capacity(pairs.len());
        for (sire, dam) in pairs.iter() {
            cohort.push(self.pedigree.add_offspring(sire, dam)?);
        }
        let (first, last) = match (cohort.first(), cohort.last()) {
            (Some(&first), Some(&last)) => (first, last),
            _ => unreachable!("a cohort has at least one offspring"),
        };

        let generation = self.current_generation.next();
        self.pool.register(generation, cohort);
        self.current_generation = generation;

        tracing::debug!(
            %generation,
            first = first.get(),
            last = last.get(),
            parent_pool = parents.len(),
            "generated cohort"
        );
        Ok(Step::Cohort {
            generation,
            first,
            last,
            parent_pool: parents.len(),
        })
    }

    pub fn run(self) -> Result<GeneratedPedigree> {
        self.run_with_progress(|_| ())
    }

    /// Step until completion or extinction, calling `progress`
    /// after each new cohort and when the population goes extinct.
    pub fn run_with_progress<F: FnMut(&Progress)>(
        mut self,
        mut progress: F,
    ) -> Result<GeneratedPedigree> {
        loop {
            match self.step()? {
                Step::Cohort {
                    generation,
                    parent_pool,
                    ..
                } => progress(&Progress {
                    generation,
                    produced: self.produced(),
                    requested: self.params.n_individuals,
                    parent_pool,
                    termination: None,
                }),
                Step::Extinct { generation } => {
                    progress(&Progress {
                        generation,
                        produced: self.produced(),
                        requested: self.params.n_individuals,
                        parent_pool: 0,
                        termination: Some(Termination::Extinct { generation }),
                    });
                    break;
                }
                Step::Complete => break,
            }
        }
        self.finish()
    }

    /// Hand over the pedigree built so far.
    ///
    /// # Errors
    ///
    /// [`PedigreeError::NotFinished`] if no terminal [`Step`] has been
    /// reached and individuals are still missing.
    /// [`PedigreeError::Extinction`] if the run went extinct and the
    /// options ask for extinction to be fatal.
    pub fn finish(self) -> Result<GeneratedPedigree> {
        let produced = self.produced();
        let requested = self.params.n_individuals;
        let termination = match self.termination {
            Some(t) => t,
            None if produced == requested => Termination::Completed,
            None => {
                return Err(PedigreeError::NotFinished {
                    produced,
                    requested,
                })
            }
        };
        match termination {
            Termination::Extinct { generation } if self.options.fail_on_extinction() => {
                return Err(PedigreeError::Extinction {
                    generation,
                    produced,
                    requested,
                })
            }
            Termination::Extinct { generation } => tracing::warn!(
                %generation,
                produced,
                requested,
                "pedigree is smaller than requested"
            ),
            Termination::Completed => tracing::info!(
                produced,
                generations = self.current_generation.value(),
                "pedigree complete"
            ),
        }
        Ok(GeneratedPedigree {
            pedigree: self.pedigree,
            requested,
            termination,
        })
    }
}

/// Run a full simulation with a seeded [`StdRng`].
pub fn simulate_pedigree(
    params: PedigreeParameters,
    options: GenerationOptions,
    seed: u64,
) -> Result<GeneratedPedigree> {
    let rng = StdRng::seed_from_u64(seed);
    PedigreeGenerator::new(params, options, rng)?.run()
}
