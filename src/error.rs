use thiserror::Error;

use crate::Generation;

/// Errors raised while generating, selecting from, or
/// serializing a pedigree.
#[derive(Error, Debug)]
pub enum PedigreeError {
    /// Rejected parameters, detected before any generation work starts.
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// The eligible parents cannot provide a sire and a different dam.
    #[error("parent pool of {distinct} distinct individual(s) cannot supply a sire and a different dam")]
    DegeneratePool { distinct: usize },

    #[error("self-mating resampling did not converge after {rounds} rounds")]
    SamplerDidNotConverge { rounds: usize },

    /// Only returned when extinction is configured to be fatal.
    #[error("population went extinct at generation {generation}: produced {produced} of {requested} individuals")]
    Extinction {
        generation: Generation,
        produced: u32,
        requested: u32,
    },

    /// The generator was finished before reaching a terminal step.
    #[error("generation is not finished: produced {produced} of {requested} individuals")]
    NotFinished { produced: u32, requested: u32 },

    #[error("cannot genotype {requested} individuals from a pedigree of {available}")]
    GenotypedExceedsPedigree { requested: u32, available: u32 },

    #[error("invalid parentage for individual {id}: {message}")]
    InvalidParentage { id: u32, message: String },

    #[error("individual id space exhausted")]
    IdOverflow,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },
}

pub type Result<T> = std::result::Result<T, PedigreeError>;

impl PedigreeError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub fn parse(line: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            line,
            message: message.into(),
        }
    }

    pub(crate) fn invalid_parentage(id: u32, message: impl Into<String>) -> Self {
        Self::InvalidParentage {
            id,
            message: message.into(),
        }
    }
}
