//! Marker genotypes for the genotyped cohort.
//!
//! Each marker gets a minor allele frequency `p` drawn uniformly from a
//! configured range. Calls `0`, `1` and `2` are then sampled independently
//! for every individual with Hardy-Weinberg weights `q²`, `2pq` and `p²`.

use std::io::Write;

use rand::distributions::{Distribution, Uniform, WeightedIndex};
use rand::Rng;

use crate::error::{PedigreeError, Result};
use crate::Id;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenotypeParameters {
    pub n_snps: usize,
    pub maf_min: f64,
    pub maf_max: f64,
    /// Individuals between two progress reports.
    pub chunk_size: usize,
}

impl Default for GenotypeParameters {
    fn default() -> Self {
        Self {
            n_snps: 50_000,
            maf_min: 0.05,
            maf_max: 0.5,
            chunk_size: 10_000,
        }
    }
}

impl GenotypeParameters {
    pub fn validate(&self) -> Result<()> {
        if self.n_snps == 0 {
            return Err(PedigreeError::config("n_snps must be positive"));
        }
        if self.chunk_size == 0 {
            return Err(PedigreeError::config("chunk_size must be positive"));
        }
        let in_range = |f: f64| f.is_finite() && (0.0..=0.5).contains(&f);
        if !in_range(self.maf_min) || !in_range(self.maf_max) || self.maf_min > self.maf_max {
            return Err(PedigreeError::config(format!(
                "invalid minor allele frequency range [{}, {}]",
                self.maf_min, self.maf_max
            )));
        }
        Ok(())
    }
}

/// Per-marker allele frequencies and genotype call distributions.
#[derive(Debug, Clone)]
pub struct MarkerPanel {
    mafs: Vec<f64>,
    calls: Vec<WeightedIndex<f64>>,
}

impl MarkerPanel {
    pub fn sample<R: Rng + ?Sized>(params: &GenotypeParameters, rng: &mut R) -> Result<Self> {
        params.validate()?;
        let maf = Uniform::new_inclusive(params.maf_min, params.maf_max);
        let mafs = (0..params.n_snps)
            .map(|_| maf.sample(rng))
            .collect::<Vec<_>>();
        Self::from_mafs(mafs)
    }

    pub fn from_mafs(mafs: Vec<f64>) -> Result<Self> {
        let calls = mafs
            .iter()
            .map(|&p| {
                let q = 1.0 - p;
                WeightedIndex::new([q * q, 2.0 * p * q, p * p]).map_err(|e| {
                    PedigreeError::config(format!("invalid minor allele frequency {p}: {e}"))
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { mafs, calls })
    }

    pub fn len(&self) -> usize {
        self.mafs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mafs.is_empty()
    }

    pub fn mafs(&self) -> &[f64] {
        &self.mafs
    }

    /// Fill `buffer` with one ASCII call (`b'0'`, `b'1'` or `b'2'`) per marker.
    pub fn genotype<R: Rng + ?Sized>(&self, rng: &mut R, buffer: &mut Vec<u8>) {
        buffer.clear();
        buffer.extend(self.calls.iter().map(|c| b'0' + c.sample(rng) as u8));
    }
}

/// Width of the largest id, used to left-pad every id with zeros.
pub fn id_width(ids: &[Id]) -> usize {
    ids.iter()
        .map(|id| id.get())
        .max()
        .map_or(0, |m| m.to_string().len())
}

/// Write `<zero-padded id> <calls>` for every id, in input order.
pub fn write_genotypes<R: Rng + ?Sized, W: Write>(
    ids: &[Id],
    panel: &MarkerPanel,
    chunk_size: usize,
    rng: &mut R,
    writer: &mut W,
) -> Result<()> {
    let width = id_width(ids);
    let mut calls = Vec::with_capacity(panel.len());
    for (chunk_index, chunk) in ids.chunks(chunk_size.max(1)).enumerate() {
        tracing::info!(
            done = chunk_index * chunk_size,
            total = ids.len(),
            "simulating genotypes"
        );
        for id in chunk {
            panel.genotype(rng, &mut calls);
            write!(writer, "{:0width$} ", id.get())?;
            writer.write_all(&calls)?;
            writer.write_all(b"\n")?;
        }
    }
    writer.flush()?;
    Ok(())
}

/// Sample a marker panel and write genotypes for `ids`.
pub fn simulate_genotypes<R: Rng + ?Sized, W: Write>(
    ids: &[Id],
    params: &GenotypeParameters,
    rng: &mut R,
    writer: &mut W,
) -> Result<MarkerPanel> {
    let panel = MarkerPanel::sample(params, rng)?;
    tracing::info!(
        individuals = ids.len(),
        markers = panel.len(),
        id_width = id_width(ids),
        "writing genotypes"
    );
    write_genotypes(ids, &panel, params.chunk_size, rng, writer)?;
    Ok(panel)
}
