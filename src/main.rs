//! Command line front end: simulate a pedigree, then genotypes for its
//! most recent individuals.

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing_subscriber::EnvFilter;

use overlapping_pedigree::genotypes::{simulate_genotypes, GenotypeParameters};
use overlapping_pedigree::io::{read_genotyped_file, write_genotyped_file, write_pedigree_file};
use overlapping_pedigree::{
    select_genotyped, GenerationOptions, PedigreeGenerator, PedigreeParameters,
};

/// Synthetic pedigrees with overlapping generations
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Simulate a pedigree and select the genotyped individuals
    Pedigree {
        /// Total number of individuals
        #[arg(short = 'n', long, default_value = "10000000")]
        n_individuals: u32,

        /// Number of most recent individuals to genotype
        #[arg(short = 'g', long, default_value = "1000000")]
        n_genotyped: u32,

        /// Number of founders with unknown parents
        #[arg(short = 'f', long, default_value = "50000")]
        n_founders: u32,

        /// Number of most recent generations breeding together
        #[arg(short = 'o', long, default_value = "5")]
        generation_overlap: u32,

        /// Offspring per generation step
        #[arg(long, default_value = "100000")]
        chunk_size: u32,

        /// Fail instead of writing a short pedigree if the population dies out
        #[arg(long)]
        fail_on_extinction: bool,

        /// Random seed
        #[arg(long)]
        seed: Option<u64>,

        /// Pedigree output path
        #[arg(long, default_value = "pedigree.txt")]
        pedigree_out: PathBuf,

        /// Genotyped cross-reference output path
        #[arg(long, default_value = "genotypes.txt_XrefID")]
        genotyped_out: PathBuf,
    },

    /// Simulate marker genotypes for the ids of a cross-reference file
    Genotypes {
        /// Genotyped cross-reference file
        #[arg(short, long, default_value = "genotypes.txt_XrefID")]
        input: PathBuf,

        /// Genotype output path
        #[arg(short, long, default_value = "genotypes.txt")]
        output: PathBuf,

        /// Number of markers
        #[arg(long, default_value = "50000")]
        n_snps: usize,

        /// Smallest minor allele frequency
        #[arg(long, default_value = "0.05")]
        maf_min: f64,

        /// Largest minor allele frequency
        #[arg(long, default_value = "0.5")]
        maf_max: f64,

        /// Random seed
        #[arg(long)]
        seed: Option<u64>,
    },
}

fn rng_from(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

fn run_pedigree(
    params: PedigreeParameters,
    options: GenerationOptions,
    seed: Option<u64>,
    pedigree_out: PathBuf,
    genotyped_out: PathBuf,
) -> Result<()> {
    tracing::info!(?params, "simulating pedigree");
    let generator = PedigreeGenerator::new(params, options, rng_from(seed))?;
    let report_every = (1_000_000 / params.chunk_size).max(1) as usize;
    let generated = generator.run_with_progress(|p| {
        if p.termination.is_some() {
            tracing::info!(
                generation = p.generation.value(),
                produced = p.produced,
                requested = p.requested,
                "breeding window is empty"
            );
        } else if p.generation.value() % report_every == 0 {
            tracing::info!(
                generation = p.generation.value(),
                produced = p.produced,
                requested = p.requested,
                "progress"
            );
        }
    })?;
    if !generated.is_complete() {
        tracing::warn!(
            produced = generated.produced(),
            shortfall = generated.shortfall(),
            "population went extinct before reaching the requested size"
        );
    }

    write_pedigree_file(&generated.pedigree, &pedigree_out)
        .with_context(|| format!("writing {}", pedigree_out.display()))?;
    tracing::info!(path = %pedigree_out.display(), "pedigree written");

    let cohort = select_genotyped(&generated.pedigree, params.n_genotyped)?;
    write_genotyped_file(&cohort, &genotyped_out)
        .with_context(|| format!("writing {}", genotyped_out.display()))?;
    tracing::info!(
        path = %genotyped_out.display(),
        first = cohort.first().get(),
        last = cohort.last().get(),
        "genotyped individuals written"
    );

    let summary = generated.pedigree.summary();
    tracing::info!(
        individuals = summary.individuals,
        founders = summary.founders,
        descendants = summary.descendants(),
        genotyped = cohort.len(),
        genotyped_fraction = cohort.len() as f64 / summary.individuals as f64,
        with_both_parents = summary.with_both_parents,
        completeness = summary.completeness().unwrap_or(0.0),
        "pedigree summary"
    );
    Ok(())
}

fn run_genotypes(
    input: PathBuf,
    output: PathBuf,
    params: GenotypeParameters,
    seed: Option<u64>,
) -> Result<()> {
    let ids = read_genotyped_file(&input)
        .with_context(|| format!("reading {}", input.display()))?;
    let mut rng = rng_from(seed);
    let file = File::create(&output).with_context(|| format!("creating {}", output.display()))?;
    let mut writer = BufWriter::new(file);
    simulate_genotypes(&ids, &params, &mut rng, &mut writer)
        .with_context(|| format!("writing {}", output.display()))?;
    tracing::info!(
        path = %output.display(),
        individuals = ids.len(),
        markers = params.n_snps,
        "genotypes written"
    );
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    match Cli::parse().command {
        Commands::Pedigree {
            n_individuals,
            n_genotyped,
            n_founders,
            generation_overlap,
            chunk_size,
            fail_on_extinction,
            seed,
            pedigree_out,
            genotyped_out,
        } => {
            let params =
                PedigreeParameters::new(n_individuals, n_genotyped, n_founders, generation_overlap)?
                    .with_chunk_size(chunk_size)?;
            let mut options = GenerationOptions::default();
            if fail_on_extinction {
                options = options.with_fail_on_extinction();
            }
            run_pedigree(params, options, seed, pedigree_out, genotyped_out)
        }
        Commands::Genotypes {
            input,
            output,
            n_snps,
            maf_min,
            maf_max,
            seed,
        } => {
            let params = GenotypeParameters {
                n_snps,
                maf_min,
                maf_max,
                ..Default::default()
            };
            params.validate()?;
            run_genotypes(input, output, params, seed)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_pedigree_defaults() {
        let cli = Cli::parse_from(["overlapping_pedigree", "pedigree"]);
        match cli.command {
            Commands::Pedigree {
                n_individuals,
                n_genotyped,
                n_founders,
                generation_overlap,
                chunk_size,
                ..
            } => {
                let defaults = PedigreeParameters::default();
                assert_eq!(n_individuals, defaults.n_individuals);
                assert_eq!(n_genotyped, defaults.n_genotyped);
                assert_eq!(n_founders, defaults.n_founders);
                assert_eq!(generation_overlap, defaults.generation_overlap);
                assert_eq!(chunk_size, defaults.chunk_size);
            }
            other => panic!("{other:?}"),
        }
    }

    #[test]
    fn test_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        let ped = dir.path().join("pedigree.txt");
        let xref = dir.path().join("xref.txt");
        let genos = dir.path().join("genotypes.txt");
        let params = PedigreeParameters::new(100, 5, 10, 2)
            .unwrap()
            .with_chunk_size(20)
            .unwrap();
        run_pedigree(
            params,
            GenerationOptions::default(),
            Some(1),
            ped.clone(),
            xref.clone(),
        )
        .unwrap();
        let genotype_params = GenotypeParameters {
            n_snps: 3,
            ..Default::default()
        };
        run_genotypes(xref, genos.clone(), genotype_params, Some(2)).unwrap();
        let text = std::fs::read_to_string(genos).unwrap();
        let ids = text
            .lines()
            .map(|l| l.split_whitespace().next().unwrap())
            .collect::<Vec<_>>();
        assert_eq!(ids, vec!["096", "097", "098", "099", "100"]);
        assert_eq!(std::fs::read_to_string(ped).unwrap().lines().count(), 100);
    }
}
