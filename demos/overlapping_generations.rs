use overlapping_pedigree::*;

// Breed a population step by step and cull every cohort
// once `bottleneck` generations have passed.
fn bottleneck(popsize: u32, overlap: u32, bottleneck: usize, seed: u64) -> GeneratedPedigree {
    use rand::SeedableRng;

    let params = PedigreeParameters::new(popsize * 20, popsize, popsize, overlap)
        .and_then(|p| p.with_chunk_size(popsize))
        .unwrap();
    let rng = rand::rngs::StdRng::seed_from_u64(seed);
    let mut generator = PedigreeGenerator::new(params, GenerationOptions::default(), rng).unwrap();

    loop {
        match generator.step().unwrap() {
            Step::Cohort { generation, .. } if generation.value() == bottleneck => {
                let _ = generator.cull_before(generation.next());
            }
            Step::Cohort { .. } => (),
            Step::Complete | Step::Extinct { .. } => break,
        }
    }
    generator.finish().unwrap()
}

pub fn main() {
    let generated = bottleneck(1000, 3, 8, 213512);
    let summary = generated.pedigree.summary();
    println!(
        "{} {} {:?}",
        summary.individuals,
        generated.shortfall(),
        generated.termination
    );
}
