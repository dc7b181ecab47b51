//! Performance benchmarks for NEUROGRID

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use neurogrid::creature::{ActionRegistry, SensorRegistry};
use neurogrid::genome::{Genome, MutationConfig};
use neurogrid::neural::Brain;
use neurogrid::{Config, World};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn benchmark_world_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("world_step");

    for population in [100, 500, 2000].iter() {
        let mut config = Config::default();
        config.world.initial_population = *population;

        let mut world = World::new_with_seed(config, 42).unwrap();

        // Warm up
        world.run(10);

        group.bench_with_input(BenchmarkId::new("population", population), population, |b, _| {
            b.iter(|| {
                world.step();
            });
        });
    }

    group.finish();
}

fn benchmark_brain(c: &mut Criterion) {
    let sensors = SensorRegistry::default();
    let actions = ActionRegistry::default();
    let inputs = vec![0.5f32; sensors.neuron_count()];

    let mut group = c.benchmark_group("brain");

    for genes in [8usize, 32, 128].iter() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let genome = Genome::random(*genes, &mut rng).unwrap();

        group.bench_with_input(BenchmarkId::new("compile", genes), &genome, |b, genome| {
            b.iter(|| Brain::compile(black_box(genome), sensors.neuron_count(), actions.neuron_count(), 8));
        });

        let mut brain = Brain::compile(&genome, sensors.neuron_count(), actions.neuron_count(), 8);
        group.bench_with_input(BenchmarkId::new("evaluate", genes), &inputs, |b, inputs| {
            b.iter(|| brain.evaluate(black_box(inputs)));
        });
    }

    group.finish();
}

fn benchmark_mutation(c: &mut Criterion) {
    let config = Config::default();
    let mutation = MutationConfig::from_config(&config);
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    let genome = Genome::random(config.genome.initial_genome_size, &mut rng).unwrap();

    c.bench_function("genome_mutate", |b| {
        b.iter(|| black_box(&genome).mutate(&mutation, &mut rng));
    });
}

fn benchmark_generation(c: &mut Criterion) {
    let mut config = Config::default();
    config.world.initial_population = 300;
    config.world.steps_per_generation = 50;
    let mut world = World::new_with_seed(config, 3).unwrap();

    c.bench_function("full_generation", |b| {
        b.iter(|| world.run_generations(1));
    });
}

criterion_group!(
    benches,
    benchmark_world_step,
    benchmark_brain,
    benchmark_mutation,
    benchmark_generation,
);
criterion_main!(benches);
