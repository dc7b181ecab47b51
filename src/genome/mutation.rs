//! Genome mutations: point mutations plus gene insertion/deletion.

use super::{Gene, Genome};
use crate::config::Config;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Granularity of a point mutation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MutationMode {
    /// Replace the whole packed gene with a new random value
    #[default]
    WholeGene,
    /// Flip one random bit
    SingleBit,
    /// Replace one random 4-bit nibble
    SingleHexDigit,
}

/// Configuration for mutation operations
#[derive(Clone, Debug)]
pub struct MutationConfig {
    /// Probability of a point mutation, per gene
    pub mutation_probability: f64,
    /// Probability of one insertion or deletion, per genome
    pub insertion_deletion_probability: f64,
    /// Share of insertion/deletion events that delete
    pub deletion_ratio: f64,
    pub mode: MutationMode,
    /// Insertions stop at this length
    pub max_genome_size: usize,
}

impl Default for MutationConfig {
    fn default() -> Self {
        Self {
            mutation_probability: 0.05,
            insertion_deletion_probability: 0.015,
            deletion_ratio: 0.5,
            mode: MutationMode::WholeGene,
            max_genome_size: 30,
        }
    }
}

impl MutationConfig {
    pub fn from_config(config: &Config) -> Self {
        Self {
            mutation_probability: config.genome.mutation_probability,
            insertion_deletion_probability: config.genome.insertion_deletion_probability,
            deletion_ratio: config.genome.deletion_ratio,
            mode: config.genome.mutation_mode,
            max_genome_size: config.genome.max_genome_size,
        }
    }

    /// Config that leaves every genome untouched
    pub fn none() -> Self {
        Self {
            mutation_probability: 0.0,
            insertion_deletion_probability: 0.0,
            ..Self::default()
        }
    }
}

/// `gen_bool` panics outside [0, 1], mutation never fails
#[inline]
fn chance<R: Rng + ?Sized>(rng: &mut R, p: f64) -> bool {
    if p.is_nan() || p <= 0.0 {
        false
    } else if p >= 1.0 {
        true
    } else {
        rng.gen_bool(p)
    }
}

impl Genome {
    /// Return a mutated copy. The receiver is never modified.
    pub fn mutate<R: Rng + ?Sized>(&self, config: &MutationConfig, rng: &mut R) -> Genome {
        let mut child = self.clone();

        for gene in child.genes_mut().iter_mut() {
            if chance(rng, config.mutation_probability) {
                *gene = point_mutation(*gene, config.mode, rng);
            }
        }

        if chance(rng, config.insertion_deletion_probability) {
            let genes = child.genes_mut();
            if chance(rng, config.deletion_ratio) {
                if genes.len() > 1 {
                    let index = rng.gen_range(0..genes.len());
                    genes.remove(index);
                }
            } else if genes.len() < config.max_genome_size {
                let index = rng.gen_range(0..=genes.len());
                genes.insert(index, Gene::random(rng));
            }
        }

        child
    }
}

fn point_mutation<R: Rng + ?Sized>(gene: Gene, mode: MutationMode, rng: &mut R) -> Gene {
    match mode {
        MutationMode::WholeGene => Gene::random(rng),
        MutationMode::SingleBit => gene.with_flipped_bit(rng.gen_range(0..32)),
        MutationMode::SingleHexDigit => gene.with_nibble(rng.gen_range(0..8), rng.gen_range(0..16)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn genome(len: usize, seed: u64) -> Genome {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        Genome::random(len, &mut rng).unwrap()
    }

    #[test]
    fn test_zero_probability_is_identity() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for mode in [
            MutationMode::WholeGene,
            MutationMode::SingleBit,
            MutationMode::SingleHexDigit,
        ] {
            for ratio in [0.0, 0.5, 1.0] {
                let original = genome(15, 3);
                let config = MutationConfig {
                    deletion_ratio: ratio,
                    mode,
                    ..MutationConfig::none()
                };
                assert_eq!(original.mutate(&config, &mut rng), original);
            }
        }
    }

    #[test]
    fn test_mutate_does_not_touch_input() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let original = genome(10, 5);
        let snapshot = original.clone();
        let config = MutationConfig {
            mutation_probability: 1.0,
            insertion_deletion_probability: 1.0,
            ..MutationConfig::default()
        };

        let child = original.mutate(&config, &mut rng);

        assert_eq!(original, snapshot);
        assert_ne!(child, original);
    }

    #[test]
    fn test_single_bit_changes_one_bit_per_gene() {
        let mut rng = ChaCha8Rng::seed_from_u64(13);
        let original = genome(20, 9);
        let config = MutationConfig {
            mutation_probability: 1.0,
            mode: MutationMode::SingleBit,
            ..MutationConfig::none()
        };

        let child = original.mutate(&config, &mut rng);

        assert_eq!(child.len(), original.len());
        for (a, b) in original.genes().iter().zip(child.genes()) {
            assert_eq!((a.0 ^ b.0).count_ones(), 1);
        }
    }

    #[test]
    fn test_hex_digit_changes_at_most_one_nibble() {
        let mut rng = ChaCha8Rng::seed_from_u64(17);
        let original = genome(20, 4);
        let config = MutationConfig {
            mutation_probability: 1.0,
            mode: MutationMode::SingleHexDigit,
            ..MutationConfig::none()
        };

        let child = original.mutate(&config, &mut rng);

        for (a, b) in original.genes().iter().zip(child.genes()) {
            let diff = a.0 ^ b.0;
            let nibbles = (0..8).filter(|n| diff & (0xF << (n * 4)) != 0).count();
            assert!(nibbles <= 1);
        }
    }

    #[test]
    fn test_insertion_capped_at_max_size() {
        let mut rng = ChaCha8Rng::seed_from_u64(19);
        let mut current = genome(8, 1);
        let config = MutationConfig {
            mutation_probability: 0.0,
            insertion_deletion_probability: 1.0,
            deletion_ratio: 0.0,
            mode: MutationMode::WholeGene,
            max_genome_size: 8,
        };

        for _ in 0..200 {
            current = current.mutate(&config, &mut rng);
            assert_eq!(current.len(), 8);
        }
    }

    #[test]
    fn test_insertion_grows_below_cap() {
        let mut rng = ChaCha8Rng::seed_from_u64(23);
        let original = genome(3, 2);
        let config = MutationConfig {
            mutation_probability: 0.0,
            insertion_deletion_probability: 1.0,
            deletion_ratio: 0.0,
            mode: MutationMode::WholeGene,
            max_genome_size: 10,
        };

        assert_eq!(original.mutate(&config, &mut rng).len(), 4);
    }

    #[test]
    fn test_deletion_never_empties_genome() {
        let mut rng = ChaCha8Rng::seed_from_u64(29);
        let mut current = genome(5, 6);
        let config = MutationConfig {
            mutation_probability: 0.0,
            insertion_deletion_probability: 1.0,
            deletion_ratio: 1.0,
            mode: MutationMode::WholeGene,
            max_genome_size: 10,
        };

        for _ in 0..20 {
            current = current.mutate(&config, &mut rng);
        }

        assert_eq!(current.len(), 1);
    }

    #[test]
    fn test_out_of_range_probabilities_do_not_panic() {
        let mut rng = ChaCha8Rng::seed_from_u64(31);
        let original = genome(5, 8);
        let config = MutationConfig {
            mutation_probability: 3.0,
            insertion_deletion_probability: -1.0,
            deletion_ratio: f64::NAN,
            mode: MutationMode::SingleBit,
            max_genome_size: 10,
        };

        let child = original.mutate(&config, &mut rng);
        assert_eq!(child.len(), 5);
    }
}
