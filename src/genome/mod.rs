//! Genome module for creature genetics.
//!
//! A genome is an ordered list of packed genes. It is compiled into a
//! [`Brain`](crate::neural::Brain) when a creature is created, and mutated
//! into a new value when offspring are produced.

mod gene;
mod mutation;

pub use gene::{Gene, SinkKind, SourceKind, WEIGHT_SCALE};
pub use mutation::{MutationConfig, MutationMode};

use crate::error::{Result, SimError};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;

/// Ordered gene sequence. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<Gene>", into = "Vec<Gene>")]
pub struct Genome {
    genes: Vec<Gene>,
}

impl Genome {
    /// Create a genome of `length` uniformly random genes
    pub fn random<R: Rng + ?Sized>(length: usize, rng: &mut R) -> Result<Self> {
        let length = NonZeroUsize::new(length)
            .ok_or_else(|| SimError::config("genome length must be > 0"))?;
        Ok(Self::random_non_empty(length, rng))
    }

    /// Infallible form of [`Genome::random`]
    pub fn random_non_empty<R: Rng + ?Sized>(length: NonZeroUsize, rng: &mut R) -> Self {
        Self {
            genes: (0..length.get()).map(|_| Gene::random(rng)).collect(),
        }
    }

    /// Wrap an existing gene list
    pub fn from_genes(genes: Vec<Gene>) -> Result<Self> {
        if genes.is_empty() {
            return Err(SimError::config("genome must contain at least one gene"));
        }
        Ok(Self { genes })
    }

    #[inline]
    pub fn genes(&self) -> &[Gene] {
        &self.genes
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.genes.len()
    }

    /// Always false for a constructed genome, kept for API symmetry
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }

    /// Canonical key used to group creatures into species.
    ///
    /// Identical gene sequences produce identical keys.
    pub fn comparable_key(&self) -> String {
        let mut key = String::with_capacity(self.genes.len() * 11);
        for (i, gene) in self.genes.iter().enumerate() {
            if i > 0 {
                key.push(',');
            }
            key.push_str(&gene.0.to_string());
        }
        key
    }

    /// Concatenated hex representation of all genes
    pub fn to_hex_string(&self) -> String {
        self.genes.iter().map(|g| g.to_string()).collect::<Vec<_>>().join(" ")
    }

    /// Stable display colour derived from the genes (FNV-1a over the words)
    pub fn color(&self) -> [u8; 3] {
        let mut hash: u32 = 0x811c_9dc5;
        for gene in &self.genes {
            for byte in gene.0.to_le_bytes() {
                hash ^= byte as u32;
                hash = hash.wrapping_mul(0x0100_0193);
            }
        }
        // Keep channels away from black so creatures stay visible
        let channel = |shift: u32| 64 + ((hash >> shift) & 0xFF) as u8 / 4 * 3;
        [channel(0), channel(8), channel(16)]
    }

    pub(crate) fn genes_mut(&mut self) -> &mut Vec<Gene> {
        &mut self.genes
    }
}

impl TryFrom<Vec<Gene>> for Genome {
    type Error = SimError;

    fn try_from(genes: Vec<Gene>) -> Result<Self> {
        Self::from_genes(genes)
    }
}

impl From<Genome> for Vec<Gene> {
    fn from(genome: Genome) -> Self {
        genome.genes
    }
}
