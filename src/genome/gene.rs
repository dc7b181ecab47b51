//! Packed gene encoding.
//!
//! A gene is one candidate edge of a creature's brain, stored in a `u32`:
//!
//! ```text
//!  31  30..24   23  22..16   15..0
//! [sk][source][tk][ sink ][ weight ]
//! ```
//!
//! - `sk`: source kind (0 = sensor, 1 = internal neuron)
//! - `tk`: sink kind (0 = internal neuron, 1 = action)
//! - indices are 7 bits and wrap against the enabled counts at decode time
//! - weight is a signed 16-bit fixed point value, `raw / 8192` in [-4.0, 4.0)

use rand::Rng;
use serde::{Deserialize, Serialize};

const SOURCE_KIND_BIT: u32 = 1 << 31;
const SOURCE_INDEX_SHIFT: u32 = 24;
const SINK_KIND_BIT: u32 = 1 << 23;
const SINK_INDEX_SHIFT: u32 = 16;
const INDEX_MASK: u32 = 0x7F;
const WEIGHT_MASK: u32 = 0xFFFF;

/// Fixed point divisor for the weight field.
pub const WEIGHT_SCALE: f32 = 8192.0;

/// Where an edge starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    Sensor,
    Neuron,
}

/// Where an edge ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SinkKind {
    Neuron,
    Action,
}

/// One packed gene
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Gene(pub u32);

impl Gene {
    /// Draw a gene with every field uniformly random
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self(rng.gen())
    }

    /// Build a gene from its fields. Indices are truncated to 7 bits.
    pub fn new(
        source_kind: SourceKind,
        source_index: u8,
        sink_kind: SinkKind,
        sink_index: u8,
        weight: f32,
    ) -> Self {
        let mut bits = 0u32;
        if source_kind == SourceKind::Neuron {
            bits |= SOURCE_KIND_BIT;
        }
        bits |= (source_index as u32 & INDEX_MASK) << SOURCE_INDEX_SHIFT;
        if sink_kind == SinkKind::Action {
            bits |= SINK_KIND_BIT;
        }
        bits |= (sink_index as u32 & INDEX_MASK) << SINK_INDEX_SHIFT;

        let raw = (weight * WEIGHT_SCALE)
            .round()
            .clamp(i16::MIN as f32, i16::MAX as f32) as i16;
        bits |= raw as u16 as u32;

        Self(bits)
    }

    #[inline]
    pub fn source_kind(self) -> SourceKind {
        if self.0 & SOURCE_KIND_BIT == 0 {
            SourceKind::Sensor
        } else {
            SourceKind::Neuron
        }
    }

    #[inline]
    pub fn source_index(self) -> usize {
        ((self.0 >> SOURCE_INDEX_SHIFT) & INDEX_MASK) as usize
    }

    #[inline]
    pub fn sink_kind(self) -> SinkKind {
        if self.0 & SINK_KIND_BIT == 0 {
            SinkKind::Neuron
        } else {
            SinkKind::Action
        }
    }

    #[inline]
    pub fn sink_index(self) -> usize {
        ((self.0 >> SINK_INDEX_SHIFT) & INDEX_MASK) as usize
    }

    /// Connection weight in [-4.0, 4.0)
    #[inline]
    pub fn weight(self) -> f32 {
        (self.0 & WEIGHT_MASK) as u16 as i16 as f32 / WEIGHT_SCALE
    }

    /// Flip a single bit (0..32, wraps)
    #[inline]
    pub fn with_flipped_bit(self, bit: u32) -> Self {
        Self(self.0 ^ (1 << (bit % 32)))
    }

    /// Replace one of the eight 4-bit nibbles (0..8, wraps)
    #[inline]
    pub fn with_nibble(self, nibble: u32, value: u8) -> Self {
        let shift = (nibble % 8) * 4;
        let cleared = self.0 & !(0xF << shift);
        Self(cleared | ((value as u32 & 0xF) << shift))
    }
}

impl std::fmt::Display for Gene {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:08x}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_roundtrip() {
        let gene = Gene::new(SourceKind::Neuron, 5, SinkKind::Action, 3, 1.5);

        assert_eq!(gene.source_kind(), SourceKind::Neuron);
        assert_eq!(gene.source_index(), 5);
        assert_eq!(gene.sink_kind(), SinkKind::Action);
        assert_eq!(gene.sink_index(), 3);
        assert!((gene.weight() - 1.5).abs() < 1e-3);
    }

    #[test]
    fn test_weight_range() {
        assert!((Gene(0x0000_7FFF).weight() - 4.0).abs() < 1e-3);
        assert_eq!(Gene(0x0000_8000).weight(), -4.0);
        assert_eq!(Gene(0).weight(), 0.0);

        let clamped = Gene::new(SourceKind::Sensor, 0, SinkKind::Neuron, 0, 100.0);
        assert!(clamped.weight() < 4.0);
    }

    #[test]
    fn test_negative_weight() {
        let gene = Gene::new(SourceKind::Sensor, 1, SinkKind::Neuron, 2, -2.25);
        assert!((gene.weight() + 2.25).abs() < 1e-3);
    }

    #[test]
    fn test_bit_flip() {
        let gene = Gene(0);
        assert_eq!(gene.with_flipped_bit(31).source_kind(), SourceKind::Neuron);
        assert_eq!(gene.with_flipped_bit(3).with_flipped_bit(3), gene);
    }

    #[test]
    fn test_nibble_replace() {
        let gene = Gene(0x1234_5678);
        assert_eq!(gene.with_nibble(0, 0xF).0, 0x1234_567F);
        assert_eq!(gene.with_nibble(7, 0x0).0, 0x0234_5678);
    }

    #[test]
    fn test_display_hex() {
        assert_eq!(Gene(0xAB).to_string(), "000000ab");
    }
}
