//! Checkpoint system for saving and loading simulation state.
//!
//! Creatures are stored grouped by species so that each genome is written
//! once. Brains are not stored; they are recompiled on load.

use crate::config::Config;
use crate::error::{Result, SimError};
use crate::species::Species;
use crate::stats::{GenerationRegistry, GenerationStats};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

const MAGIC: &[u8; 4] = b"NGRD";

/// Exact position of a ChaCha stream
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RngState {
    pub seed: [u8; 32],
    pub stream: u64,
    pub word_pos: u128,
}

impl RngState {
    pub fn capture(rng: &ChaCha8Rng) -> Self {
        Self {
            seed: rng.get_seed(),
            stream: rng.get_stream(),
            word_pos: rng.get_word_pos(),
        }
    }

    /// Generator continuing exactly where the captured one stopped
    pub fn restore(&self) -> ChaCha8Rng {
        let mut rng = ChaCha8Rng::from_seed(self.seed);
        rng.set_stream(self.stream);
        rng.set_word_pos(self.word_pos);
        rng
    }
}

/// Complete simulation state for checkpointing
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Checkpoint {
    /// Version for compatibility checking
    pub version: u32,
    /// Configuration, including enabled sensors, actions, map and strategies
    pub config: Config,
    pub current_generation: u32,
    pub current_step: u32,
    pub stats: GenerationStats,
    pub history: GenerationRegistry,
    /// Creatures grouped by genome
    pub species: Vec<Species>,
    /// Seed the run was started with
    pub seed: u64,
    pub rng: RngState,
}

impl Checkpoint {
    /// Current checkpoint version
    pub const VERSION: u32 = 1;

    #[allow(clippy::too_many_arguments)]
    pub fn new(
        config: Config,
        current_generation: u32,
        current_step: u32,
        stats: GenerationStats,
        history: GenerationRegistry,
        species: Vec<Species>,
        seed: u64,
        rng: RngState,
    ) -> Self {
        Self {
            version: Self::VERSION,
            config,
            current_generation,
            current_step,
            stats,
            history,
            species,
            seed,
            rng,
        }
    }

    /// Total creatures across all species
    pub fn creature_count(&self) -> usize {
        self.species.iter().map(Species::len).sum()
    }

    /// Save checkpoint to binary file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);

        writer.write_all(MAGIC)?;
        let encoded = bincode::serialize(self)?;
        writer.write_all(&encoded)?;
        writer.flush()?;

        Ok(())
    }

    /// Load checkpoint from binary file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);

        let mut magic = [0u8; 4];
        reader.read_exact(&mut magic)?;
        if &magic != MAGIC {
            return Err(SimError::InvalidFormat("invalid magic bytes".to_string()));
        }

        let mut buffer = Vec::new();
        reader.read_to_end(&mut buffer)?;
        let checkpoint: Checkpoint = bincode::deserialize(&buffer)?;

        checkpoint.check_version()?;
        Ok(checkpoint)
    }

    /// Save checkpoint as human-readable JSON
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        let checkpoint: Checkpoint = serde_json::from_reader(reader)?;
        checkpoint.check_version()?;
        Ok(checkpoint)
    }

    /// Load either format, choosing by the `.json` extension
    pub fn load_any<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::load_json(path),
            _ => Self::load(path),
        }
    }

    /// Save either format, choosing by the `.json` extension
    pub fn save_any<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => self.save_json(path),
            _ => self.save(path),
        }
    }

    fn check_version(&self) -> Result<()> {
        if self.version != Self::VERSION {
            return Err(SimError::VersionMismatch {
                expected: Self::VERSION,
                found: self.version,
            });
        }
        Ok(())
    }

    /// Get approximate size in bytes
    pub fn size_bytes(&self) -> usize {
        bincode::serialized_size(self).unwrap_or(0) as usize
    }
}

/// Checkpoint manager for automatic saving
pub struct CheckpointManager {
    /// Base directory for checkpoints
    pub base_dir: PathBuf,
    /// Generations between checkpoints
    pub interval: u64,
    /// Maximum checkpoints to keep
    pub max_checkpoints: usize,
    last_checkpoint: Option<u32>,
}

impl CheckpointManager {
    pub fn new<P: Into<PathBuf>>(base_dir: P, interval: u64, max_checkpoints: usize) -> Result<Self> {
        let base_dir = base_dir.into();
        std::fs::create_dir_all(&base_dir)?;

        Ok(Self {
            base_dir,
            interval,
            max_checkpoints,
            last_checkpoint: None,
        })
    }

    /// True once per multiple of `interval`, never for generation 0
    pub fn should_save(&self, generation: u32) -> bool {
        self.interval > 0
            && generation > 0
            && u64::from(generation) % self.interval == 0
            && self.last_checkpoint != Some(generation)
    }

    pub fn checkpoint_path(&self, generation: u32) -> PathBuf {
        self.base_dir.join(format!("checkpoint_{:08}.bin", generation))
    }

    /// Save checkpoint and drop the oldest files beyond `max_checkpoints`
    pub fn save(&mut self, checkpoint: &Checkpoint) -> Result<PathBuf> {
        let path = self.checkpoint_path(checkpoint.current_generation);
        checkpoint.save(&path)?;
        self.last_checkpoint = Some(checkpoint.current_generation);

        self.cleanup()?;
        log::info!("Checkpoint saved: {}", path.display());

        Ok(path)
    }

    fn checkpoint_files(&self) -> Result<Vec<PathBuf>> {
        let mut files: Vec<PathBuf> = std::fs::read_dir(&self.base_dir)?
            .filter_map(|entry| entry.ok())
            .filter(|entry| {
                entry
                    .file_name()
                    .to_string_lossy()
                    .starts_with("checkpoint_")
            })
            .map(|entry| entry.path())
            .collect();
        // Zero-padded names sort by generation
        files.sort();
        Ok(files)
    }

    fn cleanup(&self) -> Result<()> {
        let files = self.checkpoint_files()?;
        if files.len() > self.max_checkpoints {
            let to_remove = files.len() - self.max_checkpoints;
            for path in files.into_iter().take(to_remove) {
                std::fs::remove_file(path)?;
            }
        }
        Ok(())
    }

    /// Find latest checkpoint in directory
    pub fn find_latest(&self) -> Option<PathBuf> {
        self.checkpoint_files().ok()?.pop()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::World;
    use rand::RngCore;

    fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("neurogrid_{}_{}", name, std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn create_test_checkpoint() -> Checkpoint {
        let mut world = World::new_with_seed(Config::small(10, 15), 12345).unwrap();
        world.run(4);
        world.create_checkpoint()
    }

    #[test]
    fn test_rng_state_resumes_stream() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        rng.next_u64();
        let state = RngState::capture(&rng);

        let mut restored = state.restore();
        assert_eq!(rng.next_u64(), restored.next_u64());
    }

    #[test]
    fn test_checkpoint_roundtrip() {
        let checkpoint = create_test_checkpoint();
        let path = temp_dir("bin").join("roundtrip.bin");

        checkpoint.save(&path).unwrap();
        let loaded = Checkpoint::load(&path).unwrap();

        assert_eq!(loaded, checkpoint);
        assert_eq!(loaded.creature_count(), 15);

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_json_roundtrip() {
        let checkpoint = create_test_checkpoint();
        let path = temp_dir("json").join("roundtrip.json");

        checkpoint.save_any(&path).unwrap();
        let loaded = Checkpoint::load_any(&path).unwrap();

        assert_eq!(loaded.current_step, checkpoint.current_step);
        assert_eq!(loaded.species, checkpoint.species);
        assert_eq!(loaded.rng, checkpoint.rng);

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_bad_magic_rejected() {
        let path = temp_dir("magic").join("bad.bin");
        std::fs::write(&path, b"XXXXpayload").unwrap();

        assert!(matches!(Checkpoint::load(&path), Err(SimError::InvalidFormat(_))));

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_version_mismatch() {
        let mut checkpoint = create_test_checkpoint();
        checkpoint.version = 99;
        let path = temp_dir("version").join("old.json");

        checkpoint.save_json(&path).unwrap();
        assert!(matches!(
            Checkpoint::load_json(&path),
            Err(SimError::VersionMismatch { expected: 1, found: 99 })
        ));

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_checkpoint_size() {
        let checkpoint = create_test_checkpoint();
        let size = checkpoint.size_bytes();

        assert!(size > 0);
        assert!(size < 1_000_000);
    }

    #[test]
    fn test_manager_rotation() {
        let dir = temp_dir("manager");
        let mut manager = CheckpointManager::new(&dir, 2, 2).unwrap();
        let mut checkpoint = create_test_checkpoint();

        assert!(!manager.should_save(0));
        assert!(!manager.should_save(3));
        assert!(manager.should_save(4));

        for generation in [2, 4, 6] {
            checkpoint.current_generation = generation;
            manager.save(&checkpoint).unwrap();
        }

        assert!(!manager.should_save(6));
        assert!(!manager.checkpoint_path(2).exists());
        assert_eq!(manager.find_latest(), Some(manager.checkpoint_path(6)));

        std::fs::remove_dir_all(dir).ok();
    }
}
