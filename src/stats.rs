//! Statistics tracking for the simulation.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::{Duration, Instant};

/// Outcome of one finished generation
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationRecord {
    pub generation: u32,
    pub survivor_count: usize,
    /// Creatures alive at the start of the generation
    pub population: usize,
}

impl GenerationRecord {
    pub fn survival_rate(&self) -> f32 {
        if self.population == 0 {
            0.0
        } else {
            self.survivor_count as f32 / self.population as f32
        }
    }
}

/// History of finished generations
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerationRegistry {
    records: Vec<GenerationRecord>,
    min_survivor_count: usize,
    max_survivor_count: usize,
}

impl GenerationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a generation and update the extremes
    pub fn record(&mut self, record: GenerationRecord) {
        if self.records.is_empty() {
            self.min_survivor_count = record.survivor_count;
            self.max_survivor_count = record.survivor_count;
        } else {
            self.min_survivor_count = self.min_survivor_count.min(record.survivor_count);
            self.max_survivor_count = self.max_survivor_count.max(record.survivor_count);
        }
        self.records.push(record);
    }

    #[inline]
    pub fn records(&self) -> &[GenerationRecord] {
        &self.records
    }

    #[inline]
    pub fn last(&self) -> Option<&GenerationRecord> {
        self.records.last()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[inline]
    pub fn min_survivor_count(&self) -> usize {
        self.min_survivor_count
    }

    #[inline]
    pub fn max_survivor_count(&self) -> usize {
        self.max_survivor_count
    }

    /// Mean survival rate over the last `window` generations
    pub fn recent_survival_rate(&self, window: usize) -> f32 {
        let start = self.records.len().saturating_sub(window);
        let recent = &self.records[start..];
        if recent.is_empty() {
            return 0.0;
        }
        recent.iter().map(|r| r.survival_rate()).sum::<f32>() / recent.len() as f32
    }

    /// Save history to JSON file
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> crate::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Load history from JSON file
    pub fn load_json<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }

    /// Export as CSV string
    pub fn to_csv(&self) -> String {
        let mut csv = String::from("generation,survivors,population,survival_rate\n");
        for r in &self.records {
            csv.push_str(&format!(
                "{},{},{},{:.4}\n",
                r.generation,
                r.survivor_count,
                r.population,
                r.survival_rate()
            ));
        }
        csv
    }
}

/// Counters describing the last finished generation and the whole run
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerationStats {
    /// Creatures at the start of the current generation
    pub last_creature_count: usize,
    pub last_survivor_count: usize,
    pub last_survival_rate: f32,
    /// Wall clock of the last generation, minus pauses
    pub last_generation_duration: Duration,
    /// Sum of every generation duration
    pub total_time: Duration,
}

impl GenerationStats {
    /// Summary string for logging
    pub fn summary(&self, generation: u32) -> String {
        format!(
            "Gen {:>5} | Survivors: {:>5}/{:<5} ({:>5.1}%) | Gen time: {:>7.2}s | Total: {:>8.1}s",
            generation,
            self.last_survivor_count,
            self.last_creature_count,
            self.last_survival_rate * 100.0,
            self.last_generation_duration.as_secs_f64(),
            self.total_time.as_secs_f64(),
        )
    }
}

/// Pause-aware stopwatch for one generation
#[derive(Clone, Debug)]
pub struct GenerationClock {
    started: Instant,
    paused_at: Option<Instant>,
    paused_total: Duration,
}

impl GenerationClock {
    pub fn start(now: Instant) -> Self {
        Self {
            started: now,
            paused_at: None,
            paused_total: Duration::ZERO,
        }
    }

    #[inline]
    pub fn is_paused(&self) -> bool {
        self.paused_at.is_some()
    }

    /// Mark the pause instant. A second pause keeps the first instant.
    pub fn pause(&mut self, now: Instant) {
        if self.paused_at.is_none() {
            self.paused_at = Some(now);
        }
    }

    /// Add the paused span to the generation's pause total
    pub fn resume(&mut self, now: Instant) {
        if let Some(at) = self.paused_at.take() {
            self.paused_total += now.saturating_duration_since(at);
        }
    }

    /// Time spent running since the generation started
    pub fn elapsed(&self, now: Instant) -> Duration {
        let pending = self
            .paused_at
            .map_or(Duration::ZERO, |at| now.saturating_duration_since(at));
        now.saturating_duration_since(self.started)
            .saturating_sub(self.paused_total + pending)
    }

    /// Close the generation and start the next one. A running pause carries over.
    pub fn lap(&mut self, now: Instant) -> Duration {
        let elapsed = self.elapsed(now);
        let paused = self.paused_at.is_some();
        *self = Self::start(now);
        if paused {
            self.paused_at = Some(now);
        }
        elapsed
    }
}

impl Default for GenerationClock {
    fn default() -> Self {
        Self::start(Instant::now())
    }
}
