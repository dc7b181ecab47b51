//! Sensor catalog and the registry of enabled sensors.

use crate::error::SimError;
use crate::grid::{Grid, Point};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Every sensor, in catalog order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SensorName {
    HorizontalPosition,
    VerticalPosition,
    Age,
    Oscillator,
    Random,
    HorizontalSpeed,
    VerticalSpeed,
    HorizontalBorderDistance,
    VerticalBorderDistance,
    BorderDistance,
    Touch,
    Pain,
    PopulationDensity,
}

impl SensorName {
    pub const COUNT: usize = 13;

    pub const ALL: [SensorName; Self::COUNT] = [
        SensorName::HorizontalPosition,
        SensorName::VerticalPosition,
        SensorName::Age,
        SensorName::Oscillator,
        SensorName::Random,
        SensorName::HorizontalSpeed,
        SensorName::VerticalSpeed,
        SensorName::HorizontalBorderDistance,
        SensorName::VerticalBorderDistance,
        SensorName::BorderDistance,
        SensorName::Touch,
        SensorName::Pain,
        SensorName::PopulationDensity,
    ];

    /// Number of brain inputs this sensor produces
    pub fn neuron_count(self) -> usize {
        match self {
            SensorName::Touch => 4,
            _ => 1,
        }
    }

    pub fn enabled_by_default(self) -> bool {
        !matches!(
            self,
            SensorName::Touch | SensorName::Pain | SensorName::PopulationDensity
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SensorName::HorizontalPosition => "HorizontalPosition",
            SensorName::VerticalPosition => "VerticalPosition",
            SensorName::Age => "Age",
            SensorName::Oscillator => "Oscillator",
            SensorName::Random => "Random",
            SensorName::HorizontalSpeed => "HorizontalSpeed",
            SensorName::VerticalSpeed => "VerticalSpeed",
            SensorName::HorizontalBorderDistance => "HorizontalBorderDistance",
            SensorName::VerticalBorderDistance => "VerticalBorderDistance",
            SensorName::BorderDistance => "BorderDistance",
            SensorName::Touch => "Touch",
            SensorName::Pain => "Pain",
            SensorName::PopulationDensity => "PopulationDensity",
        }
    }

    #[inline]
    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for SensorName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SensorName {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SensorName::ALL
            .iter()
            .copied()
            .find(|name| name.as_str() == s)
            .ok_or_else(|| SimError::UnknownSensor(s.to_string()))
    }
}

/// What a creature can perceive this tick
#[derive(Debug, Clone, Copy)]
pub struct SenseInput<'a> {
    pub grid: &'a Grid,
    pub position: Point,
    pub last_position: Point,
    pub health: f32,
    pub step: u32,
    pub steps_per_generation: u32,
}

/// Enabled subset of the sensor catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SensorRegistry {
    enabled: [bool; SensorName::COUNT],
}

impl Default for SensorRegistry {
    fn default() -> Self {
        Self {
            enabled: SensorName::ALL.map(SensorName::enabled_by_default),
        }
    }
}

impl SensorRegistry {
    /// Registry with exactly the given sensors enabled
    pub fn from_list(names: &[SensorName]) -> Self {
        let mut registry = Self::default();
        registry.load_from_list(names);
        registry
    }

    /// Parse names and build a registry
    pub fn from_names<S: AsRef<str>>(names: &[S]) -> crate::Result<Self> {
        let parsed = names
            .iter()
            .map(|n| n.as_ref().parse())
            .collect::<crate::Result<Vec<SensorName>>>()?;
        Ok(Self::from_list(&parsed))
    }

    /// Enable exactly the listed sensors
    pub fn load_from_list(&mut self, names: &[SensorName]) {
        for sensor in SensorName::ALL {
            self.enabled[sensor.index()] = names.contains(&sensor);
        }
    }

    pub fn set_enabled(&mut self, name: SensorName, enabled: bool) {
        self.enabled[name.index()] = enabled;
    }

    #[inline]
    pub fn is_enabled(&self, name: SensorName) -> bool {
        self.enabled[name.index()]
    }

    /// Enabled sensors in catalog order
    pub fn get_list(&self) -> Vec<SensorName> {
        SensorName::ALL
            .into_iter()
            .filter(|s| self.is_enabled(*s))
            .collect()
    }

    /// Total brain inputs produced by the enabled sensors
    pub fn neuron_count(&self) -> usize {
        SensorName::ALL
            .into_iter()
            .filter(|s| self.is_enabled(*s))
            .map(SensorName::neuron_count)
            .sum()
    }

    /// One label per brain input
    pub fn neuron_labels(&self) -> Vec<String> {
        let mut labels = Vec::with_capacity(self.neuron_count());
        for sensor in self.get_list() {
            if sensor == SensorName::Touch {
                for side in ["North", "East", "South", "West"] {
                    labels.push(format!("Touch{side}"));
                }
            } else {
                labels.push(sensor.to_string());
            }
        }
        labels
    }

    /// Append one value per brain input to `out`, in catalog order
    pub fn sense<R: Rng + ?Sized>(&self, input: &SenseInput<'_>, rng: &mut R, out: &mut Vec<f32>) {
        let size = input.grid.size() as f32;
        let Point { x, y } = input.position;
        let horizontal = x.min(input.grid.size() as i32 - x) as f32;
        let vertical = y.min(input.grid.size() as i32 - y) as f32;
        let step = input.step as f32;

        for sensor in SensorName::ALL {
            if !self.is_enabled(sensor) {
                continue;
            }
            match sensor {
                SensorName::HorizontalPosition => out.push(x as f32 / size),
                SensorName::VerticalPosition => out.push(y as f32 / size),
                SensorName::Age => out.push(step / input.steps_per_generation.max(1) as f32),
                SensorName::Oscillator => out.push(((step / 10.0).sin() + 1.0) / 2.0),
                SensorName::Random => out.push(rng.gen::<f32>()),
                SensorName::HorizontalSpeed => {
                    out.push((x - input.last_position.x + 1) as f32 / 2.0)
                }
                SensorName::VerticalSpeed => out.push((y - input.last_position.y + 1) as f32 / 2.0),
                SensorName::HorizontalBorderDistance => out.push(horizontal / size * 2.0),
                SensorName::VerticalBorderDistance => out.push(vertical / size * 2.0),
                SensorName::BorderDistance => out.push(horizontal.min(vertical) / size * 2.0),
                SensorName::Touch => {
                    for (dx, dy) in [(0, -1), (1, 0), (0, 1), (-1, 0)] {
                        let blocked = input.grid.is_blocked(input.position.offset(dx, dy));
                        out.push(if blocked { 1.0 } else { 0.0 });
                    }
                }
                SensorName::Pain => out.push((100.0 - input.health) / 100.0),
                SensorName::PopulationDensity => {
                    out.push(input.grid.neighbour_count(input.position) as f32 * 0.125)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn input(grid: &Grid, position: Point) -> SenseInput<'_> {
        SenseInput {
            grid,
            position,
            last_position: position,
            health: 100.0,
            step: 0,
            steps_per_generation: 300,
        }
    }

    #[test]
    fn test_default_registry() {
        let registry = SensorRegistry::default();
        assert_eq!(registry.get_list().len(), 10);
        assert_eq!(registry.neuron_count(), 10);
        assert!(!registry.is_enabled(SensorName::Touch));
    }

    #[test]
    fn test_touch_counts_four() {
        let mut registry = SensorRegistry::from_list(&[]);
        assert_eq!(registry.neuron_count(), 0);

        registry.set_enabled(SensorName::Touch, true);
        registry.set_enabled(SensorName::Age, true);
        assert_eq!(registry.neuron_count(), 5);
        assert_eq!(
            registry.neuron_labels(),
            vec!["Age", "TouchNorth", "TouchEast", "TouchSouth", "TouchWest"]
        );
    }

    #[test]
    fn test_parse_names() {
        assert_eq!("Pain".parse::<SensorName>().unwrap(), SensorName::Pain);
        assert!(matches!(
            "Smell".parse::<SensorName>(),
            Err(SimError::UnknownSensor(_))
        ));

        let registry = SensorRegistry::from_names(&["Age", "Random"]).unwrap();
        assert_eq!(registry.get_list(), vec![SensorName::Age, SensorName::Random]);
        assert!(SensorRegistry::from_names(&["Nope"]).is_err());
    }

    #[test]
    fn test_position_and_border_values() {
        let grid = Grid::new(10);
        let registry = SensorRegistry::from_list(&[
            SensorName::HorizontalPosition,
            SensorName::VerticalPosition,
            SensorName::HorizontalBorderDistance,
            SensorName::VerticalBorderDistance,
            SensorName::BorderDistance,
        ]);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut out = Vec::new();

        registry.sense(&input(&grid, Point::new(2, 5)), &mut rng, &mut out);

        assert_eq!(out, vec![0.2, 0.5, 0.4, 1.0, 0.4]);
    }

    #[test]
    fn test_speed_values() {
        let grid = Grid::new(10);
        let registry =
            SensorRegistry::from_list(&[SensorName::HorizontalSpeed, SensorName::VerticalSpeed]);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut out = Vec::new();
        let mut sense = input(&grid, Point::new(4, 4));
        sense.last_position = Point::new(3, 5);

        registry.sense(&sense, &mut rng, &mut out);

        assert_eq!(out, vec![1.0, 0.0]);
    }

    #[test]
    fn test_touch_sees_border_and_creatures() {
        let mut grid = Grid::new(5);
        grid.set_creature(Point::new(1, 0), Some(3));
        let registry = SensorRegistry::from_list(&[SensorName::Touch]);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut out = Vec::new();

        // At the top-left corner: north and west are outside, east has a creature
        registry.sense(&input(&grid, Point::new(0, 0)), &mut rng, &mut out);

        assert_eq!(out, vec![1.0, 1.0, 0.0, 1.0]);
    }

    #[test]
    fn test_age_pain_density() {
        let mut grid = Grid::new(5);
        grid.set_creature(Point::new(1, 1), Some(0));
        grid.set_creature(Point::new(2, 2), Some(1));
        let registry = SensorRegistry::from_list(&[
            SensorName::Age,
            SensorName::Pain,
            SensorName::PopulationDensity,
        ]);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut out = Vec::new();
        let mut sense = input(&grid, Point::new(2, 2));
        sense.step = 150;
        sense.health = 75.0;

        registry.sense(&sense, &mut rng, &mut out);

        assert_eq!(out, vec![0.5, 0.25, 0.125]);
    }

    #[test]
    fn test_output_length_matches_neuron_count() {
        let grid = Grid::new(8);
        let registry = SensorRegistry::from_list(&SensorName::ALL);
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let mut out = Vec::new();

        registry.sense(&input(&grid, Point::new(3, 3)), &mut rng, &mut out);

        assert_eq!(out.len(), registry.neuron_count());
        assert_eq!(out.len(), 16);
    }
}
