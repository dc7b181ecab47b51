//! Action catalog, registry and movement urges.

use crate::error::SimError;
use crate::grid::Point;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Every action, in catalog order. Each one consumes a single brain output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionName {
    MoveNorth,
    MoveSouth,
    MoveEast,
    MoveWest,
    RandomMove,
    MoveForward,
}

impl ActionName {
    pub const COUNT: usize = 6;

    pub const ALL: [ActionName; Self::COUNT] = [
        ActionName::MoveNorth,
        ActionName::MoveSouth,
        ActionName::MoveEast,
        ActionName::MoveWest,
        ActionName::RandomMove,
        ActionName::MoveForward,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ActionName::MoveNorth => "MoveNorth",
            ActionName::MoveSouth => "MoveSouth",
            ActionName::MoveEast => "MoveEast",
            ActionName::MoveWest => "MoveWest",
            ActionName::RandomMove => "RandomMove",
            ActionName::MoveForward => "MoveForward",
        }
    }

    #[inline]
    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for ActionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActionName {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ActionName::ALL
            .iter()
            .copied()
            .find(|name| name.as_str() == s)
            .ok_or_else(|| SimError::UnknownAction(s.to_string()))
    }
}

/// Accumulated wish to move this tick
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Urge {
    pub x: f32,
    pub y: f32,
}

impl Urge {
    #[inline]
    pub fn add(&mut self, x: f32, y: f32) {
        self.x += x;
        self.y += y;
    }

    /// At most one cell per axis
    pub fn resolve(self) -> Point {
        let axis = |v: f32| {
            if v.is_finite() {
                v.round().clamp(-1.0, 1.0) as i32
            } else {
                0
            }
        };
        Point::new(axis(self.x), axis(self.y))
    }
}

/// Enabled subset of the action catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionRegistry {
    enabled: [bool; ActionName::COUNT],
}

impl Default for ActionRegistry {
    fn default() -> Self {
        Self {
            enabled: [true; ActionName::COUNT],
        }
    }
}

impl ActionRegistry {
    /// Registry with exactly the given actions enabled
    pub fn from_list(names: &[ActionName]) -> Self {
        let mut registry = Self::default();
        registry.load_from_list(names);
        registry
    }

    /// Parse names and build a registry
    pub fn from_names<S: AsRef<str>>(names: &[S]) -> crate::Result<Self> {
        let parsed = names
            .iter()
            .map(|n| n.as_ref().parse())
            .collect::<crate::Result<Vec<ActionName>>>()?;
        Ok(Self::from_list(&parsed))
    }

    /// Enable exactly the listed actions
    pub fn load_from_list(&mut self, names: &[ActionName]) {
        for action in ActionName::ALL {
            self.enabled[action.index()] = names.contains(&action);
        }
    }

    pub fn set_enabled(&mut self, name: ActionName, enabled: bool) {
        self.enabled[name.index()] = enabled;
    }

    #[inline]
    pub fn is_enabled(&self, name: ActionName) -> bool {
        self.enabled[name.index()]
    }

    pub fn get_list(&self) -> Vec<ActionName> {
        ActionName::ALL
            .into_iter()
            .filter(|a| self.is_enabled(*a))
            .collect()
    }

    /// Brain outputs consumed by the enabled actions
    pub fn neuron_count(&self) -> usize {
        self.enabled.iter().filter(|e| **e).count()
    }

    pub fn neuron_labels(&self) -> Vec<String> {
        self.get_list().iter().map(|a| a.to_string()).collect()
    }

    /// Turn brain outputs into a movement urge.
    ///
    /// `outputs[i]` drives the i-th enabled action. Only positive values fire.
    pub fn urge<R: Rng + ?Sized>(&self, outputs: &[f32], last_movement: Point, rng: &mut R) -> Urge {
        let mut urge = Urge::default();

        let enabled = ActionName::ALL.into_iter().filter(|a| self.is_enabled(*a));
        for (action, &value) in enabled.zip(outputs) {
            if value <= 0.0 {
                continue;
            }
            match action {
                ActionName::MoveNorth => urge.add(0.0, -value),
                ActionName::MoveSouth => urge.add(0.0, value),
                ActionName::MoveEast => urge.add(value, 0.0),
                ActionName::MoveWest => urge.add(-value, 0.0),
                ActionName::RandomMove => urge.add(
                    rng.gen_range(-1.0f32..=1.0) * value,
                    rng.gen_range(-1.0f32..=1.0) * value,
                ),
                ActionName::MoveForward => {
                    urge.add(last_movement.x as f32, last_movement.y as f32)
                }
            }
        }

        urge
    }
}
