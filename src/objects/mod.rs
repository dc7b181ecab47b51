//! Static world objects: obstacles and areas.
//!
//! Every object is a [`Shape`] plus an [`ObjectKind`]. Obstacles make their
//! cells solid. Areas leave cells walkable and either mark a reproduction
//! zone or change the health of creatures standing on them each tick.

mod shape;

pub use shape::{Bounds, CellBox, CellShape, Ellipse, Rectangle, Shape};

use crate::grid::Point;
use serde::{Deserialize, Serialize};

/// RGB colour key for renderers
pub type Color = [u8; 3];

pub const OBSTACLE_COLOR: Color = [60, 60, 60];
pub const REPRODUCTION_COLOR: Color = [0, 0, 255];
pub const HEALING_COLOR: Color = [0, 255, 0];
pub const DANGER_COLOR: Color = [255, 0, 0];

/// What an object does to the cells it covers
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ObjectKind {
    /// Solid, nothing may stand here
    Obstacle { color: Color },
    /// Marks cells where creatures count as survivors
    ReproductionArea,
    /// Adds `health` to every living creature on the area, every tick
    HealthArea { health: f32 },
}

impl ObjectKind {
    /// Obstacle with the default colour
    pub fn obstacle() -> Self {
        ObjectKind::Obstacle {
            color: OBSTACLE_COLOR,
        }
    }
}

/// A shape placed in the world
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorldObject {
    pub shape: Shape,
    pub kind: ObjectKind,
}

impl WorldObject {
    pub fn new(shape: Shape, kind: ObjectKind) -> Self {
        Self { shape, kind }
    }

    /// Cells covered inside a world of `world_size`
    #[inline]
    pub fn cells(&self, world_size: usize) -> Vec<Point> {
        self.shape.rasterize(world_size)
    }

    #[inline]
    pub fn is_solid(&self) -> bool {
        matches!(self.kind, ObjectKind::Obstacle { .. })
    }

    #[inline]
    pub fn is_reproduction_area(&self) -> bool {
        matches!(self.kind, ObjectKind::ReproductionArea)
    }

    /// Health change applied to a creature on this object each tick
    #[inline]
    pub fn health_effect(&self) -> Option<f32> {
        match self.kind {
            ObjectKind::HealthArea { health } => Some(health),
            _ => None,
        }
    }

    pub fn color(&self) -> Color {
        match self.kind {
            ObjectKind::Obstacle { color } => color,
            ObjectKind::ReproductionArea => REPRODUCTION_COLOR,
            ObjectKind::HealthArea { health } if health >= 0.0 => HEALING_COLOR,
            ObjectKind::HealthArea { .. } => DANGER_COLOR,
        }
    }
}

/// Centre reproduction area with a diagonal line of obstacles
pub fn default_map() -> Vec<WorldObject> {
    let mut objects = vec![WorldObject::new(
        Shape::rectangle(0.25, 0.25, 0.5, 0.5),
        ObjectKind::ReproductionArea,
    )];

    for offset in [0.0, 0.2, 0.4, 0.6, 0.8] {
        objects.push(WorldObject::new(
            Shape::rectangle(offset, offset, 0.2, 0.2),
            ObjectKind::obstacle(),
        ));
    }

    objects
}
