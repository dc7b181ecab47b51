//! Cell coverage of rectangles and ellipses.

use crate::grid::Point;
use serde::{Deserialize, Serialize};

/// Placement of a shape's bounding box.
///
/// With `relative` set, every field is a fraction of the world size and is
/// floored to whole cells; otherwise fields are cell units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    #[serde(default = "default_relative")]
    pub relative: bool,
}

fn default_relative() -> bool {
    true
}

/// Integer bounding box, right/bottom exclusive, not clipped to the world
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellBox {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl CellBox {
    #[inline]
    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }
}

impl Bounds {
    pub fn relative(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
            relative: true,
        }
    }

    pub fn absolute(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x: x as f32,
            y: y as f32,
            width: width as f32,
            height: height as f32,
            relative: false,
        }
    }

    fn cell_box(&self, world_size: usize) -> CellBox {
        let scale = if self.relative { world_size as f32 } else { 1.0 };
        let left = (self.x * scale).floor() as i32;
        let top = (self.y * scale).floor() as i32;
        let width = (self.width * scale).floor().max(0.0) as i32;
        let height = (self.height * scale).floor().max(0.0) as i32;
        CellBox {
            left,
            top,
            right: left + width,
            bottom: top + height,
        }
    }
}

/// Anything that covers a set of grid cells
pub trait CellShape {
    /// Cell-aligned bounding box for a world of `world_size`
    fn bounding_box(&self, world_size: usize) -> CellBox;

    /// Whether the cell at `p` is covered (ignores world bounds)
    fn contains_cell(&self, p: Point, world_size: usize) -> bool;

    /// Covered cells inside the world, row by row
    fn rasterize(&self, world_size: usize) -> Vec<Point> {
        let bb = self.bounding_box(world_size);
        let max = world_size as i32;
        let mut cells = Vec::new();
        for y in bb.top.max(0)..bb.bottom.min(max) {
            for x in bb.left.max(0)..bb.right.min(max) {
                let p = Point::new(x, y);
                if self.contains_cell(p, world_size) {
                    cells.push(p);
                }
            }
        }
        cells
    }
}

/// Axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rectangle(pub Bounds);

impl CellShape for Rectangle {
    fn bounding_box(&self, world_size: usize) -> CellBox {
        self.0.cell_box(world_size)
    }

    fn contains_cell(&self, p: Point, world_size: usize) -> bool {
        let bb = self.bounding_box(world_size);
        p.x >= bb.left && p.x < bb.right && p.y >= bb.top && p.y < bb.bottom
    }
}

/// Ellipse inscribed in its bounds. A cell is inside when its centre is.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ellipse(pub Bounds);

impl CellShape for Ellipse {
    fn bounding_box(&self, world_size: usize) -> CellBox {
        self.0.cell_box(world_size)
    }

    fn contains_cell(&self, p: Point, world_size: usize) -> bool {
        let bb = self.bounding_box(world_size);
        if bb.width() <= 0 || bb.height() <= 0 {
            return false;
        }

        let rx = bb.width() as f32 / 2.0;
        let ry = bb.height() as f32 / 2.0;
        let dx = p.x as f32 + 0.5 - (bb.left as f32 + rx);
        let dy = p.y as f32 + 0.5 - (bb.top as f32 + ry);
        (dx * dx) / (rx * rx) + (dy * dy) / (ry * ry) <= 1.0
    }
}

/// Closed set of supported shapes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    Rectangle(Rectangle),
    Ellipse(Ellipse),
}

impl Shape {
    /// Rectangle in relative coordinates
    pub fn rectangle(x: f32, y: f32, width: f32, height: f32) -> Self {
        Shape::Rectangle(Rectangle(Bounds::relative(x, y, width, height)))
    }

    /// Ellipse in relative coordinates
    pub fn ellipse(x: f32, y: f32, width: f32, height: f32) -> Self {
        Shape::Ellipse(Ellipse(Bounds::relative(x, y, width, height)))
    }

    pub fn bounds(&self) -> &Bounds {
        match self {
            Shape::Rectangle(r) => &r.0,
            Shape::Ellipse(e) => &e.0,
        }
    }
}

impl CellShape for Shape {
    fn bounding_box(&self, world_size: usize) -> CellBox {
        match self {
            Shape::Rectangle(r) => r.bounding_box(world_size),
            Shape::Ellipse(e) => e.bounding_box(world_size),
        }
    }

    fn contains_cell(&self, p: Point, world_size: usize) -> bool {
        match self {
            Shape::Rectangle(r) => r.contains_cell(p, world_size),
            Shape::Ellipse(e) => e.contains_cell(p, world_size),
        }
    }
}
