//! Spatial grid: one cell per integer coordinate, caching the live creature,
//! the objects covering it and whether it is solid.

use crate::objects::WorldObject;
use serde::{Deserialize, Serialize};

/// Integer grid coordinate, also used for one-step movement vectors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

impl From<(i32, i32)> for Point {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

/// Cached state of one cell
#[derive(Clone, Debug, Default)]
pub struct GridCell {
    /// Index of the live creature standing here
    pub creature: Option<usize>,
    /// Indices of the world objects covering this cell
    pub objects: Vec<usize>,
    pub solid: bool,
}

/// Square grid indexed as `cells[y * size + x]`
#[derive(Clone, Debug)]
pub struct Grid {
    size: usize,
    cells: Vec<GridCell>,
}

impl Grid {
    /// Create an empty grid
    pub fn new(size: usize) -> Self {
        Self {
            size,
            cells: vec![GridCell::default(); size * size],
        }
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn in_bounds(&self, p: Point) -> bool {
        p.x >= 0 && p.y >= 0 && (p.x as usize) < self.size && (p.y as usize) < self.size
    }

    #[inline]
    fn index(&self, p: Point) -> Option<usize> {
        if self.in_bounds(p) {
            Some(p.y as usize * self.size + p.x as usize)
        } else {
            None
        }
    }

    /// Cell at a position, `None` outside the world
    #[inline]
    pub fn get(&self, p: Point) -> Option<&GridCell> {
        self.index(p).map(|i| &self.cells[i])
    }

    #[inline]
    pub fn is_solid(&self, p: Point) -> bool {
        self.get(p).map_or(false, |c| c.solid)
    }

    #[inline]
    pub fn creature_at(&self, p: Point) -> Option<usize> {
        self.get(p).and_then(|c| c.creature)
    }

    /// In bounds, not solid and not occupied
    #[inline]
    pub fn is_free(&self, p: Point) -> bool {
        self.get(p).map_or(false, |c| !c.solid && c.creature.is_none())
    }

    /// Something a creature would bump into: the border, a solid cell or another creature
    #[inline]
    pub fn is_blocked(&self, p: Point) -> bool {
        self.get(p).map_or(true, |c| c.solid || c.creature.is_some())
    }

    /// Objects covering a cell
    #[inline]
    pub fn objects_at(&self, p: Point) -> &[usize] {
        self.get(p).map_or(&[], |c| c.objects.as_slice())
    }

    /// Forget every creature
    pub fn clear_creatures(&mut self) {
        for cell in &mut self.cells {
            cell.creature = None;
        }
    }

    /// Set or clear the occupant of a cell. Out-of-bounds writes are ignored.
    #[inline]
    pub fn set_creature(&mut self, p: Point, creature: Option<usize>) {
        if let Some(i) = self.index(p) {
            self.cells[i].creature = creature;
        }
    }

    /// Move an occupant from one cell to another
    #[inline]
    pub fn move_creature(&mut self, from: Point, to: Point, creature: usize) {
        self.set_creature(from, None);
        self.set_creature(to, Some(creature));
    }

    /// Recompute object coverage and solidity from the object list
    pub fn rebuild_objects(&mut self, objects: &[WorldObject]) {
        for cell in &mut self.cells {
            cell.objects.clear();
            cell.solid = false;
        }

        for (index, object) in objects.iter().enumerate() {
            let solid = object.is_solid();
            for p in object.cells(self.size) {
                if let Some(i) = self.index(p) {
                    let cell = &mut self.cells[i];
                    cell.objects.push(index);
                    cell.solid |= solid;
                }
            }
        }
    }

    /// Every non-solid cell, row by row
    pub fn open_cells(&self) -> Vec<Point> {
        self.points().filter(|&p| !self.is_solid(p)).collect()
    }

    /// Number of cells holding a creature
    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|c| c.creature.is_some()).count()
    }

    /// Number of cells covered by a solid object
    pub fn solid_count(&self) -> usize {
        self.cells.iter().filter(|c| c.solid).count()
    }

    /// Creatures on the 8 surrounding cells
    pub fn neighbour_count(&self, p: Point) -> usize {
        const AROUND: [(i32, i32); 8] = [
            (-1, 1),
            (0, 1),
            (1, 1),
            (1, 0),
            (1, -1),
            (0, -1),
            (-1, -1),
            (-1, 0),
        ];
        AROUND
            .iter()
            .filter(|&&(dx, dy)| self.creature_at(p.offset(dx, dy)).is_some())
            .count()
    }

    fn points(&self) -> impl Iterator<Item = Point> + '_ {
        let size = self.size as i32;
        (0..size).flat_map(move |y| (0..size).map(move |x| Point::new(x, y)))
    }
}
