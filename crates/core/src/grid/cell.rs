//! Grid cell and neighbor links

use crate::cloud::Sample;
use serde::{Deserialize, Serialize};

/// One of the four axis-aligned neighbor directions.
///
/// Directions are in grid terms: `North` is the previous row, `East` the next
/// column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    North,
    South,
    East,
    West,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::South,
        Direction::East,
        Direction::West,
    ];

    #[inline]
    const fn slot(self) -> usize {
        match self {
            Direction::North => 0,
            Direction::South => 1,
            Direction::East => 2,
            Direction::West => 3,
        }
    }
}

/// Index links to adjacent cells; `None` at a grid boundary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Neighbors([Option<usize>; 4]);

impl Neighbors {
    #[inline]
    pub fn get(&self, direction: Direction) -> Option<usize> {
        self.0[direction.slot()]
    }

    #[inline]
    pub fn set(&mut self, direction: Direction, index: Option<usize>) {
        self.0[direction.slot()] = index;
    }

    /// Present links in N, S, E, W order.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.0.iter().flatten().copied()
    }

    pub fn count(&self) -> usize {
        self.0.iter().filter(|link| link.is_some()).count()
    }
}

/// A sample placed in the grid, carrying water depth and neighbor links.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    pub(crate) sample: Sample,
    pub(crate) water: f64,
    pub(crate) neighbors: Neighbors,
}

impl Cell {
    /// Dry, unlinked cell
    pub fn new(sample: Sample) -> Self {
        Cell {
            sample,
            water: 0.0,
            neighbors: Neighbors::default(),
        }
    }

    pub fn sample(&self) -> &Sample {
        &self.sample
    }

    pub fn x(&self) -> f64 {
        self.sample.x
    }

    pub fn y(&self) -> f64 {
        self.sample.y
    }

    /// Terrain elevation
    pub fn elevation(&self) -> f64 {
        self.sample.z
    }

    /// Water depth (never negative)
    pub fn water(&self) -> f64 {
        self.water
    }

    /// Elevation plus water depth
    #[inline]
    pub fn head(&self) -> f64 {
        self.sample.z + self.water
    }

    pub fn neighbors(&self) -> &Neighbors {
        &self.neighbors
    }

    pub fn neighbor(&self, direction: Direction) -> Option<usize> {
        self.neighbors.get(direction)
    }
}
