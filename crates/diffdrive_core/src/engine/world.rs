//! Traversability model
//!
//! The kernel only asks one question of the world: is this point blocked?
//! Anything off the map (or not a finite point) is blocked.

use serde::{Deserialize, Serialize};

use super::kinematics::Point;
use crate::error::{Result, SimError};

pub trait TraversabilityOracle {
    fn is_blocked(&self, point: Point) -> bool;
}

impl<F> TraversabilityOracle for F
where
    F: Fn(Point) -> bool,
{
    fn is_blocked(&self, point: Point) -> bool {
        self(point)
    }
}

/// Unbounded free space
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenWorld;

impl TraversabilityOracle for OpenWorld {
    fn is_blocked(&self, _point: Point) -> bool {
        false
    }
}

/// Axis-aligned obstacle rectangle in pixels, inclusive of its top-left cell
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: usize,
    pub y: usize,
    pub w: usize,
    pub h: usize,
}

/// Serializable world description used by scenario files
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldSpec {
    #[serde(default)]
    pub width: usize,
    #[serde(default)]
    pub height: usize,
    #[serde(default)]
    pub obstacles: Vec<Rect>,
    /// Optional ASCII map (`#` = blocked); overrides width/height when present
    #[serde(default)]
    pub ascii: Option<String>,
}

impl WorldSpec {
    pub fn build(&self) -> Result<OccupancyGrid> {
        let mut grid = match self.ascii.as_deref() {
            Some(map) => OccupancyGrid::from_ascii(map)?,
            None => OccupancyGrid::new(self.width, self.height)?,
        };
        for rect in &self.obstacles {
            grid.fill_rect(*rect);
        }
        Ok(grid)
    }
}

/// Largest grid accepted from a world description (cells)
pub const MAX_GRID_CELLS: usize = 1 << 26;

/// One-pixel cells, row-major. Replaces sampling the rendered background.
#[derive(Debug, Clone, PartialEq)]
pub struct OccupancyGrid {
    width: usize,
    height: usize,
    cells: Vec<bool>,
}

impl OccupancyGrid {
    pub fn new(width: usize, height: usize) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(SimError::invalid_config(format!(
                "occupancy grid must be non-empty, got {}x{}",
                width, height
            )));
        }
        let cells = match width.checked_mul(height) {
            Some(n) if n <= MAX_GRID_CELLS => n,
            _ => {
                return Err(SimError::invalid_config(format!(
                    "occupancy grid {}x{} exceeds {} cells",
                    width, height, MAX_GRID_CELLS
                )))
            }
        };
        Ok(Self { width, height, cells: vec![false; cells] })
    }

    /// Rows separated by newlines; `#` marks a blocked cell. Short rows are
    /// padded with free space.
    pub fn from_ascii(map: &str) -> Result<Self> {
        let rows: Vec<&str> = map.lines().filter(|l| !l.trim().is_empty()).collect();
        let width = rows.iter().map(|r| r.chars().count()).max().unwrap_or(0);
        let mut grid = Self::new(width, rows.len())?;
        for (y, row) in rows.iter().enumerate() {
            for (x, ch) in row.chars().enumerate() {
                if ch == '#' {
                    grid.set_blocked(x, y, true);
                }
            }
        }
        Ok(grid)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn set_blocked(&mut self, x: usize, y: usize, blocked: bool) {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x] = blocked;
        }
    }

    /// Block every cell of `rect` that lies on the map
    pub fn fill_rect(&mut self, rect: Rect) {
        let x_end = rect.x.saturating_add(rect.w).min(self.width);
        let y_end = rect.y.saturating_add(rect.h).min(self.height);
        for y in rect.y..y_end {
            for x in rect.x..x_end {
                self.cells[y * self.width + x] = true;
            }
        }
    }

    pub fn cell_blocked(&self, x: usize, y: usize) -> Option<bool> {
        if x < self.width && y < self.height {
            Some(self.cells[y * self.width + x])
        } else {
            None
        }
    }

    pub fn blocked_count(&self) -> usize {
        self.cells.iter().filter(|c| **c).count()
    }

    /// Pixel containing `point`, rounded up like the sampled sensor pixels.
    pub fn cell_of(&self, point: Point) -> Option<(usize, usize)> {
        if !point.0.is_finite() || !point.1.is_finite() {
            return None;
        }
        let cx = point.0.ceil();
        let cy = point.1.ceil();
        if cx < 0.0 || cy < 0.0 || cx >= self.width as f64 || cy >= self.height as f64 {
            return None;
        }
        Some((cx as usize, cy as usize))
    }
}

impl TraversabilityOracle for OccupancyGrid {
    fn is_blocked(&self, point: Point) -> bool {
        match self.cell_of(point) {
            Some((x, y)) => self.cells[y * self.width + x],
            None => true,
        }
    }
}
