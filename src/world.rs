use log::debug;
use rand::Rng;
use thiserror::Error;

pub const WORLD_SIZE: usize = 32;

/// A radial bump stamped onto the map. Cells strictly inside `radius` get
/// `1 + floor(height * (1 - distance / radius))`, kept only if taller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hill {
    pub center_x: i32,
    pub center_z: i32,
    pub radius: i32,
    pub height: u32,
}

impl Hill {
    pub const fn new(center_x: i32, center_z: i32, radius: i32, height: u32) -> Self {
        Self { center_x, center_z, radius, height }
    }

    /// Random hill with radius in [2, 5) and height in [1, 3).
    pub fn random<R: Rng + ?Sized>(size: usize, rng: &mut R) -> Self {
        let center_x = rng.gen_range(0..size) as i32;
        let center_z = rng.gen_range(0..size) as i32;
        let radius = 2 + rng.gen_range(0..3);
        let height = 1 + rng.gen_range(0..2);
        Self { center_x, center_z, radius, height }
    }
}

/// The hills every world starts from, before any random ones.
pub fn landmark_hills(size: usize) -> [Hill; 6] {
    let mid = (size / 2) as i32;
    [
        Hill::new(mid, mid, 8, 6),
        Hill::new(10, 10, 5, 4),
        Hill::new(20, 8, 4, 3),
        Hill::new(5, 25, 6, 3),
        Hill::new(25, 20, 7, 5),
        Hill::new(15, 18, 3, 2),
    ]
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MapError {
    #[error("height map needs {expected} columns for size {size}, got {actual}")]
    WrongLength { size: usize, expected: usize, actual: usize },
    #[error("column ({x}, {z}) has height 0, the base plate is at least 1")]
    BelowBasePlate { x: usize, z: usize },
}

/// Square grid of stacked-block column heights, indexed `[x][z]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeightMap {
    size: usize,
    heights: Vec<u32>,
}

impl HeightMap {
    /// A map covered by the one-block base plate.
    pub fn flat(size: usize) -> Self {
        Self { size, heights: vec![1; size * size] }
    }

    pub fn from_heights(size: usize, heights: Vec<u32>) -> Result<Self, MapError> {
        let expected = size * size;
        if heights.len() != expected {
            return Err(MapError::WrongLength { size, expected, actual: heights.len() });
        }
        if let Some(i) = heights.iter().position(|&h| h == 0) {
            return Err(MapError::BelowBasePlate { x: i / size, z: i % size });
        }
        Ok(Self { size, heights })
    }

    /// Base plate, the landmark hills, then `random_hills` random ones.
    pub fn generate<R: Rng + ?Sized>(size: usize, random_hills: usize, rng: &mut R) -> Self {
        let mut map = Self::flat(size);
        if size == 0 {
            return map;
        }

        for hill in landmark_hills(size) {
            map.add_hill(hill);
        }
        for _ in 0..random_hills {
            let hill = Hill::random(size, rng);
            debug!("random hill {:?}", hill);
            map.add_hill(hill);
        }
        map
    }

    pub fn add_hill(&mut self, hill: Hill) {
        if hill.radius <= 0 {
            return;
        }
        let size = self.size as i32;
        let radius = hill.radius as f64;

        for x in (hill.center_x - hill.radius).max(0)..(hill.center_x + hill.radius).min(size) {
            for z in (hill.center_z - hill.radius).max(0)..(hill.center_z + hill.radius).min(size) {
                let dx = (x - hill.center_x) as f64;
                let dz = (z - hill.center_z) as f64;
                let distance = (dx * dx + dz * dz).sqrt();

                if distance < radius {
                    let rise = (hill.height as f64 * (1.0 - distance / radius)).floor() as u32;
                    let cell = &mut self.heights[x as usize * self.size + z as usize];
                    *cell = (*cell).max(rise.saturating_add(1));
                }
            }
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn get(&self, x: usize, z: usize) -> Option<u32> {
        if x < self.size && z < self.size {
            Some(self.heights[x * self.size + z])
        } else {
            None
        }
    }

    /// Height of an in-bounds column. Panics outside the grid.
    pub(crate) fn at(&self, x: usize, z: usize) -> u32 {
        self.heights[x * self.size + z]
    }

    /// Every column as `(x, z, height)`.
    pub fn columns(&self) -> impl Iterator<Item = (usize, usize, u32)> + '_ {
        self.heights
            .iter()
            .enumerate()
            .map(move |(i, &h)| (i / self.size, i % self.size, h))
    }
}
