use log::debug;
use rand::Rng;

use crate::world::HeightMap;

/// Cell draws per entity before it is given up on.
pub const MAX_ATTEMPTS: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnimalKind {
    Pig,
    Cow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlowerColor {
    Red,
    Yellow,
    White,
}

impl FlowerColor {
    pub fn index(self) -> usize {
        match self {
            FlowerColor::Red => 0,
            FlowerColor::Yellow => 1,
            FlowerColor::White => 2,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(FlowerColor::Red),
            1 => Some(FlowerColor::Yellow),
            2 => Some(FlowerColor::White),
            _ => None,
        }
    }

    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        match rng.gen_range(0..3) {
            0 => FlowerColor::Red,
            1 => FlowerColor::Yellow,
            _ => FlowerColor::White,
        }
    }
}

/// An entity pinned to a grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement<K> {
    pub x: usize,
    pub z: usize,
    pub kind: K,
}

impl<K> Placement<K> {
    pub fn cell(&self) -> (usize, usize) {
        (self.x, self.z)
    }
}

fn occupied<K>(existing: &[Placement<K>], x: usize, z: usize) -> bool {
    existing.iter().any(|p| p.x == x && p.z == z)
}

/// Low, unoccupied, and no neighbour more than one block up or down.
pub fn suits_animal(map: &HeightMap, x: usize, z: usize, animals: &[Placement<AnimalKind>]) -> bool {
    let Some(height) = map.get(x, z) else {
        return false;
    };
    if occupied(animals, x, z) || !(1..=3).contains(&height) {
        return false;
    }

    let size = map.size();
    for nx in x.saturating_sub(1)..=(x + 1).min(size - 1) {
        for nz in z.saturating_sub(1)..=(z + 1).min(size - 1) {
            if map.at(nx, nz).abs_diff(height) > 1 {
                return false;
            }
        }
    }
    true
}

pub fn suits_flower(map: &HeightMap, x: usize, z: usize, flowers: &[Placement<FlowerColor>]) -> bool {
    match map.get(x, z) {
        Some(height) => (1..=4).contains(&height) && !occupied(flowers, x, z),
        None => false,
    }
}

fn sample_cell<R, F>(size: usize, rng: &mut R, accept: F) -> Option<(usize, usize)>
where
    R: Rng + ?Sized,
    F: Fn(usize, usize) -> bool,
{
    if size == 0 {
        return None;
    }
    (0..MAX_ATTEMPTS).find_map(|_| {
        let x = rng.gen_range(0..size);
        let z = rng.gen_range(0..size);
        accept(x, z).then_some((x, z))
    })
}

/// Tries to add `count` animals of `kind` to `animals`. Entities with no
/// acceptable cell after [`MAX_ATTEMPTS`] draws are skipped. Returns how
/// many were placed.
pub fn place_animals<R: Rng + ?Sized>(
    map: &HeightMap,
    kind: AnimalKind,
    count: usize,
    animals: &mut Vec<Placement<AnimalKind>>,
    rng: &mut R,
) -> usize {
    let mut placed = 0;
    for _ in 0..count {
        match sample_cell(map.size(), rng, |x, z| suits_animal(map, x, z, animals)) {
            Some((x, z)) => {
                animals.push(Placement { x, z, kind });
                placed += 1;
            }
            None => debug!("no room for a {:?} after {} attempts", kind, MAX_ATTEMPTS),
        }
    }
    placed
}

/// Flower counterpart of [`place_animals`]. The colour is drawn only once a
/// cell has been accepted.
pub fn place_flowers<R: Rng + ?Sized>(
    map: &HeightMap,
    count: usize,
    flowers: &mut Vec<Placement<FlowerColor>>,
    rng: &mut R,
) -> usize {
    let mut placed = 0;
    for _ in 0..count {
        match sample_cell(map.size(), rng, |x, z| suits_flower(map, x, z, flowers)) {
            Some((x, z)) => {
                let kind = FlowerColor::random(rng);
                flowers.push(Placement { x, z, kind });
                placed += 1;
            }
            None => debug!("no room for a flower after {} attempts", MAX_ATTEMPTS),
        }
    }
    placed
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlacementCounts {
    pub pigs: usize,
    pub cows: usize,
    pub flowers: usize,
}

impl Default for PlacementCounts {
    fn default() -> Self {
        Self { pigs: 8, cows: 6, flowers: 24 }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Placements {
    pub animals: Vec<Placement<AnimalKind>>,
    pub flowers: Vec<Placement<FlowerColor>>,
}

impl Placements {
    /// Pigs first, then cows sharing the same occupancy, then flowers.
    pub fn scatter<R: Rng + ?Sized>(map: &HeightMap, counts: &PlacementCounts, rng: &mut R) -> Self {
        let mut placements = Self::default();
        place_animals(map, AnimalKind::Pig, counts.pigs, &mut placements.animals, rng);
        place_animals(map, AnimalKind::Cow, counts.cows, &mut placements.animals, rng);
        place_flowers(map, counts.flowers, &mut placements.flowers, rng);
        placements
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::{Hill, WORLD_SIZE};
    use rand::{RngCore, SeedableRng};
    use rand_chacha::ChaCha8Rng;
    use std::collections::HashSet;

    /// Always yields zero, so every cell draw lands on (0, 0). Counts draws.
    #[derive(Default)]
    struct ZeroRng {
        draws: usize,
    }

    impl RngCore for ZeroRng {
        fn next_u32(&mut self) -> u32 {
            self.draws += 1;
            0
        }

        fn next_u64(&mut self) -> u64 {
            self.draws += 1;
            0
        }

        fn fill_bytes(&mut self, dest: &mut [u8]) {
            self.draws += 1;
            dest.fill(0);
        }

        fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
            self.fill_bytes(dest);
            Ok(())
        }
    }

    // (0, 0) is low but has a cliff next to it, and is too tall for flowers
    // once raised.
    fn cliff_corner(corner: u32) -> HeightMap {
        let mut heights = vec![1; 16];
        heights[0] = corner;
        heights[4] = 3;
        HeightMap::from_heights(4, heights).unwrap()
    }

    #[test]
    fn animal_gives_up_after_fifty_attempts() {
        let map = cliff_corner(1);
        let mut rng = ZeroRng::default();
        let mut animals = Vec::new();

        let placed = place_animals(&map, AnimalKind::Pig, 3, &mut animals, &mut rng);
        assert_eq!(placed, 0);
        assert!(animals.is_empty());
        assert_eq!(rng.draws, 3 * MAX_ATTEMPTS * 2);
    }

    #[test]
    fn flower_gives_up_after_fifty_attempts() {
        let map = cliff_corner(5);
        let mut rng = ZeroRng::default();
        let mut flowers = Vec::new();

        assert_eq!(place_flowers(&map, 1, &mut flowers, &mut rng), 0);
        assert_eq!(rng.draws, MAX_ATTEMPTS * 2);
    }

    #[test]
    fn first_acceptable_draw_wins() {
        let map = HeightMap::flat(4);
        let mut rng = ZeroRng::default();
        let mut flowers = Vec::new();

        assert_eq!(place_flowers(&map, 1, &mut flowers, &mut rng), 1);
        // Two coordinates, then the colour.
        assert_eq!(rng.draws, 3);
        assert_eq!(flowers[0].cell(), (0, 0));
        assert_eq!(flowers[0].kind, FlowerColor::Red);
    }

    fn assert_flat(map: &HeightMap, x: usize, z: usize) {
        let h = map.get(x, z).unwrap() as i64;
        for dx in -1i64..=1 {
            for dz in -1i64..=1 {
                let (nx, nz) = (x as i64 + dx, z as i64 + dz);
                if nx < 0 || nz < 0 {
                    continue;
                }
                if let Some(n) = map.get(nx as usize, nz as usize) {
                    assert!((n as i64 - h).abs() <= 1, "steep neighbour at ({nx}, {nz})");
                }
            }
        }
    }

    #[test]
    fn animals_only_on_flat_low_ground() {
        let mut rng = ChaCha8Rng::seed_from_u64(21);
        let map = HeightMap::generate(WORLD_SIZE, 10, &mut rng);
        let placements = Placements::scatter(&map, &PlacementCounts::default(), &mut rng);

        let mut seen = HashSet::new();
        for animal in &placements.animals {
            assert!(seen.insert(animal.cell()), "two animals share {:?}", animal.cell());
            assert!((1..=3).contains(&map.get(animal.x, animal.z).unwrap()));
            assert_flat(&map, animal.x, animal.z);
        }
        assert!(placements.animals.len() <= 14);
    }

    #[test]
    fn flowers_never_share_a_cell() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let map = HeightMap::generate(WORLD_SIZE, 10, &mut rng);
        let mut flowers = Vec::new();
        place_flowers(&map, 200, &mut flowers, &mut rng);

        let cells: HashSet<_> = flowers.iter().map(Placement::cell).collect();
        assert_eq!(cells.len(), flowers.len());
        for flower in &flowers {
            assert!((1..=4).contains(&map.get(flower.x, flower.z).unwrap()));
        }
    }

    #[test]
    fn steep_map_is_under_populated_not_an_error() {
        // Alternate 1 and 5 so every cell has a neighbour two or more away.
        let size = 6;
        let heights = (0..size * size).map(|i| if (i / size + i % size) % 2 == 0 { 1 } else { 5 }).collect();
        let map = HeightMap::from_heights(size, heights).unwrap();

        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut animals = Vec::new();
        let placed = place_animals(&map, AnimalKind::Cow, 10, &mut animals, &mut rng);
        assert_eq!(placed, 0);
        assert!(animals.is_empty());
    }

    #[test]
    fn full_map_stops_at_capacity() {
        let map = HeightMap::flat(2);
        let mut rng = ChaCha8Rng::seed_from_u64(8);
        let mut flowers = Vec::new();
        let placed = place_flowers(&map, 10, &mut flowers, &mut rng);
        assert!(placed <= 4);
        assert_eq!(placed, flowers.len());
    }

    #[test]
    fn animal_predicate_checks_neighbours_at_edges() {
        let mut map = HeightMap::flat(4);
        assert!(suits_animal(&map, 0, 0, &[]));
        assert!(suits_animal(&map, 3, 3, &[]));

        map.add_hill(Hill::new(1, 1, 1, 2));
        assert_eq!(map.get(1, 1), Some(3));
        assert!(!suits_animal(&map, 0, 0, &[]));
        assert!(suits_animal(&map, 3, 3, &[]));

        let taken = [Placement { x: 3, z: 3, kind: AnimalKind::Pig }];
        assert!(!suits_animal(&map, 3, 3, &taken));
        assert!(!suits_animal(&map, 4, 0, &[]));
    }

    #[test]
    fn flower_predicate_respects_height_bound() {
        let mut map = HeightMap::flat(4);
        map.add_hill(Hill::new(2, 2, 1, 4));
        assert_eq!(map.get(2, 2), Some(5));
        assert!(!suits_flower(&map, 2, 2, &[]));
        assert!(suits_flower(&map, 0, 0, &[]));
    }

    #[test]
    fn flower_color_indices() {
        for i in 0..3 {
            assert_eq!(FlowerColor::from_index(i).unwrap().index(), i);
        }
        assert_eq!(FlowerColor::from_index(3), None);
    }
}
