//! End-to-end checks on a generated session through the public API.

use std::collections::HashSet;

use glam::Vec3;

use blockworld::{Action, Camera, CameraController, HeightMap, Hill, WorldConfig, WorldState, WORLD_SIZE};

fn session(seed: u64) -> WorldState {
    WorldState::new(WorldConfig { seed: Some(seed), ..WorldConfig::default() }).unwrap()
}

#[test]
fn generated_world_satisfies_placement_rules() {
    for seed in 0..20 {
        let world = session(seed);
        let map = world.map();
        assert_eq!(map.size(), WORLD_SIZE);
        assert!(map.columns().all(|(_, _, h)| h >= 1));

        let placements = world.placements();
        assert!(placements.animals.len() <= 14);
        assert!(placements.flowers.len() <= 24);

        let animal_cells: HashSet<_> = placements.animals.iter().map(|p| (p.x, p.z)).collect();
        assert_eq!(animal_cells.len(), placements.animals.len());
        for animal in &placements.animals {
            let h = map.get(animal.x, animal.z).unwrap();
            assert!((1..=3).contains(&h));
        }

        let flower_cells: HashSet<_> = placements.flowers.iter().map(|p| (p.x, p.z)).collect();
        assert_eq!(flower_cells.len(), placements.flowers.len());
        for flower in &placements.flowers {
            let h = map.get(flower.x, flower.z).unwrap();
            assert!((1..=4).contains(&h));
        }
    }
}

#[test]
fn landmark_peak_survives_generation() {
    let world = session(77);
    assert_eq!(world.map().get(16, 16), Some(7));
}

#[test]
fn walking_into_the_central_hill_is_blocked() {
    let mut world = session(3);
    let mut controller = CameraController::new();

    // Two cells west of the peak the column is five blocks tall.
    let eye = Vec3::new(14.5, 2.0, 16.5);
    *world.camera_mut() = Camera::new(eye, eye + Vec3::X);
    controller.press(Action::Forward);
    controller.update(&mut world);
    assert_eq!(world.camera().eye(), eye);

    controller.press(Action::Backward);
    controller.update(&mut world);
    assert!(world.camera().eye().x < eye.x);
}

#[test]
fn spawn_faces_the_centre() {
    let world = session(5);
    let camera = world.camera();
    assert_eq!(camera.forward_vector(), Vec3::X);
    assert_eq!(camera.eye().y, 2.0);
    assert!(camera.eye().x < 1.0);
}

#[test]
fn regenerate_through_the_controller() {
    let mut world = session(9);
    let before = world.map().clone();
    let mut controller = CameraController::new();
    controller.press(Action::Regenerate);
    controller.update(&mut world);
    assert_ne!(world.map(), &before);
}

#[test]
fn manual_sculpting_matches_generation_rules() {
    let mut map = HeightMap::flat(WORLD_SIZE);
    map.add_hill(Hill::new(16, 16, 8, 6));
    assert_eq!(map.get(16, 16), Some(7));
    assert_eq!(map.get(24, 16), Some(1));
    assert_eq!(map.get(0, 0), Some(1));
}
