//! A stacked-block meadow: hill-stamped height map, scattered animals and
//! flowers, and a first-person camera to walk it.

pub mod camera;
pub mod camera_controller;
pub mod config;
pub mod placement;
pub mod scene;
pub mod shape;
pub mod world;

pub use camera::{Camera, Projection};
pub use camera_controller::{Action, CameraController};
pub use config::{CameraConfig, ConfigError, LightConfig, WorldConfig, MAX_WORLD_SIZE};
pub use placement::{AnimalKind, FlowerColor, Placement, PlacementCounts, Placements};
pub use scene::{AnimationState, Entity, Instance, Mesh, RenderContext, Sphere, WorldState};
pub use world::{HeightMap, Hill, MapError, WORLD_SIZE};
