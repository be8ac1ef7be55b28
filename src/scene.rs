use std::f32::consts::TAU;

use glam::{Mat4, Quat, Vec3};
use log::{debug, info};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::camera::Camera;
use crate::config::{ConfigError, WorldConfig};
use crate::placement::{AnimalKind, FlowerColor, Placements};
use crate::shape::Rgba;
use crate::world::HeightMap;

const GRASS: Rgba = [0.35, 0.7, 0.25, 1.0];
const DIRT: Rgba = [0.55, 0.38, 0.22, 1.0];
const DAY_SKY: Rgba = [0.53, 0.78, 0.95, 1.0];
const NIGHT_SKY: Rgba = [0.02, 0.03, 0.1, 1.0];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mesh {
    /// Unit cube.
    Cube,
    /// Sphere of diameter 1.
    Sphere,
}

/// One unit mesh, centred on `position`, scaled then turned about Y.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Instance {
    pub mesh: Mesh,
    pub position: Vec3,
    pub scale: Vec3,
    /// Degrees about +Y.
    pub rotation_y: f32,
    pub color: Rgba,
}

impl Instance {
    pub fn block(position: Vec3, color: Rgba) -> Self {
        Self { mesh: Mesh::Cube, position, scale: Vec3::ONE, rotation_y: 0.0, color }
    }

    pub fn sphere(center: Vec3, radius: f32, color: Rgba) -> Self {
        Self {
            mesh: Mesh::Sphere,
            position: center,
            scale: Vec3::splat(radius * 2.0),
            rotation_y: 0.0,
            color,
        }
    }

    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(
            self.scale,
            Quat::from_rotation_y(self.rotation_y.to_radians()),
            self.position,
        )
    }
}

pub trait RenderContext {
    fn draw(&mut self, instance: Instance);
}

impl RenderContext for Vec<Instance> {
    fn draw(&mut self, instance: Instance) {
        self.push(instance);
    }
}

/// Idle motion shared by every animal, plus the orbiting light.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationState {
    pub seconds: f32,
    pub bob: f32,
    /// Degrees.
    pub sway: f32,
    pub light_position: Vec3,
}

impl AnimationState {
    /// `light_angle` (radians) shifts the light along its orbit.
    pub fn at(seconds: f32, world_size: usize, light_angle: f32) -> Self {
        let mid = world_size as f32 / 2.0;
        let radius = world_size as f32 / 3.0;
        let phase = seconds * 0.5 + light_angle;
        Self {
            seconds,
            bob: 0.05 * (seconds * 2.0).sin(),
            sway: 5.0 * seconds.sin(),
            light_position: Vec3::new(
                mid + phase.cos() * radius,
                8.0 + (seconds * 0.3).sin() * 3.0,
                mid + phase.sin() * radius,
            ),
        }
    }
}

/// A decorative ball floating over the meadow.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sphere {
    pub center: Vec3,
    pub radius: f32,
    pub color: Rgba,
}

/// The fixed props of every world, laid out around the map centre.
pub fn landmark_spheres(size: usize) -> [Sphere; 4] {
    let mid = (size / 2) as f32;
    let at = |x: f32, y: f32, z: f32| Vec3::new(mid + x, y, mid + z);
    [
        Sphere { center: at(5.0, 3.0, 5.0), radius: 1.5, color: [1.0, 0.3, 0.3, 1.0] },
        Sphere { center: at(-8.0, 2.0, 10.0), radius: 1.0, color: [0.3, 1.0, 0.3, 1.0] },
        Sphere { center: at(12.0, 4.0, -6.0), radius: 2.0, color: [0.3, 0.3, 1.0, 1.0] },
        Sphere { center: at(-5.0, 2.0, -8.0), radius: 1.2, color: [1.0, 1.0, 1.0, 1.0] },
    ]
}

/// Something standing on a column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Entity {
    Pig,
    Cow,
    Flower(FlowerColor),
    Sphere { radius: f32, color: Rgba },
}

impl From<AnimalKind> for Entity {
    fn from(kind: AnimalKind) -> Self {
        match kind {
            AnimalKind::Pig => Entity::Pig,
            AnimalKind::Cow => Entity::Cow,
        }
    }
}

impl Entity {
    /// `base` is the centre of the top face of the column it stands on,
    /// or the centre of a sphere.
    pub fn render(&self, ctx: &mut impl RenderContext, base: Vec3, animation: &AnimationState) {
        match self {
            Entity::Pig => render_pig(ctx, base, animation),
            Entity::Cow => render_cow(ctx, base, animation),
            Entity::Flower(color) => render_flower(ctx, base, *color),
            Entity::Sphere { radius, color } => ctx.draw(Instance::sphere(base, *radius, *color)),
        }
    }
}

fn part(ctx: &mut impl RenderContext, base: Vec3, offset: [f32; 3], scale: [f32; 3], sway: f32, color: Rgba) {
    ctx.draw(Instance {
        mesh: Mesh::Cube,
        position: base + Vec3::from(offset),
        scale: Vec3::from(scale),
        rotation_y: sway,
        color,
    });
}

// Legs bob out of phase front to back.
fn legs(ctx: &mut impl RenderContext, base: Vec3, spread: [f32; 2], height: f32, animation: &AnimationState, color: Rgba) {
    for i in 0..4 {
        let x = if i % 2 == 0 { -spread[0] } else { spread[0] };
        let z = if i < 2 { -spread[1] } else { spread[1] };
        let bob = if i < 2 { animation.bob } else { -animation.bob };
        part(ctx, base, [x, height / 2.0 + bob, z], [0.1, height, 0.1], animation.sway, color);
    }
}

fn render_pig(ctx: &mut impl RenderContext, base: Vec3, animation: &AnimationState) {
    let pink = [1.0, 0.8, 0.8, 1.0];
    let b = animation.bob;
    let s = animation.sway;
    part(ctx, base, [0.0, 0.3 + b, 0.0], [0.4, 0.3, 0.6], s, pink);
    part(ctx, base, [0.3, 0.5 + b, 0.0], [0.3, 0.3, 0.3], s, pink);
    part(ctx, base, [0.5, 0.5 + b, 0.0], [0.1, 0.15, 0.2], s, [1.0, 0.7, 0.7, 1.0]);
    legs(ctx, base, [0.15, 0.2], 0.2, animation, [0.9, 0.7, 0.7, 1.0]);
}

fn render_cow(ctx: &mut impl RenderContext, base: Vec3, animation: &AnimationState) {
    let b = animation.bob;
    let s = animation.sway;
    part(ctx, base, [0.0, 0.4 + b, 0.0], [0.5, 0.4, 0.8], s, [0.2, 0.2, 0.2, 1.0]);
    part(ctx, base, [0.1, 0.41 + b, -0.1], [0.3, 0.3, 0.4], s, [1.0, 1.0, 1.0, 1.0]);
    part(ctx, base, [0.4, 0.6 + b, 0.0], [0.35, 0.35, 0.3], s, [0.3, 0.3, 0.3, 1.0]);
    for z in [-0.15, 0.15] {
        part(ctx, base, [0.5, 0.9 + b, z], [0.05, 0.15, 0.05], s, [0.8, 0.8, 0.7, 1.0]);
    }
    legs(ctx, base, [0.2, 0.3], 0.4, animation, [0.2, 0.2, 0.2, 1.0]);
}

fn render_flower(ctx: &mut impl RenderContext, base: Vec3, color: FlowerColor) {
    let head = match color {
        FlowerColor::Red => [1.0, 0.0, 0.0, 1.0],
        FlowerColor::Yellow => [1.0, 1.0, 0.0, 1.0],
        FlowerColor::White => [1.0, 1.0, 1.0, 1.0],
    };
    part(ctx, base, [0.0, 0.25, 0.0], [0.03, 0.5, 0.03], 0.0, [0.0, 0.7, 0.0, 1.0]);
    part(ctx, base, [0.0, 0.5, 0.0], [0.15, 0.05, 0.15], 0.0, head);
    for i in 0..4 {
        let angle = i as f32 * std::f32::consts::FRAC_PI_2;
        part(ctx, base, [angle.cos() * 0.1, 0.5, angle.sin() * 0.1], [0.1, 0.03, 0.1], 0.0, head);
    }
}

/// Everything one session owns: the terrain, what stands on it, and the
/// player's camera. Regenerating replaces map and placements wholesale.
pub struct WorldState {
    config: WorldConfig,
    rng: ChaCha8Rng,
    map: HeightMap,
    placements: Placements,
    spheres: Vec<Sphere>,
    camera: Camera,
    animation: AnimationState,
    show_animals: bool,
    lighting: bool,
    normals: bool,
    day_night: bool,
    /// 0 is full day, 1 full night.
    time_of_day: f32,
    light_color: [f32; 3],
    /// Radians added to the light's orbit phase.
    light_angle: f32,
}

impl WorldState {
    pub fn new(config: WorldConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let seed = config.seed.unwrap_or_else(rand::random);
        info!("World seed {}", seed);

        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let (map, placements) = Self::build(&config, &mut rng);
        let camera = Camera::spawn(config.size, &config.camera);
        let light_angle = config.light.angle.to_radians().rem_euclid(TAU);
        let animation = AnimationState::at(0.0, config.size, light_angle);

        Ok(Self {
            spheres: landmark_spheres(config.size).to_vec(),
            light_color: config.light.color,
            config,
            rng,
            map,
            placements,
            camera,
            animation,
            show_animals: true,
            lighting: true,
            normals: false,
            day_night: false,
            time_of_day: 0.0,
            light_angle,
        })
    }

    fn build(config: &WorldConfig, rng: &mut ChaCha8Rng) -> (HeightMap, Placements) {
        let map = HeightMap::generate(config.size, config.random_hills, rng);
        let placements = Placements::scatter(&map, &config.counts(), rng);
        info!(
            "Generated {}x{} world: {} animals, {} flowers",
            config.size,
            config.size,
            placements.animals.len(),
            placements.flowers.len()
        );
        (map, placements)
    }

    /// Fresh terrain and placements from the next draws of the session RNG.
    /// The camera is left where it is.
    pub fn regenerate(&mut self) {
        let (map, placements) = Self::build(&self.config, &mut self.rng);
        self.map = map;
        self.placements = placements;
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    pub fn map(&self) -> &HeightMap {
        &self.map
    }

    pub fn placements(&self) -> &Placements {
        &self.placements
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    pub fn animation(&self) -> &AnimationState {
        &self.animation
    }

    pub fn spheres(&self) -> &[Sphere] {
        &self.spheres
    }

    pub fn animate(&mut self, seconds: f32) {
        self.animation = AnimationState::at(seconds, self.config.size, self.light_angle);
        if self.day_night {
            self.time_of_day = ((seconds / 30.0).sin() + 1.0) / 2.0;
        }
    }

    pub fn show_animals(&self) -> bool {
        self.show_animals
    }

    pub fn toggle_animals(&mut self) {
        self.show_animals = !self.show_animals;
    }

    pub fn lighting_enabled(&self) -> bool {
        self.lighting
    }

    pub fn toggle_lighting(&mut self) {
        self.lighting = !self.lighting;
    }

    pub fn normals_enabled(&self) -> bool {
        self.normals
    }

    /// Shade surfaces by their normal instead of their colour.
    pub fn toggle_normals(&mut self) {
        self.normals = !self.normals;
        debug!("normal visualization {}", if self.normals { "on" } else { "off" });
    }

    pub fn day_night_enabled(&self) -> bool {
        self.day_night
    }

    /// Switching the cycle off snaps back to full day.
    pub fn toggle_day_night(&mut self) {
        self.day_night = !self.day_night;
        if !self.day_night {
            self.time_of_day = 0.0;
        }
    }

    pub fn time_of_day(&self) -> f32 {
        self.time_of_day
    }

    /// Background colour, blended from day to night by the time of day.
    pub fn sky_color(&self) -> Rgba {
        let t = self.time_of_day;
        std::array::from_fn(|i| DAY_SKY[i] + (NIGHT_SKY[i] - DAY_SKY[i]) * t)
    }

    pub fn light_color(&self) -> [f32; 3] {
        self.light_color
    }

    pub fn set_light_color(&mut self, color: [f32; 3]) {
        self.light_color = color.map(|c| c.clamp(0.0, 1.0));
    }

    pub fn light_angle(&self) -> f32 {
        self.light_angle
    }

    /// Shift the light along its orbit. Takes effect at the next `animate`.
    pub fn rotate_light(&mut self, degrees: f32) {
        self.light_angle = (self.light_angle + degrees.to_radians()).rem_euclid(TAU);
    }

    /// Step forward unless a column is in the way. Returns whether it moved.
    pub fn walk_forward(&mut self) -> bool {
        if self.camera.blocked_ahead(&self.map) {
            return false;
        }
        self.camera.forward();
        true
    }

    fn column_top(&self, x: usize, z: usize) -> Vec3 {
        Vec3::new(x as f32 + 0.5, self.map.at(x, z) as f32, z as f32 + 0.5)
    }

    /// Emit the frame's meshes: terrain columns, flowers, animals if shown,
    /// spheres, and a marker at the light tinted by its colour.
    pub fn render(&self, ctx: &mut impl RenderContext) {
        for (x, z, height) in self.map.columns() {
            for y in 0..height {
                let color = if y + 1 == height { GRASS } else { DIRT };
                let center = Vec3::new(x as f32 + 0.5, y as f32 + 0.5, z as f32 + 0.5);
                ctx.draw(Instance::block(center, color));
            }
        }

        for flower in &self.placements.flowers {
            Entity::Flower(flower.kind).render(ctx, self.column_top(flower.x, flower.z), &self.animation);
        }

        if self.show_animals {
            for animal in &self.placements.animals {
                Entity::from(animal.kind).render(ctx, self.column_top(animal.x, animal.z), &self.animation);
            }
        }

        for sphere in &self.spheres {
            let entity = Entity::Sphere { radius: sphere.radius, color: sphere.color };
            entity.render(ctx, sphere.center, &self.animation);
        }

        let [r, g, b] = self.light_color;
        ctx.draw(Instance {
            mesh: Mesh::Cube,
            position: self.animation.light_position,
            scale: Vec3::splat(0.5),
            rotation_y: 0.0,
            color: [r, g, b, 1.0],
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded(seed: u64) -> WorldState {
        WorldState::new(WorldConfig { seed: Some(seed), ..WorldConfig::default() }).unwrap()
    }

    #[test]
    fn same_seed_builds_the_same_world() {
        let a = seeded(17);
        let b = seeded(17);
        assert_eq!(a.map(), b.map());
        assert_eq!(a.placements(), b.placements());
    }

    #[test]
    fn regenerate_replaces_terrain_but_not_camera() {
        let mut world = seeded(4);
        world.camera_mut().rot_left();
        let camera = world.camera().clone();
        let first = world.map().clone();

        world.regenerate();
        assert_ne!(world.map(), &first);
        assert_eq!(world.camera(), &camera);
        assert!(world.map().columns().all(|(_, _, h)| h >= 1));
    }

    #[test]
    fn invalid_config_builds_nothing() {
        let config = WorldConfig { size: 0, ..WorldConfig::default() };
        assert!(WorldState::new(config).is_err());
    }

    #[test]
    fn pig_and_cow_have_different_parts() {
        let animation = AnimationState::at(0.0, 32, 0.0);
        let mut pig = Vec::new();
        let mut cow = Vec::new();
        Entity::Pig.render(&mut pig, Vec3::ZERO, &animation);
        Entity::Cow.render(&mut cow, Vec3::ZERO, &animation);
        assert_eq!(pig.len(), 7);
        assert_eq!(cow.len(), 9);
    }

    #[test]
    fn hiding_animals_drops_their_cubes() {
        let mut world = seeded(2);
        let mut shown = Vec::new();
        world.render(&mut shown);

        world.toggle_animals();
        let mut hidden = Vec::new();
        world.render(&mut hidden);

        assert!(!world.show_animals());
        assert!(hidden.len() < shown.len() || world.placements().animals.is_empty());
    }

    #[test]
    fn render_emits_one_cube_per_block() {
        let config = WorldConfig {
            seed: Some(1),
            pigs: 0,
            cows: 0,
            flowers: 0,
            ..WorldConfig::default()
        };
        let world = WorldState::new(config).unwrap();
        let blocks: u32 = world.map().columns().map(|(_, _, h)| h).sum();

        let mut drawn = Vec::new();
        world.render(&mut drawn);
        let cubes = drawn.iter().filter(|i| i.mesh == Mesh::Cube).count();
        let spheres = drawn.iter().filter(|i| i.mesh == Mesh::Sphere).count();
        assert_eq!(cubes, blocks as usize + 1);
        assert_eq!(spheres, world.spheres().len());
    }

    #[test]
    fn animation_bob_is_small() {
        for step in 0..100 {
            let animation = AnimationState::at(step as f32 * 0.37, 32, 0.0);
            assert!(animation.bob.abs() <= 0.05);
            assert!(animation.sway.abs() <= 5.0);
        }
    }

    #[test]
    fn cube_model_matrix_places_the_centre() {
        let cube = Instance::block(Vec3::new(1.5, 0.5, 2.5), GRASS);
        assert_eq!(cube.model_matrix().transform_point3(Vec3::ZERO), Vec3::new(1.5, 0.5, 2.5));
    }

    #[test]
    fn sphere_instance_scales_to_its_diameter() {
        let sphere = Instance::sphere(Vec3::new(4.0, 3.0, 4.0), 1.5, [1.0; 4]);
        assert_eq!(sphere.mesh, Mesh::Sphere);
        assert_eq!(sphere.scale, Vec3::splat(3.0));
    }

    #[test]
    fn spheres_sit_around_the_map_centre() {
        let world = seeded(6);
        let spheres = world.spheres();
        assert_eq!(spheres.len(), 4);
        assert_eq!(spheres[0].center, Vec3::new(21.0, 3.0, 21.0));
        assert_eq!(spheres[2].radius, 2.0);
    }

    #[test]
    fn day_night_cycle_drives_the_sky() {
        let mut world = seeded(8);
        assert_eq!(world.sky_color(), DAY_SKY);

        world.animate(30.0 * std::f32::consts::FRAC_PI_2);
        assert_eq!(world.time_of_day(), 0.0);

        world.toggle_day_night();
        world.animate(30.0 * std::f32::consts::FRAC_PI_2);
        assert!((world.time_of_day() - 1.0).abs() < 1e-4);
        let sky = world.sky_color();
        for i in 0..3 {
            assert!((sky[i] - NIGHT_SKY[i]).abs() < 1e-3);
        }

        world.toggle_day_night();
        assert_eq!(world.time_of_day(), 0.0);
        assert_eq!(world.sky_color(), DAY_SKY);
    }

    #[test]
    fn normals_toggle_flips() {
        let mut world = seeded(8);
        assert!(!world.normals_enabled());
        world.toggle_normals();
        assert!(world.normals_enabled());
    }

    #[test]
    fn light_color_tints_the_marker() {
        let mut world = seeded(8);
        world.set_light_color([1.0, 0.2, 3.0]);
        assert_eq!(world.light_color(), [1.0, 0.2, 1.0]);

        let mut drawn = Vec::new();
        world.render(&mut drawn);
        let marker = drawn.last().unwrap();
        assert_eq!(marker.color, [1.0, 0.2, 1.0, 1.0]);
        assert_eq!(marker.position, world.animation().light_position);
    }

    #[test]
    fn light_angle_shifts_the_orbit() {
        let mut world = seeded(8);
        world.animate(0.0);
        let before = world.animation().light_position;

        world.rotate_light(90.0);
        world.animate(0.0);
        let after = world.animation().light_position;

        let mid = WorldConfig::default().size as f32 / 2.0;
        let radius = WorldConfig::default().size as f32 / 3.0;
        assert!((before.x - (mid + radius)).abs() < 1e-4);
        assert!((after.x - mid).abs() < 1e-4);
        assert!((after.z - (mid + radius)).abs() < 1e-4);

        world.rotate_light(-90.0);
        assert!(world.light_angle().abs() < 1e-4 || (world.light_angle() - TAU).abs() < 1e-4);
    }
}
