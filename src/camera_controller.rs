use log::debug;
use winit::event::{ElementState, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

use crate::scene::WorldState;

const FOV_STEP: f32 = 5.0;
const LIGHT_STEP: f32 = 15.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Forward,
    Backward,
    StrafeLeft,
    StrafeRight,
    TurnLeft,
    TurnRight,
    Jump,
    ToggleMouseLook,
    ToggleAnimals,
    ToggleLighting,
    ToggleNormals,
    ToggleDayNight,
    WidenFov,
    NarrowFov,
    LightAngleUp,
    LightAngleDown,
    Regenerate,
}

impl Action {
    pub fn from_key(key: KeyCode) -> Option<Self> {
        let action = match key {
            KeyCode::KeyW => Action::Forward,
            KeyCode::KeyS => Action::Backward,
            KeyCode::KeyA => Action::StrafeLeft,
            KeyCode::KeyD => Action::StrafeRight,
            KeyCode::KeyQ => Action::TurnLeft,
            KeyCode::KeyE => Action::TurnRight,
            KeyCode::Space => Action::Jump,
            KeyCode::KeyM => Action::ToggleMouseLook,
            KeyCode::KeyT => Action::ToggleAnimals,
            KeyCode::KeyL => Action::ToggleLighting,
            KeyCode::KeyN => Action::ToggleNormals,
            KeyCode::KeyC => Action::ToggleDayNight,
            KeyCode::Equal => Action::WidenFov,
            KeyCode::Minus => Action::NarrowFov,
            KeyCode::BracketRight => Action::LightAngleUp,
            KeyCode::BracketLeft => Action::LightAngleDown,
            KeyCode::KeyR => Action::Regenerate,
            _ => return None,
        };
        Some(action)
    }
}

/// Collects input between frames and plays it onto the world once per tick.
/// Every key press, repeats included, is one discrete step.
#[derive(Default)]
pub struct CameraController {
    pending: Vec<Action>,
    mouse_look: bool,
    mouse_delta_x: f32,
    mouse_delta_y: f32,
}

impl CameraController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn process_events(&mut self, event: &WindowEvent) -> bool {
        match event {
            WindowEvent::KeyboardInput { event: key_event, .. } => {
                if key_event.state != ElementState::Pressed {
                    return false;
                }
                match key_event.physical_key {
                    PhysicalKey::Code(code) => match Action::from_key(code) {
                        Some(action) => {
                            self.press(action);
                            true
                        }
                        None => false,
                    },
                    _ => false,
                }
            }
            _ => false,
        }
    }

    pub fn press(&mut self, action: Action) {
        if action == Action::ToggleMouseLook {
            self.mouse_look = !self.mouse_look;
            self.mouse_delta_x = 0.0;
            self.mouse_delta_y = 0.0;
            debug!("mouse look {}", if self.mouse_look { "on" } else { "off" });
        } else {
            self.pending.push(action);
        }
    }

    pub fn mouse_look(&self) -> bool {
        self.mouse_look
    }

    pub fn process_mouse_motion(&mut self, delta_x: f64, delta_y: f64) {
        if self.mouse_look {
            self.mouse_delta_x += delta_x as f32;
            self.mouse_delta_y += delta_y as f32;
        }
    }

    /// Runs once per animation tick, after input and before drawing.
    pub fn update(&mut self, world: &mut WorldState) {
        for action in self.pending.drain(..) {
            match action {
                Action::Forward => {
                    if !world.walk_forward() {
                        debug!("forward step blocked");
                    }
                }
                Action::Backward => world.camera_mut().backward(),
                Action::StrafeLeft => world.camera_mut().left(),
                Action::StrafeRight => world.camera_mut().right(),
                Action::TurnLeft => world.camera_mut().rot_left(),
                Action::TurnRight => world.camera_mut().rot_right(),
                Action::Jump => world.camera_mut().jump(),
                Action::ToggleAnimals => world.toggle_animals(),
                Action::ToggleLighting => world.toggle_lighting(),
                Action::ToggleNormals => world.toggle_normals(),
                Action::ToggleDayNight => world.toggle_day_night(),
                Action::WidenFov => world.camera_mut().adjust_fov(FOV_STEP),
                Action::NarrowFov => world.camera_mut().adjust_fov(-FOV_STEP),
                Action::LightAngleUp => world.rotate_light(LIGHT_STEP),
                Action::LightAngleDown => world.rotate_light(-LIGHT_STEP),
                Action::Regenerate => world.regenerate(),
                Action::ToggleMouseLook => {}
            }
        }

        if self.mouse_delta_x != 0.0 || self.mouse_delta_y != 0.0 {
            world.camera_mut().look(self.mouse_delta_x, self.mouse_delta_y);
        }
        self.mouse_delta_x = 0.0;
        self.mouse_delta_y = 0.0;

        world.camera_mut().update_jump();
    }
}
