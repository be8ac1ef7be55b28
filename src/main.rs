mod renderer;

use anyhow::Context;
use blockworld::{CameraController, WorldConfig, WorldState};
use clap::Parser;
use renderer::State;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use winit::{
    application::ApplicationHandler,
    event::*,
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::{Key, NamedKey},
    window::{CursorGrabMode, Window, WindowId},
};

#[derive(Parser, Debug)]
#[command(about = "Walk a procedurally stamped block meadow")]
struct Args {
    /// World configuration file (TOML)
    #[arg(short, long, default_value = "blockworld.toml")]
    config: PathBuf,

    /// Seed for terrain and placements, overrides the config file
    #[arg(short, long)]
    seed: Option<u64>,
}

struct App {
    window: Option<Arc<Window>>,
    state: Option<State>,
    world: WorldState,
    controller: CameraController,
    started: Instant,
    cursor_grabbed: bool,
}

impl App {
    fn new(world: WorldState) -> Self {
        Self {
            window: None,
            state: None,
            world,
            controller: CameraController::new(),
            started: Instant::now(),
            cursor_grabbed: false,
        }
    }

    fn sync_cursor(&mut self) {
        let wanted = self.controller.mouse_look();
        if wanted == self.cursor_grabbed {
            return;
        }
        let Some(window) = self.window.as_ref() else {
            return;
        };

        let result = if wanted {
            window
                .set_cursor_grab(CursorGrabMode::Locked)
                .or_else(|_| window.set_cursor_grab(CursorGrabMode::Confined))
        } else {
            window.set_cursor_grab(CursorGrabMode::None)
        };
        if let Err(e) = result {
            log::warn!("Cursor grab failed: {}", e);
        }
        window.set_cursor_visible(!wanted);
        self.cursor_grabbed = wanted;
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            let window_attributes = Window::default_attributes().with_title("Blockworld");
            let window = match event_loop.create_window(window_attributes) {
                Ok(window) => Arc::new(window),
                Err(e) => {
                    log::error!("Failed to create window: {}", e);
                    event_loop.exit();
                    return;
                }
            };
            self.window = Some(window.clone());

            match pollster::block_on(State::new(window)) {
                Ok(state) => self.state = Some(state),
                Err(e) => {
                    log::error!("Failed to create state: {:?}", e);
                    event_loop.exit();
                }
            }
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: DeviceId,
        event: DeviceEvent,
    ) {
        if let DeviceEvent::MouseMotion { delta } = event {
            self.controller.process_mouse_motion(delta.0, delta.1);
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, id: WindowId, event: WindowEvent) {
        match self.window.as_ref() {
            Some(w) if w.id() == id => {}
            _ => return,
        }

        if self.controller.process_events(&event) {
            self.sync_cursor();
            return;
        }

        let Some(state) = self.state.as_mut() else {
            return;
        };

        match event {
            WindowEvent::CloseRequested
            | WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Pressed,
                        logical_key: Key::Named(NamedKey::Escape),
                        ..
                    },
                ..
            } => {
                event_loop.exit();
            }
            WindowEvent::Resized(physical_size) => {
                state.resize(physical_size);
                if let Some(window) = self.window.as_ref() {
                    window.request_redraw();
                }
            }
            WindowEvent::RedrawRequested => {
                // One logical tick per presented frame.
                self.controller.update(&mut self.world);
                self.world.animate(self.started.elapsed().as_secs_f32());
                state.update(&self.world);

                match state.render() {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => state.resize(state.size()),
                    Err(wgpu::SurfaceError::OutOfMemory) => event_loop.exit(),
                    Err(e) => log::warn!("Dropped frame: {:?}", e),
                }
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = self.window.as_ref() {
            window.request_redraw();
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut config = WorldConfig::load_or_default(&args.config);
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    let world = WorldState::new(config).context("building world")?;

    let event_loop = EventLoop::new()?;
    let mut app = App::new(world);
    event_loop.run_app(&mut app)?;
    Ok(())
}
