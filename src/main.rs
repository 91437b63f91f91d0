//! Articulated-rig viewer shell.
//!
//! Runs the fixed-step control loop against real frame timing from winit and
//! exposes the interactive controls: pause, actuator noise, policy control,
//! and mouse dragging of the end effector.

mod scene;

use std::collections::VecDeque;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use glam::Vec3;
use rig_control::{ControlLoop, ControlParams, DragState, ObservationBuilder};
use rig_physics::{BodyRole, PhysicsModel, PhysicsState, PointMassEngine};
use rig_policy::{PolicyRuntime, DEFAULT_MODEL_PATH};
use winit::{
    application::ApplicationHandler,
    event::*,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

/// Half-width of the world region the window maps onto.
const VIEW_EXTENT: f32 = 2.0;
/// Noise level toggled by the N key.
const NOISE_STD_TOGGLE: f32 = 0.2;
/// How close (world units) a click must land to the effector to grab it.
const GRAB_RADIUS: f32 = 0.5;

struct SimState {
    model: PhysicsModel,
    state: PhysicsState,
    driver: ControlLoop<PointMassEngine>,
    policy: PolicyRuntime,
    params: ControlParams,
    drag: Option<DragState>,

    started: Instant,
    frame_times: VecDeque<f32>,
    last_frame: Instant,
    frame_counter: u32,
}

impl SimState {
    fn new(model_path: &Path) -> Self {
        let (model, state) = scene::build_demo_scene();
        let driver = ControlLoop::new(PointMassEngine::default(), ObservationBuilder::default());

        let mut policy = PolicyRuntime::new();
        policy.load(model_path);

        Self {
            model,
            state,
            driver,
            policy,
            params: ControlParams::default(),
            drag: None,
            started: Instant::now(),
            frame_times: VecDeque::with_capacity(100),
            last_frame: Instant::now(),
            frame_counter: 0,
        }
    }

    /// Runs one frame of simulation and returns (fps, avg frame ms, steps).
    fn frame(&mut self) -> (f32, f32, u32) {
        let now = Instant::now();
        let frame_time = (now - self.last_frame).as_secs_f32() * 1000.0;
        self.last_frame = now;

        self.frame_times.push_back(frame_time);
        if self.frame_times.len() > 100 {
            self.frame_times.pop_front();
        }
        let avg_frame_time = self.frame_times.iter().sum::<f32>() / self.frame_times.len() as f32;
        let fps = 1000.0 / avg_frame_time;

        let elapsed_ms = self.started.elapsed().as_secs_f32() * 1000.0;
        let steps = self.driver.advance(
            elapsed_ms,
            &self.params,
            &self.model,
            &mut self.state,
            self.drag.as_ref(),
            &mut self.policy,
        );

        self.frame_counter += 1;
        if self.frame_counter % 120 == 0 {
            for body in self.model.role_bodies() {
                let pose = self.driver.transforms()[body];
                log::debug!(
                    "{}: ({:.2}, {:.2}, {:.2})",
                    self.model.body_names[body],
                    pose.position.x,
                    pose.position.y,
                    pose.position.z
                );
            }
        }

        (fps, avg_frame_time, steps)
    }

    /// First draggable effector body, with its current world position.
    fn effector(&self) -> Option<(usize, Vec3)> {
        self.model
            .body_roles
            .iter()
            .position(|&r| r == Some(BodyRole::Effector))
            .filter(|&body| self.model.body_is_dynamic(body))
            .map(|body| (body, self.state.xpos[body]))
    }
}

struct App {
    window: Option<Arc<Window>>,
    sim: SimState,
    last_cursor_world: Option<Vec3>,
}

impl App {
    /// Maps a window cursor position to the world plane the rig lives in.
    fn cursor_to_world(&self, x: f64, y: f64) -> Option<Vec3> {
        let window = self.window.as_ref()?;
        let size = window.inner_size();
        let w = size.width.max(1) as f64;
        let h = size.height.max(1) as f64;
        let wx = ((x / w) * 2.0 - 1.0) as f32 * VIEW_EXTENT;
        let wy = (1.0 - (y / h) * 2.0) as f32 * VIEW_EXTENT;
        Some(Vec3::new(wx, wy, 0.0))
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            let window_attributes = Window::default_attributes()
                .with_title("Rig Viewer")
                .with_inner_size(winit::dpi::LogicalSize::new(1280, 720));

            let window = Arc::new(event_loop.create_window(window_attributes).unwrap());
            self.window = Some(window);
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested
            | WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        ..
                    },
                ..
            } => event_loop.exit(),

            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(key_code),
                        state: ElementState::Pressed,
                        repeat: false,
                        ..
                    },
                ..
            } => match key_code {
                KeyCode::Space => {
                    self.sim.params.paused = !self.sim.params.paused;
                    log::info!(
                        "simulation {}",
                        if self.sim.params.paused { "paused" } else { "running" }
                    );
                }
                KeyCode::KeyN => {
                    let params = &mut self.sim.params;
                    params.ctrl_noise_std = if params.ctrl_noise_std > 0.0 {
                        0.0
                    } else {
                        NOISE_STD_TOGGLE
                    };
                    log::info!("actuator noise std: {}", params.ctrl_noise_std);
                }
                KeyCode::KeyR => {
                    if self.sim.policy.is_loaded() {
                        self.sim.params.policy_control = !self.sim.params.policy_control;
                        log::info!(
                            "policy control {}",
                            if self.sim.params.policy_control { "on" } else { "off" }
                        );
                    } else {
                        log::warn!("no policy loaded, cannot enable policy control");
                    }
                }
                _ => {}
            },

            WindowEvent::MouseInput { state, button, .. } => {
                if button == MouseButton::Left {
                    match state {
                        ElementState::Pressed => {
                            let Some(pointer) = self.last_cursor_world else {
                                return;
                            };
                            if let Some((body, pick_point)) = self.sim.effector() {
                                if (pointer - pick_point).truncate().length() <= GRAB_RADIUS {
                                    log::debug!(
                                        "grabbed {} at ({:.2}, {:.2})",
                                        self.sim.model.body_names[body],
                                        pick_point.x,
                                        pick_point.y
                                    );
                                    self.sim.drag = Some(DragState {
                                        body,
                                        pick_point,
                                        pointer,
                                    });
                                }
                            }
                        }
                        ElementState::Released => {
                            self.sim.drag = None;
                        }
                    }
                }
            }

            WindowEvent::CursorMoved { position, .. } => {
                self.last_cursor_world = self.cursor_to_world(position.x, position.y);
                if let (Some(drag), Some(world)) = (&mut self.sim.drag, self.last_cursor_world) {
                    drag.pointer = world;
                }
            }

            WindowEvent::RedrawRequested => {
                let (fps, frame_time, steps) = self.sim.frame();
                if let Some(window) = &self.window {
                    let policy = if self.sim.params.policy_control {
                        "policy on"
                    } else if self.sim.policy.is_loaded() {
                        "policy off"
                    } else {
                        "no policy"
                    };
                    window.set_title(&format!(
                        "Rig Viewer - {:.0} FPS ({:.2}ms) - {} steps - {}",
                        fps, frame_time, steps, policy
                    ));
                }
            }

            _ => {}
        }

        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

fn main() {
    // RUST_LOG=debug for verbose output
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let model_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_MODEL_PATH.to_string());
    log::info!("starting rig viewer (policy checkpoint: {})", model_path);

    let event_loop = EventLoop::new().unwrap();
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App {
        window: None,
        sim: SimState::new(Path::new(&model_path)),
        last_cursor_world: None,
    };

    event_loop.run_app(&mut app).unwrap();
}
