//! Fixed-step control loop decoupled from frame delivery.

use glam::{Quat, Vec3};
use rig_physics::{Engine, PhysicsModel, PhysicsState};

use crate::action::{apply_action, Action};
use crate::drag::{apply_drag_force, apply_drag_offset, DragState};
use crate::noise::NoiseInjector;
use crate::observation::{Observation, ObservationBuilder};
use crate::params::ControlParams;

/// Wall-clock backlog (ms) beyond which catch-up is abandoned and the
/// simulated clock snaps to the frame time. Trades exact reproduction of
/// missed steps for real-time responsiveness after a stall.
pub const RUNAWAY_GAP_MS: f32 = 35.0;

/// The policy pipeline as the driver sees it: fire-and-forget requests and a
/// poll for whatever has completed. Implementations hold no queue; the
/// invocation-interval gate keeps overlap rare, and late completions are
/// simply applied when they arrive.
pub trait PolicySource {
    /// Declared input width of the loaded model, `None` before loading.
    fn input_width(&self) -> Option<usize>;

    /// Starts an inference cycle. Must not block the frame.
    fn request(&mut self, observation: Observation);

    /// Latest completed action, if any arrived since the last poll.
    fn poll(&mut self) -> Option<Action>;
}

/// Renderable pose of one body, re-derived from physics state every frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyTransform {
    pub position: Vec3,
    pub rotation: Quat,
}

/// Clock state for the loop: simulated time and the policy invocation gate.
/// Reset whenever a scene is (re)loaded.
#[derive(Debug, Clone, Copy, Default)]
pub struct ControlClock {
    /// Simulated time, milliseconds of wall-clock the steps have covered.
    pub sim_time_ms: f32,
    /// Frame time at which the policy was last invoked.
    pub last_policy_ms: f32,
}

/// Drives fixed-step physics against variable frame timing and routes the
/// policy pipeline. One instance per loaded scene.
pub struct ControlLoop<E: Engine> {
    engine: E,
    clock: ControlClock,
    noise: NoiseInjector,
    observer: ObservationBuilder,
    transforms: Vec<BodyTransform>,
}

impl<E: Engine> ControlLoop<E> {
    pub fn new(engine: E, observer: ObservationBuilder) -> Self {
        Self {
            engine,
            clock: ControlClock::default(),
            noise: NoiseInjector::new(),
            observer,
            transforms: Vec::new(),
        }
    }

    /// Deterministic noise for tests.
    pub fn with_noise(mut self, noise: NoiseInjector) -> Self {
        self.noise = noise;
        self
    }

    /// Resets the clock for a newly loaded scene.
    pub fn reset(&mut self) {
        self.clock = ControlClock::default();
        self.transforms.clear();
    }

    pub fn clock(&self) -> &ControlClock {
        &self.clock
    }

    /// Renderable transforms from the most recent `advance`.
    pub fn transforms(&self) -> &[BodyTransform] {
        &self.transforms
    }

    /// Advances the simulation for one rendered frame.
    ///
    /// `frame_time_ms` is wall-clock time since the loop started. Returns the
    /// number of physics steps executed. Paused frames resolve kinematics
    /// only; running frames catch the simulated clock up to the frame time in
    /// fixed steps, each ordered: zero applied forces, inject noise, apply
    /// drag force, step. In both cases the renderable transforms are
    /// recomputed after all state mutation, before the caller renders.
    pub fn advance(
        &mut self,
        frame_time_ms: f32,
        params: &ControlParams,
        model: &PhysicsModel,
        state: &mut PhysicsState,
        drag: Option<&DragState>,
        policy: &mut dyn PolicySource,
    ) -> u32 {
        if params.paused {
            apply_drag_offset(drag, model, state);
            self.engine.forward(model, state);
            self.resync(state);
            return 0;
        }

        // Late inference results first, so a completed action feeds the
        // steps below rather than waiting a frame.
        if let Some(action) = policy.poll() {
            apply_action(&action, &mut state.ctrl, &model.actuator_ranges);
        }

        if params.policy_control {
            if let Some(width) = policy.input_width() {
                if frame_time_ms - self.clock.last_policy_ms >= params.policy_interval_ms {
                    let observation = self.observer.build(model, state, Some(width));
                    policy.request(observation);
                    self.clock.last_policy_ms = frame_time_ms;
                }
            }
        }

        if frame_time_ms - self.clock.sim_time_ms > RUNAWAY_GAP_MS {
            log::debug!(
                "frame gap {:.1}ms exceeds {}ms, dropping step backlog",
                frame_time_ms - self.clock.sim_time_ms,
                RUNAWAY_GAP_MS
            );
            self.clock.sim_time_ms = frame_time_ms;
        }

        let dt_ms = model.timestep * 1000.0;
        let mut steps = 0u32;
        while self.clock.sim_time_ms < frame_time_ms {
            state.zero_applied_forces();
            self.noise.inject(
                &mut state.ctrl,
                model.timestep,
                params.ctrl_noise_rate,
                params.ctrl_noise_std,
            );
            apply_drag_force(drag, model, state);
            self.engine.step(model, state);
            self.clock.sim_time_ms += dt_ms;
            steps += 1;
        }

        self.resync(state);
        steps
    }

    fn resync(&mut self, state: &PhysicsState) {
        self.transforms.clear();
        self.transforms
            .extend(state.xpos.iter().zip(&state.xquat).map(|(&p, &q)| {
                BodyTransform {
                    position: p,
                    rotation: q,
                }
            }));
    }
}

/// A policy source that never produces anything; for shells running without
/// a loaded model.
#[derive(Debug, Default)]
pub struct NullPolicy;

impl PolicySource for NullPolicy {
    fn input_width(&self) -> Option<usize> {
        None
    }

    fn request(&mut self, _observation: Observation) {}

    fn poll(&mut self) -> Option<Action> {
        None
    }
}
