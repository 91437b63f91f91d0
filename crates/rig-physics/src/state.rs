//! Mutable per-step simulation state.

use glam::{Quat, Vec3};

use crate::model::PhysicsModel;

/// The engine's mutable arrays for one loaded scene.
///
/// The control loop mutates only well-defined fields (`ctrl`,
/// `xfrc_applied`, `mocap_pos`) and never replaces the arrays themselves;
/// everything else is written by the engine during `step`/`forward`.
#[derive(Debug, Clone)]
pub struct PhysicsState {
    /// Generalized position, length `nq`.
    pub qpos: Vec<f32>,
    /// Generalized velocity, length `nv`.
    pub qvel: Vec<f32>,
    /// Actuator commands, length `nu`. Invariant: never resized.
    pub ctrl: Vec<f32>,
    /// Externally applied force/torque per body, 6 values each
    /// (force xyz, torque xyz).
    pub xfrc_applied: Vec<f32>,

    /// Body world positions, written by the engine.
    pub xpos: Vec<Vec3>,
    /// Body world orientations, written by the engine.
    pub xquat: Vec<Quat>,
    /// Body world linear velocities, written by the engine.
    pub body_lin_vel: Vec<Vec3>,
    /// Commanded positions of kinematic (mocap) bodies.
    pub mocap_pos: Vec<Vec3>,

    /// Per-actuator transmission lengths, when the engine computes them.
    pub actuator_length: Option<Vec<f32>>,
    /// Per-actuator transmission velocities, when the engine computes them.
    pub actuator_velocity: Option<Vec<f32>>,
    /// Per-actuator applied forces, when the engine computes them.
    pub actuator_force: Option<Vec<f32>>,
    /// Tendon lengths, used as a proxy when actuator lengths are absent.
    pub tendon_length: Option<Vec<f32>>,
}

impl PhysicsState {
    /// Allocates zeroed state matching the model's counts.
    pub fn new(model: &PhysicsModel) -> Self {
        Self {
            qpos: vec![0.0; model.nq],
            qvel: vec![0.0; model.nv],
            ctrl: vec![0.0; model.nu],
            xfrc_applied: vec![0.0; model.nbody * 6],
            xpos: vec![Vec3::ZERO; model.nbody],
            xquat: vec![Quat::IDENTITY; model.nbody],
            body_lin_vel: vec![Vec3::ZERO; model.nbody],
            mocap_pos: vec![Vec3::ZERO; model.nmocap()],
            actuator_length: None,
            actuator_velocity: None,
            actuator_force: None,
            tendon_length: None,
        }
    }

    /// Clears all externally applied forces.
    ///
    /// The control loop calls this at the start of every step so forces never
    /// accumulate across steps.
    pub fn zero_applied_forces(&mut self) {
        self.xfrc_applied.fill(0.0);
    }

    /// Accumulates a world-space point force on `body`.
    ///
    /// The force acts at `point`, so the lever arm from the body origin
    /// induces a torque alongside the linear component.
    pub fn apply_force_at_point(&mut self, body: usize, force: Vec3, point: Vec3) {
        if body >= self.xpos.len() {
            return;
        }
        let torque = (point - self.xpos[body]).cross(force);
        let base = body * 6;
        self.xfrc_applied[base] += force.x;
        self.xfrc_applied[base + 1] += force.y;
        self.xfrc_applied[base + 2] += force.z;
        self.xfrc_applied[base + 3] += torque.x;
        self.xfrc_applied[base + 4] += torque.y;
        self.xfrc_applied[base + 5] += torque.z;
    }

    /// Applied (force, torque) currently stored for `body`.
    pub fn applied_force(&self, body: usize) -> (Vec3, Vec3) {
        let base = body * 6;
        let f = &self.xfrc_applied[base..base + 6];
        (
            Vec3::new(f[0], f[1], f[2]),
            Vec3::new(f[3], f[4], f[5]),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_body_model() -> PhysicsModel {
        PhysicsModel {
            timestep: 0.002,
            nq: 3,
            nv: 3,
            nu: 2,
            nbody: 2,
            actuator_ranges: vec![None; 2],
            actuator_names: vec![String::new(); 2],
            body_names: vec!["world".into(), "ball".into()],
            body_roles: vec![None, None],
            body_mocap_id: vec![None, None],
            body_dof_adr: vec![0, 0],
            body_dof_count: vec![0, 3],
        }
    }

    #[test]
    fn test_point_force_induces_torque() {
        let model = two_body_model();
        let mut state = PhysicsState::new(&model);
        state.xpos[1] = Vec3::new(1.0, 0.0, 0.0);

        // Unit force along +y applied one unit ahead of the body origin on x:
        // torque should be +z with magnitude 1.
        state.apply_force_at_point(1, Vec3::Y, Vec3::new(2.0, 0.0, 0.0));
        let (force, torque) = state.applied_force(1);
        assert_eq!(force, Vec3::Y);
        assert_eq!(torque, Vec3::Z);

        // A second application accumulates within the step.
        state.apply_force_at_point(1, Vec3::Y, Vec3::new(2.0, 0.0, 0.0));
        let (force, _) = state.applied_force(1);
        assert_eq!(force, Vec3::new(0.0, 2.0, 0.0));

        state.zero_applied_forces();
        let (force, torque) = state.applied_force(1);
        assert_eq!(force, Vec3::ZERO);
        assert_eq!(torque, Vec3::ZERO);
    }

    #[test]
    fn test_out_of_range_body_ignored() {
        let model = two_body_model();
        let mut state = PhysicsState::new(&model);
        state.apply_force_at_point(7, Vec3::X, Vec3::ZERO);
        assert!(state.xfrc_applied.iter().all(|&v| v == 0.0));
    }
}
