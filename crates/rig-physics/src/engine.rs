//! The opaque stepper seam.
//!
//! The control loop only ever calls `step` and `forward`; which numerical
//! method sits behind them is not its concern. `PointMassEngine` is a
//! deliberately simple reference stepper so the demo shell and integration
//! tests have real dynamics to drive.

use glam::Vec3;

use crate::model::PhysicsModel;
use crate::state::PhysicsState;

/// A physics engine consumed as an opaque stepper.
pub trait Engine {
    /// Advances dynamics by exactly one `model.timestep`.
    fn step(&mut self, model: &PhysicsModel, state: &mut PhysicsState);

    /// Recomputes dependent quantities (body poses, velocities) from the
    /// current generalized state without integrating.
    fn forward(&mut self, model: &PhysicsModel, state: &mut PhysicsState);
}

/// Semi-implicit Euler stepper treating every dynamic body as a point mass.
///
/// Actuator `i` applies a force along DOF `i`; external point forces from
/// `xfrc_applied` act on the owning body's translational DOFs. Point masses
/// carry no orientation, so applied torques are dropped.
#[derive(Debug, Clone, Copy)]
pub struct PointMassEngine {
    /// Mass per body, uniform for simplicity.
    pub mass: f32,
    /// Viscous damping coefficient.
    pub damping: f32,
}

impl Default for PointMassEngine {
    fn default() -> Self {
        Self {
            mass: 1.0,
            damping: 0.5,
        }
    }
}

impl PointMassEngine {
    fn sync_bodies(model: &PhysicsModel, state: &mut PhysicsState) {
        for body in 0..model.nbody {
            if let Some(mid) = model.body_mocap_id[body] {
                state.xpos[body] = state.mocap_pos[mid];
                state.body_lin_vel[body] = Vec3::ZERO;
                continue;
            }
            let adr = model.body_dof_adr[body];
            if model.body_dof_count[body] >= 3 {
                state.xpos[body] =
                    Vec3::new(state.qpos[adr], state.qpos[adr + 1], state.qpos[adr + 2]);
                state.body_lin_vel[body] =
                    Vec3::new(state.qvel[adr], state.qvel[adr + 1], state.qvel[adr + 2]);
            }
        }
    }
}

impl Engine for PointMassEngine {
    fn step(&mut self, model: &PhysicsModel, state: &mut PhysicsState) {
        let dt = model.timestep;
        for body in 0..model.nbody {
            if model.body_dof_count[body] < 3 || model.body_mocap_id[body].is_some() {
                continue;
            }
            let adr = model.body_dof_adr[body];
            let (ext, _torque) = state.applied_force(body);
            for axis in 0..3 {
                let dof = adr + axis;
                let mut force = ext[axis];
                if dof < model.nu {
                    force += state.ctrl[dof];
                }
                let acc = (force - self.damping * state.qvel[dof]) / self.mass;
                state.qvel[dof] += acc * dt;
                state.qpos[dof] += state.qvel[dof] * dt;
            }
        }
        Self::sync_bodies(model, state);
    }

    fn forward(&mut self, model: &PhysicsModel, state: &mut PhysicsState) {
        Self::sync_bodies(model, state);
    }
}
