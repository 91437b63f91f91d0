//! Interactive drag gestures applied to the simulation.

use glam::Vec3;
use rig_physics::{PhysicsModel, PhysicsState};

/// Spring constant pulling the picked body toward the pointer.
pub const DRAG_SPRING: f32 = 250.0;

/// A user drag gesture in flight.
///
/// Created when the input collaborator picks a body, destroyed when the
/// gesture ends. Positions are in engine world space; the collaborator owns
/// any viewer-frame conversion. The control loop only reads this.
#[derive(Debug, Clone, Copy)]
pub struct DragState {
    /// The picked body.
    pub body: usize,
    /// World-space point where the gesture grabbed the body.
    pub pick_point: Vec3,
    /// Current world-space pointer position.
    pub pointer: Vec3,
}

/// Converts an active drag into a spring force on the picked body.
///
/// Skipped when no drag is active or the target is not dynamic (mocap-only
/// bodies are perturbed by pose, not force; that path is handled in the
/// paused resolve). The force acts at the original pick point, so dragging
/// off-center twists the body.
pub fn apply_drag_force(drag: Option<&DragState>, model: &PhysicsModel, state: &mut PhysicsState) {
    let Some(drag) = drag else {
        return;
    };
    if drag.body >= model.nbody || !model.body_is_dynamic(drag.body) {
        return;
    }
    let force = (drag.pointer - drag.pick_point) * DRAG_SPRING;
    state.apply_force_at_point(drag.body, force, drag.pick_point);
}

/// Kinematic drag resolution used while the simulation is paused.
///
/// Mocap bodies follow the pointer directly; dynamic bodies are left alone
/// (no dynamics are running to respond to a force, and pose-warping them
/// would fight the integrator on resume).
pub fn apply_drag_offset(drag: Option<&DragState>, model: &PhysicsModel, state: &mut PhysicsState) {
    let Some(drag) = drag else {
        return;
    };
    if drag.body >= model.nbody {
        return;
    }
    if let Some(mid) = model.body_mocap_id[drag.body] {
        state.mocap_pos[mid] = drag.pointer;
    }
}
