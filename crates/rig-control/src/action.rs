//! Writing policy actions into the control state.

/// Raw policy output, one value per network output unit, nominally `[-1, 1]`.
pub type Action = Vec<f32>;

/// Clips, rescales, and writes an action vector into the control state.
///
/// Each value is clipped to `[-1, 1]` and mapped into the actuator's control
/// range when a valid one exists; otherwise the clipped value is written as
/// is. Actuators past the end of the action vector keep their previous
/// command (residual noise, manual setting). Empty actions are a logged
/// no-op, never an error.
pub fn apply_action(action: &[f32], ctrl: &mut [f32], ranges: &[Option<[f32; 2]>]) {
    if action.is_empty() {
        log::debug!("empty action vector, controls unchanged");
        return;
    }
    let n = action.len().min(ctrl.len());
    for i in 0..n {
        let a = action[i].clamp(-1.0, 1.0);
        ctrl[i] = match ranges.get(i).copied().flatten() {
            Some([lo, hi]) if hi > lo => lo + (a + 1.0) * 0.5 * (hi - lo),
            _ => a,
        };
    }
}
