//! Control-loop parameters for runtime tuning.

/// Typed settings the hosting shell mirrors from its UI or keybindings.
///
/// Passed into `ControlLoop::advance` every frame; the loop itself keeps no
/// copy, so toggles take effect on the next frame.
#[derive(Debug, Clone, Copy)]
pub struct ControlParams {
    /// When set, dynamics never advance; drags resolve kinematically.
    pub paused: bool,
    /// Correlation time of the actuator noise process, seconds.
    pub ctrl_noise_rate: f32,
    /// Stationary standard deviation of the actuator noise. `<= 0` disables.
    pub ctrl_noise_std: f32,
    /// Whether the learned policy drives the actuators.
    pub policy_control: bool,
    /// Wall-clock interval between policy invocations, milliseconds.
    pub policy_interval_ms: f32,
}

impl Default for ControlParams {
    fn default() -> Self {
        Self {
            paused: false,
            ctrl_noise_rate: 0.1,
            ctrl_noise_std: 0.0,
            policy_control: false,
            policy_interval_ms: 100.0,
        }
    }
}
