//! # Rig Control
//!
//! The simulation-render synchronization loop and the policy-control
//! pipeline: fixed-step catch-up against wall-clock frame timing, actuator
//! noise, interactive drag forces, observation assembly, and action
//! application. Rendering and input handling live outside this crate and
//! talk to it through narrow data types (`BodyTransform`, `DragState`).

pub mod action;
pub mod driver;
pub mod drag;
pub mod noise;
pub mod observation;
pub mod params;

pub use action::*;
pub use driver::*;
pub use drag::*;
pub use noise::*;
pub use observation::*;
pub use params::*;
