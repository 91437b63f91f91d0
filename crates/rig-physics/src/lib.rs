//! # Rig Physics
//!
//! Data model and stepper seam for an articulated-body simulation: the static
//! scene description, the mutable per-step state arrays, and the `Engine`
//! trait the control loop drives. The engine's numerical method is opaque to
//! everything above this crate.

pub mod engine;
pub mod model;
pub mod state;

pub use engine::*;
pub use model::*;
pub use state::*;
