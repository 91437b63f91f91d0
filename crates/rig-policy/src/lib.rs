//! # Rig Policy
//!
//! Learned-policy inference for the control loop: a small actor network, its
//! checkpoint persistence, and an asynchronous runtime that implements the
//! control loop's `PolicySource` seam. Nothing in here knows about physics;
//! observations and actions are plain numeric vectors.

pub mod checkpoint;
pub mod error;
pub mod network;
pub mod runtime;

pub use checkpoint::*;
pub use error::*;
pub use network::*;
pub use runtime::*;
