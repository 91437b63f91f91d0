//! Observation assembly for the policy.

use rig_physics::{PhysicsModel, PhysicsState};

/// Feature vector handed to the policy. Rebuilt every invocation cycle.
pub type Observation = Vec<f32>;

/// Named feature segments of the observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment {
    JointPositions,
    JointVelocities,
    ActuatorLengths,
    ActuatorVelocities,
    ActuatorForces,
    BodyPositions,
    BodyVelocities,
}

/// Which segments fill the vector, and in what order, when the natural
/// feature count differs from the policy's input width.
///
/// The order is a contract with the trained checkpoint, not a structural
/// property, so it is configuration rather than a constant.
#[derive(Debug, Clone)]
pub struct ObservationConfig {
    pub fit_priority: Vec<Segment>,
}

impl Default for ObservationConfig {
    fn default() -> Self {
        Self {
            fit_priority: vec![
                Segment::JointPositions,
                Segment::JointVelocities,
                Segment::ActuatorLengths,
                Segment::BodyPositions,
            ],
        }
    }
}

/// Assembles fixed-width feature vectors from physics state.
///
/// Best-effort by design: absent optional arrays degrade to a tendon-length
/// proxy or zero fill of the correct count, and width mismatches are resolved
/// by truncation/padding. Never fails.
#[derive(Debug, Default)]
pub struct ObservationBuilder {
    config: ObservationConfig,
}

impl ObservationBuilder {
    pub fn new(config: ObservationConfig) -> Self {
        Self { config }
    }

    /// Builds an observation, resized to `width` when one is given.
    ///
    /// Natural segment order: joint positions, joint velocities, actuator
    /// lengths, actuator velocities, actuator forces, then positions and
    /// velocities of role-tagged bodies. When `width` disagrees with the
    /// natural length, the vector is refilled from `fit_priority` segments
    /// instead, truncating the overflowing segment and zero-filling the tail.
    pub fn build(
        &self,
        model: &PhysicsModel,
        state: &PhysicsState,
        width: Option<usize>,
    ) -> Observation {
        const NATURAL_ORDER: [Segment; 7] = [
            Segment::JointPositions,
            Segment::JointVelocities,
            Segment::ActuatorLengths,
            Segment::ActuatorVelocities,
            Segment::ActuatorForces,
            Segment::BodyPositions,
            Segment::BodyVelocities,
        ];

        let natural_len: usize = NATURAL_ORDER
            .iter()
            .map(|&s| self.segment_len(s, model))
            .sum();

        let Some(width) = width else {
            return self.concat(&NATURAL_ORDER, model, state, natural_len);
        };

        if width == natural_len {
            return self.concat(&NATURAL_ORDER, model, state, natural_len);
        }

        log::trace!(
            "observation natural length {} != policy width {}, refitting",
            natural_len,
            width
        );
        let mut out = Vec::with_capacity(width);
        'fill: for &seg in &self.config.fit_priority {
            for value in self.segment(seg, model, state) {
                if out.len() == width {
                    break 'fill;
                }
                out.push(value);
            }
        }
        out.resize(width, 0.0);
        out
    }

    fn concat(
        &self,
        order: &[Segment],
        model: &PhysicsModel,
        state: &PhysicsState,
        len: usize,
    ) -> Observation {
        let mut out = Vec::with_capacity(len);
        for &seg in order {
            out.extend(self.segment(seg, model, state));
        }
        out
    }

    fn segment_len(&self, seg: Segment, model: &PhysicsModel) -> usize {
        match seg {
            Segment::JointPositions => model.nq,
            Segment::JointVelocities => model.nv,
            Segment::ActuatorLengths
            | Segment::ActuatorVelocities
            | Segment::ActuatorForces => model.nu,
            Segment::BodyPositions | Segment::BodyVelocities => {
                model.role_bodies().count() * 3
            }
        }
    }

    fn segment(&self, seg: Segment, model: &PhysicsModel, state: &PhysicsState) -> Vec<f32> {
        match seg {
            Segment::JointPositions => state.qpos.clone(),
            Segment::JointVelocities => state.qvel.clone(),
            Segment::ActuatorLengths => match &state.actuator_length {
                Some(lengths) => sized(lengths, model.nu),
                // Tendon lengths stand in when the engine reports none.
                None => match &state.tendon_length {
                    Some(tendons) => sized(tendons, model.nu),
                    None => vec![0.0; model.nu],
                },
            },
            Segment::ActuatorVelocities => optional(&state.actuator_velocity, model.nu),
            Segment::ActuatorForces => optional(&state.actuator_force, model.nu),
            Segment::BodyPositions => model
                .role_bodies()
                .flat_map(|b| state.xpos[b].to_array())
                .collect(),
            Segment::BodyVelocities => model
                .role_bodies()
                .flat_map(|b| state.body_lin_vel[b].to_array())
                .collect(),
        }
    }
}

fn sized(values: &[f32], n: usize) -> Vec<f32> {
    let mut out = values.to_vec();
    out.resize(n, 0.0);
    out
}

fn optional(values: &Option<Vec<f32>>, n: usize) -> Vec<f32> {
    match values {
        Some(v) => sized(v, n),
        None => vec![0.0; n],
    }
}
