//! Static description of a loaded articulated scene.

/// Role tag attached to a body when the scene is loaded.
///
/// Roles drive which bodies contribute position/velocity features to the
/// observation vector. Tagging happens once at load time from the body name
/// tables, so the per-frame path never touches strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyRole {
    /// A goal marker the policy is steering toward (`target` in the name).
    Target,
    /// A manipulator tip (`grasp` or `end_effector` in the name).
    Effector,
}

impl BodyRole {
    /// Derives a role from a decoded body name.
    ///
    /// Case-sensitive containment match, same predicate the trained policies
    /// were built against.
    pub fn from_name(name: &str) -> Option<Self> {
        if name.contains("target") {
            Some(Self::Target)
        } else if name.contains("grasp") || name.contains("end_effector") {
            Some(Self::Effector)
        } else {
            None
        }
    }
}

/// Immutable description of the articulated system for one loaded scene.
///
/// Owned by whoever loaded the scene; all control-loop components take it by
/// shared reference. Counts and addressing tables follow the flat-array
/// convention of the underlying engine.
#[derive(Debug, Clone)]
pub struct PhysicsModel {
    /// Fixed integration timestep in seconds.
    pub timestep: f32,
    /// Generalized position dimension.
    pub nq: usize,
    /// Generalized velocity dimension.
    pub nv: usize,
    /// Actuator count. `PhysicsState::ctrl` always has this length.
    pub nu: usize,
    /// Body count, including the world body at index 0.
    pub nbody: usize,

    /// Per-actuator control range `[min, max]`, `None` when unbounded.
    pub actuator_ranges: Vec<Option<[f32; 2]>>,
    /// Decoded actuator names, one per actuator.
    pub actuator_names: Vec<String>,

    /// Decoded body names, one per body.
    pub body_names: Vec<String>,
    /// Role tags computed from `body_names` at load time.
    pub body_roles: Vec<Option<BodyRole>>,
    /// Index into `PhysicsState::mocap_pos` for kinematic bodies.
    pub body_mocap_id: Vec<Option<usize>>,
    /// First DOF owned by each body.
    pub body_dof_adr: Vec<usize>,
    /// Number of DOFs owned by each body (0 for the world and mocap bodies).
    pub body_dof_count: Vec<usize>,
}

impl PhysicsModel {
    /// Recomputes `body_roles` from the current name table.
    ///
    /// Call once after filling in `body_names`.
    pub fn tag_body_roles(&mut self) {
        self.body_roles = self
            .body_names
            .iter()
            .map(|name| BodyRole::from_name(name))
            .collect();
        let tagged = self.body_roles.iter().flatten().count();
        log::debug!("tagged {} of {} bodies with roles", tagged, self.nbody);
    }

    /// Number of mocap slots referenced by the body tables.
    pub fn nmocap(&self) -> usize {
        self.body_mocap_id
            .iter()
            .flatten()
            .map(|id| id + 1)
            .max()
            .unwrap_or(0)
    }

    /// Whether a body participates in dynamics (owns at least one DOF).
    pub fn body_is_dynamic(&self, body: usize) -> bool {
        self.body_dof_count.get(body).is_some_and(|&n| n > 0)
    }

    /// Indices of role-tagged bodies, in body order.
    pub fn role_bodies(&self) -> impl Iterator<Item = usize> + '_ {
        self.body_roles
            .iter()
            .enumerate()
            .filter_map(|(i, role)| role.map(|_| i))
    }

    /// Control range of actuator `i`, if one exists and is non-degenerate.
    pub fn actuator_range(&self, i: usize) -> Option<[f32; 2]> {
        match self.actuator_ranges.get(i).copied().flatten() {
            Some([lo, hi]) if hi > lo => Some([lo, hi]),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_from_name() {
        assert_eq!(BodyRole::from_name("goal_target"), Some(BodyRole::Target));
        assert_eq!(BodyRole::from_name("grasp_site"), Some(BodyRole::Effector));
        assert_eq!(
            BodyRole::from_name("arm_end_effector"),
            Some(BodyRole::Effector)
        );
        assert_eq!(BodyRole::from_name("torso"), None);
        // Containment is case-sensitive.
        assert_eq!(BodyRole::from_name("TARGET"), None);
    }

    #[test]
    fn test_degenerate_range_is_invalid() {
        let model = PhysicsModel {
            timestep: 0.002,
            nq: 0,
            nv: 0,
            nu: 3,
            nbody: 1,
            actuator_ranges: vec![Some([-1.0, 1.0]), Some([2.0, 2.0]), None],
            actuator_names: vec![String::new(); 3],
            body_names: vec!["world".into()],
            body_roles: vec![None],
            body_mocap_id: vec![None],
            body_dof_adr: vec![0],
            body_dof_count: vec![0],
        };

        assert_eq!(model.actuator_range(0), Some([-1.0, 1.0]));
        assert_eq!(model.actuator_range(1), None);
        assert_eq!(model.actuator_range(2), None);
        assert_eq!(model.actuator_range(99), None);
    }
}
