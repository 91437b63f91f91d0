//! Built-in demo scene: a three-link point-mass rig chasing a mocap target.
//!
//! Stands in for a full scene loader so the shell runs out of the box. Body
//! naming follows the conventions the role tagger expects, with the tip named
//! as an end effector and the goal marker as a target.

use glam::Vec3;
use rand::Rng;
use rig_physics::{PhysicsModel, PhysicsState};

const TIMESTEP: f32 = 0.002;
const SPAWN_JITTER: f32 = 0.2;

/// Builds the demo model and a matching initial state.
pub fn build_demo_scene() -> (PhysicsModel, PhysicsState) {
    let body_names: Vec<String> = [
        "world",
        "link_base",
        "link_mid",
        "arm_end_effector",
        "goal_target",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();

    let mut model = PhysicsModel {
        timestep: TIMESTEP,
        nq: 9,
        nv: 9,
        nu: 3,
        nbody: 5,
        actuator_ranges: vec![Some([-2.0, 2.0]); 3],
        actuator_names: vec![
            "base_drive".into(),
            "mid_drive".into(),
            "tip_drive".into(),
        ],
        body_names,
        body_roles: Vec::new(),
        body_mocap_id: vec![None, None, None, None, Some(0)],
        body_dof_adr: vec![0, 0, 3, 6, 0],
        body_dof_count: vec![0, 3, 3, 3, 0],
    };
    model.tag_body_roles();

    let mut state = PhysicsState::new(&model);

    // Links start stacked along x with a little jitter so the first frames
    // are not perfectly symmetric.
    let mut rng = rand::rng();
    for (link, base) in [(0usize, 0.5f32), (1, 1.0), (2, 1.5)] {
        let adr = link * 3;
        state.qpos[adr] = base + rng.random_range(-SPAWN_JITTER..SPAWN_JITTER);
        state.qpos[adr + 1] = rng.random_range(-SPAWN_JITTER..SPAWN_JITTER);
        state.qpos[adr + 2] = 0.0;
    }
    state.mocap_pos[0] = Vec3::new(-1.0, 1.0, 0.0);

    log::info!(
        "demo scene: {} bodies, {} dofs, {} actuators",
        model.nbody,
        model.nv,
        model.nu
    );

    (model, state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rig_physics::BodyRole;

    #[test]
    fn demo_scene_is_consistent() {
        let (model, state) = build_demo_scene();

        assert_eq!(state.qpos.len(), model.nq);
        assert_eq!(state.qvel.len(), model.nv);
        assert_eq!(state.ctrl.len(), model.nu);
        assert_eq!(state.mocap_pos.len(), 1);

        assert_eq!(model.body_roles[3], Some(BodyRole::Effector));
        assert_eq!(model.body_roles[4], Some(BodyRole::Target));
        assert!(model.body_is_dynamic(3));
        assert!(!model.body_is_dynamic(4));
    }

    #[test]
    fn demo_actuators_have_valid_ranges() {
        let (model, _) = build_demo_scene();
        for i in 0..model.nu {
            assert_eq!(model.actuator_range(i), Some([-2.0, 2.0]));
        }
    }
}
