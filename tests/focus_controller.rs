//! Focus controller scenarios driven through an in-memory arena.

use glam::Vec3;
use rstest::{fixture, rstest};
use soulslike::focus::{DisengageReason, FocusController, FocusState, FocusUpdate, Transition};
use soulslike::rotation::ViewRotation;
use soulslike::settings::FocusSettings;
use soulslike::targeting::{AcquisitionError, AgentId, ViewPoint};
use test_utils::{assert_vec3_near, ArenaWorld};

const FRAME: f32 = 1.0 / 60.0;

#[fixture]
fn arena() -> ArenaWorld {
    ArenaWorld::looking(Vec3::ZERO, Vec3::NEG_Z)
        .with_agent(1, Vec3::new(0.0, 0.0, -1000.0))
        .with_agent(2, Vec3::new(200.0, 0.0, -1500.0))
        .with_agent(3, Vec3::new(-300.0, 0.0, -2200.0))
        .with_agent(4, Vec3::new(0.0, 0.0, 1000.0))
        .with_wall(10, Vec3::new(0.0, 0.0, -1200.0), Vec3::new(400.0, 200.0, 20.0))
}

#[fixture]
fn controller() -> FocusController {
    FocusController::new(FocusSettings::default())
}

fn ids(controller: &FocusController) -> Vec<u64> {
    controller.candidates().iter().map(AgentId::into_inner).collect()
}

#[rstest]
fn engaging_collects_agents_ahead_only(arena: ArenaWorld, mut controller: FocusController) {
    let transition = controller.toggle(&arena, None);

    assert_eq!(transition, Transition::Engaged { target: AgentId(1) });
    assert_eq!(ids(&controller), vec![1, 2, 3]);
    assert_eq!(controller.active_index(), Some(0));
}

#[rstest]
fn viewer_is_excluded_from_candidates(mut controller: FocusController) {
    let arena = ArenaWorld::looking(Vec3::ZERO, Vec3::NEG_Z)
        .with_agent(1, Vec3::new(0.0, 0.0, -900.0))
        .with_agent(2, Vec3::new(0.0, 0.0, -1600.0));

    controller.toggle(&arena, Some(AgentId(1)));

    assert_eq!(ids(&controller), vec![2]);
}

#[rstest]
fn engaging_without_a_camera_is_refused(mut controller: FocusController) {
    let arena = ArenaWorld::blind().with_agent(1, Vec3::new(0.0, 0.0, -1000.0));

    let transition = controller.toggle(&arena, None);

    assert_eq!(transition, Transition::Refused(AcquisitionError::NoViewPoint));
    assert_eq!(controller.state(), FocusState::Disengaged);
    assert!(controller.candidates().is_empty());
}

#[rstest]
fn cycling_forward_wraps_through_reacquisition(
    arena: ArenaWorld,
    mut controller: FocusController,
) {
    controller.toggle(&arena, None);

    assert_eq!(
        controller.cycle(&arena, None, 1),
        Transition::Retargeted { target: AgentId(2) }
    );
    assert_eq!(
        controller.cycle(&arena, None, 1),
        Transition::Retargeted { target: AgentId(3) }
    );
    assert_eq!(
        controller.cycle(&arena, None, 1),
        Transition::Retargeted { target: AgentId(1) }
    );
    assert_eq!(controller.active_index(), Some(0));
}

#[rstest]
fn cycling_back_from_first_wraps_to_last(arena: ArenaWorld, mut controller: FocusController) {
    controller.toggle(&arena, None);

    let transition = controller.cycle_by_scroll(&arena, None, -1.0);

    assert_eq!(transition, Transition::Retargeted { target: AgentId(3) });
    assert_eq!(controller.active_index(), Some(2));
}

#[rstest]
fn reacquisition_sees_newcomers(mut arena: ArenaWorld, mut controller: FocusController) {
    controller.toggle(&arena, None);
    controller.cycle(&arena, None, 2);
    arena = arena.with_agent(5, Vec3::new(0.0, 0.0, -800.0));

    let transition = controller.cycle(&arena, None, 1);

    assert_eq!(transition, Transition::Retargeted { target: AgentId(5) });
    assert_eq!(ids(&controller), vec![5, 1, 2, 3]);
}

#[rstest]
fn failed_reacquisition_drops_focus(mut arena: ArenaWorld, mut controller: FocusController) {
    controller.toggle(&arena, None);
    controller.cycle(&arena, None, 2);
    for id in 1..=3 {
        arena.remove_agent(id);
    }

    let transition = controller.cycle(&arena, None, 1);

    assert_eq!(
        transition,
        Transition::Disengaged(DisengageReason::ReacquireFailed)
    );
    assert_eq!(controller.state(), FocusState::Disengaged);
    assert!(controller.candidates().is_empty());
}

#[rstest]
fn target_leaving_range_drops_focus_without_turning(
    mut arena: ArenaWorld,
    mut controller: FocusController,
) {
    controller.toggle(&arena, None);
    arena.move_agent(1, Vec3::new(0.0, 0.0, -4000.0));
    let mut aim = ViewRotation::new(0.3, 0.0, 0.0);

    let update = controller.update(&arena, Vec3::ZERO, &mut aim, FRAME);

    assert_eq!(
        update,
        FocusUpdate::Released(DisengageReason::OutOfRange { distance: 4000.0 })
    );
    assert_eq!(aim, ViewRotation::new(0.3, 0.0, 0.0));
    assert!(controller.candidates().is_empty());
}

#[rstest]
fn removed_target_drops_focus(mut arena: ArenaWorld, mut controller: FocusController) {
    controller.toggle(&arena, None);
    arena.remove_agent(1);
    let mut aim = ViewRotation::IDENTITY;

    let update = controller.update(&arena, Vec3::ZERO, &mut aim, FRAME);

    assert_eq!(update, FocusUpdate::Released(DisengageReason::TargetLost));
    assert!(!controller.is_engaged());
}

#[rstest]
fn missing_camera_skips_the_frame(mut arena: ArenaWorld, mut controller: FocusController) {
    controller.toggle(&arena, None);
    arena.set_view(None);
    let mut aim = ViewRotation::new(0.1, 0.2, 0.0);

    let update = controller.update(&arena, Vec3::ZERO, &mut aim, FRAME);

    assert_eq!(update, FocusUpdate::NoViewPoint);
    assert!(controller.is_engaged());
    assert_eq!(aim, ViewRotation::new(0.1, 0.2, 0.0));
}

#[rstest]
fn aim_converges_on_the_target(arena: ArenaWorld, mut controller: FocusController) {
    controller.toggle(&arena, None);
    controller.cycle(&arena, None, 1);
    let desired = ViewRotation::look_at(Vec3::ZERO, Vec3::new(200.0, 0.0, -1500.0));
    let mut aim = ViewRotation::IDENTITY;
    let mut previous = aim.angular_distance(desired);

    for _ in 0..120 {
        let update = controller.update(&arena, Vec3::ZERO, &mut aim, FRAME);
        assert!(matches!(update, FocusUpdate::Tracking { target: AgentId(2), .. }));
        let distance = aim.angular_distance(desired);
        assert!(distance <= previous + 1e-6, "{distance} > {previous}");
        previous = distance;
    }

    assert!(previous < 1e-3, "aim still {previous} rad away");
    assert_vec3_near(aim.forward(), desired.forward(), 1e-3);
}

#[rstest]
fn height_offset_raises_the_aim(arena: ArenaWorld) {
    let mut low = FocusController::new(FocusSettings::default());
    let mut high = FocusController::new(FocusSettings {
        target_height_offset: 150.0,
        ..FocusSettings::default()
    });
    low.toggle(&arena, None);
    high.toggle(&arena, None);
    let mut low_aim = ViewRotation::IDENTITY;
    let mut high_aim = ViewRotation::IDENTITY;

    for _ in 0..60 {
        low.update(&arena, Vec3::ZERO, &mut low_aim, FRAME);
        high.update(&arena, Vec3::ZERO, &mut high_aim, FRAME);
    }

    assert!(high_aim.pitch > low_aim.pitch);
}

#[rstest]
fn camera_direction_steers_acquisition(mut controller: FocusController) {
    let mut arena = ArenaWorld::looking(Vec3::ZERO, Vec3::NEG_Z)
        .with_agent(1, Vec3::new(0.0, 0.0, -1000.0))
        .with_agent(2, Vec3::new(1500.0, 0.0, 0.0));
    arena.set_view(Some(ViewPoint {
        position: Vec3::ZERO,
        forward: Vec3::X,
    }));

    controller.toggle(&arena, None);

    assert_eq!(controller.active_target(), Some(AgentId(2)));
}
