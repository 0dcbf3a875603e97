//! Bevy adapter for the focus controller.
//!
//! `FocusPlugin` keeps the [`FocusController`] in the [`Focus`] resource and
//! turns the ECS world into the collaborators the controller expects: the
//! player's [`ControlRotation`] is the externally owned aim, the
//! [`FocusCamera`] transform is the view point and every entity with a
//! [`Collider`] takes part in sweeps. Input arrives as observer events
//! ([`ToggleFocus`], [`CycleFocusTarget`], [`LookInput`], [`MoveInput`]) and
//! every focus change is announced with [`FocusChanged`].

use bevy::math::EulerRot;
use bevy::prelude::*;
use log::debug;

use crate::focus::{DisengageReason, FocusController, FocusUpdate, FocusWorld, Transition};
use crate::movement::{apply_look, facing_yaw, movement_direction};
use crate::rotation::ViewRotation;
use crate::settings::{CharacterSettings, GameSettings};
use crate::sweep::{Body, BodySet};
use crate::targeting::{AgentId, BoxSweep, CollisionCategory, SpatialQuery, SweepHit, ViewPoint};

/// Marker for the controlled character.
#[derive(Component, Reflect, Default, Debug, Clone, Copy, PartialEq, Eq)]
#[reflect(Component, Default)]
pub struct PlayerCharacter;

/// Marker for the camera whose transform is the focus view point.
#[derive(Component, Reflect, Default, Debug, Clone, Copy, PartialEq, Eq)]
#[reflect(Component, Default)]
pub struct FocusCamera;

/// The controller's aim, owned by the player entity.
///
/// Free look writes it while focus is disengaged; the focus update writes
/// it while engaged.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Deref, DerefMut)]
pub struct ControlRotation(pub ViewRotation);

/// Movement input accumulated since the last simulation step.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Deref, DerefMut)]
pub struct MoveIntent(pub Vec2);

/// Axis-aligned collision volume centred on the entity's translation.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Collider {
    /// Half extents of the box.
    pub half_extents: Vec3,
    /// Collision channel.
    pub category: CollisionCategory,
}

impl Collider {
    /// Collider for a focusable character.
    #[must_use]
    pub const fn agent(half_extents: Vec3) -> Self {
        Self {
            half_extents,
            category: CollisionCategory::Agent,
        }
    }

    /// Collider for level geometry.
    #[must_use]
    pub const fn world_static(half_extents: Vec3) -> Self {
        Self {
            half_extents,
            category: CollisionCategory::WorldStatic,
        }
    }
}

/// Resource holding the focus state machine.
#[derive(Resource, Debug, Default, Deref, DerefMut)]
pub struct Focus(pub FocusController);

/// Toggles focus on or off.
#[derive(Event, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ToggleFocus;

/// Cycles the focus target in the direction of `scroll`.
#[derive(Event, Debug, Clone, Copy, Default, PartialEq)]
pub struct CycleFocusTarget {
    /// Signed scroll amount; one step per event regardless of magnitude.
    pub scroll: f32,
}

/// Free-look input, ignored while focus is engaged.
#[derive(Event, Debug, Clone, Copy, Default, PartialEq)]
pub struct LookInput {
    /// Screen-space look delta.
    pub delta: Vec2,
}

/// Movement input relative to the camera heading.
#[derive(Event, Debug, Clone, Copy, Default, PartialEq)]
pub struct MoveInput {
    /// `y` forward, `x` right.
    pub axis: Vec2,
}

/// Announces that the focus target changed.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct FocusChanged {
    /// The new target, or `None` once focus is dropped.
    pub target: Option<AgentId>,
    /// Why focus was dropped, when it was.
    pub released: Option<DisengageReason>,
}

/// Ordering of the focus systems within `Update`.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FocusSystems {
    /// Device input is turned into focus events.
    Input,
    /// Movement and the focus camera update.
    Simulate,
    /// The camera follows the player and the aim.
    Rig,
}

/// Identifier used for `entity` in sweeps and candidate lists.
#[must_use]
pub const fn agent_id(entity: Entity) -> AgentId {
    AgentId(entity.to_bits())
}

/// Snapshot of the ECS world seen through the focus collaborator traits.
#[derive(Debug, Clone, Default)]
pub struct EcsFocusWorld {
    bodies: BodySet,
    view: Option<ViewPoint>,
}

impl EcsFocusWorld {
    /// Captures colliders and the camera view point.
    pub fn capture<'a>(
        bodies: impl IntoIterator<Item = (Entity, &'a Transform, &'a Collider)>,
        camera: Option<&Transform>,
    ) -> Self {
        let body_set = bodies
            .into_iter()
            .map(|(entity, transform, collider)| Body {
                id: agent_id(entity),
                center: transform.translation,
                half_extents: collider.half_extents,
                category: collider.category,
            })
            .collect();
        let view = camera.map(|transform| ViewPoint {
            position: transform.translation,
            forward: transform.forward().as_vec3(),
        });
        Self {
            bodies: body_set,
            view,
        }
    }
}

impl SpatialQuery for EcsFocusWorld {
    fn sweep_box(&self, sweep: &BoxSweep) -> Vec<SweepHit> {
        self.bodies.sweep_box(sweep)
    }
}

impl FocusWorld for EcsFocusWorld {
    fn view_point(&self) -> Option<ViewPoint> {
        self.view
    }

    fn agent_position(&self, agent: AgentId) -> Option<Vec3> {
        self.bodies.get(agent).map(|body| body.center)
    }
}

type BodyQuery<'w, 's> = Query<'w, 's, (Entity, &'static Transform, &'static Collider)>;
type CameraQuery<'w, 's> = Query<'w, 's, &'static Transform, With<FocusCamera>>;
type PlayerQuery<'w, 's> = Query<'w, 's, Entity, With<PlayerCharacter>>;

/// Components for a controllable player at `position`.
pub fn player(position: Vec3, half_extents: Vec3) -> impl Bundle {
    (
        PlayerCharacter,
        ControlRotation::default(),
        MoveIntent::default(),
        Transform::from_translation(position),
        Collider::agent(half_extents),
        Name::new("Player"),
    )
}

/// Components for a focusable non-player character at `position`.
pub fn focusable_agent(position: Vec3, half_extents: Vec3) -> impl Bundle {
    (
        Transform::from_translation(position),
        Collider::agent(half_extents),
    )
}

/// Camera transform for a spring arm of `settings.arm_length` behind the
/// pivot above `anchor`, looking along `aim`.
#[must_use]
pub fn rig_transform(anchor: Vec3, aim: ViewRotation, settings: &CharacterSettings) -> Transform {
    let pivot = anchor + Vec3::Y * settings.pivot_height;
    Transform::from_translation(pivot - aim.forward() * settings.arm_length)
        .with_rotation(aim.to_quat())
}

/// Installs `settings` as the focus and character tuning.
///
/// Call before adding [`FocusPlugin`]; the plugin keeps existing resources.
pub fn insert_settings(app: &mut App, settings: &GameSettings) {
    app.insert_resource(Focus(FocusController::new(settings.focus.clone())));
    app.insert_resource(settings.character.clone());
}

fn announce(commands: &mut Commands, transition: Transition) {
    match transition {
        Transition::Engaged { target } | Transition::Retargeted { target } => {
            commands.trigger(FocusChanged {
                target: Some(target),
                released: None,
            });
        }
        Transition::Disengaged(reason) => {
            commands.trigger(FocusChanged {
                target: None,
                released: Some(reason),
            });
        }
        Transition::Refused(_) | Transition::Unchanged => {}
    }
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "Observer systems must accept On<T> by value."
)]
fn on_toggle_focus(
    _event: On<ToggleFocus>,
    mut focus: ResMut<Focus>,
    bodies: BodyQuery,
    cameras: CameraQuery,
    players: PlayerQuery,
    mut commands: Commands,
) {
    let world = EcsFocusWorld::capture(bodies.iter(), cameras.single().ok());
    let viewer = players.single().ok().map(agent_id);
    let transition = focus.toggle(&world, viewer);
    announce(&mut commands, transition);
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "Observer systems must accept On<T> by value."
)]
fn on_cycle_focus_target(
    event: On<CycleFocusTarget>,
    mut focus: ResMut<Focus>,
    bodies: BodyQuery,
    cameras: CameraQuery,
    players: PlayerQuery,
    mut commands: Commands,
) {
    if !focus.is_engaged() {
        return;
    }
    let world = EcsFocusWorld::capture(bodies.iter(), cameras.single().ok());
    let viewer = players.single().ok().map(agent_id);
    let transition = focus.cycle_by_scroll(&world, viewer, event.event().scroll);
    announce(&mut commands, transition);
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "Observer systems must accept On<T> and Res<T> by value."
)]
fn on_look_input(
    event: On<LookInput>,
    focus: Res<Focus>,
    settings: Res<CharacterSettings>,
    mut players: Query<&mut ControlRotation, With<PlayerCharacter>>,
) {
    let Ok(mut aim) = players.single_mut() else {
        return;
    };
    apply_look(
        &mut aim.0,
        event.event().delta,
        &settings,
        focus.accepts_look_input(),
    );
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "Observer systems must accept On<T> by value."
)]
fn on_move_input(event: On<MoveInput>, mut players: Query<&mut MoveIntent, With<PlayerCharacter>>) {
    let axis = event.event().axis;
    if !axis.is_finite() {
        return;
    }
    for mut intent in &mut players {
        intent.0 += axis;
    }
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "Observer systems must accept On<T> by value."
)]
fn log_focus_changed(event: On<FocusChanged>) {
    let changed = event.event();
    match (changed.target, changed.released) {
        (Some(target), _) => debug!("focus target is now {target:?}"),
        (None, Some(reason)) => debug!("focus released: {reason:?}"),
        (None, None) => debug!("focus cleared"),
    }
}

/// Moves the player along its intent and turns the body per the focus
/// orientation mode.
#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy systems require parameters by value, not by reference."
)]
pub fn character_movement_system(
    time: Res<Time>,
    focus: Res<Focus>,
    settings: Res<CharacterSettings>,
    mut players: Query<(&mut Transform, &mut MoveIntent, &ControlRotation), With<PlayerCharacter>>,
) {
    let delta = time.delta_secs();
    let mode = focus.orientation_mode();
    let max_turn = settings.rotation_rate_radians() * delta;

    for (mut transform, mut intent, aim) in &mut players {
        let direction = movement_direction(aim.0, intent.0);
        intent.0 = Vec2::ZERO;

        transform.translation += direction * settings.move_speed * delta;
        let (current_yaw, _, _) = transform.rotation.to_euler(EulerRot::YXZ);
        let yaw = facing_yaw(mode, current_yaw, aim.0, direction, max_turn);
        transform.rotation = Quat::from_rotation_y(yaw);
    }
}

/// Runs the focus camera assist for the current frame.
#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy systems require parameters by value, not by reference."
)]
pub fn update_focus_system(
    time: Res<Time>,
    mut focus: ResMut<Focus>,
    bodies: BodyQuery,
    cameras: CameraQuery,
    mut players: Query<(&Transform, &mut ControlRotation), With<PlayerCharacter>>,
    mut commands: Commands,
) {
    if !focus.is_engaged() {
        return;
    }
    let Ok((transform, mut aim)) = players.single_mut() else {
        return;
    };

    let world = EcsFocusWorld::capture(bodies.iter(), cameras.single().ok());
    let update = focus.update(&world, transform.translation, &mut aim.0, time.delta_secs());
    if let FocusUpdate::Released(reason) = update {
        commands.trigger(FocusChanged {
            target: None,
            released: Some(reason),
        });
    }
}

/// Places the focus camera on its arm behind the player.
#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy systems require parameters by value, not by reference."
)]
pub fn camera_rig_system(
    settings: Res<CharacterSettings>,
    players: Query<(&Transform, &ControlRotation), (With<PlayerCharacter>, Without<FocusCamera>)>,
    mut cameras: Query<&mut Transform, (With<FocusCamera>, Without<PlayerCharacter>)>,
) {
    let Ok((player, aim)) = players.single() else {
        return;
    };
    let Ok(mut camera) = cameras.single_mut() else {
        return;
    };
    *camera = rig_transform(player.translation, aim.0, &settings);
}

/// Plugin wiring focus, movement and the camera rig into the schedule.
///
/// # Examples
///
/// ```ignore
/// use bevy::prelude::*;
/// use soulslike::FocusPlugin;
///
/// App::new()
///     .add_plugins(MinimalPlugins)
///     .add_plugins(FocusPlugin)
///     .run();
/// ```
#[derive(Debug, Default)]
pub struct FocusPlugin;

impl Plugin for FocusPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<PlayerCharacter>();
        app.register_type::<FocusCamera>();
        app.init_resource::<Focus>();
        app.init_resource::<CharacterSettings>();

        app.add_observer(on_toggle_focus);
        app.add_observer(on_cycle_focus_target);
        app.add_observer(on_look_input);
        app.add_observer(on_move_input);
        app.add_observer(log_focus_changed);

        app.configure_sets(
            Update,
            (FocusSystems::Input, FocusSystems::Simulate, FocusSystems::Rig).chain(),
        );
        app.add_systems(
            Update,
            (character_movement_system, update_focus_system)
                .chain()
                .in_set(FocusSystems::Simulate),
        );
        app.add_systems(Update, camera_rig_system.in_set(FocusSystems::Rig));
    }
}
