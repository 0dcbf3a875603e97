//! Presentation layer plugin owning the camera, focus indicator and sweep
//! debug drawing.
//!
//! `PresentationPlugin` is a passive observer of the focus state. It spawns
//! the 3D camera tagged with [`FocusCamera`], shows a screen-space marker
//! over the focused agent while focus is engaged, and draws the most recent
//! acquisition sweep for [`FocusSettings::debug_draw_seconds`].
//!
//! [`FocusSettings::debug_draw_seconds`]: crate::settings::FocusSettings

use bevy::prelude::*;
use bevy::transform::TransformSystems;

use crate::plugin::{agent_id, Collider, Focus, FocusCamera, FocusChanged, FocusSystems};
use crate::targeting::{AgentId, BoxSweep};

/// Side length of the focus indicator in logical pixels.
pub const INDICATOR_SIZE: f32 = 14.0;

/// Marker for the UI node drawn over the focused agent.
#[derive(Component, Reflect, Default, Debug, Clone, Copy, PartialEq, Eq)]
#[reflect(Component, Default)]
pub struct FocusIndicator;

/// The sweep currently being drawn and how long it stays on screen.
#[derive(Resource, Debug, Clone, Default, PartialEq)]
pub struct SweepDebugDraw {
    /// Sweep shown by the gizmo system.
    pub sweep: Option<BoxSweep>,
    /// Seconds left before the sweep disappears.
    pub remaining: f32,
    /// Acquisition count of the controller when `sweep` was taken.
    pub generation: u64,
}

impl SweepDebugDraw {
    /// Starts showing `sweep` for `seconds` when `generation` is newer than
    /// the one already on screen.
    ///
    /// Returns `true` when the sweep was replaced.
    pub const fn refresh(
        &mut self,
        sweep: Option<&BoxSweep>,
        generation: u64,
        seconds: f32,
    ) -> bool {
        if generation == self.generation {
            return false;
        }
        let Some(latest) = sweep else {
            return false;
        };
        self.sweep = Some(*latest);
        self.generation = generation;
        self.remaining = seconds;
        true
    }

    /// Counts the timer down; the sweep is dropped once it runs out.
    pub const fn tick(&mut self, delta_seconds: f32) {
        self.remaining -= delta_seconds;
        if self.remaining <= 0.0 {
            self.remaining = 0.0;
        }
    }

    /// Whether the sweep should be drawn this frame.
    #[must_use]
    pub const fn is_visible(&self) -> bool {
        self.sweep.is_some() && self.remaining > 0.0
    }
}

/// Top-left corner of the indicator for a target projected to `viewport`.
///
/// The indicator is centred on the projected point and then shifted by
/// `offset`.
///
/// # Examples
///
/// ```
/// use bevy::math::Vec2;
/// use soulslike::presentation::{indicator_corner, INDICATOR_SIZE};
///
/// let corner = indicator_corner(Vec2::new(100.0, 100.0), Vec2::ZERO);
/// assert_eq!(corner, Vec2::splat(100.0 - INDICATOR_SIZE / 2.0));
/// ```
#[must_use]
pub fn indicator_corner(viewport: Vec2, offset: Vec2) -> Vec2 {
    viewport + offset - Vec2::splat(INDICATOR_SIZE / 2.0)
}

/// Spawns the presentation camera and the hidden focus indicator.
///
/// A camera already tagged with [`FocusCamera`] is kept as is.
fn presentation_setup(mut commands: Commands, cameras: Query<(), With<FocusCamera>>) {
    if cameras.is_empty() {
        commands.spawn((
            Camera3d::default(),
            FocusCamera,
            Transform::from_xyz(0.0, 60.0, 400.0).looking_to(Vec3::NEG_Z, Vec3::Y),
            Name::new("FocusCamera"),
        ));
    }
    commands.spawn((
        FocusIndicator,
        Node {
            position_type: PositionType::Absolute,
            width: Val::Px(INDICATOR_SIZE),
            height: Val::Px(INDICATOR_SIZE),
            ..default()
        },
        BackgroundColor(Color::srgb(0.95, 0.25, 0.2)),
        Visibility::Hidden,
        Name::new("FocusIndicator"),
    ));
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "Observer systems must accept On<T> by value."
)]
fn on_focus_changed(
    event: On<FocusChanged>,
    mut indicators: Query<&mut Visibility, With<FocusIndicator>>,
) {
    let visibility = if event.event().target.is_some() {
        Visibility::Visible
    } else {
        Visibility::Hidden
    };
    for mut current in &mut indicators {
        *current = visibility;
    }
}

fn target_translation(
    target: AgentId,
    bodies: &Query<(Entity, &Transform), With<Collider>>,
) -> Option<Vec3> {
    bodies
        .iter()
        .find(|(entity, _)| agent_id(*entity) == target)
        .map(|(_, transform)| transform.translation)
}

/// Moves the indicator over the focused agent.
///
/// The indicator is hidden for frames where the target projects off screen.
#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy systems require parameters by value, not by reference."
)]
pub fn focus_indicator_system(
    focus: Res<Focus>,
    bodies: Query<(Entity, &Transform), With<Collider>>,
    cameras: Query<(&Camera, &GlobalTransform), With<FocusCamera>>,
    mut indicators: Query<(&mut Node, &mut Visibility), With<FocusIndicator>>,
) {
    let Ok((mut node, mut visibility)) = indicators.single_mut() else {
        return;
    };
    let Some(target) = focus.active_target() else {
        *visibility = Visibility::Hidden;
        return;
    };
    let Ok((camera, camera_transform)) = cameras.single() else {
        return;
    };
    let Some(position) = target_translation(target, &bodies) else {
        return;
    };
    let aim_point = position + Vec3::Y * focus.settings().target_height_offset;

    match camera.world_to_viewport(camera_transform, aim_point) {
        Ok(viewport) => {
            let corner = indicator_corner(viewport, focus.settings().indicator_offset);
            node.left = Val::Px(corner.x);
            node.top = Val::Px(corner.y);
            *visibility = Visibility::Visible;
        }
        Err(_) => *visibility = Visibility::Hidden,
    }
}

/// Draws the latest acquisition sweep with gizmos while its timer runs.
#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy systems require parameters by value, not by reference."
)]
pub fn sweep_debug_system(
    time: Res<Time>,
    focus: Res<Focus>,
    mut debug: ResMut<SweepDebugDraw>,
    mut gizmos: Gizmos,
) {
    let seconds = focus.settings().debug_draw_seconds;
    if seconds <= 0.0 {
        return;
    }
    if !debug.refresh(focus.last_sweep(), focus.acquisition_count(), seconds) {
        debug.tick(time.delta_secs());
    }
    if !debug.is_visible() {
        return;
    }
    let Some(sweep) = debug.sweep else {
        return;
    };

    let color = Color::srgb(0.2, 0.9, 0.3);
    let scale = sweep.half_extents * 2.0;
    gizmos.cuboid(
        Transform::from_translation(sweep.start).with_scale(scale),
        color,
    );
    gizmos.cuboid(
        Transform::from_translation(sweep.end).with_scale(scale),
        color,
    );
    gizmos.line(sweep.start, sweep.end, color);
}

/// Plugin owning camera setup and presentation systems.
///
/// Add after [`FocusPlugin`](crate::FocusPlugin); the presentation systems
/// run after the camera rig so the indicator tracks the final camera pose.
#[derive(Debug, Default)]
pub struct PresentationPlugin;

impl Plugin for PresentationPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<FocusIndicator>();
        app.init_resource::<SweepDebugDraw>();
        app.add_systems(Startup, presentation_setup);
        app.add_observer(on_focus_changed);
        app.add_systems(
            PostUpdate,
            focus_indicator_system.after(TransformSystems::Propagate),
        );
        app.add_systems(Update, sweep_debug_system.after(FocusSystems::Rig));
    }
}
