//! Demo arena for the `soulslike` binary.

use bevy::prelude::*;

use crate::plugin::{focusable_agent, player, Collider};

const AGENT_EXTENTS: Vec3 = Vec3::new(40.0, 90.0, 40.0);

/// Spawns the player, a ring of focusable dummies, a wall and a light.
#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy systems require parameters by value, not by reference."
)]
pub fn spawn_world_system(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let body = meshes.add(Cuboid::from_size(AGENT_EXTENTS * 2.0));
    let player_material = materials.add(StandardMaterial::from(Color::srgb(0.3, 0.5, 0.9)));
    let dummy_material = materials.add(StandardMaterial::from(Color::srgb(0.8, 0.3, 0.25)));

    commands.spawn((
        player(Vec3::new(0.0, AGENT_EXTENTS.y, 0.0), AGENT_EXTENTS),
        Mesh3d(body.clone()),
        MeshMaterial3d(player_material),
    ));

    let dummies = [
        Vec3::new(0.0, AGENT_EXTENTS.y, -900.0),
        Vec3::new(-600.0, AGENT_EXTENTS.y, -1400.0),
        Vec3::new(500.0, AGENT_EXTENTS.y, -1800.0),
        Vec3::new(1200.0, AGENT_EXTENTS.y, -600.0),
        Vec3::new(-200.0, AGENT_EXTENTS.y, 1500.0),
    ];
    for (index, position) in dummies.into_iter().enumerate() {
        commands.spawn((
            focusable_agent(position, AGENT_EXTENTS),
            Mesh3d(body.clone()),
            MeshMaterial3d(dummy_material.clone()),
            Name::new(format!("Dummy{index}")),
        ));
    }

    // A wall between the player and one of the dummies; sweeps ignore it.
    let wall_extents = Vec3::new(300.0, 150.0, 20.0);
    commands.spawn((
        Transform::from_xyz(-400.0, wall_extents.y, -1100.0),
        Collider::world_static(wall_extents),
        Mesh3d(meshes.add(Cuboid::from_size(wall_extents * 2.0))),
        MeshMaterial3d(materials.add(StandardMaterial::from(Color::srgb(0.5, 0.5, 0.5)))),
        Name::new("Wall"),
    ));

    commands.spawn((
        Mesh3d(meshes.add(Plane3d::default().mesh().size(6000.0, 6000.0))),
        MeshMaterial3d(materials.add(StandardMaterial::from(Color::srgb(0.25, 0.3, 0.25)))),
        Name::new("Ground"),
    ));

    commands.spawn((
        DirectionalLight {
            illuminance: 8000.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(1000.0, 2000.0, 1000.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));
}
