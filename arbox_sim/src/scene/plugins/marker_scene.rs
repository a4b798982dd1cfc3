// arbox_sim/src/scene/plugins/marker_scene.rs

//! Materializes the spawner's declarative output: the floor quad, the
//! marker outline, one physics box per descriptor and the status text.
//! Falling, collisions and drawing are left to Bevy and avian3d.

use std::collections::{HashMap, HashSet};

use arbox_core::assets::SceneAssets;
use arbox_core::descriptors::{BoxDescriptor, FloorDescriptor, PhysicsBody};
use arbox_core::spawner::TrackingSpawner;
use avian3d::prelude::*;

use crate::prelude::*;
use crate::scene::core::app_state::ArSet;
use crate::scene::plugins::spawner::teardown_spawner;
use crate::scene::core::transforms::{
    anchored_transform, array_to_bevy, euler_deg_to_quat, nalgebra_vector_to_bevy, rgb_to_color,
};

// =========================================================================
// == Components & Resources ==
// =========================================================================

/// The pose the tracker reported for the marker. Everything anchored is
/// placed relative to it.
#[derive(Component)]
pub struct AnchorRoot;

#[derive(Component)]
pub struct FloorPlane;

/// A flat quad the size of the printed marker, shown while anchored.
#[derive(Component)]
pub struct MarkerOutline;

/// Links a rendered box to the descriptor id it was spawned from.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpawnedBox(pub u64);

#[derive(Component)]
pub struct StatusText;

/// Constant rotation about Y, driven by a registered animation.
#[derive(Component, Debug, Clone, Copy)]
pub struct Spin {
    pub degrees_per_second: f32,
}

/// GPU handles built once from the asset registrations.
#[derive(Resource)]
pub struct MarkerSceneAssets {
    materials: HashMap<String, Handle<StandardMaterial>>,
    fallback_material: Handle<StandardMaterial>,
    box_mesh: Handle<Mesh>,
    floor_mesh: Handle<Mesh>,
    outline_mesh: Option<Handle<Mesh>>,
}

impl MarkerSceneAssets {
    fn material(&self, name: &str) -> Handle<StandardMaterial> {
        self.materials
            .get(name)
            .cloned()
            .unwrap_or_else(|| self.fallback_material.clone())
    }
}

// =========================================================================
// == Plugin ==
// =========================================================================

pub struct MarkerScenePlugin;

impl Plugin for MarkerScenePlugin {
    fn build(&self, app: &mut App) {
        if !app.world().contains_resource::<SceneAssets>() {
            app.init_resource::<SceneAssets>();
        }

        app.add_systems(OnEnter(AppState::SceneBuilding), setup_marker_scene)
            .add_systems(Update, spin_system);
        add_scene_sync_systems(app);
    }
}

/// Keeps the rendered floor, boxes and status in line with the spawner:
/// every running frame it changed in, and once more after the teardown on
/// `Stopped`, which clears the scene.
fn add_scene_sync_systems(app: &mut App) {
    app.add_systems(
        Update,
        (
            sync_scene_frame.run_if(resource_exists_and_changed::<TrackingSpawner>),
            update_status_text.run_if(resource_exists_and_changed::<TrackingSpawner>),
        )
            .in_set(ArSet::Render),
    )
    .add_systems(
        OnEnter(AppState::Stopped),
        (sync_scene_frame, update_status_text)
            .after(teardown_spawner)
            .run_if(resource_exists::<TrackingSpawner>),
    );
}

// =========================================================================
// == Scene Building ==
// =========================================================================

/// Builds mesh/material handles and spawns the static parts of the scene:
/// camera, light, anchor and the status overlay.
fn setup_marker_scene(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    config: Res<SceneConfig>,
    assets: Res<SceneAssets>,
    spawner: Option<Res<TrackingSpawner>>,
) {
    info!("[SCENE] Building marker scene.");

    // --- Materials & Meshes ---
    let material_handles = assets
        .materials
        .iter()
        .map(|(name, def)| {
            let handle = materials.add(StandardMaterial {
                base_color: rgb_to_color(def.diffuse_color),
                ..default()
            });
            (name.clone(), handle)
        })
        .collect();

    let layout = &config.layout;
    let box_size = layout.boxes.size;
    let outline_mesh = assets.target(&config.marker.target).map(|target| {
        let width = target.physical_width;
        meshes.add(Rectangle::new(width, width))
    });

    commands.insert_resource(MarkerSceneAssets {
        materials: material_handles,
        fallback_material: materials.add(StandardMaterial::default()),
        box_mesh: meshes.add(Cuboid::new(box_size, box_size, box_size)),
        floor_mesh: meshes.add(Rectangle::new(layout.floor.width, layout.floor.height)),
        outline_mesh,
    });

    // --- Anchor ---
    let anchor_translation = array_to_bevy(config.marker.translation);
    commands.spawn((
        Name::new(format!("Anchor: {}", config.marker.target)),
        AnchorRoot,
        Transform::from_translation(anchor_translation),
    ));

    // --- Camera & Lighting ---
    // The device camera sits at the origin looking at the marker.
    commands.spawn((
        Name::new("Device Camera"),
        Camera3d::default(),
        Transform::from_xyz(0.0, 0.2, 0.0).looking_at(anchor_translation, Vec3::Y),
    ));

    let mut light = commands.spawn((
        Name::new("Scene Light"),
        DirectionalLight {
            shadows_enabled: true,
            illuminance: 10_000.0,
            ..default()
        },
        Transform::from_xyz(1.0, 2.0, 1.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));
    if let Some(animation) = config
        .marker
        .light_animation()
        .and_then(|name| assets.animation(name))
    {
        light.insert(Spin {
            degrees_per_second: animation.degrees_per_second(),
        });
    }

    // --- Status Overlay ---
    let initial = spawner
        .map(|s| s.status().text())
        .unwrap_or_default();
    commands.spawn((
        Name::new("Status Text"),
        StatusText,
        Text::new(initial),
        TextFont {
            font_size: 30.0,
            ..default()
        },
        TextColor(Color::WHITE),
        TextLayout::new_with_justify(JustifyText::Center),
        Node {
            position_type: PositionType::Absolute,
            top: Val::Px(24.0),
            width: Val::Percent(100.0),
            ..default()
        },
    ));
}

// =========================================================================
// == Runtime Systems ==
// =========================================================================

/// Which boxes to add and remove so the rendered set matches the descriptors.
#[derive(Debug, Default, PartialEq)]
pub struct BoxSyncPlan<'a> {
    pub despawn: Vec<u64>,
    pub spawn: Vec<&'a BoxDescriptor>,
}

/// Diffs rendered box ids against the descriptor list by id. Boxes that are
/// already rendered are left alone so the physics engine keeps their state.
pub fn plan_box_sync<'a>(
    rendered: impl IntoIterator<Item = u64>,
    desired: &'a [BoxDescriptor],
) -> BoxSyncPlan<'a> {
    let rendered: HashSet<u64> = rendered.into_iter().collect();
    let wanted: HashSet<u64> = desired.iter().map(|b| b.id).collect();

    let mut despawn: Vec<u64> = rendered.difference(&wanted).copied().collect();
    despawn.sort_unstable();

    BoxSyncPlan {
        despawn,
        spawn: desired.iter().filter(|b| !rendered.contains(&b.id)).collect(),
    }
}

/// Brings the rendered scene in line with the spawner's current frame.
fn sync_scene_frame(
    mut commands: Commands,
    spawner: Res<TrackingSpawner>,
    config: Res<SceneConfig>,
    scene_assets: Res<MarkerSceneAssets>,
    anchor: Single<&Transform, With<AnchorRoot>>,
    floor_query: Query<Entity, Or<(With<FloorPlane>, With<MarkerOutline>)>>,
    box_query: Query<(Entity, &SpawnedBox)>,
) {
    let frame = spawner.frame(&config.layout);
    let anchor = *anchor;

    // --- Floor & marker outline ---
    match (&frame.floor, floor_query.is_empty()) {
        (Some(floor), true) => {
            spawn_floor(&mut commands, &scene_assets, anchor, floor);
            if let Some(mesh) = &scene_assets.outline_mesh {
                commands.spawn((
                    Name::new("Marker Outline"),
                    MarkerOutline,
                    Mesh3d(mesh.clone()),
                    MeshMaterial3d(scene_assets.material("blue")),
                    // Just above the floor so the two quads do not z-fight.
                    anchored_transform(
                        anchor,
                        Vec3::new(0.0, 0.001, 0.0),
                        euler_deg_to_quat(floor.rotation_deg),
                    ),
                ));
            }
        }
        (None, false) => {
            debug!("[SCENE] Anchor gone, removing floor.");
            for entity in &floor_query {
                commands.entity(entity).despawn();
            }
        }
        _ => {}
    }

    // --- Boxes ---
    let entity_by_id: HashMap<u64, Entity> = box_query
        .iter()
        .map(|(entity, spawned)| (spawned.0, entity))
        .collect();
    let plan = plan_box_sync(entity_by_id.keys().copied(), &frame.boxes);

    for id in &plan.despawn {
        if let Some(&entity) = entity_by_id.get(id) {
            commands.entity(entity).despawn();
        }
    }
    for descriptor in plan.spawn {
        spawn_box(&mut commands, &scene_assets, anchor, descriptor);
    }
}

fn spawn_floor(
    commands: &mut Commands,
    scene_assets: &MarkerSceneAssets,
    anchor: &Transform,
    floor: &FloorDescriptor,
) {
    debug!("[SCENE] Anchor active, spawning floor.");
    let mut entity = commands.spawn((
        Name::new("Floor"),
        FloorPlane,
        Mesh3d(scene_assets.floor_mesh.clone()),
        MeshMaterial3d(scene_assets.material(&floor.material)),
        anchored_transform(
            anchor,
            array_to_bevy(floor.position),
            euler_deg_to_quat(floor.rotation_deg),
        ),
    ));
    // The quad lies in its local XY plane, so the collider is thin along Z.
    insert_physics_body(
        &mut entity,
        floor.body,
        Collider::cuboid(floor.width, floor.height, 0.01),
    );
}

fn spawn_box(
    commands: &mut Commands,
    scene_assets: &MarkerSceneAssets,
    anchor: &Transform,
    descriptor: &BoxDescriptor,
) {
    let mut entity = commands.spawn((
        Name::new(format!("Box {}", descriptor.id)),
        SpawnedBox(descriptor.id),
        Mesh3d(scene_assets.box_mesh.clone()),
        MeshMaterial3d(scene_assets.material(&descriptor.material)),
        anchored_transform(
            anchor,
            nalgebra_vector_to_bevy(&descriptor.position),
            Quat::IDENTITY,
        ),
    ));
    let size = descriptor.size;
    insert_physics_body(&mut entity, descriptor.body, Collider::cuboid(size, size, size));
}

/// Maps a physics descriptor onto avian3d components.
fn insert_physics_body(entity: &mut EntityCommands, body: PhysicsBody, collider: Collider) {
    match body {
        PhysicsBody::Static {
            restitution,
            friction,
        } => {
            entity.insert((
                RigidBody::Static,
                collider,
                Restitution::new(restitution),
                Friction::new(friction),
            ));
        }
        PhysicsBody::Dynamic {
            mass,
            force,
            torque,
        } => {
            entity.insert((
                RigidBody::Dynamic,
                collider,
                Mass(mass),
                ExternalForce::new(array_to_bevy(force)),
                ExternalTorque::new(array_to_bevy(torque)),
            ));
        }
    }
}

fn update_status_text(spawner: Res<TrackingSpawner>, mut text: Single<&mut Text, With<StatusText>>) {
    let status = spawner.status().text();
    if text.0 != status {
        text.0 = status.to_string();
    }
}

fn spin_system(time: Res<Time>, mut query: Query<(&mut Transform, &Spin)>) {
    let dt = time.delta_secs();
    for (mut transform, spin) in &mut query {
        transform.rotate_y((spin.degrees_per_second * dt).to_radians());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::core::scene_setup::SceneSetupPlugin;
    use crate::scene::plugins::spawner::SpawnerPlugin;
    use approx::assert_abs_diff_eq;
    use arbox_core::descriptors::BoxStyle;
    use arbox_core::status::StatusMessage;
    use bevy::state::app::StatesPlugin;
    use nalgebra::Vector3;
    use std::time::Duration;

    fn descriptor(id: u64) -> BoxDescriptor {
        let style = BoxStyle::default();
        BoxDescriptor {
            id,
            position: Vector3::new(0.0, 0.5, 0.0),
            size: style.size,
            material: style.material,
            body: style.body,
        }
    }

    fn spawn_ids(plan: &BoxSyncPlan) -> Vec<u64> {
        plan.spawn.iter().map(|b| b.id).collect()
    }

    #[test]
    fn first_sync_spawns_everything() {
        let desired = vec![descriptor(0), descriptor(1)];
        let plan = plan_box_sync([], &desired);

        assert!(plan.despawn.is_empty());
        assert_eq!(spawn_ids(&plan), vec![0, 1]);
    }

    #[test]
    fn existing_boxes_are_kept() {
        let desired = vec![descriptor(0), descriptor(1), descriptor(2)];
        let plan = plan_box_sync([0, 1], &desired);

        assert!(plan.despawn.is_empty());
        assert_eq!(spawn_ids(&plan), vec![2]);
    }

    #[test]
    fn cleared_frame_despawns_everything() {
        let plan = plan_box_sync([3, 1, 2], &[]);

        assert_eq!(plan.despawn, vec![1, 2, 3]);
        assert!(plan.spawn.is_empty());
    }

    #[test]
    fn lost_then_found_replaces_old_ids() {
        // Boxes 0 and 1 were cleared by a lost anchor; box 2 is the first of the new cycle.
        let desired = vec![descriptor(2)];
        let plan = plan_box_sync([0, 1], &desired);

        assert_eq!(plan.despawn, vec![0, 1]);
        assert_eq!(spawn_ids(&plan), vec![2]);
    }

    /// Runs one frame whose delta is `ms` milliseconds.
    fn step(app: &mut App, ms: u64) {
        app.world_mut()
            .resource_mut::<Time>()
            .advance_by(Duration::from_millis(ms));
        app.update();
        app.world_mut()
            .resource_mut::<Time>()
            .advance_by(Duration::ZERO);
    }

    #[test]
    fn light_turns_at_the_light_loop_rate() {
        let degrees_per_second = SceneAssets::default()
            .animation("rotateLightLoop")
            .unwrap()
            .degrees_per_second();

        let mut app = App::new();
        app.init_resource::<Time>().add_systems(Update, spin_system);
        let light = app
            .world_mut()
            .spawn((Transform::IDENTITY, Spin { degrees_per_second }))
            .id();

        // Half of the 50 s loop is a half turn about Y.
        for _ in 0..25 {
            step(&mut app, 1000);
        }
        let rotation = app.world().get::<Transform>(light).unwrap().rotation;
        let turned = rotation * Vec3::X;
        assert_abs_diff_eq!(turned.x, -1.0, epsilon = 1e-4);
        assert_abs_diff_eq!(turned.y, 0.0, epsilon = 1e-4);
        assert_abs_diff_eq!(turned.z, 0.0, epsilon = 1e-4);
    }

    #[test]
    fn stopping_clears_the_rendered_scene() {
        let mut app = App::new();
        app.add_plugins(StatesPlugin)
            .init_resource::<Time>()
            .insert_resource(SceneConfig::default())
            .add_plugins((SceneSetupPlugin, SpawnerPlugin))
            .insert_resource(MarkerSceneAssets {
                materials: HashMap::new(),
                fallback_material: Handle::default(),
                box_mesh: Handle::default(),
                floor_mesh: Handle::default(),
                outline_mesh: None,
            });
        add_scene_sync_systems(&mut app);
        app.world_mut()
            .spawn((AnchorRoot, Transform::from_xyz(0.0, -0.3, -1.0)));
        let text = app
            .world_mut()
            .spawn((StatusText, Text::new("Target Found!")))
            .id();

        // Let the SceneBuilding -> Running transition and the first sync settle.
        app.update();
        app.update();
        step(&mut app, 0);

        // What an anchored scene left on screen; the spawner has not changed since.
        let floor = app.world_mut().spawn(FloorPlane).id();
        let spawned = app.world_mut().spawn(SpawnedBox(3)).id();
        step(&mut app, 100);
        assert!(app.world().get_entity(floor).is_ok());
        assert!(app.world().get_entity(spawned).is_ok());

        app.world_mut()
            .resource_mut::<NextState<AppState>>()
            .set(AppState::Stopped);
        step(&mut app, 0);

        assert!(app.world().get_entity(floor).is_err());
        assert!(app.world().get_entity(spawned).is_err());
        assert_eq!(
            app.world().get::<Text>(text).unwrap().0,
            StatusMessage::Initializing.text()
        );
    }
}
