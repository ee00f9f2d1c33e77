use bevy::pbr::wireframe::{Wireframe, WireframeColor};
use bevy::prelude::*;
use constants::focus_square::{SEGMENT_THICKNESS_M, SIZE_M};
use constants::render_settings::{
    EMOJI_PLACEHOLDER_COLOUR, FOCUS_CLOSED_COLOUR, FOCUS_FLASH_COLOUR, FOCUS_OPEN_COLOUR,
    SELECTED_COLOUR, TEXT_COLOUR,
};

use super::focus_square::FocusSquare;
use super::mutation_queue::{FocusSquareNode, SceneIndex};
use super::virtual_object::{ObjectBounds, ObjectModel, VirtualObject};
use crate::tools::object_manager::{ArSet, GestureCoordinator};

const FLASH_SECS: f32 = 0.3;

#[derive(Resource)]
struct FocusSquareMaterial(Handle<StandardMaterial>);

/// Meshes and materials for everything the interaction core places in the
/// scene. Runs after the mutation queue so each tick draws what it applied.
pub struct SceneVisualsPlugin;

impl Plugin for SceneVisualsPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, spawn_focus_square_node).add_systems(
            Update,
            (
                sync_focus_square_node,
                attach_object_visuals,
                refresh_resized_objects,
                highlight_selected_object,
            )
                .after(ArSet::SceneMutation),
        );
    }
}

fn spawn_focus_square_node(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let material = materials.add(StandardMaterial {
        base_color: FOCUS_OPEN_COLOUR,
        unlit: true,
        ..default()
    });
    let half = SIZE_M * 0.5;
    let height = SEGMENT_THICKNESS_M * 0.25;
    let along_z = meshes.add(Cuboid::new(SEGMENT_THICKNESS_M, height, SIZE_M));
    let along_x = meshes.add(Cuboid::new(SIZE_M, height, SEGMENT_THICKNESS_M));

    commands
        .spawn((
            Name::new("Focus Square"),
            FocusSquareNode,
            Transform::default(),
            Visibility::default(),
        ))
        .with_children(|parent| {
            for (mesh, offset) in [
                (along_z.clone(), Vec3::new(-half, 0.0, 0.0)),
                (along_z, Vec3::new(half, 0.0, 0.0)),
                (along_x.clone(), Vec3::new(0.0, 0.0, -half)),
                (along_x, Vec3::new(0.0, 0.0, half)),
            ] {
                parent.spawn((
                    Mesh3d(mesh),
                    MeshMaterial3d(material.clone()),
                    Transform::from_translation(offset),
                ));
            }
        });

    commands.insert_resource(FocusSquareMaterial(material));
}

fn sync_focus_square_node(
    time: Res<Time>,
    focus: Res<FocusSquare>,
    material: Option<Res<FocusSquareMaterial>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut nodes: Query<(&mut Transform, &mut Visibility), With<FocusSquareNode>>,
    mut flash_remaining: Local<f32>,
) {
    for (mut transform, mut visibility) in &mut nodes {
        *transform = focus.display_transform();
        *visibility = if focus.is_hidden() {
            Visibility::Hidden
        } else {
            Visibility::Inherited
        };
    }

    if focus.is_first_visit() {
        *flash_remaining = FLASH_SECS;
    } else {
        *flash_remaining = (*flash_remaining - time.delta_secs()).max(0.0);
    }

    let colour = if *flash_remaining > 0.0 {
        FOCUS_FLASH_COLOUR
    } else if focus.is_open() {
        FOCUS_OPEN_COLOUR
    } else {
        FOCUS_CLOSED_COLOUR
    };
    let Some(material) = material else {
        return;
    };
    if let Some(material) = materials.get_mut(&material.0) {
        if material.base_color != colour {
            material.base_color = colour;
        }
    }
}

fn attach_object_visuals(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    added: Query<(Entity, &VirtualObject, &ObjectBounds, Option<&ObjectModel>), Added<VirtualObject>>,
) {
    for (entity, object, bounds, model) in &added {
        if let Some(model) = model {
            let scene = asset_server.load(GltfAssetLabel::Scene(0).from_asset(model.0.clone()));
            commands.entity(entity).insert(SceneRoot(scene));
            continue;
        }

        let colour = if object.is_text() {
            TEXT_COLOUR
        } else {
            EMOJI_PLACEHOLDER_COLOUR
        };
        commands.entity(entity).insert((
            Mesh3d(meshes.add(Cuboid::from_size(bounds.0))),
            MeshMaterial3d(materials.add(StandardMaterial {
                base_color: colour,
                ..default()
            })),
        ));
    }
}

/// Rebuilds placeholder meshes whose bounds changed after placement (edited text).
fn refresh_resized_objects(
    mut meshes: ResMut<Assets<Mesh>>,
    mut resized: Query<(&ObjectBounds, &mut Mesh3d), (Changed<ObjectBounds>, With<VirtualObject>)>,
) {
    for (bounds, mut mesh) in &mut resized {
        mesh.0 = meshes.add(Cuboid::from_size(bounds.0));
    }
}

fn highlight_selected_object(
    mut commands: Commands,
    coordinator: Res<GestureCoordinator>,
    index: Res<SceneIndex>,
    highlighted: Query<Entity, (With<VirtualObject>, With<Wireframe>)>,
) {
    let selected = coordinator
        .selected(&index)
        .and_then(|id| index.entity(id));

    for entity in &highlighted {
        if Some(entity) != selected {
            commands.entity(entity).remove::<(Wireframe, WireframeColor)>();
        }
    }
    if let Some(entity) = selected {
        if !highlighted.contains(entity) {
            commands.entity(entity).insert((
                Wireframe,
                WireframeColor {
                    color: SELECTED_COLOUR,
                },
            ));
        }
    }
}
