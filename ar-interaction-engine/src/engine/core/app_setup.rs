use bevy::asset::AssetMetaCheck;
use bevy::pbr::wireframe::{WireframeConfig, WireframePlugin};
use bevy::prelude::*;
use bevy_common_assets::json::JsonAssetPlugin;

use crate::engine::core::app_state::{AppState, start_session, transition_to_running};
use crate::engine::core::settings::InteractionSettings;
use crate::engine::core::window_config::create_window_config;
use crate::engine::loading::EmojiCatalog;
use crate::engine::loading::catalog::{load_catalog_system, start_catalog_loading};
use crate::engine::scene::visuals::SceneVisualsPlugin;
use crate::engine::tracking::{ArCameraView, ArSession, SimulatedSession};
use crate::rpc::web_rpc::WebRpcPlugin;
use crate::tools::gestures::input::collect_touch_frame;
use crate::tools::object_manager::{ArInteractionPlugin, ArSet};

#[cfg(not(target_arch = "wasm32"))]
use crate::tools::presentation::NativePresentationPlugin;

pub fn create_app() -> App {
    let mut app = App::new();

    app.add_plugins(create_default_plugins())
        .init_state::<AppState>()
        // Registers EmojiCatalog as a loadable asset type from JSON files.
        .add_plugins(JsonAssetPlugin::<EmojiCatalog>::new(&["json"]))
        .insert_resource(InteractionSettings::default())
        .insert_resource(ArSession::new(SimulatedSession::default()))
        .add_plugins(ArInteractionPlugin)
        .add_plugins(SceneVisualsPlugin)
        .add_plugins(WebRpcPlugin)
        .add_plugins(WireframePlugin::default())
        .insert_resource(WireframeConfig {
            global: false,
            default_color: Color::WHITE,
        });

    #[cfg(not(target_arch = "wasm32"))]
    {
        app.add_plugins(NativePresentationPlugin);
    }

    // The interaction tick only runs once the catalog is in place.
    app.configure_sets(
        Update,
        (
            ArSet::Tracking,
            ArSet::Input,
            ArSet::FrameUpdate,
            ArSet::SceneMutation,
        )
            .run_if(in_state(AppState::Running)),
    );

    app.add_systems(Startup, (setup, start_catalog_loading).chain())
        .add_systems(
            Update,
            (load_catalog_system, transition_to_running)
                .chain()
                .run_if(in_state(AppState::Loading)),
        )
        .add_systems(OnEnter(AppState::Running), start_session)
        .add_systems(
            Update,
            collect_touch_frame
                .after(ArSet::Tracking)
                .before(ArSet::Input)
                .run_if(in_state(AppState::Running)),
        );

    app
}

fn spawn_lighting(commands: &mut Commands) {
    commands.spawn((
        DirectionalLight {
            shadows_enabled: true,
            ..default()
        },
        Transform::from_rotation(Quat::from_euler(
            EulerRot::ZYX,
            0.0,
            1.0,
            -std::f32::consts::FRAC_PI_4,
        )),
    ));
}

fn spawn_ar_camera(commands: &mut Commands) {
    commands.spawn((
        Name::new("AR Camera"),
        Camera3d::default(),
        Projection::Perspective(PerspectiveProjection::default()),
        Transform::default(),
        ArCameraView,
    ));
}

// Startup system that only handles basic initialisation
fn setup(mut commands: Commands) {
    spawn_lighting(&mut commands);
    spawn_ar_camera(&mut commands);
}

fn create_default_plugins() -> impl PluginGroup {
    let window_config = WindowPlugin {
        primary_window: Some(create_window_config()),
        ..default()
    };

    let asset_config = AssetPlugin {
        meta_check: AssetMetaCheck::Never,
        ..default()
    };

    DefaultPlugins.set(window_config).set(asset_config)
}
