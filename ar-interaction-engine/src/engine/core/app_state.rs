use bevy::prelude::*;

use crate::engine::loading::catalog::CatalogLoading;
use crate::tools::object_manager::SessionControl;

#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Hash, States)]
pub enum AppState {
    #[default]
    Loading,
    Running,
}

pub fn transition_to_running(
    loading: Res<CatalogLoading>,
    mut next_state: ResMut<NextState<AppState>>,
) {
    if loading.finished {
        println!("→ Transitioning to Running state");
        next_state.set(AppState::Running);
    }
}

/// Starts a fresh tracking session once the catalog is ready.
pub fn start_session(mut session: SessionControl) {
    session.reset_tracking();
}
