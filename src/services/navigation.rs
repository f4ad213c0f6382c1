//! View navigation and instance routing

use gpui::App;

use crate::state::{CurrentView, StateChanged, cloud_state};

/// A navigable location, rendered as a path for logs and deep links
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
  Offers,
  Instances,
  Instance { contract_id: String },
  Settings,
}

impl Route {
  pub fn path(&self) -> String {
    match self {
      Route::Offers => "/cloud/offers".to_string(),
      Route::Instances => "/cloud".to_string(),
      Route::Instance { contract_id } => format!("/cloud/{contract_id}"),
      Route::Settings => "/settings".to_string(),
    }
  }
}

/// Set the current view
pub fn set_view(view: CurrentView, cx: &mut App) {
  let state = cloud_state(cx);
  state.update(cx, |state, cx| {
    state.set_view(view);
    cx.emit(StateChanged::ViewChanged);
  });
}

/// Navigate to a reserved instance; invoked from the post-reservation
/// "View Instance" affordance
pub fn open_instance(contract_id: String, cx: &mut App) {
  let route = Route::Instance {
    contract_id: contract_id.clone(),
  };
  tracing::debug!("Navigating to {}", route.path());

  let state = cloud_state(cx);
  state.update(cx, |state, cx| {
    state.set_view(CurrentView::Instances);
    cx.emit(StateChanged::ViewChanged);
    cx.emit(StateChanged::InstanceTabRequest { contract_id });
  });
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_instance_route_path() {
    let route = Route::Instance {
      contract_id: "c-99".to_string(),
    };
    assert_eq!(route.path(), "/cloud/c-99");
  }

  #[test]
  fn test_static_route_paths() {
    assert_eq!(Route::Offers.path(), "/cloud/offers");
    assert_eq!(Route::Instances.path(), "/cloud");
    assert_eq!(Route::Settings.path(), "/settings");
  }
}
