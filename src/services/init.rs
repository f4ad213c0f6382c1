//! Client construction and initial data loading

use gpui::App;

use crate::services::Tokio;
use crate::state::{Settings, StateChanged, cloud_state, settings_state};
use crate::vast::VastClient;

use super::core::{DispatcherEvent, dispatcher, vast_client};
use super::instances::refresh_instances;
use super::offers::refresh_offers;

pub fn load_initial_data(cx: &mut App) {
  let state = cloud_state(cx);
  let client_handle = vast_client();

  let settings = settings_state(cx).read(cx).settings.clone();

  // Seed image tags for the reserve dialog before any network round-trip
  state.update(cx, |state, cx| {
    state.set_image_tags(settings.image_tags.clone());
    cx.emit(StateChanged::SettingsUpdated);
  });

  let tokio_task = Tokio::spawn(cx, async move {
    let client = VastClient::new(&settings.api_url, &settings.api_key);

    let offers = client.list_offers().await;
    let instances = client.list_instances().await;

    // Store in the global so refreshes and reservations share it
    let mut guard = client_handle.write().await;
    *guard = Some(client);
    drop(guard);

    (offers, instances)
  });

  cx.spawn(async move |cx| {
    let result = tokio_task.await;
    cx.update(|cx| {
      state.update(cx, |state, cx| {
        match result {
          Ok((offers, instances)) => {
            match offers {
              Ok(offers) => state.set_offers(offers),
              Err(e) => state.set_offers_error(e.to_string()),
            }
            match instances {
              Ok(instances) => state.set_instances(instances),
              Err(e) => state.set_instances_error(e.to_string()),
            }
          }
          Err(e) => {
            state.set_offers_error(e.to_string());
            state.set_instances_error(e.to_string());
          }
        }
        state.is_loading = false;
        cx.emit(StateChanged::OffersUpdated);
        cx.emit(StateChanged::InstancesUpdated);
        cx.emit(StateChanged::Loading);
      });
    })
  })
  .detach();
}

/// Persist new settings, rebuild the marketplace client, and reload data
pub fn apply_settings(settings: Settings, cx: &mut App) {
  let disp = dispatcher(cx);
  match settings.save() {
    Ok(()) => {
      disp.update(cx, |_, cx| {
        cx.emit(DispatcherEvent::TaskCompleted {
          message: "Settings saved".to_string(),
        });
      });
    }
    Err(e) => {
      tracing::warn!("Could not persist settings: {e}");
      disp.update(cx, |_, cx| {
        cx.emit(DispatcherEvent::TaskFailed {
          error: format!("Failed to save settings: {e}"),
        });
      });
    }
  }

  let state = cloud_state(cx);
  state.update(cx, |state, cx| {
    state.set_image_tags(settings.image_tags.clone());
    cx.emit(StateChanged::SettingsUpdated);
  });

  let settings_entity = settings_state(cx);
  settings_entity.update(cx, |settings_state, _cx| {
    settings_state.settings = settings.clone();
  });

  let client_handle = vast_client();
  let tokio_task = Tokio::spawn(cx, async move {
    let client = VastClient::new(&settings.api_url, &settings.api_key);
    let mut guard = client_handle.write().await;
    *guard = Some(client);
  });

  cx.spawn(async move |cx| {
    let _ = tokio_task.await;
    cx.update(|cx| {
      refresh_offers(cx);
      refresh_instances(cx);
    })
  })
  .detach();
}
