//! Instance operations

use gpui::App;

use crate::services::Tokio;
use crate::state::{StateChanged, cloud_state};

use super::core::vast_client;

pub fn refresh_instances(cx: &mut App) {
  let state = cloud_state(cx);
  let client = vast_client();

  let tokio_task = Tokio::spawn(cx, async move {
    let guard = client.read().await;
    match guard.as_ref() {
      Some(vast) => vast.list_instances().await,
      None => Ok(vec![]),
    }
  });

  cx.spawn(async move |cx| {
    let result = tokio_task.await;
    cx.update(|cx| {
      state.update(cx, |state, cx| {
        match result {
          Ok(Ok(instances)) => state.set_instances(instances),
          Ok(Err(e)) => state.set_instances_error(e.to_string()),
          Err(e) => state.set_instances_error(e.to_string()),
        }
        cx.emit(StateChanged::InstancesUpdated);
      });
    })
  })
  .detach();
}
