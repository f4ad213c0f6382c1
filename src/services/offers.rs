//! Offer operations

use gpui::App;

use crate::services::Tokio;
use crate::state::{StateChanged, cloud_state};

use super::core::vast_client;

pub fn refresh_offers(cx: &mut App) {
  let state = cloud_state(cx);
  let client = vast_client();

  let tokio_task = Tokio::spawn(cx, async move {
    let guard = client.read().await;
    match guard.as_ref() {
      Some(vast) => vast.list_offers().await,
      None => Ok(vec![]),
    }
  });

  cx.spawn(async move |cx| {
    let result = tokio_task.await;
    cx.update(|cx| {
      state.update(cx, |state, cx| {
        match result {
          Ok(Ok(offers)) => state.set_offers(offers),
          Ok(Err(e)) => state.set_offers_error(e.to_string()),
          Err(e) => state.set_offers_error(e.to_string()),
        }
        cx.emit(StateChanged::OffersUpdated);
      });
    })
  })
  .detach();
}
