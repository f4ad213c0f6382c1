//! Machine reservation operations

use gpui::App;

use crate::services::{Tokio, complete_task, fail_task, start_task};
use crate::vast::ReserveRequest;

use super::core::{DispatcherEvent, dispatcher, vast_client};
use super::instances::refresh_instances;

pub const RESERVE_SUCCESS_MESSAGE: &str = "Machine reserved successfully";
pub const RESERVE_ERROR_PREFIX: &str = "Failed to reserve machine: ";

/// Submit a reservation for the offer named in `request.ask_contract_id`.
///
/// Fire-and-forget: the caller gets the outcome through dispatcher events,
/// never through a return value. The request is sent exactly once; a failed
/// attempt is reported and left for the operator to retry by hand.
pub fn reserve_machine(request: ReserveRequest, cx: &mut App) {
  let task_id = start_task(cx, format!("Reserving machine for offer {}...", request.ask_contract_id));
  let disp = dispatcher(cx);
  let client = vast_client();

  let tokio_task = Tokio::spawn(cx, async move {
    let guard = client.read().await;
    let vast = guard
      .as_ref()
      .ok_or_else(|| anyhow::anyhow!("Marketplace client not configured"))?;
    vast.start_machine(&request).await
  });

  cx.spawn(async move |cx| {
    let result = tokio_task.await;
    cx.update(|cx| match result {
      Ok(Ok(response)) => {
        let contract_id = response.contract_id();
        tracing::info!("Reserved machine, new contract {contract_id}");
        complete_task(cx, task_id);
        disp.update(cx, |_, cx| {
          cx.emit(DispatcherEvent::MachineReserved {
            contract_id,
            message: RESERVE_SUCCESS_MESSAGE.to_string(),
          });
        });
        refresh_instances(cx);
      }
      Ok(Err(e)) => {
        tracing::warn!("Reservation failed: {e}");
        fail_task(cx, task_id, e.to_string());
        disp.update(cx, |_, cx| {
          cx.emit(DispatcherEvent::TaskFailed {
            error: format!("{RESERVE_ERROR_PREFIX}{e}"),
          });
        });
      }
      Err(e) => {
        fail_task(cx, task_id, e.to_string());
        disp.update(cx, |_, cx| {
          cx.emit(DispatcherEvent::TaskFailed {
            error: format!("{RESERVE_ERROR_PREFIX}{e}"),
          });
        });
      }
    })
  })
  .detach();
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_error_notification_keeps_underlying_detail() {
    let error = format!("{RESERVE_ERROR_PREFIX}{}", "timeout");
    assert_eq!(error, "Failed to reserve machine: timeout");
    assert!(error.contains("timeout"));
  }
}
