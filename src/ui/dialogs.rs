//! Centralized dialog helpers
//!
//! This module provides simple helper functions to open dialogs with all buttons
//! and actions pre-configured. Call these functions from anywhere (views, menu
//! bar) to open a fully functional dialog.

use gpui::{App, AppContext, IntoElement, ParentElement, Styled, Window, px};
use gpui_component::{
  WindowExt,
  button::{Button, ButtonVariants},
};

use crate::ui::offers::reserve_dialog::ReserveDialog;

/// Opens the Reserve Machine dialog for one marketplace offer.
///
/// Cancel closes the dialog without side effects; Confirm validates and
/// submits once, staying inert while a submission is in flight. The dialog
/// stays open after submitting so the outcome notification lands in context.
pub fn open_reserve_machine_dialog(
  camera_count: u32,
  docker_tags: Vec<String>,
  offer_id: String,
  window: &mut Window,
  cx: &mut App,
) {
  let dialog_entity = cx.new(|cx| ReserveDialog::new(camera_count, docker_tags, offer_id, cx));

  window.open_dialog(cx, move |dialog, _window, _cx| {
    let dialog_clone = dialog_entity.clone();

    dialog
      .title("Reserve Machine")
      .min_w(px(640.))
      .child(dialog_entity.clone())
      .footer(move |_dialog_state, _, _window, cx| {
        let dialog_for_submit = dialog_clone.clone();
        let submitting = dialog_for_submit.read(cx).is_submitting();

        vec![
          Button::new("cancel")
            .label("Cancel")
            .ghost()
            .on_click(|_ev, window, cx| {
              window.close_dialog(cx);
            })
            .into_any_element(),
          Button::new("confirm")
            .label(if submitting { "Reserving..." } else { "Confirm" })
            .primary()
            .on_click({
              let dialog = dialog_for_submit.clone();
              move |_ev, _window, cx| {
                dialog.update(cx, |dialog, cx| dialog.submit(cx));
              }
            })
            .into_any_element(),
        ]
      })
  });
}
