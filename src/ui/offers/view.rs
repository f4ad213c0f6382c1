use gpui::{Context, Entity, Render, SharedString, Styled, Window, div, prelude::*, px};
use gpui_component::{
  Sizable,
  button::{Button, ButtonVariants},
  h_flex,
  label::Label,
  notification::NotificationType,
  scroll::ScrollableElement,
  theme::ActiveTheme,
  v_flex,
};
use gpui_component::WindowExt;

use crate::services::{self, DispatcherEvent, dispatcher};
use crate::state::{CloudState, LoadState, StateChanged, cloud_state};
use crate::ui::dialogs::open_reserve_machine_dialog;
use crate::vast::OfferInfo;

/// Self-contained Offers view - lists open offers and hosts the reserve dialog
pub struct OffersView {
  cloud_state: Entity<CloudState>,
  pending_notifications: Vec<(NotificationType, String)>,
  /// Contract id of the latest reservation, until the operator follows or
  /// dismisses the "View Instance" affordance
  last_reserved: Option<String>,
}

impl OffersView {
  pub fn new(cx: &mut Context<'_, Self>) -> Self {
    let cloud_state = cloud_state(cx);

    // Subscribe to state changes
    cx.subscribe(&cloud_state, |_this, _state, event: &StateChanged, cx| match event {
      StateChanged::OffersUpdated | StateChanged::SettingsUpdated | StateChanged::Loading => {
        cx.notify();
      }
      _ => {}
    })
    .detach();

    // Subscribe to dispatcher events for notifications
    let disp = dispatcher(cx);
    cx.subscribe(&disp, |this, _disp, event: &DispatcherEvent, cx| {
      match event {
        DispatcherEvent::TaskCompleted { message } => {
          this
            .pending_notifications
            .push((NotificationType::Success, message.clone()));
        }
        DispatcherEvent::TaskFailed { error } => {
          this
            .pending_notifications
            .push((NotificationType::Error, error.clone()));
        }
        DispatcherEvent::MachineReserved { contract_id, message } => {
          this
            .pending_notifications
            .push((NotificationType::Success, message.clone()));
          this.last_reserved = Some(contract_id.clone());
        }
      }
      cx.notify();
    })
    .detach();

    Self {
      cloud_state,
      pending_notifications: Vec::new(),
      last_reserved: None,
    }
  }

  fn render_reserved_banner(&self, cx: &mut Context<'_, Self>) -> Option<gpui::Div> {
    let contract_id = self.last_reserved.clone()?;
    let colors = cx.theme().colors;

    Some(
      h_flex()
        .w_full()
        .py(px(8.))
        .px(px(16.))
        .gap(px(12.))
        .items_center()
        .justify_between()
        .bg(colors.sidebar)
        .border_b_1()
        .border_color(colors.border)
        .child(
          div()
            .text_sm()
            .text_color(colors.foreground)
            .child(format!("Machine reserved - contract {contract_id}")),
        )
        .child(
          h_flex()
            .gap(px(4.))
            .child(
              Button::new("view-instance")
                .label("View Instance")
                .small()
                .primary()
                .on_click(cx.listener(move |this, _ev, _window, cx| {
                  if let Some(contract_id) = this.last_reserved.take() {
                    services::open_instance(contract_id, cx);
                  }
                  cx.notify();
                })),
            )
            .child(
              Button::new("dismiss-reserved")
                .label("Dismiss")
                .xsmall()
                .ghost()
                .on_click(cx.listener(|this, _ev, _window, cx| {
                  this.last_reserved = None;
                  cx.notify();
                })),
            ),
        ),
    )
  }

  fn render_offer_row(&self, offer: &OfferInfo, cx: &mut Context<'_, Self>) -> gpui::Div {
    let colors = cx.theme().colors;
    let offer_id = offer.id;
    let camera_count = offer.camera_capacity();

    h_flex()
      .w_full()
      .py(px(12.))
      .px(px(16.))
      .gap(px(12.))
      .items_center()
      .justify_between()
      .border_b_1()
      .border_color(colors.border)
      .child(
        v_flex()
          .gap(px(2.))
          .child(Label::new(offer.display_gpu()).text_color(colors.foreground))
          .child(
            div()
              .text_xs()
              .text_color(colors.muted_foreground)
              .child(format!(
                "{} cores - {} RAM - {} disk - {} cameras{}",
                offer.cpu_cores.map_or_else(|| "-".to_string(), |c| c.to_string()),
                offer.display_ram(),
                offer.display_disk(),
                camera_count,
                offer
                  .geolocation
                  .as_deref()
                  .map(|g| format!(" - {g}"))
                  .unwrap_or_default(),
              )),
          ),
      )
      .child(
        h_flex()
          .gap(px(12.))
          .items_center()
          .child(
            div()
              .text_sm()
              .text_color(colors.foreground)
              .child(offer.display_price()),
          )
          .child(
            Button::new(SharedString::from(format!("reserve-{offer_id}")))
              .label("Reserve")
              .small()
              .primary()
              .on_click(cx.listener(move |this, _ev, window, cx| {
                let tags = this.cloud_state.read(cx).image_tags.clone();
                open_reserve_machine_dialog(camera_count, tags, offer_id.to_string(), window, cx);
              })),
          ),
      )
  }
}

impl Render for OffersView {
  fn render(&mut self, window: &mut Window, cx: &mut Context<'_, Self>) -> impl IntoElement {
    // Push any pending notifications
    for (notification_type, message) in self.pending_notifications.drain(..) {
      window.push_notification((notification_type, SharedString::from(message)), cx);
    }

    let colors = cx.theme().colors;
    let state = self.cloud_state.read(cx);
    let offers = state.offers.clone();
    let offers_state = state.offers_state.clone();
    let is_loading = state.is_loading;

    let banner = self.render_reserved_banner(cx);

    v_flex()
      .size_full()
      .overflow_hidden()
      // Header
      .child(
        h_flex()
          .w_full()
          .py(px(12.))
          .px(px(16.))
          .items_center()
          .justify_between()
          .border_b_1()
          .border_color(colors.border)
          .child(Label::new("Offers").text_color(colors.foreground))
          .child(
            Button::new("refresh-offers")
              .label("Refresh")
              .xsmall()
              .ghost()
              .on_click(cx.listener(|_this, _ev, _window, cx| {
                services::refresh_offers(cx);
              })),
          ),
      )
      .children(banner)
      // Offer list
      .child(
        v_flex()
          .flex_1()
          .w_full()
          .overflow_y_scrollbar()
          .when(is_loading, |el| {
            el.child(
              div()
                .w_full()
                .p(px(16.))
                .text_sm()
                .text_color(colors.muted_foreground)
                .child("Loading offers..."),
            )
          })
          .when(!is_loading && offers.is_empty(), |el| {
            let hint = match &offers_state {
              LoadState::Error(e) => format!("Could not load offers: {e}"),
              _ => "No offers available. Check the API endpoint in Settings.".to_string(),
            };
            el.child(
              div()
                .w_full()
                .p(px(16.))
                .text_sm()
                .text_color(colors.muted_foreground)
                .child(hint),
            )
          })
          .children(offers.iter().map(|offer| self.render_offer_row(offer, cx))),
      )
  }
}
