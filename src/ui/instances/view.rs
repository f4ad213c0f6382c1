use gpui::{Context, Entity, Render, Styled, Window, div, prelude::*, px};
use gpui_component::{
  Sizable,
  button::{Button, ButtonVariants},
  h_flex,
  label::Label,
  scroll::ScrollableElement,
  theme::ActiveTheme,
  v_flex,
};

use crate::services;
use crate::state::{CloudState, LoadState, StateChanged, cloud_state};
use crate::vast::InstanceInfo;

/// Self-contained Instances view - lists reserved machines.
///
/// Navigation target of the reserve flow: an `InstanceTabRequest` selects the
/// named contract, which is how the success notification's action lands here.
pub struct InstancesView {
  cloud_state: Entity<CloudState>,
  selected_contract: Option<String>,
}

impl InstancesView {
  pub fn new(cx: &mut Context<'_, Self>) -> Self {
    let cloud_state = cloud_state(cx);

    // Subscribe to state changes
    cx.subscribe(&cloud_state, |this, state, event: &StateChanged, cx| match event {
      StateChanged::InstancesUpdated => {
        // If the selected instance disappeared, clear the selection
        if let Some(ref selected) = this.selected_contract {
          let state = state.read(cx);
          if state.get_instance(selected).is_none() {
            this.selected_contract = None;
          }
        }
        cx.notify();
      }
      StateChanged::InstanceTabRequest { contract_id } => {
        this.selected_contract = Some(contract_id.clone());
        cx.notify();
      }
      _ => {}
    })
    .detach();

    Self {
      cloud_state,
      selected_contract: None,
    }
  }

  fn render_instance_row(&self, instance: &InstanceInfo, cx: &mut Context<'_, Self>) -> gpui::Div {
    let colors = cx.theme().colors;
    let contract_id = instance.contract_id();
    let selected = self.selected_contract.as_deref() == Some(contract_id.as_str());

    let started = instance
      .start_date
      .map_or_else(|| "not started".to_string(), |d| d.format("%Y-%m-%d %H:%M UTC").to_string());

    h_flex()
      .w_full()
      .py(px(12.))
      .px(px(16.))
      .gap(px(12.))
      .items_center()
      .justify_between()
      .border_b_1()
      .border_color(colors.border)
      .when(selected, |el| el.bg(colors.sidebar))
      .child(
        v_flex()
          .gap(px(2.))
          .child(Label::new(instance.display_name()).text_color(colors.foreground))
          .child(
            div()
              .text_xs()
              .text_color(colors.muted_foreground)
              .child(format!(
                "contract {contract_id} - {} - {}{}",
                instance.display_status(),
                started,
                instance
                  .image
                  .as_deref()
                  .map(|i| format!(" - {i}"))
                  .unwrap_or_default(),
              )),
          ),
      )
      .child(
        div()
          .text_sm()
          .text_color(colors.foreground)
          .child(
            instance
              .dph_total
              .map_or_else(|| "-".to_string(), |dph| format!("${dph:.3}/hr")),
          ),
      )
  }
}

impl Render for InstancesView {
  fn render(&mut self, _window: &mut Window, cx: &mut Context<'_, Self>) -> impl IntoElement {
    let colors = cx.theme().colors;
    let state = self.cloud_state.read(cx);
    let instances = state.instances.clone();
    let instances_state = state.instances_state.clone();

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
          .child(Label::new("Instances").text_color(colors.foreground))
          .child(
            Button::new("refresh-instances")
              .label("Refresh")
              .xsmall()
              .ghost()
              .on_click(cx.listener(|_this, _ev, _window, cx| {
                services::refresh_instances(cx);
              })),
          ),
      )
      // Instance list
      .child(
        v_flex()
          .flex_1()
          .w_full()
          .overflow_y_scrollbar()
          .when(instances.is_empty(), |el| {
            let hint = match &instances_state {
              LoadState::Error(e) => format!("Could not load instances: {e}"),
              _ => "No instances yet. Reserve a machine from the Offers view.".to_string(),
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
          .children(
            instances
              .iter()
              .map(|instance| self.render_instance_row(instance, cx)),
          ),
      )
  }
}
