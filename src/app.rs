//! Root view: sidebar navigation plus the current resource view

use gpui::{Context, Entity, Render, SharedString, Styled, Window, div, prelude::*, px};
use gpui_component::{
  Sizable,
  button::{Button, ButtonVariants},
  h_flex,
  label::Label,
  theme::ActiveTheme,
  v_flex,
};

use crate::services;
use crate::state::{CloudState, CurrentView, StateChanged, cloud_state};
use crate::ui::instances::InstancesView;
use crate::ui::offers::OffersView;
use crate::ui::settings_view::SettingsView;

pub struct AppView {
  cloud_state: Entity<CloudState>,
  offers_view: Entity<OffersView>,
  instances_view: Entity<InstancesView>,
  settings_view: Entity<SettingsView>,
}

impl AppView {
  pub fn new(_window: &mut Window, cx: &mut Context<'_, Self>) -> Self {
    let cloud_state = cloud_state(cx);

    let offers_view = cx.new(OffersView::new);
    let instances_view = cx.new(InstancesView::new);
    let settings_view = cx.new(SettingsView::new);

    cx.subscribe(&cloud_state, |_this, _state, event: &StateChanged, cx| {
      if matches!(event, StateChanged::ViewChanged) {
        cx.notify();
      }
    })
    .detach();

    Self {
      cloud_state,
      offers_view,
      instances_view,
      settings_view,
    }
  }

  fn render_nav_button(&self, view: CurrentView, current: CurrentView, cx: &mut Context<'_, Self>) -> impl IntoElement {
    Button::new(SharedString::from(format!("nav-{}", view.label())))
      .label(view.label())
      .small()
      .w_full()
      .when(view == current, ButtonVariants::primary)
      .when(view != current, ButtonVariants::ghost)
      .on_click(cx.listener(move |_this, _ev, _window, cx| {
        services::set_view(view, cx);
      }))
  }
}

impl Render for AppView {
  fn render(&mut self, _window: &mut Window, cx: &mut Context<'_, Self>) -> impl IntoElement {
    let colors = cx.theme().colors;
    let current = self.cloud_state.read(cx).current_view;

    h_flex()
      .size_full()
      .overflow_hidden()
      .bg(colors.background)
      // Sidebar
      .child(
        v_flex()
          .w(px(180.))
          .h_full()
          .flex_shrink_0()
          .gap(px(4.))
          .p(px(12.))
          .border_r_1()
          .border_color(colors.border)
          .bg(colors.sidebar)
          .child(
            div()
              .pb(px(12.))
              .child(Label::new("Berth").text_color(colors.foreground)),
          )
          .children(
            CurrentView::ALL
              .iter()
              .map(|view| self.render_nav_button(*view, current, cx)),
          ),
      )
      // Main content
      .child(
        div()
          .flex_1()
          .h_full()
          .overflow_hidden()
          .map(|el| match current {
            CurrentView::Offers => el.child(self.offers_view.clone()),
            CurrentView::Instances => el.child(self.instances_view.clone()),
            CurrentView::Settings => el.child(self.settings_view.clone()),
          }),
      )
  }
}
