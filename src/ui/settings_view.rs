use gpui::{
  App, Context, Entity, FocusHandle, Focusable, Hsla, Render, SharedString, Styled, Window, div, prelude::*, px,
};
use gpui_component::{
  Sizable, WindowExt,
  button::{Button, ButtonVariants},
  h_flex,
  input::{Input, InputState},
  label::Label,
  notification::NotificationType,
  scroll::ScrollableElement,
  theme::ActiveTheme,
  v_flex,
};

use crate::services::{self, DispatcherEvent, dispatcher};
use crate::state::{Settings, settings_state};

/// Settings view - marketplace endpoint, API key, and the image tags offered
/// in the reserve dialog
pub struct SettingsView {
  focus_handle: FocusHandle,

  api_url_input: Option<Entity<InputState>>,
  api_key_input: Option<Entity<InputState>>,
  image_tags_input: Option<Entity<InputState>>,

  pending_notifications: Vec<(NotificationType, String)>,
}

impl SettingsView {
  pub fn new(cx: &mut Context<'_, Self>) -> Self {
    let focus_handle = cx.focus_handle();

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
        DispatcherEvent::MachineReserved { .. } => {}
      }
      cx.notify();
    })
    .detach();

    Self {
      focus_handle,
      api_url_input: None,
      api_key_input: None,
      image_tags_input: None,
      pending_notifications: Vec::new(),
    }
  }

  fn ensure_inputs(&mut self, window: &mut Window, cx: &mut Context<'_, Self>) {
    let settings = settings_state(cx).read(cx).settings.clone();

    if self.api_url_input.is_none() {
      self.api_url_input = Some(cx.new(|cx| {
        let mut state = InputState::new(window, cx).placeholder("https://console.vast.ai");
        state.insert(&settings.api_url, window, cx);
        state
      }));
    }

    if self.api_key_input.is_none() {
      self.api_key_input = Some(cx.new(|cx| {
        let mut state = InputState::new(window, cx).placeholder("API key");
        state.insert(&settings.api_key, window, cx);
        state
      }));
    }

    if self.image_tags_input.is_none() {
      self.image_tags_input = Some(cx.new(|cx| {
        let mut state = InputState::new(window, cx)
          .multi_line(true)
          .placeholder("One image tag per line, e.g. registry/streamd:latest");
        state.insert(&settings.image_tags.join("\n"), window, cx);
        state
      }));
    }
  }

  /// Read the form back into a `Settings` value
  pub fn get_settings(&self, cx: &App) -> Settings {
    let api_url = self
      .api_url_input
      .as_ref()
      .map(|s| s.read(cx).text().to_string())
      .filter(|s| !s.is_empty())
      .unwrap_or_else(|| Settings::default().api_url);

    let api_key = self
      .api_key_input
      .as_ref()
      .map(|s| s.read(cx).text().to_string())
      .unwrap_or_default();

    let image_tags = self
      .image_tags_input
      .as_ref()
      .map(|s| parse_image_tags(&s.read(cx).text()))
      .unwrap_or_default();

    Settings {
      api_url,
      api_key,
      image_tags,
    }
  }

  fn on_save(&mut self, cx: &mut Context<'_, Self>) {
    let settings = self.get_settings(cx);
    services::apply_settings(settings, cx);
  }

  fn render_form_row(label: &'static str, content: impl IntoElement, border: Hsla, fg: Hsla) -> gpui::Div {
    h_flex()
      .w_full()
      .py(px(12.))
      .px(px(16.))
      .justify_between()
      .items_center()
      .border_b_1()
      .border_color(border)
      .child(Label::new(label).text_color(fg))
      .child(content)
  }
}

/// One tag per line, whitespace trimmed, blank lines skipped
pub fn parse_image_tags(text: &str) -> Vec<String> {
  text
    .lines()
    .map(str::trim)
    .filter(|line| !line.is_empty())
    .map(String::from)
    .collect()
}

impl Focusable for SettingsView {
  fn focus_handle(&self, _cx: &App) -> FocusHandle {
    self.focus_handle.clone()
  }
}

impl Render for SettingsView {
  fn render(&mut self, window: &mut Window, cx: &mut Context<'_, Self>) -> impl IntoElement {
    self.ensure_inputs(window, cx);

    // Push any pending notifications
    for (notification_type, message) in self.pending_notifications.drain(..) {
      window.push_notification((notification_type, SharedString::from(message)), cx);
    }

    let colors = cx.theme().colors;
    let api_url_input = self.api_url_input.clone().unwrap();
    let api_key_input = self.api_key_input.clone().unwrap();
    let image_tags_input = self.image_tags_input.clone().unwrap();

    v_flex()
      .size_full()
      .overflow_y_scrollbar()
      .child(
        div()
          .w_full()
          .px(px(16.))
          .py(px(12.))
          .text_sm()
          .text_color(colors.muted_foreground)
          .child("Marketplace account and the Docker images offered when reserving a machine."),
      )
      .child(Self::render_form_row(
        "API Endpoint",
        div().w(px(360.)).child(Input::new(&api_url_input).small()),
        colors.border,
        colors.foreground,
      ))
      .child(Self::render_form_row(
        "API Key",
        div().w(px(360.)).child(Input::new(&api_key_input).small()),
        colors.border,
        colors.foreground,
      ))
      .child(
        v_flex()
          .w_full()
          .py(px(12.))
          .px(px(16.))
          .gap(px(8.))
          .child(Label::new("Docker Images").text_color(colors.foreground))
          .child(
            div()
              .w_full()
              .h(px(120.))
              .border_1()
              .border_color(colors.border)
              .rounded(px(4.))
              .overflow_hidden()
              .child(Input::new(&image_tags_input).w_full().h_full()),
          ),
      )
      .child(
        h_flex().w_full().p(px(16.)).justify_end().child(
          Button::new("save-settings")
            .label("Save")
            .primary()
            .on_click(cx.listener(|this, _ev, _window, cx| {
              this.on_save(cx);
            })),
        ),
      )
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_parse_image_tags_trims_and_skips_blanks() {
    let tags = parse_image_tags("img:v1\n  img:v2  \n\n\nimg:v3\n");
    assert_eq!(tags, vec!["img:v1", "img:v2", "img:v3"]);
  }

  #[test]
  fn test_parse_image_tags_empty_input() {
    assert!(parse_image_tags("").is_empty());
    assert!(parse_image_tags("\n  \n").is_empty());
  }
}
