use gpui::{
  App, Context, Entity, FocusHandle, Focusable, Hsla, Render, SharedString, Styled, Window, div, prelude::*, px, rgb,
};
use gpui_component::{
  IndexPath, Sizable, h_flex,
  input::{Input, InputState},
  label::Label,
  scroll::ScrollableElement,
  select::{Select, SelectItem, SelectState},
  theme::ActiveTheme,
  v_flex,
};

use crate::services::{self, DispatcherEvent, RESERVE_ERROR_PREFIX, dispatcher};
use crate::utils::{machine_label, start_command};
use crate::vast::ReserveRequest;

/// A selectable container image tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageTag(pub String);

impl SelectItem for ImageTag {
  type Value = ImageTag;

  fn title(&self) -> SharedString {
    self.0.clone().into()
  }

  fn value(&self) -> &Self::Value {
    self
  }
}

/// Default image choice given the configured tags
pub fn default_image(tags: &[String]) -> String {
  tags.first().cloned().unwrap_or_default()
}

/// Submission phase of the dialog. Confirm only acts in `Idle`; a failed
/// submission drops back to `Idle` so the operator can try again by hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmitPhase {
  #[default]
  Idle,
  Submitting,
  Settled,
}

/// A field that failed shape validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
  pub field: &'static str,
  pub message: String,
}

/// User-editable reservation form values
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReserveFormInput {
  pub machine_name: String,
  pub docker_image: String,
  pub camera_count: u32,
  pub command: String,
}

impl ReserveFormInput {
  /// Shape check on the submission payload. The string fields are strings
  /// by construction; the camera count must be a positive integer. Nothing
  /// semantic is checked here - not emptiness, not tag membership, not
  /// script syntax.
  pub fn validate(&self) -> Vec<FieldError> {
    let mut errors = Vec::new();
    if self.camera_count == 0 {
      errors.push(FieldError {
        field: "camera_count",
        message: "Camera count must be a positive integer".to_string(),
      });
    }
    errors
  }

  /// Build the immutable reservation payload
  pub fn into_request(self, offer_id: &str) -> ReserveRequest {
    ReserveRequest {
      machine_name: self.machine_name,
      docker_image: self.docker_image,
      on_start_script: self.command,
      ask_contract_id: offer_id.to_string(),
    }
  }
}

/// Dialog for reserving a machine from a marketplace offer
pub struct ReserveDialog {
  focus_handle: FocusHandle,

  // Props fixed at open time
  offer_id: String,
  camera_count: u32,
  docker_tags: Vec<String>,

  // Defaults computed once so reads stay stable across renders
  default_name: String,
  default_command: String,

  // Input states
  name_input: Option<Entity<InputState>>,
  command_input: Option<Entity<InputState>>,
  image_select: Option<Entity<SelectState<Vec<ImageTag>>>>,

  phase: SubmitPhase,
  field_errors: Vec<FieldError>,
}

impl ReserveDialog {
  pub fn new(camera_count: u32, docker_tags: Vec<String>, offer_id: String, cx: &mut Context<'_, Self>) -> Self {
    let focus_handle = cx.focus_handle();

    // Track the outcome of our own submission so Confirm stays inert while
    // a request is in flight
    let disp = dispatcher(cx);
    cx.subscribe(&disp, |this, _disp, event: &DispatcherEvent, cx| {
      if this.phase != SubmitPhase::Submitting {
        return;
      }
      match event {
        DispatcherEvent::MachineReserved { .. } => {
          this.phase = SubmitPhase::Settled;
          cx.notify();
        }
        DispatcherEvent::TaskFailed { error } if error.starts_with(RESERVE_ERROR_PREFIX) => {
          this.phase = SubmitPhase::Idle;
          cx.notify();
        }
        _ => {}
      }
    })
    .detach();

    Self {
      focus_handle,
      offer_id,
      camera_count,
      docker_tags,
      default_name: machine_label(),
      default_command: start_command(camera_count),
      name_input: None,
      command_input: None,
      image_select: None,
      phase: SubmitPhase::default(),
      field_errors: Vec::new(),
    }
  }

  fn ensure_inputs(&mut self, window: &mut Window, cx: &mut Context<'_, Self>) {
    if self.name_input.is_none() {
      let default_name = self.default_name.clone();
      self.name_input = Some(cx.new(|cx| {
        let mut state = InputState::new(window, cx).placeholder("Machine name");
        state.insert(&default_name, window, cx);
        state
      }));
    }

    if self.command_input.is_none() {
      let default_command = self.default_command.clone();
      self.command_input = Some(cx.new(|cx| {
        let mut state = InputState::new(window, cx)
          .multi_line(true)
          .code_editor("bash")
          .placeholder("Command to start the container");
        state.insert(&default_command, window, cx);
        state
      }));
    }

    if self.image_select.is_none() {
      let tags: Vec<ImageTag> = self.docker_tags.iter().cloned().map(ImageTag).collect();
      let selected = if tags.is_empty() { None } else { Some(IndexPath::new(0)) };
      self.image_select = Some(cx.new(|cx| SelectState::new(tags, selected, window, cx)));
    }
  }

  pub fn is_submitting(&self) -> bool {
    self.phase == SubmitPhase::Submitting
  }

  pub fn phase(&self) -> SubmitPhase {
    self.phase
  }

  /// Current form values, falling back to the computed defaults for inputs
  /// that have not been rendered yet
  pub fn get_input(&self, cx: &App) -> ReserveFormInput {
    let machine_name = self
      .name_input
      .as_ref()
      .map_or_else(|| self.default_name.clone(), |s| s.read(cx).text().to_string());

    let docker_image = self
      .image_select
      .as_ref()
      .and_then(|s| s.read(cx).selected_value().cloned())
      .map_or_else(|| default_image(&self.docker_tags), |tag| tag.0);

    let command = self
      .command_input
      .as_ref()
      .map_or_else(|| self.default_command.clone(), |s| s.read(cx).text().to_string());

    ReserveFormInput {
      machine_name,
      docker_image,
      camera_count: self.camera_count,
      command,
    }
  }

  /// Validate and submit the reservation. No-op unless the dialog is idle;
  /// each confirm issues at most one marketplace call.
  pub fn submit(&mut self, cx: &mut Context<'_, Self>) {
    if self.phase != SubmitPhase::Idle {
      return;
    }

    let input = self.get_input(cx);
    let errors = input.validate();
    if !errors.is_empty() {
      self.field_errors = errors;
      cx.notify();
      return;
    }

    self.field_errors.clear();
    let request = input.into_request(&self.offer_id);
    self.phase = SubmitPhase::Submitting;
    services::reserve_machine(request, cx);
    cx.notify();
  }
}

impl Focusable for ReserveDialog {
  fn focus_handle(&self, _cx: &App) -> FocusHandle {
    self.focus_handle.clone()
  }
}

impl Render for ReserveDialog {
  fn render(&mut self, window: &mut Window, cx: &mut Context<'_, Self>) -> impl IntoElement {
    self.ensure_inputs(window, cx);
    let colors = cx.theme().colors;

    let name_input = self.name_input.clone().unwrap();
    let command_input = self.command_input.clone().unwrap();
    let image_select = self.image_select.clone().unwrap();
    let camera_count = self.camera_count;
    let phase = self.phase;

    // Helper to render form row
    let render_form_row = |label: &'static str, content: gpui::AnyElement, border: Hsla, fg: Hsla| {
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
    };

    v_flex()
      .w_full()
      .max_h(px(500.))
      .overflow_y_scrollbar()
      // Description
      .child(
        div()
          .w_full()
          .px(px(16.))
          .py(px(12.))
          .text_sm()
          .text_color(colors.muted_foreground)
          .child(format!(
            "Reserve this machine to serve {camera_count} camera streams. The start command runs inside the container once the instance boots."
          )),
      )
      // Machine name
      .child(render_form_row(
        "Machine Name",
        div().w(px(320.)).child(Input::new(&name_input).small()).into_any_element(),
        colors.border,
        colors.foreground,
      ))
      // Docker image
      .child(render_form_row(
        "Docker Image",
        div()
          .w(px(320.))
          .child(Select::new(&image_select).small())
          .into_any_element(),
        colors.border,
        colors.foreground,
      ))
      // Start command
      .child(
        v_flex()
          .w_full()
          .py(px(12.))
          .px(px(16.))
          .gap(px(8.))
          .child(Label::new("Command").text_color(colors.foreground))
          .child(
            div()
              .w_full()
              .h(px(120.))
              .border_1()
              .border_color(colors.border)
              .rounded(px(4.))
              .overflow_hidden()
              .child(Input::new(&command_input).w_full().h_full()),
          ),
      )
      // Shape-validation feedback
      .children(self.field_errors.iter().map(|error| {
        div()
          .w_full()
          .px(px(16.))
          .py(px(4.))
          .text_sm()
          .text_color(rgb(0xf7768e))
          .child(error.message.clone())
      }))
      // In-flight status line
      .when(phase == SubmitPhase::Submitting, |el| {
        el.child(
          div()
            .w_full()
            .px(px(16.))
            .py(px(8.))
            .text_sm()
            .text_color(colors.muted_foreground)
            .child("Submitting reservation..."),
        )
      })
      .when(phase == SubmitPhase::Settled, |el| {
        el.child(
          div()
            .w_full()
            .px(px(16.))
            .py(px(8.))
            .text_sm()
            .text_color(colors.muted_foreground)
            .child("Reservation submitted."),
        )
      })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::services::init_dispatcher;

  // Pure function tests

  #[test]
  fn test_default_image_is_first_tag() {
    let tags = vec!["img:v1".to_string(), "img:v2".to_string()];
    assert_eq!(default_image(&tags), "img:v1");
  }

  #[test]
  fn test_default_image_empty_tags() {
    assert_eq!(default_image(&[]), "");
  }

  #[test]
  fn test_validate_accepts_positive_camera_count() {
    let input = ReserveFormInput {
      machine_name: "keen-tide-003".to_string(),
      docker_image: "img:v1".to_string(),
      camera_count: 3,
      command: start_command(3),
    };
    assert!(input.validate().is_empty());
  }

  #[test]
  fn test_validate_rejects_zero_camera_count() {
    let input = ReserveFormInput {
      machine_name: String::new(),
      docker_image: String::new(),
      camera_count: 0,
      command: String::new(),
    };
    let errors = input.validate();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].field, "camera_count");
  }

  #[test]
  fn test_into_request_builds_payload() {
    let name = machine_label();
    let input = ReserveFormInput {
      machine_name: name.clone(),
      docker_image: "img:v2".to_string(),
      camera_count: 3,
      command: start_command(3),
    };

    let request = input.into_request("offer-42");
    assert_eq!(request.machine_name, name);
    assert_eq!(request.docker_image, "img:v2");
    assert_eq!(request.on_start_script, start_command(3));
    assert_eq!(request.ask_contract_id, "offer-42");
  }

  #[test]
  fn test_image_tag_select_item() {
    let tag = ImageTag("img:v2".to_string());
    assert_eq!(tag.title().as_ref(), "img:v2");
    assert_eq!(*tag.value(), ImageTag("img:v2".to_string()));
  }

  // GPUI Component Tests

  fn tags() -> Vec<String> {
    vec!["img:v1".to_string(), "img:v2".to_string()]
  }

  #[gpui::test]
  fn test_reserve_dialog_creation(cx: &mut gpui::TestAppContext) {
    cx.update(init_dispatcher);
    let dialog = cx.new(|cx| ReserveDialog::new(3, tags(), "offer-42".to_string(), cx));

    dialog.read_with(cx, |dialog, _| {
      // Inputs are lazily initialized on render
      assert!(dialog.name_input.is_none());
      assert!(dialog.command_input.is_none());
      assert!(dialog.image_select.is_none());
      assert_eq!(dialog.phase(), SubmitPhase::Idle);
      assert!(!dialog.is_submitting());
    });
  }

  #[gpui::test]
  fn test_reserve_dialog_defaults(cx: &mut gpui::TestAppContext) {
    cx.update(init_dispatcher);
    let dialog = cx.new(|cx| ReserveDialog::new(3, tags(), "offer-42".to_string(), cx));

    dialog.read_with(cx, |dialog, cx| {
      let input = dialog.get_input(cx);
      assert_eq!(input.machine_name, dialog.default_name);
      assert_eq!(input.docker_image, "img:v1");
      assert_eq!(input.camera_count, 3);
      assert_eq!(input.command, start_command(3));
      assert!(input.command.contains("--cameras 3"));
    });
  }

  #[gpui::test]
  fn test_reserve_dialog_defaults_without_tags(cx: &mut gpui::TestAppContext) {
    cx.update(init_dispatcher);
    let dialog = cx.new(|cx| ReserveDialog::new(8, Vec::new(), "offer-7".to_string(), cx));

    dialog.read_with(cx, |dialog, cx| {
      let input = dialog.get_input(cx);
      assert_eq!(input.docker_image, "");
      assert_eq!(input.camera_count, 8);
    });
  }

  #[gpui::test]
  fn test_reserve_dialog_focus_handle(cx: &mut gpui::TestAppContext) {
    cx.update(init_dispatcher);
    let dialog = cx.new(|cx| ReserveDialog::new(3, tags(), "offer-42".to_string(), cx));

    // Verify focus handle can be obtained
    cx.update(|cx| {
      let _handle = dialog.read(cx).focus_handle(cx);
    });
  }
}
