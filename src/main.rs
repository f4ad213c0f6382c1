//! Berth - a native desktop client for reserving GPU compute on a
//! Vast.ai-style marketplace.

mod app;
mod services;
mod state;
mod ui;
mod utils;
mod vast;

use gpui::{App, AppContext, Application, Bounds, WindowBounds, WindowOptions, px, size};
use gpui_component::Root;

use crate::app::AppView;

fn main() {
  tracing_subscriber::fmt().init();

  let app = Application::new().with_assets(gpui_component_assets::Assets);

  app.run(|cx: &mut App| {
    gpui_component::init(cx);

    services::init_services(cx);
    services::load_initial_data(cx);

    let bounds = Bounds::centered(None, size(px(1100.), px(760.)), cx);
    let options = WindowOptions {
      window_bounds: Some(WindowBounds::Windowed(bounds)),
      ..Default::default()
    };

    let window = cx.open_window(options, |window, cx| {
      let view = cx.new(|cx| AppView::new(window, cx));
      cx.new(|cx| Root::new(view.into(), window, cx))
    });

    if let Err(e) = window {
      tracing::error!("Failed to open main window: {e}");
    }

    cx.activate(true);
  });
}
