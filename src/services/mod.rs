//! Application services layer
//!
//! This module contains all the async operations and dispatchers for the application.
//! It is organized into submodules by concern:
//!
//! - `core` - Dispatcher types and marketplace client management
//! - `offers` / `instances` - Marketplace resource refreshes
//! - `reservations` - The reserve-machine submit path
//! - `navigation` - View navigation and instance routing
//! - `init` - Client construction and initial data loading

mod core;
mod gpui_tokio;
mod init;
mod instances;
mod navigation;
mod offers;
mod reservations;
mod task_manager;

pub use core::*;
pub use gpui_tokio::Tokio;
pub use init::*;
pub use instances::*;
pub use navigation::*;
pub use offers::*;
pub use reservations::*;
pub use task_manager::*;

use gpui::App;

use crate::state::{init_cloud_state, init_settings};

/// Initialize all global services
pub fn init_services(cx: &mut App) {
  // Initialize tokio runtime first (required for the marketplace client)
  gpui_tokio::init(cx);

  // Initialize state
  init_cloud_state(cx);
  init_settings(cx);

  // Initialize services
  init_task_manager(cx);
  init_dispatcher(cx);
}
