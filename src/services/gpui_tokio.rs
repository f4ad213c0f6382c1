//! Bridge between the gpui main loop and a tokio runtime
//!
//! The marketplace client's futures need a tokio reactor, while gpui runs its
//! own executor. `Tokio::spawn` runs a future on a shared multi-thread tokio
//! runtime and hands back a future the gpui executor can await. The outer
//! `Result` reports the task being dropped runtime-side.

use std::future::Future;
use std::sync::OnceLock;

use futures::channel::oneshot;
use gpui::App;
use tokio::runtime::Runtime;

static RUNTIME: OnceLock<Runtime> = OnceLock::new();

fn runtime() -> &'static Runtime {
  RUNTIME.get_or_init(|| Runtime::new().expect("failed to start tokio runtime"))
}

/// Start the shared runtime eagerly so the first network call doesn't pay
/// for thread-pool creation
pub fn init(_cx: &mut App) {
  runtime();
}

pub struct Tokio;

impl Tokio {
  pub fn spawn<F>(_cx: &App, future: F) -> impl Future<Output = Result<F::Output, oneshot::Canceled>>
  where
    F: Future + Send + 'static,
    F::Output: Send + 'static,
  {
    let (tx, rx) = oneshot::channel();
    runtime().spawn(async move {
      // Receiver may be gone if the app quit mid-flight; nothing to do then
      let _ = tx.send(future.await);
    });
    rx
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_spawned_future_result_is_delivered() {
    runtime();
    let rx = {
      let (tx, rx) = oneshot::channel();
      runtime().spawn(async move {
        let _ = tx.send(21 * 2);
      });
      rx
    };
    let value = futures::executor::block_on(rx);
    assert_eq!(value, Ok(42));
  }
}
