//! Utility functions for the application

use chrono::Utc;

/// Word pools for generated machine labels
const LABEL_ADJECTIVES: &[&str] = &[
  "amber", "bold", "calm", "deep", "eager", "fleet", "keen", "lucid", "noble", "swift",
];
const LABEL_NOUNS: &[&str] = &[
  "anchor", "beacon", "channel", "harbor", "jetty", "keel", "lantern", "mast", "quay", "tide",
];

/// Generate a default label for a new machine reservation.
///
/// Labels only seed the name field in the reserve dialog; they don't need to
/// be unique, just distinguishable in the instances list.
pub fn machine_label() -> String {
  let millis = Utc::now().timestamp_millis().unsigned_abs();
  let adjective = LABEL_ADJECTIVES[usize::try_from(millis / 7919).unwrap_or_default() % LABEL_ADJECTIVES.len()];
  let noun = LABEL_NOUNS[usize::try_from(millis / 13).unwrap_or_default() % LABEL_NOUNS.len()];
  format!("{adjective}-{noun}-{:03}", millis % 1000)
}

/// Build the default on-start script for a machine serving `camera_count` streams.
///
/// The script runs inside the reserved container: it opens a detached screen
/// session and launches the stream agent in it. The count is interpolated
/// verbatim; the operator may edit the script freely before submitting.
pub fn start_command(camera_count: u32) -> String {
  format!(
    "screen -dmS berth; screen -S berth -X stuff 'python3 /opt/berth/stream_agent.py --cameras {camera_count} &\\n'"
  )
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_machine_label_shape() {
    let label = machine_label();
    assert!(!label.is_empty());
    let parts: Vec<&str> = label.split('-').collect();
    assert_eq!(parts.len(), 3);
    assert!(LABEL_ADJECTIVES.contains(&parts[0]));
    assert!(LABEL_NOUNS.contains(&parts[1]));
    assert_eq!(parts[2].len(), 3);
    assert!(parts[2].chars().all(|c| c.is_ascii_digit()));
  }

  #[test]
  fn test_start_command_embeds_camera_count() {
    for count in [1_u32, 3, 16, 128] {
      let command = start_command(count);
      assert!(command.contains(&format!("--cameras {count}")));
    }
  }

  #[test]
  fn test_start_command_uses_detached_screen_session() {
    let command = start_command(4);
    assert!(command.starts_with("screen -dmS "));
    assert!(command.contains("stream_agent.py"));
    assert!(command.ends_with("&\\n'"));
  }
}
