use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// How many camera streams a single GPU is budgeted to serve.
///
/// Capacity planning constant for the stream agent; offers advertise
/// `num_gpus * STREAMS_PER_GPU` camera slots in the offers view.
pub const STREAMS_PER_GPU: u32 = 8;

/// A rentable machine offer on the marketplace
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OfferInfo {
  pub id: u64,
  pub gpu_name: String,
  pub num_gpus: u32,
  pub cpu_cores: Option<u32>,
  /// Host RAM in megabytes
  pub cpu_ram: Option<u64>,
  /// Rentable disk in gigabytes
  pub disk_space: Option<f64>,
  /// Price for the whole machine, USD per hour
  pub dph_total: f64,
  pub reliability: Option<f64>,
  pub geolocation: Option<String>,
}

impl OfferInfo {
  /// Number of camera streams a machine from this offer can serve
  pub fn camera_capacity(&self) -> u32 {
    self.num_gpus.max(1) * STREAMS_PER_GPU
  }

  pub fn display_gpu(&self) -> String {
    format!("{}x {}", self.num_gpus, self.gpu_name)
  }

  pub fn display_ram(&self) -> String {
    self
      .cpu_ram
      .map_or_else(|| "-".to_string(), |mb| bytesize::ByteSize::mib(mb).to_string())
  }

  #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
  pub fn display_disk(&self) -> String {
    self
      .disk_space
      .filter(|gb| *gb >= 0.0)
      .map_or_else(|| "-".to_string(), |gb| bytesize::ByteSize::gib(gb as u64).to_string())
  }

  pub fn display_price(&self) -> String {
    format!("${:.3}/hr", self.dph_total)
  }
}

/// A machine instance created from a reserved offer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstanceInfo {
  pub id: u64,
  pub label: Option<String>,
  pub image: Option<String>,
  pub actual_status: Option<String>,
  pub dph_total: Option<f64>,
  pub start_date: Option<DateTime<Utc>>,
}

impl InstanceInfo {
  pub fn contract_id(&self) -> String {
    self.id.to_string()
  }

  pub fn display_name(&self) -> String {
    self
      .label
      .clone()
      .filter(|l| !l.is_empty())
      .unwrap_or_else(|| format!("instance-{}", self.id))
  }

  pub fn display_status(&self) -> String {
    self
      .actual_status
      .clone()
      .unwrap_or_else(|| "unknown".to_string())
  }
}

/// Payload sent to reserve an offer. Built once at submit time and never
/// mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReserveRequest {
  pub machine_name: String,
  pub docker_image: String,
  pub on_start_script: String,
  pub ask_contract_id: String,
}

/// Marketplace reply to a reservation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReserveResponse {
  #[serde(default)]
  pub success: bool,
  pub new_contract: u64,
}

impl ReserveResponse {
  /// Contract id of the created instance, as used by navigation and events
  pub fn contract_id(&self) -> String {
    self.new_contract.to_string()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn offer() -> OfferInfo {
    OfferInfo {
      id: 42,
      gpu_name: "RTX 4090".to_string(),
      num_gpus: 2,
      cpu_cores: Some(16),
      cpu_ram: Some(64 * 1024),
      disk_space: Some(100.0),
      dph_total: 0.412,
      reliability: Some(0.99),
      geolocation: Some("Sweden".to_string()),
    }
  }

  #[test]
  fn test_camera_capacity_scales_with_gpus() {
    let mut offer = offer();
    assert_eq!(offer.camera_capacity(), 2 * STREAMS_PER_GPU);

    offer.num_gpus = 0;
    assert_eq!(offer.camera_capacity(), STREAMS_PER_GPU);
  }

  #[test]
  fn test_offer_display_helpers() {
    let offer = offer();
    assert_eq!(offer.display_gpu(), "2x RTX 4090");
    assert_eq!(offer.display_price(), "$0.412/hr");
    assert!(offer.display_ram().contains("64"));
    assert!(offer.display_disk().contains("100"));
  }

  #[test]
  fn test_offer_display_helpers_missing_fields() {
    let offer = OfferInfo {
      cpu_ram: None,
      disk_space: None,
      ..offer()
    };
    assert_eq!(offer.display_ram(), "-");
    assert_eq!(offer.display_disk(), "-");
  }

  #[test]
  fn test_instance_display_name_falls_back_to_id() {
    let instance = InstanceInfo {
      id: 77,
      label: None,
      image: None,
      actual_status: None,
      dph_total: None,
      start_date: None,
    };
    assert_eq!(instance.display_name(), "instance-77");
    assert_eq!(instance.contract_id(), "77");
    assert_eq!(instance.display_status(), "unknown");

    let labeled = InstanceInfo {
      label: Some("calm-quay-001".to_string()),
      actual_status: Some("running".to_string()),
      ..instance
    };
    assert_eq!(labeled.display_name(), "calm-quay-001");
    assert_eq!(labeled.display_status(), "running");
  }

  #[test]
  fn test_reserve_request_wire_field_names() {
    let request = ReserveRequest {
      machine_name: "keen-tide-003".to_string(),
      docker_image: "img:v2".to_string(),
      on_start_script: "echo hi".to_string(),
      ask_contract_id: "offer-42".to_string(),
    };
    let value = serde_json::to_value(&request).unwrap();
    assert_eq!(value["machine_name"], "keen-tide-003");
    assert_eq!(value["docker_image"], "img:v2");
    assert_eq!(value["on_start_script"], "echo hi");
    assert_eq!(value["ask_contract_id"], "offer-42");
  }

  #[test]
  fn test_reserve_response_contract_id() {
    let response: ReserveResponse = serde_json::from_str(r#"{"success": true, "new_contract": 7835610}"#).unwrap();
    assert!(response.success);
    assert_eq!(response.contract_id(), "7835610");
  }
}
