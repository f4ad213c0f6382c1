use std::cmp::Ordering;

use anyhow::{Result, anyhow};
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

use super::{InstanceInfo, OfferInfo, ReserveRequest, ReserveResponse};

/// HTTP client for the machine marketplace.
///
/// Owns the base URL and API key for the account; every method maps one
/// marketplace endpoint. Errors are returned as-is to the services layer,
/// which turns them into user-facing notifications.
pub struct VastClient {
  base_url: String,
  api_key: String,
  client: Client,
}

/// Wire row for an offer as returned by the bundles endpoint
#[derive(Debug, Deserialize)]
struct OfferRow {
  id: u64,
  gpu_name: Option<String>,
  num_gpus: Option<u32>,
  cpu_cores: Option<u32>,
  cpu_ram: Option<u64>,
  disk_space: Option<f64>,
  dph_total: Option<f64>,
  reliability2: Option<f64>,
  geolocation: Option<String>,
}

#[derive(Debug, Deserialize)]
struct BundlesResponse {
  #[serde(default)]
  offers: Vec<OfferRow>,
}

/// Wire row for an instance; timestamps arrive as epoch seconds
#[derive(Debug, Deserialize)]
struct InstanceRow {
  id: u64,
  label: Option<String>,
  image_uuid: Option<String>,
  actual_status: Option<String>,
  dph_total: Option<f64>,
  start_date: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct InstancesResponse {
  #[serde(default)]
  instances: Vec<InstanceRow>,
}

impl OfferRow {
  fn into_offer(self) -> OfferInfo {
    OfferInfo {
      id: self.id,
      gpu_name: self.gpu_name.unwrap_or_else(|| "unknown".to_string()),
      num_gpus: self.num_gpus.unwrap_or(1),
      cpu_cores: self.cpu_cores,
      cpu_ram: self.cpu_ram,
      disk_space: self.disk_space,
      dph_total: self.dph_total.unwrap_or_default(),
      reliability: self.reliability2,
      geolocation: self.geolocation,
    }
  }
}

impl InstanceRow {
  #[allow(clippy::cast_possible_truncation)]
  fn into_instance(self) -> InstanceInfo {
    let start_date = self
      .start_date
      .filter(|s| s.is_finite() && *s > 0.0)
      .and_then(|s| DateTime::<Utc>::from_timestamp(s as i64, 0));

    InstanceInfo {
      id: self.id,
      label: self.label,
      image: self.image_uuid,
      actual_status: self.actual_status,
      dph_total: self.dph_total,
      start_date,
    }
  }
}

impl VastClient {
  pub fn new(base_url: &str, api_key: &str) -> Self {
    let mut base_url = base_url.trim_end_matches('/').to_string();
    if !base_url.starts_with("http") {
      base_url = format!("https://{base_url}");
    }

    Self {
      base_url,
      api_key: api_key.to_string(),
      client: Client::new(),
    }
  }

  fn url(&self, path: &str) -> String {
    format!("{}{}", self.base_url, path)
  }

  /// List open offers, cheapest first
  pub async fn list_offers(&self) -> Result<Vec<OfferInfo>> {
    let url = self.url("/api/v0/bundles/");
    tracing::debug!("GET {url}");

    let response = self
      .client
      .get(&url)
      .query(&[("api_key", self.api_key.as_str())])
      .send()
      .await?
      .error_for_status()?;

    let body: BundlesResponse = response.json().await?;
    let mut offers: Vec<OfferInfo> = body.offers.into_iter().map(OfferRow::into_offer).collect();
    offers.sort_by(|a, b| a.dph_total.partial_cmp(&b.dph_total).unwrap_or(Ordering::Equal));
    Ok(offers)
  }

  /// List the account's machine instances, newest first
  pub async fn list_instances(&self) -> Result<Vec<InstanceInfo>> {
    let url = self.url("/api/v0/instances/");
    tracing::debug!("GET {url}");

    let response = self
      .client
      .get(&url)
      .query(&[("api_key", self.api_key.as_str())])
      .send()
      .await?
      .error_for_status()?;

    let body: InstancesResponse = response.json().await?;
    let mut instances: Vec<InstanceInfo> = body.instances.into_iter().map(InstanceRow::into_instance).collect();
    instances.sort_by(|a, b| b.start_date.cmp(&a.start_date));
    Ok(instances)
  }

  /// Reserve the offer named by `request.ask_contract_id`.
  ///
  /// Called exactly once per dialog submission; the request is built by the
  /// caller and sent unchanged.
  pub async fn start_machine(&self, request: &ReserveRequest) -> Result<ReserveResponse> {
    let url = self.url(&format!("/api/v0/asks/{}/", request.ask_contract_id));
    tracing::debug!("PUT {url}");

    let body = json!({
      "client_id": "me",
      "image": request.docker_image,
      "label": request.machine_name,
      "onstart": request.on_start_script,
    });

    let response = self
      .client
      .put(&url)
      .query(&[("api_key", self.api_key.as_str())])
      .json(&body)
      .send()
      .await?
      .error_for_status()?;

    let reserved: ReserveResponse = response.json().await?;
    if !reserved.success {
      return Err(anyhow!("reservation rejected by marketplace"));
    }
    Ok(reserved)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_new_normalizes_base_url() {
    let client = VastClient::new("console.vast.ai", "key");
    assert_eq!(client.base_url, "https://console.vast.ai");

    let client = VastClient::new("http://localhost:8080/", "key");
    assert_eq!(client.base_url, "http://localhost:8080");
    assert_eq!(client.url("/api/v0/bundles/"), "http://localhost:8080/api/v0/bundles/");
  }

  #[test]
  fn test_offer_row_mapping_fills_defaults() {
    let row: OfferRow = serde_json::from_str(r#"{"id": 9, "dph_total": 0.2}"#).unwrap();
    let offer = row.into_offer();
    assert_eq!(offer.id, 9);
    assert_eq!(offer.gpu_name, "unknown");
    assert_eq!(offer.num_gpus, 1);
    assert!(offer.cpu_ram.is_none());
  }

  #[test]
  fn test_instance_row_mapping_converts_timestamp() {
    let row: InstanceRow =
      serde_json::from_str(r#"{"id": 5, "label": "calm-quay-001", "start_date": 1700000000.5}"#).unwrap();
    let instance = row.into_instance();
    assert_eq!(instance.id, 5);
    assert_eq!(instance.label.as_deref(), Some("calm-quay-001"));
    assert!(instance.start_date.is_some());

    let row: InstanceRow = serde_json::from_str(r#"{"id": 6, "start_date": -1.0}"#).unwrap();
    assert!(row.into_instance().start_date.is_none());
  }
}
