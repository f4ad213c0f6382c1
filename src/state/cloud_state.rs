use gpui::{App, AppContext, Entity, EventEmitter, Global};

use crate::vast::{InstanceInfo, OfferInfo};

use super::app_state::CurrentView;

/// Event emitted when cloud state changes
#[derive(Clone, Debug)]
pub enum StateChanged {
  OffersUpdated,
  InstancesUpdated,
  ViewChanged,
  Loading,
  SettingsUpdated,
  /// Request to open a specific instance in the instances view
  InstanceTabRequest { contract_id: String },
}

/// Represents the load state of a resource
#[derive(Clone, Debug, Default, PartialEq)]
pub enum LoadState {
  #[default]
  NotLoaded,
  Loading,
  Loaded,
  Error(String),
}

/// Global cloud state - all views subscribe to this
pub struct CloudState {
  pub offers: Vec<OfferInfo>,
  pub instances: Vec<InstanceInfo>,
  /// Image tags offered in the reserve dialog, in configured order
  pub image_tags: Vec<String>,

  pub current_view: CurrentView,
  pub is_loading: bool,

  pub offers_state: LoadState,
  pub instances_state: LoadState,
}

impl CloudState {
  pub fn new() -> Self {
    Self {
      offers: Vec::new(),
      instances: Vec::new(),
      image_tags: Vec::new(),
      current_view: CurrentView::default(),
      is_loading: true,
      offers_state: LoadState::NotLoaded,
      instances_state: LoadState::NotLoaded,
    }
  }

  pub fn set_offers(&mut self, offers: Vec<OfferInfo>) {
    self.offers = offers;
    self.offers_state = LoadState::Loaded;
  }

  pub fn set_offers_error(&mut self, error: String) {
    self.offers_state = LoadState::Error(error);
  }

  pub fn set_instances(&mut self, instances: Vec<InstanceInfo>) {
    self.instances = instances;
    self.instances_state = LoadState::Loaded;
  }

  pub fn set_instances_error(&mut self, error: String) {
    self.instances_state = LoadState::Error(error);
  }

  pub fn set_image_tags(&mut self, tags: Vec<String>) {
    self.image_tags = tags;
  }

  pub fn get_offer(&self, id: u64) -> Option<&OfferInfo> {
    self.offers.iter().find(|o| o.id == id)
  }

  pub fn get_instance(&self, contract_id: &str) -> Option<&InstanceInfo> {
    self.instances.iter().find(|i| i.contract_id() == contract_id)
  }

  // Navigation
  pub fn set_view(&mut self, view: CurrentView) {
    self.current_view = view;
  }
}

impl Default for CloudState {
  fn default() -> Self {
    Self::new()
  }
}

// Enable event emission for reactive updates
impl EventEmitter<StateChanged> for CloudState {}

/// Global wrapper for `CloudState`
pub struct GlobalCloudState(pub Entity<CloudState>);

impl Global for GlobalCloudState {}

/// Initialize the global cloud state
pub fn init_cloud_state(cx: &mut App) -> Entity<CloudState> {
  let state = cx.new(|_cx| CloudState::new());
  cx.set_global(GlobalCloudState(state.clone()));
  state
}

/// Get the global cloud state entity
pub fn cloud_state(cx: &App) -> Entity<CloudState> {
  cx.global::<GlobalCloudState>().0.clone()
}

#[cfg(test)]
mod tests {
  use super::*;

  fn offer(id: u64, dph_total: f64) -> OfferInfo {
    OfferInfo {
      id,
      gpu_name: "RTX 3090".to_string(),
      num_gpus: 1,
      cpu_cores: None,
      cpu_ram: None,
      disk_space: None,
      dph_total,
      reliability: None,
      geolocation: None,
    }
  }

  #[test]
  fn test_cloud_state_initialization() {
    let state = CloudState::new();

    assert!(state.offers.is_empty());
    assert!(state.instances.is_empty());
    assert!(state.image_tags.is_empty());
    assert!(state.is_loading);
    assert_eq!(state.current_view, CurrentView::Offers);
    assert_eq!(state.offers_state, LoadState::NotLoaded);
    assert_eq!(state.instances_state, LoadState::NotLoaded);
  }

  #[test]
  fn test_cloud_state_offers() {
    let mut state = CloudState::new();

    state.set_offers(vec![offer(1, 0.2), offer(2, 0.4)]);
    assert_eq!(state.offers.len(), 2);
    assert_eq!(state.offers_state, LoadState::Loaded);
    assert!(state.get_offer(2).is_some());
    assert!(state.get_offer(3).is_none());

    state.set_offers_error("connect refused".to_string());
    assert_eq!(state.offers_state, LoadState::Error("connect refused".to_string()));
  }

  #[test]
  fn test_cloud_state_instances_lookup_by_contract_id() {
    let mut state = CloudState::new();
    state.set_instances(vec![InstanceInfo {
      id: 99,
      label: Some("bold-mast-004".to_string()),
      image: None,
      actual_status: Some("running".to_string()),
      dph_total: None,
      start_date: None,
    }]);

    assert_eq!(state.instances_state, LoadState::Loaded);
    assert!(state.get_instance("99").is_some());
    assert!(state.get_instance("98").is_none());
  }

  #[test]
  fn test_cloud_state_view_navigation() {
    let mut state = CloudState::new();

    state.set_view(CurrentView::Instances);
    assert_eq!(state.current_view, CurrentView::Instances);

    state.set_view(CurrentView::Settings);
    assert_eq!(state.current_view, CurrentView::Settings);
  }

  #[test]
  fn test_cloud_state_image_tags_keep_order() {
    let mut state = CloudState::new();
    state.set_image_tags(vec!["img:v1".to_string(), "img:v2".to_string()]);
    assert_eq!(state.image_tags, vec!["img:v1", "img:v2"]);
  }
}
