#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CurrentView {
  #[default]
  Offers,
  Instances,
  Settings,
}

impl CurrentView {
  pub const ALL: [CurrentView; 3] = [CurrentView::Offers, CurrentView::Instances, CurrentView::Settings];

  pub fn label(self) -> &'static str {
    match self {
      CurrentView::Offers => "Offers",
      CurrentView::Instances => "Instances",
      CurrentView::Settings => "Settings",
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_current_view_default() {
    assert_eq!(CurrentView::default(), CurrentView::Offers);
  }

  #[test]
  fn test_current_view_labels() {
    assert_eq!(CurrentView::ALL.len(), 3);
    assert_eq!(CurrentView::Offers.label(), "Offers");
    assert_eq!(CurrentView::Instances.label(), "Instances");
    assert_eq!(CurrentView::Settings.label(), "Settings");
  }
}
