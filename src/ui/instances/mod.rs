pub mod view;

pub use view::InstancesView;
