//! Section navigation over the report dashboard

pub mod navigator;

pub use navigator::{NavigationTarget, NavigatorState, SectionNavigator, StepTimeouts, wait_for_url_change};
