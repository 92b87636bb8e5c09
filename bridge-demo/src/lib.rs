pub mod demo_service;
pub mod restaurant;

pub use demo_service::{DemoCapabilityService, DemoData};
