// Re-export commonly used test types and utilities
pub use access_bridge::{BridgeConfig, Dispatcher, ResultSource};
pub use bridge_demo::{restaurant, DemoCapabilityService};

/// Dispatcher backed by the embedded demo tables
pub fn demo_dispatcher() -> anyhow::Result<Dispatcher> {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();

    let service = DemoCapabilityService::new()?;
    Ok(Dispatcher::new(Box::new(service), BridgeConfig::default()))
}
