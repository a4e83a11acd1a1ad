//! Provider registry: orders providers by priority and fails over between them.

mod provider_registry;

pub use provider_registry::ProviderRegistry;
