/// Outbound adapters - Infrastructure implementations of outbound ports
pub mod filesystem;
pub mod formatters;
