/// Ports module defining interfaces for hexagonal architecture
///
/// Outbound ports are the infrastructure interfaces the application core
/// depends on (snapshot persistence, document formatting, output
/// presentation).
pub mod outbound;
