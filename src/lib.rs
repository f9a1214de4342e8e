//! cbom - Bill of Materials manager for hardware and cryptographic assets
//!
//! This library tracks physical components and cryptographic assets in a
//! single inventory, following hexagonal architecture and Domain-Driven
//! Design principles.
//!
//! # Architecture
//!
//! The library is organized into the following layers:
//!
//! - **Domain Layer** (`inventory::domain`): Assets, BOMs, assemblies, audit log
//! - **Policies** (`inventory::policies`): Weak-algorithm table and scoring weights
//! - **Services** (`inventory::services`): Validators and risk/posture analyses
//! - **Versioning** (`versioning`): Immutable snapshots, diff, restore, cleanup
//! - **Ports** (`ports`): Interface definitions for infrastructure
//! - **Adapters** (`adapters`): Concrete implementations of ports
//! - **Shared** (`shared`): Common utilities and error types
//!
//! # Example
//!
//! ```no_run
//! use cbom::prelude::*;
//! use std::path::PathBuf;
//!
//! # fn main() -> Result<()> {
//! let mut bom = Bom::new("Gadget Mk II", "Mainboard inventory");
//! bom.add(
//!     Asset::crypto(
//!         "AES-1",
//!         "AES-256-GCM Data Encryption",
//!         CryptoDetail::new(CryptoKind::Algorithm, "AES-256-GCM"),
//!     )?,
//!     "alice",
//! )?;
//!
//! let store = DirectorySnapshotStore::new(PathBuf::from("versions"));
//! let version_control = VersionControl::new(store);
//! let snapshot = version_control.create_version(&bom, "initial inventory", "alice")?;
//! println!("captured {}", snapshot.version_id);
//! # Ok(())
//! # }
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod inventory;
pub mod ports;
pub mod shared;
pub mod versioning;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::adapters::outbound::filesystem::{
        DirectorySnapshotStore, FileSystemWriter, StdoutPresenter,
    };
    pub use crate::adapters::outbound::formatters::{CsvFormatter, JsonFormatter, MarkdownFormatter};
    pub use crate::inventory::domain::{
        Asset, AssetDetail, AssetId, Assembly, Bom, BomDocument, ComponentDetail, CryptoDetail,
        CryptoKind, Purpose, RiskLevel, Status,
    };
    pub use crate::inventory::policies::{PolicySet, Posture, WeakAlgorithmTable};
    pub use crate::inventory::services::{AssetValidator, BomValidator};
    pub use crate::ports::outbound::{BomFormatter, OutputPresenter, SnapshotStore};
    pub use crate::shared::Result;
    pub use crate::versioning::{SnapshotDocument, VersionControl, VersionDiff};
}
