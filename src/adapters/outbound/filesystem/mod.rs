/// File system adapters for output writing and snapshot persistence
mod file_writer;
mod snapshot_dir;

pub use file_writer::{FileSystemWriter, StdoutPresenter};
pub use snapshot_dir::DirectorySnapshotStore;
