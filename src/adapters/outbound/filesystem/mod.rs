/// Filesystem adapters for file I/O operations
mod approval_file;
mod file_reader;
mod file_writer;

pub use approval_file::{YamlApprovalStore, DEFAULT_APPROVAL_FILE};
pub use file_reader::FileSystemReader;
pub use file_writer::FileSystemWriter;
