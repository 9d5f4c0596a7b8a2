pub mod error;
pub mod fs;
pub mod retry;

pub use error::{EditorError, EditorResult};
pub use retry::await_ready;
pub use fs::{remove_file_quiet, sweep_temp_files, timestamp_ms};
