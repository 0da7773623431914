pub mod read_file;
pub mod write_file;

pub use read_file::{ReadFileParams, ReadFileTool};
pub use write_file::{WriteFileParams, WriteFileTool};
