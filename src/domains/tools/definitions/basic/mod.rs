pub mod add;
pub mod echo;
pub mod system_info;

pub use add::{AddParams, AddTool};
pub use echo::{EchoParams, EchoTool};
pub use system_info::SystemInfoTool;
