//! Tool definitions module.
//!
//! This module exports all available tool definitions.
//! Each tool is defined in its own file, grouped by the external system it
//! talks to.

pub mod basic;
pub mod fs;
pub mod net;
pub mod sql;

pub use basic::{AddParams, AddTool, EchoParams, EchoTool, SystemInfoTool};
pub use fs::{ReadFileParams, ReadFileTool, WriteFileParams, WriteFileTool};
pub use net::{WeatherParams, WeatherTool, WebRequestParams, WebRequestTool};
pub use sql::{
    DescribeTableParams, DescribeTableTool, ListTablesTool, SqlQueryParams, SqlQueryTool,
};
