pub mod weather;
pub mod web_request;

pub use weather::{WeatherParams, WeatherTool};
pub use web_request::{WebRequestParams, WebRequestTool};
