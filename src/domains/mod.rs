//! Domains module containing business logic organized by bounded contexts.
//!
//! The toolbox has a single bounded context, `tools`; transports in `core`
//! only adapt it.

pub mod tools;
