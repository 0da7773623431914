// Security module for path validation and access control
//
// File tools resolve every caller-supplied path through here so that an
// optional root directory and symlink policy apply uniformly.

pub mod path_validator;

pub use path_validator::{PathAccess, PathSecurityError, validate_path};
