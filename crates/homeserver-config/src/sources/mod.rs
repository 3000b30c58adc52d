//! Configuration sources
//!
//! Configuration is read from a TOML file once at startup.

mod file;

pub use file::FileSource;
