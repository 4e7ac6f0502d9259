// Edkey Configuration
// Record sources and the directive loader

pub mod loader;
pub mod source;

pub use loader::{load_bindings, load_config, ConfigError};
pub use source::{open_config, BlockReader, ReadError, RecordSource};
