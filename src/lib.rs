// Edkey
// Key-binding and macro input engine for a small screen editor

pub use edkey_core::*;

#[cfg(feature = "terminal")]
pub mod term;
