// Edkey Core Library
// Key-binding compilation, incremental resolution, and macro replay

pub mod binding;
pub mod codec;
pub mod config;
pub mod field;
pub mod input;
pub mod key;
pub mod keyword;
pub mod replay;
pub mod resolver;

pub use binding::{Binding, BindingTable};
pub use codec::{encode, EncodeError};
pub use config::{
    load_bindings, load_config, open_config, BlockReader, ConfigError, ReadError, RecordSource,
};
pub use field::{read_field, FieldDisplay};
pub use input::{ByteSource, MemorySource, StaticModes, TerminalModes};
pub use key::{Command, Key};
pub use keyword::{Handler, Keyword, KEYWORDS};
pub use replay::ReplayStack;
pub use resolver::{InputError, KeyEngine, MAX_SEQUENCE_BYTES};
