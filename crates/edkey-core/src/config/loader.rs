// Edkey Configuration Loader
// Builds the binding table from dot-directive records

use thiserror::Error;

use crate::binding::{Binding, BindingTable};
use crate::codec::{encode, EncodeError};
use crate::config::source::{open_config, ReadError, RecordSource};
use crate::input::TerminalModes;
use crate::key::Key;
use crate::keyword::{Handler, Keyword};

/// Configuration loading errors. Any of these aborts the entire load; a
/// partial table is never returned.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot open configuration '{name}': {source}")]
    Open {
        name: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Read(#[from] ReadError),

    #[error("bad key token in '{directive}': {source}")]
    Encode {
        directive: String,
        #[source]
        source: EncodeError,
    },

    #[error("{0}")]
    Parse(String),
}

/// Load a binding table from a named configuration resource, looked up
/// in the current directory and then the user's home directory.
pub fn load_config(name: &str, modes: &dyn TerminalModes) -> Result<BindingTable, ConfigError> {
    let mut source = open_config(name).map_err(|err| ConfigError::Open {
        name: name.to_string(),
        source: err,
    })?;
    load_bindings(&mut source, modes)
}

/// Assemble a binding table from configuration records.
///
/// Records that do not start with the directive marker, or whose first
/// token is not a recognized keyword, are discarded as comments. A
/// handler failure aborts the load.
pub fn load_bindings(
    source: &mut dyn RecordSource,
    modes: &dyn TerminalModes,
) -> Result<BindingTable, ConfigError> {
    let mut table = BindingTable::new();
    while let Some(record) = source.next_record()? {
        if !record.starts_with('.') {
            continue;
        }
        let mut tokens = record.split_ascii_whitespace();
        let Some(first) = tokens.next() else {
            continue;
        };
        let Some(keyword) = Keyword::find(&first.to_ascii_lowercase()) else {
            log::debug!("ignoring unrecognized directive '{first}'");
            continue;
        };
        let binding = run_handler(keyword, &record, &mut tokens, source, modes)?;
        table.push(binding);
    }
    log::debug!("loaded {} bindings", table.len());
    Ok(table)
}

/// Run one keyword's handler over the rest of its record.
fn run_handler<'a>(
    keyword: &Keyword,
    record: &str,
    tokens: &mut impl Iterator<Item = &'a str>,
    source: &mut dyn RecordSource,
    modes: &dyn TerminalModes,
) -> Result<Binding, ConfigError> {
    let code = Key::Code(keyword.code);
    match keyword.handler {
        Handler::Default => {
            let token = tokens.next().ok_or_else(|| {
                ConfigError::Parse(format!("'{}' requires a key sequence", keyword.name))
            })?;
            Ok(Binding::new(code, Some(encode_token(keyword, token)?), None))
        }
        Handler::Define => match tokens.next() {
            // Bare directive: placeholder reserving the macro code.
            None => Ok(Binding::reserved(code)),
            Some(token) => {
                let lhs = encode_token(keyword, token)?;
                let rhs = tokens
                    .next()
                    .map(|token| encode_token(keyword, token))
                    .transpose()?;
                Ok(Binding::new(code, Some(lhs), rhs))
            }
        },
        Handler::Token => Ok(Binding::reserved(code)),
        Handler::Itself => {
            // The first character of the directive line, not a token.
            let byte = record.as_bytes()[0];
            Ok(Binding::new(Key::Char(byte), Some(vec![byte]), None))
        }
        Handler::Erase => Ok(Binding::new(code, Some(vec![modes.erase_byte()]), None)),
        Handler::Kill => Ok(Binding::new(code, Some(vec![modes.kill_byte()]), None)),
        Handler::HelpText => {
            let text = source.read_until(".end")?.ok_or_else(|| {
                ConfigError::Parse(format!("'{}' not terminated by '.end'", keyword.name))
            })?;
            Ok(Binding::new(code, Some(text.into_bytes()), None))
        }
    }
}

fn encode_token(keyword: &Keyword, token: &str) -> Result<Vec<u8>, ConfigError> {
    encode(token).map_err(|err| ConfigError::Encode {
        directive: keyword.name.to_string(),
        source: err,
    })
}
