// Edkey CLI
// Loads a key-binding configuration and echoes resolved keys

#[cfg(feature = "terminal")]
use anyhow::{Context, Result};
#[cfg(feature = "terminal")]
use clap::Parser;

#[cfg(feature = "terminal")]
use edkey::term::{RawMode, TtyInput, TtyModes, TtyScreen};
#[cfg(feature = "terminal")]
use edkey::{load_config, read_field, ByteSource, Command, InputError, Key, KeyEngine};

/// Key-binding and macro engine demo
#[cfg(feature = "terminal")]
#[derive(Parser, Debug)]
#[command(name = "edkey")]
#[command(about = "Resolve terminal input through an editor key configuration", long_about = None)]
struct Args {
    /// Configuration file, searched in the current then home directory
    #[arg(short, long, value_name = "CONFIG", default_value = ".edkeyrc")]
    config: String,

    /// Validate the configuration and exit
    #[arg(long)]
    check_config: bool,

    /// Run the field-editor demo instead of the resolver loop
    #[arg(long)]
    field: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[cfg(feature = "terminal")]
fn main() -> Result<()> {
    let args = Args::parse();
    env_logger::Builder::new()
        .filter_level(if args.verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Warn
        })
        .init();

    let modes = TtyModes::capture().context("cannot query terminal modes")?;
    let table = load_config(&args.config, &modes)
        .with_context(|| format!("cannot load configuration '{}'", args.config))?;

    if args.check_config {
        println!("Configuration is valid: {} bindings", table.len());
        return Ok(());
    }

    let mut engine = KeyEngine::new(table);
    let mut dev = TtyInput::new();
    let _raw = RawMode::enter().context("cannot enter raw mode")?;

    if args.field {
        run_field_demo(&mut engine, &mut dev, &modes)
    } else {
        run_resolver_loop(&mut engine, &mut dev)
    }
}

/// Echo every resolved key until the quit binding fires.
#[cfg(feature = "terminal")]
fn run_resolver_loop(engine: &mut KeyEngine, dev: &mut dyn ByteSource) -> Result<()> {
    print!("Type bound sequences; the quit binding exits.\r\n");
    loop {
        match engine.next_key(dev) {
            Ok(key) => {
                let origin = if engine.is_replaying() { " (macro)" } else { "" };
                print!("{key}{origin}\r\n");
                if key == Key::Code(Command::Quit) {
                    break;
                }
            }
            // Recoverable: accumulation was reset, keep reading.
            Err(InputError::SequenceOverflow) => {
                log::warn!("key sequence too long, ignored");
            }
            Err(err) => return Err(err.into()),
        }
    }
    Ok(())
}

/// Edit one pre-filled field and report its final content.
#[cfg(feature = "terminal")]
fn run_field_demo(
    engine: &mut KeyEngine,
    dev: &mut dyn ByteSource,
    modes: &TtyModes,
) -> Result<()> {
    let mut screen = TtyScreen::new();
    let mut buf = b"edit me".to_vec();
    read_field(engine, dev, &mut screen, modes, &mut buf, Some(40), true)?;
    print!("\r\nField content: {}\r\n", String::from_utf8_lossy(&buf));
    Ok(())
}

// Stub for when the terminal feature is not enabled.
#[cfg(not(feature = "terminal"))]
fn main() {
    eprintln!("Error: the edkey binary requires the 'terminal' feature.");
    eprintln!("Build with: cargo build --features terminal --bin edkey");
    std::process::exit(1);
}
