//! lexpad - a terminal text editor with rule-driven syntax highlighting

mod command;
mod display;
mod editor;
mod input;
mod terminal;

use std::env;
use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::process;
use std::sync::Mutex;

use lexpad::config::Config;
use lexpad::{EditorError, Result, Session};
use tracing_subscriber::EnvFilter;

use editor::EditorState;
use terminal::Terminal;

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let args: Vec<String> = env::args().collect();

    if args.len() > 1 {
        match args[1].as_str() {
            "--help" | "-h" => {
                print_usage();
                return Ok(());
            }
            "--version" | "-V" => {
                print_version();
                return Ok(());
            }
            _ => {}
        }
    }

    init_logging();

    let config = Config::load();
    let mut session = Session::new(config, Config::config_path());

    if args.len() > 1 && !args[1].starts_with('-') {
        let path = PathBuf::from(&args[1]);
        match session.open(&path) {
            Ok(()) => {}
            Err(EditorError::Io(e)) if e.kind() == io::ErrorKind::NotFound => {
                session.open_new(&path);
            }
            Err(e) => return Err(e),
        }
    }

    let terminal = Terminal::new()?;
    let mut editor = EditorState::new(terminal, session);
    editor.run()
}

/// Log to a file; the terminal belongs to the editor
///
/// `LEXPAD_LOG` names the file, `RUST_LOG` sets the filter.
fn init_logging() {
    let path = env::var_os("LEXPAD_LOG")
        .map(PathBuf::from)
        .unwrap_or_else(|| env::temp_dir().join("lexpad.log"));
    let file = match File::create(&path) {
        Ok(file) => file,
        Err(_) => return,
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init();
}

fn print_usage() {
    println!("lexpad {} - terminal text editor", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Usage: lexpad [OPTIONS] [FILE]");
    println!();
    println!("Options:");
    println!("  -h, --help     Show this help message");
    println!("  -V, --version  Show version information");
    println!();
    println!("Key bindings:");
    println!("  C-x C-f        Open a file");
    println!("  C-x C-s        Save");
    println!("  C-x C-w        Save as");
    println!("  C-x l          Load a language rule file (JSON, XML or TOML)");
    println!("  C-x k          Back to the built-in language");
    println!("  C-s            Find; M-n/M-p step, M-r/M-a replace");
    println!("  C-z, C-y       Undo, redo");
    println!("  F5             Compile");
    println!("  C-x t          Cycle theme");
    println!("  C-g            Abort current operation");
    println!("  C-x C-c        Quit");
    println!();
    println!("Press F1 in editor for complete key binding list");
    println!();
    println!("Settings are read from ~/.lexpad.toml");
}

fn print_version() {
    println!("lexpad {}", env!("CARGO_PKG_VERSION"));
}
