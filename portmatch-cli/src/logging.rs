//! Logger setup.
//!
//! Command output goes through the `log` macros, so the logger writes plain
//! messages to stdout, or to stderr when stdout carries a JSON or HTML
//! report. `--verbose` adds timestamps, levels and targets; `--logfile`
//! copies everything to a file with ANSI codes stripped.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use log::{Level, LevelFilter};

use crate::error::CliError;

/// Writes to the console and to a log file without color codes.
struct TeeWriter {
    stderr: bool,
    file: strip_ansi_escapes::Writer<File>,
}

impl TeeWriter {
    fn console(&self) -> Box<dyn Write> {
        if self.stderr {
            Box::new(io::stderr())
        } else {
            Box::new(io::stdout())
        }
    }
}

impl Write for TeeWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.console().write_all(buf)?;
        self.file.write_all(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.console().flush()?;
        self.file.flush()
    }
}

fn level_for(quiet: bool, verbose: bool) -> LevelFilter {
    if verbose {
        LevelFilter::Debug
    } else if quiet {
        LevelFilter::Warn
    } else {
        LevelFilter::Info
    }
}

/// Install the global logger. `RUST_LOG` still overrides per-module levels.
///
/// With `stderr` set, console output goes to stderr so stdout stays clean.
pub(crate) fn init(
    quiet: bool,
    verbose: bool,
    logfile: Option<&Path>,
    stderr: bool,
) -> Result<(), CliError> {
    let mut builder = env_logger::Builder::new();
    builder
        .filter_level(LevelFilter::Warn)
        .filter_module("portmatch", level_for(quiet, verbose))
        .parse_env(env_logger::Env::default());

    builder.format(move |buf, record| {
        if verbose {
            writeln!(
                buf,
                "{} {:<5} [{}] {}",
                chrono::Local::now().format("%H:%M:%S%.3f"),
                record.level(),
                record.target(),
                record.args()
            )
        } else if record.level() == Level::Error {
            writeln!(buf, "error: {}", record.args())
        } else {
            writeln!(buf, "{}", record.args())
        }
    });

    match logfile {
        Some(path) => {
            let file = File::create(path).map_err(|e| {
                CliError::logging(format!("cannot create {}: {}", path.display(), e))
            })?;
            builder.target(env_logger::Target::Pipe(Box::new(TeeWriter {
                stderr,
                file: strip_ansi_escapes::Writer::new(file),
            })));
        }
        None if stderr => {
            builder.target(env_logger::Target::Stderr);
        }
        None => {
            builder.target(env_logger::Target::Stdout);
        }
    }

    builder
        .try_init()
        .map_err(|e| CliError::logging(e.to_string()))
}
