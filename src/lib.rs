//! An in-process VT100-compatible terminal emulator.
//!
//! Bytes written by a host program flow through [`ByteStream`] (UTF-8
//! decoding), into [`Stream`] (an ECMA-48 state machine emitting semantic
//! events), and land in a [`Screen`]: an in-memory character-cell model
//! with cursor, scrolling margins, graphic rendition, character sets, tab
//! stops, and modes. [`HistoryScreen`] adds scrollback with pagination and
//! [`DebugScreen`] logs the event stream instead of drawing it.
//!
//! '''
//! use vt_screen::{Screen, Stream};
//!
//! let mut stream = Stream::new(Screen::new(80, 24));
//! stream.feed("hi \x1b[1mthere\x1b[0m").unwrap();
//! let display = stream.listener().display();
//! assert_eq!(&display[0][..8], "hi there");
//! '''
//!
//! The core is single-threaded and never blocks: feed it from one place
//! and read `display()`/`dirty` whenever convenient. Replies to device
//! status queries are delivered through the callback installed with
//! [`Screen::on_process_input`], which must not re-enter the screen.

#[macro_use]
extern crate bitflags;
#[macro_use]
extern crate serde_json;
#[macro_use]
extern crate slog;
extern crate sloggers;
extern crate unicode_normalization;
extern crate unicode_width;

pub mod cell;
pub mod charsets;
pub mod control;
pub mod debug;
pub mod graphics;
pub mod history;
pub mod modes;
pub mod screen;
pub mod stream;

pub use cell::{Attrs, Char, Color};
pub use charsets::Charset;
pub use debug::DebugScreen;
pub use history::{History, HistoryScreen};
pub use screen::{Cursor, Line, Margins, Screen};
pub use stream::{ByteStream, Listener, Stream};
pub use sloggers::types::Severity;

use std::error::Error;
use std::fmt;
use std::io;

use slog::Logger;
use sloggers::Build;
use sloggers::file::FileLoggerBuilder;
use sloggers::null::NullLoggerBuilder;
use sloggers::terminal::{Destination, TerminalLoggerBuilder};

/// You can choose where the screen's debug logging goes.
/// This functionality is mainly for developpers.
#[derive(Clone, Debug)]
pub enum LogType {
    File((String, Severity, OpenMode)),
    Stdout(Severity),
    Stderr(Severity),
    None,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum OpenMode {
    Truncate,
    Append,
}

/// Build a logger for [`Screen::with_logger`] from a [`LogType`]; on any
/// builder failure the discarding logger is returned instead.
pub fn build_logger(log_type: &LogType) -> Logger {
    let built = match *log_type {
        LogType::File((ref name, sev, mode)) => {
            let mut builder = FileLoggerBuilder::new(name);
            builder.level(sev);
            if mode == OpenMode::Truncate {
                builder.truncate();
            }
            builder.build()
        }
        LogType::Stdout(sev) => {
            let mut builder = TerminalLoggerBuilder::new();
            builder.destination(Destination::Stdout);
            builder.level(sev);
            builder.build()
        }
        LogType::Stderr(sev) => {
            let mut builder = TerminalLoggerBuilder::new();
            builder.destination(Destination::Stderr);
            builder.level(sev);
            builder.build()
        }
        LogType::None => NullLoggerBuilder {}.build(),
    };
    built.unwrap_or_else(|_| Logger::root(slog::Discard, o!()))
}

/// Errors surfaced by listeners and the streams driving them.
#[derive(Debug)]
pub enum TermError {
    /// Writing to a sink or back to the host process failed.
    Io(io::Error),
    /// Event serialization failed.
    Serialize(serde_json::Error),
    /// A custom listener rejected an event.
    Listener(String),
}

/// What every event handler returns.
pub type TermResult = Result<(), TermError>;

impl fmt::Display for TermError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            TermError::Io(ref e) => write!(f, "io error: {}", e),
            TermError::Serialize(ref e) => write!(f, "serialize error: {}", e),
            TermError::Listener(ref s) => write!(f, "{}", s),
        }
    }
}

impl Error for TermError {
    fn cause(&self) -> Option<&dyn Error> {
        match *self {
            TermError::Io(ref e) => Some(e),
            TermError::Serialize(ref e) => Some(e),
            TermError::Listener(_) => None,
        }
    }
}

impl From<io::Error> for TermError {
    fn from(e: io::Error) -> TermError {
        TermError::Io(e)
    }
}

impl From<serde_json::Error> for TermError {
    fn from(e: serde_json::Error) -> TermError {
        TermError::Serialize(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn the_whole_pipeline_works_end_to_end() {
        let mut stream = ByteStream::new(Screen::new(16, 4));
        stream
            .feed(b"\x1b[2J\x1b[1;1Hhello \x1b[7mworld\x1b[0m")
            .unwrap();
        let screen = stream.into_listener();
        assert_eq!(&screen.display()[0][..11], "hello world");
        assert!(screen.buffer[0].get(6).reverse());
        assert!(!screen.buffer[0].get(5).reverse());
    }

    #[test]
    fn null_logger_builds() {
        let logger = build_logger(&LogType::None);
        let screen = Screen::with_logger(4, 2, logger);
        assert_eq!(screen.columns, 4);
    }

    #[test]
    fn errors_format_and_chain() {
        let err = TermError::from(io::Error::new(io::ErrorKind::Other, "sink gone"));
        assert!(err.to_string().contains("sink gone"));
        assert!(err.cause().is_some());
        assert!(TermError::Listener("nope".to_owned()).cause().is_none());
    }
}
