#![forbid(unsafe_code)]
// Allow pedantic lints for early-stage API ergonomics.
#![allow(clippy::nursery)]
#![allow(clippy::pedantic)]

//! # Benchlog
//!
//! Categorized, line-oriented log channels for sample and benchmark programs.
//!
//! Benchlog provides:
//! - One channel per category (debug, verbose, info, warning, error)
//! - A `"[ LABEL ] "` prefix emitted once per logical line
//! - Optional ANSI coloring, decided per channel at setup time
//! - A null channel that swallows everything, used to compile out debug output
//!
//! ## Example
//!
//! ```rust
//! use benchlog::{ColorMode, LogConfig, LogStream, Logs, MemorySink, Sink};
//!
//! let out = MemorySink::new();
//! let config = LogConfig { debug: false, color: ColorMode::Never };
//! let mut logs = Logs::with_sinks(&config, Sink::new(out.clone()), Sink::stderr());
//!
//! logs.info().write("loaded ").write(3).write(" frames").end_line();
//! logs.debug().write("never printed").end_line();
//!
//! assert_eq!(out.contents(), "[ INFO ] loaded 3 frames\n");
//! ```
//!
//! ## Destinations and colors
//!
//! | Category | Label     | Sink   | Color  |
//! |----------|-----------|--------|--------|
//! | Debug    | `DEBUG`   | stdout | green  |
//! | Verbose  | `VERBOSE` | stdout | white  |
//! | Info     | `INFO`    | stdout | blue   |
//! | Warning  | `WARNING` | stdout | yellow |
//! | Error    | `ERROR`   | stderr | red    |

use colored::Color;
use std::fmt;
use std::io::{self, IsTerminal, Write};
use std::sync::{Arc, Mutex, PoisonError};
use thiserror::Error;

/// ANSI sequence that restores the terminal's default attributes.
pub const COLOR_RESET: &str = "\x1b[0m";

/// Environment variable that enables the debug channel.
pub const DEBUG_ENV: &str = "EDGEBENCH_DEBUG";

/// Environment variable that selects the color mode.
pub const COLOR_ENV: &str = "EDGEBENCH_COLOR";

/// Category of a log message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    /// Developer diagnostics, compiled out unless enabled.
    Debug,
    /// Chatty progress output.
    Verbose,
    /// Normal results.
    Info,
    /// Something looks off but the run continues.
    Warning,
    /// Failures. The only category routed to standard error.
    Error,
}

impl Category {
    /// Every category, in severity order.
    pub const ALL: [Self; 5] = [
        Self::Debug,
        Self::Verbose,
        Self::Info,
        Self::Warning,
        Self::Error,
    ];

    /// Returns the lowercase name of the category.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Verbose => "verbose",
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }

    /// Returns the label printed inside the line prefix.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Debug => "DEBUG",
            Self::Verbose => "VERBOSE",
            Self::Info => "INFO",
            Self::Warning => "WARNING",
            Self::Error => "ERROR",
        }
    }

    /// Returns the display color bound to the category.
    #[must_use]
    pub fn color(&self) -> Color {
        match self {
            Self::Debug => Color::Green,
            Self::Verbose => Color::White,
            Self::Info => Color::Blue,
            Self::Warning => Color::Yellow,
            Self::Error => Color::Red,
        }
    }

    /// Returns the standard stream the category writes to.
    #[must_use]
    pub fn destination(&self) -> Destination {
        match self {
            Self::Error => Destination::Stderr,
            _ => Destination::Stdout,
        }
    }

    /// Returns the line prefix, e.g. `"[ INFO ] "`.
    #[must_use]
    pub fn prefix(&self) -> String {
        format!("[ {} ] ", self.label())
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Category {
    type Err = ParseCategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "debug" => Ok(Self::Debug),
            "verbose" => Ok(Self::Verbose),
            "info" => Ok(Self::Info),
            "warning" | "warn" => Ok(Self::Warning),
            "error" => Ok(Self::Error),
            _ => Err(ParseCategoryError(s.to_string())),
        }
    }
}

/// Error returned when parsing an unknown category name.
///
/// Accepted names are the category labels in any case, plus `"warn"` as an
/// alias for [`Category::Warning`].
///
/// # Example
///
/// ```rust
/// use benchlog::Category;
///
/// assert!("INFO".parse::<Category>().is_ok());
/// assert!("warn".parse::<Category>().is_ok());
/// assert!("trace".parse::<Category>().is_err());
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid category: {0:?}")]
pub struct ParseCategoryError(String);

/// A specialized [`Result`] type for category parsing.
pub type ParseResult<T> = std::result::Result<T, ParseCategoryError>;

/// Standard stream a category is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Destination {
    /// Standard output.
    Stdout,
    /// Standard error.
    Stderr,
}

impl Destination {
    /// Whether the process's stream is attached to a terminal.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        match self {
            Self::Stdout => io::stdout().is_terminal(),
            Self::Stderr => io::stderr().is_terminal(),
        }
    }

    /// Opens a sink for the stream.
    #[must_use]
    pub fn sink(&self) -> Sink {
        match self {
            Self::Stdout => Sink::stdout(),
            Self::Stderr => Sink::stderr(),
        }
    }
}

/// Color output mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorMode {
    /// Color a channel only when its own stream is a terminal and
    /// [`ColorEnv`] allows it.
    #[default]
    Auto,
    /// Always emit escape sequences.
    Always,
    /// Never emit escape sequences.
    Never,
}

impl ColorMode {
    /// Decides whether a channel writing to a sink should be colored.
    ///
    /// `sink_is_terminal` must describe the channel's own stream; `Auto`
    /// never consults any other stream.
    #[must_use]
    pub fn should_color(self, sink_is_terminal: bool, env: ColorEnv) -> bool {
        match self {
            Self::Always => true,
            Self::Never => false,
            Self::Auto => env.allows(sink_is_terminal),
        }
    }
}

/// The `NO_COLOR` / `CLICOLOR` / `CLICOLOR_FORCE` conventions.
///
/// Precedence: a non-empty `NO_COLOR` disables color, then a
/// `CLICOLOR_FORCE` other than `0` forces it, then `CLICOLOR=0` disables it.
/// Otherwise the stream's terminal status decides.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorEnv {
    /// `NO_COLOR` is set and non-empty.
    pub no_color: bool,
    /// `CLICOLOR_FORCE` is set to something other than `0`.
    pub force: bool,
    /// `CLICOLOR` is unset or not `0`.
    pub clicolor: bool,
}

impl Default for ColorEnv {
    fn default() -> Self {
        Self {
            no_color: false,
            force: false,
            clicolor: true,
        }
    }
}

impl ColorEnv {
    /// Reads the conventions from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the conventions through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            no_color: lookup("NO_COLOR").is_some_and(|v| !v.is_empty()),
            force: lookup("CLICOLOR_FORCE").is_some_and(|v| v != "0"),
            clicolor: lookup("CLICOLOR").is_none_or(|v| v != "0"),
        }
    }

    /// Whether a stream with the given terminal status may be colored.
    #[must_use]
    pub fn allows(self, is_terminal: bool) -> bool {
        if self.no_color {
            false
        } else if self.force {
            true
        } else {
            self.clicolor && is_terminal
        }
    }
}

impl std::str::FromStr for ColorMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "always" => Ok(Self::Always),
            "never" => Ok(Self::Never),
            _ => Err(ConfigError::InvalidValue {
                key: COLOR_ENV,
                value: s.to_string(),
            }),
        }
    }
}

/// Configuration error.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// An environment variable held a value we do not understand.
    #[error("invalid value for {key}: {value:?}")]
    InvalidValue {
        /// Variable name.
        key: &'static str,
        /// Offending value.
        value: String,
    },
}

/// Channel setup options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogConfig {
    /// Bind a live debug channel instead of a null one.
    pub debug: bool,
    /// Color policy for every live channel.
    pub color: ColorMode,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            debug: cfg!(feature = "debug-log"),
            color: ColorMode::Auto,
        }
    }
}

impl LogConfig {
    /// Creates a config with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads `EDGEBENCH_DEBUG` and `EDGEBENCH_COLOR` on top of the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] when either variable is set to an
    /// unrecognized value.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`from_env`](Self::from_env) but reads variables through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for unrecognized values.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(value) = lookup(DEBUG_ENV) {
            config.debug = parse_flag(DEBUG_ENV, &value)?;
        }
        if let Some(value) = lookup(COLOR_ENV) {
            config.color = value.parse()?;
        }
        Ok(config)
    }
}

fn parse_flag(key: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key,
            value: value.to_string(),
        }),
    }
}

/// Shared handle to an output stream.
///
/// Clones write to the same underlying writer; each write takes the lock.
#[derive(Clone)]
pub struct Sink {
    inner: Arc<Mutex<dyn Write + Send>>,
}

impl Sink {
    /// Wraps an arbitrary writer.
    pub fn new<W: Write + Send + 'static>(writer: W) -> Self {
        Self {
            inner: Arc::new(Mutex::new(writer)),
        }
    }

    /// Sink bound to standard output.
    #[must_use]
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }

    /// Sink bound to standard error.
    #[must_use]
    pub fn stderr() -> Self {
        Self::new(io::stderr())
    }

    fn with_writer<R>(&self, f: impl FnOnce(&mut dyn Write) -> io::Result<R>) -> io::Result<R> {
        let mut writer = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut *writer)
    }
}

impl fmt::Debug for Sink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sink").finish_non_exhaustive()
    }
}

/// In-memory writer whose clones share one buffer.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    buf: Arc<Mutex<Vec<u8>>>,
}

impl MemorySink {
    /// Creates an empty buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns everything written so far.
    #[must_use]
    pub fn contents(&self) -> String {
        let buf = self.buf.lock().unwrap_or_else(PoisonError::into_inner);
        String::from_utf8_lossy(&buf).into_owned()
    }
}

impl Write for MemorySink {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        let mut buf = self.buf.lock().unwrap_or_else(PoisonError::into_inner);
        buf.extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// The call surface shared by live and null channels.
///
/// Writes accumulate into one logical line until [`end_line`](Self::end_line):
///
/// ```rust
/// use benchlog::{Category, LogChannel, LogStream, MemorySink, Sink};
///
/// let out = MemorySink::new();
/// let mut info = LogChannel::new(Category::Info, Sink::new(out.clone()), false);
/// info.write("a=").write(1).end_line();
/// assert_eq!(out.contents(), "[ INFO ] a=1\n");
/// ```
pub trait LogStream {
    /// Appends the value's `Display` text to the current line.
    fn write<T: fmt::Display>(&mut self, value: T) -> &mut Self;

    /// Terminates the current line.
    fn end_line(&mut self) -> &mut Self;

    /// Whether anything written here can ever be observed.
    fn is_enabled(&self) -> bool;
}

/// A live channel bound to one category and one sink.
#[derive(Debug)]
pub struct LogChannel {
    category: Category,
    sink: Sink,
    /// Color start sequence, present only for colored channels.
    color_start: Option<String>,
    at_line_start: bool,
    /// Whether a sink failure has already been reported (warn once).
    has_warned_io_failure: bool,
}

impl LogChannel {
    /// Creates a channel. `colored` is fixed for the channel's lifetime.
    #[must_use]
    pub fn new(category: Category, sink: Sink, colored: bool) -> Self {
        let color_start = colored.then(|| format!("\x1b[{}m", category.color().to_fg_str()));
        Self {
            category,
            sink,
            color_start,
            at_line_start: true,
            has_warned_io_failure: false,
        }
    }

    /// Returns the category this channel serves.
    #[must_use]
    pub fn category(&self) -> Category {
        self.category
    }

    /// Whether this channel emits escape sequences.
    #[must_use]
    pub fn is_colored(&self) -> bool {
        self.color_start.is_some()
    }

    /// Whether the next write starts a new prefixed line.
    #[must_use]
    pub fn at_line_start(&self) -> bool {
        self.at_line_start
    }

    fn note_failure(&mut self, err: &io::Error) {
        if self.has_warned_io_failure {
            return;
        }
        self.has_warned_io_failure = true;
        let _ = io::stderr().write_all(
            format!("benchlog: {} channel write failed: {err}\n", self.category).as_bytes(),
        );
    }
}

impl LogStream for LogChannel {
    fn write<T: fmt::Display>(&mut self, value: T) -> &mut Self {
        let result = self.sink.with_writer(|w| {
            if self.at_line_start {
                if let Some(start) = &self.color_start {
                    w.write_all(start.as_bytes())?;
                }
                w.write_all(self.category.prefix().as_bytes())?;
            }
            write!(w, "{value}")
        });
        self.at_line_start = false;
        if let Err(e) = result {
            self.note_failure(&e);
        }
        self
    }

    fn end_line(&mut self) -> &mut Self {
        let colored = self.is_colored();
        let result = self.sink.with_writer(|w| {
            if colored {
                w.write_all(COLOR_RESET.as_bytes())?;
            }
            w.write_all(b"\n")?;
            w.flush()
        });
        self.at_line_start = true;
        if let Err(e) = result {
            self.note_failure(&e);
        }
        self
    }

    fn is_enabled(&self) -> bool {
        true
    }
}

/// A channel that discards everything without touching any sink.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NullChannel;

impl LogStream for NullChannel {
    #[inline(always)]
    fn write<T: fmt::Display>(&mut self, _value: T) -> &mut Self {
        self
    }

    #[inline(always)]
    fn end_line(&mut self) -> &mut Self {
        self
    }

    #[inline(always)]
    fn is_enabled(&self) -> bool {
        false
    }
}

/// A category slot: live or null, chosen once when [`Logs`] is built.
#[derive(Debug)]
pub enum Channel {
    /// Writes reach the sink.
    Live(LogChannel),
    /// Writes are discarded.
    Null(NullChannel),
}

impl From<LogChannel> for Channel {
    fn from(channel: LogChannel) -> Self {
        Self::Live(channel)
    }
}

impl From<NullChannel> for Channel {
    fn from(channel: NullChannel) -> Self {
        Self::Null(channel)
    }
}

impl LogStream for Channel {
    #[inline]
    fn write<T: fmt::Display>(&mut self, value: T) -> &mut Self {
        match self {
            Self::Live(ch) => {
                ch.write(value);
            }
            Self::Null(ch) => {
                ch.write(value);
            }
        }
        self
    }

    #[inline]
    fn end_line(&mut self) -> &mut Self {
        match self {
            Self::Live(ch) => {
                ch.end_line();
            }
            Self::Null(ch) => {
                ch.end_line();
            }
        }
        self
    }

    #[inline]
    fn is_enabled(&self) -> bool {
        matches!(self, Self::Live(_))
    }
}

/// One channel per category.
///
/// Build it once at startup and pass `&mut Logs` to whatever needs to log.
#[derive(Debug)]
pub struct Logs {
    debug: Channel,
    verbose: Channel,
    info: Channel,
    warning: Channel,
    error: Channel,
}

impl Logs {
    /// Binds channels to the process's standard output and error.
    #[must_use]
    pub fn new(config: &LogConfig) -> Self {
        Self::build(config, ColorEnv::from_env(), |category| {
            let dest = category.destination();
            (dest.sink(), dest.is_terminal())
        })
    }

    /// Binds channels to caller-supplied sinks.
    ///
    /// `out` receives debug, verbose, info and warning lines; `err` receives
    /// error lines. The sinks are never treated as terminals, so
    /// [`ColorMode::Auto`] yields uncolored output here.
    #[must_use]
    pub fn with_sinks(config: &LogConfig, out: Sink, err: Sink) -> Self {
        Self::build(config, ColorEnv::default(), |category| match category.destination() {
            Destination::Stdout => (out.clone(), false),
            Destination::Stderr => (err.clone(), false),
        })
    }

    fn build<F>(config: &LogConfig, env: ColorEnv, mut open: F) -> Self
    where
        F: FnMut(Category) -> (Sink, bool),
    {
        let mut live = |category: Category| -> Channel {
            let (sink, is_terminal) = open(category);
            LogChannel::new(category, sink, config.color.should_color(is_terminal, env)).into()
        };

        let debug = if config.debug {
            live(Category::Debug)
        } else {
            NullChannel.into()
        };

        Self {
            debug,
            verbose: live(Category::Verbose),
            info: live(Category::Info),
            warning: live(Category::Warning),
            error: live(Category::Error),
        }
    }

    /// Returns the channel serving `category`.
    pub fn channel(&mut self, category: Category) -> &mut Channel {
        match category {
            Category::Debug => &mut self.debug,
            Category::Verbose => &mut self.verbose,
            Category::Info => &mut self.info,
            Category::Warning => &mut self.warning,
            Category::Error => &mut self.error,
        }
    }

    /// Debug channel (null unless enabled in the config).
    pub fn debug(&mut self) -> &mut Channel {
        &mut self.debug
    }

    /// Verbose channel.
    pub fn verbose(&mut self) -> &mut Channel {
        &mut self.verbose
    }

    /// Info channel.
    pub fn info(&mut self) -> &mut Channel {
        &mut self.info
    }

    /// Warning channel.
    pub fn warn(&mut self) -> &mut Channel {
        &mut self.warning
    }

    /// Error channel.
    pub fn error(&mut self) -> &mut Channel {
        &mut self.error
    }

    /// Whether the debug channel is live.
    #[must_use]
    pub fn is_debug_enabled(&self) -> bool {
        self.debug.is_enabled()
    }
}

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::{
        COLOR_RESET, Category, Channel, ColorEnv, ColorMode, ConfigError, Destination, LogChannel,
        LogConfig, LogStream, Logs, MemorySink, NullChannel, ParseCategoryError, ParseResult,
        Sink,
    };
}
