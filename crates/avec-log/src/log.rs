mod error;
pub mod fmt;

use std::sync::{Mutex, MutexGuard, OnceLock, PoisonError};

use core::str::FromStr;

use termcolor::{StandardStream, ColorChoice};

pub use termcolor::{ColorSpec, Color};

use rustc_hash::FxHashMap;

use compact_str::CompactString;

pub use error::LogError;
pub use fmt::{LogFmt, LogFmtBuilder, LogSpec, SegmentSpec};

pub type Result<T> = core::result::Result<T, LogError>;

#[repr(i8)]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug)]
pub enum Level {
    Error = 0,
    Warn = 1,
    Info = 2,
    Debug = 3,
    Trace = 4,
}

impl FromStr for Level {

    type Err = ();

    fn from_str(s: &str) -> core::result::Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("error") {
            Ok(Self::Error)
        } else if s.eq_ignore_ascii_case("warn") {
            Ok(Self::Warn)
        } else if s.eq_ignore_ascii_case("info") {
            Ok(Self::Info)
        } else if s.eq_ignore_ascii_case("debug") {
            Ok(Self::Debug)
        } else if s.eq_ignore_ascii_case("trace") {
            Ok(Self::Trace)
        } else {
            Err(())
        }
    }
}

/// Level filters parsed from a `RUST_LOG` style string.
///
/// Entries are comma separated. A bare level sets the base level, and
/// `target=level` sets the level of a module path and everything below it.
/// Unknown levels are skipped.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Filters {
    base_level: Level,
    target_levels: FxHashMap<CompactString, Level>,
}

impl Filters {

    pub fn new(base_level: Level) -> Self {
        Self {
            base_level,
            target_levels: FxHashMap::default(),
        }
    }

    pub fn parse(spec: &str, base_level: Level) -> Self {
        let mut filters = Self::new(base_level);
        for arg in spec.split(',') {
            let (target, level) = match arg.find('=') {
                Some(j) => (Some(arg[..j].trim()), arg[j + 1..].trim()),
                None => (None, arg.trim()),
            };
            let Ok(level) = Level::from_str(level) else {
                continue
            };
            match target {
                Some(target) => {
                    let entry = filters.target_levels
                        .entry(CompactString::new(target))
                        .or_insert(level);
                    *entry = (*entry).min(level);
                },
                None => filters.base_level = level,
            }
        }
        filters
    }

    /// Level of `target`, inherited from the closest `::` parent with an entry.
    pub fn target_level(&self, target: &str) -> Level {
        let mut substr = target;
        if let Some(&level) = self.target_levels.get(substr) {
            return level
        }
        while let Some(i) = substr.rfind("::") {
            substr = &substr[..i];
            if let Some(&level) = self.target_levels.get(substr) {
                return level
            }
        }
        self.base_level
    }

    #[inline(always)]
    pub fn enabled(&self, target: &str, level: Level) -> bool {
        level <= self.target_level(target)
    }
}

struct Logger {
    stderr: StandardStream,
    error_fmt: LogFmt,
    warn_fmt: LogFmt,
    info_fmt: LogFmt,
    debug_fmt: LogFmt,
    trace_fmt: LogFmt,
    filters: Filters,
}

impl Logger {

    fn new(base_level: Level) -> Result<Self> {
        let filters = match std::env::var("RUST_LOG") {
            Ok(env) => Filters::parse(&env, base_level),
            Err(_) => Filters::new(base_level),
        };
        Ok(Self {
            stderr: StandardStream::stderr(ColorChoice::Auto),
            error_fmt: LogFmt::for_level(Level::Error)?,
            warn_fmt: LogFmt::for_level(Level::Warn)?,
            info_fmt: LogFmt::for_level(Level::Info)?,
            debug_fmt: LogFmt::for_level(Level::Debug)?,
            trace_fmt: LogFmt::for_level(Level::Trace)?,
            filters,
        })
    }

    fn fmt_mut(&mut self, level: Level) -> &mut LogFmt {
        match level {
            Level::Error => &mut self.error_fmt,
            Level::Warn => &mut self.warn_fmt,
            Level::Info => &mut self.info_fmt,
            Level::Debug => &mut self.debug_fmt,
            Level::Trace => &mut self.trace_fmt,
        }
    }

    fn log(&mut self, target: &str, level: Level, msg: core::fmt::Arguments) -> Result<bool> {
        if !self.filters.enabled(target, level) {
            return Ok(false)
        }
        let fmt = match level {
            Level::Error => &self.error_fmt,
            Level::Warn => &self.warn_fmt,
            Level::Info => &self.info_fmt,
            Level::Debug => &self.debug_fmt,
            Level::Trace => &self.trace_fmt,
        };
        fmt.render(&mut self.stderr, msg)?;
        Ok(true)
    }
}

static LOGGER: OnceLock<Mutex<Logger>> = OnceLock::new();

#[inline(always)]
fn logger() -> Option<MutexGuard<'static, Logger>> {
    LOGGER
        .get()
        .map(|logger| logger.lock().unwrap_or_else(PoisonError::into_inner))
}

/// Initializes the global logger with [`Level::Error`] as the base level.
#[inline(always)]
pub fn init() -> Result<()> {
    init_with(Level::Error)
}

/// Initializes the global logger. `RUST_LOG` overrides `base_level`.
///
/// Later calls are no-ops.
pub fn init_with(base_level: Level) -> Result<()> {
    if LOGGER.get().is_some() {
        return Ok(())
    }
    let logger = Logger::new(base_level)?;
    let _ = LOGGER.set(Mutex::new(logger));
    Ok(())
}

/// Rebuilds the output layout of `level`. Returns `false` if the logger is not
/// initialized.
pub fn set_fmt(
    level: Level,
    f: impl FnOnce(&mut LogFmtBuilder) -> Result<()>,
) -> Result<bool> {
    let Some(mut logger) = logger() else {
        return Ok(false)
    };
    let mut builder = LogFmtBuilder::new(logger.fmt_mut(level));
    f(&mut builder)?;
    Ok(true)
}

/// Whether a record of `level` from `target` would be written.
pub fn enabled(target: &str, level: Level) -> bool {
    logger().is_some_and(|logger| logger.filters.enabled(target, level))
}

/// Writes one record. Returns `false` if it was filtered out or the logger is
/// not initialized.
#[inline(always)]
pub fn log(target: &str, level: Level, args: core::fmt::Arguments) -> Result<bool> {
    match logger() {
        Some(mut logger) => logger.log(target, level, args),
        None => Ok(false),
    }
}

#[macro_export]
macro_rules! error {
    ($fmt:expr $(, $arg:expr)* $(,)?) => {
        $crate::log(module_path!(), $crate::Level::Error, format_args!($fmt, $($arg),*))
            .unwrap_or(false)
    };
}

#[macro_export]
macro_rules! warn {
    ($fmt:expr $(, $arg:expr)* $(,)?) => {
        $crate::log(module_path!(), $crate::Level::Warn, format_args!($fmt, $($arg),*))
            .unwrap_or(false)
    };
}

#[macro_export]
macro_rules! info {
    ($fmt:expr $(, $arg:expr)* $(,)?) => {
        $crate::log(module_path!(), $crate::Level::Info, format_args!($fmt, $($arg),*))
            .unwrap_or(false)
    };
}

#[macro_export]
macro_rules! debug {
    ($fmt:expr $(, $arg:expr)* $(,)?) => {
        $crate::log(module_path!(), $crate::Level::Debug, format_args!($fmt, $($arg),*))
            .unwrap_or(false)
    };
}

#[macro_export]
macro_rules! trace {
    ($fmt:expr $(, $arg:expr)* $(,)?) => {
        $crate::log(module_path!(), $crate::Level::Trace, format_args!($fmt, $($arg),*))
            .unwrap_or(false)
    };
}
