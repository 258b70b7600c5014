//! Utilities: leveled logging to stderr and ANSI color for the status line.
//!
//! Key items:
//!   init_logging / derive_level
//!   log_error! / log_info! / log_debug! / log_trace!
//!   output::color / output::Color

/// Logging helpers.
///
/// stdout carries only the `Saved <file>` line, so every record goes to stderr as
/// `[LEVEL][unix-ms] message`.
pub mod logging {
    use std::fmt;
    use std::sync::atomic::{AtomicU8, Ordering};
    use std::time::{SystemTime, UNIX_EPOCH};

    #[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd)]
    pub enum LogLevel {
        Error = 0,
        Info = 1,
        Debug = 2,
        Trace = 3,
    }

    impl LogLevel {
        pub fn as_str(&self) -> &'static str {
            match self {
                LogLevel::Error => "ERROR",
                LogLevel::Info => "INFO",
                LogLevel::Debug => "DEBUG",
                LogLevel::Trace => "TRACE",
            }
        }

        pub(crate) fn from_u8(raw: u8) -> Self {
            match raw {
                0 => LogLevel::Error,
                1 => LogLevel::Info,
                2 => LogLevel::Debug,
                _ => LogLevel::Trace,
            }
        }
    }

    static LEVEL: AtomicU8 = AtomicU8::new(LogLevel::Info as u8);

    pub fn init_logging(level: LogLevel) {
        LEVEL.store(level as u8, Ordering::Relaxed);
    }

    pub fn current_log_level() -> LogLevel {
        LogLevel::from_u8(LEVEL.load(Ordering::Relaxed))
    }

    /// `-q` forces errors only; otherwise each `-v` raises the level one step.
    pub fn derive_level(verbose: u8, quiet: bool) -> LogLevel {
        if quiet {
            return LogLevel::Error;
        }
        match verbose {
            0 => LogLevel::Info,
            1 => LogLevel::Debug,
            _ => LogLevel::Trace,
        }
    }

    pub fn enabled(level: LogLevel) -> bool {
        level <= current_log_level()
    }

    pub fn log(level: LogLevel, args: fmt::Arguments<'_>) {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or(0);
        eprintln!("[{}][{millis}] {args}", level.as_str());
    }

    #[doc(hidden)]
    #[macro_export]
    macro_rules! __glean_log {
        ($level:ident, $($t:tt)*) => {{
            let level = $crate::utils::logging::LogLevel::$level;
            if $crate::utils::logging::enabled(level) {
                $crate::utils::logging::log(level, format_args!($($t)*));
            }
        }};
    }

    #[macro_export]
    macro_rules! log_error {
        ($($t:tt)*) => { $crate::__glean_log!(Error, $($t)*) };
    }
    #[macro_export]
    macro_rules! log_info {
        ($($t:tt)*) => { $crate::__glean_log!(Info, $($t)*) };
    }
    #[macro_export]
    macro_rules! log_debug {
        ($($t:tt)*) => { $crate::__glean_log!(Debug, $($t)*) };
    }
    #[macro_export]
    macro_rules! log_trace {
        ($($t:tt)*) => { $crate::__glean_log!(Trace, $($t)*) };
    }
}

pub use logging::{derive_level, init_logging};

/// Terminal output helpers.
pub mod output {
    use std::io::IsTerminal;

    #[derive(Copy, Clone, Debug)]
    pub enum Color {
        Green,
    }

    impl Color {
        fn as_code(&self) -> &'static str {
            match self {
                Color::Green => "\x1b[32m",
            }
        }
    }

    /// Color `text` for stdout: only when stdout is a terminal and NO_COLOR is unset.
    pub fn color(c: Color, text: impl AsRef<str>) -> String {
        let enabled = std::env::var_os("NO_COLOR").is_none() && std::io::stdout().is_terminal();
        paint(c, text.as_ref(), enabled)
    }

    pub(crate) fn paint(c: Color, text: &str, enabled: bool) -> String {
        if enabled {
            format!("{}{text}\x1b[0m", c.as_code())
        } else {
            text.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::logging::{LogLevel, derive_level};
    use super::output::{Color, paint};

    #[test]
    fn quiet_wins_over_verbose() {
        assert_eq!(derive_level(2, true), LogLevel::Error);
    }

    #[test]
    fn verbosity_steps() {
        assert_eq!(derive_level(0, false), LogLevel::Info);
        assert_eq!(derive_level(1, false), LogLevel::Debug);
        assert_eq!(derive_level(5, false), LogLevel::Trace);
    }

    #[test]
    fn stored_level_decodes() {
        for level in [LogLevel::Error, LogLevel::Info, LogLevel::Debug, LogLevel::Trace] {
            assert_eq!(LogLevel::from_u8(level as u8), level);
        }
        assert_eq!(LogLevel::from_u8(200), LogLevel::Trace);
        assert!(LogLevel::Error < LogLevel::Info);
    }

    #[test]
    fn paint_wraps_only_when_enabled() {
        assert_eq!(paint(Color::Green, "Saved x", true), "\x1b[32mSaved x\x1b[0m");
        assert_eq!(paint(Color::Green, "Saved x", false), "Saved x");
    }
}
