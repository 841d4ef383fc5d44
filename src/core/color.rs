//! ANSI color handling
//!
//! Colors are resolved once when the logger is built. A disabled scheme holds
//! empty byte strings, so formatting appends prefix and suffix unconditionally.

use super::log_level::LogLevel;
use serde::{Deserialize, Serialize};
use std::ffi::OsStr;
use std::io::IsTerminal;

/// Environment variable that forces color off when set to a non-empty value
pub const NO_COLOR_ENV: &str = "NO_COLOR";

const RESET: &[u8] = b"\x1b[0m";

/// When to emit ANSI escape sequences
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    /// Color only when writing to stdout and stdout is a terminal
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorMode {
    /// Decide whether color is on
    ///
    /// `to_stdout` is false when the logger was given a custom writer; such a
    /// sink is never assumed to be a terminal.
    pub fn resolve(self, to_stdout: bool) -> bool {
        let no_color = std::env::var_os(NO_COLOR_ENV);
        self.resolve_with(
            no_color.as_deref(),
            to_stdout && std::io::stdout().is_terminal(),
        )
    }

    pub(crate) fn resolve_with(self, no_color: Option<&OsStr>, is_terminal: bool) -> bool {
        match self {
            ColorMode::Always => true,
            ColorMode::Never => false,
            ColorMode::Auto => no_color.map_or(true, OsStr::is_empty) && is_terminal,
        }
    }
}

/// Per-level prefix bytes plus the shared reset suffix
#[derive(Debug, Clone)]
pub struct ColorScheme {
    prefixes: [Box<[u8]>; 5],
    suffix: Box<[u8]>,
}

impl ColorScheme {
    /// Scheme that emits no escape sequences
    pub fn plain() -> Self {
        Self {
            prefixes: Default::default(),
            suffix: Box::default(),
        }
    }

    /// ANSI scheme with each level's default color
    pub fn ansi() -> Self {
        Self::with_palette(LogLevel::ALL.map(|level| level.color_code()))
    }

    /// ANSI scheme from an explicit palette indexed like [`LogLevel::ALL`]
    pub fn with_palette(palette: [colored::Color; 5]) -> Self {
        enable_virtual_terminal();
        Self {
            prefixes: palette.map(|color| {
                format!("\x1b[{}m", color.to_fg_str())
                    .into_bytes()
                    .into_boxed_slice()
            }),
            suffix: RESET.into(),
        }
    }

    #[inline]
    pub fn prefix(&self, level: LogLevel) -> &[u8] {
        &self.prefixes[level.index()]
    }

    #[inline]
    pub fn suffix(&self) -> &[u8] {
        &self.suffix
    }

    pub fn is_enabled(&self) -> bool {
        !self.suffix.is_empty()
    }
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self::plain()
    }
}

#[cfg(windows)]
fn enable_virtual_terminal() {
    // Older consoles ignore escape sequences until VT processing is switched on.
    let _ = colored::control::set_virtual_terminal(true);
}

#[cfg(not(windows))]
fn enable_virtual_terminal() {}
