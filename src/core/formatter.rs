//! Line formatting
//!
//! Produces `<color>[HH:MM:SS.mmm] [LEVEL] message<reset>\n` in a caller
//! supplied buffer.

use super::color::ColorScheme;
use super::log_level::LogLevel;
use super::timestamp::{Clock, ClockTime};
use std::fmt;
use std::io::Write;

/// Message body of a log line
#[derive(Debug, Clone, Copy)]
pub enum Message<'a> {
    /// Appended verbatim
    Literal(&'a str),
    /// Rendered through `format_args!` machinery
    Args(fmt::Arguments<'a>),
}

impl<'a> From<&'a str> for Message<'a> {
    fn from(s: &'a str) -> Self {
        Message::Literal(s)
    }
}

impl<'a> From<fmt::Arguments<'a>> for Message<'a> {
    fn from(args: fmt::Arguments<'a>) -> Self {
        Message::Args(args)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Formatter {
    colors: ColorScheme,
    clock: Clock,
}

impl Formatter {
    pub fn new(colors: ColorScheme, clock: Clock) -> Self {
        Self { colors, clock }
    }

    /// Format a line stamped with the current time
    pub fn format(&self, buf: &mut Vec<u8>, level: LogLevel, message: Message<'_>) {
        self.format_at(buf, level, self.clock.now(), message);
    }

    /// Format a line with an explicit time of day
    pub fn format_at(&self, buf: &mut Vec<u8>, level: LogLevel, time: ClockTime, message: Message<'_>) {
        buf.extend_from_slice(self.colors.prefix(level));
        buf.push(b'[');
        time.write_to(buf);
        buf.extend_from_slice(b"] [");
        buf.extend_from_slice(level.tag());
        buf.extend_from_slice(b"] ");
        match message {
            Message::Literal(s) => buf.extend_from_slice(s.as_bytes()),
            Message::Args(args) => {
                // Writing into a Vec only fails if a Display impl reports an
                // error; whatever was rendered up to that point is kept.
                let _ = buf.write_fmt(args);
            }
        }
        buf.extend_from_slice(self.colors.suffix());
        buf.push(b'\n');
    }

    pub fn colors(&self) -> &ColorScheme {
        &self.colors
    }

    pub fn clock(&self) -> Clock {
        self.clock
    }
}
