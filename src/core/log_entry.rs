//! Log entry structure

use super::log_level::LogLevel;

/// One formatted line travelling from a producer to the writer thread
///
/// The payload is a pooled buffer; whoever holds the entry owns it and is
/// responsible for handing it back to the pool.
#[derive(Debug)]
pub struct LogEntry {
    level: LogLevel,
    payload: Vec<u8>,
}

impl LogEntry {
    pub fn new(level: LogLevel, payload: Vec<u8>) -> Self {
        Self { level, payload }
    }

    pub fn level(&self) -> LogLevel {
        self.level
    }

    pub fn level_tag(&self) -> &'static [u8] {
        self.level.tag()
    }

    /// Fully formatted bytes, trailing newline included
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Give up the entry and take back its buffer
    pub fn into_payload(self) -> Vec<u8> {
        self.payload
    }
}
