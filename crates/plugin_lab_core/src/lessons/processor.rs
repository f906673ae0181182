//! Processor contract with default behavior and one concrete implementation.

use crate::sanitize::strip_tags;
use log::Level;
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Processing counters reported by [`Processor::stats`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProcessorStats {
    pub processed_count: u64,
    pub error_count: u64,
    pub last_processed: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessorError {
    /// Input was empty (or `"0"`).
    InvalidInput,
}

impl Display for ProcessorError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidInput => write!(f, "data is not valid for processing"),
        }
    }
}

impl Error for ProcessorError {}

/// Text processor with overridable defaults.
///
/// Only [`Processor::process`] is required.
pub trait Processor {
    fn process(&mut self, data: &str) -> Result<String, ProcessorError>;

    fn name(&self) -> &str {
        "Abstract Processor"
    }

    fn stats(&self) -> ProcessorStats {
        ProcessorStats::default()
    }

    /// Strips tags and trims.
    fn sanitize(&self, input: &str) -> String {
        strip_tags(input).trim().to_string()
    }

    /// Rejects `""` and `"0"`.
    fn validate(&self, data: &str) -> bool {
        !data.is_empty() && data != "0"
    }

    /// Logs `message` at `level` (`info` when unknown). Returns whether both
    /// were non-empty.
    fn log(&self, message: &str, level: &str) -> bool {
        let log_level = level.parse::<Level>().unwrap_or(Level::Info);
        log::log!(
            log_level,
            "event=processor_log module=lessons processor={} length={}",
            self.name(),
            message.len()
        );
        !message.is_empty() && !level.is_empty()
    }
}

/// Sanitizing processor that remembers what it handled.
#[derive(Debug, Default)]
pub struct TextProcessor {
    processed: Vec<String>,
}

impl TextProcessor {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Processor for TextProcessor {
    fn process(&mut self, data: &str) -> Result<String, ProcessorError> {
        if !self.validate(data) {
            return Err(ProcessorError::InvalidInput);
        }

        let sanitized = self.sanitize(data);
        self.processed.push(sanitized.clone());
        self.log(&format!("processed: {sanitized}"), "info");
        Ok(sanitized)
    }

    fn name(&self) -> &str {
        "Text Processor"
    }

    fn stats(&self) -> ProcessorStats {
        ProcessorStats {
            processed_count: self.processed.len() as u64,
            error_count: 0,
            last_processed: self.processed.last().filter(|s| !s.is_empty()).cloned(),
        }
    }
}
