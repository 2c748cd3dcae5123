//! Unique suffix generation for IN-list placeholders.

use uuid::Uuid;

/// Source of placeholder suffixes used when a parameter is expanded into a list.
///
/// Every call must return a value that has not been returned before within the
/// same binder run.
pub trait SuffixGenerator {
    fn next_suffix(&mut self) -> String;
}

/// Random UUID v4 suffixes with `-` replaced by `_` so the result stays a
/// valid bind identifier.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidSuffix;

impl SuffixGenerator for UuidSuffix {
    fn next_suffix(&mut self) -> String {
        Uuid::new_v4().to_string().replace('-', "_")
    }
}

/// Deterministic `_1`, `_2`, ... suffixes.
///
/// Useful when the rewritten SQL has to be compared verbatim.
#[derive(Debug, Clone, Default)]
pub struct SequentialSuffix {
    counter: usize,
}

impl SequentialSuffix {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SuffixGenerator for SequentialSuffix {
    fn next_suffix(&mut self) -> String {
        self.counter += 1;
        format!("_{}", self.counter)
    }
}
