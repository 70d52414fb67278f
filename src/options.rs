//! Reader configuration.

/// Options for reading a book.
///
/// # Example
///
/// ```
/// use bindery::ReadOptions;
///
/// let options = ReadOptions::new().with_workers(4).with_strict_spine(true);
/// assert_eq!(options.workers, 4);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadOptions {
    /// Number of threads used to load archive entries. `1` (the default)
    /// loads everything on the calling thread.
    pub workers: usize,
    /// If true, a spine itemref naming no manifest item fails the read
    /// instead of being skipped.
    pub strict_spine: bool,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            workers: 1,
            strict_spine: false,
        }
    }
}

impl ReadOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of loader threads. Zero is treated as one.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    pub fn with_strict_spine(mut self, strict: bool) -> Self {
        self.strict_spine = strict;
        self
    }
}
