//! Output configuration.

use crate::config::DEFAULT_REMARK_KEY;

/// Configuration for output writers.
///
/// Controls the CSV delimiter, the remark column header and which optional
/// columns are written.
///
/// # Example
///
/// ```rust
/// use auditpack::core::models::OutputConfig;
///
/// let config = OutputConfig::new()
///     .with_delimiter(b';')
///     .with_remark_header("REMARKABLE")
///     .with_extra_fields();
///
/// assert_eq!(config.delimiter, b';');
/// assert!(config.include_sender);
/// ```
#[derive(Debug, Clone)]
pub struct OutputConfig {
    /// CSV field delimiter (default: `,`)
    pub delimiter: u8,
    /// Header of the remark column (default: `REMARK`)
    pub remark_header: String,
    /// Write the sender column (default: true)
    pub include_sender: bool,
    /// Write unrecognized fields in JSON outputs (default: false)
    pub include_extra_fields: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            delimiter: b',',
            remark_header: DEFAULT_REMARK_KEY.to_string(),
            include_sender: true,
            include_extra_fields: false,
        }
    }
}

impl OutputConfig {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    #[must_use]
    pub fn with_remark_header(mut self, header: impl Into<String>) -> Self {
        self.remark_header = header.into();
        self
    }

    #[must_use]
    pub fn without_sender(mut self) -> Self {
        self.include_sender = false;
        self
    }

    #[must_use]
    pub fn with_extra_fields(mut self) -> Self {
        self.include_extra_fields = true;
        self
    }
}
