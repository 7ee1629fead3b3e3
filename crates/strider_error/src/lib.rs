use std::backtrace::{Backtrace, BacktraceStatus};
use std::error::Error;
use std::fmt;

pub type Result<T, E = StriderError> = std::result::Result<T, E>;

/// Broad category of an error.
///
/// Callers reading data in a loop should check for `Exhausted` to know when to
/// stop. Every other kind is a real failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// No more data available at this granularity (page, column, scan).
    Exhausted,
    /// Input bytes did not match what the format requires.
    Malformed,
    /// Input is valid but uses a feature we can't read (codec, encoding, page
    /// type).
    Unsupported,
    /// Error from the underlying byte source.
    Io,
    Other,
}

#[derive(Debug)]
pub struct StriderError {
    inner: Box<StriderErrorInner>,
}

#[derive(Debug)]
struct StriderErrorInner {
    kind: ErrorKind,
    msg: String,
    source: Option<Box<dyn Error + Send + Sync>>,
    backtrace: Backtrace,
}

impl StriderError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self::with_kind_and_msg(ErrorKind::Other, msg)
    }

    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::with_kind_and_msg(ErrorKind::Malformed, msg)
    }

    pub fn unsupported(msg: impl Into<String>) -> Self {
        Self::with_kind_and_msg(ErrorKind::Unsupported, msg)
    }

    /// The "no more data" signal.
    ///
    /// Doesn't capture a backtrace since this is hit once for every page and
    /// column that gets read to completion.
    pub fn exhausted() -> Self {
        StriderError {
            inner: Box::new(StriderErrorInner {
                kind: ErrorKind::Exhausted,
                msg: "No more data".to_string(),
                source: None,
                backtrace: Backtrace::disabled(),
            }),
        }
    }

    /// Create an error wrapping `source`.
    ///
    /// If the source is itself a `StriderError`, its kind carries over to the
    /// new error.
    pub fn with_source(msg: impl Into<String>, source: Box<dyn Error + Send + Sync>) -> Self {
        let kind = source
            .downcast_ref::<StriderError>()
            .map(|err| err.kind())
            .unwrap_or(ErrorKind::Other);

        StriderError {
            inner: Box::new(StriderErrorInner {
                kind,
                msg: msg.into(),
                source: Some(source),
                backtrace: Backtrace::capture(),
            }),
        }
    }

    /// Override the kind of this error.
    pub fn with_kind(mut self, kind: ErrorKind) -> Self {
        self.inner.kind = kind;
        self
    }

    fn with_kind_and_msg(kind: ErrorKind, msg: impl Into<String>) -> Self {
        StriderError {
            inner: Box::new(StriderErrorInner {
                kind,
                msg: msg.into(),
                source: None,
                backtrace: Backtrace::capture(),
            }),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.inner.kind
    }

    pub fn is_exhausted(&self) -> bool {
        self.inner.kind == ErrorKind::Exhausted
    }

    pub fn get_msg(&self) -> &str {
        self.inner.msg.as_str()
    }

    pub fn get_backtrace(&self) -> Option<&Backtrace> {
        match self.inner.backtrace.status() {
            BacktraceStatus::Captured => Some(&self.inner.backtrace),
            _ => None,
        }
    }
}

impl From<std::io::Error> for StriderError {
    fn from(value: std::io::Error) -> Self {
        Self::with_source("I/O error", Box::new(value)).with_kind(ErrorKind::Io)
    }
}

impl fmt::Display for StriderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.inner.msg)?;
        if let Some(source) = &self.inner.source {
            write!(f, ": {source}")?;
        }
        Ok(())
    }
}

impl Error for StriderError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.inner
            .source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn Error + 'static))
    }
}

/// Attach context to arbitrary errors.
pub trait ResultExt<T, E> {
    fn context(self, msg: &'static str) -> Result<T>;
    fn context_fn<F: Fn() -> String>(self, f: F) -> Result<T>;
}

impl<T, E: Error + Send + Sync + 'static> ResultExt<T, E> for std::result::Result<T, E> {
    fn context(self, msg: &'static str) -> Result<T> {
        self.map_err(|e| StriderError::with_source(msg, Box::new(e)))
    }

    fn context_fn<F: Fn() -> String>(self, f: F) -> Result<T> {
        self.map_err(|e| StriderError::with_source(f(), Box::new(e)))
    }
}

/// Return early with an `Unsupported` error.
#[macro_export]
macro_rules! not_implemented {
    ($($arg:tt)+) => {{
        let msg = format!($($arg)+);
        return Err($crate::StriderError::unsupported(format!("Not yet implemented: {msg}")));
    }};
}
