//! Definition of errors.

use std::error::Error;
use std::fmt;

pub type Result<T, E = LidgramError> = std::result::Result<T, E>;

#[derive(Debug)]
pub enum LidgramError {
    InvalidConfig(InvalidConfigError),
    InvalidFormat(InvalidFormatError),
    UTF8Error(std::string::FromUtf8Error),
    CastError(std::num::TryFromIntError),
    IOError(std::io::Error),
}

impl LidgramError {
    pub(crate) fn invalid_config<S>(arg: &'static str, msg: S) -> Self
    where
        S: Into<String>,
    {
        Self::InvalidConfig(InvalidConfigError {
            arg,
            msg: msg.into(),
        })
    }

    pub(crate) fn invalid_format<S>(msg: S) -> Self
    where
        S: Into<String>,
    {
        Self::InvalidFormat(InvalidFormatError { msg: msg.into() })
    }
}

impl fmt::Display for LidgramError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::InvalidConfig(e) => e.fmt(f),
            Self::InvalidFormat(e) => e.fmt(f),
            Self::UTF8Error(e) => e.fmt(f),
            Self::CastError(e) => e.fmt(f),
            Self::IOError(e) => e.fmt(f),
        }
    }
}

impl Error for LidgramError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidConfig(e) => Some(e),
            Self::InvalidFormat(e) => Some(e),
            Self::UTF8Error(e) => Some(e),
            Self::CastError(e) => Some(e),
            Self::IOError(e) => Some(e),
        }
    }
}

/// Error used when a configuration value (n-gram order, language mapping, option combination)
/// is unusable. Raised before any output is written.
#[derive(Debug)]
pub struct InvalidConfigError {
    /// Name of the argument.
    pub(crate) arg: &'static str,

    /// Error message.
    pub(crate) msg: String,
}

impl InvalidConfigError {
    /// Gets the name of the offending argument.
    pub const fn arg(&self) -> &'static str {
        self.arg
    }

    /// Gets the error message.
    pub fn msg(&self) -> &str {
        &self.msg
    }
}

impl fmt::Display for InvalidConfigError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "InvalidConfigError: {}: {}", self.arg, self.msg)
    }
}

impl Error for InvalidConfigError {}

/// Error used when a model stream is structurally broken, e.g. truncated mid-record.
#[derive(Debug)]
pub struct InvalidFormatError {
    /// Error message.
    pub(crate) msg: String,
}

impl InvalidFormatError {
    /// Gets the error message.
    pub fn msg(&self) -> &str {
        &self.msg
    }
}

impl fmt::Display for InvalidFormatError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "InvalidFormatError: {}", self.msg)
    }
}

impl Error for InvalidFormatError {}

impl From<std::string::FromUtf8Error> for LidgramError {
    fn from(error: std::string::FromUtf8Error) -> Self {
        Self::UTF8Error(error)
    }
}

impl From<std::num::TryFromIntError> for LidgramError {
    fn from(error: std::num::TryFromIntError) -> Self {
        Self::CastError(error)
    }
}

impl From<std::io::Error> for LidgramError {
    fn from(error: std::io::Error) -> Self {
        Self::IOError(error)
    }
}
