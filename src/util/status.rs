use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Code {
    InvalidArgument,
    Corruption,
    IOError,
    Iteration,
}

#[derive(Debug, Clone)]
pub struct Status {
    code: Code,
    message: Option<String>,
}

impl Status {
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Status {
            code: Code::InvalidArgument,
            message: Some(msg.into()),
        }
    }

    pub fn corruption(msg: impl Into<String>) -> Self {
        Status {
            code: Code::Corruption,
            message: Some(msg.into()),
        }
    }

    pub fn io_error(msg: impl Into<String>) -> Self {
        Status {
            code: Code::IOError,
            message: Some(msg.into()),
        }
    }

    /// Error raised by an underlying trie iterator.
    ///
    /// Adapters use this to wrap their storage errors; bounded and tracked
    /// iterators forward it as-is.
    pub fn iteration(msg: impl Into<String>) -> Self {
        Status {
            code: Code::Iteration,
            message: Some(msg.into()),
        }
    }

    pub fn is_invalid_argument(&self) -> bool {
        self.code == Code::InvalidArgument
    }

    pub fn is_corruption(&self) -> bool {
        self.code == Code::Corruption
    }

    pub fn is_io_error(&self) -> bool {
        self.code == Code::IOError
    }

    pub fn code(&self) -> &Code {
        &self.code
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.message {
            Some(msg) => write!(f, "{:?}: {}", self.code, msg),
            None => write!(f, "{:?}", self.code),
        }
    }
}

impl std::error::Error for Status {}

impl From<std::io::Error> for Status {
    fn from(err: std::io::Error) -> Self {
        Status::io_error(err.to_string())
    }
}

impl From<serde_json::Error> for Status {
    fn from(err: serde_json::Error) -> Self {
        Status::corruption(err.to_string())
    }
}

impl From<hex::FromHexError> for Status {
    fn from(err: hex::FromHexError) -> Self {
        Status::corruption(format!("invalid hex: {err}"))
    }
}

pub type Result<T> = std::result::Result<T, Status>;
