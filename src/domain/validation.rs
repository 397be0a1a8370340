use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    Empty { field: &'static str },
    OutOfRange { field: &'static str, min: u32, max: u32, actual: u32 },
    InvalidIdentifier { field: &'static str, input: String },
    InvalidQuery { input: String, reason: &'static str },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty { field } => write!(f, "{field} must not be empty"),
            Self::OutOfRange {
                field,
                min,
                max,
                actual,
            } => {
                write!(
                    f,
                    "{field} out of range: {actual} (expected {min}..={max})"
                )
            }
            Self::InvalidIdentifier { field, input } => {
                write!(f, "{field} must be a single identifier: {input}")
            }
            Self::InvalidQuery { input, reason } => {
                write!(f, "invalid ZOQL query ({reason}): {input}")
            }
        }
    }
}

impl std::error::Error for ValidationError {}
