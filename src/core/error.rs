//! Core error types for the attack pipeline

/// Error types for lattice construction, reduction, and attack configuration
#[derive(Debug, Clone)]
pub enum AttackError {
    /// Invalid matrix dimensions
    InvalidDimensions {
        expected: (usize, usize),
        found: (usize, usize),
    },

    /// Invalid parameters (bad delta, lattice dimension < 2, m < 1, ...)
    InvalidParameters(String),

    /// Numerical instability detected during reduction
    NumericalInstability(String),

    /// Custom error with message
    Custom(String),
}

impl std::fmt::Display for AttackError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AttackError::InvalidDimensions { expected, found } => {
                write!(f, "Invalid dimensions: expected {:?}, found {:?}", expected, found)
            }
            AttackError::InvalidParameters(msg) => {
                write!(f, "Invalid parameters: {}", msg)
            }
            AttackError::NumericalInstability(msg) => {
                write!(f, "Numerical instability: {}", msg)
            }
            AttackError::Custom(msg) => {
                write!(f, "Error: {}", msg)
            }
        }
    }
}

impl std::error::Error for AttackError {}

/// Result type for attack operations
pub type Result<T> = std::result::Result<T, AttackError>;

impl AttackError {
    /// Create a custom error with the given message
    pub fn custom(msg: impl Into<String>) -> Self {
        AttackError::Custom(msg.into())
    }

    /// Create an invalid dimensions error
    pub fn invalid_dimensions(expected: (usize, usize), found: (usize, usize)) -> Self {
        AttackError::InvalidDimensions { expected, found }
    }

    /// Create an invalid parameters error
    pub fn invalid_parameters(msg: impl Into<String>) -> Self {
        AttackError::InvalidParameters(msg.into())
    }

    /// Create a numerical instability error
    pub fn numerical_instability(msg: impl Into<String>) -> Self {
        AttackError::NumericalInstability(msg.into())
    }
}
