use thiserror::Error;

#[non_exhaustive]
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("command busy: {operation}")]
    Busy { operation: String },

    #[error("command not registered: {operation}")]
    NotRegistered { operation: String },

    #[error("command already registered: {operation}")]
    AlreadyRegistered { operation: String },

    #[error("parameter type mismatch: operation={operation}, expected={expected}")]
    ParameterMismatch {
        operation: String,
        expected: &'static str,
    },
}

pub type CommandResult<T> = Result<T, CommandError>;
