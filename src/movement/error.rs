use std::fmt;

/// Errors raised while wiring up a controller.
#[derive(Debug, Clone, PartialEq)]
pub enum ControllerError {
    /// A required collaborator (input source, physics query) was not provided.
    MissingCollaborator(&'static str),
    InvalidTuning { field: &'static str, reason: String },
}

impl ControllerError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidTuning {
            field,
            reason: reason.into(),
        }
    }
}

impl fmt::Display for ControllerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingCollaborator(name) => write!(f, "missing collaborator: {name}"),
            Self::InvalidTuning { field, reason } => {
                write!(f, "invalid tuning `{field}`: {reason}")
            }
        }
    }
}

impl std::error::Error for ControllerError {}
