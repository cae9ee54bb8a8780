//! Recoverable input errors.
//!
//! Both kinds come out of the modal text input and end up as a status message; neither
//! closes the modal or touches the buffer.

use shared::ArityError;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InputError {
    /// A comma-separated token is not a number
    #[error("'{token}' is not a number")]
    Format { token: String },
    /// Every token parsed but there are too many or too few for the kind
    #[error(transparent)]
    Arity(#[from] ArityError),
}
