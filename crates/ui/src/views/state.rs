use dioxus::prelude::*;
use services::ErrorKind;

const UNKNOWN_MESSAGE: &str = "Something went wrong. Please try again.";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ViewError {
    Unknown,
    /// No usable session; the view offers a way back to login.
    SignedOut(String),
    /// A message meant for the user, shown as-is.
    Notice(String),
}

impl ViewError {
    /// Classify a service error for display.
    #[must_use]
    pub fn from_service(kind: ErrorKind, message: String) -> Self {
        match kind {
            ErrorKind::Auth => Self::SignedOut(message),
            _ => Self::Notice(message),
        }
    }

    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            ViewError::Unknown => UNKNOWN_MESSAGE,
            ViewError::SignedOut(message) | ViewError::Notice(message) => message,
        }
    }

    #[must_use]
    pub fn is_signed_out(&self) -> bool {
        matches!(self, ViewError::SignedOut(_))
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ViewState<T> {
    Idle,
    Loading,
    Ready(T),
    Error(ViewError),
}

#[must_use]
pub fn view_state_from_resource<T: Clone>(
    resource: &Resource<Result<T, ViewError>>,
) -> ViewState<T> {
    match resource.state().cloned() {
        UseResourceState::Pending => ViewState::Loading,
        UseResourceState::Ready => match resource.value().read().as_ref() {
            Some(Ok(data)) => ViewState::Ready(data.clone()),
            Some(Err(err)) => ViewState::Error(err.clone()),
            None => ViewState::Error(ViewError::Unknown),
        },
        UseResourceState::Paused | UseResourceState::Stopped => ViewState::Idle,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_failures_become_signed_out() {
        let err = ViewError::from_service(ErrorKind::Auth, "Please log in".into());
        assert!(err.is_signed_out());
        assert_eq!(err.message(), "Please log in");
    }

    #[test]
    fn other_failures_are_notices() {
        let err = ViewError::from_service(ErrorKind::Network, "offline".into());
        assert_eq!(err, ViewError::Notice("offline".into()));
        assert_eq!(ViewError::Unknown.message(), UNKNOWN_MESSAGE);
    }
}
