use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::watch;

use crate::flows::redirect::Redirect;
use crate::routes::{Navigator, Route};

pub const MIN_PASSWORD_LEN: usize = 8;

/// What an account page shows.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FlowStatus {
    #[default]
    Idle,
    Submitting,
    Succeeded(String),
    Failed(String),
}

impl FlowStatus {
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Succeeded(msg) | Self::Failed(msg) => Some(msg),
            Self::Idle | Self::Submitting => None,
        }
    }
}

/// Client-side form problems, caught before any request is made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum FieldError {
    #[error("Please fill in all required fields.")]
    Missing,
    #[error("Please enter a valid email address.")]
    InvalidEmail,
    #[error("Password must be at least 8 characters long.")]
    PasswordTooShort,
    #[error("Passwords do not match.")]
    PasswordMismatch,
}

pub fn require(fields: &[&str]) -> Result<(), FieldError> {
    if fields.iter().any(|f| f.trim().is_empty()) {
        Err(FieldError::Missing)
    } else {
        Ok(())
    }
}

pub fn validate_email(email: &str) -> Result<(), FieldError> {
    require(&[email])?;
    match email.trim().split_once('@') {
        Some((local, domain))
            if !local.is_empty()
                && !domain.is_empty()
                && !domain.contains('@')
                && !email.trim().contains(char::is_whitespace) =>
        {
            Ok(())
        }
        _ => Err(FieldError::InvalidEmail),
    }
}

pub fn validate_passwords(password: &str, confirm: &str) -> Result<(), FieldError> {
    require(&[password, confirm])?;
    if password != confirm {
        return Err(FieldError::PasswordMismatch);
    }
    Ok(())
}

/// Status cell, navigation and pending redirect shared by every flow.
pub(crate) struct FlowCore {
    navigator: Arc<dyn Navigator>,
    redirect_delay: Duration,
    status: watch::Sender<FlowStatus>,
    redirect: Mutex<Option<Redirect>>,
}

impl FlowCore {
    pub(crate) fn new(navigator: Arc<dyn Navigator>, redirect_delay: Duration) -> Self {
        Self {
            navigator,
            redirect_delay,
            status: watch::Sender::new(FlowStatus::Idle),
            redirect: Mutex::new(None),
        }
    }

    pub(crate) fn status(&self) -> FlowStatus {
        self.status.borrow().clone()
    }

    pub(crate) fn watch(&self) -> watch::Receiver<FlowStatus> {
        self.status.subscribe()
    }

    /// Enters `Submitting`. Returns false, changing nothing, when a
    /// submission is already running.
    pub(crate) fn begin(&self) -> bool {
        self.status.send_if_modified(|status| {
            if *status == FlowStatus::Submitting {
                false
            } else {
                *status = FlowStatus::Submitting;
                true
            }
        })
    }

    pub(crate) fn succeed(&self, message: impl Into<String>) -> FlowStatus {
        self.finish(FlowStatus::Succeeded(message.into()))
    }

    pub(crate) fn fail(&self, message: impl Into<String>) -> FlowStatus {
        self.finish(FlowStatus::Failed(message.into()))
    }

    /// Reports a client-side check failure. A running submission keeps its
    /// `Submitting` status and the in-flight guard stays closed.
    pub(crate) fn reject(&self, message: impl Into<String>) -> FlowStatus {
        let mut shown = FlowStatus::Submitting;
        self.status.send_if_modified(|status| {
            if *status == FlowStatus::Submitting {
                return false;
            }
            *status = FlowStatus::Failed(message.into());
            shown = status.clone();
            true
        });
        shown
    }

    fn finish(&self, status: FlowStatus) -> FlowStatus {
        self.status.send_replace(status.clone());
        status
    }

    pub(crate) fn navigate(&self, route: Route) {
        self.navigator.navigate(route);
    }

    /// Sends the user to the login page after the configured delay.
    pub(crate) fn redirect_to_login(&self) {
        let redirect = Redirect::schedule(self.navigator.clone(), Route::LogIn, self.redirect_delay);
        *self.redirect.lock() = Some(redirect);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordingNavigator;

    #[test]
    fn test_email_validation() {
        assert_eq!(validate_email(""), Err(FieldError::Missing));
        assert_eq!(validate_email("nobody"), Err(FieldError::InvalidEmail));
        assert_eq!(validate_email("a@"), Err(FieldError::InvalidEmail));
        assert_eq!(validate_email("a b@c.de"), Err(FieldError::InvalidEmail));
        assert_eq!(validate_email("a@b@c"), Err(FieldError::InvalidEmail));
        assert_eq!(validate_email(" user@example.com "), Ok(()));
    }

    #[test]
    fn test_password_validation() {
        assert_eq!(validate_passwords("secret12", ""), Err(FieldError::Missing));
        assert_eq!(
            validate_passwords("secret12", "secret13"),
            Err(FieldError::PasswordMismatch)
        );
        assert_eq!(validate_passwords("secret12", "secret12"), Ok(()));
    }

    #[test]
    fn test_begin_rejects_second_submission() {
        let core = FlowCore::new(RecordingNavigator::new(), Duration::from_secs(3));
        let mut rx = core.watch();
        assert!(core.begin());
        assert!(!core.begin());
        assert_eq!(*rx.borrow_and_update(), FlowStatus::Submitting);

        core.fail("nope");
        assert_eq!(core.status().message(), Some("nope"));
        assert!(core.begin());
    }

    #[test]
    fn test_reject_keeps_running_submission() {
        let core = FlowCore::new(RecordingNavigator::new(), Duration::from_secs(3));
        assert_eq!(core.reject("bad"), FlowStatus::Failed("bad".into()));

        assert!(core.begin());
        assert_eq!(core.reject("bad"), FlowStatus::Submitting);
        assert_eq!(core.status(), FlowStatus::Submitting);
        assert!(!core.begin());
    }
}
