use tokio::sync::watch;

use crate::common::AccessToken;

/// Read side of the session: current access token and authenticated flag.
///
/// Clones share the same cells. Only the [`SessionWriter`] paired with the
/// store at construction can change them, and that writer is owned by the
/// session client.
#[derive(Clone, Debug)]
pub struct SessionStore {
    token: watch::Receiver<Option<AccessToken>>,
    authenticated: watch::Receiver<bool>,
}

/// Write side of the session. Not cloneable and not constructible outside
/// the crate.
#[derive(Debug)]
pub struct SessionWriter {
    token: watch::Sender<Option<AccessToken>>,
    authenticated: watch::Sender<bool>,
}

impl SessionStore {
    pub(crate) fn new() -> (SessionStore, SessionWriter) {
        let (token_tx, token_rx) = watch::channel(None);
        let (auth_tx, auth_rx) = watch::channel(false);
        (
            SessionStore {
                token: token_rx,
                authenticated: auth_rx,
            },
            SessionWriter {
                token: token_tx,
                authenticated: auth_tx,
            },
        )
    }

    /// Snapshot of the current access token.
    pub fn access_token(&self) -> Option<AccessToken> {
        self.token.borrow().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        *self.authenticated.borrow()
    }

    /// Observes every change of the access token.
    pub fn watch_token(&self) -> watch::Receiver<Option<AccessToken>> {
        self.token.clone()
    }

    /// Observes every change of the authenticated flag.
    pub fn watch_authenticated(&self) -> watch::Receiver<bool> {
        self.authenticated.clone()
    }
}

impl SessionWriter {
    /// A token was obtained: store it and mark the session authenticated.
    pub(crate) fn establish(&self, token: AccessToken) {
        self.token.send_replace(Some(token));
        self.authenticated.send_replace(true);
    }

    /// Drops the token and the authenticated flag together.
    pub(crate) fn clear(&self) {
        self.token.send_replace(None);
        self.authenticated.send_replace(false);
    }

    /// Result of a "who am I" probe. Leaves the token untouched.
    pub(crate) fn set_authenticated(&self, authenticated: bool) {
        self.authenticated.send_if_modified(|current| {
            let changed = *current != authenticated;
            *current = authenticated;
            changed
        });
    }
}
