//! Session invalidation state machine
//!
//! Two states, `Valid` and `Invalidated`. The first 401 observed for the
//! current session clears the credential store and sends the user to the
//! sign-in route; every later 401 is absorbed until a fresh sign-in.
//!
//! Each successful sign-in starts a new *epoch*. Requests remember the epoch
//! they were issued under, and a rejection from an older epoch never ends the
//! session that replaced it.

use crate::api::auth::AuthApi;
use crate::api::types::{LoginRequest, RegisterRequest};
use crate::auth::events::{SessionObserver, SIGN_IN_ROUTE};
use crate::auth::storage::{Credential, CredentialStore};
use crate::core::error::Result;
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Valid,
    Invalidated,
}

struct GuardState {
    phase: SessionPhase,
    epoch: u64,
}

/// Owns the session phase and is the single mutator of the credential store
pub struct SessionGuard {
    store: Arc<CredentialStore>,
    observer: Arc<dyn SessionObserver>,
    state: Mutex<GuardState>,
}

impl SessionGuard {
    pub fn new(store: Arc<CredentialStore>, observer: Arc<dyn SessionObserver>) -> Self {
        Self {
            store,
            observer,
            state: Mutex::new(GuardState {
                phase: SessionPhase::Valid,
                epoch: 0,
            }),
        }
    }

    pub fn store(&self) -> &Arc<CredentialStore> {
        &self.store
    }

    pub fn phase(&self) -> SessionPhase {
        self.state.lock().phase
    }

    /// Epoch to stamp on a request being issued now
    pub fn epoch(&self) -> u64 {
        self.state.lock().epoch
    }

    /// React to an authorization failure for a request issued in `issued_epoch`.
    ///
    /// Returns `true` only for the call that performed the transition. The
    /// store is cleared under the state lock, so concurrent failures collapse
    /// into one clear. Observers run after the lock is released and may call
    /// back into the guard.
    pub fn invalidate(&self, issued_epoch: u64) -> bool {
        {
            let mut state = self.state.lock();
            if state.phase == SessionPhase::Invalidated || state.epoch != issued_epoch {
                return false;
            }
            state.phase = SessionPhase::Invalidated;

            warn!(epoch = issued_epoch, "Credential rejected by server, ending session");
            if let Err(e) = self.store.clear() {
                warn!("Failed to clear credential store: {}", e);
            }
        }
        self.observer.navigate(SIGN_IN_ROUTE);
        true
    }

    /// Accept a fresh credential and return to `Valid` under a new epoch
    pub fn signed_in(&self, credential: Credential) -> Result<()> {
        let username = credential.user.username.clone();
        {
            let mut state = self.state.lock();
            self.store.set(credential)?;
            state.epoch += 1;
            state.phase = SessionPhase::Valid;
            info!(user = %username, epoch = state.epoch, "Signed in");
        }
        self.observer.signed_in(&username);
        Ok(())
    }

    /// Explicit logout. Late rejections for the ended session are absorbed.
    ///
    /// If the persisted copy cannot be removed the session stays `Valid`
    /// and the error is returned.
    pub fn sign_out(&self) -> Result<()> {
        {
            let mut state = self.state.lock();
            self.store.clear()?;
            state.phase = SessionPhase::Invalidated;
        }

        info!("Signed out");
        self.observer.signed_out();
        self.observer.navigate(SIGN_IN_ROUTE);
        Ok(())
    }

    /// Log in and start a new session with the returned credential
    pub async fn login(&self, api: &AuthApi, request: &LoginRequest) -> Result<Credential> {
        let credential = api.login(request).await?;
        self.signed_in(credential.clone())?;
        Ok(credential)
    }

    /// Register, which also signs the new user in
    pub async fn register(&self, api: &AuthApi, request: &RegisterRequest) -> Result<Credential> {
        let credential = api.register(request).await?;
        self.signed_in(credential.clone())?;
        Ok(credential)
    }
}
