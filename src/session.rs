//! Session state: who is using the client right now
//!
//! The token stored under [`StorageKey::Token`] is the only source of truth
//! for "authenticated". [`Session::restore`] re-derives the in-memory state
//! from storage at startup, and every mutation writes storage first.

use std::sync::{Arc, PoisonError, RwLock};

use crate::{
    api::ApiClient,
    error::AppResult,
    models::{LoginRequest, User},
    storage::{LocalStore, StorageKey},
};

#[derive(Debug, Default, Clone)]
struct SessionState {
    token: Option<String>,
    user: Option<User>,
}

/// Credential and profile shared by every outbound call
pub struct Session {
    store: Arc<dyn LocalStore>,
    state: RwLock<SessionState>,
}

impl Session {
    /// Rebuilds the session from durable storage
    ///
    /// A profile without a token is stale and gets dropped; an unreadable
    /// profile is logged and ignored so a corrupt file never blocks startup.
    pub fn restore(store: Arc<dyn LocalStore>) -> AppResult<Self> {
        let token = store.get(StorageKey::Token)?.filter(|t| !t.trim().is_empty());

        let user = match token {
            Some(_) => match store.get_json::<User>(StorageKey::User) {
                Ok(user) => user,
                Err(e) => {
                    tracing::warn!(error = %e, "Ignoring unreadable stored profile");
                    None
                }
            },
            None => {
                store.remove(StorageKey::User)?;
                None
            }
        };

        tracing::info!(
            authenticated = token.is_some(),
            username = user.as_ref().map(|u| u.username.as_str()).unwrap_or("-"),
            "Session restored"
        );

        Ok(Self {
            store,
            state: RwLock::new(SessionState { token, user }),
        })
    }

    /// Current bearer token, if signed in
    pub fn current_token(&self) -> Option<String> {
        self.read().token.clone()
    }

    /// Sets or clears the bearer token, mirroring it into durable storage
    pub fn set_token(&self, token: Option<String>) -> AppResult<()> {
        match &token {
            Some(value) => self.store.set(StorageKey::Token, value)?,
            None => self.store.remove(StorageKey::Token)?,
        }
        self.write().token = token;
        Ok(())
    }

    pub fn user(&self) -> Option<User> {
        self.read().user.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.read().token.is_some()
    }

    pub fn store(&self) -> Arc<dyn LocalStore> {
        Arc::clone(&self.store)
    }

    /// Signs in and persists the credential and profile.
    ///
    /// On failure nothing changes and the error is handed back for inline
    /// display (see [`AppError::user_message`](crate::error::AppError::user_message)).
    pub async fn login(&self, api: &ApiClient, credentials: &LoginRequest) -> AppResult<User> {
        let data = api.login(credentials).await.map_err(|e| {
            tracing::warn!(username = %credentials.username, error = %e, "Login failed");
            e
        })?;

        self.store.set_json(StorageKey::User, &data.user)?;
        self.store.set(StorageKey::Token, &data.access_token)?;
        {
            let mut state = self.write();
            state.token = Some(data.access_token);
            state.user = Some(data.user.clone());
        }

        tracing::info!(username = %data.user.username, "Logged in");
        Ok(data.user)
    }

    /// Signs out and returns to the anonymous state.
    ///
    /// The server-side logout is best effort; local state is cleared even
    /// when it fails.
    pub async fn logout(&self, api: &ApiClient) -> AppResult<()> {
        if self.is_authenticated() {
            if let Err(e) = api.logout().await {
                tracing::warn!(error = %e, "Server logout failed, clearing local session anyway");
            }
        }

        self.store.remove(StorageKey::Token)?;
        self.store.remove(StorageKey::User)?;
        *self.write() = SessionState::default();

        tracing::info!("Logged out");
        Ok(())
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, SessionState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, SessionState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}
