//! Process-wide session state for the presentation layer.
//!
//! `SessionContext` is the single source of truth for "who is logged in"
//! during the lifetime of the running client. It is an explicit object the
//! presentation layer owns and passes around, not a global singleton.
//!
//! Every mutating operation takes `&mut self`, so a second login cannot be
//! issued while one is still in flight.

use anyhow::Result;
use shopctl_types::{User, UserUpdate};

use crate::api::ApiError;

use super::manager::SessionManager;

/// Where the presentation layer should navigate next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    /// The protected admin area, after a successful login/registration.
    Dashboard,
    /// The login surface, after logout or session termination.
    Login,
}

/// Reactive session state bridging [`SessionManager`] to the presentation
/// layer.
#[derive(Debug)]
pub struct SessionContext {
    manager: SessionManager,
    user: Option<User>,
    loading: bool,
    error: Option<String>,
    navigation: Option<Navigation>,
}

impl SessionContext {
    /// Creates a context in its initial (not yet bootstrapped) state.
    pub fn new(manager: SessionManager) -> Self {
        Self {
            manager,
            user: None,
            loading: false,
            error: None,
            navigation: None,
        }
    }

    /// Startup session validation.
    ///
    /// If a stored session exists, the cached user is adopted optimistically
    /// and revalidated against the backend. A failed revalidation, or a
    /// revalidated user without the admin role, purges the session and
    /// redirects to login without surfacing an error: an expired session is
    /// not a user-facing failure.
    pub async fn bootstrap(&mut self) {
        if !self.manager.is_authenticated() {
            return;
        }

        self.loading = true;
        self.user = self.manager.store().user();

        match self.manager.current_user().await {
            Ok(user) if user.is_admin() => {
                tracing::debug!("session revalidated for {}", user.email);
                self.user = Some(user);
            }
            Ok(user) => {
                tracing::warn!("non-admin session for {} terminated at startup", user.email);
                self.force_logout().await;
            }
            Err(e) => {
                tracing::debug!("session revalidation failed, logging out: {e:#}");
                self.purge_local();
            }
        }

        self.loading = false;
    }

    /// Logs in. Only admin accounts may hold a session: a valid credential
    /// pair with any other role is logged out again and reported as an
    /// access-denied failure.
    pub async fn login(&mut self, email: &str, password: &str) -> Result<User> {
        self.loading = true;
        let result = self.manager.login(email, password).await;
        self.loading = false;

        let auth = match result {
            Ok(auth) => auth,
            Err(e) => return Err(self.note_failure(e)),
        };

        if !auth.user.is_admin() {
            self.force_logout().await;
            let denied = anyhow::anyhow!("Access denied. Admin privileges required.");
            return Err(self.note_failure(denied));
        }

        self.user = Some(auth.user.clone());
        self.navigation = Some(Navigation::Dashboard);
        Ok(auth.user)
    }

    /// Registers a new admin account and enters the authenticated state.
    pub async fn register(
        &mut self,
        name: &str,
        email: &str,
        password: &str,
        phone: Option<&str>,
    ) -> Result<User> {
        self.loading = true;
        let result = self.manager.register(name, email, password, phone).await;
        self.loading = false;

        match result {
            Ok(auth) => {
                self.user = Some(auth.user.clone());
                self.navigation = Some(Navigation::Dashboard);
                Ok(auth.user)
            }
            Err(e) => Err(self.note_failure(e)),
        }
    }

    /// Applies a partial profile update, replacing the held user on success.
    pub async fn update_profile(&mut self, update: &UserUpdate) -> Result<User> {
        self.loading = true;
        let result = self.manager.update_profile(update).await;
        self.loading = false;

        match result {
            Ok(user) => {
                self.user = Some(user.clone());
                Ok(user)
            }
            Err(e) => Err(self.note_failure(e)),
        }
    }

    /// Ends the session. Always lands in the anonymous state and navigates
    /// to the login surface; failures are logged, never surfaced.
    pub async fn logout(&mut self) {
        self.force_logout().await;
    }

    /// Clears the latest-error slot without touching session state.
    pub fn clear_error(&mut self) {
        self.error = None;
    }

    /// Returns the underlying session manager, for operations that do not
    /// touch context state (password flows, local status queries).
    pub fn manager(&self) -> &SessionManager {
        &self.manager
    }

    /// The current user, if authenticated.
    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    /// True while an operation is in flight.
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// True iff a session is held.
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    /// True iff the held user has the admin role.
    pub fn is_admin(&self) -> bool {
        self.user.as_ref().is_some_and(User::is_admin)
    }

    /// The latest operation failure, if any.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Takes the pending navigation event, if any. The presentation layer
    /// drains this after every operation.
    pub fn take_navigation(&mut self) -> Option<Navigation> {
        self.navigation.take()
    }

    /// Records a failure in the latest-error slot and re-raises it.
    ///
    /// A 401 means the client already purged the session; reflect that here
    /// and point the presentation layer at the login surface.
    fn note_failure(&mut self, e: anyhow::Error) -> anyhow::Error {
        if e.downcast_ref::<ApiError>().is_some_and(ApiError::is_unauthorized) {
            self.user = None;
            self.navigation = Some(Navigation::Login);
        }
        self.error = Some(e.to_string());
        e
    }

    /// Best-effort backend logout plus unconditional local teardown.
    async fn force_logout(&mut self) {
        if let Err(e) = self.manager.logout().await {
            tracing::warn!("local session purge failed: {e:#}");
        }
        self.user = None;
        self.navigation = Some(Navigation::Login);
    }

    /// Local purge without the backend notification (bootstrap failure path).
    fn purge_local(&mut self) {
        if let Err(e) = self.manager.store().clear_all() {
            tracing::warn!("local session purge failed: {e:#}");
        }
        self.user = None;
        self.navigation = Some(Navigation::Login);
    }
}
