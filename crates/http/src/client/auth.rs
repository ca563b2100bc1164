//! Authentication API client methods

use tracing::info;

use super::CrmClient;
use super::error::RequestError;
use crate::types::{
    ApiRequest, CurrentUser, LoginRequest, LoginResponse, RequestMethod, UserProfile,
};

impl CrmClient {
    /// Log in with username and password and start a session
    ///
    /// Sent without a bearer token and outside the refresh cycle, so a
    /// rejected login is reported instead of redirecting to the login page.
    ///
    /// # Errors
    ///
    /// Returns the notified request failure, or a serialization error when
    /// the response lacks the token pair or a usable user
    pub async fn login(
        &self,
        username: &str,
        password: &str,
    ) -> Result<CurrentUser, RequestError> {
        let request = ApiRequest::new("login/", RequestMethod::Post)
            .with_json(&LoginRequest { username, password })?;
        let login: LoginResponse = self.execute_public(request).await?.deserialize()?;

        let user: CurrentUser = serde_json::from_value(login.user.clone())?;
        self.session.start(&login.access, &login.refresh, &login.user);

        info!(user_id = user.id, username = %user.username, "Logged in");
        Ok(user)
    }

    /// Drop the session and send the browser to the login page
    pub fn logout(&self) {
        self.session.clear();
        info!("Logged out");
        self.navigator.redirect_to(&self.login_path);
    }

    /// User cached at login, if any
    pub fn current_user(&self) -> Option<CurrentUser> {
        self.session.user()
    }

    /// Fetch the signed-in user's profile
    ///
    /// # Errors
    ///
    /// Returns the notified request failure or an unexpected body shape
    pub async fn profile(&self) -> Result<UserProfile, RequestError> {
        self.get("profile/").await?.deserialize()
    }
}
