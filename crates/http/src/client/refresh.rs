//! Access token refresh

use tracing::{debug, info, warn};

use super::CrmClient;
use super::error::RefreshError;
use crate::types::{RefreshRequest, RefreshResponse};

impl CrmClient {
    /// Exchange the stored refresh token for a new access token
    ///
    /// Never retries. On any failure both tokens and the cached user are
    /// erased, so the caller's only way forward is a fresh login.
    ///
    /// # Errors
    ///
    /// Returns why no new access token was obtained
    pub async fn refresh_access_token(&self) -> Result<(), RefreshError> {
        match self.request_access_token().await {
            Ok(access) => {
                self.session.set_access_token(&access);
                info!("Access token refreshed");
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "Token refresh failed, clearing session");
                self.session.clear();
                Err(err)
            }
        }
    }

    async fn request_access_token(&self) -> Result<String, RefreshError> {
        let refresh = self
            .session
            .refresh_token()
            .ok_or(RefreshError::NoRefreshToken)?;

        debug!(url = %self.refresh_url(), "Requesting new access token");
        let response = self
            .client
            .post(self.refresh_url())
            .json(&RefreshRequest { refresh: &refresh })
            .send()
            .await
            .map_err(RefreshError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(RefreshError::Rejected(status.as_u16()));
        }

        let body: RefreshResponse = response
            .json()
            .await
            .map_err(RefreshError::MalformedResponse)?;
        Ok(body.access)
    }
}
