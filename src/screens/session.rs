//! Session screen: sign-in, sign-up, the resolved profile and the theme.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::AppState;
use crate::context::Theme;
use crate::error::{ScreenError, ScreenResult};
use crate::messages;
use crate::models::{BarberProfile, LoginRequest, SignupRequest};
use crate::phone;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub authenticated: bool,
    pub profile: Option<BarberProfile>,
    pub theme: Theme,
    pub public_booking_url: Option<String>,
}

/// Login with the local nine-digit phone form.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginForm {
    pub phone_digits: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupForm {
    pub name: String,
    pub shop_name: String,
    /// International number, e.g. `+994501234567`.
    pub phone: String,
    pub password: String,
}

impl AppState {
    pub fn session_view(&self) -> SessionView {
        let profile = self.context().profile();
        SessionView {
            authenticated: profile.is_some(),
            public_booking_url: profile.as_ref().map(|p| self.public_booking_url(&p.id)),
            profile,
            theme: self.context().theme(),
        }
    }

    /// Resolves the profile behind a stored token.
    ///
    /// A token the backend no longer accepts is dropped, leaving the session
    /// signed out.
    pub async fn resolve_session(&self) -> SessionView {
        let ctx = self.context();
        if ctx.profile().is_none() && ctx.token().is_some() {
            match self.api.me().await {
                Ok(profile) => {
                    info!(business_id = %profile.id, "Session restored");
                    ctx.set_profile(profile);
                }
                Err(e) => {
                    warn!(error = %e, "Stored token rejected; signing out");
                    ctx.sign_out();
                }
            }
        }
        self.session_view()
    }

    pub async fn login(&self, form: LoginForm) -> ScreenResult<SessionView> {
        let digits = phone::local_digits(&form.phone_digits);
        if !phone::is_complete_local(&digits) {
            return Err(ScreenError::validation(messages::LOCAL_PHONE_INCOMPLETE));
        }

        let request = LoginRequest {
            phone: phone::to_international(&digits),
            password: form.password,
        };
        let auth = self
            .api
            .login(&request)
            .await
            .map_err(|e| ScreenError::failed("login", messages::LOGIN_FAILED, e))?;

        info!(business_id = %auth.barber.id, "Signed in");
        self.context().sign_in(&auth.token, auth.barber);
        Ok(self.session_view())
    }

    pub async fn signup(&self, form: SignupForm) -> ScreenResult<SessionView> {
        if form.name.trim().is_empty() {
            return Err(ScreenError::validation(messages::NAME_REQUIRED));
        }
        if form.shop_name.trim().is_empty() {
            return Err(ScreenError::validation(messages::SHOP_NAME_REQUIRED));
        }
        let Some(phone) = phone::normalize_international(&form.phone) else {
            return Err(ScreenError::validation(messages::PHONE_INCOMPLETE));
        };

        let request = SignupRequest {
            name: form.name.trim().to_string(),
            shop_name: form.shop_name.trim().to_string(),
            phone,
            password: form.password,
        };
        let auth = self
            .api
            .signup(&request)
            .await
            .map_err(|e| ScreenError::failed("signup", messages::SIGNUP_FAILED, e))?;

        info!(business_id = %auth.barber.id, "Account created");
        self.context().sign_in(&auth.token, auth.barber);
        Ok(self.session_view())
    }

    pub fn logout(&self) -> SessionView {
        self.context().sign_out();
        info!("Signed out");
        self.session_view()
    }

    pub fn set_theme(&self, theme: Theme) -> SessionView {
        self.context().set_theme(theme);
        self.session_view()
    }
}
