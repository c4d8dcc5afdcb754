//! Screen controllers.
//!
//! Each module adds the operations of one screen to [`AppState`]. Loads fetch
//! from the API and project into a view model; mutations validate locally,
//! call the API, then return the reloaded view so callers never hold stale data.
//!
//! - `session`: login, signup, current profile, logout, theme
//! - `calendar`: day/week grid, appointment form, cancel
//! - `contacts`: customer list and search, contact form
//! - `dashboard`: KPIs and charts
//! - `settings`: profile, services, message triggers, public link
//! - `public_booking`: the customer-facing booking page

pub mod calendar;
pub mod contacts;
pub mod dashboard;
pub mod public_booking;
pub mod session;
pub mod settings;

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};

use crate::api::ApiGateway;
use crate::config::AppConfig;
use crate::context::AppContext;
use crate::debounce::{Debouncer, SEARCH_DEBOUNCE};
use crate::error::{ClientError, ScreenError, ScreenResult};
use crate::models::{BarberProfile, Customer};
use crate::zone::ClientZone;

use self::contacts::ContactCard;

/// Everything the screens share: gateway, context, zone and search state.
#[derive(Clone)]
pub struct AppState {
    pub api: ApiGateway,
    pub zone: ClientZone,
    public_base_url: Arc<str>,
    clock: fn() -> DateTime<Utc>,
    contact_search: Arc<Debouncer<ScreenResult<Vec<ContactCard>>>>,
    customer_lookup: Arc<Debouncer<ScreenResult<Vec<Customer>>>>,
}

impl AppState {
    pub fn new(config: &AppConfig, context: Arc<AppContext>) -> Result<Self, ClientError> {
        Ok(Self {
            api: ApiGateway::new(config, context)?,
            zone: config.zone,
            public_base_url: Arc::from(config.public_base_url.trim_end_matches('/')),
            clock: Utc::now,
            contact_search: Arc::new(Debouncer::new(SEARCH_DEBOUNCE)),
            customer_lookup: Arc::new(Debouncer::new(SEARCH_DEBOUNCE)),
        })
    }

    /// Replaces the wall clock, for deterministic "now" in tests.
    pub fn with_clock(mut self, clock: fn() -> DateTime<Utc>) -> Self {
        self.clock = clock;
        self
    }

    pub fn now(&self) -> DateTime<Utc> {
        (self.clock)()
    }

    pub fn today(&self) -> NaiveDate {
        self.zone.today(self.now())
    }

    pub fn context(&self) -> &AppContext {
        self.api.context()
    }

    /// The signed-in business profile.
    pub fn require_profile(&self) -> ScreenResult<BarberProfile> {
        self.context().profile().ok_or(ScreenError::Unauthenticated)
    }

    /// Shareable link to a business's public booking page.
    pub fn public_booking_url(&self, business_id: &str) -> String {
        format!("{}/b/{business_id}", self.public_base_url)
    }
}
