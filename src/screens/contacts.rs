//! Contacts screen: customer list with search, and the contact form.

use serde::{Deserialize, Serialize};
use tracing::info;

use super::AppState;
use crate::error::{ScreenError, ScreenResult};
use crate::labels;
use crate::messages;
use crate::models::{Customer, CustomerPayload};
use crate::phone;
use crate::zone::ClientZone;

/// A customer with the summary lines shown on their card.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactCard {
    #[serde(flatten)]
    pub customer: Customer,
    pub last_visit_label: String,
    pub frequency_label: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactsView {
    pub query: String,
    pub contacts: Vec<ContactCard>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ContactForm {
    pub name: String,
    /// International number.
    pub phone: String,
    #[serde(default)]
    pub note: Option<String>,
    /// Search to reload after saving.
    #[serde(default)]
    pub query: Option<String>,
}

impl ContactCard {
    /// Visit dates are taken on the client's calendar, not UTC.
    pub fn new(customer: Customer, zone: &ClientZone) -> Self {
        let created = customer.created_at.map(|t| zone.local_date(&t));
        let last_visit = customer.last_visit_at.map(|t| zone.local_date(&t));
        Self {
            last_visit_label: labels::last_visit_label(last_visit),
            frequency_label: labels::visit_frequency_label(customer.visit_count, created, last_visit),
            customer,
        }
    }
}

impl ContactForm {
    fn validate(&self) -> ScreenResult<CustomerPayload> {
        if self.name.trim().is_empty() {
            return Err(ScreenError::validation(messages::NAME_REQUIRED));
        }
        let phone = phone::normalize_international(&self.phone)
            .ok_or_else(|| ScreenError::validation(messages::PHONE_INCOMPLETE))?;
        Ok(CustomerPayload {
            name: self.name.trim().to_string(),
            phone,
            note: Some(self.note.as_deref().unwrap_or_default().trim().to_string()),
        })
    }
}

impl AppState {
    /// Contacts matching `query` (everyone when blank).
    pub async fn load_contacts(&self, query: &str) -> ScreenResult<ContactsView> {
        self.require_profile()?;
        let query = query.trim();
        let customers = self
            .api
            .search_customers(query)
            .await
            .map_err(|e| ScreenError::failed("load contacts", messages::LOAD_CONTACTS_FAILED, e))?;

        Ok(ContactsView {
            query: query.to_string(),
            contacts: customers.into_iter().map(|c| ContactCard::new(c, &self.zone)).collect(),
        })
    }

    /// Search-as-you-type over contacts.
    ///
    /// `None` when a newer keystroke superseded this query before it settled.
    pub async fn search_contacts(&self, query: &str) -> Option<ScreenResult<ContactsView>> {
        if let Err(e) = self.require_profile() {
            return Some(Err(e));
        }

        let query = query.trim().to_string();
        let api = self.api.clone();
        let zone = self.zone;
        let lookup = query.clone();
        let cards = self
            .contact_search
            .run(move || async move {
                api.search_customers(&lookup)
                    .await
                    .map(|list| list.into_iter().map(|c| ContactCard::new(c, &zone)).collect())
                    .map_err(|e| ScreenError::failed("search contacts", messages::LOAD_CONTACTS_FAILED, e))
            })
            .await?;
        Some(cards.map(|contacts| ContactsView { query, contacts }))
    }

    /// Creates (`id == None`) or updates a contact, then reloads the list.
    pub async fn save_contact(&self, id: Option<&str>, form: ContactForm) -> ScreenResult<ContactsView> {
        self.require_profile()?;
        let payload = form.validate()?;

        match id {
            Some(id) => self.api.update_customer(id, &payload).await,
            None => self.api.create_customer(&payload).await.map(|_| ()),
        }
        .map_err(|e| ScreenError::failed("save contact", messages::SAVE_CONTACT_FAILED, e))?;
        info!(customer_id = id.unwrap_or("new"), "Contact saved");

        self.load_contacts(form.query.as_deref().unwrap_or_default()).await
    }
}
