//! Settings screen: business profile, services, message triggers and the
//! public booking link.

use serde::{Deserialize, Serialize};
use tracing::{error, info};

use super::AppState;
use crate::error::{ScreenError, ScreenResult};
use crate::labels;
use crate::messages;
use crate::models::{
    BarberProfile, ProfileUpdate, Service, ServicePayload, Trigger, TriggerPayload, TriggerType,
    DEFAULT_APPOINTMENT_MINUTES,
};
use crate::phone;
use crate::slots::WorkingHours;

/// Profile form values, prefilled from the stored profile.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileFormDefaults {
    pub shop_name: String,
    pub phone_digits: String,
    pub default_duration: i64,
    pub work_day_start: String,
    pub work_day_end: String,
}

impl ProfileFormDefaults {
    pub fn from_profile(profile: &BarberProfile) -> Self {
        let hours = WorkingHours::resolve(profile.work_day_start_minutes, profile.work_day_end_minutes);
        Self {
            shop_name: profile.shop_name.clone().unwrap_or_default(),
            phone_digits: phone::from_international(profile.phone.as_deref().unwrap_or_default()),
            default_duration: profile
                .default_duration
                .filter(|d| *d > 0)
                .unwrap_or(DEFAULT_APPOINTMENT_MINUTES),
            work_day_start: labels::minutes_to_hm(hours.start_minutes()),
            work_day_end: labels::minutes_to_hm(hours.end_minutes()),
        }
    }
}

/// A trigger with its display labels.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TriggerCard {
    #[serde(flatten)]
    pub trigger: Trigger,
    pub type_label: &'static str,
    pub delay_label: String,
}

impl TriggerCard {
    pub fn new(trigger: Trigger) -> Self {
        let (type_label, delay_label) = match trigger.kind {
            TriggerType::BeforeAppointment => {
                let hours = ((trigger.offset_minutes.unwrap_or(0) as f64) / 60.0).round() as i64;
                ("Görüş xatırlatması", format!("Görüşdən {} saat əvvəl", hours.max(1)))
            }
            TriggerType::AfterLastVisit => (
                "Reaktivasiya mesajı",
                format!("Son ziyarətdən {} gün sonra", trigger.offset_days.filter(|d| *d > 0).unwrap_or(1)),
            ),
        };
        Self {
            trigger,
            type_label,
            delay_label,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsView {
    pub profile: ProfileFormDefaults,
    pub online_booking_enabled: bool,
    pub public_booking_url: String,
    pub services: Vec<Service>,
    pub triggers: Vec<TriggerCard>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileForm {
    pub shop_name: String,
    pub phone_digits: String,
    #[serde(default)]
    pub default_duration: Option<i64>,
    /// `HH:MM`
    pub work_day_start: String,
    /// `HH:MM`
    pub work_day_end: String,
}

impl ProfileForm {
    fn validate(&self) -> ScreenResult<ProfileUpdate> {
        if self.shop_name.trim().is_empty() {
            return Err(ScreenError::validation(messages::SHOP_NAME_REQUIRED));
        }
        let digits = phone::local_digits(&self.phone_digits);
        if !phone::is_complete_local(&digits) {
            return Err(ScreenError::validation(messages::PROFILE_PHONE_INCOMPLETE));
        }
        let start = labels::parse_hm(&self.work_day_start);
        let end = labels::parse_hm(&self.work_day_end);
        let (Some(start), Some(end)) = (start, end) else {
            return Err(ScreenError::validation(messages::TIME_INVALID));
        };

        Ok(ProfileUpdate {
            shop_name: self.shop_name.trim().to_string(),
            phone: phone::to_international(&digits),
            default_duration: self
                .default_duration
                .filter(|d| *d > 0)
                .unwrap_or(DEFAULT_APPOINTMENT_MINUTES),
            work_day_start_minutes: start,
            work_day_end_minutes: end,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceForm {
    pub name: String,
    pub price: f64,
    pub duration_minutes: i64,
}

impl ServiceForm {
    fn validate(&self) -> ScreenResult<ServicePayload> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(ScreenError::validation(messages::SERVICE_NAME_REQUIRED));
        }
        if !self.price.is_finite() || self.price <= 0.0 {
            return Err(ScreenError::validation(messages::SERVICE_PRICE_INVALID));
        }
        if self.duration_minutes <= 0 {
            return Err(ScreenError::validation(messages::SERVICE_DURATION_INVALID));
        }
        Ok(ServicePayload {
            name: name.to_string(),
            price: self.price,
            duration_minutes: self.duration_minutes,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TriggerForm {
    #[serde(rename = "type", default)]
    pub kind: TriggerType,
    /// Hours before the appointment, or days after the last visit.
    #[serde(default)]
    pub offset_value: Option<i64>,
    pub message: String,
}

impl TriggerForm {
    fn validate(&self) -> ScreenResult<TriggerPayload> {
        let message = self.message.trim();
        if message.is_empty() {
            return Err(ScreenError::validation(messages::TRIGGER_MESSAGE_REQUIRED));
        }
        let offset = self.offset_value.filter(|v| *v >= 1).unwrap_or(1);
        let (offset_minutes, offset_days) = match self.kind {
            TriggerType::BeforeAppointment => (Some(offset * 60), None),
            TriggerType::AfterLastVisit => (None, Some(offset)),
        };
        Ok(TriggerPayload {
            kind: self.kind,
            message: message.to_string(),
            active: true,
            offset_minutes,
            offset_days,
        })
    }
}

/// Same rule with `active` flipped.
fn toggled(trigger: &Trigger) -> TriggerPayload {
    let before = trigger.kind == TriggerType::BeforeAppointment;
    TriggerPayload {
        kind: trigger.kind,
        message: trigger.message.clone(),
        active: !trigger.active,
        offset_minutes: trigger.offset_minutes.filter(|_| before),
        offset_days: trigger.offset_days.filter(|_| !before),
    }
}

impl AppState {
    /// Loads the settings page. Services or triggers that fail to load are
    /// logged and shown as empty lists.
    pub async fn load_settings(&self) -> ScreenResult<SettingsView> {
        let profile = self.require_profile()?;
        let (services, triggers) = tokio::join!(self.api.list_services(), self.api.list_triggers());

        let services = services.unwrap_or_else(|e| {
            error!(error = %e, "Failed to load services");
            Vec::new()
        });
        let triggers = triggers.unwrap_or_else(|e| {
            error!(error = %e, "Failed to load triggers");
            Vec::new()
        });

        Ok(SettingsView {
            profile: ProfileFormDefaults::from_profile(&profile),
            online_booking_enabled: profile.online_booking_enabled(),
            public_booking_url: self.public_booking_url(&profile.id),
            services,
            triggers: triggers.into_iter().map(TriggerCard::new).collect(),
        })
    }

    /// Saves the profile and stores the backend's copy in the context.
    pub async fn save_profile(&self, form: ProfileForm) -> ScreenResult<SettingsView> {
        self.require_profile()?;
        let update = form.validate()?;

        let saved = self
            .api
            .update_me(&update)
            .await
            .map_err(|e| ScreenError::failed_with_server_message("save profile", messages::SAVE_PROFILE_FAILED, e))?;
        info!(business_id = %saved.id, "Profile saved");
        self.context().set_profile(saved);

        self.load_settings().await
    }

    /// Creates (`id == None`) or updates a service.
    pub async fn save_service(&self, id: Option<&str>, form: ServiceForm) -> ScreenResult<SettingsView> {
        self.require_profile()?;
        let payload = form.validate()?;

        match id {
            Some(id) => self.api.update_service(id, &payload).await,
            None => self.api.create_service(&payload).await,
        }
        .map_err(|e| ScreenError::failed_with_server_message("save service", messages::SAVE_SERVICE_FAILED, e))?;
        info!(service_id = id.unwrap_or("new"), name = %payload.name, "Service saved");

        self.load_settings().await
    }

    pub async fn delete_service(&self, id: &str) -> ScreenResult<SettingsView> {
        self.require_profile()?;
        self.api
            .delete_service(id)
            .await
            .map_err(|e| ScreenError::failed("delete service", messages::DELETE_SERVICE_FAILED, e))?;
        info!(service_id = id, "Service deleted");

        self.load_settings().await
    }

    pub async fn create_trigger(&self, form: TriggerForm) -> ScreenResult<SettingsView> {
        self.require_profile()?;
        let payload = form.validate()?;

        self.api
            .create_trigger(&payload)
            .await
            .map_err(|e| ScreenError::failed_with_server_message("save trigger", messages::SAVE_TRIGGER_FAILED, e))?;
        info!(kind = ?payload.kind, "Trigger created");

        self.load_settings().await
    }

    /// Flips `active` on the trigger `id` as currently stored by the backend.
    pub async fn toggle_trigger(&self, id: &str) -> ScreenResult<SettingsView> {
        self.require_profile()?;
        let triggers = self
            .api
            .list_triggers()
            .await
            .map_err(|e| ScreenError::failed("load triggers", messages::LOAD_SETTINGS_FAILED, e))?;

        if let Some(trigger) = triggers.iter().find(|t| t.id == id) {
            self.api
                .update_trigger(id, &toggled(trigger))
                .await
                .map_err(|e| ScreenError::failed("toggle trigger", messages::UPDATE_TRIGGER_FAILED, e))?;
            info!(trigger_id = id, active = !trigger.active, "Trigger toggled");
        }

        self.load_settings().await
    }

    pub async fn delete_trigger(&self, id: &str) -> ScreenResult<SettingsView> {
        self.require_profile()?;
        self.api
            .delete_trigger(id)
            .await
            .map_err(|e| ScreenError::failed("delete trigger", messages::UPDATE_TRIGGER_FAILED, e))?;
        info!(trigger_id = id, "Trigger deleted");

        self.load_settings().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn trigger(value: serde_json::Value) -> Trigger {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn profile_defaults_strip_country_code_and_fill_hours() {
        let profile: BarberProfile = serde_json::from_value(json!({
            "id": "b1",
            "shopName": "Kəsim",
            "phone": "+994501234567",
            "workDayStartMinutes": 600,
            "workDayEndMinutes": 540
        }))
        .unwrap();
        let form = ProfileFormDefaults::from_profile(&profile);

        assert_eq!(form.phone_digits, "501234567");
        assert_eq!(form.default_duration, 30);
        // inverted window falls back
        assert_eq!((form.work_day_start.as_str(), form.work_day_end.as_str()), ("08:00", "20:00"));
    }

    #[test]
    fn profile_form_validation() {
        let mut form = ProfileForm {
            shop_name: " ".into(),
            phone_digits: "501234567".into(),
            default_duration: Some(0),
            work_day_start: "09:00".into(),
            work_day_end: "18:30".into(),
        };
        assert_eq!(form.validate().unwrap_err().user_message(), messages::SHOP_NAME_REQUIRED);

        form.shop_name = "Kəsim".into();
        form.phone_digits = "5012".into();
        assert_eq!(form.validate().unwrap_err().user_message(), messages::PROFILE_PHONE_INCOMPLETE);

        form.phone_digits = "501234567".into();
        let update = form.validate().unwrap();
        assert_eq!(update.phone, "+994501234567");
        assert_eq!(update.default_duration, 30);
        assert_eq!((update.work_day_start_minutes, update.work_day_end_minutes), (540, 1110));
    }

    #[test]
    fn service_form_validation() {
        let form = |name: &str, price: f64, duration: i64| ServiceForm {
            name: name.into(),
            price,
            duration_minutes: duration,
        };
        assert_eq!(form("", 10.0, 30).validate().unwrap_err().user_message(), messages::SERVICE_NAME_REQUIRED);
        assert_eq!(form("Saç", 0.0, 30).validate().unwrap_err().user_message(), messages::SERVICE_PRICE_INVALID);
        assert_eq!(form("Saç", 10.0, 0).validate().unwrap_err().user_message(), messages::SERVICE_DURATION_INVALID);
        assert_eq!(form(" Saç ", 12.5, 45).validate().unwrap().name, "Saç");
    }

    #[test]
    fn trigger_offsets_follow_type() {
        let before = TriggerForm {
            kind: TriggerType::BeforeAppointment,
            offset_value: Some(3),
            message: "Salam {name}".into(),
        }
        .validate()
        .unwrap();
        assert_eq!((before.offset_minutes, before.offset_days), (Some(180), None));

        let after = TriggerForm {
            kind: TriggerType::AfterLastVisit,
            offset_value: None,
            message: "Darıxdıq".into(),
        }
        .validate()
        .unwrap();
        assert_eq!((after.offset_minutes, after.offset_days), (None, Some(1)));

        let empty = TriggerForm {
            kind: TriggerType::AfterLastVisit,
            offset_value: Some(2),
            message: "  ".into(),
        };
        assert_eq!(empty.validate().unwrap_err().user_message(), messages::TRIGGER_MESSAGE_REQUIRED);
    }

    #[test]
    fn toggling_keeps_fields_and_flips_active() {
        let rule = trigger(json!({
            "_id": "t1", "type": "before_appointment", "offsetMinutes": 120,
            "message": "Sabah görüşünüz var", "active": true
        }));
        let payload = toggled(&rule);

        assert!(!payload.active);
        assert_eq!(payload.offset_minutes, Some(120));
        assert_eq!(payload.offset_days, None);
        assert_eq!(payload.message, rule.message);
    }

    #[test]
    fn trigger_cards_describe_delay() {
        let card = TriggerCard::new(trigger(json!({
            "_id": "t1", "type": "before_appointment", "offsetMinutes": 20, "message": "x"
        })));
        assert_eq!(card.delay_label, "Görüşdən 1 saat əvvəl");

        let card = TriggerCard::new(trigger(json!({
            "_id": "t2", "type": "after_last_visit", "offsetDays": 30, "message": "x"
        })));
        assert_eq!(card.type_label, "Reaktivasiya mesajı");
        assert_eq!(card.delay_label, "Son ziyarətdən 30 gün sonra");
    }
}
