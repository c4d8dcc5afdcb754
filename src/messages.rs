//! User-facing (Azerbaijani) messages.

// Validation
pub const NAME_REQUIRED: &str = "Ad boş ola bilməz.";
pub const CUSTOMER_NAME_REQUIRED: &str = "Müştərinin adını yazın.";
pub const CUSTOMER_REQUIRED: &str = "Müştəri seçin və ya yeni müştəri yaradın.";
pub const PHONE_INCOMPLETE: &str = "Telefon nömrəsi tam doldurulmalıdır.";
pub const LOCAL_PHONE_INCOMPLETE: &str = "Telefon nömrəsi tam doldurulmalıdır (9 rəqəm).";
pub const PROFILE_PHONE_INCOMPLETE: &str = "Telefon nömrəsi tam doldurulmalıdır (9 rəqəm, +994 olmadan).";
pub const SHOP_NAME_REQUIRED: &str = "Salon adı tələb olunur.";
pub const SERVICE_NAME_REQUIRED: &str = "Xidmət adı tələb olunur.";
pub const SERVICE_PRICE_INVALID: &str = "Qiymət düzgün daxil edilməyib.";
pub const SERVICE_DURATION_INVALID: &str = "Müddət düzgün daxil edilməyib.";
pub const TRIGGER_MESSAGE_REQUIRED: &str = "Mesaj mətni boş ola bilməz.";
pub const TIME_INVALID: &str = "Saat düzgün daxil edilməyib.";
pub const REQUIRED_FIELDS: &str = "Zəhmət olmasa qırmızı sahələri doldurun.";

// Network / API failures
pub const LOGIN_FAILED: &str = "Telefon və ya şifrə yanlışdır.";
pub const SIGNUP_FAILED: &str = "Hesab yaratmaq mümkün olmadı.";
pub const SAVE_CONTACT_FAILED: &str = "Kontaktı yadda saxlamaq mümkün olmadı.";
pub const LOAD_CONTACTS_FAILED: &str = "Kontaktları yükləmək mümkün olmadı.";
pub const CREATE_CUSTOMER_FAILED: &str = "Yeni müştəri yaratmaq mümkün olmadı.";
pub const SAVE_APPOINTMENT_FAILED: &str = "Görüşü yadda saxlamaq mümkün olmadı.";
pub const CANCEL_APPOINTMENT_FAILED: &str = "Görüşü ləğv etmək mümkün olmadı.";
pub const DASHBOARD_FAILED: &str = "Panel məlumatlarını yükləmək mümkün olmadı.";
pub const SAVE_PROFILE_FAILED: &str = "Ayarları yadda saxlamaq mümkün olmadı.";
pub const SAVE_SERVICE_FAILED: &str = "Xidməti yadda saxlamaq mümkün olmadı.";
pub const DELETE_SERVICE_FAILED: &str = "Xidməti silmək mümkün olmadı.";
pub const SAVE_TRIGGER_FAILED: &str = "Qaydanı yadda saxlamaq mümkün olmadı.";
pub const UPDATE_TRIGGER_FAILED: &str = "Qaydanı yeniləmək mümkün olmadı.";
pub const LOAD_SETTINGS_FAILED: &str = "Ayarları yükləmək mümkün olmadı.";
pub const BARBER_NOT_FOUND: &str = "Bərbər səhifəsi tapılmadı.";
pub const BOOKING_FAILED: &str = "Rezervasiya yaratmaq mümkün olmadı.";
pub const BOOKING_DISABLED: &str = "Bu bərbər üçün onlayn rezervasiya hazırda aktiv deyil.";
pub const UNAUTHENTICATED: &str = "Zəhmət olmasa daxil olun.";

// Confirmations
pub const APPOINTMENT_CANCELLED: &str = "Görüşünüz ləğv edildi.";
pub const BOOKING_CREATED: &str = "Rezervasiya yaradıldı.";
pub const BOOKING_UPDATED: &str = "Rezervasiya yeniləndi.";
