use serde::{Deserialize, Serialize};

use crate::shared::validation::{is_valid_email, is_valid_phone, is_valid_url, optional, required};

/// Профиль компании: реквизиты для счетов и настройки по умолчанию
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessProfile {
    #[serde(default)]
    pub business_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tax_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    /// Ссылка на уже загруженный логотип
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default = "default_invoice_prefix")]
    pub invoice_prefix: String,
    /// Ставка налога по умолчанию для новых продаж, %
    #[serde(default)]
    pub tax_rate: f64,
}

fn default_currency() -> String {
    "USD".to_string()
}

fn default_invoice_prefix() -> String {
    "INV".to_string()
}

impl Default for BusinessProfile {
    fn default() -> Self {
        Self {
            business_name: String::new(),
            owner_name: None,
            email: None,
            phone: None,
            address: None,
            tax_id: None,
            website: None,
            logo_url: None,
            currency: default_currency(),
            invoice_prefix: default_invoice_prefix(),
            tax_rate: 0.0,
        }
    }
}

impl BusinessProfile {
    /// Профиль ещё не заполнен (сервер вернул пустой объект)
    pub fn is_empty(&self) -> bool {
        self.business_name.trim().is_empty()
    }

    /// Валидация данных
    pub fn validate(&self) -> Result<(), String> {
        required(&self.business_name, "Название компании")?;
        optional(self.email.as_deref(), is_valid_email, "Некорректный email")?;
        optional(self.phone.as_deref(), is_valid_phone, "Некорректный номер телефона")?;
        optional(self.website.as_deref(), is_valid_url, "Некорректный адрес сайта")?;
        optional(self.logo_url.as_deref(), is_valid_url, "Некорректная ссылка на логотип")?;
        required(&self.currency, "Валюта")?;
        if !(0.0..=100.0).contains(&self.tax_rate) {
            return Err("Ставка налога должна быть от 0 до 100".into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_payload_gets_defaults() {
        let profile: BusinessProfile = serde_json::from_value(json!({})).unwrap();
        assert!(profile.is_empty());
        assert_eq!(profile.currency, "USD");
        assert_eq!(profile.invoice_prefix, "INV");
    }

    #[test]
    fn test_validation() {
        let mut profile = BusinessProfile {
            business_name: "Corner Shop".into(),
            website: Some("https://corner.shop".into()),
            ..BusinessProfile::default()
        };
        assert!(profile.validate().is_ok());

        profile.logo_url = Some("not a url".into());
        assert!(profile.validate().is_err());

        profile.logo_url = Some(String::new());
        profile.tax_rate = 120.0;
        assert!(profile.validate().is_err());
    }
}
