use contracts::domain::a007_business_profile::aggregate::BusinessProfile;

use crate::shared::api_utils::{get_json, send_json, Verb};

const BASE: &str = "/api/business-profile";

/// Профиль компании; пока он не заполнен, сервер отдаёт пустой объект или null
pub async fn fetch_business_profile() -> Result<BusinessProfile, String> {
    let profile: Option<BusinessProfile> = get_json(BASE, "fetch business profile").await?;
    Ok(profile.unwrap_or_default())
}

pub async fn save_business_profile(profile: &BusinessProfile) -> Result<BusinessProfile, String> {
    send_json(Verb::Post, BASE, profile, "save business profile").await
}
