//! Commands for user settings

use crate::domain::{Language, ProfileVisibility, UserSettings};
use crate::AppState;

/// Fields a settings update may change; `None` keeps the stored value
#[derive(Debug, Clone, Default)]
pub struct SettingsUpdate {
    pub language: Option<String>,
    pub dream_reminders: Option<bool>,
    pub weekly_report: Option<bool>,
    pub new_features: Option<bool>,
    pub profile_visibility: Option<String>,
    pub share_analytics: Option<bool>,
}

pub async fn get_settings(state: &AppState) -> Result<UserSettings, String> {
    state.settings.load().await.map_err(|e| e.to_string())
}

pub async fn update_settings(state: &AppState, update: SettingsUpdate) -> Result<UserSettings, String> {
    let mut settings = get_settings(state).await?;

    if let Some(code) = update.language {
        settings.language =
            Language::from_str(&code).ok_or_else(|| format!("Unknown language: {}", code))?;
    }
    if let Some(visibility) = update.profile_visibility {
        settings.privacy.profile_visibility = match visibility.as_str() {
            "public" => ProfileVisibility::Public,
            "private" => ProfileVisibility::Private,
            other => return Err(format!("Unknown profile visibility: {}", other)),
        };
    }
    if let Some(v) = update.dream_reminders {
        settings.notifications.dream_reminders = v;
    }
    if let Some(v) = update.weekly_report {
        settings.notifications.weekly_report = v;
    }
    if let Some(v) = update.new_features {
        settings.notifications.new_features = v;
    }
    if let Some(v) = update.share_analytics {
        settings.privacy.share_analytics = v;
    }

    state.settings.save(&settings).await.map_err(|e| e.to_string())?;
    Ok(settings)
}
