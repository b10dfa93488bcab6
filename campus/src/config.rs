//! User preferences stored in the settings database.

use simplelog::LevelFilter;
use tabula::ActiveFilter;
use tabula::labels::Labels;
use tabula::search::SearchMode;

use crate::settings::{SettingsError, SettingsProvider};

const PAGE_SIZE: &str = "config.page_size";
const SEARCH_MODE: &str = "config.search_mode";
const LOG_LEVEL: &str = "config.log_level";
const LOCALE: &str = "config.locale";
const REMEMBER_FILTERS: &str = "config.remember_filters";

/// Prefix of the per-screen saved filter lists.
const FILTERS_PREFIX: &str = "filters.";

/// Console preferences.
#[derive(Debug, Clone, PartialEq)]
pub struct CampusConfig {
    /// Initial rows per page of every screen.
    pub page_size: usize,
    pub search_mode: SearchMode,
    /// `off`, `error`, `warn`, `info`, `debug` or `trace`.
    pub log_level: String,
    /// Language of the table texts (`en`, `es`).
    pub locale: String,
    /// Save each screen's active filters and restore them on reopen.
    pub remember_filters: bool,
}

impl Default for CampusConfig {
    fn default() -> Self {
        Self {
            page_size: tabula::table::DEFAULT_PAGE_SIZE,
            search_mode: SearchMode::Contains,
            log_level: "info".to_string(),
            locale: "en".to_string(),
            remember_filters: true,
        }
    }
}

impl CampusConfig {
    /// Load the stored preferences, defaulting missing ones.
    pub async fn load(settings: &SettingsProvider) -> Result<Self, SettingsError> {
        let defaults = Self::default();
        let page_size = settings.get_or(PAGE_SIZE, defaults.page_size).await?;
        Ok(Self {
            // A zero page size would make every table unbuildable
            page_size: if page_size == 0 {
                defaults.page_size
            } else {
                page_size
            },
            search_mode: settings.get_or(SEARCH_MODE, defaults.search_mode).await?,
            log_level: settings.get_or(LOG_LEVEL, defaults.log_level).await?,
            locale: settings.get_or(LOCALE, defaults.locale).await?,
            remember_filters: settings
                .get_or(REMEMBER_FILTERS, defaults.remember_filters)
                .await?,
        })
    }

    pub async fn save(&self, settings: &SettingsProvider) -> Result<(), SettingsError> {
        settings.set(PAGE_SIZE, &self.page_size).await?;
        settings.set(SEARCH_MODE, &self.search_mode).await?;
        settings.set(LOG_LEVEL, &self.log_level).await?;
        settings.set(LOCALE, &self.locale).await?;
        settings
            .set(REMEMBER_FILTERS, &self.remember_filters)
            .await
    }

    /// Log level, `Info` when the stored name is not a level.
    pub fn level_filter(&self) -> LevelFilter {
        self.log_level.parse().unwrap_or(LevelFilter::Info)
    }

    pub fn labels(&self) -> Labels {
        Labels::for_locale(&self.locale)
    }
}

fn filters_key(screen: &str) -> String {
    format!("{}{}", FILTERS_PREFIX, screen)
}

/// Saved active filters of a screen; empty when none were saved.
pub async fn load_filters(
    settings: &SettingsProvider,
    screen: &str,
) -> Result<Vec<ActiveFilter>, SettingsError> {
    settings.get_or(&filters_key(screen), Vec::new()).await
}

/// Save a screen's active filters. An empty list removes the entry.
pub async fn save_filters(
    settings: &SettingsProvider,
    screen: &str,
    filters: &[ActiveFilter],
) -> Result<(), SettingsError> {
    let key = filters_key(screen);
    if filters.is_empty() {
        settings.delete(&key).await
    } else {
        settings.set(&key, &filters.to_vec()).await
    }
}

/// Forget the saved filters of every screen.
pub async fn forget_filters(settings: &SettingsProvider) -> Result<usize, SettingsError> {
    let keys = settings.keys_with_prefix(FILTERS_PREFIX).await?;
    for key in &keys {
        settings.delete(key).await?;
    }
    Ok(keys.len())
}
