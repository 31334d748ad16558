//! Runtime configuration for the terminal interface.
//!
//! Everything here comes from the command line; there is no config file
//! since nothing outlives the session.

use std::time::Duration;

use thiserror::Error;

use crate::fields::*;

pub const MIN_TICK_MS: u64 = 10;
pub const MAX_TICK_MS: u64 = 1000;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("tick rate must be between 10 and 1000 ms, got {0}")]
    TickRate(u64),
}

/// Initial view and draft settings for a UI session.
#[derive(Debug, Clone, PartialEq)]
pub struct UiConfig {
    pub filter: Filter,
    pub sort: SortKey,
    pub theme: Theme,
    pub category: Category,
    pub priority: Priority,
    pub tick_rate: Duration,
}

impl Default for UiConfig {
    fn default() -> Self {
        UiConfig {
            filter: Filter::All,
            sort: SortKey::Created,
            theme: Theme::Light,
            category: Category::Personal,
            priority: Priority::Medium,
            tick_rate: Duration::from_millis(50),
        }
    }
}

impl UiConfig {
    /// Build a config, validating the tick rate.
    pub fn new(
        filter: Filter,
        sort: SortKey,
        theme: Theme,
        category: Category,
        priority: Priority,
        tick_ms: u64,
    ) -> Result<Self, ConfigError> {
        if !(MIN_TICK_MS..=MAX_TICK_MS).contains(&tick_ms) {
            return Err(ConfigError::TickRate(tick_ms));
        }
        Ok(UiConfig {
            filter,
            sort,
            theme,
            category,
            priority,
            tick_rate: Duration::from_millis(tick_ms),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let config = UiConfig::default();
        assert_eq!(config.filter, Filter::All);
        assert_eq!(config.sort, SortKey::Created);
        assert_eq!(config.category, Category::Personal);
        assert_eq!(config.priority, Priority::Medium);
    }

    #[test]
    fn test_tick_rate_bounds() {
        let ok = UiConfig::new(Filter::Pending, SortKey::Priority, Theme::Dark, Category::Work, Priority::High, 100);
        assert_eq!(ok.unwrap().tick_rate, Duration::from_millis(100));
        assert_eq!(
            UiConfig::new(Filter::All, SortKey::Created, Theme::Light, Category::Personal, Priority::Low, 0),
            Err(ConfigError::TickRate(0))
        );
        assert!(UiConfig::new(Filter::All, SortKey::Created, Theme::Light, Category::Personal, Priority::Low, 5000).is_err());
    }
}
