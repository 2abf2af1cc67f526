//! Configuration management for Kort.

mod settings;

pub use settings::{
    CacheSettings, GeneralSettings, HttpSettings, ProviderSettings, Settings, SummarySettings,
};
