//! Configuration management for acton-admin
//!
//! Configuration is loaded from multiple sources with clear precedence:
//!
//! 1. Environment variables (highest priority, `ACTON_ADMIN_` prefix,
//!    `__` separates sections: `ACTON_ADMIN_SITE__TITLE`)
//! 2. `./admin.toml` (or an explicit file passed to [`AdminConfig::load_from`])
//! 3. Hardcoded defaults (fallback)
//!
//! # Example Configuration
//!
//! ```toml
//! # admin.toml
//! [site]
//! name = "admin"
//! title = "Back Office"
//! base_path = "/admin"
//!
//! [listing]
//! default_page_size = 25
//! max_page_size = 200
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use acton_admin::config::AdminConfig;
//!
//! # fn example() -> anyhow::Result<()> {
//! let config = AdminConfig::load()?;
//! assert!(config.listing.default_page_size > 0);
//! # Ok(())
//! # }
//! ```

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::AdminError;

/// Default configuration file name, looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "admin.toml";

/// Environment variable prefix
pub const ENV_PREFIX: &str = "ACTON_ADMIN_";

/// Site-wide settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SiteSettings {
    /// Root route name; every route name of the site starts with it
    pub name: String,

    /// Title shown in the page header and the browser tab
    pub title: String,

    /// Path the admin is served under
    pub base_path: String,
}

impl Default for SiteSettings {
    fn default() -> Self {
        Self {
            name: "admin".to_string(),
            title: "Acton Admin".to_string(),
            base_path: "/admin".to_string(),
        }
    }
}

/// List view settings
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ListingSettings {
    /// Page size used when the request does not ask for one
    pub default_page_size: u64,

    /// Upper bound for a requested page size
    pub max_page_size: u64,
}

impl Default for ListingSettings {
    fn default() -> Self {
        Self {
            default_page_size: 10,
            max_page_size: 100,
        }
    }
}

/// Complete acton-admin configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct AdminConfig {
    /// Site settings
    #[serde(default)]
    pub site: SiteSettings,

    /// List view settings
    #[serde(default)]
    pub listing: ListingSettings,
}

impl AdminConfig {
    /// Load configuration from `./admin.toml` and the environment
    ///
    /// A missing file is not an error; defaults are used instead.
    pub fn load() -> Result<Self, AdminError> {
        Self::load_from(DEFAULT_CONFIG_FILE)
    }

    /// Load configuration from a specific file and the environment
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use acton_admin::config::AdminConfig;
    ///
    /// # fn example() -> anyhow::Result<()> {
    /// let config = AdminConfig::load_from("./config/production.toml")?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, AdminError> {
        let config: Self = Self::figment(path.as_ref()).extract()?;
        config.validate()?;

        tracing::debug!(
            path = %path.as_ref().display(),
            base_path = %config.site.base_path,
            default_page_size = config.listing.default_page_size,
            "Admin configuration loaded"
        );

        Ok(config)
    }

    /// The provider stack used by [`load_from`](Self::load_from)
    #[must_use]
    pub fn figment(path: &Path) -> Figment {
        Figment::from(Serialized::defaults(Self::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Reject settings that cannot produce a working site
    pub fn validate(&self) -> Result<(), AdminError> {
        if self.site.name.is_empty() {
            return Err(AdminError::Configuration("site.name must not be empty".into()));
        }
        if !self.site.base_path.is_empty() && !self.site.base_path.starts_with('/') {
            return Err(AdminError::Configuration(format!(
                "site.base_path must start with '/', got '{}'",
                self.site.base_path
            )));
        }
        if self.listing.default_page_size == 0 || self.listing.max_page_size == 0 {
            return Err(AdminError::Configuration(
                "listing page sizes must be greater than zero".into(),
            ));
        }
        if self.listing.default_page_size > self.listing.max_page_size {
            return Err(AdminError::Configuration(format!(
                "listing.default_page_size ({}) exceeds listing.max_page_size ({})",
                self.listing.default_page_size, self.listing.max_page_size
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn test_default_config() {
        let config = AdminConfig::default();
        assert_eq!(config.site.name, "admin");
        assert_eq!(config.site.base_path, "/admin");
        assert_eq!(config.listing.default_page_size, 10);
        assert_eq!(config.listing.max_page_size, 100);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_without_file_uses_defaults() {
        Jail::expect_with(|_jail| {
            let config = AdminConfig::load().map_err(|e| e.to_string())?;
            assert_eq!(config, AdminConfig::default());
            Ok(())
        });
    }

    #[test]
    fn test_file_and_env_precedence() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "admin.toml",
                r#"
                [site]
                title = "Back Office"

                [listing]
                default_page_size = 25
                "#,
            )?;
            jail.set_env("ACTON_ADMIN_SITE__TITLE", "From Env");

            let config = AdminConfig::load().map_err(|e| e.to_string())?;
            assert_eq!(config.site.title, "From Env");
            assert_eq!(config.listing.default_page_size, 25);
            assert_eq!(config.listing.max_page_size, 100);
            Ok(())
        });
    }

    #[test]
    fn test_invalid_page_sizes_rejected() {
        let mut config = AdminConfig::default();
        config.listing.default_page_size = 500;
        assert!(matches!(
            config.validate(),
            Err(AdminError::Configuration(_))
        ));

        config.listing.default_page_size = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_relative_base_path_rejected() {
        let mut config = AdminConfig::default();
        config.site.base_path = "admin".into();
        assert!(config.validate().is_err());

        config.site.base_path = String::new();
        assert!(config.validate().is_ok());
    }
}
