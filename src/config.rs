//! Store credentials and endpoint configuration.

use std::fmt;

use crate::error::{ImportError, ImportResult};

/// Environment variable holding the Notion integration token.
pub const TOKEN_VAR: &str = "NOTION_TOKEN";
/// Environment variable holding the target database id.
pub const DATABASE_VAR: &str = "NOTION_DATABASE_ID";
/// Optional override of the API base URL.
pub const API_BASE_VAR: &str = "NOTION_API_BASE";
/// Optional override of the `Notion-Version` header.
pub const VERSION_VAR: &str = "NOTION_VERSION";

pub const DEFAULT_API_BASE: &str = "https://api.notion.com";
pub const DEFAULT_NOTION_VERSION: &str = "2022-06-28";

/// Connection settings for the Notion record store.
///
/// Token and database id are required; blank values count as missing.
#[derive(Clone, PartialEq, Eq)]
pub struct NotionConfig {
    pub token: String,
    pub database_id: String,
    pub api_base: String,
    pub notion_version: String,
}

impl NotionConfig {
    /// Read the configuration from process environment variables.
    pub fn from_env() -> ImportResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read the configuration through `lookup`, which maps a variable name to its value.
    pub fn from_lookup<F>(lookup: F) -> ImportResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let value = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let token = value(TOKEN_VAR).ok_or(ImportError::MissingConfig { key: TOKEN_VAR })?;
        let database_id = value(DATABASE_VAR).ok_or(ImportError::MissingConfig {
            key: DATABASE_VAR,
        })?;

        Ok(Self {
            token,
            database_id,
            api_base: value(API_BASE_VAR)
                .map(|base| base.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            notion_version: value(VERSION_VAR)
                .unwrap_or_else(|| DEFAULT_NOTION_VERSION.to_string()),
        })
    }
}

impl fmt::Debug for NotionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NotionConfig")
            .field("token", &"<redacted>")
            .field("database_id", &self.database_id)
            .field("api_base", &self.api_base)
            .field("notion_version", &self.notion_version)
            .finish()
    }
}
