//! Credentials read from the environment
//!
//! Secrets never live in the config file.

use crate::constants::env::{MASTODON_ACCESS_TOKEN, MASTODON_INSTANCE, OPENTRIPMAP_API_KEY};
use crate::error::{Error, Result};
use std::fmt;

/// Mastodon account to post with
#[derive(Clone, PartialEq)]
pub struct MastodonCredentials {
    pub instance: String,
    pub access_token: String,
}

impl fmt::Debug for MastodonCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MastodonCredentials")
            .field("instance", &self.instance)
            .field("access_token", &"***")
            .finish()
    }
}

/// API credentials for one run
#[derive(Clone, PartialEq)]
pub struct Credentials {
    pub opentripmap_api_key: String,
    /// None only when publishing is disabled
    pub mastodon: Option<MastodonCredentials>,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("opentripmap_api_key", &"***")
            .field("mastodon", &self.mastodon)
            .finish()
    }
}

impl Credentials {
    /// Read credentials from the process environment
    pub fn from_env(require_mastodon: bool) -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok(), require_mastodon)
    }

    /// Read credentials through `lookup`
    ///
    /// Blank values count as missing. Mastodon variables are only read when
    /// `require_mastodon` is set.
    pub fn from_lookup<F>(lookup: F, require_mastodon: bool) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &'static str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or(Error::MissingEnv(key))
        };

        let mastodon = if require_mastodon {
            Some(MastodonCredentials {
                instance: required(MASTODON_INSTANCE)?,
                access_token: required(MASTODON_ACCESS_TOKEN)?,
            })
        } else {
            None
        };

        Ok(Self {
            opentripmap_api_key: required(OPENTRIPMAP_API_KEY)?,
            mastodon,
        })
    }
}
