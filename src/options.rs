//! xcodebuild options (`-key value`)
//!
//! An [`OptionSet`] holds the options the user asked for next to the options
//! the lane manages (project, configuration, sdk, target). The two never share
//! a key: a user option that names a managed option is rejected outright.

use tracing::debug;

use crate::entries::Entries;
use crate::error::{ConfigError, EntryKind, Result};
use crate::managed::ManagedOption;

/// Validated user and managed options
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OptionSet {
    user: Entries,
    managed: Entries,
}

impl OptionSet {
    /// Validate and freeze both option maps.
    ///
    /// Checks run in order: user keys colliding with a managed option name
    /// (case-insensitive), managed keys outside the managed table, then
    /// required managed options that are missing.
    ///
    /// User options keep the order they were supplied in. Managed options are
    /// stored in the order of [`ManagedOption::ALL`], whatever order the caller
    /// used.
    pub fn new<UK, UV, MK, MV>(
        user: impl IntoIterator<Item = (UK, UV)>,
        managed: impl IntoIterator<Item = (MK, MV)>,
    ) -> Result<Self>
    where
        UK: Into<String>,
        UV: Into<String>,
        MK: Into<String>,
        MV: Into<String>,
    {
        let user: Entries = user.into_iter().collect();
        let raw_managed: Entries = managed.into_iter().collect();

        validate_user_options(&user)?;
        let managed = canonical_managed_options(&raw_managed)?;

        debug!(
            user = user.len(),
            managed = managed.len(),
            "resolved xcodebuild options"
        );

        Ok(Self { user, managed })
    }

    /// Options with no user overrides
    pub fn from_managed<K, V>(managed: impl IntoIterator<Item = (K, V)>) -> Result<Self>
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self::new(Entries::new(), managed)
    }

    pub fn user_options(&self) -> &Entries {
        &self.user
    }

    pub fn managed_options(&self) -> &Entries {
        &self.managed
    }

    /// User options followed by managed options; managed wins on a shared key
    pub fn effective_options(&self) -> Entries {
        self.user.overlay(&self.managed)
    }

    /// Value of a managed option, if set
    pub fn get(&self, option: ManagedOption) -> Option<&str> {
        self.managed.get(option.name())
    }

    /// Copy of this set with one managed option set to `value`
    pub fn with_managed(&self, option: ManagedOption, value: impl Into<String>) -> Result<Self> {
        let mut managed = self.managed.clone();
        managed.insert(option.name(), value);
        Self::new(self.user.clone(), managed)
    }
}

fn validate_user_options(user: &Entries) -> Result<()> {
    for (key, value) in user.iter() {
        if key.trim().is_empty() {
            return Err(ConfigError::EmptyKey {
                kind: EntryKind::Option,
                value: value.to_string(),
            });
        }
        if let Some(option) = ManagedOption::matching(key) {
            return Err(ConfigError::ManagedOptionCollision {
                key: option.name().to_string(),
            });
        }
    }
    Ok(())
}

fn canonical_managed_options(raw: &Entries) -> Result<Entries> {
    for (key, value) in raw.iter() {
        if key.trim().is_empty() {
            return Err(ConfigError::EmptyKey {
                kind: EntryKind::Option,
                value: value.to_string(),
            });
        }
        if ManagedOption::from_name(key).is_none() {
            return Err(ConfigError::UnknownManagedOption {
                key: key.to_string(),
            });
        }
    }

    let mut managed = Entries::new();
    for option in ManagedOption::ALL {
        match raw.get(option.name()) {
            Some(value) => {
                managed.insert(option.name(), value);
            }
            None if option.is_required() => {
                return Err(ConfigError::MissingRequiredOption {
                    key: option.name().to_string(),
                });
            }
            None => {}
        }
    }
    Ok(managed)
}
