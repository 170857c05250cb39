//! xcodebuild build settings (`KEY=value`)
//!
//! A [`SettingSet`] keeps user build settings apart from the settings the lane
//! manages (code signing and the output directories). Output directories the
//! caller does not set are defaulted to `build`.
//!
//! Code signing is asymmetric: a managed `CODE_SIGN_IDENTITY` given without a
//! value means "leave it to the Xcode project" and is dropped, while an
//! explicit empty value is an error.

use tracing::debug;

use crate::entries::Entries;
use crate::error::{ConfigError, EntryKind, Result};
use crate::managed::ManagedSetting;

/// Validated user and managed build settings
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SettingSet {
    user: Entries,
    managed: Entries,
}

impl SettingSet {
    /// Validate, default and freeze both setting maps.
    ///
    /// Managed values are optional: `None` for `CODE_SIGN_IDENTITY` omits the
    /// setting, `None` for anything else is rejected.
    pub fn new<UK, UV, MK, MV>(
        user: impl IntoIterator<Item = (UK, UV)>,
        managed: impl IntoIterator<Item = (MK, Option<MV>)>,
    ) -> Result<Self>
    where
        UK: Into<String>,
        UV: Into<String>,
        MK: Into<String>,
        MV: Into<String>,
    {
        let user: Entries = user.into_iter().collect();
        validate_user_settings(&user)?;

        let raw = last_value_per_key(managed);
        let managed = canonical_managed_settings(&raw)?;

        debug!(
            user = user.len(),
            managed = managed.len(),
            "resolved xcodebuild settings"
        );

        Ok(Self { user, managed })
    }

    /// Settings with nothing but the defaulted output directories
    pub fn defaults() -> Self {
        let managed = ManagedSetting::ALL
            .into_iter()
            .filter_map(|s| s.default_value().map(|v| (s.name(), v)))
            .collect();
        Self {
            user: Entries::new(),
            managed,
        }
    }

    pub fn user_settings(&self) -> &Entries {
        &self.user
    }

    pub fn managed_settings(&self) -> &Entries {
        &self.managed
    }

    /// User settings followed by managed settings; managed wins on a shared key
    pub fn effective_settings(&self) -> Entries {
        self.user.overlay(&self.managed)
    }

    pub fn get(&self, setting: ManagedSetting) -> Option<&str> {
        self.managed.get(setting.name())
    }
}

impl Default for SettingSet {
    fn default() -> Self {
        Self::defaults()
    }
}

fn validate_user_settings(user: &Entries) -> Result<()> {
    for (key, value) in user.iter() {
        if key.trim().is_empty() {
            return Err(ConfigError::EmptyKey {
                kind: EntryKind::Setting,
                value: value.to_string(),
            });
        }
        if ManagedSetting::from_name(key).is_some() {
            return Err(ConfigError::ManagedSettingCollision {
                key: key.to_string(),
            });
        }
    }
    Ok(())
}

/// Managed input keyed by name, later duplicates replacing earlier ones.
///
/// Values stay optional until the code-sign check, so this is a plain pair
/// list rather than an [`Entries`].
fn last_value_per_key<K, V>(
    managed: impl IntoIterator<Item = (K, Option<V>)>,
) -> Vec<(String, Option<String>)>
where
    K: Into<String>,
    V: Into<String>,
{
    let mut raw: Vec<(String, Option<String>)> = Vec::new();
    for (key, value) in managed {
        let key = key.into();
        let value = value.map(Into::into);
        match raw.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => raw.push((key, value)),
        }
    }
    raw
}

fn canonical_managed_settings(raw: &[(String, Option<String>)]) -> Result<Entries> {
    for (key, value) in raw {
        if key.trim().is_empty() {
            return Err(ConfigError::EmptyKey {
                kind: EntryKind::Setting,
                value: value.clone().unwrap_or_default(),
            });
        }
        let setting = ManagedSetting::from_name(key)
            .ok_or_else(|| ConfigError::UnknownManagedSetting { key: key.clone() })?;

        match (setting, value.as_deref()) {
            (ManagedSetting::CodeSignIdentity, None) => {}
            (ManagedSetting::CodeSignIdentity, Some(v)) if v.trim().is_empty() => {
                return Err(ConfigError::EmptyCodeSignIdentity);
            }
            (_, None) => {
                return Err(ConfigError::MissingSettingValue { key: key.clone() });
            }
            (_, Some(v)) if v.trim().is_empty() => {
                return Err(ConfigError::MissingSettingValue { key: key.clone() });
            }
            _ => {}
        }
    }

    let mut managed = Entries::new();
    for setting in ManagedSetting::ALL {
        let supplied = raw.iter().find(|(k, _)| k == setting.name());
        match supplied {
            Some((_, Some(value))) => {
                managed.insert(setting.name(), value.as_str());
            }
            // Present without a value: omitted from the command line
            Some((_, None)) => {}
            None => {
                if let Some(default) = setting.default_value() {
                    managed.insert(setting.name(), default);
                }
            }
        }
    }
    Ok(managed)
}
