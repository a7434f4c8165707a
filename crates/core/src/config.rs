//! Caller-supplied scan tunables and their TOML form.
//!
//! The core never touches the filesystem; callers read `.defscan.toml`
//! themselves and hand the text to [`ScanOptions::from_toml_str`].

use std::collections::BTreeMap;

use tracing::warn;

use crate::error::ConfigError;
use crate::profile::ProfileId;

pub const DEFAULT_TAB_WIDTH: usize = 4;
pub const DEFAULT_MAX_SIGNATURE_LOOKAHEAD: usize = 50;

/// Per-profile knobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProfileTunables {
    /// Column width of a tab when measuring indentation.
    pub tab_width: usize,
    /// Newlines a signature may span before the candidate is abandoned.
    pub max_signature_lookahead: usize,
}

impl Default for ProfileTunables {
    fn default() -> Self {
        ProfileTunables {
            tab_width: DEFAULT_TAB_WIDTH,
            max_signature_lookahead: DEFAULT_MAX_SIGNATURE_LOOKAHEAD,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ScanOptions {
    pub defaults: ProfileTunables,
    pub profiles: BTreeMap<ProfileId, ProfileTunables>,
    /// Lowercased extension (no dot) → profile. Checked before the built-in table.
    pub extensions: BTreeMap<String, ProfileId>,
}

impl ScanOptions {
    pub fn tunables(&self, id: ProfileId) -> ProfileTunables {
        self.profiles.get(&id).copied().unwrap_or(self.defaults)
    }

    pub fn with_extension(mut self, ext: &str, id: ProfileId) -> Self {
        self.extensions.insert(normalize_extension(ext), id);
        self
    }

    /// Parse a `.defscan.toml` document. Unknown keys are logged and ignored.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let table = content.parse::<toml::Table>()?;
        let mut options = ScanOptions::default();

        warn_unknown_keys(&table, KNOWN_CONFIG_KEYS, "");
        options.defaults = read_tunables(&table, ProfileTunables::default(), "")?;

        // extensions
        if let Some(value) = table.get("extensions") {
            let exts = value.as_table().ok_or_else(|| ConfigError::InvalidValue {
                key: "extensions".to_string(),
                reason: "expected a table of extension = \"profile\"".to_string(),
            })?;
            for (ext, profile) in exts {
                let name = profile.as_str().ok_or_else(|| ConfigError::InvalidValue {
                    key: format!("extensions.{ext}"),
                    reason: "expected a profile name string".to_string(),
                })?;
                let id = parse_profile(name)?;
                options.extensions.insert(normalize_extension(ext), id);
            }
        }

        // profiles.<id>: each inherits the top-level defaults
        if let Some(value) = table.get("profiles") {
            let profiles = value.as_table().ok_or_else(|| ConfigError::InvalidValue {
                key: "profiles".to_string(),
                reason: "expected a table of profile sections".to_string(),
            })?;
            for (name, section) in profiles {
                let id = parse_profile(name)?;
                let section = section.as_table().ok_or_else(|| ConfigError::InvalidValue {
                    key: format!("profiles.{name}"),
                    reason: "expected a table".to_string(),
                })?;
                let prefix = format!("profiles.{name}.");
                warn_unknown_keys(section, KNOWN_PROFILE_KEYS, &prefix);
                let tunables = read_tunables(section, options.defaults, &prefix)?;
                options.profiles.insert(id, tunables);
            }
        }

        Ok(options)
    }
}

// ---------------------------------------------------------------------------
// TOML helpers
// ---------------------------------------------------------------------------

const KNOWN_CONFIG_KEYS: &[&str] =
    &["tab_width", "max_signature_lookahead", "extensions", "profiles"];
const KNOWN_PROFILE_KEYS: &[&str] = &["tab_width", "max_signature_lookahead"];

fn normalize_extension(ext: &str) -> String {
    ext.trim_start_matches('.').to_ascii_lowercase()
}

fn parse_profile(name: &str) -> Result<ProfileId, ConfigError> {
    name.parse::<ProfileId>().map_err(|_| ConfigError::UnknownProfile(name.to_string()))
}

fn read_tunables(
    table: &toml::Table,
    base: ProfileTunables,
    prefix: &str,
) -> Result<ProfileTunables, ConfigError> {
    let mut tunables = base;
    if let Some(value) = table.get("tab_width") {
        tunables.tab_width = positive_int(value, &format!("{prefix}tab_width"))?;
    }
    if let Some(value) = table.get("max_signature_lookahead") {
        tunables.max_signature_lookahead =
            positive_int(value, &format!("{prefix}max_signature_lookahead"))?;
    }
    Ok(tunables)
}

fn positive_int(value: &toml::Value, key: &str) -> Result<usize, ConfigError> {
    match value.as_integer() {
        Some(n) if n > 0 => usize::try_from(n).map_err(|_| ConfigError::InvalidValue {
            key: key.to_string(),
            reason: format!("{n} is out of range"),
        }),
        Some(n) => Err(ConfigError::InvalidValue {
            key: key.to_string(),
            reason: format!("must be a positive integer, got {n}"),
        }),
        None => Err(ConfigError::InvalidValue {
            key: key.to_string(),
            reason: format!("expected an integer, got {}", value.type_str()),
        }),
    }
}

fn warn_unknown_keys(table: &toml::Table, known: &[&str], prefix: &str) {
    for key in table.keys() {
        if known.contains(&key.as_str()) {
            continue;
        }
        let suggestion = known.iter().min_by_key(|k| edit_distance(key, k)).copied();
        match suggestion {
            Some(s) if edit_distance(key, s) <= 3 => {
                warn!(
                    key = %format!("{prefix}{key}"),
                    suggestion = s,
                    "Unknown key in .defscan.toml, did you mean '{prefix}{s}'?"
                );
            }
            _ => {
                warn!(
                    key = %format!("{prefix}{key}"),
                    "Unknown key in .defscan.toml (known keys: {})",
                    known.join(", ")
                );
            }
        }
    }
}

/// Simple Levenshtein edit distance for typo suggestions.
fn edit_distance(a: &str, b: &str) -> usize {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];
    for (i, &ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, &cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}
