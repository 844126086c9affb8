//! INI profile file.
//!
//! ```ini
//! [sandbox]
//! hostname = wholesale.sandbox1.nuorder.com
//! consumer_key = ...
//! consumer_secret = ...
//! oauth_token = ...
//! oauth_token_secret = ...
//! app_name = ERP sync
//! ```
//!
//! The file is read once into an [`IniConfig`] which is then handed to
//! whatever needs it.

use std::env;
use std::path::{Path, PathBuf};

use config::{Config, ConfigError, File, FileFormat, Value};
use tracing::debug;

use crate::client::Credentials;
use crate::error::{Error, Result};

/// Environment variable naming the profile file.
pub const CONFIG_PATH_ENV: &str = "NUORDER_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "~/.config/nuorder.ini";
pub const DEFAULT_SECTION: &str = "sandbox";

pub const KEY_HOSTNAME: &str = "hostname";
pub const KEY_CONSUMER_KEY: &str = "consumer_key";
pub const KEY_CONSUMER_SECRET: &str = "consumer_secret";
pub const KEY_OAUTH_TOKEN: &str = "oauth_token";
pub const KEY_OAUTH_TOKEN_SECRET: &str = "oauth_token_secret";
pub const KEY_APP_NAME: &str = "app_name";

/// Parsed profile file. A missing file is an empty configuration.
#[derive(Clone, Debug)]
pub struct IniConfig {
    inner: Config,
}

impl IniConfig {
    /// Read `$NUORDER_CONFIG`, or `~/.config/nuorder.ini` when unset.
    pub fn load() -> Result<Self> {
        let raw = env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.into());
        Self::from_path(expand_home(&raw))
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "reading config");
        let inner = Config::builder()
            .add_source(File::from(path).format(FileFormat::Ini).required(false))
            .build()?;
        Ok(IniConfig { inner })
    }

    pub fn from_ini_str(text: &str) -> Result<Self> {
        let inner = Config::builder()
            .add_source(File::from_str(text, FileFormat::Ini))
            .build()?;
        Ok(IniConfig { inner })
    }

    /// View of one `[section]`. Never fails; lookups do.
    pub fn section<'a>(&'a self, name: &'a str) -> Profile<'a> {
        Profile { config: self, name }
    }
}

/// One section of an [`IniConfig`].
#[derive(Clone, Copy, Debug)]
pub struct Profile<'a> {
    config: &'a IniConfig,
    name: &'a str,
}

impl<'a> Profile<'a> {
    pub fn name(&self) -> &str {
        self.name
    }

    /// Required key.
    pub fn get(&self, key: &str) -> Result<String> {
        match self.lookup(key) {
            Ok(Some(value)) => Ok(value),
            Ok(None) => Err(Error::ConfigKeyMissing {
                section: self.name.to_string(),
                key: key.to_string(),
            }),
            Err(e) => Err(e.into()),
        }
    }

    pub fn get_or(&self, key: &str, default: &str) -> String {
        self.get_optional(key).unwrap_or_else(|| default.to_string())
    }

    pub fn get_optional(&self, key: &str) -> Option<String> {
        self.lookup(key).ok().flatten()
    }

    /// `true/false`, `yes/no`, `on/off` or `1/0`.
    pub fn get_bool_or(&self, key: &str, default: bool) -> Result<bool> {
        match self.value(key)? {
            Some(value) => Ok(value.into_bool()?),
            None => Ok(default),
        }
    }

    /// Credentials from this section, with any `overrides` taking precedence.
    pub fn credentials(&self, overrides: &Overrides) -> Result<Credentials> {
        let pick = |value: &Option<String>, key: &str| match value {
            Some(v) => Ok(v.clone()),
            None => self.get(key),
        };
        Ok(Credentials::new(
            pick(&overrides.hostname, KEY_HOSTNAME)?,
            pick(&overrides.consumer_key, KEY_CONSUMER_KEY)?,
            pick(&overrides.consumer_secret, KEY_CONSUMER_SECRET)?,
            pick(&overrides.oauth_token, KEY_OAUTH_TOKEN)?,
            pick(&overrides.oauth_token_secret, KEY_OAUTH_TOKEN_SECRET)?,
        ))
    }

    fn lookup(&self, key: &str) -> std::result::Result<Option<String>, ConfigError> {
        self.value(key)?.map(Value::into_string).transpose()
    }

    /// Option names match case-insensitively, an exact match winning.
    fn value(&self, key: &str) -> std::result::Result<Option<Value>, ConfigError> {
        let mut table = match self.config.inner.get_table(self.name) {
            Ok(table) => table,
            Err(ConfigError::NotFound(_)) => return Ok(None),
            Err(e) => return Err(e),
        };
        if let Some(value) = table.remove(key) {
            return Ok(Some(value));
        }
        Ok(table
            .into_iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(key))
            .map(|(_, value)| value))
    }
}

/// Values given on the command line, preferred over the file.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Overrides {
    pub hostname: Option<String>,
    pub consumer_key: Option<String>,
    pub consumer_secret: Option<String>,
    pub oauth_token: Option<String>,
    pub oauth_token_secret: Option<String>,
}

/// Replace a leading `~` with the home directory.
pub fn expand_home(path: &str) -> PathBuf {
    match (path.strip_prefix('~'), dirs::home_dir()) {
        (Some(rest), Some(home)) if rest.is_empty() || rest.starts_with('/') => {
            home.join(rest.trim_start_matches('/'))
        }
        _ => PathBuf::from(path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = "[sandbox]\n\
                          hostname = wholesale.sandbox1.nuorder.com\n\
                          consumer_key = ck\n\
                          consumer_secret = cs\n\
                          oauth_token = tok\n\
                          oauth_token_secret = ts\n\
                          app_name = ERP sync\n\
                          \n\
                          [production]\n\
                          hostname = wholesale.nuorder.com\n";

    #[test]
    fn reads_keys_from_section() {
        let config = IniConfig::from_ini_str(SAMPLE).unwrap();
        let sandbox = config.section("sandbox");
        assert_eq!(sandbox.get("hostname").unwrap(), "wholesale.sandbox1.nuorder.com");
        assert_eq!(sandbox.get(KEY_APP_NAME).unwrap(), "ERP sync");
        assert_eq!(config.section("production").get_optional(KEY_APP_NAME), None);
    }

    #[test]
    fn missing_key_names_section_and_key() {
        let config = IniConfig::from_ini_str(SAMPLE).unwrap();
        let err = config.section("production").get("consumer_key").unwrap_err();
        match &err {
            Error::ConfigKeyMissing { section, key } => {
                assert_eq!(section, "production");
                assert_eq!(key, "consumer_key");
            }
            other => panic!("unexpected error {:?}", other),
        }
        assert_eq!(
            err.to_string(),
            "`consumer_key` missing in section [production], and no default provided."
        );
    }

    #[test]
    fn missing_section_behaves_like_missing_keys() {
        let config = IniConfig::from_ini_str(SAMPLE).unwrap();
        let staging = config.section("staging");
        assert!(matches!(
            staging.get("hostname"),
            Err(Error::ConfigKeyMissing { .. })
        ));
        assert_eq!(staging.get_or("hostname", "h"), "h");
        assert_eq!(staging.get_optional("hostname"), None);
    }

    #[test]
    fn overrides_take_precedence() {
        let config = IniConfig::from_ini_str(SAMPLE).unwrap();
        let overrides = Overrides {
            oauth_token: Some("other".to_string()),
            ..Overrides::default()
        };
        let creds = config.section("sandbox").credentials(&overrides).unwrap();
        assert_eq!(creds.oauth_token, "other");
        assert_eq!(creds.oauth_token_secret, "ts");
        assert_eq!(creds.consumer_key, "ck");
    }

    #[test]
    fn overrides_fill_missing_keys() {
        let config = IniConfig::from_ini_str(SAMPLE).unwrap();
        let overrides = Overrides {
            consumer_key: Some("ck2".to_string()),
            consumer_secret: Some("cs2".to_string()),
            oauth_token: Some(String::new()),
            oauth_token_secret: Some(String::new()),
            ..Overrides::default()
        };
        let creds = config.section("production").credentials(&overrides).unwrap();
        assert_eq!(creds.hostname, "wholesale.nuorder.com");
        assert_eq!(creds.consumer_key, "ck2");
        assert_eq!(creds.oauth_token, "");
    }

    #[test]
    fn reads_file_from_path() {
        let mut file = tempfile::Builder::new().suffix(".ini").tempfile().unwrap();
        write!(file, "{}", SAMPLE).unwrap();
        file.flush().unwrap();

        let config = IniConfig::from_path(file.path()).unwrap();
        assert_eq!(config.section("sandbox").get("consumer_key").unwrap(), "ck");
    }

    #[test]
    fn missing_file_is_empty_config() {
        let dir = tempfile::tempdir().unwrap();
        let config = IniConfig::from_path(dir.path().join("absent.ini")).unwrap();
        assert!(matches!(
            config.section("sandbox").get("hostname"),
            Err(Error::ConfigKeyMissing { .. })
        ));
    }

    #[test]
    fn bool_keys() {
        let config = IniConfig::from_ini_str("[s]\ngzip = yes\nother = maybe\n").unwrap();
        let profile = config.section("s");
        assert!(profile.get_bool_or("gzip", false).unwrap());
        assert!(!profile.get_bool_or("absent", false).unwrap());
        assert!(profile.get_bool_or("other", false).is_err());
    }

    #[test]
    fn option_names_ignore_case() {
        let config =
            IniConfig::from_ini_str("[s]\nConsumer_Key = K\nGZIP = on\nhostname = h\n").unwrap();
        let profile = config.section("s");
        assert_eq!(profile.get(KEY_CONSUMER_KEY).unwrap(), "K");
        assert_eq!(profile.get("HOSTNAME").unwrap(), "h");
        assert!(profile.get_bool_or("gzip", false).unwrap());
    }

    #[test]
    fn expands_home() {
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_home("~/.config/x.ini"), home.join(".config/x.ini"));
        }
        assert_eq!(expand_home("/etc/x.ini"), PathBuf::from("/etc/x.ini"));
        assert_eq!(expand_home("~other/x.ini"), PathBuf::from("~other/x.ini"));
    }
}
