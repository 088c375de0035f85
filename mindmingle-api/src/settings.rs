use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment, File, FileFormat};

#[derive(Clone, Debug, serde::Deserialize, serde::Serialize)]
pub struct Settings {
    pub site: Site,
    pub client: Client,
    pub features: Features,
}

#[derive(Clone, Debug, serde::Deserialize, serde::Serialize)]
pub struct Site {
    /// public address posts are shared from
    pub address: String,
    /// origin of the rest backend
    pub api_origin: String,
}

#[derive(Clone, Debug, serde::Deserialize, serde::Serialize)]
pub struct Client {
    pub timeout_ms: u64,
    pub share_flash_ms: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub struct Features {
    pub likes: bool,
    pub comments: bool,
    pub shares: bool,
    pub reactions: bool,
}

impl Default for Features {
    fn default() -> Self {
        Self {
            likes: true,
            comments: true,
            shares: true,
            reactions: true,
        }
    }
}

impl Settings {
    /// Reads `mindmingle.toml` from the working directory if present, then
    /// `MINDMINGLE__SECTION__KEY` environment overrides.
    pub fn new_from_file() -> Result<Self, ConfigError> {
        Self::new_from_file_and_env(Self::environment())
    }

    fn new_from_file_and_env(env: Environment) -> Result<Self, ConfigError> {
        Self::with_defaults()?
            .add_source(File::with_name("mindmingle").required(false))
            .add_source(env)
            .build()?
            .try_deserialize()
    }

    fn environment() -> Environment {
        Environment::with_prefix("MINDMINGLE").separator("__")
    }

    pub fn new_from_toml(toml: impl AsRef<str>) -> Result<Self, ConfigError> {
        Self::with_defaults()?
            .add_source(File::from_str(toml.as_ref(), FileFormat::Toml))
            .build()?
            .try_deserialize()
    }

    pub fn new_testing() -> Self {
        Self {
            site: Site {
                address: "http://localhost:3000".to_string(),
                api_origin: "http://localhost:8080".to_string(),
            },
            client: Client {
                timeout_ms: 5_000,
                share_flash_ms: 3_000,
            },
            features: Features::default(),
        }
    }

    fn with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        Config::builder()
            .set_default("site.address", "http://localhost:3000")?
            .set_default("site.api_origin", "http://localhost:8080")?
            .set_default("client.timeout_ms", 10_000)?
            .set_default("client.share_flash_ms", 3_000)?
            .set_default("features.likes", true)?
            .set_default("features.comments", true)?
            .set_default("features.shares", true)?
            .set_default("features.reactions", true)
    }
}

#[cfg(test)]
mod settings_tests {
    use pretty_assertions::assert_eq;
    use test_log::test;

    use super::{Features, Settings};

    #[test]
    fn test_settings_defaults() {
        let settings = Settings::new_from_toml("").unwrap();
        assert_eq!(settings.site.address, "http://localhost:3000");
        assert_eq!(settings.client.share_flash_ms, 3_000);
        assert_eq!(settings.features, Features::default());
    }

    #[test]
    fn test_settings_env_override() {
        let vars = [
            ("MINDMINGLE__SITE__API_ORIGIN", "https://api.mindmingle.app"),
            ("MINDMINGLE__CLIENT__TIMEOUT_MS", "2500"),
            ("MINDMINGLE__FEATURES__SHARES", "false"),
            ("OTHER__SITE__ADDRESS", "http://ignored"),
        ]
        .into_iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect::<config::Map<String, String>>();

        let settings =
            Settings::new_from_file_and_env(Settings::environment().source(Some(vars))).unwrap();
        assert_eq!(settings.site.api_origin, "https://api.mindmingle.app");
        assert_eq!(settings.site.address, "http://localhost:3000");
        assert_eq!(settings.client.timeout_ms, 2_500);
        assert!(!settings.features.shares);
        assert!(settings.features.likes);
    }

    #[test]
    fn test_settings_override() {
        let settings = Settings::new_from_toml(
            r#"
            [site]
            api_origin = "https://api.mindmingle.app"

            [features]
            reactions = false
            "#,
        )
        .unwrap();
        assert_eq!(settings.site.api_origin, "https://api.mindmingle.app");
        assert_eq!(settings.site.address, "http://localhost:3000");
        assert!(!settings.features.reactions);
        assert!(settings.features.likes);
    }
}
