use crate::error::ConfigError;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub static_dir: PathBuf,
    pub seed_demo: bool,
}

impl Config {
    /// Reads the process environment. Call `dotenvy::dotenv()` first to pick
    /// up a `.env` file.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let database_url = lookup("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;

        let port = match lookup("PORT") {
            Some(raw) => raw.parse().map_err(|_| ConfigError::Invalid { key: "PORT", value: raw })?,
            None => 3000,
        };

        let static_dir = lookup("STATIC_DIR").map_or_else(|| PathBuf::from("dist"), PathBuf::from);

        let seed_demo = match lookup("SEED_DEMO").as_deref().map(str::to_ascii_lowercase).as_deref() {
            None | Some("" | "0" | "false" | "no") => false,
            Some("1" | "true" | "yes") => true,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    key: "SEED_DEMO",
                    value: other.to_string(),
                });
            }
        };

        Ok(Config {
            database_url,
            port,
            static_dir,
            seed_demo,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults() {
        let config = config(&[("DATABASE_URL", "sqlite://agenda.db")]).unwrap();
        assert_eq!(config.port, 3000);
        assert_eq!(config.static_dir, PathBuf::from("dist"));
        assert!(!config.seed_demo);
    }

    #[test]
    fn database_url_is_required() {
        assert!(matches!(config(&[]), Err(ConfigError::Missing("DATABASE_URL"))));
    }

    #[test]
    fn overrides_and_bad_values() {
        let config_ok = config(&[
            ("DATABASE_URL", "sqlite::memory:"),
            ("PORT", "8080"),
            ("STATIC_DIR", "public"),
            ("SEED_DEMO", "TRUE"),
        ])
        .unwrap();
        assert_eq!(config_ok.port, 8080);
        assert_eq!(config_ok.static_dir, PathBuf::from("public"));
        assert!(config_ok.seed_demo);

        assert!(matches!(
            config(&[("DATABASE_URL", "x"), ("PORT", "http")]),
            Err(ConfigError::Invalid { key: "PORT", .. })
        ));
        assert!(matches!(
            config(&[("DATABASE_URL", "x"), ("SEED_DEMO", "talvez")]),
            Err(ConfigError::Invalid { key: "SEED_DEMO", .. })
        ));
    }
}
