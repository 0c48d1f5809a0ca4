use std::{env, net::SocketAddr, path::PathBuf};

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_DATA_PATH: &str = "data/state.json";
const DEFAULT_USER: &str = "local";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub data_path: PathBuf,
    /// User shown on the records page when the request names none.
    pub default_user: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let port = lookup("PORT")
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(DEFAULT_PORT);
        let data_path = lookup("APP_DATA_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_PATH));
        let default_user = lookup("APP_DEFAULT_USER")
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| DEFAULT_USER.to_string());

        Self {
            port,
            data_path,
            default_user,
        }
    }

    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::from(([0, 0, 0, 0], self.port))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> AppConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        AppConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = config(&[]);
        assert_eq!(config.port, 8080);
        assert_eq!(config.data_path, PathBuf::from("data/state.json"));
        assert_eq!(config.default_user, "local");
    }

    #[test]
    fn reads_overrides_and_ignores_bad_port() {
        let config = config(&[
            ("PORT", "not-a-port"),
            ("APP_DATA_PATH", "/tmp/streaks.json"),
            ("APP_DEFAULT_USER", " alice "),
        ]);
        assert_eq!(config.port, 8080);
        assert_eq!(config.data_path, PathBuf::from("/tmp/streaks.json"));
        assert_eq!(config.default_user, "alice");
        assert_eq!(config.bind_addr().port(), 8080);
    }
}
