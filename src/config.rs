use std::{
    env,
    net::{IpAddr, Ipv4Addr, SocketAddr},
    path::PathBuf,
};

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub listen_addr: SocketAddr,
    pub model_path: PathBuf,
    pub load_on_startup: bool,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let listen_addr = env::var("SERVER_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:5000".into())
            .parse()
            .unwrap_or_else(|_| SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 5000));

        let model_path = PathBuf::from(
            env::var("MODEL_PATH")
                .unwrap_or_else(|_| "models/instagram_reach_model.json".to_string()),
        );

        let load_on_startup = env::var("LOAD_MODEL_ON_STARTUP")
            .ok()
            .and_then(|v| parse_flag(&v))
            .unwrap_or(true);

        Ok(Self {
            listen_addr,
            model_path,
            load_on_startup,
        })
    }

    pub fn with_model_path(model_path: impl Into<PathBuf>) -> Self {
        Self {
            listen_addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 5000),
            model_path: model_path.into(),
            load_on_startup: true,
        }
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags() {
        assert_eq!(parse_flag("TRUE"), Some(true));
        assert_eq!(parse_flag(" off "), Some(false));
        assert_eq!(parse_flag("0"), Some(false));
        assert_eq!(parse_flag("maybe"), None);
    }

    #[test]
    fn explicit_model_path() {
        let config = AppConfig::with_model_path("/tmp/model.json");
        assert_eq!(config.model_path, PathBuf::from("/tmp/model.json"));
        assert!(config.load_on_startup);
        assert_eq!(config.listen_addr.port(), 5000);
    }
}
