//! Tester configuration from environment.

use reqwest::Url;
use std::env;
use std::path::PathBuf;

const DEFAULT_WEB_PORT: u16 = 9898;

#[derive(Debug, Clone)]
pub struct Config {
    /// Port handed to the generator; it builds its own web server URL from it.
    pub web_port: u16,
    pub web_url: String,
    pub generator_port: u16,
    pub generator_jar: PathBuf,
    pub http_timeout_secs: u64,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Build from any variable source. Without `AQMAPS_WEB_PORT` the port is
    /// taken from `AQMAPS_WEB_URL`, so the tester and the generator talk to
    /// the same server.
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Self {
        let web_url = var("AQMAPS_WEB_URL");
        let web_port = var("AQMAPS_WEB_PORT")
            .and_then(|s| s.parse().ok())
            .or_else(|| web_url.as_deref().and_then(url_port))
            .unwrap_or(DEFAULT_WEB_PORT);
        Self {
            web_port,
            web_url: web_url.unwrap_or_else(|| format!("http://localhost:{}", web_port)),
            generator_port: var("AQMAPS_GENERATOR_PORT")
                .and_then(|s| s.parse().ok())
                .unwrap_or(5678),
            generator_jar: var("AQMAPS_GENERATOR_JAR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("aqmaps-0.0.1-SNAPSHOT.jar")),
            http_timeout_secs: var("AQMAPS_HTTP_TIMEOUT_SECS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(10),
        }
    }

    /// Port of `web_url` when it differs from `web_port`.
    pub fn port_conflict(&self) -> Option<u16> {
        url_port(&self.web_url).filter(|port| *port != self.web_port)
    }
}

fn url_port(url: &str) -> Option<u16> {
    Url::parse(url).ok()?.port_or_known_default()
}
