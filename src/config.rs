use serde::Deserialize;
use std::path::PathBuf;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Directory holding the dataset files
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Dataset key to load; auto-detected from the files in `data_dir` when unset
    #[serde(default)]
    pub dataset: Option<String>,

    /// TMDB API key, only needed for metadata enrichment
    #[serde(default)]
    pub tmdb_api_key: Option<String>,

    /// TMDB API base URL
    #[serde(default = "default_tmdb_api_url")]
    pub tmdb_api_url: String,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_tmdb_api_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_iter(std::env::vars())
    }

    /// Load configuration from an explicit set of variables
    pub fn from_iter<I>(vars: I) -> anyhow::Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        envy::from_iter::<_, Config>(vars).map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    /// Address the HTTP server binds to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// TMDB API key, rejecting the placeholder shipped in `.env.example`
    pub fn require_tmdb_api_key(&self) -> anyhow::Result<&str> {
        match self.tmdb_api_key.as_deref().map(str::trim) {
            Some(key) if !key.is_empty() && key != "your_api_key_here" => Ok(key),
            _ => Err(anyhow::anyhow!("A valid TMDB_API_KEY is required")),
        }
    }
}
