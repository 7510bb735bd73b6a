use serde::Deserialize;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// TMDB API key used for movie detail lookups
    pub tmdb_api_key: String,

    /// TMDB API base URL
    #[serde(default = "default_tmdb_api_url")]
    pub tmdb_api_url: String,

    /// Prefix prepended to TMDB poster paths
    #[serde(default = "default_poster_base_url")]
    pub poster_base_url: String,

    /// Path to the JSON movie catalog
    #[serde(default = "default_corpus_path")]
    pub corpus_path: String,

    /// Optional Redis connection URL for sharing the details cache
    #[serde(default)]
    pub redis_url: Option<String>,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Upper bound on the vectorizer vocabulary
    #[serde(default = "default_max_features")]
    pub max_features: usize,

    /// Number of ranked neighbours scanned for mood matches
    #[serde(default = "default_candidate_pool")]
    pub candidate_pool: usize,

    /// Timeout for a single movie detail request, in seconds
    #[serde(default = "default_enrich_timeout_secs")]
    pub enrich_timeout_secs: u64,
}

fn default_tmdb_api_url() -> String {
    "https://api.themoviedb.org".to_string()
}

fn default_poster_base_url() -> String {
    "https://image.tmdb.org/t/p/w500".to_string()
}

fn default_corpus_path() -> String {
    "data/movies.json".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_max_features() -> usize {
    5000
}

fn default_candidate_pool() -> usize {
    59
}

fn default_enrich_timeout_secs() -> u64 {
    10
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_vars(std::env::vars())
    }

    /// Load configuration from an explicit set of key/value pairs
    pub fn from_vars<I>(vars: I) -> anyhow::Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        envy::from_iter::<_, Config>(vars).map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    /// Socket address string the server binds to
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
