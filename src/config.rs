//! Server configuration loaded from environment variables

/// Runtime configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// TCP port the listener binds
    pub port: u16,
    /// Nomination allowance for every new participant
    pub starting_nominations: u32,
    /// Vote allowance for every new participant
    pub starting_votes: u32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            starting_nominations: crate::types::STARTING_NOMINATIONS,
            starting_votes: crate::types::STARTING_VOTES,
        }
    }
}

impl ServerConfig {
    /// Load config from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let port = std::env::var("TALLY_PORT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.port);

        let starting_nominations = std::env::var("TALLY_NOMINATIONS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.starting_nominations);

        let starting_votes = std::env::var("TALLY_VOTES")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.starting_votes);

        tracing::info!(port, starting_nominations, starting_votes, "Config loaded");

        Self {
            port,
            starting_nominations,
            starting_votes,
        }
    }
}
