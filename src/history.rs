//! Recent-search history: a bounded list of city names the dashboard shows
//! as quick-repeat buttons, persisted as a JSON file across restarts.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::{fs, sync::Mutex};
use tracing::error;

// ---

/// Shared handle threaded through the router state.
pub type SharedHistory = Arc<Mutex<SearchHistory>>;

#[derive(Debug)]
pub struct SearchHistory {
    // ---
    path: PathBuf,
    limit: usize,
    /// Oldest first, the order the dashboard renders its buttons.
    cities: Vec<String>,
}

impl SearchHistory {
    // ---
    /// Load the history file, degrading to an empty history on a missing or
    /// unreadable file. A bad file must never stop the relay from starting.
    pub async fn load(path: PathBuf, limit: usize) -> Self {
        // ---
        let cities = match fs::read(&path).await {
            Ok(bytes) => match serde_json::from_slice::<Vec<String>>(&bytes) {
                Ok(cities) => cities,
                Err(err) => {
                    error!("failed to parse history file: {err}");
                    Vec::new()
                }
            },
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(err) => {
                error!("failed to read history file: {err}");
                Vec::new()
            }
        };

        let mut history = SearchHistory {
            path,
            limit,
            cities,
        };
        // The cap may have shrunk since the file was written.
        history.evict_over_limit();
        history
    }

    pub fn cities(&self) -> &[String] {
        &self.cities
    }

    /// Note a successfully searched city. An already-known city keeps its
    /// slot; a new one may evict the oldest entry. Returns whether the list
    /// changed and therefore needs persisting.
    pub fn record(&mut self, city: &str) -> bool {
        // ---
        if self.cities.iter().any(|known| known == city) {
            return false;
        }

        self.cities.push(city.to_string());
        self.evict_over_limit();
        true
    }

    pub async fn persist(&self) -> Result<()> {
        // ---
        let payload = serde_json::to_vec_pretty(&self.cities)?;
        fs::write(&self.path, payload)
            .await
            .with_context(|| format!("writing history file {}", self.path.display()))?;
        Ok(())
    }

    fn evict_over_limit(&mut self) {
        // ---
        if self.cities.len() > self.limit {
            let excess = self.cities.len() - self.limit;
            self.cities.drain(..excess);
        }
    }
}
