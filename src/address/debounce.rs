use crate::address::traits::AddressSuggester;
use crate::address::types::AddressSuggestion;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Queries shorter than this never reach the backend
pub const MIN_QUERY_LEN: usize = 3;

/// Runs an address lookup once typing has settled.
///
/// Every keystroke calls [`SuggestionDebouncer::on_input`]. A call returns
/// `None` when a newer keystroke arrived while it was waiting or while its
/// lookup was in flight, so only the latest query's results are ever shown.
pub struct SuggestionDebouncer {
    suggester: Arc<dyn AddressSuggester>,
    quiet_period: Duration,
    generation: AtomicU64,
}

impl SuggestionDebouncer {
    pub fn new(suggester: Arc<dyn AddressSuggester>, quiet_period: Duration) -> Self {
        Self {
            suggester,
            quiet_period,
            generation: AtomicU64::new(0),
        }
    }

    pub async fn on_input(&self, query: &str) -> Option<Vec<AddressSuggestion>> {
        let ticket = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        tokio::time::sleep(self.quiet_period).await;
        if !self.is_current(ticket) {
            debug!("Superseded before lookup: {:?}", query);
            return None;
        }

        let query = query.trim();
        if query.chars().count() < MIN_QUERY_LEN {
            return Some(Vec::new());
        }

        let suggestions = match self.suggester.suggest(query).await {
            Ok(found) => found,
            Err(e) => {
                warn!("{} lookup failed: {:#}", self.suggester.source_name(), e);
                Vec::new()
            }
        };

        if !self.is_current(ticket) {
            debug!("Discarding stale suggestions for {:?}", query);
            return None;
        }
        Some(suggestions)
    }

    /// Stop delivering results for anything already in flight
    pub fn cancel(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }

    fn is_current(&self, ticket: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == ticket
    }
}
