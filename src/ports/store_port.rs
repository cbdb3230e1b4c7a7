//! History persistence port trait.

use crate::domain::error::PhasewatchError;
use crate::domain::history::HistoryStore;

/// Durable storage for the bounded daily history.
///
/// `load` on a store that does not exist yet returns an empty history;
/// `save` must never leave a partially written store behind.
pub trait HistoryStorePort {
    fn load(&self) -> Result<HistoryStore, PhasewatchError>;
    fn save(&self, store: &HistoryStore) -> Result<(), PhasewatchError>;
}
