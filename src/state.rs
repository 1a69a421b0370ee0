use chrono::FixedOffset;

use crate::data::kv::KvStore;

/// Application context shared by the event handler, every command and the scheduler.
#[derive(Clone)]
pub struct AppState {
    pub store: KvStore,
    /// Timezone users type and read poll close dates in.
    pub utc_offset: FixedOffset,
}

impl AppState {
    pub fn new(store: KvStore, utc_offset: FixedOffset) -> Self {
        Self { store, utc_offset }
    }
}
