use std::{
    collections::HashSet,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc, Mutex,
    },
};

use async_trait::async_trait;
use chrono::{Duration, FixedOffset, Utc};
use test_utils::builder::TestBuilder;

use crate::{
    data::{kv::KvStore, poll::PollRepository},
    error::AppError,
    model::{
        poll::{CreatePollParams, EditPollParams, MessageRef, Poll, PollState},
        view::PollView,
    },
    service::{gateway::ChatGateway, poll::PollService},
    util::parse::DATETIME_FORMAT,
};


const GUILD: u64 = 1;
const CHANNEL: u64 = 100;

/// In-memory gateway recording every outbound call.
#[derive(Default)]
struct MockGateway {
    next_id: AtomicU64,
    posts: Mutex<Vec<(u64, PollView)>>,
    edits: Mutex<Vec<(MessageRef, PollView)>>,
    deletes: Mutex<Vec<MessageRef>>,
    /// Message ids whose edits, deletes and lookups fail.
    broken: Mutex<HashSet<u64>>,
    members: Vec<u64>,
}

impl MockGateway {
    fn with_members(members: Vec<u64>) -> Self {
        Self {
            members,
            ..Default::default()
        }
    }

    fn break_message(&self, message_id: u64) {
        self.broken.lock().unwrap().insert(message_id);
    }

    fn is_broken(&self, message_id: u64) -> bool {
        self.broken.lock().unwrap().contains(&message_id)
    }

    fn edit_count(&self) -> usize {
        self.edits.lock().unwrap().len()
    }

    fn last_edit(&self) -> Option<PollView> {
        self.edits.lock().unwrap().last().map(|(_, view)| view.clone())
    }
}

#[async_trait]
impl ChatGateway for MockGateway {
    async fn post_poll(&self, channel_id: u64, view: &PollView) -> Result<MessageRef, AppError> {
        let message_id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1000;
        self.posts.lock().unwrap().push((channel_id, view.clone()));
        Ok(MessageRef {
            channel_id,
            message_id,
        })
    }

    async fn edit_poll(&self, message: MessageRef, view: &PollView) -> Result<(), AppError> {
        if self.is_broken(message.message_id) {
            return Err(AppError::InternalError("Unknown Message".to_string()));
        }
        self.edits.lock().unwrap().push((message, view.clone()));
        Ok(())
    }

    async fn delete_message(&self, message: MessageRef) -> Result<(), AppError> {
        if self.is_broken(message.message_id) {
            return Err(AppError::InternalError("Unknown Message".to_string()));
        }
        self.deletes.lock().unwrap().push(message);
        Ok(())
    }

    async fn message_exists(&self, message: MessageRef) -> Result<bool, AppError> {
        Ok(!self.is_broken(message.message_id))
    }

    async fn guild_member_ids(&self, _guild_id: u64) -> Result<Vec<u64>, AppError> {
        Ok(self.members.clone())
    }
}

fn utc8() -> FixedOffset {
    FixedOffset::east_opt(8 * 3600).unwrap()
}

async fn store() -> KvStore {
    let test = TestBuilder::new().with_kv_tables().build().await.unwrap();
    KvStore::database(test.db.unwrap())
}

fn service<'a>(store: &'a KvStore, gateway: &Arc<MockGateway>) -> PollService<'a> {
    PollService::new(store, gateway.clone(), utc8())
}

fn create_params(title: &str, options: &str) -> CreatePollParams {
    CreatePollParams {
        guild_id: GUILD,
        channel_id: CHANNEL,
        title: title.to_string(),
        options: options.to_string(),
        close_date: None,
        max_selections: 1,
        show_voters: false,
    }
}

/// A close date string `hours` from now in the service timezone.
fn date_in(hours: i64) -> String {
    (Utc::now() + Duration::hours(hours))
        .with_timezone(&utc8())
        .format(DATETIME_FORMAT)
        .to_string()
}

async fn stored(store: &KvStore, title: &str) -> Option<Poll> {
    PollRepository::new(store).get(GUILD, title).await.unwrap()
}
