use crate::{
    data::{kv::KvStore, poll::PollRepository},
    error::AppError,
    model::poll::{MessageRef, Poll},
};
use test_utils::builder::TestBuilder;

mod find_by_message;
mod keys;

async fn store() -> KvStore {
    let test = TestBuilder::new().with_kv_tables().build().await.unwrap();
    KvStore::database(test.db.unwrap())
}

fn poll_with_message(message_id: u64) -> Poll {
    let mut poll = Poll::new(vec!["A".to_string(), "B".to_string()], None, 1, false).unwrap();
    poll.track(MessageRef {
        channel_id: 100,
        message_id,
    });
    poll
}
