//! Message store integration tests

#[macro_use]
mod common;

use uuid::Uuid;

use common::{create_test_user, TestDatabase};
use socialhub::backend::error::BackendError;
use socialhub::backend::messaging::{direct_room_id, MessageStore};

#[tokio::test]
async fn test_first_append_creates_messenger() {
    let db = TestDatabase::new().await;
    let alice = create_test_user(db.pool(), db.config(), "alice").await;
    let store = MessageStore::new(db.pool().clone());

    let message = assert_ok!(store.append_message("lobby", Some(alice.id), Some("hello")).await);

    assert_eq!(message.room_id, "lobby");
    assert_eq!(message.seq, 1);
    assert_eq!(message.text.as_deref(), Some("hello"));
    assert_eq!(message.sender.map(|s| s.username), Some("alice".to_string()));

    let (messenger, created) = store.get_or_create_messenger("lobby").await.unwrap();
    assert!(!created);
    assert_eq!(messenger.room_id, "lobby");
}

#[tokio::test]
async fn test_get_or_create_messenger_is_stable() {
    let db = TestDatabase::new().await;
    let store = MessageStore::new(db.pool().clone());

    let (first, created) = store.get_or_create_messenger("games").await.unwrap();
    assert!(created);
    let (second, created) = store.get_or_create_messenger("games").await.unwrap();
    assert!(!created);
    assert_eq!(first.id, second.id);
}

#[tokio::test]
async fn test_history_is_ordered_and_monotonic() {
    let db = TestDatabase::new().await;
    let alice = create_test_user(db.pool(), db.config(), "alice").await;
    let bob = create_test_user(db.pool(), db.config(), "bob").await;
    let store = MessageStore::new(db.pool().clone());

    for (sender, text) in [(alice.id, "one"), (bob.id, "two"), (alice.id, "three")] {
        store.append_message("lobby", Some(sender), Some(text)).await.unwrap();
    }

    let history = store.get_history("lobby").await.unwrap();
    let texts: Vec<_> = history.iter().filter_map(|m| m.text.as_deref()).collect();
    assert_eq!(texts, vec!["one", "two", "three"]);

    let seqs: Vec<_> = history.iter().map(|m| m.seq).collect();
    assert_eq!(seqs, vec![1, 2, 3]);
    assert!(history.windows(2).all(|w| w[0].created_at <= w[1].created_at));
}

#[tokio::test]
async fn test_rooms_are_isolated() {
    let db = TestDatabase::new().await;
    let alice = create_test_user(db.pool(), db.config(), "alice").await;
    let store = MessageStore::new(db.pool().clone());

    store.append_message("a", Some(alice.id), Some("in a")).await.unwrap();
    let in_b = store.append_message("b", Some(alice.id), Some("in b")).await.unwrap();

    assert_eq!(in_b.seq, 1);
    assert_eq!(store.get_history("a").await.unwrap().len(), 1);
    assert_eq!(store.get_history("b").await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_concurrent_appends_get_distinct_sequences() {
    let db = TestDatabase::new().await;
    let alice = create_test_user(db.pool(), db.config(), "alice").await;
    let store = MessageStore::new(db.pool().clone());

    let mut handles = Vec::new();
    for i in 0..20 {
        let store = store.clone();
        let sender = alice.id;
        handles.push(tokio::spawn(async move {
            store
                .append_message("busy", Some(sender), Some(&format!("message {}", i)))
                .await
        }));
    }
    for handle in handles {
        assert_ok!(handle.await.unwrap());
    }

    let seqs: Vec<_> = store
        .get_history("busy")
        .await
        .unwrap()
        .iter()
        .map(|m| m.seq)
        .collect();
    assert_eq!(seqs, (1..=20).collect::<Vec<i64>>());
}

#[tokio::test]
async fn test_history_of_unknown_room_is_empty() {
    let db = TestDatabase::new().await;
    let store = MessageStore::new(db.pool().clone());

    assert!(store.get_history("nowhere").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_append_validation() {
    let db = TestDatabase::new().await;
    let alice = create_test_user(db.pool(), db.config(), "alice").await;
    let store = MessageStore::new(db.pool().clone());

    assert_err!(
        store.append_message("  ", Some(alice.id), Some("hi")).await,
        BackendError::InvalidInput { .. }
    );
    assert_err!(
        store.append_message("lobby", Some(alice.id), Some("   ")).await,
        BackendError::InvalidInput { .. }
    );
    assert_err!(
        store.append_message("lobby", None, None).await,
        BackendError::InvalidInput { .. }
    );
    assert_err!(
        store.append_message("lobby", Some(Uuid::new_v4()), Some("hi")).await,
        BackendError::NotFound { .. }
    );

    assert!(store.get_history("lobby").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_anonymous_and_textless_messages() {
    let db = TestDatabase::new().await;
    let alice = create_test_user(db.pool(), db.config(), "alice").await;
    let store = MessageStore::new(db.pool().clone());

    let anonymous = assert_ok!(store.append_message("lobby", None, Some("boo")).await);
    assert!(anonymous.sender.is_none());

    let nudge = assert_ok!(store.append_message("lobby", Some(alice.id), None).await);
    assert!(nudge.text.is_none());
    assert_eq!(nudge.seq, 2);
}

#[tokio::test]
async fn test_direct_conversations_are_listed_per_user() {
    let db = TestDatabase::new().await;
    let alice = create_test_user(db.pool(), db.config(), "alice").await;
    let bob = create_test_user(db.pool(), db.config(), "bob").await;
    let carol = create_test_user(db.pool(), db.config(), "carol").await;
    let store = MessageStore::new(db.pool().clone());

    let room = direct_room_id(alice.id, bob.id);
    store.append_message(&room, Some(alice.id), Some("hey bob")).await.unwrap();
    store.append_message("lobby", Some(carol.id), Some("hi all")).await.unwrap();

    let all = store.list_conversations().await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].messenger.room_id, room);

    let for_bob = store.list_conversations_for(bob.id).await.unwrap();
    assert_eq!(for_bob.len(), 1);
    let mut participants: Vec<_> = for_bob[0].participants.iter().map(|p| p.id).collect();
    participants.sort();
    let mut expected = vec![alice.id, bob.id];
    expected.sort();
    assert_eq!(participants, expected);

    assert!(store.list_conversations_for(carol.id).await.unwrap().is_empty());
}
