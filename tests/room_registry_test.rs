//! Room registry integration tests
//!
//! Membership, invites and creator-only administration against a real
//! SQLite database.

#[macro_use]
mod common;

use std::sync::Arc;

use assert_matches::assert_matches;
use uuid::Uuid;

use common::{create_test_user, TestDatabase};
use socialhub::backend::error::BackendError;
use socialhub::backend::rooms::RoomRegistry;
use socialhub::shared::room::RoomState;

fn registry(db: &TestDatabase) -> RoomRegistry {
    RoomRegistry::new(db.pool().clone(), Arc::new(db.config().clone()))
}

#[tokio::test]
async fn test_create_room_makes_creator_only_member() {
    let db = TestDatabase::new().await;
    let alice = create_test_user(db.pool(), db.config(), "alice").await;
    let rooms = registry(&db);

    let room = assert_ok!(rooms.create_room("  Book club  ", alice.id, None).await);

    assert_eq!(room.name, "Book club");
    assert_eq!(room.creator_id, alice.id);
    assert_eq!(room.members, vec![alice.id]);
    assert!(!room.has_password);
    assert_eq!(room.state, RoomState::Open);
}

#[tokio::test]
async fn test_create_room_rejects_blank_name() {
    let db = TestDatabase::new().await;
    let alice = create_test_user(db.pool(), db.config(), "alice").await;

    assert_err!(
        registry(&db).create_room("   ", alice.id, None).await,
        BackendError::InvalidInput { .. }
    );
}

#[tokio::test]
async fn test_create_room_unknown_creator() {
    let db = TestDatabase::new().await;

    assert_err!(
        registry(&db).create_room("Ghosts", Uuid::new_v4(), None).await,
        BackendError::NotFound { .. }
    );
}

#[tokio::test]
async fn test_invite_and_join_is_idempotent() {
    let db = TestDatabase::new().await;
    let alice = create_test_user(db.pool(), db.config(), "alice").await;
    let bob = create_test_user(db.pool(), db.config(), "bob").await;
    let rooms = registry(&db);

    let room = rooms.create_room("Lobby", alice.id, None).await.unwrap();
    let invite = assert_ok!(rooms.generate_invite(room.id, alice.id).await);

    assert_eq!(invite.token.len(), 40);
    assert_eq!(
        invite.invite_link,
        format!("http://localhost:3000/join/{}", invite.token)
    );

    let joined = assert_ok!(rooms.join_room(&invite.token, bob.id, None).await);
    assert_eq!(joined.members, vec![alice.id, bob.id]);
    assert_eq!(joined.state, RoomState::Invitable);

    let again = assert_ok!(rooms.join_room(&invite.token, bob.id, None).await);
    assert_eq!(again.members.len(), 2);
}

#[tokio::test]
async fn test_new_invite_replaces_old_token() {
    let db = TestDatabase::new().await;
    let alice = create_test_user(db.pool(), db.config(), "alice").await;
    let bob = create_test_user(db.pool(), db.config(), "bob").await;
    let rooms = registry(&db);

    let room = rooms.create_room("Lobby", alice.id, None).await.unwrap();
    let first = rooms.generate_invite(room.id, alice.id).await.unwrap();
    let second = rooms.generate_invite(room.id, alice.id).await.unwrap();
    assert_ne!(first.token, second.token);

    assert_err!(
        rooms.join_room(&first.token, bob.id, None).await,
        BackendError::NotFound { .. }
    );
    assert_ok!(rooms.join_room(&second.token, bob.id, None).await);
}

#[tokio::test]
async fn test_outsider_cannot_mint_invite() {
    let db = TestDatabase::new().await;
    let alice = create_test_user(db.pool(), db.config(), "alice").await;
    let mallory = create_test_user(db.pool(), db.config(), "mallory").await;
    let rooms = registry(&db);

    let room = rooms.create_room("Lobby", alice.id, None).await.unwrap();

    assert_err!(
        rooms.generate_invite(room.id, mallory.id).await,
        BackendError::Forbidden { .. }
    );
}

#[tokio::test]
async fn test_password_protected_join() {
    let db = TestDatabase::new().await;
    let alice = create_test_user(db.pool(), db.config(), "alice").await;
    let bob = create_test_user(db.pool(), db.config(), "bob").await;
    let rooms = registry(&db);

    let room = rooms.create_room("Vault", alice.id, Some("hunter2")).await.unwrap();
    assert!(room.has_password);
    let invite = rooms.generate_invite(room.id, alice.id).await.unwrap();

    assert_err!(
        rooms.join_room(&invite.token, bob.id, None).await,
        BackendError::BadCredentials { .. }
    );
    assert_err!(
        rooms.join_room(&invite.token, bob.id, Some("wrong")).await,
        BackendError::BadCredentials { .. }
    );

    let joined = assert_ok!(rooms.join_room(&invite.token, bob.id, Some("hunter2")).await);
    assert!(joined.is_member(bob.id));
}

#[tokio::test]
async fn test_update_room_password_rules() {
    let db = TestDatabase::new().await;
    let alice = create_test_user(db.pool(), db.config(), "alice").await;
    let rooms = registry(&db);

    let room = rooms.create_room("Vault", alice.id, Some("secret")).await.unwrap();

    let renamed = assert_ok!(rooms.update_room(room.id, alice.id, Some("Safe"), None).await);
    assert_eq!(renamed.name, "Safe");
    assert!(renamed.has_password);

    let opened = assert_ok!(rooms.update_room(room.id, alice.id, None, Some("")).await);
    assert!(!opened.has_password);
    assert_eq!(opened.name, "Safe");
}

#[tokio::test]
async fn test_only_creator_administers() {
    let db = TestDatabase::new().await;
    let alice = create_test_user(db.pool(), db.config(), "alice").await;
    let bob = create_test_user(db.pool(), db.config(), "bob").await;
    let rooms = registry(&db);

    let room = rooms.create_room("Lobby", alice.id, None).await.unwrap();
    rooms.add_member(room.id, alice.id, bob.id).await.unwrap();

    assert_err!(
        rooms.update_room(room.id, bob.id, Some("Mine"), None).await,
        BackendError::Forbidden { .. }
    );
    assert_err!(rooms.delete_room(room.id, bob.id).await, BackendError::Forbidden { .. });
    assert_err!(
        rooms.remove_member(room.id, bob.id, alice.id).await,
        BackendError::Forbidden { .. }
    );
}

#[tokio::test]
async fn test_remove_member_edge_cases() {
    let db = TestDatabase::new().await;
    let alice = create_test_user(db.pool(), db.config(), "alice").await;
    let bob = create_test_user(db.pool(), db.config(), "bob").await;
    let rooms = registry(&db);

    let room = rooms.create_room("Lobby", alice.id, None).await.unwrap();

    assert_err!(
        rooms.remove_member(room.id, alice.id, alice.id).await,
        BackendError::InvalidInput { .. }
    );
    assert_err!(
        rooms.remove_member(room.id, alice.id, bob.id).await,
        BackendError::NotFound { .. }
    );

    rooms.add_member(room.id, alice.id, bob.id).await.unwrap();
    let after = assert_ok!(rooms.remove_member(room.id, alice.id, bob.id).await);
    assert_eq!(after.members, vec![alice.id]);
}

#[tokio::test]
async fn test_list_members_and_rooms() {
    let db = TestDatabase::new().await;
    let alice = create_test_user(db.pool(), db.config(), "alice").await;
    let bob = create_test_user(db.pool(), db.config(), "bob").await;
    let carol = create_test_user(db.pool(), db.config(), "carol").await;
    let rooms = registry(&db);

    let lobby = rooms.create_room("Lobby", alice.id, None).await.unwrap();
    rooms.create_room("Private", alice.id, None).await.unwrap();
    rooms.add_member(lobby.id, alice.id, bob.id).await.unwrap();

    let members = assert_ok!(rooms.list_members(lobby.id, bob.id).await);
    let names: Vec<_> = members.iter().map(|m| m.username.as_str()).collect();
    assert_eq!(names, vec!["alice", "bob"]);

    assert_err!(
        rooms.list_members(lobby.id, carol.id).await,
        BackendError::Forbidden { .. }
    );

    assert_eq!(rooms.list_rooms_for(alice.id).await.unwrap().len(), 2);
    assert_eq!(rooms.list_rooms_for(bob.id).await.unwrap().len(), 1);
    assert!(rooms.list_rooms_for(carol.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_delete_room() {
    let db = TestDatabase::new().await;
    let alice = create_test_user(db.pool(), db.config(), "alice").await;
    let rooms = registry(&db);

    let room = rooms.create_room("Temp", alice.id, None).await.unwrap();
    assert_ok!(rooms.delete_room(room.id, alice.id).await);

    assert_matches!(rooms.get_room(room.id).await, Err(BackendError::NotFound { .. }));
    assert!(rooms.list_rooms_for(alice.id).await.unwrap().is_empty());
}
