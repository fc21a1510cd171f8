//! Property tests for pure helpers and frame parsing

use proptest::prelude::*;
use uuid::Uuid;

use socialhub::backend::messaging::{direct_room_id, parse_direct_room_id};
use socialhub::backend::realtime::BroadcastHub;
use socialhub::shared::{ClientEvent, ServerEvent, UserStatus};

fn uuid_strategy() -> impl Strategy<Value = Uuid> {
    any::<u128>().prop_map(Uuid::from_u128)
}

proptest! {
    #[test]
    fn parse_never_panics(frame in ".{0,200}") {
        let _ = ClientEvent::parse(&frame);
    }

    #[test]
    fn direct_room_id_is_symmetric(a in uuid_strategy(), b in uuid_strategy()) {
        let room = direct_room_id(a, b);
        prop_assert_eq!(&room, &direct_room_id(b, a));

        let (lo, hi) = parse_direct_room_id(&room).unwrap();
        prop_assert!(lo.to_string() <= hi.to_string());
        let mut expected = [a, b];
        expected.sort_by_key(|id| id.to_string());
        prop_assert_eq!([lo, hi], expected);
    }

    #[test]
    fn plain_room_names_are_not_direct(name in "[a-z][a-z0-9 _]{0,40}") {
        prop_assert!(parse_direct_room_id(&name).is_none());
    }

    #[test]
    fn only_known_statuses_parse(value in "[a-z]{1,10}") {
        let parsed = value.parse::<UserStatus>();
        match value.as_str() {
            "online" => prop_assert_eq!(parsed.unwrap(), UserStatus::Online),
            "offline" => prop_assert_eq!(parsed.unwrap(), UserStatus::Offline),
            _ => prop_assert!(parsed.is_err()),
        }
    }

    #[test]
    fn join_room_payload_is_preserved(room in "[a-zA-Z0-9 _-]{1,60}") {
        let frame = serde_json::json!({ "event": "join-room", "data": room }).to_string();
        prop_assert_eq!(ClientEvent::parse(&frame).unwrap(), ClientEvent::JoinRoom(room));
    }

    #[test]
    fn broadcast_reaches_each_session_once(key_count in 1usize..6, session_count in 0usize..6) {
        let hub = BroadcastHub::new();
        let keys: Vec<String> = (0..key_count).map(|i| format!("room-{}", i)).collect();

        let mut receivers = Vec::new();
        for _ in 0..session_count {
            let (id, rx) = hub.register();
            for key in &keys {
                hub.join(id, key);
            }
            receivers.push(rx);
        }

        let reached = hub.broadcast_many(&keys, ServerEvent::error("ping"));
        prop_assert_eq!(reached, session_count);

        for rx in receivers.iter_mut() {
            prop_assert!(rx.try_recv().is_ok());
            prop_assert!(rx.try_recv().is_err());
        }
    }
}
