//! RoomRegistry tests - lookup, joining, cleanup

mod common;

use std::collections::HashSet;

use common::{services, RecordingSync, P1, P2, P3};

use tetris_duel::core::{
    GameError, JoinOutcome, ManualTicks, RoomRegistry, SessionStatus, SyncEvent,
};
use tetris_duel::types::{PieceKind, PlayerAction, PlayerId, RoomId};

fn registry(kinds: &[PieceKind]) -> (RoomRegistry, std::sync::Arc<RecordingSync>, ManualTicks) {
    let sync = RecordingSync::new();
    let ticks = ManualTicks::new();
    let registry = RoomRegistry::new(services(sync.clone(), &ticks, kinds));
    (registry, sync, ticks)
}

#[test]
fn test_create_gives_unique_waiting_rooms() {
    let (mut reg, _, _) = registry(&[PieceKind::T]);
    let ids: HashSet<RoomId> = (0..50).map(|_| reg.create()).collect();
    assert_eq!(ids.len(), 50);
    assert_eq!(reg.len(), 50);
    for id in &ids {
        let session = reg.get(id).unwrap();
        assert_eq!(session.status(), SessionStatus::Waiting);
        assert!(session.players().is_empty());
    }
}

#[test]
fn test_lookup_of_unknown_room() {
    let (mut reg, _, _) = registry(&[PieceKind::T]);
    let missing = RoomId::from("missing");
    assert!(reg.get(&missing).is_err());
    assert_eq!(reg.join(&missing, P1), Err(GameError::RoomNotFound));
    assert_eq!(
        reg.apply_input(&missing, P1, PlayerAction::Rotate),
        Err(GameError::RoomNotFound)
    );
    assert_eq!(reg.tick(&missing), Err(GameError::RoomNotFound));
}

#[test]
fn test_host_and_join_start_the_match() {
    let (mut reg, sync, ticks) = registry(&[PieceKind::T]);
    let room = reg.host(P1).unwrap();
    assert!(sync.is_empty());

    assert_eq!(reg.join(&room, P2), Ok(JoinOutcome::Started));
    assert_eq!(reg.get(&room).unwrap().status(), SessionStatus::Active);
    assert_eq!(ticks.running(), vec![room.clone()]);
    assert_eq!(reg.room_of(P2), Some(&room));

    assert_eq!(reg.join(&room, P3), Err(GameError::RoomFull));
    assert_eq!(reg.room_of(P3), None);
}

#[test]
fn test_duplicate_join_is_silent() {
    let (mut reg, sync, _) = registry(&[PieceKind::T]);
    let room = reg.host(P1).unwrap();
    reg.join(&room, P2).unwrap();
    sync.clear();

    assert_eq!(reg.join(&room, P1), Ok(JoinOutcome::AlreadyPresent));
    assert!(sync.is_empty());
}

#[test]
fn test_player_sits_in_one_room_at_a_time() {
    let (mut reg, _, _) = registry(&[PieceKind::T]);
    let first = reg.host(P1).unwrap();
    let second = reg.host(P2).unwrap();
    assert_eq!(
        reg.join(&second, P1),
        Err(GameError::AlreadyInRoom(first.clone()))
    );
    assert_eq!(reg.get(&second).unwrap().players(), vec![P2]);
}

#[test]
fn test_outsider_input_is_rejected_without_events() {
    let (mut reg, sync, _) = registry(&[PieceKind::T]);
    let room = reg.host(P1).unwrap();
    reg.join(&room, P2).unwrap();
    sync.clear();

    let result = reg.apply_input(&room, PlayerId(42), PlayerAction::HardDrop);
    assert!(matches!(result, Err(GameError::UnauthorizedAction { .. })));
    assert!(sync.is_empty());
}

#[test]
fn test_top_out_removes_room_and_frees_players() {
    let (mut reg, sync, ticks) = registry(&[PieceKind::O]);
    let room = reg.host(P1).unwrap();
    reg.join(&room, P2).unwrap();
    reg.get_mut(&room)
        .unwrap()
        .player_mut(P2)
        .unwrap()
        .board_mut()
        .set(5, 2, Some(PieceKind::I));
    sync.clear();

    assert_eq!(reg.tick(&room), Ok(SessionStatus::Ended));
    assert!(!reg.contains(&room));
    assert!(ticks.running().is_empty());
    assert_eq!(reg.room_of(P1), None);
    assert_eq!(reg.room_of(P2), None);

    // P1 moved down before P2 topped out, so P1 sees the loss, not a snapshot.
    assert_eq!(sync.names_for(P1), vec!["gameOver"]);
    assert_eq!(sync.names_for(P2), vec!["gameOver"]);

    // A tick already in flight finds nothing.
    assert_eq!(reg.tick(&room), Err(GameError::RoomNotFound));

    // Both players may play again.
    assert!(reg.host(P1).is_ok());
}

#[test]
fn test_disconnect_ends_room_and_notifies_once() {
    let (mut reg, sync, ticks) = registry(&[PieceKind::T]);
    let room = reg.host(P1).unwrap();
    reg.join(&room, P2).unwrap();
    sync.clear();

    assert_eq!(reg.disconnect(P2), Some(room.clone()));
    assert!(reg.is_empty());
    assert!(ticks.running().is_empty());
    assert_eq!(
        sync.take(),
        vec![(
            P1,
            SyncEvent::PlayerDisconnected {
                message: "Opponent has disconnected. Game over.".to_string()
            }
        )]
    );

    assert_eq!(reg.disconnect(P2), None);
    assert_eq!(reg.disconnect(P1), None);
    assert!(sync.is_empty());
}

#[test]
fn test_disconnect_while_waiting_drops_room() {
    let (mut reg, sync, ticks) = registry(&[PieceKind::T]);
    let room = reg.host(P1).unwrap();
    assert_eq!(reg.disconnect(P1), Some(room.clone()));
    assert!(!reg.contains(&room));
    assert!(ticks.started().is_empty());
    assert!(sync.is_empty());
}

#[test]
fn test_report_loss_removes_room() {
    let (mut reg, sync, _) = registry(&[PieceKind::T]);
    let room = reg.host(P1).unwrap();
    reg.join(&room, P2).unwrap();
    sync.clear();

    reg.report_loss(&room, P1).unwrap();
    assert!(!reg.contains(&room));
    assert_eq!(sync.count(P1, "gameOver"), 1);
    assert_eq!(sync.count(P2, "gameOver"), 1);
}
