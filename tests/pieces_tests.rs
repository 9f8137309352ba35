//! Pieces module tests - rotation tables, spawn placement, piece sources

use std::collections::HashSet;

use tetris_duel::core::{
    next_rotation, rotation_count, rotations, shape, spawn_x, PieceGenerator, PieceSource,
    SequenceSource, SevenBag, SimpleRng,
};
use tetris_duel::types::PieceKind;

// ============== Shape Tests ==============

#[test]
fn test_rotation_state_counts() {
    let counts: Vec<u8> = PieceKind::ALL.iter().map(|&k| rotation_count(k)).collect();
    // I, O, T, S, Z, J, L
    assert_eq!(counts, vec![2, 1, 4, 2, 2, 4, 4]);
}

#[test]
fn test_every_state_has_four_distinct_minos_in_its_box() {
    for kind in PieceKind::ALL {
        for s in rotations(kind) {
            let unique: HashSet<_> = s.cells.iter().collect();
            assert_eq!(unique.len(), 4, "{:?}", kind);
            for &(dx, dy) in s.cells.iter() {
                assert!(dx >= 0 && (dx as u8) < s.width, "{:?}", kind);
                assert!(dy >= 0 && (dy as u8) < s.height, "{:?}", kind);
            }
        }
    }
}

#[test]
fn test_i_states() {
    assert_eq!(shape(PieceKind::I, 0).cells, [(0, 1), (1, 1), (2, 1), (3, 1)]);
    assert_eq!(shape(PieceKind::I, 1).cells, [(2, 0), (2, 1), (2, 2), (2, 3)]);
}

#[test]
fn test_o_matrix() {
    assert_eq!(
        shape(PieceKind::O, 0).matrix(2),
        vec![vec![2, 2], vec![2, 2]]
    );
}

#[test]
fn test_t_matrix() {
    assert_eq!(
        shape(PieceKind::T, 0).matrix(3),
        vec![vec![0, 3, 0], vec![3, 3, 3], vec![0, 0, 0]]
    );
}

#[test]
fn test_rotating_table_length_times_returns_to_start() {
    for kind in PieceKind::ALL {
        for start in 0..rotation_count(kind) {
            let mut r = start;
            for _ in 0..rotation_count(kind) {
                r = next_rotation(kind, r);
            }
            assert_eq!(r, start, "{:?}", kind);
        }
    }
}

#[test]
fn test_shape_index_wraps() {
    assert_eq!(shape(PieceKind::S, 2), shape(PieceKind::S, 0));
    assert_eq!(shape(PieceKind::O, 3), shape(PieceKind::O, 0));
}

#[test]
fn test_spawn_columns_center_the_box() {
    assert_eq!(spawn_x(PieceKind::I), 3);
    assert_eq!(spawn_x(PieceKind::O), 4);
    for kind in [PieceKind::T, PieceKind::S, PieceKind::Z, PieceKind::J, PieceKind::L] {
        assert_eq!(spawn_x(kind), 3, "{:?}", kind);
    }
}

// ============== Piece Sources ==============

#[test]
fn test_seeded_rng_replays() {
    let mut a = SimpleRng::new(1234);
    let mut b = SimpleRng::new(1234);
    let xs: Vec<_> = (0..32).map(|_| a.next_kind()).collect();
    let ys: Vec<_> = (0..32).map(|_| b.next_kind()).collect();
    assert_eq!(xs, ys);
}

#[test]
fn test_uniform_source_reaches_every_kind() {
    let mut rng = SimpleRng::new(7);
    let seen: HashSet<_> = (0..500).map(|_| rng.next_kind()).collect();
    assert_eq!(seen.len(), 7);
}

#[test]
fn test_seven_bag_deals_each_kind_once_per_bag() {
    let mut bag = SevenBag::new(5);
    for _ in 0..4 {
        let mut dealt: Vec<_> = (0..7).map(|_| bag.next_kind()).collect();
        dealt.sort();
        assert_eq!(dealt, PieceKind::ALL.to_vec());
    }
}

#[test]
fn test_generator_yields_spawn_ready_pieces() {
    let mut gen = PieceGenerator::new(Box::new(SequenceSource::new(vec![PieceKind::J, PieceKind::Z])));
    let j = gen.next();
    assert_eq!(j.kind, PieceKind::J);
    assert_eq!(j.rotation, 0);
    assert_eq!(j.color_id, 6);
    assert_eq!(j.shape, shape(PieceKind::J, 0));
    assert_eq!(gen.next().kind, PieceKind::Z);
    assert_eq!(gen.next().kind, PieceKind::J);
}
