// Integration tests (native) for the `shadow-match` crate.
// These tests avoid wasm-specific functionality and exercise the pure game
// logic (tile factory, match engine, session state machine) so they can run
// under `cargo test` on the host.

use std::collections::HashMap;

use shadow_match::game::{
    find_match, generate_tiles, nearby_candidates, shuffle, BoardBounds, Difficulty, GameConfig,
    GameEvent, GameSession, Phase, Point, Prng, Tile, TileId,
};

const EDGE_INSET: f64 = 20.0;

fn bounds() -> BoardBounds {
    BoardBounds::new(800.0, 520.0, 90.0)
}

fn session() -> GameSession {
    GameSession::new(GameConfig::default(), bounds())
}

fn tile(id: u32, group: u16, x: f64, y: f64) -> Tile {
    Tile::new(TileId(id), group, group as usize, Point::new(x, y))
}

// --- Tile factory -------------------------------------------------------------

#[test]
fn factory_creates_two_tiles_per_pair_for_every_difficulty() {
    let roster_len = 4;
    for difficulty in Difficulty::ALL {
        let mut rng = Prng::new(7);
        let tiles = generate_tiles(difficulty.pairs(), roster_len, bounds(), EDGE_INSET, &mut rng);
        assert_eq!(tiles.len(), 2 * difficulty.pairs());

        let mut per_group: HashMap<u16, usize> = HashMap::new();
        for t in &tiles {
            *per_group.entry(t.group).or_default() += 1;
            assert_eq!(
                t.character,
                t.group as usize % roster_len,
                "roster assignment must cycle"
            );
            assert!(!t.matched);
        }
        assert_eq!(per_group.len(), difficulty.pairs());
        for (group, count) in per_group {
            assert_eq!(count, 2, "group {group} should appear exactly twice");
        }
    }
}

#[test]
fn factory_positions_stay_inside_the_inset_board() {
    let b = bounds();
    let mut rng = Prng::new(42);
    let tiles = generate_tiles(12, 4, b, EDGE_INSET, &mut rng);
    for t in &tiles {
        assert!(b.contains(t.pos), "tile {:?} out of bounds at {:?}", t.id, t.pos);
        assert!(t.pos.x >= EDGE_INSET && t.pos.x <= b.width - b.tile_size - EDGE_INSET);
        assert!(t.pos.y >= EDGE_INSET && t.pos.y <= b.height - b.tile_size - EDGE_INSET);
    }
}

#[test]
fn shuffle_preserves_the_identity_multiset() {
    let original: Vec<u32> = (0..100).collect();
    let mut shuffled = original.clone();
    let mut rng = Prng::new(1234);
    shuffle(&mut shuffled, &mut rng);
    let mut sorted = shuffled.clone();
    sorted.sort_unstable();
    assert_eq!(sorted, original);
}

// --- Geometry -----------------------------------------------------------------

#[test]
fn distance_is_symmetric_and_zero_only_at_equal_points() {
    let a = Point::new(3.0, 4.0);
    let b = Point::new(0.0, 0.0);
    assert_eq!(a.distance(b), 5.0);
    assert_eq!(b.distance(a), a.distance(b));
    assert_eq!(a.distance(a), 0.0);
    assert!(a.distance(Point::new(3.0, 4.1)) > 0.0);
}

#[test]
fn clamping_keeps_a_tile_origin_inside_the_board() {
    let b = bounds();
    let clamped = b.clamp(Point::new(10_000.0, -50.0));
    assert_eq!(clamped, Point::new(710.0, 0.0));
    assert!(b.contains(clamped));
}

// --- Match engine -------------------------------------------------------------

#[test]
fn no_match_across_groups_even_at_zero_distance() {
    let tiles = vec![
        tile(0, 0, 100.0, 100.0),
        tile(1, 1, 100.0, 100.0), // same spot, different pair
        tile(2, 0, 500.0, 400.0), // partner, far away
    ];
    assert_eq!(
        find_match(&tiles, TileId(0), Point::new(100.0, 100.0), 60.0),
        None
    );
}

#[test]
fn match_declared_within_threshold_only() {
    let tiles = vec![tile(0, 0, 100.0, 100.0), tile(1, 0, 140.0, 100.0)];
    assert_eq!(
        find_match(&tiles, TileId(0), Point::new(100.0, 100.0), 60.0),
        Some(TileId(1))
    );
    // 61 px apart: just outside
    let tiles = vec![tile(0, 0, 100.0, 100.0), tile(1, 0, 161.0, 100.0)];
    assert_eq!(
        find_match(&tiles, TileId(0), Point::new(100.0, 100.0), 60.0),
        None
    );
}

#[test]
fn nearest_candidate_wins_with_id_tiebreak() {
    // Three tiles of one group only arise outside the factory, but the engine
    // itself is pure over whatever slice it is handed.
    let tiles = vec![
        tile(0, 0, 0.0, 0.0),
        tile(1, 0, 50.0, 0.0),
        tile(2, 0, 30.0, 0.0),
    ];
    assert_eq!(
        find_match(&tiles, TileId(0), Point::new(0.0, 0.0), 60.0),
        Some(TileId(2))
    );
    // Exact distance tie: lower id is deterministic winner.
    let tiles = vec![
        tile(0, 0, 0.0, 0.0),
        tile(1, 0, 30.0, 0.0),
        tile(2, 0, -30.0, 0.0),
    ];
    assert_eq!(
        find_match(&tiles, TileId(0), Point::new(0.0, 0.0), 60.0),
        Some(TileId(1))
    );
}

#[test]
fn matched_tiles_are_invisible_to_match_and_highlight_scans() {
    let mut tiles = vec![tile(0, 0, 100.0, 100.0), tile(1, 0, 110.0, 100.0)];
    tiles[1].matched = true;
    assert_eq!(
        find_match(&tiles, TileId(0), Point::new(100.0, 100.0), 60.0),
        None
    );
    assert!(nearby_candidates(&tiles, TileId(0), Point::new(100.0, 100.0), 60.0).is_empty());
}

#[test]
fn highlight_scan_reports_same_group_neighbours() {
    let tiles = vec![
        tile(0, 0, 100.0, 100.0),
        tile(1, 0, 120.0, 100.0),
        tile(2, 1, 120.0, 110.0),
    ];
    let hits = nearby_candidates(&tiles, TileId(0), Point::new(100.0, 100.0), 60.0);
    assert_eq!(hits, vec![TileId(1)]);
}

// --- Session state machine ----------------------------------------------------

#[test]
fn start_while_playing_is_a_noop() {
    let mut s = session();
    let mut rng = Prng::new(9);
    let events = s.start(Difficulty::Easy, 4, 0.0, &mut rng);
    assert_eq!(events.len(), 1);
    assert_eq!(s.phase(), Phase::Playing);
    let tile_count = s.tiles().len();

    let again = s.start(Difficulty::Hard, 4, 5_000.0, &mut rng);
    assert!(again.is_empty());
    assert_eq!(s.phase(), Phase::Playing);
    assert_eq!(s.difficulty(), Difficulty::Easy);
    assert_eq!(s.tiles().len(), tile_count);
}

#[test]
fn restart_zeroes_score_and_matches_and_clears_the_board() {
    let mut s = session();
    let board = vec![
        tile(0, 0, 100.0, 100.0),
        tile(1, 0, 400.0, 300.0),
        tile(2, 1, 200.0, 100.0),
        tile(3, 1, 600.0, 400.0),
    ];
    s.start_with_board(Difficulty::Medium, board, 0.0);
    assert!(s.begin_drag(TileId(0)));
    s.drag_to(Point::new(390.0, 300.0));
    let events = s.end_drag(5_000.0);
    assert!(matches!(events[0], GameEvent::MatchFound { .. }));
    assert_eq!(s.matched_pairs(), 1);
    assert!(s.score() > 0);

    let events = s.reset();
    assert_eq!(events, vec![GameEvent::Reset]);
    assert_eq!(s.phase(), Phase::NotStarted);
    assert_eq!(s.score(), 0);
    assert_eq!(s.matched_pairs(), 0);
    assert_eq!(s.total_pairs(), 0);
    assert!(s.tiles().is_empty());
}

#[test]
fn drag_requires_playing_phase_and_unmatched_tile() {
    let mut s = session();
    assert!(!s.begin_drag(TileId(0)), "no drag before start");

    s.start_with_board(
        Difficulty::Medium,
        vec![tile(0, 0, 100.0, 100.0), tile(1, 0, 120.0, 100.0)],
        0.0,
    );
    assert!(s.begin_drag(TileId(0)));
    assert!(!s.begin_drag(TileId(1)), "one drag at a time");
    let _ = s.end_drag(1_000.0);

    // Both tiles matched by that release; neither can drag again.
    assert!(!s.begin_drag(TileId(0)));
    assert!(!s.begin_drag(TileId(1)));
}

#[test]
fn dragging_past_the_right_edge_clamps_to_the_board() {
    let mut s = session();
    s.start_with_board(
        Difficulty::Medium,
        vec![tile(0, 0, 100.0, 100.0), tile(1, 0, 700.0, 100.0)],
        0.0,
    );
    assert!(s.begin_drag(TileId(0)));
    s.drag_to(Point::new(99_999.0, 99_999.0));
    let pos = s.tile(TileId(0)).unwrap().pos;
    assert_eq!(pos, Point::new(710.0, 430.0)); // width - tile, height - tile
}

#[test]
fn pause_blocks_drag_and_resumes_cleanly() {
    let mut s = session();
    s.start_with_board(
        Difficulty::Medium,
        vec![tile(0, 0, 100.0, 100.0), tile(1, 0, 600.0, 100.0)],
        0.0,
    );
    assert_eq!(
        s.toggle_pause(),
        Some(GameEvent::PauseToggled { paused: true })
    );
    assert_eq!(s.phase(), Phase::Paused);
    assert!(!s.begin_drag(TileId(0)));
    assert_eq!(s.tick(1_000.0), None);

    assert_eq!(
        s.toggle_pause(),
        Some(GameEvent::PauseToggled { paused: false })
    );
    assert_eq!(s.phase(), Phase::Playing);
    assert!(s.begin_drag(TileId(0)));
}

#[test]
fn pause_toggle_outside_playing_or_paused_is_ignored() {
    let mut s = session();
    assert_eq!(s.toggle_pause(), None);
    s.start_with_board(
        Difficulty::Medium,
        vec![tile(0, 0, 100.0, 100.0), tile(1, 0, 110.0, 100.0)],
        0.0,
    );
    s.begin_drag(TileId(0));
    let _ = s.end_drag(1_000.0); // completes the single-pair board
    assert_eq!(s.phase(), Phase::Ended);
    assert_eq!(s.toggle_pause(), None);
}

#[test]
fn release_without_a_partner_in_range_matches_nothing() {
    let mut s = session();
    s.start_with_board(
        Difficulty::Medium,
        vec![
            tile(0, 0, 100.0, 100.0),
            tile(1, 0, 700.0, 400.0),
            tile(2, 1, 110.0, 100.0),
            tile(3, 1, 600.0, 100.0),
        ],
        0.0,
    );
    assert!(s.begin_drag(TileId(0)));
    s.drag_to(Point::new(130.0, 100.0)); // near tile 2, wrong group
    let events = s.end_drag(1_000.0);
    assert!(events.is_empty());
    assert_eq!(s.matched_pairs(), 0);
    assert_eq!(s.dragging(), None);
}

#[test]
fn matched_flags_are_write_once_for_the_session() {
    let mut s = session();
    s.start_with_board(
        Difficulty::Medium,
        vec![
            tile(0, 0, 100.0, 100.0),
            tile(1, 0, 120.0, 100.0),
            tile(2, 1, 300.0, 300.0),
            tile(3, 1, 650.0, 400.0),
        ],
        0.0,
    );
    s.begin_drag(TileId(0));
    let _ = s.end_drag(1_000.0);
    assert!(s.tile(TileId(0)).unwrap().matched);
    assert!(s.tile(TileId(1)).unwrap().matched);

    // Park an unmatched tile of another group on top of a matched tile:
    // nothing changes for the matched pair.
    s.begin_drag(TileId(2));
    s.drag_to(Point::new(100.0, 100.0));
    let events = s.end_drag(2_000.0);
    assert!(events.is_empty());
    assert!(s.tile(TileId(0)).unwrap().matched);
    assert!(s.tile(TileId(1)).unwrap().matched);
    assert_eq!(s.matched_pairs(), 1);
}

#[test]
fn completion_ends_the_session_and_reentry_passes_through_reset() {
    let mut s = session();
    s.start_with_board(
        Difficulty::Medium,
        vec![tile(0, 0, 100.0, 100.0), tile(1, 0, 400.0, 300.0)],
        0.0,
    );
    s.begin_drag(TileId(0));
    s.drag_to(Point::new(390.0, 300.0));
    let events = s.end_drag(60_000.0);
    assert!(matches!(events[0], GameEvent::MatchFound { .. }));
    assert!(matches!(events[1], GameEvent::Completed { .. }));
    assert_eq!(s.phase(), Phase::Ended);

    let events = s.start_with_board(
        Difficulty::Easy,
        vec![tile(0, 0, 50.0, 50.0), tile(1, 0, 600.0, 50.0)],
        120_000.0,
    );
    assert_eq!(events.len(), 2, "Ended start re-enters via reset");
    assert!(matches!(events[0], GameEvent::Reset));
    assert!(matches!(events[1], GameEvent::Started { .. }));
    assert_eq!(s.phase(), Phase::Playing);
    assert_eq!(s.score(), 0);
    assert_eq!(s.matched_pairs(), 0);
}

#[test]
fn resize_pulls_unmatched_tiles_back_inside() {
    let mut s = session();
    s.start_with_board(
        Difficulty::Medium,
        vec![tile(0, 0, 700.0, 400.0), tile(1, 0, 100.0, 100.0)],
        0.0,
    );
    s.set_bounds(BoardBounds::new(400.0, 300.0, 90.0));
    let pos = s.tile(TileId(0)).unwrap().pos;
    assert_eq!(pos, Point::new(310.0, 210.0));
    assert!(s.bounds().contains(s.tile(TileId(1)).unwrap().pos));
}
