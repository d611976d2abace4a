//! Tile records, the tile factory and the pure match engine.

use super::geometry::{BoardBounds, Point};
use super::rng::Prng;

/// Stable identity of a tile within one session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TileId(pub u32);

/// One draggable tile. `group` is the pair key: exactly two tiles share each
/// group id. `character` indexes the roster entry whose image the tile shows;
/// it repeats when the pair count exceeds the roster size, so it is display
/// data only and never participates in matching.
#[derive(Clone, Debug)]
pub struct Tile {
    pub id: TileId,
    pub group: u16,
    pub character: usize,
    pub pos: Point,
    pub matched: bool,
}

impl Tile {
    pub fn new(id: TileId, group: u16, character: usize, pos: Point) -> Self {
        Self {
            id,
            group,
            character,
            pos,
            matched: false,
        }
    }
}

// --- Factory ------------------------------------------------------------------

/// Fisher–Yates (Knuth) shuffle: for i from the last index down to 1, swap
/// with a uniform index in [0, i].
pub fn shuffle<T>(items: &mut [T], rng: &mut Prng) {
    for i in (1..items.len()).rev() {
        let j = rng.gen_index(i + 1);
        items.swap(i, j);
    }
}

/// Build `2 * pairs` tiles, shuffled, each at a uniform-random position inside
/// `bounds` (inset from the edges; overlap between tiles is permitted).
pub fn generate_tiles(
    pairs: usize,
    roster_len: usize,
    bounds: BoardBounds,
    edge_inset: f64,
    rng: &mut Prng,
) -> Vec<Tile> {
    debug_assert!(roster_len > 0);
    let mut slots: Vec<(u16, usize)> = Vec::with_capacity(pairs * 2);
    for pair in 0..pairs {
        let character = pair % roster_len;
        slots.push((pair as u16, character));
        slots.push((pair as u16, character));
    }
    shuffle(&mut slots, rng);

    let span_x = (bounds.width - bounds.tile_size - 2.0 * edge_inset).max(0.0);
    let span_y = (bounds.height - bounds.tile_size - 2.0 * edge_inset).max(0.0);
    slots
        .into_iter()
        .enumerate()
        .map(|(i, (group, character))| {
            let pos = Point::new(
                edge_inset + rng.gen_f64() * span_x,
                edge_inset + rng.gen_f64() * span_y,
            );
            Tile::new(TileId(i as u32), group, character, bounds.clamp(pos))
        })
        .collect()
}

// --- Match engine -------------------------------------------------------------

/// Unmatched same-group tiles within `threshold` of `pos`, excluding `dragged`.
/// Used for the transient highlight while a drag is in progress.
pub fn nearby_candidates(
    tiles: &[Tile],
    dragged: TileId,
    pos: Point,
    threshold: f64,
) -> Vec<TileId> {
    let Some(group) = tiles.iter().find(|t| t.id == dragged).map(|t| t.group) else {
        return Vec::new();
    };
    tiles
        .iter()
        .filter(|t| t.id != dragged && !t.matched && t.group == group)
        .filter(|t| t.pos.distance(pos) <= threshold)
        .map(|t| t.id)
        .collect()
}

/// Match decision for a tile released at `pos`: the nearest unmatched
/// same-group tile within `threshold`, ties broken by lower id so the result
/// is deterministic. Tiles of other groups never match, whatever the distance.
pub fn find_match(tiles: &[Tile], dragged: TileId, pos: Point, threshold: f64) -> Option<TileId> {
    let group = tiles.iter().find(|t| t.id == dragged).map(|t| t.group)?;
    tiles
        .iter()
        .filter(|t| t.id != dragged && !t.matched && t.group == group)
        .map(|t| (t.pos.distance(pos), t.id))
        .filter(|(d, _)| *d <= threshold)
        .min_by(|(da, ia), (db, ib)| da.total_cmp(db).then(ia.cmp(ib)))
        .map(|(_, id)| id)
}
