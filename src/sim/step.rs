/// The movement resolution engine: resolves one directional command.
///
/// Processing order:
///   1. Locate the player (no player → no-op, nothing recorded)
///   2. Chain walk from the player along the direction of travel
///   3. Terminal rule at the first non-forwarding cell (or the edge)
///   4. Shift writes, far end first
///   5. Ice continuation for every entity that arrived on base ice
///   6. Snapshot for undo
///
/// Chain walk: starting at the origin, collect every cell whose
/// `respond_to` is `Forward`. The first cell that answers anything else
/// (or the board edge) decides what happens to the whole chain:
///
///   Edge     → nothing moves
///   Bounce   → nothing moves; the player turns, whoever hit the wall
///   Consume  → front entity + hole become Blank, nothing else moves
///   Accept   → whole chain advances one cell into the blank
///
/// Ice continuation is depth-first, far-most arrival first: an entity
/// that lands on ice is pushed again from where it landed, exactly as if
/// it had been the origin of a new chain. Every continuation moves an
/// entity strictly forward, so the work is bounded by board size.

use tracing::{debug, trace};

use crate::domain::cell::Cell;
use crate::domain::direction::Direction;
use crate::domain::grid::Pos;
use crate::domain::rules::Response;
use super::board::Board;
use super::event::MoveEvent;

// ══════════════════════════════════════════════════════════════
// Main entry point
// ══════════════════════════════════════════════════════════════

pub fn apply_move(board: &mut Board, dir: Direction) -> Vec<MoveEvent> {
    let Some(player) = board.player_position() else {
        trace!(%dir, "move ignored: no player on the board");
        return vec![];
    };

    let mut events: Vec<MoveEvent> = Vec::new();
    resolve_push(board, player, dir, &mut events);
    board.record_snapshot();

    debug!(%dir, recorded = board.moves_recorded(), ?events, "move resolved");
    trace!(layout = %board.dynamic().describe(), "dynamic layer after move");
    events
}

// ══════════════════════════════════════════════════════════════
// Push + ice continuation
// ══════════════════════════════════════════════════════════════

fn resolve_push(board: &mut Board, origin: Pos, dir: Direction, events: &mut Vec<MoveEvent>) {
    // (position, is ice continuation)
    let mut pending: Vec<(Pos, bool)> = vec![(origin, false)];

    while let Some((from, sliding)) = pending.pop() {
        let arrivals = resolve_chain(board, from, dir, sliding, events);
        // arrivals are near → far; the stack pops far-most first
        for pos in arrivals {
            if board.base()[pos].is_ice() {
                pending.push((pos, true));
            }
        }
    }
}

/// Where the chain walk stopped.
enum Stop {
    Edge,
    At(Pos, Response),
}

/// Walk, classify, and apply one chain. Returns the cells entities
/// arrived on, nearest first.
fn resolve_chain(
    board: &mut Board,
    origin: Pos,
    dir: Direction,
    sliding: bool,
    events: &mut Vec<MoveEvent>,
) -> Vec<Pos> {
    let mut chain = vec![origin];
    let mut cursor = origin;

    let stop = loop {
        let Some(next) = board.dynamic().step(cursor, dir) else {
            break Stop::Edge;
        };
        let response = board.dynamic()[next].respond_to(dir);
        if response.terminates() {
            break Stop::At(next, response);
        }
        chain.push(next);
        cursor = next;
    };

    trace!(?origin, %dir, len = chain.len(), sliding, "chain walked");

    match stop {
        Stop::Edge => {
            events.push(MoveEvent::Blocked { from: origin });
            vec![]
        }
        Stop::At(wall, Response::Bounce(facing)) => {
            // whoever hit the wall, it is the player that turns
            let turned = board.player_position().map(|p| {
                board.set_dynamic(p.row, p.col, Cell::Player(facing));
                facing
            });
            events.push(MoveEvent::Bounced { wall, facing: turned });
            vec![]
        }
        Stop::At(hole, Response::Consume) => {
            let Some(&front) = chain.last() else { unreachable!("chain always holds its origin") };
            let cell = board.dynamic()[front];
            board.set_dynamic(hole.row, hole.col, Cell::Blank);
            board.set_dynamic(front.row, front.col, Cell::Blank);
            events.push(MoveEvent::Fell { cell, hole });
            vec![]
        }
        Stop::At(_, Response::Accept) => {
            events.push(MoveEvent::Shifted { from: origin, pushed: chain.len() - 1, sliding });
            shift_chain(board, &chain, dir)
        }
        Stop::At(_, Response::Forward) => unreachable!("forwarding cells never stop the walk"),
    }
}

/// Move every cell of a contiguous chain one step along `dir`, far end
/// first, and blank the origin. The cell past the far end must be free.
fn shift_chain(board: &mut Board, chain: &[Pos], dir: Direction) -> Vec<Pos> {
    let mut arrivals = Vec::with_capacity(chain.len());
    for &pos in chain.iter().rev() {
        let Some(to) = board.dynamic().step(pos, dir) else {
            unreachable!("chain cell {pos:?} has a free cell ahead of it");
        };
        let cell = board.dynamic()[pos];
        board.set_dynamic(to.row, to.col, cell);
        arrivals.push(to);
    }
    if let Some(&origin) = chain.first() {
        board.set_dynamic(origin.row, origin.col, Cell::Blank);
    }
    arrivals.reverse();
    arrivals
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    use crate::domain::cell::Color;

    /// Board with a blank base layer of the same shape.
    fn plain(dynamic: &str) -> Board {
        let base: String = dynamic
            .lines()
            .map(|r| "_".repeat(r.chars().count()))
            .collect::<Vec<_>>()
            .join("\n");
        Board::new(&base, dynamic).unwrap()
    }

    fn layout(b: &Board) -> String {
        b.dynamic().describe()
    }

    // ── Edges ──

    #[test]
    fn edge_push_changes_nothing() {
        for (dynamic, dir) in [
            ("_>", Direction::Right),
            ("<_", Direction::Left),
            ("^\n_", Direction::Up),
            ("_\nv", Direction::Down),
            (">C", Direction::Right),
        ] {
            let mut b = plain(dynamic);
            let events = b.apply_move(dir);
            assert_eq!(layout(&b), dynamic, "{dir}");
            assert!(matches!(events.as_slice(), [MoveEvent::Blocked { .. }]));
        }
    }

    // ── Plain steps and pushes ──

    #[test]
    fn step_into_blank_leaves_blank_behind() {
        let mut b = plain("_>_");
        b.apply_move(Direction::Right);
        assert_eq!(layout(&b), "__>");
        b.apply_move(Direction::Left);
        b.apply_move(Direction::Left);
        assert_eq!(layout(&b), ">__");
    }

    #[test]
    fn vertical_steps() {
        let mut b = plain("_\n^\n_");
        b.apply_move(Direction::Up);
        assert_eq!(layout(&b), "^\n_\n_");
        b.apply_move(Direction::Down);
        b.apply_move(Direction::Down);
        assert_eq!(layout(&b), "_\n_\n^");
    }

    #[test]
    fn push_single_crate() {
        let mut b = plain(">C_");
        let events = b.apply_move(Direction::Right);
        assert_eq!(layout(&b), "_>C");
        assert_eq!(
            events,
            vec![MoveEvent::Shifted { from: Pos::new(0, 0), pushed: 1, sliding: false }]
        );
    }

    #[test]
    fn push_chain_of_crates_and_trophies() {
        let mut b = plain(">CyC_");
        b.apply_move(Direction::Right);
        assert_eq!(layout(&b), "_>CyC");
        // full chain against the edge: no movement
        b.apply_move(Direction::Right);
        assert_eq!(layout(&b), "_>CyC");
    }

    #[test]
    fn push_up_column() {
        let mut b = plain("_\nC\nC\n^");
        b.apply_move(Direction::Up);
        assert_eq!(layout(&b), "C\nC\n^\n_");
    }

    // ── Walls ──

    #[test]
    fn crate_against_wall_bounces_player() {
        let mut b = plain(">CW");
        let events = b.apply_move(Direction::Right);
        assert_eq!(layout(&b), "<CW");
        assert_eq!(
            events,
            vec![MoveEvent::Bounced { wall: Pos::new(0, 2), facing: Some(Direction::Left) }]
        );
    }

    #[test]
    fn bounce_facings_per_direction() {
        let cases = [
            ("W<", Direction::Left, "W>"),
            ("W>", Direction::Left, "W>"),
            (">W", Direction::Right, "<W"),
            ("W\nv", Direction::Up, "W\n^"),
            ("^\nW", Direction::Down, "v\nW"),
        ];
        for (start, dir, end) in cases {
            let mut b = plain(start);
            b.apply_move(dir);
            assert_eq!(layout(&b), end, "{start:?} {dir}");
        }
    }

    // ── Holes ──

    #[test]
    fn player_falls_into_hole() {
        let mut b = plain(">H_");
        let events = b.apply_move(Direction::Right);
        assert_eq!(layout(&b), "___");
        assert_eq!(b.player_position(), None);
        assert!(events.iter().any(MoveEvent::player_fell));
    }

    #[test]
    fn crate_fills_hole_and_player_stays() {
        let mut b = plain(">CH_");
        let events = b.apply_move(Direction::Right);
        assert_eq!(layout(&b), ">___");
        assert_eq!(b.cell_at(crate::sim::board::Layer::Dynamic, 0, 1), Ok(Cell::Blank));
        assert_eq!(events, vec![MoveEvent::Fell { cell: Cell::Crate, hole: Pos::new(0, 2) }]);
    }

    #[test]
    fn hole_swallows_only_the_front_of_a_chain() {
        let mut b = plain("v\nC\ny\nH\n_");
        b.apply_move(Direction::Down);
        assert_eq!(layout(&b), "v\nC\n_\n_\n_");
        assert_eq!(b.player_position(), Some(Pos::new(0, 0)));
    }

    #[test]
    fn moves_after_falling_are_noops() {
        let mut b = plain("_>H");
        b.apply_move(Direction::Right);
        let recorded = b.moves_recorded();
        assert!(b.apply_move(Direction::Left).is_empty());
        assert_eq!(b.moves_recorded(), recorded);
        assert_eq!(layout(&b), "___");
    }

    // ── Ice ──

    #[test]
    fn player_slides_across_ice_to_floor() {
        let mut b = Board::new("_III_", ">____").unwrap();
        let events = b.apply_move(Direction::Right);
        assert_eq!(layout(&b), "____>");
        let slides = events
            .iter()
            .filter(|e| matches!(e, MoveEvent::Shifted { sliding: true, .. }))
            .count();
        assert_eq!(slides, 3);
    }

    #[test]
    fn ice_slide_stops_at_edge() {
        let mut b = Board::new("_III", ">___").unwrap();
        b.apply_move(Direction::Right);
        assert_eq!(layout(&b), "___>");
    }

    #[test]
    fn ice_slide_stops_at_wall_and_bounces() {
        let mut b = Board::new("_II_", ">__W").unwrap();
        b.apply_move(Direction::Right);
        assert_eq!(layout(&b), "__<W");
    }

    #[test]
    fn ice_slide_into_hole() {
        let mut b = Board::new("_II_", ">__H").unwrap();
        b.apply_move(Direction::Right);
        assert_eq!(layout(&b), "____");
        assert_eq!(b.player_position(), None);
    }

    #[test]
    fn pushed_crate_slides_and_player_stays() {
        let mut b = Board::new("__II__", ">C____").unwrap();
        b.apply_move(Direction::Right);
        assert_eq!(layout(&b), "_>__C_");
    }

    #[test]
    fn crate_sliding_into_wall_turns_player() {
        let mut b = Board::new("__I_", ">C_W").unwrap();
        let events = b.apply_move(Direction::Right);
        assert_eq!(layout(&b), "_<CW");
        assert!(events.contains(&MoveEvent::Bounced {
            wall: Pos::new(0, 3),
            facing: Some(Direction::Left),
        }));
    }

    #[test]
    fn crate_sliding_up_into_wall_turns_player_up() {
        let mut b = Board::new("_\nI\n_\n_", "W\n_\nC\n<").unwrap();
        b.apply_move(Direction::Up);
        assert_eq!(layout(&b), "W\nC\n^\n_");
        assert_eq!(b.cell_at(crate::sim::board::Layer::Dynamic, 2, 0), Ok(Cell::Player(Direction::Up)));
    }

    #[test]
    fn sliding_player_pushes_crate_ahead() {
        let mut b = Board::new("_III_", ">_C__").unwrap();
        b.apply_move(Direction::Right);
        assert_eq!(layout(&b), "___>C");
    }

    #[test]
    fn blocked_entity_on_ice_does_not_continue() {
        // crate already on ice, wall beyond: nothing arrives anywhere
        let mut b = Board::new("_I_", ">CW").unwrap();
        b.apply_move(Direction::Right);
        assert_eq!(layout(&b), "<CW");
    }

    #[test]
    fn ice_in_dynamic_layer_is_pushed_like_a_crate() {
        let mut b = plain(">I_");
        b.apply_move(Direction::Right);
        assert_eq!(layout(&b), "_>I");
    }

    // ── Trophies + history ──

    #[test]
    fn trophy_pushed_onto_target_wins() {
        let mut b = Board::new("__R", ">r_").unwrap();
        assert!(!b.is_won());
        b.apply_move(Direction::Right);
        assert!(b.is_won());
        assert_eq!(b.cell_at(crate::sim::board::Layer::Dynamic, 0, 2), Ok(Cell::Trophy(Color::Red)));
    }

    #[test]
    fn every_accepted_move_is_recorded_even_when_blocked() {
        let mut b = plain(">W");
        b.apply_move(Direction::Right);
        b.apply_move(Direction::Left);
        assert_eq!(b.moves_recorded(), 2);
    }

    #[test]
    fn undo_restores_previous_states_then_noops() {
        let mut b = plain(">C__H");
        let mut states = vec![layout(&b)];
        for dir in [Direction::Right, Direction::Right, Direction::Left, Direction::Right] {
            b.apply_move(dir);
            states.push(layout(&b));
        }
        let n = states.len() - 1;
        for k in (0..n).rev() {
            assert!(b.undo());
            assert_eq!(layout(&b), states[k], "after undo back to move {k}");
        }
        assert!(!b.undo());
        assert_eq!(layout(&b), states[0]);
    }

    // ── The sample puzzle ──

    const SAMPLE_BASE: &str = "________\n___R____\n________\n_B____Y_\n________\n___G____\n________";

    #[test]
    fn sample_puzzle_pushes() {
        let mut b = Board::new(
            SAMPLE_BASE,
            "__WWW___\n__W_WW__\nWWWr_WWW\nW_b>yB_W\nWW_gWWWW\n_WW_W___\n__WWW___",
        )
        .unwrap();
        // push the yellow trophy toward its target
        b.apply_move(Direction::Right);
        assert_eq!(b.dynamic().describe().lines().nth(3), Some("W_b_>yBW"));
        // back over the vacated cell, then shove the blue trophy left
        b.apply_move(Direction::Left);
        b.apply_move(Direction::Left);
        assert_eq!(b.player_position(), Some(Pos::new(3, 2)));
        assert_eq!(b.dynamic().describe().lines().nth(3), Some("Wb>__yBW"));
    }

    // ── Generated boards ──

    const ALL: [Direction; 4] = [Direction::Up, Direction::Down, Direction::Left, Direction::Right];

    const ROWS: usize = 4;
    const COLS: usize = 5;

    /// A ROWS×COLS board with one player and arbitrary other cells.
    fn arb_board() -> impl Strategy<Value = Board> {
        let base = prop::collection::vec(prop::sample::select("__IIYR".chars().collect::<Vec<_>>()), ROWS * COLS);
        let dynamic = prop::collection::vec(prop::sample::select("____WCHIyr".chars().collect::<Vec<_>>()), ROWS * COLS);
        (base, dynamic, 0..ROWS * COLS, prop::sample::select(ALL.to_vec())).prop_map(
            |(base, mut dynamic, player, facing)| {
                dynamic[player] = facing.player_glyph();
                let rows = |cells: Vec<char>| {
                    cells
                        .chunks(COLS)
                        .map(|r| r.iter().collect::<String>())
                        .collect::<Vec<_>>()
                        .join("\n")
                };
                Board::new(&rows(base), &rows(dynamic)).unwrap()
            },
        )
    }

    fn arb_moves() -> impl Strategy<Value = Vec<Direction>> {
        prop::collection::vec(prop::sample::select(ALL.to_vec()), 0..12)
    }

    proptest! {
        #[test]
        fn undo_retraces_every_move(mut b in arb_board(), moves in arb_moves()) {
            let mut states = vec![layout(&b)];
            for dir in moves {
                // nothing is recorded once the player is gone
                let recorded = b.moves_recorded();
                b.apply_move(dir);
                if b.moves_recorded() > recorded {
                    states.push(layout(&b));
                }
            }
            for k in (0..states.len() - 1).rev() {
                prop_assert!(b.undo());
                prop_assert_eq!(layout(&b), states[k].clone());
            }
            prop_assert!(!b.undo());
            prop_assert_eq!(layout(&b), states[0].clone());
        }

        #[test]
        fn player_is_never_duplicated(mut b in arb_board(), moves in arb_moves()) {
            for dir in moves {
                b.apply_move(dir);
                let players = b.dynamic().iter().filter(|(_, c)| c.is_player()).count();
                prop_assert!(players <= 1);
                prop_assert_eq!(b.dimensions(), (ROWS, COLS));
            }
        }

        #[test]
        fn pushing_off_the_edge_changes_nothing(mut b in arb_board(), row in 0..ROWS) {
            // move the player to the left edge, facing out
            if let Some(p) = b.player_position() {
                b.set_dynamic(p.row, p.col, Cell::Blank);
            }
            b.set_dynamic(row, 0, Cell::Player(Direction::Left));
            let before = layout(&b);
            b.apply_move(Direction::Left);
            prop_assert_eq!(layout(&b), before);
        }
    }
}
