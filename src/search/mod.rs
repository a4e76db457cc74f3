//! The search core: iterative deepening over a fail-hard alpha-beta driver with PVS, a
//! quiescence extension, a transposition cache, and the move-ordering heuristics that feed
//! both. Every submodule here corresponds to one component of the design: `ordering` is move
//! scoring, `killers`/`history_table` are the two move-ordering tables, `pv` is the triangular
//! principal-variation store, `quiescence` and `search` are the two recursive drivers, and
//! `clock` is the cooperative cancellation signal polled by both.

pub mod clock;
pub mod context;
pub mod game_time;
pub mod history_table;
pub mod killers;
pub mod ordering;
pub mod pv;
pub mod quiescence;
pub mod search;

/// Maximum recursion depth in plies. Also the size of the killer table, the search stack, and
/// the triangular PV store's longest frame.
pub const MAX_PLY: usize = 256;

/// Upper bound used as the initial alpha-beta window. Kept well clear of `MATE_EVAL` so that
/// mate-distance pruning at any reachable ply cannot overflow it.
pub const INFINITY: i32 = 1_000_000;

/// The score reported for "mate in 0 plies", i.e. the side to move has just been checkmated.
/// `MATE_EVAL - score` recovers the number of plies to mate for any score beyond
/// `MATE_THRESHOLD` in absolute value.
pub const MATE_EVAL: i32 = INFINITY - 1;

/// Scores with `|score| > MATE_THRESHOLD` encode a forced mate rather than a material
/// evaluation.
pub const MATE_THRESHOLD: i32 = MATE_EVAL / 2;

/// Every 4096 nodes, both the quiescence and alpha-beta drivers poll the clock rather than
/// checking it on every node, which would be prohibitively expensive.
pub const NODES_PER_TIME_CHECK: u64 = 4096;
