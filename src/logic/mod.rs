//! Championship business logic: standings, selection, pairing, brackets, generation, results.

mod bracket;
mod generation;
mod pairing;
mod results;
mod selection;
mod standings;

pub use bracket::{placeholder_round, resolve_placeholder, seed_slots, ResolutionContext};
pub use generation::{
    build_schedule, generate_championship, preview_championship, GenerateOptions,
    GenerationSummary, RoundSummary,
};
pub use pairing::{
    pair, pair_key, pair_round, PairingContext, PassPairing, RoundPairing, SEED_POOL_SIZE,
    STANDINGS_SWAP_WINDOW,
};
pub use results::{
    check_resolvable, is_round_complete, on_round_complete, pending_in_round,
    record_match_result, resolve_round,
};
pub use selection::select_participants;
pub use standings::{compute_standings, standings_after_round, DRAW_POINTS, WIN_POINTS};
