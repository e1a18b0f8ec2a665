//! Chess championship engine: library with models, pairing, and generation logic.

pub mod logic;
pub mod models;
pub mod store;

pub use logic::{
    build_schedule, check_resolvable, compute_standings, generate_championship,
    is_round_complete, on_round_complete, pair, pair_round, pending_in_round,
    preview_championship, record_match_result, resolve_placeholder, resolve_round,
    select_participants, standings_after_round, GenerateOptions, GenerationSummary,
    PairingContext, PassPairing, ResolutionContext, RoundPairing, RoundSummary,
};
pub use models::{
    parse_roster_csv, ByeHandling, Championship, ChampionshipError, ChampionshipId, ConfigInput,
    GenerationStatus, Match, MatchId, MatchResult, PairingMethod, Participant, ParticipantId,
    ParticipantSelection, RoundSpec, RoundType, SlotSource, StandingsEntry, TournamentConfig,
    TournamentMode, TournamentPreset,
};
pub use store::ChampionshipStore;
