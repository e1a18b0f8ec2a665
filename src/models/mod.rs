//! Data structures for championships: participants, matches, configuration, standings.

mod config;
mod game;
mod participant;
mod standings;
mod tournament;

pub use config::{
    ByeHandling, ConfigInput, PairingMethod, ParticipantSelection, RoundSpec, RoundType,
    TournamentConfig, TournamentMode, TournamentPreset,
};
pub(crate) use game::initial_bye_result;
pub use game::{Match, MatchId, MatchResult, SlotSource};
pub use participant::{parse_roster_csv, Participant, ParticipantId};
pub use standings::{StandingsEntry, TIEBREAK_BUCHHOLZ, TIEBREAK_SONNEBORN_BERGER, TIEBREAK_WINS};
pub use tournament::{Championship, ChampionshipError, ChampionshipId, GenerationStatus};
