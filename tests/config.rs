//! Integration tests for configuration: presets, JSON input, validation, selection.

use championship_engine::{
    compute_standings, select_participants, ChampionshipError, ConfigInput, PairingMethod,
    Participant, ParticipantSelection, RoundSpec, RoundType, TournamentConfig, TournamentPreset,
};

fn round(n: u32, round_type: RoundType, selection: ParticipantSelection, method: PairingMethod) -> RoundSpec {
    RoundSpec::new(n, round_type, selection, 1, method)
}

fn assert_invalid(config: TournamentConfig) {
    match config.validate() {
        Err(ChampionshipError::InvalidConfiguration(_)) => {}
        other => panic!("expected InvalidConfiguration, got {:?}", other),
    }
}

#[test]
fn presets_are_valid_and_end_in_a_direct_final() {
    for (preset, rounds, third_place) in [
        (TournamentPreset::SmallTournament, 5, false),
        (TournamentPreset::MediumTournament, 6, true),
        (TournamentPreset::LargeTournament, 8, true),
    ] {
        let config = TournamentConfig::preset(preset);
        config.validate().unwrap();
        assert_eq!(config.rounds.len(), rounds);

        let last = config.rounds.last().unwrap();
        assert_eq!(last.round_type, RoundType::Final);
        assert_eq!(last.participant_selection, ParticipantSelection::TopK(2));
        assert_eq!(last.pairing_method, PairingMethod::Direct);
        assert_eq!(last.third_place, third_place);
        assert_eq!(config.rounds[0].matches_per_player, 2);
    }
}

#[test]
fn preset_names_parse() {
    assert_eq!("large_tournament".parse::<TournamentPreset>().unwrap(), TournamentPreset::LargeTournament);
    assert!(matches!(
        "huge_tournament".parse::<TournamentPreset>(),
        Err(ChampionshipError::InvalidConfiguration(_))
    ));

    let config = TournamentConfig::from_json("\"medium_tournament\"").unwrap();
    assert_eq!(config, TournamentConfig::preset(TournamentPreset::MediumTournament));
    assert!(TournamentConfig::from_json("\"huge_tournament\"").is_err());
}

#[test]
fn custom_json_config_fills_defaults() {
    let raw = r#"{
        "rounds": [
            {"round": 1, "type": "dense", "participant_selection": "all",
             "matches_per_player": 2, "pairing_method": "random"},
            {"round": 2, "type": "final", "participant_selection": {"top_k": 2},
             "matches_per_player": 1, "pairing_method": "direct"}
        ],
        "bye_points": 0.5
    }"#;
    let config = TournamentConfig::from_json(raw).unwrap();
    assert_eq!(config.rounds.len(), 2);
    assert_eq!(config.rounds[1].participant_selection, ParticipantSelection::TopK(2));
    assert!(config.avoid_repeat_matches);
    assert!(!config.color_balance_strict);
    assert_eq!(config.bye_points, 0.5);

    let input: ConfigInput = serde_json::from_str(raw).unwrap();
    assert!(matches!(input, ConfigInput::Custom(_)));
}

#[test]
fn structural_rules_are_enforced() {
    use ParticipantSelection::*;
    use PairingMethod::*;
    use RoundType::*;

    assert_invalid(TournamentConfig::with_rounds(Vec::new()));
    assert_invalid(TournamentConfig::with_rounds(vec![
        round(1, Normal, All, Swiss),
        round(3, Normal, All, Swiss),
    ]));
    assert_invalid(TournamentConfig::with_rounds(vec![
        round(1, Final, TopK(2), Direct),
        round(2, Final, TopK(2), Direct),
    ]));
    assert_invalid(TournamentConfig::with_rounds(vec![
        round(1, Final, TopK(2), Direct),
        round(2, Normal, All, Swiss),
    ]));
    assert_invalid(TournamentConfig::with_rounds(vec![round(1, Final, TopK(3), Direct)]));
    assert_invalid(TournamentConfig::with_rounds(vec![round(1, Normal, TopPercent(0), Swiss)]));
    assert_invalid(TournamentConfig::with_rounds(vec![round(1, Normal, TopPercent(120), Swiss)]));
    assert_invalid(TournamentConfig::with_rounds(vec![round(1, Normal, TopK(0), Swiss)]));
    assert_invalid(TournamentConfig::with_rounds(vec![RoundSpec::new(1, Dense, All, 0, Random)]));
    assert_invalid(TournamentConfig::with_rounds(vec![RoundSpec::new(1, Final, TopK(2), 2, Direct)]));

    let mut negative_bye = TournamentConfig::default();
    negative_bye.bye_points = -1.0;
    assert_invalid(negative_bye);
}

#[test]
fn third_place_needs_a_four_player_semifinal() {
    use ParticipantSelection::*;
    use PairingMethod::*;
    use RoundType::*;

    assert_invalid(TournamentConfig::with_rounds(vec![
        round(1, Normal, All, Swiss),
        round(2, Final, TopK(2), Direct).with_third_place(),
    ]));
    TournamentConfig::with_rounds(vec![
        round(1, Normal, All, Swiss),
        round(2, Selective, TopK(4), StandingsBased),
        round(3, Final, TopK(2), Direct).with_third_place(),
    ])
    .validate()
    .unwrap();
}

#[test]
fn selection_sizes_round_up_and_clamp() {
    assert_eq!(ParticipantSelection::All.selection_size(7), 7);
    assert_eq!(ParticipantSelection::TopK(8).selection_size(5), 5);
    assert_eq!(ParticipantSelection::TopPercent(25).selection_size(10), 3);
    assert_eq!(ParticipantSelection::TopPercent(10).selection_size(5), 2);
    assert_eq!(ParticipantSelection::TopPercent(100).selection_size(9), 9);
}

#[test]
fn selection_takes_the_top_of_the_standings() {
    let roster: Vec<Participant> = (0..6)
        .map(|i| Participant::new(format!("Player {}", i + 1), 1400 + 100 * i))
        .collect();
    let standings = compute_standings(&roster, &[], 1.0);

    let top = select_participants(ParticipantSelection::TopPercent(50), &standings);
    assert_eq!(top, vec![roster[5].id, roster[4].id, roster[3].id]);
    assert_eq!(select_participants(ParticipantSelection::TopK(10), &standings).len(), 6);
}
