//! Saving and reloading trained tables

use std::path::Path;

use tempfile::tempdir;
use ttt_mc::{
    Error,
    adapters::{InMemoryRepository, MsgPackRepository},
    monte_carlo::{MonteCarloTrainer, TrainerConfig},
    persistence::{SavedValueTable, TrainingMetadata},
    ports::TableRepository,
    selector::select_move,
    tictactoe::{Board, Side},
};

fn trained() -> SavedValueTable {
    let config = TrainerConfig {
        episodes: 300,
        seed: Some(5),
        ..TrainerConfig::default()
    };
    let mut trainer = MonteCarloTrainer::new(config.clone()).unwrap();
    let result = trainer.train().unwrap();
    SavedValueTable::new(
        trainer.into_table(),
        TrainingMetadata::from_run(&config, &result),
    )
}

#[test]
fn msgpack_file_preserves_table_and_metadata() {
    let tmp = tempdir().unwrap();
    let path = tmp.path().join("nested").join("table.msgpack");
    let saved = trained();

    MsgPackRepository::new().save(&saved, &path).unwrap();
    let loaded = MsgPackRepository::new().load(&path).unwrap();

    assert_eq!(loaded.table, saved.table);
    assert_eq!(loaded.metadata.config, saved.metadata.config);
    assert_eq!(
        loaded.metadata.result.as_ref().map(|r| r.games.total_games),
        Some(300)
    );
}

#[test]
fn reloaded_table_selects_the_same_moves() {
    let tmp = tempdir().unwrap();
    let path = tmp.path().join("table.msgpack");
    let saved = trained();
    MsgPackRepository::new().save(&saved, &path).unwrap();
    let loaded = MsgPackRepository::new().load(&path).unwrap();

    for raw in ["O........", "....O....", "O...X...O", "OO..X...."] {
        let board = Board::from_string(raw).unwrap();
        assert_eq!(
            select_move(&board, Side::Ai, &saved.table).unwrap(),
            select_move(&board, Side::Ai, &loaded.table).unwrap(),
            "board {raw}"
        );
    }
}

#[test]
fn in_memory_repository_matches_file_semantics() {
    let repo = InMemoryRepository::new();
    let saved = trained();
    repo.save(&saved, Path::new("run-1")).unwrap();

    assert!(repo.contains(Path::new("run-1")));
    assert_eq!(repo.load(Path::new("run-1")).unwrap().table, saved.table);
    assert!(repo.load(Path::new("missing")).is_err());
}

#[test]
fn missing_file_reports_io_error() {
    let tmp = tempdir().unwrap();
    let err = MsgPackRepository::new()
        .load(&tmp.path().join("absent.msgpack"))
        .unwrap_err();
    assert!(matches!(err, Error::Io { .. }));
}

#[test]
fn json_export_lists_board_labels() {
    let tmp = tempdir().unwrap();
    let path = tmp.path().join("table.json");
    let saved = trained();
    saved.export_json(&path).unwrap();

    let parsed: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(parsed["version"], SavedValueTable::VERSION);
    let values = parsed["values"].as_object().unwrap();
    assert_eq!(values.len(), saved.table.len());
    assert!(values.keys().all(|label| label.len() == 9));
}
