use clap::Parser;
use tempfile::tempdir;
use ttt_mc::{
    adapters::MsgPackRepository,
    cli::commands::train::{TrainArgs, execute},
    ports::TableRepository,
};

fn parse_args<I, T>(args: I) -> TrainArgs
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    TrainArgs::parse_from(args)
}

#[test]
fn summary_without_extension_appends_json() {
    let tmp = tempdir().unwrap();
    let summary_stem = tmp.path().join("run_overview");
    let output = tmp.path().join("table.msgpack");

    let args = parse_args([
        "ttt-mc-train",
        "--episodes",
        "50",
        "--seed",
        "1",
        "--output",
        output.to_str().unwrap(),
        "--summary",
        summary_stem.to_str().unwrap(),
        "--eval-games",
        "10",
        "--no-progress",
    ]);

    execute(args).expect("training with summary should succeed");

    let expected_path = summary_stem.with_extension("json");
    assert!(
        expected_path.exists(),
        "expected summary at {}",
        expected_path.display()
    );

    let contents = std::fs::read_to_string(&expected_path).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&contents).unwrap();
    assert_eq!(parsed["training"]["total_games"], 50);
    assert_eq!(parsed["evaluation"]["total_games"], 10);
    assert_eq!(parsed["evaluation_opponent"], "random");
    assert_eq!(parsed["config"]["episodes"], 50);
}

#[test]
fn summary_directory_argument_creates_default_file() {
    let tmp = tempdir().unwrap();
    let summary_dir = tmp.path().join("summaries");
    let summary_arg = format!("{}/", summary_dir.display());
    let output = tmp.path().join("table.msgpack");

    let args = parse_args([
        "ttt-mc-train",
        "--episodes",
        "30",
        "--output",
        output.to_str().unwrap(),
        "--summary",
        &summary_arg,
        "--eval-games",
        "0",
        "--no-progress",
    ]);

    execute(args).expect("training with directory summary should succeed");

    let expected_path = summary_dir.join("training_summary.json");
    assert!(
        expected_path.exists(),
        "expected summary at {}",
        expected_path.display()
    );

    let contents = std::fs::read_to_string(&expected_path).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&contents).unwrap();
    assert_eq!(parsed["training"]["total_games"], 30);
    assert!(parsed["evaluation"].is_null());
}

#[test]
fn trained_table_is_written_with_metadata() {
    let tmp = tempdir().unwrap();
    let output = tmp.path().join("out").join("table.msgpack");
    let json = tmp.path().join("table.json");

    let args = parse_args([
        "ttt-mc-train",
        "--legacy",
        "--episodes",
        "40",
        "--opponent",
        "tactical",
        "--output",
        output.to_str().unwrap(),
        "--export-json",
        json.to_str().unwrap(),
        "--eval-games",
        "0",
        "--no-progress",
    ]);
    execute(args).expect("training should succeed");

    let saved = MsgPackRepository::new().load(&output).unwrap();
    assert!(!saved.table.is_empty());
    let config = saved.metadata.config.expect("config recorded");
    assert_eq!(config.episodes, 40);
    assert_eq!(config.step_penalty, -0.04);
    assert!(json.exists());
}

#[test]
fn config_file_supplies_settings() {
    let tmp = tempdir().unwrap();
    let config_path = tmp.path().join("trainer.json");
    std::fs::write(
        &config_path,
        r#"{ "episodes": 25, "gamma": 0.8, "update": "first_visit" }"#,
    )
    .unwrap();

    let args = parse_args([
        "ttt-mc-train",
        "--config",
        config_path.to_str().unwrap(),
        "--gamma",
        "0.7",
    ]);
    let config = args.trainer_config().unwrap();
    assert_eq!(config.episodes, 25);
    assert_eq!(config.gamma, 0.7);
    assert_eq!(config.update.to_string(), "first-visit");
}
