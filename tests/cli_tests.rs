//! Command execution end to end, driven through the clap argument types

mod common;

use bayes_ttt::{
    EvaluationResult, TrainedModel,
    cli::{
        commands::{evaluate, predict, train, validate},
        config::AppConfig,
    },
};
use clap::Parser;
use common::{endgame_set, write_csv};
use tempfile::tempdir;

fn quiet_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.common.progress = false;
    config
}

#[test]
fn train_writes_a_loadable_model() {
    let tmp = tempdir().unwrap();
    let data = tmp.path().join("endgames.csv");
    let model = tmp.path().join("model.bin");
    let set = endgame_set(300, 31);
    write_csv(&set, &data);

    let args = train::TrainArgs::parse_from([
        "train",
        "--data",
        data.to_str().unwrap(),
        "--alpha",
        "0.5",
        "--output",
        model.to_str().unwrap(),
    ]);
    train::execute(args, &quiet_config()).expect("training should succeed");

    let loaded = TrainedModel::load(&model).unwrap();
    assert_eq!(loaded.metadata.training_rows, 300);
    assert_eq!(loaded.metadata.alpha, 0.5);
    assert_eq!(loaded.model.n_samples().unwrap(), 300);
}

#[test]
fn predict_accepts_saved_model_or_data() {
    let tmp = tempdir().unwrap();
    let data = tmp.path().join("endgames.csv");
    let model = tmp.path().join("model.bin");
    write_csv(&endgame_set(200, 32), &data);

    train::execute(
        train::TrainArgs::parse_from([
            "train",
            "-d",
            data.to_str().unwrap(),
            "-o",
            model.to_str().unwrap(),
        ]),
        &quiet_config(),
    )
    .unwrap();

    for source in [["--model", model.to_str().unwrap()], ["--data", data.to_str().unwrap()]] {
        let args = predict::PredictArgs::parse_from([
            "predict",
            source[0],
            source[1],
            "--board",
            "X,O,B;B,X,B;O,B,B",
        ]);
        predict::execute(args, &quiet_config()).expect("prediction should succeed");
    }
}

#[test]
fn predict_rejects_finished_board() {
    let tmp = tempdir().unwrap();
    let data = tmp.path().join("endgames.csv");
    write_csv(&endgame_set(50, 33), &data);

    let args = predict::PredictArgs::parse_from([
        "predict",
        "--data",
        data.to_str().unwrap(),
        "--board",
        "X,X,X;O,O,B;B,B,B",
    ]);
    assert!(predict::execute(args, &quiet_config()).is_err());
}

#[test]
fn predict_requires_a_model_source() {
    let result = predict::PredictArgs::try_parse_from(["predict", "--board", "B,B,B"]);
    assert!(result.is_err());
}

#[test]
fn evaluate_exports_results() {
    let tmp = tempdir().unwrap();
    let data = tmp.path().join("endgames.csv");
    let export = tmp.path().join("results.json");
    let trace = tmp.path().join("trace.jsonl");
    write_csv(&endgame_set(300, 34), &data);

    let args = evaluate::EvaluateArgs::parse_from([
        "evaluate",
        "--data",
        data.to_str().unwrap(),
        "--games",
        "25",
        "--seed",
        "9",
        "--opponent",
        "random",
        "--no-progress",
        "--trace",
        trace.to_str().unwrap(),
        "--export",
        export.to_str().unwrap(),
    ]);
    evaluate::execute(args, &quiet_config()).expect("evaluation should succeed");

    let result = EvaluationResult::load(&export).unwrap();
    assert_eq!(result.total_games, 25);
    assert_eq!(result.wins + result.draws + result.losses, 25);

    let lines = std::fs::read_to_string(&trace).unwrap();
    assert_eq!(lines.lines().count(), 25);
}

#[test]
fn evaluate_accepts_difficulty_tiers() {
    let tmp = tempdir().unwrap();
    let data = tmp.path().join("endgames.csv");
    let export = tmp.path().join("results.json");
    write_csv(&endgame_set(200, 36), &data);

    for opponent in ["easy", "medium"] {
        let args = evaluate::EvaluateArgs::parse_from([
            "evaluate",
            "--data",
            data.to_str().unwrap(),
            "--games",
            "10",
            "--seed",
            "2",
            "--opponent",
            opponent,
            "--no-progress",
            "--export",
            export.to_str().unwrap(),
        ]);
        evaluate::execute(args, &quiet_config()).expect("evaluation should succeed");

        let result = EvaluationResult::load(&export).unwrap();
        assert_eq!(result.total_games, 10);
    }
}

#[test]
fn evaluate_rejects_unknown_opponent() {
    let result = evaluate::EvaluateArgs::try_parse_from([
        "evaluate",
        "--data",
        "unused.csv",
        "--opponent",
        "greedy",
    ]);
    assert!(result.is_err());
}

#[test]
fn validate_runs_on_held_out_split() {
    let tmp = tempdir().unwrap();
    let data = tmp.path().join("endgames.csv");
    write_csv(&endgame_set(250, 35), &data);

    let args = validate::ValidateArgs::parse_from([
        "validate",
        "--data",
        data.to_str().unwrap(),
        "--test-fraction",
        "0.3",
        "--seed",
        "4",
    ]);
    validate::execute(args, &quiet_config()).expect("validation should succeed");
}

#[test]
fn missing_data_file_has_context() {
    let args = train::TrainArgs::parse_from([
        "train",
        "--data",
        "/nonexistent/endgames.csv",
        "--output",
        "/nonexistent/model.bin",
    ]);
    let err = train::execute(args, &quiet_config()).unwrap_err();
    assert!(format!("{err:#}").contains("Failed to read training data"));
}
