use clap::Parser;
use qmaze::cli::commands::train::{TrainArgs, execute};
use tempfile::tempdir;

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

    let args = parse_args([
        "qmaze-train",
        "--width",
        "6",
        "--height",
        "6",
        "--episodes",
        "5",
        "--seed",
        "1",
        "--max-steps",
        "200",
        "--no-progress",
        "--no-render",
        "--summary",
        summary_stem.to_str().unwrap(),
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
    assert_eq!(parsed["config"]["episodes"], 5);
    assert_eq!(parsed["config"]["learner"]["max_steps_per_episode"], 200);
    assert_eq!(parsed["runs"].as_array().unwrap().len(), 1);
    assert_eq!(parsed["runs"][0]["episodes_run"], 5);
    assert_eq!(parsed["runs"][0]["width"], 6);
    assert_eq!(parsed["runs"][0]["path"][0]["x"], 1);
    assert_eq!(parsed["runs"][0]["path"][0]["y"], 1);
}

#[test]
fn summary_directory_argument_creates_default_file() {
    let tmp = tempdir().unwrap();
    let summary_dir = tmp.path().join("summaries");
    let summary_arg = format!("{}/", summary_dir.display());

    let args = parse_args([
        "qmaze-train",
        "--episodes",
        "3",
        "--seed",
        "4",
        "--runs",
        "2",
        "--max-steps",
        "100",
        "--no-progress",
        "--summary",
        &summary_arg,
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
    let runs = parsed["runs"].as_array().unwrap();
    assert_eq!(runs.len(), 2);
    for run in runs {
        assert_eq!(run["episodes_run"], 3);
        let width = run["width"].as_u64().unwrap();
        assert!((6..=15).contains(&width));
    }
}

#[test]
fn observations_file_has_one_line_per_episode() {
    let tmp = tempdir().unwrap();
    let observations = tmp.path().join("episodes.jsonl");

    let args = parse_args([
        "qmaze-train",
        "-W",
        "7",
        "-H",
        "6",
        "-e",
        "4",
        "--seed",
        "2",
        "--runs",
        "2",
        "--max-steps",
        "150",
        "--no-progress",
        "--no-render",
        "--observations",
        observations.to_str().unwrap(),
    ]);

    execute(args).expect("training with observations should succeed");

    let contents = std::fs::read_to_string(&observations).unwrap();
    let lines: Vec<serde_json::Value> = contents
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(lines.len(), 8);
    assert_eq!(lines[0]["run"], 0);
    assert_eq!(lines[4]["run"], 1);
    assert_eq!(lines[7]["episode"], 3);
}

#[test]
fn invalid_width_is_reported() {
    let args = parse_args([
        "qmaze-train",
        "--width",
        "20",
        "--episodes",
        "1",
        "--no-progress",
    ]);
    let err = execute(args).unwrap_err();
    assert!(err.to_string().contains("width"), "unexpected error: {err}");
}
