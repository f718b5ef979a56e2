use std::fs;
use std::path::Path;

use chase_replay::config::ScenarioConfig;
use chase_replay::replay::ReplayRunner;
use tempfile::tempdir;

fn write_board_data(dir: &Path) {
    fs::write(dir.join("taxi.txt"), "1:2,3\n2:1,3\n3:1,2\n").expect("taxi data");
    fs::write(dir.join("bus.txt"), "1:4\n4:1\n").expect("bus data");
    fs::write(dir.join("subway.txt"), "").expect("subway data");
    fs::write(dir.join("boat.txt"), "4:5\n5:4\n").expect("boat data");
    fs::write(dir.join("coords.txt"), "10,10\n60,10\n10,60\n60,60\n110,60\n").expect("coords data");
}

fn load_scenario(data_dir: &Path, output_dir: &Path) -> ScenarioConfig {
    let yaml = format!(
        r#"
run_id: "test_smoke"
data:
  dir: "{data}"
game:
  detectives: [3]
steps:
  - reveal: 1
  - ticket: taxi
  - ticket: taxi
  - round: {{ detectives: [2] }}
  - ticket: mystery
outputs:
  jsonl: "{jsonl}"
  summary_md: "{summary}"
  plots_dir: "{plots}"
logging:
  enable_structured: false
"#,
        data = data_dir.display(),
        jsonl = output_dir.join("steps.jsonl").display(),
        summary = output_dir.join("summary.md").display(),
        plots = output_dir.join("plots").display()
    );

    let mut cfg: ScenarioConfig = serde_yaml::from_str(&yaml).expect("valid yaml");
    cfg.validate().expect("scenario validates");
    cfg
}

#[test]
fn replay_smoke_test_narrows_and_reports() {
    let data_dir = tempdir().expect("data dir");
    write_board_data(data_dir.path());
    let out_dir = tempdir().expect("output dir");

    let config = load_scenario(data_dir.path(), out_dir.path());
    let outputs = config.resolved_outputs();

    let runner = ReplayRunner::new(config, outputs);
    let summary = runner.run().expect("replay completes");

    assert_eq!(summary.steps_played, 5);
    assert_eq!(summary.rows_written, 5);
    assert!(summary.trace_path.is_none());

    // Starting spot 1, detective at 3: taxi -> {2}, taxi -> {1}, then the
    // detectives move to 2 and the mystery ticket fans out to {3, 4}.
    let jsonl = fs::read_to_string(&summary.jsonl_path).expect("jsonl readable");
    let rows: Vec<serde_json::Value> = jsonl
        .lines()
        .map(|line| serde_json::from_str(line).expect("row decodes to JSON"))
        .collect();
    assert_eq!(rows.len(), 5);

    let counts: Vec<u64> = rows
        .iter()
        .map(|row| row["candidate_count"].as_u64().expect("count field"))
        .collect();
    assert_eq!(counts, vec![1, 1, 1, 1, 2]);

    assert_eq!(rows[0]["action"], "reveal 1");
    assert_eq!(rows[4]["action"], "ticket mystery");
    assert_eq!(rows[4]["run_id"], "test_smoke");
    assert_eq!(
        rows[4]["candidates"],
        serde_json::json!([3, 4])
    );

    assert_eq!(summary.final_candidates, 2);

    let markdown = fs::read_to_string(&summary.summary_path).expect("summary readable");
    assert!(markdown.contains("| 4 | ticket mystery | 2 |"));
    assert!(markdown.contains("Narrowed to one station at step 0"));

    // Plot rendering is optional; ensure any failure surfaces explicitly
    if let Some(plot_path) = summary.plot_path {
        assert!(plot_path.exists(), "plot path reported but missing on disk");
    }
}

#[test]
fn replay_rejects_a_scripted_impossible_round() {
    let data_dir = tempdir().expect("data dir");
    write_board_data(data_dir.path());
    let out_dir = tempdir().expect("output dir");

    let mut config = load_scenario(data_dir.path(), out_dir.path());
    config.steps.push(chase_replay::config::ScenarioStep::Round {
        detectives: Vec::new(),
        barrages: None,
    });

    let outputs = config.resolved_outputs();
    let runner = ReplayRunner::new(config, outputs);
    let err = runner.run().expect_err("mismatched round fails");
    assert!(err.to_string().contains("step 5 rejected"));
}
