use std::path::Path;
use std::process::{Command, Output};

fn biomass(cwd: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_biomass"))
        .args(args)
        .current_dir(cwd)
        .env_remove("BIOMASS_OUTPUT_DIR")
        .env_remove("BIOMASS_UNDERLAY")
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to launch biomass")
}

fn stdout(output: &Output) -> String {
    assert!(
        output.status.success(),
        "biomass failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn report_prints_the_narrative_numbers() {
    let dir = tempfile::tempdir().unwrap();
    let text = stdout(&biomass(dir.path(), &["report"]));

    assert!(text.contains("Humans Only are now 483% of original value"));
    assert!(text.contains("Livestock+Pets are now 2600% of original value"));
    assert!(text.contains("Wildlife is now 15% of original value"));
    assert!(text.contains("In 1850, livestock+pets were 37% of humanities mass footprint."));
}

#[test]
fn report_as_json() {
    let dir = tempfile::tempdir().unwrap();
    let text = stdout(&biomass(dir.path(), &["report", "--json"]));
    let value: serde_json::Value = serde_json::from_str(&text).unwrap();

    assert_eq!(value["observed"]["end_year"], 2000);
    assert_eq!(value["scenario"]["estimate"]["final_year"], 2100);
}

#[test]
fn run_writes_charts_and_tables() {
    let dir = tempfile::tempdir().unwrap();
    stdout(&biomass(dir.path(), &["run", "--out", "out"]));

    let out = dir.path().join("out");
    for id in [
        "calibration",
        "stacked_mass",
        "share_two_band",
        "share_three_band",
        "imagined_stacked_mass",
        "imagined_share_two_band",
    ] {
        assert!(out.join(format!("{id}.svg")).exists(), "missing {id}.svg");
    }
    let imagined = std::fs::read_to_string(out.join("biomass_imagined.csv")).unwrap();
    assert_eq!(imagined.lines().count(), 15);
}

#[test]
fn config_file_changes_the_scenario() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("biomass.toml"),
        "[scenario]\nplateau_population = 12.0\n",
    )
    .unwrap();

    let text = stdout(&biomass(dir.path(), &["--config", "biomass.toml", "report"]));
    // 12 / 6 * 290
    assert!(text.contains("Estimated human mass in 2100: 580m tons"));
}

#[test]
fn invalid_config_fails_with_context() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("bad.toml"), "chart_size = [0, 0]\n").unwrap();

    let output = biomass(dir.path(), &["--config", "bad.toml", "report"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("failed to load configuration"));
}

#[test]
fn dotenv_file_sets_output_dir() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join(".env"), "BIOMASS_OUTPUT_DIR=from_env\n").unwrap();

    stdout(&biomass(dir.path(), &["render", "--only", "share_two_band"]));
    assert!(dir.path().join("from_env/share_two_band.svg").exists());
}
