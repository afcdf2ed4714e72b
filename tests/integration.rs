use std::{fs, path::PathBuf, process::Command};

#[test]
fn basic_workflow() {
    let test_dir = PathBuf::from(env!("CARGO_TARGET_TMPDIR")).join("basic_workflow");

    fs::remove_dir_all(&test_dir).ok();
    fs::create_dir_all(&test_dir).expect("failed to create test directory");

    // Two cycles: rising edges at minutes 2 and 5, threshold (60+10)/2 = 35.
    let csv_contents = String::new()
        + "2024-03-01 08:00:00,20.0,10\n"
        + "2024-03-01 08:01:00,20.5,10\n"
        + "2024-03-01 08:02:00,21.0,60\n"
        + "2024-03-01 08:03:00,22.0,60\n"
        + "2024-03-01 08:04:00,21.0,10\n"
        + "2024-03-01 08:05:00,21.5,60\n"
        + "2024-03-01 08:06:00,22.5,60\n"
        + "2024-03-01 08:07:00,21.0,10\n";

    let input_path = test_dir.join("furnace.csv");
    fs::write(&input_path, &csv_contents).expect("failed to write input file");

    let config_path = test_dir.join("config.toml");
    let config_contents = String::new()
        + "[chart]\n"
        + "y_min = 0.0\n"
        + "y_max = 100.0\n";
    fs::write(&config_path, config_contents).expect("failed to write config file");

    fn run_bin(args: &[&str]) {
        let bin = PathBuf::from(env!("CARGO_BIN_EXE_cyclescope"));

        let output = Command::new(bin)
            .args(args)
            .output()
            .expect("failed to execute command");

        let stdout_str =
            std::str::from_utf8(&output.stdout).expect("failed to convert stdout to string");
        let stderr_str =
            std::str::from_utf8(&output.stderr).expect("failed to convert stderr to string");

        assert!(
            output.status.success(),
            "failed to run binary with {args:?}\nstdout:\n{stdout_str}\nstderr:\n{stderr_str}\n"
        );
    }

    let test_dir_str = test_dir
        .to_str()
        .expect("failed to convert test directory to string");
    let input_str = input_path
        .to_str()
        .expect("failed to convert input path to string");
    let config_str = config_path
        .to_str()
        .expect("failed to convert config path to string");

    run_bin(&[
        "--out-dir", test_dir_str, "--config", config_str, "analyze", "--input", input_str,
    ]);
    run_bin(&["--out-dir", test_dir_str, "batch", "--data-dir", test_dir_str]);

    let report: serde_json::Value = serde_json::from_str(
        &fs::read_to_string(test_dir.join("furnace.report.json"))
            .expect("failed to read report file"),
    )
    .expect("failed to parse report file");

    assert_eq!(report["threshold"], 35.0);
    assert_eq!(report["n_samples"], 8);
    assert_eq!(report["n_cycles"], 2);
    assert_eq!(report["cycle_starts_min"][0], 0.0);
    assert_eq!(report["cycle_starts_min"][1], 3.0);
    assert_eq!(report["samples"][0]["elapsed_min"], -2.0);
    assert_eq!(report["samples"][7]["sp"], 10.0);

    let figure: serde_json::Value = serde_json::from_str(
        &fs::read_to_string(test_dir.join("furnace.figure.json"))
            .expect("failed to read figure file"),
    )
    .expect("failed to parse figure file");

    assert_eq!(figure["data"][0]["name"], "PV");
    assert_eq!(figure["data"][1]["name"], "SP");
    assert_eq!(figure["data"][0]["x"][0], -2.0);
    assert_eq!(figure["layout"]["xaxis"]["rangeslider"]["visible"], true);
    assert_eq!(figure["layout"]["annotations"][3]["text"], "<b>Cycle 1</b>");

    fs::remove_dir_all(&test_dir).ok();
}
