//! Integration tests for the moon-transit-validator binary

use std::fs;
use std::process::{Command, Output};

use tempfile::TempDir;

const SITES: [&str; 7] = [
    "Sudbury, MA",
    "Miami, FL",
    "Anchorage, AK",
    "Seattle, WA",
    "Denver, CO",
    "Phoenix, AZ",
    "New York, NY",
];

/// Run the binary in `dir` with a clean MOONTRANSIT_* environment.
fn run_in(dir: &TempDir, envs: &[(&str, &str)]) -> Output {
    let mut command = Command::new(env!("CARGO_BIN_EXE_moon-transit-validator"));
    command.current_dir(dir.path()).env_remove("RUST_LOG");
    for (key, _) in std::env::vars() {
        if key.starts_with("MOONTRANSIT_") {
            command.env_remove(key);
        }
    }
    command.envs(envs.iter().copied());
    command.output().expect("Failed to execute binary")
}

fn tested_sites(stdout: &str) -> Vec<&str> {
    stdout
        .lines()
        .filter_map(|line| line.strip_prefix("Testing: "))
        .collect()
}

fn summary_lines(stdout: &str) -> Vec<&str> {
    stdout
        .lines()
        .skip_while(|line| *line != "Summary")
        .filter(|line| line.contains(" Transit: "))
        .collect()
}

/// Without an astrotimes executable every site still appears and the exit code is 0
#[test]
fn test_missing_executable_still_reports_all_sites() {
    let dir = TempDir::new().unwrap();
    let output = run_in(&dir, &[("MOONTRANSIT_ASTROTIMES__PROGRAM", "/nonexistent/astrotimes")]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with(&format!("{}\nMoon Transit Validation vs USNO\nDate: ", "=".repeat(70))));
    assert_eq!(tested_sites(&stdout), SITES);

    let summary = summary_lines(&stdout);
    assert_eq!(summary.len(), 7);
    for (line, site) in summary.iter().zip(SITES) {
        assert!(line.starts_with(site));
        assert!(line.ends_with("Transit: None"));
    }
    assert_eq!(stdout.matches("  Astrotimes error: failed to start").count(), 7);
    assert!(stdout.ends_with(
        "Next step: Manually verify against USNO Moon Position calculator\nhttps://aa.usno.navy.mil/data/MoonPosition\n"
    ));
}

/// A config file can point at a stand-in executable
#[cfg(unix)]
#[test]
fn test_configured_stand_in_executable() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("moon-transit.toml"),
        r#"
[astrotimes]
program = "sh"
args = ["-c", "echo 'Moonrise 17:20:00'; echo '23:45:01 Moon transit'", "astrotimes"]
"#,
    )
    .unwrap();

    let output = run_in(&dir, &[]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(tested_sites(&stdout), SITES);
    assert_eq!(stdout.matches("  Astrotimes transit: 23:45:01").count(), 7);
    assert!(summary_lines(&stdout).iter().all(|line| line.ends_with("Transit: 23:45:01")));
    assert!(!stdout.contains("No transit found"));
}

/// An invalid config file is reported on stderr and the defaults are used
#[test]
fn test_invalid_config_falls_back_to_defaults() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("moon-transit.toml"),
        "[logging]\nlevel = \"loud\"\n",
    )
    .unwrap();

    let output = run_in(&dir, &[]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ignoring configuration"), "stderr: {stderr}");
    // Default program path is relative to the working directory, which has no astrotimes
    assert_eq!(tested_sites(&stdout), SITES);
    assert_eq!(summary_lines(&stdout).len(), 7);
}

/// Coordinates and the manual-check block are printed per site
#[test]
fn test_manual_verification_block() {
    let dir = TempDir::new().unwrap();
    let output = run_in(&dir, &[("MOONTRANSIT_ASTROTIMES__PROGRAM", "/nonexistent/astrotimes")]);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("  Coordinates: 61.2181, -149.9003\n"));
    assert!(stdout.contains("    Lat: 40.7128, Lon: -74.0060, Date: "));
    assert_eq!(stdout.matches("  USNO: Please check manually at:").count(), 7);
}

/// The report never needs the USNO settings, so bad ones are not a config failure
#[test]
fn test_out_of_range_usno_settings_do_not_reset_config() {
    let dir = TempDir::new().unwrap();
    let output = run_in(
        &dir,
        &[
            ("MOONTRANSIT_ASTROTIMES__PROGRAM", "/nonexistent/astrotimes"),
            ("MOONTRANSIT_USNO__TIMEOUT_SECONDS", "500"),
            ("MOONTRANSIT_USNO__BASE_URL", "aa.usno.navy.mil"),
        ],
    );

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!stderr.contains("ignoring configuration"), "stderr: {stderr}");
    // The configured program is still in effect
    assert_eq!(stdout.matches("  Astrotimes error: failed to start /nonexistent/astrotimes").count(), 7);
}
