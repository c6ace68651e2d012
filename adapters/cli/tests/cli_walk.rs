use std::process::{Command, Output};

fn run(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_endless-maze"))
        .args(args)
        .output()
        .expect("failed to launch endless-maze binary")
}

#[test]
fn short_walk_prints_final_frame() {
    let output = run(&["--steps", "5", "--width", "12"]);
    assert!(output.status.success(), "{output:?}");

    let stdout = String::from_utf8(output.stdout).expect("utf-8 output");
    let lines: Vec<&str> = stdout.lines().collect();
    // Nine rows render as eighteen lines plus the southern border, then the summary.
    assert_eq!(lines.len(), 20, "{stdout}");
    for line in &lines[..19] {
        assert_eq!(line.chars().count(), 12 * 3 + 1, "{line}");
    }
    assert_eq!(stdout.matches('@').count(), 1, "{stdout}");
    assert!(lines[19].starts_with("step 5 at "), "{}", lines[19]);
}

#[test]
fn intermediate_frames_follow_the_requested_cadence() {
    let output = run(&["--steps", "4", "--frame-every", "2", "--width", "8"]);
    assert!(output.status.success(), "{output:?}");

    let stdout = String::from_utf8(output.stdout).expect("utf-8 output");
    let summaries: Vec<&str> = stdout.lines().filter(|line| line.starts_with("step ")).collect();
    assert_eq!(summaries.len(), 3, "{stdout}");
    assert!(summaries[0].starts_with("step 2 at "));
    assert!(summaries[1].starts_with("step 4 at "));
    assert!(summaries[2].starts_with("step 4 at "));
}

#[test]
fn inconsistent_config_fails_with_context() {
    let output = run(&["--top-row", "1", "--bottom-row", "5", "--steps", "1"]);
    assert!(!output.status.success());

    let stderr = String::from_utf8(output.stderr).expect("utf-8 output");
    assert!(stderr.contains("outside the maze bounds"), "{stderr}");
}
