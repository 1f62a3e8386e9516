use assert_cmd::Command;

#[test]
fn cli_help_smoke() {
    let mut cmd = Command::cargo_bin("fmri-denoiseqc").unwrap();
    cmd.arg("--help");
    cmd.assert().success();
}

#[test]
fn strategies_lists_full_catalog() {
    let out = Command::cargo_bin("fmri-denoiseqc")
        .unwrap()
        .arg("strategies")
        .output()
        .unwrap();
    assert!(out.status.success());
    let stdout = String::from_utf8(out.stdout).unwrap();
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 21);
    assert!(lines.contains(&"24HMP-8Phys-4GSR-Spike\tfriston24,phys8,gsr4,spike"));
    assert!(lines.contains(&"for_plotting_only\tfriston24,phys8,ica-aroma,gsr4"));
}
