use std::fs;

use clap::Parser;
use takeout_reorg::cli::Cli;
use takeout_reorg::config::Config;
use takeout_reorg::reorganize;

use super::support::Fixture;

fn cli_for(fx: &Fixture, extra: &[&str]) -> Cli {
    let mut args = vec!["takeout-reorg".to_string()];
    args.extend(extra.iter().map(|s| s.to_string()));
    args.push(fx.source.path().to_string_lossy().into_owned());
    args.push(fx.target.path().to_string_lossy().into_owned());
    Cli::parse_from(args)
}

#[test]
fn test_reorganize_without_metadata_step() {
    let fx = Fixture::new();
    fx.add("Photos from 2020/a.jpg", b"alpha");
    fx.add("Archive/b.jpg", b"bravo");

    let cli = cli_for(&fx, &["--skip-metadata", "--no-progress"]);
    let mut config = Config::default();
    config.apply_cli(&cli);

    let summary = reorganize(&cli, &config).unwrap();

    assert_eq!(summary.main_photos, 1);
    assert_eq!(summary.archive_photos, 1);
    assert!(fx.out("Photos/a.jpg").is_file());
    assert!(fx.out("Archive/b.jpg").is_file());
}

#[test]
fn test_reorganize_reports_context_on_failure() {
    let fx = Fixture::without_archive();

    let cli = cli_for(&fx, &["--skip-metadata", "--no-progress"]);
    let mut config = Config::default();
    config.apply_cli(&cli);

    let err = reorganize(&cli, &config).unwrap_err();
    let message = format!("{err:#}");
    assert!(message.starts_with("Reorganization failed: failed to read directory"));
}

#[cfg(unix)]
#[test]
fn test_reorganize_runs_metadata_tool() {
    let fx = Fixture::new();
    fx.add("Photos from 2020/a.jpg", b"alpha");

    let cli = cli_for(&fx, &["--exiftool", "false", "--no-progress"]);
    let mut config = Config::default();
    config.apply_cli(&cli);

    let err = reorganize(&cli, &config).unwrap_err();
    assert!(format!("{err:#}").starts_with("Metadata post-processing failed: false failed on"));
    // Reorganization completed before the tool ran
    assert!(fx.out("Photos/a.jpg").is_file());
}

#[test]
fn test_custom_source_root_dir() {
    let fx = Fixture::new();
    let other_root = fx.source.path().join("Takeout Photos");
    fs::create_dir_all(other_root.join("Archive")).unwrap();
    fs::create_dir_all(other_root.join("Photos from 2022")).unwrap();
    fs::write(other_root.join("Photos from 2022/z.jpg"), b"zulu").unwrap();

    let cli = cli_for(&fx, &["--skip-metadata", "--no-progress"]);
    let mut config = Config {
        source_root_dir: "Takeout Photos".to_string(),
        ..Config::default()
    };
    config.apply_cli(&cli);

    reorganize(&cli, &config).unwrap();

    assert_eq!(fs::read(fx.out("Photos/z.jpg")).unwrap(), b"zulu");
}
