// Tests for loading and saving the configuration file.
use quickplan::config::Config;
use quickplan::context::{AppContext, NoHomeDir, StandardContext, TestContext};
use std::fs;
use std::path::PathBuf;

#[derive(Debug)]
struct Homeless;

impl AppContext for Homeless {
    fn config_dir(&self) -> anyhow::Result<PathBuf> {
        Err(NoHomeDir.into())
    }

    fn log_dir(&self) -> anyhow::Result<PathBuf> {
        Err(NoHomeDir.into())
    }
}

#[test]
fn test_missing_file_is_reported_and_defaulted() {
    let ctx = TestContext::new();

    let err = Config::load(&ctx).unwrap_err();
    assert!(Config::is_missing_config_error(&err));

    let cfg = Config::load_or_default(&ctx).unwrap();
    assert_eq!(cfg, Config::default());
    assert_eq!(cfg.default_duration_mins, 60);
    assert_eq!(cfg.quick_add_note, "Created via Quick Add");
    assert_eq!(cfg.agenda_window_days, 7);
}

#[test]
fn test_save_then_load() {
    let ctx = TestContext::new();
    let cfg = Config {
        default_duration_mins: 45,
        log_level: "debug".to_string(),
        ..Config::default()
    };
    cfg.save(&ctx).unwrap();

    let loaded = Config::load(&ctx).unwrap();
    assert_eq!(loaded, cfg);
    assert_eq!(loaded.level_filter(), log::LevelFilter::Debug);
}

#[test]
fn test_partial_file_uses_field_defaults() {
    let ctx = TestContext::new();
    let path = ctx.config_file_path().unwrap();
    fs::write(&path, "quick_add_note = \"From the CLI\"\n").unwrap();

    let cfg = Config::load(&ctx).unwrap();
    assert_eq!(cfg.quick_add_note, "From the CLI");
    assert_eq!(cfg.default_duration_mins, 60);
    assert!(!cfg.log_to_file);
}

#[test]
fn test_malformed_file_is_an_error() {
    let ctx = TestContext::new();
    let path = ctx.config_file_path().unwrap();
    fs::write(&path, "default_duration_mins = \"soon\"\n").unwrap();

    let err = Config::load_or_default(&ctx).unwrap_err();
    assert!(!Config::is_missing_config_error(&err));
    assert!(err.to_string().contains("Failed to parse config file"));
}

#[test]
fn test_unknown_log_level_falls_back_to_info() {
    let cfg = Config {
        log_level: "chatty".to_string(),
        ..Config::default()
    };
    assert_eq!(cfg.level_filter(), log::LevelFilter::Info);
}

#[test]
fn test_loading_never_creates_directories() {
    let ctx = TestContext::new();
    let nested = StandardContext::new(Some(ctx.root.join("not").join("yet")));

    let cfg = Config::load_or_default(&nested).unwrap();
    assert_eq!(cfg, Config::default());
    assert!(!ctx.root.join("not").exists());

    cfg.save(&nested).unwrap();
    assert!(nested.config_file_path().unwrap().exists());
}

#[test]
fn test_no_home_falls_back_to_defaults() {
    assert!(Config::load_or_default(&Homeless).is_err());

    let (cfg, problem) = Config::load_or_fallback(&Homeless).unwrap();
    assert_eq!(cfg, Config::default());
    assert!(problem.unwrap().is::<NoHomeDir>());

    let ctx = TestContext::new();
    let (_, problem) = Config::load_or_fallback(&ctx).unwrap();
    assert!(problem.is_none());
}

#[test]
fn test_fallback_still_rejects_bad_files() {
    let ctx = TestContext::new();
    fs::write(ctx.config_file_path().unwrap(), "log_to_file = 3\n").unwrap();
    assert!(Config::load_or_fallback(&ctx).is_err());
}
