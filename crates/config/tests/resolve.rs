//! Configuration cascade against real files.

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tsql_config::{resolve_with, SearchPaths, CONFIG_FILE_NAME};
use tsql_test_utils::RecordingReporter;
use tsql_types::RuleSeverity;

fn write_config(dir: &Path, name: &str, severity: &str) -> anyhow::Result<PathBuf> {
    let path = dir.join(name);
    fs::write(
        &path,
        format!(r#"{{ "rules": {{ "missing-nolock": "{severity}" }} }}"#),
    )?;
    Ok(path)
}

struct Layout {
    _root: TempDir,
    env: PathBuf,
    current: PathBuf,
    program: PathBuf,
    home: PathBuf,
}

impl Layout {
    fn new() -> anyhow::Result<Self> {
        let root = tempfile::tempdir()?;
        let make = |name: &str| -> anyhow::Result<PathBuf> {
            let dir = root.path().join(name);
            fs::create_dir(&dir)?;
            Ok(dir)
        };
        Ok(Self {
            env: make("env")?,
            current: make("current")?,
            program: make("program")?,
            home: make("home")?,
            _root: root,
        })
    }

    fn search_paths(&self) -> SearchPaths {
        SearchPaths {
            env_path: Some(self.env.join("custom.json")),
            current_dir: Some(self.current.clone()),
            program_dir: Some(self.program.clone()),
            home_dir: Some(self.home.clone()),
        }
    }
}

#[test]
fn cascade_prefers_environment_variable() -> anyhow::Result<()> {
    let layout = Layout::new()?;
    let env_file = write_config(&layout.env, "custom.json", "error")?;
    write_config(&layout.current, CONFIG_FILE_NAME, "warning")?;
    write_config(&layout.home, CONFIG_FILE_NAME, "off")?;

    let reporter = RecordingReporter::new();
    let config = resolve_with(None, &layout.search_paths(), &reporter);
    assert_eq!(config.loaded_from(), Some(env_file.as_path()));
    assert_eq!(config.severity("missing-nolock"), RuleSeverity::Error);
    Ok(())
}

#[test]
fn cascade_falls_through_in_priority_order() -> anyhow::Result<()> {
    let layout = Layout::new()?;
    let program_file = write_config(&layout.program, CONFIG_FILE_NAME, "warning")?;
    let home_file = write_config(&layout.home, CONFIG_FILE_NAME, "error")?;
    let reporter = RecordingReporter::new();

    let config = resolve_with(None, &layout.search_paths(), &reporter);
    assert_eq!(config.loaded_from(), Some(program_file.as_path()));

    let current_file = write_config(&layout.current, CONFIG_FILE_NAME, "off")?;
    let config = resolve_with(None, &layout.search_paths(), &reporter);
    assert_eq!(config.loaded_from(), Some(current_file.as_path()));
    assert_eq!(config.severity("missing-nolock"), RuleSeverity::Off);

    fs::remove_file(&current_file)?;
    fs::remove_file(&program_file)?;
    let config = resolve_with(None, &layout.search_paths(), &reporter);
    assert_eq!(config.loaded_from(), Some(home_file.as_path()));

    assert!(reporter.messages().is_empty());
    Ok(())
}

#[test]
fn directory_named_like_config_is_skipped() -> anyhow::Result<()> {
    let layout = Layout::new()?;
    fs::create_dir(layout.current.join(CONFIG_FILE_NAME))?;
    let home_file = write_config(&layout.home, CONFIG_FILE_NAME, "error")?;

    let reporter = RecordingReporter::new();
    let config = resolve_with(None, &layout.search_paths(), &reporter);
    assert_eq!(config.loaded_from(), Some(home_file.as_path()));
    Ok(())
}

#[test]
fn explicit_path_wins_over_cascade() -> anyhow::Result<()> {
    let layout = Layout::new()?;
    write_config(&layout.current, CONFIG_FILE_NAME, "warning")?;
    let explicit = write_config(&layout.home, "team.json", "error")?;

    let reporter = RecordingReporter::new();
    let config = resolve_with(Some(&explicit), &layout.search_paths(), &reporter);
    assert_eq!(config.loaded_from(), Some(explicit.as_path()));
    assert_eq!(config.severity("missing-nolock"), RuleSeverity::Error);
    Ok(())
}

#[test]
fn missing_explicit_path_does_not_fall_back() -> anyhow::Result<()> {
    let layout = Layout::new()?;
    write_config(&layout.current, CONFIG_FILE_NAME, "warning")?;
    let missing = layout.home.join("missing.json");

    let reporter = RecordingReporter::new();
    let config = resolve_with(Some(&missing), &layout.search_paths(), &reporter);
    assert!(!config.is_loaded());
    assert_eq!(config.loaded_from(), None);
    assert_eq!(config.severity("missing-nolock"), RuleSeverity::Off);
    assert_eq!(
        reporter.messages(),
        vec![format!("Config file not found: {}", missing.display())]
    );
    Ok(())
}

#[test]
fn invalid_json_is_reported_once() -> anyhow::Result<()> {
    let layout = Layout::new()?;
    let path = layout.current.join(CONFIG_FILE_NAME);
    fs::write(&path, "{ \"rules\": { \"missing-nolock\": ")?;

    let reporter = RecordingReporter::new();
    let config = resolve_with(None, &layout.search_paths(), &reporter);
    assert!(!config.is_loaded());
    assert_eq!(config.rules().count(), 0);
    assert_eq!(reporter.count("Config file is not valid JSON."), 1);
    assert_eq!(reporter.messages().len(), 1);
    Ok(())
}
