#![cfg(unix)]

mod common;

use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

use tempfile::tempdir;

use htmlshot::config::{ConfigFile, EngineSection};
use htmlshot::engine::{Engine, OutputFormat};
use htmlshot::errors::ConfigError;
use htmlshot::render::{execute, RenderRequest, RunStatus};

type TestResult = Result<(), Box<dyn Error>>;

fn config_for(root: &Path, tool_dir: &Path, engine: Engine, exe: PathBuf) -> ConfigFile {
    let mut cfg = ConfigFile::default();
    cfg.project.root = Some(root.to_path_buf());
    cfg.project.tool_dir = Some(tool_dir.to_path_buf());
    cfg.engine
        .insert(engine.name().to_string(), EngineSection { path: Some(exe) });
    cfg
}

fn request_for(engine: Engine, input: PathBuf, output: PathBuf) -> RenderRequest {
    RenderRequest {
        engines: vec![engine],
        formats: vec![OutputFormat::Svg],
        input: Some(input),
        output: Some(output),
        width: None,
        height: None,
        timeout_secs: None,
        test_simple: false,
    }
}

#[tokio::test]
async fn full_run_renders_every_input() -> TestResult {
    let dir = tempdir()?;
    let tool_dir = dir.path().join("tool");
    fs::create_dir_all(&tool_dir)?;
    let exe = common::write_script(dir.path(), "mini.sh", common::WRITE_OUTPUT_ENGINE);

    let pages = dir.path().join("pages");
    fs::create_dir_all(&pages)?;
    fs::write(pages.join("ze2e_alpha.html"), "<html></html>")?;
    fs::write(pages.join("ze2e_beta.html"), "<html></html>")?;
    fs::write(pages.join("skipped.txt"), "nope")?;

    let out = dir.path().join("out");
    let cfg = config_for(dir.path(), &tool_dir, Engine::Mini, exe);
    let request = request_for(Engine::Mini, pages, out.clone());

    let status = execute(&cfg, request).await?;

    assert_eq!(status, RunStatus::Success);
    assert_eq!(status.exit_code(), 0);
    assert!(out.join("ze2e_alpha-mini.svg").is_file());
    assert!(out.join("ze2e_beta-mini.svg").is_file());
    Ok(())
}

#[tokio::test]
async fn missing_engine_aborts_before_any_render() -> TestResult {
    let dir = tempdir()?;
    let tool_dir = dir.path().join("tool");
    fs::create_dir_all(&tool_dir)?;

    let pages = dir.path().join("pages");
    fs::create_dir_all(&pages)?;
    fs::write(pages.join("ze2e_page.html"), "<html></html>")?;

    let out = dir.path().join("out");
    let cfg = config_for(
        dir.path(),
        &tool_dir,
        Engine::Mini,
        dir.path().join("no-such-engine"),
    );
    let request = request_for(Engine::Mini, pages, out.clone());

    let err = execute(&cfg, request).await.unwrap_err();

    assert!(matches!(
        err.downcast_ref::<ConfigError>(),
        Some(ConfigError::EngineNotFound { .. })
    ));
    assert!(!out.exists(), "nothing may be rendered after a config error");
    Ok(())
}

#[tokio::test]
async fn zero_inputs_is_a_validation_failure() -> TestResult {
    let dir = tempdir()?;
    let tool_dir = dir.path().join("tool");
    fs::create_dir_all(&tool_dir)?;
    let exe = common::write_script(dir.path(), "mini.sh", common::WRITE_OUTPUT_ENGINE);

    let pages = dir.path().join("pages");
    fs::create_dir_all(&pages)?;
    fs::write(pages.join("readme.md"), "no html here")?;

    let cfg = config_for(dir.path(), &tool_dir, Engine::Mini, exe);
    let request = request_for(Engine::Mini, pages, dir.path().join("out"));

    let err = execute(&cfg, request).await.unwrap_err();

    assert!(matches!(
        err.downcast_ref::<ConfigError>(),
        Some(ConfigError::NoInputs { .. })
    ));
    Ok(())
}

#[tokio::test]
async fn silent_engine_turns_into_partial_failure() -> TestResult {
    let dir = tempdir()?;
    let tool_dir = dir.path().join("tool");
    fs::create_dir_all(&tool_dir)?;
    let exe = common::write_script(dir.path(), "mini.sh", common::SILENT_ENGINE);

    let pages = dir.path().join("pages");
    fs::create_dir_all(&pages)?;
    fs::write(pages.join("ze2e_ghost.html"), "<html></html>")?;

    let cfg = config_for(dir.path(), &tool_dir, Engine::Mini, exe);
    let request = request_for(Engine::Mini, pages, dir.path().join("out"));

    // Every subprocess exits 0, yet the run must still signal the missing
    // files through its exit code.
    let status = execute(&cfg, request).await?;

    assert_eq!(status, RunStatus::PartialFailure);
    assert_eq!(status.exit_code(), 2);
    Ok(())
}

#[tokio::test]
async fn test_simple_renders_a_generated_fixture() -> TestResult {
    let dir = tempdir()?;
    let tool_dir = dir.path().join("tool");
    fs::create_dir_all(&tool_dir)?;
    let exe = common::write_script(dir.path(), "mini.sh", common::WRITE_OUTPUT_ENGINE);

    let out = dir.path().join("out");
    let cfg = config_for(dir.path(), &tool_dir, Engine::Mini, exe);
    let request = RenderRequest {
        engines: vec![Engine::Mini],
        formats: vec![OutputFormat::Svg],
        input: None,
        output: Some(out.clone()),
        width: None,
        height: None,
        timeout_secs: None,
        test_simple: true,
    };

    let status = execute(&cfg, request).await?;

    assert_eq!(status, RunStatus::Success);
    assert!(tool_dir.join("simple_test.html").is_file());
    assert!(out.join("simple_test-mini.svg").is_file());
    Ok(())
}
