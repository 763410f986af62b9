use std::error::Error;
use std::fs;
use std::path::PathBuf;

use tempfile::tempdir;

use htmlshot::config::{load_and_validate, load_optional};
use htmlshot::engine::Engine;

type TestResult = Result<(), Box<dyn Error>>;

#[test]
fn missing_file_falls_back_to_defaults() -> TestResult {
    let dir = tempdir()?;
    let cfg = load_optional(dir.path().join("Htmlshot.toml"))?;

    assert_eq!(cfg.render.width, 2048);
    assert_eq!(cfg.render.height, 2048);
    assert_eq!(cfg.render.timeout_secs, 120);
    assert!(cfg.project.root.is_none());
    assert!(cfg.engine_path(Engine::Mini).is_none());
    Ok(())
}

#[test]
fn file_overrides_defaults() -> TestResult {
    let dir = tempdir()?;
    let path = dir.path().join("Htmlshot.toml");
    fs::write(
        &path,
        r#"
[project]
root = "/work/renderers"

[render]
width = 800

[engine.pro]
path = "/work/renderers/htmlshot-pro/build/htmlshot-pro"
"#,
    )?;

    let cfg = load_and_validate(&path)?;

    assert_eq!(cfg.project.root, Some(PathBuf::from("/work/renderers")));
    assert_eq!(cfg.render.width, 800);
    assert_eq!(cfg.render.height, 2048);
    assert_eq!(
        cfg.engine_path(Engine::Pro),
        Some(PathBuf::from(
            "/work/renderers/htmlshot-pro/build/htmlshot-pro"
        ))
    );
    assert!(cfg.engine_path(Engine::Mini).is_none());
    Ok(())
}

#[test]
fn unknown_engine_sections_are_rejected() -> TestResult {
    let dir = tempdir()?;
    let path = dir.path().join("Htmlshot.toml");
    fs::write(&path, "[engine.mega]\npath = \"/somewhere\"\n")?;

    let err = load_and_validate(&path).unwrap_err();
    assert!(format!("{err:#}").contains("unknown engine"));
    Ok(())
}

#[test]
fn zero_dimensions_are_rejected() -> TestResult {
    let dir = tempdir()?;
    let path = dir.path().join("Htmlshot.toml");
    fs::write(&path, "[render]\nwidth = 0\n")?;

    let err = load_and_validate(&path).unwrap_err();
    assert!(format!("{err:#}").contains("width"));
    Ok(())
}
