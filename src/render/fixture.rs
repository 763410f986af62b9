// src/render/fixture.rs

//! Built-in single-page fixture used by `test` and `--test-simple`.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::info;

const FIXTURE_NAME: &str = "simple_test.html";

const FIXTURE_HTML: &str = r#"<!DOCTYPE html>
<html>
<head>
    <title>Simple Test</title>
    <style>
        body {
            font-family: Arial, sans-serif;
            margin: 20px;
            max-width: 100%;
            overflow-x: hidden;
        }
        h1 {
            color: blue;
        }
        p {
            color: black;
        }
    </style>
</head>
<body>
    <h1>Hello World</h1>
    <p>This is a simple test page for renderer smoke checks.</p>
</body>
</html>
"#;

/// Write the fixture into `dir` and return its path.
pub fn write_simple_fixture(dir: &Path) -> Result<PathBuf> {
    let path = dir.join(FIXTURE_NAME);
    fs::write(&path, FIXTURE_HTML)
        .with_context(|| format!("writing test fixture {}", path.display()))?;
    info!(path = %path.display(), "created simple test file");
    Ok(path)
}
