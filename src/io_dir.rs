use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

pub const INPUT_DIR_ENV_VAR: &str = "PERSONA_RANK_INPUT_DIR";
pub const OUTPUT_DIR_ENV_VAR: &str = "PERSONA_RANK_OUTPUT_DIR";

/// Container mount points, used when they exist.
const CONTAINER_INPUT_DIR: &str = "/app/input";
const CONTAINER_OUTPUT_DIR: &str = "/app/output";

pub const INPUT_FILE_NAME: &str = "input.json";
pub const RESULT_FILE_NAME: &str = "result.json";

#[derive(Debug, Clone)]
pub struct IoDirs {
    input: PathBuf,
    output: PathBuf,
}

impl IoDirs {
    /// Resolve the input and output directories from, in order of priority:
    /// 1. An explicit path (from --input-dir / --output-dir)
    /// 2. The PERSONA_RANK_INPUT_DIR / PERSONA_RANK_OUTPUT_DIR variables
    /// 3. /app/input and /app/output, if they exist
    /// 4. ./input and ./output
    ///
    /// Nothing is created on disk; see [`IoDirs::create_output`].
    pub fn resolve(input: Option<&Path>, output: Option<&Path>) -> Self {
        let input = pick(input, INPUT_DIR_ENV_VAR, CONTAINER_INPUT_DIR, "input");
        let output =
            pick(output, OUTPUT_DIR_ENV_VAR, CONTAINER_OUTPUT_DIR, "output");

        Self { input, output }
    }

    /// Create the output directory if missing.
    pub fn create_output(&self) -> Result<()> {
        std::fs::create_dir_all(&self.output)
            .map_err(|_| Error::Directory(self.output.clone()))
    }

    pub fn input(&self) -> &Path {
        &self.input
    }

    pub fn output(&self) -> &Path {
        &self.output
    }

    pub fn input_file(&self) -> PathBuf {
        self.input.join(INPUT_FILE_NAME)
    }

    pub fn result_file(&self) -> PathBuf {
        self.output.join(RESULT_FILE_NAME)
    }
}

fn pick(
    explicit: Option<&Path>,
    env_var: &str,
    container: &str,
    relative: &str,
) -> PathBuf {
    if let Some(path) = explicit {
        path.to_path_buf()
    } else if let Ok(val) = std::env::var(env_var) {
        PathBuf::from(val)
    } else if Path::new(container).exists() {
        PathBuf::from(container)
    } else {
        PathBuf::from(relative)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_paths_win() {
        let tmp = tempfile::tempdir().unwrap();
        let input = tmp.path().join("in");
        let output = tmp.path().join("out");

        let dirs = IoDirs::resolve(Some(input.as_path()), Some(output.as_path()));
        assert_eq!(dirs.input(), input);
        assert_eq!(dirs.output(), output);
    }

    #[test]
    fn resolve_does_not_touch_disk() {
        let tmp = tempfile::tempdir().unwrap();
        let output = tmp.path().join("out");

        IoDirs::resolve(Some(tmp.path()), Some(output.as_path()));
        assert!(!output.exists());
    }

    #[test]
    fn create_output_makes_nested_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let output = tmp.path().join("deep").join("out");

        let dirs = IoDirs::resolve(Some(tmp.path()), Some(output.as_path()));
        dirs.create_output().unwrap();
        assert!(output.is_dir());
    }

    #[test]
    fn create_output_over_a_file_fails() {
        let tmp = tempfile::tempdir().unwrap();
        let output = tmp.path().join("taken");
        std::fs::write(&output, "not a directory").unwrap();

        let dirs = IoDirs::resolve(Some(tmp.path()), Some(output.as_path()));
        assert!(matches!(dirs.create_output(), Err(Error::Directory(_))));
    }

    #[test]
    fn file_names() {
        let tmp = tempfile::tempdir().unwrap();
        let dirs = IoDirs::resolve(Some(tmp.path()), Some(tmp.path()));
        assert_eq!(dirs.input_file(), tmp.path().join("input.json"));
        assert_eq!(dirs.result_file(), tmp.path().join("result.json"));
    }
}
