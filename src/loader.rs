//! This module provides the `ProgramLoader` struct, responsible for loading Turing Machine
//! programs from `.tur` files, whole directories of them, or in-memory strings.

use crate::parser::parse;
use crate::types::{Program, TuringMachineError, MAX_PROGRAM_SIZE};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// The file extension of Turing Machine program files.
pub const PROGRAM_EXTENSION: &str = "tur";

/// `ProgramLoader` is a utility struct for loading Turing Machine programs.
pub struct ProgramLoader;

impl ProgramLoader {
    /// Loads a single Turing Machine program from the specified file path.
    ///
    /// Files larger than `MAX_PROGRAM_SIZE` are rejected before being read.
    ///
    /// # Returns
    ///
    /// * `Ok(Program)` if the file is successfully read and parsed into a `Program`.
    /// * `Err(TuringMachineError::FileError)` if the file cannot be read or is too large.
    /// * `Err(TuringMachineError::ParseError)` if the file content is not a valid program.
    pub fn load_program(path: &Path) -> Result<Program, TuringMachineError> {
        let metadata = fs::metadata(path).map_err(|e| file_error(path, e))?;
        if metadata.len() > MAX_PROGRAM_SIZE as u64 {
            return Err(TuringMachineError::FileError(format!(
                "File {} is too large: {} bytes (limit is {} bytes)",
                path.display(),
                metadata.len(),
                MAX_PROGRAM_SIZE
            )));
        }

        let content = fs::read_to_string(path).map_err(|e| file_error(path, e))?;
        let program = parse(&content)?;

        debug!(path = %path.display(), name = %program.name, "loaded program");

        Ok(program)
    }

    /// Loads a single Turing Machine program from the provided string content, e.g. from
    /// standard input.
    pub fn load_program_from_string(content: &str) -> Result<Program, TuringMachineError> {
        parse(content)
    }

    /// Loads every `.tur` file in `directory`, sorted by path.
    ///
    /// Sub-directories and files with other extensions are skipped. A file that fails to
    /// load yields an `Err` entry without aborting the others.
    pub fn load_programs(directory: &Path) -> Vec<Result<(PathBuf, Program), TuringMachineError>> {
        let entries = match fs::read_dir(directory) {
            Ok(entries) => entries,
            Err(e) => {
                return vec![Err(TuringMachineError::FileError(format!(
                    "Failed to read directory {}: {}",
                    directory.display(),
                    e
                )))]
            }
        };

        let mut paths = Vec::new();
        let mut results = Vec::new();

        for entry in entries {
            match entry {
                Ok(entry) => paths.push(entry.path()),
                Err(e) => results.push(Err(TuringMachineError::FileError(format!(
                    "Failed to read directory entry: {}",
                    e
                )))),
            }
        }

        paths.retain(|path| {
            path.is_file() && path.extension().is_some_and(|ext| ext == PROGRAM_EXTENSION)
        });
        paths.sort();

        results.extend(paths.into_iter().map(|path| {
            Self::load_program(&path)
                .map(|program| (path.clone(), program))
                .map_err(|e| {
                    warn!(path = %path.display(), error = %e, "skipping program");
                    TuringMachineError::FileError(format!(
                        "Failed to load program from {}: {}",
                        path.display(),
                        e
                    ))
                })
        }));

        results
    }
}

fn file_error(path: &Path, error: std::io::Error) -> TuringMachineError {
    TuringMachineError::FileError(format!("Failed to read file {}: {}", path.display(), error))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    const VALID: &str = "name: Valid Program\ntape: a\nrules:\n  start:\n    a -> b, R, stop\n  stop:";

    fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        let mut file = File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_load_valid_program() {
        let dir = tempdir().unwrap();
        let path = write_file(dir.path(), "test.tur", VALID);

        let program = ProgramLoader::load_program(&path).unwrap();
        assert_eq!(program.name, "Valid Program");
        assert_eq!(program.initial_tape(), "a");
        assert!(program.rules.has_state("start"));
        assert!(program.is_final("stop"));
    }

    #[test]
    fn test_load_invalid_program() {
        let dir = tempdir().unwrap();
        let path = write_file(dir.path(), "invalid.tur", "This is not a valid program");

        let result = ProgramLoader::load_program(&path);
        assert!(matches!(result, Err(TuringMachineError::ParseError(_))));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempdir().unwrap();

        let result = ProgramLoader::load_program(&dir.path().join("missing.tur"));
        assert!(matches!(result, Err(TuringMachineError::FileError(_))));
    }

    #[test]
    fn test_load_oversized_file() {
        let dir = tempdir().unwrap();
        let content = format!("{VALID}\n{}", "#".repeat(MAX_PROGRAM_SIZE));
        let path = write_file(dir.path(), "huge.tur", &content);

        let error = ProgramLoader::load_program(&path).unwrap_err();
        assert!(error.to_string().contains("too large"));
    }

    #[test]
    fn test_load_program_from_string() {
        let program = ProgramLoader::load_program_from_string(VALID).unwrap();
        assert_eq!(program.name, "Valid Program");
    }

    #[test]
    fn test_load_programs_from_directory() {
        let dir = tempdir().unwrap();

        write_file(dir.path(), "valid.tur", VALID);
        write_file(dir.path(), "invalid.tur", "This is not a valid program");
        write_file(dir.path(), "ignored.txt", "This file should be ignored");
        fs::create_dir(dir.path().join("nested.tur")).unwrap();

        let results = ProgramLoader::load_programs(dir.path());

        // Sorted by path: invalid.tur, valid.tur
        assert_eq!(results.len(), 2);
        assert!(results[0].is_err());

        let (path, program) = results[1].as_ref().unwrap();
        assert!(path.ends_with("valid.tur"));
        assert_eq!(program.name, "Valid Program");
    }

    #[test]
    fn test_load_programs_missing_directory() {
        let dir = tempdir().unwrap();

        let results = ProgramLoader::load_programs(&dir.path().join("nowhere"));
        assert_eq!(results.len(), 1);
        assert!(matches!(results[0], Err(TuringMachineError::FileError(_))));
    }
}
