//! Loader for RON content files at startup.

use ron::Options;
use std::fs;
use std::path::Path;

use super::data::*;
use super::registry::LevelRegistry;
use crate::movement::MovementTuning;

/// Error type for content loading failures.
#[derive(Debug)]
pub struct ContentLoadError {
    pub file: String,
    pub message: String,
}

impl std::fmt::Display for ContentLoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Failed to load {}: {}", self.file, self.message)
    }
}

/// Create RON options with extensions enabled for more flexible parsing.
fn ron_options() -> Options {
    Options::default().with_default_extension(ron::extensions::Extensions::IMPLICIT_SOME)
}

fn read_file(path: &Path) -> Result<String, ContentLoadError> {
    fs::read_to_string(path).map_err(|e| ContentLoadError {
        file: path.display().to_string(),
        message: format!("IO error: {}", e),
    })
}

/// Parse a RON document of type `T`, attributing errors to `file`.
pub fn parse_ron<T>(file: &str, contents: &str) -> Result<T, ContentLoadError>
where
    T: for<'de> serde::Deserialize<'de>,
{
    ron_options()
        .from_str(contents)
        .map_err(|e| ContentLoadError {
            file: file.to_string(),
            message: format!("Parse error: {}", e),
        })
}

/// Load a RON file containing a DataFile<T> wrapper.
fn load_data_file<T>(path: &Path) -> Result<Vec<T>, ContentLoadError>
where
    T: for<'de> serde::Deserialize<'de>,
{
    let contents = read_file(path)?;
    let data: DataFile<T> = parse_ron(&path.display().to_string(), &contents)?;
    Ok(data.items)
}

/// Load a single RON struct (not wrapped in DataFile).
fn load_single_file<T>(path: &Path) -> Result<T, ContentLoadError>
where
    T: for<'de> serde::Deserialize<'de>,
{
    let contents = read_file(path)?;
    parse_ron(&path.display().to_string(), &contents)
}

/// Everything the game reads from assets/data at startup.
#[derive(Debug, Default)]
pub struct LoadedContent {
    pub tuning: TuningFile,
    pub levels: LevelRegistry,
}

/// Load tuning.ron and levels.ron.
///
/// Every file is attempted; missing pieces fall back to defaults and the
/// errors are returned alongside so the caller can report them.
pub fn load_all_content(base_path: &Path) -> (LoadedContent, Vec<ContentLoadError>) {
    let mut errors = Vec::new();

    let mut tuning = match load_single_file::<TuningFile>(&base_path.join("tuning.ron")) {
        Ok(tuning) => tuning,
        Err(e) => {
            errors.push(e);
            TuningFile::default()
        }
    };

    if let Err(reason) = tuning.movement.validate() {
        errors.push(ContentLoadError {
            file: "tuning.ron".to_string(),
            message: reason.to_string(),
        });
        tuning.movement = MovementTuning::default();
    }

    let mut levels = match load_data_file::<LevelDef>(&base_path.join("levels.ron")) {
        Ok(levels) => levels,
        Err(e) => {
            errors.push(e);
            Vec::new()
        }
    };
    if levels.is_empty() {
        levels.push(LevelDef::fallback());
    }

    (
        LoadedContent {
            tuning,
            levels: LevelRegistry::new(levels),
        },
        errors,
    )
}
