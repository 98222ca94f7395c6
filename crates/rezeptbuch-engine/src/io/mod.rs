use std::fs;
use std::path::{Path, PathBuf};

use relative_path::{RelativePath, RelativePathBuf};

use crate::models::{Recipe, RecipeCollection, Registry, User};

#[derive(Debug, thiserror::Error)]
pub enum IoError {
    #[error("File not found: {0}")]
    NotFound(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid corpus directory: {0}")]
    InvalidCorpusDir(String),
    #[error("Failed to parse {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
}

pub fn validate_corpus_dir(path: &Path) -> Result<(), IoError> {
    if !path.exists() || !path.is_dir() {
        return Err(IoError::InvalidCorpusDir(
            "Directory does not exist".to_string(),
        ));
    }

    Ok(())
}

/// Scan for recipe source files in the corpus directory.
///
/// Picks up `.md` and `.json` files, skips README files, and returns paths
/// relative to the corpus root in sorted order.
pub fn scan_corpus(corpus_root: &Path) -> Result<Vec<RelativePathBuf>, IoError> {
    if !corpus_root.exists() {
        return Err(IoError::InvalidCorpusDir(
            "corpus directory not found".to_string(),
        ));
    }

    let mut files = Vec::new();
    scan_directory_recursive(corpus_root, corpus_root, &mut files)?;
    files.sort();
    Ok(files)
}

fn scan_directory_recursive(
    dir: &Path,
    corpus_root: &Path,
    files: &mut Vec<RelativePathBuf>,
) -> Result<(), IoError> {
    let entries = fs::read_dir(dir).map_err(IoError::Io)?;

    for entry in entries {
        let entry = entry.map_err(IoError::Io)?;
        let path = entry.path();

        if path.is_dir() {
            scan_directory_recursive(&path, corpus_root, files)?;
            continue;
        }

        let extension = path
            .extension()
            .map(|ext| ext.to_string_lossy().to_lowercase());
        if !matches!(extension.as_deref(), Some("md") | Some("json")) {
            continue;
        }
        let name = entry.file_name().to_string_lossy().to_lowercase();
        if name.contains("readme") {
            continue;
        }

        if let Ok(relative) = path.strip_prefix(corpus_root) {
            files.push(RelativePathBuf::from_path(relative).unwrap_or_else(|_| {
                RelativePathBuf::from(relative.to_string_lossy().as_ref())
            }));
        }
    }

    Ok(())
}

/// Read a source file as text, stripping a UTF-8 BOM if present.
pub fn read_source(relative_path: &RelativePath, corpus_root: &Path) -> Result<String, IoError> {
    let absolute_path = relative_path.to_path(corpus_root);
    if !absolute_path.exists() {
        return Err(IoError::NotFound(absolute_path));
    }
    let content = fs::read_to_string(&absolute_path).map_err(IoError::Io)?;
    Ok(content
        .strip_prefix('\u{feff}')
        .map(str::to_string)
        .unwrap_or(content))
}

fn parse_json<T: serde::de::DeserializeOwned>(path: &Path, content: &str) -> Result<T, IoError> {
    serde_json::from_str(content).map_err(|source| IoError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Load a pre-structured recipe array (imported or hand-maintained JSON).
pub fn load_recipe_file(path: &Path) -> Result<Vec<Recipe>, IoError> {
    let content = fs::read_to_string(path).map_err(IoError::Io)?;
    parse_json(path, &content)
}

/// Load an emitted collection, e.g. for the standalone validation check.
/// A missing file is fatal here, unlike the registry.
pub fn load_collection(path: &Path) -> Result<RecipeCollection, IoError> {
    if !path.exists() {
        return Err(IoError::NotFound(path.to_path_buf()));
    }
    let content = fs::read_to_string(path).map_err(IoError::Io)?;
    parse_json(path, &content)
}

/// Write the collection with stable 2-space indentation for diffability.
pub fn write_collection(path: &Path, collection: &RecipeCollection) -> Result<(), IoError> {
    write_pretty_json(path, collection)
}

/// Write imported recipes as a single-recipe array file, matching the
/// hand-maintained corpus format.
pub fn write_recipe_file(path: &Path, recipes: &[Recipe]) -> Result<(), IoError> {
    write_pretty_json(path, &recipes)
}

/// Load the raw users array that the registry is built from.
pub fn load_users(path: &Path) -> Result<Vec<User>, IoError> {
    if !path.exists() {
        return Err(IoError::NotFound(path.to_path_buf()));
    }
    let content = fs::read_to_string(path).map_err(IoError::Io)?;
    parse_json(path, &content)
}

/// Load the name → user registry. Absence is not fatal: recipe processing
/// degrades to name-only resolution with an empty registry.
pub fn load_registry(path: &Path) -> Result<Registry, IoError> {
    if !path.exists() {
        return Ok(Registry::new());
    }
    let content = fs::read_to_string(path).map_err(IoError::Io)?;
    parse_json(path, &content)
}

pub fn write_registry(path: &Path, registry: &Registry) -> Result<(), IoError> {
    write_pretty_json(path, registry)
}

fn write_pretty_json<T: serde::Serialize>(path: &Path, value: &T) -> Result<(), IoError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(IoError::Io)?;
    }
    let json = serde_json::to_string_pretty(value).map_err(|source| IoError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    fs::write(path, json + "\n").map_err(IoError::Io)
}
