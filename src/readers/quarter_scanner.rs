use crate::error::{ProcessingError, Result};
use crate::models::QuarterKey;
use crate::utils::constants::{city_for_code, CITY_FILE_SUFFIX};
use crate::utils::filename::{city_code_of, is_city_file_name};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// A `YYYY-qN` folder under the input directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuarterFolder {
    pub key: QuarterKey,
    pub path: PathBuf,
}

/// Outcome of resolving a transaction file's city code
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CityFile {
    Known { path: PathBuf, city: &'static str },
    Unknown { path: PathBuf },
}

impl CityFile {
    pub fn resolve(path: PathBuf) -> Self {
        match city_code_of(&path).and_then(city_for_code) {
            Some(city) => CityFile::Known { path, city },
            None => CityFile::Unknown { path },
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            CityFile::Known { path, .. } | CityFile::Unknown { path } => path,
        }
    }

    pub fn file_name(&self) -> String {
        self.path()
            .file_name()
            .map(|f| f.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

pub struct QuarterScanner {
    file_suffix: String,
}

impl QuarterScanner {
    pub fn new() -> Self {
        Self {
            file_suffix: CITY_FILE_SUFFIX.to_string(),
        }
    }

    /// Find quarter folders in chronological order.
    ///
    /// Entries whose name isn't `YYYY-qN` are ignored. Finding none at all
    /// is a configuration error.
    pub fn scan(&self, base_dir: &Path) -> Result<Vec<QuarterFolder>> {
        let mut folders = Vec::new();

        for entry in fs::read_dir(base_dir)? {
            let path = entry?.path();
            if !path.is_dir() {
                continue;
            }

            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };

            match QuarterKey::from_folder_name(name) {
                Ok(key) => folders.push(QuarterFolder { key, path }),
                Err(_) => debug!("Ignoring non-quarter folder: {}", path.display()),
            }
        }

        if folders.is_empty() {
            return Err(ProcessingError::Config(format!(
                "No quarter folders found under {} (expected like 2025-q4/)",
                base_dir.display()
            )));
        }

        folders.sort_by(|a, b| a.key.cmp(&b.key).then_with(|| a.path.cmp(&b.path)));
        Ok(folders)
    }

    /// Transaction files in a quarter folder, sorted by file name
    pub fn city_files(&self, quarter_dir: &Path) -> Result<Vec<CityFile>> {
        let mut paths = Vec::new();

        for entry in fs::read_dir(quarter_dir)? {
            let path = entry?.path();
            if !path.is_file() {
                continue;
            }

            let matches = path
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| is_city_file_name(n, &self.file_suffix));

            if matches {
                paths.push(path);
            }
        }

        paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
        Ok(paths.into_iter().map(CityFile::resolve).collect())
    }
}

impl Default for QuarterScanner {
    fn default() -> Self {
        Self::new()
    }
}
