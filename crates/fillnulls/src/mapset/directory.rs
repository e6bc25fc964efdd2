//! Mapset stored as a directory of JSON documents.
//!
//! Layout:
//!
//! ```text
//! <root>/region.json
//! <root>/cell/<name>.json     rasters (including MASK)
//! <root>/vector/<name>.json   point sets
//! ```
//!
//! Every write goes to a temporary file in the target directory first and
//! is then renamed into place, so readers never see a partial document.

use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use raster_common::{Grid, PointSet, RasterError, RasterResult, Region};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tempfile::NamedTempFile;
use tracing::debug;

use super::{validate_name, Mapset};

const REGION_FILE: &str = "region.json";
const RASTER_DIR: &str = "cell";
const POINTS_DIR: &str = "vector";
const EXTENSION: &str = "json";

/// Mapset backed by a directory on disk.
#[derive(Debug, Clone)]
pub struct DirectoryMapset {
    root: PathBuf,
    region: Region,
}

impl DirectoryMapset {
    /// Create a new mapset directory with the given region.
    ///
    /// Existing resources under `root` are kept; the region file is
    /// replaced.
    pub fn create(root: impl AsRef<Path>, region: Region) -> RasterResult<Self> {
        region.validate()?;
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(root.join(RASTER_DIR))?;
        fs::create_dir_all(root.join(POINTS_DIR))?;
        write_json(&root, &root.join(REGION_FILE), &region)?;
        debug!(root = %root.display(), "Created mapset");
        Ok(Self { root, region })
    }

    /// Open an existing mapset directory.
    pub fn open(root: impl AsRef<Path>) -> RasterResult<Self> {
        let root = root.as_ref().to_path_buf();
        let region_path = root.join(REGION_FILE);
        if !region_path.is_file() {
            return Err(RasterError::storage(format!(
                "{} is not a mapset (missing {})",
                root.display(),
                REGION_FILE
            )));
        }
        let region: Region = read_json(&region_path)?;
        region.validate()?;
        fs::create_dir_all(root.join(RASTER_DIR))?;
        fs::create_dir_all(root.join(POINTS_DIR))?;
        Ok(Self { root, region })
    }

    /// Root directory of the mapset.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn raster_path(&self, name: &str) -> PathBuf {
        self.root
            .join(RASTER_DIR)
            .join(format!("{}.{}", name, EXTENSION))
    }

    fn points_path(&self, name: &str) -> PathBuf {
        self.root
            .join(POINTS_DIR)
            .join(format!("{}.{}", name, EXTENSION))
    }
}

impl Mapset for DirectoryMapset {
    fn region(&self) -> Region {
        self.region
    }

    fn raster_exists(&self, name: &str) -> bool {
        validate_name(name).is_ok() && self.raster_path(name).is_file()
    }

    fn read_raster(&self, name: &str) -> RasterResult<Grid> {
        validate_name(name)?;
        let path = self.raster_path(name);
        if !path.is_file() {
            return Err(RasterError::RasterNotFound(name.to_string()));
        }
        let grid: Grid = read_json(&path)?;
        grid.ensure_same_region(&self.region)?;
        Ok(grid)
    }

    fn write_raster(&mut self, name: &str, grid: &Grid) -> RasterResult<()> {
        validate_name(name)?;
        grid.ensure_same_region(&self.region)?;
        grid.ensure_finite()?;
        write_json(&self.root.join(RASTER_DIR), &self.raster_path(name), grid)
    }

    fn rename_raster(&mut self, from: &str, to: &str) -> RasterResult<()> {
        validate_name(from)?;
        validate_name(to)?;
        let source = self.raster_path(from);
        let target = self.raster_path(to);
        if !source.is_file() {
            return Err(RasterError::RasterNotFound(from.to_string()));
        }
        if target.exists() {
            return Err(RasterError::AlreadyExists(to.to_string()));
        }
        fs::rename(&source, &target)?;
        Ok(())
    }

    fn remove_raster(&mut self, name: &str) -> RasterResult<bool> {
        validate_name(name)?;
        remove_file(&self.raster_path(name))
    }

    fn raster_names(&self) -> Vec<String> {
        list_names(&self.root.join(RASTER_DIR))
    }

    fn points_exist(&self, name: &str) -> bool {
        validate_name(name).is_ok() && self.points_path(name).is_file()
    }

    fn read_points(&self, name: &str) -> RasterResult<PointSet> {
        validate_name(name)?;
        let path = self.points_path(name);
        if !path.is_file() {
            return Err(RasterError::PointsNotFound(name.to_string()));
        }
        read_json(&path)
    }

    fn write_points(&mut self, name: &str, points: &PointSet) -> RasterResult<()> {
        validate_name(name)?;
        write_json(&self.root.join(POINTS_DIR), &self.points_path(name), points)
    }

    fn remove_points(&mut self, name: &str) -> RasterResult<bool> {
        validate_name(name)?;
        remove_file(&self.points_path(name))
    }

    fn point_names(&self) -> Vec<String> {
        list_names(&self.root.join(POINTS_DIR))
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> RasterResult<T> {
    let bytes = fs::read(path)?;
    Ok(serde_json::from_slice(&bytes)?)
}

fn write_json<T: Serialize>(dir: &Path, path: &Path, value: &T) -> RasterResult<()> {
    let mut file = NamedTempFile::new_in(dir)?;
    {
        let mut writer = BufWriter::new(file.as_file_mut());
        serde_json::to_writer(&mut writer, value)?;
        writer.flush()?;
    }
    file.persist(path).map_err(|e| {
        RasterError::storage(format!("failed to write {}: {}", path.display(), e.error))
    })?;
    Ok(())
}

fn remove_file(path: &Path) -> RasterResult<bool> {
    match fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e.into()),
    }
}

fn list_names(dir: &Path) -> Vec<String> {
    let Ok(entries) = fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut names: Vec<String> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.extension().and_then(|e| e.to_str()) == Some(EXTENSION))
        .filter_map(|path| path.file_stem().and_then(|s| s.to_str()).map(String::from))
        .collect();
    names.sort();
    names
}
