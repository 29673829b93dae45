//! JSON Lines corpus store.
//!
//! Partition `i` lives in `part-{i:05}.jsonl` inside the store directory,
//! one serialized [`Document`] per line. Each write goes to a temporary
//! file that is renamed over the target once fully flushed.

use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::document::corpus::Partition;
use crate::document::document::Document;
use crate::error::{CuratorError, Result};
use crate::storage::{CorpusStore, STORAGE_STAGE};

const PART_PREFIX: &str = "part-";
const PART_SUFFIX: &str = ".jsonl";

/// Partitions stored as JSON Lines files in a directory.
#[derive(Debug, Clone)]
pub struct JsonlStore {
    directory: PathBuf,
}

impl JsonlStore {
    /// Open a store rooted at `directory`, creating the directory if needed.
    pub fn new<P: AsRef<Path>>(directory: P) -> Result<Self> {
        let directory = directory.as_ref().to_path_buf();
        fs::create_dir_all(&directory)?;
        Ok(JsonlStore { directory })
    }

    /// Get the store directory.
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Path of the file holding partition `index`.
    pub fn partition_path(&self, index: usize) -> PathBuf {
        self.directory
            .join(format!("{PART_PREFIX}{index:05}{PART_SUFFIX}"))
    }

    fn partition_index(file_name: &str) -> Option<usize> {
        file_name
            .strip_prefix(PART_PREFIX)?
            .strip_suffix(PART_SUFFIX)?
            .parse()
            .ok()
    }

    fn read_lines(&self, index: usize, path: &Path) -> Result<Vec<Document>> {
        let reader = BufReader::new(File::open(path)?);
        let mut documents = Vec::new();
        for (line_number, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let document = serde_json::from_str(&line).map_err(|e| {
                CuratorError::collaborator(
                    STORAGE_STAGE,
                    index,
                    format!("{}:{}: {e}", path.display(), line_number + 1),
                )
            })?;
            documents.push(document);
        }
        Ok(documents)
    }

    fn write_lines(path: &Path, partition: &Partition) -> Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        for document in partition.documents() {
            serde_json::to_writer(&mut writer, document)?;
            writer.write_all(b"\n")?;
        }
        let file = writer.into_inner().map_err(|e| e.into_error())?;
        file.sync_all()?;
        Ok(())
    }
}

impl CorpusStore for JsonlStore {
    /// One past the highest partition index present on disk.
    fn partition_count(&self) -> Result<usize> {
        let mut count = 0;
        for entry in fs::read_dir(&self.directory)? {
            let entry = entry?;
            if let Some(index) = entry.file_name().to_str().and_then(Self::partition_index) {
                count = count.max(index + 1);
            }
        }
        Ok(count)
    }

    fn read_partition(&self, index: usize) -> Result<Partition> {
        let path = self.partition_path(index);
        let documents = self.read_lines(index, &path).map_err(|e| match e {
            CuratorError::Collaborator { .. } => e,
            other => CuratorError::collaborator(STORAGE_STAGE, index, other.to_string()),
        })?;
        debug!(partition = index, documents = documents.len(), path = %path.display(), "read partition");
        Ok(Partition::new(documents))
    }

    fn write_partition(&self, index: usize, partition: &Partition) -> Result<()> {
        let path = self.partition_path(index);
        let temp_path = path.with_extension("jsonl.tmp");

        let written = Self::write_lines(&temp_path, partition)
            .and_then(|()| fs::rename(&temp_path, &path).map_err(CuratorError::from));
        if let Err(error) = written {
            let _ = fs::remove_file(&temp_path);
            return Err(CuratorError::collaborator(STORAGE_STAGE, index, error.to_string()));
        }

        debug!(partition = index, documents = partition.len(), path = %path.display(), "wrote partition");
        Ok(())
    }
}
