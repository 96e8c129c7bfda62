//! Input discovery: which files in a run directory belong to the asker and
//! which to participants.
//!
//! Step runs keep everything in one directory:
//!   steps_<anything>   the asker
//!   a, b, 1, ...       participants (single-character names)
//!
//! Cycle runs may split asker and peers across two directories; participants
//! there are named by number only.

use crate::Result;
use crate::error::AnalysisError;
use anyhow::Context;
use std::fs;
use std::path::{Path, PathBuf};

const ASKER_STEPS_PREFIX: &str = "steps_";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepDataset {
    pub asker: PathBuf,
    pub participants: Vec<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleDataset {
    pub asker: PathBuf,
    pub participants: Vec<PathBuf>,
    /// Directory the participants were taken from, for error reporting.
    pub peer_dir: PathBuf,
    pub total_cycles: usize,
}

impl StepDataset {
    pub fn discover(dir: &Path) -> Result<Self> {
        let names = file_names(dir)?;

        let asker = names
            .iter()
            .find(|n| n.starts_with(ASKER_STEPS_PREFIX))
            .ok_or_else(|| AnalysisError::NoAskerFile {
                dir: dir.to_path_buf(),
            })?;

        let participants = names
            .iter()
            .filter(|n| n.chars().count() == 1)
            .map(|n| dir.join(n))
            .collect();

        Ok(Self {
            asker: dir.join(asker),
            participants,
        })
    }
}

impl CycleDataset {
    pub fn discover(
        data_dir: &Path,
        peer_dir: &Path,
        asker_name: &str,
        total_cycles: usize,
    ) -> Result<Self> {
        if total_cycles == 0 {
            return Err(AnalysisError::InvalidCycleCount.into());
        }

        let participants = file_names(peer_dir)?
            .into_iter()
            .filter(|n| !n.is_empty() && n.bytes().all(|b| b.is_ascii_digit()))
            .map(|n| peer_dir.join(n))
            .collect();

        Ok(Self {
            asker: data_dir.join(asker_name),
            participants,
            peer_dir: peer_dir.to_path_buf(),
            total_cycles,
        })
    }
}

/// Sorted names of the regular files directly inside `dir`.
fn file_names(dir: &Path) -> Result<Vec<String>> {
    let mut names = Vec::new();
    let entries =
        fs::read_dir(dir).with_context(|| format!("read directory {}", dir.display()))?;
    for entry in entries {
        let entry = entry.with_context(|| format!("read directory {}", dir.display()))?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        match entry.file_name().into_string() {
            Ok(name) => names.push(name),
            Err(name) => tracing::debug!("skipping non-UTF-8 file name {:?}", name),
        }
    }
    names.sort();
    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn touch(dir: &Path, name: &str) {
        fs::write(dir.join(name), "").unwrap();
    }

    #[test]
    fn step_dataset_picks_asker_and_single_char_participants() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path();
        for name in ["b", "a", "steps_4_1.txt", "steps_9", "notes.txt", "12"] {
            touch(dir, name);
        }
        fs::create_dir(dir.join("c")).unwrap();

        let ds = StepDataset::discover(dir).unwrap();
        assert_eq!(ds.asker, dir.join("steps_4_1.txt"));
        assert_eq!(ds.participants, vec![dir.join("a"), dir.join("b")]);
    }

    #[test]
    fn step_dataset_without_asker_fails() {
        let tmp = tempfile::tempdir().unwrap();
        touch(tmp.path(), "a");
        let err = StepDataset::discover(tmp.path()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<AnalysisError>(),
            Some(AnalysisError::NoAskerFile { .. })
        ));
    }

    #[test]
    fn cycle_dataset_takes_numbered_peers() {
        let data = tempfile::tempdir().unwrap();
        let peers = tempfile::tempdir().unwrap();
        for name in ["1", "10", "2", "x", "run_4_1.txt"] {
            touch(peers.path(), name);
        }

        let ds = CycleDataset::discover(data.path(), peers.path(), "run_4_1.txt", 5).unwrap();
        assert_eq!(ds.asker, data.path().join("run_4_1.txt"));
        assert_eq!(
            ds.participants,
            vec![
                peers.path().join("1"),
                peers.path().join("10"),
                peers.path().join("2"),
            ]
        );
        assert_eq!(ds.total_cycles, 5);
    }

    #[test]
    fn zero_cycles_is_rejected() {
        let tmp = tempfile::tempdir().unwrap();
        let err = CycleDataset::discover(tmp.path(), tmp.path(), "run", 0).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<AnalysisError>(),
            Some(AnalysisError::InvalidCycleCount)
        ));
    }
}
