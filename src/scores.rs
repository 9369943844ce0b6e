//! Per-level score persistence: an append-only list of runs for each
//! difficulty, saved as JSON under the platform data directory.

use crate::world::Difficulty;
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Default, Serialize, Deserialize)]
struct ScoreTable {
    levels: BTreeMap<String, Vec<u32>>,
}

pub struct ScoreStore {
    path: PathBuf,
    table: ScoreTable,
}

impl ScoreStore {
    /// Load the store from `path`. A missing file is an empty store; an
    /// unreadable or corrupt file is fatal.
    pub fn open(path: PathBuf) -> Result<Self> {
        let table = if path.exists() {
            let text = fs::read_to_string(&path)
                .with_context(|| format!("reading score file {}", path.display()))?;
            serde_json::from_str(&text)
                .with_context(|| format!("parsing score file {}", path.display()))?
        } else {
            ScoreTable::default()
        };
        Ok(Self { path, table })
    }

    pub fn default_path() -> Result<PathBuf> {
        let proj = ProjectDirs::from("", "", "runner-tui")
            .context("no home directory for score storage")?;
        let dir = proj.data_local_dir();
        fs::create_dir_all(dir)
            .with_context(|| format!("creating score directory {}", dir.display()))?;
        Ok(dir.join("scores.json"))
    }

    /// Append unconditionally (no dedup, no cap) and persist. The per-level
    /// list is created lazily on first record.
    pub fn record(&mut self, level: Difficulty, score: u32) -> Result<()> {
        self.table
            .levels
            .entry(level.key().to_string())
            .or_default()
            .push(score);
        self.save()
    }

    /// Top `limit` scores for `level`, descending. Ties keep insertion
    /// order (stable sort), so an older run ranks above an equal newer one.
    pub fn top_scores(&self, level: Difficulty, limit: usize) -> Vec<u32> {
        let mut scores = self
            .table
            .levels
            .get(level.key())
            .cloned()
            .unwrap_or_default();
        scores.sort_by(|a, b| b.cmp(a));
        scores.truncate(limit);
        scores
    }

    fn save(&self) -> Result<()> {
        let tmp = self.path.with_extension("json.tmp");
        let data = serde_json::to_vec_pretty(&self.table)?;
        fs::write(&tmp, data)
            .with_context(|| format!("writing score file {}", tmp.display()))?;
        atomic_rename(&tmp, &self.path)?;
        Ok(())
    }
}

fn atomic_rename(from: &Path, to: &Path) -> Result<()> {
    fs::rename(from, to)
        .with_context(|| format!("renaming {} to {}", from.display(), to.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    static COUNTER: AtomicU32 = AtomicU32::new(0);

    fn temp_path() -> PathBuf {
        let n = COUNTER.fetch_add(1, Ordering::Relaxed);
        std::env::temp_dir().join(format!(
            "runner-tui-scores-{}-{}.json",
            std::process::id(),
            n
        ))
    }

    #[test]
    fn top_scores_sorted_descending_capped_at_limit() {
        let path = temp_path();
        let mut store = ScoreStore::open(path.clone()).unwrap();
        for score in [10, 50, 30, 20, 40] {
            store.record(Difficulty::Normal, score).unwrap();
        }
        assert_eq!(store.top_scores(Difficulty::Normal, 5), [50, 40, 30, 20, 10]);

        store.record(Difficulty::Normal, 60).unwrap();
        assert_eq!(store.top_scores(Difficulty::Normal, 5), [60, 50, 40, 30, 20]);
        fs::remove_file(path).ok();
    }

    #[test]
    fn levels_are_independent_and_lazily_created() {
        let path = temp_path();
        let mut store = ScoreStore::open(path.clone()).unwrap();
        assert!(store.top_scores(Difficulty::Expert, 5).is_empty());

        store.record(Difficulty::Beginner, 100).unwrap();
        assert_eq!(store.top_scores(Difficulty::Beginner, 5), [100]);
        assert!(store.top_scores(Difficulty::Expert, 5).is_empty());
        fs::remove_file(path).ok();
    }

    #[test]
    fn scores_survive_reopen() {
        let path = temp_path();
        {
            let mut store = ScoreStore::open(path.clone()).unwrap();
            store.record(Difficulty::Expert, 250).unwrap();
            store.record(Difficulty::Expert, 150).unwrap();
        }
        let store = ScoreStore::open(path.clone()).unwrap();
        assert_eq!(store.top_scores(Difficulty::Expert, 5), [250, 150]);
        fs::remove_file(path).ok();
    }

    #[test]
    fn duplicate_scores_all_recorded() {
        let path = temp_path();
        let mut store = ScoreStore::open(path.clone()).unwrap();
        for _ in 0..3 {
            store.record(Difficulty::Normal, 50).unwrap();
        }
        assert_eq!(store.top_scores(Difficulty::Normal, 5), [50, 50, 50]);
        assert_eq!(store.top_scores(Difficulty::Normal, 2).len(), 2);
        fs::remove_file(path).ok();
    }
}
