//! 目錄式比賽結果儲存：每場比賽一個 `<id>.json`，ID 依序配發

use anyhow::{Context, Result};
use battle::domain::alias::MatchId;
use battle::error::SubmitError;
use battle::result::{MatchResult, ResultSink};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    /// 開啟（必要時建立）儲存目錄
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .with_context(|| format!("無法建立儲存目錄 {}", dir.display()))?;
        Ok(Self { dir })
    }

    pub fn path_of(&self, id: MatchId) -> PathBuf {
        self.dir.join(format!("{id}.json"))
    }

    /// 目錄中所有已儲存的比賽 ID（遞增）
    pub fn ids(&self) -> Result<Vec<MatchId>> {
        let entries = fs::read_dir(&self.dir)
            .with_context(|| format!("無法讀取儲存目錄 {}", self.dir.display()))?;
        let mut ids = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if path.extension().is_none_or(|ext| ext != "json") {
                continue;
            }
            // 非數字檔名不是本儲存端寫入的
            if let Some(id) = path
                .file_stem()
                .and_then(|stem| stem.to_str())
                .and_then(|stem| stem.parse::<MatchId>().ok())
            {
                ids.push(id);
            }
        }
        ids.sort_unstable();
        Ok(ids)
    }

    pub fn load(&self, id: MatchId) -> Result<MatchResult> {
        load_file(self.path_of(id))
    }

    pub fn load_all(&self) -> Result<Vec<(MatchId, MatchResult)>> {
        let mut results = Vec::new();
        for id in self.ids()? {
            results.push((id, self.load(id)?));
        }
        Ok(results)
    }
}

impl ResultSink for DirectorySink {
    fn submit(&mut self, result: &MatchResult) -> Result<MatchId, SubmitError> {
        let next = self
            .ids()
            .map_err(|e| SubmitError::Transport(format!("{e:#}")))?
            .last()
            .map_or(1, |last| last + 1);
        let json = result
            .to_json()
            .map_err(|e| SubmitError::Rejected(e.to_string()))?;
        let path = self.path_of(next);
        fs::write(&path, json)
            .map_err(|e| SubmitError::Transport(format!("寫入 {} 失敗: {e}", path.display())))?;
        Ok(next)
    }
}

/// 讀取單一比賽結果檔
pub fn load_file(path: impl AsRef<Path>) -> Result<MatchResult> {
    let path = path.as_ref();
    let content =
        fs::read_to_string(path).with_context(|| format!("無法讀取 {}", path.display()))?;
    MatchResult::from_json(&content).with_context(|| format!("解析 {} 失敗", path.display()))
}
