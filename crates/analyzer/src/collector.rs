//! 파일 기반 라인 수집기
//!
//! 입력 파일 전체를 원본 순서대로 라인 단위로 읽습니다.
//! 줄 끝의 `\n` / `\r\n`은 제거되며, 읽을 수 없는 파일이나 UTF-8이 아닌 내용은
//! 실행 전체를 실패시킵니다.

use std::path::{Path, PathBuf};

use tokio::fs::File;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::debug;

use crate::error::AnalyzerError;

/// 입력 파일 하나에서 라인을 수집합니다.
#[derive(Debug, Clone)]
pub struct LineCollector {
    path: PathBuf,
}

impl LineCollector {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 파일의 모든 라인을 읽습니다.
    pub async fn collect(&self) -> Result<Vec<String>, AnalyzerError> {
        let file = File::open(&self.path)
            .await
            .map_err(|e| self.collector_error(e))?;

        let lines = read_lines(BufReader::new(file))
            .await
            .map_err(|e| self.collector_error(e))?;

        debug!(path = %self.path.display(), lines = lines.len(), "input collected");
        Ok(lines)
    }

    fn collector_error(&self, err: std::io::Error) -> AnalyzerError {
        AnalyzerError::Collector {
            path: self.path.display().to_string(),
            reason: err.to_string(),
        }
    }
}

/// 임의의 비동기 리더에서 라인을 끝까지 읽습니다.
pub async fn read_lines<R>(reader: R) -> std::io::Result<Vec<String>>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    let mut out = Vec::new();
    while let Some(line) = lines.next_line().await? {
        out.push(line);
    }
    Ok(out)
}
