//! 요약 저장 -- 스키마별 요약을 JSON 파일로 기록
//!
//! 세 문서는 서로 독립적입니다. 한 파일의 저장이 실패해도 나머지 파일은 계속 시도하고,
//! 모든 시도가 끝난 뒤 실패 목록을 한꺼번에 보고합니다.

use std::path::{Path, PathBuf};

use logtally_core::config::OutputConfig;
use logtally_core::metrics as m;
use serde::Serialize;
use tracing::{error, info};

use crate::classify::SchemaKind;
use crate::error::AnalyzerError;
use crate::summary::Summaries;

/// 출력 디렉토리에 요약 파일을 씁니다.
#[derive(Debug, Clone)]
pub struct SummaryWriter {
    config: OutputConfig,
}

/// 저장 시도 결과
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WriteReport {
    /// 성공한 파일 경로 (시도 순서)
    pub written: Vec<PathBuf>,
    /// 실패한 파일별 메시지
    pub failures: Vec<String>,
}

impl WriteReport {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    /// 실패가 하나라도 있으면 [`AnalyzerError::OutputBatch`]로 바꿉니다.
    pub fn into_result(self) -> Result<Vec<PathBuf>, AnalyzerError> {
        if self.failures.is_empty() {
            return Ok(self.written);
        }
        Err(AnalyzerError::OutputBatch {
            attempted: self.written.len() + self.failures.len(),
            failures: self.failures,
        })
    }
}

impl SummaryWriter {
    pub fn new(config: OutputConfig) -> Self {
        Self { config }
    }

    /// 스키마의 출력 파일 경로
    pub fn path_for(&self, kind: SchemaKind) -> Option<PathBuf> {
        let file = match kind {
            SchemaKind::Metric => &self.config.metric_file,
            SchemaKind::Severity => &self.config.severity_file,
            SchemaKind::Request => &self.config.request_file,
            SchemaKind::Unclassified => return None,
        };
        Some(self.config.dir.join(file))
    }

    /// 세 요약을 모두 저장합니다.
    pub async fn write_all(&self, summaries: &Summaries) -> WriteReport {
        let mut report = WriteReport::default();

        for kind in SchemaKind::CLASSIFIED {
            let result = match kind {
                SchemaKind::Metric => self.write_one(kind, &summaries.metric).await,
                SchemaKind::Severity => self.write_one(kind, &summaries.severity).await,
                SchemaKind::Request => self.write_one(kind, &summaries.request).await,
                SchemaKind::Unclassified => continue,
            };

            match result {
                Ok(path) => {
                    info!(schema = %kind, path = %path.display(), "summary written");
                    metrics::counter!(m::SUMMARIES_WRITTEN_TOTAL, m::LABEL_RESULT => "success")
                        .increment(1);
                    report.written.push(path);
                }
                Err(e) => {
                    error!(schema = %kind, error = %e, "failed to write summary");
                    metrics::counter!(m::SUMMARIES_WRITTEN_TOTAL, m::LABEL_RESULT => "failure")
                        .increment(1);
                    report.failures.push(e.to_string());
                }
            }
        }

        report
    }

    /// 요약 하나를 직렬화하여 저장합니다.
    pub async fn write_one<T: Serialize>(
        &self,
        kind: SchemaKind,
        summary: &T,
    ) -> Result<PathBuf, AnalyzerError> {
        let path = self.path_for(kind).ok_or_else(|| AnalyzerError::Config {
            field: "output".to_owned(),
            reason: format!("no output file for schema '{}'", kind),
        })?;

        let body = if self.config.pretty {
            serde_json::to_vec_pretty(summary)?
        } else {
            serde_json::to_vec(summary)?
        };

        write_file(&self.config.dir, &path, &body)
            .await
            .map_err(|e| AnalyzerError::Output {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;
        Ok(path)
    }
}

async fn write_file(dir: &Path, path: &Path, body: &[u8]) -> std::io::Result<()> {
    tokio::fs::create_dir_all(dir).await?;
    tokio::fs::write(path, body).await
}
