//! 분석 오케스트레이션 -- 수집/분류/집계/요약/저장의 전체 흐름
//!
//! # 내부 흐름
//! ```text
//! LineCollector -> [chunk] -> AggregatorSet (worker N) -> merge -> summarize -> SummaryWriter
//! ```
//!
//! `ingest.workers`가 1이면 한 번의 순차 패스로 처리합니다. 2 이상이면 라인을 연속된
//! 청크로 나누어 blocking 워커에서 집계하고, 청크 순서대로 병합하여 관측값 순서를
//! 순차 처리와 동일하게 유지합니다.

use std::ops::Range;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info};

use logtally_core::config::LogtallyConfig;
use logtally_core::metrics as m;

use crate::aggregator::{AggregatorSet, IngestStats};
use crate::classify::SchemaKind;
use crate::collector::LineCollector;
use crate::error::AnalyzerError;
use crate::summary::Summaries;
use crate::writer::{SummaryWriter, WriteReport};

/// 한 번의 실행 결과
#[derive(Debug, Clone, Serialize)]
pub struct RunOutcome {
    /// 입력 파일 경로
    pub input: PathBuf,
    /// 라인 통계
    pub stats: IngestStats,
    /// 계산된 요약
    #[serde(skip)]
    pub summaries: Summaries,
    /// 저장 결과
    pub report: WriteReport,
}

/// 로그 분석기
///
/// # 사용 예시
/// ```no_run
/// # async fn example() -> Result<(), logtally_analyzer::AnalyzerError> {
/// use logtally_analyzer::LogAnalyzerBuilder;
///
/// let analyzer = LogAnalyzerBuilder::new().build()?;
/// let outcome = analyzer.run("input.log").await?;
/// println!("{} lines", outcome.stats.lines);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct LogAnalyzer {
    config: LogtallyConfig,
    writer: SummaryWriter,
}

impl LogAnalyzer {
    pub fn config(&self) -> &LogtallyConfig {
        &self.config
    }

    /// 라인을 한 번의 순차 패스로 집계합니다.
    pub fn aggregate<S: AsRef<str>>(&self, lines: &[S]) -> AggregatorSet {
        fold_lines(lines, self.config.ingest.max_line_length)
    }

    /// 설정된 워커 수로 라인을 집계합니다.
    pub async fn aggregate_parallel(
        &self,
        lines: Vec<String>,
    ) -> Result<AggregatorSet, AnalyzerError> {
        let workers = self.config.ingest.workers;
        if workers <= 1 || lines.len() < 2 {
            return Ok(self.aggregate(&lines));
        }

        let max_line_length = self.config.ingest.max_line_length;
        let shared = Arc::new(lines);
        let mut handles = Vec::with_capacity(workers);
        for range in chunk_ranges(shared.len(), workers) {
            let lines = Arc::clone(&shared);
            debug!(start = range.start, end = range.end, "spawning aggregation worker");
            handles.push(tokio::task::spawn_blocking(move || {
                fold_lines(&lines[range], max_line_length)
            }));
        }

        let mut merged = AggregatorSet::new();
        for handle in handles {
            let part = handle
                .await
                .map_err(|e| AnalyzerError::Worker(format!("spawn_blocking failed: {e}")))?;
            merged.merge(part);
        }
        Ok(merged)
    }

    /// 입력 파일 하나를 끝까지 처리하고 요약을 저장합니다.
    ///
    /// 입력을 읽지 못하면 에러를 반환합니다. 요약 저장 실패는 에러가 아니라
    /// [`RunOutcome::report`]에 기록되며, 모든 파일 저장을 시도한 뒤 반환됩니다.
    pub async fn run(&self, input: impl AsRef<Path>) -> Result<RunOutcome, AnalyzerError> {
        let input = input.as_ref();
        info!(path = %input.display(), workers = self.config.ingest.workers, "analysis starting");

        let lines = LineCollector::new(input).collect().await?;
        let set = self.aggregate_parallel(lines).await?;
        let stats = *set.stats();
        let summaries = set.summarize();

        record_metrics(&stats);
        info!(
            lines = stats.lines,
            metric = stats.metric.applied(),
            severity = stats.severity.applied(),
            request = stats.request.applied(),
            unclassified = stats.unclassified,
            "aggregation complete"
        );

        let report = self.writer.write_all(&summaries).await;

        Ok(RunOutcome {
            input: input.to_path_buf(),
            stats,
            summaries,
            report,
        })
    }
}

/// [`LogAnalyzer`] 빌더
pub struct LogAnalyzerBuilder {
    config: LogtallyConfig,
}

impl LogAnalyzerBuilder {
    pub fn new() -> Self {
        Self {
            config: LogtallyConfig::default(),
        }
    }

    pub fn config(mut self, config: LogtallyConfig) -> Self {
        self.config = config;
        self
    }

    /// 출력 디렉토리를 덮어씁니다.
    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.output.dir = dir.into();
        self
    }

    /// 집계 워커 수를 덮어씁니다.
    pub fn workers(mut self, workers: usize) -> Self {
        self.config.ingest.workers = workers;
        self
    }

    /// 설정을 검증하고 분석기를 만듭니다.
    pub fn build(self) -> Result<LogAnalyzer, AnalyzerError> {
        self.config
            .validate()
            .map_err(|e| AnalyzerError::Config {
                field: "logtally".to_owned(),
                reason: e.to_string(),
            })?;

        let writer = SummaryWriter::new(self.config.output.clone());
        Ok(LogAnalyzer {
            config: self.config,
            writer,
        })
    }
}

impl Default for LogAnalyzerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn fold_lines<S: AsRef<str>>(lines: &[S], max_line_length: Option<usize>) -> AggregatorSet {
    let mut set = AggregatorSet::new();
    for line in lines {
        let line = line.as_ref();
        match max_line_length {
            Some(limit) if line.len() > limit => set.reject_oversized(),
            _ => {
                set.ingest_line(line);
            }
        }
    }
    set
}

/// `len`개를 최대 `workers`개의 연속 구간으로 나눕니다.
fn chunk_ranges(len: usize, workers: usize) -> Vec<Range<usize>> {
    if len == 0 || workers == 0 {
        return Vec::new();
    }
    let size = len.div_ceil(workers);
    (0..len)
        .step_by(size)
        .map(|start| start..(start + size).min(len))
        .collect()
}

fn record_metrics(stats: &IngestStats) {
    metrics::counter!(m::LINES_READ_TOTAL).increment(stats.lines);
    metrics::counter!(m::LINES_UNCLASSIFIED_TOTAL).increment(stats.unclassified);

    for kind in SchemaKind::CLASSIFIED {
        if let Some(counts) = stats.counts(kind) {
            metrics::counter!(m::LINES_CLASSIFIED_TOTAL, m::LABEL_SCHEMA => kind.as_str())
                .increment(counts.classified);
            metrics::counter!(m::RECORDS_SKIPPED_TOTAL, m::LABEL_SCHEMA => kind.as_str())
                .increment(counts.skipped);
        }
    }
}
