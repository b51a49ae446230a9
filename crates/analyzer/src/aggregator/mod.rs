//! 스키마 집계기 -- 분류된 레코드를 스키마별 누적 상태로 접어 넣기
//!
//! 각 집계기는 [`Aggregator`] trait을 구현하며, 세 집계기는 서로 상태를 공유하지 않습니다.
//! [`AggregatorSet`]은 세 집계기와 실행 통계를 한 값으로 묶어 명시적으로 전달됩니다.
//!
//! # 병렬 처리
//! 워커마다 독립된 [`AggregatorSet`]을 만든 뒤 [`AggregatorSet::merge`]로 합치면
//! 순차 처리와 같은 요약을 얻습니다 (카운트는 합산, 관측값은 이어 붙임).
//!
//! # 사용 예시
//! ```
//! use logtally_analyzer::aggregator::AggregatorSet;
//!
//! let mut set = AggregatorSet::new();
//! set.ingest_line("metric=cpu value=0.5");
//! set.ingest_line("level=ERROR message=boom");
//! let summaries = set.summarize();
//! assert_eq!(summaries.severity["ERROR"], 1);
//! ```

pub mod metric;
pub mod request;
pub mod severity;

pub use metric::MetricAggregator;
pub use request::RequestAggregator;
pub use severity::SeverityAggregator;

use serde::Serialize;

use crate::classify::{SchemaKind, classify};
use crate::summary::Summaries;
use crate::tokens::RawTokens;

/// 레코드 하나를 기록한 결과
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordOutcome {
    /// 상태가 갱신됨
    Applied,
    /// 필드 누락 / 파싱 실패로 건너뜀 (부분 갱신 없음)
    Skipped,
}

/// 스키마 하나의 누적 상태를 관리하는 trait
pub trait Aggregator: Default {
    /// `summarize()`가 만드는 요약 타입
    type Summary;

    /// 이 집계기가 담당하는 스키마
    const KIND: SchemaKind;

    /// 분류된 라인의 토큰을 상태에 반영합니다.
    fn record(&mut self, tokens: &RawTokens<'_>) -> RecordOutcome;

    /// 현재 상태의 스냅샷으로 요약을 계산합니다. 상태는 변경하지 않습니다.
    fn summarize(&self) -> Self::Summary;

    /// 다른 워커의 상태를 뒤에 이어 붙입니다.
    fn merge(&mut self, other: Self);
}

/// 스키마 하나의 라인 카운트
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SchemaCounts {
    /// 이 스키마로 분류된 라인 수
    pub classified: u64,
    /// 분류됐지만 집계기에서 건너뛴 라인 수
    pub skipped: u64,
}

impl SchemaCounts {
    /// 실제로 반영된 라인 수
    pub fn applied(&self) -> u64 {
        self.classified - self.skipped
    }

    fn add(&mut self, other: SchemaCounts) {
        self.classified += other.classified;
        self.skipped += other.skipped;
    }
}

/// 한 번의 실행 동안의 라인 통계
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IngestStats {
    /// 입력된 전체 라인 수
    pub lines: u64,
    pub metric: SchemaCounts,
    pub severity: SchemaCounts,
    pub request: SchemaCounts,
    /// 어느 스키마에도 속하지 않은 라인 수 (초과 길이 라인 포함)
    pub unclassified: u64,
    /// 최대 길이를 넘어 분류 전에 버려진 라인 수
    pub oversized: u64,
}

impl IngestStats {
    /// 스키마별 카운트를 반환합니다. `Unclassified`는 `None`입니다.
    pub fn counts(&self, kind: SchemaKind) -> Option<&SchemaCounts> {
        match kind {
            SchemaKind::Metric => Some(&self.metric),
            SchemaKind::Severity => Some(&self.severity),
            SchemaKind::Request => Some(&self.request),
            SchemaKind::Unclassified => None,
        }
    }

    fn counts_mut(&mut self, kind: SchemaKind) -> Option<&mut SchemaCounts> {
        match kind {
            SchemaKind::Metric => Some(&mut self.metric),
            SchemaKind::Severity => Some(&mut self.severity),
            SchemaKind::Request => Some(&mut self.request),
            SchemaKind::Unclassified => None,
        }
    }

    fn merge(&mut self, other: IngestStats) {
        self.lines += other.lines;
        self.metric.add(other.metric);
        self.severity.add(other.severity);
        self.request.add(other.request);
        self.unclassified += other.unclassified;
        self.oversized += other.oversized;
    }
}

/// 세 집계기와 실행 통계 묶음
#[derive(Debug, Clone, Default)]
pub struct AggregatorSet {
    pub metric: MetricAggregator,
    pub severity: SeverityAggregator,
    pub request: RequestAggregator,
    stats: IngestStats,
}

impl AggregatorSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// 라인 하나를 분류하고 해당 집계기에 반영합니다.
    ///
    /// 분류 결과를 반환합니다. 분류되지 않은 라인은 어떤 집계기에도 반영되지 않습니다.
    pub fn ingest_line(&mut self, line: &str) -> SchemaKind {
        self.stats.lines += 1;

        let kind = classify(line);
        if kind == SchemaKind::Unclassified {
            self.stats.unclassified += 1;
            return kind;
        }

        let tokens = RawTokens::parse(line);
        match kind {
            SchemaKind::Metric => record_into(&mut self.metric, &mut self.stats, &tokens),
            SchemaKind::Severity => record_into(&mut self.severity, &mut self.stats, &tokens),
            SchemaKind::Request => record_into(&mut self.request, &mut self.stats, &tokens),
            SchemaKind::Unclassified => {}
        }
        kind
    }

    /// 분류하지 않고 초과 길이 라인으로 집계합니다.
    pub fn reject_oversized(&mut self) {
        self.stats.lines += 1;
        self.stats.unclassified += 1;
        self.stats.oversized += 1;
    }

    /// 다른 집계기 묶음을 이 묶음 뒤에 합칩니다.
    pub fn merge(&mut self, other: AggregatorSet) {
        self.metric.merge(other.metric);
        self.severity.merge(other.severity);
        self.request.merge(other.request);
        self.stats.merge(other.stats);
    }

    /// 세 요약을 계산합니다.
    pub fn summarize(&self) -> Summaries {
        Summaries {
            metric: self.metric.summarize(),
            severity: self.severity.summarize(),
            request: self.request.summarize(),
        }
    }

    pub fn stats(&self) -> &IngestStats {
        &self.stats
    }
}

/// 집계기에 레코드를 반영하고 그 집계기 스키마의 카운트를 갱신합니다.
fn record_into<A: Aggregator>(
    aggregator: &mut A,
    stats: &mut IngestStats,
    tokens: &RawTokens<'_>,
) {
    let outcome = aggregator.record(tokens);
    if let Some(counts) = stats.counts_mut(A::KIND) {
        counts.classified += 1;
        if outcome == RecordOutcome::Skipped {
            counts.skipped += 1;
        }
    }
}
