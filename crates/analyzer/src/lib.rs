//! logtally 분석 엔진
//!
//! 여러 형식이 섞인 라인 기반 로그 파일을 읽어 각 라인을 알려진 스키마로 분류하고,
//! 스키마별 통계를 누적한 뒤 요약을 JSON으로 저장합니다.
//!
//! # 모듈 구성
//!
//! - [`tokens`]: 라인의 `key=value` 토큰 추출
//! - [`classify`]: 스키마 분류 (Metric / Severity / Request / Unclassified)
//! - [`aggregator`]: 스키마별 집계기와 집계기 묶음
//! - [`summary`]: 최종 요약 타입
//! - [`collector`]: 입력 파일 라인 수집
//! - [`writer`]: 요약 파일 저장
//! - [`pipeline`]: 전체 흐름 오케스트레이션
//! - [`error`]: 도메인 에러 타입
//!
//! # 아키텍처
//!
//! ```text
//! LineCollector -> classify -> RawTokens -> Aggregator (metric|severity|request) -> summarize -> SummaryWriter
//!      |              |                          |                                   |
//!   file I/O    substring test           silent skip on bad field             apm/application/request.json
//! ```

pub mod aggregator;
pub mod classify;
pub mod collector;
pub mod error;
pub mod pipeline;
pub mod summary;
pub mod tokens;
pub mod writer;

// --- 주요 타입 re-export ---

// 파이프라인
pub use pipeline::{LogAnalyzer, LogAnalyzerBuilder, RunOutcome};

// 에러
pub use error::AnalyzerError;

// 분류 / 추출
pub use classify::{SchemaKind, classify};
pub use tokens::RawTokens;

// 집계기
pub use aggregator::{
    Aggregator, AggregatorSet, IngestStats, MetricAggregator, RecordOutcome, RequestAggregator,
    SchemaCounts, SeverityAggregator,
};

// 요약
pub use summary::{
    MetricStats, MetricSummary, RequestSummary, ResponseTimes, RouteStats, SeveritySummary,
    Summaries,
};

// 수집 / 저장
pub use collector::LineCollector;
pub use writer::{SummaryWriter, WriteReport};
