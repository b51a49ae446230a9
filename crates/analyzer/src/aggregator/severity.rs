//! 심각도 집계기 -- `level=` 값별 발생 횟수

use std::collections::BTreeMap;

use super::{Aggregator, RecordOutcome};
use crate::classify::SchemaKind;
use crate::summary::SeveritySummary;
use crate::tokens::RawTokens;

#[derive(Debug, Clone, Default)]
pub struct SeverityAggregator {
    counts: BTreeMap<String, u64>,
}

impl SeverityAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, level: &str) -> u64 {
        self.counts.get(level).copied().unwrap_or(0)
    }
}

impl Aggregator for SeverityAggregator {
    type Summary = SeveritySummary;

    const KIND: SchemaKind = SchemaKind::Severity;

    /// 라인의 모든 `level=` 토큰마다 한 번씩 증가시킵니다.
    fn record(&mut self, tokens: &RawTokens<'_>) -> RecordOutcome {
        let mut outcome = RecordOutcome::Skipped;
        for level in tokens.all("level") {
            *self.counts.entry(level.to_owned()).or_insert(0) += 1;
            outcome = RecordOutcome::Applied;
        }
        outcome
    }

    fn summarize(&self) -> SeveritySummary {
        self.counts.clone()
    }

    fn merge(&mut self, other: Self) {
        for (level, count) in other.counts {
            *self.counts.entry(level).or_insert(0) += count;
        }
    }
}
