//! 메트릭 집계기 -- `metric=<name> value=<float>` 레코드의 관측값 누적

use std::collections::HashMap;

use super::{Aggregator, RecordOutcome};
use crate::classify::SchemaKind;
use crate::summary::{MetricStats, MetricSummary};
use crate::tokens::RawTokens;

/// 메트릭 이름별 관측값을 삽입 순서대로 보관합니다.
///
/// 이름은 첫 번째 성공한 기록에서만 생기므로 빈 시퀀스는 존재하지 않습니다.
#[derive(Debug, Clone, Default)]
pub struct MetricAggregator {
    observations: HashMap<String, Vec<f64>>,
}

impl MetricAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// 메트릭의 관측값 개수
    pub fn observation_count(&self, metric: &str) -> usize {
        self.observations.get(metric).map_or(0, Vec::len)
    }

    /// 집계 중인 메트릭 수
    pub fn metric_count(&self) -> usize {
        self.observations.len()
    }
}

impl Aggregator for MetricAggregator {
    type Summary = MetricSummary;

    const KIND: SchemaKind = SchemaKind::Metric;

    fn record(&mut self, tokens: &RawTokens<'_>) -> RecordOutcome {
        let Some(metric) = tokens.get("metric") else {
            return RecordOutcome::Skipped;
        };
        // NaN/inf는 JSON으로 표현할 수 없으므로 숫자가 아닌 값과 같이 취급
        let Some(value) = tokens
            .get("value")
            .and_then(|raw| raw.parse::<f64>().ok())
            .filter(|v| v.is_finite())
        else {
            return RecordOutcome::Skipped;
        };

        self.observations
            .entry(metric.to_owned())
            .or_default()
            .push(value);
        RecordOutcome::Applied
    }

    fn summarize(&self) -> MetricSummary {
        self.observations
            .iter()
            .filter_map(|(name, values)| Some((name.clone(), metric_stats(values)?)))
            .collect()
    }

    fn merge(&mut self, other: Self) {
        for (name, values) in other.observations {
            self.observations.entry(name).or_default().extend(values);
        }
    }
}

fn metric_stats(values: &[f64]) -> Option<MetricStats> {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let minimum = *sorted.first()?;
    let max = *sorted.last()?;
    let median = sorted[sorted.len() / 2];
    let average = sorted.iter().sum::<f64>() / sorted.len() as f64;

    Some(MetricStats {
        minimum,
        median,
        average,
        max,
    })
}
