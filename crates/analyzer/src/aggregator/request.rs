//! 요청 집계기 -- 라우트별 응답 시간과 상태 코드 클래스
//!
//! 레코드 하나는 `request_url`, `response_time_ms`, `response_status`가
//! 모두 있고 정수로 파싱될 때만 반영됩니다. 하나라도 실패하면 라인 전체를 건너뜁니다.

use std::collections::{BTreeMap, HashMap};

use super::{Aggregator, RecordOutcome};
use crate::classify::SchemaKind;
use crate::summary::{RequestSummary, ResponseTimes, RouteStats, percentile};
use crate::tokens::RawTokens;

/// 라우트 하나의 누적 상태
#[derive(Debug, Clone, Default)]
struct RouteState {
    /// 삽입 순서대로의 응답 시간 (ms)
    response_times: Vec<i64>,
    status_codes: BTreeMap<String, u64>,
}

#[derive(Debug, Clone, Default)]
pub struct RequestAggregator {
    routes: HashMap<String, RouteState>,
}

impl RequestAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn route_count(&self) -> usize {
        self.routes.len()
    }

    /// 라우트의 응답 시간 관측값 개수
    pub fn observation_count(&self, url: &str) -> usize {
        self.routes.get(url).map_or(0, |r| r.response_times.len())
    }
}

/// 상태 코드를 클래스 레이블로 바꿉니다 (404 → `4XX`).
pub fn status_class(status: i64) -> String {
    format!("{}XX", status / 100)
}

impl Aggregator for RequestAggregator {
    type Summary = RequestSummary;

    const KIND: SchemaKind = SchemaKind::Request;

    fn record(&mut self, tokens: &RawTokens<'_>) -> RecordOutcome {
        let url = tokens.get("request_url").map(|raw| raw.replace('"', ""));
        let time = tokens
            .get("response_time_ms")
            .and_then(|raw| raw.parse::<i64>().ok());
        let status = tokens
            .get("response_status")
            .and_then(|raw| raw.parse::<i64>().ok());

        let (Some(url), Some(time), Some(status)) = (url, time, status) else {
            return RecordOutcome::Skipped;
        };

        let route = self.routes.entry(url).or_default();
        route.response_times.push(time);
        *route.status_codes.entry(status_class(status)).or_insert(0) += 1;
        RecordOutcome::Applied
    }

    fn summarize(&self) -> RequestSummary {
        self.routes
            .iter()
            .filter_map(|(url, route)| {
                let stats = RouteStats {
                    response_times: response_times(&route.response_times)?,
                    status_codes: route.status_codes.clone(),
                };
                Some((url.clone(), stats))
            })
            .collect()
    }

    fn merge(&mut self, other: Self) {
        for (url, theirs) in other.routes {
            let ours = self.routes.entry(url).or_default();
            ours.response_times.extend(theirs.response_times);
            for (class, count) in theirs.status_codes {
                *ours.status_codes.entry(class).or_insert(0) += count;
            }
        }
    }
}

fn response_times(values: &[i64]) -> Option<ResponseTimes> {
    let mut sorted = values.to_vec();
    sorted.sort_unstable();

    Some(ResponseTimes {
        min: *sorted.first()?,
        p50: percentile(&sorted, 50)?,
        p90: percentile(&sorted, 90)?,
        p95: percentile(&sorted, 95)?,
        p99: percentile(&sorted, 99)?,
        // 백분위 공식 대신 마지막 원소 (p=100이면 인덱스가 n이 됨)
        max: *sorted.last()?,
    })
}
