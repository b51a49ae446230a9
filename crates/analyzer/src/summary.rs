//! 요약 타입 -- 집계기 상태에서 계산된 최종 통계
//!
//! 모든 맵은 [`BTreeMap`]이므로 같은 입력에 대해 직렬화 결과가 바이트 단위로 동일합니다.
//! JSON 필드 이름은 출력 문서 형식 그대로입니다.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// 메트릭 하나의 통계
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricStats {
    pub minimum: f64,
    /// 정렬된 관측값의 `n/2` 번째 원소 (짝수 개일 때 상위 중앙값)
    pub median: f64,
    pub average: f64,
    pub max: f64,
}

/// 메트릭 이름 → 통계
pub type MetricSummary = BTreeMap<String, MetricStats>;

/// 심각도 레벨 → 발생 횟수
pub type SeveritySummary = BTreeMap<String, u64>;

/// 라우트 하나의 응답 시간 백분위 표
///
/// 필드 선언 순서가 곧 직렬화 순서입니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseTimes {
    pub min: i64,
    #[serde(rename = "50_percentile")]
    pub p50: i64,
    #[serde(rename = "90_percentile")]
    pub p90: i64,
    #[serde(rename = "95_percentile")]
    pub p95: i64,
    #[serde(rename = "99_percentile")]
    pub p99: i64,
    pub max: i64,
}

/// 라우트 하나의 요약
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteStats {
    pub response_times: ResponseTimes,
    /// 상태 코드 클래스 (`2XX`, `4XX` 등) → 횟수
    pub status_codes: BTreeMap<String, u64>,
}

/// 라우트 URL → 요약
pub type RequestSummary = BTreeMap<String, RouteStats>;

/// 한 번의 실행에서 만들어진 세 요약 묶음
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Summaries {
    pub metric: MetricSummary,
    pub severity: SeveritySummary,
    pub request: RequestSummary,
}

/// 정렬된 슬라이스에서 p 백분위 (0-100) 원소를 꺼냅니다.
///
/// 인덱스는 `floor(n * p / 100)`이며, 범위를 벗어나면 `None`입니다.
pub(crate) fn percentile<T: Copy>(sorted: &[T], p: usize) -> Option<T> {
    sorted.get(sorted.len() * p / 100).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentile_uses_floor_index() {
        let sorted: Vec<i64> = (1..=10).map(|v| v * 100).collect();
        assert_eq!(percentile(&sorted, 50), Some(600));
        assert_eq!(percentile(&sorted, 90), Some(1000));
        assert_eq!(percentile(&sorted, 99), Some(1000));
    }

    #[test]
    fn percentile_100_is_out_of_range() {
        assert_eq!(percentile(&[1, 2, 3], 100), None);
    }

    #[test]
    fn percentile_of_empty_is_none() {
        let empty: [i64; 0] = [];
        assert_eq!(percentile(&empty, 50), None);
    }

    #[test]
    fn response_times_serialize_in_fixed_order() {
        let times = ResponseTimes {
            min: 1,
            p50: 2,
            p90: 3,
            p95: 4,
            p99: 5,
            max: 6,
        };
        let json = serde_json::to_string(&times).unwrap();
        assert_eq!(
            json,
            r#"{"min":1,"50_percentile":2,"90_percentile":3,"95_percentile":4,"99_percentile":5,"max":6}"#
        );
    }

    #[test]
    fn metric_stats_field_names() {
        let stats = MetricStats {
            minimum: 1.0,
            median: 2.0,
            average: 2.0,
            max: 3.0,
        };
        let value = serde_json::to_value(stats).unwrap();
        for key in ["minimum", "median", "average", "max"] {
            assert!(value.get(key).is_some(), "missing {key}");
        }
    }
}
