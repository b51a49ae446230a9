//! 스키마 분류기 -- 라인이 어떤 레코드 스키마에 속하는지 판별
//!
//! 분류는 원시 라인에 대한 부분 문자열 존재 검사입니다. 숫자 파싱이나
//! 토큰 추출 결과와는 무관하므로 `metric=cpu value=abc`도 [`SchemaKind::Metric`]으로
//! 분류되고, 이후 메트릭 집계기 안에서 조용히 버려집니다.
//!
//! # 판별 순서 (첫 번째 일치가 승리)
//! 1. `metric=` + `value=` → Metric
//! 2. `level=` + `message=` → Severity
//! 3. `request_method=` + `request_url=` → Request
//! 4. 그 외 → Unclassified

use std::fmt;

use serde::Serialize;

/// 레코드 스키마 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaKind {
    /// APM 메트릭 레코드
    Metric,
    /// 애플리케이션 로그 (심각도)
    Severity,
    /// HTTP 요청 레코드
    Request,
    /// 알려진 스키마와 일치하지 않음
    Unclassified,
}

impl SchemaKind {
    /// 집계 대상이 되는 스키마 (분류 순서)
    pub const CLASSIFIED: [SchemaKind; 3] =
        [SchemaKind::Metric, SchemaKind::Severity, SchemaKind::Request];

    /// 메트릭/로그 레이블용 이름
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Metric => "metric",
            Self::Severity => "severity",
            Self::Request => "request",
            Self::Unclassified => "unclassified",
        }
    }

    /// 이 스키마로 분류되기 위해 라인에 모두 있어야 하는 키 접두어
    fn required_markers(&self) -> &'static [&'static str] {
        match self {
            Self::Metric => &["metric=", "value="],
            Self::Severity => &["level=", "message="],
            Self::Request => &["request_method=", "request_url="],
            Self::Unclassified => &[],
        }
    }
}

impl fmt::Display for SchemaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 라인을 분류합니다.
///
/// 라인이 여러 스키마를 동시에 만족할 수 있으므로 판별 순서가 의미를 가집니다.
pub fn classify(line: &str) -> SchemaKind {
    SchemaKind::CLASSIFIED
        .into_iter()
        .find(|kind| {
            kind.required_markers()
                .iter()
                .all(|marker| line.contains(marker))
        })
        .unwrap_or(SchemaKind::Unclassified)
}
