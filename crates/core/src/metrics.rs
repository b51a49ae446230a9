//! 메트릭 상수
//!
//! 모든 메트릭의 이름과 레이블 키를 중앙에서 정의합니다.
//! 각 레이어는 이 상수를 사용하여 `metrics::counter!()` 매크로를 호출합니다.
//! 레코더를 설치하지 않으면 `metrics` 파사드는 아무 일도 하지 않습니다.
//!
//! # 네이밍 컨벤션
//!
//! - 접두어: `logtally_`
//! - 접미어: `_total` (counter)
//!
//! # 사용 예시
//!
//! ```ignore
//! use logtally_core::metrics as m;
//!
//! metrics::counter!(m::LINES_READ_TOTAL).increment(1);
//! ```

// ─── 레이블 키 상수 ────────────────────────────────────────────────

/// 스키마 레이블 키 (metric, severity, request, unclassified)
pub const LABEL_SCHEMA: &str = "schema";

/// 결과 레이블 키 (success, failure)
pub const LABEL_RESULT: &str = "result";

// ─── 입력 / 집계 메트릭 ────────────────────────────────────────────

/// 읽은 전체 라인 수 (counter)
pub const LINES_READ_TOTAL: &str = "logtally_lines_read_total";

/// 스키마로 분류된 라인 수 (counter, label: schema)
pub const LINES_CLASSIFIED_TOTAL: &str = "logtally_lines_classified_total";

/// 분류되지 않은 라인 수 (counter)
pub const LINES_UNCLASSIFIED_TOTAL: &str = "logtally_lines_unclassified_total";

/// 집계기에서 건너뛴 레코드 수 (counter, label: schema)
pub const RECORDS_SKIPPED_TOTAL: &str = "logtally_records_skipped_total";

// ─── 출력 메트릭 ────────────────────────────────────────────────────

/// 요약 파일 쓰기 시도 수 (counter, label: result)
pub const SUMMARIES_WRITTEN_TOTAL: &str = "logtally_summaries_written_total";

// ─── 설명 등록 함수 ─────────────────────────────────────────────────

/// 모든 메트릭의 설명(description)을 등록합니다.
///
/// 레코더가 설치되지 않았으면 아무 효과가 없습니다.
pub fn describe_all() {
    use metrics::describe_counter;

    describe_counter!(LINES_READ_TOTAL, "Total number of input lines read");
    describe_counter!(
        LINES_CLASSIFIED_TOTAL,
        "Lines matched to a record schema (metric, severity, request)"
    );
    describe_counter!(
        LINES_UNCLASSIFIED_TOTAL,
        "Lines that matched no record schema or exceeded the length limit"
    );
    describe_counter!(
        RECORDS_SKIPPED_TOTAL,
        "Classified lines dropped by their aggregator (missing or unparseable fields)"
    );
    describe_counter!(
        SUMMARIES_WRITTEN_TOTAL,
        "Summary documents persisted, labelled by result"
    );
}
