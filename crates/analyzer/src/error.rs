//! 분석기 에러 타입
//!
//! [`AnalyzerError`]는 입력 수집, 병렬 집계, 요약 저장 중 발생하는 에러를 표현합니다.
//! 개별 라인의 분류 실패나 필드 파싱 실패는 에러가 아니며 여기에 나타나지 않습니다.
//! `From<AnalyzerError> for LogtallyError` 변환이 구현되어 있어
//! 상위 레이어에서 `?` 연산자로 전파할 수 있습니다.

use logtally_core::error::LogtallyError;

/// 분석기 도메인 에러
#[derive(Debug, thiserror::Error)]
pub enum AnalyzerError {
    /// 입력 파일을 읽을 수 없음
    #[error("collector error: {path}: {reason}")]
    Collector {
        /// 입력 파일 경로
        path: String,
        /// 실패 사유
        reason: String,
    },

    /// 요약 파일 하나를 쓰지 못함
    #[error("output error: {path}: {reason}")]
    Output {
        /// 출력 파일 경로
        path: String,
        /// 실패 사유
        reason: String,
    },

    /// 하나 이상의 요약 파일 저장 실패 (모든 파일 시도 후 보고)
    #[error("failed to write {} of {} summaries: {}", .failures.len(), .attempted, .failures.join("; "))]
    OutputBatch {
        /// 시도한 파일 수
        attempted: usize,
        /// 파일별 실패 메시지
        failures: Vec<String>,
    },

    /// 설정 에러
    #[error("config error: {field}: {reason}")]
    Config {
        /// 설정 필드명
        field: String,
        /// 에러 사유
        reason: String,
    },

    /// 집계 워커 태스크 실패
    #[error("worker error: {0}")]
    Worker(String),

    /// JSON 직렬화 에러
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<AnalyzerError> for LogtallyError {
    fn from(err: AnalyzerError) -> Self {
        match err {
            AnalyzerError::Output { .. } | AnalyzerError::OutputBatch { .. } => {
                LogtallyError::Output(err.to_string())
            }
            other => LogtallyError::Analysis(other.to_string()),
        }
    }
}
