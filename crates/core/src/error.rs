//! 에러 타입 -- 도메인별 에러 정의

/// logtally 최상위 에러 타입
#[derive(Debug, thiserror::Error)]
pub enum LogtallyError {
    /// 설정 관련 에러
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// 입력 수집 / 집계 실행 에러
    #[error("analysis error: {0}")]
    Analysis(String),

    /// 요약 저장 에러
    #[error("output error: {0}")]
    Output(String),

    /// I/O 에러
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// 설정 관련 에러
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// 설정 파일을 찾을 수 없음
    #[error("config file not found: {path}")]
    FileNotFound { path: String },

    /// 설정 파싱 실패
    #[error("failed to parse config: {reason}")]
    ParseFailed { reason: String },

    /// 유효하지 않은 설정 값
    #[error("invalid config value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}
