//! 설정 관리 -- logtally.toml 파싱 및 런타임 설정
//!
//! [`LogtallyConfig`]는 모든 레이어의 설정을 담는 최상위 구조체입니다.
//!
//! # 설정 로딩 우선순위
//! 1. CLI 인자 (최고 우선)
//! 2. 환경변수 (`LOGTALLY_OUTPUT_DIR=/tmp/out` 형식)
//! 3. 설정 파일 (`logtally.toml`)
//! 4. 기본값 (`Default` 구현)
//!
//! # 사용 예시
//! ```no_run
//! # async fn example() -> Result<(), logtally_core::error::LogtallyError> {
//! use logtally_core::config::LogtallyConfig;
//!
//! // 파일에서 로드 + 환경변수 오버라이드 + 검증
//! let config = LogtallyConfig::load("logtally.toml").await?;
//!
//! // 단계별 조립: 상위 우선순위 값을 모두 적용한 뒤 한 번만 검증
//! let mut config = LogtallyConfig::from_file("logtally.toml").await?;
//! let _ignored = config.apply_env_overrides();
//! config.ingest.workers = 4;
//! config.validate()?;
//!
//! // TOML 문자열에서 직접 파싱
//! let config = LogtallyConfig::parse("[general]\nlog_level = \"debug\"")?;
//! # Ok(())
//! # }
//! ```

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{ConfigError, LogtallyError};

/// 병렬 집계 워커 최대 수
pub const MAX_WORKERS: usize = 64;

/// logtally 통합 설정
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LogtallyConfig {
    /// 일반 설정
    #[serde(default)]
    pub general: GeneralConfig,
    /// 입력 처리 설정
    #[serde(default)]
    pub ingest: IngestConfig,
    /// 요약 출력 설정
    #[serde(default)]
    pub output: OutputConfig,
}

impl LogtallyConfig {
    /// TOML 파일에서 설정을 로드하고 환경변수 오버라이드를 적용한 뒤 검증합니다.
    ///
    /// 무시된 오버라이드는 `warn!`으로 기록됩니다. 더 높은 우선순위의 값을
    /// 덧씌워야 하는 호출자는 [`from_file`](Self::from_file),
    /// [`apply_env_overrides`](Self::apply_env_overrides), [`validate`](Self::validate)를
    /// 직접 조합합니다.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, LogtallyError> {
        let mut config = Self::from_file(path).await?;
        for ignored in config.apply_env_overrides() {
            warn!(
                env_key = ignored.key,
                value = ignored.value.as_str(),
                expected = ignored.expected,
                "ignoring unparseable env override"
            );
        }
        config.validate()?;
        Ok(config)
    }

    /// TOML 파일에서 설정을 로드합니다 (환경변수 오버라이드, 검증 없음).
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, LogtallyError> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                LogtallyError::Config(ConfigError::FileNotFound {
                    path: path.display().to_string(),
                })
            } else {
                LogtallyError::Io(e)
            }
        })?;
        Self::parse(&content)
    }

    /// TOML 문자열에서 설정을 파싱합니다.
    pub fn parse(toml_str: &str) -> Result<Self, LogtallyError> {
        toml::from_str(toml_str).map_err(|e| {
            LogtallyError::Config(ConfigError::ParseFailed {
                reason: e.to_string(),
            })
        })
    }

    /// 환경변수로 설정값을 오버라이드합니다.
    ///
    /// 환경변수 네이밍 규칙: `LOGTALLY_{SECTION}_{FIELD}`
    /// 예: `LOGTALLY_INGEST_WORKERS=4`
    ///
    /// 파싱할 수 없는 값은 적용하지 않고 반환 목록에 담습니다. 로깅 초기화 전에
    /// 호출될 수 있으므로 여기서는 기록하지 않습니다.
    pub fn apply_env_overrides(&mut self) -> Vec<IgnoredOverride> {
        let mut ignored = Vec::new();

        // General
        override_string(&mut self.general.log_level, "LOGTALLY_GENERAL_LOG_LEVEL");
        override_string(&mut self.general.log_format, "LOGTALLY_GENERAL_LOG_FORMAT");

        // Ingest
        override_usize(&mut self.ingest.workers, "LOGTALLY_INGEST_WORKERS", &mut ignored);
        override_opt_usize(
            &mut self.ingest.max_line_length,
            "LOGTALLY_INGEST_MAX_LINE_LENGTH",
            &mut ignored,
        );

        // Output
        override_path(&mut self.output.dir, "LOGTALLY_OUTPUT_DIR");
        override_bool(&mut self.output.pretty, "LOGTALLY_OUTPUT_PRETTY", &mut ignored);
        override_string(&mut self.output.metric_file, "LOGTALLY_OUTPUT_METRIC_FILE");
        override_string(
            &mut self.output.severity_file,
            "LOGTALLY_OUTPUT_SEVERITY_FILE",
        );
        override_string(&mut self.output.request_file, "LOGTALLY_OUTPUT_REQUEST_FILE");

        ignored
    }

    /// 설정값의 유효성을 검증합니다.
    pub fn validate(&self) -> Result<(), LogtallyError> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.general.log_level.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_level".to_owned(),
                reason: format!("must be one of: {}", valid_levels.join(", ")),
            }
            .into());
        }

        let valid_formats = ["json", "pretty"];
        if !valid_formats.contains(&self.general.log_format.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_format".to_owned(),
                reason: format!("must be one of: {}", valid_formats.join(", ")),
            }
            .into());
        }

        if self.ingest.workers == 0 || self.ingest.workers > MAX_WORKERS {
            return Err(ConfigError::InvalidValue {
                field: "ingest.workers".to_owned(),
                reason: format!("must be 1-{}", MAX_WORKERS),
            }
            .into());
        }

        if self.ingest.max_line_length == Some(0) {
            return Err(ConfigError::InvalidValue {
                field: "ingest.max_line_length".to_owned(),
                reason: "must be greater than 0".to_owned(),
            }
            .into());
        }

        // 출력 파일명은 디렉토리 구분자를 포함할 수 없음
        for (field, name) in [
            ("output.metric_file", &self.output.metric_file),
            ("output.severity_file", &self.output.severity_file),
            ("output.request_file", &self.output.request_file),
        ] {
            if name.is_empty() || name.contains('/') || name.contains('\\') {
                return Err(ConfigError::InvalidValue {
                    field: field.to_owned(),
                    reason: format!("'{}' must be a plain file name", name),
                }
                .into());
            }
        }

        Ok(())
    }
}

/// 일반 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// 로그 레벨 (trace, debug, info, warn, error)
    pub log_level: String,
    /// 로그 형식 (json, pretty)
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_owned(),
            log_format: "pretty".to_owned(),
        }
    }
}

/// 입력 처리 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    /// 집계 워커 수 (1이면 순차 처리)
    pub workers: usize,
    /// 최대 라인 길이 (바이트). 지정하면 초과 라인은 분류 전에 건너뜀, 기본은 제한 없음
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_line_length: Option<usize>,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            workers: 1,
            max_line_length: None,
        }
    }
}

/// 요약 출력 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// 요약 파일을 쓸 디렉토리
    pub dir: PathBuf,
    /// 들여쓰기된 JSON 출력 여부
    pub pretty: bool,
    /// 메트릭 요약 파일명
    pub metric_file: String,
    /// 심각도 요약 파일명
    pub severity_file: String,
    /// 요청 요약 파일명
    pub request_file: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("."),
            pretty: true,
            metric_file: "apm.json".to_owned(),
            severity_file: "application.json".to_owned(),
            request_file: "request.json".to_owned(),
        }
    }
}

/// 파싱에 실패해 적용되지 않은 환경변수 오버라이드
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IgnoredOverride {
    /// 환경변수 이름
    pub key: &'static str,
    /// 환경변수의 원래 값
    pub value: String,
    /// 기대한 타입
    pub expected: &'static str,
}

impl IgnoredOverride {
    fn new(key: &'static str, value: String, expected: &'static str) -> Self {
        Self {
            key,
            value,
            expected,
        }
    }
}

impl fmt::Display for IgnoredOverride {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}='{}' is not a valid {}", self.key, self.value, self.expected)
    }
}

// --- 환경변수 오버라이드 헬퍼 ---

fn override_string(target: &mut String, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        *target = val;
    }
}

fn override_path(target: &mut PathBuf, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        *target = PathBuf::from(val);
    }
}

fn override_bool(
    target: &mut bool,
    env_key: &'static str,
    ignored: &mut Vec<IgnoredOverride>,
) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<bool>() {
            Ok(parsed) => *target = parsed,
            Err(_) => ignored.push(IgnoredOverride::new(env_key, val, "bool")),
        }
    }
}

fn override_usize(
    target: &mut usize,
    env_key: &'static str,
    ignored: &mut Vec<IgnoredOverride>,
) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<usize>() {
            Ok(parsed) => *target = parsed,
            Err(_) => ignored.push(IgnoredOverride::new(env_key, val, "usize")),
        }
    }
}

fn override_opt_usize(
    target: &mut Option<usize>,
    env_key: &'static str,
    ignored: &mut Vec<IgnoredOverride>,
) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<usize>() {
            Ok(parsed) => *target = Some(parsed),
            Err(_) => ignored.push(IgnoredOverride::new(env_key, val, "usize")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn default_config_has_sane_values() {
        let config = LogtallyConfig::default();
        assert_eq!(config.general.log_level, "info");
        assert_eq!(config.general.log_format, "pretty");
        assert_eq!(config.ingest.workers, 1);
        assert_eq!(config.output.dir, PathBuf::from("."));
        assert_eq!(config.output.metric_file, "apm.json");
        assert_eq!(config.output.severity_file, "application.json");
        assert_eq!(config.output.request_file, "request.json");
    }

    #[test]
    fn default_config_passes_validation() {
        let config = LogtallyConfig::default();
        config.validate().unwrap();
    }

    #[test]
    fn from_str_empty_toml_uses_defaults() {
        let config = LogtallyConfig::parse("").unwrap();
        assert_eq!(config.general.log_level, "info");
        assert!(config.output.pretty);
    }

    #[test]
    fn from_str_partial_toml_merges_with_defaults() {
        let toml = r#"
[general]
log_level = "debug"

[ingest]
workers = 4
"#;
        let config = LogtallyConfig::parse(toml).unwrap();
        assert_eq!(config.general.log_level, "debug");
        // log_format은 기본값 유지
        assert_eq!(config.general.log_format, "pretty");
        assert_eq!(config.ingest.workers, 4);
        assert_eq!(config.ingest.max_line_length, None);
    }

    #[test]
    fn from_str_full_toml() {
        let toml = r#"
[general]
log_level = "warn"
log_format = "json"

[ingest]
workers = 8
max_line_length = 4096

[output]
dir = "/tmp/logtally"
pretty = false
metric_file = "metrics.json"
severity_file = "levels.json"
request_file = "routes.json"
"#;
        let config = LogtallyConfig::parse(toml).unwrap();
        assert_eq!(config.general.log_format, "json");
        assert_eq!(config.ingest.max_line_length, Some(4096));
        assert_eq!(config.output.dir, PathBuf::from("/tmp/logtally"));
        assert!(!config.output.pretty);
        assert_eq!(config.output.request_file, "routes.json");
    }

    #[test]
    fn from_str_invalid_toml_returns_error() {
        let result = LogtallyConfig::parse("invalid = [[[toml");
        let err = result.unwrap_err();
        assert!(matches!(
            err,
            LogtallyError::Config(ConfigError::ParseFailed { .. })
        ));
    }

    #[test]
    fn validate_rejects_invalid_log_level() {
        let mut config = LogtallyConfig::default();
        config.general.log_level = "verbose".to_owned();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("log_level"));
    }

    #[test]
    fn validate_rejects_invalid_log_format() {
        let mut config = LogtallyConfig::default();
        config.general.log_format = "xml".to_owned();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("log_format"));
    }

    #[test]
    fn validate_rejects_zero_workers() {
        let mut config = LogtallyConfig::default();
        config.ingest.workers = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("ingest.workers"));
    }

    #[test]
    fn validate_rejects_too_many_workers() {
        let mut config = LogtallyConfig::default();
        config.ingest.workers = MAX_WORKERS + 1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_line_length() {
        let mut config = LogtallyConfig::default();
        config.ingest.max_line_length = Some(0);
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("max_line_length"));
    }

    #[test]
    fn validate_rejects_output_file_with_separator() {
        let mut config = LogtallyConfig::default();
        config.output.request_file = "../request.json".to_owned();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("output.request_file"));
    }

    #[test]
    fn validate_rejects_empty_output_file() {
        let mut config = LogtallyConfig::default();
        config.output.metric_file = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    #[serial]
    fn env_override_string() {
        let mut val = "original".to_owned();
        // SAFETY: serial 테스트로 실행되므로 환경변수 조작이 안전합니다.
        unsafe { std::env::set_var("TEST_LOGTALLY_STR", "overridden") };
        override_string(&mut val, "TEST_LOGTALLY_STR");
        assert_eq!(val, "overridden");
        unsafe { std::env::remove_var("TEST_LOGTALLY_STR") };
    }

    #[test]
    #[serial]
    fn env_override_bool_invalid_keeps_original() {
        let mut val = true;
        // SAFETY: serial 테스트로 실행되므로 환경변수 조작이 안전합니다.
        unsafe { std::env::set_var("TEST_LOGTALLY_BOOL_BAD", "not-a-bool") };
        let mut ignored = Vec::new();
        override_bool(&mut val, "TEST_LOGTALLY_BOOL_BAD", &mut ignored);
        assert!(val); // 원래 값 유지
        assert_eq!(ignored.len(), 1);
        assert_eq!(ignored[0].value, "not-a-bool");
        unsafe { std::env::remove_var("TEST_LOGTALLY_BOOL_BAD") };
    }

    #[test]
    #[serial]
    fn env_override_usize_valid() {
        let mut val = 1usize;
        // SAFETY: serial 테스트로 실행되므로 환경변수 조작이 안전합니다.
        unsafe { std::env::set_var("TEST_LOGTALLY_USIZE", "12") };
        let mut ignored = Vec::new();
        override_usize(&mut val, "TEST_LOGTALLY_USIZE", &mut ignored);
        assert_eq!(val, 12);
        assert!(ignored.is_empty());
        unsafe { std::env::remove_var("TEST_LOGTALLY_USIZE") };
    }

    #[test]
    #[serial]
    fn apply_env_overrides_sets_fields() {
        // SAFETY: serial 테스트로 실행되므로 환경변수 조작이 안전합니다.
        unsafe { std::env::set_var("LOGTALLY_OUTPUT_DIR", "/tmp/logtally-env") };
        unsafe { std::env::set_var("LOGTALLY_INGEST_MAX_LINE_LENGTH", "2048") };
        let mut config = LogtallyConfig::default();
        let ignored = config.apply_env_overrides();
        unsafe { std::env::remove_var("LOGTALLY_OUTPUT_DIR") };
        unsafe { std::env::remove_var("LOGTALLY_INGEST_MAX_LINE_LENGTH") };

        assert!(ignored.is_empty());
        assert_eq!(config.output.dir, PathBuf::from("/tmp/logtally-env"));
        assert_eq!(config.ingest.max_line_length, Some(2048));
    }

    #[test]
    #[serial]
    fn apply_env_overrides_reports_unparseable_values() {
        // SAFETY: serial 테스트로 실행되므로 환경변수 조작이 안전합니다.
        unsafe { std::env::set_var("LOGTALLY_INGEST_WORKERS", "lots") };
        let mut config = LogtallyConfig::default();
        let ignored = config.apply_env_overrides();
        unsafe { std::env::remove_var("LOGTALLY_INGEST_WORKERS") };

        assert_eq!(config.ingest.workers, 1);
        assert_eq!(
            ignored,
            vec![IgnoredOverride::new("LOGTALLY_INGEST_WORKERS", "lots".to_owned(), "usize")]
        );
        assert!(ignored[0].to_string().contains("LOGTALLY_INGEST_WORKERS='lots'"));
    }

    #[test]
    fn line_length_limit_is_off_by_default() {
        let config = LogtallyConfig::default();
        assert_eq!(config.ingest.max_line_length, None);
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(!toml_str.contains("max_line_length"));
    }

    #[test]
    fn env_override_missing_var_keeps_original() {
        let mut val = "original".to_owned();
        override_string(&mut val, "TEST_LOGTALLY_NONEXISTENT_12345");
        assert_eq!(val, "original");
    }

    #[test]
    fn config_serialize_roundtrip() {
        let config = LogtallyConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed = LogtallyConfig::parse(&toml_str).unwrap();
        assert_eq!(config.output.dir, parsed.output.dir);
        assert_eq!(config.ingest.workers, parsed.ingest.workers);
    }

    #[tokio::test]
    async fn from_file_not_found() {
        let result = LogtallyConfig::from_file("/nonexistent/path/logtally.toml").await;
        let err = result.unwrap_err();
        assert!(matches!(
            err,
            LogtallyError::Config(ConfigError::FileNotFound { .. })
        ));
    }

    #[tokio::test]
    async fn from_file_does_not_validate() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logtally.toml");
        std::fs::write(&path, "[ingest]\nworkers = 100\n").unwrap();

        // 범위를 벗어난 값도 로드되며, 검증은 모든 오버라이드 이후에 수행
        let mut config = LogtallyConfig::from_file(&path).await.unwrap();
        assert!(config.validate().is_err());
        config.ingest.workers = 4;
        config.validate().unwrap();
    }

    #[tokio::test]
    async fn load_still_validates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logtally.toml");
        std::fs::write(&path, "[ingest]\nworkers = 100\n").unwrap();
        assert!(LogtallyConfig::load(&path).await.is_err());
    }

    #[tokio::test]
    async fn from_file_reads_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logtally.toml");
        std::fs::write(&path, "[ingest]\nworkers = 2\n").unwrap();
        let config = LogtallyConfig::from_file(&path).await.unwrap();
        assert_eq!(config.ingest.workers, 2);
    }
}
