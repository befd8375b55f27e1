//! 설정 관리 -- JSON 설정 파일 파싱 및 런타임 설정
//!
//! [`SpyConfig`]는 일반 설정과 채널 설정 목록을 담는 최상위 구조체입니다.
//! 채널 설정은 [`ChannelSettings`] 형태의 "원시" 값으로 보관되며,
//! 정규식 컴파일과 의미 검증은 파이프라인 크레이트가 담당합니다.
//!
//! # 파일 형식
//! 두 가지 형태를 모두 허용합니다.
//!
//! ```json
//! [ { "comPort": "/dev/ttyUSB0", "openOptions": { ... }, ... } ]
//! ```
//!
//! ```json
//! { "general": { "text_log": "spy.log" }, "channels": [ ... ] }
//! ```
//!
//! # 설정 로딩 우선순위
//! 1. CLI 인자 (최고 우선)
//! 2. 환경변수 (`SERIAL_SPY_GENERAL_TEXT_LOG=spy.log` 형식)
//! 3. 설정 파일
//! 4. 기본값 (`Default` 구현)

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{ConfigError, SpyError};

/// serial-spy 통합 설정
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SpyConfig {
    /// 일반 설정
    #[serde(default)]
    pub general: GeneralConfig,
    /// 채널 설정 목록 (순서가 채널 인덱스가 됨)
    #[serde(default)]
    pub channels: Vec<ChannelSettings>,
}

impl SpyConfig {
    /// JSON 파일에서 설정을 로드하고 환경변수 오버라이드를 적용합니다.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, SpyError> {
        let mut config = Self::from_file(path).await?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// JSON 파일에서 설정을 로드합니다 (환경변수 오버라이드 없음).
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, SpyError> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                SpyError::Config(ConfigError::FileNotFound {
                    path: path.display().to_string(),
                })
            } else {
                SpyError::Io(e)
            }
        })?;
        Self::parse(&content)
    }

    /// JSON 문자열에서 설정을 파싱합니다.
    ///
    /// 최상위가 배열이면 채널 목록으로, 객체이면 `general` + `channels`로 해석합니다.
    pub fn parse(json: &str) -> Result<Self, SpyError> {
        let value: serde_json::Value = serde_json::from_str(json).map_err(parse_failed)?;
        let config = match value {
            serde_json::Value::Array(_) => Self {
                general: GeneralConfig::default(),
                channels: serde_json::from_value(value).map_err(parse_failed)?,
            },
            serde_json::Value::Object(_) => serde_json::from_value(value).map_err(parse_failed)?,
            _ => {
                return Err(ConfigError::ParseFailed {
                    reason: "top-level value must be an array of channels or an object"
                        .to_owned(),
                }
                .into());
            }
        };
        Ok(config)
    }

    /// 환경변수로 일반 설정값을 오버라이드합니다.
    ///
    /// 환경변수 네이밍 규칙: `SERIAL_SPY_GENERAL_{FIELD}`
    pub fn apply_env_overrides(&mut self) {
        override_string(&mut self.general.log_level, "SERIAL_SPY_GENERAL_LOG_LEVEL");
        override_string(
            &mut self.general.log_format,
            "SERIAL_SPY_GENERAL_LOG_FORMAT",
        );
        override_path(&mut self.general.text_log, "SERIAL_SPY_GENERAL_TEXT_LOG");
        override_path(&mut self.general.html_log, "SERIAL_SPY_GENERAL_HTML_LOG");
        override_string(&mut self.general.title, "SERIAL_SPY_GENERAL_TITLE");
    }

    /// 일반 설정값의 유효성을 검증합니다.
    ///
    /// 채널 설정은 여기서 검증하지 않습니다 (파이프라인 컴파일 단계 담당).
    pub fn validate(&self) -> Result<(), SpyError> {
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

        if let (Some(text), Some(html)) = (&self.general.text_log, &self.general.html_log)
            && text == html
        {
            return Err(ConfigError::InvalidValue {
                field: "general.html_log".to_owned(),
                reason: "text and HTML logs must be different files".to_owned(),
            }
            .into());
        }

        Ok(())
    }
}

fn parse_failed(e: serde_json::Error) -> SpyError {
    SpyError::Config(ConfigError::ParseFailed {
        reason: e.to_string(),
    })
}

/// 일반 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// 진단 로그 레벨 (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// 진단 로그 형식 (json, pretty)
    #[serde(default = "default_log_format")]
    pub log_format: String,
    /// 텍스트 로그 파일 경로 (없으면 텍스트 싱크 비활성)
    #[serde(default)]
    pub text_log: Option<PathBuf>,
    /// HTML 로그 파일 경로 (없으면 HTML 싱크 비활성)
    #[serde(default)]
    pub html_log: Option<PathBuf>,
    /// HTML 문서 제목 및 배너
    #[serde(default = "default_title")]
    pub title: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: default_log_format(),
            text_log: None,
            html_log: None,
            title: default_title(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_owned()
}

fn default_log_format() -> String {
    "pretty".to_owned()
}

fn default_title() -> String {
    "serial-spy".to_owned()
}

/// 채널 하나의 원시 설정 (JSON 그대로)
///
/// 모든 필드가 `Option`인 이유는 누락 키를 한 번에 모두 보고하기 위함입니다.
/// [`missing_fields`](Self::missing_fields) 참고.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelSettings {
    /// 시리얼 포트 이름 (예: `/dev/ttyUSB0`, `COM3`)
    pub com_port: Option<String>,
    /// 포트 열기 옵션
    pub open_options: Option<OpenOptionsSettings>,
    /// 전경색 (`red`, `blueBright`, ...)
    pub color: Option<String>,
    /// 배경색 (`bgBlack`, `bgWhiteBright`, ...)
    pub bg_color: Option<String>,
    /// 프레임 구분 정규식
    pub delimiter: Option<String>,
    /// 렌더링 형식 (hex, ascii, utf8)
    pub format: Option<String>,
    /// 타임스탬프 모드 (normal, diff, time, none)
    pub stamp: Option<String>,
    /// 제어 문자 변환 여부
    pub translate_ctrl: Option<FlagValue>,
    /// 표시 필터 정규식 목록 (하나라도 매칭되면 표시)
    pub filters: Option<Vec<String>>,
    /// 치환 규칙 목록 (선언 순서대로 적용)
    pub replacements: Option<Vec<ReplacementSettings>>,
    /// 필터 매칭이 끊긴 뒤 계속 표시할 프레임 수
    pub remanence: Option<IntValue>,
}

impl ChannelSettings {
    /// 필수 키 누락 목록을 반환합니다.
    ///
    /// 첫 번째 누락만이 아니라 누락된 모든 경로를 수집합니다.
    /// 예: `["color", "openOptions.baudRate", "replacements[1].with"]`
    pub fn missing_fields(&self) -> Vec<String> {
        let mut missing = Vec::new();

        let top_level: [(&str, bool); 8] = [
            ("comPort", self.com_port.is_some()),
            ("openOptions", self.open_options.is_some()),
            ("color", self.color.is_some()),
            ("bgColor", self.bg_color.is_some()),
            ("delimiter", self.delimiter.is_some()),
            ("format", self.format.is_some()),
            ("stamp", self.stamp.is_some()),
            ("translateCtrl", self.translate_ctrl.is_some()),
        ];
        for (key, present) in top_level {
            if !present {
                missing.push(key.to_owned());
            }
        }

        if let Some(options) = &self.open_options {
            let option_keys: [(&str, bool); 3] = [
                ("baudRate", options.baud_rate.is_some()),
                ("dataBits", options.data_bits.is_some()),
                ("parity", options.parity.is_some()),
            ];
            for (key, present) in option_keys {
                if !present {
                    missing.push(format!("openOptions.{key}"));
                }
            }
        }

        if let Some(replacements) = &self.replacements {
            for (idx, replacement) in replacements.iter().enumerate() {
                if replacement.what.is_none() {
                    missing.push(format!("replacements[{idx}].what"));
                }
                if replacement.with.is_none() {
                    missing.push(format!("replacements[{idx}].with"));
                }
            }
        }

        missing
    }
}

/// 포트 열기 옵션 (원시)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenOptionsSettings {
    /// 초당 비트 수 (숫자 또는 숫자 문자열)
    pub baud_rate: Option<IntValue>,
    /// 워드 크기 (숫자 또는 숫자 문자열)
    pub data_bits: Option<IntValue>,
    /// 패리티 (none, odd, even)
    pub parity: Option<String>,
    /// 정지 비트 (선택, 기본 1)
    pub stop_bits: Option<IntValue>,
}

/// 치환 규칙 (원시)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReplacementSettings {
    /// 찾을 정규식
    pub what: Option<String>,
    /// 치환 문자열 (`$1` 등 캡처 그룹 참조 가능)
    pub with: Option<String>,
}

/// 숫자 또는 숫자 문자열
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IntValue {
    Int(u64),
    Text(String),
}

impl IntValue {
    /// 정수로 변환합니다. 문자열은 10진수로 해석합니다.
    pub fn as_u64(&self) -> Result<u64, String> {
        match self {
            Self::Int(n) => Ok(*n),
            Self::Text(s) => s
                .trim()
                .parse::<u64>()
                .map_err(|e| format!("'{s}' is not an integer: {e}")),
        }
    }
}

impl From<u64> for IntValue {
    fn from(n: u64) -> Self {
        Self::Int(n)
    }
}

/// 불리언 또는 `"yes"`/`"no"` 문자열
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FlagValue {
    Bool(bool),
    Text(String),
}

impl FlagValue {
    /// `true`, `"yes"`, `"true"` (대소문자 무시)만 참으로 해석합니다.
    pub fn is_set(&self) -> bool {
        match self {
            Self::Bool(b) => *b,
            Self::Text(s) => matches!(s.to_ascii_lowercase().as_str(), "yes" | "true"),
        }
    }
}

impl From<bool> for FlagValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

// --- 환경변수 오버라이드 헬퍼 ---

fn override_string(target: &mut String, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        *target = val;
    }
}

fn override_path(target: &mut Option<PathBuf>, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        if val.is_empty() {
            warn!(env_key, "empty path in env var, disabling sink");
            *target = None;
        } else {
            *target = Some(PathBuf::from(val));
        }
    }
}
