//! 에러 타입 -- 도메인별 에러 정의

/// serial-spy 최상위 에러 타입
#[derive(Debug, thiserror::Error)]
pub enum SpyError {
    /// 설정 관련 에러
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// 채널 설정 검증/컴파일 에러
    #[error("channel error: {0}")]
    Channel(#[from] ChannelError),

    /// 싱크 에러
    #[error("sink error: {0}")]
    Sink(#[from] SinkError),

    /// 전송(시리얼 포트) 에러
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// I/O 에러
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl SpyError {
    /// 채널 세트 전체를 중단시켜야 하는 에러인지 확인합니다.
    ///
    /// 설정/채널 검증 단계의 에러만 치명적이며,
    /// 싱크·전송 에러는 해당 자원에만 국한됩니다.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Config(_) | Self::Channel(_))
    }
}

/// 설정 파일 관련 에러
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

/// 채널 설정 에러
///
/// 모든 변형은 문제가 된 채널의 인덱스(0부터 시작)를 포함합니다.
#[derive(Debug, thiserror::Error)]
pub enum ChannelError {
    /// 필수 키 누락 -- 누락된 모든 필드 경로를 보고합니다.
    #[error("channel {index}: missing key{}: {}", plural(.fields.len()), .fields.join(", "))]
    MissingFields { index: usize, fields: Vec<String> },

    /// 정규식 컴파일 실패
    #[error("channel {index}: {field} is not a valid pattern: {reason}")]
    InvalidPattern {
        index: usize,
        field: String,
        reason: String,
    },

    /// 의미상 잘못된 값 (알 수 없는 format, 숫자가 아닌 baudRate 등)
    #[error("channel {index}: invalid value for '{field}': {reason}")]
    InvalidValue {
        index: usize,
        field: String,
        reason: String,
    },

    /// 채널이 하나도 정의되지 않음
    #[error("no channel defined")]
    Empty,

    /// 프롬프트 라벨(`A`-`Z`)로 구분할 수 있는 채널 수 초과
    #[error("{count} channels defined, at most {max} are supported")]
    TooMany { count: usize, max: usize },
}

impl ChannelError {
    /// 에러가 발생한 채널 인덱스를 반환합니다.
    pub fn index(&self) -> Option<usize> {
        match self {
            Self::MissingFields { index, .. }
            | Self::InvalidPattern { index, .. }
            | Self::InvalidValue { index, .. } => Some(*index),
            Self::Empty | Self::TooMany { .. } => None,
        }
    }
}

fn plural(n: usize) -> &'static str {
    if n == 1 { "" } else { "s" }
}

/// 파일 싱크 에러
#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    /// 싱크 파일 생성 실패
    #[error("cannot open {sink} sink '{path}': {reason}")]
    Open {
        sink: String,
        path: String,
        reason: String,
    },

    /// 이미 닫힌 싱크에 쓰기 시도
    #[error("{sink} sink is closed")]
    Closed { sink: String },

    /// 쓰기 실패
    #[error("{sink} sink write failed: {reason}")]
    Write { sink: String, reason: String },
}

/// 전송 계층 에러
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// 포트 열기 실패
    #[error("cannot open port {port}: {reason}")]
    Open { port: String, reason: String },

    /// 실행 중 읽기 실패
    #[error("port {port} read failed: {reason}")]
    Read { port: String, reason: String },

    /// 포트 나열 실패
    #[error("cannot enumerate ports: {0}")]
    Enumerate(String),
}
