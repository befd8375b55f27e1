//! serial-spy 공통 크레이트
//!
//! 모든 serial-spy 크레이트가 공유하는 에러 계층, 설정 모델, 도메인 열거형을 제공합니다.
//!
//! - [`config`]: JSON 설정 파일 로딩, 환경변수 오버라이드, 원시 채널 설정
//! - [`error`]: 도메인별 에러 타입
//! - [`types`]: 렌더링 형식, 타임스탬프 모드, 패리티 등

pub mod config;
pub mod error;
pub mod types;

// --- 주요 타입 re-export ---

// 에러
pub use error::{ChannelError, ConfigError, SinkError, SpyError, TransportError};

// 설정
pub use config::{
    ChannelSettings, FlagValue, GeneralConfig, IntValue, OpenOptionsSettings,
    ReplacementSettings, SpyConfig,
};

// 도메인 타입
pub use types::{Parity, RenderFormat, SerialOptions, StampMode};
