//! serial-spy 프레임 파이프라인
//!
//! 시리얼 채널의 바이트 스트림을 프레임으로 나누고, 포맷/필터/타임스탬프를 거쳐
//! 콘솔, 텍스트 파일, HTML 파일에 동시에 기록합니다.
//!
//! # 모듈 구성
//!
//! - [`config`]: 채널 설정 검증 및 정규식 사전 컴파일 (전부 성공 또는 전부 실패)
//! - [`splitter`]: 구분자 정규식 기반 프레임 분할
//! - [`format`]: hex/ascii/utf8 렌더링, 치환, 제어 문자 변환
//! - [`filter`]: 잔류(remanence) 필터
//! - [`clock`]: 공유 기준값을 갖는 타임스탬프 생성기
//! - [`channel`]: 채널별 실행 상태 (이벤트 -> 로그 레코드)
//! - [`sink`]: 콘솔/텍스트/HTML 싱크 팬아웃
//! - [`transport`]: 전송 계층 트레이트
//! - [`event`]: 전송 이벤트, 렌더링된 줄, 로그 레코드
//! - [`color`]: 색상 이름 해석
//! - [`error`]: 도메인 에러 타입
//!
//! # 아키텍처
//!
//! ```text
//! Transport -> mpsc -> ChannelRuntime (Splitter -> Formatter -> Filter -> Clock) -> SinkFanout
//!                                                                                  |
//!                                                                   Console / Text / HTML
//! ```

pub mod channel;
pub mod clock;
pub mod color;
pub mod config;
pub mod error;
pub mod event;
pub mod filter;
pub mod format;
pub mod sink;
pub mod splitter;
pub mod transport;

// --- 주요 타입 re-export ---

// 채널
pub use channel::{ChannelRuntime, ChannelState};
pub use config::{ChannelConfig, Replacement, compile_channels};

// 처리 단계
pub use clock::Clock;
pub use filter::HysteresisFilter;
pub use format::format_frame;
pub use splitter::FrameSplitter;

// 이벤트
pub use event::{ChannelEvent, LogRecord, RenderedLine, TransportEvent};

// 싱크
pub use sink::{ConsoleSink, FileSink, SinkFanout, SinkOptions};

// 전송
pub use transport::{Transport, TransportHandle};

// 색상
pub use color::NamedColor;

// 에러
pub use error::FramePipelineError;
