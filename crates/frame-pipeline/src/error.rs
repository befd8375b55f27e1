//! 프레임 파이프라인 에러 타입
//!
//! [`FramePipelineError`]는 파이프라인 내부에서 발생하는 모든 에러를 표현합니다.
//! `From<FramePipelineError> for SpyError` 변환이 구현되어 있어
//! 상위 레이어에서 `?` 연산자로 자연스럽게 전파할 수 있습니다.

use serial_spy_core::error::{ChannelError, SinkError, SpyError, TransportError};

/// 프레임 파이프라인 도메인 에러
#[derive(Debug, thiserror::Error)]
pub enum FramePipelineError {
    /// 채널 설정 검증/컴파일 실패 (채널 세트 전체에 치명적)
    #[error(transparent)]
    Channel(#[from] ChannelError),

    /// 파일 싱크 에러 (해당 싱크에만 국한)
    #[error(transparent)]
    Sink(#[from] SinkError),

    /// 전송 에러 (해당 채널에만 국한)
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// 이벤트 채널 통신 에러
    #[error("event channel error: {0}")]
    EventChannel(String),

    /// I/O 에러
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<FramePipelineError> for SpyError {
    fn from(err: FramePipelineError) -> Self {
        match err {
            FramePipelineError::Channel(e) => SpyError::Channel(e),
            FramePipelineError::Sink(e) => SpyError::Sink(e),
            FramePipelineError::Transport(e) => SpyError::Transport(e),
            FramePipelineError::Io(e) => SpyError::Io(e),
            FramePipelineError::EventChannel(reason) => {
                SpyError::Io(std::io::Error::new(std::io::ErrorKind::BrokenPipe, reason))
            }
        }
    }
}
