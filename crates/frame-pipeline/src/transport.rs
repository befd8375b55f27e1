//! 전송 계층 경계
//!
//! 실제 시리얼 포트 구현은 바이너리 크레이트에 있고, 파이프라인은 이 트레이트로만
//! 전송 계층을 다룹니다. 테스트에서는 목(mock) 구현을 주입합니다.
//!
//! # 이벤트 규약
//! - 열기에 성공하면 [`TransportEvent::Open`]을 보냅니다.
//! - 수신 바이트는 도착 순서대로 [`TransportEvent::Data`]로 보냅니다.
//! - 런타임 오류는 [`TransportEvent::Error`], 장치가 닫히면 [`TransportEvent::Close`]를 보냅니다.
//! - [`TransportHandle::close`] 이후에는 이벤트를 보내지 않아도 됩니다.

use tokio::sync::mpsc;

use crate::config::ChannelConfig;
use crate::error::FramePipelineError;
use crate::event::ChannelEvent;

/// 채널별 전송 계층을 여는 팩토리
pub trait Transport: Send {
    /// 채널을 열고 이벤트를 `events`로 보내기 시작합니다.
    ///
    /// 장치 열기 실패는 `Err`가 아니라 [`TransportEvent::Error`](crate::event::TransportEvent::Error)
    /// 이벤트로 보고해도 됩니다. `Err`는 이벤트 전달 자체가 불가능할 때 사용합니다.
    fn open(
        &mut self,
        config: &ChannelConfig,
        events: mpsc::Sender<ChannelEvent>,
    ) -> Result<Box<dyn TransportHandle>, FramePipelineError>;
}

/// 열린 채널에 대한 핸들
pub trait TransportHandle: Send {
    /// 채널 닫기를 요청하고 읽기가 멈출 때까지 기다립니다.
    fn close(&mut self) -> Result<(), FramePipelineError>;
}
