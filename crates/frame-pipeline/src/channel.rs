//! 채널 런타임 -- 전송 이벤트를 로그 레코드로 변환합니다.
//!
//! 채널마다 분할기, 잔류 필터, 상태를 하나씩 소유하며
//! 프레임은 `포맷 -> 필터 -> 스탬프` 순서로 처리됩니다.
//! 공유 시계는 호출자(이벤트 루프)가 `&mut`으로 빌려줍니다.

use std::fmt;
use std::time::Instant;

use chrono::{Datelike, Local, Timelike};

use crate::clock::Clock;
use crate::config::ChannelConfig;
use crate::event::{LogRecord, RenderedLine, TransportEvent};
use crate::filter::HysteresisFilter;
use crate::format::format_frame;
use crate::splitter::FrameSplitter;

/// 채널 상태
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelState {
    /// 열기 요청됨
    Opening,
    /// 열림
    Open,
    /// 닫힘
    Closed,
    /// 오류 발생 (재시작하지 않음)
    Errored,
}

impl fmt::Display for ChannelState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Opening => write!(f, "opening"),
            Self::Open => write!(f, "open"),
            Self::Closed => write!(f, "closed"),
            Self::Errored => write!(f, "errored"),
        }
    }
}

/// 채널 하나의 실행 상태
#[derive(Debug)]
pub struct ChannelRuntime {
    config: ChannelConfig,
    splitter: FrameSplitter,
    filter: HysteresisFilter,
    state: ChannelState,
    /// 전송이 한 번이라도 열렸는지 (닫힘 라인은 열린 적 있는 채널에만)
    opened: bool,
}

impl ChannelRuntime {
    /// 컴파일된 설정으로 런타임을 생성합니다.
    pub fn new(config: ChannelConfig) -> Self {
        let splitter = FrameSplitter::new(config.delimiter.clone());
        Self {
            config,
            splitter,
            filter: HysteresisFilter::new(),
            state: ChannelState::Opening,
            opened: false,
        }
    }

    /// 채널 설정
    pub fn config(&self) -> &ChannelConfig {
        &self.config
    }

    /// 현재 상태
    pub fn state(&self) -> ChannelState {
        self.state
    }

    /// 현재 시각으로 이벤트를 처리합니다.
    pub fn handle(&mut self, event: TransportEvent, clock: &mut Clock) -> Vec<LogRecord> {
        self.handle_at(event, clock, Instant::now(), &Local::now())
    }

    /// 지정한 시각으로 이벤트를 처리합니다.
    ///
    /// 한 청크에서 나온 프레임들은 같은 시각으로 스탬프됩니다.
    pub fn handle_at<T>(
        &mut self,
        event: TransportEvent,
        clock: &mut Clock,
        now: Instant,
        wall: &T,
    ) -> Vec<LogRecord>
    where
        T: Datelike + Timelike,
    {
        match event {
            TransportEvent::Open => {
                self.state = ChannelState::Open;
                self.opened = true;
                tracing::info!(channel = self.config.index, port = %self.config.port, "port opened");
                vec![LogRecord::Opened {
                    port: self.config.port.clone(),
                }]
            }
            TransportEvent::Data(chunk) => self
                .splitter
                .feed(&chunk)
                .iter()
                .filter_map(|frame| self.process_frame(frame, clock, now, wall))
                .map(LogRecord::Line)
                .collect(),
            TransportEvent::Close => self.finish(clock, now, wall),
            TransportEvent::Error(reason) => {
                self.state = ChannelState::Errored;
                tracing::warn!(
                    channel = self.config.index,
                    port = %self.config.port,
                    reason = %reason,
                    "port error"
                );
                vec![LogRecord::Error {
                    port: self.config.port.clone(),
                    reason,
                }]
            }
        }
    }

    /// 종료 시 호출합니다. 꼬리 데이터를 내보내고, 열린 적 있고 아직 닫히지 않은 채널만 닫힘 라인을 남깁니다.
    pub fn shutdown(&mut self, clock: &mut Clock) -> Vec<LogRecord> {
        self.finish(clock, Instant::now(), &Local::now())
    }

    /// 프레임 하나를 포맷하고 필터와 스탬프를 적용합니다.
    pub fn process_frame<T>(
        &mut self,
        frame: &[u8],
        clock: &mut Clock,
        now: Instant,
        wall: &T,
    ) -> Option<RenderedLine>
    where
        T: Datelike + Timelike,
    {
        let text = format_frame(frame, &self.config);
        if !self.filter.should_show(&text, &self.config) {
            tracing::trace!(channel = self.config.index, "frame filtered out");
            return None;
        }
        let stamp = clock.stamp(self.config.stamp, now, wall);
        Some(RenderedLine::new(&self.config, text, stamp))
    }

    fn finish<T>(&mut self, clock: &mut Clock, now: Instant, wall: &T) -> Vec<LogRecord>
    where
        T: Datelike + Timelike,
    {
        if self.state == ChannelState::Closed {
            return Vec::new();
        }

        let mut records = Vec::new();
        if let Some(tail) = self.splitter.flush()
            && let Some(line) = self.process_frame(&tail, clock, now, wall)
        {
            records.push(LogRecord::Line(line));
        }

        let previous = std::mem::replace(&mut self.state, ChannelState::Closed);
        if !self.opened {
            tracing::debug!(
                channel = self.config.index,
                port = %self.config.port,
                state = %previous,
                "channel finished without ever opening"
            );
            return records;
        }

        tracing::info!(
            channel = self.config.index,
            port = %self.config.port,
            state = %previous,
            "port closed"
        );
        records.push(LogRecord::Closed {
            port: self.config.port.clone(),
        });
        records
    }
}
