//! 파이프라인 이벤트 및 로그 레코드 타입
//!
//! 전송 계층은 [`ChannelEvent`]를 이벤트 루프로 보내고,
//! 이벤트 루프는 처리 결과를 [`LogRecord`]로 만들어 싱크에 전달합니다.

use std::fmt;

use bytes::Bytes;

use crate::color::NamedColor;
use crate::config::ChannelConfig;

/// 전송 계층 이벤트
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    /// 포트가 열림
    Open,
    /// 원시 바이트 청크 수신
    Data(Bytes),
    /// 포트가 닫힘
    Close,
    /// 런타임 오류
    Error(String),
}

/// 채널 인덱스가 붙은 전송 이벤트
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelEvent {
    /// 0부터 시작하는 채널 인덱스
    pub channel: usize,
    /// 이벤트 내용
    pub event: TransportEvent,
}

impl ChannelEvent {
    /// 새 채널 이벤트를 생성합니다.
    pub fn new(channel: usize, event: TransportEvent) -> Self {
        Self { channel, event }
    }
}

/// 표시가 결정된 한 줄
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedLine {
    /// 포맷된 프레임 텍스트
    pub text: String,
    /// 타임스탬프 (`none` 모드면 없음)
    pub stamp: Option<String>,
    /// 프롬프트 라벨 (`A`, `B`, ...)
    pub label: char,
    /// 전경색
    pub color: NamedColor,
    /// 배경색
    pub bg_color: NamedColor,
    /// HTML 클래스 (`ch1`, `ch2`, ...)
    pub css_class: String,
}

impl RenderedLine {
    /// 채널 설정의 색상 정보로 줄을 생성합니다.
    pub fn new(config: &ChannelConfig, text: String, stamp: Option<String>) -> Self {
        Self {
            text,
            stamp,
            label: config.label(),
            color: config.color,
            bg_color: config.bg_color,
            css_class: config.css_class(),
        }
    }

    /// 스탬프 프롬프트 (`"     12.345 A> "`)
    pub fn prompt(&self) -> Option<String> {
        self.stamp
            .as_ref()
            .map(|stamp| format!("{stamp} {}> ", self.label))
    }
}

/// 싱크로 전달되는 로그 레코드
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogRecord {
    /// 프레임 한 줄
    Line(RenderedLine),
    /// 포트 열림
    Opened { port: String },
    /// 포트 닫힘
    Closed { port: String },
    /// 포트 오류
    Error { port: String, reason: String },
    /// 시작 배너
    Banner(String),
    /// 설정 검증 실패
    Panic(String),
}

impl fmt::Display for LogRecord {
    /// 색상 없는 평문 표현 (텍스트 싱크 형식)
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Line(line) => match line.prompt() {
                Some(prompt) => write!(f, "{prompt}{}", line.text),
                None => f.write_str(&line.text),
            },
            Self::Opened { port } => write!(f, "[port {port} open]"),
            Self::Closed { port } => write!(f, "[port {port} closed]"),
            Self::Error { port, reason } => write!(f, "[port {port} in error: {reason}]"),
            Self::Banner(text) => f.write_str(text),
            Self::Panic(reason) => write!(f, "[configuration error: {reason}]"),
        }
    }
}
