//! 도메인 타입 -- 채널 설정에서 사용하는 열거형

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// 프레임 렌더링 형식
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderFormat {
    /// 바이트당 대문자 16진수 2자리, 공백 구분
    Hex,
    /// 바이트를 그대로 문자로 디코딩 (0x00-0xFF → U+0000-U+00FF)
    Ascii,
    /// UTF-8 디코딩 (잘못된 시퀀스는 U+FFFD)
    Utf8,
}

impl RenderFormat {
    /// 허용되는 값 목록
    pub const VARIANTS: &'static [&'static str] = &["hex", "ascii", "utf8"];
}

impl FromStr for RenderFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "hex" => Ok(Self::Hex),
            "ascii" => Ok(Self::Ascii),
            "utf8" | "utf-8" => Ok(Self::Utf8),
            other => Err(format!(
                "unknown format '{other}', expected one of: {}",
                Self::VARIANTS.join(", ")
            )),
        }
    }
}

impl fmt::Display for RenderFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Hex => write!(f, "hex"),
            Self::Ascii => write!(f, "ascii"),
            Self::Utf8 => write!(f, "utf8"),
        }
    }
}

/// 타임스탬프 모드
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StampMode {
    /// 프로세스 시작 이후 경과 초
    Normal,
    /// 직전에 표시된 라인(모든 채널 공통) 이후 경과 초
    Diff,
    /// 로컬 벽시계 시각
    Time,
    /// 타임스탬프 없음
    None,
}

impl StampMode {
    /// 허용되는 값 목록
    pub const VARIANTS: &'static [&'static str] = &["normal", "diff", "time", "none"];
}

impl FromStr for StampMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "normal" => Ok(Self::Normal),
            "diff" => Ok(Self::Diff),
            "time" => Ok(Self::Time),
            "none" => Ok(Self::None),
            other => Err(format!(
                "unknown stamp mode '{other}', expected one of: {}",
                Self::VARIANTS.join(", ")
            )),
        }
    }
}

impl fmt::Display for StampMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Normal => write!(f, "normal"),
            Self::Diff => write!(f, "diff"),
            Self::Time => write!(f, "time"),
            Self::None => write!(f, "none"),
        }
    }
}

/// 시리얼 패리티
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Parity {
    #[default]
    None,
    Odd,
    Even,
}

impl FromStr for Parity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "none" => Ok(Self::None),
            "odd" => Ok(Self::Odd),
            "even" => Ok(Self::Even),
            other => Err(format!(
                "unknown parity '{other}', expected one of: none, odd, even"
            )),
        }
    }
}

impl fmt::Display for Parity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::Odd => write!(f, "odd"),
            Self::Even => write!(f, "even"),
        }
    }
}

/// 컴파일된 시리얼 열기 옵션
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerialOptions {
    /// 초당 비트 수
    pub baud_rate: u32,
    /// 워드 크기 (5-8)
    pub data_bits: u8,
    /// 패리티
    pub parity: Parity,
    /// 정지 비트 (1 또는 2)
    pub stop_bits: u8,
}

impl SerialOptions {
    /// `115200-8-N-1` 형태의 요약 문자열
    pub fn summary(&self) -> String {
        let parity = match self.parity {
            Parity::None => 'N',
            Parity::Odd => 'O',
            Parity::Even => 'E',
        };
        format!(
            "{}-{}-{}-{}",
            self.baud_rate, self.data_bits, parity, self.stop_bits
        )
    }
}
