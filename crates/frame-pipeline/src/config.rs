//! 채널 설정 컴파일러
//!
//! [`ChannelConfig`]는 core의 [`ChannelSettings`]를 검증하고
//! 구분자/필터/치환 정규식을 미리 컴파일한 불변 설정입니다.
//!
//! 컴파일은 프레임을 처리하기 전에 단 한 번 수행되며,
//! 채널 하나라도 실패하면 [`compile_channels`]가 전체 세트를 거부합니다.
//!
//! # 사용 예시
//! ```ignore
//! use serial_spy_core::config::SpyConfig;
//! use serial_spy_pipeline::config::compile_channels;
//!
//! let config = SpyConfig::load("serial-spy.json").await?;
//! let channels = compile_channels(&config.channels)?;
//! ```

use regex::Regex;

use serial_spy_core::config::{ChannelSettings, IntValue};
use serial_spy_core::error::ChannelError;
use serial_spy_core::types::{Parity, RenderFormat, SerialOptions, StampMode};

use crate::color::NamedColor;

/// 채널 세트의 최대 크기 (라벨 `A`-`Z`)
pub const MAX_CHANNELS: usize = 26;

/// 치환 규칙 -- 전역 매칭 정규식 + 리터럴 치환 문자열
#[derive(Debug, Clone)]
pub struct Replacement {
    /// 찾을 정규식 (모든 매칭을 치환)
    pub pattern: Regex,
    /// `regex` 치환 문법의 치환 문자열 (설정의 `$1`, `$&`, `$<name>`은
    /// 컴파일 시 `${1}`, `${0}`, `${name}`으로 변환됨)
    pub with: String,
}

/// 컴파일된 채널 설정
#[derive(Debug, Clone)]
pub struct ChannelConfig {
    /// 0부터 시작하는 채널 인덱스
    pub index: usize,
    /// 시리얼 포트 이름
    pub port: String,
    /// 포트 열기 옵션
    pub options: SerialOptions,
    /// 전경색
    pub color: NamedColor,
    /// 배경색
    pub bg_color: NamedColor,
    /// 프레임 구분자 (바이트 정규식)
    pub delimiter: regex::bytes::Regex,
    /// 렌더링 형식
    pub format: RenderFormat,
    /// 타임스탬프 모드
    pub stamp: StampMode,
    /// 제어 문자 변환 여부
    pub translate_ctrl: bool,
    /// 표시 필터 (비어있으면 필터 없음)
    pub filters: Vec<Regex>,
    /// 치환 규칙 (선언 순서대로 적용)
    pub replacements: Vec<Replacement>,
    /// 필터 매칭이 끊긴 뒤 계속 표시할 프레임 수
    pub remanence: u32,
}

impl ChannelConfig {
    /// 원시 설정을 검증하고 컴파일합니다.
    ///
    /// 검증 순서:
    /// 1. 필수 키 누락 검사 (누락된 모든 경로를 한 번에 보고)
    /// 2. 열거형/색상/숫자 값 검증
    /// 3. 구분자, 필터, 치환 정규식 컴파일
    pub fn compile(index: usize, settings: &ChannelSettings) -> Result<Self, ChannelError> {
        let missing = settings.missing_fields();
        if !missing.is_empty() {
            return Err(ChannelError::MissingFields {
                index,
                fields: missing,
            });
        }

        let (
            Some(port),
            Some(open_options),
            Some(color),
            Some(bg_color),
            Some(delimiter),
            Some(format),
            Some(stamp),
            Some(translate_ctrl),
        ) = (
            &settings.com_port,
            &settings.open_options,
            &settings.color,
            &settings.bg_color,
            &settings.delimiter,
            &settings.format,
            &settings.stamp,
            &settings.translate_ctrl,
        )
        else {
            // missing_fields()가 비어있으면 도달할 수 없음
            return Err(ChannelError::MissingFields {
                index,
                fields: settings.missing_fields(),
            });
        };

        let invalid = |field: &str, reason: String| ChannelError::InvalidValue {
            index,
            field: field.to_owned(),
            reason,
        };

        let options = SerialOptions {
            baud_rate: coerce_int(open_options.baud_rate.as_ref(), 1, u32::MAX as u64)
                .map_err(|r| invalid("openOptions.baudRate", r))? as u32,
            data_bits: coerce_int(open_options.data_bits.as_ref(), 5, 8)
                .map_err(|r| invalid("openOptions.dataBits", r))? as u8,
            parity: open_options
                .parity
                .as_deref()
                .unwrap_or("none")
                .parse::<Parity>()
                .map_err(|r| invalid("openOptions.parity", r))?,
            stop_bits: match &open_options.stop_bits {
                Some(v) => coerce_int(Some(v), 1, 2).map_err(|r| invalid("openOptions.stopBits", r))?
                    as u8,
                None => 1,
            },
        };

        let color: NamedColor = color.parse().map_err(|r| invalid("color", r))?;
        let bg_color = NamedColor::parse_background(bg_color).map_err(|r| invalid("bgColor", r))?;
        let format: RenderFormat = format.parse().map_err(|r| invalid("format", r))?;
        let stamp: StampMode = stamp.parse().map_err(|r| invalid("stamp", r))?;

        let remanence = match &settings.remanence {
            Some(v) => coerce_int(Some(v), 0, u32::MAX as u64)
                .map_err(|r| invalid("remanence", r))? as u32,
            None => 0,
        };

        // 바이트 모드: `\xFF`는 U+00FF의 UTF-8 인코딩이 아니라 원시 바이트 0xFF
        let delimiter = regex::bytes::RegexBuilder::new(delimiter)
            .unicode(false)
            .build()
            .map_err(|e| ChannelError::InvalidPattern {
                index,
                field: "delimiter".to_owned(),
                reason: e.to_string(),
            })?;
        if delimiter.is_match(b"") {
            return Err(ChannelError::InvalidPattern {
                index,
                field: "delimiter".to_owned(),
                reason: "delimiter must not match an empty string".to_owned(),
            });
        }

        let filters = settings
            .filters
            .iter()
            .flatten()
            .enumerate()
            .map(|(idx, filter)| {
                Regex::new(filter).map_err(|e| ChannelError::InvalidPattern {
                    index,
                    field: format!("filters[{idx}]"),
                    reason: e.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let replacements = settings
            .replacements
            .iter()
            .flatten()
            .enumerate()
            .map(|(idx, replacement)| {
                let what = replacement.what.as_deref().unwrap_or_default();
                let pattern = Regex::new(what).map_err(|e| ChannelError::InvalidPattern {
                    index,
                    field: format!("replacements[{idx}].what"),
                    reason: e.to_string(),
                })?;
                let with = replacement.with.as_deref().unwrap_or_default();
                let with = expand_template(with, pattern.captures_len() - 1);
                Ok(Replacement { pattern, with })
            })
            .collect::<Result<Vec<_>, ChannelError>>()?;

        Ok(Self {
            index,
            port: port.clone(),
            options,
            color,
            bg_color,
            delimiter,
            format,
            stamp,
            translate_ctrl: translate_ctrl.is_set(),
            filters,
            replacements,
            remanence,
        })
    }

    /// 프롬프트 라벨 (`A`, `B`, ... `Z`)
    ///
    /// [`compile_channels`]가 [`MAX_CHANNELS`]를 넘는 세트를 거부하므로 라벨은 채널마다 유일합니다.
    pub fn label(&self) -> char {
        char::from(b'A' + (self.index % MAX_CHANNELS) as u8)
    }

    /// 1부터 시작하는 표시 인덱스 (CSS 클래스 선택용)
    pub fn display_index(&self) -> usize {
        self.index + 1
    }

    /// HTML 스타일시트의 채널 클래스 이름 (`ch1`, `ch2`, ...)
    pub fn css_class(&self) -> String {
        format!("ch{}", self.display_index())
    }
}

/// 모든 채널을 컴파일합니다 (all-or-nothing).
///
/// 하나라도 실패하면 첫 번째 에러를 반환하며, 이미 컴파일된 채널도 모두 버려집니다.
pub fn compile_channels(settings: &[ChannelSettings]) -> Result<Vec<ChannelConfig>, ChannelError> {
    if settings.is_empty() {
        return Err(ChannelError::Empty);
    }
    if settings.len() > MAX_CHANNELS {
        return Err(ChannelError::TooMany {
            count: settings.len(),
            max: MAX_CHANNELS,
        });
    }
    settings
        .iter()
        .enumerate()
        .map(|(index, s)| ChannelConfig::compile(index, s))
        .collect()
}

/// 설정 파일의 치환 템플릿을 `regex` 치환 문법으로 변환합니다.
///
/// - `$$` -> 리터럴 `$`
/// - `$&` -> 전체 매칭
/// - `$n`, `$nn` -> 캡처 그룹 (두 자리는 그룹이 존재할 때만, 아니면 한 자리 + 리터럴 숫자)
/// - `$<name>` -> 이름 있는 그룹
/// - 그 외의 `$`, 존재하지 않는 그룹 번호 -> 리터럴 그대로
fn expand_template(template: &str, groups: usize) -> String {
    let chars: Vec<char> = template.chars().collect();
    let mut out = String::with_capacity(template.len());
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        if c != '$' {
            out.push(c);
            i += 1;
            continue;
        }

        let digit = |at: usize| chars.get(at).and_then(|c| c.to_digit(10)).map(|d| d as usize);
        match chars.get(i + 1) {
            Some('$') => {
                out.push_str("$$");
                i += 2;
            }
            Some('&') => {
                out.push_str("${0}");
                i += 2;
            }
            Some('<') => match chars[i + 2..].iter().position(|c| *c == '>') {
                Some(len) => {
                    let name: String = chars[i + 2..i + 2 + len].iter().collect();
                    out.push_str(&format!("${{{name}}}"));
                    i += len + 3;
                }
                None => {
                    out.push_str("$$");
                    i += 1;
                }
            },
            Some(d) if d.is_ascii_digit() => {
                let first = (*d as u8 - b'0') as usize;
                let pair = digit(i + 2).map(|second| first * 10 + second);
                match pair {
                    Some(n) if (1..=groups).contains(&n) => {
                        out.push_str(&format!("${{{n}}}"));
                        i += 3;
                    }
                    _ if (1..=groups).contains(&first) => {
                        out.push_str(&format!("${{{first}}}"));
                        i += 2;
                    }
                    _ => {
                        out.push_str("$$");
                        i += 1;
                    }
                }
            }
            _ => {
                out.push_str("$$");
                i += 1;
            }
        }
    }
    out
}

fn coerce_int(value: Option<&IntValue>, min: u64, max: u64) -> Result<u64, String> {
    let value = value.ok_or_else(|| "value is required".to_owned())?;
    let n = value.as_u64()?;
    if n < min || n > max {
        return Err(format!("{n} is out of range {min}-{max}"));
    }
    Ok(n)
}
