//! 프레임 포맷터 -- 원시 프레임을 표시용 문자열로 변환합니다.
//!
//! # 처리 순서
//! 1. 렌더링: `hex`는 바이트당 대문자 16진수 2자리(공백 구분), 그 외는 디코딩
//! 2. 치환: 선언 순서대로, 각 규칙은 모든 매칭을 치환 (연쇄 적용)
//! 3. 제어 문자 변환: `translate_ctrl`이 켜져 있고 `hex`가 아닐 때만

use std::fmt::Write as _;

use serial_spy_core::types::RenderFormat;

use crate::config::ChannelConfig;

/// 코드 0-31 제어 문자의 표기 테이블
pub const CONTROL_MNEMONICS: [&str; 32] = [
    "\\0", "^A", "^B", "^C", "^D", "^E", "^F", "\\a", //
    "\\b", "\\t", "\\n", "\\v", "\\f", "\\r", "^N", "^O", //
    "^P", "^Q", "^R", "^S", "^T", "^U", "^V", "^W", //
    "^X", "^Y", "^Z", "^[", "^\\", "^]", "^^", "^_",
];

/// 프레임을 채널 설정에 따라 표시 문자열로 변환합니다.
pub fn format_frame(frame: &[u8], config: &ChannelConfig) -> String {
    let rendered = render(frame, config.format);
    let replaced = apply_replacements(rendered, config);
    if config.translate_ctrl && config.format != RenderFormat::Hex {
        translate_control(&replaced)
    } else {
        replaced
    }
}

/// 렌더링 형식에 따라 바이트를 문자열로 변환합니다.
pub fn render(frame: &[u8], format: RenderFormat) -> String {
    match format {
        RenderFormat::Hex => to_hex(frame),
        RenderFormat::Ascii => frame.iter().map(|&b| char::from(b)).collect(),
        RenderFormat::Utf8 => String::from_utf8_lossy(frame).into_owned(),
    }
}

/// 바이트를 `"41 42 0A"` 형태로 변환합니다. 길이는 항상 `3*N - 1` (N > 0).
pub fn to_hex(frame: &[u8]) -> String {
    let mut out = String::with_capacity(frame.len() * 3);
    for (i, byte) in frame.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        // String에 대한 write!는 실패하지 않음
        let _ = write!(out, "{byte:02X}");
    }
    out
}

fn apply_replacements(text: String, config: &ChannelConfig) -> String {
    config
        .replacements
        .iter()
        .fold(text, |acc, replacement| {
            replacement
                .pattern
                .replace_all(&acc, replacement.with.as_str())
                .into_owned()
        })
}

/// 코드 32 미만의 문자를 표기 테이블에 따라 확장합니다.
///
/// 확장 결과에는 제어 문자가 남지 않으므로 다시 적용해도 결과가 같습니다.
pub fn translate_control(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        let code = ch as u32;
        if code < 32 {
            out.push_str(CONTROL_MNEMONICS[code as usize]);
        } else {
            out.push(ch);
        }
    }
    out
}
