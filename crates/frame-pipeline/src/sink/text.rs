//! 텍스트 로그 렌더링 -- 색상 없이 한 엔트리당 한 줄

use crate::event::LogRecord;

/// 레코드 한 줄 (개행 포함)
pub fn entry(record: &LogRecord) -> String {
    format!("{record}\n")
}

/// 종료 문구 (개행 포함)
pub fn trailer(text: &str) -> String {
    format!("{text}\n")
}
