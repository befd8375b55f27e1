//! 잔류(remanence) 필터
//!
//! 필터 정규식 중 하나라도 매칭되면 프레임을 표시하고 잔류 카운터를 채널의
//! `remanence` 값으로 되돌립니다. 매칭이 끊긴 뒤에도 카운터가 남아있는 동안은
//! 프레임을 계속 표시하며 하나씩 감소시킵니다.

use crate::config::ChannelConfig;

/// 채널별 잔류 필터 상태
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct HysteresisFilter {
    /// 남은 유예 프레임 수
    remaining: u32,
}

impl HysteresisFilter {
    /// 카운터가 0인 필터를 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// 포맷된 프레임을 표시할지 결정합니다.
    pub fn should_show(&mut self, text: &str, config: &ChannelConfig) -> bool {
        if config.filters.is_empty() {
            return true;
        }

        if config.filters.iter().any(|filter| filter.is_match(text)) {
            self.remaining = config.remanence;
            return true;
        }

        if self.remaining > 0 {
            self.remaining -= 1;
            true
        } else {
            false
        }
    }

    /// 남은 유예 프레임 수
    pub fn remaining(&self) -> u32 {
        self.remaining
    }
}
