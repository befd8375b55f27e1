//! 타임스탬프 생성기
//!
//! 모든 채널이 하나의 [`Clock`]을 공유합니다. `diff` 모드의 기준값은
//! 어느 채널이든 마지막으로 스탬프가 찍힌 줄의 경과 시간이며,
//! 이벤트 루프가 `&mut`으로 소유하므로 잠금이 필요 없습니다.
//!
//! # 형식
//! - `normal`: `"     12.345"` (정수부 최소 6자리, 천 단위 쉼표, 앞쪽 `0`/`,`는 공백)
//! - `diff`: `"+    0.250"` (정수부 최소 5자리)
//! - `time`: `"03/14-15:09:26.5358"`

use std::time::{Duration, Instant};

use chrono::{Datelike, Timelike};

use serial_spy_core::types::StampMode;

/// `normal` 모드 정수부 최소 자릿수
const NORMAL_DIGITS: usize = 6;
/// `diff` 모드 정수부 최소 자릿수
const DIFF_DIGITS: usize = 5;

/// 프로세스 공용 시계
#[derive(Debug, Clone)]
pub struct Clock {
    /// 프로세스 시작 시각
    start: Instant,
    /// 마지막으로 스탬프가 찍힌 줄의 경과 시간
    last: Option<Duration>,
}

impl Clock {
    /// 현재 시각을 시작 시각으로 하는 시계를 생성합니다.
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    /// 지정한 시각을 시작 시각으로 하는 시계를 생성합니다.
    pub fn starting_at(start: Instant) -> Self {
        Self { start, last: None }
    }

    /// 한 줄에 대한 스탬프를 생성합니다.
    ///
    /// `none`이 아니면 공유 기준값을 `now`의 경과 시간으로 갱신합니다.
    pub fn stamp<T>(&mut self, mode: StampMode, now: Instant, wall: &T) -> Option<String>
    where
        T: Datelike + Timelike,
    {
        let elapsed = now.saturating_duration_since(self.start);
        let text = match mode {
            StampMode::None => return None,
            StampMode::Normal => format_elapsed(elapsed, NORMAL_DIGITS),
            StampMode::Diff => match self.last {
                Some(last) => format!(
                    "+{}",
                    format_elapsed(elapsed.saturating_sub(last), DIFF_DIGITS)
                ),
                None => format_elapsed(elapsed, NORMAL_DIGITS),
            },
            StampMode::Time => format_wall(wall),
        };
        self.last = Some(elapsed);
        Some(text)
    }

    /// 공유 기준값
    pub fn last(&self) -> Option<Duration> {
        self.last
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}

/// 경과 시간을 고정폭 초 단위 문자열로 변환합니다.
pub fn format_elapsed(elapsed: Duration, min_digits: usize) -> String {
    let millis = elapsed.as_millis();
    let digits = format!("{:0width$}", millis / 1000, width = min_digits);

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 4);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped.push_str(&format!(".{:03}", millis % 1000));

    let padding = grouped
        .chars()
        .take_while(|c| *c == '0' || *c == ',')
        .count();
    format!("{}{}", " ".repeat(padding), &grouped[padding..])
}

/// 벽시계 시각을 `MM/DD-HH:MM:SS.ffff`로 변환합니다.
pub fn format_wall<T>(wall: &T) -> String
where
    T: Datelike + Timelike,
{
    // 윤초 구간의 나노초는 10억 이상일 수 있음
    let fraction = (wall.nanosecond() / 100_000).min(9_999);
    format!(
        "{:02}/{:02}-{:02}:{:02}:{:02}.{:04}",
        wall.month(),
        wall.day(),
        wall.hour(),
        wall.minute(),
        wall.second(),
        fraction
    )
}
