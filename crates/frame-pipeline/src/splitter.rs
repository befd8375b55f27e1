//! 정규식 기반 프레임 분할기
//!
//! 전송 계층이 전달하는 임의 크기의 바이트 청크를 누적하고,
//! 채널 구분자 정규식이 매칭될 때마다 완성된 프레임을 도착 순서대로 내보냅니다.
//! 구분자 자체는 프레임에 포함되지 않습니다.

use bytes::{Bytes, BytesMut};
use regex::bytes::Regex;

/// 구분자 없이 누적될 수 있는 최대 바이트 수 (초과 시 강제 분할)
pub const MAX_PENDING_BYTES: usize = 64 * 1024;

/// 프레임 분할기
#[derive(Debug)]
pub struct FrameSplitter {
    /// 구분자 정규식
    delimiter: Regex,
    /// 아직 구분자를 만나지 못한 꼬리 데이터
    pending: BytesMut,
    /// 강제 분할 한계
    max_pending: usize,
}

impl FrameSplitter {
    /// 새 분할기를 생성합니다.
    pub fn new(delimiter: Regex) -> Self {
        Self::with_max_pending(delimiter, MAX_PENDING_BYTES)
    }

    /// 강제 분할 한계를 지정하여 분할기를 생성합니다.
    pub fn with_max_pending(delimiter: Regex, max_pending: usize) -> Self {
        Self {
            delimiter,
            pending: BytesMut::new(),
            max_pending: max_pending.max(1),
        }
    }

    /// 청크를 추가하고 완성된 프레임을 반환합니다.
    ///
    /// 구분자가 청크 경계에 걸쳐 있어도 누적 버퍼 전체에 대해 매칭하므로 안전합니다.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<Bytes> {
        self.pending.extend_from_slice(chunk);

        let mut frames = Vec::new();
        let mut consumed = 0;
        let mut boundaries = Vec::new();
        for m in self.delimiter.find_iter(&self.pending) {
            // 빈 매칭은 컴파일 단계에서 거부됨
            if m.start() == m.end() {
                continue;
            }
            boundaries.push((m.start(), m.end()));
        }

        for (start, end) in boundaries {
            let mut frame = self.pending.split_to(end - consumed);
            frame.truncate(start - consumed);
            frames.push(frame.freeze());
            consumed = end;
        }

        while self.pending.len() >= self.max_pending {
            tracing::debug!(
                pending = self.pending.len(),
                max = self.max_pending,
                "no delimiter within limit, forcing frame split"
            );
            frames.push(self.pending.split_to(self.max_pending).freeze());
        }

        frames
    }

    /// 남은 꼬리 데이터를 마지막 프레임으로 내보냅니다.
    ///
    /// 전송 종료 시 호출합니다. 꼬리가 비어있으면 `None`.
    pub fn flush(&mut self) -> Option<Bytes> {
        if self.pending.is_empty() {
            None
        } else {
            Some(self.pending.split().freeze())
        }
    }

    /// 현재 누적된 꼬리 길이
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }
}
