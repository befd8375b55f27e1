//! 콘솔 싱크 -- 채널 색상으로 표준 출력에 씁니다.
//!
//! 콘솔은 열기/닫기 수명 주기가 없으며, 쓰기 실패는 한 번만 경고합니다.

use std::io::Write;

use colored::Colorize;

use crate::event::{LogRecord, RenderedLine};

/// 콘솔 싱크
pub struct ConsoleSink {
    out: Box<dyn Write + Send>,
    color: bool,
    failed: bool,
}

impl ConsoleSink {
    /// 표준 출력에 색상을 사용하는 콘솔 싱크
    pub fn stdout() -> Self {
        Self::new(Box::new(std::io::stdout()), true)
    }

    /// 임의의 출력 대상으로 콘솔 싱크를 생성합니다.
    pub fn new(out: Box<dyn Write + Send>, color: bool) -> Self {
        Self {
            out,
            color,
            failed: false,
        }
    }

    /// 레코드 한 줄을 씁니다.
    pub fn write(&mut self, record: &LogRecord) {
        let result = if self.color {
            render_colored(self.out.as_mut(), record)
        } else {
            writeln!(self.out, "{record}")
        };
        let result = result.and_then(|()| self.out.flush());

        if let Err(e) = result
            && !self.failed
        {
            self.failed = true;
            tracing::warn!(error = %e, "console write failed");
        }
    }
}

fn render_colored(w: &mut dyn Write, record: &LogRecord) -> std::io::Result<()> {
    match record {
        LogRecord::Line(line) => render_line(w, line),
        LogRecord::Opened { .. } => writeln!(w, "{}", record.to_string().cyan().bold()),
        LogRecord::Closed { .. } => writeln!(w, "{}", record.to_string().magenta().bold()),
        LogRecord::Error { .. } => writeln!(w, "{}", record.to_string().red().bold()),
        LogRecord::Banner(text) => writeln!(w, "{}", text.bold()),
        LogRecord::Panic(_) => writeln!(w, "{}", record.to_string().red()),
    }
}

fn render_line(w: &mut dyn Write, line: &RenderedLine) -> std::io::Result<()> {
    let text = line
        .text
        .color(line.color.to_colored())
        .on_color(line.bg_color.to_colored());
    match line.prompt() {
        Some(prompt) => writeln!(w, "{}{text}", prompt.black().on_white()),
        None => writeln!(w, "{text}"),
    }
}
