//! HTML 로그 렌더링
//!
//! 문서 구조:
//! - 프렐류드: `<!doctype html>`, 채널별 CSS 클래스(`ch1`, `ch2`, ...)와
//!   의미 클래스(`stamp`, `open`, `closed`, `error`, `banner`, `panic`), 제목
//! - 본문: `<pre>` 안에 한 줄에 하나씩 `<span>`으로 감싼 엔트리
//! - 트레일러: 종료 문구와 닫는 태그

use std::fmt::Write as _;

use crate::color::NamedColor;
use crate::config::ChannelConfig;
use crate::event::LogRecord;

/// 문서 머리말을 생성합니다.
pub fn prelude(title: &str, channels: &[ChannelConfig]) -> String {
    let title = escape(title);
    let mut out = String::with_capacity(1024);
    out.push_str("<!doctype html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
    let _ = writeln!(out, "<title>{title}</title>");
    out.push_str("<style>\n");
    let _ = writeln!(
        out,
        "body {{ background: {}; color: {}; }}",
        NamedColor::Black.css(),
        NamedColor::White.css()
    );
    out.push_str("pre { font-family: monospace; }\n");
    let _ = writeln!(
        out,
        ".stamp {{ color: {}; background: {}; }}",
        NamedColor::Black.css(),
        NamedColor::White.css()
    );
    let _ = writeln!(out, ".open {{ color: {}; font-weight: bold; }}", NamedColor::Cyan.css());
    let _ = writeln!(out, ".closed {{ color: {}; font-weight: bold; }}", NamedColor::Magenta.css());
    let _ = writeln!(out, ".error {{ color: {}; font-weight: bold; }}", NamedColor::Red.css());
    out.push_str(".banner { font-weight: bold; }\n");
    let _ = writeln!(out, ".panic {{ color: {}; }}", NamedColor::Red.css());
    for channel in channels {
        let _ = writeln!(
            out,
            ".{} {{ color: {}; background: {}; }}",
            channel.css_class(),
            channel.color.css(),
            channel.bg_color.css()
        );
    }
    out.push_str("</style>\n</head>\n<body>\n");
    let _ = writeln!(out, "<h1>{title}</h1>");
    out.push_str("<pre>\n");
    out
}

/// 레코드 한 줄을 `<span>` 엔트리로 변환합니다.
pub fn entry(record: &LogRecord) -> String {
    match record {
        LogRecord::Line(line) => {
            let text = span(&line.css_class, &line.text);
            match line.prompt() {
                Some(prompt) => format!("{}{text}\n", span("stamp", &prompt)),
                None => format!("{text}\n"),
            }
        }
        LogRecord::Opened { .. } => format!("{}\n", span("open", &record.to_string())),
        LogRecord::Closed { .. } => format!("{}\n", span("closed", &record.to_string())),
        LogRecord::Error { .. } => format!("{}\n", span("error", &record.to_string())),
        LogRecord::Banner(text) => format!("{}\n", span("banner", text)),
        LogRecord::Panic(_) => format!("{}\n", span("panic", &record.to_string())),
    }
}

/// 종료 문구와 닫는 태그
pub fn trailer(text: &str) -> String {
    format!("{}\n</pre>\n</body>\n</html>\n", span("banner", text))
}

fn span(class: &str, text: &str) -> String {
    format!("<span class=\"{class}\">{}</span>", escape(text))
}

/// HTML 특수 문자를 이스케이프합니다.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}
