//! 싱크 팬아웃 -- 모든 레코드를 콘솔, 텍스트 파일, HTML 파일에 동시에 씁니다.
//!
//! # 수명 주기
//! - 열기: 파일 싱크는 시작 시 한 번 생성됩니다. 열기 실패는 경고 후 "없음"으로 강등됩니다.
//! - 쓰기: 수락된 모든 줄과 수명 주기/배너/패닉 레코드
//! - 닫기: [`SinkFanout::close`]가 `self`를 소비하므로 최대 한 번만 호출됩니다.
//!   열린 모든 파일 싱크가 트레일러를 쓰고 플러시를 마칠 때까지 기다리며,
//!   열리지 않은 싱크는 즉시 완료로 취급합니다.

pub mod console;
pub mod html;
pub mod text;
pub mod writer;

pub use console::ConsoleSink;
pub use writer::FileSink;

use std::path::PathBuf;

use serial_spy_core::error::SinkError;

use crate::config::ChannelConfig;
use crate::event::LogRecord;

/// 파일 싱크 설정
#[derive(Debug, Clone, Default)]
pub struct SinkOptions {
    /// 텍스트 로그 경로
    pub text_log: Option<PathBuf>,
    /// HTML 로그 경로
    pub html_log: Option<PathBuf>,
    /// HTML 문서 제목
    pub title: String,
}

/// 싱크 팬아웃
pub struct SinkFanout {
    console: ConsoleSink,
    text: Option<FileSink>,
    html: Option<FileSink>,
}

impl SinkFanout {
    /// 콘솔과 설정된 파일 싱크를 엽니다.
    ///
    /// 파일 싱크 열기 실패는 에러를 반환하지 않습니다.
    pub async fn open(options: &SinkOptions, channels: &[ChannelConfig], console: ConsoleSink) -> Self {
        let text = match &options.text_log {
            Some(path) => degrade(FileSink::create("text", path, None).await),
            None => None,
        };

        let html = match &options.html_log {
            Some(path) => {
                let prelude = html::prelude(&options.title, channels);
                degrade(FileSink::create("html", path, Some(prelude)).await)
            }
            None => None,
        };

        tracing::info!(
            text = text.is_some(),
            html = html.is_some(),
            "sinks opened"
        );

        Self { console, text, html }
    }

    /// 콘솔만 사용하는 팬아웃
    pub fn console_only(console: ConsoleSink) -> Self {
        Self {
            console,
            text: None,
            html: None,
        }
    }

    /// 텍스트 싱크가 열려있는지 확인합니다.
    pub fn has_text(&self) -> bool {
        self.text.is_some()
    }

    /// HTML 싱크가 열려있는지 확인합니다.
    pub fn has_html(&self) -> bool {
        self.html.is_some()
    }

    /// 레코드를 모든 싱크에 씁니다.
    pub async fn write(&mut self, record: &LogRecord) {
        self.console.write(record);

        if let Some(sink) = self.text.as_mut() {
            write_file(sink, text::entry(record)).await;
        }
        if let Some(sink) = self.html.as_mut() {
            write_file(sink, html::entry(record)).await;
        }
    }

    /// 트레일러를 쓰고 모든 파일 싱크를 닫습니다.
    ///
    /// 모든 싱크가 끝난 뒤 첫 번째 에러를 반환합니다.
    pub async fn close(self, trailer: &str) -> Result<(), SinkError> {
        let Self {
            text: text_sink,
            html: html_sink,
            ..
        } = self;
        let text_done = async move {
            match text_sink {
                Some(sink) => sink.close(text::trailer(trailer)).await,
                None => Ok(()),
            }
        };
        let html_done = async move {
            match html_sink {
                Some(sink) => sink.close(html::trailer(trailer)).await,
                None => Ok(()),
            }
        };

        let (text_result, html_result) = tokio::join!(text_done, html_done);
        for result in [&text_result, &html_result] {
            if let Err(e) = result {
                tracing::warn!(error = %e, "sink did not close cleanly");
            }
        }
        text_result.and(html_result)
    }
}

fn degrade(result: Result<FileSink, SinkError>) -> Option<FileSink> {
    match result {
        Ok(sink) => Some(sink),
        Err(e) => {
            tracing::warn!(error = %e, "file sink disabled");
            None
        }
    }
}

async fn write_file(sink: &mut FileSink, chunk: String) {
    let already_failed = sink.is_failed();
    if let Err(e) = sink.write(chunk).await
        && !already_failed
    {
        tracing::warn!(
            sink = sink.name(),
            path = %sink.path().display(),
            error = %e,
            "file sink write failed"
        );
    }
}
