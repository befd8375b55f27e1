//! 파일 싱크 쓰기 태스크
//!
//! 파일마다 하나의 tokio 태스크가 `BufWriter`를 소유하고 mpsc 채널로 받은
//! 텍스트를 순서대로 씁니다. [`FileSink::close`]는 트레일러를 보낸 뒤
//! 채널을 닫고, 태스크가 플러시를 마칠 때까지 기다립니다.

use std::path::{Path, PathBuf};

use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use serial_spy_core::error::SinkError;

/// 쓰기 채널 버퍼 크기
const WRITE_QUEUE_CAPACITY: usize = 1024;

/// 열린 파일 싱크
#[derive(Debug)]
pub struct FileSink {
    /// 싱크 이름 (`text`, `html`)
    name: &'static str,
    path: PathBuf,
    tx: mpsc::Sender<String>,
    task: JoinHandle<Result<(), SinkError>>,
    failed: bool,
}

impl FileSink {
    /// 파일을 생성(기존 내용 삭제)하고 쓰기 태스크를 시작합니다.
    ///
    /// `prelude`가 있으면 가장 먼저 씁니다.
    pub async fn create(
        name: &'static str,
        path: &Path,
        prelude: Option<String>,
    ) -> Result<Self, SinkError> {
        let file = File::create(path).await.map_err(|e| SinkError::Open {
            sink: name.to_owned(),
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        let (tx, rx) = mpsc::channel(WRITE_QUEUE_CAPACITY);
        let task = tokio::spawn(run_writer(name, file, rx));
        let mut sink = Self {
            name,
            path: path.to_owned(),
            tx,
            task,
            failed: false,
        };

        if let Some(prelude) = prelude {
            sink.write(prelude).await?;
        }

        tracing::debug!(sink = name, path = %path.display(), "file sink opened");
        Ok(sink)
    }

    /// 싱크 이름
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// 파일 경로
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 쓰기 태스크가 이미 종료되었는지 확인합니다.
    pub fn is_failed(&self) -> bool {
        self.failed
    }

    /// 텍스트를 쓰기 큐에 넣습니다.
    pub async fn write(&mut self, chunk: String) -> Result<(), SinkError> {
        if self.failed {
            return Err(SinkError::Closed {
                sink: self.name.to_owned(),
            });
        }
        self.tx.send(chunk).await.map_err(|_| {
            self.failed = true;
            SinkError::Closed {
                sink: self.name.to_owned(),
            }
        })
    }

    /// 트레일러를 쓰고 파일을 닫습니다. 태스크가 끝날 때까지 기다립니다.
    pub async fn close(mut self, trailer: String) -> Result<(), SinkError> {
        // 쓰기 태스크가 이미 실패했다면 아래 join 결과로 원인이 보고됨
        let _ = self.write(trailer).await;
        drop(self.tx);

        let result = self.task.await.map_err(|e| SinkError::Write {
            sink: self.name.to_owned(),
            reason: format!("writer task failed: {e}"),
        })?;

        tracing::debug!(sink = self.name, path = %self.path.display(), "file sink closed");
        result
    }
}

async fn run_writer(
    name: &'static str,
    file: File,
    mut rx: mpsc::Receiver<String>,
) -> Result<(), SinkError> {
    let write_error = |e: std::io::Error| SinkError::Write {
        sink: name.to_owned(),
        reason: e.to_string(),
    };

    let mut writer = BufWriter::new(file);
    while let Some(chunk) = rx.recv().await {
        writer
            .write_all(chunk.as_bytes())
            .await
            .map_err(write_error)?;
    }

    writer.flush().await.map_err(write_error)?;
    writer.shutdown().await.map_err(write_error)?;
    Ok(())
}
