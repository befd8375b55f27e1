//! S4: Per-channel failures stay local.
//!
//! Validates that a port that cannot be opened, a port that fails mid-run
//! and a log file that cannot be created never stop the other channels.

use serial_spy::coordinator::Coordinator;
use serial_spy_pipeline::{SinkOptions, TransportEvent};
use tokio_util::sync::CancellationToken;

use crate::helpers::config::channel;
use crate::helpers::console::CapturedConsole;
use crate::helpers::mock_transport::{MockTransport, data};

#[tokio::test]
async fn test_e2e_open_failure_does_not_stop_other_channels() {
    let console = CapturedConsole::default();
    let transport = MockTransport::new()
        .failing_open(0)
        .script(1, vec![TransportEvent::Open, data(b"alive\n")]);

    let mut coordinator = Coordinator::new(
        vec![
            channel("/dev/mock0", "ascii", "none"),
            channel("/dev/mock1", "ascii", "none"),
        ],
        SinkOptions::default(),
        transport,
    )
    .with_console(console.sink());

    let summary = coordinator.run(CancellationToken::new()).await.unwrap();
    assert_eq!(summary.channels, 2);
    assert_eq!(summary.lines, 1);
    assert_eq!(coordinator.transport().opened, ["/dev/mock0", "/dev/mock1"]);

    let lines = console.lines();
    assert!(
        lines.contains(
            &"[port /dev/mock0 in error: cannot open port /dev/mock0: mock open failure]"
                .to_owned()
        ),
        "{lines:?}"
    );
    assert!(lines.contains(&"alive".to_owned()));
    // a port that never opened is not reported as closed
    assert!(!lines.contains(&"[port /dev/mock0 closed]".to_owned()));
    assert!(lines.contains(&"[port /dev/mock1 closed]".to_owned()));
}

#[tokio::test]
async fn test_e2e_read_error_closes_only_that_channel() {
    let console = CapturedConsole::default();
    let transport = MockTransport::new()
        .script(
            0,
            vec![
                TransportEvent::Open,
                data(b"before\nhalf"),
                TransportEvent::Error("port /dev/mock0 read failed: unplugged".to_owned()),
                TransportEvent::Close,
            ],
        )
        .script(1, vec![TransportEvent::Open, data(b"steady\n")]);

    let mut coordinator = Coordinator::new(
        vec![
            channel("/dev/mock0", "ascii", "none"),
            channel("/dev/mock1", "ascii", "none"),
        ],
        SinkOptions::default(),
        transport,
    )
    .with_console(console.sink());

    coordinator.run(CancellationToken::new()).await.unwrap();

    let lines = console.lines();
    let error = lines
        .iter()
        .position(|l| l.starts_with("[port /dev/mock0 in error: "))
        .unwrap();
    // the partial frame is flushed when the port closes
    assert_eq!(lines[error + 1], "half");
    assert_eq!(lines[error + 2], "[port /dev/mock0 closed]");
    assert_eq!(
        lines
            .iter()
            .filter(|l| *l == "[port /dev/mock0 closed]")
            .count(),
        1
    );
    assert!(lines.contains(&"steady".to_owned()));
}

#[tokio::test]
async fn test_e2e_unwritable_text_log_keeps_html_log() {
    let dir = tempfile::tempdir().unwrap();
    let sinks = SinkOptions {
        text_log: Some(dir.path().join("missing-dir").join("spy.log")),
        html_log: Some(dir.path().join("spy.html")),
        title: "degraded".to_owned(),
    };
    let console = CapturedConsole::default();
    let transport = MockTransport::new().script(0, vec![data(b"kept\n")]);

    let mut coordinator = Coordinator::new(
        vec![channel("/dev/mock0", "ascii", "none")],
        sinks,
        transport,
    )
    .with_console(console.sink());

    coordinator.run(CancellationToken::new()).await.unwrap();

    assert!(console.lines().contains(&"kept".to_owned()));
    assert!(!dir.path().join("missing-dir").exists());
    let html = std::fs::read_to_string(dir.path().join("spy.html")).unwrap();
    assert!(html.contains("<title>degraded</title>"));
    assert!(html.contains("kept"));
}
