//! S2: Termination request -> orderly shutdown.
//!
//! Validates that a cancelled run closes every transport, drains events that
//! were already delivered, flushes partial frames and finalizes the log files.

use std::time::Duration;

use serial_spy::coordinator::{Coordinator, CoordinatorState};
use serial_spy_pipeline::TransportEvent;
use tokio_util::sync::CancellationToken;

use crate::helpers::config::{channel, file_sinks};
use crate::helpers::console::CapturedConsole;
use crate::helpers::mock_transport::{MockTransport, data};

#[tokio::test]
async fn test_e2e_cancel_drains_queued_events_and_finalizes_files() {
    let dir = tempfile::tempdir().unwrap();
    let console = CapturedConsole::default();
    let transport = MockTransport::new()
        .keep_open()
        .script(0, vec![TransportEvent::Open, data(b"first\npartial")])
        .script(1, vec![TransportEvent::Open]);

    let mut coordinator = Coordinator::new(
        vec![
            channel("/dev/mock0", "ascii", "none"),
            channel("/dev/mock1", "ascii", "none"),
        ],
        file_sinks(&dir),
        transport,
    )
    .with_console(console.sink());

    let shutdown = CancellationToken::new();
    shutdown.cancel();
    let summary = coordinator.run(shutdown).await.unwrap();

    assert_eq!(summary.reason, "termination requested");
    assert_eq!(summary.lines, 2);
    assert_eq!(coordinator.transport().close_count(), 2);
    assert_eq!(
        coordinator.history(),
        [
            CoordinatorState::Validating,
            CoordinatorState::Opening,
            CoordinatorState::Running,
            CoordinatorState::ShuttingDown,
            CoordinatorState::Terminated,
        ]
    );

    let text = std::fs::read_to_string(dir.path().join("spy.log")).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    let partial = lines.iter().position(|l| *l == "partial").unwrap();
    assert_eq!(lines[partial + 1], "[port /dev/mock0 closed]");
    assert!(lines.contains(&"[port /dev/mock1 closed]"));
    assert!(lines.last().unwrap().ends_with(": termination requested"));

    let html = std::fs::read_to_string(dir.path().join("spy.html")).unwrap();
    assert!(html.contains("termination requested"));
    assert!(html.ends_with("</body>\n</html>\n"));
}

#[tokio::test]
async fn test_e2e_cancel_while_running() {
    let console = CapturedConsole::default();
    let transport = MockTransport::new()
        .keep_open()
        .script(0, vec![TransportEvent::Open, data(b"tick\n")]);

    let mut coordinator = Coordinator::new(
        vec![channel("/dev/mock0", "ascii", "none")],
        Default::default(),
        transport,
    )
    .with_console(console.sink());

    let shutdown = CancellationToken::new();
    let trigger = shutdown.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        trigger.cancel();
    });

    let summary = tokio::time::timeout(Duration::from_secs(5), coordinator.run(shutdown))
        .await
        .expect("run should stop after cancellation")
        .unwrap();

    assert_eq!(summary.reason, "termination requested");
    assert_eq!(coordinator.state(), Some(CoordinatorState::Terminated));
    assert_eq!(
        &console.lines()[1..],
        ["[port /dev/mock0 open]", "tick", "[port /dev/mock0 closed]"]
    );
}

#[tokio::test]
async fn test_e2e_trailer_is_not_written_to_console() {
    let dir = tempfile::tempdir().unwrap();
    let console = CapturedConsole::default();

    let mut coordinator = Coordinator::new(
        vec![channel("/dev/mock0", "ascii", "none")],
        file_sinks(&dir),
        MockTransport::new(),
    )
    .with_console(console.sink());

    coordinator.run(CancellationToken::new()).await.unwrap();

    assert!(
        console
            .lines()
            .iter()
            .all(|l| !l.contains("serial-spy stopped"))
    );
    let text = std::fs::read_to_string(dir.path().join("spy.log")).unwrap();
    assert!(text.contains("serial-spy stopped"));
}
