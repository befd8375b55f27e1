//! S6: Coordinator lifecycle and shared stamp clock.

use serial_spy::coordinator::{Coordinator, CoordinatorState};
use serial_spy_pipeline::{SinkOptions, TransportEvent};
use tokio_util::sync::CancellationToken;

use crate::helpers::config::channel;
use crate::helpers::console::CapturedConsole;
use crate::helpers::mock_transport::{MockTransport, data};

#[tokio::test]
async fn test_e2e_state_history_for_normal_run() {
    let mut coordinator = Coordinator::new(
        vec![channel("/dev/mock0", "ascii", "none")],
        SinkOptions::default(),
        MockTransport::new(),
    )
    .with_console(CapturedConsole::default().sink());

    assert_eq!(coordinator.state(), None);
    coordinator.run(CancellationToken::new()).await.unwrap();

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
}

#[tokio::test]
async fn test_e2e_channels_open_in_configuration_order() {
    let transport = MockTransport::new().keep_open().failing_open(1);
    let mut coordinator = Coordinator::new(
        vec![
            channel("/dev/mock0", "ascii", "none"),
            channel("/dev/mock1", "ascii", "none"),
            channel("/dev/mock2", "ascii", "none"),
        ],
        SinkOptions::default(),
        transport,
    )
    .with_console(CapturedConsole::default().sink());

    let shutdown = CancellationToken::new();
    shutdown.cancel();
    coordinator.run(shutdown).await.unwrap();

    assert_eq!(
        coordinator.transport().opened,
        ["/dev/mock0", "/dev/mock1", "/dev/mock2"]
    );
    // only handles that were actually opened get closed
    assert_eq!(coordinator.transport().close_count(), 2);
}

#[tokio::test]
async fn test_e2e_diff_stamp_is_shared_across_channels() {
    let console = CapturedConsole::default();
    let transport = MockTransport::new()
        .script(0, vec![data(b"a\n")])
        .script(1, vec![data(b"b\n")]);

    let mut coordinator = Coordinator::new(
        vec![
            channel("/dev/mock0", "ascii", "diff"),
            channel("/dev/mock1", "ascii", "diff"),
        ],
        SinkOptions::default(),
        transport,
    )
    .with_console(console.sink());

    coordinator.run(CancellationToken::new()).await.unwrap();

    let lines = console.lines();
    let first = lines.iter().find(|l| l.ends_with(" A> a")).unwrap();
    let second = lines.iter().find(|l| l.ends_with(" B> b")).unwrap();
    // no baseline yet: the first stamp is an elapsed value
    assert!(!first.starts_with('+'), "{first}");
    assert!(second.starts_with('+'), "{second}");
}

#[tokio::test]
async fn test_e2e_time_stamp_shape() {
    let console = CapturedConsole::default();
    let transport = MockTransport::new().script(0, vec![data(b"now\n")]);

    let mut coordinator = Coordinator::new(
        vec![channel("/dev/mock0", "ascii", "time")],
        SinkOptions::default(),
        transport,
    )
    .with_console(console.sink());

    coordinator.run(CancellationToken::new()).await.unwrap();

    let lines = console.lines();
    let line = lines.iter().find(|l| l.ends_with(" A> now")).unwrap();
    let stamp = line.split(' ').next().unwrap();
    // MM/DD-HH:MM:SS.ffff
    assert_eq!(stamp.len(), 19, "{stamp}");
    assert_eq!(&stamp[2..3], "/");
    assert_eq!(&stamp[5..6], "-");
    assert_eq!(&stamp[14..15], ".");
}

#[tokio::test]
async fn test_e2e_open_event_sets_channel_open_line() {
    let console = CapturedConsole::default();
    let transport = MockTransport::new().script(0, vec![TransportEvent::Open]);

    let mut coordinator = Coordinator::new(
        vec![channel("/dev/mock0", "ascii", "none")],
        SinkOptions::default(),
        transport,
    )
    .with_console(console.sink());

    let summary = coordinator.run(CancellationToken::new()).await.unwrap();
    assert_eq!(summary.lines, 0);
    assert_eq!(
        &console.lines()[1..],
        ["[port /dev/mock0 open]", "[port /dev/mock0 closed]"]
    );
}
