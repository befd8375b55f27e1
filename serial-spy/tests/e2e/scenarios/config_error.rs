//! S3: Invalid channel set -> nothing is opened.
//!
//! Validates that a single bad channel rejects the whole set, that the error
//! still reaches the log files and that no transport is touched.

use serial_spy::coordinator::{Coordinator, CoordinatorState};
use serial_spy_core::config::SpyConfig;
use serial_spy_core::error::{ChannelError, SpyError};
use serial_spy_pipeline::TransportEvent;
use tokio_util::sync::CancellationToken;

use crate::helpers::config::{channel, file_sinks};
use crate::helpers::console::CapturedConsole;
use crate::helpers::mock_transport::{MockTransport, data};

#[tokio::test]
async fn test_e2e_invalid_value_rejects_every_channel() {
    let dir = tempfile::tempdir().unwrap();
    let console = CapturedConsole::default();
    let transport = MockTransport::new().script(0, vec![TransportEvent::Open, data(b"x\n")]);

    let mut coordinator = Coordinator::new(
        vec![
            channel("/dev/mock0", "ascii", "none"),
            channel("/dev/mock1", "octal", "none"),
        ],
        file_sinks(&dir),
        transport,
    )
    .with_console(console.sink());

    let err = coordinator.run(CancellationToken::new()).await.unwrap_err();
    match err {
        SpyError::Channel(ChannelError::InvalidValue { index, field, .. }) => {
            assert_eq!(index, 1);
            assert_eq!(field, "format");
        }
        other => panic!("expected invalid value, got {other:?}"),
    }

    assert!(coordinator.transport().opened.is_empty());
    assert!(coordinator.history().contains(&CoordinatorState::Panicked));
    assert!(!coordinator.history().contains(&CoordinatorState::Running));
    assert_eq!(coordinator.state(), Some(CoordinatorState::Terminated));

    let console_lines = console.lines();
    assert_eq!(console_lines.len(), 1);
    assert!(console_lines[0].starts_with("[configuration error: "));

    let text = std::fs::read_to_string(dir.path().join("spy.log")).unwrap();
    assert!(text.starts_with("[configuration error: "));
    assert!(text.trim_end().ends_with(": configuration error"));

    let html = std::fs::read_to_string(dir.path().join("spy.html")).unwrap();
    assert!(html.contains("class=\"panic\""));
    assert!(html.ends_with("</html>\n"));
}

#[tokio::test]
async fn test_e2e_missing_fields_are_reported_together() {
    let mut incomplete = channel("/dev/mock0", "ascii", "none");
    incomplete.com_port = None;
    incomplete.delimiter = None;

    let mut coordinator = Coordinator::new(
        vec![incomplete],
        Default::default(),
        MockTransport::new(),
    )
    .with_console(CapturedConsole::default().sink());

    let err = coordinator.run(CancellationToken::new()).await.unwrap_err();
    match err {
        SpyError::Channel(ChannelError::MissingFields { index, fields }) => {
            assert_eq!(index, 0);
            assert_eq!(fields.len(), 2);
        }
        other => panic!("expected missing fields, got {other:?}"),
    }
}

#[tokio::test]
async fn test_e2e_empty_delimiter_pattern_is_rejected() {
    let config = SpyConfig::parse(
        r#"[{
            "comPort": "/dev/mock0",
            "openOptions": { "baudRate": 9600, "dataBits": 8, "parity": "none" },
            "color": "white",
            "bgColor": "bgBlack",
            "delimiter": "x*",
            "format": "ascii",
            "stamp": "none",
            "translateCtrl": "no"
        }]"#,
    )
    .unwrap();

    let mut coordinator = Coordinator::new(config.channels, Default::default(), MockTransport::new())
        .with_console(CapturedConsole::default().sink());

    let err = coordinator.run(CancellationToken::new()).await.unwrap_err();
    assert!(matches!(
        err,
        SpyError::Channel(ChannelError::InvalidPattern { ref field, .. }) if field == "delimiter"
    ));
    assert!(coordinator.transport().opened.is_empty());
}
