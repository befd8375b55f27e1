//! S1: Frames travel from the transport through the pipeline into every sink.

use serial_spy::coordinator::Coordinator;
use serial_spy_pipeline::{SinkOptions, TransportEvent};
use tokio_util::sync::CancellationToken;

use crate::helpers::config::{channel, file_sinks, with_filters, with_replacement};
use crate::helpers::console::CapturedConsole;
use crate::helpers::mock_transport::{MockTransport, data};

#[tokio::test]
async fn test_e2e_frames_reach_console_and_files() {
    let dir = tempfile::tempdir().unwrap();
    let console = CapturedConsole::default();
    let transport = MockTransport::new()
        .script(
            0,
            vec![
                TransportEvent::Open,
                data(b"hello\nwor"),
                data(b"ld\n"),
                TransportEvent::Close,
            ],
        )
        .script(1, vec![TransportEvent::Open, data(b"AB\n"), TransportEvent::Close]);

    let mut coordinator = Coordinator::new(
        vec![
            channel("/dev/mock0", "ascii", "none"),
            channel("/dev/mock1", "hex", "normal"),
        ],
        file_sinks(&dir),
        transport,
    )
    .with_console(console.sink());

    let summary = coordinator.run(CancellationToken::new()).await.unwrap();
    assert_eq!(summary.reason, "all channels closed");
    assert_eq!(summary.channels, 2);
    assert_eq!(summary.lines, 3);

    let lines = console.lines();
    assert!(lines[0].starts_with("serial-spy "), "banner first: {lines:?}");
    assert!(lines.contains(&"[port /dev/mock0 open]".to_owned()));
    assert!(lines.contains(&"hello".to_owned()));
    assert!(lines.contains(&"world".to_owned()));
    assert!(
        lines.iter().any(|l| l.ends_with(" B> 41 42")),
        "stamped hex line: {lines:?}"
    );
    assert!(lines.contains(&"[port /dev/mock1 closed]".to_owned()));

    let text = std::fs::read_to_string(dir.path().join("spy.log")).unwrap();
    let text_lines: Vec<&str> = text.lines().collect();
    assert!(text_lines[0].starts_with("serial-spy "));
    assert!(text_lines.contains(&"hello"));
    assert!(text_lines.last().unwrap().ends_with(": all channels closed"));

    let html = std::fs::read_to_string(dir.path().join("spy.html")).unwrap();
    assert!(html.contains(".ch2"));
    assert!(html.contains("hello"));
    assert!(html.ends_with("</html>\n"));
}

#[tokio::test]
async fn test_e2e_console_without_file_sinks() {
    let console = CapturedConsole::default();
    let transport =
        MockTransport::new().script(0, vec![TransportEvent::Open, data(b"one\ntwo\n")]);

    let mut coordinator = Coordinator::new(
        vec![channel("/dev/mock0", "utf8", "none")],
        SinkOptions::default(),
        transport,
    )
    .with_console(console.sink());

    let summary = coordinator.run(CancellationToken::new()).await.unwrap();
    assert_eq!(summary.lines, 2);

    let lines = console.lines();
    assert_eq!(
        &lines[1..],
        ["[port /dev/mock0 open]", "one", "two", "[port /dev/mock0 closed]"]
    );
}

#[tokio::test]
async fn test_e2e_filters_and_replacements_apply_per_channel() {
    let console = CapturedConsole::default();
    let filtered = with_replacement(
        with_filters(channel("/dev/mock0", "ascii", "none"), &["ERR"], 1),
        r"secret=\w+",
        "secret=***",
    );
    let transport = MockTransport::new()
        .script(0, vec![data(b"ok1\nERR secret=abc\nok2\nok3\n")])
        .script(1, vec![data(b"ok4\n")]);

    let mut coordinator = Coordinator::new(
        vec![filtered, channel("/dev/mock1", "ascii", "none")],
        SinkOptions::default(),
        transport,
    )
    .with_console(console.sink());

    coordinator.run(CancellationToken::new()).await.unwrap();

    let lines = console.lines();
    assert!(lines.contains(&"ERR secret=***".to_owned()));
    assert!(lines.contains(&"ok2".to_owned()));
    assert!(!lines.contains(&"ok1".to_owned()));
    assert!(!lines.contains(&"ok3".to_owned()));
    // the unfiltered channel is untouched
    assert!(lines.contains(&"ok4".to_owned()));
}
