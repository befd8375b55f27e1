//! Channel settings builders for E2E tests.

use serial_spy_core::config::{
    ChannelSettings, FlagValue, IntValue, OpenOptionsSettings, ReplacementSettings,
};
use serial_spy_pipeline::SinkOptions;

/// A complete, valid channel using `\n` as delimiter.
pub fn channel(port: &str, format: &str, stamp: &str) -> ChannelSettings {
    ChannelSettings {
        com_port: Some(port.to_owned()),
        open_options: Some(OpenOptionsSettings {
            baud_rate: Some(IntValue::from(115_200)),
            data_bits: Some(IntValue::Text("8".to_owned())),
            parity: Some("none".to_owned()),
            stop_bits: None,
        }),
        color: Some("green".to_owned()),
        bg_color: Some("bgBlack".to_owned()),
        delimiter: Some("\n".to_owned()),
        format: Some(format.to_owned()),
        stamp: Some(stamp.to_owned()),
        translate_ctrl: Some(FlagValue::Text("no".to_owned())),
        filters: None,
        replacements: None,
        remanence: None,
    }
}

/// Add filters and a remanence window.
#[allow(dead_code)]
pub fn with_filters(mut settings: ChannelSettings, filters: &[&str], remanence: u64) -> ChannelSettings {
    settings.filters = Some(filters.iter().map(|f| (*f).to_owned()).collect());
    settings.remanence = Some(IntValue::from(remanence));
    settings
}

/// Add one replacement rule.
#[allow(dead_code)]
pub fn with_replacement(mut settings: ChannelSettings, what: &str, with: &str) -> ChannelSettings {
    settings
        .replacements
        .get_or_insert_with(Vec::new)
        .push(ReplacementSettings {
            what: Some(what.to_owned()),
            with: Some(with.to_owned()),
        });
    settings
}

/// Text and HTML sinks inside `dir`.
#[allow(dead_code)]
pub fn file_sinks(dir: &tempfile::TempDir) -> SinkOptions {
    SinkOptions {
        text_log: Some(dir.path().join("spy.log")),
        html_log: Some(dir.path().join("spy.html")),
        title: "e2e".to_owned(),
    }
}
