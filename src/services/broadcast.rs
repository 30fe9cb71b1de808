//! Markdown rendering of signals for chat broadcasts.

use crate::types::GeneratedSignal;
use chrono::{DateTime, Utc};

const HTTP_DATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";

fn http_date(time: &DateTime<Utc>) -> String {
    time.format(HTTP_DATE_FORMAT).to_string()
}

/// Render one signal as a Markdown message.
pub fn format_signal(signal: &GeneratedSignal) -> String {
    let mut lines = vec![
        format!("*{}* • {}", signal.pair, signal.direction.label()),
        format!("Quality: *{}%*", signal.quality),
        format!(
            "RSI: {:.2} • MACD: {:.4}",
            signal.rsi, signal.macd_histogram
        ),
        format!("Generated: {}", http_date(&signal.generated_at)),
    ];

    let next_entry = signal
        .metadata
        .as_ref()
        .and_then(|m| DateTime::parse_from_rfc3339(&m.next_entry_time).ok());
    if let Some(next_entry) = next_entry {
        lines.push(format!(
            "Next entry window: {}",
            http_date(&next_entry.with_timezone(&Utc))
        ));
    }

    lines.join("\n")
}

/// Join up to `max` signals into one message. `None` when nothing to send.
pub fn format_digest(signals: &[GeneratedSignal], max: usize) -> Option<String> {
    if signals.is_empty() || max == 0 {
        return None;
    }

    Some(
        signals
            .iter()
            .take(max)
            .map(format_signal)
            .collect::<Vec<_>>()
            .join("\n\n"),
    )
}
