use std::fmt::Write;
use std::sync::Arc;

use tracing::field::{Field, Visit};
use tracing::Subscriber;
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use crate::common::{ModError, TextBuf};
use crate::host::Console;

/// 转发到宿主日志时的前缀
pub const LOG_PREFIX: &str = "[demo-mod]";

/// 自定义 tracing Layer，将日志事件写入宿主的 `note`
pub struct HostLogLayer<C: ?Sized> {
    console: Arc<C>,
}

impl<C: Console + ?Sized> HostLogLayer<C> {
    pub fn new(console: Arc<C>) -> Self {
        Self { console }
    }
}

/// 用于提取 tracing 事件的 message 字段，直接写入定长缓冲区
struct MessageVisitor {
    message: TextBuf,
    fields: TextBuf,
}

impl MessageVisitor {
    fn new() -> Self {
        Self {
            message: TextBuf::new(),
            fields: TextBuf::new(),
        }
    }

    fn format_output(&self, level: &str) -> TextBuf {
        crate::text!("{} {}: {}{}", LOG_PREFIX, level, self.message, self.fields)
    }
}

impl Visit for MessageVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.message.clear();
            let _ = write!(self.message, "{:?}", value);
        } else {
            let _ = write!(self.fields, " {}={:?}", field.name(), value);
        }
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message.clear();
            self.message.push_str(value);
        } else {
            let _ = write!(self.fields, " {}={}", field.name(), value);
        }
    }
}

impl<S, C> Layer<S> for HostLogLayer<C>
where
    S: Subscriber,
    C: Console + Send + Sync + ?Sized + 'static,
{
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        let level = match *event.metadata().level() {
            tracing::Level::ERROR => "error",
            tracing::Level::WARN => "warning",
            tracing::Level::INFO => "info",
            tracing::Level::DEBUG => "debug",
            tracing::Level::TRACE => "trace",
        };

        let mut visitor = MessageVisitor::new();
        event.record(&mut visitor);
        self.console.note(&visitor.format_output(level));
    }
}

/// 构造过滤器：优先 `RUST_LOG`，其次配置中的级别
pub fn build_filter(configured: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(configured))
        .unwrap_or_else(|_| EnvFilter::new("warn"))
}

/// 安装全局 subscriber；宿主进程中已有 subscriber 时返回错误，由调用方忽略
pub fn install<C>(console: Arc<C>, configured: &str) -> Result<(), ModError>
where
    C: Console + Send + Sync + ?Sized + 'static,
{
    tracing_subscriber::registry()
        .with(build_filter(configured))
        .with(HostLogLayer::new(console))
        .try_init()
        .map_err(|e| ModError::Logging(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::RecordingHost;

    #[test]
    fn forwards_events_to_note() {
        let host = Arc::new(RecordingHost::new());
        let subscriber = tracing_subscriber::registry().with(HostLogLayer::new(host.clone()));
        tracing::subscriber::with_default(subscriber, || {
            tracing::warn!(frame = 7, "overlay slow");
        });
        assert_eq!(host.notes(), vec!["[demo-mod] warning: overlay slow frame=7"]);
        assert!(host.lines().is_empty());
    }

    #[test]
    fn filter_drops_lower_levels() {
        let host = Arc::new(RecordingHost::new());
        let subscriber = tracing_subscriber::registry()
            .with(EnvFilter::new("warn"))
            .with(HostLogLayer::new(host.clone()));
        tracing::subscriber::with_default(subscriber, || {
            tracing::debug!("hidden");
            tracing::error!("shown");
        });
        assert_eq!(host.notes(), vec!["[demo-mod] error: shown"]);
    }

    #[test]
    fn long_messages_are_truncated() {
        let host = Arc::new(RecordingHost::new());
        let subscriber = tracing_subscriber::registry().with(HostLogLayer::new(host.clone()));
        let long = "y".repeat(600);
        tracing::subscriber::with_default(subscriber, || {
            tracing::info!("{}", long);
        });
        let notes = host.notes();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].len(), crate::common::TEXT_CAPACITY - 1);
        assert!(notes[0].starts_with("[demo-mod] info: yyy"));
    }
}
