use tracing_bunyan_formatter::{BunyanFormattingLayer, JsonStorageLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_FILTER: &str = "cupom_server=info,cupom_ocr=info,tower_http=info";

/// Install the global subscriber. `LOG_FORMAT=json` emits Bunyan JSON lines.
pub fn init(service_name: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into());
    let json = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));

    let (bunyan, fmt) = if json {
        (
            Some(BunyanFormattingLayer::new(service_name.to_string(), std::io::stdout)),
            None,
        )
    } else {
        (None, Some(tracing_subscriber::fmt::layer()))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(bunyan.is_some().then_some(JsonStorageLayer))
        .with(bunyan)
        .with(fmt)
        .init();
}
