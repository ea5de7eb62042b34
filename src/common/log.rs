use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Registry};
use tracing_tree::HierarchicalLayer;
use tracing_tree::time::Uptime;

/// Installs the global subscriber: an `EnvFilter` read from `RUST_LOG`
/// (falling back to `default_directive`) in front of an indented tree
/// printer on stderr.
pub fn init_logging(default_directive: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    let tree = HierarchicalLayer::default()
        .with_writer(std::io::stderr)
        .with_indent_lines(true)
        .with_targets(true)
        .with_timer(Uptime::default())
        .with_deferred_spans(true)
        .with_span_retrace(true);

    // A subscriber may already be installed (e.g. by test-log).
    let _ = Registry::default().with(filter).with(tree).try_init();
}
