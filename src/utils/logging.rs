use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_FILTER: &str = "storefront=info,storefront_server=info,tower_http=info";
const VERBOSE_FILTER: &str = "storefront=debug,storefront_server=debug,tower_http=debug";

/// Installs the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over the built-in filter. Setting
/// `LOG_FORMAT=json` switches to structured JSON lines.
pub fn init_tracing(verbose: bool) {
    let fallback = if verbose { VERBOSE_FILTER } else { DEFAULT_FILTER };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer()).init();
    }
}
