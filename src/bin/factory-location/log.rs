use tracing::Level;
use tracing::subscriber::SetGlobalDefaultError;
use tracing_subscriber::{FmtSubscriber, filter::EnvFilter};

const LOG_ENV: &str = "FACTORY_LOCATION_LOG";

/// Configuration of logging, warnings go to stderr unless `FACTORY_LOCATION_LOG` says otherwise.
pub(crate) fn init() -> Result<(), SetGlobalDefaultError> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::WARN)
        .with_writer(std::io::stderr)
        .with_ansi(std::env::var("NO_COLOR").is_err())
        .with_line_number(true);

    if let Ok(env_filter) = EnvFilter::try_from_env(LOG_ENV) {
        let subscriber = subscriber.with_env_filter(env_filter).finish();
        tracing::subscriber::set_global_default(subscriber)
    } else {
        let subscriber = subscriber.finish();
        tracing::subscriber::set_global_default(subscriber)
    }
}
