use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::FmtSubscriber;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    HumanReadable,
    Json,
}

/// Configure the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over `default_level`.
///
/// Only the first call in a process has an effect.
pub fn configure_global_logger(default_level: tracing::Level, format: LogFormat) {
    let env_filter = EnvFilter::builder()
        .with_default_directive(default_level.into())
        .from_env_lossy();

    let result = match format {
        LogFormat::HumanReadable => {
            let subscriber = FmtSubscriber::builder()
                .with_test_writer()
                .with_env_filter(env_filter)
                .with_thread_ids(true)
                .with_thread_names(true)
                .with_file(true)
                .with_line_number(true)
                .finish();
            tracing::subscriber::set_global_default(subscriber)
        }
        LogFormat::Json => {
            let subscriber = FmtSubscriber::builder()
                .with_test_writer()
                .with_env_filter(env_filter)
                .with_file(true)
                .with_line_number(true)
                .json()
                .finish();
            tracing::subscriber::set_global_default(subscriber)
        }
    };

    // Already set, e.g. multiple tests in the same binary.
    if result.is_err() {
        tracing::debug!("global logger already configured");
    }
}
