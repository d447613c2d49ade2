//! Tracing setup for Cardwatch binaries.
//!
//! [`init_tracing`] installs the global subscriber once; later calls are
//! no-ops. Log lines go to stderr so report output on stdout stays clean.

use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Crates whose verbosity follows `level`; everything else stays at `warn`.
const OWN_TARGETS: [&str; 2] = ["cardwatch_core", "cardwatch"];

/// Install the global subscriber.
///
/// `RUST_LOG` wins when set. Otherwise Cardwatch's own targets log at
/// `level` and dependencies at `warn`. With `json`, each event is one JSON
/// line; at debug level and below, event targets are included.
pub fn init_tracing(json: bool, level: Level) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(level)));
    let with_target = matches!(level, Level::DEBUG | Level::TRACE);
    let layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(with_target);

    let registry = tracing_subscriber::registry().with(filter);
    let installed = if json {
        registry.with(layer.json()).try_init()
    } else {
        registry.with(layer).try_init()
    };
    if installed.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}

fn default_directives(level: Level) -> String {
    let level = level.as_str().to_ascii_lowercase();
    let mut directives = vec!["warn".to_string()];
    directives.extend(OWN_TARGETS.iter().map(|target| format!("{target}={level}")));
    directives.join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directives_scope_own_crates() {
        assert_eq!(
            default_directives(Level::DEBUG),
            "warn,cardwatch_core=debug,cardwatch=debug"
        );
    }

    #[test]
    fn test_init_twice_is_harmless() {
        init_tracing(false, Level::INFO);
        init_tracing(true, Level::DEBUG);
    }
}
