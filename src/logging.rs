use crate::util::env_nonempty;
use std::fs::OpenOptions;
use std::io::IsTerminal;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_PATH: &str = "/tmp/replf-debug.log";
const LOG_PATH_ENV: &str = "REPLF_LOG_PATH";
const LOG_FILTER_ENV: &str = "REPLF_LOG";
const DEFAULT_FILTER: &str = "warn";

/// Installs the global subscriber. Logs never share the terminal with the
/// edit area: they go to a file when stderr is a terminal.
pub fn init() {
    let filter = EnvFilter::try_from_env(LOG_FILTER_ENV)
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    if let Some(path) = resolve_log_path() {
        match OpenOptions::new().create(true).append(true).open(&path) {
            Ok(file) => {
                let _ = tracing_subscriber::fmt()
                    .with_env_filter(filter)
                    .with_ansi(false)
                    .with_writer(Mutex::new(file))
                    .try_init();
                return;
            }
            Err(err) => eprintln!("replf: cannot open log file {path}: {err}"),
        }
    }

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn resolve_log_path() -> Option<String> {
    env_nonempty(LOG_PATH_ENV).or_else(|| {
        if std::io::stderr().is_terminal() {
            Some(DEFAULT_LOG_PATH.to_string())
        } else {
            None
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_log_path_uses_env_override() {
        let _env_lock = crate::test_support::ENV_LOCK
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        std::env::set_var(LOG_PATH_ENV, " /tmp/test-replf.log ");
        assert_eq!(resolve_log_path().as_deref(), Some("/tmp/test-replf.log"));
        std::env::remove_var(LOG_PATH_ENV);
    }

    #[test]
    fn test_blank_log_path_is_ignored() {
        let _env_lock = crate::test_support::ENV_LOCK
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        std::env::set_var(LOG_PATH_ENV, "   ");
        let resolved = resolve_log_path();
        assert_ne!(resolved.as_deref(), Some(""));
        std::env::remove_var(LOG_PATH_ENV);
    }
}
