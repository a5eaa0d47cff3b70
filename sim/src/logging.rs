//! Global logging system.

use std::{env, panic};

use anyhow::Context;
use backtrace::Backtrace;
use tracing_subscriber::{
    EnvFilter, Registry,
    fmt::{self, time::uptime},
    prelude::*,
};

/// Default logging environment filter. Our crates are info, everything else is warn.
const DEFAULT_FILTER: &str = "warn,scene=info,sim=info";

/// Build the filter string: the default, extended by `RUST_LOG` if set.
fn filter_directives(env_filter: Option<&str>) -> String {
    let mut filter = DEFAULT_FILTER.to_owned();
    if let Some(env_filter) = env_filter.filter(|f| !f.is_empty()) {
        filter.push(',');
        filter.push_str(env_filter);
    }
    filter
}

/// Installs a `tracing` backend writing to stdout. `log` records from the scene
/// library are forwarded into it. Accepts ecosystem-standard `RUST_LOG` filters.
pub fn init_logging() -> anyhow::Result<()> {
    let format = fmt::format()
        .compact()
        .with_timer(uptime())
        .with_line_number(true);
    let stdout_log = fmt::layer().event_format(format);

    let env_filter = env::var(EnvFilter::DEFAULT_ENV).ok();
    let filter = filter_directives(env_filter.as_deref());

    Registry::default()
        .with(EnvFilter::new(filter))
        .with(stdout_log)
        .try_init()
        .context("unable to install log subscriber")?;
    tracing::info!("starting program");

    // make panic messages and backtrace go through logging system
    panic::set_hook(Box::new(|info| {
        tracing::error!("{}", info);
        if env::var("RUST_BACKTRACE").map(|val| val == "1").unwrap_or(true) {
            tracing::error!("{:?}", Backtrace::new());
        }
    }));
    tracing::trace!("installed custom panic hook");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_filter_extends_default() {
        assert_eq!(filter_directives(None), DEFAULT_FILTER);
        assert_eq!(filter_directives(Some("")), DEFAULT_FILTER);
        assert_eq!(
            filter_directives(Some("scene=debug")),
            "warn,scene=info,sim=info,scene=debug"
        );
    }
}
