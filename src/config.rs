use crate::catalog::CatalogSource;
use crate::view::ReconcileStrategy;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use tracing::warn;

#[derive(Debug, Clone)]
pub struct Config {
    pub bind: SocketAddr,
    pub catalog: CatalogSource,
    pub data_dir: PathBuf,
    pub start_collapsed: bool,
    pub strategy: ReconcileStrategy,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Unparseable values log a warning and use the default.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let port = parsed(&lookup, "PORT", |value| value.parse::<u16>().ok()).unwrap_or(8080);
        let ip = parsed(&lookup, "DAILYS_BIND_ADDR", |value| value.parse::<IpAddr>().ok())
            .unwrap_or(IpAddr::V4(Ipv4Addr::LOCALHOST));

        let catalog = lookup("DAILYS_CATALOG")
            .filter(|value| !value.trim().is_empty())
            .map(|value| CatalogSource::parse(&value))
            .unwrap_or_else(|| CatalogSource::File(PathBuf::from("dailys.json")));

        let data_dir = lookup("APP_DATA_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("data"));

        let start_collapsed = parsed(&lookup, "DAILYS_START_COLLAPSED", parse_bool).unwrap_or(true);
        let strategy = parsed(&lookup, "DAILYS_RECONCILE", ReconcileStrategy::parse)
            .unwrap_or(ReconcileStrategy::Incremental);

        Self {
            bind: SocketAddr::new(ip, port),
            catalog,
            data_dir,
            start_collapsed,
            strategy,
        }
    }
}

fn parsed<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    parse: impl Fn(&str) -> Option<T>,
) -> Option<T> {
    let raw = lookup(key)?;
    let value = parse(raw.trim());
    if value.is_none() {
        warn!("ignoring invalid {key}={raw:?}");
    }
    value
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
