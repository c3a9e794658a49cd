use std::env;

use chrono::Duration;
use log::*;
use momo_gateway::MomoConfig;
use sente_common::Money;
use sente_payment_engine::objects::FxRates;

const DEFAULT_SPG_HOST: &str = "127.0.0.1";
const DEFAULT_SPG_PORT: u16 = 8460;
const DEFAULT_POLL_INTERVAL_SECS: i64 = 5;
const DEFAULT_MAX_POLL_FAILURES: u32 = 5;

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    /// Delay between consecutive provider status checks for one in-flight transaction.
    pub poll_interval: Duration,
    /// Consecutive failed status checks tolerated before an in-flight transaction is abandoned.
    pub max_poll_failures: u32,
    /// Static exchange rates used for balance display and swaps.
    pub rates: FxRates,
    /// Mobile money provider credentials and endpoints.
    pub momo: MomoConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_SPG_HOST.to_string(),
            port: DEFAULT_SPG_PORT,
            database_url: String::default(),
            poll_interval: Duration::seconds(DEFAULT_POLL_INTERVAL_SECS),
            max_poll_failures: DEFAULT_MAX_POLL_FAILURES,
            rates: FxRates::default(),
            momo: MomoConfig::default(),
        }
    }
}

impl ServerConfig {
    pub fn from_env_or_default() -> Self {
        let host = env::var("SPG_HOST").ok().unwrap_or_else(|| DEFAULT_SPG_HOST.into());
        let port = env::var("SPG_PORT")
            .map(|s| {
                s.parse::<u16>().unwrap_or_else(|e| {
                    error!(
                        "🪛️ {s} is not a valid port for SPG_PORT. {e} Using the default, {DEFAULT_SPG_PORT}, instead."
                    );
                    DEFAULT_SPG_PORT
                })
            })
            .ok()
            .unwrap_or(DEFAULT_SPG_PORT);
        let database_url = env::var("SPG_DATABASE_URL").ok().unwrap_or_else(|| {
            error!("🪛️ SPG_DATABASE_URL is not set. Please set it to the URL for the wallet ledger database.");
            String::default()
        });
        let poll_interval = env::var("SPG_POLL_INTERVAL_SECS")
            .map_err(|_| {
                info!(
                    "🪛️ SPG_POLL_INTERVAL_SECS is not set. Using the default value of {DEFAULT_POLL_INTERVAL_SECS}s."
                )
            })
            .and_then(|s| {
                s.parse::<i64>()
                    .map(Duration::seconds)
                    .map_err(|e| warn!("🪛️ Invalid configuration value for SPG_POLL_INTERVAL_SECS. {e}"))
            })
            .ok()
            .unwrap_or(Duration::seconds(DEFAULT_POLL_INTERVAL_SECS));
        let max_poll_failures = env::var("SPG_MAX_POLL_FAILURES")
            .map_err(|_| {
                info!("🪛️ SPG_MAX_POLL_FAILURES is not set. Using the default value of {DEFAULT_MAX_POLL_FAILURES}.")
            })
            .and_then(|s| {
                s.parse::<u32>().map_err(|e| warn!("🪛️ Invalid configuration value for SPG_MAX_POLL_FAILURES. {e}"))
            })
            .ok()
            .unwrap_or(DEFAULT_MAX_POLL_FAILURES);
        let rates = configure_rates();
        let momo = MomoConfig::from_env_or_default();
        Self { host, port, database_url, poll_interval, max_poll_failures, rates, momo }
    }
}

/// Rates are decimal USD per whole unit, e.g. `SPG_RATE_HBAR_USD=0.07`. Anything unset keeps the
/// built-in default.
fn configure_rates() -> FxRates {
    let mut rates = FxRates::default();
    if let Ok(raw) = env::var("SPG_RATE_HBAR_USD") {
        match raw.parse::<Money>() {
            Ok(rate) => rates.hbar = rate,
            Err(e) => warn!("🪛️ Invalid configuration value for SPG_RATE_HBAR_USD. {e}"),
        }
    }
    if let Ok(raw) = env::var("SPG_RATE_USDC_USD") {
        match raw.parse::<Money>() {
            Ok(rate) => rates.usdc = rate,
            Err(e) => warn!("🪛️ Invalid configuration value for SPG_RATE_USDC_USD. {e}"),
        }
    }
    if let Ok(raw) = env::var("SPG_RATE_CFA_USD") {
        match raw.parse::<Money>() {
            Ok(rate) => rates.cfa = rate,
            Err(e) => warn!("🪛️ Invalid configuration value for SPG_RATE_CFA_USD. {e}"),
        }
    }
    rates
}
