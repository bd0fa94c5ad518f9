use log::warn;
use std::str::FromStr;
use std::time::Duration;

use crate::solver::SolverConfig;

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";

/// Runtime settings of the HTTP service.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub bind_addr: String,
    pub solver: SolverConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            solver: SolverConfig::default(),
        }
    }
}

impl AppConfig {
    /// Reads `TIMETABLE_*` environment variables on top of the defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = AppConfig::default();
        if let Some(addr) = lookup("TIMETABLE_BIND_ADDR") {
            config.bind_addr = addr;
        }
        if let Some(secs) = parse::<f64>(&lookup, "TIMETABLE_TIME_LIMIT_SECS") {
            match Duration::try_from_secs_f64(secs) {
                Ok(limit) => config.solver.time_limit = Some(limit),
                Err(_) => warn!("Ignoring invalid TIMETABLE_TIME_LIMIT_SECS={secs}"),
            }
        }
        if let Some(threads) = parse::<u32>(&lookup, "TIMETABLE_THREADS") {
            config.solver.threads = threads.max(1);
        }
        if let Some(seed) = parse::<i32>(&lookup, "TIMETABLE_RANDOM_SEED") {
            config.solver.random_seed = seed;
        }
        config
    }
}

fn parse<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!("Ignoring malformed {key}={raw}");
            None
        }
    }
}
