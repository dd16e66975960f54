use std::env;
use std::path::PathBuf;

use crate::pipeline::{default_pairs, JoinPolicy, Metric, MetricPair};

/// Where correlation reports are written.
#[derive(Debug, Clone, PartialEq)]
pub enum BackendType {
    Csv,
    Sqlite,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidValue(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::InvalidValue(msg) => write!(f, "Invalid configuration value: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Configuration for a batch analysis run.
///
/// Everything comes from environment variables with working defaults,
/// except the report backend which is selected on the command line.
#[derive(Debug, Clone)]
pub struct AnalyzeConfig {
    pub backend: BackendType,
    pub news_path: PathBuf,
    pub price_dir: PathBuf,
    pub report_path: PathBuf,
    /// Explicit ticker universe. `None` means "every ticker seen in the
    /// news file".
    pub tickers: Option<Vec<String>>,
    pub join_policy: JoinPolicy,
    pub metric_pairs: Vec<MetricPair>,
    pub max_failures: Option<usize>,
}

impl AnalyzeConfig {
    pub fn parse_backend_from_args() -> BackendType {
        let args: Vec<String> = env::args().collect();

        if args.contains(&"--backend".to_string()) {
            if let Some(idx) = args.iter().position(|x| x == "--backend") {
                match args.get(idx + 1).map(|s| s.as_str()) {
                    Some("sqlite") => return BackendType::Sqlite,
                    Some("csv") => return BackendType::Csv,
                    _ => {}
                }
            }
        }

        BackendType::Csv // Default to CSV
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        let backend = Self::parse_backend_from_args();

        let news_path = env::var("NEWSFLOW_NEWS_PATH")
            .unwrap_or_else(|_| "data/raw_analyst_ratings.csv".to_string());

        let price_dir =
            env::var("NEWSFLOW_PRICE_DIR").unwrap_or_else(|_| "data/prices".to_string());

        let report_path = match backend {
            BackendType::Csv => env::var("NEWSFLOW_REPORT_PATH")
                .unwrap_or_else(|_| "data/correlations.csv".to_string()),
            BackendType::Sqlite => {
                env::var("NEWSFLOW_DB_PATH").unwrap_or_else(|_| "data/newsflow.db".to_string())
            }
        };

        let tickers = env::var("NEWSFLOW_TICKERS").ok().and_then(|raw| {
            let list: Vec<String> = raw
                .split(',')
                .map(|t| t.trim().to_uppercase())
                .filter(|t| !t.is_empty())
                .collect();
            if list.is_empty() {
                None
            } else {
                Some(list)
            }
        });

        let policy_str =
            env::var("NEWSFLOW_JOIN_POLICY").unwrap_or_else(|_| "strict".to_string());
        let join_policy = JoinPolicy::from_str(&policy_str).ok_or_else(|| {
            ConfigError::InvalidValue(format!(
                "NEWSFLOW_JOIN_POLICY must be 'strict' or 'calendar-filled', got '{}'",
                policy_str
            ))
        })?;

        let metric_pairs = match env::var("NEWSFLOW_METRIC_PAIRS") {
            Ok(raw) => parse_metric_pairs(&raw)?,
            Err(_) => default_pairs(),
        };

        let max_failures = match env::var("NEWSFLOW_MAX_FAILURES") {
            Ok(raw) => Some(parse_max_failures(&raw)?),
            Err(_) => None,
        };

        Ok(Self {
            backend,
            news_path: PathBuf::from(news_path),
            price_dir: PathBuf::from(price_dir),
            report_path: PathBuf::from(report_path),
            tickers,
            join_policy,
            metric_pairs,
            max_failures,
        })
    }
}

/// Parse NEWSFLOW_MAX_FAILURES. Zero is rejected: a zero-failure budget
/// would skip every ticker before any work is issued, and "run nothing"
/// is never what a batch invocation means.
fn parse_max_failures(raw: &str) -> Result<usize, ConfigError> {
    let limit = raw.trim().parse::<usize>().map_err(|_| {
        ConfigError::InvalidValue(format!(
            "NEWSFLOW_MAX_FAILURES must be a positive integer, got '{}'",
            raw
        ))
    })?;
    if limit == 0 {
        return Err(ConfigError::InvalidValue(
            "NEWSFLOW_MAX_FAILURES must be at least 1; unset it to run without a limit"
                .to_string(),
        ));
    }
    Ok(limit)
}

/// Parse the `x:y,x:y` pair syntax used by NEWSFLOW_METRIC_PAIRS, e.g.
/// `mean_polarity:daily_return,event_count:abs_return`.
fn parse_metric_pairs(raw: &str) -> Result<Vec<MetricPair>, ConfigError> {
    let mut pairs = Vec::new();

    for spec in raw.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        let (x_raw, y_raw) = spec.split_once(':').ok_or_else(|| {
            ConfigError::InvalidValue(format!("metric pair '{}' must be '<x>:<y>'", spec))
        })?;
        let x = Metric::from_str(x_raw.trim())
            .ok_or_else(|| ConfigError::InvalidValue(format!("unknown metric '{}'", x_raw.trim())))?;
        let y = Metric::from_str(y_raw.trim())
            .ok_or_else(|| ConfigError::InvalidValue(format!("unknown metric '{}'", y_raw.trim())))?;
        pairs.push(MetricPair::new(x, y));
    }

    if pairs.is_empty() {
        return Err(ConfigError::InvalidValue(
            "NEWSFLOW_METRIC_PAIRS must name at least one pair".to_string(),
        ));
    }

    Ok(pairs)
}

/// Configuration for the price enrichment tool.
pub struct EnrichConfig {
    pub ticker: String,
    pub price_dir: PathBuf,
    pub output_path: PathBuf,
}

impl EnrichConfig {
    pub fn from_env_and_args() -> Result<Self, ConfigError> {
        let args: Vec<String> = env::args().collect();

        let ticker = args
            .windows(2)
            .find(|w| w[0] == "--ticker")
            .map(|w| w[1].to_uppercase())
            .ok_or_else(|| {
                ConfigError::InvalidValue("--ticker <SYMBOL> is required".to_string())
            })?;

        let price_dir =
            env::var("NEWSFLOW_PRICE_DIR").unwrap_or_else(|_| "data/prices".to_string());
        let out_dir =
            env::var("NEWSFLOW_ENRICHED_DIR").unwrap_or_else(|_| "data/enriched".to_string());
        let output_path = PathBuf::from(out_dir).join(format!("{}_enriched.csv", ticker));

        Ok(Self {
            ticker,
            price_dir: PathBuf::from(price_dir),
            output_path,
        })
    }
}
