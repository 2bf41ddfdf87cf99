//! Loader for the server configuration: YAML + environment overlays.
//!
//! Sources are merged in the order they are added, with `PRICEWATCH__`
//! environment variables (`__` separates nesting levels, e.g.
//! `PRICEWATCH__SERVER__LISTEN`) applied on top. String values may reference
//! `${VAR}` placeholders, expanded after merging. Every field has a default,
//! so an empty configuration is valid.
use config::{Config, ConfigError, Environment, File};
use pricewatch_common::observability::{LogConfig, LogFormat};
use pricewatch_scrape::RecipeSpec;
use pricewatch_valuation::{DEFAULT_DEPRECIATION_RATE, DEFAULT_REFERENCE_YEAR};
use serde::Deserialize;
use serde_json::Value;
use std::path::{Path, PathBuf};
use url::Url;

const MAXIMUM_ENV_EXPANSION_DEPTH: usize = 8;
const ENV_PREFIX: &str = "PRICEWATCH";

#[derive(Debug, Default, Deserialize)]
pub struct PricewatchConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub target: TargetConfig,
    #[serde(default)]
    pub valuation: ValuationConfig,
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Extra retailer recipes, consulted before the built-in ones.
    #[serde(default)]
    pub retailers: Vec<RecipeSpec>,
}

#[derive(Debug, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_listen")]
    pub listen: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: default_listen(),
        }
    }
}

/// The single product page served by `/device`.
#[derive(Debug, Deserialize)]
pub struct TargetConfig {
    #[serde(default = "default_target_url")]
    pub url: String,
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            url: default_target_url(),
        }
    }
}

impl TargetConfig {
    pub fn parsed_url(&self) -> Result<Url, url::ParseError> {
        Url::parse(&self.url)
    }
}

#[derive(Debug, Deserialize)]
pub struct ValuationConfig {
    #[serde(default = "default_reference_year")]
    pub reference_year: i32,
    #[serde(default = "default_depreciation_rate")]
    pub depreciation_rate: f64,
    #[serde(default)]
    pub floor_price_at_zero: bool,
}

impl Default for ValuationConfig {
    fn default() -> Self {
        Self {
            reference_year: default_reference_year(),
            depreciation_rate: default_depreciation_rate(),
            floor_price_at_zero: false,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct FetchConfig {
    /// Unset means no deadline on the outbound fetch.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    #[serde(default = "default_user_agent")]
    pub user_agent: Option<String>,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: None,
            user_agent: default_user_agent(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    #[serde(default)]
    pub format: LogFormat,
    #[serde(default = "default_true")]
    pub emit_stderr: bool,
    #[serde(default = "default_filter")]
    pub filter: String,
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::default(),
            emit_stderr: true,
            filter: default_filter(),
            dir: None,
        }
    }
}

impl LoggingConfig {
    pub fn log_config(&self, app_name: &'static str) -> LogConfig {
        LogConfig {
            app_name,
            log_dir: self.dir.clone(),
            emit_stderr: self.emit_stderr,
            format: self.format,
            default_filter: self.filter.clone(),
        }
    }
}

fn default_listen() -> String {
    "0.0.0.0:8080".into()
}
fn default_target_url() -> String {
    "https://www.example.com".into()
}
fn default_reference_year() -> i32 {
    DEFAULT_REFERENCE_YEAR
}
fn default_depreciation_rate() -> f64 {
    DEFAULT_DEPRECIATION_RATE
}
fn default_user_agent() -> Option<String> {
    Some(concat!("pricewatch/", env!("CARGO_PKG_VERSION")).into())
}
fn default_true() -> bool {
    true
}
fn default_filter() -> String {
    "info".into()
}

fn expand_env_in_value(v: &mut Value) {
    match v {
        Value::String(s) => {
            if s.contains('$') {
                let mut cur = std::mem::take(s);
                for _ in 0..MAXIMUM_ENV_EXPANSION_DEPTH {
                    let expanded = match shellexpand::env(&cur) {
                        Ok(cow) => cow.into_owned(),
                        Err(_) => cur.clone(),
                    };
                    if expanded == cur {
                        break;
                    }
                    cur = expanded;
                }
                *s = cur;
            }
        }
        Value::Array(arr) => arr.iter_mut().for_each(expand_env_in_value),
        Value::Object(obj) => obj.values_mut().for_each(expand_env_in_value),
        _ => {}
    }
}

fn validate(cfg: &PricewatchConfig) -> Result<(), ConfigError> {
    cfg.target
        .parsed_url()
        .map_err(|e| ConfigError::Message(format!("target.url {:?}: {e}", cfg.target.url)))?;

    let rate = cfg.valuation.depreciation_rate;
    if !rate.is_finite() || rate < 0.0 {
        return Err(ConfigError::Message(format!(
            "valuation.depreciation_rate must be a finite non-negative number, got {rate}"
        )));
    }
    Ok(())
}

/// Builder over the `config` crate wiring.
pub struct PricewatchConfigLoader {
    builder: config::ConfigBuilder<config::builder::DefaultState>,
    files: Vec<(PathBuf, bool)>,
    inline: Vec<String>,
}

impl Default for PricewatchConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl PricewatchConfigLoader {
    /// Start empty; environment overrides are always applied last.
    ///
    /// ```
    /// use pricewatch_config::PricewatchConfigLoader;
    ///
    /// let cfg = PricewatchConfigLoader::new()
    ///     .with_yaml_str("valuation:\n  reference_year: 2030\n")
    ///     .load()
    ///     .expect("valid config");
    ///
    /// assert_eq!(cfg.valuation.reference_year, 2030);
    /// assert_eq!(cfg.server.listen, "0.0.0.0:8080");
    /// ```
    pub fn new() -> Self {
        Self {
            builder: Config::builder(),
            files: Vec::new(),
            inline: Vec::new(),
        }
    }

    /// Attach a file that must exist; the format is inferred from the suffix.
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.files.push((path.as_ref().to_path_buf(), true));
        self
    }

    /// Attach a file that is skipped when absent.
    pub fn with_optional_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.files.push((path.as_ref().to_path_buf(), false));
        self
    }

    /// Merge an inline YAML snippet (tests, embedded defaults).
    pub fn with_yaml_str(mut self, yaml: &str) -> Self {
        self.inline.push(yaml.to_string());
        self
    }

    /// Merge all sources, expand `${VAR}` placeholders and deserialize.
    ///
    /// ```
    /// use pricewatch_config::PricewatchConfigLoader;
    /// use pricewatch_scrape::HostMatcher;
    ///
    /// let cfg = PricewatchConfigLoader::new()
    ///     .with_yaml_str(r#"
    /// target:
    ///   url: "https://shop.acme.test/p/1"
    /// retailers:
    ///   - name: acme
    ///     matcher: { host: "shop.acme.test" }
    ///     brand: { fixed: "Acme" }
    ///     model: { path: [ { css: "h1" } ] }
    ///     release_date: { path: [ { css: "time" } ] }
    ///     price: { path: [ { css: ".price" } ] }
    /// "#)
    ///     .load()
    ///     .expect("valid configuration");
    ///
    /// assert_eq!(cfg.retailers.len(), 1);
    /// assert_eq!(cfg.retailers[0].matcher, HostMatcher::Host("shop.acme.test".into()));
    /// ```
    pub fn load(self) -> Result<PricewatchConfig, ConfigError> {
        let mut builder = self.builder;
        for (path, required) in &self.files {
            builder = builder.add_source(File::from(path.as_path()).required(*required));
        }
        for yaml in &self.inline {
            builder = builder.add_source(File::from_str(yaml, config::FileFormat::Yaml));
        }
        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__"),
        );

        let cfg = builder.build()?;

        let mut v: Value = cfg.try_deserialize()?;
        expand_env_in_value(&mut v);

        // Env overrides stay strings; config's deserializer coerces them per field type.
        let typed: PricewatchConfig = Config::try_from(&v)?.try_deserialize()?;
        validate(&typed)?;

        Ok(typed)
    }
}
