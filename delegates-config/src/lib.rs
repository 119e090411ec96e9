//! Loader for deployment configuration with YAML + environment overlays.
//!
//! Every constant of a deployment (page URL, artifact paths, class markers,
//! commit message, ...) lives in [`DelegatesConfig`]. Sources are merged in
//! this order, later ones winning:
//!
//! 1. built-in defaults (the values the scraper has always used),
//! 2. YAML files and inline snippets, in the order they were attached,
//! 3. `DELEGATES__`-prefixed environment variables, `__` separating sections
//!    (`DELEGATES__FETCH__CHALLENGE_WAIT_SECS=45`).
//!
//! `${VAR}` placeholders inside string values are expanded after merging.
use config::{Config, Environment, File, FileFormat};
pub use config::ConfigError;
use delegates_common::StealthLevel;
use delegates_common::observability::LogFormat;
use serde::Deserialize;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::time::Duration;

const MAXIMUM_ENV_EXPANSION_DEPTH: usize = 8;
const ENV_PREFIX: &str = "DELEGATES";

pub const DEFAULT_PAGE_URL: &str = "https://www.nationstates.net/page=dispatch/id=1789931";
pub const DEFAULT_COMMIT_MESSAGE: &str =
    "Update output.html and delegates.json with latest NationStates content";
pub const DEFAULT_DELEGATES_SOURCE: &str =
    "https://raw.githubusercontent.com/I-Am-Mei/Nation_State_images/main/delegates.json";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DelegatesConfig {
    pub version: Option<String>,
    pub fetch: FetchConfig,
    pub extract: ExtractConfig,
    pub output: OutputConfig,
    pub publish: PublishConfig,
    pub votes: VotesConfig,
    pub logging: LoggingConfig,
}

/// Browser session and page capture settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    pub url: String,
    pub webdriver_url: String,
    pub headless: bool,
    pub stealth: StealthLevel,
    /// Blind wait after navigation so a client-side challenge can clear.
    /// Nothing signals that the challenge is actually done.
    pub challenge_wait_secs: u64,
    /// Markup from the first occurrence of this text onwards is dropped.
    /// Empty disables truncation.
    pub sentinel: String,
}

impl FetchConfig {
    pub fn challenge_wait(&self) -> Duration {
        Duration::from_secs(self.challenge_wait_secs)
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_PAGE_URL.into(),
            webdriver_url: "http://localhost:9515".into(),
            headless: false,
            stealth: StealthLevel::Balanced,
            challenge_wait_secs: 30,
            sentinel: "<31>".into(),
        }
    }
}

/// Structural markers of the delegate table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ExtractConfig {
    pub header_rows: usize,
    pub row_window: usize,
    pub cell_index: usize,
    pub container_class: String,
    pub anchor_class: String,
    pub name_class: String,
    pub id_prefix: String,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            header_rows: 1,
            row_window: 30,
            cell_index: 2,
            container_class: "nscodealigncenter".into(),
            anchor_class: "nlink".into(),
            name_class: "nnameblock".into(),
            id_prefix: "nation=".into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub dir: PathBuf,
    pub markup_file: String,
    pub delegates_file: String,
}

impl OutputConfig {
    pub fn markup_path(&self) -> PathBuf {
        self.dir.join(&self.markup_file)
    }

    pub fn delegates_path(&self) -> PathBuf {
        self.dir.join(&self.delegates_file)
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("."),
            markup_file: "output.html".into(),
            delegates_file: "delegates.json".into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PublishConfig {
    pub enabled: bool,
    pub repo_path: PathBuf,
    pub remote: String,
    pub commit_message: String,
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            repo_path: PathBuf::from("."),
            remote: "origin".into(),
            commit_message: DEFAULT_COMMIT_MESSAGE.into(),
        }
    }
}

/// Settings for the World Assembly vote checker.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct VotesConfig {
    /// `http(s)` URL or local path of a delegates document.
    pub source: String,
    pub api_base: String,
    pub user_agent: String,
    pub pause_ms: u64,
    pub timeout_secs: u64,
}

impl VotesConfig {
    pub fn pause(&self) -> Duration {
        Duration::from_millis(self.pause_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for VotesConfig {
    fn default() -> Self {
        Self {
            source: DEFAULT_DELEGATES_SOURCE.into(),
            api_base: "https://www.nationstates.net".into(),
            user_agent: "Mei Delegate Vote Scraper".into(),
            pause_ms: 1000,
            timeout_secs: 15,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub format: LogFormat,
    pub dir: Option<PathBuf>,
    pub filter: String,
    pub emit_stderr: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::Text,
            dir: None,
            filter: "info".into(),
            emit_stderr: true,
        }
    }
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

/// Builder hiding the `config` crate wiring (YAML + env overrides).
pub struct DelegatesConfigLoader {
    builder: config::ConfigBuilder<config::builder::DefaultState>,
    env_prefix: String,
}

impl Default for DelegatesConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl DelegatesConfigLoader {
    /// Start from the built-in defaults; `DELEGATES__` env overrides are
    /// applied last when [`load`](Self::load) runs.
    ///
    /// ```
    /// use delegates_config::DelegatesConfigLoader;
    ///
    /// let config = DelegatesConfigLoader::new()
    ///     .with_yaml_str("version: '1'")
    ///     .load()
    ///     .expect("valid config");
    ///
    /// assert_eq!(config.version.as_deref(), Some("1"));
    /// assert_eq!(config.extract.row_window, 30);
    /// ```
    pub fn new() -> Self {
        Self {
            builder: Config::builder(),
            env_prefix: ENV_PREFIX.to_string(),
        }
    }

    /// Use a different environment prefix. Mostly useful for tests.
    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    /// Attach a YAML/TOML/JSON file that must exist; format is inferred by suffix.
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(true));
        self
    }

    /// Attach a file that is merged only when present.
    pub fn with_optional_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(false));
        self
    }

    /// Allow tests/CLI to merge inline YAML snippets.
    ///
    /// ```
    /// use delegates_config::DelegatesConfigLoader;
    ///
    /// let cfg = DelegatesConfigLoader::new()
    ///     .with_yaml_str(
    ///         r#"
    /// fetch:
    ///   challenge_wait_secs: 5
    ///   headless: true
    /// publish:
    ///   remote: upstream
    /// "#,
    ///     )
    ///     .load()
    ///     .unwrap();
    ///
    /// assert_eq!(cfg.fetch.challenge_wait_secs, 5);
    /// assert!(cfg.fetch.headless);
    /// assert_eq!(cfg.publish.remote, "upstream");
    /// assert_eq!(cfg.output.delegates_file, "delegates.json");
    /// ```
    pub fn with_yaml_str(mut self, yaml: &str) -> Self {
        self.builder = self
            .builder
            .add_source(File::from_str(yaml, FileFormat::Yaml));
        self
    }

    /// Consume the builder and deserialize the merged sources.
    ///
    /// ```
    /// use delegates_config::DelegatesConfigLoader;
    ///
    /// unsafe { std::env::set_var("DELEGATES_DOC_REMOTE", "mirror"); }
    ///
    /// let config = DelegatesConfigLoader::new()
    ///     .with_yaml_str(r#"
    /// publish:
    ///   remote: "${DELEGATES_DOC_REMOTE}"
    /// "#)
    ///     .load()
    ///     .expect("valid configuration");
    ///
    /// assert_eq!(config.publish.remote, "mirror");
    ///
    /// unsafe { std::env::remove_var("DELEGATES_DOC_REMOTE"); }
    /// ```
    pub fn load(self) -> Result<DelegatesConfig, ConfigError> {
        let cfg = self
            .builder
            .add_source(
                Environment::with_prefix(&self.env_prefix)
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?;

        let mut v: Value = cfg.try_deserialize()?;
        expand_env_in_value(&mut v);

        // Env values arrive as strings and YAML scalars keep their own type;
        // `config` coerces both into the typed fields.
        let typed: DelegatesConfig = Config::builder()
            .add_source(File::from_str(&v.to_string(), FileFormat::Json))
            .build()?
            .try_deserialize()?;

        Ok(typed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn expands_simple_string() {
        temp_env::with_var("DELEGATES_TEST_FOO", Some("bar"), || {
            let mut v = json!("prefix-${DELEGATES_TEST_FOO}-suffix");
            expand_env_in_value(&mut v);
            assert_eq!(v, json!("prefix-bar-suffix"));
        });
    }

    #[test]
    fn expands_in_array_and_object() {
        temp_env::with_vars(
            [("DT_CITY", Some("Winston")), ("DT_STATE", Some("NC"))],
            || {
                let mut v = json!([
                    "hello-$DT_CITY",
                    { "loc": "${DT_CITY}-${DT_STATE}" },
                    42,
                    true,
                    null
                ]);
                expand_env_in_value(&mut v);
                assert_eq!(
                    v,
                    json!(["hello-Winston", { "loc": "Winston-NC" }, 42, true, null])
                );
            },
        );
    }

    #[test]
    fn stops_on_cycles() {
        temp_env::with_vars([("DT_A", Some("${DT_B}")), ("DT_B", Some("${DT_A}"))], || {
            let mut v = json!("x=${DT_A}-y");
            expand_env_in_value(&mut v);
            let s = v.as_str().unwrap();
            assert!(s.starts_with("x=") && s.ends_with("-y"));
            assert!(s.contains("${"));
        });
    }

    #[test]
    fn unknown_vars_are_left_as_is() {
        let mut v = json!("hi-${DOES_NOT_EXIST_FOR_DELEGATES}");
        expand_env_in_value(&mut v);
        assert_eq!(v, json!("hi-${DOES_NOT_EXIST_FOR_DELEGATES}"));
    }

    #[test]
    fn output_paths_join_dir_and_file() {
        let output = OutputConfig {
            dir: PathBuf::from("site"),
            ..OutputConfig::default()
        };
        assert_eq!(output.markup_path(), PathBuf::from("site/output.html"));
        assert_eq!(output.delegates_path(), PathBuf::from("site/delegates.json"));
    }
}
