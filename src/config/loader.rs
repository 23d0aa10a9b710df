//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::{DestinationKind, ShoploaderConfig, SourceErrorPolicy};
use crate::config::secret_string;
use crate::domain::errors::LoaderError;
use crate::domain::ids::DatasetName;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

const ENV_PREFIX: &str = "SHOPLOADER";

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (`${VAR}` syntax)
/// 3. Parses the TOML into [`ShoploaderConfig`]
/// 4. Applies environment variable overrides (`SHOPLOADER_*` prefix)
/// 5. Resolves a relative `source.data_dir` against the file's directory
/// 6. Validates the configuration
///
/// # Errors
///
/// Returns [`LoaderError::Configuration`] if the file cannot be read, a
/// referenced environment variable is unset, the TOML does not parse, an
/// override has an invalid value, or validation fails.
///
/// # Examples
///
/// ```no_run
/// use shoploader::config::loader::load_config;
///
/// let config = load_config("shoploader.toml").expect("Failed to load config");
/// println!("Loading into dataset {}", config.pipeline.dataset_name);
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<ShoploaderConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(LoaderError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        LoaderError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    let contents = substitute_env_vars(&contents)?;

    let mut config: ShoploaderConfig = toml::from_str(&contents)
        .map_err(|e| LoaderError::Configuration(format!("Failed to parse TOML: {e}")))?;

    apply_env_overrides(&mut config)?;

    if let Some(base_dir) = path.parent() {
        resolve_relative_paths(&mut config, base_dir);
    }

    config.validate().map_err(|e| {
        LoaderError::Configuration(format!("Configuration validation failed: {e}"))
    })?;

    tracing::debug!(
        path = %path.display(),
        destination = %config.destination,
        resources = config.source.resources.len(),
        "Configuration loaded"
    );

    Ok(config)
}

/// Substitutes environment variables in the format `${VAR_NAME}`
///
/// Comment lines are copied unchanged so commented-out placeholders never
/// require their variable to be set.
///
/// # Errors
///
/// Returns an error naming every referenced variable that is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| LoaderError::Configuration(format!("Invalid placeholder pattern: {e}")))?;
    let mut result = String::with_capacity(input.len());
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let processed = re.replace_all(line, |caps: &regex::Captures<'_>| {
            let var_name = &caps[1];
            match std::env::var(var_name) {
                Ok(value) => value,
                Err(_) => {
                    if !missing_vars.iter().any(|v| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                    String::new()
                }
            }
        });
        result.push_str(&processed);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(LoaderError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

/// Applies environment variable overrides using the `SHOPLOADER_` prefix
///
/// Variables follow the pattern `SHOPLOADER_<SECTION>_<KEY>`, for example
/// `SHOPLOADER_PIPELINE_BATCH_SIZE` or `SHOPLOADER_BIGQUERY_PROJECT_ID`.
/// Destination sections are only overridden when present in the file.
fn apply_env_overrides(config: &mut ShoploaderConfig) -> Result<()> {
    if let Some(val) = env_override("DESTINATION") {
        config.destination = parse_destination(&val)?;
    }

    // Application
    if let Some(val) = env_override("APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }
    if let Some(val) = env_override("APPLICATION_DRY_RUN") {
        config.application.dry_run = parse_override("APPLICATION_DRY_RUN", &val)?;
    }

    // Pipeline
    if let Some(val) = env_override("PIPELINE_PIPELINE_NAME") {
        config.pipeline.pipeline_name = val;
    }
    if let Some(val) = env_override("PIPELINE_DATASET_NAME") {
        config.pipeline.dataset_name = DatasetName::new(val).map_err(|e| {
            LoaderError::Configuration(format!("{ENV_PREFIX}_PIPELINE_DATASET_NAME: {e}"))
        })?;
    }
    if let Some(val) = env_override("PIPELINE_BATCH_SIZE") {
        config.pipeline.batch_size = parse_override("PIPELINE_BATCH_SIZE", &val)?;
    }
    if let Some(val) = env_override("PIPELINE_ON_SOURCE_ERROR") {
        config.pipeline.on_source_error = match val.as_str() {
            "skip" => SourceErrorPolicy::Skip,
            "fail" => SourceErrorPolicy::Fail,
            other => {
                return Err(LoaderError::Configuration(format!(
                    "{ENV_PREFIX}_PIPELINE_ON_SOURCE_ERROR must be 'skip' or 'fail', got '{other}'"
                )))
            }
        };
    }

    // Source
    if let Some(val) = env_override("SOURCE_DATA_DIR") {
        config.source.data_dir = PathBuf::from(val);
    }

    // BigQuery
    if let Some(ref mut bigquery) = config.bigquery {
        if let Some(val) = env_override("BIGQUERY_PROJECT_ID") {
            bigquery.project_id = val;
        }
        if let Some(val) = env_override("BIGQUERY_LOCATION") {
            bigquery.location = val;
        }
        if let Some(val) = env_override("BIGQUERY_ACCESS_TOKEN") {
            bigquery.access_token = secret_string(val);
        }
        if let Some(val) = env_override("BIGQUERY_API_BASE_URL") {
            bigquery.api_base_url = val;
        }
        if let Some(val) = env_override("BIGQUERY_TIMEOUT_SECONDS") {
            bigquery.timeout_seconds = parse_override("BIGQUERY_TIMEOUT_SECONDS", &val)?;
        }
    }

    // PostgreSQL
    if let Some(ref mut postgresql) = config.postgresql {
        if let Some(val) = env_override("POSTGRESQL_CONNECTION_STRING") {
            postgresql.connection_string = secret_string(val);
        }
        if let Some(val) = env_override("POSTGRESQL_MAX_CONNECTIONS") {
            postgresql.max_connections = parse_override("POSTGRESQL_MAX_CONNECTIONS", &val)?;
        }
        if let Some(val) = env_override("POSTGRESQL_SSL_MODE") {
            postgresql.ssl_mode = val;
        }
    }

    // Filesystem
    if let Some(ref mut filesystem) = config.filesystem {
        if let Some(val) = env_override("FILESYSTEM_BUCKET_PATH") {
            filesystem.bucket_path = PathBuf::from(val);
        }
    }

    Ok(())
}

fn env_override(key: &str) -> Option<String> {
    std::env::var(format!("{ENV_PREFIX}_{key}")).ok()
}

fn parse_override<T>(key: &str, value: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e| {
        LoaderError::Configuration(format!(
            "Invalid value '{value}' for {ENV_PREFIX}_{key}: {e}"
        ))
    })
}

fn parse_destination(value: &str) -> Result<DestinationKind> {
    match value {
        "bigquery" => Ok(DestinationKind::BigQuery),
        "postgresql" => Ok(DestinationKind::PostgreSQL),
        "filesystem" => Ok(DestinationKind::Filesystem),
        other => Err(LoaderError::Configuration(format!(
            "{ENV_PREFIX}_DESTINATION must be one of: bigquery, postgresql, filesystem, got '{other}'"
        ))),
    }
}

/// Anchor relative `source.data_dir` and `filesystem.bucket_path` at the
/// configuration file's directory
fn resolve_relative_paths(config: &mut ShoploaderConfig, base_dir: &Path) {
    if base_dir.as_os_str().is_empty() {
        return;
    }

    if config.source.data_dir.is_relative() {
        config.source.data_dir = base_dir.join(&config.source.data_dir);
    }

    if let Some(ref mut filesystem) = config.filesystem {
        if filesystem.bucket_path.is_relative() {
            filesystem.bucket_path = base_dir.join(&filesystem.bucket_path);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_substitute_env_vars() {
        std::env::set_var("SHOPLOADER_TEST_SUBST_TOKEN", "token_value");
        let input = "access_token = \"${SHOPLOADER_TEST_SUBST_TOKEN}\"";
        let result = substitute_env_vars(input).unwrap();
        assert_eq!(result, "access_token = \"token_value\"\n");
        std::env::remove_var("SHOPLOADER_TEST_SUBST_TOKEN");
    }

    #[test]
    fn test_substitute_env_vars_lists_all_missing() {
        std::env::remove_var("SHOPLOADER_TEST_MISSING_A");
        std::env::remove_var("SHOPLOADER_TEST_MISSING_B");
        let input = "a = \"${SHOPLOADER_TEST_MISSING_A}\"\nb = \"${SHOPLOADER_TEST_MISSING_B}\"\nc = \"${SHOPLOADER_TEST_MISSING_A}\"";

        let err = substitute_env_vars(input).unwrap_err().to_string();
        assert!(err.contains("SHOPLOADER_TEST_MISSING_A, SHOPLOADER_TEST_MISSING_B"));
    }

    #[test]
    fn test_substitute_env_vars_skips_comments() {
        std::env::remove_var("SHOPLOADER_TEST_COMMENTED");
        let input = "# token = \"${SHOPLOADER_TEST_COMMENTED}\"\nname = \"x\"";
        let result = substitute_env_vars(input).unwrap();
        assert!(result.contains("${SHOPLOADER_TEST_COMMENTED}"));
    }

    #[test]
    fn test_parse_override_invalid() {
        let err = parse_override::<usize>("PIPELINE_BATCH_SIZE", "lots").unwrap_err();
        assert!(err.to_string().contains("SHOPLOADER_PIPELINE_BATCH_SIZE"));
    }

    #[test]
    fn test_parse_destination() {
        assert_eq!(
            parse_destination("filesystem").unwrap(),
            DestinationKind::Filesystem
        );
        assert!(parse_destination("redshift").is_err());
    }

    #[test]
    fn test_load_config_missing_file() {
        let result = load_config("nonexistent-shoploader.toml");
        assert!(matches!(result, Err(LoaderError::Configuration(_))));
    }

    #[test]
    fn test_load_config_resolves_relative_paths() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shoploader.toml");
        std::fs::write(
            &path,
            "destination = \"filesystem\"\n\n[source]\ndata_dir = \"mock\"\n\n[filesystem]\nbucket_path = \"out\"\n",
        )
        .unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.source.data_dir, dir.path().join("mock"));
        assert_eq!(config.filesystem.unwrap().bucket_path, dir.path().join("out"));
    }

    #[test]
    fn test_load_config_keeps_absolute_bucket_path() {
        let dir = tempfile::tempdir().unwrap();
        let bucket = dir.path().join("lake");
        let path = dir.path().join("shoploader.toml");
        std::fs::write(
            &path,
            format!(
                "destination = \"filesystem\"\n\n[filesystem]\nbucket_path = {:?}\n",
                bucket.display().to_string()
            ),
        )
        .unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.filesystem.unwrap().bucket_path, bucket);
    }

    #[test]
    fn test_load_config_valid() {
        let toml_content = r#"
destination = "bigquery"

[application]
log_level = "debug"

[pipeline]
dataset_name = "mock_sales"
batch_size = 250

[source]
data_dir = "/srv/mock"

[[source.resources]]
name = "raw_orders"
path = "order_data.json"
kind = "order_items"

[bigquery]
project_id = "acme-analytics"
access_token = "ya29.token"
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(toml_content.as_bytes()).unwrap();
        temp_file.flush().unwrap();

        let config = load_config(temp_file.path()).unwrap();
        assert_eq!(config.destination, DestinationKind::BigQuery);
        assert_eq!(config.application.log_level, "debug");
        assert_eq!(config.pipeline.dataset_name.as_str(), "mock_sales");
        assert_eq!(config.pipeline.pipeline_name, "shopify_mock_pipeline");
        assert_eq!(config.pipeline.batch_size, 250);
        assert_eq!(config.source.resources.len(), 1);
        assert_eq!(config.source.data_dir, PathBuf::from("/srv/mock"));

        let bigquery = config.bigquery.unwrap();
        assert_eq!(bigquery.location, "US");
        assert_eq!(bigquery.max_rows_per_request, 500);
    }
}
