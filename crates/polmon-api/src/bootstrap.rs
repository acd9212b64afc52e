//! # Startup Bootstrap
//!
//! Builds everything the router needs before the first request.
//!
//! ## Bootstrap Sequence
//!
//! 1. **Translator**: built-in labels for the language, optionally merged
//!    with an override file.
//! 2. **Clients**: source client from the environment; relay client only
//!    when a relay endpoint is configured.
//! 3. **Fetch**: one `GET` of the source file. No retry.
//! 4. **Load**: parse, sort and index into the [`Dataset`].
//!
//! Every failure here is fatal. The binary logs it and exits non-zero.

use std::path::Path;

use polmon_client::{
    ClientError, ConfigError, RelayClient, RelayConfig, SourceClient, SourceConfig,
};
use polmon_core::{ColumnNames, Dataset, DatasetError, I18nError, Language, Translator};

use crate::state::{AppConfig, AppState};

/// Errors during startup.
#[derive(Debug, thiserror::Error)]
pub enum BootstrapError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("translation error: {0}")]
    I18n(#[from] I18nError),

    #[error("failed to fetch source file: {0}")]
    Fetch(#[from] ClientError),

    #[error("failed to load dataset: {0}")]
    Dataset(#[from] DatasetError),
}

/// Label lookup for `language`, with optional overrides from `overrides`.
pub fn translator(language: Language, overrides: Option<&Path>) -> Result<Translator, BootstrapError> {
    let translator = match overrides {
        Some(path) => {
            tracing::info!(path = %path.display(), "loading translation overrides");
            Translator::with_overrides(language, path)?
        }
        None => Translator::new(language)?,
    };
    Ok(translator)
}

/// Source and relay clients configured from the environment.
pub fn clients(language: Language) -> Result<(SourceClient, Option<RelayClient>), BootstrapError> {
    let source_config = SourceConfig::from_env(language.default_data_path())?;
    tracing::debug!(config = ?source_config, "source configuration");
    let source = SourceClient::new(&source_config)?;

    let relay = match RelayConfig::from_env()? {
        Some(config) => Some(RelayClient::new(&config)?),
        None => {
            tracing::warn!("GOOGLE_SCRIPT_URL not set; exports will fail with a notice");
            None
        }
    };
    Ok((source, relay))
}

/// Parse the fetched text with the column names of the translator's language.
pub fn load_dataset(text: &str, translator: &Translator) -> Result<Dataset, BootstrapError> {
    let dataset = Dataset::from_csv(text, &ColumnNames::localized(translator))?;
    tracing::info!(
        records = dataset.len(),
        regions = dataset.regions().len(),
        categories = dataset.categories().len(),
        years = dataset.years().len(),
        language = %translator.language(),
        "dataset loaded"
    );
    Ok(dataset)
}

/// Fetch and load the dataset, then assemble the application state.
pub async fn bootstrap(
    config: AppConfig,
    translator: Translator,
    source: &SourceClient,
    relay: Option<RelayClient>,
) -> Result<AppState, BootstrapError> {
    tracing::info!(url = %source.url(), "fetching source file");
    let text = source.fetch_csv().await?;
    let dataset = load_dataset(&text, &translator)?;
    Ok(AppState::new(config, dataset, translator, relay))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_dataset_uses_language_headers() {
        let tr = translator(Language::Cn, None).unwrap();
        let text = "经济体,政策动态,政策类型,发布主体,时间\nChina,A,Tariff,M,01/2024\n";
        let dataset = load_dataset(text, &tr).unwrap();
        assert_eq!(dataset.len(), 1);
    }

    #[test]
    fn load_dataset_reports_missing_column() {
        let tr = translator(Language::Cn, None).unwrap();
        let err = load_dataset("经济体,政策动态\nChina,A\n", &tr).unwrap_err();
        assert!(matches!(err, BootstrapError::Dataset(DatasetError::MissingColumn(_))));
    }

    #[test]
    fn missing_override_file_is_fatal() {
        let err = translator(Language::En, Some(Path::new("/nonexistent/polmon.json"))).unwrap_err();
        assert!(matches!(err, BootstrapError::I18n(I18nError::Io(_))));
    }
}
