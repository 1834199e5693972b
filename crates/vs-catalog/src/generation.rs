//! Content generation: derive title, description and keywords for catalog
//! entries and write them through the overlay store.

use chrono::Utc;
use serde::Serialize;
use serde_json::{Map, Value};
use vs_core::Result;
use vs_db::OverlayPatch;

use crate::catalog::Catalog;

/// Outcome for one filename. Failures are data, not errors.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationResult {
    pub success: bool,
    pub filename: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<Map<String, Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl GenerationResult {
    fn failure(filename: &str, error: impl ToString) -> Self {
        Self {
            success: false,
            filename: filename.to_string(),
            title: None,
            description: None,
            meta: None,
            error: Some(error.to_string()),
        }
    }
}

/// Lower-cased words of `filename` with its extension removed.
///
/// Words are split on whitespace, `.`, `_` and `-`.
pub fn keywords_from_filename(filename: &str) -> Vec<String> {
    let stem = match filename.rfind('.') {
        Some(idx) if idx + 1 < filename.len() => &filename[..idx],
        _ => filename,
    };
    stem.split(|c: char| c.is_whitespace() || matches!(c, '.' | '_' | '-'))
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// Drives enrichment of catalog entries.
#[derive(Clone)]
pub struct Generator {
    catalog: Catalog,
}

impl Generator {
    pub fn new(catalog: Catalog) -> Self {
        Self { catalog }
    }

    /// Generate content for one file.
    ///
    /// Existing title and description are kept; keywords and the generation
    /// timestamp are always refreshed.
    pub async fn generate_one(&self, filename: &str) -> GenerationResult {
        match self.try_generate(filename).await {
            Ok(result) => result,
            Err(e) => {
                tracing::warn!(filename = %filename, error = %e, "Content generation failed");
                GenerationResult::failure(filename, e)
            }
        }
    }

    async fn try_generate(&self, filename: &str) -> Result<GenerationResult> {
        let entry = self.catalog.get_one(filename).await?;

        let title = entry
            .title
            .clone()
            .unwrap_or_else(|| entry.display_name.clone());
        let description = entry
            .description
            .clone()
            .unwrap_or_else(|| format!("Auto-generated summary for {title}."));

        let mut meta = entry.meta.clone().unwrap_or_default();
        meta.insert(
            "keywords".into(),
            Value::from(keywords_from_filename(filename)),
        );
        meta.insert(
            "contentGeneratedAt".into(),
            Value::from(Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)),
        );

        self.catalog.overlay().set(
            filename,
            &OverlayPatch {
                content_generated: Some(true),
                title: Some(title.clone()),
                description: Some(description.clone()),
                meta: Some(meta.clone()),
            },
        )?;

        tracing::debug!(filename = %filename, "Generated content");

        Ok(GenerationResult {
            success: true,
            filename: filename.to_string(),
            title: Some(title),
            description: Some(description),
            meta: Some(meta),
            error: None,
        })
    }

    /// Generate content for each filename in turn.
    ///
    /// One result per input, in input order. A failure never stops the batch.
    pub async fn generate_bulk(&self, filenames: &[String]) -> Vec<GenerationResult> {
        let mut results = Vec::with_capacity(filenames.len());
        for filename in filenames {
            results.push(self.generate_one(filename).await);
        }
        let failed = results.iter().filter(|r| !r.success).count();
        tracing::info!(total = results.len(), failed, "Bulk generation finished");
        results
    }
}
