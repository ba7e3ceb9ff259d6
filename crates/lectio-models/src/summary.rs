//! Study summary types and the pipeline output union.

use serde::{Deserialize, Serialize};

use crate::topic::Topic;

/// Text format tag stored alongside a summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SummaryFormat {
    Html,
}

/// An HTML study summary produced from a slide deck.
///
/// Produced whole or not at all; there are no partial summaries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub html: String,
    pub format: SummaryFormat,
}

impl Summary {
    pub fn html(html: impl Into<String>) -> Self {
        Self {
            html: html.into(),
            format: SummaryFormat::Html,
        }
    }
}

/// Final artifact of one enrichment run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum PipelineOutput {
    Summary(Summary),
    Topics(Vec<Topic>),
}
