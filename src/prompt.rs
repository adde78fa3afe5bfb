//! Prompt construction for the summarization call.
//!
//! The prompt is a minijinja template with two placeholders: `num_articles`
//! (the article count) and `articles` (every article body joined with
//! [`ARTICLE_SEPARATOR`]). A built-in template is compiled into the binary;
//! the operator can substitute their own with `--template`.
//!
//! Construction is deterministic: the same article sequence always renders
//! byte-identical output. The separator colliding with real article content
//! is an accepted limitation and not handled defensively.

use std::path::Path;

use itertools::Itertools;
use minijinja::{Environment, context};
use tokio::fs;
use tracing::debug;

use crate::error::{DigestError, Result};

/// Fixed token inserted between article bodies in the rendered prompt.
pub const ARTICLE_SEPARATOR: &str = "\n---\n";

const TEMPLATE_NAME: &str = "digest_prompt";
const DEFAULT_TEMPLATE: &str = include_str!("../templates/digest_prompt.txt");

/// Renders the digest prompt from the ordered article sequence.
#[derive(Debug)]
pub struct PromptBuilder {
    env: Environment<'static>,
}

impl PromptBuilder {
    /// Builder over the compiled-in default template.
    pub fn new() -> Result<Self> {
        Self::from_source(DEFAULT_TEMPLATE.to_string())
    }

    /// Builder over an operator-supplied template file.
    ///
    /// Fails with [`DigestError::Template`] if the file is missing or the
    /// template does not parse.
    pub async fn from_file(path: &Path) -> Result<Self> {
        let source = fs::read_to_string(path).await.map_err(|e| {
            DigestError::Template(format!("template {}: {e}", path.display()))
        })?;
        Self::from_source(source)
    }

    fn from_source(source: String) -> Result<Self> {
        let mut env = Environment::new();
        env.add_template_owned(TEMPLATE_NAME, source)?;
        Ok(Self { env })
    }

    /// Render the prompt for the given ordered article sequence.
    ///
    /// Requires at least one article; an empty sequence is a
    /// [`DigestError::EmptyInput`].
    pub fn build(&self, articles: &[String]) -> Result<String> {
        if articles.is_empty() {
            return Err(DigestError::EmptyInput);
        }

        let joined = articles.iter().join(ARTICLE_SEPARATOR);
        let template = self.env.get_template(TEMPLATE_NAME)?;
        let prompt = template.render(context! {
            num_articles => articles.len(),
            articles => joined,
        })?;

        debug!(
            num_articles = articles.len(),
            bytes = prompt.len(),
            "Rendered digest prompt"
        );
        Ok(prompt)
    }
}
