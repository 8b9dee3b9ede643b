//! `kako render` command implementation.

use std::path::PathBuf;

use clap::Args;
use kako_config::{CliSettings, Config};
use kako_renderer::sanitize::strip_invalid_utf8;
use kako_renderer::{Post, RenderedPost, Renderer, SiteUri};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the render command.
#[derive(Args)]
pub(crate) struct RenderArgs {
    /// Path to a JSON array of posts.
    file: PathBuf,

    /// Path to configuration file (default: auto-discover kako.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Site base URL for generated links (overrides config).
    #[arg(long, env = "KAKO_BASE_URL")]
    base_url: Option<String>,

    /// Link posts on the page by fragment only.
    #[arg(long)]
    hash_only: bool,

    /// Pretty-print the JSON output.
    #[arg(long)]
    pretty: bool,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}

impl RenderArgs {
    /// Execute the render command.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            base_url: self.base_url.clone(),
            backlinks_hash_only: self.hash_only.then_some(true),
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        if config.boards.is_empty() {
            output.warning("Warning: no [[boards]] configured, every post will fail to render");
        }

        let bytes = std::fs::read(&self.file)?;
        tracing::info!(file = %self.file.display(), bytes = bytes.len(), "Rendering post dump");

        let rendered = render_posts(&config, &bytes)?;
        let json = if self.pretty {
            serde_json::to_string_pretty(&rendered)?
        } else {
            serde_json::to_string(&rendered)?
        };

        output.result(&json)?;
        output.success(&format!("Rendered {} posts", rendered.len()));

        Ok(())
    }
}

/// Render a JSON array of posts as one page.
///
/// Every post is registered before any is rendered, so quotes of later
/// posts resolve too.
fn render_posts(config: &Config, bytes: &[u8]) -> Result<Vec<RenderedPost>, CliError> {
    let json = strip_invalid_utf8(bytes);
    let mut posts: Vec<Post> = serde_json::from_str(&json)?;

    let renderer = Renderer::new(
        config.board_collection(),
        SiteUri::new(config.site.base_url.as_str()),
    )
    .with_options(config.render_options())
    .with_secure_salt(config.secure_salt.clone())
    .with_countries(config.country_names());

    for post in &mut posts {
        post.clean(renderer.hooks(), false);
    }

    let mut pass = renderer.pass();
    for post in &posts {
        pass.register(post);
    }

    let comments = posts
        .iter()
        .map(|post| pass.render(post))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(posts
        .iter()
        .zip(comments)
        .map(|(post, comment)| pass.view(post, comment))
        .collect())
}
