//! CLI binary for img2html.
//!
//! A thin shim over the library crate that maps CLI flags
//! to `ConversionConfig` and prints results.

use anyhow::{Context, Result};
use clap::Parser;
use img2html::{
    convert, ConversionConfig, ConversionProgressCallback, Img2HtmlError, OutputArtifacts,
    ProgressCallback, DEFAULT_BASE_URL, DEFAULT_MODEL,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn yellow(s: &str) -> String {
    format!("\x1b[33m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Spinner shown while the image is loaded and the model is thinking.
struct CliProgressCallback {
    bar: ProgressBar,
}

impl CliProgressCallback {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new_spinner();
        let style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}  {elapsed:.dim}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);

        bar.set_style(style);
        bar.set_prefix("Preparing");
        bar.set_message("Resolving image…");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self { bar })
    }
}

impl ConversionProgressCallback for CliProgressCallback {
    fn on_image_lookup(&self, path: &Path) {
        self.bar
            .println(dim(&format!("Looking for image at: {}", path.display())));
    }

    fn on_image_loaded(&self, path: &Path, mime_type: &str, encoded_len: usize) {
        self.bar.println(format!(
            "  {} Read {}  {}",
            green("✓"),
            path.display(),
            dim(&format!("{mime_type}, {encoded_len} bytes base64")),
        ));
    }

    fn on_request_start(&self, model: &str) {
        self.bar.set_prefix("Converting");
        self.bar.set_message(format!("waiting for {model}…"));
    }

    fn on_response(&self, response_len: usize, html_fallback: bool) {
        self.bar.println(format!(
            "  {} Model replied  {}",
            green("✓"),
            dim(&format!("{response_len} chars")),
        ));
        if html_fallback {
            self.bar.println(format!(
                "  {} Could not extract HTML code blocks. Using full response.",
                yellow("⚠"),
            ));
        }
        self.bar.set_prefix("Writing");
        self.bar.set_message("site files…");
    }

    fn on_files_written(&self, _artifacts: &OutputArtifacts) {
        self.bar.finish_and_clear();
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Prompt for the image path, write into the current directory
  img2html

  # Convert a screenshot into ./site
  img2html --image-path ~/Desktop/landing.png --output-dir site

  # Use a cheaper model and a custom instruction
  img2html --image-path mockup.jpg --model gpt-4o-mini --prompt-file prompt.txt

  # Machine-readable result
  img2html --image-path mockup.png --json

OUTPUT:
  <output-dir>/converted.html   always written
  <output-dir>/styles.css       written when the model returned separate CSS
                                and the page has no inline <style>

EXIT STATUS:
  0  success            4  not an image file
  1  CLI usage/input    5  model/API failure
  2  image not found    6  file read/write failure
  3  no API key         64 invalid configuration
                        70 internal error

ENVIRONMENT VARIABLES:
  OPENAI_API_KEY        API key (when --api-key is not given)
  OPENAI_BASE_URL       OpenAI-compatible API root
  IMG2HTML_MODEL        Override model ID
  IMG2HTML_OUTPUT_DIR   Override output directory
"#;

/// Convert an image into HTML/CSS using a Vision LLM.
#[derive(Parser, Debug)]
#[command(
    name = "img2html",
    version,
    about = "Convert an image into HTML/CSS using a Vision LLM",
    long_about = "Send a screenshot or design mock-up to a vision-capable chat model and \
write the returned markup as converted.html (plus styles.css when the CSS comes separately).",
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Path to the image file. Prompted for when omitted.
    #[arg(long)]
    image_path: Option<String>,

    /// API key (optional if OPENAI_API_KEY is set).
    #[arg(long)]
    api_key: Option<String>,

    /// Directory to save output files.
    #[arg(long, env = "IMG2HTML_OUTPUT_DIR", default_value = ".")]
    output_dir: PathBuf,

    /// Vision model ID.
    #[arg(long, env = "IMG2HTML_MODEL", default_value = DEFAULT_MODEL)]
    model: String,

    /// Max tokens the model may generate.
    #[arg(long, env = "IMG2HTML_MAX_TOKENS", default_value_t = 4096)]
    max_tokens: usize,

    /// Sampling temperature (0.0–2.0). Provider default when unset.
    #[arg(long, env = "IMG2HTML_TEMPERATURE")]
    temperature: Option<f32>,

    /// Root URL of an OpenAI-compatible API.
    #[arg(long, env = "OPENAI_BASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Request timeout in seconds. No timeout when unset.
    #[arg(long, env = "IMG2HTML_TIMEOUT")]
    timeout: Option<u64>,

    /// Path to a text file containing a custom instruction prompt.
    #[arg(long, env = "IMG2HTML_PROMPT_FILE")]
    prompt_file: Option<PathBuf>,

    /// Print the written paths as JSON.
    #[arg(long)]
    json: bool,

    /// Disable the spinner.
    #[arg(long, env = "IMG2HTML_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "IMG2HTML_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "IMG2HTML_QUIET")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // The spinner carries the progress messages; library INFO logs would
    // only tear it apart.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress || cli.json {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    match run(&cli, show_progress).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            println!("Error: {e}");
            ExitCode::from(exit_code_for(&e))
        }
    }
}

async fn run(cli: &Cli, show_progress: bool) -> Result<()> {
    let image_path = match cli.image_path {
        Some(ref p) => p.clone(),
        None => prompt_image_path()?,
    };

    let mut config = build_config(cli).await?;

    // Started only once nothing else can fail before `convert` takes over.
    let progress = show_progress.then(CliProgressCallback::new);
    config.progress_callback = progress.clone().map(|cb| cb as ProgressCallback);

    let result = convert(&image_path, &config).await;
    if let Some(ref cb) = progress {
        cb.bar.finish_and_clear();
    }
    let artifacts = result?;

    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&artifacts).context("Failed to serialise output")?
        );
    } else if !cli.quiet {
        println!("\n{} {}", green("✔"), bold("Conversion completed successfully!"));
        println!("HTML file: {}", artifacts.html_path.display());
        if let Some(ref css) = artifacts.css_path {
            println!("CSS file: {}", css.display());
        }
        println!("\nYou can open the HTML file in your browser to see the result.");
    }

    Ok(())
}

/// Ask for the image path on stdin.
fn prompt_image_path() -> Result<String> {
    print!("Enter the path to the image file: ");
    io::stdout().flush().context("Failed to flush stdout")?;

    let mut line = String::new();
    io::stdin()
        .read_line(&mut line)
        .context("Failed to read the image path from stdin")?;

    let path = line.trim();
    if path.is_empty() {
        anyhow::bail!("No image path given");
    }
    Ok(path.to_string())
}

/// Map CLI args to `ConversionConfig`.
async fn build_config(cli: &Cli) -> Result<ConversionConfig> {
    let mut builder = ConversionConfig::builder()
        .model(&cli.model)
        .max_tokens(cli.max_tokens)
        .base_url(&cli.base_url)
        .output_dir(&cli.output_dir);

    if let Some(ref key) = cli.api_key {
        builder = builder.api_key(key);
    }
    if let Some(t) = cli.temperature {
        builder = builder.temperature(t);
    }
    if let Some(secs) = cli.timeout {
        builder = builder.request_timeout_secs(secs);
    }
    if let Some(ref path) = cli.prompt_file {
        let prompt = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read prompt from {:?}", path))?;
        builder = builder.prompt(prompt.trim());
    }
    Ok(builder.build()?)
}

/// Library errors keep their per-kind status; CLI glue errors exit with 1.
fn exit_code_for(err: &anyhow::Error) -> u8 {
    err.downcast_ref::<Img2HtmlError>()
        .map(Img2HtmlError::exit_code)
        .unwrap_or(1)
}
