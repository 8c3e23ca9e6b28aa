mod console;

use image_fetcher::{DownloadOutcome, Downloader};
use indicatif::HumanBytes;
use tracing_subscriber::EnvFilter;
use url::Url;

use console::{ProgressRender, StdinConfirm};

const OUTPUT_DIR: &str = "Fetched_Images";

fn main() {
    init_logging();

    console::banner();

    let downloader = match Downloader::new(OUTPUT_DIR, StdinConfirm) {
        Ok(downloader) => downloader,
        Err(error) => {
            println!("Error creating directory '{OUTPUT_DIR}': {error}");
            return;
        }
    };

    println!("Directory '{}' ready", downloader.dir().display());

    let url = match console::read_url() {
        Ok(url) => url,
        Err(error) => {
            println!("Error reading input: {error}");
            return;
        }
    };

    if url.is_empty() {
        println!("No URL provided");
        return;
    }

    let url = match Url::parse(&url) {
        Ok(parsed) if parsed.has_host() => parsed,
        _ => {
            println!("Invalid URL. Please include http:// or https://");
            return;
        }
    };

    if let Some(host) = url.host_str() {
        println!("Connecting to {host}...");
    }

    let mut progress = ProgressRender::new();

    match downloader.download(url.as_str(), &mut progress) {
        Ok(DownloadOutcome::Saved(download)) => {
            println!(
                "Successfully saved {} ({})",
                download.file.display(),
                HumanBytes(download.len)
            );
            println!("\nImage fetched successfully.");
        }

        Ok(DownloadOutcome::Declined { content_type }) => {
            println!("Skipped: content type '{content_type}' was not accepted. Nothing saved.");
        }

        Err(error) => {
            println!("Error: {error}");
            println!("\nDownload failed. Please check the URL and try again.");
        }
    }
}

/// Diagnostics go to stderr and stay quiet unless RUST_LOG asks for them;
/// stdout belongs to the interactive session.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();
}
