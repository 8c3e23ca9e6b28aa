use std::io::{self, BufRead, Write};

use image_fetcher::{ConfirmPrompt, DownloadObserver};
use indicatif::{ProgressBar, ProgressStyle};

pub fn banner() {
    println!("{}", "=".repeat(60));
    println!("IMAGE FETCHER");
    println!("{}", "=".repeat(60));
}

pub fn read_url() -> io::Result<String> {
    print!("\nEnter image URL: ");
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;

    Ok(line.trim().to_string())
}

/// Interactive y/n gate for responses that do not look like images.
pub struct StdinConfirm;

impl ConfirmPrompt for StdinConfirm {
    fn allow_non_image(&self, content_type: &str) -> bool {
        println!("Warning: Content-Type is '{content_type}', not an image");
        print!("Continue anyway? (y/n): ");

        if io::stdout().flush().is_err() {
            return false;
        }

        let mut answer = String::new();
        if io::stdin().lock().read_line(&mut answer).is_err() {
            return false;
        }

        answer.trim().to_lowercase().starts_with('y')
    }
}

/// Progress bar when the total size is known, byte-count spinner otherwise.
pub struct ProgressRender {
    bar: Option<ProgressBar>,
}

impl ProgressRender {
    pub fn new() -> Self {
        Self { bar: None }
    }
}

impl DownloadObserver for ProgressRender {
    fn on_start(&mut self, file_name: &str, total: Option<u64>) {
        println!("Downloading: {file_name}");

        let bar = match total {
            Some(len) => {
                let bar = ProgressBar::new(len);
                bar.set_style(
                    ProgressStyle::with_template(
                        "[{wide_bar:.cyan/blue}] {percent}% ({bytes}/{total_bytes})",
                    )
                    .expect("valid progress template"),
                );
                bar
            }

            None => {
                let bar = ProgressBar::new_spinner();
                bar.set_style(
                    ProgressStyle::with_template("{spinner:.green} {bytes}")
                        .expect("valid progress template"),
                );
                bar
            }
        };

        self.bar = Some(bar);
    }

    fn on_chunk(&mut self, received: u64) {
        if let Some(bar) = &self.bar {
            bar.set_position(received);
        }
    }

    fn on_done(&mut self, _len: u64) {
        if let Some(bar) = self.bar.take() {
            bar.finish_and_clear();
        }
    }
}
