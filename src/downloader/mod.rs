mod fetcher;
mod filename;

use std::env;
use std::fs::{self, File};
use std::io::{self, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;
use url::Url;

use fetcher::UreqFetcher;

/// Fixed copy-buffer size for streaming the body to disk.
const CHUNK_SIZE: usize = 8 * 1024;

/// A successful response, streamed. The body reader is consumed chunk by
/// chunk; it is never buffered whole.
pub struct Body {
    content_type: Option<String>,
    content_length: Option<u64>,
    reader: Box<dyn Read>,
}

impl Body {
    pub fn new(
        content_type: Option<String>,
        content_length: Option<u64>,
        reader: Box<dyn Read>,
    ) -> Self {
        Self {
            content_type,
            content_length,
            reader,
        }
    }

    #[cfg(test)]
    pub fn from_bytes(content_type: Option<&str>, bytes: Vec<u8>) -> Self {
        let len = bytes.len() as u64;
        Self::new(
            content_type.map(str::to_string),
            Some(len),
            Box::new(io::Cursor::new(bytes)),
        )
    }
}

pub enum Response {
    Ok(Body),
    Status(u16),
    ConnectionFailed,
    TimedOut,
    Transport(String),
}

impl Response {
    pub fn ok(body: Body) -> Self {
        Self::Ok(body)
    }

    pub fn status(code: u16) -> Self {
        Self::Status(code)
    }

    pub fn connection_failed() -> Self {
        Self::ConnectionFailed
    }

    pub fn timed_out() -> Self {
        Self::TimedOut
    }

    pub fn transport(message: String) -> Self {
        Self::Transport(message)
    }
}

pub trait Fetcher {
    fn fetch(&self, url: &str) -> Response;
}

/// Decides whether a response that does not declare an `image/*` media type
/// should still be saved. The binary wires this to an interactive y/n
/// prompt; tests inject plain closures.
pub trait ConfirmPrompt {
    fn allow_non_image(&self, content_type: &str) -> bool;
}

impl<F> ConfirmPrompt for F
where
    F: Fn(&str) -> bool,
{
    fn allow_non_image(&self, content_type: &str) -> bool {
        self(content_type)
    }
}

/// Receives transfer notifications, one `on_chunk` per buffer written.
/// `total` is `None` when the response carried no `Content-Length`.
pub trait DownloadObserver {
    fn on_start(&mut self, file_name: &str, total: Option<u64>);
    fn on_chunk(&mut self, received: u64);
    fn on_done(&mut self, len: u64);
}

#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("invalid URL: a scheme and host are required")]
    InvalidUrl,
    #[error("HTTP error status {0}")]
    Status(u16),
    #[error("connection failed: check the address and your network")]
    ConnectionFailed,
    #[error("request timed out")]
    TimedOut,
    #[error("transport error: {0}")]
    Transport(String),
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// A file that made it to disk.
#[derive(Debug)]
pub struct Download {
    pub source: String,
    pub file: PathBuf,
    pub len: u64,
}

impl Download {
    pub fn new(source: String, file: PathBuf, len: u64) -> Self {
        Self { source, file, len }
    }
}

#[derive(Debug)]
pub enum DownloadOutcome {
    Saved(Download),
    /// The operator turned down a non-image content type. An intentional
    /// abort, not a failure.
    Declined {
        content_type: String,
    },
}

pub struct Downloader<F: Fetcher, C: ConfirmPrompt> {
    fetcher: F,
    confirm: C,
    dir: PathBuf,
}

impl<F, C> Downloader<F, C>
where
    F: Fetcher,
    C: ConfirmPrompt,
{
    /// Builds a downloader writing into `path`, creating the directory if it
    /// does not exist yet. Relative paths are resolved against the current
    /// working directory once, here.
    pub fn with_fetcher(path: &str, fetcher: F, confirm: C) -> io::Result<Self> {
        let dir = create_dir_from_string(path)?;

        Ok(Downloader {
            fetcher,
            confirm,
            dir,
        })
    }

    /// Absolute path of the output directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn download(
        &self,
        url: &str,
        observer: &mut dyn DownloadObserver,
    ) -> Result<DownloadOutcome, DownloadError> {
        let url = Url::parse(url).map_err(|_| DownloadError::InvalidUrl)?;

        if !url.has_host() {
            return Err(DownloadError::InvalidUrl);
        }

        let file_name = filename::resolve(&url);
        debug!(url = %url, file = %file_name, "resolved download target");

        let body = match self.fetcher.fetch(url.as_str()) {
            Response::Ok(body) => body,
            Response::Status(code) => return Err(DownloadError::Status(code)),
            Response::ConnectionFailed => return Err(DownloadError::ConnectionFailed),
            Response::TimedOut => return Err(DownloadError::TimedOut),
            Response::Transport(message) => return Err(DownloadError::Transport(message)),
        };

        // A missing Content-Type counts as non-image and goes through the
        // same confirmation as a wrong one.
        let content_type = body.content_type.as_deref().unwrap_or("");
        if !content_type.starts_with("image/") {
            debug!(content_type, "response does not declare an image media type");
            if !self.confirm.allow_non_image(content_type) {
                return Ok(DownloadOutcome::Declined {
                    content_type: content_type.to_string(),
                });
            }
        }

        let file_path = self.dir.join(&file_name);
        let len = write_body(body, &file_path, &file_name, observer)?;

        debug!(file = %file_path.display(), len, "saved");

        Ok(DownloadOutcome::Saved(Download::new(
            String::from(url.as_str()),
            file_path,
            len,
        )))
    }
}

impl<C: ConfirmPrompt> Downloader<UreqFetcher, C> {
    pub fn new(path: &str, confirm: C) -> io::Result<Self> {
        Downloader::with_fetcher(path, UreqFetcher::new(), confirm)
    }
}

fn write_body(
    body: Body,
    file_path: &Path,
    file_name: &str,
    observer: &mut dyn DownloadObserver,
) -> Result<u64, DownloadError> {
    let Body {
        content_length,
        mut reader,
        ..
    } = body;

    observer.on_start(file_name, content_length);

    let file = File::create(file_path)?;
    let mut writer = BufWriter::new(file);

    let mut buf = [0u8; CHUNK_SIZE];
    let mut received: u64 = 0;

    loop {
        let n = reader.read(&mut buf)?;
        if n == 0 {
            break;
        }

        writer.write_all(&buf[..n])?;
        received += n as u64;
        observer.on_chunk(received);
    }

    writer.flush()?;

    let len = file_path.metadata()?.len();
    observer.on_done(len);

    Ok(len)
}

fn create_dir_from_string(path_str: &str) -> io::Result<PathBuf> {
    let path = Path::new(path_str);

    let absolute_path = if path.is_absolute() {
        path.to_path_buf()
    } else {
        env::current_dir()?.join(path)
    };

    if !absolute_path.exists() {
        fs::create_dir_all(&absolute_path)?;
    }

    Ok(absolute_path)
}

#[cfg(test)]
use fetcher::MockFetcher;
