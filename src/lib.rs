mod downloader;

pub use downloader::{
    Body, ConfirmPrompt, Download, DownloadError, DownloadObserver, DownloadOutcome, Downloader,
    Fetcher, Response,
};
