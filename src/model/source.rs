/// this takes care of fetching the town list from the feed
use thiserror::Error;

use crate::town::{parse_towns, TownRecord};

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {url} failed: {message}")]
    Transport { url: String, message: String },

    #[error("HTTP error! status: {status} {status_text}")]
    Status { status: u16, status_text: String },

    #[error("malformed town list: {0}")]
    Malformed(#[from] serde_json::Error),
}

pub type FetchResult = Result<Vec<TownRecord>, FetchError>;

/// Callback for a finished request. It may run on another thread.
pub type OnFetched = Box<dyn FnOnce(FetchResult) + Send>;

/// Something that can deliver a town list for a url. Requests must not block
/// the caller, the result is handed to `on_done` whenever it is ready.
pub trait TownSource {
    fn fetch(&self, url: String, on_done: OnFetched);
}

/// Fetches over http, on a background thread natively and with the browser's
/// fetch api on the web.
pub struct HttpTownSource;

impl TownSource for HttpTownSource {
    fn fetch(&self, url: String, on_done: OnFetched) {
        let request = ehttp::Request::get(&url);
        ehttp::fetch(request, move |result| {
            let towns = match result {
                Ok(response) => decode_response(
                    response.ok,
                    response.status,
                    &response.status_text,
                    &response.bytes,
                ),
                Err(message) => Err(FetchError::Transport { url, message }),
            };
            on_done(towns);
        });
    }
}

fn decode_response(ok: bool, status: u16, status_text: &str, bytes: &[u8]) -> FetchResult {
    if !ok {
        return Err(FetchError::Status {
            status,
            status_text: status_text.to_owned(),
        });
    }
    Ok(parse_towns(bytes)?)
}
