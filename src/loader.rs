//! Layout loading
//!
//! Fetch plumbing around the session's generation guard. The guard itself
//! lives in `sim::session` (`begin_load` / `apply_layout`); this module
//! gets the bytes: an HTTP fetch in the browser, a file read for the
//! native headless binary. Failures here are always non-fatal: the caller
//! logs and keeps the previous board.

use std::fmt;

use crate::layout::{Layout, LayoutError};

#[derive(Debug)]
pub enum LoadError {
    /// The layout arrived for a load that has since been superseded.
    Stale,
    Layout(LayoutError),
    #[cfg(not(target_arch = "wasm32"))]
    Io(std::io::Error),
    #[cfg(target_arch = "wasm32")]
    Fetch(String),
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Stale => write!(f, "layout response superseded by a newer load"),
            LoadError::Layout(err) => write!(f, "{err}"),
            #[cfg(not(target_arch = "wasm32"))]
            LoadError::Io(err) => write!(f, "failed to read layout: {err}"),
            #[cfg(target_arch = "wasm32")]
            LoadError::Fetch(msg) => write!(f, "failed to fetch layout: {msg}"),
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoadError::Layout(err) => Some(err),
            #[cfg(not(target_arch = "wasm32"))]
            LoadError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<LayoutError> for LoadError {
    fn from(err: LayoutError) -> Self {
        LoadError::Layout(err)
    }
}

/// Read a layout from a local file (native headless runs).
#[cfg(not(target_arch = "wasm32"))]
pub fn read_layout_file(path: &std::path::Path) -> Result<Layout, LoadError> {
    let bytes = std::fs::read(path).map_err(LoadError::Io)?;
    Ok(Layout::parse(&bytes)?)
}

/// Fetch a layout over HTTP (browser).
///
/// Completes asynchronously; pair it with a `LoadTicket` from
/// `GameSession::begin_load` taken before the fetch starts, so a response
/// that arrives after a newer load began is refused by `apply_layout`.
#[cfg(target_arch = "wasm32")]
pub async fn fetch_layout(url: &str) -> Result<Layout, LoadError> {
    use wasm_bindgen::JsCast;
    use wasm_bindgen_futures::JsFuture;
    use web_sys::{Request, RequestInit, RequestMode, Response};

    let err = |msg: &str| LoadError::Fetch(msg.to_string());

    let opts = RequestInit::new();
    opts.set_method("GET");
    opts.set_mode(RequestMode::Cors);
    let request = Request::new_with_str_and_init(url, &opts)
        .map_err(|_| err("invalid request"))?;

    let window = web_sys::window().ok_or_else(|| err("no window"))?;
    let response = JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(|_| err("network error"))?;
    let response: Response = response.dyn_into().map_err(|_| err("not a Response"))?;

    if !response.ok() {
        return Err(LoadError::Fetch(format!(
            "server returned {}",
            response.status()
        )));
    }

    let text = JsFuture::from(response.text().map_err(|_| err("no response body"))?)
        .await
        .map_err(|_| err("failed reading response body"))?;
    let text = text.as_string().ok_or_else(|| err("response body not text"))?;

    Ok(Layout::parse(text.as_bytes())?)
}
