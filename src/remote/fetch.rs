//! `window.fetch` backend for the browser build.

use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, RequestMode, Response};

use super::{decode_sheet_list, decode_snapshot, GridDataSource, RemoteCall, SheetCatalog};
use crate::error::Result;
use crate::types::{FileRef, GridSnapshot, SheetName};

/// HTTP client for the comparison service's sheet endpoints.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    api_base: String,
}

impl HttpBackend {
    pub fn new(api_base: impl Into<String>) -> Self {
        Self {
            api_base: api_base.into(),
        }
    }

    /// GET the call's URL and return the body of a 2xx response. Any other
    /// outcome is classified into the error taxonomy.
    async fn get_text(&self, call: RemoteCall<'_>) -> Result<String> {
        let url = call.url(&self.api_base);
        let transport = |e: JsValue| call.transport_error(&js_error_text(&e));

        let opts = RequestInit::new();
        opts.set_method("GET");
        opts.set_mode(RequestMode::Cors);
        let request = Request::new_with_str_and_init(&url, &opts).map_err(transport)?;
        request
            .headers()
            .set("Accept", "application/json")
            .map_err(transport)?;

        let window =
            web_sys::window().ok_or_else(|| call.transport_error("no window available"))?;
        let response: Response = JsFuture::from(window.fetch_with_request(&request))
            .await
            .map_err(transport)?
            .dyn_into()
            .map_err(transport)?;
        let body = JsFuture::from(response.text().map_err(transport)?)
            .await
            .map_err(transport)?
            .as_string()
            .unwrap_or_default();

        if response.ok() {
            Ok(body)
        } else {
            log::debug!("GET {url} -> {}", response.status());
            Err(call.classify_status(response.status(), &body))
        }
    }
}

impl SheetCatalog for HttpBackend {
    async fn list_sheets(&self, file: &FileRef) -> Result<Vec<SheetName>> {
        let body = self.get_text(RemoteCall::Catalog { file }).await?;
        decode_sheet_list(&body)
    }
}

impl GridDataSource for HttpBackend {
    async fn load_sheet(&self, file: &FileRef, sheet: &str) -> Result<GridSnapshot> {
        let body = self.get_text(RemoteCall::Sheet { file, sheet }).await?;
        decode_snapshot(&body)
    }
}

/// Best-effort message from a rejected JS promise.
fn js_error_text(value: &JsValue) -> String {
    if let Some(s) = value.as_string() {
        return s;
    }
    value
        .dyn_ref::<js_sys::Error>()
        .map(|e| String::from(e.message()))
        .unwrap_or_else(|| "network request failed".to_string())
}
