//! CDP network listener feeding a `ResponseInterceptor`

use anyhow::{Context, Result};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use chromiumoxide::Page;
use chromiumoxide::cdp::browser_protocol::network::{
    EnableParams, EventLoadingFinished, EventRequestWillBeSent, EventResponseReceived,
    GetResponseBodyParams, RequestId,
};
use futures::StreamExt;
use std::collections::HashMap;
use tokio::task::JoinHandle;
use tracing::{debug, trace};

use super::interceptor::{ResponseInterceptor, ResponseMeta};

/// Subscribe to the page's network events and record relevant responses.
///
/// The section index is taken when the response headers arrive; the body is
/// fetched once loading finishes. Body fetch failures degrade to an empty body.
pub async fn spawn_response_listener(
    page: &Page,
    interceptor: ResponseInterceptor,
) -> Result<JoinHandle<()>> {
    page.execute(EnableParams::default())
        .await
        .context("Failed to enable network domain")?;

    let mut requests = page
        .event_listener::<EventRequestWillBeSent>()
        .await
        .context("Failed to subscribe to requestWillBeSent")?;
    let mut responses = page
        .event_listener::<EventResponseReceived>()
        .await
        .context("Failed to subscribe to responseReceived")?;
    let mut finished = page
        .event_listener::<EventLoadingFinished>()
        .await
        .context("Failed to subscribe to loadingFinished")?;

    let page = page.clone();
    Ok(tokio::spawn(async move {
        let mut methods: HashMap<RequestId, String> = HashMap::new();
        let mut pending: HashMap<RequestId, (ResponseMeta, usize)> = HashMap::new();

        loop {
            tokio::select! {
                Some(event) = requests.next() => {
                    methods.insert(event.request_id.clone(), event.request.method.clone());
                }
                Some(event) = responses.next() => {
                    let meta = ResponseMeta {
                        url: event.response.url.clone(),
                        method: methods
                            .remove(&event.request_id)
                            .unwrap_or_else(|| "GET".to_string()),
                        status: u16::try_from(event.response.status).unwrap_or_default(),
                        mime_type: event.response.mime_type.clone(),
                    };
                    if interceptor.is_relevant(&meta) {
                        pending.insert(event.request_id.clone(), (meta, interceptor.current_section()));
                    } else {
                        trace!("Ignoring response {}", meta.url);
                    }
                }
                Some(event) = finished.next() => {
                    if let Some((meta, section)) = pending.remove(&event.request_id) {
                        let body = fetch_body(&page, event.request_id.clone()).await;
                        interceptor.record_tagged(meta, &body, section);
                    }
                }
                else => break,
            }
        }
        trace!("Network listener finished");
    }))
}

async fn fetch_body(page: &Page, request_id: RequestId) -> String {
    match page.execute(GetResponseBodyParams::new(request_id)).await {
        Ok(response) => {
            let body = &response.result;
            if body.base64_encoded {
                match BASE64.decode(&body.body) {
                    Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
                    Err(e) => {
                        debug!("Undecodable base64 response body: {e}");
                        String::new()
                    }
                }
            } else {
                body.body.clone()
            }
        }
        Err(e) => {
            debug!("Response body unavailable: {e}");
            String::new()
        }
    }
}
