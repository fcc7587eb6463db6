use async_trait::async_trait;
use futures::{pin_mut, select, FutureExt};
use gloo_net::http::Request;
use gloo_timers::future::TimeoutFuture;
use shared::{
    AchievementRepository, HttpRequest, HttpResponse, HttpTransport, Method, TransportError,
    DEFAULT_BASE_URL,
};
use web_sys::{AbortController, AbortSignal};

/// Requests that take longer are aborted and reported as timeouts.
pub const REQUEST_TIMEOUT_MS: u32 = 15_000;

/// Achievements endpoint, overridable at build time with `API_BASE_URL`.
pub fn api_base() -> &'static str {
    option_env!("API_BASE_URL").unwrap_or(DEFAULT_BASE_URL)
}

pub type Repository = AchievementRepository<GlooTransport>;

pub fn repository() -> Repository {
    AchievementRepository::new(GlooTransport, api_base())
}

/// `fetch`-backed transport.
#[derive(Debug, Clone, Copy, Default)]
pub struct GlooTransport;

fn map_error(e: gloo_net::Error) -> TransportError {
    match e {
        gloo_net::Error::JsError(js) if js.name == "AbortError" => TransportError::Cancelled,
        other => TransportError::Network(other.to_string()),
    }
}

impl GlooTransport {
    async fn execute(
        request: HttpRequest,
        signal: Option<&AbortSignal>,
    ) -> Result<HttpResponse, TransportError> {
        let builder = match request.method {
            Method::Get => Request::get(&request.url),
            Method::Post => Request::post(&request.url),
            Method::Put => Request::put(&request.url),
            Method::Delete => Request::delete(&request.url),
        }
        .abort_signal(signal);

        let response = match request.body {
            Some(body) => builder.json(&body).map_err(map_error)?.send().await,
            None => builder.send().await,
        }
        .map_err(map_error)?;

        let status = response.status();
        let body = response.text().await.map_err(map_error)?;
        Ok(HttpResponse::new(status, body))
    }
}

#[async_trait(?Send)]
impl HttpTransport for GlooTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let controller = AbortController::new().ok();
        let signal = controller.as_ref().map(|c| c.signal());

        let call = Self::execute(request, signal.as_ref()).fuse();
        let timeout = TimeoutFuture::new(REQUEST_TIMEOUT_MS).fuse();
        pin_mut!(call, timeout);

        select! {
            result = call => result,
            _ = timeout => {
                if let Some(controller) = controller {
                    controller.abort();
                }
                Err(TransportError::Timeout)
            }
        }
    }
}
