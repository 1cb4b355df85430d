//! Response Cache Layer
//!
//! A `tower` middleware that serves GET requests from the cache and stores
//! the inner service's response on a miss.
//!
//! The inner service is called at most once per request and the future
//! resolves to exactly one response, so a request can never be answered twice.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use axum::{
    body::{Body, Bytes, HttpBody},
    extract::{OriginalUri, Request},
    http::{header::CONTENT_LENGTH, Method},
    response::Response,
};
use futures::stream::{self, StreamExt};
use tower::{Layer, Service};
use tracing::{debug, warn};

use crate::cache::{CacheService, MAX_VALUE_SIZE};
use crate::middleware::CachedResponse;

// == Layer ==
/// Registers response caching on a router or route.
///
/// ```ignore
/// let app = Router::new()
///     .route("/items", get(list_items))
///     .layer(ResponseCacheLayer::new(cache.clone(), Some(60)));
/// ```
#[derive(Debug, Clone)]
pub struct ResponseCacheLayer {
    cache: CacheService,
    ttl: u64,
}

impl ResponseCacheLayer {
    /// Creates a layer storing entries for `duration` seconds, or the cache's
    /// default TTL when `None`.
    pub fn new(cache: CacheService, duration: Option<u64>) -> Self {
        let ttl = duration.unwrap_or_else(|| cache.default_ttl());
        Self { cache, ttl }
    }

    /// TTL in seconds for entries created through this layer.
    pub fn ttl(&self) -> u64 {
        self.ttl
    }
}

impl<S> Layer<S> for ResponseCacheLayer {
    type Service = ResponseCache<S>;

    fn layer(&self, inner: S) -> Self::Service {
        ResponseCache {
            inner,
            cache: self.cache.clone(),
            ttl: self.ttl,
        }
    }
}

// == Service ==
/// Middleware service produced by [`ResponseCacheLayer`].
#[derive(Debug, Clone)]
pub struct ResponseCache<S> {
    inner: S,
    cache: CacheService,
    ttl: u64,
}

impl<S> Service<Request> for ResponseCache<S>
where
    S: Service<Request, Response = Response> + Clone + Send + 'static,
    S::Future: Send + 'static,
    S::Error: Send + 'static,
{
    type Response = Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Response, S::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request) -> Self::Future {
        // use the instance that was polled ready, leave a fresh clone behind
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);
        let cache = self.cache.clone();
        let ttl = self.ttl;

        Box::pin(async move {
            if req.method() != Method::GET {
                return inner.call(req).await;
            }

            let key = cache_key(&req);

            if let Some(cached) = cache.get_as::<CachedResponse>(&key).await {
                match cached.into_http() {
                    Ok(response) => {
                        debug!("Cache hit: {}", key);
                        return Ok(response);
                    }
                    Err(e) => warn!("Discarding unusable cache entry '{}': {}", key, e),
                }
            }

            debug!("Cache miss: {}", key);
            let response = inner.call(req).await?;
            Ok(store_response(&cache, key, ttl, response).await)
        })
    }
}

// == Cache Key ==
/// Path and query of the request target as received by the router.
///
/// Query parameters are kept verbatim; `?a=1&b=2` and `?b=2&a=1` are
/// different keys.
fn cache_key(req: &Request) -> String {
    let uri = req
        .extensions()
        .get::<OriginalUri>()
        .map(|original| &original.0)
        .unwrap_or_else(|| req.uri());

    uri.path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| uri.path().to_string())
}

// == Store Response ==
/// Buffers the response, stores a copy and hands back an equivalent response.
///
/// Caching failures are logged and never change what the client receives.
/// Bodies known to exceed `MAX_VALUE_SIZE` are passed through unbuffered,
/// and a body that errors mid-stream is replayed up to the same error.
async fn store_response(
    cache: &CacheService,
    key: String,
    ttl: u64,
    response: Response,
) -> Response {
    let declared_len = response
        .headers()
        .get(CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<usize>().ok());
    let (parts, body) = response.into_parts();

    let hinted_len = usize::try_from(body.size_hint().lower()).unwrap_or(usize::MAX);
    if declared_len.is_some_and(|len| len > MAX_VALUE_SIZE) || hinted_len > MAX_VALUE_SIZE {
        debug!("Not caching '{}': body larger than {} bytes", key, MAX_VALUE_SIZE);
        return Response::from_parts(parts, body);
    }

    let mut data = body.into_data_stream();
    let mut buffered: Vec<u8> = Vec::new();
    while let Some(chunk) = data.next().await {
        match chunk {
            Ok(bytes) => {
                buffered.extend_from_slice(&bytes);
                if buffered.len() > MAX_VALUE_SIZE {
                    debug!("Not caching '{}': body larger than {} bytes", key, MAX_VALUE_SIZE);
                    let head = stream::iter([Ok(Bytes::from(buffered))]);
                    return Response::from_parts(parts, Body::from_stream(head.chain(data)));
                }
            }
            Err(e) => {
                warn!("Not caching '{}': response body failed: {}", key, e);
                let replay = stream::iter([Ok(Bytes::from(buffered)), Err(e)]);
                return Response::from_parts(parts, Body::from_stream(replay));
            }
        }
    }

    let bytes = Bytes::from(buffered);
    match CachedResponse::capture(&parts, &bytes) {
        Ok(captured) => {
            if let Err(e) = cache.set(key.as_str(), &captured, Some(ttl)).await {
                warn!("Failed to cache response for '{}': {}", key, e);
            }
        }
        Err(e) => warn!("Not caching '{}': {}", key, e),
    }

    Response::from_parts(parts, Body::from(bytes))
}
