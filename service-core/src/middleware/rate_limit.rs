use crate::error::AppError;
use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::Response,
};
use governor::{
    Quota, RateLimiter,
    clock::{Clock, DefaultClock},
    state::keyed::DashMapStateStore,
};
use std::{
    net::{IpAddr, SocketAddr},
    num::NonZeroU32,
    sync::Arc,
    time::Duration,
};
use tokio::task::JoinHandle;

/// Rate limiter keyed by client IP address.
pub type IpRateLimiter = Arc<RateLimiter<IpAddr, DashMapStateStore<IpAddr>, DefaultClock>>;

/// Middleware state: the limiter plus whether proxy headers name the client.
#[derive(Clone)]
pub struct IpRateLimit {
    pub limiter: IpRateLimiter,
    /// Only set behind a proxy that overwrites `x-forwarded-for`/`x-real-ip`.
    pub trust_proxy_headers: bool,
}

impl IpRateLimit {
    pub fn new(per_minute: u32, trust_proxy_headers: bool) -> Self {
        Self {
            limiter: create_ip_rate_limiter(per_minute),
            trust_proxy_headers,
        }
    }
}

/// Create an IP-keyed limiter allowing `per_minute` requests with a burst of the same size.
pub fn create_ip_rate_limiter(per_minute: u32) -> IpRateLimiter {
    let per_minute = NonZeroU32::new(per_minute.max(1)).unwrap_or(NonZeroU32::MIN);
    Arc::new(RateLimiter::dashmap(Quota::per_minute(per_minute)))
}

/// Drop keys whose budget has fully recovered, every `every`.
pub fn spawn_limiter_cleanup(limiter: IpRateLimiter, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(every);
        interval.tick().await;
        loop {
            interval.tick().await;
            limiter.retain_recent();
            limiter.shrink_to_fit();
            tracing::debug!(tracked_ips = limiter.len(), "Pruned rate limiter keys");
        }
    })
}

fn header_ip(request: &Request, name: &str) -> Option<IpAddr> {
    request
        .headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.split(',').next())
        .and_then(|s| s.trim().parse::<IpAddr>().ok())
}

/// Resolve the caller IP. With `trust_proxy_headers` the first
/// `x-forwarded-for` hop, then `x-real-ip`, are tried before the socket peer.
pub fn client_ip(request: &Request, trust_proxy_headers: bool) -> Option<IpAddr> {
    let proxied = if trust_proxy_headers {
        header_ip(request, "x-forwarded-for").or_else(|| header_ip(request, "x-real-ip"))
    } else {
        None
    };

    proxied.or_else(|| {
        request
            .extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip())
    })
}

/// Middleware for IP-based rate limiting
pub async fn ip_rate_limit_middleware(
    State(rate_limit): State<IpRateLimit>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    match client_ip(&request, rate_limit.trust_proxy_headers) {
        Some(ip) => match rate_limit.limiter.check_key(&ip) {
            Ok(_) => Ok(next.run(request).await),
            Err(negative) => {
                let wait_time = negative.wait_time_from(DefaultClock::default().now());
                tracing::warn!(ip = %ip, "Rate limit exceeded");
                Err(AppError::TooManyRequests(
                    "Too many requests from this IP. Please try again later.".to_string(),
                    Some(wait_time.as_secs().max(1)),
                ))
            }
        },
        None => {
            tracing::warn!("Could not determine IP for rate limiting");
            Ok(next.run(request).await)
        }
    }
}
