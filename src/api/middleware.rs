//! Serving configuration and per-IP rate limiting.

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::{Request, StatusCode},
    middleware::Next,
    response::Response,
};
use std::{
    collections::HashMap,
    net::{IpAddr, Ipv4Addr, SocketAddr},
    sync::{Arc, Mutex},
    time::{Duration, Instant},
};

/// Serving configuration loaded from environment variables.
#[derive(Clone, Debug, Default)]
pub struct ServeConfig {
    /// Allowed CORS origins (from FACTGRAPH_CORS_ORIGINS, comma-separated).
    /// `None` allows any origin.
    pub cors_origins: Option<Vec<String>>,
    /// Per-IP limiter (from FACTGRAPH_RATE_LIMIT, requests per minute)
    pub rate_limiter: Option<RateLimiter>,
}

impl ServeConfig {
    pub fn from_env() -> Self {
        let cors_origins = std::env::var("FACTGRAPH_CORS_ORIGINS").ok().map(|s| {
            s.split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect()
        });

        // Forwarded headers are client-controlled; only honour them behind
        // a proxy that overwrites them.
        let trust_proxy = std::env::var("FACTGRAPH_TRUST_PROXY")
            .map(|s| matches!(s.trim(), "1" | "true" | "yes"))
            .unwrap_or(false);

        let rate_limiter = std::env::var("FACTGRAPH_RATE_LIMIT")
            .ok()
            .and_then(|s| s.parse::<u32>().ok())
            .filter(|&n| n > 0)
            .map(|n| RateLimiter::new(n, Duration::from_secs(60)).trust_proxy(trust_proxy));

        Self {
            cors_origins,
            rate_limiter,
        }
    }

    /// No origin restriction and no rate limit (local use and tests).
    pub fn disabled() -> Self {
        Self::default()
    }

    pub fn with_rate_limit(max_requests: u32) -> Self {
        Self {
            cors_origins: None,
            rate_limiter: Some(RateLimiter::new(max_requests, Duration::from_secs(60))),
        }
    }
}

#[derive(Debug)]
struct Windows {
    requests: HashMap<IpAddr, Vec<Instant>>,
    last_sweep: Instant,
}

/// Sliding-window request counter per client IP.
#[derive(Clone, Debug)]
pub struct RateLimiter {
    max_requests: u32,
    window: Duration,
    trust_proxy: bool,
    windows: Arc<Mutex<Windows>>,
}

impl RateLimiter {
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            max_requests,
            window,
            trust_proxy: false,
            windows: Arc::new(Mutex::new(Windows {
                requests: HashMap::new(),
                last_sweep: Instant::now(),
            })),
        }
    }

    /// Key clients by `X-Forwarded-For`/`X-Real-IP` instead of the peer address.
    pub fn trust_proxy(mut self, trust: bool) -> Self {
        self.trust_proxy = trust;
        self
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Windows> {
        match self.windows.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Record a request from `ip`. Returns false once the window is full.
    ///
    /// Clients idle for a whole window are dropped, at most once per window.
    pub fn check(&self, ip: IpAddr) -> bool {
        let now = Instant::now();
        let window = self.window;
        let mut windows = self.lock();

        if now.duration_since(windows.last_sweep) >= window {
            windows.requests.retain(|_, timestamps| {
                timestamps.retain(|&t| now.duration_since(t) < window);
                !timestamps.is_empty()
            });
            windows.last_sweep = now;
        }

        let entry = windows.requests.entry(ip).or_default();
        entry.retain(|&t| now.duration_since(t) < window);

        if entry.len() < self.max_requests as usize {
            entry.push(now);
            true
        } else {
            false
        }
    }

    /// Number of clients currently holding a window.
    pub fn tracked_clients(&self) -> usize {
        self.lock().requests.len()
    }
}

pub async fn rate_limit_middleware(
    State(rate_limiter): State<RateLimiter>,
    request: Request<Body>,
    next: Next,
) -> Result<Response, StatusCode> {
    let ip = client_ip(&request, rate_limiter.trust_proxy);

    if rate_limiter.check(ip) {
        Ok(next.run(request).await)
    } else {
        tracing::warn!("Rate limit exceeded for IP: {}", ip);
        Err(StatusCode::TOO_MANY_REQUESTS)
    }
}

/// Client IP: the TCP peer, or the proxy headers when `trust_proxy` is set.
/// Without connection info (in-process test transports) falls back to loopback.
fn client_ip(request: &Request<Body>, trust_proxy: bool) -> IpAddr {
    let header_ip = |name: &str| {
        request
            .headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .and_then(|v| v.trim().parse::<IpAddr>().ok())
    };

    let forwarded = if trust_proxy {
        header_ip("X-Forwarded-For").or_else(|| header_ip("X-Real-IP"))
    } else {
        None
    };

    forwarded
        .or_else(|| {
            request
                .extensions()
                .get::<ConnectInfo<SocketAddr>>()
                .map(|ConnectInfo(addr)| addr.ip())
        })
        .unwrap_or(IpAddr::V4(Ipv4Addr::LOCALHOST))
}
