//! Per-client throttling for the price endpoint.

use salvo::{
    http::header::{RETRY_AFTER, USER_AGENT},
    prelude::*,
};
use serde::Serialize;
use tracing::{error, warn};

use patisserie_app::domain::rate_limits::RateLimitDecision;

use crate::extensions::*;

#[derive(Debug, Serialize)]
struct LimitedResponse {
    error: &'static str,
}

/// Client identity: the forwarded address (or `unknown`) plus the user agent.
fn client_key(req: &Request) -> String {
    let address = req
        .header::<String>("x-forwarded-for")
        .and_then(|value| value.split(',').next().map(|first| first.trim().to_string()))
        .filter(|value| !value.is_empty())
        .or_else(|| req.header::<String>("x-real-ip"))
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| "unknown".to_string());

    let agent = req.header::<String>(USER_AGENT).unwrap_or_default();

    format!("{address}:{agent}")
}

#[handler]
pub(crate) async fn rate_limit(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    let Ok(state) = depot.state_or_500() else {
        res.status_code(StatusCode::INTERNAL_SERVER_ERROR);
        ctrl.skip_rest();

        return;
    };

    let key = client_key(req);

    match state.app.rate_limits.hit(&key).await {
        RateLimitDecision::Allowed { .. } => {
            ctrl.call_next(req, depot, res).await;
        }
        RateLimitDecision::Limited { retry_after } => {
            warn!(client = %key, "rate limit exceeded");

            let seconds = retry_after.as_secs().max(1).to_string();

            if let Err(source) = res.add_header(RETRY_AFTER, seconds, true) {
                error!(%source, "failed to set retry-after header");
            }

            res.status_code(StatusCode::TOO_MANY_REQUESTS);
            res.render(Json(LimitedResponse {
                error: "Too many requests",
            }));

            ctrl.skip_rest();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{sync::Arc, time::Duration};

    use salvo::{
        http::header::HeaderValue,
        test::{ResponseExt, TestClient},
    };
    use testresult::TestResult;

    use patisserie_app::domain::rate_limits::{MemoryRateLimitStore, RateLimitPolicy};

    use crate::test_helpers::{service, test_app};

    use super::*;

    #[handler]
    async fn ok() -> &'static str {
        "ok"
    }

    fn limited_service(max_requests: u32) -> Service {
        let app = patisserie_app::context::AppContext {
            rate_limits: Arc::new(MemoryRateLimitStore::new(RateLimitPolicy {
                max_requests,
                window: Duration::from_secs(60),
            })),
            ..test_app()
        };

        service(app, Router::with_path("price").hoop(rate_limit).get(ok))
    }

    #[tokio::test]
    async fn requests_over_the_limit_get_429() -> TestResult {
        let service = limited_service(2);

        for _ in 0..2 {
            let res = TestClient::get("http://example.com/price")
                .add_header("x-forwarded-for", "10.0.0.1", true)
                .send(&service)
                .await;

            assert_eq!(res.status_code, Some(StatusCode::OK), "within limit");
        }

        let mut res = TestClient::get("http://example.com/price")
            .add_header("x-forwarded-for", "10.0.0.1", true)
            .send(&service)
            .await;

        assert_eq!(res.status_code, Some(StatusCode::TOO_MANY_REQUESTS), "limited");
        assert!(res.headers().contains_key("retry-after"), "retry-after set");
        assert!(res.take_string().await?.contains("Too many requests"), "error body");

        Ok(())
    }

    #[tokio::test]
    async fn clients_are_counted_separately() {
        let service = limited_service(1);

        for address in ["10.0.0.1", "10.0.0.2"] {
            let res = TestClient::get("http://example.com/price")
                .add_header("x-forwarded-for", address, true)
                .send(&service)
                .await;

            assert_eq!(res.status_code, Some(StatusCode::OK), "first request from {address}");
        }
    }

    #[test]
    fn key_prefers_forwarded_address() {
        let mut req = Request::default();

        req.headers_mut()
            .insert("x-forwarded-for", HeaderValue::from_static("1.2.3.4, 5.6.7.8"));
        req.headers_mut()
            .insert("x-real-ip", HeaderValue::from_static("9.9.9.9"));
        req.headers_mut()
            .insert("user-agent", HeaderValue::from_static("curl/8"));

        assert_eq!(client_key(&req), "1.2.3.4:curl/8", "first forwarded hop");
        assert_eq!(client_key(&Request::default()), "unknown:", "no headers");
    }
}
