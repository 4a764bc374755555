//! App Router

use salvo::Router;

use crate::{drafts, healthcheck, pricing, promos, rate_limit::rate_limit, totals};

pub(crate) fn app_router() -> Router {
    Router::new()
        .push(Router::with_path("healthcheck").get(healthcheck::handler))
        .push(
            Router::with_path("price")
                .get(pricing::catalog::handler)
                .push(Router::new().hoop(rate_limit).post(pricing::quote::handler)),
        )
        .push(Router::with_path("delivery").post(pricing::delivery::handler))
        .push(Router::with_path("totals").post(totals::create::handler))
        .push(Router::with_path("promos/apply").post(promos::apply::handler))
        .push(
            Router::with_path("drafts")
                .get(drafts::latest::handler)
                .post(drafts::create::handler)
                .push(Router::with_path("history").post(drafts::history::handler))
                .push(Router::with_path("{draft}").get(drafts::get::handler)),
        )
}

#[cfg(test)]
mod tests {
    use std::{sync::Arc, time::Duration};

    use salvo::{
        http::StatusCode,
        test::{ResponseExt, TestClient},
    };
    use serde_json::json;
    use testresult::TestResult;

    use patisserie_app::{
        context::AppContext,
        domain::rate_limits::{MemoryRateLimitStore, RateLimitPolicy},
    };

    use crate::test_helpers::{service, test_app};

    use super::*;

    #[tokio::test]
    async fn draft_round_trip_through_the_router() -> TestResult {
        let service = service(test_app(), app_router());
        let owner = uuid::Uuid::now_v7();

        let saved: serde_json::Value = TestClient::post("http://example.com/drafts")
            .json(&json!({ "ownerUserId": owner, "config": { "weightKg": 2 } }))
            .send(&service)
            .await
            .take_json()
            .await?;

        let latest: serde_json::Value =
            TestClient::get(format!("http://example.com/drafts?owner={owner}"))
                .send(&service)
                .await
                .take_json()
                .await?;

        assert_eq!(latest.get("id"), saved.get("id"), "latest is the saved draft");

        let history = TestClient::post("http://example.com/drafts/history")
            .json(&json!({ "draftId": saved.get("id"), "authorUserId": owner, "config": {} }))
            .send(&service)
            .await;

        assert_eq!(history.status_code, Some(StatusCode::ACCEPTED), "history route");

        Ok(())
    }

    #[tokio::test]
    async fn only_quotes_are_rate_limited() {
        let app = AppContext {
            rate_limits: Arc::new(MemoryRateLimitStore::new(RateLimitPolicy {
                max_requests: 1,
                window: Duration::from_secs(60),
            })),
            ..test_app()
        };

        let service = service(app, app_router());
        let body = json!({ "config": { "productType": "cake", "weightKg": 1 } });

        let first = TestClient::post("http://example.com/price")
            .json(&body)
            .send(&service)
            .await;
        let second = TestClient::post("http://example.com/price")
            .json(&body)
            .send(&service)
            .await;
        let catalog = TestClient::get("http://example.com/price").send(&service).await;

        assert_eq!(first.status_code, Some(StatusCode::OK), "first quote");
        assert_eq!(second.status_code, Some(StatusCode::TOO_MANY_REQUESTS), "second quote");
        assert_eq!(catalog.status_code, Some(StatusCode::OK), "catalog not limited");
    }
}
