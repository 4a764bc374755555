//! Test helpers.

use jiff::Timestamp;
use salvo::{affix_state::inject, prelude::*};
use serde_json::Value;

use patisserie::catalog::RulesCatalog;
use patisserie_app::{
    context::AppContext,
    domain::{
        drafts::{
            MockDraftsService,
            models::{Draft, DraftUuid},
        },
        promotions::MockPromotionsService,
        rate_limits::RateLimitPolicy,
        users::UserUuid,
    },
};

use crate::state::State;

/// In-memory stores with the built-in catalog.
pub(crate) fn test_app() -> AppContext {
    AppContext::in_memory(RulesCatalog::standard(), RateLimitPolicy::STANDARD)
}

pub(crate) fn service(app: AppContext, route: Router) -> Service {
    Service::new(
        Router::new()
            .hoop(inject(State::from_app_context(app)))
            .push(route),
    )
}

/// Drafts mock that fails the test on any call not explicitly expected.
pub(crate) fn strict_drafts() -> MockDraftsService {
    let mut drafts = MockDraftsService::new();

    drafts.expect_get_draft().never();
    drafts.expect_get_latest_draft_for_user().never();
    drafts.expect_upsert_draft().never();

    drafts
}

pub(crate) fn strict_promotions() -> MockPromotionsService {
    let mut promotions = MockPromotionsService::new();

    promotions.expect_lookup_code().never();
    promotions.expect_create_code().never();

    promotions
}

pub(crate) fn make_draft(uuid: DraftUuid, owner: UserUuid, config: Value) -> Draft {
    Draft {
        uuid,
        owner,
        config,
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}
