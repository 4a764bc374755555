//! Route names for request spans.

use uuid::Uuid;

/// Collapse identifiers so spans group by route: `/drafts/<uuid>` becomes
/// `/drafts/{uuid}`.
pub(super) fn route_name(path: &str) -> String {
    let mut route = String::from("/");

    for (index, segment) in path.trim_start_matches('/').split('/').enumerate() {
        if index > 0 {
            route.push('/');
        }

        if Uuid::parse_str(segment).is_ok() {
            route.push_str("{uuid}");
        } else {
            route.push_str(segment);
        }
    }

    route
}
