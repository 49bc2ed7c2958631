use axum::http::Method;

use crate::models::usermodel::RoleName;

/// Access requirement for a route. Unmatched routes default to
/// `Authenticated`, so forgetting a table entry can never open a hole.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RouteAccess {
    Public,
    Authenticated,
    AnyOf(&'static [RoleName]),
}

const ADMIN: &[RoleName] = &[RoleName::Admin];
const ADMIN_OR_MODERATOR: &[RoleName] = &[RoleName::Admin, RoleName::Moderator];
const CUSTOMER: &[RoleName] = &[RoleName::Customer];
const PROVIDER: &[RoleName] = &[RoleName::Provider];

/// Declarative route permission table, evaluated top to bottom with first
/// match winning. Pattern segments: `*` matches exactly one segment, a
/// trailing `**` matches one or more. `None` matches any HTTP method.
static RULES: &[(Option<Method>, &str, RouteAccess)] = &[
    (None, "/health", RouteAccess::Public),
    (None, "/api/auth/**", RouteAccess::Public),
    // Users
    (None, "/api/users/profile", RouteAccess::Authenticated),
    (Some(Method::PUT), "/api/users/change-password", RouteAccess::Authenticated),
    (Some(Method::GET), "/api/users/check-email", RouteAccess::Public),
    (Some(Method::GET), "/api/users/check-phone", RouteAccess::Public),
    (Some(Method::GET), "/api/users/providers", RouteAccess::Public),
    (Some(Method::GET), "/api/users/nearby", RouteAccess::Authenticated),
    (Some(Method::GET), "/api/users/search", RouteAccess::AnyOf(ADMIN_OR_MODERATOR)),
    (Some(Method::GET), "/api/users/stats", RouteAccess::AnyOf(ADMIN)),
    (Some(Method::GET), "/api/users/customers", RouteAccess::AnyOf(ADMIN_OR_MODERATOR)),
    (Some(Method::GET), "/api/users/role/*", RouteAccess::AnyOf(ADMIN_OR_MODERATOR)),
    (Some(Method::PUT), "/api/users/*/verify-email", RouteAccess::AnyOf(ADMIN)),
    (Some(Method::PUT), "/api/users/*/verify-phone", RouteAccess::AnyOf(ADMIN)),
    (Some(Method::PUT), "/api/users/*/toggle-status", RouteAccess::AnyOf(ADMIN)),
    (Some(Method::DELETE), "/api/users/*", RouteAccess::AnyOf(ADMIN)),
    (Some(Method::GET), "/api/users/*", RouteAccess::AnyOf(ADMIN_OR_MODERATOR)),
    (Some(Method::GET), "/api/users", RouteAccess::AnyOf(ADMIN_OR_MODERATOR)),
    // Categories: public browsing, admin management
    (Some(Method::GET), "/api/categories", RouteAccess::Public),
    (Some(Method::GET), "/api/categories/**", RouteAccess::Public),
    (Some(Method::POST), "/api/categories", RouteAccess::AnyOf(ADMIN)),
    (Some(Method::PUT), "/api/categories/*", RouteAccess::AnyOf(ADMIN)),
    (Some(Method::DELETE), "/api/categories/*", RouteAccess::AnyOf(ADMIN)),
    // Services: public browsing, provider management
    (Some(Method::GET), "/api/services", RouteAccess::Public),
    (Some(Method::GET), "/api/services/**", RouteAccess::Public),
    (Some(Method::POST), "/api/services", RouteAccess::AnyOf(PROVIDER)),
    (Some(Method::PUT), "/api/services/*", RouteAccess::AnyOf(PROVIDER)),
    (Some(Method::DELETE), "/api/services/*", RouteAccess::AnyOf(PROVIDER)),
    // Search
    (Some(Method::GET), "/api/search", RouteAccess::Public),
    (Some(Method::GET), "/api/search/**", RouteAccess::Public),
    // Bookings
    (Some(Method::POST), "/api/bookings", RouteAccess::AnyOf(CUSTOMER)),
    (None, "/api/bookings/**", RouteAccess::Authenticated),
    // Reviews
    (Some(Method::POST), "/api/reviews", RouteAccess::AnyOf(CUSTOMER)),
    (Some(Method::GET), "/api/reviews/customer", RouteAccess::Authenticated),
    (Some(Method::PUT), "/api/reviews/*/response", RouteAccess::AnyOf(PROVIDER)),
    (Some(Method::GET), "/api/reviews/**", RouteAccess::Public),
];

pub fn route_access(method: &Method, path: &str) -> RouteAccess {
    for (rule_method, pattern, access) in RULES {
        let method_matches = match rule_method {
            Some(m) => m == method,
            None => true,
        };

        if method_matches && matches_pattern(pattern, path) {
            return *access;
        }
    }

    RouteAccess::Authenticated
}

fn matches_pattern(pattern: &str, path: &str) -> bool {
    let pattern_segments: Vec<&str> = pattern.split('/').filter(|s| !s.is_empty()).collect();
    let path_segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

    let mut i = 0;
    for (idx, pattern_segment) in pattern_segments.iter().enumerate() {
        if *pattern_segment == "**" {
            // Trailing ** requires at least one remaining segment.
            debug_assert!(idx == pattern_segments.len() - 1);
            return i < path_segments.len();
        }

        match path_segments.get(i) {
            Some(path_segment) if *pattern_segment == "*" || pattern_segment == path_segment => {
                i += 1;
            }
            _ => return false,
        }
    }

    i == path_segments.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pattern_matching() {
        assert!(matches_pattern("/health", "/health"));
        assert!(matches_pattern("/api/users/*", "/api/users/123"));
        assert!(!matches_pattern("/api/users/*", "/api/users/123/verify-email"));
        assert!(matches_pattern("/api/users/*/verify-email", "/api/users/123/verify-email"));
        assert!(matches_pattern("/api/auth/**", "/api/auth/login"));
        assert!(matches_pattern("/api/auth/**", "/api/auth/a/b/c"));
        assert!(!matches_pattern("/api/auth/**", "/api/auth"));
        assert!(!matches_pattern("/api/users", "/api/users/123"));
    }

    #[test]
    fn auth_endpoints_are_public() {
        assert_eq!(
            route_access(&Method::POST, "/api/auth/login"),
            RouteAccess::Public
        );
        assert_eq!(
            route_access(&Method::POST, "/api/auth/register"),
            RouteAccess::Public
        );
        assert_eq!(route_access(&Method::GET, "/health"), RouteAccess::Public);
    }

    #[test]
    fn public_browsing_endpoints() {
        assert_eq!(
            route_access(&Method::GET, "/api/categories"),
            RouteAccess::Public
        );
        assert_eq!(
            route_access(&Method::GET, "/api/services/slug/home-cleaning"),
            RouteAccess::Public
        );
        assert_eq!(
            route_access(&Method::GET, "/api/search"),
            RouteAccess::Public
        );
        assert_eq!(
            route_access(&Method::GET, "/api/reviews/service/123"),
            RouteAccess::Public
        );
        assert_eq!(
            route_access(&Method::GET, "/api/users/providers"),
            RouteAccess::Public
        );
    }

    #[test]
    fn admin_endpoints_require_roles() {
        assert_eq!(
            route_access(&Method::GET, "/api/users"),
            RouteAccess::AnyOf(ADMIN_OR_MODERATOR)
        );
        assert_eq!(
            route_access(&Method::DELETE, "/api/users/123"),
            RouteAccess::AnyOf(ADMIN)
        );
        assert_eq!(
            route_access(&Method::PUT, "/api/users/123/verify-email"),
            RouteAccess::AnyOf(ADMIN)
        );
        assert_eq!(
            route_access(&Method::POST, "/api/categories"),
            RouteAccess::AnyOf(ADMIN)
        );
    }

    #[test]
    fn profile_beats_the_user_id_wildcard() {
        assert_eq!(
            route_access(&Method::GET, "/api/users/profile"),
            RouteAccess::Authenticated
        );
        assert_eq!(
            route_access(&Method::GET, "/api/users/nearby"),
            RouteAccess::Authenticated
        );
    }

    #[test]
    fn writes_are_role_gated() {
        assert_eq!(
            route_access(&Method::POST, "/api/services"),
            RouteAccess::AnyOf(PROVIDER)
        );
        assert_eq!(
            route_access(&Method::POST, "/api/bookings"),
            RouteAccess::AnyOf(CUSTOMER)
        );
        assert_eq!(
            route_access(&Method::POST, "/api/reviews"),
            RouteAccess::AnyOf(CUSTOMER)
        );
        assert_eq!(
            route_access(&Method::PUT, "/api/reviews/123/response"),
            RouteAccess::AnyOf(PROVIDER)
        );
    }

    #[test]
    fn unmatched_routes_require_authentication() {
        assert_eq!(
            route_access(&Method::GET, "/api/unknown"),
            RouteAccess::Authenticated
        );
        assert_eq!(
            route_access(&Method::PUT, "/api/bookings/123/accept"),
            RouteAccess::Authenticated
        );
    }
}
