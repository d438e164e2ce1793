//! Security response headers applied to every route

use axum::{
    http::{HeaderName, HeaderValue},
    Router,
};
use kenq_config::{Environment, PortalConfig};
use tower_http::set_header::SetResponseHeaderLayer;

use crate::error::{ApiError, ApiResult};

/// Content security policy; development additionally allows `'unsafe-eval'`
pub fn content_security_policy(config: &PortalConfig) -> String {
    let script_src = match config.portal.environment {
        Environment::Production => "'self' 'unsafe-inline'",
        Environment::Development => "'self' 'unsafe-inline' 'unsafe-eval'",
    };
    let api_url = config.backend.api_url.as_deref().unwrap_or("");
    format!(
        "default-src 'self'; \
         script-src {script_src}; \
         style-src 'self' 'unsafe-inline' fonts.googleapis.com; \
         font-src 'self' fonts.gstatic.com; \
         img-src 'self' data:; \
         connect-src 'self' {api_url} {public_url}; \
         form-action 'self'; \
         object-src 'none';",
        public_url = config.portal.public_url,
    )
}

/// Header name/value pairs sent with every response
pub fn header_pairs(config: &PortalConfig) -> Vec<(&'static str, String)> {
    vec![
        ("content-security-policy", content_security_policy(config)),
        ("x-frame-options", "SAMEORIGIN".to_string()),
        ("x-xss-protection", "1; mode=block".to_string()),
        ("x-content-type-options", "nosniff".to_string()),
        (
            "strict-transport-security",
            "max-age=63072000; includeSubDomains; preload".to_string(),
        ),
        ("referrer-policy", "strict-origin-when-cross-origin".to_string()),
        ("permissions-policy", "geolocation=(), camera=()".to_string()),
    ]
}

/// Wrap a router so every response carries the security headers
pub fn security_headers<S>(mut router: Router<S>, config: &PortalConfig) -> ApiResult<Router<S>>
where
    S: Clone + Send + Sync + 'static,
{
    for (name, value) in header_pairs(config) {
        let value = HeaderValue::from_str(&value)
            .map_err(|e| ApiError::Internal(format!("Invalid {name} header: {e}")))?;
        router = router.layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static(name),
            value,
        ));
    }
    Ok(router)
}
