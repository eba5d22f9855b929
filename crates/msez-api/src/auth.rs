//! # Authentication Middleware
//!
//! JWT/Bearer token authentication for API endpoints.
//! Health probes are unauthenticated.

/// Placeholder for authentication middleware.
///
/// Full implementation will extract and validate JWT bearer tokens,
/// enforce scope-based authorization, and inject identity context
/// into request extensions.
pub struct AuthLayer {
    _private: (),
}
