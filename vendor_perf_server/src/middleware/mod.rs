mod bearer_auth;

pub use bearer_auth::BearerAuthMiddlewareFactory;
