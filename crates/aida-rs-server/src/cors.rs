//! CORS response fairing.

use rocket::fairing::{Fairing, Info, Kind};
use rocket::http::Header;
use rocket::{Request, Response};

const ALLOWED_METHODS: &str = "GET, POST, OPTIONS";

/// Adds CORS headers for requests from allowed origins.
///
/// An entry of `*` allows every origin but never with credentials; listed
/// origins are echoed back with `Access-Control-Allow-Credentials: true`.
#[derive(Debug, Clone)]
pub struct Cors {
    allowed_origins: Vec<String>,
}

impl Cors {
    pub fn new(allowed_origins: Vec<String>) -> Self {
        Self { allowed_origins }
    }

    pub fn allows(&self, origin: &str) -> bool {
        self.is_listed(origin) || self.is_wildcard()
    }

    fn is_listed(&self, origin: &str) -> bool {
        self.allowed_origins.iter().any(|allowed| allowed == origin)
    }

    fn is_wildcard(&self) -> bool {
        self.allowed_origins.iter().any(|allowed| allowed == "*")
    }
}

#[rocket::async_trait]
impl Fairing for Cors {
    fn info(&self) -> Info {
        Info {
            name: "CORS",
            kind: Kind::Response,
        }
    }

    async fn on_response<'r>(&self, request: &'r Request<'_>, response: &mut Response<'r>) {
        let Some(origin) = request.headers().get_one("Origin") else {
            return;
        };
        if !self.allows(origin) {
            return;
        }
        let allowed_headers = request
            .headers()
            .get_one("Access-Control-Request-Headers")
            .unwrap_or("Content-Type")
            .to_string();
        if self.is_listed(origin) {
            response.set_header(Header::new(
                "Access-Control-Allow-Origin",
                origin.to_string(),
            ));
            response.set_header(Header::new("Access-Control-Allow-Credentials", "true"));
        } else {
            response.set_header(Header::new("Access-Control-Allow-Origin", "*"));
        }
        response.set_header(Header::new("Access-Control-Allow-Methods", ALLOWED_METHODS));
        response.set_header(Header::new("Access-Control-Allow-Headers", allowed_headers));
        response.set_header(Header::new("Vary", "Origin"));
    }
}
