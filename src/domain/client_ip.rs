use std::fmt;
use std::str::FromStr;

use actix_web::HttpRequest;

const FORWARDED_FOR: &str = "X-Forwarded-For";

/// Textual source address of a submitter
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct ClientIp(String);

impl ClientIp {
    /// Resolve the submitter address of a request.
    ///
    /// The first entry of `X-Forwarded-For` wins when the app runs behind a
    /// reverse proxy, otherwise the peer address of the connection is used.
    /// Returns `None` if neither is available.
    pub fn from_request(req: &HttpRequest) -> Option<Self> {
        let forwarded = req
            .headers()
            .get(FORWARDED_FOR)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.split(',').next())
            .map(str::trim)
            .filter(|value| !value.is_empty());

        match forwarded {
            Some(ip) => Some(Self(ip.to_string())),
            None => req.peer_addr().map(|addr| Self(addr.ip().to_string())),
        }
    }
}

impl FromStr for ClientIp {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if value.is_empty() {
            return Err("Client address cannot be empty".into());
        }
        Ok(Self(value.to_string()))
    }
}

impl AsRef<str> for ClientIp {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ClientIp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
