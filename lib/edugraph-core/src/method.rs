//! HTTP verbs a request can carry.

use std::str::FromStr;

use derive_more::Display;

use crate::Error;

/// Verb of a [`RequestInformation`](crate::RequestInformation).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum Method {
    /// `GET`
    #[display("GET")]
    Get,
    /// `POST`
    #[display("POST")]
    Post,
    /// `PATCH`
    #[display("PATCH")]
    Patch,
    /// `DELETE`
    #[display("DELETE")]
    Delete,
    /// `OPTIONS`
    #[display("OPTIONS")]
    Options,
    /// `CONNECT`
    #[display("CONNECT")]
    Connect,
    /// `PUT`
    #[display("PUT")]
    Put,
    /// `TRACE`
    #[display("TRACE")]
    Trace,
    /// `HEAD`
    #[display("HEAD")]
    Head,
}

impl Method {
    /// Upper-case wire name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
            Self::Options => "OPTIONS",
            Self::Connect => "CONNECT",
            Self::Put => "PUT",
            Self::Trace => "TRACE",
            Self::Head => "HEAD",
        }
    }

    /// Safe verbs never change server state.
    #[must_use]
    pub const fn is_safe(&self) -> bool {
        matches!(self, Self::Get | Self::Head | Self::Options | Self::Trace)
    }

    /// `POST`, `PUT` and `PATCH` carry a request body.
    #[must_use]
    pub const fn allows_body(&self) -> bool {
        matches!(self, Self::Post | Self::Put | Self::Patch)
    }

    /// Repeating the call has the same effect as making it once.
    #[must_use]
    pub const fn is_idempotent(&self) -> bool {
        self.is_safe() || matches!(self, Self::Put | Self::Delete)
    }
}

impl FromStr for Method {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let method = match value.to_ascii_uppercase().as_str() {
            "GET" => Self::Get,
            "POST" => Self::Post,
            "PATCH" => Self::Patch,
            "DELETE" => Self::Delete,
            "OPTIONS" => Self::Options,
            "CONNECT" => Self::Connect,
            "PUT" => Self::Put,
            "TRACE" => Self::Trace,
            "HEAD" => Self::Head,
            _ => {
                return Err(Error::configuration(format!(
                    "unsupported HTTP method: {value}"
                )));
            }
        };
        Ok(method)
    }
}

impl From<Method> for http::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => Self::GET,
            Method::Post => Self::POST,
            Method::Patch => Self::PATCH,
            Method::Delete => Self::DELETE,
            Method::Options => Self::OPTIONS,
            Method::Connect => Self::CONNECT,
            Method::Put => Self::PUT,
            Method::Trace => Self::TRACE,
            Method::Head => Self::HEAD,
        }
    }
}

impl TryFrom<http::Method> for Method {
    type Error = Error;

    fn try_from(method: http::Method) -> Result<Self, Self::Error> {
        method.as_str().parse()
    }
}

#[cfg(test)]
mod tests {
    use assert2::{check, let_assert};

    use super::*;

    const ALL: [Method; 9] = [
        Method::Get,
        Method::Post,
        Method::Patch,
        Method::Delete,
        Method::Options,
        Method::Connect,
        Method::Put,
        Method::Trace,
        Method::Head,
    ];

    #[test]
    fn display_matches_wire_name() {
        for method in ALL {
            check!(method.to_string() == method.as_str());
        }
    }

    #[test]
    fn http_round_trip() {
        for method in ALL {
            let_assert!(Ok(back) = Method::try_from(http::Method::from(method)));
            check!(back == method);
        }
    }

    #[test]
    fn parse_is_case_insensitive() {
        check!("patch".parse::<Method>().ok() == Some(Method::Patch));
        let_assert!(Err(error) = "PURGE".parse::<Method>());
        check!(error.to_string().contains("PURGE"));
    }

    #[test]
    fn verb_classes() {
        check!(Method::Trace.is_safe());
        check!(!Method::Post.is_safe());
        check!(Method::Delete.is_idempotent());
        check!(!Method::Patch.is_idempotent());
        check!(Method::Patch.allows_body());
        check!(!Method::Get.allows_body());
    }
}
