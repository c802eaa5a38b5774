//! Service id parsing and HTTP method filters
//!
//! A service id is either a bare function name (`uppercase`) or a function
//! name followed by colon-delimited segments whose last segment lists the
//! HTTP methods to probe (`uppercase:v1:GET,POST`).

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{DiscoveryError, Result};

/// HTTP methods an API Gateway integration can be bound to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Head,
    Options,
    /// Catch-all method binding
    Any,
}

impl HttpMethod {
    /// Wire token as used by the gateway API
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Head => "HEAD",
            HttpMethod::Options => "OPTIONS",
            HttpMethod::Any => "ANY",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = DiscoveryError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "GET" => Ok(HttpMethod::Get),
            "POST" => Ok(HttpMethod::Post),
            "PUT" => Ok(HttpMethod::Put),
            "DELETE" => Ok(HttpMethod::Delete),
            "PATCH" => Ok(HttpMethod::Patch),
            "HEAD" => Ok(HttpMethod::Head),
            "OPTIONS" => Ok(HttpMethod::Options),
            "ANY" => Ok(HttpMethod::Any),
            other => Err(DiscoveryError::InvalidServiceId(format!("unknown HTTP method '{}'", other))),
        }
    }
}

/// Methods probed when the caller does not name any
pub const DEFAULT_METHODS: [HttpMethod; 6] = [
    HttpMethod::Get,
    HttpMethod::Post,
    HttpMethod::Delete,
    HttpMethod::Options,
    HttpMethod::Any,
    HttpMethod::Put,
];

/// Ordered, duplicate-free set of methods to probe for each resource path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodFilter {
    methods: Vec<HttpMethod>,
}

impl MethodFilter {
    /// Build a filter from a list of methods, dropping repeats.
    ///
    /// An empty list yields the default method set.
    pub fn new(methods: impl IntoIterator<Item = HttpMethod>) -> Self {
        let mut unique = Vec::new();
        for method in methods {
            if !unique.contains(&method) {
                unique.push(method);
            }
        }

        if unique.is_empty() { Self::default() } else { Self { methods: unique } }
    }

    /// Parse a comma-separated method list such as `GET,post, ANY`
    pub fn parse(list: &str) -> Result<Self> {
        let methods = list
            .split(',')
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(HttpMethod::from_str)
            .collect::<Result<Vec<_>>>()?;

        Ok(Self::new(methods))
    }

    /// Methods in probe order
    pub fn methods(&self) -> &[HttpMethod] {
        &self.methods
    }
}

impl Default for MethodFilter {
    fn default() -> Self {
        Self { methods: DEFAULT_METHODS.to_vec() }
    }
}

/// A parsed service id: the function name plus the methods to probe
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceId {
    /// Logical function name (first colon-delimited segment)
    pub function_name: String,
    /// Methods to probe (last segment, when more than one segment is present)
    pub methods: MethodFilter,
}

impl ServiceId {
    /// Parse `name` or `name:...:METHOD,METHOD`
    pub fn parse(service_id: &str) -> Result<Self> {
        let mut segments = service_id.split(':');

        let function_name = segments.next().unwrap_or_default().trim();
        if function_name.is_empty() {
            return Err(DiscoveryError::InvalidServiceId(format!(
                "missing function name in '{}'",
                service_id
            )));
        }

        let methods = match segments.last() {
            Some(list) => MethodFilter::parse(list)?,
            None => MethodFilter::default(),
        };

        Ok(Self { function_name: function_name.to_string(), methods })
    }
}

impl FromStr for ServiceId {
    type Err = DiscoveryError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bare_name() {
        let id = ServiceId::parse("foo").unwrap();
        assert_eq!(id.function_name, "foo");
        assert_eq!(id.methods.methods(), &DEFAULT_METHODS);
    }

    #[test]
    fn test_parse_name_with_methods() {
        let id = ServiceId::parse("foo:bar:GET,POST").unwrap();
        assert_eq!(id.function_name, "foo");
        assert_eq!(id.methods.methods(), &[HttpMethod::Get, HttpMethod::Post]);
    }

    #[test]
    fn test_parse_two_segments_uses_last_as_methods() {
        let id = ServiceId::parse("foo:PUT").unwrap();
        assert_eq!(id.function_name, "foo");
        assert_eq!(id.methods.methods(), &[HttpMethod::Put]);
    }

    #[test]
    fn test_parse_methods_are_case_insensitive_and_trimmed() {
        let id = ServiceId::parse("foo:x:get, Any ,get").unwrap();
        assert_eq!(id.methods.methods(), &[HttpMethod::Get, HttpMethod::Any]);
    }

    #[test]
    fn test_parse_empty_method_list_falls_back_to_defaults() {
        let id = ServiceId::parse("foo:").unwrap();
        assert_eq!(id.methods, MethodFilter::default());
    }

    #[test]
    fn test_parse_unknown_method() {
        let result = ServiceId::parse("foo:bar:GET,FETCH");
        assert!(matches!(result, Err(DiscoveryError::InvalidServiceId(_))));
    }

    #[test]
    fn test_parse_empty_name() {
        assert!(matches!(ServiceId::parse(""), Err(DiscoveryError::InvalidServiceId(_))));
        assert!(matches!(ServiceId::parse(":GET"), Err(DiscoveryError::InvalidServiceId(_))));
    }

    #[test]
    fn test_default_method_order() {
        let names: Vec<&str> = MethodFilter::default().methods().iter().map(|m| m.as_str()).collect();
        assert_eq!(names, vec!["GET", "POST", "DELETE", "OPTIONS", "ANY", "PUT"]);
    }

    #[test]
    fn test_method_serde() {
        let method: HttpMethod = serde_json::from_str(r#""OPTIONS""#).unwrap();
        assert_eq!(method, HttpMethod::Options);
        assert_eq!(serde_json::to_string(&HttpMethod::Any).unwrap(), r#""ANY""#);
    }
}
