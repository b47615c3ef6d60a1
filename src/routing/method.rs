//! HTTP verbs applied uniformly to every generated route.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::RouteError;

/// A single supported HTTP verb.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    /// Upper-case wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = RouteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "GET" => Ok(Self::Get),
            "POST" => Ok(Self::Post),
            "PUT" => Ok(Self::Put),
            "PATCH" => Ok(Self::Patch),
            "DELETE" => Ok(Self::Delete),
            _ => Err(RouteError::InvalidMethod(s.to_string())),
        }
    }
}

/// The verb set shared by all routes. Never empty.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpMethods(Vec<HttpMethod>);

impl HttpMethods {
    /// Parse verb names, dropping duplicates.
    ///
    /// ```
    /// use artisan_api::routing::HttpMethods;
    ///
    /// let methods = HttpMethods::parse(["get", "POST", "GET"]).unwrap();
    /// assert_eq!(methods.to_string(), "GET|POST");
    /// assert!(methods.allows("POST"));
    /// assert!(!methods.allows("DELETE"));
    /// ```
    pub fn parse<I, S>(names: I) -> Result<Self, RouteError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut methods = Vec::new();
        for name in names {
            let method: HttpMethod = name.as_ref().parse()?;
            if !methods.contains(&method) {
                methods.push(method);
            }
        }
        if methods.is_empty() {
            return Err(RouteError::InvalidMethod("<none>".to_string()));
        }
        Ok(Self(methods))
    }

    /// Whether a request method, exactly as sent on the wire, is accepted.
    ///
    /// Method tokens are case-sensitive, so `post` is not `POST`. Case is
    /// only folded when parsing configuration.
    pub fn allows(&self, method: &str) -> bool {
        self.0.iter().any(|m| m.as_str() == method)
    }

    /// Verbs in configuration order.
    pub fn iter(&self) -> impl Iterator<Item = HttpMethod> + '_ {
        self.0.iter().copied()
    }
}

impl Default for HttpMethods {
    fn default() -> Self {
        Self(vec![HttpMethod::Post])
    }
}

impl fmt::Display for HttpMethods {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.0.iter().map(HttpMethod::as_str).collect();
        f.write_str(&names.join("|"))
    }
}

impl Serialize for HttpMethods {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.0.iter().map(HttpMethod::as_str))
    }
}

/// Accepts either `"POST"` or `["GET", "POST"]`.
impl<'de> Deserialize<'de> for HttpMethods {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum OneOrMany {
            One(String),
            Many(Vec<String>),
        }

        let names = match OneOrMany::deserialize(deserializer)? {
            OneOrMany::One(name) => vec![name],
            OneOrMany::Many(names) => names,
        };
        HttpMethods::parse(names).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_case_insensitive() {
        assert_eq!("patch".parse::<HttpMethod>().unwrap(), HttpMethod::Patch);
        assert_eq!(" Delete ".parse::<HttpMethod>().unwrap(), HttpMethod::Delete);
        assert!("TRACE".parse::<HttpMethod>().is_err());
    }

    #[test]
    fn test_allows_is_case_sensitive() {
        let methods = HttpMethods::parse(["post"]).unwrap();
        assert!(methods.allows("POST"));
        assert!(!methods.allows("post"));
        assert!(!methods.allows("Post"));
        assert!(!methods.allows(" POST"));
    }

    #[test]
    fn test_empty_set_rejected() {
        assert!(HttpMethods::parse(Vec::<String>::new()).is_err());
    }

    #[test]
    fn test_default_is_post() {
        let methods = HttpMethods::default();
        assert!(methods.allows("POST"));
        assert!(!methods.allows("GET"));
        assert!(!methods.allows("BREW"));
    }

    #[test]
    fn test_deserialize_one_or_many() {
        let one: HttpMethods = serde_json::from_str(r#""get""#).unwrap();
        assert_eq!(one.to_string(), "GET");

        let many: HttpMethods = serde_json::from_str(r#"["GET", "post"]"#).unwrap();
        assert_eq!(many.iter().collect::<Vec<_>>(), vec![HttpMethod::Get, HttpMethod::Post]);

        assert!(serde_json::from_str::<HttpMethods>(r#"["GET", "TRACE"]"#).is_err());
        assert_eq!(serde_json::to_string(&many).unwrap(), r#"["GET","POST"]"#);
    }
}
