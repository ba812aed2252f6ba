// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! URL match patterns (`<scheme>://<host><path>`)
//!
//! Same shape browsers use to scope request listeners:
//! `*://opensource.samsung.com/downSrcCode`, `https://*.example.com/api/*`.

use std::fmt;

use regex::Regex;
use url::Url;

use crate::error::{Error, Result};

/// Compiled URL match pattern
#[derive(Clone)]
pub struct MatchPattern {
    /// Pattern as written
    source: String,
    /// Regex over `scheme://host/path[?query]`
    regex: Regex,
}

impl MatchPattern {
    /// Parse a match pattern
    ///
    /// Scheme may be `*` (http or https). Host may be `*` or start with
    /// `*.` to include subdomains. `*` in the path matches any run of
    /// characters.
    pub fn parse(pattern: &str) -> Result<Self> {
        let (scheme, rest) = pattern
            .split_once("://")
            .ok_or_else(|| Error::config(format!("match pattern '{}' has no scheme", pattern)))?;
        let (host, path) = match rest.find('/') {
            Some(idx) => rest.split_at(idx),
            None => {
                return Err(Error::config(format!(
                    "match pattern '{}' has no path",
                    pattern
                )))
            }
        };

        let scheme_re = match scheme {
            "*" => "https?".to_string(),
            "http" | "https" => regex::escape(scheme),
            other => {
                return Err(Error::config(format!("unsupported scheme '{}'", other)));
            }
        };

        let host_re = if host == "*" {
            "[^/]+".to_string()
        } else if let Some(base) = host.strip_prefix("*.") {
            format!(r"(?:[^/]+\.)?{}", regex::escape(&base.to_ascii_lowercase()))
        } else if host.is_empty() || host.contains('*') {
            return Err(Error::config(format!("invalid host in '{}'", pattern)));
        } else {
            regex::escape(&host.to_ascii_lowercase())
        };

        let path_re = path
            .split('*')
            .map(regex::escape)
            .collect::<Vec<_>>()
            .join(".*");

        // Url already lower-cases scheme and host, so only the pattern side needs folding
        let regex = Regex::new(&format!("^{}://{}{}$", scheme_re, host_re, path_re))
            .map_err(|e| Error::config(format!("match pattern '{}': {}", pattern, e)))?;

        Ok(Self {
            source: pattern.to_string(),
            regex,
        })
    }

    /// Check a URL against the pattern
    pub fn matches(&self, url: &Url) -> bool {
        let host = match url.host_str() {
            Some(h) => h,
            None => return false,
        };
        let mut candidate = format!("{}://{}{}", url.scheme(), host, url.path());
        if let Some(query) = url.query() {
            candidate.push('?');
            candidate.push_str(query);
        }
        self.regex.is_match(&candidate)
    }

    /// Check a raw URL string against the pattern
    pub fn matches_str(&self, url: &str) -> bool {
        Url::parse(url).map(|u| self.matches(&u)).unwrap_or(false)
    }

    /// Pattern as written
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// The single URL a wildcard-free pattern names
    ///
    /// A `*` scheme is read as https. Host or path wildcards have no single
    /// URL and are rejected.
    pub fn to_url(&self) -> Result<Url> {
        let (scheme, rest) = self
            .source
            .split_once("://")
            .ok_or_else(|| Error::config(format!("match pattern '{}' has no scheme", self)))?;
        if rest.contains('*') {
            return Err(Error::config(format!(
                "match pattern '{}' has wildcards and names no single URL",
                self
            )));
        }

        let scheme = if scheme == "*" { "https" } else { scheme };
        Ok(Url::parse(&format!("{}://{}", scheme, rest))?)
    }
}

impl fmt::Debug for MatchPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("MatchPattern").field(&self.source).finish()
    }
}

impl fmt::Display for MatchPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_any_scheme_exact_path() {
        let p = MatchPattern::parse("*://opensource.samsung.com/downSrcCode").unwrap();

        assert!(p.matches_str("https://opensource.samsung.com/downSrcCode"));
        assert!(p.matches_str("http://opensource.samsung.com/downSrcCode"));
        assert!(!p.matches_str("https://opensource.samsung.com/downSrcCode?x=1"));
        assert!(!p.matches_str("https://opensource.samsung.com/other"));
        assert!(!p.matches_str("https://evil.com/downSrcCode"));
        assert!(!p.matches_str("ftp://opensource.samsung.com/downSrcCode"));
    }

    #[test]
    fn test_subdomain_and_path_wildcards() {
        let p = MatchPattern::parse("https://*.example.com/api/*").unwrap();

        assert!(p.matches_str("https://example.com/api/v1"));
        assert!(p.matches_str("https://a.b.example.com/api/"));
        assert!(!p.matches_str("http://example.com/api/v1"));
        assert!(!p.matches_str("https://notexample.com/api/v1"));
    }

    #[test]
    fn test_host_is_case_insensitive() {
        let p = MatchPattern::parse("*://Example.COM/x").unwrap();
        assert!(p.matches_str("https://example.com/x"));
    }

    #[test]
    fn test_invalid_patterns() {
        assert!(MatchPattern::parse("example.com/x").is_err());
        assert!(MatchPattern::parse("*://example.com").is_err());
        assert!(MatchPattern::parse("ftp://example.com/x").is_err());
        assert!(MatchPattern::parse("*://ex*ample.com/x").is_err());
    }

    #[test]
    fn test_to_url() {
        let p = MatchPattern::parse("*://opensource.samsung.com/downSrcCode").unwrap();
        assert_eq!(
            p.to_url().unwrap().as_str(),
            "https://opensource.samsung.com/downSrcCode"
        );

        let p = MatchPattern::parse("http://files.example.org/get").unwrap();
        assert_eq!(p.to_url().unwrap().scheme(), "http");

        for wild in ["*://*.example.com/get", "*://*/get", "https://example.com/api/*"] {
            let err = MatchPattern::parse(wild).unwrap().to_url().unwrap_err();
            assert!(matches!(err, Error::Config(_)), "{}", wild);
        }
    }
}
