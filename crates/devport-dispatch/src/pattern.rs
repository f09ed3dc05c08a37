//! URL pattern matching for dispatch rules.
//!
//! A pattern pairs an HTTP method with a path template:
//! `GET:/api/cdn/raw/package/**`. Template segments are literals, `*`
//! (exactly one segment, captured), or `**` (the trailing remainder,
//! captured as a single `/`-joined value, final position only).

use std::fmt;

use axum::http::Method;
use thiserror::Error;

/// Errors produced while parsing a pattern string.
///
/// These are configuration faults: patterns are parsed at startup and a
/// malformed one must prevent the process from serving traffic.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PatternError {
    #[error("pattern {0:?} is missing the `METHOD:` prefix")]
    MissingMethod(String),

    #[error("pattern has an invalid HTTP method token {0:?}")]
    InvalidMethod(String),

    #[error("path template {0:?} must start with '/'")]
    NotRooted(String),

    #[error("`**` is only allowed as the final segment of {0:?}")]
    TrailingWildcardNotLast(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    /// `*` — exactly one path segment, captured.
    One,
    /// `**` — zero or more trailing segments, captured as one value.
    Rest,
}

/// A compiled `METHOD:/path/template` pattern.
#[derive(Debug, Clone)]
pub struct UrlPattern {
    method: Method,
    segments: Vec<Segment>,
    source: String,
}

impl UrlPattern {
    /// Parse a pattern string, rejecting malformed templates.
    pub fn parse(pattern: &str) -> Result<Self, PatternError> {
        let (method, template) = pattern
            .split_once(':')
            .ok_or_else(|| PatternError::MissingMethod(pattern.to_string()))?;
        let method = Method::from_bytes(method.as_bytes())
            .map_err(|_| PatternError::InvalidMethod(method.to_string()))?;
        if !template.starts_with('/') {
            return Err(PatternError::NotRooted(template.to_string()));
        }

        let parts = split_path(template);
        let mut segments = Vec::with_capacity(parts.len());
        for (idx, part) in parts.iter().enumerate() {
            segments.push(match *part {
                "**" => {
                    if idx + 1 != parts.len() {
                        return Err(PatternError::TrailingWildcardNotLast(pattern.to_string()));
                    }
                    Segment::Rest
                }
                "*" => Segment::One,
                literal => Segment::Literal(literal.to_string()),
            });
        }

        Ok(Self {
            method,
            segments,
            source: pattern.to_string(),
        })
    }

    /// Match a request's method and path against this pattern.
    ///
    /// Pure function: returns the ordered wildcard captures on a match,
    /// `None` otherwise. Path segments compare case-sensitively and the
    /// method must be exact.
    pub fn matches(&self, method: &Method, path: &str) -> Option<Vec<String>> {
        if *method != self.method {
            return None;
        }

        let parts = split_path(path);
        let mut captures = Vec::new();
        let mut at = 0;
        for segment in &self.segments {
            match segment {
                // `Rest` is final by construction; everything left over
                // (possibly nothing) becomes one capture.
                Segment::Rest => {
                    captures.push(parts[at..].join("/"));
                    return Some(captures);
                }
                Segment::One => {
                    captures.push((*parts.get(at)?).to_string());
                    at += 1;
                }
                Segment::Literal(literal) => {
                    if *parts.get(at)? != literal.as_str() {
                        return None;
                    }
                    at += 1;
                }
            }
        }

        (at == parts.len()).then_some(captures)
    }

    pub fn method(&self) -> &Method {
        &self.method
    }
}

impl fmt::Display for UrlPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

impl PartialEq for UrlPattern {
    fn eq(&self, other: &Self) -> bool {
        self.method == other.method && self.segments == other.segments
    }
}

fn split_path(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}
