//! Cookie jar parsed from a `Cookie` header.

use std::collections::{BTreeMap, BTreeSet};

use crate::http::Response;

/// Request cookies plus a record of which ones handlers changed.
#[derive(Debug, Clone, Default)]
pub struct CookieJar {
    cookies: BTreeMap<String, String>,
    modified: BTreeSet<String>,
}

impl CookieJar {
    /// Parses `a=1; b=2`. Values are percent-decoded; pairs without `=` are
    /// ignored.
    pub fn parse(header: Option<&str>) -> Self {
        let mut jar = Self::default();
        let Some(header) = header else {
            return jar;
        };

        for pair in header.split(';') {
            let Some((name, value)) = pair.trim().split_once('=') else {
                continue;
            };
            let value = urlencoding::decode(value)
                .map(|v| v.into_owned())
                .unwrap_or_else(|_| value.to_string());
            jar.cookies.insert(name.to_string(), value);
        }
        jar
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.cookies.get(name).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.cookies.contains_key(name)
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        self.modified.insert(name.clone());
        self.cookies.insert(name, value.into());
    }

    pub fn remove(&mut self, name: &str) -> Option<String> {
        let value = self.cookies.remove(name)?;
        self.modified.insert(name.to_string());
        Some(value)
    }

    /// Adds a `Set-Cookie` header for every cookie changed since parsing.
    pub fn write_to(&self, res: &mut Response) {
        for name in &self.modified {
            let header = match self.cookies.get(name) {
                Some(value) => format!("{}={}", name, urlencoding::encode(value)),
                None => format!("{}=; Max-Age=0", name),
            };
            res.headers.add("Set-Cookie", header);
        }
    }
}
