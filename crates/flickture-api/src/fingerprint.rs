//! Request identity for in-flight de-duplication.
//!
//! Two requests share a fingerprint when they have the same method, path,
//! query parameters and body. Object keys are sorted before serializing and
//! query parameters are ordered by key, so `{"a":1,"b":2}` and
//! `{"b":2,"a":1}` collapse to one request. Paths are compared verbatim:
//! `/lists/1` and `/lists/1/` are different requests.

use std::fmt;

use reqwest::Method;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint(String);

impl Fingerprint {
    pub fn of(method: &Method, path: &str, query: &[(String, String)], body: Option<&Value>) -> Self {
        let mut pairs: Vec<&(String, String)> = query.iter().collect();
        // Stable: repeated keys keep their relative order.
        pairs.sort_by(|a, b| a.0.cmp(&b.0));

        let mut key = String::new();
        key.push_str(method.as_str());
        key.push(':');
        key.push_str(path);
        key.push(':');
        key.push('[');
        for (i, (k, v)) in pairs.iter().enumerate() {
            if i > 0 {
                key.push(',');
            }
            key.push_str(&Value::String(k.clone()).to_string());
            key.push('=');
            key.push_str(&Value::String(v.clone()).to_string());
        }
        key.push(']');
        key.push(':');
        match body {
            Some(body) => write_canonical(body, &mut key),
            None => key.push_str("null"),
        }
        Self(key)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Serialize JSON with object keys in sorted order at every depth.
pub fn canonical_json(value: &Value) -> String {
    let mut out = String::new();
    write_canonical(value, &mut out);
    out
}

fn write_canonical(value: &Value, out: &mut String) {
    match value {
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            out.push('{');
            for (i, key) in keys.into_iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                out.push_str(&Value::String(key.clone()).to_string());
                out.push(':');
                write_canonical(&map[key], out);
            }
            out.push('}');
        }
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_canonical(item, out);
            }
            out.push(']');
        }
        scalar => out.push_str(&scalar.to_string()),
    }
}
