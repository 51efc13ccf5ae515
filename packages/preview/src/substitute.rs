//! Textual `{{name}}` replacement.
//!
//! Runs on raw markup before parsing, so a value is spliced in exactly where
//! its token stood, attribute values included. Whatever markup a value
//! carries is left for the sanitizer.

use autoletter_common::{token_regex, MergeVariable};
use regex::Captures;
use serde::Serialize;
use std::collections::BTreeMap;

/// System value every preview can link to; never inserted from the toolbar
pub const UNSUBSCRIBE_URL: &str = "unsubscribeUrl";

/// Values used in place of recipient data, keyed by token name
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SampleValues {
    values: BTreeMap<String, String>,
}

impl SampleValues {
    /// No values at all; every token is left in place
    pub fn empty() -> Self {
        Self {
            values: BTreeMap::new(),
        }
    }

    /// Caller-provided values win over the ones already present
    pub fn with_overrides<I, K, V>(mut self, overrides: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (name, value) in overrides {
            self.values.insert(name.into(), value.into());
        }
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl Default for SampleValues {
    fn default() -> Self {
        let mut values: BTreeMap<String, String> = MergeVariable::ALL
            .iter()
            .map(|v| (v.name().to_string(), v.sample_value().to_string()))
            .collect();
        values.insert(UNSUBSCRIBE_URL.to_string(), "#unsubscribe".to_string());
        Self { values }
    }
}

/// Replace every token that has a value. Unknown tokens stay as written.
pub fn substitute(html: &str, samples: &SampleValues) -> String {
    token_regex()
        .replace_all(html, |caps: &Captures| match samples.get(&caps[1]) {
            Some(value) => value.to_string(),
            None => caps[0].to_string(),
        })
        .into_owned()
}
