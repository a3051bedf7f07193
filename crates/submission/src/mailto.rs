use std::fmt;

use serde::Serialize;

/// `mailto:` deep link handed to the visitor's mail client when automated
/// delivery fails.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct MailtoLink(String);

impl MailtoLink {
    pub fn new(recipient: &str, subject: &str, body: &str) -> Self {
        Self(format!(
            "mailto:{recipient}?subject={}&body={}",
            urlencoding::encode(subject),
            urlencoding::encode(body)
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn recipient(&self) -> &str {
        let rest = self.0.trim_start_matches("mailto:");
        rest.split_once('?').map_or(rest, |(recipient, _)| recipient)
    }

    /// Percent-decoded subject.
    pub fn subject(&self) -> Option<String> {
        self.param("subject")
    }

    /// Percent-decoded body.
    pub fn body(&self) -> Option<String> {
        self.param("body")
    }

    fn param(&self, name: &str) -> Option<String> {
        let (_, query) = self.0.split_once('?')?;

        query
            .split('&')
            .filter_map(|pair| pair.split_once('='))
            .find(|(key, _)| *key == name)
            .and_then(|(_, value)| urlencoding::decode(value).ok())
            .map(|value| value.into_owned())
    }
}

impl fmt::Display for MailtoLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
