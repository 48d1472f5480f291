use std::sync::Arc;

use url::Url;

use crate::model::{NetworkLogEntry, Snapshot};

/// Resolve `raw` against `origin` and drop any fragment. Strings that do not
/// parse as URLs are compared verbatim.
pub fn normalize_url(raw: &str, origin: Option<&Url>) -> String {
    let parsed = match origin {
        Some(base) => base.join(raw),
        None => Url::parse(raw),
    };
    match parsed {
        Ok(mut url) => {
            url.set_fragment(None);
            url.to_string()
        }
        Err(_) => raw.to_string(),
    }
}

/// Resolves replay-time requests to recorded entries of one snapshot.
///
/// Candidates are scanned in log order and the first acceptable one wins.
/// URLs match exactly after normalization, or when either is a prefix of the
/// other, which absorbs cache-busters and trailing query differences.
#[derive(Debug, Clone)]
pub struct Matcher {
    snapshot: Arc<Snapshot>,
    origin: Option<Url>,
    normalized: Vec<String>,
}

impl Matcher {
    pub fn new(snapshot: Arc<Snapshot>, origin: Option<Url>) -> Self {
        let normalized = snapshot
            .network_logs
            .iter()
            .map(|entry| normalize_url(&entry.url, origin.as_ref()))
            .collect();
        Self {
            snapshot,
            origin,
            normalized,
        }
    }

    pub fn origin(&self) -> Option<&Url> {
        self.origin.as_ref()
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    pub fn find(&self, method: &str, url: &str, body: Option<&str>) -> Option<&NetworkLogEntry> {
        let target = normalize_url(url, self.origin.as_ref());
        let body = body.unwrap_or("");

        self.snapshot
            .network_logs
            .iter()
            .zip(&self.normalized)
            .find(|(entry, candidate)| {
                if entry.url.is_empty() || !entry.method.eq_ignore_ascii_case(method) {
                    return false;
                }
                if let Some(recorded) = &entry.request_body {
                    if recorded != body {
                        return false;
                    }
                }
                url_matches(candidate, &target)
            })
            .map(|(entry, _)| entry)
    }
}

fn url_matches(candidate: &str, target: &str) -> bool {
    if candidate == target {
        return true;
    }
    !candidate.is_empty() && (target.starts_with(candidate) || candidate.starts_with(target))
}
