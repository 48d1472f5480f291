use std::collections::BTreeMap;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::entry::NetworkLogEntry;
use crate::util::json;

/// Key/value contents of a `localStorage` or `sessionStorage` area.
pub type StorageMap = BTreeMap<String, String>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CookieModel {
    pub name: String,
    pub value: String,
    pub domain: String,
    pub path: String,
    pub secure: bool,
    pub http_only: bool,
    /// Epoch seconds, fractional. Session cookies have none.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration_date: Option<f64>,
}

impl CookieModel {
    /// URL the host cookie store needs when setting this cookie back.
    pub fn restore_url(&self) -> String {
        let scheme = if self.secure { "https" } else { "http" };
        let domain = self.domain.strip_prefix('.').unwrap_or(&self.domain);
        format!("{scheme}://{domain}{}", self.path)
    }
}

/// A page's URL, cookies, storage and network history at one point in time.
///
/// `network_logs` is in capture-completion order; replay relies on that order
/// to break ties between equally good matches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    /// Assembly time in epoch milliseconds.
    pub timestamp: i64,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub cookies: Vec<CookieModel>,
    #[serde(default)]
    pub local_storage: StorageMap,
    #[serde(default)]
    pub session_storage: StorageMap,
    #[serde(default)]
    pub network_logs: Vec<NetworkLogEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
}

impl Snapshot {
    pub fn write_json_to_path(&self, path: &Path) -> io::Result<()> {
        json::write_json_to_path(self, path)
    }

    pub fn read_json_from_path(path: &Path) -> io::Result<Self> {
        json::read_json_from_path(path)
    }
}
