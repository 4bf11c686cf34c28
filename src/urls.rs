//! Named URL groups opened together, persisted to urls.json

use anyhow::{Context, Result, anyhow, bail};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{error, info};

use crate::persistence;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlGroup {
    pub name: String,
    #[serde(default)]
    pub urls: Vec<String>,
}

/// Something that can hand a URL to a browser
pub trait UrlOpener {
    fn open(&mut self, url: &str) -> Result<()>;
}

/// Opens URLs with the desktop's default handler
pub struct SystemOpener;

impl UrlOpener for SystemOpener {
    fn open(&mut self, url: &str) -> Result<()> {
        open::that_detached(url).with_context(|| format!("Failed to open URL: {url}"))
    }
}

/// A URL that could not be opened
#[derive(Debug)]
pub struct OpenFailure {
    pub url: String,
    pub error: anyhow::Error,
}

/// Split a multi-line text box into URLs, one per non-blank line
pub fn parse_url_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Bare hosts get an http:// scheme so the system opener treats them as web links
pub fn normalize_url(url: &str) -> String {
    let url = url.trim();
    if url.starts_with("http://") || url.starts_with("https://") {
        url.to_string()
    } else {
        format!("http://{url}")
    }
}

pub struct UrlStore {
    path: PathBuf,
    groups: Vec<UrlGroup>,
}

impl UrlStore {
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let groups: Vec<UrlGroup> = persistence::load_or_default(&path);
        info!(count = groups.len(), "Loaded URL groups");
        Self { path, groups }
    }

    pub fn groups(&self) -> &[UrlGroup] {
        &self.groups
    }

    pub fn get(&self, index: usize) -> Option<&UrlGroup> {
        self.groups.get(index)
    }

    pub fn save(&self) -> Result<()> {
        persistence::save_json(&self.path, &self.groups).context("Failed to save URL groups")
    }

    pub fn add(&mut self, name: &str, urls: Vec<String>) -> Result<()> {
        let group = Self::validated(name, urls)?;
        info!(name = %group.name, urls = group.urls.len(), "Adding URL group");
        self.groups.push(group);
        self.save()
    }

    pub fn edit(&mut self, index: usize, name: &str, urls: Vec<String>) -> Result<()> {
        let group = Self::validated(name, urls)?;
        let slot = self
            .groups
            .get_mut(index)
            .ok_or_else(|| anyhow!("Invalid group number."))?;
        info!(index, name = %group.name, "Editing URL group");
        *slot = group;
        self.save()
    }

    pub fn delete(&mut self, index: usize) -> Result<UrlGroup> {
        if index >= self.groups.len() {
            bail!("Invalid group number.");
        }
        let removed = self.groups.remove(index);
        info!(name = %removed.name, "Deleted URL group");
        self.save()?;
        Ok(removed)
    }

    /// Open every URL of a group in order
    ///
    /// One bad URL does not stop the rest; failures are returned.
    pub fn open_group(&self, index: usize, opener: &mut dyn UrlOpener) -> Result<Vec<OpenFailure>> {
        let group = self
            .groups
            .get(index)
            .ok_or_else(|| anyhow!("Invalid group number."))?;
        info!(name = %group.name, "Opening URL group");

        let mut failures = Vec::new();
        for url in &group.urls {
            let url = normalize_url(url);
            if let Err(e) = opener.open(&url) {
                error!(url = %url, error = %e, "Failed to open URL");
                failures.push(OpenFailure { url, error: e });
            }
        }
        Ok(failures)
    }

    fn validated(name: &str, urls: Vec<String>) -> Result<UrlGroup> {
        let name = name.trim();
        if name.is_empty() {
            bail!("Please enter a group name.");
        }
        let urls: Vec<String> = urls
            .into_iter()
            .map(|u| u.trim().to_string())
            .filter(|u| !u.is_empty())
            .collect();
        if urls.is_empty() {
            bail!("Please enter at least one URL.");
        }
        Ok(UrlGroup {
            name: name.to_string(),
            urls,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[derive(Default)]
    struct RecordingOpener {
        opened: Vec<String>,
        fail_on: Option<String>,
    }

    impl UrlOpener for RecordingOpener {
        fn open(&mut self, url: &str) -> Result<()> {
            if self.fail_on.as_deref() == Some(url) {
                bail!("no browser");
            }
            self.opened.push(url.to_string());
            Ok(())
        }
    }

    fn store() -> (TempDir, UrlStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = UrlStore::load(dir.path().join("urls.json"));
        (dir, store)
    }

    #[test]
    fn test_parse_url_lines() {
        let urls = parse_url_lines("https://a.example\n\n   b.example  \n\t\n");
        assert_eq!(urls, vec!["https://a.example", "b.example"]);
    }

    #[test]
    fn test_normalize_url() {
        assert_eq!(normalize_url("example.com"), "http://example.com");
        assert_eq!(normalize_url("https://example.com"), "https://example.com");
        assert_eq!(normalize_url(" http://example.com "), "http://example.com");
    }

    #[test]
    fn test_add_validates_and_persists() {
        let (dir, mut store) = store();
        assert!(store.add("  ", vec!["a.example".into()]).is_err());
        assert!(store.add("Work", vec!["   ".into()]).is_err());

        store.add(" Work ", vec!["mail.example".into(), "".into(), "chat.example".into()]).unwrap();

        let reloaded = UrlStore::load(dir.path().join("urls.json"));
        assert_eq!(
            reloaded.groups(),
            &[UrlGroup {
                name: "Work".into(),
                urls: vec!["mail.example".into(), "chat.example".into()],
            }]
        );
    }

    #[test]
    fn test_duplicate_names_allowed() {
        let (_dir, mut store) = store();
        store.add("News", vec!["a.example".into()]).unwrap();
        store.add("News", vec!["a.example".into()]).unwrap();
        assert_eq!(store.groups().len(), 2);
    }

    #[test]
    fn test_edit_and_delete() {
        let (dir, mut store) = store();
        store.add("One", vec!["1.example".into()]).unwrap();
        store.add("Two", vec!["2.example".into()]).unwrap();

        store.edit(1, "Second", vec!["2.example".into(), "3.example".into()]).unwrap();
        assert_eq!(store.get(1).unwrap().name, "Second");
        assert!(store.edit(5, "x", vec!["y".into()]).is_err());

        let removed = store.delete(0).unwrap();
        assert_eq!(removed.name, "One");
        assert!(store.delete(3).is_err());
        assert_eq!(UrlStore::load(dir.path().join("urls.json")).groups().len(), 1);
    }

    #[test]
    fn test_open_group_in_order_and_continues_past_failures() {
        let (_dir, mut store) = store();
        store
            .add("Morning", vec!["a.example".into(), "https://b.example".into(), "c.example".into()])
            .unwrap();

        let mut opener = RecordingOpener {
            fail_on: Some("https://b.example".into()),
            ..Default::default()
        };
        let failures = store.open_group(0, &mut opener).unwrap();

        assert_eq!(opener.opened, vec!["http://a.example", "http://c.example"]);
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].url, "https://b.example");
        assert!(store.open_group(9, &mut opener).is_err());
    }
}
