/// Popup operations: capture open tabs, import files

use serde::Deserialize;

use crate::error::Result;
use crate::extractor::{extract, is_web_url};
use crate::link_data::{LinkCandidate, Source, TabInfo};
use crate::storage::{KeyValueStore, LinkPool};
use crate::tabs::TabService;

/// A file picked in the import dialog, already read as text
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ImportFile {
    pub name: String,
    pub text: String,
}

/// Outcome of an import over one or more files
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportReport {
    pub added: usize,
    /// Names of files that were not valid JSON
    pub failed: Vec<String>,
}

/// Keep only tabs with a web URL (drops chrome://, about:, javascript: ...)
pub fn web_tabs(tabs: &[TabInfo]) -> Vec<LinkCandidate> {
    tabs.iter()
        .filter(|tab| is_web_url(&tab.url))
        .map(|tab| LinkCandidate::new(tab.url.clone(), tab.title.clone()))
        .collect()
}

/// Save every open web tab into the pool
///
/// Returns the number of tabs that were new to the pool; the `captured`
/// counter is bumped by the same amount.
pub async fn capture_open_tabs<S, T>(pool: &LinkPool<S>, tabs: &T) -> Result<usize>
where
    S: KeyValueStore,
    T: TabService,
{
    let open = tabs.query_tabs().await?;
    let candidates = web_tabs(&open);

    let added = pool.merge_insert(&candidates, Source::Captured).await?;
    pool.bump_counter(Source::Captured, added as u64).await?;

    log::info!("Captured {} of {} open tab(s)", added, open.len());
    Ok(added)
}

/// Parse files as JSON and pull links out of them
///
/// A file that is not valid JSON is logged and listed in `failed`; the
/// remaining files are still processed.
pub fn collect_links(files: &[ImportFile]) -> (Vec<LinkCandidate>, Vec<String>) {
    let mut links = Vec::new();
    let mut failed = Vec::new();

    for file in files {
        match serde_json::from_str::<serde_json::Value>(&file.text) {
            Ok(doc) => links.extend(extract(&doc)),
            Err(e) => {
                log::error!("Import failed for {}: {}", file.name, e);
                failed.push(file.name.clone());
            }
        }
    }

    (links, failed)
}

/// Import links from the given files into the pool
pub async fn import_files<S: KeyValueStore>(pool: &LinkPool<S>, files: &[ImportFile]) -> Result<ImportReport> {
    let (links, failed) = collect_links(files);

    let added = pool.merge_insert(&links, Source::Imported).await?;
    pool.bump_counter(Source::Imported, added as u64).await?;

    Ok(ImportReport { added, failed })
}

/// Status lines shown in the popup
pub mod messages {
    pub const NOTHING_SAVED: &str = "No saved items left — Import Tabs or Capture Tabs first.";
    pub const ALL_VISITED: &str = "No saved items left — nice!";

    pub fn captured(added: usize) -> String {
        format!("Captured {} new tab(s).", added)
    }

    pub fn imported(added: usize) -> String {
        format!("Imported {} new URL(s).", added)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::link_data::Counters;
    use crate::storage::memory::{fixed_clock, MemoryStore};
    use crate::storage::{PoolSnapshot, SAVED_TABS_KEY};
    use crate::tabs::scripted::ScriptedTabs;
    use pollster::block_on;

    fn file(name: &str, text: &str) -> ImportFile {
        ImportFile {
            name: name.to_string(),
            text: text.to_string(),
        }
    }

    #[test]
    fn test_web_tabs_filter() {
        let tabs = vec![
            TabInfo::new("https://a.test", "A"),
            TabInfo::new("chrome://newtab/", "New Tab"),
            TabInfo::new("", "Loading"),
            TabInfo::new("HTTP://b.test", ""),
        ];

        let kept = web_tabs(&tabs);

        assert_eq!(kept, vec![LinkCandidate::new("https://a.test", "A"), LinkCandidate::new("HTTP://b.test", "")]);
    }

    #[test]
    fn test_capture_end_to_end() {
        let store = MemoryStore::default();
        let pool = LinkPool::new(&store, fixed_clock);
        block_on(pool.load()).unwrap();
        let tabs = ScriptedTabs::with_tabs(vec![
            TabInfo::new("http://x.test", "X"),
            TabInfo::new("javascript:void(0)", "Y"),
        ]);

        let added = block_on(capture_open_tabs(&pool, &tabs)).unwrap();

        assert_eq!(added, 1);
        let snapshot = block_on(LinkPool::new(&store, fixed_clock).load()).unwrap();
        assert_eq!(snapshot.total(), 1);
        assert_eq!(snapshot.entries[0].url, "http://x.test");
        assert_eq!(snapshot.entries[0].title, "X");
        assert_eq!(snapshot.entries[0].source, Source::Captured);
        assert_eq!(snapshot.counts, Counters { imported: 0, captured: 1 });
        assert_eq!(pool.snapshot(), snapshot);
    }

    #[test]
    fn test_capture_twice_counts_only_new() {
        let store = MemoryStore::default();
        let pool = LinkPool::new(&store, fixed_clock);
        let tabs = ScriptedTabs::with_tabs(vec![TabInfo::new("https://a.test", ""), TabInfo::new("https://b.test", "")]);

        let first = block_on(capture_open_tabs(&pool, &tabs)).unwrap();
        let second = block_on(capture_open_tabs(&pool, &tabs)).unwrap();

        assert_eq!((first, second), (2, 0));
        assert_eq!(pool.snapshot().counts.captured, 2);
        assert_eq!(pool.snapshot().entries[0].title, "(untitled)");
    }

    #[test]
    fn test_collect_links_skips_bad_files() {
        let files = vec![
            file("good.json", r#"[{"url": "https://a.test", "title": "A"}]"#),
            file("broken.json", "{not json"),
            file("other.json", r#"{"href": "https://b.test"}"#),
        ];

        let (links, failed) = collect_links(&files);

        assert_eq!(links.len(), 2);
        assert_eq!(failed, vec!["broken.json".to_string()]);
    }

    #[test]
    fn test_import_files() {
        let store = MemoryStore::default();
        let pool = LinkPool::new(&store, fixed_clock);
        let files = vec![
            file("one.json", r#"{"items": [{"url": "https://a.test", "title": "A"}, {"url": "https://b.test"}]}"#),
            file("two.json", r#"[{"link": "https://b.test", "name": "B again"}, {"url": "https://c.test"}]"#),
            file("bad.json", ""),
        ];

        let report = block_on(import_files(&pool, &files)).unwrap();

        assert_eq!(report, ImportReport { added: 3, failed: vec!["bad.json".to_string()] });
        let stored = store.value(SAVED_TABS_KEY).unwrap();
        assert_eq!(stored[1]["title"], "(untitled)");
        assert_eq!(stored[2]["source"], "imported");
        assert_eq!(pool.snapshot().counts, Counters { imported: 3, captured: 0 });
    }

    #[test]
    fn test_counters_track_added_counts() {
        let store = MemoryStore::default();
        let pool = LinkPool::new(&store, fixed_clock);
        let tabs = ScriptedTabs::with_tabs(vec![TabInfo::new("https://a.test", "A")]);

        block_on(capture_open_tabs(&pool, &tabs)).unwrap();
        let report = block_on(import_files(&pool, &[file("f.json", r#"[{"url": "https://a.test"}, {"url": "https://z.test"}]"#)])).unwrap();
        let before = pool.snapshot().counts;
        block_on(pool.remove_by_url("https://a.test")).unwrap();

        assert_eq!(report.added, 1);
        assert_eq!(before, Counters { imported: 1, captured: 1 });
        // counters are history, not live pool size
        assert_eq!(pool.snapshot().counts, before);
        assert_eq!(pool.snapshot().total(), 1);
    }

    #[test]
    fn test_import_failed_persist_does_not_bump() {
        let store = MemoryStore::default();
        let pool = LinkPool::new(&store, fixed_clock);
        store.fail_writes.set(true);

        let result = block_on(import_files(&pool, &[file("f.json", r#"{"url": "https://a.test"}"#)]));

        assert!(result.is_err());
        store.fail_writes.set(false);
        assert_eq!(block_on(pool.load()).unwrap(), PoolSnapshot::default());
    }

    #[test]
    fn test_messages() {
        assert_eq!(messages::captured(2), "Captured 2 new tab(s).");
        assert_eq!(messages::imported(0), "Imported 0 new URL(s).");
    }
}
