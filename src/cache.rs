//! Local persistence for search history, play history and favorites.
//!
//! Everything lives in one JSON object on disk, keyed the same way the web
//! client keys its local storage. Lists are most-recent-first and capped.

use std::{
    fs,
    path::PathBuf,
    sync::RwLock,
};

use serde::{Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::{config::CacheConfig, error::Result, model::Song};

const SEARCH_KEY: &str = "__search__";
const SEARCH_MAX_LEN: usize = 15;

const PLAY_KEY: &str = "__play__";
const PLAY_MAX_LEN: usize = 200;

const FAVORITE_KEY: &str = "__favorite__";
const FAVORITE_MAX_LEN: usize = 200;

pub struct Cache {
    path: PathBuf,
    entries: RwLock<Map<String, Value>>,
}

impl Cache {
    /// Opens the cache file. A missing or unreadable file is an empty cache.
    pub fn open(config: &CacheConfig) -> Result<Self> {
        let entries = if config.path.exists() {
            let content = fs::read_to_string(&config.path)?;
            parse_entries(&content).unwrap_or_else(|err| {
                warn!(
                    path = %config.path.display(),
                    %err,
                    "ignoring unreadable cache file"
                );
                Map::new()
            })
        } else {
            Map::new()
        };
        debug!(
            path = %config.path.display(),
            keys = entries.len(),
            "cache opened"
        );

        Ok(Self {
            path: config.path.clone(),
            entries: RwLock::new(entries),
        })
    }

    pub fn load_search(&self) -> Vec<String> {
        self.load(SEARCH_KEY)
    }

    pub fn save_search(&self, query: &str) -> Result<Vec<String>> {
        self.update(SEARCH_KEY, |list: &mut Vec<String>| {
            insert_front(list, query.to_string(), |q| q == query, SEARCH_MAX_LEN)
        })
    }

    pub fn delete_search(&self, query: &str) -> Result<Vec<String>> {
        self.update(SEARCH_KEY, |list: &mut Vec<String>| {
            list.retain(|q| q != query)
        })
    }

    pub fn clear_search(&self) -> Result<Vec<String>> {
        self.update(SEARCH_KEY, |list: &mut Vec<String>| list.clear())
    }

    pub fn load_play(&self) -> Vec<Song> {
        self.load(PLAY_KEY)
    }

    pub fn save_play(&self, song: &Song) -> Result<Vec<Song>> {
        self.update(PLAY_KEY, |list: &mut Vec<Song>| {
            insert_front(list, song.clone(), |s| s == song, PLAY_MAX_LEN)
        })
    }

    pub fn load_favorite(&self) -> Vec<Song> {
        self.load(FAVORITE_KEY)
    }

    pub fn save_favorite(&self, song: &Song) -> Result<Vec<Song>> {
        self.update(FAVORITE_KEY, |list: &mut Vec<Song>| {
            insert_front(list, song.clone(), |s| s == song, FAVORITE_MAX_LEN)
        })
    }

    pub fn delete_favorite(&self, song: &Song) -> Result<Vec<Song>> {
        self.update(FAVORITE_KEY, |list: &mut Vec<Song>| {
            list.retain(|s| s != song)
        })
    }

    fn load<T: DeserializeOwned>(&self, key: &str) -> Vec<T> {
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        decode_list(&entries, key)
    }

    /// Load, modify and flush under one write guard. The in-memory map only
    /// changes once the file write succeeds.
    fn update<T, F>(&self, key: &str, f: F) -> Result<Vec<T>>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce(&mut Vec<T>),
    {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        let mut list = decode_list::<T>(&entries, key);
        f(&mut list);

        let mut next = entries.clone();
        next.insert(key.to_string(), serde_json::to_value(&list)?);
        self.flush(&next)?;
        *entries = next;
        Ok(list)
    }

    fn flush(&self, entries: &Map<String, Value>) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_string(entries)?)?;
        Ok(())
    }
}

fn parse_entries(content: &str) -> serde_json::Result<Map<String, Value>> {
    if content.trim().is_empty() {
        return Ok(Map::new());
    }
    serde_json::from_str(content)
}

fn decode_list<T: DeserializeOwned>(
    entries: &Map<String, Value>,
    key: &str,
) -> Vec<T> {
    match entries.get(key) {
        Some(value) => serde_json::from_value(value.clone()).unwrap_or_else(|err| {
            warn!(key, %err, "ignoring unreadable cache entry");
            Vec::new()
        }),
        None => Vec::new(),
    }
}

fn insert_front<T>(
    list: &mut Vec<T>,
    value: T,
    matches: impl Fn(&T) -> bool,
    max_len: usize,
) {
    if let Some(index) = list.iter().position(matches) {
        if index == 0 {
            return;
        }
        list.remove(index);
    }
    list.insert(0, value);
    list.truncate(max_len);
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn song(id: i64) -> Song {
        Song {
            id,
            name: format!("song {id}"),
            ..Song::default()
        }
    }

    fn open(dir: &TempDir) -> Cache {
        Cache::open(&CacheConfig {
            path: dir.path().join("nested").join("cache.json"),
        })
        .unwrap()
    }

    #[test]
    fn missing_file_loads_empty() {
        let dir = TempDir::new().unwrap();
        let cache = open(&dir);
        assert!(cache.load_search().is_empty());
        assert!(cache.load_play().is_empty());
        assert!(cache.load_favorite().is_empty());
    }

    #[test]
    fn search_history_is_most_recent_first_without_duplicates() {
        let dir = TempDir::new().unwrap();
        let cache = open(&dir);
        cache.save_search("a").unwrap();
        cache.save_search("b").unwrap();
        let list = cache.save_search("a").unwrap();
        assert_eq!(list, vec!["a", "b"]);

        let list = cache.delete_search("b").unwrap();
        assert_eq!(list, vec!["a"]);
        assert!(cache.clear_search().unwrap().is_empty());
    }

    #[test]
    fn search_history_is_capped() {
        let dir = TempDir::new().unwrap();
        let cache = open(&dir);
        for i in 0..20 {
            cache.save_search(&format!("q{i}")).unwrap();
        }
        let list = cache.load_search();
        assert_eq!(list.len(), SEARCH_MAX_LEN);
        assert_eq!(list[0], "q19");
    }

    #[test]
    fn writes_survive_reopen() {
        let dir = TempDir::new().unwrap();
        {
            let cache = open(&dir);
            cache.save_play(&song(1)).unwrap();
            cache.save_play(&song(2)).unwrap();
            cache.save_favorite(&song(7)).unwrap();
        }

        let cache = open(&dir);
        let ids: Vec<i64> = cache.load_play().iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![2, 1]);
        assert_eq!(cache.load_favorite(), vec![song(7)]);

        assert!(cache.delete_favorite(&song(7)).unwrap().is_empty());
    }

    #[test]
    fn unreadable_entry_loads_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cache.json");
        let content = r#"{"__play__": "not a list", "__search__": ["x"]}"#;
        fs::write(&path, content).unwrap();

        let cache = Cache::open(&CacheConfig { path }).unwrap();
        assert!(cache.load_play().is_empty());
        assert_eq!(cache.load_search(), vec!["x"]);
    }

    #[test]
    fn corrupt_file_opens_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cache.json");
        fs::write(&path, "[1, 2, 3").unwrap();

        let cache = Cache::open(&CacheConfig { path }).unwrap();
        assert!(cache.load_search().is_empty());
        assert_eq!(cache.save_search("after").unwrap(), vec!["after"]);
    }

    #[test]
    fn failed_write_keeps_previous_lists() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cache.json");
        let cache = Cache::open(&CacheConfig { path: path.clone() }).unwrap();
        cache.save_search("kept").unwrap();

        fs::remove_file(&path).unwrap();
        fs::create_dir(&path).unwrap();

        assert!(cache.save_search("lost").is_err());
        assert_eq!(cache.load_search(), vec!["kept"]);
    }

    #[test]
    fn concurrent_saves_are_not_lost() {
        let dir = TempDir::new().unwrap();
        let cache = std::sync::Arc::new(open(&dir));

        let handles: Vec<_> = (0..8)
            .map(|worker| {
                let cache = cache.clone();
                std::thread::spawn(move || {
                    for i in 0..20 {
                        cache.save_play(&song(worker * 100 + i)).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(cache.load_play().len(), 160);
        assert_eq!(open(&dir).load_play().len(), 160);
    }
}
