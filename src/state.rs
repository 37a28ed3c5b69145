use std::sync::Arc;

use serde::Serialize;
use tokio::sync::RwLock;

use crate::{
    cache::Cache,
    config::PlayMode,
    model::{Disc, Singer, Song, TopList},
};

/// Playback and browsing state shared by every consumer for the whole session.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PlayerState {
    pub singer: Singer,
    pub playing: bool,
    pub full_screen: bool,
    pub playlist: Vec<Song>,
    pub sequence_list: Vec<Song>,
    pub mode: PlayMode,
    /// Index into `playlist`; `None` until something is selected.
    pub current_index: Option<usize>,
    pub disc: Disc,
    pub top_list: TopList,
    pub search_history: Vec<String>,
    pub play_history: Vec<Song>,
    pub favorite_list: Vec<Song>,
}

impl PlayerState {
    pub fn load(cache: &Cache) -> Self {
        Self {
            search_history: cache.load_search(),
            play_history: cache.load_play(),
            favorite_list: cache.load_favorite(),
            ..Self::default()
        }
    }

    pub fn current_song(&self) -> Option<&Song> {
        self.current_index.and_then(|i| self.playlist.get(i))
    }
}

pub type Store = Arc<RwLock<PlayerState>>;

pub fn new_store(state: PlayerState) -> Store {
    Arc::new(RwLock::new(state))
}
