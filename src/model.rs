use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Song {
    pub id: i64,
    pub mid: String,
    pub singer: String,
    pub name: String,
    pub album: String,
    /// Seconds.
    pub duration: u32,
    pub image: String,
    pub url: String,
}

impl PartialEq for Song {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Song {}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Singer {
    pub id: String,
    pub name: String,
    pub avatar: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Disc {
    pub dissid: String,
    pub dissname: String,
    pub imgurl: String,
    pub creator: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TopList {
    pub id: i64,
    pub top_title: String,
    pub pic_url: String,
}
