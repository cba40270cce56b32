use std::collections::BTreeSet;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::config::Config;

/// Which resolved-issue notifications a user has already seen. One file per
/// username beside the config file; best-effort persistence, a lost file
/// just means notifications show as unread again.
#[derive(Serialize, Deserialize, Default)]
pub struct ReadState {
    read: BTreeSet<u64>,
}

impl ReadState {
    pub fn load(username: &str) -> Self {
        let path = match Self::path(username) {
            Some(p) => p,
            None => return Self::default(),
        };

        let contents = match std::fs::read_to_string(&path) {
            Ok(c) => c,
            Err(_) => return Self::default(),
        };

        serde_json::from_str(&contents).unwrap_or_default()
    }

    pub fn save(&self, username: &str) {
        let path = match Self::path(username) {
            Some(p) => p,
            None => return,
        };

        if let Some(parent) = path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }

        let contents = match serde_json::to_string_pretty(self) {
            Ok(c) => c,
            Err(_) => return,
        };

        let _ = std::fs::write(path, contents);
    }

    fn path(username: &str) -> Option<PathBuf> {
        // Usernames come from the server; keep the filename safe anyway.
        let safe: String = username
            .chars()
            .map(|c| if c.is_alphanumeric() { c } else { '_' })
            .collect();

        Config::config_path()
            .ok()
            .map(|p| p.with_file_name(format!("read_state_{safe}.json")))
    }

    pub fn is_read(&self, id: u64) -> bool {
        self.read.contains(&id)
    }

    pub fn mark_read(&mut self, id: u64) {
        self.read.insert(id);
    }
}
