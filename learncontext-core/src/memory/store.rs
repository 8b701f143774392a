use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};

use super::bounded;
use super::{
    MemoryUpdate, UserMemory, MAX_COMMON_MISTAKES, MAX_LEARNING_GOALS, MAX_RECENT_TOPICS,
    MAX_STRONG_TOPICS, MAX_WEAK_TOPICS,
};
use crate::persistence::KeyValueStore;

enum Stored {
    Found(UserMemory),
    /// Absent or unparseable; safe to replace with a default.
    Missing,
    /// The backend failed to read. The stored copy must not be overwritten.
    Unreadable,
}

/// Owns learner records. Every call re-reads the backend, so several handles
/// over one backend never clobber each other with stale copies.
#[derive(Clone)]
pub struct MemoryStore {
    backend: Arc<dyn KeyValueStore>,
}

impl MemoryStore {
    pub fn new(backend: Arc<dyn KeyValueStore>) -> Self {
        Self { backend }
    }

    pub fn storage_key(user_id: &str) -> String {
        format!("memory_{user_id}")
    }

    /// Returns the learner's record, creating and persisting defaults on
    /// first access. When the backend cannot be read, an unsaved default is
    /// returned and the stored record is left alone.
    pub fn get(&self, user_id: &str) -> UserMemory {
        self.current(user_id).0
    }

    pub fn update(&self, user_id: &str, update: MemoryUpdate) -> UserMemory {
        let (mut memory, writable) = self.current(user_id);
        update.apply_to(&mut memory, Utc::now());
        self.persist_if(writable, &memory);
        memory
    }

    pub fn reset(&self, user_id: &str) -> UserMemory {
        info!(user_id, "Resetting learner memory");
        let memory = UserMemory::new(user_id, Utc::now());
        self.persist(&memory);
        memory
    }

    pub fn add_weak_topic(&self, user_id: &str, topic: &str) -> UserMemory {
        self.modify(user_id, topic, |memory, topic| {
            let weak = bounded::append_evicting(&memory.weak_topics, topic, MAX_WEAK_TOPICS);
            let strong = bounded::without(&memory.strong_topics, topic);
            if weak.is_none() && strong.is_none() {
                return None;
            }
            Some(MemoryUpdate {
                weak_topics: weak,
                strong_topics: strong,
                ..Default::default()
            })
        })
    }

    pub fn remove_weak_topic(&self, user_id: &str, topic: &str) -> UserMemory {
        self.modify(user_id, topic, |memory, topic| {
            bounded::without(&memory.weak_topics, topic).map(|weak| MemoryUpdate {
                weak_topics: Some(weak),
                ..Default::default()
            })
        })
    }

    /// Adds to strong topics and strips the topic from weak ones in a single
    /// write.
    pub fn add_strong_topic(&self, user_id: &str, topic: &str) -> UserMemory {
        self.modify(user_id, topic, |memory, topic| {
            let strong =
                bounded::append_evicting(&memory.strong_topics, topic, MAX_STRONG_TOPICS);
            let weak = bounded::without(&memory.weak_topics, topic);
            if strong.is_none() && weak.is_none() {
                return None;
            }
            Some(MemoryUpdate {
                strong_topics: strong,
                weak_topics: weak,
                ..Default::default()
            })
        })
    }

    /// No-op once five goals are recorded.
    pub fn add_learning_goal(&self, user_id: &str, goal: &str) -> UserMemory {
        self.modify(user_id, goal, |memory, goal| {
            bounded::append_rejecting(&memory.learning_goals, goal, MAX_LEARNING_GOALS).map(
                |goals| MemoryUpdate {
                    learning_goals: Some(goals),
                    ..Default::default()
                },
            )
        })
    }

    pub fn remove_learning_goal(&self, user_id: &str, goal: &str) -> UserMemory {
        self.modify(user_id, goal, |memory, goal| {
            bounded::without(&memory.learning_goals, goal).map(|goals| MemoryUpdate {
                learning_goals: Some(goals),
                ..Default::default()
            })
        })
    }

    pub fn add_recent_topic(&self, user_id: &str, topic: &str) -> UserMemory {
        self.modify(user_id, topic, |memory, topic| {
            bounded::push_front(&memory.recent_topics, topic, MAX_RECENT_TOPICS).map(|recent| {
                MemoryUpdate {
                    recent_topics: Some(recent),
                    ..Default::default()
                }
            })
        })
    }

    pub fn add_common_mistake(&self, user_id: &str, mistake: &str) -> UserMemory {
        self.modify(user_id, mistake, |memory, mistake| {
            bounded::append_evicting(&memory.common_mistakes, mistake, MAX_COMMON_MISTAKES).map(
                |mistakes| MemoryUpdate {
                    common_mistakes: Some(mistakes),
                    ..Default::default()
                },
            )
        })
    }

    pub fn increment_session(&self, user_id: &str) -> UserMemory {
        let memory = self.get(user_id);
        let sessions = memory.total_sessions.saturating_add(1);
        info!(user_id, sessions, "Starting learner session");
        self.update(
            user_id,
            MemoryUpdate {
                total_sessions: Some(sessions),
                last_session_date: Some(Utc::now()),
                ..Default::default()
            },
        )
    }

    /// Runs a list mutation. Blank input and mutations that change nothing
    /// return the current record without writing.
    fn modify<F>(&self, user_id: &str, value: &str, change: F) -> UserMemory
    where
        F: FnOnce(&UserMemory, &str) -> Option<MemoryUpdate>,
    {
        let (memory, writable) = self.current(user_id);
        let value = value.trim();
        if value.is_empty() {
            debug!(user_id, "Ignoring blank memory entry");
            return memory;
        }

        let Some(update) = change(&memory, value) else {
            debug!(user_id, value, "Memory mutation made no change");
            return memory;
        };

        let mut memory = memory;
        update.apply_to(&mut memory, Utc::now());
        self.persist_if(writable, &memory);
        memory
    }

    /// The record to work on, and whether it may be written back.
    fn current(&self, user_id: &str) -> (UserMemory, bool) {
        match self.load(user_id) {
            Stored::Found(memory) => (memory, true),
            Stored::Missing => {
                info!(user_id, "Creating default learner memory");
                let memory = UserMemory::new(user_id, Utc::now());
                self.persist(&memory);
                (memory, true)
            }
            Stored::Unreadable => (UserMemory::new(user_id, Utc::now()), false),
        }
    }

    fn load(&self, user_id: &str) -> Stored {
        let key = Self::storage_key(user_id);
        let content = match self.backend.load(&key) {
            Ok(Some(content)) => content,
            Ok(None) => return Stored::Missing,
            Err(e) => {
                warn!(user_id, "Failed to load learner memory: {e:?}");
                return Stored::Unreadable;
            }
        };

        match serde_json::from_str(&content) {
            Ok(memory) => Stored::Found(memory),
            Err(e) => {
                warn!(user_id, "Discarding unparseable learner memory: {e}");
                Stored::Missing
            }
        }
    }

    fn persist_if(&self, writable: bool, memory: &UserMemory) {
        if writable {
            self.persist(memory);
        } else {
            warn!(user_id = %memory.user_id, "Not saving learner memory over an unreadable record");
        }
    }

    fn persist(&self, memory: &UserMemory) {
        let key = Self::storage_key(&memory.user_id);
        let json = match serde_json::to_string_pretty(memory) {
            Ok(json) => json,
            Err(e) => {
                warn!(user_id = %memory.user_id, "Failed to serialize learner memory: {e}");
                return;
            }
        };
        if let Err(e) = self.backend.save(&key, &json) {
            warn!(user_id = %memory.user_id, "Failed to persist learner memory: {e:?}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{ExplanationStyle, SkillLevel, TonePreference, TimeAvailability};
    use crate::persistence::{InMemoryStore, JsonFileStore};
    use tempfile::TempDir;

    fn store() -> MemoryStore {
        MemoryStore::new(Arc::new(InMemoryStore::new()))
    }

    #[test]
    fn test_get_creates_and_persists_default() {
        let backend = Arc::new(InMemoryStore::new());
        let store = MemoryStore::new(backend.clone());

        let first = store.get("alice");
        let second = store.get("alice");
        assert_eq!(first.id, second.id);
        assert!(backend.load("memory_alice").unwrap().is_some());
    }

    #[test]
    fn test_update_merges_and_stamps() {
        let store = store();
        let before = store.get("alice");

        let after = store.update(
            "alice",
            MemoryUpdate {
                skill_level: Some(SkillLevel::Intermediate),
                ..Default::default()
            },
        );

        assert_eq!(after.id, before.id);
        assert_eq!(after.skill_level, SkillLevel::Intermediate);
        assert_eq!(after.explanation_style, ExplanationStyle::StepByStep);
        assert!(after.updated_at >= before.updated_at);
        assert_eq!(store.get("alice"), after);
    }

    #[test]
    fn test_weak_topics_capped_and_deduplicated() {
        let store = store();
        for i in 0..15 {
            store.add_weak_topic("alice", &format!("topic {i}"));
            store.add_weak_topic("alice", &format!("topic {i}"));
        }
        let memory = store.get("alice");
        assert_eq!(memory.weak_topics.len(), 10);
        assert_eq!(memory.weak_topics.first().unwrap(), "topic 5");
        assert_eq!(memory.weak_topics.last().unwrap(), "topic 14");
    }

    #[test]
    fn test_strong_topic_promotion() {
        let store = store();
        store.add_weak_topic("alice", "limits");
        store.add_weak_topic("alice", "series");

        let memory = store.add_strong_topic("alice", "limits");
        assert_eq!(memory.strong_topics, vec!["limits"]);
        assert_eq!(memory.weak_topics, vec!["series"]);

        let memory = store.add_weak_topic("alice", "limits");
        assert_eq!(memory.weak_topics, vec!["series", "limits"]);
        assert!(memory.strong_topics.is_empty());
    }

    #[test]
    fn test_goal_cap_rejects_sixth() {
        let store = store();
        for i in 1..=6 {
            store.add_learning_goal("alice", &format!("goal {i}"));
        }
        let memory = store.get("alice");
        assert_eq!(memory.learning_goals.len(), 5);
        assert!(!memory.learning_goals.contains(&"goal 6".to_string()));
    }

    #[test]
    fn test_recent_topics_move_to_front() {
        let store = store();
        store.add_recent_topic("alice", "b");
        store.add_recent_topic("alice", "a");
        let memory = store.add_recent_topic("alice", "b");
        assert_eq!(memory.recent_topics, vec!["b", "a"]);
    }

    #[test]
    fn test_blank_and_absent_are_noops() {
        let store = store();
        let before = store.get("alice");

        let after = store.add_weak_topic("alice", "   ");
        assert_eq!(after, before);

        let after = store.remove_learning_goal("alice", "never added");
        assert_eq!(after.updated_at, before.updated_at);
    }

    #[test]
    fn test_topics_are_trimmed() {
        let store = store();
        store.add_common_mistake("alice", "  sign errors ");
        let memory = store.add_common_mistake("alice", "sign errors");
        assert_eq!(memory.common_mistakes, vec!["sign errors"]);
    }

    #[test]
    fn test_increment_session() {
        let store = store();
        let memory = store.increment_session("alice");
        assert_eq!(memory.total_sessions, 1);
        assert!(memory.last_session_date.is_some());
        assert_eq!(store.increment_session("alice").total_sessions, 2);
    }

    #[test]
    fn test_reset_restores_defaults() {
        let store = store();
        let before = store.add_weak_topic("alice", "limits");
        store.update(
            "alice",
            MemoryUpdate {
                tone_preference: Some(TonePreference::Formal),
                time_availability: Some(TimeAvailability::Limited),
                ..Default::default()
            },
        );

        let after = store.reset("alice");
        assert_ne!(after.id, before.id);
        assert!(after.weak_topics.is_empty());
        assert_eq!(after.tone_preference, TonePreference::Encouraging);
        assert_eq!(after.time_availability, TimeAvailability::Moderate);
        assert_eq!(store.get("alice").id, after.id);
    }

    #[test]
    fn test_corrupt_record_replaced_with_default() {
        let backend = Arc::new(InMemoryStore::new());
        backend.save("memory_alice", "not json").unwrap();
        let store = MemoryStore::new(backend);

        let memory = store.get("alice");
        assert_eq!(memory.user_id, "alice");
        assert_eq!(memory.total_sessions, 0);
    }

    /// Reads always fail; counts attempted writes.
    #[derive(Default)]
    struct UnreadableBackend {
        saves: std::sync::Mutex<usize>,
    }

    impl KeyValueStore for UnreadableBackend {
        fn load(&self, _key: &str) -> anyhow::Result<Option<String>> {
            anyhow::bail!("disk unavailable")
        }

        fn save(&self, _key: &str, _value: &str) -> anyhow::Result<()> {
            *self.saves.lock().unwrap() += 1;
            Ok(())
        }
    }

    #[test]
    fn test_read_failure_never_overwrites_stored_record() {
        let backend = Arc::new(UnreadableBackend::default());
        let store = MemoryStore::new(backend.clone());

        let memory = store.get("alice");
        assert_eq!(memory.user_id, "alice");
        let memory = store.add_weak_topic("alice", "limits");
        assert_eq!(memory.weak_topics, vec!["limits"]);
        store.increment_session("alice");

        assert_eq!(*backend.saves.lock().unwrap(), 0);
    }

    #[test]
    fn test_file_backed_handles_share_state() {
        let temp_dir = TempDir::new().unwrap();
        let first = MemoryStore::new(Arc::new(JsonFileStore::new(temp_dir.path())));
        let second = MemoryStore::new(Arc::new(JsonFileStore::new(temp_dir.path())));

        first.add_weak_topic("alice", "limits");
        second.add_weak_topic("alice", "series");

        assert_eq!(first.get("alice").weak_topics, vec!["limits", "series"]);
    }
}
