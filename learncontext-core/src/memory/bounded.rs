//! Bounded, deduplicated topic lists.
//!
//! Every helper returns `None` when the operation would not change the list,
//! so callers can skip the write entirely.

/// What happens when a list is already at its cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Eviction {
    /// Stored oldest first; the oldest entries are dropped.
    Oldest,
    /// Stored oldest first; new entries are refused.
    RejectNew,
    /// Stored newest first; entries past the cap fall off the end.
    MostRecentFirst,
}

/// Trims entries, drops empties and duplicates, then applies the cap.
pub fn normalize(items: Vec<String>, cap: usize, eviction: Eviction) -> Vec<String> {
    let mut unique: Vec<String> = Vec::with_capacity(items.len());
    for item in items {
        let item = item.trim();
        if item.is_empty() || unique.iter().any(|existing| existing == item) {
            continue;
        }
        unique.push(item.to_string());
    }

    if unique.len() > cap {
        match eviction {
            Eviction::Oldest => {
                unique.drain(..unique.len() - cap);
            }
            Eviction::RejectNew | Eviction::MostRecentFirst => unique.truncate(cap),
        }
    }
    unique
}

/// Appends `item`, evicting the oldest entries past `cap`.
pub fn append_evicting(list: &[String], item: &str, cap: usize) -> Option<Vec<String>> {
    if list.iter().any(|existing| existing == item) {
        return None;
    }
    let mut next = list.to_vec();
    next.push(item.to_string());
    Some(normalize(next, cap, Eviction::Oldest))
}

/// Appends `item` unless it is already present or the list is full.
pub fn append_rejecting(list: &[String], item: &str, cap: usize) -> Option<Vec<String>> {
    if list.len() >= cap || list.iter().any(|existing| existing == item) {
        return None;
    }
    let mut next = list.to_vec();
    next.push(item.to_string());
    Some(next)
}

/// Moves `item` to the front, inserting it if absent.
pub fn push_front(list: &[String], item: &str, cap: usize) -> Option<Vec<String>> {
    if list.first().is_some_and(|first| first == item) {
        return None;
    }
    let mut next = Vec::with_capacity(list.len() + 1);
    next.push(item.to_string());
    next.extend(list.iter().filter(|existing| *existing != item).cloned());
    Some(normalize(next, cap, Eviction::MostRecentFirst))
}

/// Removes `item`; `None` when it was not present.
pub fn without(list: &[String], item: &str) -> Option<Vec<String>> {
    if !list.iter().any(|existing| existing == item) {
        return None;
    }
    Some(
        list.iter()
            .filter(|existing| *existing != item)
            .cloned()
            .collect(),
    )
}
