//! Order-preserving grouping of translation entries.
//!
//! Groups come out in the order their key is first seen, and entries keep
//! their source order inside each group.
//!
//! ```text
//! en greeting  ┐        en: [greeting, farewell]
//! fr greeting  ├──▶     fr: [greeting, farewell]
//! en farewell  │
//! fr farewell  ┘
//! ```

use std::collections::HashMap;

use crate::models::TranslationEntry;

/// Entries sharing one grouping key.
#[derive(Debug, Clone, PartialEq)]
pub struct Group<V> {
    pub key: String,
    pub items: Vec<V>,
}

/// Group `items` by `key`, mapping each one with `map`.
///
/// Items whose key is `None` are left out.
pub fn group_by<T, V, K, M>(items: impl IntoIterator<Item = T>, key: K, map: M) -> Vec<Group<V>>
where
    K: Fn(&T) -> Option<String>,
    M: Fn(T) -> V,
{
    let mut groups: Vec<Group<V>> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for item in items {
        let Some(group_key) = key(&item) else {
            continue;
        };

        let slot = *index.entry(group_key.clone()).or_insert_with(|| {
            groups.push(Group {
                key: group_key,
                items: Vec::new(),
            });
            groups.len() - 1
        });
        groups[slot].items.push(map(item));
    }

    groups
}

/// One group per language, in first-seen (header) order.
pub fn by_language<V, M>(entries: Vec<TranslationEntry>, map: M) -> Vec<Group<V>>
where
    M: Fn(TranslationEntry) -> V,
{
    group_by(entries, |entry| Some(entry.language.clone()), map)
}
