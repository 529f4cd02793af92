use serde::{Deserialize, Serialize};

/// Insertion-ordered set of names.
///
/// Membership lists are small (bounded by a per-entity capacity), so a plain
/// vector with a linear membership check keeps both order and uniqueness.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NameSet(Vec<String>);

impl NameSet {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|n| n == name)
    }

    /// Returns `false` and leaves the set untouched if `name` is already present.
    pub fn insert(&mut self, name: impl Into<String>) -> bool {
        let name = name.into();

        if self.contains(&name) {
            return false;
        }

        self.0.push(name);
        true
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.0.clone()
    }
}
