//! Character prefix tree used for autocomplete.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One node of the tree. A node carrying `word` terminates an inserted word;
/// it may still have children when that word prefixes a longer one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeNode {
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub children: BTreeMap<char, TreeNode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub word: Option<String>,
}

impl TreeNode {
    pub fn is_terminal(&self) -> bool {
        self.word.is_some()
    }

    /// Words at or below this node in lexicographic order, at most `limit`.
    pub fn words(&self, limit: usize) -> Vec<String> {
        let mut out = Vec::new();
        self.collect(limit, &mut out);
        out
    }

    fn collect(&self, limit: usize, out: &mut Vec<String>) {
        if out.len() >= limit {
            return;
        }
        if let Some(word) = &self.word {
            out.push(word.clone());
        }
        for child in self.children.values() {
            if out.len() >= limit {
                return;
            }
            child.collect(limit, out);
        }
    }

    fn count(&self) -> usize {
        usize::from(self.is_terminal()) + self.children.values().map(TreeNode::count).sum::<usize>()
    }
}

/// Prefix tree keyed by single characters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PrefixTree {
    root: TreeNode,
}

impl PrefixTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a word. Returns false for empty or already present words.
    pub fn insert(&mut self, word: &str) -> bool {
        if word.is_empty() {
            return false;
        }

        let mut node = &mut self.root;
        for c in word.chars() {
            node = node.children.entry(c).or_default();
        }
        if node.is_terminal() {
            return false;
        }
        node.word = Some(word.to_string());
        true
    }

    /// Node reached by walking `prefix`, if any word starts with it.
    pub fn subtree(&self, prefix: &str) -> Option<&TreeNode> {
        prefix
            .chars()
            .try_fold(&self.root, |node, c| node.children.get(&c))
    }

    pub fn contains(&self, word: &str) -> bool {
        self.subtree(word).is_some_and(TreeNode::is_terminal)
    }

    /// Up to `limit` words starting with `prefix`, lexicographically.
    pub fn words_with_prefix(&self, prefix: &str, limit: usize) -> Vec<String> {
        self.subtree(prefix)
            .map(|node| node.words(limit))
            .unwrap_or_default()
    }

    /// Number of distinct first characters.
    pub fn first_letter_count(&self) -> usize {
        self.root.children.len()
    }

    /// Number of words stored.
    pub fn len(&self) -> usize {
        self.root.count()
    }

    pub fn is_empty(&self) -> bool {
        self.root.children.is_empty()
    }

    pub fn root(&self) -> &TreeNode {
        &self.root
    }
}
