//! Suffix minimization over reversed domains.
//!
//! Domains are inserted character by character from the end, so a path from
//! the root spells a domain read right to left. A terminal node marks the end
//! of an inserted domain; every inserted domain below it whose next character
//! is `.` is a subdomain of it and needs no rule of its own.
//!
//! ## Example
//!
//! ```
//! use proxy_rules::trie::minimize_suffixes;
//!
//! let suffixes = minimize_suffixes(["example.com", "mail.example.com", "example.org"]);
//! assert_eq!(suffixes, vec!["example.com", "example.org"]);
//! ```

use std::collections::HashMap;

/// Index of a node inside the trie arena
type NodeId = usize;

const ROOT: NodeId = 0;

#[derive(Debug, Clone, Default)]
struct Node {
    children: HashMap<char, NodeId>,
    terminal: bool,
}

/// Prefix tree over reversed domain strings, stored as an arena
#[derive(Debug, Clone)]
pub struct SuffixTrie {
    nodes: Vec<Node>,
    len: usize,
}

impl SuffixTrie {
    /// Create an empty trie
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::default()],
            len: 0,
        }
    }

    /// Insert a domain. Inserting the same domain twice is a no-op.
    pub fn insert(&mut self, domain: &str) {
        let mut node = ROOT;
        for ch in domain.chars().rev() {
            node = match self.nodes[node].children.get(&ch) {
                Some(&child) => child,
                None => {
                    let child = self.nodes.len();
                    self.nodes.push(Node::default());
                    self.nodes[node].children.insert(ch, child);
                    child
                }
            };
        }
        if !self.nodes[node].terminal {
            self.nodes[node].terminal = true;
            self.len += 1;
        }
    }

    /// Check if exactly this domain was inserted
    pub fn contains(&self, domain: &str) -> bool {
        let mut node = ROOT;
        for ch in domain.chars().rev() {
            match self.nodes[node].children.get(&ch) {
                Some(&child) => node = child,
                None => return false,
            }
        }
        self.nodes[node].terminal
    }

    /// Number of distinct inserted domains
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if nothing was inserted
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of allocated nodes, root included
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Collect the shallowest terminal domains in normal (left-to-right) order.
    ///
    /// A terminal node is emitted and its `.` subtree is skipped: everything
    /// there is a subdomain already covered by the emitted suffix. Other
    /// children are still visited, since `example.com` is not covered by
    /// `ample.com`. Traversal uses an explicit stack, so deep paths cannot
    /// overflow the call stack.
    pub fn first_level_suffixes(&self) -> Vec<String> {
        let mut suffixes = Vec::new();
        // Reversed characters from the root to the current node
        let mut path: Vec<char> = Vec::new();
        // (node, depth of its parent, edge character)
        let mut stack: Vec<(NodeId, usize, Option<char>)> = vec![(ROOT, 0, None)];

        while let Some((id, depth, edge)) = stack.pop() {
            path.truncate(depth);
            if let Some(ch) = edge {
                path.push(ch);
            }

            let node = &self.nodes[id];
            let terminal = node.terminal && !path.is_empty();
            if terminal {
                suffixes.push(path.iter().rev().collect());
            }

            for (&ch, &child) in &node.children {
                if terminal && ch == '.' {
                    continue;
                }
                stack.push((child, path.len(), Some(ch)));
            }
        }

        suffixes
    }
}

impl Default for SuffixTrie {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: AsRef<str>> FromIterator<S> for SuffixTrie {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut trie = SuffixTrie::new();
        for domain in iter {
            trie.insert(domain.as_ref());
        }
        trie
    }
}

/// Reduce a domain set to the minimal list of suffix rules covering it.
///
/// The result is sorted so repeated runs over the same input are identical.
pub fn minimize_suffixes<I, S>(domains: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let trie: SuffixTrie = domains.into_iter().collect();
    let mut suffixes = trie.first_level_suffixes();
    suffixes.sort_unstable();
    log::debug!(
        "minimized {} domains to {} suffixes ({} trie nodes)",
        trie.len(),
        suffixes.len(),
        trie.node_count()
    );
    suffixes
}
