//! DOT identifier allocation
//!
//! Free-form labels are reduced to bare DOT identifiers: Unicode letters,
//! digits and underscores, never starting with an ASCII digit and never
//! colliding with a DOT keyword. Collisions with identifiers already in use
//! are broken by appending `_2`, `_3`, ... so the result is unique.

use std::collections::HashSet;

use tracing::trace;

use super::error::{DiagramError, Result};

/// Words the DOT grammar reserves, compared case-insensitively
const DOT_KEYWORDS: [&str; 6] = ["node", "edge", "graph", "digraph", "subgraph", "strict"];

/// Returns true if `word` is a DOT keyword in any letter case
pub fn is_dot_keyword(word: &str) -> bool {
    DOT_KEYWORDS
        .iter()
        .any(|keyword| keyword.eq_ignore_ascii_case(word))
}

/// Reduce a label to its base identifier, before collision handling
pub fn sanitize(label: &str) -> Result<String> {
    let mut base = String::with_capacity(label.len());
    let mut pending_separator = false;

    for c in label.chars() {
        if c.is_alphanumeric() || c == '_' {
            if pending_separator && !base.is_empty() {
                base.push('_');
            }
            pending_separator = false;
            base.push(c);
        } else {
            pending_separator = true;
        }
    }

    let trimmed = base.trim_matches('_');
    if trimmed.is_empty() {
        return Err(DiagramError::InvalidLabel {
            label: label.to_string(),
        });
    }

    let mut id = String::with_capacity(trimmed.len() + 2);
    if trimmed.starts_with(|c: char| c.is_ascii_digit()) {
        id.push_str("n_");
    }
    id.push_str(trimmed);
    if is_dot_keyword(&id) {
        id.push('_');
    }
    Ok(id)
}

/// Allocate an identifier for `label` that is not in `used`
///
/// The same label and the same `used` set always produce the same result.
pub fn allocate(label: &str, used: &HashSet<String>) -> Result<String> {
    let base = sanitize(label)?;
    if !used.contains(&base) {
        return Ok(base);
    }

    let mut suffix = 2usize;
    loop {
        let candidate = format!("{}_{}", base, suffix);
        if !used.contains(&candidate) {
            trace!(label, id = %candidate, "Disambiguated identifier");
            return Ok(candidate);
        }
        suffix += 1;
    }
}

/// Hands out unique identifiers across one compilation
#[derive(Debug, Clone, Default)]
pub struct IdentifierAllocator {
    used: HashSet<String>,
}

impl IdentifierAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate and record an identifier for `label`
    pub fn allocate(&mut self, label: &str) -> Result<String> {
        let id = allocate(label, &self.used)?;
        self.used.insert(id.clone());
        Ok(id)
    }

    /// Mark an identifier as taken without allocating it
    pub fn reserve(&mut self, id: impl Into<String>) {
        self.used.insert(id.into());
    }

    pub fn contains(&self, id: &str) -> bool {
        self.used.contains(id)
    }

    pub fn len(&self) -> usize {
        self.used.len()
    }

    pub fn is_empty(&self) -> bool {
        self.used.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_plain_label_is_kept() {
        assert_eq!(sanitize("Server").unwrap(), "Server");
        assert_eq!(sanitize("web_01").unwrap(), "web_01");
    }

    #[test]
    fn test_separators_collapse_to_single_underscore() {
        assert_eq!(sanitize("Load Balancer").unwrap(), "Load_Balancer");
        assert_eq!(sanitize("a -- b").unwrap(), "a_b");
        assert_eq!(sanitize("  padded  ").unwrap(), "padded");
    }

    #[test]
    fn test_leading_digit_is_prefixed() {
        assert_eq!(sanitize("3rd party").unwrap(), "n_3rd_party");
    }

    #[test]
    fn test_keywords_are_suffixed() {
        assert_eq!(sanitize("node").unwrap(), "node_");
        assert_eq!(sanitize("Graph").unwrap(), "Graph_");
        assert_eq!(sanitize("nodes").unwrap(), "nodes");
    }

    #[test]
    fn test_unicode_letters_survive() {
        assert_eq!(sanitize("Größe").unwrap(), "Größe");
        assert_eq!(sanitize("数据 库").unwrap(), "数据_库");
    }

    #[test]
    fn test_label_without_usable_characters_fails() {
        for label in ["", "   ", "!!!", "___", "-> <-"] {
            assert!(matches!(
                sanitize(label),
                Err(DiagramError::InvalidLabel { .. })
            ));
        }
    }

    #[test]
    fn test_collisions_get_numeric_suffixes() {
        let mut allocator = IdentifierAllocator::new();
        assert_eq!(allocator.allocate("API Server").unwrap(), "API_Server");
        assert_eq!(allocator.allocate("API-Server").unwrap(), "API_Server_2");
        assert_eq!(allocator.allocate("API/Server").unwrap(), "API_Server_3");
        assert_eq!(allocator.len(), 3);
    }

    #[test]
    fn test_suffix_skips_reserved_candidates() {
        let mut allocator = IdentifierAllocator::new();
        allocator.reserve("a");
        allocator.reserve("a_2");
        assert_eq!(allocator.allocate("a").unwrap(), "a_3");
    }

    fn is_bare_dot_id(id: &str) -> bool {
        let mut chars = id.chars();
        match chars.next() {
            Some(first) if first.is_ascii_digit() => false,
            Some(_) => id.chars().all(|c| c.is_alphanumeric() || c == '_'),
            None => false,
        }
    }

    proptest! {
        #[test]
        fn prop_allocated_ids_are_bare_and_unique(labels in prop::collection::vec(".{0,12}", 1..20)) {
            let mut allocator = IdentifierAllocator::new();
            let mut seen = HashSet::new();
            for label in &labels {
                if let Ok(id) = allocator.allocate(label) {
                    prop_assert!(is_bare_dot_id(&id), "not a bare id: {:?}", id);
                    prop_assert!(!is_dot_keyword(&id));
                    prop_assert!(seen.insert(id));
                }
            }
        }

        #[test]
        fn prop_allocation_is_deterministic(label in ".{0,16}") {
            let used: HashSet<String> = ["x".to_string(), "x_2".to_string()].into_iter().collect();
            prop_assert_eq!(
                allocate(&label, &used).ok(),
                allocate(&label, &used).ok()
            );
        }
    }
}
