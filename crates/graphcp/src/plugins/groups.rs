//! Group containment planning
//!
//! Groups must form a containment tree: any two groups are either disjoint
//! or one contains the other. Groups with identical member sets nest in
//! declaration order, the earlier one outside.

use std::collections::{BTreeSet, HashMap, HashSet};

use tracing::{debug, trace};

use crate::core::{DiagramError, DiagramIntent, Result};

/// The cluster tree derived from an intent's groups
///
/// Group indices refer to positions in `DiagramIntent::groups`.
#[derive(Debug, Clone, Default)]
pub struct ClusterPlan {
    parents: Vec<Option<usize>>,
    children: Vec<Vec<usize>>,
    roots: Vec<usize>,
    chains: HashMap<String, Vec<usize>>,
}

impl ClusterPlan {
    /// Validate the groups of `intent` and arrange them into a tree
    pub fn plan(intent: &DiagramIntent) -> Result<Self> {
        let known: HashSet<&str> = intent.entities.iter().map(|e| e.name.as_str()).collect();

        let mut sets: Vec<BTreeSet<&str>> = Vec::with_capacity(intent.groups.len());
        for (index, group) in intent.groups.iter().enumerate() {
            if group.members.is_empty() {
                return Err(DiagramError::EmptyGroup {
                    group: group.display_name(index),
                });
            }
            let mut members = BTreeSet::new();
            for member in &group.members {
                if !known.contains(member.as_str()) {
                    return Err(DiagramError::dangling(
                        format!("group '{}'", group.display_name(index)),
                        member.clone(),
                    ));
                }
                members.insert(member.as_str());
            }
            sets.push(members);
        }

        for i in 0..sets.len() {
            for j in (i + 1)..sets.len() {
                let (a, b) = (&sets[i], &sets[j]);
                if a.is_disjoint(b) || a.is_subset(b) || b.is_subset(a) {
                    continue;
                }
                return Err(DiagramError::OverlappingGroups {
                    first: intent.groups[i].display_name(i),
                    second: intent.groups[j].display_name(j),
                });
            }
        }

        let parents: Vec<Option<usize>> = (0..sets.len())
            .map(|i| {
                innermost_where(&sets, |j| {
                    j != i
                        && sets[i].is_subset(&sets[j])
                        && (sets[i].len() < sets[j].len() || j < i)
                })
            })
            .collect();

        let mut children = vec![Vec::new(); sets.len()];
        let mut roots = Vec::new();
        for (index, parent) in parents.iter().enumerate() {
            match parent {
                Some(parent) => children[*parent].push(index),
                None => roots.push(index),
            }
        }

        let mut chains = HashMap::new();
        for entity in &intent.entities {
            let name = entity.name.as_str();
            let Some(innermost) = innermost_where(&sets, |j| sets[j].contains(name)) else {
                continue;
            };
            let mut chain = vec![innermost];
            let mut current = innermost;
            while let Some(parent) = parents[current] {
                chain.push(parent);
                current = parent;
            }
            chain.reverse();
            trace!(entity = name, depth = chain.len(), "Placed entity in cluster");
            chains.insert(entity.name.clone(), chain);
        }

        debug!(
            group_count = sets.len(),
            root_count = roots.len(),
            "Planned cluster tree"
        );

        Ok(Self {
            parents,
            children,
            roots,
            chains,
        })
    }

    /// Top-level groups in declaration order
    pub fn roots(&self) -> &[usize] {
        &self.roots
    }

    /// Directly nested groups in declaration order
    pub fn children(&self, group: usize) -> &[usize] {
        self.children.get(group).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn parent(&self, group: usize) -> Option<usize> {
        self.parents.get(group).copied().flatten()
    }

    /// Groups containing `entity`, outermost first
    pub fn chain(&self, entity: &str) -> &[usize] {
        self.chains.get(entity).map(Vec::as_slice).unwrap_or(&[])
    }

    /// The innermost group containing `entity`
    pub fn innermost(&self, entity: &str) -> Option<usize> {
        self.chain(entity).last().copied()
    }

    /// Groups containing both entities, outermost first
    pub fn common_chain(&self, a: &str, b: &str) -> &[usize] {
        let (chain_a, chain_b) = (self.chain(a), self.chain(b));
        let shared = chain_a
            .iter()
            .zip(chain_b)
            .take_while(|(x, y)| x == y)
            .count();
        &chain_a[..shared]
    }
}

// Among the groups selected by `filter`, the smallest one; between equal
// sets the later declaration is nested deeper.
fn innermost_where<F>(sets: &[BTreeSet<&str>], filter: F) -> Option<usize>
where
    F: Fn(usize) -> bool,
{
    (0..sets.len())
        .filter(|&j| filter(j))
        .min_by(|&x, &y| sets[x].len().cmp(&sets[y].len()).then(y.cmp(&x)))
}
