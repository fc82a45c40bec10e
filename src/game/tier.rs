//! Tier Catalog
//!
//! The fixed fruit progression. Built once from a list of [`TierSpec`]s,
//! validated into a single successor chain, then frozen for the session.

use std::collections::BTreeMap;
use std::fmt;
use serde::{Serialize, Deserialize};
use thiserror::Error;

use crate::core::fixed::{Fixed, to_float};

/// Largest table a `TierId` can address.
pub const MAX_TIERS: usize = u8::MAX as usize;

// =============================================================================
// TIER ID
// =============================================================================

/// Rank of a tier in the progression (0 = smallest).
///
/// Only a [`TierCatalog`] hands these out, so ranks always index its table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TierId(u8);

impl TierId {
    /// Rank in the progression.
    #[inline]
    pub fn rank(self) -> u8 {
        self.0
    }

    #[inline]
    fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for TierId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

// =============================================================================
// TIER DEFINITIONS
// =============================================================================

/// Unvalidated tier entry, as written in configuration.
#[derive(Clone, Debug, PartialEq)]
pub struct TierSpec {
    /// Identifier, unique within the table
    pub name: String,
    /// Display size (diameter)
    pub size: Fixed,
    /// Name of the tier two of these fuse into; `None` for the top tier
    pub successor: Option<String>,
}

impl TierSpec {
    /// Convenience constructor.
    pub fn new(name: &str, size: Fixed, successor: Option<&str>) -> Self {
        Self {
            name: name.to_string(),
            size,
            successor: successor.map(str::to_string),
        }
    }
}

/// One validated tier.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Tier {
    /// Rank in the progression
    pub id: TierId,
    /// Identifier from configuration
    pub name: String,
    /// Display size (diameter), always positive
    pub size: Fixed,
    /// Fusion target, `None` only for the top tier
    pub successor: Option<TierId>,
}

/// Catalog validation failures. All of them are fatal at startup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    /// No tiers at all.
    #[error("tier table is empty")]
    Empty,

    /// More tiers than a `TierId` can address.
    #[error("tier table has {0} entries, at most {MAX_TIERS} are supported")]
    TooManyTiers(usize),

    /// Two tiers share a name.
    #[error("duplicate tier name: {0}")]
    DuplicateName(String),

    /// Size missing or non-positive.
    #[error("tier {0} has no positive display size")]
    InvalidSize(String),

    /// Successor names a tier that is not in the table.
    #[error("tier {tier} names unknown successor {successor}")]
    UnknownSuccessor {
        /// Tier carrying the bad reference
        tier: String,
        /// The missing name
        successor: String,
    },

    /// Every tier has a successor, so the chain never terminates.
    #[error("no top tier: every tier has a successor")]
    NoTopTier,

    /// More than one tier without successor.
    #[error("multiple top tiers: {first} and {second}")]
    MultipleTopTiers {
        /// First tier without successor
        first: String,
        /// Second tier without successor
        second: String,
    },

    /// Two tiers fuse into the same successor.
    #[error("tier {0} is the successor of more than one tier")]
    SharedSuccessor(String),

    /// Part of the table forms a loop unreachable from the smallest tier.
    #[error("successor cycle through tier {0}")]
    Cycle(String),

    /// Spawnable prefix must be non-empty and leave at least one tier for fusion.
    #[error("spawnable tier count {count} invalid for a table of {tiers} tiers")]
    InvalidSpawnCount {
        /// Requested spawnable count
        count: usize,
        /// Table size
        tiers: usize,
    },
}

// =============================================================================
// TIER CATALOG
// =============================================================================

/// Validated, ordered tier table.
///
/// Invariants: tiers are stored by rank, `successor_of(Ti) == Ti+1` for all
/// but the last tier, and the spawnable tiers are a proper prefix.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TierCatalog {
    tiers: Vec<Tier>,
    spawnable: Vec<TierId>,
}

impl TierCatalog {
    /// Validate a tier table and order it along its successor chain.
    ///
    /// `spawnable_count` smallest tiers become the spawn pool.
    pub fn new(specs: &[TierSpec], spawnable_count: usize) -> Result<Self, CatalogError> {
        if specs.is_empty() {
            return Err(CatalogError::Empty);
        }
        if specs.len() > MAX_TIERS {
            return Err(CatalogError::TooManyTiers(specs.len()));
        }

        let mut by_name: BTreeMap<&str, usize> = BTreeMap::new();
        for (i, spec) in specs.iter().enumerate() {
            if by_name.insert(spec.name.as_str(), i).is_some() {
                return Err(CatalogError::DuplicateName(spec.name.clone()));
            }
            if spec.size <= 0 {
                return Err(CatalogError::InvalidSize(spec.name.clone()));
            }
        }

        // Resolve successor names to table indices
        let mut next: Vec<Option<usize>> = Vec::with_capacity(specs.len());
        for spec in specs {
            let resolved = match &spec.successor {
                None => None,
                Some(succ) => match by_name.get(succ.as_str()) {
                    Some(idx) => Some(*idx),
                    None => {
                        return Err(CatalogError::UnknownSuccessor {
                            tier: spec.name.clone(),
                            successor: succ.clone(),
                        })
                    }
                },
            };
            next.push(resolved);
        }

        // Exactly one terminal
        let mut terminals = specs.iter().zip(&next).filter(|(_, n)| n.is_none());
        match (terminals.next(), terminals.next()) {
            (None, _) => return Err(CatalogError::NoTopTier),
            (Some((first, _)), Some((second, _))) => {
                return Err(CatalogError::MultipleTopTiers {
                    first: first.name.clone(),
                    second: second.name.clone(),
                })
            }
            (Some(_), None) => {}
        }

        // Injective: nobody shares a successor
        let mut has_pred = vec![false; specs.len()];
        for succ in next.iter().flatten() {
            if has_pred[*succ] {
                return Err(CatalogError::SharedSuccessor(specs[*succ].name.clone()));
            }
            has_pred[*succ] = true;
        }

        // One terminal plus injectivity leaves exactly one root unless a loop
        // swallowed it.
        let root = match has_pred.iter().position(|p| !p) {
            Some(root) => root,
            None => return Err(CatalogError::Cycle(specs[0].name.clone())),
        };

        let mut order = Vec::with_capacity(specs.len());
        let mut visited = vec![false; specs.len()];
        let mut cursor = Some(root);
        while let Some(idx) = cursor {
            if visited[idx] {
                return Err(CatalogError::Cycle(specs[idx].name.clone()));
            }
            visited[idx] = true;
            order.push(idx);
            cursor = next[idx];
        }
        if let Some(stray) = visited.iter().position(|v| !v) {
            return Err(CatalogError::Cycle(specs[stray].name.clone()));
        }

        if spawnable_count == 0 || spawnable_count >= specs.len() {
            return Err(CatalogError::InvalidSpawnCount {
                count: spawnable_count,
                tiers: specs.len(),
            });
        }

        let last = order.len() - 1;
        let tiers: Vec<Tier> = order
            .iter()
            .enumerate()
            .map(|(rank, idx)| Tier {
                id: TierId(rank as u8),
                name: specs[*idx].name.clone(),
                size: specs[*idx].size,
                successor: (rank < last).then(|| TierId(rank as u8 + 1)),
            })
            .collect();
        let spawnable = tiers.iter().take(spawnable_count).map(|t| t.id).collect();

        Ok(Self { tiers, spawnable })
    }

    /// Display size of a tier.
    #[inline]
    pub fn size_of(&self, tier: TierId) -> Fixed {
        self.tiers.get(tier.index()).map_or(0, |t| t.size)
    }

    /// Fusion target of a tier, `None` at the top.
    #[inline]
    pub fn successor_of(&self, tier: TierId) -> Option<TierId> {
        self.tiers.get(tier.index()).and_then(|t| t.successor)
    }

    /// Tiers new drops are drawn from, smallest first.
    #[inline]
    pub fn spawnable_tiers(&self) -> &[TierId] {
        &self.spawnable
    }

    /// Whether a tier may appear as a fresh drop.
    pub fn is_spawnable(&self, tier: TierId) -> bool {
        self.spawnable.contains(&tier)
    }

    /// Name of a tier.
    pub fn name_of(&self, tier: TierId) -> &str {
        self.tiers.get(tier.index()).map_or("?", |t| t.name.as_str())
    }

    /// Look up a tier by rank.
    pub fn get(&self, tier: TierId) -> Option<&Tier> {
        self.tiers.get(tier.index())
    }

    /// Tier at a given rank, if the table is that long.
    pub fn tier_at(&self, rank: usize) -> Option<TierId> {
        self.tiers.get(rank).map(|t| t.id)
    }

    /// Find a tier by name.
    pub fn by_name(&self, name: &str) -> Option<TierId> {
        self.tiers.iter().find(|t| t.name == name).map(|t| t.id)
    }

    /// The tier with no successor.
    pub fn top_tier(&self) -> TierId {
        // Construction rejects empty tables
        TierId((self.tiers.len() - 1) as u8)
    }

    /// Number of tiers.
    pub fn len(&self) -> usize {
        self.tiers.len()
    }

    /// Always false for a constructed catalog.
    pub fn is_empty(&self) -> bool {
        self.tiers.is_empty()
    }

    /// Iterate tiers smallest first.
    pub fn iter(&self) -> impl Iterator<Item = &Tier> {
        self.tiers.iter()
    }

    /// One-line summary for startup logs.
    pub fn describe(&self) -> String {
        self.tiers
            .iter()
            .map(|t| format!("{}({:.1})", t.name, to_float(t.size)))
            .collect::<Vec<_>>()
            .join(" -> ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::fixed::to_fixed;

    fn three_tiers() -> Vec<TierSpec> {
        vec![
            TierSpec::new("small", to_fixed(10.0), Some("medium")),
            TierSpec::new("medium", to_fixed(20.0), Some("large")),
            TierSpec::new("large", to_fixed(40.0), None),
        ]
    }

    #[test]
    fn test_chain_order() {
        let catalog = TierCatalog::new(&three_tiers(), 1).unwrap();
        let small = catalog.by_name("small").unwrap();
        let medium = catalog.by_name("medium").unwrap();
        let large = catalog.by_name("large").unwrap();

        assert_eq!(catalog.successor_of(small), Some(medium));
        assert_eq!(catalog.successor_of(medium), Some(large));
        assert_eq!(catalog.successor_of(large), None);
        assert_eq!(catalog.top_tier(), large);
        assert_eq!(catalog.size_of(medium), to_fixed(20.0));
        assert_eq!(catalog.spawnable_tiers(), &[small]);
    }

    #[test]
    fn test_order_independent_of_listing() {
        let mut specs = three_tiers();
        specs.reverse();
        let catalog = TierCatalog::new(&specs, 2).unwrap();

        let names: Vec<_> = catalog.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, ["small", "medium", "large"]);
        assert_eq!(catalog.tier_at(0), catalog.by_name("small"));
        assert!(catalog.is_spawnable(catalog.by_name("medium").unwrap()));
        assert!(!catalog.is_spawnable(catalog.by_name("large").unwrap()));
    }

    #[test]
    fn test_rejects_empty() {
        assert_eq!(TierCatalog::new(&[], 1), Err(CatalogError::Empty));
    }

    #[test]
    fn test_rejects_bad_size() {
        let mut specs = three_tiers();
        specs[1].size = 0;
        assert_eq!(
            TierCatalog::new(&specs, 1),
            Err(CatalogError::InvalidSize("medium".into()))
        );
    }

    #[test]
    fn test_rejects_duplicate_name() {
        let mut specs = three_tiers();
        specs[2].name = "small".into();
        assert_eq!(
            TierCatalog::new(&specs, 1),
            Err(CatalogError::DuplicateName("small".into()))
        );
    }

    #[test]
    fn test_rejects_unknown_successor() {
        let mut specs = three_tiers();
        specs[1].successor = Some("huge".into());
        assert!(matches!(
            TierCatalog::new(&specs, 1),
            Err(CatalogError::UnknownSuccessor { .. })
        ));
    }

    #[test]
    fn test_rejects_full_cycle() {
        let mut specs = three_tiers();
        specs[2].successor = Some("small".into());
        assert_eq!(TierCatalog::new(&specs, 1), Err(CatalogError::NoTopTier));
    }

    #[test]
    fn test_rejects_detached_cycle() {
        let specs = vec![
            TierSpec::new("a", to_fixed(1.0), Some("b")),
            TierSpec::new("b", to_fixed(2.0), None),
            TierSpec::new("c", to_fixed(3.0), Some("d")),
            TierSpec::new("d", to_fixed(4.0), Some("c")),
        ];
        assert!(matches!(TierCatalog::new(&specs, 1), Err(CatalogError::Cycle(_))));
    }

    #[test]
    fn test_rejects_self_loop() {
        let specs = vec![
            TierSpec::new("a", to_fixed(1.0), Some("b")),
            TierSpec::new("b", to_fixed(2.0), None),
            TierSpec::new("c", to_fixed(3.0), Some("c")),
        ];
        assert!(matches!(TierCatalog::new(&specs, 1), Err(CatalogError::Cycle(_))));
    }

    #[test]
    fn test_rejects_two_top_tiers() {
        let specs = vec![
            TierSpec::new("a", to_fixed(1.0), None),
            TierSpec::new("b", to_fixed(2.0), None),
        ];
        assert!(matches!(
            TierCatalog::new(&specs, 1),
            Err(CatalogError::MultipleTopTiers { .. })
        ));
    }

    #[test]
    fn test_rejects_shared_successor() {
        let specs = vec![
            TierSpec::new("a", to_fixed(1.0), Some("c")),
            TierSpec::new("b", to_fixed(2.0), Some("c")),
            TierSpec::new("c", to_fixed(3.0), None),
        ];
        assert_eq!(
            TierCatalog::new(&specs, 1),
            Err(CatalogError::SharedSuccessor("c".into()))
        );
    }

    #[test]
    fn test_rejects_spawn_counts() {
        assert!(matches!(
            TierCatalog::new(&three_tiers(), 0),
            Err(CatalogError::InvalidSpawnCount { count: 0, tiers: 3 })
        ));
        // Spawning every tier would leave nothing reachable only by fusion
        assert!(matches!(
            TierCatalog::new(&three_tiers(), 3),
            Err(CatalogError::InvalidSpawnCount { count: 3, tiers: 3 })
        ));
    }
}
