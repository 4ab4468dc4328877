//! Grouping declarations into an `AssetSet`.
//!
//! Declarations are bucketed by breakpoint. Within a bucket each density
//! multiplier appears once and the list is kept in ascending multiplier
//! order. When two declarations share a breakpoint and multiplier the
//! `DuplicatePolicy` decides which one stays; by default the later one
//! replaces the earlier one in place.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::breakpoint::Breakpoint;
use crate::canonical::density_multiplier;
use crate::parser::AssetDeclaration;

/// What to do with a second declaration for the same breakpoint and density.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DuplicatePolicy {
    /// The declaration seen last replaces the earlier one.
    #[default]
    LastWins,
    /// The first declaration is kept; later ones are ignored.
    FirstWins,
}

/// One aggregated declaration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Asset {
    /// Position of the declaration in scan order.
    pub index: usize,
    /// Resolved breakpoint bucket.
    pub breakpoint: Breakpoint,
    /// Numeric density multiplier (1 when the declaration has none).
    pub density: f64,
    /// The declaration itself.
    pub declaration: AssetDeclaration,
}

impl Asset {
    /// Build an asset from a declaration seen at position `index`.
    pub fn new(index: usize, declaration: AssetDeclaration) -> Self {
        let breakpoint = declaration
            .breakpoint
            .as_deref()
            .map(Breakpoint::from_synonym)
            .unwrap_or(Breakpoint::Xs);
        let density = density_multiplier(declaration.density.as_deref());

        Self {
            index,
            breakpoint,
            density,
            declaration,
        }
    }
}

/// Breakpoint → ascending, density-unique assets.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct AssetSet {
    buckets: BTreeMap<Breakpoint, Vec<Asset>>,
}

impl AssetSet {
    /// Assets for one breakpoint, ascending by density.
    pub fn get(&self, breakpoint: Breakpoint) -> Option<&[Asset]> {
        self.buckets
            .get(&breakpoint)
            .filter(|assets| !assets.is_empty())
            .map(|assets| assets.as_slice())
    }

    /// Non-empty breakpoints, smallest first.
    pub fn sorted_breakpoints(&self) -> Vec<Breakpoint> {
        self.iter().map(|(breakpoint, _)| breakpoint).collect()
    }

    /// True when more than one breakpoint has assets, i.e. the markup
    /// needs a `<picture>` rather than a single `<img>`.
    pub fn has_multiple_breakpoints(&self) -> bool {
        self.iter().nth(1).is_some()
    }

    /// Non-empty buckets, smallest breakpoint first.
    pub fn iter(&self) -> impl Iterator<Item = (Breakpoint, &[Asset])> {
        self.buckets
            .iter()
            .filter(|(_, assets)| !assets.is_empty())
            .map(|(breakpoint, assets)| (*breakpoint, assets.as_slice()))
    }

    /// Total number of assets across all buckets.
    pub fn len(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    /// True when no bucket holds an asset.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Incrementally builds an `AssetSet`.
///
/// The builder is the only mutable state of a scan; it is threaded through
/// explicitly rather than shared.
#[derive(Debug, Default)]
pub struct AssetSetBuilder {
    policy: DuplicatePolicy,
    set: AssetSet,
    next_index: usize,
}

impl AssetSetBuilder {
    /// Create a builder with the default (last wins) policy.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder with an explicit duplicate policy.
    pub fn with_policy(policy: DuplicatePolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    /// Insert the next declaration in scan order.
    pub fn insert(&mut self, declaration: AssetDeclaration) -> &mut Self {
        let asset = Asset::new(self.next_index, declaration);
        self.next_index += 1;

        let bucket = self.set.buckets.entry(asset.breakpoint).or_default();
        match bucket.binary_search_by(|a| a.density.total_cmp(&asset.density)) {
            Ok(pos) => {
                if self.policy == DuplicatePolicy::LastWins {
                    bucket[pos] = asset;
                }
            }
            Err(pos) => bucket.insert(pos, asset),
        }

        self
    }

    /// Number of declarations inserted so far, duplicates included.
    pub fn inserted(&self) -> usize {
        self.next_index
    }

    /// Finish building.
    pub fn build(self) -> AssetSet {
        self.set
    }
}

/// Aggregate declarations in order.
pub fn aggregate<I>(declarations: I, policy: DuplicatePolicy) -> AssetSet
where
    I: IntoIterator<Item = AssetDeclaration>,
{
    let mut builder = AssetSetBuilder::with_policy(policy);
    for declaration in declarations {
        builder.insert(declaration);
    }
    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_declaration;

    fn decls(inputs: &[&str]) -> Vec<AssetDeclaration> {
        inputs.iter().map(|s| parse_declaration(s).unwrap()).collect()
    }

    #[test]
    fn test_groups_by_breakpoint() {
        let set = aggregate(
            decls(&["a-l.png", "a.png", "a-m-@2x.png", "a-xl.png"]),
            DuplicatePolicy::LastWins,
        );

        assert_eq!(
            set.sorted_breakpoints(),
            vec![Breakpoint::Xs, Breakpoint::M, Breakpoint::L, Breakpoint::Xl]
        );
        assert!(set.has_multiple_breakpoints());
        assert_eq!(set.len(), 4);
    }

    #[test]
    fn test_sorted_by_density() {
        let set = aggregate(
            decls(&["a-@3x.png", "a.png", "a-1.5x.png", "a-@2x.png"]),
            DuplicatePolicy::LastWins,
        );

        let densities: Vec<f64> = set
            .get(Breakpoint::Xs)
            .unwrap()
            .iter()
            .map(|a| a.density)
            .collect();
        assert_eq!(densities, vec![1.0, 1.5, 2.0, 3.0]);
        assert!(!set.has_multiple_breakpoints());
    }

    #[test]
    fn test_last_write_wins() {
        let set = aggregate(decls(&["foo.jpg", "bar-1.5x.jpg", "baz.jpg"]), DuplicatePolicy::LastWins);

        let names: Vec<&str> = set
            .get(Breakpoint::Xs)
            .unwrap()
            .iter()
            .map(|a| a.declaration.name.as_str())
            .collect();
        assert_eq!(names, vec!["baz", "bar"]);
        assert_eq!(set.get(Breakpoint::Xs).unwrap()[0].index, 2);
    }

    #[test]
    fn test_first_write_wins() {
        let set = aggregate(decls(&["foo.png", "bar.png", "baz-@2x.png"]), DuplicatePolicy::FirstWins);

        let names: Vec<&str> = set
            .get(Breakpoint::Xs)
            .unwrap()
            .iter()
            .map(|a| a.declaration.name.as_str())
            .collect();
        assert_eq!(names, vec!["foo", "baz"]);
    }

    #[test]
    fn test_explicit_one_x_collides_with_implicit() {
        let set = aggregate(decls(&["a-s.png", "b-s-1x.png"]), DuplicatePolicy::LastWins);
        let bucket = set.get(Breakpoint::S).unwrap();
        assert_eq!(bucket.len(), 1);
        assert_eq!(bucket[0].declaration.name, "b");
    }

    #[test]
    fn test_ordering_invariant() {
        let set = aggregate(
            decls(&[
                "a-l-@2x.png", "a-s.png", "a-l.png", "a-s-@2x.png", "a-l-@2x.png", "a-xs-3x.png",
                "a-s-1.5x.png",
            ]),
            DuplicatePolicy::LastWins,
        );

        let breakpoints = set.sorted_breakpoints();
        assert!(breakpoints.windows(2).all(|w| w[0] < w[1]));
        for (_, assets) in set.iter() {
            assert!(assets.windows(2).all(|w| w[0].density < w[1].density));
        }
    }

    #[test]
    fn test_unknown_breakpoint_goes_to_default_bucket() {
        let set = aggregate(decls(&["hero.png"]), DuplicatePolicy::LastWins);
        assert_eq!(set.sorted_breakpoints(), vec![Breakpoint::Xs]);
    }

    #[test]
    fn test_empty_set() {
        let set = aggregate(Vec::new(), DuplicatePolicy::LastWins);
        assert!(set.is_empty());
        assert!(set.sorted_breakpoints().is_empty());
        assert!(!set.has_multiple_breakpoints());
        assert_eq!(set.get(Breakpoint::Xs), None);
    }

    #[test]
    fn test_builder_counts_duplicates() {
        let mut builder = AssetSetBuilder::new();
        for d in decls(&["a.png", "b.png"]) {
            builder.insert(d);
        }
        assert_eq!(builder.inserted(), 2);
        assert_eq!(builder.build().len(), 1);
    }
}
