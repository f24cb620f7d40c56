// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Beam identifier aliasing.
//!
//! A physical beam may be split into variants (`V10`, `V10-A`, `V10-B`), and the
//! geometry provider and the report do not always name the same variant. All
//! comparisons go through [`AliasTable::canonical`], a pure string rewrite.

use std::collections::BTreeMap;

use crate::config::AliasConfig;

/// Suffix rules plus explicit aliases, resolving identifiers to a canonical base.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AliasTable {
    /// Longest suffix first so `-AB` wins over `-B`.
    suffixes: Vec<String>,
    /// Alternate identifier → base identifier.
    to_base: BTreeMap<String, String>,
    /// Base identifier → alternate identifiers, insertion order.
    variants: BTreeMap<String, Vec<String>>,
}

impl AliasTable {
    /// Creates a table with the given split-variant suffixes and no explicit aliases.
    pub fn new<I, S>(suffixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut suffixes: Vec<String> = suffixes
            .into_iter()
            .map(Into::into)
            .filter(|s| !s.is_empty())
            .collect();
        suffixes.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        suffixes.dedup();
        Self {
            suffixes,
            ..Self::default()
        }
    }

    /// Builds a table from configuration.
    pub fn from_config(config: &AliasConfig) -> Self {
        let mut table = Self::new(config.suffixes.iter().cloned());
        for (base, alts) in &config.aliases {
            for alt in alts {
                table.insert_alias(base, alt);
            }
        }
        table
    }

    /// Declares `alias` as another name for `base`.
    pub fn insert_alias(&mut self, base: &str, alias: &str) {
        let base = self.strip_suffix(base.trim()).to_owned();
        let alias = alias.trim().to_owned();
        if alias.is_empty() || alias == base {
            return;
        }
        self.to_base.insert(alias.clone(), base.clone());
        let entry = self.variants.entry(base).or_default();
        if !entry.contains(&alias) {
            entry.push(alias);
        }
    }

    /// Builder form of [`AliasTable::insert_alias`].
    #[must_use]
    pub fn with_alias(mut self, base: &str, alias: &str) -> Self {
        self.insert_alias(base, alias);
        self
    }

    fn strip_suffix<'a>(&self, id: &'a str) -> &'a str {
        self.suffixes
            .iter()
            .find_map(|suffix| id.strip_suffix(suffix.as_str()).filter(|b| !b.is_empty()))
            .unwrap_or(id)
    }

    /// Canonical base identifier for `id`.
    ///
    /// An explicit alias resolves to its base whether or not it carries a
    /// split-variant suffix (`V12R` and `V12R-A` both give `V12`).
    pub fn canonical(&self, id: &str) -> String {
        let id = id.trim();
        if let Some(base) = self.to_base.get(id) {
            return base.clone();
        }
        let stripped = self.strip_suffix(id);
        self.to_base
            .get(stripped)
            .map_or_else(|| stripped.to_owned(), Clone::clone)
    }

    /// Every known identifier for the beam `id` belongs to: the base, each
    /// suffix variant, then explicit aliases. No duplicates.
    pub fn expand(&self, id: &str) -> Vec<String> {
        let base = self.canonical(id);
        let mut out = vec![base.clone()];
        let suffixed = self.suffixes.iter().map(|s| format!("{base}{s}"));
        let explicit = self.variants.get(&base).into_iter().flatten().cloned();
        for name in suffixed.chain(explicit) {
            if !out.contains(&name) {
                out.push(name);
            }
        }
        out
    }

    /// `true` when both identifiers denote the same physical beam.
    pub fn same_beam(&self, a: &str, b: &str) -> bool {
        self.canonical(a) == self.canonical(b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> AliasTable {
        AliasTable::from_config(&AliasConfig::default())
    }

    #[test]
    fn suffix_variants_share_a_base() {
        let t = table();
        assert_eq!(t.canonical("V10-A"), "V10");
        assert_eq!(t.canonical("V10-B"), "V10");
        assert_eq!(t.canonical("V10"), "V10");
        assert!(t.same_beam("V10-A", "V10-B"));
        assert!(!t.same_beam("V10", "V100"));
    }

    #[test]
    fn bare_suffix_is_not_stripped_to_nothing() {
        assert_eq!(table().canonical("-A"), "-A");
    }

    #[test]
    fn expand_lists_base_then_variants() {
        assert_eq!(table().expand("V7-B"), vec!["V7", "V7-A", "V7-B"]);
    }

    #[test]
    fn explicit_aliases_join_the_family() {
        let t = table().with_alias("V12", "V12'").with_alias("V12-A", "V12R");
        assert_eq!(t.canonical("V12'"), "V12");
        assert_eq!(t.canonical("V12R"), "V12");
        assert!(t.same_beam("V12R", "V12-B"));
        assert_eq!(t.expand("V12"), vec!["V12", "V12-A", "V12-B", "V12'", "V12R"]);
    }

    #[test]
    fn suffixed_alias_resolves_to_the_alias_base() {
        let t = table().with_alias("V12", "V12R");
        assert_eq!(t.canonical("V12R-A"), "V12");
        assert_eq!(t.canonical(" V12R-B "), "V12");
        assert!(t.same_beam("V12R-A", "V12-B"));
        assert!(!t.same_beam("V12R-A", "V13"));
    }

    #[test]
    fn longest_suffix_wins() {
        let t = AliasTable::new(["-B", "-AB"]);
        assert_eq!(t.canonical("V3-AB"), "V3");
        assert_eq!(t.canonical("V3-B"), "V3");
    }

    #[test]
    fn no_suffixes_means_exact_matching() {
        let t = AliasTable::new(Vec::<String>::new());
        assert!(!t.same_beam("V1", "V1-A"));
        assert_eq!(t.expand("V1"), vec!["V1"]);
    }
}
