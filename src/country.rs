//! Country name resolution
//!
//! Maps user-typed country strings onto canonical names and produces
//! autocomplete suggestions. Everything here is a pure function over the
//! inputs it is given: the canonical list is always passed in by the caller,
//! and the alias table is injected once when the resolver is built.

use std::collections::HashMap;

/// Default number of autocomplete suggestions
pub const DEFAULT_SUGGESTION_LIMIT: usize = 5;

/// Minimum input length (in characters) before suggestions are produced
pub const MIN_SUGGEST_CHARS: usize = 2;

/// Popular countries, in quick-pick display order
///
/// Also serves as the fallback canonical list when the dataset is unavailable.
pub const POPULAR_COUNTRIES: [&str; 10] = [
    "United States",
    "Canada",
    "United Kingdom",
    "Germany",
    "France",
    "Japan",
    "Australia",
    "Brazil",
    "India",
    "China",
];

/// Canonical country list
///
/// Sorted lexicographically with no duplicates, so suggestion order is
/// deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CountryList(Vec<String>);

impl CountryList {
    /// Build a list from arbitrary names (trims, drops blanks, sorts, dedups)
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut names: Vec<String> = names
            .into_iter()
            .map(|n| {
                let n: String = n.into();
                n.trim().to_string()
            })
            .filter(|n| !n.is_empty())
            .collect();
        names.sort();
        names.dedup();
        Self(names)
    }

    /// The static fallback list used until (or instead of) a loaded dataset
    pub fn fallback() -> Self {
        Self::new(POPULAR_COUNTRIES)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Alias table: canonical name -> lowercase aliases
///
/// Alias sets must not overlap between canonical names. This is a data
/// entry rule and is not checked at runtime.
#[derive(Debug, Clone, Default)]
pub struct AliasTable {
    entries: HashMap<String, Vec<String>>,
}

impl AliasTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Add aliases for a canonical name (aliases are stored lowercased)
    pub fn with_aliases<I, S>(mut self, canonical: &str, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let entry = self.entries.entry(canonical.to_string()).or_default();
        entry.extend(aliases.into_iter().map(|a| a.as_ref().to_lowercase()));
        self
    }

    /// The built-in table of common abbreviations and informal names
    pub fn builtin() -> Self {
        Self::new()
            .with_aliases(
                "United States",
                ["usa", "us", "america", "united states of america"],
            )
            .with_aliases(
                "United Kingdom",
                ["uk", "gb", "britain", "great britain", "england"],
            )
            .with_aliases("Germany", ["deutschland", "germany"])
            .with_aliases("South Korea", ["korea", "s. korea"])
            .with_aliases("Czech Republic", ["czechia"])
            .with_aliases("Russian Federation", ["russia"])
            .with_aliases("Iran, Islamic Republic of", ["iran"])
    }

    /// Aliases registered for a canonical name (empty if none)
    pub fn aliases_for(&self, canonical: &str) -> &[String] {
        self.entries
            .get(canonical)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Country resolver with an injected alias table
#[derive(Debug, Clone, Default)]
pub struct CountryResolver {
    aliases: AliasTable,
}

impl CountryResolver {
    pub fn new(aliases: AliasTable) -> Self {
        Self { aliases }
    }

    pub fn aliases(&self) -> &AliasTable {
        &self.aliases
    }

    /// Resolve raw input to a canonical name
    ///
    /// Priority, first match wins:
    /// 1. case-insensitive exact match against the list
    /// 2. case-insensitive exact match against an alias of a listed entry
    /// 3. first entry (in list order) that contains the input, or is
    ///    contained by it, case-insensitively
    ///
    /// Returns `None` when nothing matches; the caller then keeps the raw
    /// input verbatim. Step 3 ties are broken purely by the order of `list`.
    pub fn resolve<S: AsRef<str>>(&self, raw: &str, list: &[S]) -> Option<String> {
        if raw.is_empty() {
            return None;
        }
        let needle = raw.to_lowercase();

        if let Some(exact) = names(list).find(|c| c.to_lowercase() == needle) {
            return Some(exact.to_string());
        }

        if let Some(owner) =
            names(list).find(|c| self.aliases.aliases_for(c).iter().any(|a| *a == needle))
        {
            return Some(owner.to_string());
        }

        names(list)
            .find(|c| {
                let name = c.to_lowercase();
                name.contains(&needle) || needle.contains(&name)
            })
            .map(str::to_string)
    }

    /// Autocomplete suggestions for partial input
    ///
    /// Inputs shorter than [`MIN_SUGGEST_CHARS`] yield nothing. Otherwise
    /// returns up to `limit` entries whose name, or one of whose aliases,
    /// contains the input. Order follows `list`.
    pub fn suggest<S: AsRef<str>>(&self, partial: &str, list: &[S], limit: usize) -> Vec<String> {
        if partial.chars().count() < MIN_SUGGEST_CHARS {
            return Vec::new();
        }
        let needle = partial.to_lowercase();

        names(list)
            .filter(|c| {
                c.to_lowercase().contains(&needle)
                    || self
                        .aliases
                        .aliases_for(c)
                        .iter()
                        .any(|a| a.contains(&needle))
            })
            .take(limit)
            .map(str::to_string)
            .collect()
    }
}

fn names<S: AsRef<str>>(list: &[S]) -> impl Iterator<Item = &str> {
    list.iter().map(|c| c.as_ref())
}

/// Append `candidate` unless it is already present (exact equality)
///
/// Returns a new sequence; the input is left untouched.
pub fn commit(selected: &[String], candidate: &str) -> Vec<String> {
    let mut updated = selected.to_vec();
    if !selected.iter().any(|s| s == candidate) {
        updated.push(candidate.to_string());
    }
    updated
}

/// Return a new sequence with every entry equal to `value` removed
pub fn remove(selected: &[String], value: &str) -> Vec<String> {
    selected.iter().filter(|s| *s != value).cloned().collect()
}
