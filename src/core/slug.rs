//! URL slugs for records and collision-free slug indexes.
//!
//! A slug is derived from a record's name. When several records share the
//! same name-derived slug, each of them gets its code appended:
//!
//! ```text
//! "Central School" (001) ─┐                 ┌─▶ central-school-001
//!                         ├─ base clash ────┤
//! "Central School" (002) ─┘                 └─▶ central-school-002
//! "Unique Name"    (X)   ─── no clash ──────────▶ unique-name
//! ```
//!
//! The index is rebuilt from the whole collection every time, because a
//! record's slug depends on every other record's name.

use std::sync::LazyLock;

use regex::Regex;
use rustc_hash::FxHashMap;

/// Anything that can be addressed by slug.
pub trait Sluggable {
    /// Human-readable name the slug is derived from.
    fn slug_name(&self) -> &str;
    /// Unique code used to disambiguate equal names.
    fn slug_code(&self) -> &str;
}

impl<T: Sluggable + ?Sized> Sluggable for &T {
    fn slug_name(&self) -> &str {
        (**self).slug_name()
    }

    fn slug_code(&self) -> &str {
        (**self).slug_code()
    }
}

// ============================================================================
// Slug generation
// ============================================================================

/// Convert a name into a URL slug, optionally suffixed with a disambiguator.
///
/// Lowercases, turns whitespace runs into `-`, drops anything outside
/// `[a-z0-9-]`, collapses repeated `-` and trims `-` from both ends.
/// The disambiguator is only lowercased and trimmed; callers pass an
/// already URL-safe value such as a dataset code.
///
/// An empty name yields an empty slug, even with a disambiguator.
pub fn generate_slug(name: &str, disambiguator: Option<&str>) -> String {
    if name.is_empty() {
        return String::new();
    }

    let lowered = name.to_lowercase();
    let mut slug = String::with_capacity(lowered.len());
    let mut pending_dash = false;

    for c in lowered.trim().chars() {
        if c.is_whitespace() || c == '-' {
            pending_dash = true;
        } else if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c);
        }
    }

    if let Some(code) = disambiguator.map(|d| d.to_lowercase())
        && !code.trim().is_empty()
    {
        slug.push('-');
        slug.push_str(code.trim());
    }

    slug
}

/// Slug of the name plus slugs of its common short forms.
///
/// The first entry is always the plain slug. Variations drop a trailing
/// school-type phrase ("Public School", "High", "PS", ...) and are only
/// included when they differ from everything already listed.
pub fn possible_slugs(name: &str) -> Vec<String> {
    static SCHOOL_SUFFIX: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"(?i)\s+(?:public|primary|secondary|high|central)\s+school$").unwrap()
    });
    static ABBREVIATION: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"(?i)\s+(?:PS|SS|HS|CS)$").unwrap());
    static LEVEL_SUFFIX: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"(?i)\s+(?:primary|secondary|high|central)$").unwrap()
    });

    let base = generate_slug(name, None);
    let mut slugs = vec![base.clone()];

    for pattern in [&*SCHOOL_SUFFIX, &*ABBREVIATION, &*LEVEL_SUFFIX] {
        let variation = pattern.replace(name, "");
        if variation == name {
            continue;
        }
        let slug = generate_slug(&variation, None);
        if !slug.is_empty() && slug != base && !slugs.contains(&slug) {
            slugs.push(slug);
        }
    }

    slugs
}

/// Best-effort display title for a slug: `"st-marys-school"` → `"St Marys School"`.
pub fn slug_to_title(slug: &str) -> String {
    if slug.is_empty() {
        return String::new();
    }

    slug.split('-')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

// ============================================================================
// Slug index
// ============================================================================

/// A routable record: its slug and its position in the source collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlugEntry {
    pub slug: String,
    pub code: String,
    pub position: usize,
}

impl SlugEntry {
    /// URL path of the record: `/<slug>`.
    pub fn path(&self) -> String {
        format!("/{}", self.slug)
    }
}

/// Bijective slug ↔ record mapping for one collection snapshot.
///
/// Stores positions rather than references, so the index can outlive a
/// borrow of the records it was built from. Entries keep collection order.
#[derive(Debug, Default, Clone)]
pub struct SlugIndex {
    entries: Vec<SlugEntry>,
    by_slug: FxHashMap<String, usize>,
    by_position: FxHashMap<usize, usize>,
    unroutable: Vec<usize>,
}

impl SlugIndex {
    /// Build a collision-free index over `records`.
    ///
    /// 1. Base slug per record; count equal base slugs.
    /// 2. Unique base slugs are used as-is, shared ones get the code appended.
    /// 3. Verify injectivity: every clash escalates its least-disambiguated
    ///    claimants one step (bare, then `<base>-<code>`, then
    ///    `<base>--<code>`). Claimants still clashing at the last step
    ///    (duplicate codes) keep the slug for the first and drop the rest.
    ///
    /// Records with an empty base slug (no letters or digits in the name)
    /// and dropped duplicates are reported by [`SlugIndex::unroutable`].
    pub fn build<T: Sluggable>(records: &[T]) -> Self {
        let bases: Vec<String> = records
            .iter()
            .map(|r| generate_slug(r.slug_name(), None))
            .collect();

        let mut counts: FxHashMap<&str, usize> = FxHashMap::default();
        for base in bases.iter().filter(|b| !b.is_empty()) {
            *counts.entry(base.as_str()).or_default() += 1;
        }

        let mut slugs = Vec::with_capacity(records.len());
        let mut levels = Vec::with_capacity(records.len());
        for (record, base) in records.iter().zip(&bases) {
            if base.is_empty() {
                slugs.push(String::new());
                levels.push(Level::Unroutable);
            } else if counts[base.as_str()] == 1 {
                slugs.push(base.clone());
                levels.push(Level::Bare);
            } else {
                slugs.push(generate_slug(record.slug_name(), Some(record.slug_code())));
                levels.push(Level::Coded);
            }
        }

        resolve_clashes(records, &bases, &mut slugs, &mut levels);

        let mut index = Self::default();
        for (position, (record, slug)) in records.iter().zip(slugs).enumerate() {
            if slug.is_empty() {
                index.unroutable.push(position);
                continue;
            }
            let entry = index.entries.len();
            index.by_slug.insert(slug.clone(), entry);
            index.by_position.insert(position, entry);
            index.entries.push(SlugEntry {
                slug,
                code: record.slug_code().to_string(),
                position,
            });
        }

        index
    }

    /// Position of the record addressed by `slug`.
    pub fn get(&self, slug: &str) -> Option<usize> {
        self.by_slug.get(slug).map(|&i| self.entries[i].position)
    }

    /// Look `slug` up and borrow the record from the collection the index
    /// was built from.
    pub fn resolve<'a, T>(&self, records: &'a [T], slug: &str) -> Option<&'a T> {
        self.get(slug).and_then(|position| records.get(position))
    }

    /// Slug of the record at `position`, if routable.
    pub fn slug_of(&self, position: usize) -> Option<&str> {
        self.by_position
            .get(&position)
            .map(|&i| self.entries[i].slug.as_str())
    }

    /// Slug of the record carrying `code`.
    pub fn slug_for_code(&self, code: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.code == code)
            .map(|e| e.slug.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &SlugEntry> {
        self.entries.iter()
    }

    /// Positions of records without a slug: names with no letters or
    /// digits, and duplicates dropped by [`SlugIndex::build`].
    pub fn unroutable(&self) -> &[usize] {
        &self.unroutable
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// How far a record's slug has been disambiguated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Level {
    /// `<base>`
    Bare,
    /// `<base>-<code>`
    Coded,
    /// `<base>--<code>`
    Separated,
    Unroutable,
}

/// `<base>--<code>`.
///
/// Generated slugs never contain `--`, so splitting at the first `--`
/// recovers the base: distinct `(base, code)` pairs give distinct slugs.
fn separated_slug(base: &str, code: &str) -> String {
    let code = code.trim().to_lowercase();
    if code.is_empty() {
        base.to_string()
    } else {
        format!("{base}--{code}")
    }
}

/// Escalate clashing claimants until the mapping is injective.
///
/// Every round raises at least one record's level, so this terminates.
fn resolve_clashes<T: Sluggable>(
    records: &[T],
    bases: &[String],
    slugs: &mut [String],
    levels: &mut [Level],
) {
    loop {
        let mut claims: FxHashMap<&str, Vec<usize>> = FxHashMap::default();
        for (position, slug) in slugs.iter().enumerate() {
            if !slug.is_empty() {
                claims.entry(slug.as_str()).or_default().push(position);
            }
        }

        let mut clashes: Vec<Vec<usize>> = claims
            .into_values()
            .filter(|claimants| claimants.len() > 1)
            .collect();
        if clashes.is_empty() {
            return;
        }
        clashes.sort_unstable_by_key(|claimants| claimants[0]);

        for claimants in &clashes {
            let Some(lowest) = claimants.iter().map(|&p| levels[p]).min() else {
                continue;
            };
            if lowest >= Level::Separated {
                for &position in &claimants[1..] {
                    levels[position] = Level::Unroutable;
                    slugs[position].clear();
                }
                continue;
            }

            let escalating: Vec<usize> = claimants
                .iter()
                .copied()
                .filter(|&p| levels[p] == lowest)
                .collect();
            for position in escalating {
                let record = &records[position];
                (slugs[position], levels[position]) = match lowest {
                    Level::Bare => (
                        generate_slug(record.slug_name(), Some(record.slug_code())),
                        Level::Coded,
                    ),
                    _ => (
                        separated_slug(&bases[position], record.slug_code()),
                        Level::Separated,
                    ),
                };
            }
        }
    }
}

/// Find the record addressed by `slug`.
///
/// Builds a fresh index over the whole collection on every call.
#[allow(dead_code)]
pub fn find_by_slug<'a, T: Sluggable>(records: &'a [T], slug: &str) -> Option<&'a T> {
    SlugIndex::build(records).resolve(records, slug)
}

// ============================================================================
// tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Named {
        name: &'static str,
        code: &'static str,
    }

    const fn named(name: &'static str, code: &'static str) -> Named {
        Named { name, code }
    }

    impl Sluggable for Named {
        fn slug_name(&self) -> &str {
            self.name
        }

        fn slug_code(&self) -> &str {
            self.code
        }
    }

    fn slugs(index: &SlugIndex) -> Vec<&str> {
        index.iter().map(|e| e.slug.as_str()).collect()
    }

    #[test]
    fn test_generate_slug_sanitizes() {
        assert_eq!(generate_slug("St. Mary's   School!!", None), "st-marys-school");
        assert_eq!(generate_slug("  Albury  North  PS ", None), "albury-north-ps");
        assert_eq!(generate_slug("A -- B", None), "a-b");
        assert_eq!(generate_slug("-Lead & Trail-", None), "lead-trail");
        assert_eq!(generate_slug("Café Road", None), "caf-road");
        assert_eq!(generate_slug("Tab\tand\nnewline", None), "tab-and-newline");
    }

    #[test]
    fn test_generate_slug_empty_name() {
        assert_eq!(generate_slug("", None), "");
        assert_eq!(generate_slug("", Some("1234")), "");
    }

    #[test]
    fn test_generate_slug_disambiguator() {
        assert_eq!(generate_slug("Central School", Some("001")), "central-school-001");
        assert_eq!(generate_slug("Central School", Some("  AB12 ")), "central-school-ab12");
        assert_eq!(generate_slug("Central School", Some("   ")), "central-school");
        assert_eq!(generate_slug("Central School", None), "central-school");
    }

    #[test]
    fn test_generate_slug_punctuation_only_name() {
        assert_eq!(generate_slug("!!!", None), "");
        assert_eq!(generate_slug("!!!", Some("7")), "-7");
    }

    #[test]
    fn test_generate_slug_deterministic() {
        let name = "Parramatta West Public School";
        assert_eq!(generate_slug(name, None), generate_slug(name, None));
    }

    #[test]
    fn test_unique_slugs_collision_resolution() {
        let records = [named("Central School", "001"), named("Central School", "002")];
        let index = SlugIndex::build(&records);

        assert_eq!(slugs(&index), ["central-school-001", "central-school-002"]);
        assert_eq!(index.get("central-school"), None);
        assert_eq!(index.resolve(&records, "central-school-001"), Some(&records[0]));
        assert_eq!(index.resolve(&records, "central-school-002"), Some(&records[1]));
    }

    #[test]
    fn test_unique_slugs_singleton() {
        let records = [named("Unique Name", "X")];
        let index = SlugIndex::build(&records);
        assert_eq!(slugs(&index), ["unique-name"]);
    }

    #[test]
    fn test_round_trip_lookup() {
        let records = [
            named("Abbotsford Public School", "1001"),
            named("Central School", "1002"),
            named("Central School", "1003"),
            named("St. Mary's School", "1004"),
            named("central  school", "1005"),
            named("Zetland Public School", "1006"),
        ];
        let index = SlugIndex::build(&records);
        assert_eq!(index.len(), records.len());

        for (position, record) in records.iter().enumerate() {
            let slug = index.slug_of(position).unwrap();
            assert_eq!(find_by_slug(&records, slug), Some(record));
        }
    }

    #[test]
    fn test_adversarial_base_slug_matches_disambiguated_slug() {
        let records = [named("X 1", "c"), named("X", "1"), named("X", "2")];
        let index = SlugIndex::build(&records);

        assert_eq!(index.slug_of(0), Some("x-1-c"));
        assert_eq!(index.slug_of(1), Some("x-1"));
        assert_eq!(index.slug_of(2), Some("x-2"));
        for (position, record) in records.iter().enumerate() {
            let slug = index.slug_of(position).unwrap();
            assert_eq!(index.resolve(&records, slug), Some(record));
        }
    }

    #[test]
    fn test_clashing_coded_slugs_get_separated() {
        let records = [
            named("Ryde Public School", "100"),
            named("X 1", "c"),
            named("X", "1"),
            named("X", "1-c"),
        ];
        let index = SlugIndex::build(&records);

        assert_eq!(slugs(&index), ["ryde-public-school", "x-1--c", "x-1", "x--1-c"]);
        assert!(index.unroutable().is_empty());
        for (position, record) in records.iter().enumerate() {
            let slug = index.slug_of(position).unwrap();
            assert_eq!(find_by_slug(&records, slug), Some(record));
        }
        assert_eq!(find_by_slug(&records, "ryde-public-school"), Some(&records[0]));
    }

    #[test]
    fn test_duplicate_codes_keep_first() {
        let records = [
            named("Central School", "9"),
            named("Bega High School", "2"),
            named("Central School", "9"),
        ];
        let index = SlugIndex::build(&records);

        assert_eq!(slugs(&index), ["central-school--9", "bega-high-school"]);
        assert_eq!(index.unroutable(), &[2]);
        assert_eq!(find_by_slug(&records, "central-school--9"), Some(&records[0]));
        assert_eq!(find_by_slug(&records, "bega-high-school"), Some(&records[1]));
    }

    #[test]
    fn test_punctuation_only_names_are_unroutable() {
        let records = [named("!!!", "1"), named("???", "2"), named("...", "3")];
        let index = SlugIndex::build(&records);

        assert!(index.is_empty());
        assert_eq!(index.unroutable(), &[0, 1, 2]);
        assert_eq!(index.get("-1"), None);
    }

    #[test]
    fn test_empty_names_are_unroutable() {
        let records = [named("", "1"), named("Bega High School", "2"), named("", "3")];
        let index = SlugIndex::build(&records);

        assert_eq!(slugs(&index), ["bega-high-school"]);
        assert_eq!(index.unroutable(), &[0, 2]);
        assert_eq!(index.slug_of(0), None);
        assert_eq!(index.get(""), None);
    }

    #[test]
    fn test_find_by_slug_not_found() {
        let records = [named("Bega High School", "2")];
        assert_eq!(find_by_slug(&records, "nowhere"), None);
        assert_eq!(find_by_slug::<Named>(&[], "bega-high-school"), None);
    }

    #[test]
    fn test_slug_for_code_and_paths() {
        let records = [named("Ryde Public School", "3511"), named("Ryde High", "8222")];
        let index = SlugIndex::build(&records);

        assert_eq!(index.slug_for_code("8222"), Some("ryde-high"));
        assert_eq!(index.slug_for_code("nope"), None);
        let paths: Vec<_> = index.iter().map(SlugEntry::path).collect();
        assert_eq!(paths, ["/ryde-public-school", "/ryde-high"]);
    }

    #[test]
    fn test_possible_slugs() {
        assert_eq!(
            possible_slugs("Ryde Public School"),
            ["ryde-public-school", "ryde"]
        );
        assert_eq!(possible_slugs("Ryde PS"), ["ryde-ps", "ryde"]);
        assert_eq!(possible_slugs("Ryde Secondary"), ["ryde-secondary", "ryde"]);
        assert_eq!(possible_slugs("Ryde"), ["ryde"]);
        assert_eq!(
            possible_slugs("Bega high school"),
            ["bega-high-school", "bega"]
        );
    }

    #[test]
    fn test_slug_to_title() {
        assert_eq!(slug_to_title("st-marys-school"), "St Marys School");
        assert_eq!(slug_to_title("central-school-001"), "Central School 001");
        assert_eq!(slug_to_title(""), "");
    }
}
