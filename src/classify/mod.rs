//! BGC class parsing and canonical category combination keys.
//!
//! antiSMASH assigns one or more fine-grained classes to each detected region.
//! Classes are mapped into the 7 coarse categories, and the sorted set of
//! categories becomes a combination key that downstream grouping relies on.

#[cfg(test)]
mod tests;

use crate::dataset::regions::BgcRegion;
use crate::utils::table::Table;
use color_eyre::eyre::{eyre, Report, Result, WrapErr};
use color_eyre::Help;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use std::str::FromStr;
use strum::EnumIter;

/// Fixed group label for combinations lumped below the frequency threshold.
pub const OTHER_HYBRIDS: &str = "All other hybrids";

/// Combination kept distinct regardless of frequency.
pub const NRP_POLYKETIDE: &str = "NRP, Polyketide";

/// Default minimum combination count to escape lumping.
pub const LUMP_THRESHOLD: usize = 80;

// ----------------------------------------------------------------------------
// Category
// ----------------------------------------------------------------------------

/// Coarse BGC category that antiSMASH classes are mapped into.
///
/// Variants are declared in lexicographic order of their labels, so the
/// derived [`Ord`] matches the canonical order of combination keys.
#[derive(
    Clone, Copy, Debug, Deserialize, EnumIter, Eq, Ord, PartialEq, PartialOrd, Serialize,
)]
pub enum Category {
    Alkaloid,
    #[serde(rename = "NRP")]
    Nrp,
    Other,
    Polyketide,
    #[serde(rename = "RiPP")]
    Ripp,
    Saccharide,
    Terpene,
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Category::Alkaloid => "Alkaloid",
            Category::Nrp => "NRP",
            Category::Other => "Other",
            Category::Polyketide => "Polyketide",
            Category::Ripp => "RiPP",
            Category::Saccharide => "Saccharide",
            Category::Terpene => "Terpene",
        };

        write!(f, "{}", name)
    }
}

impl FromStr for Category {
    type Err = Report;

    /// Convert a string to a BGC category.
    fn from_str(name: &str) -> Result<Self, Report> {
        let category = match name {
            "Alkaloid" => Category::Alkaloid,
            "NRP" => Category::Nrp,
            "Other" => Category::Other,
            "Polyketide" => Category::Polyketide,
            "RiPP" => Category::Ripp,
            "Saccharide" => Category::Saccharide,
            "Terpene" => Category::Terpene,
            _ => Err(eyre!("Unknown BGC category: {name:?}")
                .suggestion("Options: Alkaloid, NRP, Other, Polyketide, RiPP, Saccharide, Terpene"))?,
        };

        Ok(category)
    }
}

// ----------------------------------------------------------------------------
// Raw Classes
// ----------------------------------------------------------------------------

/// The raw class annotation of one region.
///
/// The region table holds either a bare class name (`"terpene"`) or a
/// JSON-encoded list of class names (`'["NRPS", "T1PKS"]'`) when a region
/// matched several detection rules.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum RawClasses {
    Single(String),
    List(Vec<String>),
}

impl Default for RawClasses {
    fn default() -> Self {
        RawClasses::Single(String::new())
    }
}

impl RawClasses {
    /// The individual class names, in input order.
    pub fn names(&self) -> Vec<&str> {
        match self {
            RawClasses::Single(name) => vec![name.as_str()],
            RawClasses::List(names) => names.iter().map(|name| name.as_str()).collect_vec(),
        }
    }
}

impl FromStr for RawClasses {
    type Err = Report;

    /// Decide single vs. list syntactically: a leading `[` marks a JSON array
    /// literal, anything else is one class name.
    fn from_str(field: &str) -> Result<Self, Report> {
        let field = field.trim();
        if field.starts_with('[') {
            let names: Vec<String> = serde_json::from_str(field)
                .wrap_err_with(|| eyre!("Failed to parse class list: {field:?}"))?;
            Ok(RawClasses::List(names))
        } else {
            Ok(RawClasses::Single(field.to_string()))
        }
    }
}

// ----------------------------------------------------------------------------
// Class Map
// ----------------------------------------------------------------------------

/// Lookup from antiSMASH class names to coarse categories.
///
/// Every class value appearing in any region must resolve to exactly one
/// category; an unresolved class means the reference table has fallen out of
/// sync with the annotation tool and aborts the run.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct ClassMap {
    map: BTreeMap<String, Category>,
}

impl ClassMap {
    pub fn new() -> Self {
        ClassMap::default()
    }

    /// Read the class reference table (columns `class`, `category`).
    pub fn read(path: &Path) -> Result<ClassMap, Report> {
        let table = Table::read(path)?;

        let mut map = BTreeMap::new();
        for row in 0..table.rows.len() {
            let class = table.get("class", row)?;
            let category = Category::from_str(table.get("category", row)?)
                .wrap_err_with(|| format!("Failed to parse class table: {path:?}"))?;
            map.insert(class.to_string(), category);
        }

        Ok(ClassMap { map })
    }

    pub fn insert(&mut self, class: &str, category: Category) {
        self.map.insert(class.to_string(), category);
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Look up the category of one class name.
    pub fn category(&self, class: &str) -> Result<Category, Report> {
        match self.map.get(class) {
            Some(category) => Ok(*category),
            None => Err(eyre!("BGC class {class:?} has no category mapping."))
                .suggestion("The class reference table is out of sync with the annotation tool.")
                .suggestion("Add the missing class to the class categories table and re-run."),
        }
    }

    /// Resolve a raw class annotation into its ordered category set.
    ///
    /// Deterministic and order-insensitive: the same multiset of classes
    /// always yields the same set, whatever order the input listed them in.
    pub fn classify(&self, raw: &RawClasses) -> Result<BTreeSet<Category>, Report> {
        raw.names().into_iter().map(|name| self.category(name)).collect()
    }
}

// ----------------------------------------------------------------------------
// Combinations
// ----------------------------------------------------------------------------

/// Canonical combination key: sorted, de-duplicated category labels joined
/// with `", "`. Downstream grouping depends on string equality of these keys.
pub fn combination(categories: &BTreeSet<Category>) -> String {
    categories.iter().join(", ")
}

/// Collapse an infrequent combination into the [`OTHER_HYBRIDS`] group.
///
/// `"NRP, Polyketide"` is biologically notable and always kept distinct.
/// Applying the function twice is idempotent: the lumped label maps to
/// itself.
pub fn lump(combination: &str, count: usize, threshold: usize) -> String {
    if combination == OTHER_HYBRIDS || combination == NRP_POLYKETIDE || count >= threshold {
        combination.to_string()
    } else {
        OTHER_HYBRIDS.to_string()
    }
}

/// Classification stage: resolve each region's raw classes and attach the
/// canonical combination key.
pub fn classify_regions(
    regions: &[BgcRegion],
    class_map: &ClassMap,
) -> Result<Vec<BgcRegion>, Report> {
    regions
        .iter()
        .map(|region| {
            let categories = class_map.classify(&region.classes).wrap_err_with(|| {
                format!("Failed to classify region of genome: {}", region.accession)
            })?;
            let mut region = region.clone();
            region.combination = combination(&categories);
            region.categories = categories.into_iter().collect_vec();
            Ok(region)
        })
        .collect()
}

/// Rank combination keys by frequency, descending. Ties break alphabetically
/// so the ranking is stable.
pub fn rank_combinations(regions: &[BgcRegion]) -> Vec<(String, usize)> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    regions.iter().for_each(|region| {
        *counts.entry(&region.combination).or_default() += 1;
    });

    counts
        .into_iter()
        .map(|(combination, count)| (combination.to_string(), count))
        .sorted_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)))
        .collect_vec()
}
