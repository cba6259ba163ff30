use std::collections::{BTreeMap, HashMap};
use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer};

/// Canonical label -> raw variants, e.g. all spellings of one employer.
///
/// Entries keep the order of the source file. A variant listed under two
/// canonical labels resolves to the first one.
#[derive(Debug, Clone, Default)]
pub struct VariantTable {
    entries: Vec<(String, Vec<String>)>,
    index: HashMap<String, usize>,
}

impl VariantTable {
    pub fn new(entries: Vec<(String, Vec<String>)>) -> Self {
        let mut index = HashMap::new();
        for (position, (_, variants)) in entries.iter().enumerate() {
            for variant in variants {
                index.entry(variant.clone()).or_insert(position);
            }
        }
        Self { entries, index }
    }

    /// Canonical label whose variant set contains `raw`.
    pub fn canonical_for(&self, raw: &str) -> Option<&str> {
        self.index
            .get(raw)
            .map(|&position| self.entries[position].0.as_str())
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(canonical, variants)| (canonical.as_str(), variants.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<C, V> FromIterator<(C, Vec<V>)> for VariantTable
where
    C: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (C, Vec<V>)>>(iter: I) -> Self {
        Self::new(
            iter.into_iter()
                .map(|(canonical, variants)| {
                    (
                        canonical.into(),
                        variants.into_iter().map(Into::into).collect(),
                    )
                })
                .collect(),
        )
    }
}

impl<'de> Deserialize<'de> for VariantTable {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct OrderedEntries;

        impl<'de> Visitor<'de> for OrderedEntries {
            type Value = Vec<(String, Vec<String>)>;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("an object mapping canonical names to lists of variants")
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((canonical, variants)) = map.next_entry::<String, Vec<String>>()? {
                    entries.push((canonical, variants));
                }
                Ok(entries)
            }
        }

        deserializer
            .deserialize_map(OrderedEntries)
            .map(VariantTable::new)
    }
}

/// Code -> display name (NAICS sectors and industry groups, US states).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct CodeTable {
    names: BTreeMap<String, String>,
}

impl CodeTable {
    pub fn get(&self, code: &str) -> Option<&str> {
        self.names.get(code).map(String::as_str)
    }

    /// Entries in ascending code order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.names.iter().map(|(code, name)| (code.as_str(), name.as_str()))
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for CodeTable
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            names: iter
                .into_iter()
                .map(|(code, name)| (code.into(), name.into()))
                .collect(),
        }
    }
}

/// All lookup tables the pipeline needs. Built once, then shared behind an
/// `Arc` and never mutated.
#[derive(Debug, Clone, Default)]
pub struct MappingTables {
    employer_names: VariantTable,
    fatality_names: VariantTable,
    two_digit_naics: CodeTable,
    four_digit_naics: CodeTable,
    state_names: CodeTable,
}

impl MappingTables {
    pub fn new(
        employer_names: VariantTable,
        fatality_names: VariantTable,
        two_digit_naics: CodeTable,
        four_digit_naics: CodeTable,
        state_names: CodeTable,
    ) -> Self {
        Self {
            employer_names,
            fatality_names,
            two_digit_naics,
            four_digit_naics,
            state_names,
        }
    }

    pub fn employer_names(&self) -> &VariantTable {
        &self.employer_names
    }

    pub fn fatality_names(&self) -> &VariantTable {
        &self.fatality_names
    }

    pub fn two_digit_naics(&self) -> &CodeTable {
        &self.two_digit_naics
    }

    pub fn four_digit_naics(&self) -> &CodeTable {
        &self.four_digit_naics
    }

    pub fn state_names(&self) -> &CodeTable {
        &self.state_names
    }
}
