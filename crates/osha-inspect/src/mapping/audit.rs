//! Consistency reports over mapping tables, used while curating the JSON
//! files against a real dataset column.

use std::collections::{BTreeSet, HashSet};

use crate::filter::ALL;
use crate::mapping::tables::{MappingTables, VariantTable};

/// Every raw variant across all canonical entries, in file order.
pub fn all_variants(table: &VariantTable) -> Vec<&str> {
    table
        .entries()
        .flat_map(|(_, variants)| variants.iter().map(String::as_str))
        .collect()
}

/// Variants that never occur in `column_values`. A non-empty result usually
/// means a typo in the mapping file.
pub fn variants_absent_from<'a, I, S>(table: &'a VariantTable, column_values: I) -> Vec<&'a str>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let present: HashSet<String> = column_values
        .into_iter()
        .map(|value| value.as_ref().to_string())
        .collect();

    all_variants(table)
        .into_iter()
        .filter(|variant| !present.contains(*variant))
        .collect()
}

/// Number of raw variants folded into each canonical label.
pub fn variant_counts(table: &VariantTable) -> Vec<(&str, usize)> {
    table
        .entries()
        .map(|(canonical, variants)| (canonical, variants.len()))
        .collect()
}

/// Two-digit NAICS codes whose sector name is one of `sector_names`.
///
/// Several codes can share a name (e.g. 31, 32 and 33 are all
/// Manufacturing). The result is deduplicated and sorted.
pub fn sector_codes_for_names<S: AsRef<str>>(
    sector_names: &[S],
    tables: &MappingTables,
) -> Vec<String> {
    let wanted: HashSet<&str> = sector_names.iter().map(|name| name.as_ref()).collect();

    tables
        .two_digit_naics()
        .iter()
        .filter(|(_, name)| wanted.contains(name))
        .map(|(code, _)| code.to_string())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Distinct sector names, sorted, with the wildcard first. Matches the
/// choices a sector selector offers.
pub fn sector_choices(tables: &MappingTables) -> Vec<String> {
    let names: BTreeSet<&str> = tables.two_digit_naics().iter().map(|(_, name)| name).collect();

    std::iter::once(ALL.to_string())
        .chain(names.into_iter().map(str::to_string))
        .collect()
}
