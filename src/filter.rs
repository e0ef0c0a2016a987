// Currency Basics - Search Filter
// Narrows a currency list as the user types

use crate::currency::CurrencyRecord;

/// Filter `records` by a raw search `query`.
///
/// A blank query (empty or whitespace only) returns the full list. Otherwise a
/// record matches when, compared case-insensitively, its name starts with the
/// query, some later word of its name starts with the query, or its symbol
/// starts with the query. Matches keep their original order.
///
/// Only the blank check trims. The comparison uses the query exactly as typed,
/// so `"bitcoin "` matches `"Bitcoin Cash"` but not `"Bitcoin"`, and `" cash"`
/// matches nothing.
pub fn filter_currencies(records: &[CurrencyRecord], query: &str) -> Vec<CurrencyRecord> {
    if query.trim().is_empty() {
        return records.to_vec();
    }

    let search_term = query.to_lowercase();

    records
        .iter()
        .filter(|record| matches_query(record, &search_term))
        .cloned()
        .collect()
}

/// Check one record against an already lower-cased search term
pub fn matches_query(record: &CurrencyRecord, search_term: &str) -> bool {
    let name = record.name.to_lowercase();
    let symbol = record.symbol.to_lowercase();

    name.starts_with(search_term)
        || name.contains(&format!(" {}", search_term))
        || symbol.starts_with(search_term)
}
