use std::collections::BTreeMap;

/// occurrences of each symbol, keyed in the symbols' natural order
pub type FrequencyTable<S> = BTreeMap<S, usize>;

/// count occurrences of each symbol
pub fn count_occurrences<I, S>(symbols: I) -> FrequencyTable<S>
where
    I: IntoIterator<Item = S>,
    S: Ord,
{
    let mut occurrences = FrequencyTable::new();
    for symbol in symbols {
        *occurrences.entry(symbol).or_insert(0) += 1;
    }
    log::trace!("counted {} distinct symbols", occurrences.len());
    occurrences
}

/// sum partial frequency tables, e.g. ones counted over separate chunks of the input
pub fn merge_occurrences<S, I>(tables: I) -> FrequencyTable<S>
where
    I: IntoIterator<Item = FrequencyTable<S>>,
    S: Ord,
{
    let mut merged = FrequencyTable::new();
    for table in tables {
        for (symbol, count) in table {
            *merged.entry(symbol).or_insert(0) += count;
        }
    }
    merged
}
