//! Largest-remainder apportioning, shared by loss distribution and loot.

use std::collections::BTreeMap;

/// Split `amount` across keys in proportion to `shares`.
///
/// Every key first gets the floor of its exact quota; the units left over go
/// one each to the largest fractional remainders, ties broken by key order.
/// The result sums to `min(amount, Σ shares)` and no key receives more than
/// its share. Keys that receive nothing are omitted.
pub fn apportion<K: Ord + Clone>(shares: &BTreeMap<K, u64>, amount: u64) -> BTreeMap<K, u64> {
    let total: u128 = shares.values().map(|share| u128::from(*share)).sum();
    let mut out = BTreeMap::new();
    if total == 0 || amount == 0 {
        return out;
    }
    let amount = u128::from(amount).min(total);

    let mut given: u128 = 0;
    let mut remainders = Vec::with_capacity(shares.len());
    for (key, share) in shares {
        let exact = amount * u128::from(*share);
        let base = exact / total;
        let remainder = exact % total;
        given += base;
        if base > 0 {
            out.insert(key.clone(), base as u64);
        }
        if remainder > 0 {
            remainders.push((remainder, key));
        }
    }

    // Stable sort keeps key order among equal remainders.
    remainders.sort_by(|a, b| b.0.cmp(&a.0));
    let leftover = (amount - given) as usize;
    for (_, key) in remainders.into_iter().take(leftover) {
        *out.entry(key.clone()).or_default() += 1;
    }
    out
}
