use alloc::vec;
use alloc::vec::Vec;

/// Distribute `n` over `weights` proportionally.
///
/// Each position first gets `floor(n * w_i / sum(w))`; the residual is
/// then handed out one unit at a time to the positions with the largest
/// fractional remainder, ties broken by ascending index. If every weight
/// is zero, every share is zero regardless of `n`.
pub fn partition_natural(n: u64, weights: &[u64]) -> Vec<u64> {
    let total_weight: u128 = weights.iter().map(|&w| w as u128).sum();
    if total_weight == 0 {
        return vec![0; weights.len()];
    }

    let n = n as u128;
    let mut shares = Vec::with_capacity(weights.len());
    let mut remainders = Vec::with_capacity(weights.len());
    let mut distributed: u128 = 0;
    for &w in weights {
        let product = n * w as u128;
        let share = product / total_weight;
        let remainder = product % total_weight;
        distributed += share;
        shares.push(share);
        remainders.push(remainder);
    }

    let mut residual = n - distributed;
    let mut order: Vec<usize> = (0..weights.len()).collect();
    order.sort_by(|&a, &b| remainders[b].cmp(&remainders[a]).then(a.cmp(&b)));
    for &index in order.iter() {
        if residual == 0 {
            break;
        }
        shares[index] += 1;
        residual -= 1;
    }

    shares.into_iter().map(|s| s as u64).collect()
}

/// Coalesce `values` down to exactly `target_len` entries, preserving the
/// total.
///
/// Sorts descending and repeatedly merges the two smallest remaining
/// values until `target_len` remain, so the highest-variance (largest)
/// values end up concentrated rather than split thin. If `target_len >=
/// values.len()`, the list is padded with zeros instead — merging cannot
/// grow a list, only shrink it.
pub fn pad_coalesce(mut values: Vec<u64>, target_len: usize) -> Vec<u64> {
    if target_len >= values.len() {
        values.resize(target_len, 0);
        return values;
    }
    if target_len == 0 {
        return Vec::new();
    }

    values.sort_unstable_by(|a, b| b.cmp(a));
    while values.len() > target_len {
        let last = values.pop().unwrap();
        let second_last = values.pop().unwrap();
        let merged = last + second_last;
        let insert_at = values.partition_point(|&v| v > merged);
        values.insert(insert_at, merged);
    }
    values
}
