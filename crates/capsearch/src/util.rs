//! Small combinatorial and modular helpers shared by the search layers.

/// All k-subsets of `0..n` as ascending index vectors, in lexicographic order.
pub(crate) fn combinations(n: usize, k: usize) -> Vec<Vec<usize>> {
    if k > n {
        return Vec::new();
    }
    let mut out = Vec::new();
    let mut idx: Vec<usize> = (0..k).collect();
    loop {
        out.push(idx.clone());
        // Rightmost position that can still advance.
        let Some(pos) = (0..k).rev().find(|&i| idx[i] != i + n - k) else {
            return out;
        };
        idx[pos] += 1;
        for j in pos + 1..k {
            idx[j] = idx[j - 1] + 1;
        }
    }
}

pub(crate) fn is_prime(q: u32) -> bool {
    if q < 2 {
        return false;
    }
    let mut f = 2u32;
    while (f as u64) * (f as u64) <= q as u64 {
        if q % f == 0 {
            return false;
        }
        f += 1;
    }
    true
}

/// `a^-1 mod q` for prime q and `a != 0 (mod q)` (Fermat).
pub(crate) fn inv_mod(a: u64, q: u64) -> u64 {
    let mut base = a % q;
    let mut exp = q - 2;
    let mut acc = 1u64;
    while exp > 0 {
        if exp & 1 == 1 {
            acc = acc * base % q;
        }
        base = base * base % q;
        exp >>= 1;
    }
    acc
}

/// Rank over Z/qZ (q prime) of the given row vectors.
pub(crate) fn rank_mod(mut rows: Vec<Vec<u64>>, q: u64) -> usize {
    let cols = rows.first().map_or(0, |r| r.len());
    let mut rank = 0;
    for c in 0..cols {
        let Some(pivot) = (rank..rows.len()).find(|&r| rows[r][c] % q != 0) else {
            continue;
        };
        rows.swap(rank, pivot);
        let inv = inv_mod(rows[rank][c], q);
        for v in rows[rank].iter_mut() {
            *v = *v * inv % q;
        }
        for r in 0..rows.len() {
            if r == rank || rows[r][c] % q == 0 {
                continue;
            }
            let factor = rows[r][c] % q;
            for k in 0..cols {
                let sub = factor * rows[rank][k] % q;
                rows[r][k] = (rows[r][k] % q + q - sub) % q;
            }
        }
        rank += 1;
        if rank == rows.len() {
            break;
        }
    }
    rank
}
