use std::sync::atomic::AtomicBool;

/// One flag per point index; `true` means the point may still join the cap.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValiditySet {
    bits: Vec<bool>,
}

impl ValiditySet {
    /// Every point of a space with `size` points is valid.
    pub fn all_valid(size: usize) -> Self {
        Self {
            bits: vec![true; size],
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    #[inline]
    pub fn is_valid(&self, index: usize) -> bool {
        self.bits.get(index).copied().unwrap_or(false)
    }

    pub fn count_valid(&self) -> usize {
        self.bits.iter().filter(|&&b| b).count()
    }

    /// Valid indices `>= cursor`, ascending.
    pub fn valid_from(&self, cursor: usize) -> impl Iterator<Item = usize> + '_ {
        self.bits
            .iter()
            .enumerate()
            .skip(cursor)
            .filter_map(|(i, &b)| b.then_some(i))
    }

    /// True when every point valid here is also valid in `other`.
    pub fn is_subset_of(&self, other: &ValiditySet) -> bool {
        self.len() == other.len() && self.bits.iter().zip(&other.bits).all(|(&a, &b)| !a || b)
    }

    pub(crate) fn to_shared(&self) -> Vec<AtomicBool> {
        self.bits.iter().map(|&b| AtomicBool::new(b)).collect()
    }

    pub(crate) fn from_shared(shared: Vec<AtomicBool>) -> Self {
        Self {
            bits: shared.into_iter().map(AtomicBool::into_inner).collect(),
        }
    }
}
