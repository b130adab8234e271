use {
    super::Right,
    crate::{CapError, CapResult},
    core::{fmt, iter::FromIterator},
    lazy_static::lazy_static,
};

/// Layout version of the packing scheme. Encoded in the top bits of
/// word 0 and checked by the enforcement boundary.
pub const RIGHTS_VERSION: u64 = 0;

/// Number of storage words a set of this version occupies.
pub const RIGHTS_WORDS: usize = RIGHTS_VERSION as usize + 2;

/// Bits 0..=56 of each word carry rights.
const RIGHTS_MASK: u64 = 0x01ff_ffff_ffff_ffff;
/// Bits 57..=61 carry the one-hot word-index tag.
const INDEX_MASK: u64 = 0x1f << 57;
const VERSION_SHIFT: u32 = 62;

lazy_static! {
    static ref ALL_RIGHTS: RightsSet = Right::iter().collect();
}

/// Which storage word an encoded right lives in.
fn word_of(bits: u64) -> usize {
    ((bits >> 57) & 0x1f).trailing_zeros() as usize
}

/// An owned set of capability rights in the multi-word packed layout the
/// enforcement boundary consumes.
///
/// The empty set is not all-zero: every word carries its index tag and
/// word 0 carries the layout version (see [`RightsSet::new`]). All
/// mutators return `&mut Self` so construction chains; `dst`/`src`
/// aliasing in [`merge`]/[`remove`] is ruled out by the borrow rules.
///
/// [`merge`]: RightsSet::merge
/// [`remove`]: RightsSet::remove
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct RightsSet([u64; RIGHTS_WORDS]);

impl RightsSet {
    /// Create the canonical empty set.
    pub fn new() -> Self {
        let mut words = [0u64; RIGHTS_WORDS];
        for (i, word) in words.iter_mut().enumerate() {
            *word = 1 << (57 + i as u64);
        }
        words[0] |= RIGHTS_VERSION << VERSION_SHIFT;
        RightsSet(words)
    }

    /// The set holding every defined right.
    pub fn all() -> Self {
        *ALL_RIGHTS
    }

    /// Add `right` to the set.
    pub fn set(&mut self, right: Right) -> &mut Self {
        let bits = right.bits();
        self.0[word_of(bits)] |= bits;
        self
    }

    /// Drop `right` from the set.
    ///
    /// Removes every bit the right encodes, whether or not it was set;
    /// rights sharing bits with `right` (a composite and its parts) lose
    /// those bits with it.
    pub fn clear(&mut self, right: Right) -> &mut Self {
        let bits = right.bits();
        self.0[word_of(bits)] &= !(bits & RIGHTS_MASK);
        self
    }

    /// Whether every bit `right` encodes is present.
    pub fn is_set(&self, right: Right) -> bool {
        let bits = right.bits();
        self.0[word_of(bits)] & bits == bits
    }

    /// Union `other` into `self`.
    pub fn merge(&mut self, other: &Self) -> &mut Self {
        for (dst, src) in self.0.iter_mut().zip(other.0.iter()) {
            *dst |= src;
        }
        self
    }

    /// Set difference: drop every right bit present in `other`.
    /// `other` keeps its index tags; so does `self`.
    pub fn remove(&mut self, other: &Self) -> &mut Self {
        for (dst, src) in self.0.iter_mut().zip(other.0.iter()) {
            *dst &= !(src & RIGHTS_MASK);
        }
        self
    }

    /// Subset test: whether every bit set in `little` is set in `self`.
    pub fn contains(&self, little: &Self) -> bool {
        self.0
            .iter()
            .zip(little.0.iter())
            .all(|(big, little)| big & little == *little)
    }

    /// Whether no right is held.
    pub fn is_empty(&self) -> bool {
        *self == Self::new()
    }

    /// Structural well-formedness: the version field matches, every word
    /// carries its own index tag, and no bit outside the defined rights
    /// is set. Must hold before the set is handed to the enforcement
    /// boundary; the boundary re-checks and refuses invalid sets with an
    /// opaque error, so failing fast here gives the precise diagnosis.
    pub fn is_valid(&self) -> bool {
        if self.0[0] >> VERSION_SHIFT != RIGHTS_VERSION {
            return false;
        }
        for (i, &word) in self.0.iter().enumerate() {
            if word & INDEX_MASK != 1 << (57 + i as u64) {
                return false;
            }
        }
        Self::all().contains(self)
    }

    /// Adopt a raw word layout, e.g. received across a serialization
    /// boundary. Malformed input is rejected, never adopted.
    pub fn from_raw(words: [u64; RIGHTS_WORDS]) -> CapResult<Self> {
        let set = RightsSet(words);
        if set.is_valid() {
            Ok(set)
        } else {
            warn!("rights: rejecting malformed raw set {:#x?}", words);
            Err(CapError::EINVAL)
        }
    }

    /// The raw word layout handed to the enforcement boundary.
    pub fn as_raw(&self) -> [u64; RIGHTS_WORDS] {
        self.0
    }
}

impl Default for RightsSet {
    fn default() -> Self {
        Self::new()
    }
}

impl FromIterator<Right> for RightsSet {
    fn from_iter<I: IntoIterator<Item = Right>>(iter: I) -> Self {
        let mut set = RightsSet::new();
        set.extend(iter);
        set
    }
}

impl Extend<Right> for RightsSet {
    fn extend<I: IntoIterator<Item = Right>>(&mut self, iter: I) {
        for right in iter {
            self.set(right);
        }
    }
}

impl fmt::Debug for RightsSet {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("RightsSet(")?;
        let mut sep = "";
        for right in Right::iter().filter(|r| self.is_set(*r)) {
            write!(f, "{}{}", sep, right.name())?;
            sep = " | ";
        }
        f.write_str(")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rights(rs: &[Right]) -> RightsSet {
        rs.iter().copied().collect()
    }

    #[test]
    fn empty_set_is_valid_and_not_zero() {
        let set = RightsSet::new();
        assert!(set.is_valid());
        assert!(set.is_empty());
        assert_eq!(set.as_raw(), [1 << 57, 1 << 58]);
        assert_eq!(set, RightsSet::default());
    }

    #[test]
    fn membership_round_trip() {
        for right in Right::iter() {
            let mut set = RightsSet::new();
            set.set(right);
            assert!(set.is_valid(), "{} breaks validity", right);
            for other in Right::iter() {
                // A composite legitimately implies the rights whose bits
                // it subsumes; everything else must stay clear.
                let implied = right.bits() & other.bits() == other.bits();
                assert_eq!(set.is_set(other), implied, "{} vs {}", right, other);
            }
        }
    }

    #[test]
    fn set_and_clear_are_idempotent() {
        let mut once = RightsSet::new();
        once.set(Right::Bind);
        let mut twice = once;
        twice.set(Right::Bind);
        assert_eq!(once, twice);

        once.clear(Right::Bind);
        twice.clear(Right::Bind);
        twice.clear(Right::Bind);
        assert_eq!(once, twice);
        assert_eq!(once, RightsSet::new());
    }

    #[test]
    fn merge_contains_both_operands() {
        let a = rights(&[Right::Read, Right::Write]);
        let b = rights(&[Right::Seek, Right::Event]);
        let mut merged = a;
        merged.merge(&b);
        assert!(merged.contains(&a));
        assert!(merged.contains(&b));
        assert!(merged.is_valid());
    }

    #[test]
    fn remove_is_set_difference() {
        let a = rights(&[Right::Read, Right::Write]);
        let b = rights(&[Right::Bind, Right::Listen]);
        let mut merged = a;
        merged.merge(&b);
        merged.remove(&b);
        assert_eq!(merged, a);
        assert!(!merged.is_set(Right::Bind));
        assert!(!merged.is_set(Right::Listen));
    }

    #[test]
    fn remove_preserves_packing() {
        let mut set = RightsSet::all();
        set.remove(&RightsSet::all());
        assert_eq!(set, RightsSet::new());
        assert!(set.is_valid());
    }

    #[test]
    fn contains_is_a_partial_order() {
        let a = rights(&[Right::Read]);
        let ab = rights(&[Right::Read, Right::Write]);
        let abc = rights(&[Right::Read, Right::Write, Right::Seek]);
        // Reflexive, transitive, antisymmetric up to set equality.
        assert!(a.contains(&a));
        assert!(ab.contains(&a) && abc.contains(&ab) && abc.contains(&a));
        assert!(!a.contains(&ab));
        let a2 = rights(&[Right::Read]);
        assert!(a.contains(&a2) && a2.contains(&a) && a == a2);
    }

    #[test]
    fn scenario_read_write_plus_seek() {
        let mut a = rights(&[Right::Read, Right::Write]);
        let b = rights(&[Right::Seek]);
        a.merge(&b);
        assert!(a.is_set(Right::Read));
        assert!(a.is_set(Right::Write));
        assert!(a.is_set(Right::Seek));
        assert!(!a.is_set(Right::Bind));
        assert_eq!(a, rights(&[Right::Read, Right::Write, Right::Seek]));
    }

    #[test]
    fn chaining_builds_one_set() {
        let mut chained = RightsSet::new();
        chained
            .set(Right::Read)
            .set(Right::Write)
            .merge(&rights(&[Right::Seek]));
        assert_eq!(chained, rights(&[Right::Read, Right::Write, Right::Seek]));
    }

    #[test]
    fn clearing_shared_bits_affects_composites() {
        let mut set = rights(&[Right::Pread]);
        set.clear(Right::Read);
        assert!(!set.is_set(Right::Pread));
        assert!(!set.is_set(Right::Read));
        assert!(set.is_set(Right::Seek));
    }

    #[test]
    fn from_raw_round_trips_valid_sets() {
        let set = rights(&[Right::Read, Right::Ioctl, Right::Kqueue]);
        assert_eq!(RightsSet::from_raw(set.as_raw()), Ok(set));
    }

    #[test]
    fn from_raw_rejects_reserved_bits() {
        // The word-0 slot FreeBSD reserves for a right outside the
        // enumeration must never appear set.
        let mut raw = RightsSet::new().as_raw();
        raw[0] |= 0x0000_0000_0400_0000;
        assert_eq!(RightsSet::from_raw(raw), Err(CapError::EINVAL));
    }

    #[test]
    fn from_raw_rejects_bad_packing() {
        // Wrong index tag in word 1.
        assert_eq!(
            RightsSet::from_raw([1 << 57, 1 << 57]),
            Err(CapError::EINVAL)
        );
        // Unknown layout version.
        assert_eq!(
            RightsSet::from_raw([(1 << 62) | (1 << 57), 1 << 58]),
            Err(CapError::EINVAL)
        );
    }

    #[test]
    fn all_rights_set_is_valid() {
        let all = RightsSet::all();
        assert!(all.is_valid());
        for right in Right::iter() {
            assert!(all.is_set(right), "{} missing from all()", right);
        }
    }

    #[test]
    fn debug_lists_right_names() {
        let set = rights(&[Right::Read, Right::Write]);
        assert_eq!(format!("{:?}", set), "RightsSet(read | write)");
        assert_eq!(format!("{:?}", RightsSet::new()), "RightsSet()");
    }
}
