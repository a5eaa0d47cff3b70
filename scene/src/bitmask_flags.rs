//! Collision filter groups used to decide which contacts get reported.
//!
//! Every actor carries a [`FilterData`]: `word0` says which groups the actor is in,
//! `word1` which groups it wants to hear about. A contact pair is reported only when
//! both sides accept each other.

use num_traits::{One, PrimInt};

/// Trait implemented by flag enums declared with [`define_bitmask_flags!`].
pub trait FlagBitmask {
    type Storage: PrimInt;

    fn bit_index(&self) -> u8;

    fn mask(&self) -> Self::Storage {
        // NOTE: `bit_index()` must be < number of bits in `Storage`.
        Self::Storage::one() << (self.bit_index() as usize)
    }
}

/// A bitmask over some flag enum.
#[derive(Default, Copy, Clone, Debug, PartialEq, Eq)]
pub struct BitmaskFlags<T: PrimInt> {
    pub bits: T,
}

impl<T: PrimInt> BitmaskFlags<T> {
    pub fn new(bits: T) -> Self {
        Self { bits }
    }

    pub fn from_flags<U: FlagBitmask<Storage = T> + Copy>(flags: &[U]) -> Self {
        let mut mask = Self::new(T::zero());
        mask.add_many(flags);
        mask
    }

    pub fn add<U: FlagBitmask<Storage = T>>(&mut self, flag: U) {
        self.bits = self.bits | flag.mask();
    }

    pub fn remove<U: FlagBitmask<Storage = T>>(&mut self, flag: U) {
        self.bits = self.bits & !flag.mask();
    }

    pub fn has<U: FlagBitmask<Storage = T>>(&self, flag: U) -> bool {
        (self.bits & flag.mask()) != T::zero()
    }

    pub fn add_many<U: FlagBitmask<Storage = T> + Copy>(&mut self, flags: &[U]) {
        for &flag in flags {
            self.add(flag);
        }
    }

    /// True if the two masks share at least one bit.
    pub fn intersects(&self, other: &Self) -> bool {
        (self.bits & other.bits) != T::zero()
    }

    pub fn is_empty(&self) -> bool {
        self.bits == T::zero()
    }
}

/// Declare a bitmask-backed enum and implement `FlagBitmask` for it.
///
/// ```rust
/// scene::define_bitmask_flags!(Layer, u8, {
///     Ground,
///     Props,
/// });
/// ```
#[macro_export]
macro_rules! define_bitmask_flags {
    ($name:ident, $storage:ty, { $($variant:ident),* $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        #[repr(u8)]
        pub enum $name {
            $($variant),*
        }

        impl $crate::bitmask_flags::FlagBitmask for $name {
            type Storage = $storage;

            fn bit_index(&self) -> u8 {
                *self as u8
            }
        }
    };
}

define_bitmask_flags!(FilterGroup, u32, {
    Actor0,
    Actor1,
    Actor2,
});

pub type FilterMask = BitmaskFlags<u32>;

/// Filter words attached to an actor.
#[derive(Default, Copy, Clone, Debug, PartialEq, Eq)]
pub struct FilterData {
    /// Groups this actor belongs to.
    pub word0: FilterMask,
    /// Groups whose contacts with this actor should be reported.
    pub word1: FilterMask,
}

impl FilterData {
    pub fn new(member: &[FilterGroup], reports: &[FilterGroup]) -> Self {
        Self {
            word0: FilterMask::from_flags(member),
            word1: FilterMask::from_flags(reports),
        }
    }
}

/// Should a contact between `a` and `b` be reported?
pub fn pair_notifies(a: &FilterData, b: &FilterData) -> bool {
    a.word0.intersects(&b.word1) && b.word0.intersects(&a.word1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_map_to_consecutive_bits() {
        assert_eq!(FilterGroup::Actor0.mask(), 1);
        assert_eq!(FilterGroup::Actor1.mask(), 2);
        assert_eq!(FilterGroup::Actor2.mask(), 4);
    }

    #[test]
    fn add_remove_has() {
        let mut mask = FilterMask::default();
        assert!(mask.is_empty());

        mask.add(FilterGroup::Actor1);
        assert!(mask.has(FilterGroup::Actor1));
        assert!(!mask.has(FilterGroup::Actor0));

        mask.remove(FilterGroup::Actor1);
        assert!(mask.is_empty());
    }

    #[test]
    fn pair_needs_mutual_interest() {
        let ball = FilterData::new(&[FilterGroup::Actor0], &[FilterGroup::Actor1]);
        let post = FilterData::new(&[FilterGroup::Actor1], &[FilterGroup::Actor0]);
        let deaf = FilterData::new(&[FilterGroup::Actor1], &[]);

        assert!(pair_notifies(&ball, &post));
        assert!(pair_notifies(&post, &ball));
        assert!(!pair_notifies(&ball, &deaf));
        assert!(!pair_notifies(&deaf, &ball));
        assert!(!pair_notifies(&FilterData::default(), &FilterData::default()));
    }
}
