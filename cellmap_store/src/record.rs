// Copyright 2025 the Cellmap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Payload contract and the duplicate-index policy.

/// Policy applied when an insert targets an already-occupied index.
///
/// Every backend carries one of these as a runtime configuration value fixed
/// at construction; there is no global policy state.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum DuplicatePolicy {
    /// Discard the prior record and rebuild it from the new arguments alone.
    #[default]
    Replace,
    /// Aggregate the new arguments into the existing record in place.
    Merge,
}

/// Caller-supplied payload stored per distinct cell index.
///
/// `A` is the caller's argument bundle (a sample, a weight, a tuple).
/// The record interprets the policy itself: [`DuplicatePolicy::Replace`]
/// conventionally rebuilds via [`Record::create`], while
/// [`DuplicatePolicy::Merge`] accumulates statistics.
///
/// ```
/// use cellmap_store::{DuplicatePolicy, Record};
///
/// struct Count(u32);
///
/// impl Record<u32> for Count {
///     fn create(n: u32) -> Self {
///         Self(n)
///     }
///
///     fn merge(&mut self, policy: DuplicatePolicy, n: u32) {
///         match policy {
///             DuplicatePolicy::Replace => *self = Self::create(n),
///             DuplicatePolicy::Merge => self.0 += n,
///         }
///     }
/// }
/// ```
pub trait Record<A>: Sized {
    /// Construct a fresh record from the caller's arguments.
    fn create(args: A) -> Self;

    /// Combine new arguments into this record under the given policy.
    fn merge(&mut self, policy: DuplicatePolicy, args: A);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_policy_is_replace() {
        assert_eq!(DuplicatePolicy::default(), DuplicatePolicy::Replace);
    }
}
