use tracing::trace;

use crate::error::{StoreError, StoreResult};
use crate::traits::Store;

/// A primary store with a secondary fallback.
///
/// The primary is always consulted first and its successful result is
/// final, even when the content is empty. The secondary is consulted only
/// when the primary reports [`StoreError::NotFound`]; its answer, success
/// or failure, is then returned as-is. Any other primary error propagates
/// without fallback.
///
/// Aggregates nest: an `AggregateStore` can be either member of another,
/// and [`chain_stores`] builds an ordered chain of any length.
#[derive(Clone, Debug)]
pub struct AggregateStore<P, S> {
    primary: P,
    secondary: S,
}

impl<P: Store, S: Store> AggregateStore<P, S> {
    /// Compose `primary` with `secondary` as its fallback.
    pub fn new(primary: P, secondary: S) -> Self {
        Self { primary, secondary }
    }

    /// The store consulted first.
    pub fn primary(&self) -> &P {
        &self.primary
    }

    /// The store consulted when the primary has nothing.
    pub fn secondary(&self) -> &S {
        &self.secondary
    }

    /// Take the member stores back.
    pub fn into_parts(self) -> (P, S) {
        (self.primary, self.secondary)
    }
}

impl<P: Store, S: Store> Store for AggregateStore<P, S> {
    fn read(&self, path: &str) -> StoreResult<Vec<u8>> {
        match self.primary.read(path) {
            Err(StoreError::NotFound { .. }) => {
                trace!(path, "primary store has no content; trying secondary");
                self.secondary.read(path)
            }
            result => result,
        }
    }
}

/// Fold `stores` into a right-nested chain, first store consulted first.
///
/// `[a, b, c]` becomes `AggregateStore(a, AggregateStore(b, c))`. A single
/// store is returned unwrapped; an empty list yields `None`.
pub fn chain_stores<I>(stores: I) -> Option<Box<dyn Store>>
where
    I: IntoIterator<Item = Box<dyn Store>>,
    I::IntoIter: DoubleEndedIterator,
{
    let mut stores = stores.into_iter().rev();
    let last = stores.next()?;
    Some(stores.fold(last, |fallback, store| {
        Box::new(AggregateStore::new(store, fallback)) as Box<dyn Store>
    }))
}
