//! Specification pattern for composable business rules
//!
//! Specifications are predicate objects that can be combined with
//! boolean logic. Search visibility rules are expressed as
//! specifications over `SearchableItem`.

use std::marker::PhantomData;
use std::sync::Arc;

/// Core specification trait for business rules
pub trait Specification<T>: Send + Sync {
    /// Check if the entity satisfies this specification
    fn is_satisfied_by(&self, entity: &T) -> bool;

    /// Combine with another specification using AND
    fn and<S: Specification<T> + 'static>(self, other: S) -> AndSpecification<T>
    where
        Self: Sized + 'static,
    {
        AndSpecification {
            left: Arc::new(self),
            right: Arc::new(other),
        }
    }

    /// Negate this specification
    fn not(self) -> NotSpecification<T>
    where
        Self: Sized + 'static,
    {
        NotSpecification {
            spec: Arc::new(self),
        }
    }
}

/// AND composite specification
pub struct AndSpecification<T> {
    left: Arc<dyn Specification<T>>,
    right: Arc<dyn Specification<T>>,
}

impl<T: Send + Sync> Specification<T> for AndSpecification<T> {
    fn is_satisfied_by(&self, entity: &T) -> bool {
        self.left.is_satisfied_by(entity) && self.right.is_satisfied_by(entity)
    }
}

/// NOT specification wrapper
pub struct NotSpecification<T> {
    spec: Arc<dyn Specification<T>>,
}

impl<T: Send + Sync> Specification<T> for NotSpecification<T> {
    fn is_satisfied_by(&self, entity: &T) -> bool {
        !self.spec.is_satisfied_by(entity)
    }
}

/// A specification backed by a closure
pub struct PredicateSpec<T, F>
where
    F: Fn(&T) -> bool + Send + Sync,
{
    predicate: F,
    _phantom: PhantomData<fn(&T)>,
}

impl<T, F> PredicateSpec<T, F>
where
    F: Fn(&T) -> bool + Send + Sync,
{
    pub fn new(predicate: F) -> Self {
        Self {
            predicate,
            _phantom: PhantomData,
        }
    }
}

impl<T, F> Specification<T> for PredicateSpec<T, F>
where
    F: Fn(&T) -> bool + Send + Sync,
{
    fn is_satisfied_by(&self, entity: &T) -> bool {
        (self.predicate)(entity)
    }
}

/// Helper function to create a specification from a closure
pub fn spec<T, F>(predicate: F) -> PredicateSpec<T, F>
where
    F: Fn(&T) -> bool + Send + Sync,
{
    PredicateSpec::new(predicate)
}
