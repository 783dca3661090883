//! Type existence and subtype queries

/// A capability that answers questions about the known types.
///
/// The [`ServiceManager`](crate::ServiceManager) never inspects types on its own,
/// every existence and relationship check goes through this trait.
pub trait TypeRegistry: Send + Sync {
    /// Returns `true` if `type_name` names a known class or interface
    fn exists(&self, type_name: &str) -> bool;

    /// Returns `true` if `type_name` is a strict subtype of `parent`.
    ///
    /// A type is never a subtype of itself.
    fn is_subtype_of(&self, type_name: &str, parent: &str) -> bool;

    /// Returns `true` if the two types are related in either direction
    #[inline]
    fn is_related(&self, a: &str, b: &str) -> bool {
        self.is_subtype_of(a, b) || self.is_subtype_of(b, a)
    }
}
