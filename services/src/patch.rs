/// A field of a partial update.
///
/// `Unchanged` leaves the stored value alone, `Clear` nulls it and `Set`
/// replaces it. Keeping the three states apart avoids reading a missing field
/// as an explicit null.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Patch<T> {
    #[default]
    Unchanged,
    Clear,
    Set(T),
}

impl<T> Patch<T> {
    /// The value after applying the patch on top of `current`.
    pub fn apply(self, current: Option<T>) -> Option<T> {
        match self {
            Patch::Unchanged => current,
            Patch::Clear => None,
            Patch::Set(value) => Some(value),
        }
    }
}
