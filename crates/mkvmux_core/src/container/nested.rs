//! Arbitrarily nested sequences, flattened depth-first.
//!
//! Split and tag options accept either a flat list or groups of values; both
//! reduce to the same ordered sequence through [`Nested::flatten`].

/// A value or a sequence of nested values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Nested<T> {
    Item(T),
    Seq(Vec<Nested<T>>),
}

impl<T> Nested<T> {
    pub fn item(value: T) -> Self {
        Nested::Item(value)
    }

    pub fn seq(values: impl IntoIterator<Item = Nested<T>>) -> Self {
        Nested::Seq(values.into_iter().collect())
    }

    /// Consume the tree and return its leaves in depth-first order.
    pub fn flatten(self) -> Vec<T> {
        let mut out = Vec::new();
        self.flatten_into(&mut out);
        out
    }

    fn flatten_into(self, out: &mut Vec<T>) {
        match self {
            Nested::Item(value) => out.push(value),
            Nested::Seq(children) => {
                for child in children {
                    child.flatten_into(out);
                }
            }
        }
    }

}

impl<T> From<Vec<T>> for Nested<T> {
    fn from(values: Vec<T>) -> Self {
        Nested::Seq(values.into_iter().map(Nested::Item).collect())
    }
}

impl<T: Clone> From<&[T]> for Nested<T> {
    fn from(values: &[T]) -> Self {
        values.to_vec().into()
    }
}

impl<T, const N: usize> From<[T; N]> for Nested<T> {
    fn from(values: [T; N]) -> Self {
        Vec::from(values).into()
    }
}

impl<T> FromIterator<Nested<T>> for Nested<T> {
    fn from_iter<I: IntoIterator<Item = Nested<T>>>(iter: I) -> Self {
        Nested::Seq(iter.into_iter().collect())
    }
}
