//! Value storage: owned or borrowed from the caller.

use crate::error::{Error, Result};

/// State of a switch option: present on the command line or not.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SwitchState {
    #[default]
    Omitted,
    Specified,
}

impl SwitchState {
    pub fn is_specified(self) -> bool {
        self == Self::Specified
    }
}

impl From<bool> for SwitchState {
    fn from(on: bool) -> Self {
        if on { Self::Specified } else { Self::Omitted }
    }
}

/// Bounds on the number of items a vectored option may hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quantifier {
    pub min_items: usize,
    pub max_items: usize,
}

impl Quantifier {
    pub const UNBOUNDED: usize = usize::MAX;

    pub fn new(min_items: usize, max_items: usize) -> Self {
        Self {
            min_items,
            max_items,
        }
    }

    /// At least `min_items`, no upper bound.
    pub fn at_least(min_items: usize) -> Self {
        Self::new(min_items, Self::UNBOUNDED)
    }

    /// Exactly `n` items.
    pub fn exactly(n: usize) -> Self {
        Self::new(n, n)
    }

    pub fn is_unbounded(&self) -> bool {
        self.max_items == Self::UNBOUNDED
    }

    /// Check only that the bounds are ordered.
    pub fn validate(&self) -> Result<()> {
        if self.min_items > self.max_items {
            return Err(Error::InvalidQuantifier {
                key: String::new(),
                min: self.min_items,
                max: self.max_items,
            });
        }
        Ok(())
    }

    /// Check `len` against the bounds.
    ///
    /// Errors carry an empty key; the option layer attaches the real one.
    pub fn check(&self, len: usize) -> Result<()> {
        self.validate()?;
        if len > self.max_items {
            return Err(Error::VectorItemsExceedMaximum {
                key: String::new(),
                got: len,
                max: self.max_items,
            });
        }
        if len < self.min_items {
            return Err(Error::InsufficientVectorItems {
                key: String::new(),
                got: len,
                min: self.min_items,
            });
        }
        Ok(())
    }
}

impl Default for Quantifier {
    fn default() -> Self {
        Self::at_least(0)
    }
}

/// A single value, either owned or aliasing a caller variable.
#[derive(Debug)]
pub enum ValueCell<'a, T> {
    Owned(T),
    Borrowed(&'a mut T),
}

impl<'a, T> ValueCell<'a, T> {
    pub fn get(&self) -> &T {
        match self {
            Self::Owned(v) => v,
            Self::Borrowed(v) => v,
        }
    }

    pub fn get_mut(&mut self) -> &mut T {
        match self {
            Self::Owned(v) => v,
            Self::Borrowed(v) => v,
        }
    }

    pub fn set(&mut self, value: T) {
        *self.get_mut() = value;
    }

    pub fn is_borrowed(&self) -> bool {
        matches!(self, Self::Borrowed(_))
    }
}

#[derive(Debug)]
enum Items<'a, T> {
    Owned(Vec<T>),
    Borrowed(&'a mut Vec<T>),
}

/// A sequence of values constrained by a [`Quantifier`].
///
/// An aliased vector, or a non-empty owned default, must already be within
/// bounds. An empty owned default only needs ordered bounds; the minimum is
/// enforced when the option is parsed.
#[derive(Debug)]
pub struct BoundedSequence<'a, T> {
    items: Items<'a, T>,
    quantifier: Quantifier,
}

impl<'a, T> BoundedSequence<'a, T> {
    pub fn owned(items: Vec<T>, quantifier: Quantifier) -> Result<Self> {
        if items.is_empty() {
            quantifier.validate()?;
        } else {
            quantifier.check(items.len())?;
        }
        Ok(Self {
            items: Items::Owned(items),
            quantifier,
        })
    }

    pub fn borrowed(items: &'a mut Vec<T>, quantifier: Quantifier) -> Result<Self> {
        quantifier.check(items.len())?;
        Ok(Self {
            items: Items::Borrowed(items),
            quantifier,
        })
    }

    pub fn items(&self) -> &[T] {
        self.as_vec().as_slice()
    }

    pub(crate) fn as_vec(&self) -> &Vec<T> {
        match &self.items {
            Items::Owned(v) => v,
            Items::Borrowed(v) => v,
        }
    }

    /// Mutable access to the underlying vector.
    ///
    /// Bounds are not re-checked; callers that change the length own the invariant.
    pub fn items_mut(&mut self) -> &mut Vec<T> {
        match &mut self.items {
            Items::Owned(v) => v,
            Items::Borrowed(v) => v,
        }
    }

    /// Swap in a freshly parsed vector.
    pub fn replace(&mut self, items: Vec<T>) {
        *self.items_mut() = items;
    }

    pub fn len(&self) -> usize {
        self.items().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items().is_empty()
    }

    pub fn min_items(&self) -> usize {
        self.quantifier.min_items
    }

    pub fn max_items(&self) -> usize {
        self.quantifier.max_items
    }

    pub fn quantifier(&self) -> Quantifier {
        self.quantifier
    }

    pub fn is_borrowed(&self) -> bool {
        matches!(self.items, Items::Borrowed(_))
    }
}
