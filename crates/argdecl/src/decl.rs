//! Declaration builders.
//!
//! Each option starts from one of [`switch`], [`scalar`], [`scalar_ref`],
//! [`vector`] or [`vector_ref`]; the `_ref` forms alias a caller variable
//! instead of owning the value.
//!
//! ```
//! use argdecl::{Registry, scalar, switch, vector};
//!
//! let mut retries = 3u32;
//! let mut registry = Registry::builder()
//!     .option(switch("--verbose").alias("-v"))
//!     .option(argdecl::scalar_ref("--retries", &mut retries))
//!     .option(vector::<String>("--tags", Vec::new()).quantifier(1, 3))
//!     .option(scalar("--name", String::from("anon")).description("Display name"))
//!     .build()
//!     .unwrap();
//!
//! registry.parse(["-v", "--retries", "5", "--tags", "a", "b"]).unwrap();
//! assert_eq!(registry.items::<String>("--tags").unwrap(), ["a", "b"]);
//! drop(registry);
//! assert_eq!(retries, 5);
//! ```

use crate::cell::{BoundedSequence, Quantifier, SwitchState, ValueCell};
use crate::codec::{BoundCodec, DecodeFn, DefaultCodec, EncodeFn, OptionValue, ValueCodec};
use crate::error::Result;
use crate::option::{CliOption, OptionAttributes, ScalarStore, Slot, VectorStore};

macro_rules! attribute_setters {
    () => {
        /// Secondary key resolving to the same option.
        pub fn alias(mut self, alias: impl Into<String>) -> Self {
            self.attributes.alias = Some(alias.into());
            self
        }

        pub fn description(mut self, description: impl Into<String>) -> Self {
            self.attributes.description = Some(description.into());
            self
        }
    };
}

macro_rules! codec_setters {
    ($lt:lifetime) => {
        /// Replace the base codec for this option.
        pub fn codec(mut self, codec: impl ValueCodec<T> + $lt) -> Self {
            self.codec = Box::new(codec);
            self
        }

        /// Override the token width reported by the codec.
        pub fn token_width(mut self, width: usize) -> Self {
            self.width = Some(width);
            self
        }

        /// Override decoding only; encoding stays with the codec.
        pub fn decoder<F>(mut self, decode: F) -> Self
        where
            F: Fn(&[String]) -> std::result::Result<T, String> + $lt,
        {
            self.decoder = Some(Box::new(decode));
            self
        }

        /// Override encoding only; decoding stays with the codec.
        pub fn encoder<F>(mut self, encode: F) -> Self
        where
            F: Fn(&T, &mut String) -> std::result::Result<(), String> + $lt,
        {
            self.encoder = Some(Box::new(encode));
            self
        }

        fn bound_codec(
            codec: Box<dyn ValueCodec<T> + $lt>,
            width: Option<usize>,
            decoder: Option<DecodeFn<$lt, T>>,
            encoder: Option<EncodeFn<$lt, T>>,
        ) -> BoundCodec<$lt, T> {
            BoundCodec::new(codec, width, decoder, encoder)
        }
    };
}

/// A type-erased declaration, ready to be handed to a registry.
pub struct OptionDef<'a> {
    attributes: OptionAttributes,
    slot: Result<Slot<'a>>,
}

impl<'a> OptionDef<'a> {
    pub fn attributes(&self) -> &OptionAttributes {
        &self.attributes
    }

    pub(crate) fn into_option(self) -> Result<CliOption<'a>> {
        let key = self.attributes.key.clone();
        let slot = self.slot.map_err(|e| e.with_key(&key))?;
        let option = CliOption::new(self.attributes, slot);
        option.check_codec()?;
        Ok(option)
    }
}

/// Builder for a switch option.
pub struct SwitchDef<'a> {
    attributes: OptionAttributes,
    cell: ValueCell<'a, SwitchState>,
}

pub fn switch(key: impl Into<String>) -> SwitchDef<'static> {
    SwitchDef {
        attributes: OptionAttributes::new(key),
        cell: ValueCell::Owned(SwitchState::Omitted),
    }
}

pub fn switch_ref(key: impl Into<String>, target: &mut SwitchState) -> SwitchDef<'_> {
    SwitchDef {
        attributes: OptionAttributes::new(key),
        cell: ValueCell::Borrowed(target),
    }
}

impl SwitchDef<'_> {
    attribute_setters!();
}

impl<'a> From<SwitchDef<'a>> for OptionDef<'a> {
    fn from(def: SwitchDef<'a>) -> Self {
        OptionDef {
            attributes: def.attributes,
            slot: Ok(Slot::Switch(def.cell)),
        }
    }
}

/// Builder for a single-value option.
pub struct ScalarDef<'a, T> {
    attributes: OptionAttributes,
    cell: ValueCell<'a, T>,
    codec: Box<dyn ValueCodec<T> + 'a>,
    width: Option<usize>,
    decoder: Option<DecodeFn<'a, T>>,
    encoder: Option<EncodeFn<'a, T>>,
}

/// Owned scalar with the type's default codec.
pub fn scalar<T: OptionValue + 'static>(
    key: impl Into<String>,
    value: T,
) -> ScalarDef<'static, T> {
    ScalarDef::owned_with(key, value, DefaultCodec)
}

/// Scalar writing through to `target`.
pub fn scalar_ref<T: OptionValue + 'static>(
    key: impl Into<String>,
    target: &mut T,
) -> ScalarDef<'_, T> {
    ScalarDef::borrowed_with(key, target, DefaultCodec)
}

impl<'a, T: 'static> ScalarDef<'a, T> {
    /// Owned scalar for a type without an [`OptionValue`] impl.
    pub fn owned_with(key: impl Into<String>, value: T, codec: impl ValueCodec<T> + 'a) -> Self {
        Self::from_cell(key, ValueCell::Owned(value), Box::new(codec))
    }

    pub fn borrowed_with(
        key: impl Into<String>,
        target: &'a mut T,
        codec: impl ValueCodec<T> + 'a,
    ) -> Self {
        Self::from_cell(key, ValueCell::Borrowed(target), Box::new(codec))
    }

    fn from_cell(
        key: impl Into<String>,
        cell: ValueCell<'a, T>,
        codec: Box<dyn ValueCodec<T> + 'a>,
    ) -> Self {
        Self {
            attributes: OptionAttributes::new(key),
            cell,
            codec,
            width: None,
            decoder: None,
            encoder: None,
        }
    }

    attribute_setters!();
    codec_setters!('a);
}

impl<'a, T: 'static> From<ScalarDef<'a, T>> for OptionDef<'a> {
    fn from(def: ScalarDef<'a, T>) -> Self {
        let codec = ScalarDef::bound_codec(def.codec, def.width, def.decoder, def.encoder);
        let store = ScalarStore {
            cell: def.cell,
            codec,
        };
        OptionDef {
            attributes: def.attributes,
            slot: Ok(Slot::Scalar(Box::new(store))),
        }
    }
}

enum ItemsSource<'a, T> {
    Owned(Vec<T>),
    Borrowed(&'a mut Vec<T>),
}

/// Builder for a multi-value option.
pub struct VectorDef<'a, T> {
    attributes: OptionAttributes,
    items: ItemsSource<'a, T>,
    quantifier: Quantifier,
    codec: Box<dyn ValueCodec<T> + 'a>,
    width: Option<usize>,
    decoder: Option<DecodeFn<'a, T>>,
    encoder: Option<EncodeFn<'a, T>>,
}

/// Owned vector with the item type's default codec and no bounds.
pub fn vector<T: OptionValue + 'static>(
    key: impl Into<String>,
    items: Vec<T>,
) -> VectorDef<'static, T> {
    VectorDef::owned_with(key, items, DefaultCodec)
}

/// Vector writing through to `target`; its current length must satisfy the bounds.
pub fn vector_ref<T: OptionValue + 'static>(
    key: impl Into<String>,
    target: &mut Vec<T>,
) -> VectorDef<'_, T> {
    VectorDef::borrowed_with(key, target, DefaultCodec)
}

impl<'a, T: 'static> VectorDef<'a, T> {
    pub fn owned_with(
        key: impl Into<String>,
        items: Vec<T>,
        codec: impl ValueCodec<T> + 'a,
    ) -> Self {
        Self::from_source(key, ItemsSource::Owned(items), Box::new(codec))
    }

    pub fn borrowed_with(
        key: impl Into<String>,
        target: &'a mut Vec<T>,
        codec: impl ValueCodec<T> + 'a,
    ) -> Self {
        Self::from_source(key, ItemsSource::Borrowed(target), Box::new(codec))
    }

    fn from_source(
        key: impl Into<String>,
        items: ItemsSource<'a, T>,
        codec: Box<dyn ValueCodec<T> + 'a>,
    ) -> Self {
        Self {
            attributes: OptionAttributes::new(key),
            items,
            quantifier: Quantifier::default(),
            codec,
            width: None,
            decoder: None,
            encoder: None,
        }
    }

    /// Require between `min_items` and `max_items` items.
    pub fn quantifier(mut self, min_items: usize, max_items: usize) -> Self {
        self.quantifier = Quantifier::new(min_items, max_items);
        self
    }

    pub fn bounds(mut self, quantifier: Quantifier) -> Self {
        self.quantifier = quantifier;
        self
    }

    pub fn min_items(mut self, min_items: usize) -> Self {
        self.quantifier.min_items = min_items;
        self
    }

    pub fn max_items(mut self, max_items: usize) -> Self {
        self.quantifier.max_items = max_items;
        self
    }

    attribute_setters!();
    codec_setters!('a);
}

impl<'a, T: 'static> From<VectorDef<'a, T>> for OptionDef<'a> {
    fn from(def: VectorDef<'a, T>) -> Self {
        let seq = match def.items {
            ItemsSource::Owned(items) => BoundedSequence::owned(items, def.quantifier),
            ItemsSource::Borrowed(items) => BoundedSequence::borrowed(items, def.quantifier),
        };
        let codec = VectorDef::bound_codec(def.codec, def.width, def.decoder, def.encoder);
        let slot = seq.map(|seq| {
            Slot::Vector(Box::new(VectorStore {
                seq,
                codec,
                staged: Vec::new(),
            }))
        });
        OptionDef {
            attributes: def.attributes,
            slot,
        }
    }
}
