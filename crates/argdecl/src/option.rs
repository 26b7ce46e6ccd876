//! A declared option and its token-consumption rules.

use std::any::{Any, type_name};
use std::fmt;

use crate::cell::{BoundedSequence, Quantifier, SwitchState, ValueCell};
use crate::codec::{BoundCodec, ValueCodec};
use crate::error::{Error, Result};

/// Names and help text of an option.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionAttributes {
    pub key: String,
    pub alias: Option<String>,
    pub description: Option<String>,
}

impl OptionAttributes {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ..Default::default()
        }
    }

    /// Primary key followed by the alias, if any.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.key.as_str()).chain(self.alias.as_deref())
    }
}

/// How an option takes its value from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueShape {
    /// No value tokens; presence of the key is the value.
    Switch,
    /// Exactly one value of `token_width` tokens.
    Scalar,
    /// Zero or more values, bounded by a quantifier.
    Vector,
}

pub(crate) trait ScalarSlot {
    fn token_width(&self) -> usize;
    fn decode_into(&mut self, tokens: &[String]) -> std::result::Result<(), String>;
    fn encode(&self, out: &mut String) -> std::result::Result<(), String>;
    fn value(&self) -> &dyn Any;
    fn value_mut(&mut self) -> &mut dyn Any;
    fn type_name(&self) -> &'static str;
}

/// Vector items are decoded into a staging buffer and only committed once the
/// whole option has been consumed successfully.
pub(crate) trait VectorSlot {
    fn token_width(&self) -> usize;
    fn quantifier(&self) -> Quantifier;
    fn len(&self) -> usize;
    fn stage_clear(&mut self);
    fn stage_push(&mut self, tokens: &[String]) -> std::result::Result<(), String>;
    fn staged_len(&self) -> usize;
    fn commit(&mut self);
    fn encode_items(&self, out: &mut String) -> std::result::Result<(), String>;
    fn items(&self) -> &dyn Any;
    fn items_mut(&mut self) -> &mut dyn Any;
    fn type_name(&self) -> &'static str;
}

pub(crate) struct ScalarStore<'a, T> {
    pub(crate) cell: ValueCell<'a, T>,
    pub(crate) codec: BoundCodec<'a, T>,
}

impl<T: 'static> ScalarSlot for ScalarStore<'_, T> {
    fn token_width(&self) -> usize {
        self.codec.token_width()
    }

    fn decode_into(&mut self, tokens: &[String]) -> std::result::Result<(), String> {
        let value = self.codec.decode(tokens)?;
        self.cell.set(value);
        Ok(())
    }

    fn encode(&self, out: &mut String) -> std::result::Result<(), String> {
        self.codec.encode(self.cell.get(), out)
    }

    fn value(&self) -> &dyn Any {
        self.cell.get()
    }

    fn value_mut(&mut self) -> &mut dyn Any {
        self.cell.get_mut()
    }

    fn type_name(&self) -> &'static str {
        type_name::<T>()
    }
}

pub(crate) struct VectorStore<'a, T> {
    pub(crate) seq: BoundedSequence<'a, T>,
    pub(crate) codec: BoundCodec<'a, T>,
    pub(crate) staged: Vec<T>,
}

impl<T: 'static> VectorSlot for VectorStore<'_, T> {
    fn token_width(&self) -> usize {
        self.codec.token_width()
    }

    fn quantifier(&self) -> Quantifier {
        self.seq.quantifier()
    }

    fn len(&self) -> usize {
        self.seq.len()
    }

    fn stage_clear(&mut self) {
        self.staged.clear();
    }

    fn stage_push(&mut self, tokens: &[String]) -> std::result::Result<(), String> {
        let item = self.codec.decode(tokens)?;
        self.staged.push(item);
        Ok(())
    }

    fn staged_len(&self) -> usize {
        self.staged.len()
    }

    fn commit(&mut self) {
        let items = std::mem::take(&mut self.staged);
        self.seq.replace(items);
    }

    fn encode_items(&self, out: &mut String) -> std::result::Result<(), String> {
        for item in self.seq.items() {
            out.push(' ');
            self.codec.encode(item, out)?;
        }
        Ok(())
    }

    fn items(&self) -> &dyn Any {
        self.seq.as_vec()
    }

    fn items_mut(&mut self) -> &mut dyn Any {
        self.seq.items_mut()
    }

    fn type_name(&self) -> &'static str {
        type_name::<T>()
    }
}

pub(crate) enum Slot<'a> {
    Switch(ValueCell<'a, SwitchState>),
    Scalar(Box<dyn ScalarSlot + 'a>),
    Vector(Box<dyn VectorSlot + 'a>),
}

/// One declared option: attributes plus typed storage and its codec.
pub struct CliOption<'a> {
    attributes: OptionAttributes,
    slot: Slot<'a>,
}

impl<'a> CliOption<'a> {
    pub(crate) fn new(attributes: OptionAttributes, slot: Slot<'a>) -> Self {
        Self { attributes, slot }
    }

    pub fn attributes(&self) -> &OptionAttributes {
        &self.attributes
    }

    pub fn key(&self) -> &str {
        &self.attributes.key
    }

    pub fn alias(&self) -> Option<&str> {
        self.attributes.alias.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.attributes.description.as_deref()
    }

    pub fn shape(&self) -> ValueShape {
        match self.slot {
            Slot::Switch(_) => ValueShape::Switch,
            Slot::Scalar(_) => ValueShape::Scalar,
            Slot::Vector(_) => ValueShape::Vector,
        }
    }

    /// Tokens per value; zero for switches.
    pub fn token_width(&self) -> usize {
        match &self.slot {
            Slot::Switch(_) => 0,
            Slot::Scalar(s) => s.token_width(),
            Slot::Vector(v) => v.token_width(),
        }
    }

    pub fn quantifier(&self) -> Option<Quantifier> {
        match &self.slot {
            Slot::Vector(v) => Some(v.quantifier()),
            _ => None,
        }
    }

    /// Whether serializing this option produces anything.
    ///
    /// Switches only hold a value once specified; scalars and vectors always do.
    pub fn has_value(&self) -> bool {
        match &self.slot {
            Slot::Switch(cell) => cell.get().is_specified(),
            Slot::Scalar(_) | Slot::Vector(_) => true,
        }
    }

    /// Borrow a scalar (or switch) value as `T`.
    pub fn value<T: 'static>(&self) -> Result<&T> {
        let found = match &self.slot {
            Slot::Switch(cell) => (cell.get() as &dyn Any).downcast_ref::<T>(),
            Slot::Scalar(s) => s.value().downcast_ref::<T>(),
            Slot::Vector(_) => None,
        };
        found.ok_or_else(|| self.type_mismatch::<T>())
    }

    pub fn value_mut<T: 'static>(&mut self) -> Result<&mut T> {
        let key = &self.attributes.key;
        let found = match &mut self.slot {
            Slot::Switch(cell) => (cell.get_mut() as &mut dyn Any).downcast_mut::<T>(),
            Slot::Scalar(s) => s.value_mut().downcast_mut::<T>(),
            Slot::Vector(_) => None,
        };
        found.ok_or_else(|| Error::ValueTypeMismatch {
            key: key.clone(),
            expected: type_name::<T>(),
        })
    }

    /// Copy a scalar value out of the option.
    pub fn cloned<T: Clone + 'static>(&self) -> Result<T> {
        self.value::<T>().cloned()
    }

    /// Borrow the items of a vector option.
    pub fn items<T: 'static>(&self) -> Result<&[T]> {
        let found = match &self.slot {
            Slot::Vector(v) => v.items().downcast_ref::<Vec<T>>(),
            _ => None,
        };
        found
            .map(Vec::as_slice)
            .ok_or_else(|| self.type_mismatch::<Vec<T>>())
    }

    /// Mutable access to the items; the item count can't change through this.
    pub fn items_mut<T: 'static>(&mut self) -> Result<&mut [T]> {
        let key = &self.attributes.key;
        let found = match &mut self.slot {
            Slot::Vector(v) => v.items_mut().downcast_mut::<Vec<T>>(),
            _ => None,
        };
        found
            .map(Vec::as_mut_slice)
            .ok_or_else(|| Error::ValueTypeMismatch {
                key: key.clone(),
                expected: type_name::<Vec<T>>(),
            })
    }

    pub fn cloned_items<T: Clone + 'static>(&self) -> Result<Vec<T>> {
        self.items::<T>().map(<[T]>::to_vec)
    }

    pub fn switch_state(&self) -> Result<SwitchState> {
        self.value::<SwitchState>().copied()
    }

    fn type_mismatch<T>(&self) -> Error {
        Error::ValueTypeMismatch {
            key: self.attributes.key.clone(),
            expected: type_name::<T>(),
        }
    }

    /// Reject codecs that could never make progress on input.
    pub(crate) fn check_codec(&self) -> Result<()> {
        let width = match &self.slot {
            Slot::Switch(_) => return Ok(()),
            Slot::Scalar(s) => s.token_width(),
            Slot::Vector(v) => v.token_width(),
        };
        if width == 0 {
            return Err(Error::CodecBinding {
                key: self.attributes.key.clone(),
                reason: "token width must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    /// Consume this option's value tokens from `rest` (the tokens after the key).
    ///
    /// Returns how many tokens were taken, not counting the key itself.
    pub(crate) fn consume(
        &mut self,
        rest: &[String],
        is_key: &dyn Fn(&str) -> bool,
    ) -> Result<usize> {
        let key = self.attributes.key.as_str();
        match &mut self.slot {
            Slot::Switch(cell) => {
                cell.set(SwitchState::Specified);
                Ok(0)
            }
            Slot::Scalar(slot) => {
                let width = slot.token_width();
                if rest.len() < width {
                    return Err(Error::MissingScalarValue {
                        key: key.to_string(),
                        expected: width,
                        available: rest.len(),
                    });
                }
                slot.decode_into(&rest[..width])
                    .map_err(|message| Error::ValueDecode {
                        key: key.to_string(),
                        message,
                    })?;
                Ok(width)
            }
            Slot::Vector(slot) => {
                let consumed = consume_vector(key, slot.as_mut(), rest, is_key);
                if consumed.is_err() {
                    slot.stage_clear();
                }
                consumed
            }
        }
    }

    /// Append `key value...` to `out`. Options without a value write nothing.
    pub(crate) fn encode(&self, out: &mut String) -> Result<()> {
        if !self.has_value() {
            return Ok(());
        }
        let key = self.attributes.key.as_str();
        out.push_str(key);
        let encoded = match &self.slot {
            Slot::Switch(_) => Ok(()),
            Slot::Scalar(s) => {
                out.push(' ');
                s.encode(out)
            }
            Slot::Vector(v) => v.encode_items(out),
        };
        encoded.map_err(|message| Error::ValueEncode {
            key: key.to_string(),
            message,
        })
    }

    fn value_type_name(&self) -> &'static str {
        match &self.slot {
            Slot::Switch(_) => type_name::<SwitchState>(),
            Slot::Scalar(s) => s.type_name(),
            Slot::Vector(v) => v.type_name(),
        }
    }
}

/// Take chunks of `token_width` tokens until the next token is a declared key,
/// the quantifier's maximum is reached, or input runs out.
fn consume_vector(
    key: &str,
    slot: &mut dyn VectorSlot,
    rest: &[String],
    is_key: &dyn Fn(&str) -> bool,
) -> Result<usize> {
    let width = slot.token_width();
    let Quantifier {
        min_items,
        max_items,
    } = slot.quantifier();

    slot.stage_clear();
    let mut pos = 0usize;
    while slot.staged_len() < max_items && pos < rest.len() && !is_key(&rest[pos]) {
        let available = (rest.len() - pos).min(width);
        // A declared key inside the chunk cuts the item short.
        let found = rest[pos + 1..pos + available]
            .iter()
            .position(|t| is_key(t))
            .map_or(available, |i| i + 1);
        if found < width {
            return Err(Error::IncompleteVectorItem {
                key: key.to_string(),
                expected: width,
                found,
            });
        }

        slot.stage_push(&rest[pos..pos + width])
            .map_err(|message| Error::ValueDecode {
                key: key.to_string(),
                message,
            })?;
        pos += width;
    }

    let got = slot.staged_len();
    if got < min_items {
        return Err(Error::InsufficientVectorItems {
            key: key.to_string(),
            got,
            min: min_items,
        });
    }

    slot.commit();
    Ok(pos)
}

impl fmt::Debug for CliOption<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CliOption")
            .field("key", &self.attributes.key)
            .field("alias", &self.attributes.alias)
            .field("shape", &self.shape())
            .field("type", &self.value_type_name())
            .finish()
    }
}
