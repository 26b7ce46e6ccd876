//! Declarative command-line options.
//!
//! Options are declared up front with typed builders (or a JSON schema), each
//! either owning its value or aliasing a caller variable. A [`Registry`] then
//! walks the raw tokens left to right: every token is looked up as a key, and
//! the matching option consumes as many following tokens as its shape and
//! codec require.
//!
//! - switches take no tokens and record presence;
//! - scalars take exactly one value of `token_width` tokens;
//! - vectors take whole items until the next declared key, their maximum item
//!   count, or the end of input.
//!
//! ```
//! use argdecl::{Registry, scalar, vector};
//!
//! let mut registry = Registry::builder()
//!     .option(scalar("--count", 0i32))
//!     .option(vector::<String>("--tags", Vec::new()).quantifier(1, 3))
//!     .build()?;
//!
//! let consumed = registry.parse(["--count", "5", "--tags", "a", "b"])?;
//! assert_eq!(consumed, 5);
//! assert_eq!(*registry.value::<i32>("--count")?, 5);
//! assert_eq!(registry.output()?, "--count 5 --tags a b");
//! # Ok::<(), argdecl::Error>(())
//! ```

pub mod cell;
pub mod codec;
pub mod decl;
pub mod error;
pub mod option;
pub mod registry;
pub mod schema;
pub mod tokens;

pub use cell::{BoundedSequence, Quantifier, SwitchState, ValueCell};
pub use codec::{DefaultCodec, FromStrCodec, OptionValue, ValueCodec};
pub use decl::{
    OptionDef, ScalarDef, SwitchDef, VectorDef, scalar, scalar_ref, switch, switch_ref, vector,
    vector_ref,
};
pub use error::{Error, Result};
pub use option::{CliOption, OptionAttributes, ValueShape};
pub use registry::{ParsingPolicy, Registry, RegistryBuilder};
pub use schema::{DefaultValue, OptionKind, OptionSchema, RegistrySchema};
pub use tokens::tokenize;
