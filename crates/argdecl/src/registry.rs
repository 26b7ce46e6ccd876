//! The option registry: key index, parsing loop and serialization.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::cell::SwitchState;
use crate::decl::OptionDef;
use crate::error::{Error, Result};
use crate::option::CliOption;
use crate::tokens::tokenize;

/// What to do with a token that is not a declared key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ParsingPolicy {
    /// Ignore it and move on to the next token.
    #[default]
    SkipUndeclared,
    /// Fail with [`Error::UndeclaredKeyRejected`].
    RejectUndeclared,
}

/// A fixed set of declared options.
///
/// Aliased caller variables are borrowed for `'a`, so they can't be read
/// directly until the registry is dropped; use the typed accessors meanwhile.
#[derive(Debug)]
pub struct Registry<'a> {
    options: Vec<CliOption<'a>>,
    index: HashMap<String, usize>,
    policy: ParsingPolicy,
}

#[derive(Default)]
pub struct RegistryBuilder<'a> {
    defs: Vec<OptionDef<'a>>,
    policy: ParsingPolicy,
}

impl<'a> RegistryBuilder<'a> {
    pub fn policy(mut self, policy: ParsingPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn option(mut self, def: impl Into<OptionDef<'a>>) -> Self {
        self.defs.push(def.into());
        self
    }

    pub fn options<I, D>(mut self, defs: I) -> Self
    where
        I: IntoIterator<Item = D>,
        D: Into<OptionDef<'a>>,
    {
        self.defs.extend(defs.into_iter().map(Into::into));
        self
    }

    pub fn build(self) -> Result<Registry<'a>> {
        Registry::new(self.defs, self.policy)
    }
}

impl<'a> Registry<'a> {
    pub fn builder() -> RegistryBuilder<'a> {
        RegistryBuilder::default()
    }

    /// Build a registry, indexing every key and alias.
    ///
    /// Fails on the first option with invalid bounds or codec, or on a key
    /// that is already taken.
    pub fn new<I, D>(defs: I, policy: ParsingPolicy) -> Result<Self>
    where
        I: IntoIterator<Item = D>,
        D: Into<OptionDef<'a>>,
    {
        let mut options = Vec::new();
        let mut index = HashMap::new();

        for def in defs {
            let option = def.into().into_option()?;
            let position = options.len();
            for key in option.attributes().keys() {
                if index.insert(key.to_string(), position).is_some() {
                    return Err(Error::DuplicateKey {
                        key: key.to_string(),
                    });
                }
            }
            options.push(option);
        }

        debug!(options = options.len(), keys = index.len(), ?policy, "registry built");
        Ok(Self {
            options,
            index,
            policy,
        })
    }

    /// Consume `tokens` left to right, populating the declared options.
    ///
    /// Returns the number of tokens taken by declared options, keys included.
    /// Options populated before an error keep their new values.
    pub fn parse<I>(&mut self, tokens: I) -> Result<usize>
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        let tokens: Vec<String> = tokens.into_iter().map(Into::into).collect();
        self.consume_all(&tokens, self.policy)
    }

    /// Parse the process arguments, without the program name.
    pub fn parse_args(&mut self) -> Result<usize> {
        self.parse(std::env::args().skip(1))
    }

    /// Parse whitespace-separated text such as the output of [`Registry::output`].
    ///
    /// Undeclared tokens are always skipped here, whatever the registry policy.
    pub fn input(&mut self, text: &str) -> Result<usize> {
        let tokens = tokenize(text);
        self.consume_all(&tokens, ParsingPolicy::SkipUndeclared)
    }

    fn consume_all(&mut self, tokens: &[String], policy: ParsingPolicy) -> Result<usize> {
        let Self { options, index, .. } = self;
        let is_key = |token: &str| index.contains_key(token);

        let mut pos = 0;
        let mut consumed = 0;
        while pos < tokens.len() {
            let token = tokens[pos].as_str();
            trace!(token, pos, "candidate key");

            let Some(&position) = index.get(token) else {
                match policy {
                    ParsingPolicy::SkipUndeclared => {
                        debug!(token, "skipping undeclared token");
                        pos += 1;
                        continue;
                    }
                    ParsingPolicy::RejectUndeclared => {
                        return Err(Error::UndeclaredKeyRejected {
                            key: token.to_string(),
                        });
                    }
                }
            };

            let option = &mut options[position];
            let taken = option.consume(&tokens[pos + 1..], &is_key)?;
            debug!(key = option.key(), token, taken, "option consumed");
            pos += taken + 1;
            consumed += taken + 1;
        }
        Ok(consumed)
    }

    /// Serialize every option holding a value as `key value...`, in
    /// declaration order, joined by single spaces.
    pub fn output(&self) -> Result<String> {
        let mut out = String::new();
        for option in self.options.iter().filter(|o| o.has_value()) {
            if !out.is_empty() {
                out.push(' ');
            }
            option.encode(&mut out)?;
        }
        Ok(out)
    }

    pub fn has(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// Look up an option by key or alias.
    pub fn get(&self, key: &str) -> Result<&CliOption<'a>> {
        match self.index.get(key) {
            Some(&position) => Ok(&self.options[position]),
            None => Err(undeclared(key)),
        }
    }

    pub fn get_mut(&mut self, key: &str) -> Result<&mut CliOption<'a>> {
        match self.index.get(key) {
            Some(&position) => Ok(&mut self.options[position]),
            None => Err(undeclared(key)),
        }
    }

    pub fn value<T: 'static>(&self, key: &str) -> Result<&T> {
        self.get(key)?.value::<T>()
    }

    pub fn items<T: 'static>(&self, key: &str) -> Result<&[T]> {
        self.get(key)?.items::<T>()
    }

    pub fn switch_state(&self, key: &str) -> Result<SwitchState> {
        self.get(key)?.switch_state()
    }

    /// Options in declaration order.
    pub fn options(&self) -> impl Iterator<Item = &CliOption<'a>> {
        self.options.iter()
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    pub fn policy(&self) -> ParsingPolicy {
        self.policy
    }
}

fn undeclared(key: &str) -> Error {
    Error::UndeclaredKeyAccess {
        key: key.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decl::{scalar, switch, vector};

    fn count_and_tags() -> Registry<'static> {
        Registry::builder()
            .option(scalar("--count", 0i32).alias("-c"))
            .option(vector::<String>("--tags", Vec::new()).quantifier(1, 3))
            .build()
            .unwrap()
    }

    #[test]
    fn parses_scalar_and_vector() {
        let mut registry = count_and_tags();
        let consumed = registry.parse(["--count", "5", "--tags", "a", "b"]).unwrap();
        assert_eq!(consumed, 5);
        assert_eq!(*registry.value::<i32>("--count").unwrap(), 5);
        assert_eq!(registry.items::<String>("--tags").unwrap(), ["a", "b"]);
    }

    #[test]
    fn trailing_scalar_without_value_fails() {
        let mut registry = count_and_tags();
        let err = registry.parse(["--tags", "x", "--count"]).unwrap_err();
        match err {
            Error::MissingScalarValue { key, available, .. } => {
                assert_eq!(key, "--count");
                assert_eq!(available, 0);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(registry.items::<String>("--tags").unwrap(), ["x"]);
    }

    #[test]
    fn undeclared_tokens_follow_policy() {
        let mut registry = count_and_tags();
        let consumed = registry.parse(["--unknown", "-c", "2"]).unwrap();
        assert_eq!(consumed, 2);
        assert_eq!(*registry.value::<i32>("--count").unwrap(), 2);

        let mut strict = Registry::builder()
            .policy(ParsingPolicy::RejectUndeclared)
            .option(scalar("--count", 0i32))
            .build()
            .unwrap();
        let err = strict.parse(["--unknown"]).unwrap_err();
        assert_eq!(
            err,
            Error::UndeclaredKeyRejected {
                key: "--unknown".to_string()
            }
        );
    }

    #[test]
    fn input_skips_undeclared_even_when_strict() {
        let mut strict = Registry::builder()
            .policy(ParsingPolicy::RejectUndeclared)
            .option(scalar("--name", String::new()))
            .build()
            .unwrap();
        let consumed = strict.input(r#"junk --name "two words""#).unwrap();
        assert_eq!(consumed, 2);
        assert_eq!(strict.value::<String>("--name").unwrap(), "two words");
    }

    #[test]
    fn duplicate_keys_are_rejected() {
        let err = Registry::builder()
            .option(switch("--verbose").alias("-v"))
            .option(scalar("-v", 1u8))
            .build()
            .unwrap_err();
        assert_eq!(err, Error::DuplicateKey { key: "-v".to_string() });
    }

    #[test]
    fn output_lists_options_holding_values() {
        let mut registry = Registry::builder()
            .option(switch("--quiet"))
            .option(switch("--verbose"))
            .option(scalar("--level", 2u8))
            .option(vector::<u16>("--ports", Vec::new()))
            .build()
            .unwrap();
        registry.parse(["--verbose", "--ports", "80", "443"]).unwrap();
        assert_eq!(registry.output().unwrap(), "--verbose --level 2 --ports 80 443");
    }

    #[test]
    fn lookup_of_unknown_key_fails() {
        let registry = count_and_tags();
        assert!(registry.has("-c"));
        assert!(!registry.has("--missing"));
        assert!(matches!(
            registry.get("--missing").unwrap_err(),
            Error::UndeclaredKeyAccess { .. }
        ));
        assert_eq!(registry.len(), 2);
        let keys: Vec<&str> = registry.options().map(CliOption::key).collect();
        assert_eq!(keys, ["--count", "--tags"]);
    }

    #[test]
    fn policy_uses_kebab_case() {
        let policy: ParsingPolicy = serde_json::from_str("\"reject-undeclared\"").unwrap();
        assert_eq!(policy, ParsingPolicy::RejectUndeclared);
        assert_eq!(ParsingPolicy::default(), ParsingPolicy::SkipUndeclared);
    }
}
