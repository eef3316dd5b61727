//! Turns the positionals and flags of a command line into a typed request

use crate::{
    api::Call,
    registry::{CommandSpec, FlagKind, FlagSpec, POSITIONAL},
    Error, Result,
};
use clap::parser::ValueSource;
use std::{collections::BTreeMap, fmt::Display, str::FromStr};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RawValue {
    Text(String),
    Switch(bool),
}

/// The value of a flag, and whether it was actually supplied rather than
/// coming from its declared default
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FlagValue {
    pub value: RawValue,
    pub present: bool,
}

#[derive(Clone, Debug, Default)]
pub struct FlagValues(BTreeMap<&'static str, FlagValue>);

impl FlagValues {
    /// Collects the values of the specified flags from a command's matches
    pub fn from_matches(flags: &[FlagSpec], matches: &clap::ArgMatches) -> Self {
        let mut values = BTreeMap::new();

        for flag in flags {
            let value = match flag.kind {
                FlagKind::Boolean => matches
                    .try_get_one::<bool>(flag.name)
                    .ok()
                    .flatten()
                    .map(|b| RawValue::Switch(*b)),
                _ => matches
                    .try_get_one::<String>(flag.name)
                    .ok()
                    .flatten()
                    .map(|s| RawValue::Text(s.clone())),
            };

            if let Some(value) = value {
                let present = matches!(
                    matches.value_source(flag.name),
                    Some(ValueSource::CommandLine)
                );
                values.insert(flag.name, FlagValue { value, present });
            }
        }

        Self(values)
    }

    /// Adds a supplied value
    pub fn with(mut self, name: &'static str, value: RawValue) -> Self {
        self.0.insert(
            name,
            FlagValue {
                value,
                present: true,
            },
        );
        self
    }

    /// Adds a value that was not supplied, ie. a default
    pub fn with_default(mut self, name: &'static str, value: RawValue) -> Self {
        self.0.insert(
            name,
            FlagValue {
                value,
                present: false,
            },
        );
        self
    }

    #[inline]
    fn supplied(&self, name: &str) -> Option<&RawValue> {
        self.0.get(name).filter(|v| v.present).map(|v| &v.value)
    }
}

/// The arguments for a single invocation of a command
pub struct Arguments<'a> {
    spec: &'a CommandSpec,
    positional: &'a [String],
    flags: &'a FlagValues,
}

impl<'a> Arguments<'a> {
    pub fn new(spec: &'a CommandSpec, positional: &'a [String], flags: &'a FlagValues) -> Self {
        Self {
            spec,
            positional,
            flags,
        }
    }

    /// Collects the arguments for a command from its clap matches
    pub fn positional_from_matches(matches: &clap::ArgMatches) -> Vec<String> {
        matches
            .try_get_many::<String>(POSITIONAL)
            .ok()
            .flatten()
            .map(|vals| vals.cloned().collect())
            .unwrap_or_default()
    }

    #[inline]
    pub fn spec(&self) -> &CommandSpec {
        self.spec
    }

    fn check_count(&self) -> Result<()> {
        let expected = self.spec.positional.len();
        if self.positional.len() != expected {
            return Err(Error::ArgumentCount {
                command: self.spec.name,
                expected,
                actual: self.positional.len(),
                usage: self.spec.usage(),
            });
        }

        Ok(())
    }

    /// The positional arguments, in declaration order
    pub fn positionals<const N: usize>(&self) -> Result<[String; N]> {
        self.check_count()?;
        self.positional
            .to_vec()
            .try_into()
            .map_err(|v: Vec<String>| Error::ArgumentCount {
                command: self.spec.name,
                expected: N,
                actual: v.len(),
                usage: self.spec.usage(),
            })
    }

    /// A supplied string flag
    pub fn text(&self, name: &'static str) -> Option<String> {
        match self.flags.supplied(name)? {
            RawValue::Text(s) => Some(s.clone()),
            RawValue::Switch(b) => Some(b.to_string()),
        }
    }

    /// A supplied boolean flag
    pub fn switch(&self, name: &'static str) -> Result<Option<bool>> {
        match self.flags.supplied(name) {
            None => Ok(None),
            Some(RawValue::Switch(b)) => Ok(Some(*b)),
            Some(RawValue::Text(s)) => s.parse().map(Some).map_err(|err: std::str::ParseBoolError| {
                Error::ValueFormat {
                    flag: name,
                    value: s.clone(),
                    reason: err.to_string(),
                }
            }),
        }
    }

    /// A supplied integer flag, parsed as base 10
    pub fn integer<T>(&self, name: &'static str) -> Result<Option<T>>
    where
        T: FromStr,
        T::Err: Display,
    {
        let Some(value) = self.text(name) else {
            return Ok(None);
        };

        value
            .parse()
            .map(Some)
            .map_err(|err: T::Err| Error::ValueFormat {
                flag: name,
                reason: err.to_string(),
                value,
            })
    }

    /// A supplied flag restricted to a set of symbolic values
    pub fn choice<E: clap::ValueEnum>(&self, name: &'static str) -> Result<Option<E>> {
        let Some(value) = self.text(name) else {
            return Ok(None);
        };

        E::from_str(&value, false)
            .map(Some)
            .map_err(|reason| Error::ValueFormat {
                flag: name,
                value,
                reason,
            })
    }

    /// A supplied flag containing a JSON encoded record
    pub fn json<T: serde::de::DeserializeOwned>(&self, name: &'static str) -> Result<Option<T>> {
        let Some(value) = self.text(name) else {
            return Ok(None);
        };

        serde_json::from_str(&value)
            .map(Some)
            .map_err(|source| Error::Parse { flag: name, source })
    }
}

/// Implemented by every request that can be created from a command line
pub trait FromArguments: Sized {
    fn from_arguments(args: &Arguments<'_>) -> Result<Self>;
}

/// Builds the request for a command, failing if the wrong number of positionals
/// was supplied or a flag's value could not be converted
pub fn build(args: &Arguments<'_>) -> Result<Box<dyn Call>> {
    args.check_count()?;
    (args.spec.handler())(args)
}
