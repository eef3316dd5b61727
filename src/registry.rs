use crate::{
    api::{ApiRequest, Call},
    builder::{Arguments, FromArguments},
    Error, Result,
};
use clap::builder::{PossibleValue, PossibleValuesParser};
use std::collections::BTreeMap;

/// The id of the clap argument that collects a command's positionals
pub(crate) const POSITIONAL: &str = "positional";

/// How the value of a flag is interpreted
#[derive(Clone, Debug)]
pub enum FlagKind {
    String,
    /// Base-10 integer, parsed when the request is built
    Integer,
    Boolean,
    /// One of a closed set of symbolic values
    Choice(Vec<PossibleValue>),
    /// A resource record encoded as JSON
    Json,
}

#[derive(Clone, Debug)]
pub struct FlagSpec {
    pub name: &'static str,
    pub kind: FlagKind,
    /// Shown in the help, but never sent unless the flag is supplied
    pub default: Option<&'static str>,
    pub help: &'static str,
}

impl FlagSpec {
    fn new(name: &'static str, kind: FlagKind, help: &'static str) -> Self {
        Self {
            name,
            kind,
            default: None,
            help,
        }
    }

    pub fn string(name: &'static str, help: &'static str) -> Self {
        Self::new(name, FlagKind::String, help)
    }

    pub fn integer(name: &'static str, help: &'static str) -> Self {
        Self::new(name, FlagKind::Integer, help)
    }

    pub fn boolean(name: &'static str, help: &'static str) -> Self {
        Self::new(name, FlagKind::Boolean, help)
    }

    pub fn json(name: &'static str, help: &'static str) -> Self {
        Self::new(name, FlagKind::Json, help)
    }

    pub fn choice<E: clap::ValueEnum>(name: &'static str, help: &'static str) -> Self {
        let values = E::value_variants()
            .iter()
            .filter_map(clap::ValueEnum::to_possible_value)
            .collect();
        Self::new(name, FlagKind::Choice(values), help)
    }

    pub fn default_value(mut self, default: &'static str) -> Self {
        self.default = Some(default);
        self
    }

    fn to_arg(&self) -> clap::Arg {
        let mut arg = clap::Arg::new(self.name)
            .long(self.name)
            .help(self.help)
            .action(clap::ArgAction::Set);

        arg = match &self.kind {
            FlagKind::String => arg,
            // Kept as text so a bad number is reported when the request is built
            FlagKind::Integer => arg.value_name("INT"),
            FlagKind::Boolean => arg
                .value_parser(clap::value_parser!(bool))
                .num_args(0..=1)
                .require_equals(true)
                .default_missing_value("true"),
            FlagKind::Choice(values) => arg.value_parser(PossibleValuesParser::new(values.clone())),
            FlagKind::Json => arg.value_name("JSON"),
        };

        if let Some(default) = self.default {
            arg = arg.default_value(default);
        }

        arg
    }
}

/// Whether a command can move object data in addition to metadata
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Media {
    None,
    Download,
    UploadDownload,
}

impl Media {
    #[inline]
    pub fn can_upload(self) -> bool {
        self == Self::UploadDownload
    }

    #[inline]
    pub fn can_download(self) -> bool {
        self != Self::None
    }
}

pub type Handler = fn(&Arguments<'_>) -> Result<Box<dyn Call>>;

fn build_request<R>(args: &Arguments<'_>) -> Result<Box<dyn Call>>
where
    R: ApiRequest + FromArguments,
{
    Ok(Box::new(R::from_arguments(args)?))
}

/// Everything needed to turn a command line into an API call
pub struct CommandSpec {
    pub name: &'static str,
    pub about: &'static str,
    pub positional: &'static [&'static str],
    pub flags: Vec<FlagSpec>,
    pub media: Media,
    handler: Handler,
}

impl CommandSpec {
    pub fn new<R>(name: &'static str, about: &'static str, positional: &'static [&'static str]) -> Self
    where
        R: ApiRequest + FromArguments,
    {
        Self {
            name,
            about,
            positional,
            flags: Vec::new(),
            media: Media::None,
            handler: build_request::<R>,
        }
    }

    pub fn flags(mut self, flags: impl IntoIterator<Item = FlagSpec>) -> Self {
        self.flags.extend(flags);
        self
    }

    /// Allows the response's object data to be written to a file
    pub fn download(mut self) -> Self {
        self.media = Media::Download;
        self.flags.extend([
            FlagSpec::string("download_filename", "Filename to use for download."),
            FlagSpec::boolean(
                "overwrite",
                "If True, overwrite the existing file when downloading.",
            )
            .default_value("false"),
        ]);
        self
    }

    /// Allows object data to be uploaded from a file, implies [`Self::download`]
    pub fn upload(mut self) -> Self {
        self.flags.extend([
            FlagSpec::string("upload_filename", "Filename to use for upload."),
            FlagSpec::string(
                "upload_mime_type",
                "MIME type to use for the upload. Only needed if the extension on --upload_filename does not determine the correct (or any) MIME type.",
            ),
        ]);
        let mut this = self.download();
        this.media = Media::UploadDownload;
        this
    }

    pub fn usage(&self) -> String {
        let mut usage = String::from(self.name);
        for param in self.positional {
            usage.push_str(" <");
            usage.push_str(param);
            usage.push('>');
        }
        usage
    }

    #[inline]
    pub(crate) fn handler(&self) -> Handler {
        self.handler
    }

    pub fn to_command(&self) -> clap::Command {
        let positional = clap::Arg::new(POSITIONAL)
            .num_args(0..)
            .action(clap::ArgAction::Append)
            .value_name("ARGS")
            .hide(true);

        clap::Command::new(self.name)
            .about(self.about)
            .override_usage(self.usage())
            .arg(positional)
            .args(self.flags.iter().map(FlagSpec::to_arg))
    }
}

/// The set of commands known to the program, keyed by their name
#[derive(Default)]
pub struct Registry {
    commands: BTreeMap<&'static str, CommandSpec>,
}

impl Registry {
    /// A registry of every Cloud Storage command
    pub fn storage() -> Self {
        let mut registry = Self::default();
        for spec in crate::api::commands() {
            registry.register(spec);
        }
        registry
    }

    /// Adds a command
    ///
    /// # Panics
    ///
    /// A command with the same name was already registered
    pub fn register(&mut self, spec: CommandSpec) {
        let name = spec.name;
        assert!(
            self.commands.insert(name, spec).is_none(),
            "command '{name}' was registered twice"
        );
    }

    pub fn resolve(&self, name: &str) -> Result<&CommandSpec> {
        self.commands
            .get(name)
            .ok_or_else(|| Error::UnknownCommand(name.to_owned()))
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &CommandSpec> {
        self.commands.values()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// The usage of every command, one per line
    pub fn usage_list(&self) -> String {
        let mut list = String::new();
        for spec in self.iter() {
            list.push_str("  ");
            list.push_str(&spec.usage());
            list.push('\n');
        }
        list
    }

    /// The full command line interface, including the global flags
    pub fn cli(&self) -> clap::Command {
        use clap::Args as _;

        let root = clap::Command::new(env!("CARGO_PKG_NAME"))
            .about(env!("CARGO_PKG_DESCRIPTION"))
            .version(env!("CARGO_PKG_VERSION"))
            .allow_external_subcommands(true);

        crate::globals::GlobalArgs::augment_args(root)
            .subcommands(self.iter().map(CommandSpec::to_command))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn registers_every_command() {
        let registry = Registry::storage();
        assert_eq!(registry.len(), 34);

        for name in [
            "bucketAccessControls_delete",
            "buckets_insert",
            "channels_stop",
            "defaultObjectAccessControls_list",
            "objectAccessControls_update",
            "objects_watchAll",
        ] {
            assert_eq!(registry.resolve(name).unwrap().name, name);
        }
    }

    #[test]
    fn names_are_case_sensitive() {
        let registry = Registry::storage();
        assert!(matches!(
            registry.resolve("objects_Insert"),
            Err(Error::UnknownCommand(name)) if name == "objects_Insert"
        ));
    }

    #[test]
    #[should_panic(expected = "registered twice")]
    fn duplicates_panic() {
        let objects_get = || {
            crate::api::commands()
                .into_iter()
                .find(|s| s.name == "objects_get")
                .unwrap()
        };

        let mut registry = Registry::default();
        registry.register(objects_get());
        registry.register(objects_get());
    }

    #[test]
    fn usage_lists_positionals() {
        let registry = Registry::storage();
        assert_eq!(
            registry.resolve("objects_copy").unwrap().usage(),
            "objects_copy <sourceBucket> <sourceObject> <destinationBucket> <destinationObject>"
        );
        assert_eq!(
            registry.resolve("channels_stop").unwrap().usage(),
            "channels_stop"
        );
        assert!(registry
            .usage_list()
            .contains("  objectAccessControls_get <bucket> <object> <entity>\n"));
    }

    #[test]
    fn media_flags() {
        let registry = Registry::storage();

        let insert = registry.resolve("objects_insert").unwrap();
        assert!(insert.media.can_upload());
        for flag in ["upload_filename", "upload_mime_type", "download_filename", "overwrite"] {
            assert!(insert.flags.iter().any(|f| f.name == flag), "{flag}");
        }

        for name in ["objects_get", "objects_copy", "objects_compose", "objects_update"] {
            let spec = registry.resolve(name).unwrap();
            assert_eq!(spec.media, Media::Download, "{name}");
        }

        let list = registry.resolve("objects_list").unwrap();
        assert_eq!(list.media, Media::None);
        assert!(!list.flags.iter().any(|f| f.name == "download_filename"));
    }

    #[test]
    fn cli_is_consistent() {
        Registry::storage().cli().debug_assert();
    }
}
