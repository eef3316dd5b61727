//! Drives a single invocation, from the command line to printed output

use crate::{
    api::Call,
    builder::{self, Arguments, FlagValues},
    gcs::{self, StorageApi},
    globals::{GlobalArgs, GlobalParams},
    output,
    registry::{CommandSpec, Registry},
    transfer::Transfer,
    Error, Result,
};
use clap::{ArgMatches, FromArgMatches as _};
use nu_ansi_term::Color;
use std::{ffi::OsString, io::Write};

/// Everything needed to perform a command, validated and ready to send
pub struct Invocation<'r> {
    pub spec: &'r CommandSpec,
    pub call: Box<dyn Call>,
    pub globals: GlobalParams,
    pub transfer: Transfer,
    pub verbosity: u8,
}

pub struct Dispatcher {
    registry: Registry,
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new(Registry::storage())
    }
}

impl Dispatcher {
    pub fn new(registry: Registry) -> Self {
        Self { registry }
    }

    #[inline]
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Resolves the command and builds its request, without any network I/O
    pub fn prepare<I, T>(&self, argv: I) -> Result<Invocation<'_>>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let (matches, global_args) = self.parse(argv)?;
        self.invocation(&matches, global_args)
    }

    fn parse<I, T>(&self, argv: I) -> Result<(ArgMatches, GlobalArgs)>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let matches = self.registry.cli().try_get_matches_from(argv)?;
        let global_args = GlobalArgs::from_arg_matches(&matches)?;
        Ok((matches, global_args))
    }

    fn invocation(&self, matches: &ArgMatches, global_args: GlobalArgs) -> Result<Invocation<'_>> {
        let (name, sub) = matches.subcommand().ok_or(Error::MissingCommand)?;
        let spec = self.registry.resolve(name)?;

        let positional = Arguments::positional_from_matches(sub);
        let flags = FlagValues::from_matches(&spec.flags, sub);
        let args = Arguments::new(spec, &positional, &flags);

        let call = builder::build(&args)?;
        gcs::util::check_path_parameters(call.as_ref())?;
        let transfer = Transfer::from_arguments(&args)?;

        tracing::trace!(command = spec.name, ?call, ?transfer, "built request");

        let verbosity = global_args.verbose;

        Ok(Invocation {
            spec,
            call,
            globals: global_args.into(),
            transfer,
            verbosity,
        })
    }

    /// Runs a full invocation, printing the output to `out` and any error to
    /// stderr, returning the exit code
    pub fn run<I, T, C, F>(&self, argv: I, out: &mut impl Write, connect: F) -> i32
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
        C: StorageApi,
        F: FnOnce(&GlobalParams) -> Result<C>,
    {
        match self.try_run(argv, out, connect) {
            Ok(()) => 0,
            Err(Error::Flags(err)) => {
                use clap::error::ErrorKind;

                let _ = err.print();
                match err.kind() {
                    ErrorKind::DisplayHelp
                    | ErrorKind::DisplayVersion
                    | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => 0,
                    _ => 1,
                }
            }
            Err(err) => {
                let list_commands = matches!(err, Error::UnknownCommand(_) | Error::MissingCommand);
                eprintln!("{} {}", Color::Red.paint("ERR"), describe(err));

                if list_commands {
                    eprintln!("available commands:\n{}", self.registry.usage_list());
                }

                1
            }
        }
    }

    fn try_run<I, T, C, F>(&self, argv: I, out: &mut impl Write, connect: F) -> Result<()>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
        C: StorageApi,
        F: FnOnce(&GlobalParams) -> Result<C>,
    {
        let (matches, global_args) = self.parse(argv)?;

        crate::logging::init(global_args.verbose, global_args.logs_http());

        let invocation = self.invocation(&matches, global_args)?;

        let client = connect(&invocation.globals)?;
        let outcome = client.execute(
            invocation.call.as_ref(),
            &invocation.globals,
            &invocation.transfer,
        )?;

        tracing::debug!(command = invocation.spec.name, "call succeeded");

        let text = output::format(&outcome).map_err(|err| {
            Error::Output(std::io::Error::new(std::io::ErrorKind::InvalidData, err))
        })?;

        out.write_all(text.as_bytes()).map_err(Error::Output)?;
        out.flush().map_err(Error::Output)
    }
}

/// Joins the error with its causes, skipping any cause whose message is
/// already part of the text
fn describe(err: Error) -> String {
    let err = anyhow::Error::from(err);
    let mut message = String::new();

    for cause in err.chain() {
        let text = cause.to_string();
        if message.contains(&text) {
            continue;
        }

        if !message.is_empty() {
            message.push_str(": ");
        }
        message.push_str(&text);
    }

    message
}
