//! Command-line option parsing into caller-owned storage.
//!
//! - `Opt` describes one option; its `ArgType` carries the typed `Cell` the
//!   parsed value is written to (no maps, no raw pointers)
//! - `OptionTable` keeps options in order; scans stop at the end of the table
//!   or at the first entry without a name
//! - `Context::parse` walks the argument vector once, reports every problem,
//!   and leaves only the unconsumed tokens behind
//! - `--help`/`-h` and `--version`/`-V` are always available
//!
//! Values are never copied: string results borrow from the argument vector.

use std::cell::Cell;
use std::fmt;
use std::io::Write;

mod coerce;
mod column;
mod help;
mod scan;

pub use column::{find_word, ColumnWriter};
pub use scan::Report;

pub(crate) const HELP_SHORT: char = 'h';
pub(crate) const HELP_LONG: &str = "help";
pub(crate) const HELP_DESCRIPTION: &str = "Display this help screen and quit.";
pub(crate) const VERSION_SHORT: char = 'V';
pub(crate) const VERSION_LONG: &str = "version";
pub(crate) const VERSION_DESCRIPTION: &str = "Display the program's version and quit.";

// ============================================================================
// Result and Error types
// ============================================================================

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// Carries the token as typed, including any `=value` part.
    #[error("Unrecognized option {0}")]
    UnrecognizedOption(String),

    #[error("Missing argument for option {0}")]
    MissingArgument(OptionName),

    #[error("Argument `{argument}' not expected for option {option}")]
    UnexpectedArgument { argument: String, option: OptionName },

    #[error("Argument `{argument}' passed to option {option} is not a valid {expected}.")]
    InvalidFormat {
        argument: String,
        option: OptionName,
        expected: Expected,
    },

    #[error("Argument `{argument}' passed to option {option} {limit}.")]
    OutOfRange {
        argument: String,
        option: OptionName,
        limit: Limit,
    },

    /// A callback declined its argument; holds the callback's own message.
    #[error("{0}")]
    CallbackRejected(String),

    #[error("Bug: Unknown argument type {kind} for option {option}")]
    Bug {
        kind: &'static str,
        option: OptionName,
    },

    #[error("invalid option definition: {0}")]
    Definition(String),
}

/// The kind of value an argument failed to parse as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expected {
    UnsignedInteger,
    Integer,
    Float,
}

impl fmt::Display for Expected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expected::UnsignedInteger => write!(f, "unsigned integer"),
            Expected::Integer => write!(f, "integer"),
            Expected::Float => write!(f, "floating point number"),
        }
    }
}

/// Which way a numeric argument fell outside its representable range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Limit {
    TooLarge,
    TooSmall,
    Underflow,
}

impl fmt::Display for Limit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Limit::TooLarge => write!(f, "is too large"),
            Limit::TooSmall => write!(f, "is too small"),
            Limit::Underflow => write!(f, "would cause an underflow"),
        }
    }
}

/// An option as the user addressed it: `-c` or `--name`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionName {
    Short(char),
    Long(String),
}

impl OptionName {
    /// The dashes that introduce this form of the option.
    pub fn prefix(&self) -> &'static str {
        match self {
            OptionName::Short(_) => "-",
            OptionName::Long(_) => "--",
        }
    }
}

impl fmt::Display for OptionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionName::Short(c) => write!(f, "-{}", c),
            OptionName::Long(name) => write!(f, "--{}", name),
        }
    }
}

// ============================================================================
// ArgType
// ============================================================================

/// User-supplied argument handler. Receives the argument text (`None` for
/// `CallbackNoArg`) and the option as typed; an `Err` message is reported
/// verbatim after the program name.
pub type Callback<'s, 'a> =
    Box<dyn Fn(Option<&'a str>, &OptionName) -> std::result::Result<(), String> + 's>;

pub enum ArgType<'s, 'a> {
    /// Sets the cell to `true`.
    Bool(&'s Cell<bool>),
    /// Sets the cell to `false`; may share its cell with a `Bool` option.
    NegatedBool(&'s Cell<bool>),
    String(&'s Cell<Option<&'a str>>),
    Int(&'s Cell<i64>),
    UInt(&'s Cell<u64>),
    Float(&'s Cell<f64>),
    Callback(Callback<'s, 'a>),
    CallbackNoArg(Callback<'s, 'a>),
}

impl ArgType<'_, '_> {
    /// Whether the option consumes an argument.
    pub fn takes_value(&self) -> bool {
        !matches!(
            self,
            ArgType::Bool(_) | ArgType::NegatedBool(_) | ArgType::CallbackNoArg(_)
        )
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            ArgType::Bool(_) => "bool",
            ArgType::NegatedBool(_) => "negated bool",
            ArgType::String(_) => "string",
            ArgType::Int(_) => "int",
            ArgType::UInt(_) => "uint",
            ArgType::Float(_) => "float",
            ArgType::Callback(_) => "callback",
            ArgType::CallbackNoArg(_) => "callback without argument",
        }
    }
}

impl fmt::Debug for ArgType<'_, '_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ArgType({})", self.kind_name())
    }
}

// ============================================================================
// Opt builder
// ============================================================================

#[derive(Debug)]
pub struct Opt<'s, 'a> {
    pub(crate) short_name: Option<char>,
    pub(crate) long_name: Option<&'s str>,
    pub(crate) arg_description: Option<&'s str>,
    pub(crate) arg_type: ArgType<'s, 'a>,
    pub(crate) found: Option<&'s Cell<bool>>,
    pub(crate) description: Option<&'s str>,
}

impl<'s, 'a> Opt<'s, 'a> {
    pub fn new(arg_type: ArgType<'s, 'a>) -> Self {
        Opt {
            short_name: None,
            long_name: None,
            arg_description: None,
            arg_type,
            found: None,
            description: None,
        }
    }

    pub fn flag(cell: &'s Cell<bool>) -> Self {
        Self::new(ArgType::Bool(cell))
    }

    pub fn negated(cell: &'s Cell<bool>) -> Self {
        Self::new(ArgType::NegatedBool(cell))
    }

    pub fn string(cell: &'s Cell<Option<&'a str>>) -> Self {
        Self::new(ArgType::String(cell))
    }

    pub fn int(cell: &'s Cell<i64>) -> Self {
        Self::new(ArgType::Int(cell))
    }

    pub fn uint(cell: &'s Cell<u64>) -> Self {
        Self::new(ArgType::UInt(cell))
    }

    pub fn float(cell: &'s Cell<f64>) -> Self {
        Self::new(ArgType::Float(cell))
    }

    pub fn callback<F>(func: F) -> Self
    where
        F: Fn(Option<&'a str>, &OptionName) -> std::result::Result<(), String> + 's,
    {
        Self::new(ArgType::Callback(Box::new(func)))
    }

    pub fn callback_no_arg<F>(func: F) -> Self
    where
        F: Fn(&OptionName) -> std::result::Result<(), String> + 's,
    {
        Self::new(ArgType::CallbackNoArg(Box::new(
            move |_: Option<&'a str>, name: &OptionName| func(name),
        )))
    }

    pub fn short(mut self, c: char) -> Self {
        self.short_name = Some(c);
        self
    }

    /// Long name without the leading dashes.
    pub fn long(mut self, name: &'s str) -> Self {
        self.long_name = Some(name);
        self
    }

    /// Placeholder shown in help output, e.g. `FILE` renders as `--file=<FILE>`.
    pub fn arg_description(mut self, template: &'s str) -> Self {
        self.arg_description = Some(template);
        self
    }

    pub fn description(mut self, text: &'s str) -> Self {
        self.description = Some(text);
        self
    }

    /// Cell set to `true` whenever the option is matched.
    pub fn found(mut self, flag: &'s Cell<bool>) -> Self {
        self.found = Some(flag);
        self
    }

    pub fn short_name(&self) -> Option<char> {
        self.short_name
    }

    pub fn long_name(&self) -> Option<&'s str> {
        self.long_name
    }

    pub fn arg_type(&self) -> &ArgType<'s, 'a> {
        &self.arg_type
    }

    fn is_named(&self) -> bool {
        self.short_name.is_some() || self.long_name.is_some()
    }

    pub(crate) fn mark_found(&self) {
        if let Some(flag) = self.found {
            flag.set(true);
        }
    }
}

// ============================================================================
// OptionTable
// ============================================================================

#[derive(Debug)]
enum TableEntry<'s, 'a> {
    Option(Opt<'s, 'a>),
    End,
}

#[derive(Debug)]
pub struct OptionTable<'s, 'a> {
    entries: Vec<TableEntry<'s, 'a>>,
}

impl<'s, 'a> OptionTable<'s, 'a> {
    pub fn new() -> Self {
        OptionTable {
            entries: Vec::new(),
        }
    }

    pub fn option(mut self, opt: Opt<'s, 'a>) -> Self {
        self.entries.push(TableEntry::Option(opt));
        self
    }

    /// Terminate the table; entries added afterwards are never consulted.
    pub fn end(mut self) -> Self {
        self.entries.push(TableEntry::End);
        self
    }

    /// Options in table order, up to the first terminator.
    pub fn iter(&self) -> impl Iterator<Item = &Opt<'s, 'a>> + '_ {
        self.entries.iter().map_while(|entry| match entry {
            TableEntry::Option(opt) if opt.is_named() => Some(opt),
            _ => None,
        })
    }
}

impl Default for OptionTable<'_, '_> {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// HelpLayout
// ============================================================================

/// Columns used by the help screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HelpLayout {
    pub short_column: usize,
    pub long_column: usize,
    pub description_column: usize,
    /// Descriptions wrap before reaching this column.
    pub wrap_column: usize,
}

impl Default for HelpLayout {
    fn default() -> Self {
        HelpLayout {
            short_column: 2,
            long_column: 6,
            description_column: 28,
            wrap_column: 78,
        }
    }
}

// ============================================================================
// ContextBuilder
// ============================================================================

pub struct ContextBuilder<'s, 'a> {
    name: String,
    version: String,
    usage: String,
    summary: String,
    description: String,
    options: OptionTable<'s, 'a>,
    layout: HelpLayout,
}

impl<'s, 'a> ContextBuilder<'s, 'a> {
    pub fn new(name: &str) -> Self {
        ContextBuilder {
            name: name.to_string(),
            version: String::new(),
            usage: String::new(),
            summary: String::new(),
            description: String::new(),
            options: OptionTable::new(),
            layout: HelpLayout::default(),
        }
    }

    pub fn version(mut self, version: &str) -> Self {
        self.version = version.to_string();
        self
    }

    /// Usage line shown after the program name, e.g. `[OPTIONS] FILE...`.
    pub fn usage(mut self, usage: &str) -> Self {
        self.usage = usage.to_string();
        self
    }

    pub fn summary(mut self, summary: &str) -> Self {
        self.summary = summary.to_string();
        self
    }

    pub fn description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    pub fn options(mut self, opts: OptionTable<'s, 'a>) -> Self {
        self.options = opts;
        self
    }

    pub fn layout(mut self, layout: HelpLayout) -> Self {
        self.layout = layout;
        self
    }

    pub fn build(self) -> Result<Context<'s, 'a>> {
        for opt in self.options.iter() {
            if let Some(c) = opt.short_name {
                if c == '-' || c == '=' || c.is_whitespace() {
                    return Err(Error::Definition(format!(
                        "short option name {:?} cannot be parsed",
                        c
                    )));
                }
            }
            if let Some(name) = opt.long_name {
                if name.is_empty() || name.starts_with('-') || name.contains('=') {
                    return Err(Error::Definition(format!(
                        "long option name {:?} cannot be parsed",
                        name
                    )));
                }
            }
        }

        Ok(Context {
            name: self.name,
            version: self.version,
            usage: self.usage,
            summary: self.summary,
            description: self.description,
            options: self.options,
            layout: self.layout,
        })
    }
}

// ============================================================================
// Context
// ============================================================================

/// How a parse ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Ok,
    HelpShown,
    VersionShown,
    ParseError,
}

pub struct Context<'s, 'a> {
    name: String,
    version: String,
    usage: String,
    summary: String,
    description: String,
    options: OptionTable<'s, 'a>,
    layout: HelpLayout,
}

impl<'s, 'a> Context<'s, 'a> {
    pub fn builder(name: &str) -> ContextBuilder<'s, 'a> {
        ContextBuilder::new(name)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn options(&self) -> &OptionTable<'s, 'a> {
        &self.options
    }

    pub fn layout(&self) -> HelpLayout {
        self.layout
    }

    /// Parse `argv` in place, printing diagnostics to stderr and help or
    /// version output to stdout.
    ///
    /// `argv[0]` is the invocation name and is left alone. On return `argv`
    /// holds it followed by every unconsumed token, in the original order.
    pub fn parse(&self, argv: &mut Vec<&'a str>) -> Outcome {
        let stdout = std::io::stdout();
        let stderr = std::io::stderr();
        self.parse_with(argv, &mut stdout.lock(), &mut stderr.lock())
    }

    /// Like `parse`, writing to the given sinks. Each error is written as
    /// soon as it is found, so it lands in order with anything a callback
    /// prints itself.
    pub fn parse_with<W: Write, E: Write>(
        &self,
        argv: &mut Vec<&'a str>,
        out: &mut W,
        err: &mut E,
    ) -> Outcome {
        let report = self.scan(argv, &mut |error: &Error| {
            let _ = self.write_error(err, error);
        });
        let _ = self.write_outcome(&report, out, err);
        report.outcome()
    }

    fn write_outcome<W: Write, E: Write>(
        &self,
        report: &Report,
        out: &mut W,
        err: &mut E,
    ) -> std::io::Result<()> {
        match report.outcome() {
            Outcome::HelpShown => {
                if report.has_errors() {
                    writeln!(err)?;
                }
                self.write_help(out)
            }
            Outcome::VersionShown => {
                if report.has_errors() {
                    writeln!(err)?;
                }
                self.write_version(out)
            }
            Outcome::ParseError => self.write_error_usage(out, err),
            Outcome::Ok => Ok(()),
        }
    }

    /// One diagnostic line: `<program>: <message>`.
    pub fn write_error<E: Write>(&self, err: &mut E, error: &Error) -> std::io::Result<()> {
        writeln!(err, "{}: {}", self.name, error)
    }
}
