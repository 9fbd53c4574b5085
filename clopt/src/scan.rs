//! Token classification, option lookup and compaction of the argument vector.

use log::{debug, trace};

use crate::{
    Context, Error, Opt, OptionName, OptionTable, Outcome, HELP_LONG, HELP_SHORT, VERSION_LONG,
    VERSION_SHORT,
};

/// What one pass over the argument vector found.
#[derive(Debug, Default)]
pub struct Report {
    help: bool,
    version: bool,
    errors: Vec<Error>,
}

impl Report {
    pub fn help_requested(&self) -> bool {
        self.help
    }

    pub fn version_requested(&self) -> bool {
        self.version
    }

    /// Problems in the order they were found.
    pub fn errors(&self) -> &[Error] {
        &self.errors
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Help beats version, either beats errors.
    pub fn outcome(&self) -> Outcome {
        if self.help {
            Outcome::HelpShown
        } else if self.version {
            Outcome::VersionShown
        } else if self.has_errors() {
            Outcome::ParseError
        } else {
            Outcome::Ok
        }
    }

    // The first of help/version to be requested wins.
    fn request_help(&mut self) {
        if !self.version {
            self.help = true;
        }
    }

    fn request_version(&mut self) {
        if !self.help {
            self.version = true;
        }
    }
}

impl<'s, 'a> OptionTable<'s, 'a> {
    /// Look up a long option by name or by a prefix of its name.
    ///
    /// The first option in table order whose name starts with `name` is
    /// taken, even when a later option is named exactly `name`.
    pub fn find_long(&self, name: &str) -> Option<&Opt<'s, 'a>> {
        if name.is_empty() {
            return None;
        }
        self.iter()
            .find(|opt| opt.long_name.is_some_and(|long| long.starts_with(name)))
    }

    pub fn find_short(&self, c: char) -> Option<&Opt<'s, 'a>> {
        self.iter().find(|opt| opt.short_name == Some(c))
    }
}

/// State of one scan: the argument slots (`None` once consumed), the report
/// being built, and where each error goes as soon as it is found.
struct Pass<'f, 'a> {
    slots: Vec<Option<&'a str>>,
    report: Report,
    on_error: &'f mut dyn FnMut(&Error),
}

impl<'a> Pass<'_, 'a> {
    fn fail(&mut self, error: Error) {
        debug!("{}", error);
        (self.on_error)(&error);
        self.report.errors.push(error);
    }

    /// Take the first unconsumed token at or after `from` as an option
    /// argument. Never looks past a `--`.
    fn take_next(&mut self, from: usize) -> Option<&'a str> {
        for slot in self.slots.iter_mut().skip(from) {
            match *slot {
                None => continue,
                Some("--") => return None,
                Some(token) => {
                    *slot = None;
                    return Some(token);
                }
            }
        }
        None
    }
}

impl<'s, 'a> Context<'s, 'a> {
    /// Parse `argv` in place without printing anything.
    ///
    /// Consumed tokens are removed from `argv`; the survivors keep their
    /// order behind `argv[0]`. Every problem is collected in the returned
    /// report rather than stopping at the first.
    pub fn try_parse(&self, argv: &mut Vec<&'a str>) -> Report {
        self.scan(argv, &mut |_: &Error| {})
    }

    /// `try_parse`, handing each error to `on_error` at the point it is found.
    pub(crate) fn scan(&self, argv: &mut Vec<&'a str>, on_error: &mut dyn FnMut(&Error)) -> Report {
        let mut pass = Pass {
            slots: argv.iter().copied().map(Some).collect(),
            report: Report::default(),
            on_error,
        };

        let mut index = 1;
        while index < pass.slots.len() {
            let Some(token) = pass.slots[index] else {
                index += 1;
                continue;
            };

            if token == "--" {
                debug!("option processing stopped at argument {}", index);
                pass.slots[index] = None;
                break;
            }

            if let Some(body) = token.strip_prefix("--") {
                pass.slots[index] = None;
                self.long_option(&mut pass, token, body, index);
            } else if let Some(cluster) = token.strip_prefix('-') {
                // A lone `-` is an empty cluster: dropped without effect.
                pass.slots[index] = None;
                self.short_options(&mut pass, cluster, index);
            } else {
                trace!("positional argument {:?}", token);
            }
            index += 1;
        }

        let before = argv.len();
        argv.clear();
        argv.extend(pass.slots.into_iter().flatten());
        trace!("compacted arguments from {} to {}", before, argv.len());

        let report = pass.report;
        debug!(
            "parse finished: {:?} with {} error(s)",
            report.outcome(),
            report.errors.len()
        );
        report
    }

    fn long_option(&self, pass: &mut Pass<'_, 'a>, token: &'a str, body: &'a str, index: usize) {
        if body == HELP_LONG {
            pass.report.request_help();
            return;
        }
        if body == VERSION_LONG {
            pass.report.request_version();
            return;
        }

        let (name, inline) = match body.split_once('=') {
            Some((name, value)) => (name, Some(value)),
            None => (body, None),
        };

        let Some(opt) = self.options.find_long(name) else {
            pass.fail(Error::UnrecognizedOption(token.to_string()));
            return;
        };
        opt.mark_found();

        let option = OptionName::Long(opt.long_name.unwrap_or(name).to_string());
        debug!("{} matched {}", token, option);

        if !opt.arg_type.takes_value() {
            let result = match inline {
                Some(argument) => Err(Error::UnexpectedArgument {
                    argument: argument.to_string(),
                    option,
                }),
                None => opt.arg_type.apply_flag(&option),
            };
            if let Err(error) = result {
                pass.fail(error);
            }
            return;
        }

        let Some(value) = inline.or_else(|| pass.take_next(index + 1)) else {
            pass.fail(Error::MissingArgument(option));
            return;
        };
        if let Err(error) = opt.arg_type.apply_value(value, &option) {
            pass.fail(error);
        }
    }

    /// Each character of a cluster is its own option. Those needing an
    /// argument take the following unconsumed tokens, in cluster order.
    fn short_options(&self, pass: &mut Pass<'_, 'a>, cluster: &str, index: usize) {
        for c in cluster.chars() {
            if c == HELP_SHORT {
                pass.report.request_help();
                continue;
            }
            if c == VERSION_SHORT {
                pass.report.request_version();
                continue;
            }

            let option = OptionName::Short(c);
            let Some(opt) = self.options.find_short(c) else {
                pass.fail(Error::UnrecognizedOption(option.to_string()));
                continue;
            };
            opt.mark_found();
            debug!("{} matched", option);

            let result = if opt.arg_type.takes_value() {
                match pass.take_next(index + 1) {
                    Some(value) => opt.arg_type.apply_value(value, &option),
                    None => Err(Error::MissingArgument(option)),
                }
            } else {
                opt.arg_type.apply_flag(&option)
            };
            if let Err(error) = result {
                pass.fail(error);
            }
        }
    }
}
