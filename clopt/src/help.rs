//! Help, usage and version screens.

use std::io::{self, Write};

use crate::column::ColumnWriter;
use crate::{
    Context, HelpLayout, HELP_DESCRIPTION, HELP_LONG, HELP_SHORT, VERSION_DESCRIPTION,
    VERSION_LONG, VERSION_SHORT,
};

/// One help entry: `-X, --name=<ARG>` followed by the wrapped description.
fn write_option<W: Write>(
    w: &mut ColumnWriter<W>,
    layout: &HelpLayout,
    short_name: Option<char>,
    long_name: Option<&str>,
    arg_description: Option<&str>,
    description: Option<&str>,
) -> io::Result<()> {
    if let Some(c) = short_name {
        w.advance_to(layout.short_column, false)?;
        w.write_str(&format!("-{}", c))?;
    }

    if let Some(name) = long_name {
        if short_name.is_some() {
            w.write_str(",")?;
        }
        w.advance_to(layout.long_column, true)?;
        w.write_str(&format!("--{}", name))?;
    }

    if let Some(template) = arg_description {
        let sep = if long_name.is_some() { "=" } else { " " };
        w.write_str(&format!("{}<{}>", sep, template))?;
    }

    if let Some(text) = description {
        w.write_wrapped(text, layout.description_column, layout.wrap_column)?;
    }
    w.newline()
}

impl Context<'_, '_> {
    /// Name, version and summary, then the usage line. With `hint`, adds a
    /// pointer to `--help`.
    pub fn write_usage<W: Write>(&self, out: &mut W, hint: bool) -> io::Result<()> {
        write!(out, "{} {} - {}\n", self.name, self.version, self.summary)?;
        write!(out, "Usage:\n    {} {}\n\n", self.name, self.usage)?;
        if hint {
            write!(
                out,
                "See `{} --{}' for more details.\n",
                self.name, HELP_LONG
            )?;
        }
        Ok(())
    }

    /// Separator line on `err`, then the usage block with the `--help` hint.
    pub fn write_error_usage<W: Write, E: Write>(&self, out: &mut W, err: &mut E) -> io::Result<()> {
        writeln!(err)?;
        self.write_usage(out, true)
    }

    pub fn write_help<W: Write>(&self, out: &mut W) -> io::Result<()> {
        self.write_usage(out, false)?;
        write!(out, "{}\nOptions:\n", self.description)?;

        let mut w = ColumnWriter::new(out);
        for opt in self.options.iter() {
            write_option(
                &mut w,
                &self.layout,
                opt.short_name,
                opt.long_name,
                opt.arg_description,
                opt.description,
            )?;
        }
        write_option(
            &mut w,
            &self.layout,
            Some(VERSION_SHORT),
            Some(VERSION_LONG),
            None,
            Some(VERSION_DESCRIPTION),
        )?;
        write_option(
            &mut w,
            &self.layout,
            Some(HELP_SHORT),
            Some(HELP_LONG),
            None,
            Some(HELP_DESCRIPTION),
        )
    }

    pub fn write_version<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "{} {}", self.name, self.version)
    }

    /// For errors the caller finds after a successful parse: a blank line on
    /// stderr to set off its own messages, then usage with the `--help` hint
    /// on stdout.
    pub fn print_error_usage(&self) {
        let stdout = io::stdout();
        let stderr = io::stderr();
        let _ = self.write_error_usage(&mut stdout.lock(), &mut stderr.lock());
    }
}
