use std::cell::Cell;
use std::fmt;
use std::io::{self, Write};

use clopt::{Context, Opt, OptionName, OptionTable};

use crate::error::DemoError;

pub const PROG_NAME: &str = "clopt-demo";
const PROG_USAGE: &str = "[OPTIONS] [FILE1 [FILE2 [...]]]";
const PROG_SUMMARY: &str = "Projectile launcher demonstrating the clopt option parser";

const PROG_DESCRIPTION: &str = "\
This program exercises every option kind the clopt library understands:
flags and their negations, strings, signed and unsigned integers, floating
point numbers, and a custom quality type decoded by a callback.

After parsing it prints the values it collected and the files that were
left on the command line.  Nothing is launched.
";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quality {
    Good,
    Bad,
    Ugly,
}

impl Quality {
    /// Case-insensitive lookup by name.
    pub fn from_name(name: &str) -> Option<Quality> {
        [Quality::Good, Quality::Bad, Quality::Ugly]
            .into_iter()
            .find(|q| name.eq_ignore_ascii_case(&q.to_string()))
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Quality::Good => write!(f, "good"),
            Quality::Bad => write!(f, "bad"),
            Quality::Ugly => write!(f, "ugly"),
        }
    }
}

/// Everything the command line can set. `*_given` cells record whether the
/// matching option appeared at all.
#[derive(Debug)]
pub struct Settings<'a> {
    pub automatic: Cell<bool>,
    pub automatic_given: Cell<bool>,
    pub manual_given: Cell<bool>,
    pub label: Cell<Option<&'a str>>,
    pub direction: Cell<i64>,
    pub direction_given: Cell<bool>,
    pub velocity: Cell<u64>,
    pub velocity_given: Cell<bool>,
    pub rating: Cell<f64>,
    pub rating_given: Cell<bool>,
    pub quality: Cell<Quality>,
    pub quality_given: Cell<bool>,
}

impl Default for Settings<'_> {
    fn default() -> Self {
        Settings {
            automatic: Cell::new(false),
            automatic_given: Cell::new(false),
            manual_given: Cell::new(false),
            label: Cell::new(None),
            direction: Cell::new(0),
            direction_given: Cell::new(false),
            velocity: Cell::new(0),
            velocity_given: Cell::new(false),
            rating: Cell::new(0.0),
            rating_given: Cell::new(false),
            quality: Cell::new(Quality::Good),
            quality_given: Cell::new(false),
        }
    }
}

fn decode_quality(
    quality: &Cell<Quality>,
    text: Option<&str>,
    option: &OptionName,
) -> Result<(), String> {
    let text = text.unwrap_or_default();
    let q = Quality::from_name(text).ok_or_else(|| {
        DemoError::UnknownQuality {
            argument: text.to_string(),
            option: option.clone(),
        }
        .to_string()
    })?;
    quality.set(q);
    Ok(())
}

// `-r` has no description and `-m` no long name; both layouts show in --help.
fn build_options<'s, 'a>(settings: &'s Settings<'a>) -> OptionTable<'s, 'a> {
    let quality = &settings.quality;

    OptionTable::new()
        .option(
            Opt::flag(&settings.automatic)
                .short('a')
                .long("automatic")
                .found(&settings.automatic_given)
                .description("Perform the requested action automatically."),
        )
        .option(
            Opt::negated(&settings.automatic)
                .short('m')
                .found(&settings.manual_given)
                .description(
                    "Perform the requested action manually.  This option has an \
                     intentionally long description, as to show the line-wrapping \
                     support.",
                ),
        )
        .option(
            Opt::string(&settings.label)
                .short('l')
                .long("label")
                .arg_description("NAME")
                .description("Label to display."),
        )
        .option(
            Opt::float(&settings.rating)
                .short('r')
                .long("rating")
                .arg_description("RATING")
                .found(&settings.rating_given),
        )
        .option(
            Opt::int(&settings.direction)
                .long("direction")
                .arg_description("DIR")
                .found(&settings.direction_given)
                .description("Projectile direction."),
        )
        .option(
            Opt::uint(&settings.velocity)
                .short('v')
                .arg_description("VEL")
                .found(&settings.velocity_given)
                .description("Projectile velocity."),
        )
        .option(
            Opt::callback(move |text, option| decode_quality(quality, text, option))
                .short('q')
                .long("quality")
                .arg_description("GOOD|BAD|UGLY")
                .found(&settings.quality_given)
                .description("Quality of the projectiles to be used."),
        )
        .end()
}

pub fn build_context<'s, 'a>(settings: &'s Settings<'a>) -> clopt::Result<Context<'s, 'a>> {
    Context::builder(PROG_NAME)
        .version(env!("CARGO_PKG_VERSION"))
        .usage(PROG_USAGE)
        .summary(PROG_SUMMARY)
        .description(PROG_DESCRIPTION)
        .options(build_options(settings))
        .build()
}

/// `%.6g`: six significant digits, trailing zeros dropped, exponent form
/// outside 1e-4..1e6.
fn format_g(v: f64) -> String {
    if v.is_nan() {
        return "nan".to_string();
    }
    if v.is_infinite() {
        return if v > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    if v == 0.0 {
        return "0".to_string();
    }

    fn trim_fraction(s: &str) -> &str {
        if s.contains('.') {
            s.trim_end_matches('0').trim_end_matches('.')
        } else {
            s
        }
    }

    // Round first so the exponent reflects the printed digits.
    let sci = format!("{:.5e}", v);
    let Some((mantissa, exp)) = sci.split_once('e') else {
        return sci;
    };
    let exp: i32 = exp.parse().unwrap_or(0);

    if exp >= -4 && exp < 6 {
        let fixed = format!("{:.*}", (5 - exp) as usize, v);
        trim_fraction(&fixed).to_string()
    } else {
        format!(
            "{}e{}{:02}",
            trim_fraction(mantissa),
            if exp < 0 { '-' } else { '+' },
            exp.abs()
        )
    }
}

fn given_or_unspecified<T: fmt::Display>(given: bool, value: T) -> String {
    if given {
        value.to_string()
    } else {
        "unspecified".to_string()
    }
}

fn yes_no(b: bool) -> &'static str {
    if b {
        "yes"
    } else {
        "no"
    }
}

/// Summary of the collected settings followed by the remaining files.
pub fn write_report<W: Write>(out: &mut W, settings: &Settings<'_>, files: &[&str]) -> io::Result<()> {
    write!(out, "The following information was retrieved from the command line:\n")?;
    write!(
        out,
        "    Label:          {}\n",
        settings.label.get().unwrap_or("unspecified")
    )?;
    write!(
        out,
        "    Operation type: {} (manual opt: {}, automatic opt: {})\n",
        if settings.automatic.get() {
            "automatic"
        } else {
            "manual"
        },
        yes_no(settings.manual_given.get()),
        yes_no(settings.automatic_given.get())
    )?;
    write!(
        out,
        "    Direction:      {}\n",
        given_or_unspecified(settings.direction_given.get(), settings.direction.get())
    )?;
    write!(
        out,
        "    Velocity:       {}\n",
        given_or_unspecified(settings.velocity_given.get(), settings.velocity.get())
    )?;
    write!(
        out,
        "    Rating:         {}\n",
        given_or_unspecified(settings.rating_given.get(), format_g(settings.rating.get()))
    )?;
    write!(
        out,
        "    Quality:        {}\n",
        given_or_unspecified(settings.quality_given.get(), settings.quality.get())
    )?;

    write!(
        out,
        "\nIf this program did anything, it would process the following files:\n"
    )?;
    if files.is_empty() {
        write!(out, "    none\n")?;
    }
    for file in files {
        write!(out, "    \"{}\"\n", file)?;
    }
    Ok(())
}
