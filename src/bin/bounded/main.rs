extern crate bounded;
extern crate env_logger;
#[macro_use]
extern crate failure;
extern crate itertools;
extern crate log;
extern crate serde;
extern crate serde_json;
#[macro_use]
extern crate structopt;

use std::fmt::{Debug, Display};
use std::str::FromStr;

use itertools::Itertools as _;
use serde_json::json;
use structopt::StructOpt as _;

use bounded::{BoundedValue, InPlace, InPlaceOp, Width};

#[derive(Debug, StructOpt)]
struct CliApp {
    /// enable debug log output
    #[structopt(long)]
    verbose: bool,

    #[structopt(subcommand)]
    command: CliCommand,
}

#[derive(Debug, StructOpt)]
enum CliCommand {
    /// Clamp a value into its bounds, optionally after applying in-place operators.
    #[structopt(name = "clamp")]
    Clamp(CliCommandClamp),

    /// Check that a value lies within its bounds, without clamping it.
    ///
    /// Fails if the value is out of bounds.
    #[structopt(name = "check")]
    Check(CliCommandCheck),
}

#[derive(Debug, StructOpt)]
struct CliBounds {
    /// Type of the value and the bounds (int, real, char, text).
    #[structopt(long, default_value = "real")]
    kind: Kind,

    /// Inclusive lower bound.
    #[structopt(long, allow_hyphen_values = true)]
    minimum: Option<String>,

    /// Inclusive upper bound.
    #[structopt(long, allow_hyphen_values = true)]
    maximum: Option<String>,

    /// The value.
    #[structopt(allow_hyphen_values = true)]
    value: String,
}

#[derive(Debug, StructOpt)]
struct CliCommandClamp {
    #[structopt(flatten)]
    bounds: CliBounds,

    /// An in-place operator with its operand, e.g. '+=20' or '**=2'.
    /// Applied in order, clamping after each step.
    #[structopt(long = "then", number_of_values = 1, allow_hyphen_values = true)]
    steps: Vec<Step>,

    /// Print the result as JSON.
    #[structopt(long)]
    json: bool,
}

#[derive(Debug, StructOpt)]
struct CliCommandCheck {
    #[structopt(flatten)]
    bounds: CliBounds,
}

#[derive(Debug, Clone, Copy)]
enum Kind {
    Int,
    Real,
    Char,
    Text,
}

impl FromStr for Kind {
    type Err = failure::Error;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Ok(match name.to_ascii_lowercase().as_ref() {
            "int" | "integer" => Kind::Int,
            "real" | "float" => Kind::Real,
            "char" => Kind::Char,
            "text" | "string" => Kind::Text,
            _ => bail!("expected int, real, char or text, got: {:?}", name),
        })
    }
}

#[derive(Debug, Clone)]
struct Step {
    op: InPlaceOp,
    operand: String,
}

impl FromStr for Step {
    type Err = failure::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (op, operand) = InPlaceOp::split_prefix(s.trim()).ok_or_else(|| {
            format_err!("expected '<operator><operand>' like '+=20', but got: {:?}", s)
        })?;
        Ok(Step {
            op,
            operand: operand.trim().to_owned(),
        })
    }
}

impl Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}{}", self.op, self.operand)
    }
}

fn main() {
    let args = CliApp::from_args();
    init_logging(args.verbose);
    log::debug!("args: {:#?}", args);

    let result: Result<(), _> = match args.command {
        CliCommand::Clamp(cfg) => match cfg.bounds.kind {
            Kind::Int => command_clamp::<i64>(cfg),
            Kind::Real => command_clamp::<f64>(cfg),
            Kind::Char => command_clamp::<char>(cfg),
            Kind::Text => command_clamp::<String>(cfg),
        },
        CliCommand::Check(cfg) => match cfg.bounds.kind {
            Kind::Int => command_check::<i64>(cfg),
            Kind::Real => command_check::<f64>(cfg),
            Kind::Char => command_check::<char>(cfg),
            Kind::Text => command_check::<String>(cfg),
        },
    };

    if let Err(err) = result {
        eprintln!("ERROR: {}", err);
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let mut builder = env_logger::Builder::from_default_env();
    if verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.init();
}

fn parse_value<T>(what: &str, input: &str) -> Result<T, failure::Error>
where
    T: FromStr,
    T::Err: Display,
{
    input
        .parse()
        .map_err(|err| format_err!("while parsing {} {:?}: {}", what, input, err))
}

fn parse_bounds<T>(bounds: CliBounds) -> Result<(T, Option<T>, Option<T>), failure::Error>
where
    T: FromStr,
    T::Err: Display,
{
    let CliBounds {
        kind: _,
        minimum,
        maximum,
        value,
    } = bounds;

    let value = parse_value("<value>", &value)?;
    let minimum = minimum
        .map(|minimum| parse_value("--minimum", &minimum))
        .transpose()?;
    let maximum = maximum
        .map(|maximum| parse_value("--maximum", &maximum))
        .transpose()?;
    Ok((value, minimum, maximum))
}

fn command_clamp<T>(cfg: CliCommandClamp) -> Result<(), failure::Error>
where
    T: FromStr + PartialOrd + Clone + Display + InPlace + Width + serde::Serialize,
    T::Err: Display,
    <T as Width>::Output: serde::Serialize,
{
    let CliCommandClamp {
        bounds,
        steps,
        json,
    } = cfg;

    let (value, minimum, maximum) = parse_bounds::<T>(bounds)?;
    let mut bounded = BoundedValue::new(value, minimum, maximum);
    log::debug!("initial: {:?}", bounded);

    if !steps.is_empty() {
        log::debug!("applying steps: {}", steps.iter().format(" "));
    }

    for step in &steps {
        let rhs = parse_value("operand", &step.operand)?;
        bounded
            .apply(step.op, rhs)
            .map_err(|err| format_err!("cannot apply {}: {}", step, err))?;
        log::debug!("after {}: {:?}", step, bounded);
    }

    if json {
        println!(
            "{:#}",
            json!({
                "value": bounded.get(),
                "minimum": bounded.minimum(),
                "maximum": bounded.maximum(),
                "width": bounded.width(),
                "is_bounded": bounded.is_bounded(),
                "steps": steps.iter().map(ToString::to_string).collect_vec(),
            })
        );
    } else {
        println!("{}", bounded);
    }

    Ok(())
}

fn command_check<T>(cfg: CliCommandCheck) -> Result<(), failure::Error>
where
    T: FromStr + PartialOrd + Clone + Display + Debug + Send + Sync + 'static,
    T::Err: Display,
{
    let (value, minimum, maximum) = parse_bounds::<T>(cfg.bounds)?;
    let bounded = BoundedValue::checked(value, minimum, maximum)?;
    println!("{:?}", bounded);
    Ok(())
}
