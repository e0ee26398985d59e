/*!
This binary computes degrees of support in `Probabilistic Argumentation Systems (PAS)` by utilising an implementation of `Ordered Binary Decision Diagrams (OBDD)`

# Probabilistic Argumentation Systems
A `probabilistic argumentation system` consists of a knowledge base over propositions and assumptions, where each assumption holds independently with a given probability.
For a hypothesis the quasi-support (QS) is the set of scenarios over the assumptions which, together with the knowledge base, entail the hypothesis. The support (SP) removes the scenarios which contradict the knowledge base.
The degrees of (quasi-)support are the probabilities of these sets.

# Ordered Binary Decision Diagram
An `ordered binary decision diagram` is a normalised representation of binary functions.
The probability of a DNF is computed in one sweep over its diagram; alternatively an evaluator based on the inclusion-exclusion principle is available.
The diagram of each evaluated DNF can be exported in the DOT format (<https://github.com/sybila/biodivine-lib-bdd> is used for the export).

If none of `--qs`, `--sp`, `--dqs`, and `--dsp` is given, everything is computed.

# Usage
```plain
Usage: pas-bdd [OPTIONS] <INPUT>

Arguments:
  <INPUT>  Input filename

Options:
      --rust_log <RUST_LOG>  Sets the verbosity to 'warn', 'info', 'debug' or 'trace' if -v and -q are not use [env: RUST_LOG=]
  -v...                      Sets log verbosity (multiple times means more verbose)
  -q                         Sets log verbosity to only errors
      --computer <COMPUTER>  Choose the evaluator of either 'bdd' or 'expansion' [default: bdd]
      --qs                   Compute the quasi-support of the hypothesis
      --sp                   Compute the support of the hypothesis
      --dqs                  Compute the degree of quasi-support of the hypothesis and of the inconsistency
      --dsp                  Compute the non-normalised and the normalised degree of support of the hypothesis
      --dot <DOT>            Write the decision diagram of each evaluated DNF as DOT graph to the given filename (only with the bdd evaluator)
      --json                 Print the results as JSON report
  -h, --help                 Print help
  -V, --version              Print version
```
 */

#![deny(
    missing_debug_implementations,
    missing_copy_implementations,
    trivial_casts,
    trivial_numeric_casts,
    unsafe_code
)]
#![warn(
    missing_docs,
    unused_import_braces,
    unused_qualifications,
    unused_extern_crates,
    variant_size_differences
)]

use std::path::PathBuf;

use clap::{ArgAction, Parser};
use pas_bdd::datatypes::LiteralFactory;
use pas_bdd::error::PasError;
use pas_bdd::numeric::NumericResolver;
use pas_bdd::parser::{PasInstance, PasParser};
use pas_bdd::probability::bdd::BddComputer;
use pas_bdd::probability::expansion::ExpansionComputer;
use pas_bdd::probability::{Evaluator, ProbabilityComputer};
use pas_bdd::resolver::SymbolicResolver;
use serde::Serialize;
use strum::VariantNames;

#[derive(Parser, Debug)]
#[command(name = "pas-bdd", author, version, about)]
struct App {
    /// Input filename
    input: PathBuf,
    /// Sets the verbosity to 'warn', 'info', 'debug' or 'trace' if -v and -q are not use
    #[arg(long = "rust_log", env)]
    rust_log: Option<String>,
    /// Sets log verbosity (multiple times means more verbose)
    #[arg(short, action = ArgAction::Count, group = "verbosity")]
    verbose: u8,
    /// Sets log verbosity to only errors
    #[arg(short, group = "verbosity")]
    quiet: bool,
    /// Choose the evaluator of either 'bdd' or 'expansion'
    #[arg(long, default_value = "bdd", value_parser = parse_evaluator)]
    computer: Evaluator,
    /// Compute the quasi-support of the hypothesis
    #[arg(long)]
    qs: bool,
    /// Compute the support of the hypothesis
    #[arg(long)]
    sp: bool,
    /// Compute the degree of quasi-support of the hypothesis and of the inconsistency
    #[arg(long)]
    dqs: bool,
    /// Compute the non-normalised and the normalised degree of support of the hypothesis
    #[arg(long)]
    dsp: bool,
    /// Write the decision diagram of each evaluated DNF as DOT graph to the given filename (only with the bdd evaluator)
    #[cfg(feature = "dotexport")]
    #[arg(long)]
    dot: Option<PathBuf>,
    /// Print the results as JSON report
    #[arg(long)]
    json: bool,
}

fn parse_evaluator(value: &str) -> Result<Evaluator, String> {
    value.parse::<Evaluator>().map_err(|_| {
        format!(
            "unknown evaluator '{}', possible values are {}",
            value,
            Evaluator::VARIANTS.join(", ")
        )
    })
}

/// The results of one run, fields which have not been requested are left out.
#[derive(Serialize, Debug, Default)]
struct Report {
    hypothesis: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    qs: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    sp: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    dqs: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    dqs_i: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    dsp: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    normalised_dsp: Option<f64>,
}

impl Report {
    fn print(&self) {
        println!("hypothesis: {}", self.hypothesis);
        if let Some(qs) = &self.qs {
            println!("QS: {}", qs);
        }
        if let Some(sp) = &self.sp {
            println!("SP: {}", sp);
        }
        if let (Some(dqs), Some(dqs_i)) = (self.dqs, self.dqs_i) {
            println!("dqs: {}", dqs);
            println!("dqs(inconsistency): {}", dqs_i);
        }
        if let (Some(dsp), Some(normalised)) = (self.dsp, self.normalised_dsp) {
            println!("dsp: {}", dsp);
            println!("dsp(normalised): {}", normalised);
        }
    }
}

impl App {
    fn run(&self) -> Result<(), Box<dyn std::error::Error>> {
        let filter_level = match self.verbose {
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            3 => log::LevelFilter::Trace,
            _ => {
                if self.quiet {
                    log::LevelFilter::Error
                } else if let Some(rust_log) = self.rust_log.clone() {
                    match rust_log.as_str() {
                        "error" => log::LevelFilter::Error,
                        "info" => log::LevelFilter::Info,
                        "debug" => log::LevelFilter::Debug,
                        "trace" => log::LevelFilter::Trace,
                        _ => log::LevelFilter::Warn,
                    }
                } else {
                    log::LevelFilter::Warn
                }
            }
        };
        env_logger::builder().filter_level(filter_level).init();
        log::info!("Version: {}", clap::crate_version!());

        let input = std::fs::read_to_string(&self.input).map_err(|e| {
            format!(
                "Error reading file {}: {}",
                self.input.to_string_lossy(),
                e
            )
        })?;
        let parser = PasParser::default();
        match parser.parse()(&input) {
            Ok((remain, _)) if remain.trim().is_empty() => log::info!("[Done] parsing"),
            Ok((remain, _)) => {
                return Err(format!(
                    "Error during parsing, cannot continue at:\n{}",
                    remain
                )
                .into())
            }
            Err(e) => {
                return Err(format!(
                    "Error during parsing:\n{} \n\n cannot continue",
                    e
                )
                .into())
            }
        }
        let mut factory = LiteralFactory::new();
        let instance = parser.instantiate(&mut factory)?;
        let resolver = SymbolicResolver::new(instance.knowledge_base.clone(), &factory)?;

        let report = match self.computer {
            Evaluator::Bdd => {
                #[cfg(feature = "dotexport")]
                let computer = match &self.dot {
                    Some(path) => BddComputer::with_dot_output(path),
                    None => BddComputer::new(),
                };
                #[cfg(not(feature = "dotexport"))]
                let computer = BddComputer::new();
                self.evaluate(NumericResolver::new(resolver, computer), &instance)
            }
            Evaluator::Expansion => {
                #[cfg(feature = "dotexport")]
                if self.dot.is_some() {
                    log::warn!("the decision diagram is only exported by the bdd evaluator");
                }
                self.evaluate(NumericResolver::new(resolver, ExpansionComputer), &instance)
            }
        }?;

        if self.json {
            let json = serde_json::to_string_pretty(&report)?;
            println!("{}", json);
        } else {
            report.print();
        }
        Ok(())
    }

    fn evaluate<C: ProbabilityComputer>(
        &self,
        numeric: NumericResolver<C>,
        instance: &PasInstance,
    ) -> Result<Report, PasError> {
        let everything = !(self.qs || self.sp || self.dqs || self.dsp);
        let hypothesis = &instance.hypothesis;
        let mut report = Report {
            hypothesis: hypothesis.to_string(),
            ..Default::default()
        };
        if everything || self.qs {
            report.qs = Some(numeric.symbolic().find_qs(hypothesis)?.to_string());
        }
        if everything || self.sp {
            report.sp = Some(numeric.symbolic().find_sp(hypothesis)?.to_string());
        }
        if everything || self.dqs {
            report.dqs = Some(numeric.calc_dqs(hypothesis)?);
            report.dqs_i = Some(numeric.calc_dqs_i()?);
        }
        if everything || self.dsp {
            report.dsp = Some(numeric.calc_non_normalised_dsp(hypothesis)?);
            report.normalised_dsp = Some(numeric.calc_normalised_dsp(hypothesis)?);
        }
        Ok(report)
    }
}

fn main() {
    let app = App::parse();
    if let Err(e) = app.run() {
        log::error!("{}", e);
        std::process::exit(1);
    }
}
