//! # Optics CLI
//!
//! Command-line calculator and practice quiz for optician exam prep.
//!
//! ```bash
//! optics_cli transpose "+2.00 +1.00 x 090"
//! optics_cli vertex --power -6.00 --from 12 --to 0
//! optics_cli prentice --power -6.00 --decentration 3 --oc-shift out
//! optics_cli blank --a 54 --dbl 16 --pd 64 --ed 58
//! optics_cli thickness --power -4.00 --index 1.5 --diameter 60 --min-thickness 2
//! optics_cli quiz --count 5 --kind prism
//! optics_cli check
//! optics_cli --json categories
//! ```
//!
//! `--config` loads lab settings from TOML; `--json` prints results as JSON
//! (errors included) for scripting.

mod quiz;
mod telemetry;

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use serde_json::json;
use tracing::debug;

use optics_core::formulas::decentration::{
    frame_pd, minimum_blank_size, per_lens_decentration, BlankCatalog, StandardBlanks,
};
use optics_core::formulas::prism::{format_prism, induced_base, prentice_prism, Direction};
use optics_core::formulas::thickness::{estimate_thickness, ThicknessInput};
use optics_core::formulas::transposition::{spherical_equivalent, transpose, Prescription};
use optics_core::formulas::vertex::compensate_between;
use optics_core::problems::selector::random_problems_with;
use optics_core::{categories, load_settings, verify_bank, CalculationKind, Difficulty, OpticsError, OpticsSettings};

#[derive(Debug, Parser)]
#[command(name = "optics_cli", version, about = "Ophthalmic optics calculator and practice quiz")]
struct Cli {
    /// TOML file with lab settings (blank sizes, margins, rounding steps)
    #[arg(long, global = true, env = "OPTICS_CONFIG")]
    config: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Transpose a prescription between plus- and minus-cylinder form
    Transpose {
        /// Prescription, e.g. "+2.00 +1.00 x 090"
        #[arg(allow_hyphen_values = true)]
        rx: String,
    },
    /// Compensate a lens power for a change in vertex distance
    Vertex {
        /// Refracted power (D)
        #[arg(long, allow_negative_numbers = true)]
        power: f64,
        /// Refracted vertex distance (mm); defaults to the configured vertex
        #[arg(long)]
        from: Option<f64>,
        /// New vertex distance (mm); 0 for the corneal plane
        #[arg(long)]
        to: f64,
    },
    /// Prism induced by decentration (Prentice's Rule)
    Prentice {
        /// Lens power (D)
        #[arg(long, allow_negative_numbers = true)]
        power: f64,
        /// Distance between OC and pupil (mm)
        #[arg(long)]
        decentration: f64,
        /// Where the OC sits relative to the pupil; adds the base direction
        #[arg(long, value_enum)]
        oc_shift: Option<ShiftArg>,
    },
    /// Minimum blank size and the smallest stocked blank that fits
    Blank {
        /// Eye size A (mm)
        #[arg(long)]
        a: f64,
        /// Bridge DBL (mm)
        #[arg(long)]
        dbl: f64,
        /// Patient binocular PD (mm)
        #[arg(long)]
        pd: f64,
        /// Effective diameter (mm)
        #[arg(long)]
        ed: f64,
    },
    /// Approximate centre and edge thickness
    Thickness {
        /// Lens power (D)
        #[arg(long, allow_negative_numbers = true)]
        power: f64,
        /// Refractive index
        #[arg(long, default_value_t = 1.498)]
        index: f64,
        /// Lens diameter (mm)
        #[arg(long)]
        diameter: f64,
        /// Centre thickness for minus lenses, edge thickness for plus (mm)
        #[arg(long)]
        min_thickness: f64,
        /// Decentration (mm)
        #[arg(long, default_value_t = 0.0)]
        decentration: f64,
    },
    /// Practice quiz on random problems from the bank
    Quiz {
        /// Number of questions
        #[arg(long, short = 'n', default_value_t = 5)]
        count: usize,
        /// Only this kind (e.g. "prism", "vertex_distance")
        #[arg(long)]
        kind: Option<String>,
        /// Only this difficulty (easy, medium, hard)
        #[arg(long)]
        difficulty: Option<String>,
        /// Seed for a reproducible draw
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Verify every stored answer against its formula
    Check,
    /// List calculation categories and problem counts
    Categories,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ShiftArg {
    In,
    Out,
    Up,
    Down,
}

impl From<ShiftArg> for Direction {
    fn from(shift: ShiftArg) -> Self {
        match shift {
            ShiftArg::In => Direction::In,
            ShiftArg::Out => Direction::Out,
            ShiftArg::Up => Direction::Up,
            ShiftArg::Down => Direction::Down,
        }
    }
}

fn main() -> ExitCode {
    telemetry::init_tracing();
    let cli = Cli::parse();

    match run(&cli) {
        Ok(code) => code,
        Err(e) => {
            if cli.json {
                let body = match e.downcast_ref::<OpticsError>() {
                    Some(optics) => json!({ "error": optics, "message": format!("{:#}", e) }),
                    None => json!({ "error": { "type": "Other" }, "message": format!("{:#}", e) }),
                };
                println!("{}", body);
            } else {
                eprintln!("Error: {:#}", e);
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<ExitCode> {
    let settings = match &cli.config {
        Some(path) => load_settings(path).with_context(|| format!("loading settings from {}", path.display()))?,
        None => OpticsSettings::default(),
    };

    match &cli.command {
        Commands::Transpose { rx } => {
            let parsed: Prescription = rx.parse()?;
            let transposed = transpose(&parsed)?;
            let se = spherical_equivalent(parsed.sphere, parsed.cylinder)?;
            emit(
                cli.json,
                &json!({ "input": parsed, "transposed": transposed, "spherical_equivalent": se }),
                || {
                    println!("{}  ->  {}", parsed, transposed);
                    println!("Spherical equivalent: {:+.3} D", se);
                },
            )?;
        }
        Commands::Vertex { power, from, to } => {
            let from = from.unwrap_or(settings.default_vertex_mm);
            let compensated = compensate_between(*power, from, *to)?;
            emit(
                cli.json,
                &json!({ "power": power, "from_mm": from, "to_mm": to, "compensated": compensated }),
                || println!("{:+.2} D at {} mm  ->  {:+.2} D at {} mm", power, from, compensated, to),
            )?;
        }
        Commands::Prentice {
            power,
            decentration,
            oc_shift,
        } => {
            let prism = prentice_prism(*decentration, *power)?;
            let base = oc_shift.and_then(|s| induced_base(*power, s.into()));
            emit(
                cli.json,
                &json!({ "prism": prism, "base": base }),
                || match base {
                    Some(base) => println!("{}", format_prism(prism, base)),
                    None => println!("{:.2} Δ", prism),
                },
            )?;
        }
        Commands::Blank { a, dbl, pd, ed } => {
            let report = blank_report(*a, *dbl, *pd, *ed, &settings)?;
            emit(cli.json, &report, || {
                let dec = report.decentration_mm;
                println!("Frame PD:      {:.1} mm", report.frame_pd_mm);
                println!("Decentration:  {:.1} mm {}", dec.abs(), if dec >= 0.0 { "in" } else { "out" });
                println!("Minimum blank: {:.1} mm", report.minimum_blank_mm);
                match report.stocked_blank_mm {
                    Some(size) => println!("Order blank:   {:.0} mm", size),
                    None => println!("Order blank:   none stocked large enough"),
                }
            })?;
        }
        Commands::Thickness {
            power,
            index,
            diameter,
            min_thickness,
            decentration,
        } => {
            let result = estimate_thickness(&ThicknessInput {
                power: *power,
                index: *index,
                diameter_mm: *diameter,
                min_thickness_mm: *min_thickness,
                decentration_mm: *decentration,
            })?;
            emit(cli.json, &result, || {
                println!("Centre: {:.2} mm", result.center_mm);
                println!("Edge:   {:.2} mm", result.edge_mm);
                println!("Sag:    {:.2} mm", result.sag_mm);
            })?;
        }
        Commands::Quiz {
            count,
            kind,
            difficulty,
            seed,
        } => {
            let kind = kind.as_deref().map(parse_kind).transpose()?;
            let difficulty = difficulty.as_deref().map(parse_difficulty).transpose()?;
            let mut rng = match seed {
                Some(seed) => StdRng::seed_from_u64(*seed),
                None => StdRng::from_entropy(),
            };

            let mut problems = random_problems_with(usize::MAX, kind, &mut rng);
            if let Some(difficulty) = difficulty {
                problems.retain(|p| p.difficulty == difficulty);
            }
            problems.truncate(*count);
            debug!(count = problems.len(), "starting quiz");

            let stdin = io::stdin();
            let mut transcript = Transcript::for_output(cli.json).writer();
            let summary = quiz::run_quiz(&problems, &settings, &mut stdin.lock(), &mut transcript)?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            }
        }
        Commands::Check => {
            let discrepancies = verify_bank(&settings);
            emit(cli.json, &discrepancies, || {
                if discrepancies.is_empty() {
                    println!("[OK] Every stored answer matches its formula");
                }
                for d in &discrepancies {
                    println!("[FAIL] {}: stored {}, {}", d.problem_id, d.stored, d.reason);
                }
            })?;
            if !discrepancies.is_empty() {
                return Ok(ExitCode::FAILURE);
            }
        }
        Commands::Categories => {
            let rows: Vec<_> = categories()
                .iter()
                .map(|c| json!({ "kind": c.kind, "title": c.title, "problems": c.problems.len() }))
                .collect();
            emit(cli.json, &rows, || {
                for c in categories() {
                    println!("{:<18} {:<28} {} problems", c.kind.slug(), c.title, c.problems.len());
                }
            })?;
        }
    }

    Ok(ExitCode::SUCCESS)
}

#[derive(Debug, Serialize)]
struct BlankReport {
    frame_pd_mm: f64,
    decentration_mm: f64,
    minimum_blank_mm: f64,
    stocked_blank_mm: Option<f64>,
}

fn blank_report(a: f64, dbl: f64, pd: f64, ed: f64, settings: &OpticsSettings) -> Result<BlankReport> {
    let frame_pd_mm = frame_pd(a, dbl)?;
    let decentration_mm = per_lens_decentration(frame_pd_mm, pd)?;
    let minimum_blank_mm = minimum_blank_size(ed, decentration_mm, settings.blank_safety_margin_mm)?;
    let stocked_blank_mm = StandardBlanks::new(settings.blank_sizes_mm.clone()).next_available(minimum_blank_mm);
    Ok(BlankReport {
        frame_pd_mm,
        decentration_mm,
        minimum_blank_mm,
        stocked_blank_mm,
    })
}

/// Where the quiz transcript goes; stdout is reserved for JSON under `--json`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Transcript {
    Stdout,
    Stderr,
}

impl Transcript {
    fn for_output(json: bool) -> Self {
        if json {
            Transcript::Stderr
        } else {
            Transcript::Stdout
        }
    }

    fn writer(self) -> Box<dyn Write> {
        match self {
            Transcript::Stdout => Box::new(io::stdout()),
            Transcript::Stderr => Box::new(io::stderr()),
        }
    }
}

/// Print `value` as JSON, or run the human-readable printer.
fn emit<T: Serialize + ?Sized>(as_json: bool, value: &T, human: impl FnOnce()) -> Result<()> {
    if as_json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        human();
    }
    Ok(())
}

fn parse_kind(slug: &str) -> Result<CalculationKind> {
    CalculationKind::from_slug(slug).ok_or_else(|| {
        let known: Vec<_> = CalculationKind::ALL.iter().map(|k| k.slug()).collect();
        anyhow::anyhow!("unknown kind '{}' (expected one of: {})", slug, known.join(", "))
    })
}

fn parse_difficulty(slug: &str) -> Result<Difficulty> {
    Difficulty::from_slug(slug).ok_or_else(|| anyhow::anyhow!("unknown difficulty '{}' (easy, medium, hard)", slug))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_negative_powers_parse() {
        let cli = Cli::try_parse_from(["optics_cli", "vertex", "--power", "-6.00", "--to", "0"]).unwrap();
        match cli.command {
            Commands::Vertex { power, from, to } => {
                assert_eq!(power, -6.0);
                assert_eq!(from, None);
                assert_eq!(to, 0.0);
            }
            other => panic!("parsed {:?}", other),
        }
    }

    #[test]
    fn test_transpose_accepts_leading_minus() {
        let cli = Cli::try_parse_from(["optics_cli", "--json", "transpose", "-3.50 +1.50 x 090"]).unwrap();
        assert!(cli.json);
        assert!(matches!(cli.command, Commands::Transpose { ref rx } if rx == "-3.50 +1.50 x 090"));
    }

    #[test]
    fn test_blank_report_uses_core_validation() {
        let settings = OpticsSettings::default();
        let report = blank_report(54.0, 16.0, 64.0, 58.0, &settings).unwrap();
        assert_eq!(report.frame_pd_mm, 70.0);
        assert_eq!(report.minimum_blank_mm, 66.0);
        assert_eq!(report.stocked_blank_mm, Some(70.0));

        let err = blank_report(-10.0, 80.0, 64.0, 58.0, &settings).unwrap_err();
        let optics = err.downcast_ref::<OpticsError>().unwrap();
        assert_eq!(optics.error_code(), "INVALID_INPUT");
        assert!(blank_report(50.0, -2.0, 64.0, 58.0, &settings).is_err());
    }

    #[test]
    fn test_quiz_transcript_leaves_stdout_for_json() {
        assert_eq!(Transcript::for_output(true), Transcript::Stderr);
        assert_eq!(Transcript::for_output(false), Transcript::Stdout);
    }

    #[test]
    fn test_parse_kind_and_difficulty() {
        assert_eq!(parse_kind("base_curve").unwrap(), CalculationKind::BaseCurve);
        assert!(parse_kind("astrology").is_err());
        assert_eq!(parse_difficulty("Medium").unwrap(), Difficulty::Medium);
        assert!(parse_difficulty("expert").is_err());
    }
}
