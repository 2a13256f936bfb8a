//! `compat-plan`: inspect the plan a compatibility manifest produces

use anyhow::Context;
use clap::{Arg, ArgAction, Command};
use compat_core::{CompatibilityPlan, Manifest};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

fn manifest_arg() -> Arg {
    Arg::new("manifest")
        .required(true)
        .value_parser(clap::value_parser!(PathBuf))
        .help("TOML manifest describing dimensions, excludes and namespaces")
}

fn load_plan(path: &Path) -> anyhow::Result<CompatibilityPlan> {
    let manifest = Manifest::load(path)?;
    let context = manifest.into_context()?;
    context
        .plan()
        .with_context(|| format!("cannot plan {}", path.display()))
}

fn print_text(plan: &CompatibilityPlan) {
    println!("Compatibility units ({}):", plan.matrix.len());
    for unit in plan.matrix.units() {
        let status = if unit.is_enabled() { "" } else { " [disabled]" };
        println!("  {}{} {}", unit.id(), status, unit.combination());
        for constraint in unit.constraints() {
            println!("      pin {constraint}");
        }
        if let Some(toolchain) = unit.toolchain() {
            println!("      toolchain {toolchain}");
        }
    }
    println!(
        "Lifecycle: {} -> {} units",
        plan.matrix.lifecycle().name,
        plan.matrix.lifecycle().depends_on.len()
    );

    if !plan.adapters.is_empty() {
        println!();
        println!("Adapters ({}):", plan.adapters.len());
        for adapter in plan.adapters.scopes() {
            println!(
                "  {} -> {} (test: {})",
                adapter.production().name(),
                adapter.exported_to(),
                adapter.test_unit().id
            );
            if let Some(pin) = adapter.compile_only_pin() {
                println!("      compile-only {pin}");
            }
        }
        println!("Lifecycle: {}", plan.adapters.lifecycle().name);
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Command::new("compat-plan")
        .version(compat_core::VERSION)
        .about("Plan version compatibility matrices and adapter scopes")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("plan")
                .about("Print the unit and adapter plan of a manifest")
                .arg(manifest_arg())
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Output as JSON"),
                ),
        )
        .subcommand(
            Command::new("ids")
                .about("Print unit ids only, one per line")
                .arg(manifest_arg()),
        );

    let matches = cli.get_matches();

    match matches.subcommand() {
        Some(("plan", args)) => {
            let path = args
                .get_one::<PathBuf>("manifest")
                .context("missing manifest path")?;
            let plan = load_plan(path)?;
            if args.get_flag("json") {
                println!("{}", serde_json::to_string_pretty(&plan.report())?);
            } else {
                print_text(&plan);
            }
        }
        Some(("ids", args)) => {
            let path = args
                .get_one::<PathBuf>("manifest")
                .context("missing manifest path")?;
            let plan = load_plan(path)?;
            for id in plan.matrix.ids() {
                println!("{id}");
            }
        }
        _ => {}
    }

    Ok(())
}
