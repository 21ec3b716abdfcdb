use std::path::PathBuf;
use std::sync::Arc;

use anyhow::bail;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bidsprep_core::{
    load_configuration, CoreConfig, PatientSelection, RequirementStatus, WorkspaceService,
};
use bidsprep_types::PatientId;

#[derive(Parser)]
#[command(name = "bidsprep")]
#[command(about = "Check BIDS workspaces for pipeline inputs and write pipeline configurations")]
struct Cli {
    /// Workspace root (defaults to BIDSPREP_WORKSPACE)
    #[arg(long, global = true)]
    workspace: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the requirement status of every patient
    Scan,
    /// Show the requirement status of one patient
    Check {
        /// Patient id, e.g. sub-01
        patient_id: String,
    },
    /// Write the next pipeline configuration for the selected patients
    Build {
        /// Select every eligible patient
        #[arg(long)]
        all_eligible: bool,
        /// Patient ids to select
        patient_ids: Vec<String>,
    },
    /// List the pipeline configurations written so far
    Configs,
}

/// Entry point for the bidsprep terminal front end
///
/// # Environment Variables
/// - `BIDSPREP_WORKSPACE`: workspace root used when `--workspace` is not given
/// - `RUST_LOG`: log filter (default directive: "bidsprep=info")
fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("bidsprep=info".parse()?)
                .add_directive("bidsprep_core=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let Some(command) = cli.command else {
        println!("Use 'bidsprep --help' for commands");
        return Ok(());
    };

    let workspace = match cli.workspace {
        Some(path) => path,
        None => match std::env::var("BIDSPREP_WORKSPACE") {
            Ok(path) => PathBuf::from(path),
            Err(_) => bail!("No workspace given: pass --workspace or set BIDSPREP_WORKSPACE"),
        },
    };
    if !workspace.is_dir() {
        bail!("Workspace is not a directory: {}", workspace.display());
    }

    let cfg = Arc::new(CoreConfig::new(&workspace)?);
    tracing::debug!("workspace root: {}", cfg.workspace_root().display());
    let service = WorkspaceService::new(cfg);

    match command {
        Commands::Scan => scan(&service),
        Commands::Check { patient_id } => {
            let id: PatientId = patient_id.parse()?;
            let status = service.check_requirements(&id);
            print_status(&id, &status);
            Ok(())
        }
        Commands::Build {
            all_eligible,
            patient_ids,
        } => build(&service, all_eligible, &patient_ids),
        Commands::Configs => {
            let configs = service.configurations();
            if configs.is_empty() {
                println!("No configurations found.");
            }
            for config in configs {
                println!("{:>3}  {}", config.sequence, config.path.display());
            }
            Ok(())
        }
    }
}

fn scan(service: &WorkspaceService) -> anyhow::Result<()> {
    let status = service.scan();
    if status.is_empty() {
        println!("No patients found.");
        return Ok(());
    }

    for patient in status.iter() {
        print_status(&patient.id, &patient.status);
    }

    let summary = status.summary(&PatientSelection::new());
    println!(
        "Total: {}, Eligible: {}, Not eligible: {}",
        summary.total, summary.eligible, summary.not_eligible
    );
    Ok(())
}

fn build(
    service: &WorkspaceService,
    all_eligible: bool,
    patient_ids: &[String],
) -> anyhow::Result<()> {
    let status = service.scan();

    let mut selection = PatientSelection::new();
    if all_eligible {
        selection.select_all_eligible(&status);
    }
    for raw in patient_ids {
        let id: PatientId = raw.parse()?;
        if !status.is_eligible(&id) {
            tracing::warn!("{} is not eligible and was left out", id);
            continue;
        }
        selection.add(id);
    }

    if !selection.is_ready_to_advance() {
        bail!("No eligible patients selected");
    }

    let path = service.build_configuration(&selection)?;
    println!(
        "Wrote configuration for {} patients: {}",
        selection.len(),
        path.display()
    );

    let artifact = load_configuration(&path)?;
    for id in artifact.needing_revision() {
        println!("  {} needs revision: more than one file matched a role", id);
    }
    Ok(())
}

fn print_status(id: &PatientId, status: &RequirementStatus) {
    let verdict = if status.eligible {
        "eligible"
    } else {
        "not eligible"
    };
    match status.segmentation_type {
        Some(kind) => println!("{id}: {verdict} ({})", kind.label()),
        None => println!("{id}: {verdict}"),
    }
    for missing in &status.missing_files {
        println!("  missing: {missing}");
    }
}
