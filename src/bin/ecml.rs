use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use ecml_editor::{BlankPlugin, EcmlNode, EditorSession, Manifest, SessionOpts};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "ecml", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Hydrate a node from an ECML tree and print it re-serialized.
    Roundtrip(RoundtripArgs),
    /// Print the merged config manifest of a fresh node.
    ConfigManifest(ManifestArgs),
    /// List tolerated issues in an ECML tree; fails when there are any.
    Check(CheckArgs),
}

#[derive(Parser, Debug)]
struct RoundtripArgs {
    /// Input ECML attribute tree (JSON).
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Plugin manifest (JSON).
    #[arg(long)]
    manifest: PathBuf,

    /// Reject trees with tolerated issues.
    #[arg(long, default_value_t = false)]
    strict: bool,
}

#[derive(Parser, Debug)]
struct ManifestArgs {
    /// Plugin manifest (JSON).
    #[arg(long)]
    manifest: PathBuf,
}

#[derive(Parser, Debug)]
struct CheckArgs {
    /// Input ECML attribute tree (JSON).
    #[arg(long = "in")]
    in_path: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Roundtrip(args) => cmd_roundtrip(args),
        Command::ConfigManifest(args) => cmd_config_manifest(args),
        Command::Check(args) => cmd_check(args),
    }
}

fn read_json(path: &Path) -> anyhow::Result<serde_json::Value> {
    let text =
        std::fs::read_to_string(path).with_context(|| format!("read '{}'", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parse JSON '{}'", path.display()))
}

fn session_for(manifest: &Path, opts: SessionOpts) -> anyhow::Result<(EditorSession, String)> {
    let manifest = Manifest::from_path(manifest)?;
    let type_id = manifest.id.clone();
    let mut session = EditorSession::headless(opts);
    session.register_type(manifest, || Box::new(BlankPlugin))?;
    session.add_stage(None)?;
    Ok((session, type_id))
}

fn cmd_roundtrip(args: RoundtripArgs) -> anyhow::Result<()> {
    let tree = read_json(&args.in_path)?;
    let opts = SessionOpts {
        strict_ecml: args.strict,
    };
    let (mut session, type_id) = session_for(&args.manifest, opts)?;
    let stage = session.current_stage().cloned();
    let id = session
        .instantiate_value(&type_id, tree, stage.as_ref())
        .with_context(|| format!("instantiate '{}'", args.in_path.display()))?;

    let out = session.to_ecml(&id)?.to_value()?;
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}

fn cmd_config_manifest(args: ManifestArgs) -> anyhow::Result<()> {
    let (mut session, type_id) = session_for(&args.manifest, SessionOpts::default())?;
    let stage = session.current_stage().cloned();
    let id = session.instantiate(&type_id, None, stage.as_ref())?;

    let schema = session.config_manifest(&id)?;
    println!("{}", serde_json::to_string_pretty(&schema)?);
    Ok(())
}

fn cmd_check(args: CheckArgs) -> anyhow::Result<()> {
    let parsed = EcmlNode::from_path(&args.in_path)?;
    if parsed.is_clean() {
        println!("ok");
        return Ok(());
    }
    for issue in &parsed.issues {
        println!("{issue}");
    }
    anyhow::bail!(
        "{} issue(s) in '{}'",
        parsed.issues.len(),
        args.in_path.display()
    )
}
