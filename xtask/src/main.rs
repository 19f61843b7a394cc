//! Build automation for webserver-harness
//!
//! Usage: cargo xtask <command>
//!
//! Available commands:
//! - build: Build the project
//! - test: Run tests, optionally including the cluster tests
//! - render: Render the bundled manifests as a template smoke test
//! - dist: Create a distribution archive with the binary and templates
//! - ci: Run CI checks

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use xshell::{cmd, Shell};

const BIN: &str = "webserver-harness";
const TEMPLATE_DIR: &str = "templates";

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "Build automation for webserver-harness")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the project
    Build {
        /// Build in release mode
        #[arg(long)]
        release: bool,
    },
    /// Run tests
    Test {
        /// Also run the ignored tests that need a live cluster
        #[arg(long)]
        cluster: bool,
    },
    /// Render the pod and service manifests without touching a cluster
    Render {
        /// Namespace placed in the rendered manifests
        #[arg(long, default_value = "webserver-xtask")]
        namespace: String,
    },
    /// Create a distribution archive
    Dist {
        /// Target triple (e.g., x86_64-unknown-linux-gnu)
        #[arg(long)]
        target: Option<String>,
    },
    /// Run CI checks (format, clippy, test, render)
    Ci,
    /// Format code
    Format {
        /// Check formatting without modifying files
        #[arg(long)]
        check: bool,
    },
    /// Run clippy
    Clippy,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let sh = Shell::new()?;

    sh.change_dir(project_root()?);

    match cli.command {
        Commands::Build { release } => build(&sh, release),
        Commands::Test { cluster } => test(&sh, cluster),
        Commands::Render { namespace } => render(&sh, &namespace),
        Commands::Dist { target } => dist(&sh, target),
        Commands::Ci => ci(&sh),
        Commands::Format { check } => format(&sh, check),
        Commands::Clippy => clippy(&sh),
    }
}

fn build(sh: &Shell, release: bool) -> Result<()> {
    println!("🔨 Building {}...", BIN);

    if release {
        cmd!(sh, "cargo build --release").run()?;
        println!("✅ Release build completed: target/release/{}", BIN);
    } else {
        cmd!(sh, "cargo build").run()?;
        println!("✅ Debug build completed: target/debug/{}", BIN);
    }

    Ok(())
}

fn test(sh: &Shell, cluster: bool) -> Result<()> {
    println!("🧪 Running tests...");

    cmd!(sh, "cargo test --all").run()?;
    if cluster {
        println!("\n☸️  Running cluster tests (USER={})...", operator());
        cmd!(sh, "cargo test --test cluster_test -- --ignored").run()?;
    }

    println!("✅ All tests passed");
    Ok(())
}

fn render(sh: &Shell, namespace: &str) -> Result<()> {
    println!("📄 Rendering manifests into namespace {}...", namespace);

    for kind in ["Pod", "Service"] {
        let manifest = cmd!(
            sh,
            "cargo run --quiet -- render --kind {kind} --namespace {namespace}"
        )
        .read()
        .with_context(|| format!("Failed to render {}", kind))?;

        if !manifest.contains(&format!("kind: {}", kind)) {
            bail!("Rendered {} manifest is missing its kind:\n{}", kind, manifest);
        }
        println!("{}\n---", manifest);
    }

    println!("✅ Templates render");
    Ok(())
}

fn dist(sh: &Shell, target: Option<String>) -> Result<()> {
    println!("📦 Creating distribution package...");

    if let Some(ref target_triple) = target {
        cmd!(sh, "cargo build --release --target {target_triple}").run()?;
    } else {
        cmd!(sh, "cargo build --release").run()?;
    }

    let root = project_root()?;
    let dist_dir = root.join("dist");
    sh.remove_path(&dist_dir)?;
    sh.create_dir(&dist_dir)?;

    let binary_src = match &target {
        Some(target_triple) => root.join(format!("target/{}/release/{}", target_triple, BIN)),
        None => root.join(format!("target/release/{}", BIN)),
    };
    sh.copy_file(&binary_src, dist_dir.join(BIN))?;

    // The binary resolves templates relative to its working directory.
    copy_dir(sh, &root.join(TEMPLATE_DIR), &dist_dir.join(TEMPLATE_DIR))?;

    let version = env!("CARGO_PKG_VERSION");
    let archive_name = format!("{}-{}.tar.gz", BIN, version);

    cmd!(sh, "tar -czf {archive_name} -C dist {BIN} {TEMPLATE_DIR}")
        .run()
        .context("Failed to create tarball")?;

    println!("✅ Distribution package created: {}", archive_name);
    Ok(())
}

fn copy_dir(sh: &Shell, src: &Path, dst: &Path) -> Result<()> {
    sh.create_dir(dst)?;
    for entry in sh.read_dir(src)? {
        let target = dst.join(
            entry
                .file_name()
                .with_context(|| format!("Unexpected path {}", entry.display()))?,
        );
        if entry.is_dir() {
            copy_dir(sh, &entry, &target)?;
        } else {
            sh.copy_file(&entry, &target)?;
        }
    }
    Ok(())
}

fn ci(sh: &Shell) -> Result<()> {
    println!("🔍 Running CI checks...");

    println!("\n📝 Checking formatting...");
    format(sh, true)?;

    println!("\n🔧 Running clippy...");
    clippy(sh)?;

    println!("\n🧪 Running tests...");
    test(sh, false)?;

    println!("\n📄 Rendering templates...");
    render(sh, "webserver-ci")?;

    println!("\n✅ All CI checks passed!");
    Ok(())
}

fn format(sh: &Shell, check: bool) -> Result<()> {
    if check {
        cmd!(sh, "cargo fmt --all -- --check").run()?;
        println!("✅ Code formatting is correct");
    } else {
        cmd!(sh, "cargo fmt --all").run()?;
        println!("✅ Code formatted");
    }
    Ok(())
}

fn clippy(sh: &Shell) -> Result<()> {
    cmd!(
        sh,
        "cargo clippy --all-targets --all-features -- -D warnings"
    )
    .run()?;
    println!("✅ Clippy checks passed");
    Ok(())
}

fn operator() -> String {
    std::env::var("USER").unwrap_or_else(|_| "<unset>".to_string())
}

fn project_root() -> Result<PathBuf> {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .map(Path::to_path_buf)
        .context("xtask must live inside the workspace")
}
