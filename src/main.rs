use clap::{Args, Parser, Subcommand};
use doc_builder::config::{self, CliOverrides, ConfigError};
use doc_builder::deploy::{self, DeployError, DeployOptions};
use doc_builder::generate::{self, GenerateError};
use doc_builder::project::{self, HintsFormat, ProjectError};
use doc_builder::server::{self, ServeError, ServeOptions};
use doc_builder::{output, seo};
use std::path::{Path, PathBuf};
use thiserror::Error;

fn version_string() -> &'static str {
    let on_tag = env!("ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Leaked once at startup
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "doc-builder")]
#[command(about = "Generate a static HTML documentation site from markdown")]
#[command(long_about = "\
Generate a static HTML documentation site from markdown

Your docs directory is the data source. Folders become sidebar sections,
README.md is a folder's overview page, and every .md file becomes a page.

Content structure:

  docs/
  ├── README.md                    # Home page (copied to index.html)
  ├── index.md                     # Optional explicit home page (wins over README)
  ├── guides/                      # Sidebar section \"Guides\"
  │   ├── README.md                # Section overview, listed first
  │   └── setup.md                 # Page; title from front matter or # heading
  ├── private/                     # Published only with authentication on
  │   └── notes.md
  ├── _drafts/                     # Leading _ or . = ignored
  └── diagrams/architecture.pdf    # Attachments copied as is

Title resolution (first available wins):
  front matter title → first # heading → file name (setup-guide.md → \"Setup Guide\")

Run 'doc-builder init --config' to write a documented doc-builder.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Debug logging and full error details
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

/// `--config <path>` for commands that read or edit the config file.
#[derive(Args, Clone)]
struct ConfigFile {
    /// Config file
    #[arg(long, default_value = config::DEFAULT_CONFIG_FILE)]
    config: PathBuf,
}

/// Flags that shape a build.
#[derive(Args, Clone)]
struct BuildArgs {
    #[command(flatten)]
    file: ConfigFile,

    /// Markdown source directory (overrides docsDir)
    #[arg(long)]
    input: Option<PathBuf>,

    /// Output directory (overrides outputDir)
    #[arg(long)]
    output: Option<PathBuf>,

    /// Apply a named preset before the config file
    #[arg(long)]
    preset: Option<String>,

    /// Use existing docs/ and html/ directories next to the config file
    #[arg(long)]
    legacy: bool,

    /// Disable authentication even when configured
    #[arg(long)]
    no_auth: bool,

    /// Skip changelog.html
    #[arg(long)]
    no_changelog: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Generate the site
    Build(BuildArgs),
    /// Build, serve, and rebuild on change
    Dev {
        #[command(flatten)]
        file: ConfigFile,

        #[arg(long, default_value_t = 3000)]
        port: u16,

        #[arg(long, default_value = "localhost")]
        host: String,

        /// Do not open a browser
        #[arg(long)]
        no_open: bool,
    },
    /// Build and deploy to Vercel
    Deploy {
        #[command(flatten)]
        file: ConfigFile,

        /// Preview deploy instead of production
        #[arg(long)]
        no_prod: bool,

        /// Force a new deployment even if nothing changed
        #[arg(long)]
        force: bool,

        /// URL to report after a production deploy (overrides productionUrl)
        #[arg(long)]
        production_url: Option<String>,
    },
    /// Remove the local Vercel project link
    ResetVercel {
        #[command(flatten)]
        file: ConfigFile,
    },
    /// Write a stock config and/or example docs
    Init {
        /// Write a documented doc-builder.toml
        #[arg(long = "config")]
        write_config: bool,

        /// Write an example docs tree
        #[arg(long)]
        example: bool,
    },
    /// Add the Google Search Console verification meta tag
    GoogleVerify {
        #[command(flatten)]
        file: ConfigFile,

        /// Verification code or the full <meta> tag
        code: String,
    },
    /// Report SEO problems in generated HTML
    SeoCheck {
        #[command(flatten)]
        file: ConfigFile,

        /// HTML file or directory (default: the output directory)
        path: Option<PathBuf>,
    },
    /// Store the production URL in the config file
    SetProductionUrl {
        #[command(flatten)]
        file: ConfigFile,

        url: String,
    },
    /// Authoring guidance for AI assistants
    ClaudeHints {
        /// Write to a file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,

        /// markdown or text
        #[arg(long, default_value = "markdown")]
        format: HintsFormat,
    },
}

#[derive(Error, Debug)]
enum CliError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Generate(#[from] GenerateError),
    #[error(transparent)]
    Deploy(#[from] DeployError),
    #[error(transparent)]
    Serve(#[from] ServeError),
    #[error(transparent)]
    Project(#[from] ProjectError),
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(err) = run(&cli) {
        eprintln!("Error: {err}");
        if cli.verbose || std::env::var_os("DOC_BUILDER_DEBUG").is_some() {
            eprintln!("{err:?}");
        }
        std::process::exit(1);
    }
}

/// Log filter used when `RUST_LOG` is unset. Verbose adds dev-server request logs.
fn default_filter(verbose: bool) -> &'static str {
    if verbose {
        "doc_builder=debug,tower_http=debug"
    } else {
        "doc_builder=info"
    }
}

fn init_tracing(verbose: bool) {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter(verbose))),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: &Cli) -> Result<(), CliError> {
    match &cli.command {
        Command::Build(args) => {
            let config = config::load_config(&args.file.config, &overrides(args))?;
            let report = generate::build(&config)?;
            output::print_build_output(&report);
        }
        Command::Dev {
            file,
            port,
            host,
            no_open,
        } => {
            let config = load(file)?;
            let options = ServeOptions {
                host: host.clone(),
                port: *port,
                open: !no_open,
            };
            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(server::serve(config, options))?;
        }
        Command::Deploy {
            file,
            no_prod,
            force,
            production_url,
        } => {
            let config = load(file)?;
            let options = DeployOptions {
                prod: !no_prod,
                force: *force,
                production_url: production_url.clone(),
            };
            let outcome = deploy::deploy(&config, &options, &project_dir(&file.config))?;
            output::print_deploy_output(&outcome);
        }
        Command::ResetVercel { file } => {
            let config = load(file)?;
            let removed = deploy::reset_vercel(&project_dir(&file.config), &config.output_dir)?;
            if removed.is_empty() {
                println!("No Vercel project link found");
            }
            for dir in removed {
                println!("Removed {}", dir.display());
            }
        }
        Command::Init {
            write_config,
            example,
        } => {
            let config_path = Path::new(config::DEFAULT_CONFIG_FILE);
            let config = config::load_config(config_path, &CliOverrides::default())?;
            let report = project::init(config_path, &config.docs_dir, *write_config, *example)?;
            output::print_init_output(&report);
        }
        Command::GoogleVerify { file, code } => {
            let code = project::google_verify(&file.config, code)?;
            println!(
                "Added google-site-verification ({code}) to {}. Rebuild and deploy to publish it.",
                file.config.display()
            );
        }
        Command::SeoCheck { file, path } => {
            let path = match path {
                Some(path) => path.clone(),
                None => load(file)?.output_dir,
            };
            let results = seo::check_path(&path)?;
            output::print_seo_report(&results);
        }
        Command::SetProductionUrl { file, url } => {
            let url = project::set_production_url(&file.config, url)?;
            println!("Production URL set to {url} in {}", file.config.display());
        }
        Command::ClaudeHints { output, format } => {
            let hints = project::claude_hints(*format);
            match output {
                Some(path) => {
                    std::fs::write(path, hints)?;
                    println!("Wrote {}", path.display());
                }
                None => print!("{hints}"),
            }
        }
    }
    Ok(())
}

fn load(file: &ConfigFile) -> Result<config::Config, ConfigError> {
    config::load_config(&file.config, &CliOverrides::default())
}

fn overrides(args: &BuildArgs) -> CliOverrides {
    CliOverrides {
        input: args.input.clone(),
        output: args.output.clone(),
        preset: args.preset.clone(),
        legacy: args.legacy,
        no_auth: args.no_auth,
        no_changelog: args.no_changelog,
        production_url: None,
    }
}

/// Directory holding the config file; deploy state lives beside it.
fn project_dir(config_path: &Path) -> PathBuf {
    config_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map_or_else(|| PathBuf::from("."), Path::to_path_buf)
}
