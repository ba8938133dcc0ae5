use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use pro::browser::SystemBrowser;
use pro::credentials::ConfigCredentials;
use pro::error::{OpenError, EXIT_CONFIG, EXIT_SUCCESS};
use pro::provider::{ApiFinder, Provider};
use pro::repo::Head;

#[derive(Subcommand, Debug)]
enum Commands {
    /// Open PR page in browser (default action)
    Open {
        /// Print URL instead of opening in browser
        #[arg(short, long)]
        print: bool,
    },
    /// Authorize GitLab or GitHub
    Auth {
        /// Provider to authorize
        #[arg(value_enum)]
        provider: Provider,
    },
}

#[derive(Parser, Debug)]
#[command(name = "pro")]
#[command(about = "Pull Request Opener", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/pro/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Print URL instead of opening in browser
    #[arg(short, long)]
    print: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();
}

async fn run_open(config_path: &Path, print: bool) -> i32 {
    let use_colors = pro::output::should_use_colors();
    let report = |e: OpenError| {
        eprintln!("{}", pro::output::format_error(&e, use_colors));
        e.exit_code()
    };

    let checkout = match pro::open::inspect(Path::new(".")) {
        Ok(c) => c,
        Err(e) => return report(e),
    };

    if let Head::Branch(branch) = &checkout.head {
        println!("{}", pro::output::format_branch(branch, use_colors));
    }

    let credentials = ConfigCredentials::new(config_path.to_path_buf());
    let resolution =
        match pro::open::resolve_checkout(checkout, &credentials, &ApiFinder).await {
            Ok(r) => r,
            Err(e) => return report(e),
        };

    println!(
        "{}",
        pro::output::format_resolution(&resolution, print, use_colors)
    );

    if let Err(e) = pro::deliver(&resolution, print, &SystemBrowser) {
        return report(e);
    }

    EXIT_SUCCESS
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    // Install rustls crypto provider (required for rustls 0.23+)
    if rustls::crypto::ring::default_provider()
        .install_default()
        .is_err()
    {
        log::debug!("rustls crypto provider already installed");
    }

    let config_path = match pro::config::resolve_config_path(cli.config.map(PathBuf::from)) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };
    log::debug!("Config file: {}", config_path.display());

    let code = match cli.command {
        None => run_open(&config_path, cli.print).await,
        Some(Commands::Open { print }) => run_open(&config_path, print || cli.print).await,
        Some(Commands::Auth { provider }) => {
            match pro::credentials::run_auth(provider, &config_path, &SystemBrowser) {
                Ok(()) => EXIT_SUCCESS,
                Err(e) => {
                    eprintln!("Authorization failed: {:#}", e);
                    EXIT_CONFIG
                }
            }
        }
    };

    std::process::exit(code);
}
