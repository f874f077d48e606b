use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use clap::Subcommand;
use deploy::App;
use deploy::Config;
use deploy::ops::git::RealGit;
use deploy::ops::prompt::DialoguerPrompter;
use deploy::ops::prompt::FixedPrompter;
use deploy::ops::prompt::Prompter;
use deploy::push::PushOptions;
use deploy::store::TargetStore;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::Layer as _;
use tracing_subscriber::layer::SubscriberExt as _;
use tracing_subscriber::util::SubscriberInitExt as _;

#[derive(Parser)]
#[command(name = "deploy")]
#[command(about = "Associate local branches with git remotes and push to all of them at once", long_about = None)]
pub struct Cli {
    /// Increase output verbosity
    #[arg(short, long, global = true)]
    pub verbose: bool,
    /// Directory holding the target file and push logs (defaults to git config deploy.baseDir, then ./.deploy)
    #[arg(long, global = true)]
    pub base_dir: Option<PathBuf>,
    /// Answer yes to every confirmation prompt
    #[arg(short, long, global = true)]
    pub yes: bool,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List all targets
    List,
    /// Add a target associating a local branch with one or more remotes
    Add {
        /// Local branch
        branch: String,
        /// Remotes as <remote>[:<remote_branch>]; the local branch name is used when omitted
        #[arg(required = true)]
        remotes: Vec<String>,
    },
    /// Delete the target for a local branch
    Delete {
        /// Local branch
        branch: String,
    },
    /// Push a local branch to every remote of its target
    Push {
        /// Local branch
        branch: String,
        /// Force push to remotes
        #[arg(long)]
        force: bool,
        /// Push to all remotes concurrently
        #[arg(short = 'm', long = "multithread", visible_alias = "concurrent")]
        concurrent: bool,
        /// Print the push result as JSON
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load(cli.base_dir.clone(), cli.verbose)?;
    setup_logging(&config)?;

    if cli.yes {
        run(cli, config, FixedPrompter(true)).await
    } else {
        run(cli, config, DialoguerPrompter).await
    }
}

async fn run<P: Prompter>(cli: Cli, config: Config, prompter: P) -> Result<()> {
    let mut store = TargetStore::load(config.target_file()).await?;
    let app = App::new(
        config,
        RealGit::new(std::env::current_dir()?),
        prompter,
    );

    match cli.command {
        Commands::List => app.cmd_list(&store, &mut std::io::stdout()).await?,
        Commands::Add { branch, remotes } => {
            app.cmd_add(&mut store, &branch, &remotes, &mut std::io::stdout())
                .await?
        }
        Commands::Delete { branch } => {
            app.cmd_delete(&mut store, &branch, &mut std::io::stdout())
                .await?
        }
        Commands::Push {
            branch,
            force,
            concurrent,
            json,
        } => {
            let opts = PushOptions { force, concurrent };
            app.cmd_push(&store, &branch, opts, json, &mut std::io::stdout())
                .await?
        }
    }

    Ok(())
}

fn setup_logging(config: &Config) -> Result<()> {
    let default_level = if config.verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };
    let timer = tracing_subscriber::fmt::time::ChronoLocal::new("%H:%M:%S%.3f".into());
    let format = tracing_subscriber::fmt::format().with_timer(timer);
    let filter = tracing_subscriber::EnvFilter::builder()
        .with_default_directive(default_level.into())
        .from_env()?;
    let subscriber = tracing_subscriber::fmt::layer()
        .event_format(format)
        .with_writer(std::io::stderr)
        .with_filter(filter);
    tracing_subscriber::registry().with(subscriber).init();
    Ok(())
}
