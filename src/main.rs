use anyhow::Result;
use clap::{Parser, Subcommand};
use gith::areas::context::WorkingContext;
use gith::areas::repository::Repository;
use gith::commands::porcelain::clone::{CloneOptions, clone};
use gith::commands::porcelain::config::{ConfigOptions, configure_global};
use gith::commands::porcelain::log::LogOptions;
use is_terminal::IsTerminal;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "GITH_LOG";

#[derive(Parser)]
#[command(
    name = "gith",
    version = "0.1.0",
    author = "Sami Barbut-Dica",
    about = "A minimal distributed version-control client",
    long_about = "gith keeps a content-addressable object store, a staging index and branch refs \
    under .gith, and synchronizes commits with a remote repository service over HTTP.",
    help_template = r"
{name} {version} - {about}

USAGE:
    {usage}

OPTIONS:
    {all-args}
",
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(
        name = "init",
        about = "Initialize a new repository",
        long_about = "This command initializes a new repository in the current directory or at the specified path."
    )]
    Init {
        #[arg(index = 1, help = "The path to the repository")]
        path: Option<String>,
    },
    #[command(name = "add", about = "Add file contents to the index")]
    Add {
        #[arg(index = 1, required = true, help = "Files to stage, '.' for the whole working tree")]
        paths: Vec<String>,
    },
    #[command(
        name = "commit",
        about = "Create a new commit with the specified message",
        long_about = "This command creates a new commit on the current branch from the staged files."
    )]
    Commit {
        #[arg(short, long, help = "The commit message")]
        message: Option<String>,
    },
    #[command(name = "status", about = "Show the working tree status")]
    Status {
        #[arg(long, help = "Give the output in a stable, machine-readable format")]
        porcelain: bool,
    },
    #[command(name = "log", about = "Show the commit history of the current branch")]
    Log {
        #[arg(short = 'n', long = "max-count", help = "Limit the number of commits to output")]
        max_count: Option<usize>,
        #[arg(long, help = "Show each commit on a single line")]
        oneline: bool,
    },
    #[command(name = "config", about = "Get and set repository or global options")]
    Config {
        #[arg(long, help = "Use the global config file in the home directory")]
        global: bool,
        #[arg(index = 1, help = "The key, e.g. user.email")]
        key: String,
        #[arg(index = 2, help = "The value to set")]
        value: Option<String>,
    },
    #[command(name = "remote", about = "Manage the set of tracked remotes")]
    Remote {
        #[arg(short, long, help = "Show the remote URL and repository id")]
        verbose: bool,
        #[command(subcommand)]
        action: Option<RemoteAction>,
    },
    #[command(
        name = "clone",
        about = "Clone a remote repository into a new directory",
        long_about = "This command fetches every branch and commit of a remote repository, \
        writes them into a new repository and checks out the default branch."
    )]
    Clone {
        #[arg(index = 1, help = "The base URL of the remote service")]
        url: String,
        #[arg(index = 2, help = "The repository id on the remote service")]
        repository_id: String,
        #[arg(index = 3, help = "The directory to clone into")]
        directory: Option<String>,
    },
    #[command(name = "push", about = "Send local commits to a remote")]
    Push {
        #[arg(index = 1, help = "The remote name, defaults to origin")]
        remote: Option<String>,
        #[arg(index = 2, help = "The branch, defaults to the current branch")]
        branch: Option<String>,
    },
    #[command(name = "pull", about = "Fast-forward a branch to a remote's commits")]
    Pull {
        #[arg(index = 1, help = "The remote name, defaults to origin")]
        remote: Option<String>,
        #[arg(index = 2, help = "The branch, defaults to the current branch")]
        branch: Option<String>,
    },
    #[command(
        name = "cat-file",
        about = "Print the content of an object",
        long_about = "This command prints the content of an object in the repository. \
        It requires the SHA of the object to be specified."
    )]
    CatFile {
        #[arg(short = 'p', long, help = "The object SHA to print")]
        sha: String,
    },
    #[command(
        name = "hash-object",
        about = "Hash an object and optionally write it to the object database",
        long_about = "This command hashes a file and can write it to the object database as a blob. \
        It requires the path to the file to be specified."
    )]
    HashObject {
        #[arg(short, long, required = false, help = "Write the object to the object database")]
        write: bool,
        #[arg(index = 1)]
        file: String,
    },
}

#[derive(Subcommand)]
enum RemoteAction {
    #[command(name = "add", about = "Add a remote")]
    Add {
        name: String,
        url: String,
        repository_id: String,
    },
    #[command(name = "set-url", about = "Change the URL of a remote")]
    SetUrl { name: String, url: String },
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    if !std::io::stdout().is_terminal() {
        colored::control::set_override(false);
    }

    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("fatal: {error:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let context = WorkingContext::from_process()?;
    let stdout = || Box::new(std::io::stdout());
    let open = |context: WorkingContext| Repository::discover(context, stdout());

    match cli.command {
        Commands::Init { path } => {
            let root = context.resolve(path.as_deref().unwrap_or("."));
            let repository = Repository::new(&root, context, stdout())?;

            repository.init().await?
        }
        Commands::Add { paths } => open(context)?.add(&paths).await?,
        Commands::Commit { message } => {
            open(context)?.commit(message.as_deref()).await?;
        }
        Commands::Status { porcelain } => open(context)?.status(porcelain).await?,
        Commands::Log { max_count, oneline } => {
            open(context)?
                .log(&LogOptions { max_count, oneline })
                .await?;
        }
        Commands::Config { global, key, value } => {
            let opts = ConfigOptions { global, key, value };

            if global {
                configure_global(&context, &mut std::io::stdout(), &opts)?
            } else {
                open(context)?.configure(&opts).await?
            }
        }
        Commands::Remote { verbose, action } => {
            let repository = open(context)?;

            match action {
                Some(RemoteAction::Add {
                    name,
                    url,
                    repository_id,
                }) => repository.remote_add(&name, &url, &repository_id).await?,
                Some(RemoteAction::SetUrl { name, url }) => {
                    repository.remote_set_url(&name, &url).await?
                }
                None => repository.remote_list(verbose).await?,
            }
        }
        Commands::Clone {
            url,
            repository_id,
            directory,
        } => {
            let opts = CloneOptions {
                url,
                repository_id,
                directory,
            };

            clone(context, stdout(), &opts).await?;
        }
        Commands::Push { remote, branch } => {
            open(context)?
                .push(remote.as_deref(), branch.as_deref())
                .await?;
        }
        Commands::Pull { remote, branch } => {
            open(context)?
                .pull(remote.as_deref(), branch.as_deref())
                .await?;
        }
        Commands::CatFile { sha } => open(context)?.cat_file(&sha).await?,
        Commands::HashObject { write, file } => {
            open(context)?.hash_object(&file, write).await?;
        }
    }

    Ok(())
}
