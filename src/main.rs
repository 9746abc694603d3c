use acme_eab_admin::commands;
use acme_eab_admin::AdminClientBuilder;
use acme_eab_admin::Error;
use acme_eab_admin::OutputFormat;
use clap::Parser;
use clap::Subcommand;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "acme-eab")]
#[command(about = "Create and manage ACME External Account Binding keys")]
#[command(version)]
struct Cli {
  /// Base URL of the CA
  #[arg(long, env = "STEP_CA_URL")]
  ca_url: String,

  /// PEM file with the root certificate of the CA
  #[arg(long, env = "STEP_ROOT")]
  root: Option<PathBuf>,

  /// Token used to authenticate against the admin API
  #[arg(long, env = "STEP_ADMIN_TOKEN", hide_env_values = true)]
  admin_token: Option<String>,

  /// Request timeout in seconds
  #[arg(long, default_value_t = 30)]
  timeout: u64,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand)]
enum Command {
  /// List the EAB keys of a provisioner
  List {
    /// Name of the ACME provisioner
    provisioner: String,

    /// Number of keys to fetch per request
    #[arg(long)]
    limit: Option<u32>,

    /// Print JSON instead of text
    #[arg(long)]
    json: bool,
  },
  /// Add an EAB key to a provisioner
  Add {
    /// Name of the ACME provisioner
    provisioner: String,

    /// Label to attach to the key
    #[arg(default_value = "")]
    reference: String,

    /// Print JSON instead of text
    #[arg(long)]
    json: bool,
  },
  /// Remove an EAB key
  Remove {
    /// Identifier of the key
    id: String,
  },
}

fn output_format(json: bool) -> OutputFormat {
  if json {
    OutputFormat::Json
  } else {
    OutputFormat::Text
  }
}

async fn run(cli: Cli) -> Result<(), Error> {
  match &cli.command {
    Command::List { provisioner, .. } => commands::check_list(provisioner)?,
    Command::Add {
      provisioner,
      reference,
      ..
    } => commands::check_add(provisioner, reference)?,
    Command::Remove { id } => commands::check_remove(id)?,
  }

  let mut builder = AdminClientBuilder::new(cli.ca_url);
  builder.timeout(Duration::from_secs(cli.timeout));
  if let Some(root) = cli.root {
    builder.root_certificate(root);
  }
  if let Some(token) = cli.admin_token {
    builder.token(token);
  }
  if let Command::List {
    limit: Some(limit), ..
  } = &cli.command
  {
    builder.page_size(*limit);
  }
  let client = builder.build().await?;

  let mut out = std::io::stdout().lock();
  match cli.command {
    Command::List {
      provisioner, json, ..
    } => {
      commands::list(&client, &mut out, &provisioner, output_format(json))
        .await
    }
    Command::Add {
      provisioner,
      reference,
      json,
    } => {
      commands::add(
        &client,
        &mut out,
        &provisioner,
        &reference,
        output_format(json),
      )
      .await
    }
    Command::Remove { id } => commands::remove(&client, &mut out, &id).await,
  }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("off")),
    )
    .with_writer(std::io::stderr)
    .init();

  let cli = Cli::parse();
  match run(cli).await {
    Ok(()) => ExitCode::SUCCESS,
    Err(err) => {
      eprintln!("error: {}", err);
      ExitCode::FAILURE
    }
  }
}
