use clap::{Parser, Subcommand};
use pedersen_auth::ServerVerdict;
use pedersen_auth::Client;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Parser)]
#[command(name = "client")]
#[command(about = "Pedersen proof-of-knowledge authentication client", long_about = None)]
struct Cli {
    /// Server address as host:port
    #[arg(short, long, env = "SERVER", default_value = "127.0.0.1:50051")]
    server: String,

    /// Log protocol steps
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Register a new user
    Register {
        #[arg(short, long)]
        user: String,

        #[arg(short, long)]
        password: String,
    },

    /// Log in as an existing user
    Login {
        #[arg(short, long)]
        user: String,

        #[arg(short, long)]
        password: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "info" } else { "warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_level.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let client = Client::new(cli.server);

    let ok = match cli.command {
        Commands::Register { user, password } => {
            println!("Registering user '{user}'...");
            let verdict = client.register(&user, &password).await?;
            report(&verdict, "Registration successful")
        }
        Commands::Login { user, password } => {
            println!("Logging in as '{user}'...");
            let verdict = client.login(&user, &password).await?;
            report(&verdict, "Login successful")
        }
    };

    if !ok {
        std::process::exit(1);
    }
    Ok(())
}

fn report(verdict: &ServerVerdict, success: &str) -> bool {
    if verdict.accepted {
        println!("{success}");
    } else {
        let reason = verdict
            .reason
            .as_deref()
            .unwrap_or("wrong user name or password");
        eprintln!("Error: {reason}");
    }
    verdict.accepted
}
