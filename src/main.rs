use anyhow::Context;
use clap::{Parser, Subcommand};
use gift_ideas_service::{
    build_app,
    client::{FormController, FormState, HttpGiftApi, Notifier, SubmitOutcome},
    config::AppConfig,
    run_server, AppState, Gender,
};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "gift-ideas", about = "Christmas gift idea generator", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP server
    Serve {
        /// Overrides PORT
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Ask a running server for gift ideas
    Suggest {
        #[arg(long, value_enum, default_value_t = GenderArg::Man)]
        gender: GenderArg,
        #[arg(long)]
        age: Option<u32>,
        #[arg(long)]
        price_min: Option<u32>,
        #[arg(long)]
        price_max: Option<u32>,
        /// Comma-separated interests
        #[arg(long, default_value = "")]
        hobbies: String,
        #[arg(long, env = "GIFT_SERVER_URL", default_value = "http://127.0.0.1:3000")]
        server: String,
    },
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum GenderArg {
    Man,
    Woman,
}

impl From<GenderArg> for Gender {
    fn from(arg: GenderArg) -> Self {
        match arg {
            GenderArg::Man => Gender::Man,
            GenderArg::Woman => Gender::Woman,
        }
    }
}

struct StderrNotifier;

impl Notifier for StderrNotifier {
    fn notify(&self, message: &str) {
        eprintln!("{message}");
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer().with_target(true).with_line_number(true))
        .init();

    match Cli::parse().command {
        Command::Serve { port } => {
            let mut config = AppConfig::from_env().context("invalid configuration")?;
            if let Some(port) = port {
                config.port = port;
            }
            if !config.has_api_key() {
                tracing::warn!(
                    "OPENAI_API_KEY is not set; gift requests will fail until it is configured"
                );
            }
            let (host, port) = (config.host.clone(), config.port);
            run_server(build_app(AppState::from_config(config)), &host, port)
                .await
                .context("server failed")?;
        }
        Command::Suggest {
            gender,
            age,
            price_min,
            price_max,
            hobbies,
            server,
        } => {
            let form = FormState {
                gender: gender.into(),
                age,
                price_min,
                price_max,
                hobbies,
            };
            let controller = FormController::new(HttpGiftApi::new(server), StderrNotifier);
            match controller.submit(&form).await {
                SubmitOutcome::Completed(result) => println!("{result}"),
                SubmitOutcome::Ignored => {}
                SubmitOutcome::Invalid(_) | SubmitOutcome::Failed(_) => std::process::exit(1),
            }
        }
    }

    Ok(())
}
