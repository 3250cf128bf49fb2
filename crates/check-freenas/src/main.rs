mod checks;
mod status;
mod telemetry;

use clap::Parser;
use freenas_api::FreenasClient;

use status::CheckResult;

#[derive(Parser)]
#[command(
    name = "check_freenas",
    about = "Nagios plugin that checks a FreeNAS server through its REST API"
)]
struct Cli {
    /// Hostname or IP address of the FreeNAS server
    #[arg(short = 'H', long)]
    hostname: String,

    /// API user (normally only root works)
    #[arg(short, long)]
    user: String,

    /// Password for the API user
    #[arg(short, long)]
    passwd: String,

    /// Type of check: repl, alerts or updates
    #[arg(short = 't', long = "type")]
    check_type: String,
}

#[tokio::main]
async fn main() {
    telemetry::init();

    let cli = Cli::parse();

    let client = match FreenasClient::new(&cli.hostname, &cli.user, &cli.passwd) {
        Ok(client) => client,
        Err(e) => {
            CheckResult::unknown(format!("Error when contacting FreeNAS server: {e}"))
                .print_and_exit();
        }
    };

    let result = match cli.check_type.as_str() {
        "repl" => checks::replication(&client).await,
        "alerts" => checks::alerts(&client).await,
        "updates" => checks::updates(&client).await,
        other => {
            println!("Unknown type: {other}");
            std::process::exit(3);
        }
    };

    result.print_and_exit()
}
