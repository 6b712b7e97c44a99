use clap::Parser;
use colored::Colorize;

use foodgram::cli::Cli;
use foodgram::config::{StaticConfig, init_config_with};
use foodgram::runtime::modes::{self, Mode};

#[actix_web::main]
async fn main() {
    // .env 中的 FOODGRAM__* 变量参与配置加载
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_config_with(StaticConfig::load_from(&cli.config));

    match modes::detect_mode(cli.command.as_ref()) {
        Mode::Server => {
            let config = foodgram::config::get_config();
            let _guard = match foodgram::system::init_logging(&config.logging) {
                Ok(guard) => guard,
                Err(e) => {
                    eprintln!("{} {}", "Failed to initialize logging:".red().bold(), e);
                    std::process::exit(1);
                }
            };

            if let Err(e) = modes::run_server().await {
                match e.downcast_ref::<foodgram::errors::FoodgramError>() {
                    Some(err) => eprintln!("{}", err.format_colored()),
                    None => eprintln!("{} {:#}", "[ERROR]".red().bold(), e),
                }
                std::process::exit(1);
            }
        }
        Mode::Cli => {
            let Some(command) = cli.command else {
                return;
            };
            if let Err(e) = modes::run_cli(command).await {
                eprintln!("{}", e.format_colored());
                std::process::exit(1);
            }
        }
    }
}
