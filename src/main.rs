use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info, warn};

use kshort::cli::{Cli, Commands, ConfigCommands};
use kshort::config::{StaticConfig, init_config};
use kshort::runtime::modes;
use kshort::system::init_logging;

#[actix_web::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // 生成配置不依赖已有配置
    if let Some(Commands::Config(ConfigCommands::Generate { output_path })) = &cli.command {
        StaticConfig::default()
            .save_to_file(output_path)
            .with_context(|| format!("Failed to write {}", output_path))?;
        println!("Sample configuration written to {}", output_path);
        return Ok(());
    }

    let config = init_config(&cli.config)
        .map_err(|e| {
            eprintln!("{}", e.format_colored());
            e
        })
        .context("Failed to load configuration")?;

    // 日志 guard 必须活到进程结束
    let log_guard = init_logging(&config.logging)?;

    match config.validate() {
        Ok(warnings) => {
            for w in warnings {
                warn!("{}", w);
            }
        }
        Err(e) => {
            error!("{}", e);
            return Err(e).context("Invalid configuration");
        }
    }

    match cli.command {
        None | Some(Commands::Serve) => {
            info!("kshort {} starting", env!("CARGO_PKG_VERSION"));
            modes::run_server().await
        }
        Some(Commands::Resolve { short_code }) => {
            if !modes::run_resolve(&short_code).await? {
                // exit 不会跑析构，先把日志刷出去
                drop(log_guard);
                std::process::exit(1);
            }
            Ok(())
        }
        Some(Commands::Config(_)) => Ok(()),
    }
}
