use calorie_tracker::app::commands::run_command;
use calorie_tracker::utils::error::{ErrorCategory, TrackerError};
use calorie_tracker::utils::{logger, validation::Validate};
use calorie_tracker::CliConfig;
use clap::Parser;

fn main() {
    let cli = CliConfig::parse();

    let config = match cli.load_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    };

    // 初始化日誌
    if config.logging.format == "json" {
        logger::init_json_logger(&config.logging.level);
    } else {
        logger::init_cli_logger(cli.verbose, &config.logging.level);
    }
    tracing::debug!("Config: {:?}", config);

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        exit_with(&e);
    }

    let mut tracker = match config.open_tracker() {
        Ok(tracker) => tracker,
        Err(e) => exit_with(&e),
    };

    let stdout = std::io::stdout();
    if let Err(e) = run_command(&mut tracker, cli.command, stdout.lock()) {
        tracing::error!("❌ Command failed: {} (Category: {:?})", e, e.category());
        exit_with(&e);
    }
}

fn exit_with(e: &TrackerError) -> ! {
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());

    let exit_code = match e.category() {
        ErrorCategory::Validation | ErrorCategory::Capacity | ErrorCategory::Selection => 2,
        ErrorCategory::NotFound => 3,
        ErrorCategory::Storage | ErrorCategory::Configuration => 1,
    };
    std::process::exit(exit_code);
}
