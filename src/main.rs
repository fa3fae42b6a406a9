use clap::Parser;
use feedback_portal::config::Command;
use feedback_portal::core::ConfigProvider;
use feedback_portal::domain::model::{Credentials, Registration};
use feedback_portal::utils::error::PortalError;
use feedback_portal::utils::{logger, validation::Validate};
use feedback_portal::{
    render_dashboard, CliConfig, DashboardExporter, ExportDirectory, FileSessionStore,
    HttpFeedbackApi, Portal, PortalConfig,
};

async fn run(cli: CliConfig, config: PortalConfig) -> Result<(), PortalError> {
    let api = HttpFeedbackApi::from_config(&config)?;
    let sessions = FileSessionStore::new(config.session_path());
    let portal = Portal::new(api, sessions);

    match cli.command {
        Command::Register {
            username,
            password,
            role,
        } => {
            portal
                .register(Registration {
                    username,
                    password,
                    role: role.into(),
                })
                .await?;
            println!("🎉 Registration successful! You can now log in.");
        }
        Command::Login { username, password } => {
            let session = portal.login(Credentials { username, password }).await?;
            println!("✅ Logged in as {} ({})", session.username, session.role);
        }
        Command::Logout => {
            portal.logout()?;
            println!("👋 Logged out.");
        }
        Command::Submit { content } => {
            portal.submit_feedback(&content).await?;
            println!("✅ Feedback submitted successfully.");
        }
        Command::Dashboard { format, .. } => {
            let dashboard = portal.dashboard().await?;
            match format.export_format() {
                None => print!("{}", render_dashboard(&dashboard)),
                Some(export_format) => {
                    let storage = ExportDirectory::new(config.output_path());
                    let exporter = DashboardExporter::new(storage, config.output_path());
                    let path = exporter.export(&dashboard, export_format).await?;
                    tracing::info!("📁 Dashboard exported to: {}", path);
                    println!("📁 Dashboard exported to: {}", path);
                }
            }
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.log_json {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }
    tracing::debug!("CLI config: {:?}", cli.command);

    // 解析並驗證配置
    let config = match cli.resolve().and_then(|config| config.validate().map(|_| config)) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("❌ Configuration validation failed: {}", e);
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    };

    if let Err(e) = run(cli, config).await {
        tracing::error!(
            "❌ Command failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );

        eprintln!("{}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());

        std::process::exit(e.severity().exit_code());
    }

    Ok(())
}
