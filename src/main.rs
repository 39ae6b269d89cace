use clap::Parser;
use hackathon_scoreboard::config::Command;
use hackathon_scoreboard::domain::ports::ConfigProvider;
use hackathon_scoreboard::utils::error::{ErrorSeverity, HackathonError};
use hackathon_scoreboard::utils::{logger, validation::Validate};
use hackathon_scoreboard::{CliConfig, HackathonManager, LocalStorage, RankedTeam};

fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.json_logs {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("🚀 Starting hackathon scoreboard");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    // 載入並驗證配置
    let config = match cli.resolve_config().and_then(|c| c.validate().map(|_| c)) {
        Ok(config) => config,
        Err(e) => exit_with(&e),
    };

    tracing::info!(
        "📁 Base dir: {}, data: {}, report: {}",
        config.base_dir(),
        config.data_file(),
        config.report_file()
    );

    let storage = LocalStorage::new(config.base_dir().to_string());
    let mut manager = HackathonManager::new(
        config.build_repository(),
        storage,
        config.data_file(),
        config.report_file(),
    );

    // 找不到資料檔只記錄錯誤，繼續以空資料執行
    manager.load_team_data();

    match cli.command {
        Command::Report => {
            if !manager.generate_report() {
                eprintln!("❌ Failed to write report to {}", manager.report_file());
                std::process::exit(1);
            }
            println!("✅ Report written to: {}", manager.report_file());
        }
        Command::Rank { category, json } => {
            let ranked = manager.ranked_teams(category.as_deref());
            if json {
                println!("{}", serde_json::to_string_pretty(&ranked)?);
            } else {
                print_ranking(&ranked);
            }
        }
        Command::Show { id } => match manager.find_team(id) {
            Some(team) => {
                println!("{}", team.full_details());
                println!("Assigned Judge: {}", manager.repository().judge_for(id));
            }
            None => {
                eprintln!("❌ Team not found for ID: {}", id);
                std::process::exit(1);
            }
        },
        Command::Summary { json } => {
            let overview = manager.overview();
            if json {
                println!("{}", serde_json::to_string_pretty(&overview)?);
            } else {
                println!("--- HACKATHON OVERVIEW ---");
                println!("Total Teams: {}", overview.total_teams);
                println!("Average Overall Score: {:.2} / 5.0", overview.average_score);
                match overview.top_team {
                    Some(top) => println!(
                        "Top Team: {} (ID {}) - Score: {:.2}",
                        top.name, top.id, top.score
                    ),
                    None => println!("Top Team: N/A"),
                }
            }
        }
    }

    Ok(())
}

fn print_ranking(ranked: &[RankedTeam]) {
    if ranked.is_empty() {
        println!("No teams found.");
        return;
    }

    println!(
        "{:<5} | {:<6} | {:<30} | {:<25} | {:<11} | {:<6} | {}",
        "Rank", "ID", "Name", "Category", "Eligibility", "Score", "Assigned Judge"
    );
    for team in ranked {
        println!(
            "{:<5} | {:<6} | {:<30} | {:<25} | {:<11} | {:<6.2} | {}",
            team.rank,
            team.id,
            team.name,
            team.category,
            if team.eligible { "Eligible" } else { "INELIGIBLE" },
            team.overall_score,
            team.judge
        );
    }
}

fn exit_with(e: &HackathonError) -> ! {
    tracing::error!(
        "❌ {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

    // 根據錯誤嚴重程度決定退出碼
    let exit_code = match e.severity() {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code)
}
