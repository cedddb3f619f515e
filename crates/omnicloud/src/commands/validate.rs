use crate::deploy::DeploymentNames;
use colored::Colorize;
use std::path::Path;

pub fn handle(stack: &str, stack_file: Option<&Path>) -> anyhow::Result<()> {
    println!("{}", "設定を検証中...".blue());
    println!("スタック: {}", stack.cyan());

    let config = match omnicloud_config::load(stack, stack_file) {
        Ok(config) => config,
        Err(e) => {
            eprintln!();
            eprintln!("{}", "✗ 設定エラー".red().bold());
            eprintln!("  {}", e);
            std::process::exit(1);
        }
    };

    let names = match DeploymentNames::derive(&config) {
        Ok(names) => names,
        Err(e) => {
            eprintln!();
            eprintln!("{}", "✗ 名前を導出できません".red().bold());
            eprintln!("  {}", e);
            std::process::exit(1);
        }
    };

    println!("{}", "✓ 設定ファイルは正常です！".green().bold());
    println!();
    println!("サマリー:");
    println!("  プロジェクト: {} ({})", config.project_name.cyan(), config.environment);
    println!("  AWS: {}", names.aws.cyan());
    println!("    - バケット: {}", config.aws_bucket_name);
    println!(
        "    - Block Public Access: {}",
        on_off(config.enable_public_access_block)
    );
    println!("  Azure: {}", names.azure.cyan());
    println!("    - ストレージアカウント: {}", names.storage_account);
    if config.enable_azure_backup {
        println!(
            "    - 論理削除: {} ({}日)",
            on_off(true),
            config.backup_retention_days
        );
    } else {
        println!("    - 論理削除: {}", on_off(false));
    }
    println!("  GCP: {}", names.gcp.cyan());
    println!("    - ゾーン: {}", names.zone);
    println!(
        "    - {} (TTL {}s)",
        names.primary_record, config.gcp_primary_ttl
    );
    println!(
        "    - {} (TTL {}s)",
        names.backup_record, config.gcp_backup_ttl
    );

    Ok(())
}

fn on_off(enabled: bool) -> colored::ColoredString {
    if enabled { "有効".green() } else { "無効".yellow() }
}
