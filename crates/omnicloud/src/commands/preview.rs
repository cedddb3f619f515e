use crate::deploy;
use colored::Colorize;
use omnicloud_cloud::{ActionType, Stack};
use std::path::Path;
use std::sync::Arc;

pub async fn handle(
    stack_name: &str,
    stack_file: Option<&Path>,
    destroy: bool,
    json: bool,
) -> anyhow::Result<()> {
    let config = omnicloud_config::load(stack_name, stack_file)?;

    if !json {
        println!("{}", "プレビュー中...".blue());
        println!("スタック: {}", stack_name.cyan());
    }

    let engine = Arc::new(deploy::preview_engine());
    let mut stack = Stack::new(&config.project_name, stack_name, engine.clone());
    let deployment = deploy::build(&mut stack, &config)?;
    let outputs = stack.finish().await?;

    let plan = if destroy {
        engine.destroy_plan().await
    } else {
        engine.plan().await
    };

    if json {
        let report = serde_json::json!({
            "stack": stack_name,
            "plan": plan,
            "outputs": outputs,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!();
    println!("{}", "リソース:".bold());
    for action in &plan.actions {
        let symbol = match action.action_type {
            ActionType::Create => "+".green(),
            ActionType::Delete => "-".red(),
            ActionType::Retain => "~".yellow(),
        };
        println!(
            "  {} {} {}",
            symbol,
            action.resource_type.dimmed(),
            action.resource_id
        );
    }
    println!();
    println!("{}", plan.summary().to_string().bold());

    if !destroy {
        println!();
        println!("{}", "スタック出力:".bold());
        for line in outputs.to_string().lines() {
            println!("  {}", line);
        }
        println!();
        println!(
            "レジストラで {} を上記のネームサーバーに委任してください",
            deployment.gcp.dns_name.relative().cyan()
        );
    }

    Ok(())
}
