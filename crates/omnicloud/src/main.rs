mod commands;
mod deploy;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "omnicloud")]
#[command(about = "一つのクラウドが落ちても、サイトは落ちない。", long_about = None)]
struct Cli {
    /// スタック名 (dev, stg, prod)
    #[arg(
        short,
        long,
        global = true,
        env = "OMNICLOUD_STACK",
        default_value = omnicloud_config::DEFAULT_STACK
    )]
    stack: String,

    /// スタックファイルのパス（指定時は探索しない）
    #[arg(long, global = true, env = omnicloud_config::STACK_FILE_ENV)]
    stack_file: Option<PathBuf>,

    /// デバッグログを表示
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 設定を検証し、導出される名前を表示
    Validate,
    /// 作成されるリソースとスタック出力をプレビュー
    Preview {
        /// 削除計画を表示
        #[arg(long)]
        destroy: bool,
        /// JSONで出力
        #[arg(long)]
        json: bool,
    },
    /// バージョン情報を表示
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // ログはstderrへ（stdoutはJSON出力に使う）
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let stack_file = cli.stack_file.as_deref();
    match cli.command {
        Commands::Validate => commands::validate::handle(&cli.stack, stack_file),
        Commands::Preview { destroy, json } => {
            commands::preview::handle(&cli.stack, stack_file, destroy, json).await
        }
        Commands::Version => {
            println!("omnicloud {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}
