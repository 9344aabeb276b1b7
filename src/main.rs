// ==========================================
// 纺纱工艺顾问 - 命令行入口
// ==========================================
// 子命令:
// - run:     完整运行（计算 → 生成 → 报告,可导出）
// - metrics: 仅本地计算,不调用生成服务
// - reports: 列出已保存报告
// - models:  可选模型列表
// ==========================================

use anyhow::{anyhow, Context};
use clap::{Args, Parser, Subcommand};
use spinning_advisor::api::RunRequest;
use spinning_advisor::app::{get_default_db_path, AppState};
use spinning_advisor::generation::{Credentials, AUTH_ENV_VAR};
use spinning_advisor::{logging, GenerationMode, PlantConfiguration};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "spinning-advisor")]
#[command(about = "纺纱工艺顾问 - 产量计算与工艺报告", long_about = None)]
#[command(version)]
struct Cli {
    /// 数据库路径（默认: 用户数据目录）
    #[arg(long, global = true, env = "SPINNING_ADVISOR_DB_PATH")]
    db: Option<String>,

    /// JSON 格式日志
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// 完整运行并保存报告
    Run {
        #[command(flatten)]
        plant: PlantArgs,

        /// 生成模式: unified | multi-agent（默认读取配置）
        #[arg(long)]
        mode: Option<GenerationMode>,

        /// 模型标识（默认读取配置）
        #[arg(long)]
        model: Option<String>,

        /// 生成服务 API Key
        #[arg(long, env = AUTH_ENV_VAR, hide_env_values = true)]
        api_key: Option<String>,

        /// 导出目录（缺省时使用配置 report_export_dir,均未设置则不导出）
        #[arg(long)]
        export_dir: Option<PathBuf>,
    },

    /// 仅计算产量指标
    Metrics {
        #[command(flatten)]
        plant: PlantArgs,
    },

    /// 列出最近的报告
    Reports {
        #[arg(long, default_value_t = 20)]
        limit: u32,
    },

    /// 可选模型列表
    Models {
        /// 外部发现的模型名（可重复）
        #[arg(long = "discovered")]
        discovered: Vec<String>,
    },
}

/// 工厂参数（默认值为典型环锭纺工厂）
#[derive(Args)]
struct PlantArgs {
    /// 纤维规格描述
    #[arg(long, default_value = "")]
    fiber: String,

    #[arg(long, default_value_t = 30.0)]
    count: f64,

    #[arg(long, default_value_t = 4.0)]
    tm: f64,

    #[arg(long, default_value_t = 800.0)]
    blowroom_capacity: f64,

    #[arg(long, default_value_t = 85.0)]
    blowroom_eff: f64,

    #[arg(long, default_value_t = 60.0)]
    card_production: f64,

    #[arg(long, default_value_t = 100.0)]
    card_eff: f64,

    #[arg(long, default_value_t = 25_000)]
    spindles: u32,

    #[arg(long, default_value_t = 18_500.0)]
    spindle_speed: f64,

    #[arg(long, default_value_t = 95.0)]
    ring_eff: f64,

    #[arg(long, default_value_t = 600)]
    winding_drums: u32,

    #[arg(long, default_value_t = 1_300.0)]
    winding_speed: f64,

    #[arg(long, default_value_t = 88.0)]
    winding_eff: f64,
}

impl From<PlantArgs> for PlantConfiguration {
    fn from(args: PlantArgs) -> Self {
        PlantConfiguration {
            fiber_description: args.fiber,
            target_count_ne: args.count,
            twist_multiplier: args.tm,
            blowroom_capacity_kg_hr: args.blowroom_capacity,
            blowroom_efficiency_pct: args.blowroom_eff,
            card_production_kg_hr: args.card_production,
            card_efficiency_pct: args.card_eff,
            spindle_count: args.spindles,
            spindle_speed_rpm: args.spindle_speed,
            ring_efficiency_pct: args.ring_eff,
            winding_drums: args.winding_drums,
            winding_speed_m_min: args.winding_speed,
            winding_efficiency_pct: args.winding_eff,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init(cli.log_json);

    tracing::info!("纺纱工艺顾问 {}", spinning_advisor::VERSION);

    let db_path = cli.db.unwrap_or_else(get_default_db_path);
    let state = AppState::new(db_path)
        .await
        .map_err(|e| anyhow!(e))
        .context("无法初始化AppState")?;
    let api = state.advisory_api.clone();

    match cli.command {
        Command::Run {
            plant,
            mode,
            model,
            api_key,
            export_dir,
        } => {
            let request = RunRequest {
                plant: plant.into(),
                mode,
                model_id: model,
                credentials: api_key.and_then(Credentials::new),
            };

            let report = match api.run_simulation(request).await {
                Ok(report) => report,
                Err(e) => {
                    eprintln!("[{}] {}", e.code(), e);
                    std::process::exit(1);
                }
            };

            println!("{}", report.document);
            if report.degraded {
                eprintln!("注意: 响应未按约定分段,已使用占位栏位");
            }

            if let Some(path) = api
                .export_after_run(report.report_id(), export_dir.as_deref())
                .await?
            {
                println!("已导出: {}", path.display());
            }
        }

        Command::Metrics { plant } => {
            let plant: PlantConfiguration = plant.into();
            let metrics = api.compute_metrics(&plant).await?;
            for line in metrics.summary_lines() {
                println!("{}", line);
            }
        }

        Command::Reports { limit } => {
            for summary in api.list_reports(limit)? {
                println!(
                    "{}  {}  {}  {}{}",
                    summary.created_at.format("%Y-%m-%d %H:%M:%S"),
                    summary.report_id,
                    summary.mode,
                    summary.model_id,
                    if summary.degraded { "  (degraded)" } else { "" }
                );
            }
        }

        Command::Models { discovered } => {
            for model in api.available_models(&discovered) {
                println!("{}", model);
            }
        }
    }

    Ok(())
}
