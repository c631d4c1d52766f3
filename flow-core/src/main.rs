use clap::{Args, Parser};
use dotenv::dotenv;
use rust_decimal::Decimal;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use flow_common::{BacktestRequest, BacktestResult, ComparisonResult, Direction, ParameterOverrides};
use flow_core::{config::Settings, service::BacktestService};

#[derive(Parser)]
#[command(name = "flow-backtest")]
#[command(about = "Options flow strategy backtester")]
enum Commands {
    /// Backtest one direction
    Run {
        #[command(flatten)]
        args: BacktestArgs,
        #[arg(short, long, default_value = "puts")]
        direction: Direction,
    },
    /// Compare advanced puts, basic puts and advanced calls
    Compare {
        #[command(flatten)]
        args: BacktestArgs,
    },
}

#[derive(Args)]
struct BacktestArgs {
    #[arg(long)]
    put_call_threshold: Option<f64>,
    #[arg(short, long)]
    num_trades: Option<i64>,
    #[arg(long)]
    initial_capital: Option<Decimal>,
    #[arg(long)]
    position_size: Option<Decimal>,
    #[arg(long)]
    profit_target: Option<f64>,
    #[arg(long, allow_negative_numbers = true)]
    stop_loss: Option<f64>,
    #[arg(long)]
    volume_spike_threshold: Option<f64>,
    #[arg(long)]
    iv_threshold: Option<f64>,
    #[arg(long)]
    no_volume_spike: bool,
    #[arg(long)]
    no_iv_filter: bool,
    #[arg(long)]
    no_multi_timeframe: bool,
    /// Trading date (YYYY-MM-DD) whose market scenario biases the run
    #[arg(long)]
    date: Option<String>,
    #[arg(long)]
    seed: Option<u64>,
    /// Print the raw JSON result
    #[arg(long)]
    json: bool,
}

impl BacktestArgs {
    fn request(&self, direction: Option<Direction>) -> BacktestRequest {
        let disabled = |flag: bool| if flag { Some(false) } else { None };

        BacktestRequest {
            date: self.date.clone(),
            direction,
            seed: self.seed,
            overrides: ParameterOverrides {
                put_call_threshold: self.put_call_threshold,
                num_trades: self.num_trades,
                initial_capital: self.initial_capital,
                position_size: self.position_size,
                profit_target: self.profit_target,
                stop_loss: self.stop_loss,
                volume_spike_threshold: self.volume_spike_threshold,
                iv_threshold: self.iv_threshold,
                use_volume_spike: disabled(self.no_volume_spike),
                use_iv_filter: disabled(self.no_iv_filter),
                use_multi_timeframe: disabled(self.no_multi_timeframe),
            },
        }
    }
}

fn main() -> anyhow::Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let seed = match Settings::new() {
        Ok(settings) => settings.backtest.seed,
        Err(e) => {
            warn!("Using default settings: {}", e);
            None
        }
    };
    let service = BacktestService::default().with_seed(seed);

    match Commands::parse() {
        Commands::Run { args, direction } => {
            let request = args.request(Some(direction));
            info!("Running {} backtest", direction);
            let result = service.run(&request)?;

            if args.json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                print_result(&result);
            }
        }

        Commands::Compare { args } => {
            let request = args.request(None);
            info!("Running strategy comparison");
            let result = service.compare(&request)?;

            if args.json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                print_comparison(&result);
            }
        }
    }

    Ok(())
}

fn print_result(result: &BacktestResult) {
    let m = &result.metrics;
    println!("\nBacktest Results ({}):", result.direction);
    println!("Trades: {} of {} attempted ({}% filtered)", m.total_trades, m.trades_attempted, m.filter_rate);
    println!("Win Rate: {}% ({} W / {} L)", m.win_rate, m.wins, m.losses);
    println!("Total Profit: ${}", m.total_profit);
    println!("Final Capital: ${}", m.final_capital);
    println!("Return: {}%", m.return_percent);
    println!("Profit Factor: {}", m.profit_factor);
    println!("Sharpe Ratio: {}", m.sharpe_ratio);
    println!("Max Drawdown: {}%", m.max_drawdown);
    println!("Expectancy: ${}", m.expectancy);
    println!(
        "Rejected: entry {}, volume spike {}, iv {}, timeframe {}",
        result.rejections.entry, result.rejections.volume_spike, result.rejections.iv, result.rejections.timeframe
    );

    if let Some(scenario) = &result.scenario {
        println!("Scenario: {} {} ({}): {}", scenario.date, scenario.event, scenario.regime.title(), scenario.description);
    }
    if let Some(bias) = &result.scenario_bias {
        println!(
            "Scenario bias: trend {}, volatility {}, avg P/C {}",
            bias.trend, bias.volatility, bias.pc_ratio_avg
        );
    }
}

fn print_comparison(result: &ComparisonResult) {
    println!("\nStrategy Comparison:");
    println!("{:<16} {:>7} {:>9} {:>14} {:>12}", "Strategy", "Trades", "Win %", "Profit Factor", "Profit");
    for (label, r) in [
        ("Advanced Puts", &result.advanced_puts),
        ("Basic Puts", &result.basic_puts),
        ("Advanced Calls", &result.advanced_calls),
    ] {
        let m = &r.metrics;
        println!(
            "{:<16} {:>7} {:>9} {:>14} {:>12}",
            label, m.total_trades, m.win_rate, m.profit_factor, m.total_profit
        );
    }

    let c = &result.comparison;
    println!("\nBest Strategy: {} (profit factor {})", c.best_strategy.as_str(), c.best_profit_factor);
    println!("Win rate gain from filters: {} pts", c.win_rate_improvement);
    println!("Profit factor gain from filters: {}", c.profit_factor_improvement);
    println!("Puts vs calls win rate: {} pts", c.puts_vs_calls_win_rate);
    println!(
        "Filter rate: {}%, expectancy gain per trade: ${}",
        c.filter_efficiency.advanced_puts_filter_rate, c.filter_efficiency.trades_quality_improvement
    );
}
