use anyhow::Context;
use clap::Parser;
use serde::Serialize;
use ssq_history::config::cli::{CheckArgs, Cli, Command, QueryArgs, StatsArgs, StatsKind, UpdateArgs};
use ssq_history::utils::error::Result;
use ssq_history::utils::{logger, validation, validation::Validate};
use ssq_history::{
    AppConfig, CsvStore, DataLoader, DrawRecord, HistoryFetcher, PrizeChecker, QueryIndex,
    Statistics, Ticket,
};

type Loader = DataLoader<HistoryFetcher, CsvStore>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // 初始化日誌
    if cli.log_json {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting ssq");

    let config = cli.resolve_config().context("failed to load configuration")?;
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }
    tracing::debug!("Resolved config: {:?}", config);

    let fetcher = HistoryFetcher::from_config(&config).context("failed to build HTTP client")?;
    let store = CsvStore::from_config(&config);
    let loader = DataLoader::new(fetcher, store);

    if let Err(e) = run(&cli, &config, &loader).await {
        tracing::error!(
            "❌ Command failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());

        std::process::exit(e.severity().exit_code());
    }

    Ok(())
}

async fn run(cli: &Cli, config: &AppConfig, loader: &Loader) -> Result<()> {
    match &cli.command {
        Command::Query(args) => query(cli.json, loader, args).await,
        Command::Check(args) => check(cli.json, config, loader, args).await,
        Command::Stats(args) => stats(cli.json, config, loader, args).await,
        Command::Update(args) => update(cli.json, loader, args).await,
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_draw(record: &DrawRecord) {
    println!("Period: {}", record.period);
    println!("Date:   {}", record.date);
    println!("Red:    {}", record.red_balls.join(" - "));
    println!("Blue:   {}", record.blue_ball);
}

async fn query(json: bool, loader: &Loader, args: &QueryArgs) -> Result<()> {
    if let Some(period) = &args.period {
        validation::validate_period(period)?;
    }
    if let Some(date) = &args.date {
        validation::validate_date(date)?;
    }

    let records = loader.load(args.refresh).await?;
    let index = QueryIndex::new(&records);

    let (found, key) = match (&args.period, &args.date) {
        (Some(period), _) => (index.by_period(period), format!("period {}", period)),
        (None, Some(date)) => (index.by_date(date), format!("date {}", date)),
        (None, None) => (None, String::new()),
    };

    if json {
        return print_json(&found);
    }
    match found {
        Some(record) => print_draw(record),
        None => println!("No draw found for {}", key),
    }
    Ok(())
}

async fn check(json: bool, config: &AppConfig, loader: &Loader, args: &CheckArgs) -> Result<()> {
    let ticket = Ticket::new(&args.red, &args.blue)?;
    if let Some(period) = &args.period {
        validation::validate_period(period)?;
    }

    let records = loader.load(false).await?;
    let checker = PrizeChecker::default();

    if let Some(batch) = args.batch {
        let n = batch.unwrap_or(config.analysis.batch_window);
        let window = &records[..n.min(records.len())];
        let histogram = checker.batch_check(&ticket, window);

        if json {
            return print_json(&histogram);
        }
        println!("Results over the latest {} draws:", window.len());
        for (tier, count) in &histogram {
            println!("  {}: {}", tier, count);
        }
        return Ok(());
    }

    let index = QueryIndex::new(&records);
    let draw = match &args.period {
        Some(period) => index.by_period(period),
        None => index.latest(),
    };
    let Some(draw) = draw else {
        match &args.period {
            Some(period) => println!("No draw found for period {}", period),
            None => println!("No draws available; run `ssq update` first"),
        }
        return Ok(());
    };

    let tier = checker.check(&ticket, draw);
    if json {
        return print_json(&serde_json::json!({
            "period": draw.period,
            "tier": tier,
        }));
    }
    println!("Period:  {}", draw.period);
    println!("Drawn:   {} / {}", draw.red_balls.join(" - "), draw.blue_ball);
    println!("Yours:   {} / {}", ticket.red().join(" - "), ticket.blue());
    println!("Prize:   {}", tier);
    Ok(())
}

async fn stats(json: bool, config: &AppConfig, loader: &Loader, args: &StatsArgs) -> Result<()> {
    let records = loader.load(false).await?;
    let window = match args.window {
        Some(n) => &records[..n.min(records.len())],
        None => &records[..],
    };
    let stats = Statistics::new(window);
    let count = args.count.unwrap_or(match args.kind {
        StatsKind::Hot => config.analysis.hot_red_count,
        StatsKind::Cold => config.analysis.cold_red_count,
        _ => 10,
    });

    match args.kind {
        StatsKind::Freq => {
            let red = stats.red_frequency(count);
            let blue = stats.blue_frequency(count);
            if json {
                return print_json(&serde_json::json!({ "red": red, "blue": blue }));
            }
            println!("Red ball frequency:");
            for (number, count) in &red {
                println!("  {}: {}", number, count);
            }
            println!("Blue ball frequency:");
            for (number, count) in &blue {
                println!("  {}: {}", number, count);
            }
        }
        StatsKind::Hot | StatsKind::Cold => {
            let (title, picks) = if args.kind == StatsKind::Hot {
                ("Hot numbers", stats.hot_numbers(count, config.analysis.hot_blue_count))
            } else {
                ("Cold numbers", stats.cold_numbers(count, config.analysis.cold_blue_count))
            };
            if json {
                return print_json(&picks);
            }
            println!("{} over {} draws:", title, window.len());
            println!("  Red:  {}", picks.red.join(" - "));
            println!("  Blue: {}", picks.blue.join(" - "));
        }
        StatsKind::Missing => {
            let recent = args.window.unwrap_or(config.analysis.recent_count);
            let report = Statistics::new(&records).analyze_missing(recent);
            if json {
                return print_json(&report);
            }
            println!("Absent from the latest {} draws:", report.window);
            println!("  Red:  {}", report.red.keys().cloned().collect::<Vec<_>>().join(", "));
            println!("  Blue: {}", report.blue.keys().cloned().collect::<Vec<_>>().join(", "));
        }
        StatsKind::Omission => {
            let report = stats.omission_streaks();
            if json {
                return print_json(&report);
            }
            let mut red: Vec<_> = report.red.iter().collect();
            red.sort_by(|a, b| b.1.cmp(a.1));
            println!("Longest current red omissions:");
            for (number, streak) in red.into_iter().take(count) {
                println!("  {}: {} draws", number, streak);
            }
            let mut blue: Vec<_> = report.blue.iter().collect();
            blue.sort_by(|a, b| b.1.cmp(a.1));
            println!("Longest current blue omissions:");
            for (number, streak) in blue.into_iter().take(count) {
                println!("  {}: {} draws", number, streak);
            }
        }
    }
    Ok(())
}

async fn update(json: bool, loader: &Loader, args: &UpdateArgs) -> Result<()> {
    let records = if args.incremental {
        tracing::info!("Running incremental update");
        loader.update_incremental().await?
    } else {
        tracing::info!("Running full refresh");
        loader.load(true).await?
    };

    let latest = records.first().map(|r| r.period.clone());
    if json {
        return print_json(&serde_json::json!({
            "records": records.len(),
            "latest_period": latest,
        }));
    }
    println!("✅ Cache holds {} draws", records.len());
    if let Some(period) = latest {
        println!("📁 Latest period {} in {}", period, loader.store().path().display());
    }
    Ok(())
}
