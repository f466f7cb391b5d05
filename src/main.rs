use anyhow::Context;
use clap::Parser;
use quote_estimator::adapters::MockBackend;
use quote_estimator::config::cli::{Command, QuoteArgs, SubmitArgs};
use quote_estimator::utils::error::ErrorSeverity;
use quote_estimator::utils::format::{format_amount, format_price, format_weeks, tier_label};
use quote_estimator::utils::{logger, validation::Validate};
use quote_estimator::{
    Catalog, CliConfig, EstimatorConfig, EstimatorError, EstimatorSession, QuoteResult,
};

type Session = EstimatorSession<MockBackend, MockBackend>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    if cli.log_json {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }
    tracing::debug!("CLI config: {:?}", cli);

    let mut config = match &cli.config {
        Some(path) => EstimatorConfig::from_file(path)
            .with_context(|| format!("Failed to load config file '{}'", path.display()))?,
        None => EstimatorConfig::default(),
    };

    // Command-line overrides go through the same validation as the file.
    if let Command::Submit(args) = &cli.command {
        config = config.with_failure_probability(args.failure_probability);
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let catalog = match &cli.catalog {
        Some(path) => Catalog::from_file(path),
        None => config.load_catalog(),
    };
    let catalog = match catalog {
        Ok(catalog) => catalog,
        Err(e) => exit_with(e),
    };

    let outcome = match &cli.command {
        Command::Catalog => {
            print_catalog(&catalog, &config);
            Ok(())
        }
        Command::Quote(args) => run_quote(catalog, &config, args).await,
        Command::Submit(args) => run_submit(catalog, &config, args).await,
    };

    if let Err(e) = outcome {
        exit_with(e);
    }
    Ok(())
}

fn exit_with(e: EstimatorError) -> ! {
    tracing::error!(
        "❌ {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());

    let exit_code = match e.severity() {
        ErrorSeverity::Low => 4,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code);
}

async fn start_session(
    catalog: Catalog,
    config: &EstimatorConfig,
    args: &QuoteArgs,
) -> Result<Session, EstimatorError> {
    let source = MockBackend::from_config(config)?;
    let sink = MockBackend::from_config(config)?;
    let mut session = EstimatorSession::new(catalog, config.pricing(), source, sink);
    session.load_config().await;

    for selection in &args.selections {
        for option_id in &selection.option_ids {
            session.toggle(&selection.category_id, option_id)?;
        }
    }
    Ok(session)
}

async fn run_quote(
    catalog: Catalog,
    config: &EstimatorConfig,
    args: &QuoteArgs,
) -> Result<(), EstimatorError> {
    let session = start_session(catalog, config, args).await?;
    let quote = session.quote().ok_or(EstimatorError::NoSelections)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&quote)?);
    } else {
        print_quote(&quote, &session.pricing().currency);
    }
    Ok(())
}

async fn run_submit(
    catalog: Catalog,
    config: &EstimatorConfig,
    args: &SubmitArgs,
) -> Result<(), EstimatorError> {
    let mut session = start_session(catalog, config, &args.quote).await?;
    session.begin_review()?;
    session.proceed_to_payment()?;

    let receipt = session.submit(&args.form()).await?;
    if args.quote.json {
        println!("{}", serde_json::to_string_pretty(&receipt)?);
    } else {
        if let Some(quote) = session.quote() {
            print_quote(&quote, &session.pricing().currency);
        }
        println!("✅ {}", receipt.message);
        println!("🧾 Submission #{}", receipt.submission_id);
    }
    Ok(())
}

fn print_catalog(catalog: &Catalog, config: &EstimatorConfig) {
    let currency = &config.pricing.currency;
    println!("📋 Catalog {}", catalog.version);
    for category in &catalog.categories {
        let mode = if category.multi_select { "pick any" } else { "pick one" };
        println!();
        println!("{} {} [{}] ({})", category.icon, category.title, category.id, mode);
        for option in &category.options {
            println!(
                "  {:<20} {:<28} {:>12}  {}",
                option.id,
                option.label,
                format_amount(option.base_price, currency),
                format_weeks(option.timeline_weeks)
            );
        }
    }
}

fn print_quote(quote: &QuoteResult, currency: &str) {
    println!("📋 Quote");
    for service in &quote.selected_services {
        println!(
            "  {:<26} {:<28} {:>12}",
            service.category_title,
            service.option_label,
            format_amount(service.price, currency)
        );
    }
    println!();
    println!("  Subtotal:  {}", format_amount(quote.gross_price, currency));
    if quote.discount > 0.0 {
        println!("  Discount: -{}", format_amount(quote.discount, currency));
    }
    println!(
        "  Total:     {} (range {} to {})",
        format_price(quote.total_price, currency),
        format_price(quote.min_price, currency),
        format_price(quote.max_price, currency)
    );
    println!("  Timeline:  {}", format_weeks(quote.total_weeks));
    println!("  Tier:      {}", tier_label(quote.tier));
}
