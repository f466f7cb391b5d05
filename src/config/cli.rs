use crate::domain::model::QuoteFormData;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "quote-estimator")]
#[command(about = "Estimate the price and timeline of a web project")]
pub struct CliConfig {
    /// Path to a TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Catalog file (.json or .toml), overrides the configured one
    #[arg(long, global = true)]
    pub catalog: Option<PathBuf>,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Emit logs as JSON")]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// List every category and option
    Catalog,
    /// Price a selection
    Quote(QuoteArgs),
    /// Price a selection and submit it
    Submit(SubmitArgs),
}

#[derive(Debug, Clone, Args)]
pub struct QuoteArgs {
    /// `category=option[,option...]`, repeatable
    #[arg(short, long = "select", value_parser = parse_selection)]
    pub selections: Vec<SelectionArg>,

    /// Print the quote as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Clone, Args)]
pub struct SubmitArgs {
    #[command(flatten)]
    pub quote: QuoteArgs,

    #[arg(long)]
    pub name: String,

    #[arg(long)]
    pub email: String,

    #[arg(long, default_value = "")]
    pub company: String,

    #[arg(long, default_value = "")]
    pub message: String,

    /// Override backend.failure_probability
    #[arg(long)]
    pub failure_probability: Option<f64>,
}

impl SubmitArgs {
    pub fn form(&self) -> QuoteFormData {
        QuoteFormData {
            name: self.name.clone(),
            email: self.email.clone(),
            company: self.company.clone(),
            message: self.message.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionArg {
    pub category_id: String,
    pub option_ids: Vec<String>,
}

pub fn parse_selection(raw: &str) -> Result<SelectionArg, String> {
    let (category, options) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected category=option[,option], got '{}'", raw))?;

    let category_id = category.trim();
    if category_id.is_empty() {
        return Err(format!("missing category in '{}'", raw));
    }

    let option_ids: Vec<String> = options
        .split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .map(str::to_string)
        .collect();
    if option_ids.is_empty() {
        return Err(format!("no options given for '{}'", category_id));
    }

    Ok(SelectionArg {
        category_id: category_id.to_string(),
        option_ids,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_selection() {
        let sel = parse_selection("features=blog, seo").unwrap();
        assert_eq!(sel.category_id, "features");
        assert_eq!(sel.option_ids, vec!["blog", "seo"]);

        assert!(parse_selection("features").is_err());
        assert!(parse_selection("=blog").is_err());
        assert!(parse_selection("features=,").is_err());
    }

    #[test]
    fn test_parse_submit_command() {
        let cli = CliConfig::try_parse_from([
            "quote-estimator",
            "--verbose",
            "submit",
            "-s",
            "project_type=ecommerce",
            "--select",
            "features=blog,seo",
            "--name",
            "Anna",
            "--email",
            "anna@example.ch",
            "--failure-probability",
            "0",
        ])
        .unwrap();

        assert!(cli.verbose);
        match cli.command {
            Command::Submit(args) => {
                assert_eq!(args.quote.selections.len(), 2);
                assert_eq!(args.failure_probability, Some(0.0));
                assert_eq!(args.form().company, "");
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_out_of_range_failure_probability_fails_config_validation() {
        use crate::config::toml_config::EstimatorConfig;
        use crate::utils::validation::Validate;

        for raw in ["NaN", "7"] {
            let cli = CliConfig::try_parse_from([
                "quote-estimator",
                "submit",
                "-s",
                "project_type=landing_page",
                "--name",
                "Anna",
                "--email",
                "anna@example.ch",
                "--failure-probability",
                raw,
            ])
            .unwrap();

            let Command::Submit(args) = cli.command else {
                panic!("expected the submit command");
            };
            let config = EstimatorConfig::default().with_failure_probability(args.failure_probability);
            assert!(config.validate().is_err(), "{} should be rejected", raw);
        }
    }
}
