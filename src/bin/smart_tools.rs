//! Command line front end for the calculators
//!
//! Every subcommand prints its result as pretty JSON. Amortizing commands can
//! also write their schedule to CSV.
//!
//! ```bash
//! smart_tools mortgage --home-price 400000 --down-payment 20 --down-is-percent \
//!     --term-years 30 --rate 6.5 --schedule-csv schedule.csv
//! smart_tools compound --principal 10000 --monthly 200 --rate 7 --years 20 --frequency monthly
//! smart_tools currency --amount 100 --from USD --to KES
//! ```

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use serde::Serialize;
use smart_tools::assistant::{run_tool, AiTool, OpenAiBackend, ToolRequest};
use smart_tools::calculators::currency::fetch_exchange_rates;
use smart_tools::calculators::income_tax::validate_income;
use smart_tools::calculators::{
    calculate_age, calculate_bmi, calculate_date_difference, calculate_due_date, calculate_gpa,
    convert_currency, BmiInputs, Course, ExchangeRates, FilingStatus, PregnancyInputs, TaxTable,
    UnitSystem,
};
use smart_tools::finance::{
    calculate_car_loan, calculate_mortgage, compound_growth, CarLoanInputs, DownPayment,
    MortgageInputs, PropertyTax,
};
use smart_tools::text::{calculate_similarity, generate_citation, CitationData, SimilarityReport};
use smart_tools::{AmortizationRow, CompoundGrowthParameters, CompoundingFrequency, LoanParameters, ServiceConfig};
use std::fs::{self, File};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "smart_tools")]
#[command(author, version, about = "Everyday calculators and text tools", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Level-payment loan with optional extra principal
    Loan {
        #[arg(long)]
        principal: f64,
        /// Annual rate in percent
        #[arg(long)]
        rate: f64,
        #[arg(long)]
        term_months: u32,
        #[arg(long, default_value_t = 0.0)]
        extra: f64,
        #[arg(long)]
        schedule_csv: Option<PathBuf>,
    },

    /// Mortgage with taxes, insurance, PMI and HOA
    Mortgage {
        #[arg(long)]
        home_price: f64,
        #[arg(long)]
        down_payment: f64,
        /// Treat --down-payment as a percent of the price
        #[arg(long)]
        down_is_percent: bool,
        #[arg(long, default_value_t = 30)]
        term_years: u32,
        #[arg(long)]
        rate: f64,
        /// Annual property tax as a percent of the price
        #[arg(long, default_value_t = 1.2)]
        property_tax_percent: f64,
        #[arg(long, default_value_t = 0.0)]
        insurance: f64,
        #[arg(long, default_value_t = 0.5)]
        pmi_percent: f64,
        #[arg(long)]
        include_pmi: bool,
        #[arg(long, default_value_t = 0.0)]
        hoa: f64,
        #[arg(long, default_value_t = 0.0)]
        extra: f64,
        #[arg(long)]
        schedule_csv: Option<PathBuf>,
    },

    /// Car loan with sales tax and trade-in
    CarLoan {
        #[arg(long)]
        price: f64,
        #[arg(long, default_value_t = 0.0)]
        down: f64,
        #[arg(long, default_value_t = 0.0)]
        trade_in: f64,
        #[arg(long, default_value_t = 0.0)]
        sales_tax: f64,
        #[arg(long, default_value_t = 5)]
        term_years: u32,
        #[arg(long)]
        rate: f64,
        #[arg(long, default_value_t = 0.0)]
        extra: f64,
        /// First payment date, defaults to today
        #[arg(long)]
        start_date: Option<NaiveDate>,
    },

    /// Compound growth with monthly contributions
    Compound {
        #[arg(long)]
        principal: f64,
        #[arg(long, default_value_t = 0.0)]
        monthly: f64,
        #[arg(long)]
        rate: f64,
        #[arg(long)]
        years: u32,
        /// yearly, quarterly, monthly or daily
        #[arg(long, default_value = "monthly")]
        frequency: CompoundingFrequency,
    },

    /// Age in years, months and days
    Age {
        date_of_birth: NaiveDate,
        #[arg(long)]
        today: Option<NaiveDate>,
    },

    /// Time between two dates
    DateDiff { start: NaiveDate, end: NaiveDate },

    /// Due date from the last menstrual period
    Pregnancy {
        last_menstrual_period: NaiveDate,
        #[arg(long, default_value_t = 28)]
        cycle_length: u32,
    },

    /// Body mass index (kg and cm, or lb and in with --imperial)
    Bmi {
        weight: f64,
        height: f64,
        #[arg(long)]
        imperial: bool,
    },

    /// GPA from CREDITS:GRADE pairs, e.g. 3:A 4:B+
    Gpa { courses: Vec<String> },

    /// Progressive income tax
    Tax {
        income: f64,
        #[arg(long)]
        married: bool,
    },

    /// Currency conversion from a saved snapshot or live rates
    Currency {
        #[arg(long)]
        amount: f64,
        #[arg(long)]
        from: String,
        #[arg(long)]
        to: String,
        /// JSON snapshot in the rates API format
        #[arg(long)]
        rates: Option<PathBuf>,
    },

    /// Word-overlap similarity between two text files
    Similarity { first: PathBuf, second: PathBuf },

    /// Format a citation described by a JSON file
    Cite { source: PathBuf },

    /// Run a language model tool over a text file
    Ai {
        /// grammar-checker, essay-improver or summarizer
        tool: String,
        input: PathBuf,
        /// Essay improver options: clarity, formal, concise
        #[arg(long)]
        option: Vec<String>,
        /// Summary length: short, medium or detailed
        #[arg(long)]
        length: Option<String>,
    },
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn write_schedule(path: &Path, rows: &[AmortizationRow]) -> Result<()> {
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut wtr = csv::Writer::from_writer(file);
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    eprintln!("Schedule written to {}", path.display());
    Ok(())
}

fn parse_course(pair: &str) -> Result<Course> {
    let Some((credits, grade)) = pair.split_once(':') else {
        bail!("expected CREDITS:GRADE, got '{}'", pair);
    };
    Ok(Course {
        name: String::new(),
        credits: credits.trim().parse().with_context(|| format!("bad credits in '{}'", pair))?,
        grade: grade.trim().to_string(),
    })
}

fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config = ServiceConfig::from_env()?;

    match cli.command {
        Commands::Loan { principal, rate, term_months, extra, schedule_csv } => {
            let params = LoanParameters::new(principal, rate, term_months).with_extra_payment(extra);
            params.validate()?;
            let comparison = params.compare();
            if let Some(path) = schedule_csv {
                write_schedule(&path, &comparison.schedule)?;
            }
            print_json(&comparison)?;
        }
        Commands::Mortgage {
            home_price,
            down_payment,
            down_is_percent,
            term_years,
            rate,
            property_tax_percent,
            insurance,
            pmi_percent,
            include_pmi,
            hoa,
            extra,
            schedule_csv,
        } => {
            let inputs = MortgageInputs {
                home_price,
                down_payment: if down_is_percent {
                    DownPayment::Percentage(down_payment)
                } else {
                    DownPayment::Amount(down_payment)
                },
                loan_term_years: term_years,
                annual_interest_rate: rate,
                property_tax: PropertyTax::Percent(property_tax_percent),
                annual_insurance: insurance,
                pmi_percent,
                include_pmi,
                monthly_hoa: hoa,
                extra_principal_payment: extra,
            };
            inputs.validate()?;
            let results = calculate_mortgage(&inputs);
            if let Some(path) = schedule_csv {
                write_schedule(&path, &results.amortization_schedule)?;
            }
            print_json(&results)?;
        }
        Commands::CarLoan { price, down, trade_in, sales_tax, term_years, rate, extra, start_date } => {
            let inputs = CarLoanInputs {
                vehicle_price: price,
                down_payment: down,
                trade_in_value: trade_in,
                sales_tax_percent: sales_tax,
                term_years,
                annual_interest_rate: rate,
                extra_monthly_payment: extra,
                start_date: start_date.unwrap_or_else(today),
            };
            inputs.validate()?;
            print_json(&calculate_car_loan(&inputs))?;
        }
        Commands::Compound { principal, monthly, rate, years, frequency } => {
            let params = CompoundGrowthParameters {
                principal,
                monthly_contribution: monthly,
                annual_rate: rate,
                years,
                compounding_frequency: frequency,
            };
            params.validate()?;
            print_json(&compound_growth(&params))?;
        }
        Commands::Age { date_of_birth, today: on } => {
            let age = calculate_age(date_of_birth, on.unwrap_or_else(today))?;
            println!("{}", age.describe());
        }
        Commands::DateDiff { start, end } => {
            let diff = calculate_date_difference(start, end)?;
            print_json(&diff)?;
            println!("{}", diff.describe());
        }
        Commands::Pregnancy { last_menstrual_period, cycle_length } => {
            let inputs = PregnancyInputs { last_menstrual_period, cycle_length };
            let now = today();
            inputs.validate(now)?;
            print_json(&calculate_due_date(&inputs, now)?)?;
        }
        Commands::Bmi { weight, height, imperial } => {
            let inputs = BmiInputs {
                weight,
                height,
                unit_system: if imperial { UnitSystem::Imperial } else { UnitSystem::Metric },
            };
            inputs.validate()?;
            let result = calculate_bmi(&inputs);
            println!("BMI {:.1} ({})", result.bmi, result.category.label());
        }
        Commands::Gpa { courses } => {
            let courses = courses.iter().map(|c| parse_course(c)).collect::<Result<Vec<_>>>()?;
            print_json(&calculate_gpa(&courses))?;
        }
        Commands::Tax { income, married } => {
            validate_income(income)?;
            let table = match &config.tax_table_path {
                Some(path) => TaxTable::from_csv_file(path)?,
                None => TaxTable::default(),
            };
            let status = if married { FilingStatus::Married } else { FilingStatus::Single };
            print_json(&table.calculate(income, status))?;
        }
        Commands::Currency { amount, from, to, rates } => {
            let rates = match rates {
                Some(path) => ExchangeRates::from_json_file(&path)?,
                None => {
                    let client = reqwest::Client::new();
                    fetch_exchange_rates(&client, &config.rate_endpoints, &from.to_ascii_uppercase()).await?
                }
            };
            print_json(&convert_currency(amount, &from, &to, &rates)?)?;
        }
        Commands::Similarity { first, second } => {
            let a = fs::read_to_string(&first).with_context(|| format!("reading {}", first.display()))?;
            let b = fs::read_to_string(&second).with_context(|| format!("reading {}", second.display()))?;
            let report = SimilarityReport::new(calculate_similarity(&a, &b));
            println!("{}% ({})", report.percent, report.band.label());
        }
        Commands::Cite { source } => {
            let file = File::open(&source).with_context(|| format!("opening {}", source.display()))?;
            let data: CitationData = serde_json::from_reader(file)?;
            println!("{}", generate_citation(&data));
        }
        Commands::Ai { tool, input, option, length } => {
            let Some(tool) = AiTool::from_route(&tool) else {
                bail!("unknown tool '{}'", tool);
            };
            let text = fs::read_to_string(&input).with_context(|| format!("reading {}", input.display()))?;
            let request = ToolRequest { text, options: option, length };
            let backend = OpenAiBackend::from_env(reqwest::Client::new(), &config)?;
            println!("{}", run_tool(&backend, tool, &request, &config).await?);
        }
    }

    Ok(())
}
