mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::amortization::AmortizeArgs;
use commands::apr::{AprArgs, ConvertRateArgs};
use commands::debt_payoff::DebtPayoffArgs;
use commands::loan::LoanArgs;
use commands::mortgage::MortgageArgs;
use commands::pension::PensionArgs;
use commands::refinance::RefinanceArgs;
use commands::student_loan::StudentLoanArgs;

/// Household loan, mortgage, and rate calculations
#[derive(Parser)]
#[command(
    name = "fincalc",
    version,
    about = "Household loan, mortgage, and rate calculations",
    long_about = "A CLI for the loan and rate math behind everyday financial decisions. \
                  Supports mortgage payments, amortization schedules, refinance \
                  break-even analysis, effective APR, student loan projections, \
                  pension lump-sum comparisons, and debt payoff planning."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Monthly mortgage payment with taxes, insurance, and HOA
    Mortgage(MortgageArgs),
    /// Level-payment loan at any payment cadence
    Loan(LoanArgs),
    /// Month-by-month amortization schedule with annual rollups
    Amortize(AmortizeArgs),
    /// Refinance savings and break-even analysis
    Refinance(RefinanceArgs),
    /// Effective APR once fees and points are counted
    Apr(AprArgs),
    /// Convert between nominal APR and effective APY
    ConvertRate(ConvertRateArgs),
    /// Student loan projection with deferment and capitalization
    StudentLoan(StudentLoanArgs),
    /// Pension lump-sum versus annuity comparison
    Pension(PensionArgs),
    /// Debt payoff timeline, with an optional accelerated payment
    DebtPayoff(DebtPayoffArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn main() {
    let cli = Cli::parse();

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Mortgage(args) => commands::mortgage::run_mortgage(args),
        Commands::Loan(args) => commands::loan::run_loan(args),
        Commands::Amortize(args) => commands::amortization::run_amortize(args),
        Commands::Refinance(args) => commands::refinance::run_refinance(args),
        Commands::Apr(args) => commands::apr::run_apr(args),
        Commands::ConvertRate(args) => commands::apr::run_convert_rate(args),
        Commands::StudentLoan(args) => commands::student_loan::run_student_loan(args),
        Commands::Pension(args) => commands::pension::run_pension(args),
        Commands::DebtPayoff(args) => commands::debt_payoff::run_debt_payoff(args),
        Commands::Version => {
            println!("fincalc {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
