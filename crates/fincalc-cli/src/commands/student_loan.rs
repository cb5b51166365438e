use clap::Args;
use serde_json::Value;

use fincalc_core::student_loan::{self, StudentLoanInput};

use crate::input;

/// Arguments for student loan projection
#[derive(Args)]
pub struct StudentLoanArgs {
    /// Path to a JSON or YAML input file
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_student_loan(args: StudentLoanArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let sl_input: StudentLoanInput = if let Some(ref path) = args.input {
        input::file::read_input(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        return Err(
            "--input <file.json|file.yaml> or stdin required for student loan projection".into(),
        );
    };
    let result = student_loan::project_student_loan(&sl_input)?;
    Ok(serde_json::to_value(result)?)
}
