//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `practicals_core` linkage and configuration from the environment.
//! - Replay the employee rollback scenario and print the surviving rows.

use practicals_core::{AppConfig, AppContext, Employee, EmployeeService, Repository};
use std::process::ExitCode;

const SALARY_CAP: f64 = 60_000.0;

fn main() -> ExitCode {
    println!("practicals_core ping={}", practicals_core::ping());
    println!("practicals_core version={}", practicals_core::core_version());

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("practicals_cli error: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), String> {
    let config = AppConfig::from_env()?;
    config.init_logging()?;
    let ctx = AppContext::open(config).map_err(|err| err.to_string())?;

    let employees = ctx.employees();
    report_guarded_save(&employees);

    let stored = employees
        .repository()
        .and_then(|repo| repo.list())
        .map_err(|err| err.to_string())?;
    let rendered = serde_json::to_string_pretty(&stored).map_err(|err| err.to_string())?;
    println!("employees={rendered}");
    Ok(())
}

fn report_guarded_save(employees: &EmployeeService<'_>) {
    let first = Employee::new("John", "Doe", "Engineering", 75_000.0);
    let guarded = Employee::new("Jane", "Smith", "Marketing", 65_000.0);
    match employees.save_with_salary_guard(&first, &guarded, SALARY_CAP) {
        Ok((first, guarded)) => println!(
            "guarded_save=committed first_id={:?} guarded_id={:?}",
            first.id, guarded.id
        ),
        Err(err) => println!("guarded_save=rolled_back code={} message={err}", err.code()),
    }
}
