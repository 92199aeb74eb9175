use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use log::info;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;

use academy_backend::config::AcademyConfig;
use academy_backend::domain::{AcademyService, SystemClock, YearMonth};
use academy_backend::storage::FileStore;

#[derive(Parser, Debug)]
#[command(author, version, about = "Academy records: students, class cards and test scores", long_about = None)]
struct Cli {
    /// Data directory (defaults to ACADEMY_DATA_DIR, then the platform data directory)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Dashboard metrics and recent activity
    Dashboard,
    /// Students matching a name fragment and grade
    Students {
        #[arg(default_value = "")]
        name: String,
        grade: Option<String>,
    },
    /// One student with class card and test counts
    Student { id: String },
    /// Monthly report for a student, current month by default
    Report {
        id: String,
        /// Month as YYYY-MM
        month: Option<YearMonth>,
    },
    /// Snapshot of every collection as JSON
    Export,
    /// One collection as CSV
    ExportCsv {
        #[arg(value_enum)]
        table: CsvTable,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum CsvTable {
    Students,
    Classes,
    Tests,
}

#[derive(Serialize)]
struct Dashboard {
    metrics: shared::DashboardMetrics,
    activity: Vec<shared::ActivityItem>,
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let config = AcademyConfig::load(cli.data_dir.as_deref())?;
    let directory = config.data_directory()?;
    info!("Starting academy records with data directory {}", directory.display());

    let store = Arc::new(
        FileStore::new(&directory)
            .with_context(|| format!("Failed to open data directory {}", directory.display()))?,
    );
    let service = AcademyService::open(store, config, Arc::new(SystemClock));

    match cli.command.unwrap_or(Command::Dashboard) {
        Command::Dashboard => print_json(&Dashboard {
            metrics: service.dashboard_metrics(),
            activity: service.activity_feed(),
        }),
        Command::Students { name, grade } => print_json(&service.filter_students(&name, grade.as_deref())),
        Command::Student { id } => print_json(&service.student_summary(&id)?),
        Command::Report { id, month } => {
            let month = month.unwrap_or_else(|| service.current_month());
            print_json(&service.monthly_report(&id, month)?)
        }
        Command::Export => print_json(&service.export_snapshot()),
        Command::ExportCsv { table } => {
            let csv = match table {
                CsvTable::Students => service.export_students_csv()?,
                CsvTable::Classes => service.export_sessions_csv()?,
                CsvTable::Tests => service.export_tests_csv()?,
            };
            print!("{}", csv);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_report_with_month() {
        let cli = Cli::try_parse_from(["academy", "--data-dir", "/tmp/academy", "report", "student::1", "2024-02"]).unwrap();
        assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/academy")));
        match cli.command {
            Some(Command::Report { id, month }) => {
                assert_eq!(id, "student::1");
                assert_eq!(month, Some("2024-02".parse().unwrap()));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_invalid_input_is_rejected() {
        assert!(Cli::try_parse_from(["academy", "report", "student::1", "2024-13"]).is_err());
        assert!(Cli::try_parse_from(["academy", "export-csv", "grades"]).is_err());
        assert!(Cli::try_parse_from(["academy", "--data-dir"]).is_err());
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["academy"]).unwrap();
        assert!(cli.command.is_none());

        let cli = Cli::try_parse_from(["academy", "students"]).unwrap();
        assert!(matches!(cli.command, Some(Command::Students { ref name, grade: None }) if name.is_empty()));

        let cli = Cli::try_parse_from(["academy", "export-csv", "classes"]).unwrap();
        assert!(matches!(cli.command, Some(Command::ExportCsv { table: CsvTable::Classes })));
    }
}
