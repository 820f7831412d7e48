//! stress-risk CLI: train, inspect and query the student stress-risk model.

use clap::{Args, Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use stress_risk::config::AppConfig;
use stress_risk::data::{ColumnStats, DatasetSummary};
use stress_risk::inference::StudentProfile;
use stress_risk::service::{Assessment, PerformanceReport, StressService};
use tracing_subscriber::EnvFilter;

type CliResult = Result<(), Box<dyn std::error::Error>>;

#[derive(Parser)]
#[command(name = "stress-risk")]
#[command(about = "Student stress-risk classifier")]
#[command(version)]
struct Cli {
    /// Survey file (semicolon-delimited)
    #[arg(long, global = true, env = "STRESS_DATASET")]
    dataset: Option<PathBuf>,

    /// Directory holding the model artifacts
    #[arg(long, global = true, env = "STRESS_MODEL_DIR")]
    model_dir: Option<PathBuf>,

    /// Print machine-readable JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Train from the dataset and write the model artifacts
    Train,

    /// Predict stress risk for one to five students
    Predict(PredictArgs),

    /// Show held-out performance and the most important features
    Report,

    /// Show dataset counts and numeric column statistics
    Summary {
        /// Only describe rows with this label
        #[arg(long)]
        label: Option<String>,
    },
}

#[derive(Args)]
struct PredictArgs {
    /// JSON file with one profile or an array of profiles
    #[arg(long, short)]
    file: Option<PathBuf>,

    #[arg(long, default_value = "Mahasiswa")]
    name: String,
    #[arg(long, required_unless_present = "file")]
    gender: Option<String>,
    #[arg(long, required_unless_present = "file")]
    age: Option<f64>,
    #[arg(long, required_unless_present = "file")]
    department: Option<String>,
    /// Study hours per day
    #[arg(long, required_unless_present = "file")]
    study_hours: Option<f64>,
    /// Sleep hours per day
    #[arg(long, required_unless_present = "file")]
    sleep_hours: Option<f64>,
    #[arg(long, required_unless_present = "file")]
    gpa: Option<f64>,
    /// Major assignments per week
    #[arg(long, required_unless_present = "file")]
    assignments: Option<f64>,
    /// Jarang, Kadang or Sering
    #[arg(long, required_unless_present = "file")]
    exercise: Option<String>,
    /// Rendah, Sedang or Tinggi
    #[arg(long, required_unless_present = "file")]
    income: Option<String>,
    /// Jomblo or Dalam hubungan
    #[arg(long, required_unless_present = "file")]
    relationship: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ProfileFile {
    Many(Vec<StudentProfile>),
    One(StudentProfile),
}

impl PredictArgs {
    fn profiles(self) -> Result<Vec<StudentProfile>, Box<dyn std::error::Error>> {
        if let Some(path) = self.file {
            let text = std::fs::read_to_string(&path)?;
            return Ok(match serde_json::from_str(&text)? {
                ProfileFile::Many(profiles) => profiles,
                ProfileFile::One(profile) => vec![profile],
            });
        }

        fn required<T>(value: Option<T>, flag: &str) -> Result<T, String> {
            value.ok_or_else(|| format!("--{flag} is required without --file"))
        }
        Ok(vec![StudentProfile {
            name: self.name,
            gender: required(self.gender, "gender")?,
            age: required(self.age, "age")?,
            department: required(self.department, "department")?,
            study_hours: required(self.study_hours, "study-hours")?,
            sleep_hours: required(self.sleep_hours, "sleep-hours")?,
            gpa: required(self.gpa, "gpa")?,
            assignments: required(self.assignments, "assignments")?,
            exercise: required(self.exercise, "exercise")?,
            income: required(self.income, "income")?,
            relationship: required(self.relationship, "relationship")?,
        }])
    }
}

fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("stress_risk=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> CliResult {
    let mut config = AppConfig::from_env()?;
    if let Some(dataset) = cli.dataset {
        config = config.with_dataset_path(dataset);
    }
    if let Some(dir) = cli.model_dir {
        config = config.with_model_dir(dir);
    }
    let service = StressService::new(config);
    let json = cli.json;

    match cli.command {
        Commands::Train => cmd_train(&service, json),
        Commands::Predict(args) => cmd_predict(&service, args, json),
        Commands::Report => cmd_report(&service, json),
        Commands::Summary { label } => cmd_summary(&service, label.as_deref(), json),
    }
}

fn print_json<T: Serialize>(value: &T) -> CliResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn cmd_train(service: &StressService, json: bool) -> CliResult {
    let model = service.retrain()?;
    let evaluation = &model.evaluation;
    if json {
        return print_json(evaluation);
    }

    println!("Training Stress-Risk Model");
    println!("==========================");
    println!("Dataset:      {}", service.config().dataset_path.display());
    println!("Artifacts:    {}", service.store().dir().display());
    println!("Test rows:    {}", evaluation.test_size);
    println!("Accuracy:     {:.2}%", evaluation.accuracy * 100.0);
    println!("F1 (weighted): {:.2}%", evaluation.weighted_f1 * 100.0);
    Ok(())
}

fn cmd_predict(service: &StressService, args: PredictArgs, json: bool) -> CliResult {
    let profiles = args.profiles()?;
    let assessments = service.predict_batch(&profiles)?;
    if json {
        return print_json(&assessments);
    }
    for assessment in &assessments {
        print_assessment(assessment);
    }
    Ok(())
}

fn print_assessment(assessment: &Assessment) {
    let p = &assessment.prediction;
    println!("{}: {}", assessment.name, p.label);
    println!(
        "  Risiko Stres {:>6.2}%   Sehat {:>6.2}%",
        p.probability_stress * 100.0,
        p.probability_healthy * 100.0
    );
    for advice in &assessment.advice {
        println!("  - {}", advice.message);
    }
    println!();
}

fn cmd_report(service: &StressService, json: bool) -> CliResult {
    let report = service.report()?;
    if json {
        return print_json(&report);
    }
    print_report(&report);
    Ok(())
}

fn print_report(report: &PerformanceReport) {
    let evaluation = &report.evaluation;
    println!("Model Performance");
    println!("=================");
    println!("Accuracy:      {:.2}%", evaluation.accuracy * 100.0);
    println!("F1 (weighted): {:.2}%", evaluation.weighted_f1 * 100.0);
    println!("Test rows:     {}", evaluation.test_size);
    println!();

    println!("Confusion matrix (rows = actual, columns = predicted)");
    let width = evaluation.classes.iter().map(String::len).max().unwrap_or(0);
    print!("{:width$}", "");
    for class in &evaluation.classes {
        print!("  {class:>width$}");
    }
    println!();
    for (i, class) in evaluation.classes.iter().enumerate() {
        print!("{class:width$}");
        for &count in evaluation.confusion_matrix.row(i) {
            print!("  {count:>width$}");
        }
        println!();
    }
    println!();

    println!("{:<width$}  precision  recall  f1     support", "");
    for m in &evaluation.per_class {
        println!(
            "{:<width$}  {:>9.3}  {:>6.3}  {:>5.3}  {:>7}",
            m.label, m.precision, m.recall, m.f1, m.support
        );
    }
    println!();

    println!("Top features");
    for (rank, feature) in report.top_features.iter().enumerate() {
        println!("  {:>2}. {:<40} {:.4}", rank + 1, feature.name, feature.importance);
    }
}

#[derive(Serialize)]
struct SummaryOutput {
    summary: DatasetSummary,
    columns: Vec<ColumnStats>,
}

fn cmd_summary(service: &StressService, label: Option<&str>, json: bool) -> CliResult {
    let output = SummaryOutput {
        summary: service.summary()?,
        columns: service.describe(label)?,
    };
    if json {
        return print_json(&output);
    }

    let summary = &output.summary;
    println!("Dataset Summary");
    println!("===============");
    println!("Rows:         {}", summary.n_rows);
    println!("Sehat:        {}", summary.healthy());
    println!("Risiko Stres: {}", summary.at_risk());
    for (gender, count) in &summary.gender_counts {
        println!("{:<13} {count}", format!("{gender}:"));
    }
    println!();

    if let Some(label) = label {
        println!("Numeric columns (label = {label})");
    } else {
        println!("Numeric columns");
    }
    println!(
        "{:<32} {:>5} {:>8} {:>8} {:>8} {:>8} {:>8}",
        "", "count", "mean", "std", "min", "median", "max"
    );
    for c in &output.columns {
        println!(
            "{:<32} {:>5} {:>8.2} {:>8.2} {:>8.2} {:>8.2} {:>8.2}",
            c.feature.header(),
            c.count,
            c.mean,
            c.std,
            c.min,
            c.median,
            c.max
        );
    }
    Ok(())
}
