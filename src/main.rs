//! `finetune` - drive a hosted fine-tuning workflow from the command line.
//!
//! Credentials come from the environment: `OPENAI_API_KEY`, or
//! `AZURE_OPENAI_ENDPOINT` + `AZURE_OPENAI_API_KEY` for Azure. The `deploy`
//! command additionally reads the `AZURE_MANAGEMENT_*` settings.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use integrations_finetune::client::{
    FinetuneClient, FinetuneClientBuilder, FinetuneConfig, ManagementConfig,
};
use integrations_finetune::observability::{LogFormat, LogLevel, LoggingConfig};
use integrations_finetune::pipeline::{
    self, cases_from_records, fetch_result_metrics, read_jsonl, read_source_rows,
    render_accuracy_chart, render_loss_chart, smooth_metrics, split_rows, submit_job,
    write_jsonl_file, DatasetConverter, EvalCase, EvaluationHarness, ImageMode, JobPoller,
    JobSubmission,
};
use integrations_finetune::services::deployments::{
    DeploymentRequest, DeploymentService, DeploymentServiceImpl,
};
use integrations_finetune::services::files::{FilePurpose, FileUploadRequest};
use integrations_finetune::services::fine_tuning::{HyperparameterValue, Hyperparameters};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use url::Url;

#[derive(Parser, Debug)]
#[command(
    name = "finetune",
    author,
    version,
    about = "Convert datasets, run fine-tuning jobs, plot metrics and evaluate models"
)]
struct Args {
    #[arg(long, value_enum, default_value = "info", global = true, env = "FINETUNE_LOG_LEVEL")]
    log_level: LogLevel,

    #[arg(long, value_enum, default_value = "pretty", global = true)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Convert an image/question/answer table into chat JSONL splits
    Convert {
        /// Source rows (.csv or .jsonl)
        input: PathBuf,

        /// Directory receiving train.jsonl, validation.jsonl and test.jsonl
        #[arg(short, long, default_value = ".")]
        output_dir: PathBuf,

        #[arg(long, default_value = "You are a helpful assistant that answers questions about images.")]
        system_prompt: String,

        /// Directory that relative image paths are resolved against
        #[arg(long)]
        image_root: Option<PathBuf>,

        /// Reference images under this URL instead of embedding them
        #[arg(long)]
        image_base_url: Option<Url>,

        #[arg(long, default_value_t = 0.8)]
        train: f64,

        #[arg(long, default_value_t = 0.1)]
        validation: f64,
    },

    /// Upload a file to the remote store
    Upload {
        path: PathBuf,

        /// fine-tune or vision
        #[arg(long, default_value = "fine-tune")]
        purpose: String,
    },

    /// Upload training files and start a fine-tuning job
    Submit {
        #[arg(long)]
        model: String,

        #[arg(long)]
        training_file: PathBuf,

        #[arg(long)]
        validation_file: Option<PathBuf>,

        #[arg(long)]
        suffix: Option<String>,

        /// Number of epochs, or "auto"
        #[arg(long)]
        epochs: Option<String>,

        /// Batch size, or "auto"
        #[arg(long)]
        batch_size: Option<String>,

        /// Learning rate multiplier, or "auto"
        #[arg(long)]
        learning_rate_multiplier: Option<String>,

        #[arg(long)]
        seed: Option<i64>,

        /// Poll until the job finishes
        #[arg(long)]
        wait: bool,

        #[arg(long, default_value_t = 30)]
        poll_interval_secs: u64,
    },

    /// Show a job snapshot
    Status { job_id: String },

    /// Poll a job until it succeeds, fails or is cancelled
    Wait {
        job_id: String,

        #[arg(long, default_value_t = 30)]
        interval_secs: u64,

        #[arg(long)]
        timeout_secs: Option<u64>,
    },

    /// List fine-tuning jobs
    Jobs {
        #[arg(long)]
        limit: Option<u32>,

        #[arg(long)]
        after: Option<String>,
    },

    /// List a job's events
    Events {
        job_id: String,

        #[arg(long)]
        limit: Option<u32>,
    },

    /// Cancel a running job
    Cancel { job_id: String },

    /// List available models
    Models {
        #[arg(long)]
        fine_tuned_only: bool,
    },

    /// Smooth a job's step metrics and render loss and accuracy charts
    Metrics {
        /// Download the result file of this job
        #[arg(long, conflicts_with = "file", required_unless_present = "file")]
        job: Option<String>,

        /// Read a local metrics CSV instead
        #[arg(long)]
        file: Option<PathBuf>,

        #[arg(long, default_value_t = 10)]
        window: usize,

        #[arg(short, long, default_value = ".")]
        output_dir: PathBuf,
    },

    /// Create or update a deployment serving a fine-tuned model
    Deploy {
        #[arg(long)]
        name: String,

        #[arg(long)]
        model: String,

        #[arg(long, default_value_t = 1)]
        capacity: u32,

        #[arg(long, default_value = "standard")]
        sku: String,
    },

    /// Answer held-out records with a model and grade them with a judge model
    Evaluate {
        /// Chat JSONL, e.g. the test split written by `convert`
        input: PathBuf,

        #[arg(long)]
        model: String,

        #[arg(long)]
        judge_model: String,

        #[arg(long)]
        system_prompt: Option<String>,

        /// Evaluate at most this many records
        #[arg(long)]
        limit: Option<usize>,

        /// Write per-record results as CSV
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

fn client() -> Result<Arc<dyn FinetuneClient>> {
    let config = FinetuneConfig::from_env().context("loading API configuration")?;
    Ok(FinetuneClientBuilder::new().with_config(config).build()?)
}

fn hyperparameter(raw: Option<String>, name: &str) -> Result<Option<HyperparameterValue>> {
    let Some(raw) = raw else {
        return Ok(None);
    };
    if raw.eq_ignore_ascii_case("auto") {
        return Ok(Some(HyperparameterValue::auto()));
    }
    let value: f64 = raw
        .parse()
        .with_context(|| format!("--{} must be a number or \"auto\", got {}", name, raw))?;
    Ok(Some(HyperparameterValue::Number(value)))
}

fn purpose(raw: &str) -> Result<FilePurpose> {
    match raw {
        "fine-tune" => Ok(FilePurpose::FineTune),
        "vision" => Ok(FilePurpose::Vision),
        other => bail!("unsupported purpose {}", other),
    }
}

fn write_split(dir: &Path, name: &str, records: &[pipeline::TrainingRecord]) -> Result<()> {
    if records.is_empty() {
        return Ok(());
    }
    let path = dir.join(name);
    let written = write_jsonl_file(&path, records)?;
    println!("{:>6} records -> {}", written, path.display());
    Ok(())
}

fn print_job(job: &integrations_finetune::FineTuningJob) {
    println!("{}  {}  {}", job.id, job.status, job.model);
    if let Some(model) = &job.fine_tuned_model {
        println!("  fine-tuned model: {}", model);
    }
    if let Some(error) = &job.error {
        println!("  error: {}", error.message);
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    LoggingConfig::new()
        .with_level(args.log_level)
        .with_format(args.log_format)
        .init()?;

    match args.command {
        Command::Convert {
            input,
            output_dir,
            system_prompt,
            image_root,
            image_base_url,
            train,
            validation,
        } => {
            let table = read_source_rows(&input)
                .with_context(|| format!("reading {}", input.display()))?;
            for skipped in &table.skipped {
                println!("  unreadable row {}: {}", skipped.row, skipped.reason);
            }
            let split = split_rows(&table.rows, train, validation)?;

            let mut converter = DatasetConverter::new(system_prompt);
            if let Some(root) = image_root {
                converter = converter.with_image_root(root);
            }
            if let Some(base) = image_base_url {
                converter = converter.with_image_mode(ImageMode::Url(base));
            }

            std::fs::create_dir_all(&output_dir)?;
            for (name, part) in [
                ("train.jsonl", &split.train),
                ("validation.jsonl", &split.validation),
                ("test.jsonl", &split.test),
            ] {
                let report = converter.convert_rows(part)?;
                write_split(&output_dir, name, &report.records)?;
                for skipped in &report.skipped {
                    println!("  skipped: {}", skipped.reason);
                }
            }
        }

        Command::Upload { path, purpose: raw } => {
            let client = client()?;
            let request = FileUploadRequest::from_path(&path, purpose(&raw)?)?;
            let file = client.files().upload(request).await?;
            println!("{}  {}  {} bytes", file.id, file.filename, file.bytes);
        }

        Command::Submit {
            model,
            training_file,
            validation_file,
            suffix,
            epochs,
            batch_size,
            learning_rate_multiplier,
            seed,
            wait,
            poll_interval_secs,
        } => {
            let client = client()?;
            let hyperparameters = Hyperparameters {
                n_epochs: hyperparameter(epochs, "epochs")?,
                batch_size: hyperparameter(batch_size, "batch-size")?,
                learning_rate_multiplier: hyperparameter(
                    learning_rate_multiplier,
                    "learning-rate-multiplier",
                )?,
            };

            let mut submission =
                JobSubmission::new(model, training_file).with_hyperparameters(hyperparameters);
            if let Some(path) = validation_file {
                submission = submission.with_validation_file(path);
            }
            if let Some(suffix) = suffix {
                submission = submission.with_suffix(suffix);
            }
            if let Some(seed) = seed {
                submission = submission.with_seed(seed);
            }

            let job = submit_job(client.files(), client.fine_tuning(), submission).await?;
            print_job(&job);

            if wait {
                let job = JobPoller::new(Duration::from_secs(poll_interval_secs))
                    .wait(client.fine_tuning(), &job.id)
                    .await?;
                print_job(&job);
            }
        }

        Command::Status { job_id } => {
            let job = client()?.fine_tuning().retrieve(&job_id).await?;
            print_job(&job);
        }

        Command::Wait {
            job_id,
            interval_secs,
            timeout_secs,
        } => {
            let client = client()?;
            let mut poller = JobPoller::new(Duration::from_secs(interval_secs));
            if let Some(timeout) = timeout_secs {
                poller = poller.with_timeout(Duration::from_secs(timeout));
            }
            let job = poller.wait(client.fine_tuning(), &job_id).await?;
            print_job(&job);
        }

        Command::Jobs { limit, after } => {
            let jobs = client()?.fine_tuning().list(limit, after).await?;
            for job in &jobs.data {
                print_job(job);
            }
            if let (true, Some(last)) = (jobs.has_more, jobs.data.last()) {
                println!("(more available; pass --after {})", last.id);
            }
        }

        Command::Events { job_id, limit } => {
            let events = client()?.fine_tuning().events(&job_id, limit, None).await?;
            for event in &events.data {
                println!("{}  {:<5}  {}", event.created_at, event.level, event.message);
            }
        }

        Command::Cancel { job_id } => {
            let job = client()?.fine_tuning().cancel(&job_id).await?;
            print_job(&job);
        }

        Command::Models { fine_tuned_only } => {
            let models = client()?.models().list().await?;
            for model in models.data.iter().filter(|m| !fine_tuned_only || m.is_fine_tuned()) {
                println!("{}  {}", model.id, model.owned_by);
            }
        }

        Command::Metrics {
            job,
            file,
            window,
            output_dir,
        } => {
            let rows = match (job, file) {
                (Some(job_id), _) => {
                    let client = client()?;
                    let job = client.fine_tuning().retrieve(&job_id).await?;
                    let content = fetch_result_metrics(client.files(), &job).await?;
                    pipeline::parse_metrics_csv(&content[..])?
                }
                (None, Some(path)) => pipeline::read_metrics_file(&path)
                    .with_context(|| format!("reading {}", path.display()))?,
                (None, None) => bail!("either --job or --file is required"),
            };

            let series = smooth_metrics(&rows, window)?;
            std::fs::create_dir_all(&output_dir)?;
            for (name, svg) in [
                ("loss.svg", render_loss_chart(&series)?),
                ("accuracy.svg", render_accuracy_chart(&series)?),
            ] {
                let path = output_dir.join(name);
                std::fs::write(&path, svg)?;
                println!("chart -> {}", path.display());
            }
            for s in &series {
                match s.last_smoothed() {
                    Some(value) => println!("{:<20} {:.4}", s.metric.name(), value),
                    None => println!("{:<20} n/a", s.metric.name()),
                }
            }
        }

        Command::Deploy {
            name,
            model,
            capacity,
            sku,
        } => {
            let config = ManagementConfig::from_env().context("loading management configuration")?;
            let service = DeploymentServiceImpl::from_config(&config)?;
            let request = DeploymentRequest::for_model(model)
                .with_sku(sku)
                .with_capacity(capacity);
            let deployment = service.create_or_update(&name, request).await?;
            match deployment.provisioning_state() {
                Some(state) => println!("{}  {:?}", deployment.name, state),
                None => println!("{}", deployment.name),
            }
        }

        Command::Evaluate {
            input,
            model,
            judge_model,
            system_prompt,
            limit,
            output,
        } => {
            let records = read_jsonl(&input).with_context(|| format!("reading {}", input.display()))?;
            let set = cases_from_records(&records);
            for skipped in &set.skipped {
                println!("  skipped record {}: {}", skipped.row, skipped.reason);
            }
            let cases: Vec<EvalCase> = set
                .cases
                .into_iter()
                .take(limit.unwrap_or(usize::MAX))
                .collect();

            let client = client()?;
            let mut harness = EvaluationHarness::new(client.chat(), model, judge_model);
            if let Some(prompt) = system_prompt {
                harness = harness.with_system_prompt(prompt);
            }
            let report = harness.evaluate(&cases).await?;

            if let Some(path) = output {
                report.write_csv(std::fs::File::create(&path)?)?;
                println!("results -> {}", path.display());
            }
            println!("accuracy: {}", report.tally);
        }
    }

    Ok(())
}
