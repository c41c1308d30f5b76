use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use model_postprocess_core::config::SERIALIZATION_LIBRARY_KEY;
use model_postprocess_core::{
    check_registry, post_process, AdditionalProperties, FeatureSet, GeneratorSettings,
    ImportPolicy, PostProcessOptions, Registry,
};
use serde::de::DeserializeOwned;
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::level_filters::LevelFilter;

#[derive(Parser)]
#[command(name = "model-postprocess")]
#[command(about = "Post-process generated client models: filter imports, resolve inheritance and discriminators")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging (sets log level to debug)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the post-processing passes over a model registry
    Process {
        /// Input model registry file
        input: PathBuf,

        /// Output registry file (defaults to stdout if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output report (changes and diagnostics) file
        #[arg(long)]
        report: Option<PathBuf>,

        /// Generator additional properties (JSON object) to resolve options from
        #[arg(long)]
        properties: Option<PathBuf>,

        /// Write the additional properties, with template flags applied, to this file
        #[arg(long)]
        properties_out: Option<PathBuf>,

        /// Serialization library (overrides the one in --properties)
        #[arg(long)]
        serialization_library: Option<String>,

        /// How same-unit imports are detected
        #[arg(long, value_enum, default_value_t = ImportPolicyArg::SameUnit)]
        import_policy: ImportPolicyArg,

        /// Path prefix of this generator's model files (e.g. package:petstore/model/).
        /// File-style imports are only treated as same-unit under this prefix
        #[arg(long)]
        model_import_prefix: Option<String>,

        /// Fail on dangling discriminators, multi-base composition and disabled features
        #[arg(long)]
        strict: bool,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Pretty)]
        format: OutputFormat,
    },

    /// Report registry inconsistencies without modifying anything
    Check {
        /// Input model registry file
        input: PathBuf,
    },
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
enum ImportPolicyArg {
    SameUnit,
    FilterAll,
}

impl From<ImportPolicyArg> for ImportPolicy {
    fn from(val: ImportPolicyArg) -> Self {
        match val {
            ImportPolicyArg::SameUnit => ImportPolicy::SameUnit,
            ImportPolicyArg::FilterAll => ImportPolicy::FilterAll,
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
enum OutputFormat {
    Pretty,
    Compact,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so stdout stays clean for JSON
    let log_level = if cli.verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Process {
            input,
            output,
            report: report_path,
            properties,
            properties_out,
            serialization_library,
            import_policy,
            model_import_prefix,
            strict,
            format,
        } => {
            let mut registry: Registry = read_json(&input, "registry")?;

            let mut additional_properties: AdditionalProperties = match &properties {
                Some(path) => read_json(path, "additional properties")?,
                None => AdditionalProperties::new(),
            };
            if let Some(library) = serialization_library {
                additional_properties.insert(
                    SERIALIZATION_LIBRARY_KEY.to_string(),
                    serde_json::Value::String(library),
                );
            }

            let settings = GeneratorSettings::from_additional_properties(additional_properties)
                .map_err(|e| anyhow::Error::from(e).context("Invalid generator options"))?;

            // All fields set explicitly; clippy enforces exhaustiveness
            let options = PostProcessOptions {
                serialization_library: settings.options.serialization_library,
                import_policy: import_policy.into(),
                model_import_prefix,
                features: settings.options.features,
                strict,
            };

            let report = post_process(&mut registry, &options)
                .map_err(|e| anyhow::Error::from(e).context("Post-processing failed"))?;

            for diagnostic in &report.diagnostics {
                eprintln!("Warning: {}", serde_json::to_string(diagnostic)?);
            }

            write_json(&registry, output.as_ref(), format)?;

            if let Some(path) = report_path {
                write_json(&report, Some(&path), format)?;
            }
            if let Some(path) = properties_out {
                write_json(&settings.additional_properties, Some(&path), format)?;
            }
        }
        Commands::Check { input } => {
            let registry: Registry = read_json(&input, "registry")?;
            let issues = check_registry(&registry, &FeatureSet::client_defaults());

            for issue in &issues {
                eprintln!("{issue}");
            }
            if !issues.is_empty() {
                bail!("{} inconsistencies found", issues.len());
            }
            eprintln!("No inconsistencies found");
        }
    }

    Ok(())
}

fn read_json<T: DeserializeOwned>(path: &Path, what: &str) -> Result<T> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open input file: {}", path.display()))?;
    let reader = BufReader::new(file);
    serde_json::from_reader(reader)
        .with_context(|| format!("Failed to parse {what} from: {}", path.display()))
}

fn write_json<T: serde::Serialize>(
    val: &T,
    path: Option<&PathBuf>,
    format: OutputFormat,
) -> Result<()> {
    let mut writer: Box<dyn Write> = if let Some(p) = path {
        let file = File::create(p)
            .with_context(|| format!("Failed to create output file: {}", p.display()))?;
        Box::new(BufWriter::new(file))
    } else {
        Box::new(BufWriter::new(io::stdout()))
    };

    match format {
        OutputFormat::Pretty => {
            serde_json::to_writer_pretty(&mut writer, val).context("Failed to write JSON")?;
        }
        OutputFormat::Compact => {
            serde_json::to_writer(&mut writer, val).context("Failed to write JSON")?;
        }
    }

    // Ensure trailing newline
    writeln!(writer).context("Failed to write trailing newline")?;

    Ok(())
}
