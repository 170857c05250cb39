//! xcode-invocation CLI
//!
//! Entry point for the `xcode-invocation` command-line tool.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use std::process;
use tracing::debug;
use xcode_invocation::{
    logging, BuildRequest, CommandLineBuilder, InvocationRecord, RequestError,
    SourceCodeLocation,
};

#[derive(Parser)]
#[command(name = "xcode-invocation")]
#[command(about = "Resolve xcodebuild invocations from a build request", version)]
struct Cli {
    /// Enable debug logging
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the xcodebuild command line for each configuration/SDK pair
    Plan {
        /// Path to the build request (default: xcode.toml)
        #[arg(long, short = 'r', default_value = "xcode.toml")]
        request: PathBuf,

        /// Directory source paths are resolved against (default: the request's directory)
        #[arg(long)]
        base: Option<PathBuf>,

        /// Which copy of the project to build
        #[arg(long, value_enum, default_value_t = Location::WorkingCopy)]
        location: Location,

        /// Only this configuration instead of the request's list
        #[arg(long)]
        configuration: Option<String>,

        /// Only this SDK instead of the request's list
        #[arg(long)]
        sdk: Option<String>,

        /// Emit the -showBuildSettings call instead of the build call
        #[arg(long)]
        show_build_settings: bool,

        /// Output invocation records as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check that every configuration/SDK pair resolves
    Verify {
        /// Path to the build request (default: xcode.toml)
        #[arg(long, short = 'r', default_value = "xcode.toml")]
        request: PathBuf,

        /// Directory source paths are resolved against (default: the request's directory)
        #[arg(long)]
        base: Option<PathBuf>,

        /// Which copy of the project to check
        #[arg(long, value_enum, default_value_t = Location::WorkingCopy)]
        location: Location,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Location {
    Original,
    WorkingCopy,
}

impl From<Location> for SourceCodeLocation {
    fn from(location: Location) -> Self {
        match location {
            Location::Original => SourceCodeLocation::Original,
            Location::WorkingCopy => SourceCodeLocation::WorkingCopy,
        }
    }
}

struct PlanArgs {
    request: PathBuf,
    base: Option<PathBuf>,
    location: SourceCodeLocation,
    configuration: Option<String>,
    sdk: Option<String>,
    show_build_settings: bool,
    json: bool,
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = logging::init(cli.verbose) {
        eprintln!("Error initializing logging: {}", e);
    }

    let result = match cli.command {
        Commands::Plan {
            request,
            base,
            location,
            configuration,
            sdk,
            show_build_settings,
            json,
        } => run_plan(PlanArgs {
            request,
            base,
            location: location.into(),
            configuration,
            sdk,
            show_build_settings,
            json,
        }),
        Commands::Verify {
            request,
            base,
            location,
        } => run_verify(&request, base, location.into()),
    };

    if let Err(e) = result {
        eprintln!("Configuration error: {}", e);
        process::exit(1);
    }
}

fn run_plan(args: PlanArgs) -> Result<(), RequestError> {
    let request = BuildRequest::from_file(&args.request)?;
    let base = base_dir(&args.request, args.base);

    let configurations = match args.configuration {
        Some(c) => vec![c],
        None => request.configurations.clone(),
    };
    let sdks = match args.sdk {
        Some(s) => vec![s],
        None => request.sdks.clone(),
    };

    for configuration in &configurations {
        for sdk in &sdks {
            let context = request.context(&base, args.location, configuration, sdk)?;
            let builder = CommandLineBuilder::new(configuration, sdk, &context)?;
            debug!("{}", context);

            if args.json {
                let record = if args.show_build_settings {
                    InvocationRecord::from_show_build_settings_call(&builder)
                } else {
                    InvocationRecord::from_build_call(&builder)
                };
                match record.to_json() {
                    Ok(json) => println!("{}", json),
                    Err(e) => {
                        eprintln!("Error serializing output: {}", e);
                        process::exit(1);
                    }
                }
            } else if args.show_build_settings {
                println!("{}", builder.show_build_settings_call().join(" "));
            } else {
                println!("{}", builder);
            }
        }
    }

    Ok(())
}

fn run_verify(
    request_path: &Path,
    base: Option<PathBuf>,
    location: SourceCodeLocation,
) -> Result<(), RequestError> {
    let request = BuildRequest::from_file(request_path)?;
    let base = base_dir(request_path, base);

    let matrix = request.matrix();
    for (configuration, sdk) in &matrix {
        let context = request.context(&base, location, configuration, sdk)?;
        CommandLineBuilder::new(configuration, sdk, &context)?;
    }

    println!("Request valid: {}", request_path.display());
    println!();
    println!("  Project: {}", request.project);
    println!("  Location: {}", location);
    println!("  Configurations: {}", request.configurations.join(", "));
    println!("  SDKs: {}", request.sdks.join(", "));
    println!("  Build actions: {}", request.build_actions().join(" "));
    println!("  Invocations: {}", matrix.len());
    Ok(())
}

fn base_dir(request_path: &Path, base: Option<PathBuf>) -> PathBuf {
    base.unwrap_or_else(|| match request_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    })
}
