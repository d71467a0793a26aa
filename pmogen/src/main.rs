use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use pmoconfig::Config;
use pmogen::{
    DeviceRequest, GenerationSettings, Language, ServiceRequest, SoapClient, generate_device,
    generate_service, logging::init_logging,
};
use tracing::info;

#[derive(Parser)]
#[command(name = "pmogen")]
#[command(about = "Generates typed UPnP control point classes from description documents")]
#[command(version)]
struct Cli {
    /// Configuration directory (default: $PMOGEN_CONFIG, ./.pmogen or ~/.pmogen)
    #[arg(long, global = true)]
    config_dir: Option<String>,

    /// Log filter when RUST_LOG is not set (default: log.min_level)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug)]
struct GeneratorArgs {
    /// Target language (default: generator.language)
    #[arg(long, value_enum)]
    language: Option<Language>,

    /// Namespace of the generated classes (default: generator.namespace)
    #[arg(long)]
    namespace: Option<String>,

    /// Output directory (default: generator.output_dir)
    #[arg(long)]
    out: Option<PathBuf>,

    /// Generate partial classes
    #[arg(long)]
    partial: bool,

    /// Query each state variable of the live service before emitting its property
    #[arg(long)]
    test_state_vars: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Generate the class of one service from its SCPD document
    Service {
        /// SCPD file path or URL
        source: String,

        /// Class name (default: derived from the service type or the file name)
        #[arg(long)]
        class_name: Option<String>,

        /// Service type URN, e.g. urn:schemas-upnp-org:service:RenderingControl:1
        #[arg(long)]
        service_type: Option<String>,

        /// Control URL of the live service, used by --test-state-vars
        #[arg(long)]
        control_url: Option<String>,

        #[command(flatten)]
        generator: GeneratorArgs,
    },

    /// Generate the classes of a device and its embedded devices
    Device {
        /// Device description file path or URL
        source: String,

        /// Also generate the class of every service of the tree
        #[arg(long)]
        with_services: bool,

        #[command(flatten)]
        generator: GeneratorArgs,
    },

    /// Invoke an action on a live service and print its output arguments
    Invoke {
        /// Control URL of the service
        control_url: String,

        /// Service type URN
        service_type: String,

        /// Action name
        action: String,

        /// Input arguments, in declaration order
        #[arg(value_parser = parse_key_val)]
        args: Vec<(String, String)>,
    },

    /// Show the configuration, optionally updating some values first
    Config {
        /// Value to set, e.g. generator.language=vb (repeatable)
        #[arg(long, value_parser = parse_key_val)]
        set: Vec<(String, String)>,
    },
}

fn parse_key_val(s: &str) -> Result<(String, String), String> {
    s.split_once('=')
        .map(|(k, v)| (k.trim().to_string(), v.to_string()))
        .filter(|(k, _)| !k.is_empty())
        .ok_or_else(|| format!("expected NAME=VALUE, got {s}"))
}

fn settings(config: &Config, args: &GeneratorArgs) -> Result<GenerationSettings> {
    let language = match args.language {
        Some(language) => language,
        None => config.get_language()?.parse()?,
    };

    Ok(GenerationSettings {
        language,
        namespace: match &args.namespace {
            Some(namespace) => namespace.clone(),
            None => config.get_namespace()?,
        },
        partial: args.partial || config.get_partial_classes()?,
        output_dir: match &args.out {
            Some(out) => out.clone(),
            None => config.get_output_dir()?,
        },
        test_state_vars: args.test_state_vars || config.get_test_state_vars()?,
        timeout_secs: config.get_timeout_secs()?,
    })
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load_config(cli.config_dir.as_deref().unwrap_or(""))
        .context("Cannot load configuration")?;

    let level = match &cli.log_level {
        Some(level) => level.clone(),
        None => config.get_log_min_level()?,
    };
    init_logging(&level)?;

    match cli.command {
        Command::Service {
            source,
            class_name,
            service_type,
            control_url,
            generator,
        } => {
            let settings = settings(&config, &generator)?;
            let request = ServiceRequest {
                source,
                class_name,
                service_type,
                control_url,
            };
            let path = generate_service(&settings, &request)?;
            println!("{}", path.display());
        }
        Command::Device {
            source,
            with_services,
            generator,
        } => {
            let settings = settings(&config, &generator)?;
            let request = DeviceRequest {
                source,
                with_services,
            };
            for path in generate_device(&settings, &request)? {
                println!("{}", path.display());
            }
        }
        Command::Invoke {
            control_url,
            service_type,
            action,
            args,
        } => {
            let client = SoapClient::new(&control_url, &service_type, config.get_timeout_secs()?);
            let values = client
                .invoke(&action, &args)
                .with_context(|| format!("Action {action} failed"))?;
            info!(action = %action, outputs = values.len(), "Action invoked");
            for (name, value) in values {
                println!("{name} = {value}");
            }
        }
        Command::Config { set } => {
            for (path, value) in &set {
                config
                    .set_from_str(path, value)
                    .with_context(|| format!("Cannot set {path}"))?;
            }
            println!("# {}", config.path().display());
            print!("{}", config.to_yaml()?);
        }
    }

    Ok(())
}
