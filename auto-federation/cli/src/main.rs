use std::fs;
use std::io;
use std::path::Path;
use std::path::PathBuf;

use anyhow::Context;
use auto_federation::FederatedService;
use auto_federation::FederationOptions;
use auto_federation::Resolvers;
use clap::Parser;
use serde_json::json;
use serde_json::Value;
use tracing_subscriber::EnvFilter;

/// CLI arguments. See <https://docs.rs/clap/latest/clap/_derive/index.html>
#[derive(Parser)]
#[command(name = "auto-federate", version)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Federates a schema file
    Sdl {
        /// The path to the schema file, or `-` for stdin
        schema: PathBuf,
        #[command(flatten)]
        output: Output,
    },
    /// Federates a running GraphQL service, read through introspection
    Service {
        /// The GraphQL endpoint of the service
        #[arg(long)]
        url: String,
        #[command(flatten)]
        output: Output,
    },
}

#[derive(clap::Args)]
struct Output {
    /// Federation options, as a YAML or JSON file. Auto synthesis is enabled when omitted
    #[arg(long)]
    options: Option<PathBuf>,
    /// Print the effective options as JSON instead of the federated schema
    #[arg(long)]
    print_options: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    match args.command {
        Command::Sdl { schema, output } => {
            let sdl = read_input(&schema)?;
            tracing::debug!(schema = %schema.display(), "federating schema file");
            let options = load_options(output.options.as_deref())?;
            let federated = auto_federation::build_federated_info(
                sdl,
                Resolvers::new(),
                &options.unwrap_or_else(FederationOptions::auto),
            )?;
            print(&federated, output.print_options)
        }
        Command::Service { url, output } => {
            let options = load_options(output.options.as_deref())?;
            tracing::debug!(%url, "federating service");
            let federated = auto_federation::build_federated_service(&url, options).await?;
            print(&federated, output.print_options)
        }
    }
}

fn read_input(input_path: &Path) -> anyhow::Result<String> {
    if input_path == Path::new("-") {
        io::read_to_string(io::stdin()).context("reading the schema from stdin")
    } else {
        fs::read_to_string(input_path)
            .with_context(|| format!("reading the schema from {}", input_path.display()))
    }
}

fn load_options(path: Option<&Path>) -> anyhow::Result<Option<FederationOptions>> {
    let Some(path) = path else {
        return Ok(None);
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading options from {}", path.display()))?;
    parse_options(&text)
        .with_context(|| format!("invalid options in {}", path.display()))
        .map(Some)
}

/// YAML is a superset of JSON, so both formats go through the YAML parser.
fn parse_options(text: &str) -> anyhow::Result<FederationOptions> {
    let value: Value = serde_yaml::from_str(text)?;
    Ok(FederationOptions::from_json(&value)?)
}

fn print(federated: &FederatedService, print_options: bool) -> anyhow::Result<()> {
    if print_options {
        let options = json!({
            "auto": federated.options.auto,
            "type": federated.options.types,
        });
        println!("{}", serde_json::to_string_pretty(&options)?);
    } else {
        println!("{}", federated.schema);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn parses_yaml_options() {
        let options = parse_options(
            r#"
auto: true
type:
  User:
    "@directives": '@key(fields: "id")'
    name:
      "@directives": "@external"
"#,
        )
        .unwrap();
        assert!(options.auto);
        assert_eq!(
            options.types["User"],
            auto_federation::TypeOptions::with_directives(r#"@key(fields: "id")"#)
                .field("name", "@external")
        );
    }

    #[test]
    fn parses_json_options() {
        let options = parse_options(r#"{ "type": { "Query": { "@extend": true } } }"#).unwrap();
        assert!(!options.auto);
        assert_eq!(options.types["Query"].extend, Some(true));
    }

    #[test]
    fn reports_invalid_options() {
        let error = parse_options("auto: \"\"").unwrap_err();
        assert_eq!(error.to_string(), "options auto must be a boolean");
    }
}
