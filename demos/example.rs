use clap::{Args, Parser};
use flagchain::{cli, Discovery, Tagged, TaggedField, ToTagged};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser, Serialize)]
struct AppConfig {
    #[command(flatten)]
    server: ServerConfig,

    /// Print the resolved configuration as YAML and exit
    #[arg(long)]
    #[serde(skip)]
    dump: bool,
}

#[derive(Debug, Args, Serialize)]
struct ServerConfig {
    #[arg(long = "server.host")]
    host: String,

    #[arg(long = "server.port")]
    port: u16,
}

struct Defaults;

impl ToTagged for Defaults {
    fn to_tagged(&self) -> Tagged {
        Tagged::record([TaggedField::record(
            "Server",
            [
                TaggedField::leaf("Host", "127.0.0.1").serde("host"),
                TaggedField::leaf("Port", 8080).serde("port,omitempty"),
            ],
        )
        .flag("server")])
    }
}

fn main() -> Result<(), flagchain::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // ./example.config.yaml, /opt/example/etc/example.config.yaml, /etc/example.config.yaml
    let chain = Discovery::new("example").with_defaults(&Defaults).build()?;
    let config: AppConfig = cli::parse(chain);

    if config.dump {
        print!("{}", cli::dump(&config)?);
        return Ok(());
    }

    println!("Listening on {}:{}", config.server.host, config.server.port);
    Ok(())
}
