use anyhow::Context;
use clap::{Parser, Subcommand};
use inquire::{Password, PasswordDisplayMode};
use weather_core::{Config, LocationQuery, config::API_KEY_ENV};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather-server", version, about = "Weather and air-quality aggregation endpoint")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the HTTP endpoint.
    Serve {
        /// Address to bind; overrides the config file and WEATHER_HOST.
        #[arg(long)]
        host: Option<String>,

        /// Port to bind; overrides the config file and WEATHER_PORT.
        #[arg(long)]
        port: Option<u16>,
    },

    /// Look up one location and print the normalized JSON document.
    Show {
        /// City name, e.g. "London" or "Paris,FR".
        city: Option<String>,

        #[arg(long, allow_hyphen_values = true, requires = "lon")]
        lat: Option<String>,

        #[arg(long, allow_hyphen_values = true, requires = "lat")]
        lon: Option<String>,

        /// "metric" (default) or "imperial".
        #[arg(long)]
        units: Option<String>,
    },

    /// Store the OpenWeather API key in the config file.
    Configure,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Serve { host, port } => {
                let mut config = Config::load()?;
                if let Some(host) = host {
                    config.server.host = host;
                }
                if let Some(port) = port {
                    config.server.port = port;
                }
                weather_server::serve(config).await
            }
            Command::Show { city, lat, lon, units } => {
                let query = LocationQuery::from_params(
                    city.as_deref(),
                    lat.as_deref(),
                    lon.as_deref(),
                    units.as_deref(),
                )?;

                let service = Config::load()?.weather_service()?.with_context(|| {
                    format!(
                        "No OpenWeather API key configured.\n\
                         Hint: run `weather-server configure` or set {API_KEY_ENV}."
                    )
                })?;

                let report = service.lookup(&query).await?;
                println!("{}", serde_json::to_string_pretty(&report)?);
                Ok(())
            }
            Command::Configure => {
                // File values only, so environment overrides are not persisted.
                let path = Config::config_file_path()?;
                let mut config = Config::load_from(&path)?;

                let api_key = Password::new("OpenWeather API key:")
                    .with_display_mode(PasswordDisplayMode::Masked)
                    .without_confirmation()
                    .prompt()
                    .context("Failed to read API key")?;

                config.set_api_key(api_key);
                config.save_to(&path)?;

                println!("Saved API key to {}", path.display());
                Ok(())
            }
        }
    }
}
