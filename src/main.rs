//! S3200 CLI entry point.
//!
//! Small operational surface: list the register catalog, poll a
//! controller, or write one value. Updates are printed as JSON lines.

use clap::{Parser, Subcommand};
use tracing::error;
use tracing_subscriber::EnvFilter;

use froeling_s3200::prelude::*;

/// Fröling S3200 / SP-Dual Modbus TCP tool
#[derive(Parser, Debug)]
#[command(name = "s3200", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List the register catalog
    ListPoints {
        /// Only show one group (controller, boiler, dhw, hk1, hk2,
        /// buffer, discharge, circulation)
        #[arg(long)]
        group: Option<String>,
    },

    /// Poll a controller and print updates as JSON lines
    Poll {
        /// Controller host
        #[arg(long)]
        host: String,

        #[arg(long, default_value_t = 502)]
        port: u16,

        /// Modbus unit id
        #[arg(long, default_value_t = 2)]
        unit_id: u8,

        /// Poll interval in seconds
        #[arg(long, default_value_t = 60)]
        interval: u64,

        /// Poll once and exit
        #[arg(long)]
        once: bool,
    },

    /// Write one value to a writable point
    Write {
        #[arg(long)]
        host: String,

        #[arg(long, default_value_t = 502)]
        port: u16,

        #[arg(long, default_value_t = 2)]
        unit_id: u8,

        /// Point id, e.g. boiler_setpoint
        point: String,

        /// Value: number, true/false, HH:MM, or an option label
        value: String,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::ListPoints { group } => list_points(group.as_deref()),
        Commands::Poll {
            host,
            port,
            unit_id,
            interval,
            once,
        } => poll(host, port, unit_id, interval, once).await,
        Commands::Write {
            host,
            port,
            unit_id,
            point,
            value,
        } => write(host, port, unit_id, &point, &value).await,
    };

    if let Err(e) = result {
        error!(error = %e, "command failed");
        std::process::exit(1);
    }
}

fn list_points(group: Option<&str>) -> Result<()> {
    let group = match group {
        Some(key) => Some(
            Group::from_key(key)
                .ok_or_else(|| Error::Config(format!("unknown group: {key}")))?,
        ),
        None => None,
    };

    for def in catalog::all() {
        if let Some(group) = group {
            if def.group != group {
                continue;
            }
        }
        let access = if def.writable { "rw" } else { "ro" };
        let unit = def.unit.unwrap_or("");
        println!(
            "{:<40} {:>5} {:<16} {:<11} {} {}",
            def.id,
            def.number,
            format!("{:?}", def.space),
            def.group.key(),
            access,
            unit
        );
    }
    Ok(())
}

fn build_channel(
    host: String,
    port: u16,
    unit_id: u8,
    interval: Option<u64>,
) -> Result<S3200Channel> {
    let mut config = ControllerConfig::new(host);
    config.session.port = port;
    config.session.unit_id = unit_id;
    if let Some(secs) = interval {
        config.poll_interval_secs = secs;
    }
    S3200Channel::new(config)
}

async fn poll(host: String, port: u16, unit_id: u8, interval: u64, once: bool) -> Result<()> {
    let channel = build_channel(host, port, unit_id, Some(interval))?;

    // Print the update stream as JSON lines.
    let mut updates = channel.registry().subscribe();
    tokio::spawn(async move {
        while let Ok(update) = updates.recv().await {
            match serde_json::to_string(&update) {
                Ok(line) => println!("{line}"),
                Err(e) => error!(error = %e, "serialize failed"),
            }
        }
    });

    if once {
        channel.poll_once().await;
        return Ok(());
    }

    let mut ticker = tokio::time::interval(channel.config().poll_interval());
    loop {
        ticker.tick().await;
        channel.poll_once().await;
    }
}

async fn write(host: String, port: u16, unit_id: u8, point: &str, value: &str) -> Result<()> {
    let channel = build_channel(host, port, unit_id, None)?;

    let value = parse_value(value);
    let outcome = channel.set_value(point, value).await?;

    println!(
        "{}",
        serde_json::json!({
            "point": point,
            "raw": outcome.raw,
            "applied": outcome.applied,
        })
    );
    channel.poll_once().await;
    Ok(())
}

/// Parse a CLI value: bool, number, HH:MM, or a bare option label.
fn parse_value(text: &str) -> PointValue {
    if let Ok(flag) = text.parse::<bool>() {
        return PointValue::Bool(flag);
    }
    if let Ok(number) = text.parse::<f64>() {
        return PointValue::Number(number);
    }
    if let Some((h, m)) = text.split_once(':') {
        if let (Ok(hour), Ok(minute)) = (h.parse::<u8>(), m.parse::<u8>()) {
            return PointValue::time(hour, minute);
        }
    }
    PointValue::Text(text.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_channel_plumbs_connection_options() {
        let channel = build_channel("10.0.0.9".to_string(), 1502, 3, Some(30)).unwrap();
        let config = channel.config();
        assert_eq!(config.session.host, "10.0.0.9");
        assert_eq!(config.session.port, 1502);
        assert_eq!(config.session.unit_id, 3);
        assert_eq!(config.poll_interval_secs, 30);

        let channel = build_channel("10.0.0.9".to_string(), 502, 2, None).unwrap();
        assert_eq!(channel.config().poll_interval_secs, 60);
    }

    #[test]
    fn test_parse_value_forms() {
        assert_eq!(parse_value("true"), PointValue::Bool(true));
        assert_eq!(parse_value("72.5"), PointValue::Number(72.5));
        assert_eq!(parse_value("06:30"), PointValue::time(6, 30));
        assert_eq!(
            parse_value("Automatik"),
            PointValue::Text("Automatik".to_string())
        );
    }
}
