/*
 *  main.rs
 *
 *  ArtNode Status - OLED status panel for the Art-Net DMX node
 *	(c) 2020-26 Stuart Hunter
 *
 *	This program is free software: you can redistribute it and/or modify
 *	it under the terms of the GNU General Public License as published by
 *	the Free Software Foundation, either version 3 of the License, or
 *	(at your option) any later version.
 *
 *	This program is distributed in the hope that it will be useful,
 *	but WITHOUT ANY WARRANTY; without even the implied warranty of
 *	MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *	GNU General Public License for more details.
 *
 *	See <http://www.gnu.org/licenses/> to get a copy of the GNU General
 *	Public License.
 *
 */

use std::fmt::Debug;
use std::fs::File;
use std::io::BufWriter;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use env_logger::Env;
use log::{error, info};

use artnode_status::config::{self, Cli, Config, DriverKind, ScreenArg};
use artnode_status::display::{DrawableDisplay, MockDriver, Screen, StatusDisplay};

include!(concat!(env!("OUT_DIR"), "/build_info.rs"));

fn main() -> Result<()> {
    let cli = Cli::parse();
    let cfg = config::load(&cli)?;

    let level = if cli.debug {
        "debug".to_string()
    } else {
        cfg.log_level.clone().unwrap_or_else(|| "info".to_string())
    };
    env_logger::Builder::from_env(Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();

    if cli.dump_config {
        // Pretty YAML of effective config (nice for debugging)
        println!("{}", serde_yaml::to_string(&cfg)?);
        return Ok(());
    }

    info!("{} v.{} built {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"), BUILD_DATE);

    let display_cfg = cfg.display.clone().unwrap_or_default();
    match display_cfg.driver() {
        DriverKind::Ssd1306 => run_ssd1306(&cfg, &cli),
        DriverKind::Mock => {
            let mut driver = MockDriver::from_config(&display_cfg);
            render(&mut driver, &cfg, &cli)?;

            // what the panel shows, not the working buffer
            let panel = driver
                .panel()
                .context("mock panel was never flushed")?;
            match cli.preview.as_ref() {
                Some(path) => {
                    let file = File::create(path)
                        .with_context(|| format!("creating preview {}", path.display()))?;
                    panel.write_pbm(&mut BufWriter::new(file))?;
                    info!("Preview written to {}", path.display());
                }
                None => print!("{}", panel.to_ascii()),
            }
            Ok(())
        }
    }
}

#[cfg(feature = "driver-ssd1306")]
fn run_ssd1306(cfg: &Config, cli: &Cli) -> Result<()> {
    use artnode_status::display::Ssd1306Driver;

    let display_cfg = cfg.display.clone().unwrap_or_default();
    let mut driver = Ssd1306Driver::new_i2c(
        display_cfg.i2c_bus(),
        display_cfg.i2c_address(),
        &display_cfg,
    )?;
    render(&mut driver, cfg, cli)
}

#[cfg(not(feature = "driver-ssd1306"))]
fn run_ssd1306(_cfg: &Config, _cli: &Cli) -> Result<()> {
    anyhow::bail!("built without the 'driver-ssd1306' feature, use --driver mock")
}

/// Bring the panel up and draw the requested screen.
fn render<D>(driver: &mut D, cfg: &Config, cli: &Cli) -> Result<()>
where
    D: DrawableDisplay,
    D::Error: Debug,
{
    let node = cfg.node.clone().unwrap_or_default();
    let display_cfg = cfg.display.clone().unwrap_or_default();

    let mut status = StatusDisplay::new(driver, node.universe_a(), node.universe_b(), node.wifi_network());

    let retries = display_cfg.init_retries();
    let delay = Duration::from_millis(display_cfg.retry_delay_ms());
    if let Err(e) = status.initialize_with_retry(retries, delay) {
        error!("Status display unavailable after {} attempt(s): {}", retries, e);
        return Err(e.into());
    }

    let screen = match cli.screen {
        ScreenArg::Connecting => Screen::Connecting,
        ScreenArg::Error => Screen::Error,
        ScreenArg::Connected => Screen::Connected { ip: cli.ip.as_deref().unwrap_or_default() },
    };
    status.show(screen).context("rendering status screen")?;
    info!("Showing {:?} on the status panel", cli.screen);
    Ok(())
}
