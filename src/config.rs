use serde::{Deserialize, Serialize};
use clap::{ArgAction, Parser, ValueEnum, ValueHint};
use dirs_next::home_dir;
use std::{fs, path::{Path, PathBuf}};
use thiserror::Error;

pub const DEFAULT_I2C_BUS: &str = "/dev/i2c-1";
/// Most 128x64 modules answer here, some are strapped to 0x3D
pub const DEFAULT_I2C_ADDRESS: u8 = 0x3C;
/// Art-Net port-address is 15 bits
pub const MAX_UNIVERSE: u16 = 0x7FFF;
/// 802.11 SSIDs are at most 32 octets
pub const MAX_SSID_LEN: usize = 32;
pub const DEFAULT_INIT_RETRIES: u32 = 1;
pub const DEFAULT_RETRY_DELAY_MS: u64 = 500;

/// Error type for config loading/validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Validation error: {0}")]
    Validation(String),
}

/// Top-level app configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    pub log_level: Option<String>,     // e.g., "info" | "debug"
    /// what the node reports about itself
    pub node: Option<NodeConfig>,
    /// display-specific geometry & behavior
    pub display: Option<DisplayConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct NodeConfig {
    pub universe_a: Option<u16>,
    pub universe_b: Option<u16>,
    pub wifi_network: Option<String>,
}

impl NodeConfig {
    pub fn universe_a(&self) -> u16 { self.universe_a.unwrap_or(0) }
    pub fn universe_b(&self) -> u16 { self.universe_b.unwrap_or(1) }
    pub fn wifi_network(&self) -> &str { self.wifi_network.as_deref().unwrap_or("") }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct DisplayConfig {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub rotate_deg: Option<u16>,
    pub invert: Option<bool>,
    pub brightness: Option<u8>,     // 0-255
    pub driver: Option<DriverKind>,
    pub i2c: Option<I2cConfig>,
    /// how many times to try bringing the panel up before giving up
    pub init_retries: Option<u32>,
    pub retry_delay_ms: Option<u64>,
}

impl DisplayConfig {
    pub fn driver(&self) -> DriverKind {
        self.driver.unwrap_or(DriverKind::Ssd1306)
    }

    pub fn i2c_bus(&self) -> &str {
        self.i2c.as_ref().and_then(|i| i.bus.as_deref()).unwrap_or(DEFAULT_I2C_BUS)
    }

    pub fn i2c_address(&self) -> u8 {
        self.i2c.as_ref().and_then(|i| i.address).unwrap_or(DEFAULT_I2C_ADDRESS)
    }

    pub fn init_retries(&self) -> u32 {
        self.init_retries.unwrap_or(DEFAULT_INIT_RETRIES)
    }

    pub fn retry_delay_ms(&self) -> u64 {
        self.retry_delay_ms.unwrap_or(DEFAULT_RETRY_DELAY_MS)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct I2cConfig {
    pub bus: Option<String>,        // e.g. "/dev/i2c-1"
    pub address: Option<u8>,        // 7-bit, e.g. 0x3C
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DriverKind {
    Ssd1306,
    /// in-memory panel, prints the rendered screen instead
    Mock,
}

/// Which screen the binary renders
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ScreenArg {
    Connecting,
    Error,
    Connected,
}

/// CLI overrides. All config fields are Options so we can layer them over YAML.
#[derive(Debug, Parser, Clone)]
#[command(name = "artnode-status", version, about = "Art-Net node OLED status panel")]
pub struct Cli {
    /// Path to a YAML config file (overrides search)
    #[arg(short = 'c', long, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,
    #[arg(long)]
    pub log_level: Option<String>,
    /// Enable debug log level
    #[arg(short = 'v', long, alias = "verbose", action = ArgAction::SetTrue)]
    pub debug: bool,
    #[arg(long)]
    pub universe_a: Option<u16>,
    #[arg(long)]
    pub universe_b: Option<u16>,
    /// Wi-Fi network name shown on the panel
    #[arg(long)]
    pub ssid: Option<String>,
    #[arg(long, value_enum)]
    pub driver: Option<DriverKind>,
    /// I2C bus device path for the OLED display (e.g., /dev/i2c-1)
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub i2c_bus: Option<String>,
    /// I2C address of the panel, hex (0x3C) or decimal
    #[arg(long, value_parser = parse_i2c_address)]
    pub i2c_address: Option<u8>,
    #[arg(long)]
    pub display_rotate_deg: Option<u16>,
    #[arg(long, action = ArgAction::Set)]
    pub display_invert: Option<bool>,
    #[arg(long)]
    pub display_brightness: Option<u8>,
    #[arg(long)]
    pub init_retries: Option<u32>,
    /// Screen to render
    #[arg(long, value_enum, default_value_t = ScreenArg::Connecting)]
    pub screen: ScreenArg,
    /// IP address shown on the connected screen
    #[arg(long, required_if_eq("screen", "connected"))]
    pub ip: Option<String>,
    /// Write the rendered panel as a PBM image (mock driver)
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub preview: Option<PathBuf>,
    /// dump fully merged config (after overrides) and exit
    #[arg(long, action = ArgAction::SetTrue)]
    pub dump_config: bool,
}

/// Accepts "0x3C", "0X3c" or "60"
pub fn parse_i2c_address(s: &str) -> Result<u8, String> {
    let s = s.trim();
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u8::from_str_radix(hex, 16),
        None => s.parse::<u8>(),
    };
    parsed.map_err(|e| format!("invalid I2C address '{}': {}", s, e))
}

/// Public entry point: read YAML, merge CLI overrides, validate.
pub fn load(cli: &Cli) -> Result<Config, ConfigError> {
    // 1) defaults (from `Default` impl)
    let mut cfg = Config::default();

    // 2) YAML file (explicit path or search)
    if let Some(p) = cli.config.as_ref() {
        if p.exists() {
            let y = read_yaml(p)?;
            merge(&mut cfg, y);
        } else {
            return Err(ConfigError::Validation(format!(
                "Config file not found: {}",
                p.display()
            )));
        }
    } else if let Some(p) = find_config_file() {
        let y = read_yaml(&p)?;
        merge(&mut cfg, y);
    }

    // 3) CLI overrides (highest precedence)
    apply_cli_overrides(&mut cfg, cli);

    // 4) Validate
    validate(&cfg)?;

    Ok(cfg)
}

/// Try common locations in order (first hit wins).
fn find_config_file() -> Option<PathBuf> {
    // XDG-style: ~/.config/artnode/config.yaml
    if let Some(home) = home_dir() {
        let p = home.join(".config/artnode/config.yaml");
        if p.exists() { return Some(p) }
        let p = home.join(".config/artnode.yaml");
        if p.exists() { return Some(p) }
    }
    // project local
    for candidate in &["artnode.yaml", "config/artnode.yaml"] {
        let p = PathBuf::from(candidate);
        if p.exists() { return Some(p) }
    }
    None
}

pub fn read_yaml(path: &Path) -> Result<Config, ConfigError> {
    let s = fs::read_to_string(path)?;
    let cfg: Config = serde_yaml::from_str(&s)?;
    Ok(cfg)
}

/// Shallow merge `src` into `dst`, Option-by-Option.
pub fn merge(dst: &mut Config, src: Config) {
    if src.log_level.is_some()      { dst.log_level = src.log_level; }
    match (&mut dst.node, src.node) {
        (None, Some(n)) => dst.node = Some(n),
        (Some(d), Some(s)) => merge_node(d, s),
        _ => {}
    }
    match (&mut dst.display, src.display) {
        (None, Some(c)) => dst.display = Some(c),
        (Some(d), Some(s)) => merge_display(d, s),
        _ => {}
    }
}

fn merge_node(dst: &mut NodeConfig, src: NodeConfig) {
    if src.universe_a.is_some()     { dst.universe_a = src.universe_a; }
    if src.universe_b.is_some()     { dst.universe_b = src.universe_b; }
    if src.wifi_network.is_some()   { dst.wifi_network = src.wifi_network; }
}

fn merge_display(dst: &mut DisplayConfig, src: DisplayConfig) {
    if src.width.is_some()          { dst.width = src.width; }
    if src.height.is_some()         { dst.height = src.height; }
    if src.rotate_deg.is_some()     { dst.rotate_deg = src.rotate_deg; }
    if src.invert.is_some()         { dst.invert = src.invert; }
    if src.brightness.is_some()     { dst.brightness = src.brightness; }
    if src.driver.is_some()         { dst.driver = src.driver; }
    if src.init_retries.is_some()   { dst.init_retries = src.init_retries; }
    if src.retry_delay_ms.is_some() { dst.retry_delay_ms = src.retry_delay_ms; }
    match (&mut dst.i2c, src.i2c) {
        (None, Some(i)) => dst.i2c = Some(i),
        (Some(d), Some(s)) => {
            if s.bus.is_some()      { d.bus = s.bus; }
            if s.address.is_some()  { d.address = s.address; }
        }
        _ => {}
    }
}

pub fn apply_cli_overrides(cfg: &mut Config, cli: &Cli) {
    if cli.log_level.is_some()       { cfg.log_level = cli.log_level.clone(); }

    if cli.universe_a.is_some() || cli.universe_b.is_some() || cli.ssid.is_some() {
        let node = cfg.node.get_or_insert_with(NodeConfig::default);
        if cli.universe_a.is_some()  { node.universe_a = cli.universe_a; }
        if cli.universe_b.is_some()  { node.universe_b = cli.universe_b; }
        if cli.ssid.is_some()        { node.wifi_network = cli.ssid.clone(); }
    }

    let any_display = cli.driver.is_some()
        || cli.i2c_bus.is_some()
        || cli.i2c_address.is_some()
        || cli.display_rotate_deg.is_some()
        || cli.display_invert.is_some()
        || cli.display_brightness.is_some()
        || cli.init_retries.is_some();

    if any_display {
        let display = cfg.display.get_or_insert_with(DisplayConfig::default);
        if cli.driver.is_some()              { display.driver = cli.driver; }
        if cli.display_rotate_deg.is_some()  { display.rotate_deg = cli.display_rotate_deg; }
        if cli.display_invert.is_some()      { display.invert = cli.display_invert; }
        if cli.display_brightness.is_some()  { display.brightness = cli.display_brightness; }
        if cli.init_retries.is_some()        { display.init_retries = cli.init_retries; }
        if cli.i2c_bus.is_some() || cli.i2c_address.is_some() {
            let i2c = display.i2c.get_or_insert_with(I2cConfig::default);
            if cli.i2c_bus.is_some()         { i2c.bus = cli.i2c_bus.clone(); }
            if cli.i2c_address.is_some()     { i2c.address = cli.i2c_address; }
        }
    }
}

/// Put any invariants here (required fields, ranges, etc.)
pub fn validate(cfg: &Config) -> Result<(), ConfigError> {
    if let Some(node) = cfg.node.as_ref() {
        for (name, universe) in [("universe_a", node.universe_a), ("universe_b", node.universe_b)] {
            if let Some(u) = universe {
                if u > MAX_UNIVERSE {
                    return Err(ConfigError::Validation(format!(
                        "node {} must be 0..={} (got {})", name, MAX_UNIVERSE, u
                    )));
                }
            }
        }
        if let Some(ssid) = node.wifi_network.as_ref() {
            if ssid.len() > MAX_SSID_LEN {
                return Err(ConfigError::Validation(format!(
                    "node wifi_network must be at most {} bytes", MAX_SSID_LEN
                )));
            }
        }
    }
    if let Some(display) = cfg.display.as_ref() {
        if let (Some(w), Some(h)) = (display.width, display.height) {
            if w == 0 || h == 0 {
                return Err(ConfigError::Validation("display width/height must be > 0".into()));
            }
        }
        if let Some(rot) = display.rotate_deg {
            match rot {
                0 | 180 => {},
                _ => return Err(ConfigError::Validation("display rotate_deg must be 0|180".into()))
            }
        }
        if let Some(addr) = display.i2c.as_ref().and_then(|i| i.address) {
            if !(0x08..=0x77).contains(&addr) {
                return Err(ConfigError::Validation(format!(
                    "display i2c address 0x{:02X} is outside the 7-bit range 0x08..=0x77", addr
                )));
            }
        }
        if display.init_retries == Some(0) {
            return Err(ConfigError::Validation("display init_retries must be >= 1".into()));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli(args: &[&str]) -> Cli {
        let mut argv = vec!["artnode-status"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_parse_i2c_address() {
        assert_eq!(parse_i2c_address("0x3C"), Ok(0x3C));
        assert_eq!(parse_i2c_address("0X3d"), Ok(0x3D));
        assert_eq!(parse_i2c_address("60"), Ok(60));
        assert!(parse_i2c_address("0x1FF").is_err());
        assert!(parse_i2c_address("oled").is_err());
    }

    #[test]
    fn test_defaults() {
        let display = DisplayConfig::default();
        assert_eq!(display.driver(), DriverKind::Ssd1306);
        assert_eq!(display.i2c_bus(), "/dev/i2c-1");
        assert_eq!(display.i2c_address(), 0x3C);
        assert_eq!(display.init_retries(), 1);
    }

    #[test]
    fn test_yaml_round_trip_fields() {
        let yaml = r#"
log_level: debug
node:
  universe_a: 1
  universe_b: 2
  wifi_network: MyNet
display:
  driver: mock
  brightness: 128
  i2c:
    bus: /dev/i2c-3
    address: 0x3D
"#;
        let cfg: Config = serde_yaml::from_str(yaml).unwrap();
        let node = cfg.node.as_ref().unwrap();
        assert_eq!((node.universe_a(), node.universe_b(), node.wifi_network()), (1, 2, "MyNet"));
        let display = cfg.display.as_ref().unwrap();
        assert_eq!(display.driver(), DriverKind::Mock);
        assert_eq!(display.i2c_bus(), "/dev/i2c-3");
        assert_eq!(display.i2c_address(), 0x3D);
        validate(&cfg).unwrap();
    }

    #[test]
    fn test_merge_keeps_unset_fields() {
        let mut dst = Config {
            node: Some(NodeConfig {
                universe_a: Some(4),
                wifi_network: Some("Stage".into()),
                ..Default::default()
            }),
            ..Default::default()
        };
        let src = Config {
            node: Some(NodeConfig {
                universe_b: Some(9),
                ..Default::default()
            }),
            ..Default::default()
        };
        merge(&mut dst, src);
        let node = dst.node.unwrap();
        assert_eq!(node.universe_a, Some(4));
        assert_eq!(node.universe_b, Some(9));
        assert_eq!(node.wifi_network.as_deref(), Some("Stage"));
    }

    #[test]
    fn test_cli_overrides_win() {
        let mut cfg = Config {
            display: Some(DisplayConfig {
                i2c: Some(I2cConfig { bus: Some("/dev/i2c-0".into()), address: Some(0x3C) }),
                ..Default::default()
            }),
            ..Default::default()
        };
        let args = cli(&["--i2c-address", "0x3D", "--ssid", "Booth", "--universe-b", "7"]);
        apply_cli_overrides(&mut cfg, &args);

        let display = cfg.display.as_ref().unwrap();
        assert_eq!(display.i2c_address(), 0x3D);
        assert_eq!(display.i2c_bus(), "/dev/i2c-0");
        let node = cfg.node.as_ref().unwrap();
        assert_eq!(node.wifi_network(), "Booth");
        assert_eq!(node.universe_b(), 7);
    }

    #[test]
    fn test_connected_screen_requires_ip() {
        let argv = ["artnode-status", "--screen", "connected"];
        assert!(Cli::try_parse_from(argv).is_err());

        let args = cli(&["--screen", "connected", "--ip", "192.168.1.1"]);
        assert_eq!(args.screen, ScreenArg::Connected);
        assert_eq!(args.ip.as_deref(), Some("192.168.1.1"));
    }

    #[test]
    fn test_validation() {
        let bad_universe = Config {
            node: Some(NodeConfig { universe_a: Some(40000), ..Default::default() }),
            ..Default::default()
        };
        assert!(validate(&bad_universe).is_err());

        let bad_rotation = Config {
            display: Some(DisplayConfig { rotate_deg: Some(90), ..Default::default() }),
            ..Default::default()
        };
        assert!(validate(&bad_rotation).is_err());

        let bad_address = Config {
            display: Some(DisplayConfig {
                i2c: Some(I2cConfig { bus: None, address: Some(0x7F) }),
                ..Default::default()
            }),
            ..Default::default()
        };
        assert!(validate(&bad_address).is_err());

        let long_ssid = Config {
            node: Some(NodeConfig { wifi_network: Some("x".repeat(33)), ..Default::default() }),
            ..Default::default()
        };
        assert!(validate(&long_ssid).is_err());

        assert!(validate(&Config::default()).is_ok());
    }

    #[test]
    fn test_missing_explicit_config_file() {
        let args = cli(&["--config", "/nonexistent/artnode.yaml"]);
        assert!(matches!(load(&args), Err(ConfigError::Validation(_))));
    }
}
