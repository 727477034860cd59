//! Command line front end over the device API.

use anyhow::{anyhow, Context, Result};
use clap::{parser::ValueSource, value_parser, Arg, ArgAction, ArgMatches, Command};
use std::fmt::Write;

use crate::api::{
    config::DEFAULT_STATION_ID,
    AlarmStatus, DeviceConfig, DeviceSummary, MultiZoneDevice, ZoneSetpoints, ZoneStatus,
};

pub fn build_command() -> Command {
    let zone_arg = Arg::new("zone")
        .help("Zone number as shown on the controller (1-16)")
        .required(true)
        .value_parser(value_parser!(u8));

    Command::new("multizone")
        .about("Read a multi-zone gas-detection controller over Modbus RTU")
        .arg(
            Arg::new("port")
                .long("port")
                .short('p')
                .global(true)
                .help("Serial device path, e.g. /dev/ttyUSB0 or COM3"),
        )
        .arg(
            Arg::new("baud")
                .long("baud")
                .short('b')
                .global(true)
                .default_value("19200")
                .value_parser(value_parser!(u32))
                .help("Baud rate"),
        )
        .arg(
            Arg::new("station")
                .long("station")
                .short('s')
                .global(true)
                .default_value("1")
                .value_parser(value_parser!(u8))
                .help("Modbus slave address of the controller"),
        )
        .arg(
            Arg::new("timeout")
                .long("timeout")
                .global(true)
                .default_value("1000")
                .value_parser(value_parser!(u64))
                .help("Read timeout in milliseconds"),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .global(true)
                .help("TOML or JSON device configuration file"),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .global(true)
                .help("Print readings as JSON")
                .action(ArgAction::SetTrue),
        )
        .subcommand_required(true)
        .subcommand(Command::new("zones").about("Status of all sixteen zones"))
        .subcommand(
            Command::new("zone")
                .about("Status of a single zone")
                .arg(zone_arg.clone()),
        )
        .subcommand(Command::new("summary").about("Every device-wide reading"))
        .subcommand(
            Command::new("setpoints")
                .about("Configuration registers of a single zone")
                .arg(zone_arg),
        )
}

fn explicit(matches: &ArgMatches, id: &str) -> bool {
    matches.value_source(id) == Some(ValueSource::CommandLine)
}

/// Merge the config file (if any) with flags given on the command line.
/// Flags win over the file; defaults only apply when neither sets a value.
pub fn resolve_config(matches: &ArgMatches) -> Result<DeviceConfig> {
    let mut config = match matches.get_one::<String>("config") {
        Some(path) => DeviceConfig::from_file(path)?,
        None => {
            let port = matches
                .get_one::<String>("port")
                .ok_or_else(|| anyhow!("Either --port or --config is required"))?;
            DeviceConfig::new(DEFAULT_STATION_ID, port.as_str())
        }
    };

    let from_file = matches.get_one::<String>("config").is_some();
    if let Some(port) = matches.get_one::<String>("port") {
        config.port_name = port.clone();
    }
    if !from_file || explicit(matches, "baud") {
        if let Some(baud) = matches.get_one::<u32>("baud") {
            config.baud_rate = *baud;
        }
    }
    if !from_file || explicit(matches, "station") {
        if let Some(station) = matches.get_one::<u8>("station") {
            config.station_id = *station;
        }
    }
    if !from_file || explicit(matches, "timeout") {
        if let Some(timeout) = matches.get_one::<u64>("timeout") {
            config.timeout_ms = *timeout;
        }
    }

    config.validate()?;
    Ok(config)
}

/// Convert a one-based zone number from the command line to the zero-based index.
pub fn zone_index(display_zone: u8) -> Result<u8> {
    match display_zone {
        1..=16 => Ok(display_zone - 1),
        _ => Err(anyhow!("Zone must be between 1-16, got {display_zone}")),
    }
}

pub fn run(matches: &ArgMatches) -> Result<()> {
    let config = resolve_config(matches)?;
    let json = matches.get_flag("json");
    log::info!(
        "Reading station {} on {} at {} baud",
        config.station_id,
        config.port_name,
        config.baud_rate
    );

    let mut device = MultiZoneDevice::from_config(config)?;
    let output = match matches.subcommand() {
        Some(("zones", _)) => {
            let zones = device
                .all_current_zone_statuses()
                .context("Failed to read zone statuses")?;
            if json {
                serde_json::to_string_pretty(&zones)?
            } else {
                render_zones(&zones)
            }
        }
        Some(("zone", sub)) => {
            let zone = parse_zone_arg(sub)?;
            let status = device
                .current_zone_status(zone)
                .context("Failed to read zone status")?;
            if json {
                serde_json::to_string_pretty(&status)?
            } else {
                render_zones(std::slice::from_ref(&status))
            }
        }
        Some(("summary", _)) => {
            let summary = device.summary().context("Failed to read device summary")?;
            if json {
                serde_json::to_string_pretty(&summary)?
            } else {
                render_summary(&summary)
            }
        }
        Some(("setpoints", sub)) => {
            let zone = parse_zone_arg(sub)?;
            let setpoints = device
                .zone_setpoints(zone)
                .context("Failed to read zone setpoints")?;
            if json {
                serde_json::to_string_pretty(&setpoints)?
            } else {
                render_setpoints(&setpoints)
            }
        }
        _ => return Err(anyhow!("Unknown command")),
    };
    device.disconnect();

    println!("{output}");
    Ok(())
}

fn parse_zone_arg(matches: &ArgMatches) -> Result<u8> {
    let zone = matches
        .get_one::<u8>("zone")
        .ok_or_else(|| anyhow!("Missing zone number"))?;
    zone_index(*zone)
}

fn flag_text(flag: Option<bool>) -> &'static str {
    match flag {
        Some(true) => "yes",
        Some(false) => "no",
        None => "unknown",
    }
}

pub fn render_zones(zones: &[ZoneStatus]) -> String {
    let mut out = String::new();
    for zone in zones {
        let _ = writeln!(
            out,
            "Zone {:>2}: {:>5} ppm - alarm {} ({})",
            zone.display_zone(),
            zone.ppm(),
            zone.alarm_level(),
            zone.alarm_label()
        );
    }
    out.trim_end().to_string()
}

pub fn render_summary(summary: &DeviceSummary) -> String {
    let rows: Vec<(&str, String)> = vec![
        ("Operating mode", summary.operating_mode_label().to_string()),
        ("Current state", summary.current_state_label().to_string()),
        ("Active zone", summary.active_zone.to_string()),
        (
            "Max alarm",
            format!(
                "{} ({})",
                summary.max_alarm,
                AlarmStatus::label_for(summary.max_alarm)
            ),
        ),
        ("Active alarm count", summary.active_alarm_count.to_string()),
        (
            "Acknowledged alarm count",
            summary.acknowledged_alarm_count.to_string(),
        ),
        ("Fault code status", summary.fault_code_status.to_string()),
        ("Fault code", summary.fault_code.to_string()),
        ("Audible alarm", flag_text(summary.audible_alarm).to_string()),
        ("Silenced", flag_text(summary.silenced).to_string()),
        (
            "Highest concentration zone",
            summary.highest_concentration_zone.to_string(),
        ),
        (
            "Highest concentration",
            format!("{} ppm", summary.highest_concentration),
        ),
        ("Zones installed", summary.zones_installed.to_string()),
        ("Manifold pressure", format!("{:.2}", summary.manifold_pressure)),
        ("Ambient pressure", format!("{:.2}", summary.ambient_pressure)),
        ("Vacuum pressure", format!("{:.2}", summary.vacuum_pressure)),
        ("Bench temperature", format!("{:.2}", summary.bench_temperature)),
        ("Average voltage", format!("{:.3} V", summary.average_voltage)),
        ("Zero volts", format!("{:.3} V", summary.zero_volts)),
        ("Average Au", format!("{:.4}", summary.average_au)),
        ("Bench ppm", summary.bench_ppm.to_string()),
        (
            "Alarms acknowledged",
            flag_text(summary.alarm_acknowledged).to_string(),
        ),
    ];

    rows.iter()
        .map(|(label, value)| format!("{label:<27}{value}"))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_setpoints(setpoints: &ZoneSetpoints) -> String {
    [
        format!("Zone {}", u16::from(setpoints.zone) + 1),
        format!("  Refrigerant type:    {}", setpoints.refrigerant_type),
        format!("  Leak setpoint:       {} ppm", setpoints.leak_setpoint),
        format!("  Spill setpoint:      {} ppm", setpoints.spill_setpoint),
        format!("  Evacuation setpoint: {} ppm", setpoints.evacuation_setpoint),
        format!("  Sample distance:     {}", setpoints.sample_distance),
        format!(
            "  Alarm acknowledged:  {}",
            flag_text(setpoints.alarm_acknowledged)
        ),
    ]
    .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zone_index_is_one_based() {
        assert_eq!(zone_index(1).unwrap(), 0);
        assert_eq!(zone_index(16).unwrap(), 15);
        assert!(zone_index(0).is_err());
        assert!(zone_index(17).is_err());
    }

    #[test]
    fn test_resolve_config_from_flags() {
        let matches = build_command()
            .try_get_matches_from(["multizone", "-p", "/dev/ttyUSB0", "-b", "9600", "zones"])
            .unwrap();
        let config = resolve_config(&matches).unwrap();
        assert_eq!(config.port_name, "/dev/ttyUSB0");
        assert_eq!(config.baud_rate, 9600);
        assert_eq!(config.station_id, 1);
    }

    #[test]
    fn test_resolve_config_requires_port() {
        let matches = build_command()
            .try_get_matches_from(["multizone", "summary"])
            .unwrap();
        assert!(resolve_config(&matches).is_err());
    }

    #[test]
    fn test_flags_override_config_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        std::io::Write::write_all(
            &mut file,
            b"port_name = \"/dev/serial1\"\nbaud_rate = 9600\nstation_id = 4\n",
        )
        .unwrap();
        let path = file.path().to_string_lossy().to_string();

        let matches = build_command()
            .try_get_matches_from(["multizone", "-c", path.as_str(), "-s", "7", "zones"])
            .unwrap();
        let config = resolve_config(&matches).unwrap();
        assert_eq!(config.port_name, "/dev/serial1");
        assert_eq!(config.baud_rate, 9600);
        assert_eq!(config.station_id, 7);
    }

    #[test]
    fn test_render_zones() {
        let zones = vec![
            ZoneStatus::new(0, 10, 0),
            ZoneStatus::new(1, 250, 1),
            ZoneStatus::new(2, 900, 3),
        ];
        assert_eq!(
            render_zones(&zones),
            "Zone  1:    10 ppm - alarm 0 (No Alarm)\n\
             Zone  2:   250 ppm - alarm 1 (Leak)\n\
             Zone  3:   900 ppm - alarm 3 (Unknown alarm status)"
        );
    }

    #[test]
    fn test_render_summary_shows_alarm_code() {
        let summary = DeviceSummary {
            operating_mode: 0,
            current_state: 1,
            active_zone: 3,
            max_alarm: 3,
            active_alarm_count: 1,
            acknowledged_alarm_count: 0,
            fault_code_status: 0,
            fault_code: 0,
            audible_alarm: Some(true),
            silenced: Some(false),
            highest_concentration_zone: 3,
            highest_concentration: 900,
            zones_installed: 16,
            manifold_pressure: 14.7,
            ambient_pressure: 14.6,
            vacuum_pressure: 2.5,
            bench_temperature: 30.0,
            average_voltage: 1.25,
            zero_volts: 0.5,
            average_au: 0.125,
            bench_ppm: 900,
            alarm_acknowledged: None,
            captured_at: chrono::Utc::now(),
        };
        let text = render_summary(&summary);
        assert!(text.contains("3 (Unknown alarm status)"), "{text}");
    }

    #[test]
    fn test_render_setpoints() {
        let text = render_setpoints(&ZoneSetpoints {
            zone: 0,
            refrigerant_type: 12,
            leak_setpoint: 100,
            spill_setpoint: 300,
            evacuation_setpoint: 500,
            sample_distance: 40,
            alarm_acknowledged: None,
        });
        assert!(text.starts_with("Zone 1\n"));
        assert!(text.contains("Leak setpoint:       100 ppm"));
        assert!(text.ends_with("Alarm acknowledged:  unknown"));
    }
}
