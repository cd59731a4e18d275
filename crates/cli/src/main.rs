//! qinizx-keypad CLI: lighting and key programming for the 2-key keypad.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use qinizx_keypad_core::color::Rgb;
use qinizx_keypad_core::command::LightingMode;
use qinizx_keypad_core::config::{self, ConfigSlot, DecodedSlot};
use qinizx_keypad_core::keycodes;
use qinizx_keypad_core::safety;
use qinizx_keypad_core::session::DeviceSession;
use qinizx_keypad_core::transport::HidApiBackend;
use qinizx_keypad_core::{PRODUCT_ID, VENDOR_ID};
use tracing::debug;

#[derive(Parser)]
#[command(
    name = "qinizx-keypad",
    version,
    about = "Lighting and key programming for the QINIZX 2-key keypad"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the keypad's HID interfaces.
    List,
    /// Set lighting mode: off, static, breathing, rainbow, wave, reactive, custom, or an index.
    Mode {
        /// Mode name or raw index.
        mode: String,
    },
    /// Set a custom color (switches to custom mode first).
    Color {
        /// Color name, #RRGGBB, RRGGBB, or r,g,b.
        color: String,
    },
    /// Program a key with a single key or combo (e.g. a, enter, ctrl+c, 0x2c).
    Key {
        /// Key number (1 or 2).
        key: u8,
        /// Key name, combo, or hex keycode.
        combo: String,
        /// Read the configuration back afterwards.
        #[arg(long)]
        verify: bool,
    },
    /// Program a key to type a string.
    String {
        /// Key number (1 or 2).
        key: u8,
        /// Text to type when the key is pressed (at most 50 characters).
        text: String,
        /// Read the configuration back afterwards.
        #[arg(long)]
        verify: bool,
    },
    /// Read and decode the current key configuration.
    ReadConfig {
        /// Print JSON instead of text.
        #[arg(long)]
        json: bool,
    },
}

fn open() -> Result<DeviceSession<HidApiBackend>> {
    let session = DeviceSession::open_default().with_context(|| {
        format!("keypad not found or not accessible (VID=0x{VENDOR_ID:04X} PID=0x{PRODUCT_ID:04X})")
    })?;
    if let Some(path) = session.path() {
        println!("Found keypad at: {path}");
    }
    Ok(session)
}

fn print_config(slots: &[ConfigSlot]) {
    for (slot, decoded) in slots.iter().zip(config::decode_all(slots)) {
        match (slot.preview(), decoded) {
            (Some(preview), Some(DecodedSlot::Entry(entry))) => println!(
                "  Slot {}: {preview}  key {} {:?}",
                slot.index, entry.key_index, entry.mode
            ),
            (Some(preview), _) => println!("  Slot {}: {preview}", slot.index),
            (None, _) => println!("  Slot {}: (no data)", slot.index),
        }
    }
}

fn show_config(session: &DeviceSession<HidApiBackend>, heading: &str) -> Result<()> {
    println!("{heading}");
    let slots = session.read_config()?;
    print_config(&slots);
    Ok(())
}

/// Validate the key, open, print the current configuration, then hand a
/// freshly reopened session to `program`. With `verify`, reopen once more
/// and print the configuration again.
fn program_key<T>(
    key: u8,
    verify: bool,
    program: impl FnOnce(&DeviceSession<HidApiBackend>) -> Result<T>,
) -> Result<T> {
    safety::validate_key_index(key)?;
    let mut session = open()?;
    show_config(&session, "Current configuration:")?;
    session.reopen()?;

    let out = program(&session)?;

    if verify {
        session.reopen()?;
        show_config(&session, "\nConfiguration after programming:")?;
    }
    session.close();
    Ok(out)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::List => {
            let session = DeviceSession::new(HidApiBackend::new()?);
            let interfaces = session.interfaces()?;
            if interfaces.is_empty() {
                println!("No keypad found.");
                println!("Ensure it is connected and you have access to its hidraw nodes.");
            }
            for iface in &interfaces {
                println!(
                    "interface {} usage page 0x{:04X} usage 0x{:04X}{} (path: {})",
                    iface.interface_number,
                    iface.usage_page,
                    iface.usage,
                    if iface.is_vendor_interface() { " [vendor]" } else { "" },
                    iface.path
                );
            }
        }
        Commands::Mode { mode } => {
            let index = match LightingMode::from_name(&mode) {
                Some(m) => m.index(),
                None => mode.parse::<u8>().map_err(|_| {
                    let names: Vec<_> = LightingMode::ALL.iter().map(|m| m.name()).collect();
                    anyhow::anyhow!(
                        "Unknown mode '{mode}'. Available modes: {}",
                        names.join(", ")
                    )
                })?,
            };
            debug!(index, "Resolved lighting mode");
            let mut session = open()?;
            session.set_mode_index(index)?;
            session.close();
            println!("Lighting mode set to {index}");
        }
        Commands::Color { color } => {
            let rgb = Rgb::parse(&color).with_context(|| {
                let names: Vec<_> = Rgb::names().collect();
                format!("Color formats: {}, #RRGGBB, RRGGBB, r,g,b", names.join(", "))
            })?;
            let mut session = open()?;
            session.apply_custom_color(rgb)?;
            session.close();
            println!("Color set to {rgb} (R={}, G={}, B={})", rgb.r, rgb.g, rgb.b);
        }
        Commands::Key { key, combo, verify } => {
            let (modifier, keycode) = keycodes::parse_combo(&combo).with_context(|| {
                let names: Vec<_> = keycodes::base_key_names().collect();
                format!("Available key names: {}", names.join(", "))
            })?;
            program_key(key, verify, |session| {
                session.program_combo(key, keycode, modifier)?;
                println!("Key {key} set to keycode 0x{keycode:02X} (modifier 0x{modifier:02X})");
                Ok(())
            })?;
        }
        Commands::String { key, text, verify } => {
            program_key(key, verify, |session| {
                let skipped = session.program_string(key, &text)?;
                if !skipped.is_empty() {
                    let list: String = skipped.iter().collect();
                    println!("Skipped characters with no keycode: {list:?}");
                }
                println!("Key {key} set to type {text:?}");
                Ok(())
            })?;
        }
        Commands::ReadConfig { json } => {
            let mut session = open()?;
            let slots = session.read_config()?;
            session.close();
            if json {
                let decoded = config::decode_all(&slots);
                let out: Vec<_> = slots
                    .iter()
                    .zip(decoded)
                    .map(|(slot, d)| serde_json::json!({ "slot": slot.index, "decoded": d }))
                    .collect();
                println!("{}", serde_json::to_string_pretty(&out)?);
            } else {
                println!("Current configuration:");
                print_config(&slots);
            }
        }
    }

    Ok(())
}
