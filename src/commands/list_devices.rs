//! List available audio input devices.

use anyhow::anyhow;
use cpal::traits::{DeviceTrait, HostTrait};

use crate::recording::audio::with_alsa_silenced;

/// Prints every usable audio input device with its index, name and default
/// input format.
///
/// # Errors
/// - If the audio host cannot enumerate devices
pub fn handle_list_devices() -> Result<(), anyhow::Error> {
    let (devices, default_name) = with_alsa_silenced(|| {
        let host = cpal::default_host();
        let devices: Vec<cpal::Device> = host
            .input_devices()
            .map_err(|e| anyhow!("Failed to enumerate audio devices: {e}"))?
            .filter(|device| device.name().is_ok())
            .collect();
        let default_name = host.default_input_device().and_then(|d| d.name().ok());
        Ok((devices, default_name))
    })?;

    if devices.is_empty() {
        println!("No audio input devices found on this system.");
        return Ok(());
    }

    println!();
    println!("Available audio input devices:");
    println!();

    for (index, device) in devices.iter().enumerate() {
        println!("  {index}: {}", describe(device, default_name.as_deref()));
    }

    println!();
    println!("Set the device in ~/.config/intervu/intervu.toml under [audio] by ID or name.");

    Ok(())
}

/// One display line for a device: name, default marker, input format.
fn describe(device: &cpal::Device, default_name: Option<&str>) -> String {
    let name = device.name().unwrap_or_else(|_| "Unknown".to_string());
    let marker = if default_name == Some(name.as_str()) {
        " [DEFAULT]"
    } else {
        ""
    };
    let format = match device.default_input_config() {
        Ok(config) => format!("{}Hz, {} channels", config.sample_rate().0, config.channels()),
        Err(_) => "configuration unavailable".to_string(),
    };
    format!("{name}{marker} ({format})")
}
