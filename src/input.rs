//! Multitouch input device discovery (evdev, MT protocol B).

use evdev::{AbsoluteAxisCode, Device, EventType};
use log::warn;

#[derive(Debug, Clone)]
pub struct DeviceInfo {
    pub path: String,
    pub name: String,
    pub x_range: (i32, i32),
    pub y_range: (i32, i32),
}

/// Scans /dev/input for devices exposing MT slots and positions. Axis
/// ranges are reported so profile thresholds can be chosen in device
/// units (see `gesturectl doctor`).
pub fn discover_multitouch() -> Vec<DeviceInfo> {
    let mut out = vec![];
    let Ok(rd) = std::fs::read_dir("/dev/input") else {
        return out;
    };
    for e in rd.flatten() {
        let p = e.path();
        let is_event_node = p
            .file_name()
            .and_then(|s| s.to_str())
            .map(|s| s.starts_with("event"))
            .unwrap_or(false);
        if !is_event_node {
            continue;
        }
        let Ok(dev) = Device::open(&p) else {
            continue;
        };
        if let Some(info) = probe(&dev, &p.display().to_string()) {
            out.push(info);
        }
    }
    out
}

/// Opens one specific device node and checks its MT capability.
pub fn open_device(path: &str) -> anyhow::Result<(Device, DeviceInfo)> {
    let dev = Device::open(path)?;
    match probe(&dev, path) {
        Some(info) => Ok((dev, info)),
        None => Err(anyhow::anyhow!("{path} is not a multitouch device")),
    }
}

fn probe(dev: &Device, path: &str) -> Option<DeviceInfo> {
    let has_abs = dev.supported_events().contains(EventType::ABSOLUTE);
    let axes = dev.supported_absolute_axes();
    let has_mt = axes.map_or(false, |a| {
        a.contains(AbsoluteAxisCode::ABS_MT_SLOT)
            && a.contains(AbsoluteAxisCode::ABS_MT_POSITION_X)
            && a.contains(AbsoluteAxisCode::ABS_MT_POSITION_Y)
    });
    if !(has_abs && has_mt) {
        return None;
    }

    let mut x_range = (0, 4096);
    let mut y_range = (0, 4096);
    match dev.get_absinfo() {
        Ok(infos) => {
            for (axis, info) in infos {
                if axis == AbsoluteAxisCode::ABS_MT_POSITION_X {
                    x_range = (info.minimum(), info.maximum());
                } else if axis == AbsoluteAxisCode::ABS_MT_POSITION_Y {
                    y_range = (info.minimum(), info.maximum());
                }
            }
        }
        Err(e) => warn!("absinfo query failed for {path}: {e}"),
    }

    Some(DeviceInfo {
        path: path.to_string(),
        name: dev.name().unwrap_or("unknown").to_string(),
        x_range,
        y_range,
    })
}
