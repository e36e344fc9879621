use anyhow::{Result, anyhow};
use pico_args::Arguments;
use std::env;

use crate::profile::ProfileStore;
use crate::{pipeline, replay};

pub fn run() -> Result<()> {
    let mut pargs = Arguments::from_env();

    // No args -> general help
    if env::args().len() == 1 {
        print_help();
        return Ok(());
    }

    if pargs.contains("-h") || pargs.contains("--help") {
        print_help();
        return Ok(());
    }

    let subcmd: Option<String> = pargs.free_from_str().ok();

    match subcmd.as_deref() {
        Some("help") => {
            let topic: Option<String> = pargs.free_from_str().ok();
            if let Some(t) = topic {
                print_subcmd_help(&t);
            } else {
                print_help();
            }
            Ok(())
        }

        Some("run") => {
            let device: Option<String> = pargs.opt_value_from_str("--device")?;
            let store = ProfileStore::load_or_install_default()?;
            pipeline::run(store, device)
        }

        Some("replay") => {
            let path: String = pargs
                .free_from_str()
                .map_err(|_| anyhow!("usage: gesturectl replay <trace.json>"))?;
            let store = ProfileStore::load_or_install_default()?;
            replay::run(&path, store.profile.engine_config())
        }

        Some("list") => {
            let store = ProfileStore::load_or_install_default()?;
            for name in store.list_profiles() {
                if name == store.active_name {
                    println!("* {name}");
                } else {
                    println!("  {name}");
                }
            }
            Ok(())
        }

        Some("use") => {
            let name: String = pargs
                .free_from_str()
                .map_err(|_| anyhow!("usage: gesturectl use <profile_name>"))?;
            let mut store = ProfileStore::load_or_install_default()?;
            store.set_active(&name)?;
            println!("active profile: {}", store.active_name);
            Ok(())
        }

        Some("doctor") => {
            let store = ProfileStore::load_or_install_default()?;
            let report = store.doctor_report();
            println!("{}", serde_json::to_string_pretty(&report)?);
            Ok(())
        }

        Some(other) => {
            eprintln!("unknown subcommand: {other}\n");
            print_help();
            Ok(())
        }

        None => {
            print_help();
            Ok(())
        }
    }
}

fn print_help() {
    println!(
        r#"gesturectl — multitouch gesture recognition

USAGE:
  gesturectl help [command]        Show general or command-specific help
  gesturectl run [--device PATH]   Recognize gestures from touch devices
  gesturectl replay <trace.json>   Replay a recorded event trace
  gesturectl list                  List profiles
  gesturectl use <name>            Switch active profile
  gesturectl doctor                Diagnose permissions/devices

TIPS:
  - Profiles: ~/.config/gesturectl/profiles
  - Active profile pointer: ~/.config/gesturectl/active
  - Profile edits apply live while `run` is active
"#
    );
}

fn print_subcmd_help(cmd: &str) {
    match cmd {
        "run" => println!(
            "usage: gesturectl run [--device PATH]\nRuns in the foreground, logging recognized gestures.\nWithout --device, all multitouch devices are used."
        ),
        "replay" => println!(
            "usage: gesturectl replay <trace.json>\nFeeds a JSON array of {{t, phase, contacts}} records through the engine."
        ),
        "list" => {
            println!("usage: gesturectl list\nLists available profiles; marks active with '*'.")
        }
        "use" => {
            println!("usage: gesturectl use <name>\nSwitches active profile to <name>.")
        }
        "doctor" => println!(
            "usage: gesturectl doctor\nChecks permissions and lists detected multitouch devices with axis ranges."
        ),
        _ => {
            eprintln!("unknown command: {cmd}\n");
            print_help();
        }
    }
}
