//! Entry point for **i3ricing**.
//!
//! Parses the command line, connects to the window manager and carries out
//! exactly one command.

use i3ricing::actions::Navigator;
use i3ricing::command::{Command, USAGE};
use i3ricing::config::Config;
use i3ricing::i3::wm::I3Wm;
use log::{debug, error, info};

/// Resolve the config directory (`$XDG_CONFIG_HOME/i3ricing`).
fn config_dir() -> std::path::PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME").unwrap_or_else(|_| {
        let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".into());
        format!("{}/.config", home)
    });
    std::path::PathBuf::from(base).join("i3ricing")
}

/// Try to load the config from `$XDG_CONFIG_HOME/i3ricing/config.json`,
/// falling back to compiled-in defaults.
fn load_config() -> Config {
    let path = config_dir().join("config.json");
    match Config::load(&path) {
        Ok(cfg) => {
            debug!("loaded config from {}", path.display());
            cfg
        }
        Err(e) => {
            info!("no config file ({}), using defaults", e);
            Config::default()
        }
    }
}

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = match Command::parse_args(&args) {
        Ok(cmd) => cmd,
        Err(e) => {
            println!("{}", USAGE);
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };
    debug!("command: {:?}", command);

    let config = load_config();
    let wm = match I3Wm::discover(config.socket_path.as_deref()) {
        Ok(wm) => wm,
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    };
    debug!("using socket {}", wm.socket().display());

    let navigator = Navigator::new(wm, config);
    match navigator.handle(command) {
        Ok(Some(text)) => println!("{}", text),
        Ok(None) => {}
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    }
}
