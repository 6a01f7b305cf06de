use clap::Subcommand;
use focuscafe_core::timer::{clamp_minutes, SessionMode};
use focuscafe_core::Config;

/// Every key `focuscafe run` reads, with what it controls.
const KEYS: &[(&str, &str)] = &[
    ("timer.focus_duration", "focus session length in minutes (1-60)"),
    ("timer.break_duration", "break length in minutes (1-15)"),
    ("notifications.enabled", "ring the terminal bell when a session ends"),
    ("projection.auto_open", "mirror the timer into the window title on start"),
    ("projection.frame_size", "edge of the floating timer frame in pixels (64-4096)"),
];

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print one setting, e.g. `timer.focus_duration`
    Get {
        /// Setting key (see `focuscafe config keys`)
        key: String,
    },
    /// Change one setting; durations and frame size are clamped when used
    Set {
        /// Setting key (see `focuscafe config keys`)
        key: String,
        /// New value
        value: String,
    },
    /// Print the whole config file
    List,
    /// Describe every setting with its current value
    Keys,
    /// Restore the default timer, bell and projection settings
    Reset,
}

pub fn run(action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ConfigAction::Get { key } => {
            let config = Config::load_or_default();
            let value = config.get(&key).ok_or_else(|| unknown_key(&key))?;
            println!("{value}");
        }
        ConfigAction::Set { key, value } => {
            if !KEYS.iter().any(|(k, _)| *k == key) {
                return Err(unknown_key(&key).into());
            }
            let mut config = Config::load_or_default();
            config.set(&key, &value)?;
            config.save()?;
            let stored = config.get(&key).unwrap_or(value);
            match effective_value(&config, &key) {
                Some(applied) if applied != stored => {
                    println!("{key} = {stored} (runs use {applied})")
                }
                _ => println!("{key} = {stored}"),
            }
        }
        ConfigAction::List => {
            let config = Config::load_or_default();
            print!("{}", toml::to_string_pretty(&config)?);
        }
        ConfigAction::Keys => {
            let config = Config::load_or_default();
            for (key, about) in KEYS {
                let value = config.get(key).unwrap_or_default();
                println!("{key:<24} {value:<6} {about}");
            }
        }
        ConfigAction::Reset => {
            Config::default().save()?;
            println!("timer, bell and projection settings restored to defaults");
        }
    }
    Ok(())
}

fn unknown_key(key: &str) -> String {
    format!("unknown key: {key} (run `focuscafe config keys` for the list)")
}

/// Value a run actually uses for a clamped numeric setting.
fn effective_value(config: &Config, key: &str) -> Option<String> {
    let applied = match key {
        "timer.focus_duration" => {
            clamp_minutes(SessionMode::Focus, i64::from(config.timer.focus_duration))
        }
        "timer.break_duration" => {
            clamp_minutes(SessionMode::Break, i64::from(config.timer.break_duration))
        }
        "projection.frame_size" => config.projection.frame_edge(),
        _ => return None,
    };
    Some(applied.to_string())
}
