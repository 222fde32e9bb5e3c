use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use serde_json::Value;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

static JSON_MODE: AtomicBool = AtomicBool::new(false);

pub fn init(json: bool) {
    JSON_MODE.store(json, Ordering::Relaxed);
}

pub fn is_json() -> bool {
    JSON_MODE.load(Ordering::Relaxed)
}

/// Print a command result: pretty JSON with `--json`, an indented listing otherwise.
pub fn print<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let value = serde_json::to_value(value)?;
    if is_json() {
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }
    let mut out = stdout();
    write_human(&mut out, &value, 0)?;
    Ok(())
}

/// Green `ok` or red `FAIL` followed by `msg`, on stdout.
pub fn status_line(ok: bool, msg: &str) -> io::Result<()> {
    let mut out = stdout();
    let (color, tag) = if ok { (Color::Green, "ok") } else { (Color::Red, "FAIL") };
    out.set_color(ColorSpec::new().set_fg(Some(color)).set_bold(true))?;
    write!(out, "{tag:>4}")?;
    out.reset()?;
    writeln!(out, " {msg}")
}

/// Spinner on stderr, hidden in JSON mode.
pub fn spinner() -> anyhow::Result<ProgressBar> {
    if is_json() {
        return Ok(ProgressBar::hidden());
    }
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::with_template("{spinner} {msg}")?);
    pb.enable_steady_tick(Duration::from_millis(80));
    Ok(pb)
}

pub fn stdout() -> StandardStream {
    StandardStream::stdout(ColorChoice::Auto)
}

fn write_human<W: WriteColor>(out: &mut W, value: &Value, indent: usize) -> io::Result<()> {
    match value {
        Value::Object(map) => {
            for (key, val) in map {
                write!(out, "{:indent$}", "")?;
                out.set_color(ColorSpec::new().set_bold(true))?;
                write!(out, "{key}:")?;
                out.reset()?;
                if is_nested(val) {
                    writeln!(out)?;
                    write_human(out, val, indent + 2)?;
                } else {
                    writeln!(out, " {}", scalar(val))?;
                }
            }
        }
        Value::Array(items) => {
            for item in items {
                if is_nested(item) {
                    writeln!(out, "{:indent$}-", "")?;
                    write_human(out, item, indent + 2)?;
                } else {
                    writeln!(out, "{:indent$}- {}", "", scalar(item))?;
                }
            }
        }
        other => writeln!(out, "{:indent$}{}", "", scalar(other))?,
    }
    Ok(())
}

fn is_nested(value: &Value) -> bool {
    match value {
        Value::Object(map) => !map.is_empty(),
        Value::Array(items) => !items.is_empty(),
        _ => false,
    }
}

fn scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "-".to_string(),
        Value::Array(_) => "[]".to_string(),
        Value::Object(_) => "{}".to_string(),
        other => other.to_string(),
    }
}
