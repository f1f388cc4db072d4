//! Command-line lookups and launching external applications.

use super::{text, Args};
use crate::value::Value;
use gt_diagnostic::{Error, RuntimeErrorKind};
use gt_ir::Builtin;
use std::process::Command;

/// Values given for `flag`, or `None` when the flag is absent.
///
/// `-flag a b` yields the following non-flag arguments, `-flag=v` and
/// `-flag:v` yield `v` without matching surrounding quotes. An empty flag
/// asks for the arguments after the last flag argument. A bare `-` ends
/// the scan.
pub(crate) fn flag_values<'a>(cmd_line: &'a [String], flag: &str) -> Option<Vec<&'a str>> {
    if flag.trim_matches('-').is_empty() {
        return tail(cmd_line);
    }
    let flag = if flag.starts_with('-') {
        flag.to_string()
    } else {
        format!("-{flag}")
    };
    for (i, arg) in cmd_line.iter().enumerate() {
        if arg == "-" {
            break;
        }
        let Some(rest) = arg.strip_prefix(flag.as_str()) else {
            continue;
        };
        if rest.is_empty() {
            let values = cmd_line[i + 1..]
                .iter()
                .take_while(|value| !value.starts_with('-'))
                .map(String::as_str)
                .collect();
            return Some(values);
        }
        if let Some(value) = rest.strip_prefix(['=', ':']) {
            let values = if value.is_empty() {
                Vec::new()
            } else {
                vec![unquote(value)]
            };
            return Some(values);
        }
    }
    None
}

fn tail(cmd_line: &[String]) -> Option<Vec<&str>> {
    let mut start = 0;
    for (i, arg) in cmd_line.iter().enumerate() {
        if arg.starts_with('-') {
            start = i + 1;
            if arg.trim_matches('-').is_empty() {
                break;
            }
        }
    }
    if start < cmd_line.len() {
        Some(cmd_line[start..].iter().map(String::as_str).collect())
    } else {
        None
    }
}

fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if let Some(inner) = value
            .strip_prefix(quote)
            .and_then(|rest| rest.strip_suffix(quote))
        {
            return inner;
        }
    }
    value
}

fn strings(values: &[&str]) -> Value {
    Value::array(values.iter().map(|v| Value::from(*v)).collect())
}

pub(super) fn command_line(
    builtin: Builtin,
    cmd_line: &[String],
    args: &Args,
) -> Result<Value, Error> {
    let value = match builtin {
        Builtin::Args => Value::array(cmd_line.iter().map(|v| Value::from(v.as_str())).collect()),
        Builtin::ArgCount => Value::Int(i64::try_from(cmd_line.len()).unwrap_or(i64::MAX)),
        Builtin::Arg => {
            let values = flag_values(cmd_line, text(args, 0)?).unwrap_or_default();
            Value::from(values.first().copied().unwrap_or_default())
        }
        Builtin::ArgOr => match flag_values(cmd_line, text(args, 0)?) {
            Some(values) => Value::from(values.first().copied().unwrap_or_default()),
            None => Value::from(text(args, 1)?),
        },
        Builtin::ArgInt => {
            let default = args.get(1).and_then(Value::as_int).unwrap_or(0);
            match flag_values(cmd_line, text(args, 0)?) {
                None => Value::Int(default),
                Some(values) => {
                    let raw = values.first().copied().unwrap_or_default();
                    let parsed = raw.parse().map_err(|_| {
                        Error::runtime(RuntimeErrorKind::InvalidConversion {
                            value: raw.to_string(),
                            target: "int".to_string(),
                        })
                    })?;
                    Value::Int(parsed)
                }
            }
        }
        Builtin::ArgsOf => strings(&flag_values(cmd_line, text(args, 0)?).unwrap_or_default()),
        Builtin::ArgsTail => strings(&flag_values(cmd_line, "").unwrap_or_default()),
        Builtin::IsArg => Value::Bool(flag_values(cmd_line, text(args, 0)?).is_some()),
        other => {
            return Err(Error::runtime(RuntimeErrorKind::Custom {
                message: format!("{other:?} is not a command-line native"),
            }))
        }
    };
    Ok(value)
}

/// Open `file` with the application registered for it.
pub(super) fn open(file: &str) -> Result<Value, Error> {
    let mut command = match std::env::consts::OS {
        "linux" => Command::new("xdg-open"),
        "windows" => {
            let mut command = Command::new("rundll32");
            command.arg("url.dll,FileProtocolHandler");
            command
        }
        "macos" => Command::new("open"),
        os => return Err(unsupported(os)),
    };
    command.arg(file);
    start(command)
}

/// Open `file` with application `app`.
pub(super) fn open_with(app: &str, file: &str) -> Result<Value, Error> {
    let command = match std::env::consts::OS {
        "linux" => {
            let mut command = Command::new(app);
            command.arg(file);
            command
        }
        "windows" => {
            let mut command = Command::new("cmd");
            command.args(["/c", "start", app, &file.replace('&', "^&")]);
            command
        }
        "macos" => {
            let mut command = Command::new("open");
            command.args(["-a", app, file]);
            command
        }
        os => return Err(unsupported(os)),
    };
    start(command)
}

/// Start without waiting for the child.
fn start(mut command: Command) -> Result<Value, Error> {
    tracing::debug!(?command, "starting process");
    command.spawn().map_err(|err| {
        Error::runtime(RuntimeErrorKind::Io {
            message: err.to_string(),
        })
    })?;
    Ok(Value::Void)
}

fn unsupported(os: &str) -> Error {
    Error::runtime(RuntimeErrorKind::UnsupportedPlatform { os: os.to_string() })
}
