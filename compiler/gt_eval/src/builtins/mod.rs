//! Dispatch of standard library natives.

mod convert;
mod path;
mod process;

use crate::interpreter::Interpreter;
use crate::operators;
use crate::value::Value;
use gt_diagnostic::{Error, RuntimeErrorKind};
use gt_ir::Builtin;
use smallvec::SmallVec;
use std::time::Duration;

/// Evaluated arguments of a native call.
pub(crate) type Args = SmallVec<[Value; 4]>;

/// Longest uninterrupted nap of `sleep`; the close flag is checked between naps.
const SLEEP_SLICE: Duration = Duration::from_millis(50);

impl Interpreter<'_> {
    pub(crate) fn embed(&mut self, builtin: Builtin, args: Args) -> Result<Value, Error> {
        match builtin {
            Builtin::Not | Builtin::Sign | Builtin::BitNot | Builtin::Len => {
                operators::unary(builtin, arg(&args, 0)?)
            }
            Builtin::Add
            | Builtin::Sub
            | Builtin::Mul
            | Builtin::Div
            | Builtin::Mod
            | Builtin::BitAnd
            | Builtin::BitOr
            | Builtin::BitXor
            | Builtin::Shl
            | Builtin::Shr
            | Builtin::Equal
            | Builtin::Less
            | Builtin::Greater
            | Builtin::NewRange
            | Builtin::IsKey => operators::binary(builtin, arg(&args, 0)?, arg(&args, 1)?),

            Builtin::ToInt => convert::to_int(arg(&args, 0)?),
            Builtin::ToFloat => convert::to_float(arg(&args, 0)?),
            Builtin::ToStr => Ok(Value::Str(arg(&args, 0)?.to_string())),
            Builtin::ToBool => convert::to_bool(arg(&args, 0)?),
            Builtin::ToChar => convert::to_char(arg(&args, 0)?),

            Builtin::Print | Builtin::Println => {
                let text: String = args.iter().map(ToString::to_string).collect();
                if builtin == Builtin::Println {
                    self.shared.print.println(&text);
                } else {
                    self.shared.print.print(&text);
                }
                Ok(Value::Void)
            }
            Builtin::Error => Err(Error::runtime(RuntimeErrorKind::Custom {
                message: arg(&args, 0)?.to_string(),
            })),
            Builtin::Sleep => {
                let millis = arg(&args, 0)?.as_int().unwrap_or(0);
                self.sleep(Duration::from_millis(u64::try_from(millis).unwrap_or(0)))?;
                Ok(Value::Void)
            }
            Builtin::Wait => {
                if let Value::Thread(Some(thread)) = arg(&args, 0)? {
                    self.shared.hub.wait(*thread);
                }
                Ok(Value::Void)
            }

            Builtin::Args
            | Builtin::ArgCount
            | Builtin::Arg
            | Builtin::ArgOr
            | Builtin::ArgInt
            | Builtin::ArgsOf
            | Builtin::ArgsTail
            | Builtin::IsArg => process::command_line(builtin, &self.shared.args, &args),
            Builtin::Open => process::open(text(&args, 0)?),
            Builtin::OpenWith => process::open_with(text(&args, 0)?, text(&args, 1)?),

            Builtin::AbsPath => path::abs_path(text(&args, 0)?).map(Value::Str),
            Builtin::BaseName => Ok(Value::Str(path::base_name(text(&args, 0)?))),
            Builtin::Dir => Ok(Value::Str(path::dir(text(&args, 0)?))),
            Builtin::Ext => Ok(Value::Str(path::ext(text(&args, 0)?).to_string())),
            Builtin::JoinPath => {
                let parts: Vec<String> = args.iter().map(ToString::to_string).collect();
                Ok(Value::Str(path::join(&parts)))
            }
            Builtin::MatchPath => {
                path::matches(text(&args, 0)?, text(&args, 1)?).map(Value::Bool)
            }
        }
    }

    /// Sleep in short slices so a closed thread wakes up promptly.
    fn sleep(&self, total: Duration) -> Result<(), Error> {
        let mut left = total;
        while !left.is_zero() {
            self.check_close()?;
            let nap = left.min(SLEEP_SLICE);
            std::thread::sleep(nap);
            left -= nap;
        }
        self.check_close()
    }
}

fn arg(args: &Args, index: usize) -> Result<&Value, Error> {
    args.get(index).ok_or_else(|| {
        Error::runtime(RuntimeErrorKind::Custom {
            message: format!("missing argument {}", index + 1),
        })
    })
}

fn text(args: &Args, index: usize) -> Result<&str, Error> {
    let value = arg(args, index)?;
    value.as_str().ok_or_else(|| {
        Error::runtime(RuntimeErrorKind::Custom {
            message: format!("expected str, found {}", value.type_name()),
        })
    })
}

#[cfg(test)]
mod tests;
