//! Lexical path helpers with `/` separators.

use gt_diagnostic::{Error, RuntimeErrorKind};

/// Shortest path equivalent to `path`: repeated separators collapse, `.`
/// elements vanish and `..` cancels the preceding element.
pub(crate) fn clean(path: &str) -> String {
    if path.is_empty() {
        return ".".to_string();
    }
    let rooted = path.starts_with('/');
    let mut parts: Vec<&str> = Vec::new();
    for part in path.split('/') {
        match part {
            "" | "." => {}
            ".." => match parts.last() {
                Some(&last) if last != ".." => {
                    parts.pop();
                }
                _ if rooted => {}
                _ => parts.push(".."),
            },
            _ => parts.push(part),
        }
    }
    let joined = parts.join("/");
    match (rooted, joined.is_empty()) {
        (true, _) => format!("/{joined}"),
        (false, true) => ".".to_string(),
        (false, false) => joined,
    }
}

pub(super) fn abs_path(path: &str) -> Result<String, Error> {
    if path.starts_with('/') {
        return Ok(clean(path));
    }
    let cwd = std::env::current_dir().map_err(|err| {
        Error::runtime(RuntimeErrorKind::Io {
            message: err.to_string(),
        })
    })?;
    let cwd = cwd.to_string_lossy().replace('\\', "/");
    Ok(clean(&format!("{cwd}/{path}")))
}

/// Last element, ignoring trailing separators.
pub(crate) fn base_name(path: &str) -> String {
    if path.is_empty() {
        return ".".to_string();
    }
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        return "/".to_string();
    }
    trimmed
        .rsplit_once('/')
        .map_or(trimmed, |(_, last)| last)
        .to_string()
}

/// Everything but the last element, cleaned.
pub(crate) fn dir(path: &str) -> String {
    match path.rfind('/') {
        Some(at) => clean(&path[..=at]),
        None => ".".to_string(),
    }
}

/// Extension of the last element without the dot.
pub(crate) fn ext(path: &str) -> &str {
    let last = path.rsplit('/').next().unwrap_or(path);
    last.rfind('.').map_or("", |at| &last[at + 1..])
}

pub(crate) fn join(parts: &[String]) -> String {
    let parts: Vec<&str> = parts
        .iter()
        .map(String::as_str)
        .filter(|part| !part.is_empty())
        .collect();
    if parts.is_empty() {
        return String::new();
    }
    clean(&parts.join("/"))
}

/// Shell-style match of the whole of `name`.
///
/// `*` matches any run of non-separator characters, `?` one of them,
/// `[...]` a class (`^` negates, `a-z` ranges) and `\` escapes the next
/// character.
pub(crate) fn matches(pattern: &str, name: &str) -> Result<bool, Error> {
    let pattern: Vec<char> = pattern.chars().collect();
    let name: Vec<char> = name.chars().collect();
    match_from(&pattern, &name).ok_or_else(|| {
        Error::runtime(RuntimeErrorKind::Custom {
            message: "syntax error in pattern".to_string(),
        })
    })
}

/// `None` for a malformed pattern.
fn match_from(pattern: &[char], name: &[char]) -> Option<bool> {
    let Some((&first, rest)) = pattern.split_first() else {
        return Some(name.is_empty());
    };
    match first {
        '*' => {
            // Try every split up to the next separator.
            let mut i = 0;
            loop {
                if match_from(rest, &name[i..])? {
                    return Some(true);
                }
                if i == name.len() || name[i] == '/' {
                    // Keep scanning for syntax errors in the rest.
                    validate(rest)?;
                    return Some(false);
                }
                i += 1;
            }
        }
        '?' => match name.split_first() {
            Some((&ch, tail)) if ch != '/' => match_from(rest, tail),
            _ => validate(rest).map(|()| false),
        },
        '[' => {
            let (matched, after) = class(rest, name.first().copied())?;
            match name.split_first() {
                Some((&ch, tail)) if matched && ch != '/' => match_from(after, tail),
                _ => validate(after).map(|()| false),
            }
        }
        '\\' => {
            let (&escaped, after) = rest.split_first()?;
            match name.split_first() {
                Some((&ch, tail)) if ch == escaped => match_from(after, tail),
                _ => validate(after).map(|()| false),
            }
        }
        literal => match name.split_first() {
            Some((&ch, tail)) if ch == literal => match_from(rest, tail),
            _ => validate(rest).map(|()| false),
        },
    }
}

/// Whether `ch` is in the class that starts right after `[`; returns the
/// pattern after the closing `]`.
fn class(pattern: &[char], ch: Option<char>) -> Option<(bool, &[char])> {
    let (negated, mut rest) = match pattern.split_first() {
        Some(('^', rest)) => (true, rest),
        _ => (false, pattern),
    };
    let mut matched = false;
    let mut first = true;
    loop {
        let (&c, tail) = rest.split_first()?;
        if c == ']' && !first {
            return Some((ch.is_some() && matched != negated, tail));
        }
        first = false;
        let (low, tail) = class_char(rest)?;
        let (high, tail) = match tail.split_first() {
            Some(('-', range_tail)) => class_char(range_tail)?,
            _ => (low, tail),
        };
        if high < low {
            return None;
        }
        if ch.is_some_and(|ch| low <= ch && ch <= high) {
            matched = true;
        }
        rest = tail;
    }
}

fn class_char(pattern: &[char]) -> Option<(char, &[char])> {
    match pattern.split_first()? {
        ('\\', rest) => rest.split_first().map(|(&c, tail)| (c, tail)),
        (']' | '-', _) => None,
        (&c, tail) => Some((c, tail)),
    }
}

fn validate(pattern: &[char]) -> Option<()> {
    let mut rest = pattern;
    while let Some((&c, tail)) = rest.split_first() {
        rest = match c {
            '\\' => tail.split_first()?.1,
            '[' => class(tail, None)?.1,
            _ => tail,
        };
    }
    Some(())
}
