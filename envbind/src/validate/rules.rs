//! Rule string evaluation
//!
//! A rule string is a comma separated list of tokens. Each token is a rule
//! name with an optional `=param`; alternatives inside a token are separated
//! by `|` and the token passes when any alternative passes.

use crate::coerce::parse_duration;
use crate::kind::Value;
use std::cmp::Ordering;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

/// Values of the leaf fields of the record being validated, by field name.
pub(crate) type Siblings = [(&'static str, Option<Value>)];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Verdict {
    Pass,
    Fail,
    /// Cross-field rule evaluated without access to the record.
    Deferred,
}

impl From<bool> for Verdict {
    fn from(pass: bool) -> Self {
        if pass {
            Self::Pass
        } else {
            Self::Fail
        }
    }
}

/// Check `value` against every token of `rules`.
///
/// Without `siblings`, cross-field rules are skipped. On failure, returns the
/// token that failed.
pub(crate) fn check<'r>(
    value: &Value,
    rules: &'r str,
    siblings: Option<&Siblings>,
) -> Result<(), &'r str> {
    for token in rules.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        if token == "omitempty" {
            if value.is_zero() {
                return Ok(());
            }
            continue;
        }

        let passed = token
            .split('|')
            .any(|alt| evaluate(alt.trim(), value, siblings) != Verdict::Fail);
        if !passed {
            return Err(token);
        }
    }
    Ok(())
}

fn evaluate(rule: &str, value: &Value, siblings: Option<&Siblings>) -> Verdict {
    let (name, param) = match rule.split_once('=') {
        Some((name, param)) => (name, param),
        None => (rule, ""),
    };

    match name {
        "required" => (!value.is_zero()).into(),
        "required_if" | "required_unless" | "required_with" | "required_without" | "eqfield"
        | "nefield" => match siblings {
            Some(siblings) => cross_field(name, param, value, siblings),
            None => Verdict::Deferred,
        },
        "len" => compare(value, param).map(|o| o == Ordering::Equal).into_verdict(),
        "min" | "gte" => compare(value, param).map(|o| o != Ordering::Less).into_verdict(),
        "max" | "lte" => compare(value, param).map(|o| o != Ordering::Greater).into_verdict(),
        "gt" => compare(value, param).map(|o| o == Ordering::Greater).into_verdict(),
        "lt" => compare(value, param).map(|o| o == Ordering::Less).into_verdict(),
        "eq" => equals(value, param).into_verdict(),
        "ne" => equals(value, param).map(|eq| !eq).into_verdict(),
        "oneof" => param
            .split_whitespace()
            .any(|option| equals(value, option) == Some(true))
            .into(),
        "numeric" => match value {
            Value::Str(s) => is_numeric(s).into(),
            Value::Float(_) | Value::Uint(_) | Value::Int(_) => Verdict::Pass,
            _ => Verdict::Fail,
        },
        "number" => match value {
            Value::Str(s) => (!s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())).into(),
            Value::Uint(_) => Verdict::Pass,
            _ => Verdict::Fail,
        },
        _ => match value {
            Value::Str(s) => string_rule(name, param, s),
            _ => Verdict::Fail,
        },
    }
}

fn string_rule(name: &str, param: &str, s: &str) -> Verdict {
    match name {
        "alpha" => (!s.is_empty() && s.chars().all(|c| c.is_ascii_alphabetic())).into(),
        "alphanum" => (!s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric())).into(),
        "lowercase" => (!s.is_empty() && s == s.to_lowercase()).into(),
        "uppercase" => (!s.is_empty() && s == s.to_uppercase()).into(),
        "contains" => s.contains(param).into(),
        "startswith" => s.starts_with(param).into(),
        "endswith" => s.ends_with(param).into(),
        "ip" => s.parse::<IpAddr>().is_ok().into(),
        "ipv4" => s.parse::<Ipv4Addr>().is_ok().into(),
        "ipv6" => s.parse::<Ipv6Addr>().is_ok().into(),
        "hostname" => is_hostname(s).into(),
        "hostname_port" => split_host_port(s)
            .map(|(host, _)| is_hostname(host) || host.parse::<IpAddr>().is_ok())
            .unwrap_or(false)
            .into(),
        "tcp_addr" => split_host_port(s)
            .map(|(host, _)| host.is_empty() || is_hostname(host) || host.parse::<IpAddr>().is_ok())
            .unwrap_or(false)
            .into(),
        // Unknown rules never pass.
        _ => Verdict::Fail,
    }
}

fn sibling<'s>(siblings: &'s Siblings, field: &str) -> Option<&'s Value> {
    siblings
        .iter()
        .find(|(name, _)| *name == field)
        .and_then(|(_, value)| value.as_ref())
}

fn cross_field(name: &str, param: &str, value: &Value, siblings: &Siblings) -> Verdict {
    let lookup = |field: &str| sibling(siblings, field);

    match name {
        "required_if" | "required_unless" => {
            let words: Vec<&str> = param.split_whitespace().collect();
            if words.is_empty() || words.len() % 2 != 0 {
                return Verdict::Fail;
            }
            let mut all_match = true;
            for pair in words.chunks(2) {
                match lookup(pair[0]) {
                    Some(other) => all_match &= other.to_string() == pair[1],
                    None => return Verdict::Fail,
                }
            }
            let needed = if name == "required_if" { all_match } else { !all_match };
            (!needed || !value.is_zero()).into()
        }
        "required_with" | "required_without" => {
            let mut needed = false;
            for field in param.split_whitespace() {
                let Some(other) = lookup(field) else {
                    return Verdict::Fail;
                };
                let present = !other.is_zero();
                if (name == "required_with") == present {
                    needed = true;
                }
            }
            (!needed || !value.is_zero()).into()
        }
        "eqfield" | "nefield" => match lookup(param.trim()) {
            Some(other) => ((other == value) == (name == "eqfield")).into(),
            None => Verdict::Fail,
        },
        _ => Verdict::Fail,
    }
}

trait IntoVerdict {
    fn into_verdict(self) -> Verdict;
}

impl IntoVerdict for Option<bool> {
    fn into_verdict(self) -> Verdict {
        self.unwrap_or(false).into()
    }
}

/// Compare a value's measure against the rule parameter.
///
/// Numbers compare by value, strings by character count, sequences by
/// element count and durations against a duration literal.
fn compare(value: &Value, param: &str) -> Option<Ordering> {
    match value {
        Value::Float(v) => v.partial_cmp(&param.parse::<f64>().ok()?),
        Value::Duration(d) => Some(d.cmp(&parse_duration(param).ok()?)),
        Value::Bool(_) => None,
        other => {
            let limit = param.parse::<i128>().ok()?;
            Some(measure(other)?.cmp(&limit))
        }
    }
}

fn measure(value: &Value) -> Option<i128> {
    Some(match value {
        Value::Str(s) => s.chars().count() as i128,
        Value::Uint(v) => i128::from(*v),
        Value::Int(v) => i128::from(*v),
        Value::Bytes(b) => b.len() as i128,
        Value::Strings(s) => s.len() as i128,
        Value::Bool(_) | Value::Float(_) | Value::Duration(_) => return None,
    })
}

/// Equality used by `eq`, `ne` and `oneof`: strings compare as text,
/// everything else like [`compare`].
fn equals(value: &Value, param: &str) -> Option<bool> {
    match value {
        Value::Str(s) => Some(s == param),
        Value::Bool(b) => param.parse::<bool>().ok().map(|p| p == *b),
        _ => compare(value, param).map(|o| o == Ordering::Equal),
    }
}

fn is_numeric(s: &str) -> bool {
    let unsigned = s.strip_prefix(['-', '+']).unwrap_or(s);
    let (whole, fraction) = match unsigned.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (unsigned, None),
    };
    let digits = |part: &str| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit());
    digits(whole) && fraction.map_or(true, digits)
}

/// RFC 1123 host name.
fn is_hostname(s: &str) -> bool {
    let s = s.strip_suffix('.').unwrap_or(s);
    !s.is_empty()
        && s.len() <= 253
        && s.split('.').all(|label| {
            !label.is_empty()
                && label.len() <= 63
                && !label.starts_with('-')
                && !label.ends_with('-')
                && label.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-')
        })
}

/// Split `host:port`, accepting `[v6]:port`. The port must fit in 16 bits.
fn split_host_port(s: &str) -> Option<(&str, u16)> {
    let (host, port) = if let Some(rest) = s.strip_prefix('[') {
        let (host, after) = rest.split_once(']')?;
        (host, after.strip_prefix(':')?)
    } else {
        let (host, port) = s.rsplit_once(':')?;
        if host.contains(':') {
            return None;
        }
        (host, port)
    };
    if port.is_empty() || !port.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some((host, port.parse().ok()?))
}
