//! Evaluation of parsed literals into value trees
//!
//! Names resolve against a fixed environment: the constants `null`, `true`
//! and `false`, and the `datetime` namespace. Intermediate results may be
//! things JSON cannot hold (a `timedelta`, a `timezone`, a set); those are
//! rejected as soon as they would have to become part of the tree.

use chrono::{FixedOffset, NaiveDate, NaiveTime, Offset, Utc};
use jsonform_core::{Map, TimeOfDay, Timestamp, Value};

use super::error::EvalError;
use super::parser::Expr;
use crate::json::encode_json;

const MINYEAR: i64 = 1;
const MAXYEAR: i64 = 9999;

const MICROS_PER_SECOND: i128 = 1_000_000;
const MICROS_PER_DAY: i128 = 86_400 * MICROS_PER_SECOND;
const MAX_DELTA_DAYS: i128 = 999_999_999;

/// Evaluate a parsed expression to a value tree
pub fn eval(expr: &Expr) -> Result<Value, EvalError> {
    eval_expr(expr)?.into_value()
}

/// Constructors in the `datetime` namespace
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Class {
    DateTime,
    Date,
    Time,
    TimeDelta,
    TimeZone,
}

impl Class {
    fn name(self) -> &'static str {
        match self {
            Class::DateTime => "datetime",
            Class::Date => "date",
            Class::Time => "time",
            Class::TimeDelta => "timedelta",
            Class::TimeZone => "timezone",
        }
    }

    fn signature(self) -> Signature {
        let (params, required): (&'static [&'static str], usize) = match self {
            Class::DateTime => (
                &[
                    "year",
                    "month",
                    "day",
                    "hour",
                    "minute",
                    "second",
                    "microsecond",
                    "tzinfo",
                ],
                3,
            ),
            Class::Date => (&["year", "month", "day"], 3),
            Class::Time => (&["hour", "minute", "second", "microsecond", "tzinfo"], 0),
            Class::TimeDelta => (
                &[
                    "days",
                    "seconds",
                    "microseconds",
                    "milliseconds",
                    "minutes",
                    "hours",
                    "weeks",
                ],
                0,
            ),
            Class::TimeZone => (&["offset", "name"], 1),
        };
        Signature {
            name: self.name(),
            params,
            required,
        }
    }
}

/// Signed duration in microseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Delta(i128);

impl Delta {
    fn new(micros: i128) -> Result<Self, EvalError> {
        let delta = Delta(micros);
        let days = delta.days();
        if days.abs() > MAX_DELTA_DAYS {
            return Err(EvalError::range(format!(
                "days={}; must have magnitude <= {}",
                days, MAX_DELTA_DAYS
            )));
        }
        Ok(delta)
    }

    fn days(self) -> i128 {
        self.0.div_euclid(MICROS_PER_DAY)
    }

    fn seconds(self) -> i128 {
        self.0.rem_euclid(MICROS_PER_DAY) / MICROS_PER_SECOND
    }

    fn microseconds(self) -> i128 {
        self.0.rem_euclid(MICROS_PER_SECOND)
    }
}

/// Result of evaluating a sub-expression
#[derive(Debug, Clone, PartialEq)]
enum Obj {
    Value(Value),
    Tuple(Vec<Value>),
    Set,
    Delta(Delta),
    Zone(FixedOffset),
    Module,
    Class(Class),
}

impl Obj {
    fn type_name(&self) -> &'static str {
        match self {
            Obj::Value(v) => value_type_name(v),
            Obj::Tuple(_) => "tuple",
            Obj::Set => "set",
            Obj::Delta(_) => "timedelta",
            Obj::Zone(_) => "timezone",
            Obj::Module => "module",
            Obj::Class(_) => "type",
        }
    }

    fn into_value(self) -> Result<Value, EvalError> {
        match self {
            Obj::Value(v) => Ok(v),
            Obj::Tuple(items) => Ok(Value::Array(items)),
            other => Err(EvalError::NotSerializable(other.type_name())),
        }
    }
}

fn value_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "NoneType",
        Value::Bool(_) => "bool",
        Value::Int(_) => "int",
        Value::Float(_) => "float",
        Value::Decimal(_) => "Decimal",
        Value::String(_) => "str",
        Value::Bytes(_) => "bytes",
        Value::Date(_) => "date",
        Value::Time(_) => "time",
        Value::DateTime(_) => "datetime",
        Value::Array(_) => "list",
        Value::Object(_) => "dict",
    }
}

fn eval_expr(expr: &Expr) -> Result<Obj, EvalError> {
    Ok(match expr {
        Expr::None(_) => Obj::Value(Value::Null),
        Expr::Bool(b, _) => Obj::Value(Value::Bool(*b)),
        Expr::Int(n, _) => Obj::Value(Value::Int(int_in_range(*n)?)),
        Expr::Float(f, _) => Obj::Value(Value::Float(*f)),
        Expr::Str(s, _) => Obj::Value(Value::String(s.clone())),
        Expr::Bytes(b, _) => Obj::Value(Value::Bytes(b.clone())),
        Expr::Name(name, _) => lookup(name)?,
        Expr::List(items, _) => Obj::Value(Value::Array(eval_items(items)?)),
        Expr::Tuple(items, _) => Obj::Tuple(eval_items(items)?),
        Expr::Set(items, _) => {
            for item in items {
                let item = eval_expr(item)?;
                if let Obj::Value(Value::Array(_) | Value::Object(_)) | Obj::Set = item {
                    return Err(unhashable(&item));
                }
            }
            Obj::Set
        }
        Expr::Dict(entries, _) => {
            let mut map = Map::with_capacity(entries.len());
            for (key, value) in entries {
                let key = dict_key(eval_expr(key)?)?;
                let value = eval_expr(value)?.into_value()?;
                map.insert(key, value);
            }
            Obj::Value(Value::Object(map))
        }
        Expr::Attribute(target, name, _) => attribute(eval_expr(target)?, name)?,
        Expr::Call {
            func,
            args,
            keywords,
            ..
        } => {
            let func = eval_expr(func)?;
            let args = args.iter().map(eval_expr).collect::<Result<Vec<_>, _>>()?;
            let keywords = keywords
                .iter()
                .map(|(name, value)| Ok((name.clone(), eval_expr(value)?)))
                .collect::<Result<Vec<_>, EvalError>>()?;
            call(func, args, keywords)?
        }
        Expr::Neg(operand, _) => match operand.as_ref() {
            // Folded so that the most negative i64 is reachable
            Expr::Int(n, _) => Obj::Value(Value::Int(int_in_range(-*n)?)),
            other => negate(eval_expr(other)?)?,
        },
        Expr::Pos(operand, _) => positive(eval_expr(operand)?)?,
    })
}

fn eval_items(items: &[Expr]) -> Result<Vec<Value>, EvalError> {
    items
        .iter()
        .map(|item| eval_expr(item)?.into_value())
        .collect()
}

fn int_in_range(n: i128) -> Result<i64, EvalError> {
    i64::try_from(n).map_err(|_| EvalError::range(format!("integer {} is out of range", n)))
}

fn unhashable(obj: &Obj) -> EvalError {
    EvalError::type_error(format!("unhashable type: '{}'", obj.type_name()))
}

/// Object keys become strings the way JSON serializers write them
fn dict_key(key: Obj) -> Result<String, EvalError> {
    match key {
        Obj::Value(Value::String(s)) => Ok(s),
        Obj::Value(Value::Int(n)) => Ok(n.to_string()),
        Obj::Value(Value::Bool(b)) => Ok(b.to_string()),
        Obj::Value(Value::Null) => Ok("null".to_string()),
        Obj::Value(Value::Float(f)) => {
            encode_json(&Value::Float(f)).map_err(|e| EvalError::range(e.to_string()))
        }
        Obj::Value(Value::Array(_) | Value::Object(_)) | Obj::Set => Err(unhashable(&key)),
        other => Err(EvalError::type_error(format!(
            "keys must be str, int, float, bool or None, not {}",
            other.type_name()
        ))),
    }
}

fn lookup(name: &str) -> Result<Obj, EvalError> {
    match name {
        "null" => Ok(Obj::Value(Value::Null)),
        "true" => Ok(Obj::Value(Value::Bool(true))),
        "false" => Ok(Obj::Value(Value::Bool(false))),
        "datetime" => Ok(Obj::Module),
        _ => Err(EvalError::UndefinedName(name.to_string())),
    }
}

fn attribute(target: Obj, name: &str) -> Result<Obj, EvalError> {
    let found = match &target {
        Obj::Module => match name {
            "datetime" => Some(Obj::Class(Class::DateTime)),
            "date" => Some(Obj::Class(Class::Date)),
            "time" => Some(Obj::Class(Class::Time)),
            "timedelta" => Some(Obj::Class(Class::TimeDelta)),
            "timezone" => Some(Obj::Class(Class::TimeZone)),
            "MINYEAR" => Some(Obj::Value(Value::Int(MINYEAR))),
            "MAXYEAR" => Some(Obj::Value(Value::Int(MAXYEAR))),
            _ => {
                return Err(EvalError::Attribute(format!(
                    "module 'datetime' has no attribute '{}'",
                    name
                )))
            }
        },
        Obj::Class(class) => match (class, name) {
            (Class::TimeZone, "utc") => Some(Obj::Zone(utc())),
            _ => {
                return Err(EvalError::Attribute(format!(
                    "type object '{}' has no attribute '{}'",
                    class.name(),
                    name
                )))
            }
        },
        Obj::Value(value) => value_attribute(value, name).map(|n| Obj::Value(Value::Int(n))),
        Obj::Delta(delta) => {
            let n = match name {
                "days" => Some(delta.days()),
                "seconds" => Some(delta.seconds()),
                "microseconds" => Some(delta.microseconds()),
                _ => None,
            };
            match n {
                Some(n) => Some(Obj::Value(Value::Int(int_in_range(n)?))),
                None => None,
            }
        }
        Obj::Tuple(_) | Obj::Set | Obj::Zone(_) => None,
    };

    found.ok_or_else(|| {
        EvalError::Attribute(format!(
            "'{}' object has no attribute '{}'",
            target.type_name(),
            name
        ))
    })
}

/// Calendar and clock fields of temporal values
fn value_attribute(value: &Value, name: &str) -> Option<i64> {
    use chrono::{Datelike, Timelike};

    let (date, time) = match value {
        Value::Date(d) => (Some(*d), None),
        Value::Time(t) => (None, Some(t.time())),
        Value::DateTime(ts) => (Some(ts.date()), Some(ts.time())),
        _ => return None,
    };
    let n = match name {
        "year" => date?.year() as i64,
        "month" => date?.month() as i64,
        "day" => date?.day() as i64,
        "hour" => time?.hour() as i64,
        "minute" => time?.minute() as i64,
        "second" => time?.second() as i64,
        "microsecond" => (time?.nanosecond() / 1_000) as i64,
        _ => return None,
    };
    Some(n)
}

fn negate(obj: Obj) -> Result<Obj, EvalError> {
    match obj {
        Obj::Value(Value::Int(n)) => Ok(Obj::Value(Value::Int(int_in_range(-(n as i128))?))),
        Obj::Value(Value::Bool(b)) => Ok(Obj::Value(Value::Int(-(b as i64)))),
        Obj::Value(Value::Float(f)) => Ok(Obj::Value(Value::Float(-f))),
        Obj::Delta(delta) => Ok(Obj::Delta(Delta::new(-delta.0)?)),
        other => Err(EvalError::type_error(format!(
            "bad operand type for unary -: '{}'",
            other.type_name()
        ))),
    }
}

fn positive(obj: Obj) -> Result<Obj, EvalError> {
    match obj {
        Obj::Value(Value::Bool(b)) => Ok(Obj::Value(Value::Int(b as i64))),
        obj @ (Obj::Value(Value::Int(_) | Value::Float(_)) | Obj::Delta(_)) => Ok(obj),
        other => Err(EvalError::type_error(format!(
            "bad operand type for unary +: '{}'",
            other.type_name()
        ))),
    }
}

// === Calls ===

struct Signature {
    name: &'static str,
    params: &'static [&'static str],
    required: usize,
}

impl Signature {
    /// Match arguments to parameters by position, then by name
    fn bind(
        &self,
        args: Vec<Obj>,
        keywords: Vec<(String, Obj)>,
    ) -> Result<Vec<Option<Obj>>, EvalError> {
        if args.len() > self.params.len() {
            return Err(EvalError::type_error(format!(
                "{}() takes at most {} argument{} ({} given)",
                self.name,
                self.params.len(),
                if self.params.len() == 1 { "" } else { "s" },
                args.len()
            )));
        }

        let positional = args.len();
        let mut bound: Vec<Option<Obj>> = args.into_iter().map(Some).collect();
        bound.resize(self.params.len(), None);

        for (name, value) in keywords {
            let Some(index) = self.params.iter().position(|p| *p == name) else {
                return Err(EvalError::type_error(format!(
                    "'{}' is an invalid keyword argument for {}()",
                    name, self.name
                )));
            };
            if index < positional {
                return Err(EvalError::type_error(format!(
                    "argument for {}() given by name ('{}') and position ({})",
                    self.name,
                    name,
                    index + 1
                )));
            }
            bound[index] = Some(value);
        }

        if let Some(missing) = (0..self.required).find(|&i| bound[i].is_none()) {
            return Err(EvalError::type_error(format!(
                "{}() missing required argument '{}' (pos {})",
                self.name,
                self.params[missing],
                missing + 1
            )));
        }
        Ok(bound)
    }
}

fn call(func: Obj, args: Vec<Obj>, keywords: Vec<(String, Obj)>) -> Result<Obj, EvalError> {
    let Obj::Class(class) = func else {
        return Err(EvalError::NotCallable(func.type_name()));
    };
    let mut bound = class.signature().bind(args, keywords)?.into_iter();
    let mut next = || bound.next().flatten();

    match class {
        Class::Date => {
            let date = make_date(int_arg(next())?, int_arg(next())?, int_arg(next())?)?;
            Ok(Obj::Value(Value::Date(date)))
        }
        Class::DateTime => {
            let date = make_date(int_arg(next())?, int_arg(next())?, int_arg(next())?)?;
            let time = make_time(
                opt_int_arg(next())?,
                opt_int_arg(next())?,
                opt_int_arg(next())?,
                opt_int_arg(next())?,
            )?;
            let datetime = date.and_time(time);
            let ts = match tzinfo_arg(next())? {
                Some(offset) => Timestamp::aware(datetime, offset),
                None => Timestamp::naive(datetime),
            };
            Ok(Obj::Value(Value::DateTime(ts)))
        }
        Class::Time => {
            let time = make_time(
                opt_int_arg(next())?,
                opt_int_arg(next())?,
                opt_int_arg(next())?,
                opt_int_arg(next())?,
            )?;
            let time = match tzinfo_arg(next())? {
                Some(offset) => TimeOfDay::aware(time, offset),
                None => TimeOfDay::naive(time),
            };
            Ok(Obj::Value(Value::Time(time)))
        }
        Class::TimeDelta => {
            // Microseconds per unit, in parameter order
            const SCALE: [f64; 7] = [86_400e6, 1e6, 1.0, 1e3, 60e6, 3_600e6, 604_800e6];
            let params = class.signature().params;
            let mut micros: i128 = 0;
            let mut fraction: f64 = 0.0;
            for (scale, param) in SCALE.iter().zip(params) {
                match delta_component(next(), param)? {
                    Component::Int(n) => micros += n as i128 * *scale as i128,
                    Component::Float(f) => fraction += f * scale,
                }
            }
            if !fraction.is_finite() || fraction.abs() > 1e20 {
                return Err(EvalError::range("cannot convert float to timedelta"));
            }
            Ok(Obj::Delta(Delta::new(micros + fraction.round() as i128)?))
        }
        Class::TimeZone => {
            let offset = match next() {
                Some(Obj::Delta(delta)) => delta,
                other => {
                    return Err(EvalError::type_error(format!(
                        "timezone() argument 1 must be datetime.timedelta, not {}",
                        other.map_or("NoneType", |o| o.type_name())
                    )))
                }
            };
            match next() {
                None | Some(Obj::Value(Value::String(_))) => {}
                Some(other) => {
                    return Err(EvalError::type_error(format!(
                        "timezone() argument 2 must be str, not {}",
                        other.type_name()
                    )))
                }
            }
            make_offset(offset).map(Obj::Zone)
        }
    }
}

fn utc() -> FixedOffset {
    Utc.fix()
}

/// Integer argument; booleans count as 0 and 1
fn int_arg(arg: Option<Obj>) -> Result<i64, EvalError> {
    match arg {
        Some(Obj::Value(Value::Int(n))) => Ok(n),
        Some(Obj::Value(Value::Bool(b))) => Ok(b as i64),
        Some(other) => Err(EvalError::type_error(format!(
            "'{}' object cannot be interpreted as an integer",
            other.type_name()
        ))),
        None => Err(EvalError::type_error("an integer is required")),
    }
}

fn opt_int_arg(arg: Option<Obj>) -> Result<i64, EvalError> {
    match arg {
        None => Ok(0),
        some => int_arg(some),
    }
}

fn tzinfo_arg(arg: Option<Obj>) -> Result<Option<FixedOffset>, EvalError> {
    match arg {
        None | Some(Obj::Value(Value::Null)) => Ok(None),
        Some(Obj::Zone(offset)) => Ok(Some(offset)),
        Some(other) => Err(EvalError::type_error(format!(
            "tzinfo argument must be None or of a tzinfo subclass, not type '{}'",
            other.type_name()
        ))),
    }
}

enum Component {
    Int(i64),
    Float(f64),
}

fn delta_component(arg: Option<Obj>, param: &str) -> Result<Component, EvalError> {
    match arg {
        None => Ok(Component::Int(0)),
        Some(Obj::Value(Value::Int(n))) => Ok(Component::Int(n)),
        Some(Obj::Value(Value::Bool(b))) => Ok(Component::Int(b as i64)),
        Some(Obj::Value(Value::Float(f))) => Ok(Component::Float(f)),
        Some(other) => Err(EvalError::type_error(format!(
            "unsupported type for timedelta {} component: {}",
            param,
            other.type_name()
        ))),
    }
}

fn in_range(value: i64, lo: i64, hi: i64, name: &str) -> Result<u32, EvalError> {
    if (lo..=hi).contains(&value) {
        Ok(value as u32)
    } else {
        Err(EvalError::range(format!("{} must be in {}..{}", name, lo, hi)))
    }
}

fn make_date(year: i64, month: i64, day: i64) -> Result<NaiveDate, EvalError> {
    if !(MINYEAR..=MAXYEAR).contains(&year) {
        return Err(EvalError::range(format!("year {} is out of range", year)));
    }
    let month = in_range(month, 1, 12, "month")?;
    let day = u32::try_from(day).unwrap_or(0);
    NaiveDate::from_ymd_opt(year as i32, month, day)
        .ok_or_else(|| EvalError::range("day is out of range for month"))
}

fn make_time(hour: i64, minute: i64, second: i64, micro: i64) -> Result<NaiveTime, EvalError> {
    let hour = in_range(hour, 0, 23, "hour")?;
    let minute = in_range(minute, 0, 59, "minute")?;
    let second = in_range(second, 0, 59, "second")?;
    let micro = in_range(micro, 0, 999_999, "microsecond")?;
    NaiveTime::from_hms_micro_opt(hour, minute, second, micro)
        .ok_or_else(|| EvalError::range("time is out of range"))
}

fn make_offset(delta: Delta) -> Result<FixedOffset, EvalError> {
    if delta.0.abs() >= MICROS_PER_DAY {
        return Err(EvalError::range(
            "offset must be a timedelta strictly between \
             -timedelta(hours=24) and timedelta(hours=24)",
        ));
    }
    if delta.0 % MICROS_PER_SECOND != 0 {
        return Err(EvalError::range("offset must be a whole number of seconds"));
    }
    FixedOffset::east_opt((delta.0 / MICROS_PER_SECOND) as i32)
        .ok_or_else(|| EvalError::range("offset is out of range"))
}
