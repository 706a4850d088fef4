//! A reader for `.dtoatest` conversion corpora.
//!
//! Each non-comment line is one case:
//!
//! ```text
//! <id> shortest <value> -> <digits> <decimal point>
//! <id> precision <value> <count> -> <digits> <decimal point>
//! <id> fixed <value> <count> -> <digits> <decimal point>
//! ```
//!
//! A value is either a Rust float literal or `#` followed by the
//! 16 hex digits of its big-endian bit pattern. Empty digits are
//! written as `''`. The comment `-- fast: N` records how many
//! cases the fast algorithm is expected to handle.

#![cfg(test)]

use std::{error, fmt};

use anyhow::{anyhow, bail, Context, Result};

use super::buffer::DtoaBuffer;

/// A parsed corpus.
#[derive(Clone, Debug)]
pub struct Suite<'a> {
    /// The expected number of fast-path successes, if recorded.
    pub fast: Option<usize>,
    pub cases: Vec<Case<'a>>,
}

pub fn parse(s: &str) -> Result<Suite<'_>> {
    let mut fast = None;
    let mut cases = Vec::new();
    for (i, line) in s.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(comment) = line.strip_prefix("--") {
            if let Some(v) = comment.trim().strip_prefix("fast:") {
                let n = v
                    .trim()
                    .parse()
                    .with_context(|| format!("#{i}: unable to parse `fast`: `{v}`"))?;
                fast = Some(n);
            }
            continue;
        }

        let case = Case::parse(line).with_context(|| format!("#{i}: invalid case: `{line}`"))?;
        cases.push(case);
    }
    if cases.is_empty() {
        bail!("no test cases");
    }
    Ok(Suite { fast, cases })
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Case<'a> {
    pub id: &'a str,
    pub op: Op,
    pub input: f64,
    pub digits: &'a str,
    pub decimal_point: i32,
}

impl<'a> Case<'a> {
    fn parse(line: &'a str) -> Result<Self> {
        let (lhs, rhs) = line.split_once("->").context("missing `->`")?;

        let mut fields = lhs.split_whitespace();
        let id = fields.next().context("missing id")?;
        let name = fields.next().context("missing op")?;
        let input = parse_input(fields.next().context("missing input")?)?;
        let op = match name {
            "shortest" => Op::Shortest,
            "precision" => Op::Precision(parse_count(fields.next())?),
            "fixed" => Op::Fixed(parse_count(fields.next())?),
            _ => bail!("unknown op: `{name}`"),
        };
        if let Some(extra) = fields.next() {
            bail!("unexpected field: `{extra}`");
        }

        let (digits, decimal_point) = rhs
            .trim()
            .split_once(' ')
            .context("missing decimal point")?;
        let digits = match digits {
            "''" => "",
            s if s.bytes().all(|c| c.is_ascii_digit()) => s,
            s => bail!("invalid digits: `{s}`"),
        };
        let decimal_point = decimal_point
            .trim()
            .parse()
            .with_context(|| format!("invalid decimal point: `{decimal_point}`"))?;

        Ok(Self {
            id,
            op,
            input,
            digits,
            decimal_point,
        })
    }

    /// Compares the digits and decimal point in `buf` with the
    /// expected output.
    pub fn check(&self, buf: &DtoaBuffer) -> Result<(), Failure<'_>> {
        self.try_check(buf)
            .map_err(|err| Failure { case: self, err })
    }

    fn try_check(&self, buf: &DtoaBuffer) -> Result<()> {
        let got = (buf.raw_digits(), buf.decimal_point());
        let want = (self.digits, self.decimal_point);
        if got != want {
            Err(anyhow!(
                "got {:?} {}, expected {:?} {}",
                got.0,
                got.1,
                want.0,
                want.1
            ))
        } else {
            Ok(())
        }
    }
}

impl fmt::Display for Case<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {:e} -> {:?} {}",
            self.id, self.op, self.input, self.digits, self.decimal_point
        )
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Op {
    Shortest,
    Precision(usize),
    Fixed(usize),
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Shortest => write!(f, "shortest"),
            Self::Precision(n) => write!(f, "precision {n}"),
            Self::Fixed(n) => write!(f, "fixed {n}"),
        }
    }
}

fn parse_count(s: Option<&str>) -> Result<usize> {
    let s = s.context("missing digit count")?;
    s.parse()
        .with_context(|| format!("invalid digit count: `{s}`"))
}

fn parse_input(s: &str) -> Result<f64> {
    let v = if let Some(s) = s.strip_prefix('#') {
        let bytes = hex::decode(s.as_bytes())?;
        let bits = u64::from_be_bytes(bytes.as_slice().try_into()?);
        f64::from_bits(bits)
    } else {
        s.parse()
            .with_context(|| format!("invalid float: `{s}`"))?
    };
    if !v.is_finite() || v <= 0.0 {
        bail!("input must be finite and positive: `{s}`");
    }
    Ok(v)
}

/// A test case failure.
pub struct Failure<'a> {
    case: &'a Case<'a>,
    err: anyhow::Error,
}

impl error::Error for Failure<'_> {}

impl fmt::Display for Failure<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "test failure for `{}`: {}", self.case, self.err)
    }
}

impl fmt::Debug for Failure<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}
