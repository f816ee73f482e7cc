//! Readers for the four text files describing a vehicle.
//!
//! ```text
//! vertexes.txt                 <id>\t<x>\t<y>\t<z>
//! edges.txt                    <v0>-<v1>\t<kind>\t<points>\t<wiring>
//! panels.txt                   <id>\t<points>\t<e1>\t<e2>\t<e3>\t<v0>-><v1>\t<flipped>\t<outputs>
//! striping-instructions.txt    <id> <row length> [C<len>,<len>..] <L|R> <row code..>
//! ```
//!
//! Blank lines are skipped everywhere. Lines with too few columns are logged
//! and skipped.

use tracing::{debug, warn};

use crate::error::{ParseError, Result};
use crate::stripe::Side;
use crate::topology::{EdgeKind, OutputSpec, Socket};

/// One labeled point, in raw input units.
#[derive(Debug, Clone, PartialEq)]
pub struct VertexRecord {
    pub name: String,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// How an edge record says its strip is fed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WiringSpec {
    /// `<host>#<channel>[:<pixel offset>]`.
    Direct { socket: Socket, pixel_offset: usize },
    /// A bare edge id: data arrives through that edge.
    ChainedFrom(String),
    /// `uncontrolled`, a placeholder (`x10..`, anything with `?`), or a dark edge.
    Uncontrolled,
}

impl WiringSpec {
    /// Parses the wiring column of an edge record.
    ///
    /// # Errors
    ///
    /// Returns an error if a direct wiring has a malformed socket or offset.
    pub fn parse(text: &str) -> std::result::Result<Self, String> {
        if text == "uncontrolled" || text.starts_with("x10") || text.contains('?') {
            return Ok(Self::Uncontrolled);
        }
        if !text.contains('#') {
            return Ok(Self::ChainedFrom(text.into()));
        }
        let (socket, pixel_offset) = match text.split_once(':') {
            Some((socket, offset)) => (
                socket,
                offset
                    .parse()
                    .map_err(|_| format!("bad pixel offset in {text:?}"))?,
            ),
            None => (text, 0),
        };
        let socket = Socket::parse(socket).map_err(|e| e.to_string())?;
        Ok(Self::Direct {
            socket,
            pixel_offset,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeRecord {
    /// `<v0>-<v1>`.
    pub name: String,
    pub kind: EdgeKind,
    pub point_count: usize,
    pub wiring: WiringSpec,
}

impl EdgeRecord {
    /// Splits the edge id into its two vertex labels.
    #[must_use]
    pub fn vertex_names(&self) -> Option<(&str, &str)> {
        self.name.split_once('-')
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelRecord {
    pub name: String,
    pub point_count: usize,
    pub edges: [String; 3],
    /// Leading edge as written, `<v0>-><v1>`.
    pub leading_edge: String,
    pub v0: String,
    pub v1: String,
    pub flipped: bool,
    pub outputs: OutputSpec,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StripeRecord {
    pub panel_id: String,
    pub base_row_length: usize,
    pub custom_lengths: Vec<usize>,
    pub side: Side,
    pub code: String,
}

/// Non-blank lines with their 1-based line numbers.
fn lines(text: &str) -> impl Iterator<Item = (usize, &str)> {
    text.lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line))
        .filter(|(_, line)| !line.trim().is_empty())
}

fn columns(line: &str) -> Vec<&str> {
    line.trim().split('\t').map(str::trim).collect()
}

fn number<T: std::str::FromStr>(record: &'static str, line: usize, field: &str, text: &str) -> Result<T> {
    text.parse()
        .map_err(|_| ParseError::new(record, line, format!("bad {field} {text:?}")).into())
}

/// Parses `vertexes.txt`.
///
/// # Errors
///
/// Returns an error if a coordinate is not a number.
pub fn parse_vertices(text: &str) -> Result<Vec<VertexRecord>> {
    let mut records = Vec::new();
    for (line, content) in lines(text) {
        let cols = columns(content);
        if cols.len() < 4 {
            debug!(line, "skipping short vertex line");
            continue;
        }
        records.push(VertexRecord {
            name: cols[0].into(),
            x: number("vertex", line, "x", cols[1])?,
            y: number("vertex", line, "y", cols[2])?,
            z: number("vertex", line, "z", cols[3])?,
        });
    }
    Ok(records)
}

/// Parses `edges.txt`.
///
/// # Errors
///
/// Returns an error on an unknown edge kind, a non-numeric point count or a
/// malformed wiring column.
pub fn parse_edges(text: &str) -> Result<Vec<EdgeRecord>> {
    let mut records = Vec::new();
    for (line, content) in lines(text) {
        let cols = columns(content);
        if cols.len() < 4 {
            warn!(line, content, "invalid number of columns in edge");
            continue;
        }
        let kind = match cols[1] {
            "default" => EdgeKind::Default,
            "reversed" => EdgeKind::Reversed,
            "dark" => EdgeKind::Dark,
            other => {
                return Err(ParseError::new("edge", line, format!("unknown edge kind {other:?}")).into())
            }
        };
        let mut wiring =
            WiringSpec::parse(cols[3]).map_err(|message| ParseError::new("edge", line, message))?;
        if kind == EdgeKind::Dark && wiring != WiringSpec::Uncontrolled {
            warn!(edge = cols[0], "dark edge has wiring {:?}; treating as uncontrolled", cols[3]);
            wiring = WiringSpec::Uncontrolled;
        }
        records.push(EdgeRecord {
            name: cols[0].into(),
            kind,
            point_count: number("edge", line, "point count", cols[2])?,
            wiring,
        });
    }
    Ok(records)
}

/// Parses `panels.txt`.
///
/// # Errors
///
/// Returns an error on a non-numeric point count, a leading edge without
/// `->`, or a malformed output spec.
pub fn parse_panels(text: &str) -> Result<Vec<PanelRecord>> {
    let mut records = Vec::new();
    for (line, content) in lines(text) {
        let cols = columns(content);
        if cols.len() < 8 {
            warn!(line, content, "invalid number of columns in panel");
            continue;
        }
        let (v0, v1) = cols[5]
            .split_once("->")
            .ok_or_else(|| ParseError::new("panel", line, format!("bad leading edge {:?}", cols[5])))?;
        let outputs = OutputSpec::parse(cols[7])
            .map_err(|e| ParseError::new("panel", line, e.to_string()))?;
        records.push(PanelRecord {
            name: cols[0].into(),
            point_count: number("panel", line, "point count", cols[1])?,
            edges: [cols[2].into(), cols[3].into(), cols[4].into()],
            leading_edge: cols[5].into(),
            v0: v0.into(),
            v1: v1.into(),
            flipped: matches!(cols[6], "flipped" | "true" | "1"),
            outputs,
        });
    }
    Ok(records)
}

/// Removes `( .. )` comments, leaving one space in their place.
fn strip_comments(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut rest = line;
    while let Some(open) = rest.find('(') {
        let Some(close) = rest[open..].find(')') else {
            break;
        };
        out.push_str(&rest[..open]);
        out.push(' ');
        rest = &rest[open + close + 1..];
    }
    out.push_str(rest);
    out
}

/// Parses `striping-instructions.txt`.
///
/// Lines whose first token contains `.` are leftover controller addresses
/// and are ignored, as are lines with fewer than three tokens.
///
/// # Errors
///
/// Returns an error on a non-numeric row length or custom length, or a side
/// token other than `L`/`R`.
pub fn parse_stripes(text: &str) -> Result<Vec<StripeRecord>> {
    let mut records = Vec::new();
    for (line, content) in lines(text) {
        let content = strip_comments(content);
        let tokens: Vec<&str> = content.split_whitespace().collect();
        if tokens.len() < 3 {
            continue;
        }
        if tokens[0].contains('.') {
            debug!(line, token = tokens[0], "ignoring leftover striping IP");
            continue;
        }
        let base_row_length = number("stripe", line, "row length", tokens[1])?;
        let mut next = 2;
        let mut custom_lengths = Vec::new();
        if let Some(lengths) = tokens[next].strip_prefix('C') {
            custom_lengths = lengths
                .split(',')
                .map(|len| number("stripe", line, "custom length", len))
                .collect::<Result<_>>()?;
            next += 1;
        }
        let side = tokens
            .get(next)
            .ok_or_else(|| ParseError::new("stripe", line, "missing side token"))?
            .parse::<Side>()
            .map_err(|e| ParseError::new("stripe", line, e.to_string()))?;
        records.push(StripeRecord {
            panel_id: tokens[0].into(),
            base_row_length,
            custom_lengths,
            side,
            code: tokens[next + 1..].join(" "),
        });
    }
    Ok(records)
}
