// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Line-oriented tokenizer for report listings.
//!
//! Recognised lines:
//! - `Viga= <n> <id>`: opens a beam block.
//! - `/B= <m> /H= <m>`: section dimensions.
//! - `Vao= <n> [Xini= <xi>]`: span marker; following rows belong to it.
//! - a line holding the token `Xi`: shear table header, columns in any order.
//!   Rows bind to it by position; a row with fewer cells than the header binds
//!   each cell to the nearest header column by character offset.
//! - `REAC. APOIO`: opens the reactions table.
//! - blank or `===`: closes the open table.

use tracing::debug;

use super::{Reaction, Report, ReportBeam, ReportError, ShearRow};

const BEAM_KEY: &str = "Viga=";
const WIDTH_KEY: &str = "/B=";
const HEIGHT_KEY: &str = "/H=";
const SPAN_START_KEY: &str = "Xini=";
const REACTIONS_MARKER: &str = "REAC. APOIO";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ShearColumn {
    Xi,
    Xf,
    Vsd,
    AswMin,
    AswCt,
    Tie,
    Suspension,
}

impl ShearColumn {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "Xi" => Some(Self::Xi),
            "Xf" => Some(Self::Xf),
            "Vsd" => Some(Self::Vsd),
            "Aswmin" => Some(Self::AswMin),
            "Asw[C+T]" => Some(Self::AswCt),
            "AsTrt" => Some(Self::Tie),
            "AsSus" => Some(Self::Suspension),
            _ => None,
        }
    }
}

/// A shear header column and the doubled character offset of its midpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ColumnSlot {
    column: Option<ShearColumn>,
    center: usize,
}

/// Column positions of the reactions table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ReactionColumns {
    number: usize,
    max: usize,
    min: usize,
    width: usize,
    kind: usize,
    name: usize,
}

impl Default for ReactionColumns {
    // No. Maximos Minimos Largura DEPEV Morte Nome
    fn default() -> Self {
        Self {
            number: 0,
            max: 1,
            min: 2,
            width: 3,
            kind: 5,
            name: 6,
        }
    }
}

impl ReactionColumns {
    fn from_header(tokens: &[&str]) -> Self {
        let mut cols = Self::default();
        for (idx, tok) in tokens.iter().enumerate() {
            match *tok {
                "No." | "No" => cols.number = idx,
                "Maximos" | "Máximos" => cols.max = idx,
                "Minimos" | "Mínimos" => cols.min = idx,
                "Largura" => cols.width = idx,
                "Morte" => cols.kind = idx,
                "Nome" => cols.name = idx,
                _ => {}
            }
        }
        cols
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Table {
    None,
    Shear(Vec<ColumnSlot>),
    Reactions(ReactionColumns),
}

#[derive(Debug)]
struct Tokenizer {
    beams: Vec<ReportBeam>,
    table: Table,
    span: Option<u32>,
    span_start: Option<f64>,
}

/// Parses a report listing.
///
/// # Errors
/// [`ReportError::Empty`] when no beam header is present. Malformed or missing
/// values never fail the parse; they come back as `None`.
pub fn parse_report(text: &str) -> Result<Report, ReportError> {
    let mut tok = Tokenizer {
        beams: Vec::new(),
        table: Table::None,
        span: None,
        span_start: None,
    };
    for line in text.lines() {
        tok.line(line);
    }
    if tok.beams.is_empty() {
        return Err(ReportError::Empty);
    }
    debug!(beams = tok.beams.len(), "parsed report");
    Ok(Report { beams: tok.beams })
}

impl Tokenizer {
    fn line(&mut self, line: &str) {
        if line.contains(BEAM_KEY) {
            self.open_beam(line);
            return;
        }
        let Some(beam) = self.beams.last_mut() else {
            return;
        };
        if line.contains(WIDTH_KEY) || line.contains(HEIGHT_KEY) {
            if let Some(w) = value_after(line, WIDTH_KEY) {
                beam.width_m = Some(w);
            }
            if let Some(h) = value_after(line, HEIGHT_KEY) {
                beam.height_m = Some(h);
            }
            return;
        }
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if let Some((span, start)) = span_marker(line, &tokens) {
            self.span = span;
            self.span_start = start;
            return;
        }
        if line.contains(REACTIONS_MARKER) {
            self.table = Table::Reactions(ReactionColumns::default());
            return;
        }
        if tokens.is_empty() || line.contains("===") {
            self.table = Table::None;
            return;
        }
        if tokens.contains(&"Xi") {
            let slots = spanned_tokens(line)
                .into_iter()
                .filter(|(t, _)| !is_label(t))
                .map(|(t, center)| ColumnSlot {
                    column: ShearColumn::from_name(t),
                    center,
                })
                .collect();
            self.table = Table::Shear(slots);
            return;
        }
        match &mut self.table {
            Table::None => {}
            Table::Shear(slots) => {
                if let Some(row) = shear_row(slots, line, self.span, self.span_start) {
                    beam.rows.push(row);
                }
            }
            Table::Reactions(columns) => {
                if tokens.iter().any(|t| *t == "Morte" || *t == "Nome") {
                    *columns = ReactionColumns::from_header(&tokens);
                } else if let Some(reaction) = reaction_row(columns, &tokens) {
                    beam.reactions.push(reaction);
                }
            }
        }
    }

    fn open_beam(&mut self, line: &str) {
        let mut rest = after(line, BEAM_KEY).unwrap_or_default().split_whitespace();
        let number = rest.next().and_then(|t| t.parse::<u32>().ok());
        let id = rest
            .next()
            .map(str::to_owned)
            .or_else(|| number.map(|n| format!("V{n}")))
            .unwrap_or_default();
        if id.is_empty() {
            debug!(line, "beam header without identifier; block ignored");
            self.table = Table::None;
            return;
        }
        self.beams.push(ReportBeam {
            id,
            number,
            ..ReportBeam::default()
        });
        self.table = Table::None;
        self.span = None;
        self.span_start = None;
    }
}

fn shear_row(
    slots: &[ColumnSlot],
    line: &str,
    span: Option<u32>,
    span_start_xi: Option<f64>,
) -> Option<ShearRow> {
    let cells: Vec<(&str, usize)> = spanned_tokens(line)
        .into_iter()
        .skip_while(|(t, _)| is_unit(t))
        .collect();
    parse_number(cells.first()?.0)?;
    let bound: Vec<(Option<ShearColumn>, &str)> = if cells.len() >= slots.len() {
        slots
            .iter()
            .zip(&cells)
            .map(|(slot, (raw, _))| (slot.column, *raw))
            .collect()
    } else {
        debug!(
            cells = cells.len(),
            columns = slots.len(),
            "short shear row; binding by column offset"
        );
        bind_by_offset(slots, &cells)
    };
    let mut row = ShearRow {
        span,
        span_start_xi,
        ..ShearRow::default()
    };
    for (column, raw) in bound {
        let Some(column) = column else { continue };
        let value = parse_number(raw);
        let slot = match column {
            ShearColumn::Xi => &mut row.xi,
            ShearColumn::Xf => &mut row.xf,
            ShearColumn::Vsd => &mut row.vsd,
            ShearColumn::AswMin => &mut row.asw_min,
            ShearColumn::AswCt => &mut row.asw_ct,
            ShearColumn::Tie => &mut row.tie_area,
            ShearColumn::Suspension => &mut row.suspension_area,
        };
        *slot = value;
    }
    Some(row)
}

/// Binds each cell to the header slot nearest its midpoint. Slots are taken in
/// increasing order and each cell leaves enough slots for the cells after it.
fn bind_by_offset<'a>(
    slots: &[ColumnSlot],
    cells: &[(&'a str, usize)],
) -> Vec<(Option<ShearColumn>, &'a str)> {
    let mut next = 0;
    cells
        .iter()
        .enumerate()
        .filter_map(|(idx, &(raw, center))| {
            let last = slots.len().checked_sub(cells.len() - idx)?;
            let pick = (next..=last).min_by_key(|&j| slots[j].center.abs_diff(center))?;
            next = pick + 1;
            Some((slots[pick].column, raw))
        })
        .collect()
}

/// Whitespace-separated tokens with the doubled character offset of their
/// midpoint (`start + end`), counted in chars so accented labels line up.
fn spanned_tokens(line: &str) -> Vec<(&str, usize)> {
    let mut out = Vec::new();
    let mut open: Option<(usize, usize)> = None;
    let mut column = 0;
    for (byte, c) in line.char_indices() {
        match (c.is_whitespace(), open) {
            (true, Some((from, first))) => {
                out.push((&line[from..byte], first + column));
                open = None;
            }
            (false, None) => open = Some((byte, column)),
            _ => {}
        }
        column += 1;
    }
    if let Some((from, first)) = open {
        out.push((&line[from..], first + column));
    }
    out
}

fn reaction_row(columns: &ReactionColumns, tokens: &[&str]) -> Option<Reaction> {
    let number = tokens.get(columns.number)?.parse::<u32>().ok()?;
    let number_at = |idx: usize| tokens.get(idx).and_then(|t| parse_number(t));
    Some(Reaction {
        number: Some(number),
        max: number_at(columns.max),
        min: number_at(columns.min),
        width_m: number_at(columns.width),
        kind: tokens.get(columns.kind).and_then(|t| t.parse::<i64>().ok()),
        support: tokens.get(columns.name).map(|t| (*t).to_owned()),
    })
}

/// `Vao= 2 Xini= 350.0` (also `Vão=`, `VAO=2`). Returns `None` when the line is
/// not a span marker.
fn span_marker(line: &str, tokens: &[&str]) -> Option<(Option<u32>, Option<f64>)> {
    let first = tokens.first()?.to_lowercase();
    let inline = first
        .strip_prefix("vao=")
        .or_else(|| first.strip_prefix("vão="))?
        .to_owned();
    let number = if inline.is_empty() {
        tokens.get(1).and_then(|t| t.parse::<u32>().ok())
    } else {
        inline.parse::<u32>().ok()
    };
    Some((number, value_after(line, SPAN_START_KEY)))
}

fn after<'a>(line: &'a str, key: &str) -> Option<&'a str> {
    line.find(key).map(|pos| &line[pos + key.len()..])
}

/// Number following `key`, tolerating missing spaces (`/B=0.20/H=0.70`).
fn value_after(line: &str, key: &str) -> Option<f64> {
    let rest = after(line, key)?.trim_start();
    let end = rest
        .find(|c: char| !(c.is_ascii_digit() || matches!(c, '.' | ',' | '-' | '+')))
        .unwrap_or(rest.len());
    parse_number(&rest[..end])
}

/// Accepts `.` or `,` as decimal separator; rejects non-finite values.
fn parse_number(token: &str) -> Option<f64> {
    token
        .replace(',', ".")
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

/// Section labels such as `CISALHAMENTO-` or `Trecho:`.
fn is_label(token: &str) -> bool {
    token.len() > 1 && (token.ends_with('-') || token.ends_with(':'))
}

/// Unit prefixes such as `[tf,cm]`.
fn is_unit(token: &str) -> bool {
    token.starts_with('[') && token.ends_with(']')
}
