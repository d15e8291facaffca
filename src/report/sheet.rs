//! In-memory worksheet grid addressed by zero-based `(row, col)` coordinates.
//!
//! Layout code places values and styles on the grid; only `write_to` talks to
//! `rust_xlsxwriter`, so borders from outlines can be merged with cell styles
//! before any format is built.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_xlsxwriter::{Format, FormatAlign, FormatBorder, Worksheet, XlsxError};
use std::collections::{BTreeMap, BTreeSet};

pub const CURRENCY_FORMAT: &str = "$#,##0.00";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Cell {
    pub row: u32,
    pub col: u16,
}

impl Cell {
    pub const fn new(row: u32, col: u16) -> Self {
        Cell { row, col }
    }
}

/// Rectangle of cells, bounds inclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Range {
    pub first: Cell,
    pub last: Cell,
}

impl Range {
    pub const fn new(first: Cell, last: Cell) -> Self {
        Range { first, last }
    }

    pub fn contains(&self, cell: Cell) -> bool {
        (self.first.row..=self.last.row).contains(&cell.row)
            && (self.first.col..=self.last.col).contains(&cell.col)
    }

    fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        (self.first.row..=self.last.row)
            .flat_map(move |row| (self.first.col..=self.last.col).map(move |col| Cell::new(row, col)))
    }

    fn edge_cells(&self) -> impl Iterator<Item = Cell> + '_ {
        self.cells().filter(move |c| {
            c.row == self.first.row
                || c.row == self.last.row
                || c.col == self.first.col
                || c.col == self.last.col
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Text(String),
    Count(u32),
    Money(Decimal),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Style {
    pub bold: bool,
    pub centered: bool,
    /// Thin rule above, double rule below
    pub total: bool,
}

impl Style {
    pub const PLAIN: Style = Style {
        bold: false,
        centered: false,
        total: false,
    };
    pub const HEADING: Style = Style {
        bold: true,
        centered: true,
        total: false,
    };
    pub const LABEL: Style = Style {
        bold: true,
        centered: false,
        total: false,
    };
    pub const TOTAL: Style = Style {
        bold: true,
        centered: false,
        total: true,
    };
}

#[derive(Debug, Clone, PartialEq)]
pub struct SheetCell {
    pub value: Option<Value>,
    pub style: Style,
}

#[derive(Debug, Clone, PartialEq)]
struct Merge {
    range: Range,
    text: String,
    style: Style,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Edges {
    top: bool,
    bottom: bool,
    left: bool,
    right: bool,
}

#[derive(Debug, Default)]
pub struct Sheet {
    cells: BTreeMap<Cell, SheetCell>,
    merges: Vec<Merge>,
    outlines: Vec<Range>,
    column_widths: BTreeMap<u16, f64>,
}

impl Sheet {
    pub fn new() -> Self {
        Sheet::default()
    }

    pub fn put(&mut self, cell: Cell, value: Value, style: Style) {
        self.cells.insert(
            cell,
            SheetCell {
                value: Some(value),
                style,
            },
        );
    }

    pub fn text(&mut self, cell: Cell, text: impl Into<String>, style: Style) {
        self.put(cell, Value::Text(text.into()), style);
    }

    /// Styled cell with no value (e.g. the empty part of a total row)
    #[cfg(test)]
    pub fn blank(&mut self, cell: Cell, style: Style) {
        self.cells.insert(cell, SheetCell { value: None, style });
    }

    pub fn merge(&mut self, range: Range, text: impl Into<String>, style: Style) {
        self.merges.push(Merge {
            range,
            text: text.into(),
            style,
        });
    }

    /// Medium border around `range`
    pub fn outline(&mut self, range: Range) {
        self.outlines.push(range);
    }

    pub fn set_column_width(&mut self, col: u16, width: f64) {
        self.column_widths.insert(col, width);
    }

    #[cfg(test)]
    pub fn get(&self, cell: Cell) -> Option<&SheetCell> {
        self.cells.get(&cell)
    }

    /// Text of a cell or of the merged range it belongs to
    #[cfg(test)]
    pub fn text_at(&self, cell: Cell) -> Option<&str> {
        if let Some(merge) = self.merges.iter().find(|m| m.range.contains(cell)) {
            return Some(&merge.text);
        }
        match self.get(cell)?.value.as_ref()? {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    #[cfg(test)]
    pub fn value_at(&self, cell: Cell) -> Option<&Value> {
        self.get(cell)?.value.as_ref()
    }

    #[cfg(test)]
    pub fn last_row(&self) -> Option<u32> {
        self.cells.keys().map(|c| c.row).max()
    }

    /// Outline borders that apply to a cell
    fn edges(&self, cell: Cell) -> Edges {
        self.outlines
            .iter()
            .filter(|r| r.contains(cell))
            .fold(Edges::default(), |e, r| Edges {
                top: e.top || cell.row == r.first.row,
                bottom: e.bottom || cell.row == r.last.row,
                left: e.left || cell.col == r.first.col,
                right: e.right || cell.col == r.last.col,
            })
    }

    fn range_edges(&self, range: &Range) -> Edges {
        range.cells().fold(Edges::default(), |e, c| {
            let ce = self.edges(c);
            Edges {
                top: e.top || (ce.top && c.row == range.first.row),
                bottom: e.bottom || (ce.bottom && c.row == range.last.row),
                left: e.left || (ce.left && c.col == range.first.col),
                right: e.right || (ce.right && c.col == range.last.col),
            }
        })
    }

    /// Serialize the grid onto a worksheet
    pub fn write_to(&self, worksheet: &mut Worksheet) -> Result<(), XlsxError> {
        for (col, width) in &self.column_widths {
            worksheet.set_column_width(*col, *width)?;
        }

        for merge in &self.merges {
            let format = build_format(merge.style, false, self.range_edges(&merge.range));
            worksheet.merge_range(
                merge.range.first.row,
                merge.range.first.col,
                merge.range.last.row,
                merge.range.last.col,
                &merge.text,
                &format,
            )?;
        }

        // Outline edges with nothing written still need their border
        let outline_cells: BTreeSet<Cell> = self
            .outlines
            .iter()
            .flat_map(|r| r.edge_cells().collect::<Vec<_>>())
            .collect();
        let positions: BTreeSet<Cell> = self
            .cells
            .keys()
            .copied()
            .chain(outline_cells)
            .filter(|c| !self.merges.iter().any(|m| m.range.contains(*c)))
            .collect();

        for cell in positions {
            let (value, style) = match self.cells.get(&cell) {
                Some(sc) => (sc.value.as_ref(), sc.style),
                None => (None, Style::PLAIN),
            };
            let is_money = matches!(value, Some(Value::Money(_)));
            let format = build_format(style, is_money, self.edges(cell));

            match value {
                Some(Value::Text(s)) => {
                    worksheet.write_string_with_format(cell.row, cell.col, s, &format)?;
                }
                Some(Value::Count(n)) => {
                    worksheet.write_number_with_format(cell.row, cell.col, *n, &format)?;
                }
                Some(Value::Money(amount)) => {
                    let amount = amount.to_f64().unwrap_or_default();
                    worksheet.write_number_with_format(cell.row, cell.col, amount, &format)?;
                }
                None => {
                    worksheet.write_blank(cell.row, cell.col, &format)?;
                }
            }
        }

        Ok(())
    }
}

fn build_format(style: Style, currency: bool, edges: Edges) -> Format {
    let mut format = Format::new();

    if style.bold {
        format = format.set_bold();
    }
    if style.centered {
        format = format.set_align(FormatAlign::Center);
    }
    if currency {
        format = format.set_num_format(CURRENCY_FORMAT);
    }
    if style.total {
        format = format
            .set_border_top(FormatBorder::Thin)
            .set_border_bottom(FormatBorder::Double);
    }

    // Outline wins over the total rules on shared edges
    if edges.top {
        format = format.set_border_top(FormatBorder::Medium);
    }
    if edges.bottom {
        format = format.set_border_bottom(FormatBorder::Medium);
    }
    if edges.left {
        format = format.set_border_left(FormatBorder::Medium);
    }
    if edges.right {
        format = format.set_border_right(FormatBorder::Medium);
    }

    format
}
