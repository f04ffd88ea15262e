//! Table models: the structure that augmentation mutates.
//!
//! A table is a grayscale crop tiled by row blocks and column blocks. Row
//! blocks partition the crop height, column blocks partition its width, and
//! every cell of the ground truth refers to an inclusive range of block
//! indices on each axis. Duplicating or deleting a block edits the pixels,
//! the cells and the OCR words together so the three stay consistent.

use crate::core::TableError;
use crate::domain::ground_truth::{TABLE_ELEMENT, XmlElement};
use crate::domain::word::{ImageShape, WordBox};
use crate::utils::{crop_region, insert_strip, remove_strip};
use image::GrayImage;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// Direction along which blocks are duplicated or removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    Row,
    Column,
}

impl Axis {
    pub fn name(self) -> &'static str {
        match self {
            Axis::Row => "row",
            Axis::Column => "column",
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Half-open pixel interval `[start, end)` of one block in crop coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Block {
    pub start: u32,
    pub end: u32,
}

impl Block {
    pub fn len(&self) -> u32 {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    pub fn contains(&self, p: i32) -> bool {
        p >= self.start as i32 && p < self.end as i32
    }
}

/// Inclusive range of block indices covered by a cell on one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn single(index: usize) -> Self {
        Self {
            start: index,
            end: index,
        }
    }

    pub fn covers(&self, index: usize) -> bool {
        self.start <= index && index <= self.end
    }

    pub fn is_single(&self) -> bool {
        self.start == self.end
    }
}

/// A ground-truth cell addressed by block indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridCell {
    pub rows: Span,
    pub columns: Span,
    pub text: String,
    /// Attributes other than geometry and indices (e.g. `dontCare`), kept
    /// verbatim.
    pub extra: Vec<(String, String)>,
}

impl GridCell {
    pub fn span(&self, axis: Axis) -> Span {
        match axis {
            Axis::Row => self.rows,
            Axis::Column => self.columns,
        }
    }

    fn span_mut(&mut self, axis: Axis) -> &mut Span {
        match axis {
            Axis::Row => &mut self.rows,
            Axis::Column => &mut self.columns,
        }
    }
}

/// Operations the augmentation policy needs from a table.
///
/// Implementations own the crop, its block structure and the OCR words
/// relocalized to the crop. Row and column counts never drop below one.
pub trait TableModel: Sized {
    /// Builds the model for one table region of a page.
    ///
    /// `words` are the OCR words of the whole page in page coordinates.
    fn from_region(
        page: &GrayImage,
        region: &XmlElement,
        words: &[WordBox],
    ) -> Result<Self, TableError>;

    /// Blocks along `axis`, in order.
    fn blocks(&self, axis: Axis) -> &[Block];

    fn block_count(&self, axis: Axis) -> usize {
        self.blocks(axis).len()
    }

    /// The current crop.
    fn image(&self) -> &GrayImage;

    fn shape(&self) -> ImageShape {
        ImageShape::of(self.image())
    }

    /// OCR words in crop coordinates.
    fn words(&self) -> &[WordBox];

    /// Inserts a copy of block `source` so that it becomes block `target`.
    fn replicate(&mut self, source: usize, target: usize, axis: Axis) -> Result<(), TableError>;

    /// Deletes block `index`.
    fn remove(&mut self, index: usize, axis: Axis) -> Result<(), TableError>;

    /// Serializes the current structure as a `Table` element in crop
    /// coordinates, or `None` when the structure is no longer valid.
    fn to_xml(&self) -> Option<XmlElement>;
}

const GEOMETRY_KEYS: [&str; 4] = ["x0", "y0", "x1", "y1"];
const INDEX_KEYS: [&str; 4] = ["startRow", "endRow", "startCol", "endCol"];

/// Table model over the row/column/cell ground-truth schema.
///
/// `Row` and `Column` children are separator lines (a `Row` at `y0`, a
/// `Column` at `x0`); separators strictly inside the table split it into
/// blocks.
#[derive(Debug, Clone)]
pub struct GridTable {
    image: GrayImage,
    rows: Vec<Block>,
    columns: Vec<Block>,
    cells: Vec<GridCell>,
    words: Vec<WordBox>,
    /// Table attributes other than geometry (e.g. `orientation`).
    attributes: Vec<(String, String)>,
}

impl GridTable {
    pub fn cells(&self) -> &[GridCell] {
        &self.cells
    }

    pub fn attributes(&self) -> &[(String, String)] {
        &self.attributes
    }

    fn blocks_mut(&mut self, axis: Axis) -> &mut Vec<Block> {
        match axis {
            Axis::Row => &mut self.rows,
            Axis::Column => &mut self.columns,
        }
    }

    fn check_index(&self, axis: Axis, index: usize, len: usize) -> Result<(), TableError> {
        if index >= len {
            Err(TableError::IndexOutOfRange {
                axis: axis.name(),
                index,
                len: self.block_count(axis),
            })
        } else {
            Ok(())
        }
    }

    /// Keeps words inside the crop after an edit moved the borders.
    fn clip_words(&mut self) {
        let (width, height) = self.image.dimensions();
        let (width, height) = (width as i32, height as i32);
        for word in &mut self.words {
            word.left = word.left.clamp(0, width);
            word.right = word.right.clamp(0, width);
            word.top = word.top.clamp(0, height);
            word.bottom = word.bottom.clamp(0, height);
        }
        self.words
            .retain(|word| word.right > word.left && word.bottom > word.top);
    }

    /// Cells may not leave the grid or share a grid slot.
    fn has_valid_cells(&self) -> bool {
        let (n_rows, n_cols) = (self.rows.len(), self.columns.len());
        let mut occupied = vec![false; n_rows * n_cols];
        for cell in &self.cells {
            if cell.rows.start > cell.rows.end
                || cell.columns.start > cell.columns.end
                || cell.rows.end >= n_rows
                || cell.columns.end >= n_cols
            {
                return false;
            }
            for r in cell.rows.start..=cell.rows.end {
                for c in cell.columns.start..=cell.columns.end {
                    let slot = &mut occupied[r * n_cols + c];
                    if *slot {
                        return false;
                    }
                    *slot = true;
                }
            }
        }
        true
    }
}

impl TableModel for GridTable {
    fn from_region(
        page: &GrayImage,
        region: &XmlElement,
        words: &[WordBox],
    ) -> Result<Self, TableError> {
        let (page_width, page_height) = page.dimensions();
        let left = coordinate(region, "x0")?.clamp(0, page_width as i64) as u32;
        let top = coordinate(region, "y0")?.clamp(0, page_height as i64) as u32;
        let right = coordinate(region, "x1")?.clamp(0, page_width as i64) as u32;
        let bottom = coordinate(region, "y1")?.clamp(0, page_height as i64) as u32;
        if right <= left || bottom <= top {
            return Err(invalid(format!(
                "empty region ({left}, {top})-({right}, {bottom}) on a {page_width}x{page_height} page"
            )));
        }
        let (width, height) = (right - left, bottom - top);

        let rows = blocks_from_separators(region, "Row", "y0", top, height)?;
        let columns = blocks_from_separators(region, "Column", "x0", left, width)?;

        let mut cells = Vec::new();
        for cell in region.children_named("Cell") {
            let rows_span = span(cell, "startRow", "endRow", rows.len())?;
            let columns_span = span(cell, "startCol", "endCol", columns.len())?;
            cells.push(GridCell {
                rows: rows_span,
                columns: columns_span,
                text: cell.text.clone(),
                extra: cell
                    .attributes
                    .iter()
                    .filter(|(k, _)| {
                        !GEOMETRY_KEYS.contains(&k.as_str()) && !INDEX_KEYS.contains(&k.as_str())
                    })
                    .cloned()
                    .collect(),
            });
        }

        let bounds = Block {
            start: 0,
            end: width,
        };
        let vertical = Block {
            start: 0,
            end: height,
        };
        let words = words
            .iter()
            .map(|word| word.translated(-(left as i32), -(top as i32)))
            .filter(|word| {
                let (cx, cy) = word.center();
                bounds.contains(cx) && vertical.contains(cy)
            })
            .collect();

        let mut table = Self {
            image: crop_region(page, left, top, width, height),
            rows,
            columns,
            cells,
            words,
            attributes: region
                .attributes
                .iter()
                .filter(|(k, _)| !GEOMETRY_KEYS.contains(&k.as_str()))
                .cloned()
                .collect(),
        };
        table.clip_words();
        debug!(
            "Table region {width}x{height}: {} rows, {} columns, {} cells, {} words",
            table.rows.len(),
            table.columns.len(),
            table.cells.len(),
            table.words.len()
        );
        Ok(table)
    }

    fn blocks(&self, axis: Axis) -> &[Block] {
        match axis {
            Axis::Row => &self.rows,
            Axis::Column => &self.columns,
        }
    }

    fn image(&self) -> &GrayImage {
        &self.image
    }

    fn words(&self) -> &[WordBox] {
        &self.words
    }

    fn replicate(&mut self, source: usize, target: usize, axis: Axis) -> Result<(), TableError> {
        let n = self.block_count(axis);
        self.check_index(axis, source, n)?;
        self.check_index(axis, target, n + 1)?;
        if self.cells.iter().any(|cell| {
            let span = cell.span(axis);
            span.covers(source) && !span.is_single()
        }) {
            return Err(TableError::SpannedBlock {
                axis: axis.name(),
                index: source,
            });
        }

        let blocks = self.blocks(axis);
        let copied = blocks[source];
        let offset = blocks.get(target).map_or(blocks[n - 1].end, |b| b.start);
        let len = copied.len();

        self.image = insert_strip(&self.image, axis, copied.start..copied.end, offset);

        let delta = offset as i32 - copied.start as i32;
        let word_copies: Vec<WordBox> = self
            .words
            .iter()
            .filter(|word| copied.contains(along(word, axis)))
            .map(|word| shift(word, axis, delta))
            .collect();
        for word in &mut self.words {
            if along(word, axis) >= offset as i32 {
                *word = shift(word, axis, len as i32);
            }
        }
        self.words.extend(word_copies);

        let cell_copies: Vec<GridCell> = self
            .cells
            .iter()
            .filter(|cell| cell.span(axis) == Span::single(source))
            .map(|cell| {
                let mut copy = cell.clone();
                *copy.span_mut(axis) = Span::single(target);
                copy
            })
            .collect();
        for cell in &mut self.cells {
            let span = cell.span_mut(axis);
            if span.start >= target {
                span.start += 1;
                span.end += 1;
            } else if span.end >= target {
                span.end += 1;
            }
        }
        self.cells.extend(cell_copies);

        let mut sizes: Vec<u32> = self.blocks(axis).iter().map(Block::len).collect();
        sizes.insert(target, len);
        *self.blocks_mut(axis) = tile(&sizes);

        self.clip_words();
        Ok(())
    }

    fn remove(&mut self, index: usize, axis: Axis) -> Result<(), TableError> {
        let n = self.block_count(axis);
        if n <= 1 {
            return Err(TableError::LastBlock { axis: axis.name() });
        }
        self.check_index(axis, index, n)?;

        let removed = self.blocks(axis)[index];
        let len = removed.len();

        self.image = remove_strip(&self.image, axis, removed.start..removed.end);

        self.words
            .retain(|word| !removed.contains(along(word, axis)));
        for word in &mut self.words {
            if along(word, axis) >= removed.end as i32 {
                *word = shift(word, axis, -(len as i32));
            }
        }

        self.cells
            .retain(|cell| cell.span(axis) != Span::single(index));
        for cell in &mut self.cells {
            let span = cell.span_mut(axis);
            if span.start > index {
                span.start -= 1;
                span.end -= 1;
            } else if span.end >= index {
                span.end -= 1;
            }
        }

        let mut sizes: Vec<u32> = self.blocks(axis).iter().map(Block::len).collect();
        sizes.remove(index);
        *self.blocks_mut(axis) = tile(&sizes);

        self.clip_words();
        Ok(())
    }

    fn to_xml(&self) -> Option<XmlElement> {
        if self.rows.is_empty() || self.columns.is_empty() || !self.has_valid_cells() {
            return None;
        }
        let (width, height) = self.image.dimensions();

        let mut table = XmlElement::new(TABLE_ELEMENT)
            .with_attribute("x0", 0)
            .with_attribute("y0", 0)
            .with_attribute("x1", width)
            .with_attribute("y1", height);
        for (key, value) in &self.attributes {
            table.set_attribute(key.as_str(), value);
        }

        for row in &self.rows[1..] {
            table.children.push(
                XmlElement::new("Row")
                    .with_attribute("x0", 0)
                    .with_attribute("y0", row.start)
                    .with_attribute("x1", width)
                    .with_attribute("y1", row.start),
            );
        }
        for column in &self.columns[1..] {
            table.children.push(
                XmlElement::new("Column")
                    .with_attribute("x0", column.start)
                    .with_attribute("y0", 0)
                    .with_attribute("x1", column.start)
                    .with_attribute("y1", height),
            );
        }

        for cell in &self.cells {
            let mut element = XmlElement::new("Cell")
                .with_attribute("x0", self.columns[cell.columns.start].start)
                .with_attribute("y0", self.rows[cell.rows.start].start)
                .with_attribute("x1", self.columns[cell.columns.end].end)
                .with_attribute("y1", self.rows[cell.rows.end].end)
                .with_attribute("startRow", cell.rows.start)
                .with_attribute("endRow", cell.rows.end)
                .with_attribute("startCol", cell.columns.start)
                .with_attribute("endCol", cell.columns.end)
                .with_text(cell.text.clone());
            element.attributes.extend(cell.extra.iter().cloned());
            table.children.push(element);
        }

        Some(table)
    }
}

fn invalid(message: impl Into<String>) -> TableError {
    TableError::InvalidRegion {
        message: message.into(),
    }
}

/// Reads a pixel coordinate; fractional values are floored.
fn coordinate(element: &XmlElement, key: &str) -> Result<i64, TableError> {
    let raw = element
        .attribute(key)
        .ok_or_else(|| invalid(format!("<{}> is missing '{key}'", element.name)))?;
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .map(|v| v.floor() as i64)
        .ok_or_else(|| invalid(format!("<{}> has non-numeric {key}='{raw}'", element.name)))
}

fn index(element: &XmlElement, key: &str) -> Result<usize, TableError> {
    let raw = element
        .attribute(key)
        .ok_or_else(|| invalid(format!("<{}> is missing '{key}'", element.name)))?;
    raw.trim()
        .parse::<usize>()
        .map_err(|_| invalid(format!("<{}> has invalid {key}='{raw}'", element.name)))
}

fn span(element: &XmlElement, start: &str, end: &str, len: usize) -> Result<Span, TableError> {
    let span = Span {
        start: index(element, start)?,
        end: index(element, end)?,
    };
    if span.start > span.end || span.end >= len {
        return Err(invalid(format!(
            "cell {start}..{end} = {}..{} outside {len} blocks",
            span.start, span.end
        )));
    }
    Ok(span)
}

/// Splits `[0, extent)` at the separators strictly inside the region.
fn blocks_from_separators(
    region: &XmlElement,
    name: &str,
    key: &str,
    origin: u32,
    extent: u32,
) -> Result<Vec<Block>, TableError> {
    let mut cuts = Vec::new();
    for separator in region.children_named(name) {
        let at = coordinate(separator, key)? - i64::from(origin);
        if at > 0 && at < i64::from(extent) {
            cuts.push(at as u32);
        }
    }
    cuts.sort_unstable();
    cuts.dedup();

    let mut bounds = Vec::with_capacity(cuts.len() + 2);
    bounds.push(0);
    bounds.extend(cuts);
    bounds.push(extent);
    Ok(bounds
        .windows(2)
        .map(|w| Block {
            start: w[0],
            end: w[1],
        })
        .collect())
}

/// Lays blocks of the given sizes end to end from zero.
fn tile(sizes: &[u32]) -> Vec<Block> {
    let mut start = 0;
    sizes
        .iter()
        .map(|&len| {
            let block = Block {
                start,
                end: start + len,
            };
            start = block.end;
            block
        })
        .collect()
}

/// Word centre coordinate along `axis`.
fn along(word: &WordBox, axis: Axis) -> i32 {
    let (cx, cy) = word.center();
    match axis {
        Axis::Row => cy,
        Axis::Column => cx,
    }
}

fn shift(word: &WordBox, axis: Axis, delta: i32) -> WordBox {
    match axis {
        Axis::Row => word.translated(0, delta),
        Axis::Column => word.translated(delta, 0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Luma};

    /// 200x120 page; the table covers (20, 10)-(170, 100).
    /// Rows at y = 40, 70 give three row blocks of 30px each.
    /// Columns at x = 70, 120 give three column blocks of 50px each.
    fn page() -> GrayImage {
        ImageBuffer::from_fn(200, 120, |x, y| Luma([((x / 10 + y) % 251) as u8]))
    }

    fn cell(r0: usize, r1: usize, c0: usize, c1: usize, text: &str) -> XmlElement {
        XmlElement::new("Cell")
            .with_attribute("x0", 0)
            .with_attribute("y0", 0)
            .with_attribute("x1", 0)
            .with_attribute("y1", 0)
            .with_attribute("startRow", r0)
            .with_attribute("endRow", r1)
            .with_attribute("startCol", c0)
            .with_attribute("endCol", c1)
            .with_attribute("dontCare", "false")
            .with_text(text)
    }

    fn region(cells: Vec<XmlElement>) -> XmlElement {
        let mut table = XmlElement::new("Table")
            .with_attribute("x0", 20)
            .with_attribute("y0", 10)
            .with_attribute("x1", 170)
            .with_attribute("y1", 100)
            .with_attribute("orientation", "unknown");
        for y in [40, 70] {
            table.children.push(
                XmlElement::new("Row")
                    .with_attribute("x0", 20)
                    .with_attribute("y0", y)
                    .with_attribute("x1", 170)
                    .with_attribute("y1", y),
            );
        }
        for x in [70, 120] {
            table.children.push(
                XmlElement::new("Column")
                    .with_attribute("x0", x)
                    .with_attribute("y0", 10)
                    .with_attribute("x1", x)
                    .with_attribute("y1", 100),
            );
        }
        table.children.extend(cells);
        table
    }

    fn grid_cells() -> Vec<XmlElement> {
        let mut cells = Vec::new();
        for r in 0..3 {
            for c in 0..3 {
                cells.push(cell(r, r, c, c, &format!("r{r}c{c}")));
            }
        }
        cells
    }

    fn words() -> Vec<WordBox> {
        vec![
            // row block 1, column block 0 (page coords)
            WordBox::new("mid", 25, 45, 45, 60),
            // row block 2
            WordBox::new("low", 75, 75, 95, 90),
            // outside the table
            WordBox::new("far", 180, 110, 195, 118),
        ]
    }

    fn table() -> GridTable {
        GridTable::from_region(&page(), &region(grid_cells()), &words()).unwrap()
    }

    #[test]
    fn test_from_region_builds_blocks_and_crop() {
        let table = table();
        assert_eq!(table.shape(), ImageShape::new(90, 150));
        assert_eq!(
            table.blocks(Axis::Row),
            &[
                Block { start: 0, end: 30 },
                Block { start: 30, end: 60 },
                Block { start: 60, end: 90 }
            ]
        );
        assert_eq!(table.block_count(Axis::Column), 3);
        assert_eq!(table.cells().len(), 9);
        assert_eq!(
            table.attributes().to_vec(),
            vec![("orientation".to_string(), "unknown".to_string())]
        );
        assert_eq!(table.image().get_pixel(0, 0), page().get_pixel(20, 10));
    }

    #[test]
    fn test_from_region_relocalizes_words() {
        let table = table();
        let texts: Vec<&str> = table.words().iter().map(|w| w.text.as_str()).collect();
        assert_eq!(texts, vec!["mid", "low"]);
        assert_eq!(table.words()[0].left, 5);
        assert_eq!(table.words()[0].top, 35);
    }

    #[test]
    fn test_from_region_rejects_bad_regions() {
        let empty = XmlElement::new("Table")
            .with_attribute("x0", 50)
            .with_attribute("y0", 10)
            .with_attribute("x1", 50)
            .with_attribute("y1", 90);
        assert!(matches!(
            GridTable::from_region(&page(), &empty, &[]),
            Err(TableError::InvalidRegion { .. })
        ));

        let bad_cell = region(vec![cell(0, 3, 0, 0, "x")]);
        assert!(GridTable::from_region(&page(), &bad_cell, &[]).is_err());

        let no_coords = XmlElement::new("Table").with_attribute("x0", "abc");
        assert!(GridTable::from_region(&page(), &no_coords, &[]).is_err());
    }

    #[test]
    fn test_replicate_row_grows_image_and_structure() {
        let mut table = table();
        let source_strip = crop_region(table.image(), 0, 30, 150, 30);

        table.replicate(1, 1, Axis::Row).unwrap();

        assert_eq!(table.shape(), ImageShape::new(120, 150));
        assert_eq!(table.block_count(Axis::Row), 4);
        assert_eq!(crop_region(table.image(), 0, 30, 150, 30), source_strip);
        assert_eq!(crop_region(table.image(), 0, 60, 150, 30), source_strip);

        assert_eq!(table.cells().len(), 12);
        let row_texts = |r: usize| -> Vec<&str> {
            table
                .cells()
                .iter()
                .filter(|c| c.rows == Span::single(r))
                .map(|c| c.text.as_str())
                .collect()
        };
        assert_eq!(row_texts(1), vec!["r1c0", "r1c1", "r1c2"]);
        assert_eq!(row_texts(2), vec!["r1c0", "r1c1", "r1c2"]);
        assert_eq!(row_texts(3), vec!["r2c0", "r2c1", "r2c2"]);

        let mids = table.words().iter().filter(|w| w.text == "mid").count();
        assert_eq!(mids, 2);
        let low = table.words().iter().find(|w| w.text == "low").unwrap();
        assert_eq!(low.top, 65 + 30);
    }

    #[test]
    fn test_replicate_column_at_end() {
        let mut table = table();
        table.replicate(1, 3, Axis::Column).unwrap();
        assert_eq!(table.shape(), ImageShape::new(90, 200));
        assert_eq!(table.blocks(Axis::Column)[3], Block { start: 150, end: 200 });
        assert!(table.to_xml().is_some());
    }

    #[test]
    fn test_replicate_rejects_spanned_block() {
        let mut cells = grid_cells();
        cells.retain(|c| c.attribute("startRow") != Some("1") || c.attribute("startCol") != Some("0"));
        cells.retain(|c| c.attribute("startRow") != Some("2") || c.attribute("startCol") != Some("0"));
        cells.push(cell(1, 2, 0, 0, "merged"));
        let mut table = GridTable::from_region(&page(), &region(cells), &[]).unwrap();

        assert_eq!(
            table.replicate(1, 1, Axis::Row),
            Err(TableError::SpannedBlock {
                axis: "row",
                index: 1
            })
        );
        assert_eq!(table.shape(), ImageShape::new(90, 150));
    }

    #[test]
    fn test_replicate_index_out_of_range() {
        let mut table = table();
        assert!(matches!(
            table.replicate(3, 1, Axis::Row),
            Err(TableError::IndexOutOfRange { index: 3, .. })
        ));
        assert!(matches!(
            table.replicate(1, 4, Axis::Column),
            Err(TableError::IndexOutOfRange { index: 4, .. })
        ));
    }

    #[test]
    fn test_remove_row_shrinks_structure() {
        let mut table = table();
        table.remove(1, Axis::Row).unwrap();

        assert_eq!(table.shape(), ImageShape::new(60, 150));
        assert_eq!(table.block_count(Axis::Row), 2);
        assert_eq!(table.cells().len(), 6);
        assert!(table.cells().iter().all(|c| !c.text.starts_with("r1")));
        assert!(table.words().iter().all(|w| w.text != "mid"));
        let low = table.words().iter().find(|w| w.text == "low").unwrap();
        assert_eq!(low.top, 65 - 30);
    }

    #[test]
    fn test_remove_shrinks_spanning_cell() {
        let mut cells = grid_cells();
        cells.retain(|c| c.attribute("startCol") != Some("2") || c.attribute("startRow") == Some("0"));
        cells.push(cell(1, 2, 2, 2, "tall"));
        let mut table = GridTable::from_region(&page(), &region(cells), &[]).unwrap();

        table.remove(1, Axis::Row).unwrap();
        let tall = table.cells().iter().find(|c| c.text == "tall").unwrap();
        assert_eq!(tall.rows, Span::single(1));
        assert!(table.to_xml().is_some());
    }

    #[test]
    fn test_remove_last_block_fails() {
        let mut table = table();
        table.remove(0, Axis::Column).unwrap();
        table.remove(0, Axis::Column).unwrap();
        assert_eq!(
            table.remove(0, Axis::Column),
            Err(TableError::LastBlock { axis: "column" })
        );
        assert_eq!(table.block_count(Axis::Column), 1);
    }

    #[test]
    fn test_to_xml_uses_crop_coordinates() {
        let mut table = table();
        table.remove(2, Axis::Column).unwrap();
        let xml = table.to_xml().unwrap();

        assert_eq!(xml.attribute("x1"), Some("100"));
        assert_eq!(xml.attribute("y1"), Some("90"));
        assert_eq!(xml.attribute("orientation"), Some("unknown"));
        assert_eq!(xml.children_named("Row").count(), 2);
        assert_eq!(xml.children_named("Column").count(), 1);

        let last = xml.children_named("Cell").last().unwrap();
        assert_eq!(last.attribute("x0"), Some("50"));
        assert_eq!(last.attribute("y0"), Some("60"));
        assert_eq!(last.attribute("x1"), Some("100"));
        assert_eq!(last.attribute("y1"), Some("90"));
        assert_eq!(last.attribute("dontCare"), Some("false"));
        assert_eq!(last.text, "r2c1");
    }

    #[test]
    fn test_to_xml_rejects_overlapping_cells() {
        // A merged cell over rows 0..=1 of column 2 and a copy of a single
        // row-2 cell inserted at row 1 end up in the same slot.
        let mut cells = grid_cells();
        cells.retain(|c| c.attribute("startCol") != Some("2") || c.attribute("startRow") == Some("2"));
        cells.push(cell(0, 1, 2, 2, "merged"));
        let mut table = GridTable::from_region(&page(), &region(cells), &[]).unwrap();

        table.replicate(2, 1, Axis::Row).unwrap();
        assert!(table.to_xml().is_none());
    }
}
