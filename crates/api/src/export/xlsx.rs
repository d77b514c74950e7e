//! Minimal single-sheet `.xlsx` writer.
//!
//! Produces an Office Open XML package zipped with `zip`: inline-string
//! cells (no shared string table), a fixed style table, merged ranges,
//! column widths, row heights and PNG images anchored at cells.
//!
//! Rows and columns are 1-based, as in spreadsheet references (`A1`).

use std::collections::BTreeMap;
use std::io::{Cursor, Write};

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// MIME type of an `.xlsx` workbook.
pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// English Metric Units per pixel at 96 DPI.
const EMU_PER_PIXEL: u32 = 9525;

/// Failure assembling the zip package.
#[derive(Debug, thiserror::Error)]
pub enum XlsxError {
    #[error("zip: {0}")]
    Zip(#[from] zip::result::ZipError),
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

/// Cell formats available to sheets. The discriminant is the `cellXfs` index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Style {
    #[default]
    Normal = 0,
    Bold = 1,
    /// Large bold, centred.
    Title = 2,
    /// Bold on a light fill with a thin border, centred and wrapped.
    Header = 3,
    /// Thin border, centred and wrapped.
    Cell = 4,
    /// Bold with a thin border, centred.
    Total = 5,
    /// Centred, no border.
    Centered = 6,
}

#[derive(Debug, Clone, PartialEq)]
enum Value {
    Text(String),
    Number(i64),
}

#[derive(Debug, Clone)]
struct Cell {
    value: Value,
    style: Style,
}

#[derive(Debug, Clone, Copy)]
struct ImageAnchor {
    media: usize,
    row: u32,
    col: u32,
    width_px: u32,
    height_px: u32,
}

/// Handle to a PNG added with [`Workbook::add_png`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageId(usize);

/// A workbook with exactly one worksheet.
#[derive(Debug, Clone)]
pub struct Workbook {
    sheet_name: String,
    cells: BTreeMap<u32, BTreeMap<u32, Cell>>,
    column_widths: BTreeMap<u32, f64>,
    row_heights: BTreeMap<u32, f64>,
    merges: Vec<String>,
    media: Vec<Vec<u8>>,
    images: Vec<ImageAnchor>,
}

impl Workbook {
    pub fn new(sheet_name: &str) -> Self {
        Self {
            sheet_name: sheet_name.to_string(),
            cells: BTreeMap::new(),
            column_widths: BTreeMap::new(),
            row_heights: BTreeMap::new(),
            merges: Vec::new(),
            media: Vec::new(),
            images: Vec::new(),
        }
    }

    /// Write a text cell. Empty text still writes a (styled) cell.
    pub fn text(&mut self, row: u32, col: u32, value: impl Into<String>, style: Style) {
        self.put(row, col, Value::Text(value.into()), style);
    }

    /// Write a numeric cell.
    pub fn number(&mut self, row: u32, col: u32, value: i64, style: Style) {
        self.put(row, col, Value::Number(value), style);
    }

    /// Write consecutive text cells starting at `col`.
    pub fn text_row<S: AsRef<str>>(&mut self, row: u32, col: u32, values: &[S], style: Style) {
        for (offset, value) in values.iter().enumerate() {
            self.text(row, col + offset as u32, value.as_ref(), style);
        }
    }

    fn put(&mut self, row: u32, col: u32, value: Value, style: Style) {
        self.cells
            .entry(row)
            .or_default()
            .insert(col, Cell { value, style });
    }

    /// Column width in character units.
    pub fn column_width(&mut self, col: u32, width: f64) {
        self.column_widths.insert(col, width);
    }

    /// Row height in points.
    pub fn row_height(&mut self, row: u32, height: f64) {
        self.row_heights.insert(row, height);
    }

    /// Merge the rectangle from `(first_row, first_col)` to `(last_row, last_col)`.
    pub fn merge(&mut self, first_row: u32, first_col: u32, last_row: u32, last_col: u32) {
        self.merges.push(format!(
            "{}:{}",
            cell_ref(first_row, first_col),
            cell_ref(last_row, last_col)
        ));
    }

    /// Register PNG bytes once; the returned id can be placed many times.
    pub fn add_png(&mut self, png: Vec<u8>) -> ImageId {
        self.media.push(png);
        ImageId(self.media.len() - 1)
    }

    /// Anchor an image's top-left corner at a cell, scaled to the given pixel size.
    pub fn place_image(&mut self, image: ImageId, row: u32, col: u32, width_px: u32, height_px: u32) {
        self.images.push(ImageAnchor {
            media: image.0,
            row,
            col,
            width_px,
            height_px,
        });
    }

    /// Number of placed images.
    pub fn image_count(&self) -> usize {
        self.images.len()
    }

    /// Text of a cell, if it holds text.
    pub fn text_at(&self, row: u32, col: u32) -> Option<&str> {
        match &self.cells.get(&row)?.get(&col)?.value {
            Value::Text(s) => Some(s),
            Value::Number(_) => None,
        }
    }

    /// Value of a cell, if it holds a number.
    pub fn number_at(&self, row: u32, col: u32) -> Option<i64> {
        match self.cells.get(&row)?.get(&col)?.value {
            Value::Number(n) => Some(n),
            Value::Text(_) => None,
        }
    }

    /// Highest row that holds a cell.
    pub fn last_row(&self) -> u32 {
        self.cells.keys().next_back().copied().unwrap_or(0)
    }

    /// Serialize the package.
    pub fn to_bytes(&self) -> Result<Vec<u8>, XlsxError> {
        let has_drawing = !self.images.is_empty();
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

        let put = |zip: &mut ZipWriter<Cursor<Vec<u8>>>, name: &str, body: &[u8]| {
            zip.start_file(name, options)?;
            zip.write_all(body)?;
            Ok::<_, XlsxError>(())
        };

        put(&mut zip, "[Content_Types].xml", content_types(has_drawing).as_bytes())?;
        put(&mut zip, "_rels/.rels", ROOT_RELS.as_bytes())?;
        put(&mut zip, "xl/workbook.xml", self.workbook_xml().as_bytes())?;
        put(&mut zip, "xl/_rels/workbook.xml.rels", WORKBOOK_RELS.as_bytes())?;
        put(&mut zip, "xl/styles.xml", STYLES.as_bytes())?;
        put(&mut zip, "xl/worksheets/sheet1.xml", self.sheet_xml().as_bytes())?;

        if has_drawing {
            put(&mut zip, "xl/worksheets/_rels/sheet1.xml.rels", SHEET_RELS.as_bytes())?;
            put(&mut zip, "xl/drawings/drawing1.xml", self.drawing_xml().as_bytes())?;
            put(
                &mut zip,
                "xl/drawings/_rels/drawing1.xml.rels",
                self.drawing_rels().as_bytes(),
            )?;
            for (i, png) in self.media.iter().enumerate() {
                put(&mut zip, &format!("xl/media/image{}.png", i + 1), png)?;
            }
        }

        Ok(zip.finish()?.into_inner())
    }

    fn workbook_xml(&self) -> String {
        format!(
            "{XML_DECL}<workbook xmlns=\"{NS_MAIN}\" xmlns:r=\"{NS_REL}\">\
             <sheets><sheet name=\"{}\" sheetId=\"1\" r:id=\"rId1\"/></sheets>\
             </workbook>",
            escape(&self.sheet_name)
        )
    }

    fn sheet_xml(&self) -> String {
        let mut xml = format!("{XML_DECL}<worksheet xmlns=\"{NS_MAIN}\" xmlns:r=\"{NS_REL}\">");

        if !self.column_widths.is_empty() {
            xml.push_str("<cols>");
            for (col, width) in &self.column_widths {
                xml.push_str(&format!(
                    "<col min=\"{col}\" max=\"{col}\" width=\"{width}\" customWidth=\"1\"/>"
                ));
            }
            xml.push_str("</cols>");
        }

        xml.push_str("<sheetData>");
        let mut rows: Vec<u32> = self.cells.keys().copied().collect();
        rows.extend(self.row_heights.keys().copied());
        rows.sort_unstable();
        rows.dedup();
        for row in rows {
            match self.row_heights.get(&row) {
                Some(h) => xml.push_str(&format!("<row r=\"{row}\" ht=\"{h}\" customHeight=\"1\">")),
                None => xml.push_str(&format!("<row r=\"{row}\">")),
            }
            for (col, cell) in self.cells.get(&row).into_iter().flatten() {
                let r = cell_ref(row, *col);
                let s = cell.style as u8;
                match &cell.value {
                    Value::Text(text) => xml.push_str(&format!(
                        "<c r=\"{r}\" s=\"{s}\" t=\"inlineStr\"><is><t xml:space=\"preserve\">{}</t></is></c>",
                        escape(text)
                    )),
                    Value::Number(n) => {
                        xml.push_str(&format!("<c r=\"{r}\" s=\"{s}\"><v>{n}</v></c>"))
                    }
                }
            }
            xml.push_str("</row>");
        }
        xml.push_str("</sheetData>");

        if !self.merges.is_empty() {
            xml.push_str(&format!("<mergeCells count=\"{}\">", self.merges.len()));
            for range in &self.merges {
                xml.push_str(&format!("<mergeCell ref=\"{range}\"/>"));
            }
            xml.push_str("</mergeCells>");
        }

        if !self.images.is_empty() {
            xml.push_str("<drawing r:id=\"rId1\"/>");
        }
        xml.push_str("</worksheet>");
        xml
    }

    fn drawing_xml(&self) -> String {
        let mut xml = format!(
            "{XML_DECL}<xdr:wsDr xmlns:xdr=\"{NS_DRAWING}\" xmlns:a=\"{NS_A}\" xmlns:r=\"{NS_REL}\">"
        );
        for (i, anchor) in self.images.iter().enumerate() {
            let cx = anchor.width_px * EMU_PER_PIXEL;
            let cy = anchor.height_px * EMU_PER_PIXEL;
            let id = i + 2;
            xml.push_str(&format!(
                "<xdr:oneCellAnchor>\
                 <xdr:from><xdr:col>{}</xdr:col><xdr:colOff>0</xdr:colOff>\
                 <xdr:row>{}</xdr:row><xdr:rowOff>0</xdr:rowOff></xdr:from>\
                 <xdr:ext cx=\"{cx}\" cy=\"{cy}\"/>\
                 <xdr:pic>\
                 <xdr:nvPicPr><xdr:cNvPr id=\"{id}\" name=\"Picture {id}\"/>\
                 <xdr:cNvPicPr><a:picLocks noChangeAspect=\"1\"/></xdr:cNvPicPr></xdr:nvPicPr>\
                 <xdr:blipFill><a:blip r:embed=\"rId{}\"/><a:stretch><a:fillRect/></a:stretch></xdr:blipFill>\
                 <xdr:spPr><a:xfrm><a:off x=\"0\" y=\"0\"/><a:ext cx=\"{cx}\" cy=\"{cy}\"/></a:xfrm>\
                 <a:prstGeom prst=\"rect\"><a:avLst/></a:prstGeom></xdr:spPr>\
                 </xdr:pic><xdr:clientData/></xdr:oneCellAnchor>",
                anchor.col - 1,
                anchor.row - 1,
                anchor.media + 1,
            ));
        }
        xml.push_str("</xdr:wsDr>");
        xml
    }

    fn drawing_rels(&self) -> String {
        let mut xml = format!("{XML_DECL}<Relationships xmlns=\"{NS_PKG_REL}\">");
        for i in 1..=self.media.len() {
            xml.push_str(&format!(
                "<Relationship Id=\"rId{i}\" Type=\"{REL_IMAGE}\" Target=\"../media/image{i}.png\"/>"
            ));
        }
        xml.push_str("</Relationships>");
        xml
    }
}

/// Spreadsheet column letters: 1 -> `A`, 26 -> `Z`, 27 -> `AA`.
pub fn column_name(col: u32) -> String {
    let mut n = col;
    let mut name = Vec::new();
    while n > 0 {
        let rem = (n - 1) % 26;
        name.push(b'A' + rem as u8);
        n = (n - 1) / 26;
    }
    name.reverse();
    String::from_utf8(name).unwrap_or_default()
}

/// `A1`-style reference.
pub fn cell_ref(row: u32, col: u32) -> String {
    format!("{}{row}", column_name(col))
}

/// Escape text for XML content and attributes, dropping characters XML 1.0 forbids.
fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            '\t' | '\n' | '\r' => out.push(c),
            c if c.is_control() => {}
            c => out.push(c),
        }
    }
    out
}

fn content_types(has_drawing: bool) -> String {
    let drawing = if has_drawing {
        "<Override PartName=\"/xl/drawings/drawing1.xml\" \
         ContentType=\"application/vnd.openxmlformats-officedocument.drawing+xml\"/>"
    } else {
        ""
    };
    format!(
        "{XML_DECL}<Types xmlns=\"http://schemas.openxmlformats.org/package/2006/content-types\">\
         <Default Extension=\"rels\" ContentType=\"application/vnd.openxmlformats-package.relationships+xml\"/>\
         <Default Extension=\"xml\" ContentType=\"application/xml\"/>\
         <Default Extension=\"png\" ContentType=\"image/png\"/>\
         <Override PartName=\"/xl/workbook.xml\" \
         ContentType=\"application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml\"/>\
         <Override PartName=\"/xl/worksheets/sheet1.xml\" \
         ContentType=\"application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml\"/>\
         <Override PartName=\"/xl/styles.xml\" \
         ContentType=\"application/vnd.openxmlformats-officedocument.spreadsheetml.styles+xml\"/>\
         {drawing}</Types>"
    )
}

const XML_DECL: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n";
const NS_MAIN: &str = "http://schemas.openxmlformats.org/spreadsheetml/2006/main";
const NS_REL: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const NS_PKG_REL: &str = "http://schemas.openxmlformats.org/package/2006/relationships";
const NS_DRAWING: &str = "http://schemas.openxmlformats.org/drawingml/2006/spreadsheetDrawing";
const NS_A: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";
const REL_IMAGE: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/image";

const ROOT_RELS: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n\
<Relationships xmlns=\"http://schemas.openxmlformats.org/package/2006/relationships\">\
<Relationship Id=\"rId1\" \
Type=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument\" \
Target=\"xl/workbook.xml\"/>\
</Relationships>";

const WORKBOOK_RELS: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n\
<Relationships xmlns=\"http://schemas.openxmlformats.org/package/2006/relationships\">\
<Relationship Id=\"rId1\" \
Type=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet\" \
Target=\"worksheets/sheet1.xml\"/>\
<Relationship Id=\"rId2\" \
Type=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles\" \
Target=\"styles.xml\"/>\
</Relationships>";

const SHEET_RELS: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n\
<Relationships xmlns=\"http://schemas.openxmlformats.org/package/2006/relationships\">\
<Relationship Id=\"rId1\" \
Type=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships/drawing\" \
Target=\"../drawings/drawing1.xml\"/>\
</Relationships>";

// cellXfs order must match `Style` discriminants.
const STYLES: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n\
<styleSheet xmlns=\"http://schemas.openxmlformats.org/spreadsheetml/2006/main\">\
<fonts count=\"3\">\
<font><sz val=\"11\"/><name val=\"Tahoma\"/></font>\
<font><b/><sz val=\"11\"/><name val=\"Tahoma\"/></font>\
<font><b/><sz val=\"14\"/><name val=\"Tahoma\"/></font>\
</fonts>\
<fills count=\"3\">\
<fill><patternFill patternType=\"none\"/></fill>\
<fill><patternFill patternType=\"gray125\"/></fill>\
<fill><patternFill patternType=\"solid\"><fgColor rgb=\"FFDBEAFE\"/><bgColor indexed=\"64\"/></patternFill></fill>\
</fills>\
<borders count=\"2\">\
<border><left/><right/><top/><bottom/><diagonal/></border>\
<border><left style=\"thin\"><color auto=\"1\"/></left><right style=\"thin\"><color auto=\"1\"/></right>\
<top style=\"thin\"><color auto=\"1\"/></top><bottom style=\"thin\"><color auto=\"1\"/></bottom><diagonal/></border>\
</borders>\
<cellStyleXfs count=\"1\"><xf numFmtId=\"0\" fontId=\"0\" fillId=\"0\" borderId=\"0\"/></cellStyleXfs>\
<cellXfs count=\"7\">\
<xf numFmtId=\"0\" fontId=\"0\" fillId=\"0\" borderId=\"0\" xfId=\"0\"/>\
<xf numFmtId=\"0\" fontId=\"1\" fillId=\"0\" borderId=\"0\" xfId=\"0\" applyFont=\"1\"/>\
<xf numFmtId=\"0\" fontId=\"2\" fillId=\"0\" borderId=\"0\" xfId=\"0\" applyFont=\"1\" applyAlignment=\"1\">\
<alignment horizontal=\"center\" vertical=\"center\"/></xf>\
<xf numFmtId=\"0\" fontId=\"1\" fillId=\"2\" borderId=\"1\" xfId=\"0\" applyFont=\"1\" applyFill=\"1\" \
applyBorder=\"1\" applyAlignment=\"1\"><alignment horizontal=\"center\" vertical=\"center\" wrapText=\"1\"/></xf>\
<xf numFmtId=\"0\" fontId=\"0\" fillId=\"0\" borderId=\"1\" xfId=\"0\" applyBorder=\"1\" applyAlignment=\"1\">\
<alignment horizontal=\"center\" vertical=\"center\" wrapText=\"1\"/></xf>\
<xf numFmtId=\"0\" fontId=\"1\" fillId=\"0\" borderId=\"1\" xfId=\"0\" applyFont=\"1\" applyBorder=\"1\" \
applyAlignment=\"1\"><alignment horizontal=\"center\" vertical=\"center\"/></xf>\
<xf numFmtId=\"0\" fontId=\"0\" fillId=\"0\" borderId=\"0\" xfId=\"0\" applyAlignment=\"1\">\
<alignment horizontal=\"center\" vertical=\"center\"/></xf>\
</cellXfs>\
<cellStyles count=\"1\"><cellStyle name=\"Normal\" xfId=\"0\" builtinId=\"0\"/></cellStyles>\
</styleSheet>";
