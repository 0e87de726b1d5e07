//! Page-level document loading.
//!
//! [`DocumentLoader`] is the seam the [`Indexer`](crate::Indexer) reads files
//! through. [`PdfLoader`] (feature `pdf`) extracts one [`PageDocument`] per PDF
//! page with `lopdf`, labelling pages from the document's `/PageLabels` tree.

use std::path::Path;

use crate::document::PageDocument;
use crate::error::LoadError;

/// Turns a file on disk into page documents.
///
/// Loading is blocking; async callers run it on the blocking thread pool.
pub trait DocumentLoader: Send + Sync {
    /// Load every page of the file at `path`.
    fn load(&self, path: &Path) -> std::result::Result<Vec<PageDocument>, LoadError>;
}

/// Base name of `path`, or the whole path if it has none.
pub(crate) fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(feature = "pdf")]
pub use pdf::PdfLoader;

#[cfg(feature = "pdf")]
mod pdf {
    use std::collections::BTreeMap;
    use std::path::Path;

    use lopdf::{Dictionary, Document, Object};
    use tracing::{debug, warn};

    use super::{DocumentLoader, file_name_of};
    use crate::document::PageDocument;
    use crate::error::LoadError;

    /// A [`DocumentLoader`] for PDF files backed by `lopdf`.
    #[derive(Debug, Clone, Copy, Default)]
    pub struct PdfLoader;

    impl PdfLoader {
        /// Create a new PDF loader.
        pub fn new() -> Self {
            Self
        }
    }

    impl DocumentLoader for PdfLoader {
        fn load(&self, path: &Path) -> std::result::Result<Vec<PageDocument>, LoadError> {
            let bytes = std::fs::read(path)
                .map_err(|source| LoadError::Io { path: path.to_path_buf(), source })?;
            let doc = Document::load_mem(&bytes).map_err(|e| LoadError::Pdf {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;

            let labels = PageLabels::read(&doc);
            let file_name = file_name_of(path);
            let source = path.display().to_string();
            let pages = doc.get_pages();
            debug!(file = %file_name, page_count = pages.len(), "loading pdf");

            let documents = pages
                .keys()
                .enumerate()
                .map(|(index, &page_number)| {
                    let text = doc.extract_text(&[page_number]).unwrap_or_else(|e| {
                        warn!(
                            file = %file_name,
                            page = page_number,
                            error = %e,
                            "no extractable text on page"
                        );
                        String::new()
                    });
                    PageDocument {
                        text: text.trim().to_string(),
                        page_label: labels.label(index),
                        source_file_name: file_name.clone(),
                        page_index: index,
                        source: source.clone(),
                    }
                })
                .collect();

            Ok(documents)
        }
    }

    /// Largest page number rendered from a `/PageLabels` range. Roman and letter
    /// numerals grow with the number, so larger `/St` values are treated as malformed.
    pub(super) const MAX_LABEL_NUMBER: i64 = 100_000;

    /// Numbering style of one `/PageLabels` range.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub(super) enum LabelStyle {
        Decimal,
        UpperRoman,
        LowerRoman,
        UpperLetters,
        LowerLetters,
        /// Prefix only, no number.
        None,
    }

    /// One range of the page label number tree.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub(super) struct LabelRange {
        pub(super) style: LabelStyle,
        pub(super) prefix: String,
        pub(super) start: i64,
    }

    /// The document's page labels, keyed by the first page index of each range.
    #[derive(Debug, Default)]
    pub(super) struct PageLabels {
        pub(super) ranges: BTreeMap<usize, LabelRange>,
    }

    impl PageLabels {
        /// Read `/Root /PageLabels`. A missing or malformed tree yields no ranges.
        fn read(doc: &Document) -> Self {
            let mut labels = Self::default();
            let tree = doc
                .trailer
                .get(b"Root")
                .ok()
                .and_then(|root| resolve(doc, root).as_dict().ok())
                .and_then(|catalog| catalog.get(b"PageLabels").ok())
                .and_then(|tree| resolve(doc, tree).as_dict().ok());
            if let Some(tree) = tree {
                labels.collect(doc, tree, 0);
            }
            labels
        }

        fn collect(&mut self, doc: &Document, node: &Dictionary, depth: usize) {
            // Number trees are shallow; the bound only guards against reference cycles.
            if depth > 32 {
                return;
            }
            if let Ok(nums) = node.get(b"Nums").and_then(Object::as_array) {
                for pair in nums.chunks(2) {
                    let [key, value] = pair else { continue };
                    let Ok(index) = resolve(doc, key).as_i64() else { continue };
                    let Ok(dict) = resolve(doc, value).as_dict() else { continue };
                    if let Ok(index) = usize::try_from(index) {
                        self.ranges.insert(index, LabelRange::from_dict(doc, dict));
                    }
                }
            }
            if let Ok(kids) = node.get(b"Kids").and_then(Object::as_array) {
                for kid in kids {
                    if let Ok(kid) = resolve(doc, kid).as_dict() {
                        self.collect(doc, kid, depth + 1);
                    }
                }
            }
        }

        /// Label of the page at 0-based `index`.
        ///
        /// Falls back to the 1-based position when the page is unlabelled or its
        /// number would exceed [`MAX_LABEL_NUMBER`].
        pub(super) fn label(&self, index: usize) -> String {
            let Some((&first, range)) = self.ranges.range(..=index).next_back() else {
                return (index + 1).to_string();
            };
            let number = i64::try_from(index - first)
                .ok()
                .and_then(|offset| range.start.checked_add(offset))
                .filter(|&number| number <= MAX_LABEL_NUMBER);
            match number {
                Some(number) => range.format(number),
                None => {
                    debug!(page = index, start = range.start, "page label number out of range");
                    (index + 1).to_string()
                }
            }
        }
    }

    impl LabelRange {
        fn from_dict(doc: &Document, dict: &Dictionary) -> Self {
            let style = match dict.get(b"S").map(|s| resolve(doc, s)).and_then(Object::as_name) {
                Ok(b"D") => LabelStyle::Decimal,
                Ok(b"R") => LabelStyle::UpperRoman,
                Ok(b"r") => LabelStyle::LowerRoman,
                Ok(b"A") => LabelStyle::UpperLetters,
                Ok(b"a") => LabelStyle::LowerLetters,
                _ => LabelStyle::None,
            };
            let prefix = dict
                .get(b"P")
                .map(|p| resolve(doc, p))
                .and_then(Object::as_str)
                .map(decode_text_string)
                .unwrap_or_default();
            let start =
                dict.get(b"St").map(|s| resolve(doc, s)).and_then(Object::as_i64).unwrap_or(1);
            Self { style, prefix, start }
        }

        pub(super) fn format(&self, number: i64) -> String {
            let number = number.max(1);
            let numeral = match self.style {
                LabelStyle::Decimal => number.to_string(),
                LabelStyle::UpperRoman => roman(number),
                LabelStyle::LowerRoman => roman(number).to_lowercase(),
                LabelStyle::UpperLetters => letters(number),
                LabelStyle::LowerLetters => letters(number).to_lowercase(),
                LabelStyle::None => String::new(),
            };
            format!("{}{numeral}", self.prefix)
        }
    }

    fn resolve<'a>(doc: &'a Document, object: &'a Object) -> &'a Object {
        match object {
            Object::Reference(id) => doc.get_object(*id).unwrap_or(object),
            _ => object,
        }
    }

    /// Decode a PDF text string: UTF-16BE with a byte order mark, else byte-per-char.
    fn decode_text_string(bytes: &[u8]) -> String {
        match bytes {
            [0xFE, 0xFF, rest @ ..] => {
                let units: Vec<u16> = rest
                    .chunks_exact(2)
                    .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
                    .collect();
                String::from_utf16_lossy(&units)
            }
            _ => bytes.iter().map(|&b| char::from(b)).collect(),
        }
    }

    pub(super) fn roman(mut number: i64) -> String {
        const NUMERALS: [(i64, &str); 13] = [
            (1000, "M"),
            (900, "CM"),
            (500, "D"),
            (400, "CD"),
            (100, "C"),
            (90, "XC"),
            (50, "L"),
            (40, "XL"),
            (10, "X"),
            (9, "IX"),
            (5, "V"),
            (4, "IV"),
            (1, "I"),
        ];
        let mut out = String::new();
        for (value, numeral) in NUMERALS {
            while number >= value {
                out.push_str(numeral);
                number -= value;
            }
        }
        out
    }

    /// A..Z, then AA..ZZ, then AAA..: the letter repeats once per pass through the
    /// alphabet, so 28 is `BB` rather than the spreadsheet-style `AB`.
    pub(super) fn letters(number: i64) -> String {
        let index = (number - 1) as usize;
        let letter = char::from(b'A' + (index % 26) as u8);
        std::iter::repeat_n(letter, index / 26 + 1).collect()
    }
}

#[cfg(all(test, feature = "pdf"))]
mod tests {
    use std::collections::BTreeMap;

    use super::pdf::{LabelRange, LabelStyle, MAX_LABEL_NUMBER, PageLabels, letters, roman};
    use super::*;

    fn range(style: LabelStyle, prefix: &str, start: i64) -> LabelRange {
        LabelRange { style, prefix: prefix.into(), start }
    }

    #[test]
    fn unlabelled_pages_use_their_position() {
        let labels = PageLabels::default();
        assert_eq!(labels.label(0), "1");
        assert_eq!(labels.label(9), "10");
    }

    #[test]
    fn labels_follow_ranges() {
        let labels = PageLabels {
            ranges: BTreeMap::from([
                (0, range(LabelStyle::LowerRoman, "", 1)),
                (3, range(LabelStyle::Decimal, "", 1)),
                (6, range(LabelStyle::Decimal, "A-", 8)),
            ]),
        };
        let rendered: Vec<String> = (0..8).map(|i| labels.label(i)).collect();
        assert_eq!(rendered, ["i", "ii", "iii", "1", "2", "3", "A-8", "A-9"]);
    }

    #[test]
    fn oversized_start_values_fall_back_to_position() {
        let labels = PageLabels {
            ranges: BTreeMap::from([
                (0, range(LabelStyle::UpperLetters, "", 2_600_000_001)),
                (2, range(LabelStyle::UpperRoman, "", i64::MAX)),
                (4, range(LabelStyle::Decimal, "", MAX_LABEL_NUMBER)),
            ]),
        };
        let rendered: Vec<String> = (0..6).map(|i| labels.label(i)).collect();
        assert_eq!(rendered, ["1", "2", "3", "4", "100000", "6"]);
    }

    #[test]
    fn formats_numbering_styles() {
        assert_eq!(roman(1994), "MCMXCIV");
        assert_eq!(letters(1), "A");
        assert_eq!(letters(26), "Z");
        assert_eq!(letters(28), "BB");
        assert_eq!(range(LabelStyle::LowerLetters, "", 1).format(3), "c");
        assert_eq!(range(LabelStyle::None, "Cover", 1).format(1), "Cover");
    }

    #[test]
    fn file_name_is_the_base_name() {
        assert_eq!(file_name_of(Path::new("/data/pdfs/contract.pdf")), "contract.pdf");
    }
}
