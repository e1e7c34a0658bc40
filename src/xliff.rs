//! Support for XLIFF 1.2 translation files.
//!
//! Only `<trans-unit>`, `<source>`, `<target>` and the `id` attribute are
//! interpreted. Everything else in the file (header, `<file>` attributes,
//! groups, notes) is carried through untouched because edits are applied to
//! the parsed tree and the whole tree is written back.

use std::io::Write;

use serde::Serialize;
use tracing::{debug, warn};

use crate::{
    error::Error,
    traits::Parser,
    tree::{Document, Element},
};

const BODY: &str = "body";
const TRANS_UNIT: &str = "trans-unit";
const SOURCE: &str = "source";
const TARGET: &str = "target";
const ID: &str = "id";

const UNIT_INDENT: &str = "\n    ";
const CHILD_INDENT: &str = "\n        ";
const BODY_CLOSE_INDENT: &str = "\n";

/// One `<trans-unit>` as found in a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TranslationUnit {
    pub id: String,
    pub source: Option<String>,
    pub target: Option<String>,
}

/// What [`XliffDocument::upsert_unit`] did to the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncOutcome {
    /// A new unit was appended to `<body>`.
    Inserted,
    /// The target of an existing unit was overwritten.
    Updated,
    /// An existing unit already had the requested target.
    Unchanged,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XliffDocument {
    document: Document,
}

impl XliffDocument {
    pub fn from_document(document: Document) -> Self {
        Self { document }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// The first `<body>` element of the document.
    pub fn body(&self) -> Result<&Element, Error> {
        self.document.find_first(BODY).ok_or(Error::MissingBody)
    }

    fn body_mut(&mut self) -> Result<&mut Element, Error> {
        self.document.find_first_mut(BODY).ok_or(Error::MissingBody)
    }

    /// All units directly under `<body>`, in document order. Units without an
    /// `id` attribute are skipped.
    pub fn units(&self) -> Result<Vec<TranslationUnit>, Error> {
        let units = self
            .body()?
            .child_elements()
            .filter(|el| el.name() == TRANS_UNIT)
            .filter_map(|el| {
                el.attribute(ID).map(|id| TranslationUnit {
                    id: id.to_string(),
                    source: el.find_child(SOURCE).map(Element::text),
                    target: el.find_child(TARGET).map(Element::text),
                })
            })
            .collect();
        Ok(units)
    }

    /// The first unit with the given id.
    pub fn find_unit(&self, id: &str) -> Result<Option<TranslationUnit>, Error> {
        Ok(self.units()?.into_iter().find(|unit| unit.id == id))
    }

    /// Sets the target of unit `id` to `text`, appending a new unit to
    /// `<body>` when there is none.
    ///
    /// New units use the id as their source. When several units share the id
    /// only the first one is touched.
    pub fn upsert_unit(&mut self, id: &str, text: &str) -> Result<SyncOutcome, Error> {
        let body = self.body_mut()?;

        let matches = body.child_elements().filter(|el| is_unit(el, id)).count();
        if matches > 1 {
            warn!(id, count = matches, "duplicate translation units, updating the first");
        }

        if let Some(unit) = body.child_elements_mut().find(|el| is_unit(el, id)) {
            let target = unit
                .find_child_mut(TARGET)
                .ok_or_else(|| Error::MalformedUnit(id.to_string()))?;
            if target.text() == text {
                debug!(id, "target already up to date");
                return Ok(SyncOutcome::Unchanged);
            }
            target.set_text(text);
            debug!(id, "updated existing translation unit");
            return Ok(SyncOutcome::Updated);
        }

        let mut unit = Element::new(TRANS_UNIT).with_attribute(ID, id);
        unit.push_text(CHILD_INDENT);
        unit.push_element(Element::new(SOURCE).with_text(id));
        unit.push_text(CHILD_INDENT);
        unit.push_element(Element::new(TARGET).with_text(text));
        unit.push_text(UNIT_INDENT);

        body.push_text(UNIT_INDENT);
        body.push_element(unit);
        body.push_text(BODY_CLOSE_INDENT);
        debug!(id, "appended new translation unit");
        Ok(SyncOutcome::Inserted)
    }

}

fn is_unit(el: &Element, id: &str) -> bool {
    el.name() == TRANS_UNIT && el.attribute(ID) == Some(id)
}

impl Parser for XliffDocument {
    /// The document does not need a `<body>` to parse.
    fn from_str(s: &str) -> Result<Self, Error> {
        Ok(Self::from_document(Document::parse(s)?))
    }

    fn to_writer<W: Write>(&self, writer: W) -> Result<(), Error> {
        self.document.to_writer(writer)
    }
}
