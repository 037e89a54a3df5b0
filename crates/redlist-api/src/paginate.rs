//! Multi-page fetching and result aggregation
//!
//! Pages are requested one at a time starting at 1 until a page comes back
//! with no records. That final page is only a probe: if earlier pages had
//! data, it is discarded.

use std::future::Future;
use std::io::Write;

use serde_json::Value;
use tracing::debug;

use crate::error::{RedListError, Result};
use crate::parse::{parse, FlatValue, Parsed, Table};

/// Field holding the records of a paged response
pub const RECORD_FIELD: &str = "assessments";

/// Per-page progress markers written to a sink (stderr by default)
pub struct Progress<W: Write> {
    sink: Option<W>,
    emitted: bool,
}

impl Progress<std::io::Stderr> {
    /// Markers on stderr, or nothing when `quiet`
    pub fn stderr(quiet: bool) -> Self {
        Self::new(if quiet { None } else { Some(std::io::stderr()) })
    }
}

impl<W: Write> Progress<W> {
    pub fn new(sink: Option<W>) -> Self {
        Self {
            sink,
            emitted: false,
        }
    }

    fn page_done(&mut self) {
        if let Some(sink) = self.sink.as_mut() {
            // Progress output is best-effort.
            let _ = sink.write_all(b".").and_then(|_| sink.flush());
            self.emitted = true;
        }
    }

    fn finish(&mut self) {
        if self.emitted {
            if let Some(sink) = self.sink.as_mut() {
                let _ = sink.write_all(b"\n").and_then(|_| sink.flush());
            }
        }
    }

    pub fn into_inner(self) -> Option<W> {
        self.sink
    }
}

/// Number of records in `field` of a raw page; absent or non-array counts as 0
fn page_record_count(body: &str, field: &str) -> Result<usize> {
    let doc: Value = serde_json::from_str(body)?;
    Ok(doc
        .get(field)
        .and_then(Value::as_array)
        .map(Vec::len)
        .unwrap_or(0))
}

/// Walk pages via `fetch_page` until one has no records in `field`
///
/// Returns the raw pages to aggregate: every non-empty page in order, or the
/// lone page-1 body when there were no records at all. Any error aborts the
/// walk and drops the pages collected so far.
pub async fn fetch_pages<F, Fut, W>(
    mut fetch_page: F,
    field: &str,
    progress: &mut Progress<W>,
) -> Result<Vec<String>>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<String>>,
    W: Write,
{
    let mut pages: Vec<String> = Vec::new();
    let mut page: u32 = 1;

    loop {
        let fetched = fetch_page(page)
            .await
            .and_then(|body| page_record_count(&body, field).map(|count| (body, count)));
        let (body, count) = match fetched {
            Ok(pair) => pair,
            Err(e) => {
                progress.finish();
                return Err(e);
            }
        };
        debug!(page, records = count, "Fetched page");

        if count == 0 {
            progress.finish();
            if pages.is_empty() {
                // Nothing on page 1: the empty page itself is the result.
                return Ok(vec![body]);
            }
            return Ok(pages);
        }

        pages.push(body);
        progress.page_done();
        page += 1;
    }
}

/// Parse and merge pages into one result
///
/// A single page is parsed as-is. With several, the first page is the
/// template and its `field` is replaced by the concatenation of every
/// page's records; all other fields come from page 1.
pub fn combine(pages: &[String], flatten: bool, field: &str) -> Result<Parsed> {
    let (first, rest) = pages
        .split_first()
        .ok_or_else(|| RedListError::Parse("no pages to combine".to_string()))?;

    if rest.is_empty() {
        return parse(first, flatten);
    }

    let parsed = pages
        .iter()
        .map(|p| parse(p, flatten))
        .collect::<Result<Vec<_>>>()?;

    let mut iter = parsed.into_iter();
    let template = iter.next().unwrap_or(Parsed::Nested(Value::Null));
    let all = std::iter::once(template.clone()).chain(iter);

    match template {
        Parsed::Nested(mut doc) => {
            let mut records = Vec::new();
            for page in all {
                if let Parsed::Nested(mut v) = page {
                    match v.get_mut(field).map(Value::take) {
                        Some(Value::Array(items)) => records.extend(items),
                        None | Some(Value::Null) => {}
                        Some(_) => return Err(not_a_record_list(field)),
                    }
                }
            }
            match doc.as_object_mut() {
                Some(obj) => {
                    obj.insert(field.to_string(), Value::Array(records));
                }
                None => return Err(not_a_record_list(field)),
            }
            Ok(Parsed::Nested(doc))
        }
        Parsed::Flat(FlatValue::Object(mut doc)) => {
            // Pages whose records are all objects come back as tables; any
            // other non-empty array stays a plain list.
            let mut tables = Vec::new();
            let mut items = Vec::new();
            for page in all {
                let Parsed::Flat(FlatValue::Object(obj)) = page else {
                    return Err(not_a_record_list(field));
                };
                match obj.get(field) {
                    Some(FlatValue::Table(t)) => tables.push(t.clone()),
                    Some(FlatValue::Scalar(Value::Array(a))) => items.extend(a.iter().cloned()),
                    None | Some(FlatValue::Scalar(Value::Null)) => {}
                    Some(_) => return Err(not_a_record_list(field)),
                }
            }
            let records = match (tables.is_empty(), items.is_empty()) {
                (false, false) => return Err(not_a_record_list(field)),
                (true, false) => FlatValue::Scalar(Value::Array(items)),
                _ => FlatValue::Table(Table::stack(tables)),
            };
            doc.insert(field, records);
            Ok(Parsed::Flat(FlatValue::Object(doc)))
        }
        Parsed::Flat(_) => Err(not_a_record_list(field)),
    }
}

fn not_a_record_list(field: &str) -> RedListError {
    RedListError::Parse(format!("`{}` is not a list of records", field))
}
