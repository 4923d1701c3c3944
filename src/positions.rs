// Per-field byte positions published by a position-tracking parser

use rustc_hash::FxHashMap;

use crate::span::Span;

/// Byte positions for the fields of one parsed structure instance.
///
/// Offsets are relative to the stream the instance was parsed from, not
/// to the root stream. Scalar fields record one start and one end offset;
/// repeated fields additionally record one start and one end per element.
/// A parser that aborted mid-field leaves a start without an end, which
/// reads back as "no position".
#[derive(Debug, Clone, Default)]
pub struct PositionTable {
    attr_start: FxHashMap<String, u64>,
    attr_end: FxHashMap<String, u64>,
    arr_start: FxHashMap<String, Vec<u64>>,
    arr_end: FxHashMap<String, Vec<u64>>,
}

impl PositionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record where parsing of `name` began
    pub fn record_start(&mut self, name: &str, offset: u64) {
        self.attr_start.insert(name.to_string(), offset);
    }

    /// Record where parsing of `name` finished
    pub fn record_end(&mut self, name: &str, offset: u64) {
        self.attr_end.insert(name.to_string(), offset);
    }

    /// Record the whole range of `name` in one call
    pub fn record_attr(&mut self, name: &str, start: u64, end: u64) {
        self.record_start(name, start);
        self.record_end(name, end);
    }

    /// Record where parsing of the next element of `name` began
    pub fn record_element_start(&mut self, name: &str, offset: u64) {
        self.arr_start.entry(name.to_string()).or_default().push(offset);
    }

    /// Record where parsing of the current element of `name` finished
    pub fn record_element_end(&mut self, name: &str, offset: u64) {
        self.arr_end.entry(name.to_string()).or_default().push(offset);
    }

    /// Record one full element range of `name` in one call
    pub fn record_element(&mut self, name: &str, start: u64, end: u64) {
        self.record_element_start(name, start);
        self.record_element_end(name, end);
    }

    /// Stream-relative span of `name`, present only when both the start
    /// and the end offset were recorded
    pub fn attr_span(&self, name: &str) -> Option<Span> {
        let start = *self.attr_start.get(name)?;
        let end = *self.attr_end.get(name)?;
        Some(Span::new(start, end))
    }

    /// Recorded element start offsets of the repeated field `name`
    pub fn element_starts(&self, name: &str) -> &[u64] {
        self.arr_start.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Recorded element end offsets of the repeated field `name`
    pub fn element_ends(&self, name: &str) -> &[u64] {
        self.arr_end.get(name).map(Vec::as_slice).unwrap_or(&[])
    }
}
