use std::ops;
use std::slice;

use bstr::ByteSlice;

/// A single row of the source file: the ordered sequence of string fields
/// obtained by delimiter-splitting one physical line.
///
/// Fields carry no type coercion and no header-derived names. Bytes that are
/// not valid UTF-8 are converted lossily; byte offsets in the index are
/// never affected by that conversion because they are computed before any
/// decoding happens.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Row(Vec<String>);

impl Row {
    /// Splits one line (record terminator already stripped) into fields on
    /// the given delimiter. This is the single tokenization path shared by
    /// the builder and the reader, so a span is always re-parsed exactly
    /// the way it was indexed.
    pub(crate) fn parse(line: &[u8], delimiter: &[u8]) -> Row {
        Row(line
            .split_str(delimiter)
            .map(|field| field.to_str_lossy().into_owned())
            .collect())
    }

    /// Returns the field at index `i`, or `None` if there is no such field.
    pub fn get(&self, i: usize) -> Option<&str> {
        self.0.get(i).map(String::as_str)
    }

    /// Returns true if and only if this row has no fields.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the number of fields in this row.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns an iterator over the fields of this row.
    pub fn iter(&self) -> RowIter {
        RowIter(self.0.iter())
    }
}

impl From<Vec<String>> for Row {
    fn from(fields: Vec<String>) -> Row {
        Row(fields)
    }
}

impl ops::Index<usize> for Row {
    type Output = str;
    fn index(&self, i: usize) -> &str {
        self.get(i).unwrap()
    }
}

impl<'a> IntoIterator for &'a Row {
    type IntoIter = RowIter<'a>;
    type Item = &'a str;
    fn into_iter(self) -> RowIter<'a> {
        self.iter()
    }
}

impl<T: AsRef<str>> PartialEq<Vec<T>> for Row {
    fn eq(&self, other: &Vec<T>) -> bool {
        self.0.len() == other.len()
            && self.0.iter().zip(other).all(|(a, b)| a == b.as_ref())
    }
}

impl<T: AsRef<str>> PartialEq<[T]> for Row {
    fn eq(&self, other: &[T]) -> bool {
        self.0.len() == other.len()
            && self.0.iter().zip(other).all(|(a, b)| a == b.as_ref())
    }
}

/// An iterator over the fields in a row.
pub struct RowIter<'a>(slice::Iter<'a, String>);

impl<'a> Iterator for RowIter<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        self.0.next().map(String::as_str)
    }
}
