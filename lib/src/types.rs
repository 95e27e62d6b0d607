use std::rc::Rc;

pub use std::collections::HashMap;

/// A type alias for a string read from the save document.
/// Reference counted, since container level values such as the shed name are
/// shared between every record built from that container.
/// Comparisons might not work because compiler shenanigans, try [Rc::as_ref] when in doubt
pub type GameString = Rc<str>;

/// Renders an optional value as a table cell, absent values become the empty string.
pub(crate) fn text<S: AsRef<str>>(value: &Option<S>) -> String {
    value
        .as_ref()
        .map_or_else(String::new, |v| v.as_ref().to_owned())
}
