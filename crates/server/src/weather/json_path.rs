use serde_json::Value;

/// One step in a path through the raw forecast tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Seg {
    Key(&'static str),
    Index(usize),
}

/// Walks `root` one segment at a time, stopping at the first mismatch.
///
/// Returns `None` when a segment addresses a shape the current value does
/// not have (a key into a non-object, an index into a non-array or past the
/// end) and when the value reached is JSON null. The root itself may be
/// null; no segment is attempted against it.
pub fn lookup<'a>(root: &'a Value, path: &[Seg]) -> Option<&'a Value> {
    let mut current = root;
    for seg in path {
        current = match seg {
            Seg::Key(key) => current.as_object()?.get(*key)?,
            Seg::Index(idx) => current.as_array()?.get(*idx)?,
        };
    }

    if current.is_null() {
        None
    } else {
        Some(current)
    }
}
