use crate::builder::Builder;
use crate::command::{Leaf, Program};
use crate::error::{Error, Result};

/// Read canonical notation into a [`Program`].
///
/// Characters other than `+ - > < . , [ ]` are comments and skipped.
///
/// # Errors
///
/// Returns `Error::UnmatchedClose` for a `]` without an open loop and
/// `Error::UnmatchedOpen` for the innermost `[` left unclosed. Offsets are
/// byte offsets into `source`.
pub fn parse(source: &str) -> Result<Program> {
    let mut root = Builder::new();
    let mut open: Vec<(usize, Builder)> = Vec::new();

    for (offset, symbol) in source.char_indices() {
        match symbol {
            '[' => open.push((offset, Builder::new())),
            ']' => {
                let (_, body) = open.pop().ok_or(Error::UnmatchedClose { offset })?;
                let parent = open.last_mut().map_or(&mut root, |(_, builder)| builder);

                parent.append_loop(body.into_program());
            }
            _ => {
                if let Some(kind) = Leaf::from_symbol(symbol) {
                    let current = open.last_mut().map_or(&mut root, |(_, builder)| builder);

                    current.append_leaf(kind);
                }
            }
        }
    }

    if let Some(&(offset, _)) = open.last() {
        return Err(Error::UnmatchedOpen { offset });
    }

    Ok(root.into_program())
}
