use std::fmt;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::render::render;

/// The six instructions that carry no nested program.
///
/// Declaration order is the arity order used by call-shape front-ends:
/// zero unit arguments is `Inc`, five is `Read`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Leaf {
    Inc,
    Dec,
    MoveRight,
    MoveLeft,
    Print,
    Read,
}

impl Leaf {
    pub const ALL: [Leaf; 6] = [
        Leaf::Inc,
        Leaf::Dec,
        Leaf::MoveRight,
        Leaf::MoveLeft,
        Leaf::Print,
        Leaf::Read,
    ];

    /// Resolve a front-end call shape of `arity` unit arguments.
    pub fn from_arity(arity: usize) -> Result<Self> {
        Self::ALL
            .get(arity)
            .copied()
            .ok_or(Error::UnsupportedArity { arity })
    }

    pub const fn symbol(self) -> char {
        match self {
            Leaf::Inc => '+',
            Leaf::Dec => '-',
            Leaf::MoveRight => '>',
            Leaf::MoveLeft => '<',
            Leaf::Print => '.',
            Leaf::Read => ',',
        }
    }

    pub const fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            '+' => Some(Leaf::Inc),
            '-' => Some(Leaf::Dec),
            '>' => Some(Leaf::MoveRight),
            '<' => Some(Leaf::MoveLeft),
            '.' => Some(Leaf::Print),
            ',' => Some(Leaf::Read),
            _ => None,
        }
    }
}

/// One instruction of a program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Inc,
    Dec,
    MoveRight,
    MoveLeft,
    Print,
    Read,
    /// Repeat `body` while the cell under the cursor is non-zero.
    ///
    /// Bodies are shared, so snapshotting a program copies one level only.
    Loop(Arc<Program>),
}

impl Command {
    /// The leaf kind of this command, or `None` for a loop.
    pub const fn leaf(&self) -> Option<Leaf> {
        match self {
            Command::Inc => Some(Leaf::Inc),
            Command::Dec => Some(Leaf::Dec),
            Command::MoveRight => Some(Leaf::MoveRight),
            Command::MoveLeft => Some(Leaf::MoveLeft),
            Command::Print => Some(Leaf::Print),
            Command::Read => Some(Leaf::Read),
            Command::Loop(_) => None,
        }
    }
}

impl From<Leaf> for Command {
    fn from(leaf: Leaf) -> Self {
        match leaf {
            Leaf::Inc => Command::Inc,
            Leaf::Dec => Command::Dec,
            Leaf::MoveRight => Command::MoveRight,
            Leaf::MoveLeft => Command::MoveLeft,
            Leaf::Print => Command::Print,
            Leaf::Read => Command::Read,
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self {
            Command::Loop(body) => return write!(f, "[{body}]"),
            Command::Inc => Leaf::Inc,
            Command::Dec => Leaf::Dec,
            Command::MoveRight => Leaf::MoveRight,
            Command::MoveLeft => Leaf::MoveLeft,
            Command::Print => Leaf::Print,
            Command::Read => Leaf::Read,
        };
        write!(f, "{}", kind.symbol())
    }
}

/// An ordered, immutable sequence of commands.
///
/// Programs have value semantics: the only way to obtain one is from a
/// [`Builder`](crate::builder::Builder), which hands out snapshots, so a
/// program captured as a loop body never changes afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Program {
    commands: Vec<Command>,
}

impl Program {
    pub(crate) fn from_commands(commands: Vec<Command>) -> Self {
        Self { commands }
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Command> {
        self.commands.iter()
    }
}

// Deeply nested loops would otherwise be dropped recursively.
impl Drop for Program {
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.commands);
        while let Some(command) = pending.pop() {
            // A body still shared elsewhere is released by its last owner.
            if let Command::Loop(mut body) = command {
                if let Some(body) = Arc::get_mut(&mut body) {
                    pending.append(&mut body.commands);
                }
            }
        }
    }
}

impl<'a> IntoIterator for &'a Program {
    type Item = &'a Command;
    type IntoIter = std::slice::Iter<'a, Command>;

    fn into_iter(self) -> Self::IntoIter {
        self.commands.iter()
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&render(self))
    }
}
