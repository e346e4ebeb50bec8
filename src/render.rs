use crate::command::{Command, Program};

/// Canonical text of `program`: one symbol per leaf, loops in brackets, no
/// whitespace.
pub fn render(program: &Program) -> String {
    let mut buffer = String::with_capacity(program.len());
    let mut stack = vec![program.iter()];

    while let Some(commands) = stack.last_mut() {
        match commands.next() {
            Some(Command::Loop(body)) => {
                buffer.push('[');
                stack.push(body.iter());
            }
            Some(command) => {
                if let Some(leaf) = command.leaf() {
                    buffer.push(leaf.symbol());
                }
            }
            None => {
                stack.pop();
                if !stack.is_empty() {
                    buffer.push(']');
                }
            }
        }
    }

    buffer
}
