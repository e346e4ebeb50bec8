use tracing::{debug, trace};

use crate::command::{Command, Program};
use crate::error::{Error, Result};
use crate::io::{Input, Output};
use crate::tape::Tape;

/// What `Read` does when the input port is exhausted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EofPolicy {
    /// Fail with `Error::InputExhausted`.
    #[default]
    Fail,
    /// Store 0 in the current cell.
    Zero,
    /// Leave the current cell as it is.
    Unchanged,
}

/// Configuration for an [`Engine`].
#[derive(Debug, Clone, Default)]
pub struct ExecConfig {
    /// Maximum number of steps before the run is aborted. Every executed
    /// leaf and every loop test counts as one step. `None` runs until the
    /// program ends.
    pub step_limit: Option<usize>,
    pub on_eof: EofPolicy,
}

/// One program level on the work stack.
///
/// A loop frame moves between testing the cell and running its body; the
/// root frame runs once.
struct Frame<'a> {
    body: &'a [Command],
    next: usize,
    repeat: bool,
}

impl<'a> Frame<'a> {
    fn root(program: &'a Program) -> Self {
        Self {
            body: program.commands(),
            next: 0,
            repeat: false,
        }
    }

    fn looped(program: &'a Program) -> Self {
        Self {
            body: program.commands(),
            next: 0,
            repeat: true,
        }
    }
}

/// Interprets programs against a tape.
///
/// Nested loops are walked with an explicit stack of frames, so nesting
/// depth does not grow the host call stack.
#[derive(Debug, Clone, Default)]
pub struct Engine {
    config: ExecConfig,
}

impl Engine {
    pub fn new(config: ExecConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ExecConfig {
        &self.config
    }

    /// Run `program` on `tape`, starting from its current cursor.
    ///
    /// Returns the number of steps executed. The output port is flushed
    /// before every read and once the program ends.
    pub fn run<I, O>(
        &self,
        program: &Program,
        tape: &mut Tape,
        input: &mut I,
        output: &mut O,
    ) -> Result<usize>
    where
        I: Input + ?Sized,
        O: Output + ?Sized,
    {
        debug!(commands = program.len(), "starting run");

        let mut steps = 0;
        let mut stack = vec![Frame::root(program)];

        while let Some(frame) = stack.last_mut() {
            let body = frame.body;

            let Some(command) = body.get(frame.next) else {
                // End of body: re-test a loop, otherwise leave the level.
                if frame.repeat {
                    self.tick(&mut steps)?;
                    if tape.read_cell() != 0 {
                        frame.next = 0;
                        continue;
                    }
                }
                stack.pop();
                continue;
            };
            frame.next += 1;

            self.tick(&mut steps)?;

            match command {
                Command::Inc => tape.write_cell(|value| value.wrapping_add(1)),
                Command::Dec => tape.write_cell(|value| value.wrapping_sub(1)),
                Command::MoveRight => tape.move_right(),
                Command::MoveLeft => tape.move_left(),
                Command::Print => output.write_byte(tape.read_cell())?,
                Command::Read => {
                    output.flush()?;
                    self.read_into(tape, input)?;
                }
                Command::Loop(inner) => {
                    if tape.read_cell() != 0 {
                        trace!(depth = stack.len(), cursor = tape.cursor(), "entering loop");
                        stack.push(Frame::looped(inner));
                    }
                }
            }
        }

        output.flush()?;
        debug!(steps, cursor = tape.cursor(), "run finished");

        Ok(steps)
    }

    fn tick(&self, steps: &mut usize) -> Result<()> {
        *steps += 1;
        match self.config.step_limit {
            Some(limit) if *steps > limit => Err(Error::StepLimitExceeded { limit }),
            _ => Ok(()),
        }
    }

    fn read_into<I: Input + ?Sized>(&self, tape: &mut Tape, input: &mut I) -> Result<()> {
        match input.read_byte()? {
            Some(byte) => tape.write_cell(|_| byte),
            None => match self.config.on_eof {
                EofPolicy::Fail => {
                    return Err(Error::InputExhausted {
                        cursor: tape.cursor(),
                    });
                }
                EofPolicy::Zero => tape.write_cell(|_| 0),
                EofPolicy::Unchanged => {}
            },
        }
        Ok(())
    }
}

/// Run `program` on a fresh tape with the default configuration and return
/// the tape it leaves behind.
pub fn execute<I, O>(program: &Program, input: &mut I, output: &mut O) -> Result<Tape>
where
    I: Input + ?Sized,
    O: Output + ?Sized,
{
    let mut tape = Tape::new();
    Engine::default().run(program, &mut tape, input, output)?;
    Ok(tape)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::Builder;
    use crate::parse::parse;

    fn run_text(source: &str, input: &[u8]) -> (Tape, Vec<u8>) {
        let program = parse(source).unwrap();
        let mut input = input;
        let mut output = Vec::new();
        let tape = execute(&program, &mut input, &mut output).unwrap();
        (tape, output)
    }

    #[test]
    fn test_inc_256_times_wraps_to_zero() {
        let mut builder = Builder::new();
        for _ in 0..256 {
            builder.inc();
        }
        let mut output: Vec<u8> = Vec::new();
        let tape = execute(&builder.to_program(), &mut &b""[..], &mut output).unwrap();
        assert_eq!(tape.read_cell(), 0);
        assert!(output.is_empty());
    }

    #[test]
    fn test_dec_from_zero_wraps() {
        let (tape, _) = run_text("-", b"");
        assert_eq!(tape.read_cell(), 255);
    }

    #[test]
    fn test_print_after_three_increments() {
        let (_, output) = run_text("+++.", b"");
        assert_eq!(output, vec![3]);
    }

    #[test]
    fn test_read_then_print_echoes() {
        let mut builder = Builder::new();
        builder.read().print();
        let mut input: &[u8] = &[65];
        let mut output: Vec<u8> = Vec::new();
        execute(&builder.to_program(), &mut input, &mut output).unwrap();
        assert_eq!(output, vec![65]);
    }

    #[test]
    fn test_loop_skipped_on_zero_cell() {
        // The body would print and move if it ran.
        let (tape, output) = run_text(">[.>+]", b"");
        assert!(output.is_empty());
        assert_eq!(tape.cursor(), 1);
        assert!(tape.cells().is_empty());
    }

    #[test]
    fn test_loop_runs_n_times() {
        // Count iterations in the neighbouring cell.
        let (tape, _) = run_text("+++++++[>+<-]", b"");
        assert_eq!(tape.read_at(0), 0);
        assert_eq!(tape.read_at(1), 7);
        assert_eq!(tape.cursor(), 0);
    }

    #[test]
    fn test_nested_loops_multiply() {
        let (tape, _) = run_text("+++[>++++[>+<-]<-]", b"");
        assert_eq!(tape.read_at(0), 0);
        assert_eq!(tape.read_at(1), 0);
        assert_eq!(tape.read_at(2), 12);
    }

    #[test]
    fn test_hello_world() {
        let source = "++++++++[>++++[>++>+++>+++>+<<<<-]>+>+>->>+[<]<-]>>.>---.+++++++..+++.>>.<-.<.+++.------.--------.>>+.>++.";
        let (_, output) = run_text(source, b"");
        assert_eq!(output, b"Hello World!\n");
    }

    #[test]
    fn test_cursor_moves_left_of_origin() {
        let (tape, _) = run_text("<<+", b"");
        assert_eq!(tape.cursor(), -2);
        assert_eq!(tape.read_at(-2), 1);
    }

    #[test]
    fn test_input_exhausted_fails_by_default() {
        let program = parse(">,").unwrap();
        let mut output: Vec<u8> = Vec::new();
        let err = execute(&program, &mut &b""[..], &mut output).unwrap_err();
        assert!(matches!(err, Error::InputExhausted { cursor: 1 }));
    }

    #[test]
    fn test_eof_zero_policy() {
        let program = parse("+++,").unwrap();
        let engine = Engine::new(ExecConfig {
            on_eof: EofPolicy::Zero,
            ..Default::default()
        });
        let mut tape = Tape::new();
        engine
            .run(&program, &mut tape, &mut &b""[..], &mut Vec::<u8>::new())
            .unwrap();
        assert_eq!(tape.read_cell(), 0);
    }

    #[test]
    fn test_eof_unchanged_policy() {
        let program = parse("+++,").unwrap();
        let engine = Engine::new(ExecConfig {
            on_eof: EofPolicy::Unchanged,
            ..Default::default()
        });
        let mut tape = Tape::new();
        engine
            .run(&program, &mut tape, &mut &b""[..], &mut Vec::<u8>::new())
            .unwrap();
        assert_eq!(tape.read_cell(), 3);
    }

    #[test]
    fn test_step_count() {
        // 2 leaves, 1 loop entry, 2 iterations of 1 leaf, 2 re-tests.
        let program = parse("++[-]").unwrap();
        let steps = Engine::default()
            .run(&program, &mut Tape::new(), &mut &b""[..], &mut Vec::<u8>::new())
            .unwrap();
        assert_eq!(steps, 7);
    }

    #[test]
    fn test_step_limit_stops_endless_loop() {
        let program = parse("+[]").unwrap();
        let engine = Engine::new(ExecConfig {
            step_limit: Some(100),
            ..Default::default()
        });
        let err = engine
            .run(&program, &mut Tape::new(), &mut &b""[..], &mut Vec::<u8>::new())
            .unwrap_err();
        assert!(matches!(err, Error::StepLimitExceeded { limit: 100 }));
    }

    #[test]
    fn test_run_continues_existing_tape() {
        let engine = Engine::default();
        let mut tape = Tape::new();
        let program = parse("+>").unwrap();
        engine
            .run(&program, &mut tape, &mut &b""[..], &mut Vec::<u8>::new())
            .unwrap();
        engine
            .run(&program, &mut tape, &mut &b""[..], &mut Vec::<u8>::new())
            .unwrap();
        assert_eq!(tape.cells(), vec![(0, 1), (1, 1)]);
        assert_eq!(tape.cursor(), 2);
    }

    #[derive(Debug, PartialEq)]
    enum Event {
        Byte(u8),
        Flush,
    }

    #[derive(Default)]
    struct Recorder {
        events: Vec<Event>,
    }

    impl Output for Recorder {
        fn write_byte(&mut self, byte: u8) -> Result<()> {
            self.events.push(Event::Byte(byte));
            Ok(())
        }

        fn flush(&mut self) -> Result<()> {
            self.events.push(Event::Flush);
            Ok(())
        }
    }

    #[test]
    fn test_output_flushed_before_read_and_at_end() {
        let program = parse("+.,.").unwrap();
        let mut output = Recorder::default();
        execute(&program, &mut &b"A"[..], &mut output).unwrap();
        assert_eq!(
            output.events,
            vec![Event::Byte(1), Event::Flush, Event::Byte(b'A'), Event::Flush]
        );
    }

    struct Broken;

    impl std::io::Read for Broken {
        fn read(&mut self, _: &mut [u8]) -> std::io::Result<usize> {
            Err(std::io::Error::other("device gone"))
        }
    }

    #[test]
    fn test_stream_error_reaches_caller() {
        let program = parse(",").unwrap();
        let mut input = crate::io::Reader::new(Broken);
        let err = execute(&program, &mut input, &mut Vec::<u8>::new()).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_deep_nesting_does_not_overflow() {
        let depth = 100_000;
        let source = format!("+{}-{}", "[".repeat(depth), "]".repeat(depth));
        let (tape, _) = run_text(&source, b"");
        assert_eq!(tape.read_cell(), 0);
    }
}
