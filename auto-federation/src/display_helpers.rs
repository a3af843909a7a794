use std::fmt;
use std::fmt::Display;

/// Line oriented writer for SDL text: lines are separated by `\n` and indented by two spaces
/// per level, with nothing written after the last line.
pub(crate) struct State<'fmt, 'fmt2> {
    indent_level: usize,
    started: bool,
    output: &'fmt mut fmt::Formatter<'fmt2>,
}

impl<'a, 'b> State<'a, 'b> {
    pub(crate) fn new(output: &'a mut fmt::Formatter<'b>) -> State<'a, 'b> {
        Self {
            indent_level: 0,
            started: false,
            output,
        }
    }

    pub(crate) fn write<T: Display>(&mut self, value: T) -> fmt::Result {
        write!(self.output, "{}", value)
    }

    pub(crate) fn write_fmt(&mut self, args: fmt::Arguments<'_>) -> fmt::Result {
        self.output.write_fmt(args)
    }

    /// Starts a line at the current indentation. The first line of the output has no separator.
    pub(crate) fn new_line(&mut self) -> fmt::Result {
        if self.started {
            self.write("\n")?;
        }
        self.started = true;
        for _ in 0..self.indent_level {
            self.write("  ")?
        }
        Ok(())
    }

    pub(crate) fn indent_no_new_line(&mut self) {
        self.indent_level += 1;
    }

    pub(crate) fn dedent(&mut self) -> fmt::Result {
        self.indent_level = self.indent_level.saturating_sub(1);
        self.new_line()
    }
}

/// Writes each value on its own line one level deeper, then starts a line back at the outer
/// level. An empty `values` still starts the closing line.
pub(crate) fn write_indented_lines<T>(
    state: &mut State<'_, '_>,
    values: &[T],
    mut write_line: impl FnMut(&mut State<'_, '_>, &T) -> fmt::Result,
) -> fmt::Result {
    state.indent_no_new_line();
    for value in values {
        state.new_line()?;
        write_line(state, value)?;
    }
    state.dedent()
}
