//! Phase-tagged code fragments and the indenting writer that renders them.

use patchbay_common::Phase;
use patchbay_hardware::InsertDef;
use std::fmt::Write;

/// A piece of C++ bound to the phase it runs in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    /// Where the code runs.
    pub phase: Phase,
    /// The code, possibly several lines.
    pub code: String,
}

impl Fragment {
    /// Creates a fragment.
    pub fn new(phase: Phase, code: impl Into<String>) -> Self {
        Self {
            phase,
            code: code.into(),
        }
    }
}

impl From<&InsertDef> for Fragment {
    fn from(insert: &InsertDef) -> Self {
        Self::new(insert.phase, insert.code.clone())
    }
}

/// Selects the fragments of one phase, in order.
pub fn in_phase(fragments: &[Fragment], phase: Phase) -> impl Iterator<Item = &Fragment> {
    fragments.iter().filter(move |f| f.phase == phase)
}

/// Writes tab-indented C++ line by line.
#[derive(Debug, Default)]
pub struct CodeWriter {
    out: String,
    depth: usize,
}

impl CodeWriter {
    /// Creates an empty writer at depth zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Writes `text` at the current depth, one line per line of `text`.
    ///
    /// Leading and trailing whitespace of each line is replaced by the
    /// writer's indentation; empty lines stay empty.
    pub fn line(&mut self, text: impl AsRef<str>) -> &mut Self {
        for l in text.as_ref().lines() {
            let l = l.trim();
            if l.is_empty() {
                self.out.push('\n');
            } else {
                let _ = writeln!(self.out, "{}{l}", "\t".repeat(self.depth));
            }
        }
        self
    }

    /// Writes an empty line.
    pub fn blank(&mut self) -> &mut Self {
        self.out.push('\n');
        self
    }

    /// Writes `text` and indents what follows.
    pub fn open(&mut self, text: impl AsRef<str>) -> &mut Self {
        self.line(text);
        self.depth += 1;
        self
    }

    /// Dedents and writes `text`.
    pub fn close(&mut self, text: impl AsRef<str>) -> &mut Self {
        self.depth = self.depth.saturating_sub(1);
        self.line(text)
    }

    /// Dedents, writes `text`, and indents again, as for `} else {`.
    pub fn reopen(&mut self, text: impl AsRef<str>) -> &mut Self {
        self.close(text);
        self.depth += 1;
        self
    }

    /// Writes every fragment of `phase`.
    pub fn fragments(&mut self, fragments: &[Fragment], phase: Phase) -> &mut Self {
        for f in in_phase(fragments, phase) {
            self.line(&f.code);
        }
        self
    }

    /// Current indentation depth.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Returns the text written so far.
    pub fn finish(self) -> String {
        self.out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nesting() {
        let mut w = CodeWriter::new();
        w.open("void f() {").line("x = 1;").close("}");
        assert_eq!(w.finish(), "void f() {\n\tx = 1;\n}\n");
    }

    #[test]
    fn multiline_code_is_reindented() {
        let mut w = CodeWriter::new();
        w.open("{").line("a();\n    b();\n\n").close("}");
        assert_eq!(w.finish(), "{\n\ta();\n\tb();\n\n}\n");
    }

    #[test]
    fn reopen_keeps_depth() {
        let mut w = CodeWriter::new();
        w.open("if (a) {").line("x();").reopen("} else {").line("y();").close("}");
        assert_eq!(w.finish(), "if (a) {\n\tx();\n} else {\n\ty();\n}\n");
    }

    #[test]
    fn close_never_underflows() {
        let mut w = CodeWriter::new();
        w.close("}");
        assert_eq!(w.depth(), 0);
    }

    #[test]
    fn phase_filter_keeps_order() {
        let frags = vec![
            Fragment::new(Phase::Main, "a();"),
            Fragment::new(Phase::Audio, "b();"),
            Fragment::new(Phase::Main, "c();"),
        ];
        let mut w = CodeWriter::new();
        w.fragments(&frags, Phase::Main);
        assert_eq!(w.finish(), "a();\nc();\n");
    }

    #[test]
    fn from_insert() {
        let insert = InsertDef {
            phase: Phase::Header,
            code: "#include \"x.h\"".into(),
        };
        assert_eq!(Fragment::from(&insert), Fragment::new(Phase::Header, "#include \"x.h\""));
    }
}
