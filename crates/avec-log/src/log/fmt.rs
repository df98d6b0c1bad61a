use std::io;

use avec_mem::{DynArray, Element};

use termcolor::WriteColor;

use super::*;

/// Output layout of one level: a sequence of text and message segments.
#[derive(Default)]
pub struct LogFmt {
    segments: DynArray<SegmentSpec>,
}

impl LogFmt {

    /// `[LEVEL] message`, with the tag colored after the level.
    pub fn for_level(level: Level) -> Result<Self> {
        let (tag, color) = match level {
            Level::Error => ("[ERROR] ", Color::Red),
            Level::Warn => ("[WARN] ", Color::Yellow),
            Level::Info => ("[INFO] ", Color::Green),
            Level::Debug => ("[DEBUG] ", Color::Blue),
            Level::Trace => ("[TRACE] ", Color::Magenta),
        };
        let mut fmt = Self::default();
        LogFmtBuilder::new(&mut fmt)
            .text(tag, |spec| spec.with_color_spec(|c| { c.set_fg(Some(color)).set_bold(true); }))?
            .message(|spec| spec)?;
        Ok(fmt)
    }

    #[inline(always)]
    fn clear(&mut self) {
        self.segments.clear();
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Writes one record followed by a newline.
    pub fn render<W: WriteColor>(&self, out: &mut W, msg: core::fmt::Arguments) -> io::Result<()> {
        for segment in self {
            let (spec, text) = match segment {
                SegmentSpec::Message(spec) => (spec, None),
                SegmentSpec::Text(text, spec) => (spec, Some(text)),
            };
            if let Some(color_spec) = &spec.color_spec {
                out.set_color(color_spec)?;
            }
            match text {
                Some(text) => out.write_all(text.as_bytes())?,
                None => write!(out, "{}", msg)?,
            }
            if spec.color_spec.is_some() {
                out.reset()?;
            }
        }
        out.write_all(b"\n")
    }
}

impl<'a> IntoIterator for &'a LogFmt {

    type Item = &'a SegmentSpec;
    type IntoIter = avec_mem::Iter<'a, SegmentSpec>;

    fn into_iter(self) -> Self::IntoIter {
        self.segments.iter()
    }
}

#[derive(Default, Clone)]
pub struct LogSpec {
    pub color_spec: Option<ColorSpec>,
}

impl LogSpec {

    #[inline(always)]
    pub fn with_color_spec(mut self, f: impl FnOnce(&mut ColorSpec)) -> Self {
        let color_spec = self.color_spec.insert(ColorSpec::new());
        f(color_spec);
        self
    }
}

pub enum SegmentSpec {
    Message(LogSpec),
    Text(CompactString, LogSpec),
}

unsafe impl Element for SegmentSpec {}

pub struct LogFmtBuilder<'a> {
    fmt: &'a mut LogFmt,
}

impl<'a> LogFmtBuilder<'a> {

    /// Starts over from an empty layout.
    #[inline(always)]
    pub fn new(fmt: &'a mut LogFmt) -> Self {
        fmt.clear();
        Self {
            fmt,
        }
    }

    #[inline(always)]
    pub fn message(&mut self, f: impl FnOnce(LogSpec) -> LogSpec) -> Result<&mut Self> {
        self.fmt.segments.push_back(SegmentSpec::Message(f(Default::default())))?;
        Ok(self)
    }

    #[inline(always)]
    pub fn text(&mut self, text: &str, f: impl FnOnce(LogSpec) -> LogSpec) -> Result<&mut Self> {
        self.fmt.segments.push_back(SegmentSpec::Text(CompactString::new(text), f(Default::default())))?;
        Ok(self)
    }
}
