use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;

use crate::styles::Styles;

/// The single ordered output stream for user-facing progress.
///
/// Cloning a logger shares the underlying stream, so lines written through
/// different components interleave in call order.
#[derive(Clone)]
pub struct Logger {
  out: Rc<RefCell<Box<dyn Write>>>,
  styles: Styles,
}

impl Logger {
  pub fn new(out: impl Write + 'static, styles: Styles) -> Self {
    Self {
      out: Rc::new(RefCell::new(Box::new(out))),
      styles,
    }
  }

  pub fn stdout(styles: Styles) -> Self {
    Self::new(io::stdout(), styles)
  }

  /// A logger writing unstyled output into a buffer that can be inspected afterwards.
  pub fn buffered() -> (Self, OutputBuffer) {
    let buffer = OutputBuffer::default();
    (Self::new(buffer.clone(), Styles::plain()), buffer)
  }

  pub fn styles(&self) -> &Styles {
    &self.styles
  }

  pub fn print(&self, text: &str) {
    let mut out = self.out.borrow_mut();
    if let Err(e) = out.write_all(text.as_bytes()).and_then(|_| out.flush()) {
      tracing::warn!(error = %e, "failed to write output");
    }
  }

  pub fn println(&self, text: &str) {
    self.print(&format!("{}\n", text));
  }

  /// Print each error as a bullet. Multi-line errors continue on indented lines.
  pub fn print_status_errors(&self, errors: &[String]) {
    for error in errors {
      let mut lines = error.trim_matches(|c: char| c == ' ' || c == '\n' || c == '\r').lines();
      let first = lines.next().unwrap_or_default();
      self.println(&format!("  {} {}", self.styles.error("►"), first));
      for line in lines {
        self.println(&format!("    {}", line));
      }
    }
  }

  /// Print a unified diff, colouring additions, removals and hunk headers.
  pub fn pretty_print_diff(&self, diff: &str) {
    for line in diff.lines() {
      let styled = if line.starts_with("+++") || line.starts_with("---") {
        self.styles.bold(line)
      } else if line.starts_with('+') {
        self.styles.added(line)
      } else if line.starts_with('-') {
        self.styles.removed(line)
      } else if line.starts_with("@@") {
        self.styles.info(line)
      } else {
        line.to_string()
      };
      self.println(&styled);
    }
  }
}

/// A shared in-memory output buffer.
#[derive(Clone, Default)]
pub struct OutputBuffer {
  bytes: Rc<RefCell<Vec<u8>>>,
}

impl OutputBuffer {
  pub fn contents(&self) -> String {
    String::from_utf8_lossy(&self.bytes.borrow()).into_owned()
  }
}

impl Write for OutputBuffer {
  fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
    self.bytes.borrow_mut().extend_from_slice(buf);
    Ok(buf.len())
  }

  fn flush(&mut self) -> io::Result<()> {
    Ok(())
  }
}
