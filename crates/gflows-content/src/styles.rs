use colored::Colorize;

/// Terminal styling for progress output.
///
/// When disabled every helper returns its input unchanged, which keeps the
/// output byte-exact for tests and for piping into other tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Styles {
  enabled: bool,
}

impl Styles {
  pub fn new(enabled: bool) -> Self {
    Self { enabled }
  }

  pub fn plain() -> Self {
    Self::new(false)
  }

  pub fn bold(&self, text: &str) -> String {
    self.apply(text, |t| t.bold().to_string())
  }

  pub fn error(&self, text: &str) -> String {
    self.apply(text, |t| t.red().bold().to_string())
  }

  pub fn ok(&self, text: &str) -> String {
    self.apply(text, |t| t.green().bold().to_string())
  }

  pub fn warning(&self, text: &str) -> String {
    self.apply(text, |t| t.yellow().to_string())
  }

  pub fn info(&self, text: &str) -> String {
    self.apply(text, |t| t.cyan().to_string())
  }

  pub fn added(&self, text: &str) -> String {
    self.apply(text, |t| t.green().to_string())
  }

  pub fn removed(&self, text: &str) -> String {
    self.apply(text, |t| t.red().to_string())
  }

  fn apply(&self, text: &str, style: impl Fn(&str) -> String) -> String {
    if self.enabled {
      style(text)
    } else {
      text.to_string()
    }
  }
}

impl Default for Styles {
  fn default() -> Self {
    Self::new(true)
  }
}
