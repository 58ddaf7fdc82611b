use std::rc::Rc;

use gflows_content::ContentReader;
use gflows_fs::FileSystem;
use tracing::debug;

use crate::error::PackageError;
use crate::library::GFlowsLib;

enum LibSlot {
  Ready(GFlowsLib),
  Failed(String),
}

/// Libraries loaded during one run, keyed by manifest reference.
///
/// Each reference is set up at most once. A failure is remembered so every
/// workflow depending on the same library reports it without refetching.
pub struct LibraryEnv {
  fs: Rc<dyn FileSystem>,
  reader: ContentReader,
  libs: Vec<(String, LibSlot)>,
}

impl LibraryEnv {
  pub fn new(fs: Rc<dyn FileSystem>, reader: ContentReader) -> Self {
    Self {
      fs,
      reader,
      libs: Vec::new(),
    }
  }

  /// Return the library for `reference`, setting it up on first use.
  pub fn load_lib(&mut self, reference: &str) -> Result<&GFlowsLib, PackageError> {
    let index = match self.libs.iter().position(|(r, _)| r == reference) {
      Some(index) => index,
      None => {
        let mut lib = GFlowsLib::new(self.fs.clone(), self.reader.clone(), reference);
        let slot = match lib.setup() {
          Ok(()) => LibSlot::Ready(lib),
          Err(e) => {
            debug!(reference, error = %e, "library failed to load");
            LibSlot::Failed(e.to_string())
          }
        };
        self.libs.push((reference.to_string(), slot));
        self.libs.len() - 1
      }
    };

    match &self.libs[index].1 {
      LibSlot::Ready(lib) => Ok(lib),
      LibSlot::Failed(reason) => Err(PackageError::Unavailable {
        reference: reference.to_string(),
        reason: reason.clone(),
      }),
    }
  }

  /// Successfully loaded libraries, in load order.
  pub fn libs(&self) -> impl Iterator<Item = &GFlowsLib> {
    self.libs.iter().filter_map(|(_, slot)| match slot {
      LibSlot::Ready(lib) => Some(lib),
      LibSlot::Failed(_) => None,
    })
  }

  /// Release every loaded library and its staging directory.
  pub fn clean_up(&mut self) -> Result<(), PackageError> {
    let mut result = Ok(());
    for (_, slot) in self.libs.drain(..) {
      if let LibSlot::Ready(mut lib) = slot
        && let Err(e) = lib.clean_up()
      {
        result = result.and(Err(e));
      }
    }
    result
  }
}
