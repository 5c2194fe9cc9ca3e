//! Loaded class units.

use packscan_plugin::{BoxError, LoadedUnit};
use ristretto_classfile::ClassFile;
use std::any::Any;
use std::sync::atomic::{AtomicBool, Ordering};

/// A class materialized from a classpath root.
///
/// Activation is the unit's initialization phase: structural verification
/// of the parsed class file. It runs at most once per unit, however many
/// times [`activate`](ClassUnit::activate) is called or from however many
/// threads.
pub struct ClassUnit {
    name: String,
    class_file: ClassFile,
    initialized: AtomicBool,
}

impl ClassUnit {
    pub(crate) fn new(name: String, class_file: ClassFile) -> Self {
        Self {
            name,
            class_file,
            initialized: AtomicBool::new(false),
        }
    }

    /// The parsed class file backing this unit.
    pub fn class_file(&self) -> &ClassFile {
        &self.class_file
    }

    /// Run the one-shot activation. Returns true when this call actually
    /// performed it, false when the unit was already initialized.
    pub(crate) fn activate(&self) -> Result<bool, BoxError> {
        if self.initialized.load(Ordering::Acquire) {
            return Ok(false);
        }
        self.class_file
            .verify()
            .map_err(|err| format!("verification of {} failed: {err}", self.name))?;
        // Two racing activations may both verify; exactly one observes
        // the flag flip.
        let already = self.initialized.swap(true, Ordering::AcqRel);
        Ok(!already)
    }
}

impl LoadedUnit for ClassUnit {
    fn name(&self) -> &str {
        &self.name
    }

    fn initialized(&self) -> bool {
        self.initialized.load(Ordering::Acquire)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
