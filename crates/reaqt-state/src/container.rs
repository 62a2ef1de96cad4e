#![forbid(unsafe_code)]

//! The capability shared by reactive containers.

use std::fmt::Debug;

/// A reactive container that can produce a plain snapshot of itself.
pub trait Container {
    /// Plain, non-reactive copy of the contents.
    type Snapshot;

    /// Snapshot the current contents. The result holds no streams or
    /// containers and does not change when the container does.
    fn freeze(&self) -> Self::Snapshot;

    /// Log the current snapshot at debug level.
    fn debug(&self)
    where
        Self::Snapshot: Debug,
    {
        tracing::debug!(snapshot = ?self.freeze(), "container snapshot");
    }
}
