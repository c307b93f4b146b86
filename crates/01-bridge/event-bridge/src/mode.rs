//! Drain mode markers.
//!
//! A bridge is created in exactly one mode and only exposes that mode's drain
//! operation, so single and batch draining can never interleave on the same
//! queue.

mod sealed {
    pub trait Sealed {}
}

/// Marker trait implemented by [`Single`] and [`Batch`].
pub trait DrainMode: sealed::Sealed + Send + Sync + 'static {
    const KIND: DrainKind;
}

/// One payload per checkpoint.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Single;

/// The whole backlog per checkpoint.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Batch;

impl sealed::Sealed for Single {}
impl sealed::Sealed for Batch {}

impl DrainMode for Single {
    const KIND: DrainKind = DrainKind::Single;
}

impl DrainMode for Batch {
    const KIND: DrainKind = DrainKind::Batch;
}

/// Runtime tag for a drain mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DrainKind {
    Single,
    Batch,
}

impl DrainKind {
    pub fn as_str(self) -> &'static str {
        match self {
            DrainKind::Single => "single",
            DrainKind::Batch => "batch",
        }
    }
}
