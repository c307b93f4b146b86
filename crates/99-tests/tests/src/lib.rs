//! End-to-end scenarios: a relay delivering messages to a message log hosted
//! by the checkpoint scheduler, with and without an event bridge in between.

#[cfg(test)]
mod support;

#[cfg(test)]
mod stale_snapshot;

#[cfg(test)]
mod single_mode;

#[cfg(test)]
mod batch_mode;

#[cfg(test)]
mod threaded_relay;
