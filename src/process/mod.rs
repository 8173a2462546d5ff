//! The step contract implemented by flow authors.
//!
//! - [`Process`] - one named step: `initialize` once, then `perform`
//! - [`Dataset`] - the opaque payload passed between steps
//! - [`FnProcess`] - adapter turning a closure into a process

mod dataset;

pub use dataset::Dataset;

use crate::context::Context;
use crate::execution::{InputStream, OutputStream};

/// A single step of a flow.
///
/// Every process in a flow is initialized before any process performs.
/// `perform` is called at most once per run, after all of its upstream
/// processes have performed.
pub trait Process: Send + Sync {
    /// One-time setup with the flow-level context.
    ///
    /// Values put here are visible to every process of the run.
    fn initialize(&self, _context: &Context) -> anyhow::Result<()> {
        Ok(())
    }

    /// Read named inputs, write named outputs.
    fn perform(
        &self,
        input: &InputStream,
        output: &mut OutputStream,
        context: &Context,
    ) -> anyhow::Result<()>;
}

/// A process backed by a closure, with no initialization step.
///
/// # Example
///
/// ```
/// use procflow::process::{Dataset, FnProcess};
///
/// let constant = FnProcess::new(|_input, output, _ctx| {
///     output.write_default(Dataset::new(vec![1, 2, 3]));
///     Ok(())
/// });
/// # let _ = constant;
/// ```
pub struct FnProcess<F> {
    body: F,
}

impl<F> FnProcess<F>
where
    F: Fn(&InputStream, &mut OutputStream, &Context) -> anyhow::Result<()> + Send + Sync,
{
    /// Wrap `body` as a process.
    pub fn new(body: F) -> Self {
        Self { body }
    }
}

impl<F> Process for FnProcess<F>
where
    F: Fn(&InputStream, &mut OutputStream, &Context) -> anyhow::Result<()> + Send + Sync,
{
    fn perform(
        &self,
        input: &InputStream,
        output: &mut OutputStream,
        context: &Context,
    ) -> anyhow::Result<()> {
        (self.body)(input, output, context)
    }
}
