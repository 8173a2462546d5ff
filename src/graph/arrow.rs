//! Port-qualified edges and the path builder that produces them.

use std::fmt;

/// Port name used when a process writes or reads without naming one.
pub const DEFAULT_PORT: &str = "default";

/// A directed edge from one process's output port to another's input port.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Arrow {
    /// Upstream process name.
    pub from: String,
    /// Downstream process name; `None` until a path binds it.
    pub to: Option<String>,
    /// Port of the upstream output stream this arrow reads. Empty means
    /// [`DEFAULT_PORT`].
    pub output_port: String,
    /// Key under which the downstream process sees this input. Empty means
    /// the upstream process name.
    pub input_port: String,
}

impl Arrow {
    /// Create an arrow with unnamed ports.
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: Some(to.into()),
            output_port: String::new(),
            input_port: String::new(),
        }
    }

    /// Create an arrow whose destination is not yet known.
    pub fn pending(from: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: None,
            output_port: String::new(),
            input_port: String::new(),
        }
    }

    /// Set the output port name.
    pub fn with_output_port(mut self, port: impl Into<String>) -> Self {
        self.output_port = port.into();
        self
    }

    /// Set the input port name.
    pub fn with_input_port(mut self, port: impl Into<String>) -> Self {
        self.input_port = port.into();
        self
    }

    /// Whether a destination has been bound.
    pub fn is_bound(&self) -> bool {
        self.to.is_some()
    }

    /// Output port actually read from the upstream process.
    pub fn output_key(&self) -> &str {
        if self.output_port.is_empty() {
            DEFAULT_PORT
        } else {
            &self.output_port
        }
    }

    /// Input port the downstream process reads this arrow under.
    pub fn input_key(&self) -> &str {
        if self.input_port.is_empty() {
            &self.from
        } else {
            &self.input_port
        }
    }
}

impl fmt::Display for Arrow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let to = self.to.as_deref().unwrap_or("?");
        write!(
            f,
            "{}[{}] -> {}[{}]",
            self.from,
            self.output_key(),
            to,
            self.input_key()
        )
    }
}

/// Fluent builder for a chain of arrows.
///
/// # Example
///
/// ```
/// use procflow::graph::Path;
///
/// let path = Path::from_process("extract").to("clean").to("load");
/// let arrows = path.arrows();
/// assert_eq!(arrows.len(), 2);
/// assert_eq!(arrows[0].from, "extract");
/// assert_eq!(arrows[1].to.as_deref(), Some("load"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Path {
    arrows: Vec<Arrow>,
    /// Destinations given to `to` while no arrow existed.
    orphans: Vec<String>,
    /// Port names given while no arrow existed.
    stray_ports: Vec<String>,
}

impl Path {
    /// Create an empty path.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a path rooted at `process`.
    pub fn from_process(process: impl Into<String>) -> Self {
        Self::new().from(process)
    }

    /// Add a pending arrow leaving `process`.
    #[allow(clippy::should_implement_trait)]
    pub fn from(mut self, process: impl Into<String>) -> Self {
        self.arrows.push(Arrow::pending(process));
        self
    }

    /// Bind the destination of the most recent arrow.
    ///
    /// If that arrow is already bound, a new arrow from its destination to
    /// `process` is appended, so `a.to(b).to(c)` yields `a -> b -> c`.
    /// Calling `to` on an empty path is recorded and reported by
    /// `Flow::analyze`.
    pub fn to(mut self, process: impl Into<String>) -> Self {
        let process = process.into();
        match self.arrows.last_mut() {
            Some(arrow) if arrow.to.is_none() => arrow.to = Some(process),
            Some(arrow) => {
                let from = arrow.to.clone().unwrap_or_default();
                self.arrows.push(Arrow::new(from, process));
            }
            None => self.orphans.push(process),
        }
        self
    }

    /// Name the output port of the most recent arrow.
    ///
    /// On an empty path the name is recorded and reported by
    /// `Flow::analyze`.
    pub fn output_port(mut self, port: impl Into<String>) -> Self {
        let port = port.into();
        match self.arrows.last_mut() {
            Some(arrow) => arrow.output_port = port,
            None => self.stray_ports.push(port),
        }
        self
    }

    /// Name the input port of the most recent arrow.
    ///
    /// On an empty path the name is recorded and reported by
    /// `Flow::analyze`.
    pub fn input_port(mut self, port: impl Into<String>) -> Self {
        let port = port.into();
        match self.arrows.last_mut() {
            Some(arrow) => arrow.input_port = port,
            None => self.stray_ports.push(port),
        }
        self
    }

    /// Arrows in insertion order.
    pub fn arrows(&self) -> &[Arrow] {
        &self.arrows
    }

    /// Destinations that had no arrow to bind.
    pub fn orphans(&self) -> &[String] {
        &self.orphans
    }

    /// Port names that had no arrow to attach to.
    pub fn stray_ports(&self) -> &[String] {
        &self.stray_ports
    }

    /// Consume the path, returning its arrows, orphaned destinations and
    /// stray port names.
    pub fn into_parts(self) -> (Vec<Arrow>, Vec<String>, Vec<String>) {
        (self.arrows, self.orphans, self.stray_ports)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arrow_new_has_empty_ports() {
        let arrow = Arrow::new("a", "b");
        assert!(arrow.output_port.is_empty());
        assert!(arrow.input_port.is_empty());
        assert!(arrow.is_bound());
    }

    #[test]
    fn empty_ports_resolve_to_defaults() {
        let arrow = Arrow::new("a", "b");
        assert_eq!(arrow.output_key(), DEFAULT_PORT);
        assert_eq!(arrow.input_key(), "a");
    }

    #[test]
    fn named_ports_are_used_as_is() {
        let arrow = Arrow::new("a", "b")
            .with_output_port("rows")
            .with_input_port("left");
        assert_eq!(arrow.output_key(), "rows");
        assert_eq!(arrow.input_key(), "left");
    }

    #[test]
    fn arrow_display_shows_ports() {
        let arrow = Arrow::new("a", "b").with_input_port("left");
        assert_eq!(arrow.to_string(), "a[default] -> b[left]");
        assert_eq!(Arrow::pending("a").to_string(), "a[default] -> ?[a]");
    }

    #[test]
    fn from_creates_pending_arrow() {
        let path = Path::from_process("a");
        assert_eq!(path.arrows().len(), 1);
        assert!(!path.arrows()[0].is_bound());
    }

    #[test]
    fn to_binds_pending_arrow() {
        let path = Path::from_process("a").to("b");
        assert_eq!(path.arrows(), &[Arrow::new("a", "b")]);
    }

    #[test]
    fn to_continues_a_bound_path() {
        let path = Path::from_process("a").to("b").to("c");
        assert_eq!(path.arrows(), &[Arrow::new("a", "b"), Arrow::new("b", "c")]);
    }

    #[test]
    fn ports_on_empty_path_are_recorded() {
        let path = Path::new().output_port("x").input_port("y");
        assert!(path.arrows().is_empty());
        assert!(path.orphans().is_empty());
        assert_eq!(path.stray_ports(), &["x".to_string(), "y".to_string()]);
    }

    #[test]
    fn from_after_to_starts_new_branch() {
        let path = Path::from_process("a").to("c").from("b").to("c");
        assert_eq!(path.arrows(), &[Arrow::new("a", "c"), Arrow::new("b", "c")]);
    }

    #[test]
    fn to_on_empty_path_is_recorded() {
        let path = Path::new().to("b");
        assert!(path.arrows().is_empty());
        assert_eq!(path.orphans(), &["b".to_string()]);
    }

    #[test]
    fn ports_apply_to_latest_arrow() {
        let path = Path::from_process("a")
            .to("b")
            .output_port("rows")
            .input_port("left");
        let arrow = &path.arrows()[0];
        assert_eq!(arrow.output_port, "rows");
        assert_eq!(arrow.input_port, "left");
    }
}
