//! Call-Graph Vocabulary
//!
//! Identifiers and records describing the interprocedural supergraph the
//! external oracle exposes: procedures, call sites, calling contexts, program
//! points, call strings, and heap locations. The core never builds these; it
//! only reads them through the oracle port.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a procedure in the oracle's call graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProcedureId(pub u32);

/// Unique identifier for a call site
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CallSiteId(pub u32);

/// Calling-context identifier
///
/// Context 0 is the root (context-insensitive) context; a context-sensitive
/// oracle hands out further ids for each call string it distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ContextId(pub u32);

impl ContextId {
    /// The root calling context
    pub const ROOT: ContextId = ContextId(0);
}

/// Program point: a control-flow location paired with a calling context
///
/// Facts are recorded at call-site granularity; a call site seen under two
/// contexts is two distinct program points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProgramPoint {
    pub site: CallSiteId,
    pub context: ContextId,
}

impl ProgramPoint {
    /// Create a program point
    #[inline]
    pub fn new(site: CallSiteId, context: ContextId) -> Self {
        Self { site, context }
    }

    /// Program point for a site in the root context
    #[inline]
    pub fn root(site: CallSiteId) -> Self {
        Self::new(site, ContextId::ROOT)
    }
}

impl fmt::Display for ProgramPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "site:{}@ctx:{}", self.site.0, self.context.0)
    }
}

/// A call site in the oracle's call graph
///
/// Carries the statically resolved pieces the inference needs: the invoked
/// method name (transition patterns match against it), the receiver and return
/// types as declared at the site, and which argument positions take behavioral
/// parameters (closures/lambdas).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallSite {
    /// Site identifier
    pub id: CallSiteId,

    /// Enclosing procedure
    pub procedure: ProcedureId,

    /// Invoked method name (e.g., "map", "parallel", "collect")
    pub method: String,

    /// Declared type of the receiver, if the call has one
    pub receiver_type: Option<String>,

    /// Declared return type; `None` means void
    pub return_type: Option<String>,

    /// Argument positions holding behavioral parameters
    pub behavioral_args: Vec<usize>,

    /// Source line (diagnostics only)
    pub line: u32,
}

impl CallSite {
    /// Create a call site record
    pub fn new(id: CallSiteId, procedure: ProcedureId, method: impl Into<String>) -> Self {
        Self {
            id,
            procedure,
            method: method.into(),
            receiver_type: None,
            return_type: None,
            behavioral_args: Vec::new(),
            line: 0,
        }
    }

    /// Set the receiver type
    pub fn with_receiver_type(mut self, ty: impl Into<String>) -> Self {
        self.receiver_type = Some(ty.into());
        self
    }

    /// Set the return type
    pub fn with_return_type(mut self, ty: impl Into<String>) -> Self {
        self.return_type = Some(ty.into());
        self
    }

    /// Mark an argument position as behavioral
    pub fn with_behavioral_arg(mut self, index: usize) -> Self {
        self.behavioral_args.push(index);
        self
    }

    /// Set the source line
    pub fn with_line(mut self, line: u32) -> Self {
        self.line = line;
        self
    }

    /// Whether any argument position is behavioral
    #[inline]
    pub fn has_behavioral_args(&self) -> bool {
        !self.behavioral_args.is_empty()
    }
}

impl fmt::Display for CallSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.receiver_type {
            Some(recv) => write!(f, "{}.{}()", recv, self.method),
            None => write!(f, "{}()", self.method),
        }
    }
}

/// A procedure in the oracle's call graph
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcedureInfo {
    /// Procedure identifier
    pub id: ProcedureId,

    /// Qualified name
    pub name: String,

    /// True for application code, false for framework-internal code
    pub application: bool,
}

impl ProcedureInfo {
    /// Create an application procedure
    pub fn application(id: ProcedureId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            application: true,
        }
    }

    /// Create a framework-internal procedure
    pub fn framework(id: ProcedureId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            application: false,
        }
    }
}

/// Call string: the sequence of program points from an analysis entry point
/// down to an allocation
///
/// The last element is the producing call, the operation whose result is the
/// tracked instance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallString(pub Vec<ProgramPoint>);

impl CallString {
    /// Empty call string
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Call string from points, entry point first
    pub fn from_points(points: Vec<ProgramPoint>) -> Self {
        Self(points)
    }

    /// The producing call (deepest point), if any
    #[inline]
    pub fn producing_call(&self) -> Option<ProgramPoint> {
        self.0.last().copied()
    }

    /// Iterate points from entry point to allocation
    pub fn iter(&self) -> impl Iterator<Item = &ProgramPoint> {
        self.0.iter()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for CallString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(|p| p.to_string()).collect();
        write!(f, "[{}]", parts.join(" -> "))
    }
}

/// Abstract heap location produced by the oracle's modification analysis
///
/// Identifies a field (or field-like slot) by the type that owns it. The
/// side-effect detector filters out locations owned by pipeline-framework
/// types, since those writes are implementation-internal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    /// Type owning the written slot
    pub owner_type: String,

    /// Slot name (field, element, static)
    pub name: String,
}

impl Location {
    /// Create a heap location
    pub fn new(owner_type: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner_type: owner_type.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.owner_type, self.name)
    }
}
