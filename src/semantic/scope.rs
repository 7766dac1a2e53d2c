//! Lexical scopes and the declarations they own

use std::collections::{HashMap, HashSet};
use std::fmt;

use crate::error::{SourcePosition, SourceSpan};
use crate::parser::ast::DeclKind;

/// How a name was introduced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeclarationKind {
    Var,
    Let,
    Const,
    Parameter,
    Function,
}

impl DeclarationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Var => "var",
            Self::Let => "let",
            Self::Const => "const",
            Self::Parameter => "parameter",
            Self::Function => "function",
        }
    }

    /// Bindings that may not be referenced before their declaration line
    pub fn has_dead_zone(&self) -> bool {
        matches!(self, Self::Let | Self::Const | Self::Parameter)
    }
}

impl From<DeclKind> for DeclarationKind {
    fn from(kind: DeclKind) -> Self {
        match kind {
            DeclKind::Var => Self::Var,
            DeclKind::Let => Self::Let,
            DeclKind::Const => Self::Const,
        }
    }
}

impl fmt::Display for DeclarationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A tracked binding
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub name: String,
    pub kind: DeclarationKind,
    pub declared_at: SourcePosition,
    /// End of the removable range
    pub end: SourcePosition,
    /// Byte range a removal fix deletes
    pub span: SourceSpan,
}

/// What kind of node opened a scope
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
    Program,
    Function,
    Block,
}

/// Outcome of looking a name up in one scope
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Declared {
        kind: DeclarationKind,
        declared_at: SourcePosition,
    },
    Opaque,
}

/// One level of the scope stack
#[derive(Debug)]
pub struct Scope {
    pub kind: ScopeKind,
    declarations: HashMap<String, Declaration>,
    /// Names bound by patterns the analyzer resolves but does not track
    opaque: HashSet<String>,
    used: HashSet<String>,
}

impl Scope {
    pub fn new(kind: ScopeKind) -> Self {
        Self {
            kind,
            declarations: HashMap::new(),
            opaque: HashSet::new(),
            used: HashSet::new(),
        }
    }

    fn is_bound(&self, name: &str) -> bool {
        self.declarations.contains_key(name) || self.opaque.contains(name)
    }

    /// Register a declaration; the first binding of a name wins
    pub fn declare(&mut self, declaration: Declaration) -> bool {
        if self.is_bound(&declaration.name) {
            return false;
        }
        self.declarations.insert(declaration.name.clone(), declaration);
        true
    }

    pub fn declare_opaque(&mut self, name: &str) -> bool {
        if self.is_bound(name) {
            return false;
        }
        self.opaque.insert(name.to_string());
        true
    }

    /// Look `name` up in this scope, marking a tracked declaration as used
    pub fn resolve(&mut self, name: &str) -> Option<Resolution> {
        if let Some(declaration) = self.declarations.get(name) {
            let resolution = Resolution::Declared {
                kind: declaration.kind,
                declared_at: declaration.declared_at,
            };
            self.used.insert(name.to_string());
            Some(resolution)
        } else if self.opaque.contains(name) {
            Some(Resolution::Opaque)
        } else {
            None
        }
    }

    /// Every name visible from this scope, tracked or not
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.declarations
            .keys()
            .chain(self.opaque.iter())
            .map(String::as_str)
    }

    pub fn is_used(&self, name: &str) -> bool {
        self.used.contains(name)
    }

    /// Consume the scope, yielding never-referenced declarations in source order
    pub fn into_unused(self) -> Vec<Declaration> {
        let used = self.used;
        let mut unused: Vec<Declaration> = self
            .declarations
            .into_values()
            .filter(|declaration| !used.contains(&declaration.name))
            .collect();
        unused.sort_by_key(|declaration| declaration.span);
        unused
    }
}
