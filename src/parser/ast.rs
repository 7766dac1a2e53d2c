//! Abstract Syntax Tree definitions
//!
//! This module defines the AST node types for the script language. Every node
//! carries the `SourceLocation` it was parsed from.

use crate::error::SourceLocation;

/// Root AST node representing a complete script
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub body: Vec<Stmt>,
    pub location: SourceLocation,
}

/// A name occurrence: binding, reference or property name
#[derive(Debug, Clone, PartialEq)]
pub struct Identifier {
    pub name: String,
    pub location: SourceLocation,
}

/// `{ ... }`
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub statements: Vec<Stmt>,
    pub location: SourceLocation,
}

/// Statement node
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    /// Variable declaration: let x = 42, y;
    VarDecl(VarDecl),

    /// Function declaration
    FunctionDecl(Function),

    /// Expression statement
    Expression {
        expr: Expr,
        location: SourceLocation,
    },

    /// If statement
    If {
        condition: Expr,
        consequent: Box<Stmt>,
        alternate: Option<Box<Stmt>>,
        location: SourceLocation,
    },

    /// While loop
    While {
        condition: Expr,
        body: Box<Stmt>,
        location: SourceLocation,
    },

    /// Do-while loop
    DoWhile {
        body: Box<Stmt>,
        condition: Expr,
        location: SourceLocation,
    },

    /// C-style for loop
    For {
        init: Option<ForInit>,
        condition: Option<Expr>,
        update: Option<Expr>,
        body: Box<Stmt>,
        location: SourceLocation,
    },

    /// for-in / for-of loop
    ForEach {
        kind: ForEachKind,
        left: ForInit,
        right: Expr,
        body: Box<Stmt>,
        location: SourceLocation,
    },

    /// Return statement
    Return {
        value: Option<Expr>,
        location: SourceLocation,
    },

    /// Break statement
    Break {
        location: SourceLocation,
    },

    /// Continue statement
    Continue {
        location: SourceLocation,
    },

    /// Throw statement
    Throw {
        value: Expr,
        location: SourceLocation,
    },

    /// try / catch / finally
    Try {
        block: Block,
        handler: Option<CatchClause>,
        finalizer: Option<Block>,
        location: SourceLocation,
    },

    /// Switch statement
    Switch {
        discriminant: Expr,
        cases: Vec<SwitchCase>,
        location: SourceLocation,
    },

    /// Block statement
    Block(Block),

    /// Lone `;`
    Empty {
        location: SourceLocation,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclKind {
    Var,
    Let,
    Const,
}

impl DeclKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Var => "var",
            Self::Let => "let",
            Self::Const => "const",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct VarDecl {
    pub kind: DeclKind,
    pub declarators: Vec<Declarator>,
    pub location: SourceLocation,
}

/// One `target = init` inside a declaration
#[derive(Debug, Clone, PartialEq)]
pub struct Declarator {
    pub target: Pattern,
    pub init: Option<Expr>,
    pub location: SourceLocation,
}

/// Function declaration or expression
#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    pub name: Option<Identifier>,
    pub params: Vec<Pattern>,
    pub body: Block,
    pub is_async: bool,
    pub location: SourceLocation,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArrowFunction {
    pub params: Vec<Pattern>,
    pub body: ArrowBody,
    pub is_async: bool,
    pub location: SourceLocation,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ArrowBody {
    Block(Block),
    Expr(Box<Expr>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ForInit {
    VarDecl(VarDecl),
    Expr(Expr),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForEachKind {
    In,
    Of,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CatchClause {
    pub param: Option<Pattern>,
    pub body: Block,
    pub location: SourceLocation,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SwitchCase {
    /// `None` for `default:`
    pub test: Option<Expr>,
    pub consequent: Vec<Stmt>,
    pub location: SourceLocation,
}

/// Binding target of a declarator, parameter or catch clause
#[derive(Debug, Clone, PartialEq)]
pub enum Pattern {
    Identifier(Identifier),

    /// { a, b: c, ...rest }
    Object {
        properties: Vec<PatternProperty>,
        location: SourceLocation,
    },

    /// [a, , b, ...rest]
    Array {
        elements: Vec<Option<Pattern>>,
        location: SourceLocation,
    },

    /// target = default
    Assign {
        target: Box<Pattern>,
        default: Box<Expr>,
        location: SourceLocation,
    },

    /// ...argument
    Rest {
        argument: Box<Pattern>,
        location: SourceLocation,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum PatternProperty {
    KeyValue {
        key: PropertyKey,
        value: Pattern,
        location: SourceLocation,
    },
    Rest(Pattern),
}

/// Expression node
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Literal value
    Literal {
        value: Literal,
        location: SourceLocation,
    },

    /// `text ${expr} text`
    Template {
        quasis: Vec<String>,
        expressions: Vec<Expr>,
        location: SourceLocation,
    },

    /// tag`text`
    TaggedTemplate {
        tag: Box<Expr>,
        quasi: Box<Expr>,
        location: SourceLocation,
    },

    /// Variable reference
    Identifier(Identifier),

    This {
        location: SourceLocation,
    },

    /// [a, , b]
    Array {
        elements: Vec<Option<Expr>>,
        location: SourceLocation,
    },

    /// { key: value }
    Object {
        properties: Vec<Property>,
        location: SourceLocation,
    },

    /// Function expression
    Function(Box<Function>),

    /// Arrow function
    Arrow(Box<ArrowFunction>),

    /// Unary operation
    Unary {
        operator: UnaryOp,
        operand: Box<Expr>,
        location: SourceLocation,
    },

    /// ++x, x--
    Update {
        operator: UpdateOp,
        prefix: bool,
        operand: Box<Expr>,
        location: SourceLocation,
    },

    /// Binary operation
    Binary {
        left: Box<Expr>,
        operator: BinaryOp,
        right: Box<Expr>,
        location: SourceLocation,
    },

    /// Logical operation (&&, ||, ??)
    Logical {
        left: Box<Expr>,
        operator: LogicalOp,
        right: Box<Expr>,
        location: SourceLocation,
    },

    /// test ? consequent : alternate
    Conditional {
        test: Box<Expr>,
        consequent: Box<Expr>,
        alternate: Box<Expr>,
        location: SourceLocation,
    },

    /// Assignment, plain or compound
    Assign {
        target: Box<Expr>,
        operator: String,
        value: Box<Expr>,
        location: SourceLocation,
    },

    /// a, b
    Sequence {
        expressions: Vec<Expr>,
        location: SourceLocation,
    },

    /// Function call
    Call {
        callee: Box<Expr>,
        arguments: Vec<Expr>,
        optional: bool,
        location: SourceLocation,
    },

    /// new Callee(args)
    New {
        callee: Box<Expr>,
        arguments: Vec<Expr>,
        location: SourceLocation,
    },

    /// Member access: object.name, object[key], object?.name
    Member {
        object: Box<Expr>,
        property: MemberProperty,
        optional: bool,
        location: SourceLocation,
    },

    /// ...argument in calls and array literals
    Spread {
        argument: Box<Expr>,
        location: SourceLocation,
    },

    Await {
        argument: Box<Expr>,
        location: SourceLocation,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum MemberProperty {
    /// `.name`: never a reference
    Named(Identifier),
    /// `[expr]`
    Computed(Box<Expr>),
}

/// Object literal member
#[derive(Debug, Clone, PartialEq)]
pub enum Property {
    KeyValue {
        key: PropertyKey,
        value: Expr,
        /// `{ a }` is a reference to `a`
        shorthand: bool,
        location: SourceLocation,
    },
    Method {
        key: PropertyKey,
        function: Function,
        location: SourceLocation,
    },
    Spread(Expr),
}

#[derive(Debug, Clone, PartialEq)]
pub enum PropertyKey {
    Static {
        name: String,
        location: SourceLocation,
    },
    Computed(Box<Expr>),
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
    Exponent,
    Equal,
    NotEqual,
    StrictEqual,
    StrictNotEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    BitAnd,
    BitOr,
    BitXor,
    ShiftLeft,
    ShiftRight,
    UnsignedShiftRight,
    In,
    Instanceof,
}

/// Unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Negate,
    Plus,
    Not,
    BitNot,
    Typeof,
    Void,
    Delete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOp {
    Increment,
    Decrement,
}

/// Logical operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOp {
    And,
    Or,
    Nullish,
}

/// Literal value
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Number(f64),
    String(String),
    Boolean(bool),
    Null,
}

impl Stmt {
    pub fn location(&self) -> &SourceLocation {
        match self {
            Stmt::VarDecl(decl) => &decl.location,
            Stmt::FunctionDecl(function) => &function.location,
            Stmt::Block(block) => &block.location,
            Stmt::Expression { location, .. }
            | Stmt::If { location, .. }
            | Stmt::While { location, .. }
            | Stmt::DoWhile { location, .. }
            | Stmt::For { location, .. }
            | Stmt::ForEach { location, .. }
            | Stmt::Return { location, .. }
            | Stmt::Break { location }
            | Stmt::Continue { location }
            | Stmt::Throw { location, .. }
            | Stmt::Try { location, .. }
            | Stmt::Switch { location, .. }
            | Stmt::Empty { location } => location,
        }
    }
}

impl Expr {
    pub fn location(&self) -> &SourceLocation {
        match self {
            Expr::Identifier(ident) => &ident.location,
            Expr::Function(function) => &function.location,
            Expr::Arrow(arrow) => &arrow.location,
            Expr::Literal { location, .. }
            | Expr::Template { location, .. }
            | Expr::TaggedTemplate { location, .. }
            | Expr::This { location }
            | Expr::Array { location, .. }
            | Expr::Object { location, .. }
            | Expr::Unary { location, .. }
            | Expr::Update { location, .. }
            | Expr::Binary { location, .. }
            | Expr::Logical { location, .. }
            | Expr::Conditional { location, .. }
            | Expr::Assign { location, .. }
            | Expr::Sequence { location, .. }
            | Expr::Call { location, .. }
            | Expr::New { location, .. }
            | Expr::Member { location, .. }
            | Expr::Spread { location, .. }
            | Expr::Await { location, .. } => location,
        }
    }
}

impl Pattern {
    pub fn location(&self) -> &SourceLocation {
        match self {
            Pattern::Identifier(ident) => &ident.location,
            Pattern::Object { location, .. }
            | Pattern::Array { location, .. }
            | Pattern::Assign { location, .. }
            | Pattern::Rest { location, .. } => location,
        }
    }

    /// The bound name when this is a simple binding: `a`, `a = 1` or `...a`
    pub fn simple_name(&self) -> Option<&Identifier> {
        match self {
            Pattern::Identifier(ident) => Some(ident),
            Pattern::Assign { target, .. } | Pattern::Rest { argument: target, .. } => {
                match target.as_ref() {
                    Pattern::Identifier(ident) => Some(ident),
                    _ => None,
                }
            }
            Pattern::Object { .. } | Pattern::Array { .. } => None,
        }
    }
}
