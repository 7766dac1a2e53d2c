//! Scope analyzer
//!
//! Walks a parsed program with a stack of lexical scopes and reports names
//! that resolve nowhere, `let`/`const`/parameter bindings referenced on an
//! earlier line than their declaration, and declarations nothing references.

use std::collections::{BTreeSet, HashSet};

use tracing::{debug, trace};

use super::globals::ambient_names;
use super::scope::{Declaration, DeclarationKind, Resolution, Scope, ScopeKind};
use super::suggest::suggest;
use crate::error::diagnostic::{RULE_TDZ, RULE_UNDEFINED, RULE_UNUSED};
use crate::error::{Diagnostic, Fix, SourceLocation, SourceSpan};
use crate::parser::ast::*;

/// Analyze `program` with a fresh analyzer
pub fn analyze(program: &Program) -> Vec<Diagnostic> {
    Analyzer::new().analyze(program)
}

/// Traversal state for one analysis run
pub struct Analyzer {
    scopes: Vec<Scope>,
    /// Declaration spans already reported as unused
    reported: HashSet<SourceSpan>,
    ambient: BTreeSet<&'static str>,
    diagnostics: Vec<Diagnostic>,
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl Analyzer {
    pub fn new() -> Self {
        Self {
            scopes: Vec::new(),
            reported: HashSet::new(),
            ambient: ambient_names(),
            diagnostics: Vec::new(),
        }
    }

    /// Analyze a program, returning diagnostics in detection order
    pub fn analyze(mut self, program: &Program) -> Vec<Diagnostic> {
        self.enter_scope(ScopeKind::Program);
        self.hoist_statements(&program.body);
        for stmt in &program.body {
            self.visit_stmt(stmt);
        }
        self.exit_scope();

        self.diagnostics
    }

    // ===== Scope stack =====

    fn enter_scope(&mut self, kind: ScopeKind) {
        self.scopes.push(Scope::new(kind));
        debug!(?kind, depth = self.scopes.len(), "enter scope");
    }

    fn exit_scope(&mut self) {
        let Some(scope) = self.scopes.pop() else {
            return;
        };
        debug!(kind = ?scope.kind, depth = self.scopes.len(), "exit scope");

        for declaration in scope.into_unused() {
            if !self.reported.insert(declaration.span) {
                continue;
            }
            self.diagnostics.push(
                Diagnostic::warning(
                    format!("'{}' is declared but never used", declaration.name),
                    declaration.declared_at,
                )
                .with_rule(RULE_UNUSED)
                .with_end(declaration.end)
                .with_fix(Fix::remove(declaration.span)),
            );
        }
    }

    /// Declare `name` in the innermost scope; `range` is what a fix would remove
    fn declare(&mut self, name: &Identifier, kind: DeclarationKind, range: &SourceLocation) {
        let Some(scope) = self.scopes.last_mut() else {
            return;
        };

        let declaration = Declaration {
            name: name.name.clone(),
            kind,
            declared_at: name.location.start,
            end: range.end,
            span: range.span,
        };
        if scope.declare(declaration) {
            debug!(name = %name.name, %kind, line = name.location.start.line, "declare");
        }
    }

    fn declare_opaque(&mut self, name: &Identifier) {
        if let Some(scope) = self.scopes.last_mut() {
            if scope.declare_opaque(&name.name) {
                debug!(name = %name.name, "declare untracked binding");
            }
        }
    }

    /// Simple targets are tracked; every name a destructuring pattern binds is opaque
    fn declare_pattern(&mut self, pattern: &Pattern, kind: DeclarationKind) {
        match pattern.simple_name() {
            Some(name) => self.declare(name, kind, pattern.location()),
            None => {
                let mut names = Vec::new();
                bound_names(pattern, &mut names);
                for name in names {
                    self.declare_opaque(name);
                }
            }
        }
    }

    // ===== Hoisting =====

    /// Register the variable declarators of a scope's statements before
    /// visiting them. The scan passes through `if` and loops but stops at
    /// anything that opens a scope of its own.
    fn hoist_statements(&mut self, statements: &[Stmt]) {
        for stmt in statements {
            self.hoist_stmt(stmt);
        }
    }

    fn hoist_stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::VarDecl(decl) => self.hoist_var_decl(decl),
            Stmt::If {
                consequent,
                alternate,
                ..
            } => {
                self.hoist_stmt(consequent);
                if let Some(alternate) = alternate {
                    self.hoist_stmt(alternate);
                }
            }
            Stmt::While { body, .. } | Stmt::DoWhile { body, .. } => self.hoist_stmt(body),
            Stmt::For { init, body, .. } => {
                if let Some(ForInit::VarDecl(decl)) = init {
                    self.hoist_var_decl(decl);
                }
                self.hoist_stmt(body);
            }
            Stmt::ForEach { left, body, .. } => {
                if let ForInit::VarDecl(decl) = left {
                    self.hoist_var_decl(decl);
                }
                self.hoist_stmt(body);
            }
            // functions register their name when visited
            Stmt::FunctionDecl(_)
            | Stmt::Block(_)
            | Stmt::Try { .. }
            | Stmt::Switch { .. }
            | Stmt::Expression { .. }
            | Stmt::Return { .. }
            | Stmt::Break { .. }
            | Stmt::Continue { .. }
            | Stmt::Throw { .. }
            | Stmt::Empty { .. } => {}
        }
    }

    fn hoist_var_decl(&mut self, decl: &VarDecl) {
        let kind = DeclarationKind::from(decl.kind);
        for declarator in &decl.declarators {
            match &declarator.target {
                Pattern::Identifier(name) => self.declare(name, kind, &declarator.location),
                target => self.declare_pattern(target, kind),
            }
        }
    }

    // ===== Statements =====

    fn visit_stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::VarDecl(decl) => self.visit_var_decl(decl),
            Stmt::FunctionDecl(function) => self.visit_function(function, true),
            Stmt::Expression { expr, .. } => self.visit_expr(expr),
            Stmt::If {
                condition,
                consequent,
                alternate,
                ..
            } => {
                self.visit_expr(condition);
                self.visit_stmt(consequent);
                if let Some(alternate) = alternate {
                    self.visit_stmt(alternate);
                }
            }
            Stmt::While { condition, body, .. } => {
                self.visit_expr(condition);
                self.visit_stmt(body);
            }
            Stmt::DoWhile { body, condition, .. } => {
                self.visit_stmt(body);
                self.visit_expr(condition);
            }
            Stmt::For {
                init,
                condition,
                update,
                body,
                ..
            } => {
                if let Some(init) = init {
                    self.visit_for_init(init);
                }
                if let Some(condition) = condition {
                    self.visit_expr(condition);
                }
                if let Some(update) = update {
                    self.visit_expr(update);
                }
                self.visit_stmt(body);
            }
            Stmt::ForEach {
                left, right, body, ..
            } => {
                self.visit_for_init(left);
                self.visit_expr(right);
                self.visit_stmt(body);
            }
            Stmt::Return { value, .. } => {
                if let Some(value) = value {
                    self.visit_expr(value);
                }
            }
            Stmt::Throw { value, .. } => self.visit_expr(value),
            Stmt::Try {
                block,
                handler,
                finalizer,
                ..
            } => {
                self.visit_block(block);
                if let Some(handler) = handler {
                    self.visit_catch(handler);
                }
                if let Some(finalizer) = finalizer {
                    self.visit_block(finalizer);
                }
            }
            Stmt::Switch {
                discriminant,
                cases,
                ..
            } => {
                self.visit_expr(discriminant);

                self.enter_scope(ScopeKind::Block);
                for case in cases {
                    self.hoist_statements(&case.consequent);
                }
                for case in cases {
                    if let Some(test) = &case.test {
                        self.visit_expr(test);
                    }
                    for stmt in &case.consequent {
                        self.visit_stmt(stmt);
                    }
                }
                self.exit_scope();
            }
            Stmt::Block(block) => self.visit_block(block),
            Stmt::Break { .. } | Stmt::Continue { .. } | Stmt::Empty { .. } => {}
        }
    }

    fn visit_block(&mut self, block: &Block) {
        self.enter_scope(ScopeKind::Block);
        self.hoist_statements(&block.statements);
        for stmt in &block.statements {
            self.visit_stmt(stmt);
        }
        self.exit_scope();
    }

    fn visit_catch(&mut self, handler: &CatchClause) {
        self.enter_scope(ScopeKind::Block);
        if let Some(param) = &handler.param {
            self.declare_pattern(param, DeclarationKind::Parameter);
            self.visit_pattern(param);
        }
        self.hoist_statements(&handler.body.statements);
        for stmt in &handler.body.statements {
            self.visit_stmt(stmt);
        }
        self.exit_scope();
    }

    /// Declarations are already hoisted; only initializers and defaults remain
    fn visit_var_decl(&mut self, decl: &VarDecl) {
        for declarator in &decl.declarators {
            self.visit_pattern(&declarator.target);
            if let Some(init) = &declarator.init {
                self.visit_expr(init);
            }
        }
    }

    fn visit_for_init(&mut self, init: &ForInit) {
        match init {
            ForInit::VarDecl(decl) => self.visit_var_decl(decl),
            ForInit::Expr(expr) => self.visit_expr(expr),
        }
    }

    /// A declaration's name goes into the enclosing scope on entry, so
    /// earlier references to it do not resolve
    fn visit_function(&mut self, function: &Function, is_declaration: bool) {
        if is_declaration {
            if let Some(name) = &function.name {
                self.declare(name, DeclarationKind::Function, &function.location);
            }
        }

        self.enter_scope(ScopeKind::Function);
        if !is_declaration {
            if let Some(name) = &function.name {
                self.declare_opaque(name);
            }
        }
        self.visit_params(&function.params);

        self.hoist_statements(&function.body.statements);
        for stmt in &function.body.statements {
            self.visit_stmt(stmt);
        }
        self.exit_scope();
    }

    fn visit_arrow(&mut self, arrow: &ArrowFunction) {
        self.enter_scope(ScopeKind::Function);
        self.visit_params(&arrow.params);

        match &arrow.body {
            ArrowBody::Block(block) => {
                self.hoist_statements(&block.statements);
                for stmt in &block.statements {
                    self.visit_stmt(stmt);
                }
            }
            ArrowBody::Expr(expr) => self.visit_expr(expr),
        }
        self.exit_scope();
    }

    fn visit_params(&mut self, params: &[Pattern]) {
        for param in params {
            self.declare_pattern(param, DeclarationKind::Parameter);
        }
        for param in params {
            self.visit_pattern(param);
        }
    }

    /// Binding names are never uses; defaults and computed keys are
    fn visit_pattern(&mut self, pattern: &Pattern) {
        match pattern {
            Pattern::Identifier(_) => {}
            Pattern::Object { properties, .. } => {
                for property in properties {
                    match property {
                        PatternProperty::KeyValue { key, value, .. } => {
                            self.visit_property_key(key);
                            self.visit_pattern(value);
                        }
                        PatternProperty::Rest(rest) => self.visit_pattern(rest),
                    }
                }
            }
            Pattern::Array { elements, .. } => {
                for element in elements.iter().flatten() {
                    self.visit_pattern(element);
                }
            }
            Pattern::Assign {
                target, default, ..
            } => {
                self.visit_pattern(target);
                self.visit_expr(default);
            }
            Pattern::Rest { argument, .. } => self.visit_pattern(argument),
        }
    }

    // ===== Expressions =====

    fn visit_expr(&mut self, expr: &Expr) {
        match expr {
            Expr::Literal { .. } | Expr::This { .. } => {}
            Expr::Identifier(name) => self.resolve(name),
            Expr::Template { expressions, .. } | Expr::Sequence { expressions, .. } => {
                for expr in expressions {
                    self.visit_expr(expr);
                }
            }
            Expr::TaggedTemplate { tag, quasi, .. } => {
                self.visit_expr(tag);
                self.visit_expr(quasi);
            }
            Expr::Array { elements, .. } => {
                for element in elements.iter().flatten() {
                    self.visit_expr(element);
                }
            }
            Expr::Object { properties, .. } => {
                for property in properties {
                    match property {
                        Property::KeyValue { key, value, .. } => {
                            self.visit_property_key(key);
                            self.visit_expr(value);
                        }
                        Property::Method { key, function, .. } => {
                            self.visit_property_key(key);
                            self.visit_function(function, false);
                        }
                        Property::Spread(expr) => self.visit_expr(expr),
                    }
                }
            }
            Expr::Function(function) => self.visit_function(function, false),
            Expr::Arrow(arrow) => self.visit_arrow(arrow),
            Expr::Unary { operand, .. } | Expr::Update { operand, .. } => self.visit_expr(operand),
            Expr::Spread { argument, .. } | Expr::Await { argument, .. } => self.visit_expr(argument),
            Expr::Binary { left, right, .. } | Expr::Logical { left, right, .. } => {
                self.visit_expr(left);
                self.visit_expr(right);
            }
            Expr::Conditional {
                test,
                consequent,
                alternate,
                ..
            } => {
                self.visit_expr(test);
                self.visit_expr(consequent);
                self.visit_expr(alternate);
            }
            Expr::Assign { target, value, .. } => {
                self.visit_expr(target);
                self.visit_expr(value);
            }
            Expr::Call {
                callee, arguments, ..
            }
            | Expr::New {
                callee, arguments, ..
            } => {
                self.visit_expr(callee);
                for argument in arguments {
                    self.visit_expr(argument);
                }
            }
            Expr::Member {
                object, property, ..
            } => {
                self.visit_expr(object);
                if let MemberProperty::Computed(key) = property {
                    self.visit_expr(key);
                }
            }
        }
    }

    fn visit_property_key(&mut self, key: &PropertyKey) {
        if let PropertyKey::Computed(expr) = key {
            self.visit_expr(expr);
        }
    }

    // ===== Resolution =====

    /// Resolve a reference from the innermost scope outwards
    fn resolve(&mut self, reference: &Identifier) {
        let name = reference.name.as_str();
        let position = reference.location.start;

        for scope in self.scopes.iter_mut().rev() {
            match scope.resolve(name) {
                Some(Resolution::Declared { kind, declared_at }) => {
                    trace!(name, %kind, line = position.line, "resolved");
                    if kind.has_dead_zone() && position.line < declared_at.line {
                        self.diagnostics.push(
                            Diagnostic::error(
                                format!("'{}' is used before declaration (TDZ)", name),
                                position,
                            )
                            .with_rule(RULE_TDZ)
                            .with_end(reference.location.end),
                        );
                    }
                    return;
                }
                Some(Resolution::Opaque) => {
                    trace!(name, "resolved untracked binding");
                    return;
                }
                None => {}
            }
        }

        if self.ambient.contains(name) {
            trace!(name, "ambient");
            return;
        }

        let message = match self.suggestion(name) {
            Some(candidate) => format!("'{}' is not defined. Did you mean '{}'?", name, candidate),
            None => format!("'{}' is not defined", name),
        };
        debug!(name, line = position.line, "undefined reference");
        self.diagnostics.push(
            Diagnostic::error(message, position)
                .with_rule(RULE_UNDEFINED)
                .with_end(reference.location.end),
        );
    }

    fn suggestion(&self, name: &str) -> Option<String> {
        let mut candidates: BTreeSet<&str> = self.ambient.clone();
        for scope in &self.scopes {
            candidates.extend(scope.names());
        }
        suggest(name, &candidates).map(str::to_string)
    }
}

/// Every identifier a pattern binds, in source order
fn bound_names<'a>(pattern: &'a Pattern, names: &mut Vec<&'a Identifier>) {
    match pattern {
        Pattern::Identifier(name) => names.push(name),
        Pattern::Object { properties, .. } => {
            for property in properties {
                match property {
                    PatternProperty::KeyValue { value, .. } => bound_names(value, names),
                    PatternProperty::Rest(rest) => bound_names(rest, names),
                }
            }
        }
        Pattern::Array { elements, .. } => {
            for element in elements.iter().flatten() {
                bound_names(element, names);
            }
        }
        Pattern::Assign { target, .. } => bound_names(target, names),
        Pattern::Rest { argument, .. } => bound_names(argument, names),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Severity, SourcePosition};
    use crate::parser::parse;
    use indoc::indoc;
    use pretty_assertions::assert_eq;

    fn check(source: &str) -> Vec<Diagnostic> {
        let program = parse(source).expect("source should parse");
        analyze(&program)
    }

    fn messages(source: &str) -> Vec<String> {
        check(source).into_iter().map(|d| d.message).collect()
    }

    #[test]
    fn test_no_names_no_diagnostics() {
        assert!(check("").is_empty());
        assert!(check("1 + 2;\n'text';\n`plain`;").is_empty());
    }

    #[test]
    fn test_unused_const_fix_covers_declarator() {
        let source = "const x = 1;";
        let diagnostics = check(source);
        assert_eq!(diagnostics.len(), 1);

        let unused = &diagnostics[0];
        assert_eq!(unused.message, "'x' is declared but never used");
        assert_eq!(unused.severity, Severity::Warning);
        assert_eq!(unused.rule_id.as_deref(), Some(RULE_UNUSED));
        assert_eq!(unused.position, SourcePosition::new(1, 7));
        assert_eq!(unused.end_position, Some(SourcePosition::new(1, 12)));

        let fix = unused.fix.as_ref().expect("unused declarations carry a fix");
        assert_eq!(fix.span, SourceSpan::new(6, 11));
        assert_eq!(fix.apply(source).unwrap(), "const ;");
    }

    #[test]
    fn test_use_after_declaration_is_clean() {
        assert!(check("const x = 1;\nconsole.log(x);").is_empty());
    }

    #[test]
    fn test_use_on_earlier_line_is_tdz() {
        let diagnostics = check("console.log(x);\nlet x = 1;");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].message, "'x' is used before declaration (TDZ)");
        assert_eq!(diagnostics[0].position, SourcePosition::new(1, 13));
        assert_eq!(diagnostics[0].severity, Severity::Error);
        assert_eq!(diagnostics[0].rule_id.as_deref(), Some(RULE_TDZ));
    }

    #[test]
    fn test_same_line_forward_reference_is_not_tdz() {
        assert!(check("x; let x = 1;").is_empty());
    }

    #[test]
    fn test_var_has_no_dead_zone() {
        assert!(check("total;\nvar total = 0;").is_empty());
    }

    #[test]
    fn test_const_used_on_earlier_line_is_tdz() {
        let diagnostics = check("console.log(limit);\nconst limit = 5;");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].message, "'limit' is used before declaration (TDZ)");
        assert_eq!(diagnostics[0].position, SourcePosition::new(1, 13));
    }

    #[test]
    fn test_parameter_default_referencing_later_parameter() {
        let diagnostics = check("function f(a = b,\n b) { return a; }\nf();");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].message, "'b' is used before declaration (TDZ)");
        assert_eq!(diagnostics[0].position, SourcePosition::new(1, 16));
        assert_eq!(diagnostics[0].rule_id.as_deref(), Some(RULE_TDZ));
    }

    #[test]
    fn test_function_declaration_is_not_hoisted() {
        let diagnostics = check("main();\nfunction main() {}");
        assert_eq!(diagnostics.len(), 2);
        assert_eq!(diagnostics[0].message, "'main' is not defined");
        assert_eq!(diagnostics[0].position, SourcePosition::new(1, 1));
        assert_eq!(diagnostics[1].message, "'main' is declared but never used");
        assert_eq!(diagnostics[1].position, SourcePosition::new(2, 10));
    }

    #[test]
    fn test_recursive_function_sees_own_name() {
        assert!(check("function count(n) {\n  return n && count(n - 1);\n}\ncount(3);").is_empty());
    }

    #[test]
    fn test_suggests_ambient_name() {
        assert_eq!(
            messages("consol.log('hi');"),
            vec!["'consol' is not defined. Did you mean 'console'?"]
        );
    }

    #[test]
    fn test_no_suggestion_without_close_candidate() {
        let diagnostics = check("zzzqqq123();");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].message, "'zzzqqq123' is not defined");
        assert_eq!(diagnostics[0].rule_id.as_deref(), Some(RULE_UNDEFINED));
    }

    #[test]
    fn test_suggests_declared_name() {
        let diagnostics = check("const userName = 'a';\nconsole.log(username);");
        assert_eq!(
            diagnostics[0].message,
            "'username' is not defined. Did you mean 'userName'?"
        );
        assert_eq!(diagnostics[0].position, SourcePosition::new(2, 13));
        // the misspelled reference leaves the declaration unused
        assert_eq!(diagnostics[1].message, "'userName' is declared but never used");
    }

    #[test]
    fn test_uncalled_function_is_unused() {
        let source = "function helper() {\n  return 1;\n}";
        let diagnostics = check(source);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].message, "'helper' is declared but never used");
        assert_eq!(diagnostics[0].position, SourcePosition::new(1, 10));
        assert_eq!(
            diagnostics[0].fix.as_ref().map(|fix| fix.span),
            Some(SourceSpan::new(0, source.len()))
        );
    }

    #[test]
    fn test_greet_example_is_clean() {
        let source = r#"function greet(name) { return "Hello, " + name; } const message = greet("World"); console.log(message);"#;
        assert_eq!(check(source), Vec::new());
    }

    #[test]
    fn test_redeclaration_first_wins() {
        let diagnostics = check("let a; let a;");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].position, SourcePosition::new(1, 5));
        assert_eq!(
            diagnostics[0].fix.as_ref().map(|fix| fix.span),
            Some(SourceSpan::new(4, 5))
        );
    }

    #[test]
    fn test_analysis_is_idempotent() {
        let source = indoc! {"
            const config = { retries: 3 };
            function run(task, unused) {
                for (let attempt = 0; attempt < config.retries; attempt++) {
                    try {
                        return task(attempt);
                    } catch (err) {
                        consol.warn(err);
                    }
                }
                return fallback;
            }
            let pending = [];
        "};
        let program = parse(source).unwrap();
        let first = analyze(&program);
        let second = analyze(&program);
        assert!(!first.is_empty());
        assert_eq!(first, second);
    }

    #[test]
    fn test_unused_parameter() {
        let source = "function add(a, b) {\n  return a;\n}\nadd(1, 2);";
        let diagnostics = check(source);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].message, "'b' is declared but never used");
        assert_eq!(diagnostics[0].position, SourcePosition::new(1, 17));
        assert_eq!(
            diagnostics[0].fix.as_ref().map(|fix| fix.span),
            Some(SourceSpan::new(16, 17))
        );
    }

    #[test]
    fn test_var_belongs_to_its_block() {
        let source = indoc! {"
            function compute() {
                if (ready) {
                    var result = 1;
                }
                return result;
            }
            compute();
        "};
        let diagnostics = check(source);
        assert_eq!(
            diagnostics.iter().map(|d| d.message.as_str()).collect::<Vec<_>>(),
            vec![
                "'ready' is not defined",
                "'result' is declared but never used",
                "'result' is not defined",
            ]
        );
        assert_eq!(diagnostics[1].position, SourcePosition::new(3, 13));
        assert_eq!(diagnostics[2].position, SourcePosition::new(5, 12));
    }

    #[test]
    fn test_var_hoists_through_if_and_loops() {
        let source = indoc! {"
            function pick(flag) {
                if (flag) var chosen = 1;
                for (var i = 0; i < 2; i++) chosen = i;
                return chosen;
            }
            pick(true);
        "};
        assert!(check(source).is_empty());
    }

    #[test]
    fn test_let_is_block_scoped() {
        let source = indoc! {"
            {
                let inner = 1;
            }
            console.log(inner);
        "};
        let diagnostics = check(source);
        assert_eq!(diagnostics.len(), 2);
        // the block closes before the outer reference is visited
        assert_eq!(diagnostics[0].message, "'inner' is declared but never used");
        assert_eq!(diagnostics[0].position, SourcePosition::new(2, 9));
        assert_eq!(diagnostics[1].message, "'inner' is not defined");
        assert_eq!(diagnostics[1].position, SourcePosition::new(4, 13));
    }

    #[test]
    fn test_shadowed_declarations_reported_separately() {
        let source = indoc! {"
            let value = 1;
            {
                let value = 2;
            }
        "};
        let positions: Vec<SourcePosition> = check(source).into_iter().map(|d| d.position).collect();
        assert_eq!(positions, vec![SourcePosition::new(3, 9), SourcePosition::new(1, 5)]);
    }

    #[test]
    fn test_member_property_is_not_a_reference() {
        let source = "const obj = {};\nobj.missing;\nobj[key];";
        let diagnostics = check(source);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].message, "'key' is not defined");
        assert_eq!(diagnostics[0].position, SourcePosition::new(3, 5));
    }

    #[test]
    fn test_object_literal_keys_and_shorthand() {
        let source = "const a = 1;\nconst o = { a, b: 2, [computed]: 3 };\no;";
        assert_eq!(messages(source), vec!["'computed' is not defined"]);
    }

    #[test]
    fn test_destructured_names_are_untracked() {
        let source = indoc! {"
            const { first, rest: [second] } = JSON.parse('{}');
            console.log(first);
            console.log(secnd);
        "};
        assert_eq!(
            messages(source),
            vec!["'secnd' is not defined. Did you mean 'second'?"]
        );
    }

    #[test]
    fn test_catch_parameter() {
        let source = indoc! {"
            try {
                risky();
            } catch (err) {
                console.log('failed');
            }
        "};
        let diagnostics = check(source);
        assert_eq!(diagnostics.len(), 2);
        assert_eq!(diagnostics[0].message, "'risky' is not defined");
        assert_eq!(diagnostics[1].message, "'err' is declared but never used");
        assert_eq!(diagnostics[1].position, SourcePosition::new(3, 10));
    }

    #[test]
    fn test_closure_uses_outer_binding() {
        assert!(check("let count = 0;\nconst inc = () => count++;\ninc();").is_empty());
    }

    #[test]
    fn test_function_expression_name_is_local() {
        let source = indoc! {"
            const fact = function inner(n) { return n ? n * inner(n - 1) : 1; };
            fact(3);
            inner;
        "};
        assert_eq!(messages(source), vec!["'inner' is not defined"]);
    }

    #[test]
    fn test_loop_bindings() {
        assert!(check("for (const item of [1, 2]) {\n  console.log(item);\n}").is_empty());
        assert!(check("for (let i = 0; i < 3; i++) {}").is_empty());
    }

    #[test]
    fn test_switch_case_scope() {
        let source = indoc! {"
            function describe(kind) {
                switch (kind) {
                    case 1:
                        const label = 'one';
                        return label;
                    default:
                        return other;
                }
            }
            describe(1);
        "};
        assert_eq!(messages(source), vec!["'other' is not defined"]);
    }

    #[test]
    fn test_ambient_names_resolve_silently() {
        assert!(check("undefined;\nMath.max(1, 2);\nsetTimeout(() => {}, 10);").is_empty());
    }
}
