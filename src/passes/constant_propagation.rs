//! Constant propagation and folding.
//!
//! Each method body is interpreted once over an abstract state mapping
//! variable names to known literal values. Reads of a name whose binding
//! reaches them on every path become literals, and operators whose
//! operands are all literals are evaluated with Java semantics (see
//! [`super::eval`]). Field initializers are folded with no bindings.
//!
//! Rules that keep substitution sound:
//! - `if` joins keep only bindings both branches agree on;
//! - loops unbind every name assigned anywhere in them before the body is
//!   analysed, so one pass over the body is enough;
//! - the right operand of `&&`/`||` may not run, so its effects are
//!   joined with the state after the left operand;
//! - a call may write any field, so it drops bindings of names that are
//!   not locals or parameters. Locals cannot be aliased and survive;
//! - a name is bound only when its declared type is `int`, `boolean` or
//!   `String` and the value is of that type. Other types (`long`,
//!   `byte`, `Integer`, ...) have different arithmetic or equality, and
//!   undeclared names have no known type.

use rustc_hash::{FxHashMap, FxHashSet};
use tracing::{debug, trace};

use crate::ast::{AssignOp, Literal, PostfixOp, PrefixOp, Type};
use crate::error::RewriteError;
use crate::traverse::{traverse, Folded, Visitor};
use crate::tree::{ExprKind, NodeId, NodeKind, StmtKind, Tree};

use super::{check_fold_root, eval, Pass};

type Env = FxHashMap<String, Literal>;

/// `None` once control cannot reach the current point.
type State = Option<Env>;

/// Declared names and their types.
type Decls = Vec<(String, Type)>;

#[derive(Clone, Copy, Debug, Default)]
pub struct ConstantPropagation;

impl Pass for ConstantPropagation {
    fn name(&self) -> &'static str {
        "constant-propagation"
    }

    fn fold(&mut self, tree: &mut Tree, node: NodeId) -> Result<bool, RewriteError> {
        check_fold_root(tree, node)?;
        traverse(tree, node, self)
    }
}

impl Visitor for ConstantPropagation {
    fn wants(&self, kind: &NodeKind) -> bool {
        matches!(kind, NodeKind::Method { .. } | NodeKind::Field { .. })
    }

    fn end_visit(&mut self, tree: &mut Tree, node: NodeId) -> Result<Folded, RewriteError> {
        let fields = class_fields(tree, node);
        let mut analysis = Analysis {
            tree,
            fields,
            scopes: Vec::new(),
            rewrites: 0,
        };
        let mut state = Some(Env::default());

        match analysis.tree.kind(node).clone() {
            NodeKind::Method { name, params, .. } => {
                analysis
                    .scopes
                    .push(params.into_iter().map(|p| (p.name, p.ty)).collect());
                if let Some(&body) = analysis.tree.children(node).first() {
                    analysis.stmt(body, &mut state)?;
                }
                trace!(method = %name, rewrites = analysis.rewrites, "analysed method");
            }
            NodeKind::Field { name, .. } => {
                if let Some(&init) = analysis.tree.children(node).first() {
                    analysis.expr(init, &mut state)?;
                }
                trace!(field = %name, rewrites = analysis.rewrites, "analysed field");
            }
            _ => {}
        }

        if analysis.rewrites == 0 {
            return Ok(Folded::unchanged(node));
        }
        debug!(?node, rewrites = analysis.rewrites, "propagated constants");
        Ok(Folded {
            changed: true,
            node,
        })
    }
}

/// Join of two states at a control-flow merge.
fn join(a: State, b: State) -> State {
    match (a, b) {
        (None, other) | (other, None) => other,
        (Some(mut a), Some(b)) => {
            a.retain(|name, value| b.get(name) == Some(value));
            Some(a)
        }
    }
}

/// Field types of the class enclosing `member`.
fn class_fields(tree: &Tree, member: NodeId) -> FxHashMap<String, Type> {
    let Some(class) = tree.parent(member) else {
        return FxHashMap::default();
    };
    tree.children(class)
        .iter()
        .filter_map(|&m| match tree.kind(m) {
            NodeKind::Field { ty, name, .. } => Some((name.clone(), ty.clone())),
            _ => None,
        })
        .collect()
}

/// Whether a variable declared as `ty` holds `value` with the semantics
/// [`eval`] implements.
fn holds(ty: &Type, value: &Literal) -> bool {
    match (ty, value) {
        (Type::Int, Literal::Int(_)) | (Type::Boolean, Literal::Bool(_)) => true,
        (Type::Named(class), Literal::Str(_) | Literal::Null) => {
            class == "String" || class == "java.lang.String"
        }
        _ => false,
    }
}

struct Analysis<'t> {
    tree: &'t mut Tree,
    fields: FxHashMap<String, Type>,
    /// Locals and parameters declared in each enclosing scope.
    scopes: Vec<Decls>,
    rewrites: usize,
}

impl Analysis<'_> {
    fn stmt(&mut self, id: NodeId, state: &mut State) -> Result<(), RewriteError> {
        let NodeKind::Stmt(kind) = self.tree.kind(id).clone() else {
            return Ok(());
        };
        let children = self.tree.children(id).to_vec();

        match (kind, children.as_slice()) {
            (StmtKind::Block, stmts) => {
                self.scopes.push(Vec::new());
                for &stmt in stmts {
                    self.stmt(stmt, state)?;
                }
                self.leave_scope(state);
            }
            (StmtKind::Expression, &[expr]) => {
                self.expr(expr, state)?;
            }
            (StmtKind::LocalVar { ty, name }, init) => {
                let value = match init.first() {
                    Some(&init) => self.expr(init, state)?,
                    None => None,
                };
                if let Some(scope) = self.scopes.last_mut() {
                    scope.push((name.clone(), ty));
                }
                self.bind(state, &name, value);
            }
            (StmtKind::If, &[cond, then_branch, ref rest @ ..]) => {
                self.expr(cond, state)?;
                let mut then_state = state.clone();
                self.stmt(then_branch, &mut then_state)?;
                let mut else_state = state.clone();
                if let Some(&else_branch) = rest.first() {
                    self.stmt(else_branch, &mut else_state)?;
                }
                *state = join(then_state, else_state);
            }
            (StmtKind::While, &[cond, body]) => {
                self.enter_loop(&[cond, body], state);
                let mut inner = state.clone();
                self.expr(cond, &mut inner)?;
                self.stmt(body, &mut inner)?;
            }
            (StmtKind::For { init, cond, update }, parts) => {
                let mut parts = parts.iter().copied();
                let mut next = |present: bool| if present { parts.next() } else { None };
                let init = next(init);
                let cond = next(cond);
                let update = next(update);
                let body = next(true);

                // The init declaration is scoped to the loop.
                self.scopes.push(Vec::new());
                if let Some(init) = init {
                    self.stmt(init, state)?;
                }
                let looped: Vec<NodeId> = [cond, update, body].into_iter().flatten().collect();
                self.enter_loop(&looped, state);

                let head = state.clone();
                let mut inner = head.clone();
                if let Some(cond) = cond {
                    self.expr(cond, &mut inner)?;
                }
                if let Some(body) = body {
                    self.stmt(body, &mut inner)?;
                }
                // Reached from the body end or a `continue`; only the
                // loop-invariant bindings of the head are certain there.
                if let Some(update) = update {
                    let mut at_update = head;
                    self.expr(update, &mut at_update)?;
                }
                self.leave_scope(state);
            }
            (StmtKind::Return, value) => {
                if let Some(&value) = value.first() {
                    self.expr(value, state)?;
                }
                *state = None;
            }
            (StmtKind::Break | StmtKind::Continue, _) => *state = None,
            _ => {}
        }
        Ok(())
    }

    /// Analyse the expression at `id`, rewriting it in place, and return
    /// its value when known.
    fn expr(&mut self, id: NodeId, state: &mut State) -> Result<Option<Literal>, RewriteError> {
        let NodeKind::Expr(kind) = self.tree.kind(id).clone() else {
            return Ok(None);
        };
        let children = self.tree.children(id).to_vec();

        let value = match (kind, children.as_slice()) {
            (ExprKind::Literal(lit), _) => return Ok(Some(lit)),
            (ExprKind::Name(name), _) => {
                let Some(value) = lookup(state, &name) else {
                    return Ok(None);
                };
                self.substitute(id, value.clone())?;
                return Ok(Some(value));
            }
            (ExprKind::Infix(op), &[lhs, rhs]) => {
                let left = self.expr(lhs, state)?;
                let right = if op.is_short_circuit() {
                    let mut taken = state.clone();
                    let right = self.expr(rhs, &mut taken)?;
                    *state = join(state.take(), taken);
                    right
                } else {
                    self.expr(rhs, state)?
                };
                match (left, right) {
                    (Some(l), Some(r)) => eval::infix(op, &l, &r),
                    _ => None,
                }
            }
            (ExprKind::Prefix(op @ (PrefixOp::Inc | PrefixOp::Dec)), &[operand]) => {
                return Ok(self.step(operand, op == PrefixOp::Inc, false, state));
            }
            (ExprKind::Prefix(op), &[operand]) => self
                .expr(operand, state)?
                .and_then(|v| eval::prefix(op, &v)),
            (ExprKind::Postfix(op), &[operand]) => {
                return Ok(self.step(operand, op == PostfixOp::Inc, true, state));
            }
            (ExprKind::Assign(op), &[target, value]) => {
                let Some(name) = self.name_of(target) else {
                    self.expr(value, state)?;
                    drop_non_locals(state, &self.scopes);
                    return Ok(None);
                };
                // Java reads the target before evaluating the right side.
                let old = lookup(state, &name);
                let value = self.expr(value, state)?;
                let new = match op {
                    AssignOp::Assign => value,
                    AssignOp::Compound(op) => match (old, value) {
                        (Some(o), Some(v)) => eval::infix(op, &o, &v),
                        _ => None,
                    },
                };
                self.assign(state, &name, new.clone());
                return Ok(new);
            }
            (ExprKind::Call(_), args) => {
                for &arg in args {
                    self.expr(arg, state)?;
                }
                drop_non_locals(state, &self.scopes);
                return Ok(None);
            }
            _ => return Ok(None),
        };

        // Fold only when the operands themselves are now literals; a known
        // value computed through an assignment keeps its side effect.
        if let Some(v) = &value {
            let all_literal = self
                .tree
                .children(id)
                .iter()
                .all(|&c| self.tree.kind(c).literal().is_some());
            if all_literal {
                self.substitute(id, v.clone())?;
            }
        }
        Ok(value)
    }

    /// `++`/`--` on `operand`; returns the expression's value.
    fn step(
        &mut self,
        operand: NodeId,
        increment: bool,
        postfix: bool,
        state: &mut State,
    ) -> Option<Literal> {
        let Some(name) = self.name_of(operand) else {
            drop_non_locals(state, &self.scopes);
            return None;
        };
        let old = lookup(state, &name);
        let new = old.as_ref().and_then(|v| eval::step(v, increment));
        self.assign(state, &name, new.clone());
        if postfix {
            old
        } else {
            new
        }
    }

    fn name_of(&self, id: NodeId) -> Option<String> {
        match self.tree.kind(id) {
            NodeKind::Expr(ExprKind::Name(name)) => Some(name.clone()),
            _ => None,
        }
    }

    /// Record a write to `name`. A dotted target may be any object's
    /// field, so it clobbers every non-local binding.
    fn assign(&self, state: &mut State, name: &str, value: Option<Literal>) {
        if name.contains('.') {
            drop_non_locals(state, &self.scopes);
        } else {
            self.bind(state, name, value);
        }
    }

    /// The innermost declaration of `name`: a local or parameter, else a
    /// field of the enclosing class.
    fn declared_type(&self, name: &str) -> Option<&Type> {
        self.scopes
            .iter()
            .rev()
            .flat_map(|scope| scope.iter().rev())
            .find(|(n, _)| n == name)
            .map(|(_, ty)| ty)
            .or_else(|| self.fields.get(name))
    }

    fn bind(&self, state: &mut State, name: &str, value: Option<Literal>) {
        let Some(env) = state else {
            return;
        };
        match value {
            Some(v) if self.declared_type(name).is_some_and(|ty| holds(ty, &v)) => {
                env.insert(name.to_string(), v);
            }
            _ => {
                env.remove(name);
            }
        }
    }

    fn substitute(&mut self, id: NodeId, value: Literal) -> Result<(), RewriteError> {
        trace!(node = ?id, %value, "substitute constant");
        let span = self.tree.span(id);
        let literal = self
            .tree
            .alloc(NodeKind::Expr(ExprKind::Literal(value)), span, Vec::new())?;
        self.tree.replace(id, literal)?;
        self.rewrites += 1;
        Ok(())
    }

    fn leave_scope(&mut self, state: &mut State) {
        let Some(names) = self.scopes.pop() else {
            return;
        };
        if let Some(env) = state {
            for (name, _) in names {
                env.remove(&name);
            }
        }
    }

    /// Unbind what a loop may change between iterations: every name it
    /// assigns, and every non-local if it writes a dotted name or calls.
    fn enter_loop(&self, parts: &[NodeId], state: &mut State) {
        let Some(env) = state else {
            return;
        };
        let mut assigned = FxHashSet::default();
        let mut clobbers_fields = false;
        for &part in parts {
            for node in self.tree.descendants(part) {
                let target = match self.tree.kind(node) {
                    NodeKind::Expr(ExprKind::Assign(_))
                    | NodeKind::Expr(ExprKind::Prefix(PrefixOp::Inc | PrefixOp::Dec))
                    | NodeKind::Expr(ExprKind::Postfix(_)) => self.tree.children(node).first(),
                    NodeKind::Expr(ExprKind::Call(_)) => {
                        clobbers_fields = true;
                        continue;
                    }
                    _ => continue,
                };
                match target.and_then(|&t| self.name_of(t)) {
                    Some(name) if !name.contains('.') => {
                        assigned.insert(name);
                    }
                    _ => clobbers_fields = true,
                }
            }
        }
        env.retain(|name, _| {
            !assigned.contains(name) && (!clobbers_fields || is_local(&self.scopes, name))
        });
    }
}

fn lookup(state: &State, name: &str) -> Option<Literal> {
    state.as_ref().and_then(|env| env.get(name)).cloned()
}

fn is_local(scopes: &[Decls], name: &str) -> bool {
    scopes.iter().any(|scope| scope.iter().any(|(n, _)| n == name))
}

fn drop_non_locals(state: &mut State, scopes: &[Decls]) {
    if let Some(env) = state {
        env.retain(|name, _| is_local(scopes, name));
    }
}
