//! Per-file capability extraction.
//!
//! A worker definition is a struct the file implements the `Worker` base
//! trait for. From every `impl` block of such a struct we pull:
//!
//! - the skill summary: the first string literal bound to `GOAL` or `DESC`,
//!   either as an associated const or as a `let` binding at the top level of
//!   a method body (bindings in nested scopes are ignored);
//! - declared actions and watched signals: arguments of `set_actions(..)` /
//!   `watch(..)` calls. Accepted shapes are a literal array, a reference to
//!   one, a `vec![..]` of symbolic references, or a single constructor call.
//!   Calls one level inside an `if`/`else` branch are inspected too; deeper
//!   nesting is a deliberate limitation.

use std::collections::BTreeSet;
use std::path::Path;

use syn::parse::{Parse, ParseStream};
use syn::punctuated::Punctuated;
use syn::spanned::Spanned;
use syn::{Block, Expr, ImplItem, Item, ItemImpl, Lit, Pat, Stmt, Token, Type};
use team_planner_sdk::{CapabilityRecord, SourceLocation};

/// Base trait a worker definition must implement to be discovered.
pub const BASE_TRAIT: &str = "Worker";

const SKILL_CONSTS: [&str; 2] = ["GOAL", "DESC"];
const SKILL_BINDINGS: [&str; 2] = ["goal", "desc"];
const ACTIONS_CALL: &str = "set_actions";
const WATCH_CALL: &str = "watch";

#[derive(Default)]
struct WorkerScan {
    goal: Option<String>,
    desc: Option<String>,
    actions: BTreeSet<String>,
    watched: BTreeSet<String>,
    line: usize,
}

/// Scan one file from disk. Any read or parse error is returned as a plain
/// message so the caller can record an isolated failure.
pub fn scan_file(path: &Path) -> Result<Vec<CapabilityRecord>, String> {
    let source = std::fs::read_to_string(path).map_err(|e| e.to_string())?;
    scan_source(path, &source)
}

/// Scan source text already in memory.
pub fn scan_source(path: &Path, source: &str) -> Result<Vec<CapabilityRecord>, String> {
    let file = syn::parse_file(source).map_err(|e| {
        let start = e.span().start();
        format!("parse error at line {}: {}", start.line, e)
    })?;

    // Pass 1: which structs implement the base trait, in declaration order.
    let mut names: Vec<String> = Vec::new();
    let mut scans: std::collections::HashMap<String, WorkerScan> =
        std::collections::HashMap::new();
    for item in &file.items {
        if let Item::Impl(imp) = item {
            if is_worker_impl(imp) {
                if let Some(name) = self_ty_name(imp) {
                    scans.entry(name.clone()).or_insert_with(|| {
                        names.push(name.clone());
                        WorkerScan {
                            line: imp.span().start().line,
                            ..Default::default()
                        }
                    });
                }
            }
        }
    }

    // Prefer the struct definition itself as the source location.
    for item in &file.items {
        if let Item::Struct(def) = item {
            if let Some(scan) = scans.get_mut(&def.ident.to_string()) {
                scan.line = def.span().start().line;
            }
        }
    }

    // Pass 2: every impl block (inherent or trait) of a discovered worker.
    for item in &file.items {
        if let Item::Impl(imp) = item {
            if let Some(name) = self_ty_name(imp) {
                if let Some(scan) = scans.get_mut(&name) {
                    scan_impl(imp, scan);
                }
            }
        }
    }

    Ok(names
        .into_iter()
        .filter_map(|name| scans.remove(&name).map(|scan| scan.into_record(name, path)))
        .collect())
}

impl WorkerScan {
    fn into_record(self, name: String, path: &Path) -> CapabilityRecord {
        CapabilityRecord {
            name,
            skill: self.goal.or(self.desc),
            actions: self.actions,
            watched: self.watched,
            source: SourceLocation {
                file: path.to_path_buf(),
                line: self.line,
            },
        }
    }

    /// First literal wins; later bindings of the same name are ignored.
    fn bind_skill(&mut self, name: &str, value: String) {
        let slot = if name == "goal" {
            &mut self.goal
        } else {
            &mut self.desc
        };
        if slot.is_none() {
            *slot = Some(value);
        }
    }
}

fn is_worker_impl(imp: &ItemImpl) -> bool {
    imp.trait_
        .as_ref()
        .and_then(|(_, path, _)| path.segments.last())
        .map(|segment| segment.ident == BASE_TRAIT)
        .unwrap_or(false)
}

fn self_ty_name(imp: &ItemImpl) -> Option<String> {
    if let Type::Path(ty) = &*imp.self_ty {
        ty.path.segments.last().map(|s| s.ident.to_string())
    } else {
        None
    }
}

fn scan_impl(imp: &ItemImpl, scan: &mut WorkerScan) {
    for item in &imp.items {
        match item {
            ImplItem::Const(konst) => {
                let ident = konst.ident.to_string();
                if SKILL_CONSTS.contains(&ident.as_str()) {
                    if let Some(value) = str_literal(&konst.expr) {
                        scan.bind_skill(&ident.to_lowercase(), value);
                    }
                }
            }
            ImplItem::Fn(method) => scan_method_body(&method.block, scan),
            _ => {}
        }
    }
}

fn scan_method_body(block: &Block, scan: &mut WorkerScan) {
    for stmt in &block.stmts {
        match stmt {
            // Skill bindings only count at the top level of the body.
            Stmt::Local(local) => {
                if let (Some(name), Some(init)) = (binding_name(&local.pat), &local.init) {
                    if SKILL_BINDINGS.contains(&name.as_str()) {
                        if let Some(value) = str_literal(&init.expr) {
                            scan.bind_skill(&name, value);
                        }
                    }
                }
            }
            Stmt::Expr(expr, _) => scan_statement(expr, scan, true),
            _ => {}
        }
    }
}

/// Inspect one statement expression. `allow_conditional` permits descending
/// exactly one level into `if`/`else` branches.
fn scan_statement(expr: &Expr, scan: &mut WorkerScan, allow_conditional: bool) {
    match expr {
        Expr::MethodCall(call) => {
            let method = call.method.to_string();
            let target = match method.as_str() {
                ACTIONS_CALL => Some(&mut scan.actions),
                WATCH_CALL => Some(&mut scan.watched),
                _ => None,
            };
            if let (Some(target), Some(arg)) = (target, call.args.first()) {
                target.extend(extract_symbols(arg));
            }
        }
        Expr::If(branch) if allow_conditional => {
            scan_branch_stmts(&branch.then_branch, scan);
            let mut tail = branch.else_branch.as_ref().map(|(_, e)| e.as_ref());
            while let Some(expr) = tail {
                match expr {
                    Expr::Block(block) => {
                        scan_branch_stmts(&block.block, scan);
                        tail = None;
                    }
                    // `else if` chains stay at the same nesting level.
                    Expr::If(next) => {
                        scan_branch_stmts(&next.then_branch, scan);
                        tail = next.else_branch.as_ref().map(|(_, e)| e.as_ref());
                    }
                    _ => tail = None,
                }
            }
        }
        _ => {}
    }
}

fn scan_branch_stmts(block: &Block, scan: &mut WorkerScan) {
    for stmt in &block.stmts {
        if let Stmt::Expr(expr, _) = stmt {
            scan_statement(expr, scan, false);
        }
    }
}

fn binding_name(pat: &Pat) -> Option<String> {
    match pat {
        Pat::Ident(ident) => Some(ident.ident.to_string()),
        Pat::Type(typed) => binding_name(&typed.pat),
        _ => None,
    }
}

fn str_literal(expr: &Expr) -> Option<String> {
    if let Expr::Lit(lit) = expr {
        if let Lit::Str(value) = &lit.lit {
            return Some(value.value());
        }
    }
    None
}

/// Comma-separated expressions, as found inside `vec![..]` tokens.
struct ElemList(Punctuated<Expr, Token![,]>);

impl Parse for ElemList {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        Ok(Self(Punctuated::parse_terminated(input)?))
    }
}

/// Resolve a configuration-call argument to symbol names.
fn extract_symbols(arg: &Expr) -> Vec<String> {
    match arg {
        Expr::Array(array) => array.elems.iter().filter_map(symbol_name).collect(),
        Expr::Reference(reference) => extract_symbols(&reference.expr),
        Expr::Macro(mac) if mac.mac.path.is_ident("vec") => {
            match syn::parse2::<ElemList>(mac.mac.tokens.clone()) {
                Ok(elems) => elems.0.iter().filter_map(symbol_name).collect(),
                Err(_) => Vec::new(),
            }
        }
        Expr::Call(_) => symbol_name(arg).into_iter().collect(),
        _ => Vec::new(),
    }
}

/// Name of one symbolic reference: the last path segment, or for
/// `Foo::new()`-style constructors the segment before `new`/`default`.
fn symbol_name(expr: &Expr) -> Option<String> {
    match expr {
        Expr::Path(path) => path.path.segments.last().map(|s| s.ident.to_string()),
        Expr::Call(call) => {
            if let Expr::Path(path) = &*call.func {
                let segments: Vec<String> = path
                    .path
                    .segments
                    .iter()
                    .map(|s| s.ident.to_string())
                    .collect();
                match segments.last().map(String::as_str) {
                    Some("new") | Some("default") if segments.len() >= 2 => {
                        Some(segments[segments.len() - 2].clone())
                    }
                    Some(_) => Some(segments[segments.len() - 1].clone()),
                    None => None,
                }
            } else {
                None
            }
        }
        _ => None,
    }
}
