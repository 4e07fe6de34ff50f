//! End-to-end tests through the `compita` facade.

use compita::ast::{BinaryOp, Expr, Function, Program};
use compita::{
    AstBuilder, Backmap, Bump, CodegenError, CompileOptions, Compiler, DiagnosticKind, GlobalBase, Instruction, MemoryAddress,
    Position, Register, ScopeId, SemanticError, Site, SymbolTable, Token, TypeResolver, VarType, can_cast,
    compile_report, serialize,
};

// ============================================================================
// Helpers
// ============================================================================

fn compile<'ast>(program: &'ast Program<'ast>) -> compita::CompilationResult {
    Compiler::compile(program, &CompileOptions::default())
}

fn of_kind(errors: &[SemanticError], kind: DiagnosticKind) -> Vec<&SemanticError> {
    errors.iter().filter(|e| e.kind() == kind).collect()
}

fn chain(error: &SemanticError) -> Vec<String> {
    match error {
        SemanticError::RecursiveCall { chain, .. } => chain.clone(),
        other => panic!("not a recursion diagnostic: {other}"),
    }
}

/// `void name() { call callee(); }`
fn caller<'ast>(b: &AstBuilder<'ast>, name: &str, callee: &str) -> Function<'ast> {
    b.function(name, &[], VarType::Void, &[], &[b.call_stmt(callee, &[])])
}

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn duplicate_global_points_at_the_second_declaration() {
    let arena = Bump::new();
    let b = AstBuilder::new(&arena);
    let first = b.scalar("x", VarType::Int);
    let second = b.scalar("x", VarType::Int);
    let main = b.main_function(&[], &[b.assign(b.target("x", &[]), b.int(0)), b.write(&[b.expr_item(b.var("x"))])]);
    let program = b.program("p", &[b.declaration(first), b.declaration(second)], &[main]);

    let result = compile(program);
    let duplicates = of_kind(&result.diagnostics, DiagnosticKind::DuplicateDeclaration);
    assert_eq!(duplicates.len(), 1);
    assert_eq!(duplicates[0].site(), Site::Node(second.id));
    assert!(result.program.is_none());
}

#[test]
fn dimension_mismatch_cites_both_counts() {
    let arena = Bump::new();
    let b = AstBuilder::new(&arena);
    let a = b.array("a", VarType::Int, &[3, 4]);
    let main = b.main_function(
        &[],
        &[
            b.assign(b.target("a", &[b.int(0), b.int(0)]), b.int(7)),
            b.write(&[b.expr_item(b.indexed("a", &[b.int(1)]))]),
        ],
    );
    let program = b.program("p", &[b.declaration(a)], &[main]);

    let result = compile(program);
    let mismatches = of_kind(&result.diagnostics, DiagnosticKind::MismatchingDimensionality);
    assert_eq!(mismatches.len(), 1);
    assert!(matches!(
        mismatches[0],
        SemanticError::MismatchingDimensionality { declared: 2, used: 1, .. }
    ));
    assert_eq!(
        mismatches[0].to_string(),
        "'a' declared with 2 dimension(s) but used with 1"
    );
}

#[test]
fn missing_main_skips_code_generation() {
    let arena = Bump::new();
    let b = AstBuilder::new(&arena);
    let helper = b.function("helper", &[], VarType::Void, &[], &[b.write(&[b.text("hi")])]);
    let program = b.program("p", &[], &[helper]);

    let result = compile(program);
    assert_eq!(of_kind(&result.diagnostics, DiagnosticKind::MissingMainFunction).len(), 1);
    assert!(result.program.is_none());
    assert_eq!(result.codegen_error, None);
}

#[test]
fn minimal_program_halts_after_calling_main() {
    let arena = Bump::new();
    let b = AstBuilder::new(&arena);
    let main = b.main_function(&[], &[b.write(&[b.text("ok")])]);
    let program = b.program("p", &[], &[main]);

    let result = compile(program);
    assert!(result.diagnostics.is_empty());
    let code = result.program.expect("clean program compiles");
    assert!(!code.is_empty());

    let halt = code
        .iter()
        .position(|i| matches!(i, Instruction::Halt))
        .expect("entry sequence ends in HALT");
    assert_eq!(
        code[halt - 1],
        Instruction::Call {
            slot: MemoryAddress::relative(Register::Ehm, -1)
        }
    );
    assert_eq!(code.last(), Some(&Instruction::Ret));
}

#[test]
fn missing_argument_is_reported_once() {
    let arena = Bump::new();
    let b = AstBuilder::new(&arena);
    let f = b.function(
        "f",
        &[b.scalar("a", VarType::Int), b.scalar("c", VarType::Int)],
        VarType::Void,
        &[],
        &[b.write(&[b.expr_item(b.binary(BinaryOp::Add, b.var("a"), b.var("c")))])],
    );
    let main = b.main_function(&[], &[b.call_stmt("f", &[b.int(1)])]);
    let program = b.program("p", &[], &[f, main]);

    let result = compile(program);
    let counts = of_kind(&result.diagnostics, DiagnosticKind::ArgumentCountMismatch);
    assert_eq!(counts.len(), 1);
    assert_eq!(counts[0].to_string(), "'f' expects 2 argument(s), got 1");
    assert!(of_kind(&result.diagnostics, DiagnosticKind::IncompatibleArgument).is_empty());
}

#[test]
fn self_recursion_is_reported_once() {
    let arena = Bump::new();
    let b = AstBuilder::new(&arena);
    let f = caller(&b, "f", "f");
    let main = b.main_function(&[], &[b.call_stmt("f", &[])]);
    let program = b.program("p", &[], &[f, main]);

    let result = compile(program);
    let cycles = of_kind(&result.diagnostics, DiagnosticKind::RecursiveCall);
    assert_eq!(cycles.len(), 1);
    assert_eq!(chain(cycles[0]), vec!["f", "f"]);
}

#[test]
fn three_cycle_is_found_once_whatever_the_declaration_order() {
    let orders: [[&str; 3]; 3] = [["f", "g", "h"], ["g", "h", "f"], ["h", "f", "g"]];
    let mut seen = Vec::new();

    for order in orders {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let next = |name: &str| match name {
            "f" => "g",
            "g" => "h",
            _ => "f",
        };
        let mut functions: Vec<_> = order.iter().map(|&name| caller(&b, name, next(name))).collect();
        functions.push(b.main_function(&[], &[b.call_stmt(order[0], &[])]));
        let program = b.program("p", &[], &functions);

        let result = compile(program);
        let cycles = of_kind(&result.diagnostics, DiagnosticKind::RecursiveCall);
        // one diagnostic per call site on the cycle, all naming the same cycle
        assert_eq!(cycles.len(), 3);
        let first = chain(cycles[0]);
        assert!(cycles.iter().all(|c| chain(c) == first));
        assert_eq!(first.len(), 4);
        assert_eq!(first.first(), first.last());
        let mut members = first[..3].to_vec();
        members.sort();
        seen.push(members);
    }

    assert!(seen.iter().all(|members| members == &["f", "g", "h"]));
}

#[test]
fn recursion_is_accepted_when_the_check_is_off() {
    let arena = Bump::new();
    let b = AstBuilder::new(&arena);
    let f = caller(&b, "f", "f");
    let main = b.main_function(&[], &[b.call_stmt("f", &[])]);
    let program = b.program("p", &[], &[f, main]);

    let options = CompileOptions::new().reject_recursion(false);
    let result = Compiler::compile(program, &options);
    assert!(result.diagnostics.is_empty());
    assert!(result.is_success());
}

// ============================================================================
// Properties
// ============================================================================

#[test]
fn scope_lookup_falls_back_to_global_only() {
    let arena = Bump::new();
    let b = AstBuilder::new(&arena);
    let shared = b.scalar("shared", VarType::Int);
    let f = b.function(
        "f",
        &[],
        VarType::Void,
        &[b.declaration(b.scalar("mine", VarType::Int))],
        &[],
    );
    let g = b.function("g", &[], VarType::Void, &[], &[]);
    let main = b.main_function(&[], &[]);
    let program = b.program("p", &[b.declaration(shared)], &[f, g, main]);

    let (table, errors) = SymbolTable::fill(program);
    assert!(errors.is_empty());
    let f_scope = table.scope_of("f").expect("f has a scope");
    let g_scope = table.scope_of("g").expect("g has a scope");

    assert!(table.lookup(f_scope, "shared", true).is_none());
    assert!(table.lookup(f_scope, "shared", false).is_some());
    assert!(table.lookup(f_scope, "mine", false).is_some());
    assert!(table.lookup(g_scope, "mine", false).is_none());
    assert!(table.lookup(ScopeId::GLOBAL, "mine", false).is_none());
}

#[test]
fn type_resolution_is_idempotent() {
    let arena = Bump::new();
    let b = AstBuilder::new(&arena);
    let sum = b.binary(BinaryOp::Add, b.var("n"), b.char('a'));
    let test = b.binary(BinaryOp::Less, sum, b.float(2.5));
    let main = b.main_function(
        &[b.declaration(b.scalar("n", VarType::Int))],
        &[b.assign(b.target("n", &[]), b.int(1)), b.if_(test, &[b.write(&[b.text("lt")])], &[])],
    );
    let program = b.program("p", &[], &[main]);
    let observed: [Expr<'_>; 2] = [sum, test];

    let (table, _) = SymbolTable::fill(program);
    let first_count = TypeResolver::resolve(&table, program);
    let first: Vec<_> = observed.iter().map(|e| e.ty()).collect();
    let second_count = TypeResolver::resolve(&table, program);
    let second: Vec<_> = observed.iter().map(|e| e.ty()).collect();

    assert_eq!(first, vec![Some(VarType::Int), Some(VarType::Logic)]);
    assert_eq!(first, second);
    assert_eq!(first_count, second_count);
}

#[test]
fn cast_lattice() {
    assert!(can_cast(VarType::Char, VarType::Int));
    assert!(!can_cast(VarType::Float, VarType::Int));
    assert!(!can_cast(VarType::Int, VarType::Logic));
    assert!(can_cast(VarType::Logic, VarType::Logic));
}

// ============================================================================
// Reporting
// ============================================================================

#[test]
fn report_localizes_assignment_across_both_sides() {
    let arena = Bump::new();
    let b = AstBuilder::new(&arena);
    let target = b.target("flag", &[]);
    let value = b.float(1.5);
    let main = b.main_function(
        &[b.declaration(b.scalar("flag", VarType::Logic))],
        &[b.assign(target, value), b.write(&[b.expr_item(b.var("flag"))])],
    );
    let program = b.program("p", &[], &[main]);

    let mut backmap = Backmap::new();
    backmap.record_name(target.id, Token::new("flag", 4, 2));
    backmap.record_span(value.id(), Token::new("1.5", 4, 10), Token::new("1.5", 4, 10));

    let report = compile_report(program, &backmap, &CompileOptions::default());
    let assignment = report
        .diagnostics
        .iter()
        .find(|d| d.kind == DiagnosticKind::IncompatibleAssignment)
        .expect("float into logic is rejected");
    assert_eq!(assignment.message, "cannot assign float value to logic target");
    let range = assignment.range.expect("both sides were recorded");
    assert_eq!(range.begin, Position::new(4, 2));
    assert_eq!(range.end, Position::new(4, 13));
    assert!(report.listing.is_empty());
}

#[test]
fn absolute_global_base_moves_every_global() {
    let arena = Bump::new();
    let b = AstBuilder::new(&arena);
    let main = b.main_function(
        &[],
        &[b.assign(b.target("total", &[]), b.int(3)), b.write(&[b.expr_item(b.var("total"))])],
    );
    let program = b.program("p", &[b.declaration(b.scalar("total", VarType::Int))], &[main]);

    let options = CompileOptions::new().global_base(GlobalBase::Absolute(1023));
    let result = Compiler::compile(program, &options);
    let text = serialize(&result.program.expect("clean program compiles"));

    assert!(text.contains("MOV <int>1022 R1"), "global at the top:\n{text}");
    assert!(text.contains("CALL M[1021]"), "main slot below the global:\n{text}");
    assert!(!text.contains("EHM"), "no EHM-relative address left:\n{text}");
}

#[test]
fn oversized_array_is_a_codegen_error() {
    let arena = Bump::new();
    let b = AstBuilder::new(&arena);
    let huge = b.array("a", VarType::Int, &[1 << 32, 1 << 32]);
    let main = b.main_function(
        &[],
        &[
            b.assign(b.target("a", &[b.int(0), b.int(0)]), b.int(1)),
            b.write(&[b.expr_item(b.indexed("a", &[b.int(0), b.int(0)]))]),
        ],
    );
    let program = b.program("p", &[b.declaration(huge)], &[main]);

    let result = compile(program);
    assert!(result.diagnostics.is_empty());
    assert!(result.program.is_none());
    assert_eq!(
        result.codegen_error,
        Some(CodegenError::StorageTooLarge {
            name: "a".into(),
            limit: 8096
        })
    );
}
