use std::io::Write;

use minic_core::{
    AstNodeKind, CompileOptions, Level, MinicErrorExt, Script, Stage, ast, compile_source, compile_source_with_progress,
    generate_error_reports,
};

/// Tree dump with the `@ line:col` suffixes removed.
fn shape(src: &str) -> String {
    let tree = ast::generate_ast_from_source(&Script::from_source("shape.mc", src)).expect("parse");
    tree.to_string()
        .lines()
        .map(|line| line.split(" @ ").next().unwrap_or(line))
        .collect::<Vec<_>>()
        .join("\n")
}

fn diagnostics(src: &str) -> Vec<Box<dyn MinicErrorExt>> {
    match compile_source(&Script::from_source("front.mc", src), &CompileOptions::default()) {
        Ok(_) => Vec::new(),
        Err(diags) => diags,
    }
}

#[test]
fn script_loads_from_disk() {
    let mut file = tempfile::Builder::new().suffix(".mc").tempfile().expect("tempfile");
    writeln!(file, "func main() {{ print(7); }}").expect("write");

    let script = Script::new(file.path().to_path_buf()).expect("load");
    assert!(script.name.ends_with(".mc"));
    let compilation = compile_source(&script, &CompileOptions::default()).expect("compile");
    assert!(compilation.analysis.has_main);
}

#[test]
fn missing_script_is_reported() {
    let dir = tempfile::tempdir().expect("tempdir");
    let err = Script::new(dir.path().join("absent.mc")).unwrap_err();
    assert!(err.message().contains("absent.mc"));
}

#[test]
fn empty_script_is_rejected() {
    let diags = diagnostics("  \n\t\n");
    assert_eq!(diags.len(), 1);
    assert!(diags[0].message().contains("empty"));

    // a comment parses, but leaves nothing to run
    let diags = diagnostics("// only a comment\n");
    assert_eq!(diags.len(), 1);
    assert!(diags[0].message().contains("entry point"));
}

#[test]
fn syntax_error_carries_a_position() {
    let diags = diagnostics("x = 1;\ny = ;\n");
    assert_eq!(diags.len(), 1);
    let location = diags[0].location().expect("location");
    assert_eq!(location.line, 2);
    assert_eq!(diags[0].level(), Level::Error);
}

#[test]
fn keywords_are_not_identifiers() {
    assert_eq!(diagnostics("while = 3;").len(), 1);
    // a keyword prefix is still a valid identifier
    assert!(diagnostics("whilex = 3; print(whilex);").is_empty());
}

#[test]
fn oversized_literal_is_a_syntax_error() {
    let diags = diagnostics("x = 99999999999999999999;");
    assert!(diags[0].message().contains("64 bits"));
}

#[test]
fn precedence_and_associativity() {
    let dump = shape("x = 10 - 4 - 3 * 2 < 5;");
    // ((10 - 4) - (3 * 2)) < 5
    let expected = "\
Program
  Assign x
    BinaryOp <
      BinaryOp -
        BinaryOp -
          Integer 10
          Integer 4
        BinaryOp *
          Integer 3
          Integer 2
      Integer 5";
    assert_eq!(dump, expected);
}

#[test]
fn unary_minus_becomes_subtraction_from_zero() {
    let dump = shape("x = -5;");
    assert!(dump.contains("BinaryOp -\n      Integer 0\n      Integer 5"), "{}", dump);
}

#[test]
fn all_semantic_problems_are_collected() {
    let src = "
        func f(a, a) { return b; }
        func main() { return f(1); }
        func main() { return 0; }
        print(nope(2));
    ";
    let diags = diagnostics(src);
    let report = generate_error_reports(&diags);
    assert!(report.contains("Parameter 'a' is declared more than once"), "{}", report);
    assert!(report.contains("'b'"), "{}", report);
    assert!(report.contains("expects 2 argument(s) but 1 were given"), "{}", report);
    assert!(report.contains("'main' is defined more than once"), "{}", report);
    assert!(report.contains("undefined function 'nope'"), "{}", report);
    assert!(diags.iter().all(|d| d.level() == Level::Error));
    assert_eq!(report.lines().count(), diags.len());
}

#[test]
fn call_statement_result_is_discarded() {
    let src = "func f() { return 1; }\nf();";
    let compilation = compile_source(&Script::from_source("call.mc", src), &CompileOptions::default()).expect("compile");
    match compilation.ast.get_kind() {
        AstNodeKind::Program { items } => assert_eq!(items.len(), 2),
        other => panic!("unexpected root {}", other),
    }
    assert!(compilation.analysis.function("f").is_some());
}

#[test]
fn progress_follows_every_stage_in_order() {
    let script = Script::from_source("stages.mc", "x = 1 + 2;");
    let mut seen = Vec::new();
    let compilation = compile_source_with_progress(&script, &CompileOptions { optimize: false }, |stage| seen.push(stage))
        .expect("compile");
    assert_eq!(seen, Stage::ALL.to_vec());
    assert!(compilation.backend.optimized_ir.is_none());

    // a failing front end stops the callbacks
    let mut seen = Vec::new();
    let result = compile_source_with_progress(&Script::from_source("bad.mc", "x = ;"), &CompileOptions::default(), |stage| {
        seen.push(stage)
    });
    assert!(result.is_err());
    assert_eq!(seen, vec![Stage::Parse]);
}

#[test]
fn token_stream_carries_positions() {
    let tokens = ast::tokenize(&Script::from_source("tok.mc", "func f(a) {\n  return a * 2;\n}")).expect("tokens");
    let lexemes: Vec<&str> = tokens.iter().map(|t| t.lexeme.as_str()).collect();
    assert_eq!(lexemes, vec!["func", "f", "a", "return", "a", "*", "2"]);
    assert_eq!(tokens[3].to_string(), "2:3 kw_return 'return'");
}
