use std::collections::BTreeMap;

use minic_core::vm::{LoadErrorKind, MachineCode, RuntimeErrorKind, VM, run_machine_code};
use minic_core::{CompileOptions, MinicErrorExt, Script, compile_source};

const COUNTDOWN: &str = "
    func countdown(n) {
        while (n > 0) {
            print(n);
            n = n - 1;
        }
        return n;
    }
    func main() {
        return countdown(3);
    }
";

#[test]
fn generated_text_loads_back_and_runs_identically() {
    let compilation = compile_source(&Script::from_source("countdown.mc", COUNTDOWN), &CompileOptions::default())
        .expect("compile");
    let text = compilation.machine_code().to_string();
    assert!(text.starts_with("JMP L_skip_0\n// func countdown(n)\nLABEL FUNC_countdown\nMOV n, _arg0\n"));
    assert!(text.ends_with("CALL main, 0\n"));

    let from_text = VM::from_text(&text).expect("load").run().expect("run");
    let direct = run_machine_code(compilation.machine_code(), None).expect("run");
    assert_eq!(from_text, direct);
    assert_eq!(direct.output, vec!["3", "2", "1"]);
    assert_eq!(direct.return_value(), 0);
}

#[test]
fn comments_and_blank_lines_never_execute() {
    let text = "\n// MOV x, 99\n\nMOV y, 1\n   // trailing\n";
    let code = MachineCode::from_text(text).expect("load");
    assert_eq!(code.instruction_count(), 1);
    let result = run_machine_code(&code, None).expect("run");
    assert_eq!(result.register("x"), 0);
    assert_eq!(result.register("y"), 1);
}

#[test]
fn unknown_label_and_function_are_fatal() {
    let err = VM::from_text("JMP nowhere\n").expect("load").run().unwrap_err();
    assert_eq!(err.kind, RuntimeErrorKind::UnknownLabel);
    assert!(err.message().contains("nowhere"));

    let err = VM::from_text("MOV _arg0, 1\nCALL ghost, 1\n").expect("load").run().unwrap_err();
    assert_eq!(err.kind, RuntimeErrorKind::UnknownFunction);
    assert_eq!(err.pc, 1);
}

#[test]
fn load_faults_reject_open_ended_text() {
    let err = MachineCode::from_text("MOV x, 1\nx = x + 1\n").unwrap_err();
    assert_eq!(err.kind, LoadErrorKind::UnknownOpcode);
    assert_eq!(err.line, 2);
    assert_eq!(err.location().map(|l| l.line), Some(2));

    let err = MachineCode::from_text("JZ x\n").unwrap_err();
    assert_eq!(err.kind, LoadErrorKind::BadArity);
}

#[test]
fn memory_is_a_read_fallback_only() {
    let vm = VM::from_text("MOV a, seed\nMOV seed, 5\nMOV b, seed\n")
        .expect("load")
        .with_memory(BTreeMap::from([("seed".to_string(), 3)]));
    let result = vm.run().expect("run");
    assert_eq!(result.register("a"), 3);
    // memory shadows the register on reads
    assert_eq!(result.register("b"), 3);
    assert_eq!(result.register("seed"), 5);
    assert_eq!(result.memory, BTreeMap::from([("seed".to_string(), 3)]));
}

#[test]
fn independent_runs_on_separate_threads() {
    let code = MachineCode::from_text("MOV i, 0\nLABEL top\n+ i, i, 1\nLT c, i, 1000\nJZ c, done\nJMP top\nLABEL done\n")
        .expect("load");
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let code = code.clone();
            std::thread::spawn(move || run_machine_code(&code, None).map(|r| r.register("i")))
        })
        .collect();
    for handle in handles {
        assert_eq!(handle.join().expect("thread").expect("run"), 1000);
    }
}
