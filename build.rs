fn main() {
    // Process LALRPOP grammars (src/expr/expr.lalrpop)
    lalrpop::process_root().unwrap();
    println!("cargo:rerun-if-changed=src/expr/expr.lalrpop");
}
