//! Compile-time tests for the `EnvEnum` derive macro.
//!
//! Run with: cargo nextest run --package pshenv trybuild

#[test]
fn compile_pass() {
    let t = trybuild::TestCases::new();
    t.pass("tests/compile_pass/env_enum.rs");
    t.pass("tests/compile_pass/env_enum_named.rs");
}
