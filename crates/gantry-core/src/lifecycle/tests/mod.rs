pub mod support;
pub mod gate_tests;
