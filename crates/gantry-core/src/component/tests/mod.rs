pub mod dependency_tests;
pub mod managed_tests;
