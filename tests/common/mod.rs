// Common test utilities and fixtures

pub mod fixtures;
pub mod helpers;

// Re-export commonly used items
// Note: These may appear unused in some test binaries
#[allow(unused_imports)]
pub use fixtures::{python_module_900, TestRepo};
#[allow(unused_imports)]
pub use helpers::{
    assert_valid_result, create_test_services, index_test_directory, index_with_options,
};
