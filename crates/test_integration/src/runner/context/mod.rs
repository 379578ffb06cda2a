pub mod stub_identity;
pub mod test_context;
