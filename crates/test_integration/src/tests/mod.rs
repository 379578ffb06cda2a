pub mod test_storage;
