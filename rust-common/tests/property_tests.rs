//! Property-based tests for rust-common crate.

use proptest::prelude::*;
use rust_common::{ErrorKind, PlatformError};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Invalid input is always a configuration error and keeps its message.
    #[test]
    fn prop_invalid_input_is_configuration(msg in "[a-zA-Z0-9 _-]{1,40}") {
        let err = PlatformError::invalid_input(msg.clone());
        prop_assert_eq!(err.kind(), ErrorKind::Configuration);
        prop_assert!(err.to_string().contains(&msg));
    }

    /// I/O failures are persistence errors naming the path.
    #[test]
    fn prop_io_is_persistence(dir in "[a-z]{1,10}", file in "[a-z]{1,10}") {
        let path = format!("/tmp/{dir}/{file}.json");
        let err = PlatformError::io(
            &path,
            std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        );
        prop_assert_eq!(err.kind(), ErrorKind::Persistence);
        prop_assert!(err.to_string().contains(&path));
    }

    /// Truncated JSON documents are encoding errors.
    #[test]
    fn prop_truncated_json_is_encoding(key in "[a-z]{1,8}", value in any::<i32>()) {
        let document = format!("{{\"{key}\": {value}");
        let parse = serde_json::from_str::<serde_json::Value>(&document).unwrap_err();
        prop_assert_eq!(PlatformError::from(parse).kind(), ErrorKind::Encoding);
    }
}
