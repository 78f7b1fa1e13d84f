use dler_fs::NormalizedPath;
use proptest::prelude::*;

proptest! {
    #[test]
    fn test_normalization_invariants(s in "\\PC*") {
        let path = NormalizedPath::new(&s);
        let as_str = path.as_str();

        prop_assert!(!as_str.contains('\\'));
        prop_assert!(!as_str.contains("//"));
        prop_assert!(as_str == "/" || !as_str.ends_with('/'));

        // Normalizing an already-normalized path is the identity
        let again = NormalizedPath::new(as_str);
        prop_assert_eq!(&path, &again);
    }

    #[test]
    fn test_join_then_strip_recovers_segment(a in "[a-z]{1,8}(/[a-z]{1,8}){0,3}", b in "[a-z]{1,8}(/[a-z]{1,8}){0,3}") {
        let base = NormalizedPath::new(&a);
        let joined = base.join(&b);

        prop_assert!(joined.starts_with(base.as_str()));
        let rest = joined.strip_prefix(base.as_str()).unwrap();
        prop_assert_eq!(rest.as_str(), b.as_str());
    }
}
