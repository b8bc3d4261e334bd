use nodesync_fs::RelativePath;
use proptest::prelude::*;

proptest! {
    #[test]
    fn test_normalization_invariants(s in "\\PC*") {
        let path = RelativePath::new(&s);
        let as_str = path.as_str();

        prop_assert!(as_str.starts_with('/'));
        prop_assert!(!as_str.contains('\\'));
        prop_assert!(!as_str.contains("//"));
        if !path.is_root() {
            prop_assert!(!as_str.ends_with('/'));
        }

        // Normalizing twice is a no-op
        let again = RelativePath::new(as_str);
        prop_assert_eq!(&again, &path);
    }

    #[test]
    fn test_ancestors_contain_the_path(segments in prop::collection::vec("[a-z]{1,6}", 1..6)) {
        let path = RelativePath::new(segments.join("/"));
        let ancestors = path.ancestors();

        prop_assert_eq!(ancestors.len(), segments.len() - 1);
        for ancestor in &ancestors {
            prop_assert!(path.is_under(ancestor));
        }
    }
}
