#[cfg(test)]
mod tests {
    use condaci::artifact::ArtifactRecord;
    use condaci::retention::{Channel, RetentionPolicy, files_to_remove, parse_hosted};
    use condaci::version::{ReleaseKind, Version};
    use std::path::Path;

    const HOSTED: &[&str] = &[
        "menpo/menpo/0.5.0+12.abc/linux-64/menpo-0.5.0+12.abc-py27_0.tar.bz2",
        "menpo/menpo/0.5.0+12.abc/linux-64/menpo-0.5.0+12.abc-py34_0.tar.bz2",
        "menpo/menpo/0.5.0+12.abc/osx-64/menpo-0.5.0+12.abc-py27_0.tar.bz2",
        "menpo/menpo/0.5.0/linux-64/menpo-0.5.0-py27_0.tar.bz2",
        "menpo/menpo/0.4.2+3.fff/linux-64/menpo-0.4.2+3.fff-py27_0.tar.bz2",
        "menpo/menpofit/0.5.0+12.abc/linux-64/menpofit-0.5.0+12.abc-py27_0.tar.bz2",
    ];

    const NEW_BUILD: &str = "/home/ci/miniconda/conda-bld/linux-64/menpo-0.5.0+13.def-py27_0.tar.bz2";

    #[test]
    fn test_only_same_line_dev_builds_are_superseded() {
        let hosted = parse_hosted(HOSTED);
        assert_eq!(hosted.len(), HOSTED.len());

        let removed = files_to_remove(Path::new(NEW_BUILD), &hosted).unwrap();
        let names: Vec<&str> = removed.iter().map(ArtifactRecord::full_name).collect();
        assert_eq!(
            names,
            vec!["menpo/menpo/0.5.0+12.abc/linux-64/menpo-0.5.0+12.abc-py27_0.tar.bz2"]
        );
        assert_eq!(removed[0].basename, "linux-64/menpo-0.5.0+12.abc-py27_0.tar.bz2");
    }

    #[test]
    fn test_main_channel_is_never_purged() {
        let hosted = parse_hosted(HOSTED);
        let policy = RetentionPolicy::new(Channel::new("main"));
        assert_eq!(policy.channel(), &Channel::Main);
        assert!(policy.removals(Path::new(NEW_BUILD), &hosted).unwrap().is_empty());

        let policy = RetentionPolicy::new(Channel::new("master"));
        assert_eq!(policy.removals(Path::new(NEW_BUILD), &hosted).unwrap().len(), 1);
    }

    #[test]
    fn test_malformed_hosted_entries_are_skipped() {
        let hosted = parse_hosted(&["not-an-identifier", HOSTED[0], "a/b"]);
        assert_eq!(hosted.len(), 1);
        assert_eq!(hosted[0].configuration, "py27_0");
    }

    #[test]
    fn test_release_kinds() {
        assert_eq!(Version::new("0.5.0").kind(), ReleaseKind::Release);
        assert_eq!(Version::new("0.5.0rc2").kind(), ReleaseKind::ReleaseCandidate);
        assert_eq!(Version::new("0.5.0+13.def").kind(), ReleaseKind::Development);
    }
}
