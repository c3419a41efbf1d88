use camino::Utf8Path;

use biotrack::error::TrackError;
use biotrack::fs_util::{checksum, split_name_suffix};

#[test]
fn split_name_suffix_cases() {
    let dataset = [
        ("a", "a", ""),
        ("a.txt", "a", ".txt"),
        ("archive.tar.gz", "archive", ".tar.gz"),
        ("directory/file", "file", ""),
        ("d.x.y.z/f.a.b.c", "f", ".a.b.c"),
        ("logs/date.log.txt", "date", ".log.txt"),
    ];
    for (path, name, suffix) in dataset {
        let (got_name, got_suffix) = split_name_suffix(Utf8Path::new(path));
        assert_eq!(got_name, name, "stem of {path}");
        assert_eq!(got_suffix, suffix, "suffix of {path}");
    }
}

#[test]
fn checksum_matches_md5_fixtures() {
    let temp = tempfile::tempdir().unwrap();
    let a = temp.path().join("a.txt");
    let abc = temp.path().join("abc.txt");
    std::fs::write(&a, b"a").unwrap();
    std::fs::write(&abc, b"abc").unwrap();

    assert_eq!(checksum(&a).unwrap(), "0cc175b9c0f1b6a831c399e269772661");
    assert_eq!(checksum(&abc).unwrap(), "900150983cd24fb0d6963f7d28e17f72");
}

#[test]
fn checksum_depends_only_on_content() {
    let temp = tempfile::tempdir().unwrap();
    let first = temp.path().join("first.csv");
    let second = temp.path().join("nested").join("second.bin");
    std::fs::create_dir_all(second.parent().unwrap()).unwrap();
    std::fs::write(&first, b"gene,count\nCD4,12\n").unwrap();
    std::fs::write(&second, b"gene,count\nCD4,12\n").unwrap();

    assert_eq!(checksum(&first).unwrap(), checksum(&second).unwrap());

    std::fs::write(&second, b"gene,count\nCD8,3\n").unwrap();
    assert_ne!(checksum(&first).unwrap(), checksum(&second).unwrap());
}

#[test]
fn checksum_missing_file() {
    let temp = tempfile::tempdir().unwrap();
    let err = checksum(&temp.path().join("missing.fcs")).unwrap_err();
    assert!(matches!(err, TrackError::Filesystem(_)));
}
