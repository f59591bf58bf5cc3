use hunk::item::title_for;
use hunk::uri::{
    FilePatchDescriptor, FilePatchUri, FilePatchUriOptions, StagingStatus, parse_file_patch_uri,
};

#[test]
fn parses_all_query_flags() {
    let descriptor =
        parse_file_patch_uri("hunk://file-patch/a/b/c.txt/staged?amending&activate&lineNum=12")
            .expect("file patch locator should parse");

    assert_eq!(
        descriptor,
        FilePatchDescriptor {
            file_path: "a/b/c.txt".to_string(),
            staging_status: StagingStatus::Staged,
            amending: true,
            activate: true,
            line_number: Some(12),
        }
    );
}

#[test]
fn missing_query_leaves_flags_unset() {
    let descriptor = parse_file_patch_uri("hunk://file-patch/file.txt/unstaged")
        .expect("file patch locator should parse");

    assert_eq!(descriptor.file_path, "file.txt");
    assert_eq!(descriptor.staging_status, StagingStatus::Unstaged);
    assert!(!descriptor.amending);
    assert!(!descriptor.activate);
    assert_eq!(descriptor.line_number, None);
}

#[test]
fn flags_are_presence_only() {
    let descriptor =
        parse_file_patch_uri("hunk://file-patch/file.txt/staged?&activate=no&amending=false")
            .expect("file patch locator should parse");

    assert!(descriptor.amending);
    assert!(descriptor.activate);
}

#[test]
fn rejects_other_schemes_and_kinds() {
    for locator in [
        "https://file-patch/file.txt/staged",
        "hunk://commit-detail/file.txt/staged",
        "atom://file-patch/file.txt/staged",
        "file:///tmp/file.txt",
        "not a locator",
        "",
    ] {
        assert_eq!(
            parse_file_patch_uri(locator),
            None,
            "{locator} should not be handled"
        );
    }
}

#[test]
fn rejects_missing_path_segments() {
    assert_eq!(parse_file_patch_uri("hunk://file-patch/"), None);
    assert_eq!(parse_file_patch_uri("hunk://file-patch"), None);
    assert_eq!(parse_file_patch_uri("hunk://file-patch/only.txt"), None);
    assert_eq!(parse_file_patch_uri("hunk://file-patch//only.txt//"), None);
}

#[test]
fn ignores_empty_path_segments() {
    let descriptor = parse_file_patch_uri("hunk://file-patch//file.txt//staged")
        .expect("file patch locator should parse");
    assert_eq!(descriptor.file_path, "file.txt");
    assert_eq!(descriptor.staging_status, StagingStatus::Staged);
}

#[test]
fn accepts_unrecognized_staging_status() {
    let descriptor = parse_file_patch_uri("hunk://file-patch/file.txt/partial")
        .expect("unknown staging status should still parse");

    assert_eq!(
        descriptor.staging_status,
        StagingStatus::Unrecognized("partial".to_string())
    );
    assert!(!descriptor.staging_status.is_staged());
    assert_eq!(descriptor.staging_status.as_str(), "partial");
}

#[test]
fn trailing_segment_is_the_staging_status() {
    let descriptor = parse_file_patch_uri("hunk://file-patch/file.txt/staged/extra")
        .expect("file patch locator should parse");

    assert_eq!(descriptor.file_path, "file.txt/staged");
    assert_eq!(
        descriptor.staging_status,
        StagingStatus::Unrecognized("extra".to_string())
    );
    assert_eq!(title_for(&descriptor), "Unstaged Changes: file.txt/staged");
}

#[test]
fn rejects_segments_that_are_not_utf8() {
    assert_eq!(parse_file_patch_uri("hunk://file-patch/%FF.txt/staged"), None);
    assert_eq!(parse_file_patch_uri("hunk://file-patch/file.txt/%C3"), None);
}

#[test]
fn dot_segments_are_resolved_before_splitting() {
    let descriptor = parse_file_patch_uri("hunk://file-patch/../secret.txt/staged")
        .expect("file patch locator should parse");
    assert_eq!(descriptor.file_path, "secret.txt");

    let descriptor = parse_file_patch_uri("hunk://file-patch/src/./lib.rs/unstaged")
        .expect("file patch locator should parse");
    assert_eq!(descriptor.file_path, "src/lib.rs");
}

#[test]
fn malformed_line_numbers_are_absent() {
    for query in [
        "lineNum=abc",
        "lineNum=-3",
        "lineNum=",
        "lineNum",
        "lineNum=99999999999",
    ] {
        let locator = format!("hunk://file-patch/file.txt/staged?{query}");
        let descriptor = parse_file_patch_uri(&locator).expect("file patch locator should parse");
        assert_eq!(
            descriptor.line_number, None,
            "{query} should not set a line number"
        );
    }

    let descriptor = parse_file_patch_uri("hunk://file-patch/file.txt/staged?lineNum=0")
        .expect("file patch locator should parse");
    assert_eq!(descriptor.line_number, Some(0));
}

#[test]
fn decodes_percent_encoded_file_paths() {
    let descriptor = parse_file_patch_uri("hunk://file-patch/src%2Fmy%20file.rs/unstaged")
        .expect("file patch locator should parse");
    assert_eq!(descriptor.file_path, "src/my file.rs");
}

#[test]
fn built_locators_parse_back() {
    let uri = FilePatchUri::build(
        "src/app/render #1.rs",
        &StagingStatus::Staged,
        FilePatchUriOptions {
            amending: true,
            activate: false,
            line_number: Some(42),
        },
    );
    assert!(uri.starts_with("hunk://file-patch/"));

    let descriptor = parse_file_patch_uri(&uri).expect("built locator should parse");
    assert_eq!(
        descriptor,
        FilePatchDescriptor {
            file_path: "src/app/render #1.rs".to_string(),
            staging_status: StagingStatus::Staged,
            amending: true,
            activate: false,
            line_number: Some(42),
        }
    );
}

#[test]
fn built_locator_without_options_has_no_query() {
    let uri = FilePatchUri::build(
        "README.md",
        &StagingStatus::Unstaged,
        FilePatchUriOptions::default(),
    );
    assert_eq!(uri, "hunk://file-patch/README.md/unstaged");
}

#[test]
fn parsing_is_deterministic() {
    let locator = "hunk://file-patch/lib.rs/staged?activate";
    assert_eq!(parse_file_patch_uri(locator), parse_file_patch_uri(locator));
}
