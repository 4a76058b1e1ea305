//! Docs pipeline test: scans a namespaced archive and writes the paginated
//! Markdown tree (one file per page plus an index).

use std::fs;

use slackmoji::cli;

#[tokio::test]
async fn test_docs_writes_page_files_and_index() {
    let tmp = tempfile::tempdir().unwrap();
    let input_root = tmp.path().join("emojis");
    let output_root = tmp.path().join("docs");

    let namespace_dir = input_root.join("animals");
    fs::create_dir_all(&namespace_dir).unwrap();
    for i in 0..120 {
        fs::write(namespace_dir.join(format!("emoji-{:03}.gif", i)), b"gif").unwrap();
    }
    fs::write(namespace_dir.join(".DS_Store"), b"junk").unwrap();

    cli::run_docs("animals", &input_root, &output_root)
        .await
        .unwrap();

    let out_dir = output_root.join("animals");
    let first = fs::read_to_string(out_dir.join("page-e-000000.md")).unwrap();
    let second = fs::read_to_string(out_dir.join("page-e-000001.md")).unwrap();
    let index = fs::read_to_string(out_dir.join("index.md")).unwrap();

    // 120 emoji split 100 + 20, linked both ways
    assert_eq!(first.matches("| `:emoji-").count(), 100);
    assert_eq!(second.matches("| `:emoji-").count(), 20);
    assert!(first.contains("[next](/docs/animals/page-e-000001.md)"));
    assert!(second.contains("[previous](/docs/animals/page-e-000000.md)"));
    assert!(!second.contains("DS_Store"));

    assert!(index.contains("120 emoji across 2 pages."));
    assert!(index.contains("[page-e-000000](./page-e-000000.md)"));
    assert!(index.contains("[page-e-000001](./page-e-000001.md)"));
}

#[tokio::test]
async fn test_docs_empty_namespace_writes_index_only() {
    let tmp = tempfile::tempdir().unwrap();
    let input_root = tmp.path().join("emojis");
    let output_root = tmp.path().join("docs");
    fs::create_dir_all(input_root.join("empty")).unwrap();

    cli::run_docs("empty", &input_root, &output_root)
        .await
        .unwrap();

    let out_dir = output_root.join("empty");
    assert!(out_dir.join("index.md").is_file());
    assert_eq!(
        fs::read_dir(&out_dir).unwrap().count(),
        1,
        "no page files for an empty namespace"
    );
}
