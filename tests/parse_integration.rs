/// End-to-end parsing of a fixture tree through the public API
use anyhow::Result;
use repo_chunker::config::Config;
use repo_chunker::error::ChunkerError;
use repo_chunker::indexer::{RepoParser, chunk_file, parse_repo, select_files};
use repo_chunker::types::Chunk;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn numbered_lines(count: usize) -> String {
    (1..=count).map(|i| format!("line {}\n", i)).collect()
}

fn write(root: &Path, relative: &str, content: &str) -> Result<()> {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)?;
    Ok(())
}

fn build_fixture() -> Result<TempDir> {
    let dir = TempDir::new()?;
    let root = dir.path();
    write(root, "src/ingestion/parser.py", &numbered_lines(125))?;
    write(root, "src/ingestion/cloner.py", &numbered_lines(20))?;
    write(root, "web/app.tsx", &numbered_lines(61))?;
    write(root, "docs/guide.md", "# Guide\n\nSome text.\n")?;
    write(root, ".env.example", "TOKEN=\n")?;
    write(root, "bin/tool.exe", "MZ")?;
    write(root, ".git/objects/hooks.py", "print('hidden')\n")?;
    write(root, "node_modules/lib/index.js", "module.exports = 1;\n")?;
    write(root, "build/generated.rs", "pub fn g() {}\n")?;
    Ok(dir)
}

fn group_by_file(chunks: &[Chunk]) -> BTreeMap<&str, Vec<&Chunk>> {
    let mut grouped: BTreeMap<&str, Vec<&Chunk>> = BTreeMap::new();
    for chunk in chunks {
        grouped
            .entry(chunk.metadata.file_path.as_str())
            .or_default()
            .push(chunk);
    }
    grouped
}

#[test]
fn test_select_files_respects_allow_and_deny_lists() -> Result<()> {
    let dir = build_fixture()?;
    let mut names: Vec<String> = select_files(dir.path())?
        .iter()
        .map(|p| {
            p.strip_prefix(dir.path())
                .unwrap()
                .to_string_lossy()
                .replace('\\', "/")
        })
        .collect();
    names.sort();

    assert_eq!(
        names,
        vec![
            ".env.example",
            "docs/guide.md",
            "src/ingestion/cloner.py",
            "src/ingestion/parser.py",
            "web/app.tsx",
        ]
    );
    Ok(())
}

#[test]
fn test_parse_repo_chunk_invariants() -> Result<()> {
    let dir = build_fixture()?;
    let chunks = parse_repo(dir.path())?;
    let grouped = group_by_file(&chunks);

    assert_eq!(grouped.len(), 5);

    let parser = &grouped["src/ingestion/parser.py"];
    let spans: Vec<_> = parser
        .iter()
        .map(|c| (c.metadata.start_line, c.metadata.end_line))
        .collect();
    assert_eq!(spans, vec![(1, 60), (51, 110), (101, 125)]);

    let tsx = &grouped["web/app.tsx"];
    assert_eq!(tsx.len(), 2);
    assert_eq!(tsx[1].metadata.start_line, 51);
    assert_eq!(tsx[1].metadata.end_line, 61);
    assert_eq!(tsx[0].metadata.language, "Unknown");

    for file_chunks in grouped.values() {
        assert_eq!(file_chunks[0].metadata.start_line, 1);
        for pair in file_chunks.windows(2) {
            assert!(pair[0].metadata.start_line < pair[1].metadata.start_line);
            assert_eq!(pair[0].metadata.end_line - pair[1].metadata.start_line + 1, 10);
        }
        for chunk in file_chunks {
            assert_eq!(
                chunk.content.split_inclusive('\n').count(),
                chunk.line_count()
            );
        }
    }

    assert_eq!(grouped["src/ingestion/cloner.py"][0].metadata.language, "Python");
    Ok(())
}

#[test]
fn test_parse_round_trip_reproduces_files() -> Result<()> {
    let dir = build_fixture()?;
    let chunks = parse_repo(dir.path())?;

    for (file_path, file_chunks) in group_by_file(&chunks) {
        let mut rebuilt = file_chunks[0].content.clone();
        for chunk in &file_chunks[1..] {
            let fresh: String = chunk.content.split_inclusive('\n').skip(10).collect();
            rebuilt.push_str(&fresh);
        }
        let original = fs::read_to_string(dir.path().join(file_path))?;
        assert_eq!(rebuilt, original, "round trip failed for {}", file_path);
    }
    Ok(())
}

#[test]
fn test_chunk_file_rejects_degenerate_window() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("a.rs");
    fs::write(&path, numbered_lines(200)).unwrap();

    assert!(chunk_file(&path, dir.path(), 10, 10).is_err());
    assert!(chunk_file(&path, dir.path(), 10, 11).is_err());
    assert!(chunk_file(&path, dir.path(), 0, 0).is_err());
}

#[test]
fn test_parser_from_config_file() -> Result<()> {
    let dir = build_fixture()?;
    let config_dir = TempDir::new()?;
    let config_path = config_dir.path().join("config.toml");
    fs::write(
        &config_path,
        r#"
[chunking]
chunk_size = 30
overlap = 0

[selection]
extensions = ["py"]

[languages]
py = "Python 3"

[parsing]
parallel = true
"#,
    )?;

    let config = Config::from_file(&config_path)?;
    let report = RepoParser::from_config(&config)?.parse(dir.path())?;

    let files: Vec<_> = group_by_file(&report.chunks).keys().copied().collect();
    assert_eq!(
        files,
        vec![".env.example", "src/ingestion/cloner.py", "src/ingestion/parser.py"]
    );
    let parser_chunks = report
        .chunks
        .iter()
        .filter(|c| c.metadata.file_path == "src/ingestion/parser.py")
        .count();
    assert_eq!(parser_chunks, 5);
    assert!(
        report
            .chunks
            .iter()
            .filter(|c| c.metadata.file_path.ends_with(".py"))
            .all(|c| c.metadata.language == "Python 3")
    );
    Ok(())
}

#[test]
fn test_parse_missing_root_fails() {
    let result = parse_repo(Path::new("/definitely/not/a/repo"));
    assert!(matches!(result, Err(ChunkerError::Filesystem(_))));
}

#[test]
fn test_chunks_serialize_for_downstream() -> Result<()> {
    let dir = build_fixture()?;
    let chunks = parse_repo(dir.path())?;

    let json = serde_json::to_string(&chunks)?;
    let decoded: Vec<Chunk> = serde_json::from_str(&json)?;
    assert_eq!(decoded, chunks);

    let value = serde_json::to_value(&chunks[0])?;
    assert!(value["metadata"]["file_path"].is_string());
    assert!(value["metadata"]["start_line"].is_u64());
    Ok(())
}

#[cfg(unix)]
#[test]
fn test_symlinked_file_is_chunked_under_its_own_path() -> Result<()> {
    let dir = TempDir::new()?;
    let root = dir.path();
    write(root, "vendor/shared.py", &numbered_lines(3))?;
    std::os::unix::fs::symlink(root.join("vendor/shared.py"), root.join("shared_link.py"))?;

    let chunks = parse_repo(root)?;
    let files: Vec<_> = chunks.iter().map(|c| c.metadata.file_path.as_str()).collect();
    assert_eq!(files, vec!["shared_link.py", "vendor/shared.py"]);
    assert_eq!(chunks[0].content, chunks[1].content);
    Ok(())
}
