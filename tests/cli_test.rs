#![cfg(feature = "cli")]

use std::fs;
use std::io::Cursor;
use std::process::Command;

use tempfile::TempDir;
use zip::ZipArchive;

fn docx2epub() -> Command {
    Command::new(env!("CARGO_BIN_EXE_docx2epub"))
}

fn write_html(dir: &TempDir, name: &str, html: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, html).unwrap();
    path
}

#[test]
fn test_default_output_next_to_input() {
    let dir = TempDir::new().unwrap();
    let input = write_html(&dir, "Roman.html", "<h1>Unu</h1><p>a</p><h1>Doi</h1><p>b</p>");

    let status = docx2epub().arg(&input).arg("-q").status().unwrap();
    assert!(status.success());

    let bytes = fs::read(dir.path().join("Roman.epub")).unwrap();
    let archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
    let names: Vec<_> = archive.file_names().collect();
    assert!(names.contains(&"OEBPS/chapter-2.xhtml"));
}

#[test]
fn test_explicit_output_with_cover() {
    let dir = TempDir::new().unwrap();
    let input = write_html(&dir, "Roman.html", "<h1>Unu</h1><p>a</p>");
    let cover = dir.path().join("front.png");
    fs::write(&cover, [0x89, b'P', b'N', b'G']).unwrap();
    let output = dir.path().join("carte.epub");

    let out = docx2epub()
        .arg(&input)
        .arg(&output)
        .args(["--cover"])
        .arg(&cover)
        .args(["--title", "Carte", "--author", "Autor"])
        .output()
        .unwrap();
    assert!(out.status.success());
    assert!(String::from_utf8_lossy(&out.stdout).contains("Converted"));

    let bytes = fs::read(&output).unwrap();
    let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
    assert!(archive.by_name("OEBPS/images/cover.png").is_ok());
    assert!(archive.by_name("OEBPS/cover.xhtml").is_ok());
}

#[test]
fn test_chapters_json() {
    let dir = TempDir::new().unwrap();
    let input = write_html(
        &dir,
        "Jurnal.html",
        "<p>Capitolul 1</p><p>a</p><p>Capitolul 2</p><p>b</p>",
    );

    let out = docx2epub()
        .arg(&input)
        .args(["--strategy", "pattern", "--chapters"])
        .output()
        .unwrap();
    assert!(out.status.success());

    let chapters: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    let chapters = chapters.as_array().unwrap();
    assert_eq!(chapters.len(), 2);
    assert_eq!(chapters[1]["id"], "chapter-2");
    assert_eq!(chapters[1]["title"], "Capitolul 2");
    assert!(!dir.path().join("Jurnal.epub").exists());
}

#[test]
fn test_rejects_unsupported_input() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("notes.pdf");
    fs::write(&input, b"%PDF-1.7").unwrap();

    let out = docx2epub().arg(&input).output().unwrap();
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("error: unsupported input"));
}

#[test]
fn test_rejects_unsupported_cover() {
    let dir = TempDir::new().unwrap();
    let input = write_html(&dir, "Roman.html", "<p>x</p>");
    let cover = dir.path().join("cover.bmp");
    fs::write(&cover, [1, 2, 3]).unwrap();

    let out = docx2epub()
        .arg(&input)
        .arg("--cover")
        .arg(&cover)
        .output()
        .unwrap();
    assert!(!out.status.success());
    assert!(!dir.path().join("Roman.epub").exists());
}
