#![allow(dead_code)]

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// 1行分の注文 (固定長210文字)
pub fn order_line(
    style: &str,
    books: u32,
    serial: &str,
    name: &str,
    delivery_code: &str,
    delivery_name: &str,
) -> String {
    format!(
        "{:<2}{:1}{:1}{:<5}{:<10}{:1}{:<2}{:<2}{:<2}{:>4}{:<6}{:<6}{:<36}{:<30}{:<30}{:1}{:<30}{:<5}{:<36}",
        "01",
        "1",
        "N",
        "01100",
        "1234567890",
        "7",
        "00",
        "00",
        style,
        books,
        serial,
        "000000",
        name,
        "KCB MOI AVENUE",
        "P.O. BOX 48400",
        "Y",
        "",
        delivery_code,
        delivery_name,
    )
}

/// ヘッダー・注文3件・トレーラーからなるDATファイル
pub fn sample_dat() -> String {
    let header = format!("{:<210}", "010HEADER");
    let trailer = format!("{:<210}", "014TRAILER");
    [
        header,
        order_line("01", 2, "000001", "JOHN DOE", "01320", "KCB LAVINGTON"),
        order_line("52", 1, "000500", "GLOBAL TRADERS LTD", "01100", "KCB MOI AVENUE"),
        order_line("02", 1, "000900", "ACME CORPORATION", "01320", "KCB LAVINGTON"),
        trailer,
    ]
    .join("\r\n")
}

pub struct TestEnv {
    tmp: TempDir,
    pub output: PathBuf,
}

impl TestEnv {
    pub fn new() -> Self {
        let tmp = TempDir::new().expect("create temp dir");
        let output = tmp.path().join("out");
        Self { tmp, output }
    }

    pub fn dir(&self) -> &Path {
        self.tmp.path()
    }

    pub fn write(&self, name: &str, content: &str) -> PathBuf {
        let path = self.tmp.path().join(name);
        fs::write(&path, content).expect("write fixture");
        path
    }

    pub fn cmd(&self) -> Command {
        let mut cmd = cargo_bin_cmd!("packlist");
        cmd.current_dir(self.tmp.path())
            .env_remove("RUST_LOG")
            .env("PACKLIST_OUTPUT_DIR", &self.output);
        cmd
    }

    pub fn run_json(&self, args: &[&str]) -> (bool, Value) {
        let output = self
            .cmd()
            .arg("--json")
            .args(args)
            .output()
            .expect("run packlist");
        let value = serde_json::from_slice(&output.stdout).expect("valid json output");
        (output.status.success(), value)
    }

    pub fn pdfs(&self) -> Vec<PathBuf> {
        let mut files: Vec<PathBuf> = fs::read_dir(&self.output)
            .map(|entries| {
                entries
                    .filter_map(|e| e.ok().map(|e| e.path()))
                    .filter(|p| p.extension().is_some_and(|e| e == "pdf"))
                    .collect()
            })
            .unwrap_or_default();
        files.sort();
        files
    }
}
