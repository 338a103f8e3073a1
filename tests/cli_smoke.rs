use assert_cmd::prelude::*;
use pretty_assertions::assert_eq;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::tempdir;

const LOG: &str = "\
commit,author,date,timezone,datetime,file,line,depth,length,type
a1,Ana,2024-02-01,-05:00,2024-02-01T09:30:00-05:00,index.html,1,0,20,html
a1,Ana,2024-02-01,-05:00,2024-02-01T09:30:00-05:00,index.html,2,1,35,html
a1,Ana,2024-02-01,-05:00,2024-02-01T09:30:00-05:00,style.css,1,0,12,css
b2,Ben,2024-02-03,-05:00,2024-02-03T14:15:00-05:00,global.js,1,0,40,js
b2,Ben,2024-02-03,-05:00,2024-02-03T14:15:00-05:00,global.js,2,2,18,js
c3,Ana,2024-02-10,-05:00,2024-02-10T22:45:00-05:00,global.js,3,1,25,js
";

fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    let mut f = File::create(&path).unwrap();
    f.write_all(content.as_bytes()).unwrap();
    f.sync_all().unwrap();
    path
}

fn locmap(data: &Path) -> Command {
    let mut cmd = Command::cargo_bin("locmap").unwrap();
    cmd.env_remove("LOCMAP_DATA")
        .env_remove("LOCMAP_REPO")
        .arg("--data")
        .arg(data);
    cmd
}

fn json_of(cmd: &mut Command) -> serde_json::Value {
    let out = cmd.assert().success().get_output().stdout.clone();
    serde_json::from_slice(&out).unwrap()
}

fn ids(v: &serde_json::Value) -> Vec<String> {
    v.as_array()
        .unwrap()
        .iter()
        .map(|c| c["id"].as_str().unwrap().to_string())
        .collect()
}

#[test]
fn stats_json_summarises_log() {
    let dir = tempdir().unwrap();
    let data = write_file(dir.path(), "loc.csv", LOG);

    let v = json_of(locmap(&data).args(["stats", "--json"]));
    assert_eq!(v["version"], 1);
    let stats = &v["stats"];
    assert_eq!(stats["total_loc"], 6);
    assert_eq!(stats["total_commits"], 3);
    assert_eq!(stats["files"], 3);
    assert_eq!(stats["avg_file_length"], 2);
    assert_eq!(stats["max_file_length"], 3);
    assert_eq!(stats["max_depth"], 2);
    assert_eq!(stats["longest_line"], 40);
    assert_eq!(stats["authors"], 2);
}

#[test]
fn commits_json_groups_lines() {
    let dir = tempdir().unwrap();
    let data = write_file(dir.path(), "loc.csv", LOG);

    let v = json_of(locmap(&data).args(["--repo", "ana/site", "commits", "--json"]));
    let commits = &v["commits"];
    assert_eq!(ids(commits), vec!["a1", "b2", "c3"]);
    assert_eq!(commits[0]["total_lines"], 3);
    assert_eq!(commits[0]["hour_frac"], 9.5);
    assert_eq!(commits[1]["hour_frac"], 14.25);
    assert_eq!(commits[0]["url"], "https://github.com/ana/site/commit/a1");
}

#[test]
fn commits_ndjson_emits_one_line_per_commit() {
    let dir = tempdir().unwrap();
    let data = write_file(dir.path(), "loc.csv", LOG);

    let out = locmap(&data)
        .args(["commits", "--ndjson", "--order", "chronological"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let text = String::from_utf8(out).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 3);
    let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
    assert_eq!(first["id"], "a1");
    assert!(first.get("url").is_none());
}

#[test]
fn window_follows_slider_and_date() {
    let dir = tempdir().unwrap();
    let data = write_file(dir.path(), "loc.csv", LOG);

    let start = json_of(locmap(&data).args(["window", "--progress", "0", "--json"]));
    assert_eq!(ids(&start["commits"]), vec!["a1"]);
    assert_eq!(start["files"].as_array().unwrap().len(), 2);

    let until = json_of(locmap(&data).args(["window", "--until", "2024-02-05", "--json"]));
    assert_eq!(ids(&until["commits"]), vec!["a1", "b2"]);
    assert_eq!(until["files"][0]["file"], "global.js");

    let early = json_of(locmap(&data).args(["window", "--until", "2020-01-01", "--json"]));
    assert_eq!(ids(&early["commits"]), vec!["a1"]);
}

#[test]
fn window_clamps_out_of_range_progress() {
    let dir = tempdir().unwrap();
    let data = write_file(dir.path(), "loc.csv", LOG);

    let below = json_of(locmap(&data).args(["window", "--progress", "-5", "--json"]));
    assert_eq!(ids(&below["commits"]), vec!["a1"]);

    let above = json_of(locmap(&data).args(["window", "--progress", "250", "--json"]));
    assert_eq!(ids(&above["commits"]), vec!["a1", "b2", "c3"]);
}

#[test]
fn select_brushes_time_and_hours() {
    let dir = tempdir().unwrap();
    let data = write_file(dir.path(), "loc.csv", LOG);

    let v = json_of(locmap(&data).args([
        "select", "--from", "2024-02-01", "--to", "2024-02-04", "--hours", "9-17", "--json",
    ]));
    assert_eq!(v["label"], "2 commits selected");
    assert_eq!(ids(&v["commits"]), vec!["a1", "b2"]);
    let kinds: Vec<&str> = v["breakdown"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["type"].as_str().unwrap())
        .collect();
    assert_eq!(kinds, vec!["html", "css", "js"]);
    assert_eq!(v["breakdown"][2]["share"], "40%");

    let none = json_of(locmap(&data).args([
        "select", "--from", "2024-02-01", "--to", "2024-02-04", "--hours", "0-1", "--json",
    ]));
    assert_eq!(none["label"], "No commits selected");
}

#[test]
fn story_json_activates_step() {
    let dir = tempdir().unwrap();
    let data = write_file(dir.path(), "loc.csv", LOG);

    let v = json_of(locmap(&data).args(["story", "--step", "1", "--json"]));
    assert_eq!(v["steps"].as_array().unwrap().len(), 3);
    assert_eq!(v["active"]["step"]["commit_id"], "b2");
    assert_eq!(v["active"]["commit_ids"], serde_json::json!(["a1", "b2"]));

    let out_of_range = json_of(locmap(&data).args(["story", "--step", "9", "--json"]));
    assert!(out_of_range.get("active").is_none());
}

#[test]
fn hours_json_has_full_day() {
    let dir = tempdir().unwrap();
    let data = write_file(dir.path(), "loc.csv", LOG);

    let v = json_of(locmap(&data).args(["hours", "--chapter", "languages", "--json"]));
    assert_eq!(v["buckets"].as_array().unwrap().len(), 24);
    assert_eq!(v["chapter"], "languages");
    assert_eq!(v["peak_hour"], 9);
    assert_eq!(v["buckets"][22]["dominant_type"], "js");
    assert_eq!(v["buckets"][3]["dominant_type"], "Other");
    assert_eq!(v["types"], serde_json::json!(["html", "css", "js"]));
}

#[test]
fn scatter_writes_svg() {
    let dir = tempdir().unwrap();
    let data = write_file(dir.path(), "loc.csv", LOG);
    let svg = dir.path().join("plot.svg");

    locmap(&data)
        .args(["scatter", "--svg"])
        .arg(&svg)
        .assert()
        .success();
    let text = fs::read_to_string(&svg).unwrap();
    assert!(text.starts_with("<svg"));
    assert_eq!(text.matches("<circle").count(), 3);
}

#[test]
fn projects_filter_and_roll_up() {
    let dir = tempdir().unwrap();
    let data = write_file(dir.path(), "loc.csv", LOG);
    let projects = write_file(
        dir.path(),
        "projects.json",
        r#"[
            {"title": "Lab Notebook", "year": "2024", "description": "Scales and axes"},
            {"title": "Commit Explorer", "year": 2025, "description": "Scrollytelling"},
            {"title": "Weather", "year": "2024", "description": "Charts"}
        ]"#,
    );

    let v = json_of(
        locmap(&data)
            .args(["projects", "--file"])
            .arg(&projects)
            .args(["--query", "2024", "--json"]),
    );
    assert_eq!(v["projects"].as_array().unwrap().len(), 2);
    assert_eq!(v["slices"][0]["label"], "2024");
    assert_eq!(v["slices"][0]["value"], 2);
}

#[test]
fn bad_input_is_reported() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("nope.csv");
    let out = locmap(&missing).args(["stats"]).assert().failure().get_output().stderr.clone();
    assert!(String::from_utf8_lossy(&out).contains("Failed to load commit log"));

    let broken = write_file(
        dir.path(),
        "broken.csv",
        "commit,author,datetime,file,line,depth,length,type\na1,Ana,yesterday,a.js,1,0,3,js\n",
    );
    let out = locmap(&broken).args(["stats", "--json"]).assert().failure().get_output().stderr.clone();
    assert!(String::from_utf8_lossy(&out).contains("row 1"));
}
