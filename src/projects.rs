use crate::error::Result;
use crate::model::SCHEMA_VERSION;
use anyhow::Context;
use chrono::{DateTime, Utc};
use console::style;
use serde::{Deserialize, Deserializer, Serialize};
use std::f64::consts::TAU;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub title: String,
    #[serde(deserialize_with = "year_from_any")]
    pub year: i32,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieSlice {
    pub label: String,
    pub value: usize,
    pub start_angle: f64,
    pub end_angle: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProjectsOutput {
    pub version: u32,
    pub generated_at: DateTime<Utc>,
    pub source: String,
    pub query: Option<String>,
    pub projects: Vec<Project>,
    pub slices: Vec<PieSlice>,
}

pub fn exec(file: &Path, query: Option<&str>, json: bool) -> anyhow::Result<()> {
    let projects = load_projects(file).with_context(|| format!("Failed to load projects from {}", file.display()))?;
    let matching = search(&projects, query.unwrap_or(""));

    if json {
        output_json(&matching, query, file)
    } else {
        output_listing(&matching)
    }
}

fn year_from_any<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<i32, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Year {
        Num(i32),
        Text(String),
    }

    match Year::deserialize(deserializer)? {
        Year::Num(n) => Ok(n),
        Year::Text(s) => s
            .trim()
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("invalid year '{s}'"))),
    }
}

pub fn load_projects(path: &Path) -> Result<Vec<Project>> {
    let text = std::fs::read_to_string(path)?;
    let projects: Vec<Project> = serde_json::from_str(&text)?;
    tracing::debug!(count = projects.len(), "loaded projects from {}", path.display());
    Ok(projects)
}

/// Case-insensitive match against every field of the project.
pub fn search<'a>(projects: &'a [Project], query: &str) -> Vec<&'a Project> {
    let query = query.trim().to_lowercase();
    projects
        .iter()
        .filter(|p| {
            if query.is_empty() {
                return true;
            }
            let haystack = format!(
                "{}\n{}\n{}\n{}",
                p.title,
                p.year,
                p.description,
                p.image.as_deref().unwrap_or("")
            )
            .to_lowercase();
            haystack.contains(&query)
        })
        .collect()
}

/// Project counts per year, most recent year first.
pub fn rollup_by_year(projects: &[&Project]) -> Vec<(i32, usize)> {
    let mut years: Vec<(i32, usize)> = Vec::new();
    for p in projects {
        match years.iter_mut().find(|(y, _)| *y == p.year) {
            Some((_, n)) => *n += 1,
            None => years.push((p.year, 1)),
        }
    }
    years.sort_by(|a, b| b.0.cmp(&a.0));
    years
}

/// Angles in radians. Larger values are laid out first; output keeps the input order.
pub fn pie_slices(data: &[(String, usize)]) -> Vec<PieSlice> {
    let total: usize = data.iter().map(|(_, v)| v).sum();
    if total == 0 {
        return Vec::new();
    }

    let mut layout: Vec<usize> = (0..data.len()).collect();
    layout.sort_by(|&a, &b| data[b].1.cmp(&data[a].1));

    let mut angles = vec![(0.0, 0.0); data.len()];
    let mut cursor = 0.0;
    for (n, &i) in layout.iter().enumerate() {
        let end = if n + 1 == layout.len() {
            TAU
        } else {
            cursor + TAU * data[i].1 as f64 / total as f64
        };
        angles[i] = (cursor, end);
        cursor = end;
    }

    data.iter()
        .zip(angles)
        .map(|((label, value), (start_angle, end_angle))| PieSlice {
            label: label.clone(),
            value: *value,
            start_angle,
            end_angle,
        })
        .collect()
}

pub fn year_slices(projects: &[&Project]) -> Vec<PieSlice> {
    let data: Vec<(String, usize)> = rollup_by_year(projects)
        .into_iter()
        .map(|(year, n)| (year.to_string(), n))
        .collect();
    pie_slices(&data)
}

pub fn output_json(projects: &[&Project], query: Option<&str>, source: &Path) -> anyhow::Result<()> {
    let output = ProjectsOutput {
        version: SCHEMA_VERSION,
        generated_at: Utc::now(),
        source: source.to_string_lossy().to_string(),
        query: query.map(str::to_string),
        projects: projects.iter().map(|p| (*p).clone()).collect(),
        slices: year_slices(projects),
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

pub fn output_listing(projects: &[&Project]) -> anyhow::Result<()> {
    println!("{} {}", style("Projects").bold(), style(format!("({})", projects.len())).dim());
    println!("{}", "─".repeat(60));
    for p in projects {
        println!("{} {}", style(&p.title).bold(), style(p.year).dim());
        if !p.description.is_empty() {
            println!("  {}", p.description);
        }
    }

    let slices = year_slices(projects);
    if !slices.is_empty() {
        println!("\n{}", style("By year").bold());
        for s in &slices {
            let share = (s.end_angle - s.start_angle) / TAU;
            println!(
                "  {:<6} {:>3}  {:<20} {}",
                s.label,
                s.value,
                "●".repeat((share * 20.0).round() as usize),
                crate::util::format_share(share)
            );
        }
    }
    Ok(())
}
