use std::fs;
use std::path::PathBuf;

use crate::cli::build_request;
use crate::error::Result;
use crate::grid;
use crate::models::{AgentProfile, ReportFile};
use crate::profile::{self, FileProfileSource, NoProfileSource};

fn resolve_profile(path: &Option<String>) -> AgentProfile {
    match path {
        Some(p) => profile::resolve(&FileProfileSource::new(p)),
        None => profile::resolve(&NoProfileSource),
    }
}

fn write_file(file: &ReportFile, output: Option<String>) -> Result<()> {
    let path = output
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(&file.filename));
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(&path, &file.bytes)?;
    println!("Wrote {}", path.display());
    Ok(())
}

#[cfg(feature = "pdf")]
#[allow(clippy::too_many_arguments)]
pub fn pdf(
    request: Option<String>,
    rows: Option<String>,
    month: Option<String>,
    category: &str,
    product: &str,
    kind: &str,
    profile_path: Option<String>,
    output: Option<String>,
) -> Result<()> {
    let request = build_request(&request, &rows, &month, category, product, kind)?;
    let grid = grid::compile(&request);
    let profile = resolve_profile(&profile_path);
    let file = crate::pdf::render_document(&request, &grid, &profile, None)?;
    write_file(&file, output)
}

#[cfg(feature = "xlsx")]
#[allow(clippy::too_many_arguments)]
pub fn xlsx(
    request: Option<String>,
    rows: Option<String>,
    month: Option<String>,
    category: &str,
    product: &str,
    kind: &str,
    profile_path: Option<String>,
    output: Option<String>,
) -> Result<()> {
    let request = build_request(&request, &rows, &month, category, product, kind)?;
    let grid = grid::compile(&request);
    let profile = resolve_profile(&profile_path);
    let file = crate::xlsx::render_sheet(&request, &grid, &profile)?;
    write_file(&file, output)
}
