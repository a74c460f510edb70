use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use tracing::info;

use crate::cli::InventoryArgs;
use crate::model::{PdfEntry, PdfInventoryManifest};
use crate::util::{now_utc_string, sha256_file, write_json_pretty};

const MANIFEST_VERSION: u32 = 1;

pub fn run(args: InventoryArgs) -> Result<()> {
    let manifest = build_manifest(&args.source_dir)?;

    if args.dry_run {
        info!(
            pdf_count = manifest.pdf_count,
            source = %manifest.source_directory,
            "inventory dry-run complete"
        );
        return Ok(());
    }

    let manifest_path = args
        .manifest_path
        .unwrap_or_else(|| args.source_dir.join("pdf_inventory.json"));

    write_json_pretty(&manifest_path, &manifest)?;
    info!(path = %manifest_path.display(), "wrote inventory manifest");
    info!(pdf_count = manifest.pdf_count, "inventory completed");

    Ok(())
}

pub fn build_manifest(source_dir: &Path) -> Result<PdfInventoryManifest> {
    let mut pdf_paths = discover_pdfs(source_dir)?;
    pdf_paths.sort();

    if pdf_paths.is_empty() {
        bail!("no PDF files found under {}", source_dir.display());
    }

    let mut entries = Vec::with_capacity(pdf_paths.len());
    for path in &pdf_paths {
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_default();
        let metadata = fs::metadata(path)
            .with_context(|| format!("failed to read metadata for {}", path.display()))?;

        entries.push(PdfEntry {
            filename,
            size_bytes: metadata.len(),
            sha256: sha256_file(path)?,
        });
    }

    Ok(PdfInventoryManifest {
        manifest_version: MANIFEST_VERSION,
        generated_at: now_utc_string(),
        source_directory: source_dir.display().to_string(),
        pdf_count: entries.len(),
        pdfs: entries,
    })
}

fn discover_pdfs(source_dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(source_dir)
        .with_context(|| format!("failed to read source directory: {}", source_dir.display()))?;

    let mut paths = Vec::new();
    for entry in entries {
        let entry = entry
            .with_context(|| format!("failed to read dir entry in {}", source_dir.display()))?;
        let path = entry.path();
        let is_pdf = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("pdf"))
            .unwrap_or(false);
        if path.is_file() && is_pdf {
            paths.push(path);
        }
    }

    Ok(paths)
}
