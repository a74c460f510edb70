use std::path::Path;
use std::process::Command;

use anyhow::{Context, Result, bail};

use crate::model::ToolVersions;

/// One page of extracted text, in document order. Page numbers are 1-based.
#[derive(Debug, Clone)]
pub(crate) struct Page {
    pub number: usize,
    pub text: String,
}

/// Extracts per-page text with `pdftotext`, splitting its output on the
/// form-feed page separator. Trailing empty pages are trimmed.
pub(crate) fn extract_pages(pdf_path: &Path, max_pages: Option<usize>) -> Result<Vec<Page>> {
    let mut command = Command::new("pdftotext");
    command.arg("-enc").arg("UTF-8").arg("-f").arg("1");
    if let Some(max_pages) = max_pages {
        command.arg("-l").arg(max_pages.to_string());
    }
    command.arg(pdf_path).arg("-");

    let output = command
        .output()
        .with_context(|| format!("failed to execute pdftotext for {}", pdf_path.display()))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        bail!(
            "pdftotext returned non-zero exit status for {}: {}",
            pdf_path.display(),
            stderr.trim()
        );
    }

    let raw = String::from_utf8_lossy(&output.stdout);
    let mut pages: Vec<String> = raw
        .split('\u{000C}')
        .map(|page| page.replace('\u{0000}', ""))
        .collect();

    while let Some(last_page) = pages.last() {
        if last_page.trim().is_empty() {
            pages.pop();
        } else {
            break;
        }
    }

    Ok(pages
        .into_iter()
        .enumerate()
        .map(|(index, text)| Page {
            number: index + 1,
            text,
        })
        .collect())
}

/// Whole-document extraction for the direct (one PDF per reading) mode.
pub(crate) fn extract_full_text(pdf_path: &Path, max_pages: Option<usize>) -> Result<String> {
    let pages = extract_pages(pdf_path, max_pages)?;
    Ok(pages
        .into_iter()
        .map(|page| page.text)
        .collect::<Vec<String>>()
        .join("\n"))
}

pub(crate) fn collect_tool_versions() -> ToolVersions {
    ToolVersions {
        rustc: command_version("rustc", &["--version"]),
        pdftotext: command_version("pdftotext", &["-v"]),
    }
}

fn command_version(program: &str, args: &[&str]) -> Option<String> {
    let output = Command::new(program).args(args).output().ok()?;

    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    let source = if stdout.trim().is_empty() {
        stderr
    } else {
        stdout
    };

    source.lines().next().map(|line| line.trim().to_string())
}
